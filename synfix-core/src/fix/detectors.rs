//! Constraint detectors: pure scanners that turn a sequence into codon-range
//! fix suggestions.
//!
//! Every detector owns its scan state and collects into its own sink, so a
//! round can run all detectors in parallel and hand the coordinator one
//! finished batch per detector. Suggestions carry codon indices; the
//! nucleotide→codon conversion (with its one-codon back-off for unaligned
//! spans) lives in [`DnaSuggestion::spanning`].

use std::cell::RefCell;
use std::collections::HashSet;

use crate::constants::DEFAULT_TEMPERATURE;
use crate::fix::predictor::StructurePredictor;
use crate::mfe;
use crate::sequence::{gc_fraction, reverse_complement, transcribe};
use crate::types::{DnaSuggestion, GcBias, LoopKind};

/// Collector for one detector's suggestions.
///
/// Each detector task owns its own sink; the finished batch travels to the
/// coordinator as a single channel message, so a scan never blocks no
/// matter how many violations it finds.
#[derive(Debug, Default)]
pub struct SuggestionSink {
    suggestions: RefCell<Vec<DnaSuggestion>>,
}

impl SuggestionSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Report one suggestion.
    pub fn report(&self, suggestion: DnaSuggestion) {
        self.suggestions.borrow_mut().push(suggestion);
    }

    /// Hand over everything the detector reported.
    pub(crate) fn into_suggestions(self) -> Vec<DnaSuggestion> {
        self.suggestions.into_inner()
    }
}

/// A scanner that flags problematic regions of a coding sequence.
///
/// Implementations must be pure with respect to the sequence (same input,
/// same suggestions) and shareable across threads; one round of the fixer
/// runs every detector concurrently.
pub trait Detector: Send + Sync {
    /// Scan `sequence` and report every violation to `sink`.
    fn scan(&self, sequence: &str, sink: &SuggestionSink);
}

/// Flags every occurrence of a set of forbidden subsequences, on both
/// strands.
pub struct RemoveSequence {
    sites: Vec<String>,
    label: String,
}

impl RemoveSequence {
    /// Detector for user-defined forbidden sites.
    #[must_use]
    pub fn new(sites: Vec<String>) -> Self {
        Self {
            sites,
            label: "Remove sequence".to_string(),
        }
    }

    /// Detector for the BsaI recognition site.
    #[must_use]
    pub fn bsa_i() -> Self {
        Self {
            sites: vec!["GGTCTC".to_string()],
            label: "BsaI removal".to_string(),
        }
    }

    /// Detector for the common TypeIIS recognition sites: BbsI, BsaI, BtgZI,
    /// BsmBI, SapI and PaqCI (AarI).
    #[must_use]
    pub fn type_iis() -> Self {
        let sites = ["GAAGAC", "GGTCTC", "GCGATG", "CGTCTC", "GCTCTTC", "CACCTGC"];
        Self {
            sites: sites.iter().map(|site| (*site).to_string()).collect(),
            label: "TypeIIS removal".to_string(),
        }
    }
}

impl Detector for RemoveSequence {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        for site in &self.sites {
            if site.is_empty() {
                continue;
            }
            for strand_site in [site.clone(), reverse_complement(site)] {
                for (start, _) in sequence.match_indices(strand_site.as_str()) {
                    sink.report(DnaSuggestion::spanning(
                        start,
                        start + strand_site.len(),
                        GcBias::Na,
                        1,
                        &self.label,
                    ));
                }
            }
        }
    }
}

/// Flags the second and later occurrences of any k-mer.
pub struct RemoveRepeat {
    length: usize,
}

impl RemoveRepeat {
    #[must_use]
    pub const fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Detector for RemoveRepeat {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        if self.length == 0 || sequence.len() < self.length {
            return;
        }

        let mut seen: HashSet<&[u8]> = HashSet::new();
        for (i, kmer) in sequence.as_bytes().windows(self.length).enumerate() {
            if !seen.insert(kmer) {
                sink.report(DnaSuggestion::spanning(
                    i,
                    i + self.length,
                    GcBias::Na,
                    1,
                    "Remove repeat",
                ));
            }
        }
    }
}

/// Flags k-mers present in an external k-mer set (e.g. host genome repeats),
/// in either strand orientation.
pub struct GlobalRemoveRepeat {
    length: usize,
    kmers: HashSet<String>,
}

impl GlobalRemoveRepeat {
    #[must_use]
    pub fn new(length: usize, kmers: HashSet<String>) -> Self {
        Self { length, kmers }
    }
}

impl Detector for GlobalRemoveRepeat {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        if self.length == 0 || sequence.len() < self.length {
            return;
        }

        for i in 0..=(sequence.len() - self.length) {
            let kmer = &sequence[i..i + self.length];
            if self.kmers.contains(kmer) || self.kmers.contains(&reverse_complement(kmer)) {
                sink.report(DnaSuggestion::spanning(
                    i,
                    i + self.length,
                    GcBias::Na,
                    1,
                    "Remove repeat",
                ));
            }
        }
    }
}

/// Pushes the whole-sequence GC fraction back into `[lower, upper]`.
///
/// One suggestion spans the entire sequence; the number of allowed changes
/// is proportional to how far outside the band the sequence sits.
pub struct GcContentFixer {
    upper: f64,
    lower: f64,
}

impl GcContentFixer {
    #[must_use]
    pub const fn new(upper: f64, lower: f64) -> Self {
        Self { upper, lower }
    }
}

impl Detector for GcContentFixer {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        let gc = gc_fraction(sequence);
        if gc > self.upper {
            let changes = ((gc - self.upper) * sequence.len() as f64) as usize;
            sink.report(DnaSuggestion {
                start: 0,
                end: sequence.len(),
                bias: GcBias::At,
                quantity_fixes: changes,
                suggestion_type: "GcContent too high".to_string(),
            });
        }
        if gc < self.lower {
            let changes = ((self.lower - gc) * sequence.len() as f64) as usize;
            sink.report(DnaSuggestion {
                start: 0,
                end: sequence.len(),
                bias: GcBias::Gc,
                quantity_fixes: changes,
                suggestion_type: "GcContent too low".to_string(),
            });
        }
    }
}

/// Flags stems whose reverse complement appears within a nearby window,
/// which can fold back into a hairpin during synthesis.
pub struct RemoveHairpin {
    stem_size: usize,
    window: usize,
}

impl RemoveHairpin {
    #[must_use]
    pub const fn new(stem_size: usize, window: usize) -> Self {
        Self {
            stem_size,
            window,
        }
    }
}

impl Detector for RemoveHairpin {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        if self.stem_size == 0 || self.window <= self.stem_size {
            return;
        }
        let length = sequence.len();
        let reverse = reverse_complement(sequence);

        let mut i = 0;
        while i + self.stem_size < length && i + self.window <= length {
            let stem = &sequence[i..i + self.stem_size];
            // the window ahead of the stem, read on the opposite strand
            let rest = &reverse[length - (i + self.window)..length - (i + self.stem_size)];
            if let Some(location) = rest.find(stem) {
                sink.report(DnaSuggestion::spanning(
                    i,
                    i + self.window - location - 1,
                    GcBias::Na,
                    1,
                    "Remove nearby reverse complement, possible hairpin",
                ));
            }
            i += 1;
        }
    }
}

/// Folds the 5' region of the sequence with an external predictor and flags
/// every folded substructure in it.
pub struct RemoveSecondaryStructure<P> {
    close_index: usize,
    predictor: P,
}

impl<P: StructurePredictor> RemoveSecondaryStructure<P> {
    #[must_use]
    pub fn new(close_index: usize, predictor: P) -> Self {
        Self {
            close_index,
            predictor,
        }
    }
}

impl<P: StructurePredictor> Detector for RemoveSecondaryStructure<P> {
    fn scan(&self, sequence: &str, sink: &SuggestionSink) {
        if sequence.len() < self.close_index {
            return;
        }
        let rna = transcribe(&sequence[..self.close_index]);

        // predictor or evaluation failures silence this detector for the
        // round; the remaining detectors still run
        let Ok((dot_bracket, _score)) = self.predictor.fold(&rna) else {
            return;
        };
        let Ok(evaluation) = mfe::evaluate(&rna, &dot_bracket, DEFAULT_TEMPERATURE) else {
            return;
        };

        for contribution in &evaluation.contributions {
            if !matches!(contribution.kind, LoopKind::Hairpin | LoopKind::Multi) {
                continue;
            }
            if let Some(closing) = contribution.closing {
                sink.report(DnaSuggestion::spanning(
                    closing.five_prime,
                    closing.three_prime,
                    GcBias::Na,
                    1,
                    "Remove secondary structure",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::types::SynfixError;

    fn collect(detector: &dyn Detector, sequence: &str) -> Vec<DnaSuggestion> {
        let sink = SuggestionSink::new();
        detector.scan(sequence, &sink);
        sink.into_suggestions()
    }

    #[test]
    fn test_remove_sequence_reports_codon_range() {
        // GGTCTC at nucleotide 30 covers codons 10..=12
        let sequence = format!("{}GGTCTC{}", "AAA".repeat(10), "AAA".repeat(10));
        let detector = RemoveSequence::bsa_i();
        let suggestions = collect(&detector, &sequence);

        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].start, 10);
        assert_eq!(suggestions[0].end, 12);
        assert_eq!(suggestions[0].suggestion_type, "BsaI removal");
        assert_eq!(suggestions[0].bias, GcBias::Na);
    }

    #[test]
    fn test_remove_sequence_finds_the_reverse_strand() {
        // GAGACC is the reverse complement of GGTCTC
        let sequence = format!("{}GAGACC{}", "AAA".repeat(4), "AAA".repeat(4));
        let detector = RemoveSequence::bsa_i();
        let suggestions = collect(&detector, &sequence);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].start, 4);
    }

    #[test]
    fn test_remove_sequence_unaligned_site_backs_off() {
        // site at nucleotide 4: codons 1..=2, end backs off by one
        let sequence = "AAAAGGTCTCAAAAA";
        let detector = RemoveSequence::bsa_i();
        let suggestions = collect(&detector, sequence);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].start, 1);
        assert_eq!(suggestions[0].end, 2);
    }

    #[test]
    fn test_type_iis_label() {
        let sequence = format!("{}GAAGAC{}", "AAA".repeat(2), "AAA".repeat(2));
        let detector = RemoveSequence::type_iis();
        let suggestions = collect(&detector, &sequence);
        assert!(!suggestions.is_empty());
        assert!(suggestions
            .iter()
            .all(|s| s.suggestion_type == "TypeIIS removal"));
    }

    #[test]
    fn test_remove_repeat_flags_second_occurrence() {
        // the 6-mer AAATTT occurs at 0 and at 12
        let sequence = "AAATTTGGGCCCAAATTT";
        let detector = RemoveRepeat::new(6);
        let suggestions = collect(&detector, sequence);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].start, 4);
        assert_eq!(suggestions[0].end, 6);
        assert_eq!(suggestions[0].suggestion_type, "Remove repeat");
    }

    #[test]
    fn test_remove_repeat_ignores_unique_sequences() {
        let detector = RemoveRepeat::new(6);
        assert!(collect(&detector, "AAATTTGGGCCCATATAT").is_empty());
        // shorter than one k-mer
        assert!(collect(&detector, "AAA").is_empty());
    }

    #[test]
    fn test_global_remove_repeat_checks_both_strands() {
        let kmers: HashSet<String> = ["GGTCTC".to_string()].into_iter().collect();
        let detector = GlobalRemoveRepeat::new(6, kmers);

        let forward = collect(&detector, "AAAGGTCTCAAA");
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].start, 1);

        // reverse complement of GGTCTC
        let reverse = collect(&detector, "AAAGAGACCAAA");
        assert_eq!(reverse.len(), 1);
    }

    #[test]
    fn test_gc_content_fixer_directions() {
        let detector = GcContentFixer::new(0.55, 0.30);

        let high = collect(&detector, &"GGC".repeat(10));
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].bias, GcBias::At);
        assert_eq!(high[0].suggestion_type, "GcContent too high");
        // gc = 1.0, upper = 0.55, len = 30: floor(0.45 * 30) changes
        assert_eq!(high[0].quantity_fixes, 13);

        let low = collect(&detector, &"AAT".repeat(10));
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].bias, GcBias::Gc);
        assert_eq!(low[0].suggestion_type, "GcContent too low");

        let fine = collect(&detector, &"GAT".repeat(10));
        assert!(fine.is_empty());
    }

    #[test]
    fn test_remove_hairpin_flags_foldback() {
        // AAGGGGGG ... CCCCCC: the stem's reverse complement sits in the window
        let sequence = "AAGGGGGGAAAAAAAAAACCCCCCAA";
        let detector = RemoveHairpin::new(6, 24);
        let suggestions = collect(&detector, sequence);
        assert!(!suggestions.is_empty());
        assert_eq!(
            suggestions[0].suggestion_type,
            "Remove nearby reverse complement, possible hairpin"
        );
    }

    #[test]
    fn test_remove_hairpin_ignores_unstructured_sequence() {
        let detector = RemoveHairpin::new(6, 18);
        assert!(collect(&detector, &"AGT".repeat(12)).is_empty());
    }

    struct CannedPredictor {
        structure: String,
    }

    impl StructurePredictor for CannedPredictor {
        fn fold(&self, _rna: &str) -> Result<(String, f64), SynfixError> {
            Ok((self.structure.clone(), -1.0))
        }
    }

    struct FailingPredictor;

    impl StructurePredictor for FailingPredictor {
        fn fold(&self, _rna: &str) -> Result<(String, f64), SynfixError> {
            Err(SynfixError::EmptyInput)
        }
    }

    #[test]
    fn test_remove_secondary_structure_flags_hairpins() {
        // prefix folds into a single hairpin closed by (0, 11)
        let detector = RemoveSecondaryStructure::new(
            12,
            CannedPredictor {
                structure: "((((....))))".to_string(),
            },
        );
        let suggestions = collect(&detector, "GGGGAAAACCCCAAAAAA");
        assert_eq!(suggestions.len(), 1);
        // hairpin closed by (3, 8) covers codons 1..=2
        assert_eq!(suggestions[0].start, 1);
        assert_eq!(suggestions[0].end, 2);
        assert_eq!(suggestions[0].suggestion_type, "Remove secondary structure");
    }

    #[test]
    fn test_remove_secondary_structure_swallows_predictor_errors() {
        let detector = RemoveSecondaryStructure::new(12, FailingPredictor);
        assert!(collect(&detector, "GGGGAAAACCCCAAAAAA").is_empty());
    }

    #[test]
    fn test_detectors_are_deterministic() {
        let sequence = format!("{}GGTCTC{}AAATTTAAATTT", "ATG", "GGC".repeat(8));
        let detectors: Vec<Box<dyn Detector>> = vec![
            Box::new(RemoveSequence::bsa_i()),
            Box::new(RemoveRepeat::new(6)),
            Box::new(GcContentFixer::new(0.4, 0.1)),
        ];
        for detector in &detectors {
            let mut first = collect(detector.as_ref(), &sequence);
            let mut second = collect(detector.as_ref(), &sequence);
            let key = |s: &DnaSuggestion| (s.start, s.end, s.suggestion_type.clone());
            first.sort_by_key(key);
            second.sort_by_key(key);
            assert_eq!(first, second);
        }
    }
}
