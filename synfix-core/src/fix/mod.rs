//! Constraint-driven repair of protein-coding sequences.
//!
//! The fixer runs detector rounds against the current sequence: every round
//! all detectors scan in parallel, their suggestions are normalized and
//! applied as synonymous codon substitutions, and the sequence is spliced
//! back together. Rounds repeat until no detector complains or the iteration
//! cap is reached. Codons only ever change within their amino acid's codon
//! list, so the translated protein is preserved.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use crate::codon::CodonTable;
use crate::config::FixerConfig;
use crate::sequence::validate_dna;
use crate::types::{Change, DnaSuggestion, SynfixError};

pub mod detectors;
pub mod predictor;
mod state;

use self::detectors::{Detector, RemoveRepeat, RemoveSequence, SuggestionSink};
use self::state::CdsState;

/// Result of one fix run: the repaired sequence and the substitutions that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixReport {
    /// The repaired coding sequence
    pub sequence: String,
    /// Every applied substitution, ordered by (step, position)
    pub changes: Vec<Change>,
}

/// The CDS repair engine.
///
/// One instance can fix any number of sequences; all per-run state lives on
/// the stack of [`CdsFixer::fix`] and is released on return.
#[derive(Debug, Default)]
pub struct CdsFixer {
    /// Configuration options for the repair loop
    pub config: FixerConfig,
}

impl CdsFixer {
    #[must_use]
    pub const fn new(config: FixerConfig) -> Self {
        Self { config }
    }

    /// Repair `sequence` against the given detectors.
    ///
    /// Returns the repaired sequence and its change log. Reaching the
    /// iteration cap is still a success when at least one substitution was
    /// applied; the best-so-far sequence is returned.
    ///
    /// # Errors
    ///
    /// - [`SynfixError::InvalidAlphabet`] on characters outside `ACGT`
    /// - [`SynfixError::NotCompleteCds`] when the length is not a multiple
    ///   of three
    /// - [`SynfixError::Unfixable`] when the iteration cap is reached
    ///   without a single applied change
    pub fn fix(
        &self,
        sequence: &str,
        codon_table: &CodonTable,
        detectors: &[Box<dyn Detector>],
    ) -> Result<FixReport, SynfixError> {
        let mut sequence = sequence.to_uppercase();
        validate_dna(&sequence)?;

        let mut state = CdsState::initialize(&sequence, codon_table)?;

        // Sequences are usually solved within one to three rounds; the cap
        // only keeps pathological inputs from cycling forever.
        for step in 1..self.config.fix_iterations {
            let mut suggestions = find_problems(&sequence, detectors);
            if suggestions.is_empty() {
                return Ok(FixReport {
                    sequence,
                    changes: state.changes(),
                });
            }

            // detector outputs are set-equivalent but unordered; normalize
            // so that the applied fixes do not depend on scheduling
            suggestions.sort_by(|a, b| {
                (a.start, a.end, &a.suggestion_type).cmp(&(b.start, b.end, &b.suggestion_type))
            });

            if !self.config.quiet {
                eprintln!("fix round {step}: {} suggestions", suggestions.len());
            }

            for suggestion in suggestions {
                let fix_id = state.record_fix(step, suggestion);
                state.apply_fix(fix_id);
            }

            sequence = state.current_sequence();
        }

        let changes = state.changes();
        if changes.is_empty() {
            return Err(SynfixError::Unfixable);
        }
        Ok(FixReport { sequence, changes })
    }
}

/// Run every detector over `sequence` concurrently and collect their
/// suggestions.
///
/// Each detector gets its own task and sends its finished batch as one
/// message into a channel bounded by the detector count, so no task can
/// block on a full buffer; the end of the scope is the barrier after which
/// the channel is drained.
pub(crate) fn find_problems(
    sequence: &str,
    detectors: &[Box<dyn Detector>],
) -> Vec<DnaSuggestion> {
    let (sender, receiver) = mpsc::sync_channel(detectors.len().max(1));

    rayon::scope(|scope| {
        for detector in detectors {
            let sender = sender.clone();
            scope.spawn(move |_| {
                let sink = SuggestionSink::new();
                detector.scan(sequence, &sink);
                let _ = sender.send(sink.into_suggestions());
            });
        }
    });
    drop(sender);

    receiver.try_iter().flatten().collect()
}

/// Repair a CDS with the default configuration.
///
/// See [`CdsFixer::fix`] for the semantics and error cases.
///
/// # Errors
///
/// Propagates the errors of [`CdsFixer::fix`].
pub fn fix_cds(
    sequence: &str,
    codon_table: &CodonTable,
    detectors: &[Box<dyn Detector>],
) -> Result<FixReport, SynfixError> {
    CdsFixer::new(FixerConfig::default()).fix(sequence, codon_table, detectors)
}

/// Repair a CDS with a default detector set: homopolymer removal, the given
/// forbidden sites (e.g. restriction enzyme cut sites) and an 18-mer repeat
/// scan.
///
/// # Errors
///
/// Propagates the errors of [`CdsFixer::fix`].
pub fn fix_cds_simple(
    sequence: &str,
    codon_table: &CodonTable,
    sequences_to_remove: Vec<String>,
) -> Result<FixReport, SynfixError> {
    let detectors: Vec<Box<dyn Detector>> = vec![
        Box::new(RemoveSequence::new(vec![
            "AAAAAAAA".to_string(),
            "GGGGGGGG".to_string(),
        ])),
        Box::new(RemoveSequence::new(sequences_to_remove)),
        Box::new(RemoveRepeat::new(18)),
    ];
    fix_cds(sequence, codon_table, &detectors)
}
