use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CODON_LENGTH, MAX_LEN_LOOP, NB_BASES, NB_PAIRS};

/// Free energies indexed by two encoded base pair types \[outer\]\[inner\].
///
/// Row and column 0 correspond to the invalid pair code and are never
/// consulted by the kernels.
pub type PairEnergies = [[i32; NB_PAIRS + 1]; NB_PAIRS + 1];

/// Free energies of a loop as a function of its size (number of unpaired
/// nucleotides), tabulated up to [`MAX_LEN_LOOP`].
pub type LoopSizeEnergies = [i32; MAX_LEN_LOOP + 1];

/// Terminal mismatch energies \[pair\]\[five_prime\]\[three_prime\].
///
/// Indexed by the encoded closing pair and the two encoded unpaired bases
/// adjacent to it.
pub type MismatchEnergies = [[[i32; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];

/// Dangling end energies \[pair\]\[base\] for a single unpaired base next to a
/// helix end.
pub type DangleEnergies = [[i32; NB_BASES + 1]; NB_PAIRS + 1];

/// 1x1 interior loop energies \[closing\]\[enclosed\]\[mm5\]\[mm3\].
pub type Interior1x1Energies =
    [[[[i32; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1]; NB_PAIRS + 1];

/// 2x1 interior loop energies \[closing\]\[enclosed\]\[mm\]\[mm\]\[mm\].
///
/// Always indexed with the larger loop side first.
pub type Interior2x1Energies =
    [[[[[i32; NB_BASES + 1]; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1]; NB_PAIRS + 1];

/// 2x2 interior loop energies \[closing\]\[enclosed\]\[mm\]\[mm\]\[mm\]\[mm\].
pub type Interior2x2Energies = [[[[[[i32; NB_BASES + 1]; NB_BASES + 1]; NB_BASES + 1];
    NB_BASES + 1]; NB_PAIRS + 1]; NB_PAIRS + 1];

/// The nearest-neighbor loop classes distinguished by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopKind {
    /// The single loop containing the 5' and 3' ends of the molecule
    Exterior,
    /// A loop closed by two base pairs: stacking pair, bulge or interior loop
    Interior,
    /// A loop closed by a single base pair
    Hairpin,
    /// A loop from which three or more helices branch off
    Multi,
}

impl fmt::Display for LoopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exterior => write!(f, "exterior loop"),
            Self::Interior => write!(f, "interior loop"),
            Self::Hairpin => write!(f, "hairpin loop"),
            Self::Multi => write!(f, "multi-loop"),
        }
    }
}

/// A base pair identified by the sequence indices of its two nucleotides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePairIdx {
    /// Index of the 5' nucleotide of the pair
    pub five_prime: usize,
    /// Index of the 3' nucleotide of the pair
    pub three_prime: usize,
}

impl BasePairIdx {
    #[must_use]
    pub const fn new(five_prime: usize, three_prime: usize) -> Self {
        Self {
            five_prime,
            three_prime,
        }
    }
}

/// The free energy contribution of a single loop of a secondary structure.
///
/// Every contribution carries a kind and an energy. All kinds except
/// [`LoopKind::Exterior`] carry the closing base pair; only
/// [`LoopKind::Interior`] carries the enclosed base pair as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyContribution {
    /// The loop class this contribution belongs to
    pub kind: LoopKind,
    /// The base pair closing the loop (absent for the exterior loop)
    pub closing: Option<BasePairIdx>,
    /// The enclosed base pair delimiting an interior loop
    pub enclosed: Option<BasePairIdx>,
    /// Free energy of the loop in dcal/mol
    pub energy: i32,
}

/// Relative G+C change of a synonymous codon substitution, or the preference
/// a suggestion states about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GcBias {
    /// No preference, or no change in G+C count
    Na,
    /// The substitution raises the G+C count
    Gc,
    /// The substitution lowers the G+C count
    At,
}

impl GcBias {
    /// Classify a substitution by the G+C counts of its two codons.
    #[must_use]
    pub const fn from_gc_counts(from: usize, to: usize) -> Self {
        if from == to {
            Self::Na
        } else if from > to {
            Self::At
        } else {
            Self::Gc
        }
    }
}

impl fmt::Display for GcBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Na => write!(f, "NA"),
            Self::Gc => write!(f, "GC"),
            Self::At => write!(f, "AT"),
        }
    }
}

/// A codon-range directive emitted by a constraint detector: replace some
/// codons in `[start, end]`, prefer the stated bias, make up to
/// `quantity_fixes` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnaSuggestion {
    /// First codon index of the problematic region
    pub start: usize,
    /// Last codon index of the problematic region (inclusive)
    pub end: usize,
    /// G+C preference for the substitutions
    pub bias: GcBias,
    /// Maximum number of codon changes to apply for this suggestion
    pub quantity_fixes: usize,
    /// Label of the constraint that produced the suggestion
    pub suggestion_type: String,
}

impl DnaSuggestion {
    /// Build a suggestion from a nucleotide span `[start, end)`.
    ///
    /// Codon indices are derived by integer division by three. When the span
    /// does not begin on a codon boundary the end backs off by one codon, so
    /// that every reported codon is fully inside the span.
    #[must_use]
    pub fn spanning(
        start: usize,
        end: usize,
        bias: GcBias,
        quantity_fixes: usize,
        suggestion_type: &str,
    ) -> Self {
        let start_codon = start / CODON_LENGTH;
        let end_codon = if start % CODON_LENGTH == 0 {
            end / CODON_LENGTH
        } else {
            (end / CODON_LENGTH).saturating_sub(1)
        };

        Self {
            start: start_codon,
            end: end_codon,
            bias,
            quantity_fixes,
            suggestion_type: suggestion_type.to_string(),
        }
    }
}

/// One codon substitution applied by the fixer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// Codon index the substitution was applied at
    pub position: usize,
    /// Fixer round that applied the substitution
    pub step: usize,
    /// Codon present before the substitution
    pub from: String,
    /// Codon present after the substitution
    pub to: String,
    /// Suggestion label that motivated the substitution
    pub reason: String,
}

/// Error types that can occur during structure evaluation or CDS fixing
#[derive(Error, Debug)]
pub enum SynfixError {
    /// Sequence and structure annotation differ in length
    #[error("length of sequence ({sequence}) != length of structure ({structure})")]
    LengthMismatch { sequence: usize, structure: usize },
    /// Zero-length sequence or structure
    #[error("lengths of sequence and structure cannot be 0")]
    EmptyInput,
    /// A character outside the accepted alphabet was found
    #[error("invalid characters in {0}")]
    InvalidAlphabet(String),
    /// The dot-bracket annotation has unbalanced brackets
    #[error("unbalanced brackets '()' found while extracting base pairs from {0}")]
    MalformedStructure(String),
    /// The structure pairs two bases that cannot form a base pair
    #[error("bases {five_prime} and {three_prime} cannot pair")]
    InvalidPair { five_prime: usize, three_prime: usize },
    /// Fixer input length is not a multiple of three
    #[error("sequence of length {0} is not a complete CDS: codons must not be interrupted")]
    NotCompleteCds(usize),
    /// The fixer exhausted its iterations without applying a single change
    #[error("could not find a solution to sequence space")]
    Unfixable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gc_bias_classification() {
        assert_eq!(GcBias::from_gc_counts(2, 2), GcBias::Na);
        assert_eq!(GcBias::from_gc_counts(3, 1), GcBias::At);
        assert_eq!(GcBias::from_gc_counts(0, 2), GcBias::Gc);
    }

    #[test]
    fn test_suggestion_spanning_aligned() {
        let suggestion = DnaSuggestion::spanning(30, 36, GcBias::Na, 1, "BsaI removal");
        assert_eq!(suggestion.start, 10);
        assert_eq!(suggestion.end, 12);
        assert_eq!(suggestion.suggestion_type, "BsaI removal");
    }

    #[test]
    fn test_suggestion_spanning_backs_off_when_unaligned() {
        // span starts mid-codon, so the last partially covered codon is dropped
        let suggestion = DnaSuggestion::spanning(31, 37, GcBias::Na, 1, "Remove sequence");
        assert_eq!(suggestion.start, 10);
        assert_eq!(suggestion.end, 11);
    }

    #[test]
    fn test_loop_kind_display() {
        assert_eq!(LoopKind::Exterior.to_string(), "exterior loop");
        assert_eq!(LoopKind::Multi.to_string(), "multi-loop");
    }

    #[test]
    fn test_error_messages() {
        let err = SynfixError::LengthMismatch {
            sequence: 5,
            structure: 4,
        };
        assert!(err.to_string().contains("5"));
        assert!(err.to_string().contains("4"));

        let err = SynfixError::InvalidPair {
            five_prime: 2,
            three_prime: 9,
        };
        assert!(err.to_string().contains("cannot pair"));
    }
}
