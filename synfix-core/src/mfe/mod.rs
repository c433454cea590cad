//! Free energy evaluation of annotated RNA secondary structures.
//!
//! Given a sequence and its dot-bracket annotation, [`evaluate`] decomposes
//! the structure into the loops of the Turner nearest-neighbor model and
//! sums their contributions at the requested temperature. It scores a given
//! folding; it does not predict one.

use serde::{Deserialize, Serialize};

use crate::energy::EnergyParams;
use crate::sequence::{encode_sequence, validate_rna, validate_structure, PairTable};
use crate::types::{EnergyContribution, SynfixError};

mod decompose;
mod kernels;

use self::decompose::{evaluate_structure, FoldContext};

/// Result of one free energy evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfeEvaluation {
    /// Total free energy of the structure in kcal/mol
    pub energy: f64,
    /// Per-loop contributions in dcal/mol; they sum to `energy * 100`
    pub contributions: Vec<EnergyContribution>,
}

/// Free energy of the folded RNA `sequence` annotated by `structure`, at
/// `temperature` degrees Celsius.
///
/// Returns the energy in kcal/mol together with the contribution of every
/// loop, which allows in-depth examination of where the stability comes
/// from. Lowercase sequence input is accepted and upper-cased before
/// validation.
///
/// # Errors
///
/// - [`SynfixError::LengthMismatch`] when sequence and structure differ in
///   length
/// - [`SynfixError::EmptyInput`] on zero-length input
/// - [`SynfixError::InvalidAlphabet`] on characters outside `ACGU` / `().`
/// - [`SynfixError::MalformedStructure`] on unbalanced brackets
/// - [`SynfixError::InvalidPair`] when the annotation pairs two bases the
///   energy model cannot pair
///
/// # Examples
///
/// ```rust
/// use synfix_core::constants::DEFAULT_TEMPERATURE;
/// use synfix_core::mfe::evaluate;
///
/// let result = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE)?;
/// let total: i32 = result.contributions.iter().map(|c| c.energy).sum();
/// assert!((result.energy - f64::from(total) / 100.0).abs() < 1e-9);
/// # Ok::<(), synfix_core::types::SynfixError>(())
/// ```
pub fn evaluate(
    sequence: &str,
    structure: &str,
    temperature: f64,
) -> Result<MfeEvaluation, SynfixError> {
    if sequence.len() != structure.len() {
        return Err(SynfixError::LengthMismatch {
            sequence: sequence.len(),
            structure: structure.len(),
        });
    }
    if structure.is_empty() {
        return Err(SynfixError::EmptyInput);
    }

    let sequence = sequence.to_uppercase();
    validate_rna(&sequence)?;
    validate_structure(structure)?;

    let context = FoldContext {
        encoded: encode_sequence(&sequence),
        pair_table: PairTable::from_dot_bracket(structure)?,
        params: EnergyParams::scaled(temperature),
        sequence: &sequence,
    };

    let (energy, contributions) = evaluate_structure(&context)?;
    Ok(MfeEvaluation {
        energy: f64::from(energy) / 100.0,
        contributions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_TEMPERATURE;

    #[test]
    fn test_length_mismatch() {
        let result = evaluate("ACGU", "(..)..", DEFAULT_TEMPERATURE);
        assert!(matches!(
            result,
            Err(SynfixError::LengthMismatch {
                sequence: 4,
                structure: 6
            })
        ));
    }

    #[test]
    fn test_empty_input() {
        let result = evaluate("", "", DEFAULT_TEMPERATURE);
        assert!(matches!(result, Err(SynfixError::EmptyInput)));
    }

    #[test]
    fn test_invalid_alphabet() {
        // DNA input is not accepted
        let result = evaluate("GGTTACCC", "((....))", DEFAULT_TEMPERATURE);
        assert!(matches!(result, Err(SynfixError::InvalidAlphabet(_))));

        let result = evaluate("GGAUACCC", "((.xx.))", DEFAULT_TEMPERATURE);
        assert!(matches!(result, Err(SynfixError::InvalidAlphabet(_))));
    }

    #[test]
    fn test_malformed_structure() {
        let result = evaluate("GGAUACCC", "((....])", DEFAULT_TEMPERATURE);
        assert!(matches!(result, Err(SynfixError::InvalidAlphabet(_))));

        let result = evaluate("GGAUACCC", "((.....)", DEFAULT_TEMPERATURE);
        assert!(matches!(result, Err(SynfixError::MalformedStructure(_))));
    }

    #[test]
    fn test_lowercase_sequence_is_accepted() {
        let upper = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE).unwrap();
        let lower = evaluate("ggggaaaacccc", "((((....))))", DEFAULT_TEMPERATURE).unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_energy_is_sum_of_contributions() {
        for (sequence, structure) in [
            ("UGAGUUCUCGAUCUCUAAAAUCG", "......................."),
            ("GGGGAAAACCCC", "((((....))))"),
            ("GGAAAGAAAAUCAAAGAAAAUCAAACC", "((...((...))...((...))...))"),
            (
                "UCGGCCACAAACACACAAUCUACUGUUGGUCGA",
                "(((((((...................)))))))",
            ),
        ] {
            let result = evaluate(sequence, structure, DEFAULT_TEMPERATURE).unwrap();
            let total: i32 = result.contributions.iter().map(|c| c.energy).sum();
            assert!(
                (result.energy - f64::from(total) / 100.0).abs() < 1e-9,
                "contributions do not sum to the total for {structure}"
            );
        }
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let first = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE).unwrap();
        let second = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_temperature_changes_the_result() {
        let body = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE).unwrap();
        let cold = evaluate("GGGGAAAACCCC", "((((....))))", 10.0).unwrap();
        assert_ne!(body.energy, cold.energy);
        // stacking is enthalpy-driven: the helix is more stable in the cold
        assert!(cold.energy < body.energy);
    }
}
