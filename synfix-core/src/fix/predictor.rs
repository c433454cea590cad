//! Interface to an external secondary structure predictor.

use crate::types::SynfixError;

/// A folding engine that proposes a secondary structure for an RNA sequence.
///
/// The fixer only consumes the contract `(rna) → (dot-bracket, score)`; the
/// beam-search predictors that fulfill it live outside this crate. The
/// returned annotation must have the same length as the input sequence.
pub trait StructurePredictor: Send + Sync {
    /// Fold `rna` and return its dot-bracket annotation and the predictor's
    /// score for it.
    ///
    /// # Errors
    ///
    /// Implementations report their own failures; the
    /// [`RemoveSecondaryStructure`](crate::fix::detectors::RemoveSecondaryStructure)
    /// detector treats any error as "no structure found".
    fn fold(&self, rna: &str) -> Result<(String, f64), SynfixError>;
}

impl<P: StructurePredictor + ?Sized> StructurePredictor for Box<P> {
    fn fold(&self, rna: &str) -> Result<(String, f64), SynfixError> {
        (**self).fold(rna)
    }
}
