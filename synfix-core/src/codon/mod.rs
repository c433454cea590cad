//! Codon table data model.
//!
//! Tables are supplied data: for every amino acid letter, the DNA triplets
//! that encode it together with a weight used to order substitution
//! candidates. The fixer only ever swaps codons within one amino acid's
//! list, so the translated protein is invariant under every fix.

use serde::{Deserialize, Serialize};

use crate::constants::CODON_LENGTH;
use crate::types::SynfixError;

/// A DNA triplet and its weight within its amino acid's codon list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codon {
    /// DNA triplet over `{A, C, G, T}`
    pub triplet: String,
    /// Relative weight; lower-weighted codons are replaced first
    pub weight: i32,
}

impl Codon {
    #[must_use]
    pub fn new(triplet: &str, weight: i32) -> Self {
        Self {
            triplet: triplet.to_string(),
            weight,
        }
    }
}

/// An amino acid letter and the codons encoding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AminoAcid {
    /// Single-letter amino acid code
    pub letter: char,
    /// Synonymous codons for this amino acid
    pub codons: Vec<Codon>,
}

impl AminoAcid {
    #[must_use]
    pub fn new(letter: char, codons: Vec<Codon>) -> Self {
        Self { letter, codons }
    }
}

/// A complete codon table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodonTable {
    pub amino_acids: Vec<AminoAcid>,
}

impl CodonTable {
    #[must_use]
    pub fn new(amino_acids: Vec<AminoAcid>) -> Self {
        Self { amino_acids }
    }

    /// Amino acid letter encoded by `triplet`, if the table knows it.
    #[must_use]
    pub fn amino_acid_of(&self, triplet: &str) -> Option<char> {
        self.amino_acids.iter().find_map(|amino_acid| {
            amino_acid
                .codons
                .iter()
                .any(|codon| codon.triplet == triplet)
                .then_some(amino_acid.letter)
        })
    }

    /// Weight of `triplet`, if the table knows it.
    #[must_use]
    pub fn weight_of(&self, triplet: &str) -> Option<i32> {
        self.amino_acids.iter().find_map(|amino_acid| {
            amino_acid
                .codons
                .iter()
                .find(|codon| codon.triplet == triplet)
                .map(|codon| codon.weight)
        })
    }

    /// Translate a CDS into its protein, one letter per codon.
    ///
    /// Codons the table does not know translate to `X`.
    ///
    /// # Errors
    ///
    /// Returns [`SynfixError::NotCompleteCds`] when the input length is not a
    /// multiple of three.
    pub fn translate(&self, cds: &str) -> Result<String, SynfixError> {
        if cds.len() % CODON_LENGTH != 0 {
            return Err(SynfixError::NotCompleteCds(cds.len()));
        }

        let mut protein = String::with_capacity(cds.len() / CODON_LENGTH);
        for chunk in cds.as_bytes().chunks(CODON_LENGTH) {
            let triplet = String::from_utf8_lossy(chunk);
            protein.push(self.amino_acid_of(&triplet).unwrap_or('X'));
        }
        Ok(protein)
    }
}
