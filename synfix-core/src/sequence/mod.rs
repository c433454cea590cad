//! Sequence validation, encoding and small nucleotide utilities.
//!
//! RNA sequences are encoded to small integers (A=1, C=2, G=3, U=4) and base
//! pairs to the codes the energy tables are indexed by (CG=1, GC=2, GU=3,
//! UG=4, AU=5, UA=6, non-standard=7, 0 = no pair). The encoding carries no
//! meaning of its own; it only locates the relevant entries in the parameter
//! matrices, so any change here must be reflected in [`crate::energy`].

use bio::alphabets::dna;
use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::NB_BASES;
use crate::types::SynfixError;

pub mod pair_table;

pub use pair_table::PairTable;

lazy_static! {
    static ref RNA_ALPHABET: Regex = Regex::new("^[ACGU]+$").expect("static pattern");
    static ref DNA_ALPHABET: Regex = Regex::new("^[ACGT]+$").expect("static pattern");
    static ref DOT_BRACKET_ALPHABET: Regex = Regex::new(r"^[().]+$").expect("static pattern");
}

/// Encoded base pair types, indexed by the encoded (5', 3') nucleotides.
///
/// Unlisted ordered pairs map to 0, the invalid pair code.
const BASE_PAIR_CODE: [[u8; NB_BASES + 1]; NB_BASES + 1] = [
    //    _  A  C  G  U
    /* _ */ [0, 0, 0, 0, 0],
    /* A */ [0, 0, 0, 0, 5],
    /* C */ [0, 0, 0, 1, 0],
    /* G */ [0, 0, 2, 0, 3],
    /* U */ [0, 6, 0, 4, 0],
];

/// Check that `sequence` contains only uppercase A, C, G and U.
///
/// # Errors
///
/// Returns [`SynfixError::InvalidAlphabet`] otherwise.
pub fn validate_rna(sequence: &str) -> Result<(), SynfixError> {
    if RNA_ALPHABET.is_match(sequence) {
        Ok(())
    } else {
        Err(SynfixError::InvalidAlphabet(
            "RNA sequence: only A, C, G and U allowed".to_string(),
        ))
    }
}

/// Check that `sequence` contains only uppercase A, C, G and T.
///
/// # Errors
///
/// Returns [`SynfixError::InvalidAlphabet`] otherwise.
pub fn validate_dna(sequence: &str) -> Result<(), SynfixError> {
    if DNA_ALPHABET.is_match(sequence) {
        Ok(())
    } else {
        Err(SynfixError::InvalidAlphabet(
            "DNA sequence: only A, C, G and T allowed".to_string(),
        ))
    }
}

/// Check that `structure` is made of dot-bracket characters only.
///
/// # Errors
///
/// Returns [`SynfixError::InvalidAlphabet`] otherwise.
pub fn validate_structure(structure: &str) -> Result<(), SynfixError> {
    if DOT_BRACKET_ALPHABET.is_match(structure) {
        Ok(())
    } else {
        Err(SynfixError::InvalidAlphabet(
            "structure: only dot-bracket notation allowed".to_string(),
        ))
    }
}

/// Numerical code of a single nucleotide (A=1, C=2, G=3, U=4, 0 otherwise).
#[must_use]
pub const fn encode_nucleotide(nucleotide: u8) -> u8 {
    match nucleotide {
        b'A' => 1,
        b'C' => 2,
        b'G' => 3,
        b'U' => 4,
        _ => 0,
    }
}

/// Encode a validated RNA sequence into its numerical representation.
#[must_use]
pub fn encode_sequence(sequence: &str) -> Vec<u8> {
    sequence.bytes().map(encode_nucleotide).collect()
}

/// Encoded type of the ordered base pair (`five_prime`, `three_prime`).
///
/// Both arguments are encoded nucleotides; the result is 0 for any pairing
/// the energy model does not recognize.
#[must_use]
pub const fn base_pair_code(five_prime: u8, three_prime: u8) -> u8 {
    if five_prime as usize > NB_BASES || three_prime as usize > NB_BASES {
        return 0;
    }
    BASE_PAIR_CODE[five_prime as usize][three_prime as usize]
}

/// Whether an encoded pair type gets the terminal non-GC penalty.
///
/// Pair codes above 2 are GU, UG, AU, UA or non-standard.
#[must_use]
pub const fn pays_terminal_au(pair_code: u8) -> bool {
    pair_code > 2
}

/// Transcribe a coding-strand DNA sequence to RNA (T becomes U).
#[must_use]
pub fn transcribe(sequence: &str) -> String {
    sequence
        .chars()
        .map(|c| match c.to_ascii_uppercase() {
            'T' => 'U',
            other => other,
        })
        .collect()
}

/// Reverse complement of a DNA sequence.
#[must_use]
pub fn reverse_complement(sequence: &str) -> String {
    let complemented = dna::revcomp(sequence.as_bytes());
    // revcomp maps ASCII nucleotides to ASCII nucleotides
    String::from_utf8(complemented).unwrap_or_default()
}

/// Fraction of G and C nucleotides in `sequence`, in `[0, 1]`.
#[must_use]
pub fn gc_fraction(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let gc = sequence
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    gc as f64 / sequence.len() as f64
}

/// G+C count of a codon triplet.
#[must_use]
pub fn gc_count(triplet: &str) -> usize {
    triplet
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count()
}
