#![allow(dead_code)]

use synfix_core::codon::{AminoAcid, Codon, CodonTable};
use synfix_core::config::FixerConfig;
use synfix_core::CdsFixer;

/// A small but permissive codon table: every amino acid used by the test
/// sequences has at least one synonym, covering both G+C directions.
pub fn permissive_codon_table() -> CodonTable {
    CodonTable::new(vec![
        AminoAcid::new(
            'G',
            vec![
                Codon::new("GGC", 1),
                Codon::new("GGA", 2),
                Codon::new("GGT", 3),
            ],
        ),
        AminoAcid::new('L', vec![Codon::new("CTC", 1), Codon::new("CTT", 3)]),
        AminoAcid::new('K', vec![Codon::new("AAA", 1), Codon::new("AAG", 2)]),
        AminoAcid::new('M', vec![Codon::new("ATG", 1)]),
        AminoAcid::new('S', vec![Codon::new("TCT", 1), Codon::new("AGC", 2)]),
    ])
}

/// A fixer that keeps test output clean.
pub fn quiet_fixer() -> CdsFixer {
    CdsFixer::new(FixerConfig {
        quiet: true,
        ..FixerConfig::default()
    })
}

/// GC fraction of a sequence, for assertions.
pub fn gc_fraction(sequence: &str) -> f64 {
    synfix_core::sequence::gc_fraction(sequence)
}
