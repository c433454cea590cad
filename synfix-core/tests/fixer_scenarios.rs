mod common;

use crate::common::{gc_fraction, permissive_codon_table, quiet_fixer};
use synfix_core::fix::detectors::{Detector, GcContentFixer, RemoveRepeat, RemoveSequence};
use synfix_core::sequence::reverse_complement;
use synfix_core::SynfixError;

/// A CDS with exactly one BsaI site (GGTCTC) at nucleotide offset 30.
fn cds_with_bsa_i_site() -> String {
    format!("{}GGTCTC{}", "AAA".repeat(10), "AAA".repeat(9))
}

#[test]
fn bsa_i_site_is_removed_from_both_strands() {
    let table = permissive_codon_table();
    let sequence = cds_with_bsa_i_site();
    let detectors: Vec<Box<dyn Detector>> = vec![Box::new(RemoveSequence::bsa_i())];

    let report = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();

    assert!(!report.sequence.contains("GGTCTC"));
    assert!(!reverse_complement(&report.sequence).contains("GGTCTC"));

    // the protein is untouched
    assert_eq!(
        table.translate(&report.sequence).unwrap(),
        table.translate(&sequence).unwrap()
    );

    // at least one change lies within the site's codon range, labeled by
    // the detector
    assert!(report
        .changes
        .iter()
        .any(|change| (10..=12).contains(&change.position) && change.reason == "BsaI removal"));
}

#[test]
fn type_iis_detector_uses_its_own_label() {
    let table = permissive_codon_table();
    let sequence = cds_with_bsa_i_site();
    let detectors: Vec<Box<dyn Detector>> = vec![Box::new(RemoveSequence::type_iis())];

    let report = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();

    assert!(!report.sequence.contains("GGTCTC"));
    assert!(report
        .changes
        .iter()
        .all(|change| change.reason == "TypeIIS removal"));
}

#[test]
fn high_gc_content_is_pushed_down() {
    let table = permissive_codon_table();
    // 70% GC: seven GGC codons, three AAA codons
    let sequence = format!("{}{}", "GGC".repeat(7), "AAA".repeat(3));
    assert!((gc_fraction(&sequence) - 0.70).abs() < 1e-9);

    let detectors: Vec<Box<dyn Detector>> = vec![Box::new(GcContentFixer::new(0.55, 0.30))];
    let report = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();

    // the per-round change count is floored, so the run may legitimately
    // end at the iteration cap just above the bound; what must hold is that
    // the GC fraction went down through labeled substitutions
    assert!(gc_fraction(&report.sequence) < gc_fraction(&sequence));
    assert!(!report.changes.is_empty());
    assert!(report
        .changes
        .iter()
        .all(|change| change.reason == "GcContent too high"));

    // every substitution stayed synonymous
    assert_eq!(
        table.translate(&report.sequence).unwrap(),
        table.translate(&sequence).unwrap()
    );
}

#[test]
fn fixer_output_is_deterministic() {
    let table = permissive_codon_table();
    let sequence = format!("{}GGTCTC{}", "GGC".repeat(6), "AAA".repeat(7));
    let detectors: Vec<Box<dyn Detector>> = vec![
        Box::new(RemoveSequence::bsa_i()),
        Box::new(GcContentFixer::new(0.55, 0.30)),
        Box::new(RemoveRepeat::new(12)),
    ];

    let first = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();
    let second = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();
    assert_eq!(first, second);
}

#[test]
fn repeats_are_broken_up() {
    let table = permissive_codon_table();
    // the 12-mer GGCGGCGGCGGC repeats through the run of GGC codons
    let sequence = format!("{}{}", "GGC".repeat(8), "AAA".repeat(4));
    let detectors: Vec<Box<dyn Detector>> = vec![Box::new(RemoveRepeat::new(12))];

    let report = quiet_fixer().fix(&sequence, &table, &detectors).unwrap();

    assert_eq!(
        table.translate(&report.sequence).unwrap(),
        table.translate(&sequence).unwrap()
    );
    assert!(!report.changes.is_empty());
    assert!(report
        .changes
        .iter()
        .all(|change| change.reason == "Remove repeat"));
}

#[test]
fn unfixable_sequences_are_reported() {
    // a table with no synonyms at all cannot apply any fix
    let table = synfix_core::codon::CodonTable::new(vec![synfix_core::codon::AminoAcid::new(
        'K',
        vec![synfix_core::codon::Codon::new("AAA", 1)],
    )]);
    let sequence = "AAAAAAAAAAAA";
    let detectors: Vec<Box<dyn Detector>> =
        vec![Box::new(RemoveSequence::new(vec!["AAAAAAAA".to_string()]))];

    let result = quiet_fixer().fix(sequence, &table, &detectors);
    assert!(matches!(result, Err(SynfixError::Unfixable)));
}

#[test]
fn fix_cds_simple_removes_homopolymers_and_sites() {
    let table = permissive_codon_table();
    // a lysine run forms an A homopolymer; one BsaI site sits behind it
    let sequence = format!("ATG{}GGTCTC{}", "AAA".repeat(4), "TCT".repeat(8));

    let report =
        synfix_core::fix_cds_simple(&sequence, &table, vec!["GGTCTC".to_string()]).unwrap();

    assert!(!report.sequence.contains("AAAAAAAA"));
    assert!(!report.sequence.contains("GGTCTC"));
    assert_eq!(
        table.translate(&report.sequence).unwrap(),
        table.translate(&sequence).unwrap()
    );
}
