//! # Synfix - CDS fixing and free energy evaluation
//!
//! Core library for preparing protein-coding DNA for synthesis and for
//! scoring folded RNA secondary structures under the Turner nearest-neighbor
//! model.
//!
//! ## Overview
//!
//! Coding sequences are flexible: a protein can be encoded by many
//! synonymous codon choices. The fixer exploits that freedom to remove
//! problematic subsequences (restriction sites, repeats, fold-back stems,
//! out-of-band GC content) before a gene is sent for synthesis, without ever
//! changing the translated protein. The free energy evaluator is the
//! thermodynamic half of that workflow: given a sequence and a dot-bracket
//! annotation it reports how stable the folding is, loop by loop.
//!
//! ## Quick Start
//!
//! ### Score a folded structure
//!
//! ```rust
//! use synfix_core::constants::DEFAULT_TEMPERATURE;
//! use synfix_core::mfe::evaluate;
//!
//! let result = evaluate("GGGGAAAACCCC", "((((....))))", DEFAULT_TEMPERATURE)?;
//! println!("{} kcal/mol over {} loops", result.energy, result.contributions.len());
//! # Ok::<(), synfix_core::types::SynfixError>(())
//! ```
//!
//! ### Remove a restriction site from a CDS
//!
//! ```rust,no_run
//! use synfix_core::codon::CodonTable;
//! use synfix_core::fix::detectors::{Detector, RemoveSequence};
//! use synfix_core::fix::fix_cds;
//!
//! let codon_table = CodonTable::default(); // supplied by the caller
//! let detectors: Vec<Box<dyn Detector>> = vec![Box::new(RemoveSequence::bsa_i())];
//!
//! let report = fix_cds("ATGGGTCTCAAA", &codon_table, &detectors)?;
//! println!("{} changes", report.changes.len());
//! # Ok::<(), synfix_core::types::SynfixError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: Configuration options for the fixer
//! - [`types`]: Core data types, suggestion/change records and errors
//! - [`sequence`]: Alphabet validation, encoding and the pair table
//! - [`energy`]: Turner energy parameters and temperature scaling
//! - [`mfe`]: Loop decomposition and free energy evaluation
//! - [`codon`]: Codon table data model
//! - [`fix`]: Constraint detectors and the repair engine
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, SynfixError>`](types::SynfixError).
//! Errors surface to the caller; there are no retries and no partial
//! evaluation results. The one asymmetry is the fixer's iteration cap:
//! running out of rounds after applying at least one change still returns
//! the best-so-far sequence.

pub mod codon;
pub mod config;
pub mod constants;
pub mod energy;
pub mod fix;
pub mod mfe;
pub mod sequence;
pub mod types;

pub use config::FixerConfig;
pub use fix::{fix_cds, fix_cds_simple, CdsFixer, FixReport};
pub use mfe::{evaluate, MfeEvaluation};
pub use types::SynfixError;
