//! Relational view of a coding sequence under repair.
//!
//! The state mirrors the tables an embedded database would hold: per-position
//! codon history (the current codon is the entry with the highest step), the
//! weight of each position's original codon, the synonymous substitution map
//! labeled with G+C biases, and the log of suggested fixes. It is owned by
//! exactly one fixer run and mutated only between detector rounds, so no
//! locking is involved.

use std::collections::HashMap;

use crate::codon::CodonTable;
use crate::constants::CODON_LENGTH;
use crate::sequence::gc_count;
use crate::types::{Change, DnaSuggestion, GcBias, SynfixError};

/// One codon assignment in a position's history.
#[derive(Debug, Clone)]
struct HistoryEntry {
    codon: String,
    step: usize,
    /// Index into the fix log for entries applied by a suggestion
    fix: Option<usize>,
}

/// A recorded suggestion, labeled with the round it arrived in.
#[derive(Debug, Clone)]
struct SuggestedFix {
    step: usize,
    start: usize,
    end: usize,
    bias: GcBias,
    quantity_fixes: usize,
    suggestion_type: String,
}

/// A synonymous substitution target and its G+C direction.
#[derive(Debug, Clone)]
struct Substitution {
    to: String,
    bias: GcBias,
}

/// The fixer's working state for one CDS.
pub(crate) struct CdsState {
    /// Codon history per position; the last entry is the current codon
    histories: Vec<Vec<HistoryEntry>>,
    /// Weight of each position's original codon
    weights: Vec<i32>,
    /// Synonymous targets per source codon, in codon table order
    substitutions: HashMap<String, Vec<Substitution>>,
    /// Every suggestion the detectors produced, in application order
    fixes: Vec<SuggestedFix>,
}

impl CdsState {
    /// Populate the state from a CDS and its codon table.
    ///
    /// # Errors
    ///
    /// Returns [`SynfixError::NotCompleteCds`] when the sequence length is
    /// not a multiple of three.
    pub fn initialize(sequence: &str, table: &CodonTable) -> Result<Self, SynfixError> {
        if sequence.len() % CODON_LENGTH != 0 {
            return Err(SynfixError::NotCompleteCds(sequence.len()));
        }

        let mut weight_table: HashMap<&str, i32> = HashMap::new();
        let mut substitutions: HashMap<String, Vec<Substitution>> = HashMap::new();
        for amino_acid in &table.amino_acids {
            for codon in &amino_acid.codons {
                weight_table.insert(&codon.triplet, codon.weight);

                let from_gc = gc_count(&codon.triplet);
                let targets = substitutions.entry(codon.triplet.clone()).or_default();
                for to_codon in &amino_acid.codons {
                    if to_codon.triplet == codon.triplet {
                        continue;
                    }
                    targets.push(Substitution {
                        to: to_codon.triplet.clone(),
                        bias: GcBias::from_gc_counts(from_gc, gc_count(&to_codon.triplet)),
                    });
                }
            }
        }

        let mut histories = Vec::with_capacity(sequence.len() / CODON_LENGTH);
        let mut weights = Vec::with_capacity(sequence.len() / CODON_LENGTH);
        for chunk in sequence.as_bytes().chunks(CODON_LENGTH) {
            let codon = String::from_utf8_lossy(chunk).into_owned();
            weights.push(weight_table.get(codon.as_str()).copied().unwrap_or(0));
            histories.push(vec![HistoryEntry {
                codon,
                step: 0,
                fix: None,
            }]);
        }

        Ok(Self {
            histories,
            weights,
            substitutions,
            fixes: Vec::new(),
        })
    }

    /// Number of codon positions.
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    /// The current codon at `position`: the history entry with the highest
    /// step, which is always the last one pushed.
    pub fn current_codon(&self, position: usize) -> &str {
        self.histories[position]
            .last()
            .map(|entry| entry.codon.as_str())
            .unwrap_or_default()
    }

    /// Materialize the current sequence by concatenating the current codons.
    pub fn current_sequence(&self) -> String {
        let mut sequence = String::with_capacity(self.len() * CODON_LENGTH);
        for position in 0..self.len() {
            sequence.push_str(self.current_codon(position));
        }
        sequence
    }

    /// Record a suggestion for round `step` and return its fix id.
    pub fn record_fix(&mut self, step: usize, suggestion: DnaSuggestion) -> usize {
        self.fixes.push(SuggestedFix {
            step,
            start: suggestion.start,
            end: suggestion.end,
            bias: suggestion.bias,
            quantity_fixes: suggestion.quantity_fixes,
            suggestion_type: suggestion.suggestion_type,
        });
        self.fixes.len() - 1
    }

    /// Apply one recorded suggestion as a bulk substitution.
    ///
    /// Every position in the suggested range whose current codon admits a
    /// synonymous target matching the bias becomes a candidate with its
    /// first matching target; candidates are ordered by ascending weight
    /// (ties keep position order) and at most `quantity_fixes` of them are
    /// changed.
    pub fn apply_fix(&mut self, fix_id: usize) {
        let fix = self.fixes[fix_id].clone();
        if self.histories.is_empty() {
            return;
        }
        let end = fix.end.min(self.len() - 1);

        let mut candidates: Vec<(i32, usize, String)> = Vec::new();
        for position in fix.start..=end {
            let current = self.current_codon(position);
            let Some(targets) = self.substitutions.get(current) else {
                continue;
            };
            let target = targets
                .iter()
                .find(|substitution| fix.bias == GcBias::Na || substitution.bias == fix.bias);
            if let Some(substitution) = target {
                candidates.push((self.weights[position], position, substitution.to.clone()));
            }
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0));
        for (_, position, to) in candidates.into_iter().take(fix.quantity_fixes) {
            self.histories[position].push(HistoryEntry {
                codon: to,
                step: fix.step,
                fix: Some(fix_id),
            });
        }
    }

    /// The historical log of all substitutions applied by suggestions,
    /// ordered by (step, position).
    pub fn changes(&self) -> Vec<Change> {
        let mut changes = Vec::new();
        for (position, history) in self.histories.iter().enumerate() {
            for (index, entry) in history.iter().enumerate().skip(1) {
                if let Some(fix_id) = entry.fix {
                    changes.push(Change {
                        position,
                        step: entry.step,
                        from: history[index - 1].codon.clone(),
                        to: entry.codon.clone(),
                        reason: self.fixes[fix_id].suggestion_type.clone(),
                    });
                }
            }
        }
        changes.sort_by(|a, b| (a.step, a.position).cmp(&(b.step, b.position)));
        changes
    }
}
