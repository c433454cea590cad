use serde::{Deserialize, Serialize};

use crate::constants::FIX_ITERATIONS;

/// Configuration settings for the CDS fixer.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use synfix_core::config::FixerConfig;
///
/// let config = FixerConfig::default();
/// assert_eq!(config.fix_iterations, 100);
/// ```
///
/// ## Quiet run with a higher round cap
///
/// ```rust
/// use synfix_core::config::FixerConfig;
///
/// let config = FixerConfig {
///     fix_iterations: 250,
///     quiet: true,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixerConfig {
    /// Maximum number of detector/substitution rounds.
    ///
    /// Sequences are usually solved within one to three rounds; the cap only
    /// bounds pathological inputs. Reaching it with no applied change makes
    /// the fixer report the sequence as unfixable.
    ///
    /// **Default**: `100`
    pub fix_iterations: usize,

    /// Suppress per-round progress output on stderr.
    ///
    /// **Default**: `false`
    pub quiet: bool,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            fix_iterations: FIX_ITERATIONS,
            quiet: false,
        }
    }
}
