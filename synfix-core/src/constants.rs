// =============================================================================
// =============================================================================

/// Version string for synfix
pub const VERSION: &str = "0.1.0";

// =============================================================================
// =============================================================================

/// Number of distinguishable base pair types: CG, GC, GU, UG, AU, UA and
/// non-standard. Code 0 marks an invalid pairing.
pub const NB_PAIRS: usize = 7;

/// Number of distinguishable nucleotides: A, C, G, U
pub const NB_BASES: usize = 4;

/// Maximum tabulated loop length; longer loops are extrapolated
/// logarithmically
pub const MAX_LEN_LOOP: usize = 30;

/// Minimum number of unpaired nucleotides in a hairpin loop
pub const MIN_HAIRPIN_SIZE: usize = 3;

/// Forbidden energy marker, in dcal/mol
pub const INF: i32 = 10_000_000;

/// Cap on the asymmetry penalty of interior loops, in dcal/mol
pub const MAX_NINIO: i32 = 300;

// =============================================================================
// =============================================================================

/// Temperature in Celsius at which free energies are evaluated by default
pub const DEFAULT_TEMPERATURE: f64 = 37.0;

/// Temperature in Celsius at which the reference energy parameters were
/// measured
pub const ENERGY_PARAMS_TEMPERATURE: f64 = 37.0;

/// Offset between the Celsius and Kelvin scales
pub const ZERO_C_KELVIN: f64 = 273.15;

// =============================================================================
// =============================================================================

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Maximum number of detector/substitution rounds before the fixer gives up
pub const FIX_ITERATIONS: usize = 100;
