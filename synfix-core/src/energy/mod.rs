//! Temperature-scaled Turner energy parameters.
//!
//! The reference tables in [`turner2004`] hold free energies at 37 °C next to
//! their enthalpy changes. [`EnergyParams::scaled`] rescales every entry to
//! the requested temperature with `dG(T) = dH − (dH − dG37) · Tk`, where `Tk`
//! is the Kelvin ratio of the two temperatures, and derives the tables the
//! reference set does not carry measured data for (1x1/2x1/2x2 interior
//! loops, exterior and multi-loop mismatches). The resulting set is immutable
//! and reused for every loop of one evaluation.

use crate::constants::{
    ENERGY_PARAMS_TEMPERATURE, MAX_LEN_LOOP, MAX_NINIO, NB_BASES, NB_PAIRS, ZERO_C_KELVIN,
};
use crate::types::{
    DangleEnergies, Interior1x1Energies, Interior2x1Energies, Interior2x2Energies,
    LoopSizeEnergies, MismatchEnergies, PairEnergies,
};

pub mod turner2004;

/// Bonus lookup for unusually stable hairpin loops.
///
/// Entries are the literal loop sequences (closing pair included),
/// concatenated into a registry string with a one-character separator. A
/// lookup is a substring search; hits are mapped back to the entry index by
/// the fixed stride.
#[derive(Debug, Clone)]
pub struct SpecialLoops {
    registry: &'static str,
    stride: usize,
    bonuses: Vec<i32>,
}

impl SpecialLoops {
    fn scaled(
        registry: &'static str,
        stride: usize,
        dg37: &[i32],
        dh: &[i32],
        temperature: f64,
    ) -> Self {
        let bonuses = dg37
            .iter()
            .zip(dh.iter())
            .map(|(&dg, &dh)| rescale_gibbs(dg, dh, temperature))
            .collect();
        Self {
            registry,
            stride,
            bonuses,
        }
    }

    /// Scaled bonus of the loop sequence `key`, if it is registered.
    ///
    /// Keys never contain the separator, so any hit lies within a single
    /// registry entry.
    #[must_use]
    pub fn bonus(&self, key: &str) -> Option<i32> {
        self.registry
            .find(key)
            .map(|idx| self.bonuses[idx / self.stride])
    }
}

/// A complete Turner parameter set scaled to one temperature.
///
/// All entries are integer dcal/mol. See [`turner2004`] for the indexing
/// conventions; the large interior loop tables are boxed to keep the struct
/// cheap to move.
#[derive(Debug, Clone)]
pub struct EnergyParams {
    pub stacking_pair: PairEnergies,
    pub hairpin_loop: LoopSizeEnergies,
    pub bulge: LoopSizeEnergies,
    pub interior_loop: LoopSizeEnergies,
    pub mismatch_interior: MismatchEnergies,
    pub mismatch_1xn_interior: MismatchEnergies,
    pub mismatch_2x3_interior: MismatchEnergies,
    pub mismatch_exterior: MismatchEnergies,
    pub mismatch_hairpin: MismatchEnergies,
    pub mismatch_multi: MismatchEnergies,
    pub dangle5: DangleEnergies,
    pub dangle3: DangleEnergies,
    pub interior_1x1: Box<Interior1x1Energies>,
    pub interior_2x1: Box<Interior2x1Energies>,
    pub interior_2x2: Box<Interior2x2Energies>,
    /// Asymmetry penalty vector; entry 2 is the per-nucleotide slope
    pub ninio: [i32; NB_BASES + 1],
    /// Logarithmic extrapolation coefficient for long loops
    pub lxc: f64,
    pub multi_loop_unpaired_bonus: i32,
    pub multi_loop_closing_penalty: i32,
    pub terminal_au: i32,
    pub multi_loop_intern: [i32; NB_PAIRS + 1],
    pub triloops: SpecialLoops,
    pub tetraloops: SpecialLoops,
    pub hexaloops: SpecialLoops,
}

impl EnergyParams {
    /// Build the parameter set for free energy evaluation at `temperature`
    /// degrees Celsius.
    #[must_use]
    pub fn scaled(temperature: f64) -> Self {
        let lxc = turner2004::LXC_37 * temperature;

        let mut ninio = [0; NB_BASES + 1];
        ninio[2] = rescale_gibbs(turner2004::NINIO_37, turner2004::NINIO_DH, temperature);

        let mut hairpin_loop = [0; MAX_LEN_LOOP + 1];
        let mut bulge = [0; MAX_LEN_LOOP + 1];
        let mut interior_loop = [0; MAX_LEN_LOOP + 1];
        for size in 0..=MAX_LEN_LOOP {
            hairpin_loop[size] = rescale_gibbs(
                turner2004::HAIRPIN_37[size],
                turner2004::HAIRPIN_DH[size],
                temperature,
            );
            bulge[size] = rescale_gibbs(
                turner2004::BULGE_37[size],
                turner2004::BULGE_DH[size],
                temperature,
            );
            interior_loop[size] = rescale_gibbs(
                turner2004::INTERIOR_37[size],
                turner2004::INTERIOR_DH[size],
                temperature,
            );
        }

        let mut stacking_pair = [[0; NB_PAIRS + 1]; NB_PAIRS + 1];
        for outer in 0..=NB_PAIRS {
            for inner in 0..=NB_PAIRS {
                stacking_pair[outer][inner] = rescale_gibbs(
                    turner2004::STACK_37[outer][inner],
                    turner2004::STACK_DH[outer][inner],
                    temperature,
                );
            }
        }

        // Dangling ends are stabilizing only: positive rescaled values are
        // dropped to zero.
        let mut dangle5 = [[0; NB_BASES + 1]; NB_PAIRS + 1];
        let mut dangle3 = [[0; NB_BASES + 1]; NB_PAIRS + 1];
        for pair in 0..=NB_PAIRS {
            for base in 0..=NB_BASES {
                dangle5[pair][base] = rescale_gibbs(
                    turner2004::DANGLE5_37[pair][base],
                    turner2004::DANGLE5_DH[pair][base],
                    temperature,
                )
                .min(0);
                dangle3[pair][base] = rescale_gibbs(
                    turner2004::DANGLE3_37[pair][base],
                    turner2004::DANGLE3_DH[pair][base],
                    temperature,
                )
                .min(0);
            }
        }

        let mut mismatch_hairpin = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        let mut mismatch_interior = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        let mut mismatch_1xn_interior = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        let mut mismatch_2x3_interior = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        let mut mismatch_exterior = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        let mut mismatch_multi = [[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
        for pair in 0..=NB_PAIRS {
            for five in 0..=NB_BASES {
                for three in 0..=NB_BASES {
                    mismatch_hairpin[pair][five][three] = rescale_gibbs(
                        turner2004::MISMATCH_HAIRPIN_37[pair][five][three],
                        turner2004::MISMATCH_HAIRPIN_DH[pair][five][three],
                        temperature,
                    );
                    let interior = rescale_gibbs(
                        turner2004::MISMATCH_INTERIOR_37[pair][five][three],
                        turner2004::MISMATCH_INTERIOR_DH[pair][five][three],
                        temperature,
                    );
                    mismatch_interior[pair][five][three] = interior;
                    // The 1xn and 2x3 contexts carry no measured data of
                    // their own; they reuse the interior mismatches, the 1xn
                    // context keeping only the stabilizing part.
                    mismatch_1xn_interior[pair][five][three] = interior.min(0);
                    mismatch_2x3_interior[pair][five][three] = interior;
                    // Exterior and multi-loop mismatches are the combined
                    // dangle contributions of both flanks, clamped to be
                    // stabilizing only.
                    let combined = dangle5[pair][five] + dangle3[pair][three];
                    mismatch_exterior[pair][five][three] = combined.min(0);
                    mismatch_multi[pair][five][three] = combined.min(0);
                }
            }
        }

        let mut interior_1x1 =
            Box::new([[[[0; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1]; NB_PAIRS + 1]);
        let mut interior_2x1 = Box::new(
            [[[[[0; NB_BASES + 1]; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1]; NB_PAIRS + 1],
        );
        let mut interior_2x2 = Box::new(
            [[[[[[0; NB_BASES + 1]; NB_BASES + 1]; NB_BASES + 1]; NB_BASES + 1]; NB_PAIRS + 1];
                NB_PAIRS + 1],
        );
        let small_loop_base = interior_loop[4];
        let asymmetry = MAX_NINIO.min(ninio[2]);
        for closing in 0..=NB_PAIRS {
            for enclosed in 0..=NB_PAIRS {
                for k in 0..=NB_BASES {
                    for l in 0..=NB_BASES {
                        interior_1x1[closing][enclosed][k][l] = small_loop_base
                            + mismatch_interior[closing][k][l]
                            + mismatch_interior[enclosed][l][k];
                        for m in 0..=NB_BASES {
                            interior_2x1[closing][enclosed][k][l][m] = small_loop_base
                                + asymmetry
                                + mismatch_1xn_interior[closing][k][m]
                                + mismatch_1xn_interior[enclosed][l][k];
                            for n in 0..=NB_BASES {
                                interior_2x2[closing][enclosed][k][l][m][n] = small_loop_base
                                    + mismatch_interior[closing][k][n]
                                    + mismatch_interior[enclosed][m][l];
                            }
                        }
                    }
                }
            }
        }

        let multi_loop_intern = [rescale_gibbs(
            turner2004::ML_INTERN_37,
            turner2004::ML_INTERN_DH,
            temperature,
        ); NB_PAIRS + 1];

        Self {
            stacking_pair,
            hairpin_loop,
            bulge,
            interior_loop,
            mismatch_interior,
            mismatch_1xn_interior,
            mismatch_2x3_interior,
            mismatch_exterior,
            mismatch_hairpin,
            mismatch_multi,
            dangle5,
            dangle3,
            interior_1x1,
            interior_2x1,
            interior_2x2,
            ninio,
            lxc,
            multi_loop_unpaired_bonus: rescale_gibbs(
                turner2004::ML_BASE_37,
                turner2004::ML_BASE_DH,
                temperature,
            ),
            multi_loop_closing_penalty: rescale_gibbs(
                turner2004::ML_CLOSING_37,
                turner2004::ML_CLOSING_DH,
                temperature,
            ),
            terminal_au: rescale_gibbs(
                turner2004::TERMINAL_AU_37,
                turner2004::TERMINAL_AU_DH,
                temperature,
            ),
            multi_loop_intern,
            triloops: SpecialLoops::scaled(
                turner2004::TRILOOPS,
                6,
                &turner2004::TRILOOP_37,
                &turner2004::TRILOOP_DH,
                temperature,
            ),
            tetraloops: SpecialLoops::scaled(
                turner2004::TETRALOOPS,
                7,
                &turner2004::TETRALOOP_37,
                &turner2004::TETRALOOP_DH,
                temperature,
            ),
            hexaloops: SpecialLoops::scaled(
                turner2004::HEXALOOPS,
                9,
                &turner2004::HEXALOOP_37,
                &turner2004::HEXALOOP_DH,
                temperature,
            ),
        }
    }

    /// Hairpin loop size term, log-extrapolated past [`MAX_LEN_LOOP`].
    #[must_use]
    pub fn hairpin_by_size(&self, size: usize) -> i32 {
        log_extended(&self.hairpin_loop, size, self.lxc)
    }

    /// Bulge loop size term, log-extrapolated past [`MAX_LEN_LOOP`].
    #[must_use]
    pub fn bulge_by_size(&self, size: usize) -> i32 {
        log_extended(&self.bulge, size, self.lxc)
    }

    /// Interior loop size term, log-extrapolated past [`MAX_LEN_LOOP`].
    #[must_use]
    pub fn interior_by_size(&self, size: usize) -> i32 {
        log_extended(&self.interior_loop, size, self.lxc)
    }

    /// Capped asymmetry penalty of an interior loop with the given side
    /// lengths.
    #[must_use]
    pub fn asymmetry_penalty(&self, larger: usize, smaller: usize) -> i32 {
        MAX_NINIO.min((larger - smaller) as i32 * self.ninio[2])
    }
}

/// Rescale a free energy to `temperature` from its 37 °C reference and
/// enthalpy: `dS = dH − dG37`, `dG(T) = dH − dS · Tk`.
pub(crate) fn rescale_gibbs(dg37: i32, dh: i32, temperature: f64) -> i32 {
    let reference_kelvin = ENERGY_PARAMS_TEMPERATURE + ZERO_C_KELVIN;
    let kelvin = temperature + ZERO_C_KELVIN;
    let kelvin_ratio = kelvin / reference_kelvin;

    let entropy = f64::from(dh - dg37);
    (f64::from(dh) - entropy * kelvin_ratio) as i32
}

fn log_extended(table: &LoopSizeEnergies, size: usize, lxc: f64) -> i32 {
    if size <= MAX_LEN_LOOP {
        table[size]
    } else {
        table[MAX_LEN_LOOP]
            + (lxc * (size as f64 / MAX_LEN_LOOP as f64).ln()).round() as i32
    }
}
