//! Free energy kernels for the individual loop classes.
//!
//! All kernels are pure lookups over a scaled [`EnergyParams`] set and return
//! dcal/mol. Base pairs are given as encoded pair types, unpaired bases as
//! encoded nucleotides; the enclosed pair of a degree-2 loop is expected in
//! the reversed (3'→5') orientation, per the table conventions.

use crate::constants::MIN_HAIRPIN_SIZE;
use crate::energy::EnergyParams;
use crate::sequence::pays_terminal_au;

/// Energy of a stem branching off the exterior loop.
///
/// The flanking nucleotides are `None` when the helix end coincides with a
/// sequence end. Both flanks present selects the exterior mismatch table; a
/// single flank selects the matching dangle.
pub(crate) fn exterior_stem_energy(
    pair_code: u8,
    five_prime_mismatch: Option<u8>,
    three_prime_mismatch: Option<u8>,
    params: &EnergyParams,
) -> i32 {
    let pair = pair_code as usize;
    let mut energy = match (five_prime_mismatch, three_prime_mismatch) {
        (Some(five), Some(three)) => params.mismatch_exterior[pair][five as usize][three as usize],
        (Some(five), None) => params.dangle5[pair][five as usize],
        (None, Some(three)) => params.dangle3[pair][three as usize],
        (None, None) => 0,
    };

    if pays_terminal_au(pair_code) {
        energy += params.terminal_au;
    }

    energy
}

/// Energy of a degree-2 loop: stacking pair, bulge or interior loop.
///
/// `left_unpaired` and `right_unpaired` are the unpaired counts between the
/// closing and enclosed pairs on the 5' and 3' sides. The mismatches are the
/// unpaired bases adjacent to each pair; for a stacking pair or bulge they go
/// unused.
#[allow(clippy::too_many_arguments)]
pub(crate) fn stack_bulge_interior_energy(
    left_unpaired: usize,
    right_unpaired: usize,
    closing_pair: u8,
    enclosed_pair: u8,
    closing_five_mismatch: u8,
    closing_three_mismatch: u8,
    enclosed_three_mismatch: u8,
    enclosed_five_mismatch: u8,
    params: &EnergyParams,
) -> i32 {
    let closing = closing_pair as usize;
    let enclosed = enclosed_pair as usize;
    let (c5, c3) = (
        closing_five_mismatch as usize,
        closing_three_mismatch as usize,
    );
    let (e5, e3) = (
        enclosed_five_mismatch as usize,
        enclosed_three_mismatch as usize,
    );

    let larger = left_unpaired.max(right_unpaired);
    let smaller = left_unpaired.min(right_unpaired);

    if larger == 0 {
        // stacking pair
        return params.stacking_pair[closing][enclosed];
    }

    if smaller == 0 {
        // bulge
        let mut energy = params.bulge_by_size(larger);
        if larger == 1 {
            energy += params.stacking_pair[closing][enclosed];
        } else {
            if pays_terminal_au(closing_pair) {
                energy += params.terminal_au;
            }
            if pays_terminal_au(enclosed_pair) {
                energy += params.terminal_au;
            }
        }
        return energy;
    }

    if smaller == 1 {
        if larger == 1 {
            // 1x1 loop
            return params.interior_1x1[closing][enclosed][c5][c3];
        }
        if larger == 2 {
            // 2x1 loop, always indexed with the larger side first
            return if left_unpaired == 1 {
                params.interior_2x1[closing][enclosed][c5][e5][c3]
            } else {
                params.interior_2x1[enclosed][closing][e5][c5][e3]
            };
        }
        // 1xn loop
        let mut energy = params.interior_by_size(larger + 1);
        energy += params.asymmetry_penalty(larger, smaller);
        energy += params.mismatch_1xn_interior[closing][c5][c3]
            + params.mismatch_1xn_interior[enclosed][e5][e3];
        return energy;
    }

    if smaller == 2 {
        if larger == 2 {
            // 2x2 loop
            return params.interior_2x2[closing][enclosed][c5][e3][e5][c3];
        }
        if larger == 3 {
            // 2x3 loop
            let mut energy = params.interior_loop[5] + params.ninio[2];
            energy += params.mismatch_2x3_interior[closing][c5][c3]
                + params.mismatch_2x3_interior[enclosed][e5][e3];
            return energy;
        }
    }

    // generic interior loop
    let mut energy = params.interior_by_size(larger + smaller);
    energy += params.asymmetry_penalty(larger, smaller);
    energy += params.mismatch_interior[closing][c5][c3]
        + params.mismatch_interior[enclosed][e5][e3];
    energy
}

/// Energy of a hairpin loop of `size` unpaired nucleotides.
///
/// `closing_substring` is the loop sequence including the closing pair
/// (`size + 2` characters), used for the tri-/tetra-/hexaloop bonus lookups.
pub(crate) fn hairpin_energy(
    size: usize,
    pair_code: u8,
    five_prime_mismatch: u8,
    three_prime_mismatch: u8,
    closing_substring: &str,
    params: &EnergyParams,
) -> i32 {
    let mut energy = params.hairpin_by_size(size);

    if size < MIN_HAIRPIN_SIZE {
        // only reachable when scoring alignments with forced pairs
        return energy;
    }

    match size {
        3 => {
            if let Some(bonus) = params.triloops.bonus(closing_substring) {
                return bonus;
            }
            if pays_terminal_au(pair_code) {
                return energy + params.terminal_au;
            }
            return energy;
        }
        4 => {
            if let Some(bonus) = params.tetraloops.bonus(closing_substring) {
                return bonus;
            }
        }
        6 => {
            if let Some(bonus) = params.hexaloops.bonus(closing_substring) {
                return bonus;
            }
        }
        _ => {}
    }

    energy += params.mismatch_hairpin[pair_code as usize][five_prime_mismatch as usize]
        [three_prime_mismatch as usize];
    energy
}

/// Contribution of one helix to the multi-loop it branches from: terminal
/// mismatch, per-stem penalty and, for non-GC pairs, the terminal AU term.
pub(crate) fn multi_loop_stem_energy(
    pair_code: u8,
    five_prime_mismatch: u8,
    three_prime_mismatch: u8,
    params: &EnergyParams,
) -> i32 {
    let pair = pair_code as usize;
    let mut energy = params.mismatch_multi[pair][five_prime_mismatch as usize]
        [three_prime_mismatch as usize]
        + params.multi_loop_intern[pair];

    if pays_terminal_au(pair_code) {
        energy += params.terminal_au;
    }

    energy
}
