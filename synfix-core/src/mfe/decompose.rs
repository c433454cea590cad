//! Loop decomposition of an annotated secondary structure.
//!
//! The decomposer walks the pair table, classifies every loop and scores it
//! through the kernels. For each closing pair the stack walker advances two
//! pointers towards each other: as long as the next paired positions are
//! partners the region is a degree-2 loop and the walker descends into it;
//! when the pointers cross the region is a hairpin; otherwise the closing
//! pair encloses a multi-loop and every branching helix is walked in turn.

use crate::energy::EnergyParams;
use crate::mfe::kernels::{
    exterior_stem_energy, hairpin_energy, multi_loop_stem_energy, stack_bulge_interior_energy,
};
use crate::sequence::{base_pair_code, PairTable};
use crate::types::{BasePairIdx, EnergyContribution, LoopKind, SynfixError};

/// Everything needed to score one (sequence, structure) input: the validated
/// sequence, its numerical encoding, the pair table and the scaled
/// parameters.
pub(crate) struct FoldContext<'a> {
    pub sequence: &'a str,
    pub encoded: Vec<u8>,
    pub pair_table: PairTable,
    pub params: EnergyParams,
}

impl FoldContext<'_> {
    fn len(&self) -> usize {
        self.pair_table.len()
    }

    fn pair_code(&self, five_prime: usize, three_prime: usize) -> u8 {
        base_pair_code(self.encoded[five_prime], self.encoded[three_prime])
    }

    /// Pair code of (`five_prime`, `three_prime`), failing on pairings the
    /// energy model does not recognize.
    fn checked_pair_code(
        &self,
        five_prime: usize,
        three_prime: usize,
    ) -> Result<u8, SynfixError> {
        match self.pair_code(five_prime, three_prime) {
            0 => Err(SynfixError::InvalidPair {
                five_prime,
                three_prime,
            }),
            code => Ok(code),
        }
    }
}

/// Score every loop of the structure, returning the total energy in dcal/mol
/// and the per-loop contributions (exterior loop first).
pub(crate) fn evaluate_structure(
    ctx: &FoldContext<'_>,
) -> Result<(i32, Vec<EnergyContribution>), SynfixError> {
    let mut contributions = Vec::new();
    let mut energy = exterior_loop_energy(ctx, &mut contributions)?;

    let mut i = 0;
    while i < ctx.len() {
        match ctx.pair_table.partner(i) {
            None => i += 1,
            Some(j) => {
                energy += stack_energy(ctx, i, &mut contributions)?;
                i = j + 1;
            }
        }
    }

    Ok((energy, contributions))
}

/// Dangling-end and mismatch contributions of all helices branching off the
/// exterior loop.
fn exterior_loop_energy(
    ctx: &FoldContext<'_>,
    contributions: &mut Vec<EnergyContribution>,
) -> Result<i32, SynfixError> {
    let length = ctx.len();
    let mut energy = 0;

    // seek to the opening base of the first stem
    let mut five_prime = 0;
    while five_prime < length && ctx.pair_table.partner(five_prime).is_none() {
        five_prime += 1;
    }

    while five_prime < length {
        let three_prime = match ctx.pair_table.partner(five_prime) {
            Some(partner) => partner,
            None => break,
        };
        let pair_code = ctx.checked_pair_code(five_prime, three_prime)?;

        let five_prime_mismatch = if five_prime > 0 {
            Some(ctx.encoded[five_prime - 1])
        } else {
            None
        };
        let three_prime_mismatch = if three_prime < length - 1 {
            Some(ctx.encoded[three_prime + 1])
        } else {
            None
        };

        energy += exterior_stem_energy(
            pair_code,
            five_prime_mismatch,
            three_prime_mismatch,
            &ctx.params,
        );

        // seek to the next stem
        five_prime = three_prime + 1;
        while five_prime < length && ctx.pair_table.partner(five_prime).is_none() {
            five_prime += 1;
        }
    }

    contributions.push(EnergyContribution {
        kind: LoopKind::Exterior,
        closing: None,
        enclosed: None,
        energy,
    });
    Ok(energy)
}

/// Score the substructure enclosed by the pair opening at `closing_five`.
///
/// Descends through stacked pairs, bulges and interior loops until the
/// region below resolves into a hairpin or a multi-loop.
fn stack_energy(
    ctx: &FoldContext<'_>,
    closing_five: usize,
    contributions: &mut Vec<EnergyContribution>,
) -> Result<i32, SynfixError> {
    let pair_table = &ctx.pair_table;
    let mut closing_five = closing_five;
    let mut closing_three = match pair_table.partner(closing_five) {
        Some(partner) => partner,
        // callers only pass paired positions
        None => return Ok(0),
    };

    ctx.checked_pair_code(closing_five, closing_three)?;

    let mut energy = 0;
    let mut enclosed_five = closing_five;
    let mut enclosed_three = closing_three;

    while enclosed_five < enclosed_three {
        // seek to the next paired position from the 5' side
        enclosed_five += 1;
        while pair_table.partner(enclosed_five).is_none() {
            enclosed_five += 1;
        }

        // seek to the next paired position from the 3' side
        enclosed_three -= 1;
        while pair_table.partner(enclosed_three).is_none() {
            enclosed_three -= 1;
        }

        if pair_table.partner(enclosed_three) != Some(enclosed_five)
            || enclosed_five > enclosed_three
        {
            // the two pointers are not partners: hairpin or multi-loop below
            break;
        }

        ctx.checked_pair_code(enclosed_five, enclosed_three)?;

        let closing_pair = ctx.pair_code(closing_five, closing_three);
        // the enclosed pair enters the tables in reversed orientation
        let enclosed_pair = ctx.pair_code(enclosed_three, enclosed_five);

        let loop_energy = stack_bulge_interior_energy(
            enclosed_five - closing_five - 1,
            closing_three - enclosed_three - 1,
            closing_pair,
            enclosed_pair,
            ctx.encoded[closing_five + 1],
            ctx.encoded[closing_three - 1],
            ctx.encoded[enclosed_five - 1],
            ctx.encoded[enclosed_three + 1],
            &ctx.params,
        );
        energy += loop_energy;
        contributions.push(EnergyContribution {
            kind: LoopKind::Interior,
            closing: Some(BasePairIdx::new(closing_five, closing_three)),
            enclosed: Some(BasePairIdx::new(enclosed_five, enclosed_three)),
            energy: loop_energy,
        });

        closing_five = enclosed_five;
        closing_three = enclosed_three;
    }

    if enclosed_five > enclosed_three {
        // hairpin
        let size = closing_three - closing_five - 1;
        let pair_code = ctx.pair_code(closing_five, closing_three);
        let loop_energy = hairpin_energy(
            size,
            pair_code,
            ctx.encoded[closing_five + 1],
            ctx.encoded[closing_three - 1],
            &ctx.sequence[closing_five..=closing_three],
            &ctx.params,
        );
        energy += loop_energy;
        contributions.push(EnergyContribution {
            kind: LoopKind::Hairpin,
            closing: Some(BasePairIdx::new(closing_five, closing_three)),
            enclosed: None,
            energy: loop_energy,
        });
        return Ok(energy);
    }

    // multi-loop
    energy += multi_loop_energy(ctx, closing_five, contributions)?;
    Ok(energy)
}

/// Score a multi-loop: the closing contribution, one stem contribution per
/// branching helix (recursing into each), and the unpaired-nucleotide bonus.
fn multi_loop_energy(
    ctx: &FoldContext<'_>,
    closing_five: usize,
    contributions: &mut Vec<EnergyContribution>,
) -> Result<i32, SynfixError> {
    let pair_table = &ctx.pair_table;
    let closing_three = match pair_table.partner(closing_five) {
        Some(partner) => partner,
        None => return Ok(0),
    };

    let mut multi_energy = ctx.params.multi_loop_closing_penalty;

    // The closing pair is typed in reversed (3',5') orientation with its
    // mismatches swapped accordingly, matching the reference implementation.
    let closing_pair = ctx.pair_code(closing_three, closing_five);
    multi_energy += multi_loop_stem_energy(
        closing_pair,
        ctx.encoded[closing_three - 1],
        ctx.encoded[closing_five + 1],
        &ctx.params,
    );

    // seek to the first branching helix
    let mut enclosed_five = closing_five + 1;
    while enclosed_five <= closing_three && pair_table.partner(enclosed_five).is_none() {
        enclosed_five += 1;
    }

    let mut unpaired = enclosed_five - closing_five - 1;
    let mut substructures_energy = 0;

    while enclosed_five < closing_three {
        substructures_energy += stack_energy(ctx, enclosed_five, contributions)?;

        let enclosed_three = match pair_table.partner(enclosed_five) {
            Some(partner) => partner,
            None => break,
        };
        let enclosed_pair = ctx.pair_code(enclosed_five, enclosed_three);
        multi_energy += multi_loop_stem_energy(
            enclosed_pair,
            ctx.encoded[enclosed_five - 1],
            ctx.encoded[enclosed_three + 1],
            &ctx.params,
        );

        // seek to the next branching helix
        enclosed_five = enclosed_three + 1;
        while enclosed_five < closing_three && pair_table.partner(enclosed_five).is_none() {
            enclosed_five += 1;
        }
        unpaired += enclosed_five - enclosed_three - 1;
    }

    multi_energy += unpaired as i32 * ctx.params.multi_loop_unpaired_bonus;

    contributions.push(EnergyContribution {
        kind: LoopKind::Multi,
        closing: Some(BasePairIdx::new(closing_five, closing_three)),
        enclosed: None,
        energy: multi_energy,
    });
    Ok(multi_energy + substructures_energy)
}
