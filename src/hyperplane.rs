//! Hyperplane discovery: brute force at D = 2, and the Veldkamp-lift
//! construction at D >= 3.

use crate::bitset::PointSet;
use crate::combinatorics::{Combinations, Permutations};
use crate::geometry::{Geometry, POINTS_PER_LINE};
use crate::veldkamp::VeldkampLine;

/// Enumerates every non-trivial candidate of width `geometry.num_points()`
/// with popcount in `[2, N-1]` and keeps those that pass
/// [`Geometry::is_hyperplane`]. Only tractable at D = 2 (`N = 16`); higher
/// dimensions use [`from_veldkamp_lines`] instead.
pub fn brute_force(geometry: &Geometry) -> Vec<PointSet> {
    let n = geometry.num_points();
    let mut hyperplanes = Vec::new();

    for k in 2..n {
        let mut combos = Combinations::new(n as u32, k as u32);
        while let Some(combo) = combos.next_combination() {
            let mut candidate = PointSet::empty();
            for &point in combo {
                candidate.set(point as usize);
            }
            if geometry.is_hyperplane(&candidate) {
                hyperplanes.push(candidate);
            }
        }
    }

    hyperplanes
}

/// Builds every hyperplane of the D geometry from the hyperplanes and
/// projective Veldkamp lines of the D-1 geometry.
///
/// Every hyperplane of the D geometry belongs to exactly one of two
/// families:
/// 1. one of the 24 orderings of the four hyperplanes of a projective
///    Veldkamp line, placed one per slab;
/// 2. a hyperplane `h` of the D-1 geometry repeated in three slabs, with the
///    remaining slab filled with the full D-1 mask.
pub fn from_veldkamp_lines(
    prev: &Geometry,
    prev_hyperplanes: &[PointSet],
    projective_lines: &[VeldkampLine],
) -> Vec<PointSet> {
    let n = prev.num_points();
    let mut hyperplanes = Vec::new();

    for line in projective_lines {
        let mut members: Vec<PointSet> = line.hyperplanes.iter().map(|&i| prev_hyperplanes[i]).collect();
        members.sort();

        let mut perms = Permutations::new(POINTS_PER_LINE as u32);
        while let Some(ordering) = perms.next_permutation() {
            let mut combined = PointSet::empty();
            for (slab, &member_index) in ordering.iter().enumerate() {
                combined.union_assign(&members[member_index as usize].shl(slab * n));
            }
            hyperplanes.push(combined);
        }
    }

    let full = prev.full_mask();
    for &h in prev_hyperplanes {
        for filled_slab in 0..POINTS_PER_LINE {
            let mut combined = PointSet::empty();
            for slab in 0..POINTS_PER_LINE {
                let slab_value = if slab == filled_slab { full } else { h };
                combined.union_assign(&slab_value.shl(slab * n));
            }
            hyperplanes.push(combined);
        }
    }

    hyperplanes
}
