//! Veldkamp-line discovery (C7): grouping hyperplanes that share a common
//! pairwise intersection ("core") into lines of four, then separating the
//! true projective lines from the ones that only look exceptional until a
//! rank test in the next dimension up says otherwise.

use rayon::prelude::*;

use crate::bitset::PointSet;
use crate::combinatorics::Combinations;
use crate::geometry::Geometry;

/// Four hyperplane indices (into the slice they were found from) that share
/// a common pairwise intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VeldkampLine {
    pub hyperplanes: [usize; 4],
}

/// The result of [`find_veldkamp_lines`]: every quadruple is either
/// unambiguously projective (its core is shared by no other hyperplane) or
/// "supposed exceptional" (shared by more than two), pending [`distinguish`].
#[derive(Debug, Default, Clone)]
pub struct VeldkampLines {
    pub projective: Vec<VeldkampLine>,
    pub exceptional: Vec<VeldkampLine>,
}

/// Finds every set of four hyperplanes with a common pairwise intersection.
///
/// For every pair `(h1, h2)`, `same_core` collects the indices of every
/// hyperplane whose intersection with both `h1` and `h2` equals `h1 & h2`.
/// Pairs drawn from `same_core` (restricted to indices greater than `h2`'s,
/// to avoid revisiting the same quadruple) that also share that core become
/// a Veldkamp line: projective if `same_core` has exactly two members (the
/// pair itself), supposed exceptional otherwise.
pub fn find_veldkamp_lines(hyperplanes: &[PointSet]) -> VeldkampLines {
    let mut result = VeldkampLines::default();
    if hyperplanes.len() < 2 {
        return result;
    }

    let mut all_pairs = Vec::with_capacity(Combinations::new(hyperplanes.len() as u32, 2).total() as usize);
    let mut pairs = Combinations::new(hyperplanes.len() as u32, 2);
    while let Some(pair) = pairs.next_combination() {
        all_pairs.push((pair[0] as usize, pair[1] as usize));
    }

    // Each pair's search for co-core quadruples reads only the shared,
    // immutable hyperplane list, so the outer loop parallelises cleanly.
    let per_pair: Vec<(Vec<VeldkampLine>, Vec<VeldkampLine>)> = all_pairs
        .par_iter()
        .map(|&(i1, i2)| {
            let h1 = hyperplanes[i1];
            let h2 = hyperplanes[i2];
            let core = h1.and(&h2);

            let same_core: Vec<usize> = (0..hyperplanes.len())
                .filter(|&i| {
                    let h = hyperplanes[i];
                    h1.and(&h) == core && h2.and(&h) == core
                })
                .collect();

            let mut projective = Vec::new();
            let mut exceptional = Vec::new();

            if same_core.len() >= 2 {
                let mut sub_pairs = Combinations::new(same_core.len() as u32, 2);
                while let Some(sub_pair) = sub_pairs.next_combination() {
                    let a = same_core[sub_pair[0] as usize];
                    let b = same_core[sub_pair[1] as usize];
                    if a <= i2 {
                        continue;
                    }

                    let intersection_ab = hyperplanes[a].and(&hyperplanes[b]);
                    if intersection_ab != core {
                        continue;
                    }

                    let line = VeldkampLine {
                        hyperplanes: [i1, i2, a, b],
                    };
                    if same_core.len() == 2 {
                        projective.push(line);
                    } else {
                        exceptional.push(line);
                    }
                }
            }

            (projective, exceptional)
        })
        .collect();

    for (projective, exceptional) in per_pair {
        result.projective.extend(projective);
        result.exceptional.extend(exceptional);
    }

    result
}

/// Reclassifies every supposed-exceptional line whose four hyperplanes,
/// stacked into a single hyperplane of `lifted`, have less than full tensor
/// rank: such a line is actually projective, the ambiguity of
/// [`find_veldkamp_lines`] resolved by climbing one dimension up.
pub fn distinguish(lines: &mut VeldkampLines, hyperplanes: &[PointSet], lifted: &Geometry) {
    let n = lifted.num_points() / 4;
    let mut still_exceptional = Vec::with_capacity(lines.exceptional.len());

    for line in lines.exceptional.drain(..) {
        let mut stacked = PointSet::empty();
        for (slab, &index) in line.hyperplanes.iter().enumerate() {
            stacked.union_assign(&hyperplanes[index].shl(slab * n));
        }

        let matrix = lifted.build_matrix(&stacked);
        let full_rank = matrix.first().map_or(0, |row| row.len());
        if crate::geometry::rank_gf3(&matrix) < full_rank {
            lines.projective.push(line);
        } else {
            still_exceptional.push(line);
        }
    }

    lines.exceptional = still_exceptional;
}
