//! The two-step permutation symmetry group of a dimension D geometry:
//! independently permuting the four values of each axis, then permuting the
//! D axes themselves. `2^{D+1}`-bit hyperplanes for D in {2, 3} form a small
//! enough point set that enumerating this group (of size `(4!)^D * D!`) is
//! tractable.
//!
//! This is a standalone utility, not wired into the default classification
//! pipeline in `lib.rs` -- see the design note on the stabiliser-permutation
//! open question.

use crate::combinatorics::{MultiPermutations, Permutations};
use crate::geometry::POINTS_PER_LINE;

/// One element of the full symmetry group: a coordinate permutation per
/// axis, plus a permutation of the axes themselves.
#[derive(Debug, Clone)]
pub struct Permutation {
    pub axis_permutations: Vec<Vec<u32>>,
    pub axis_order: Vec<u32>,
}

/// Applies `perm` to every point of `points` (interpreted as base-4 digit
/// tuples of `dimension` digits) and returns the resulting set, sorted and
/// deduplicated.
pub fn apply_permutation(points: &[usize], dimension: usize, perm: &Permutation) -> Vec<usize> {
    let mut permuted: Vec<usize> = points
        .iter()
        .map(|&point| {
            let mut digits = vec![0u32; dimension];
            let mut remainder = point;
            for digit in digits.iter_mut() {
                *digit = (remainder % POINTS_PER_LINE) as u32;
                remainder /= POINTS_PER_LINE;
            }

            let mut coords = vec![0u32; dimension];
            for axis in 0..dimension {
                coords[axis] = perm.axis_permutations[axis][digits[axis] as usize];
            }

            let mut reordered = vec![0u32; dimension];
            for (axis, &source) in perm.axis_order.iter().enumerate() {
                reordered[axis] = coords[source as usize];
            }

            reordered
                .iter()
                .enumerate()
                .map(|(axis, &digit)| digit as usize * POINTS_PER_LINE.pow(axis as u32))
                .sum()
        })
        .collect();

    permuted.sort_unstable();
    permuted.dedup();
    permuted
}

/// The full symmetry group of a `dimension`-axis geometry, each axis ranging
/// over `POINTS_PER_LINE` values: `(4!)^dimension * dimension!` elements.
pub struct SymmetryGroup {
    axis_coordinate_perms: MultiPermutations,
    axis_order_perms: Permutations,
    current_axis_order: Vec<u32>,
    dimension: usize,
}

impl SymmetryGroup {
    pub fn new(dimension: usize) -> Self {
        let sizes = vec![POINTS_PER_LINE as u32; dimension];
        let mut axis_order_perms = Permutations::new(dimension as u32);
        let current_axis_order = axis_order_perms
            .next_permutation()
            .map(|p| p.to_vec())
            .unwrap_or_default();

        SymmetryGroup {
            axis_coordinate_perms: MultiPermutations::new(&sizes),
            axis_order_perms,
            current_axis_order,
            dimension,
        }
    }

    pub fn total(&self) -> u64 {
        let axis_order_factorial: u64 = (1..=self.dimension as u64).product();
        self.axis_coordinate_perms.total() * axis_order_factorial
    }

    /// Advances through the coordinate-permutation odometer fastest, rolling
    /// over into the axis-order generator when it is exhausted.
    pub fn next(&mut self) -> Option<Permutation> {
        if let Some(coords) = self.axis_coordinate_perms.next_permutation() {
            return Some(Permutation {
                axis_permutations: coords.to_vec(),
                axis_order: self.current_axis_order.clone(),
            });
        }

        let next_axis_order = self.axis_order_perms.next_permutation()?.to_vec();
        self.current_axis_order = next_axis_order;

        let sizes = vec![POINTS_PER_LINE as u32; self.dimension];
        self.axis_coordinate_perms = MultiPermutations::new(&sizes);
        let coords = self.axis_coordinate_perms.next_permutation()?.to_vec();
        Some(Permutation {
            axis_permutations: coords,
            axis_order: self.current_axis_order.clone(),
        })
    }
}

/// Every group element under which `hyperplane`'s point set (given as sorted
/// point indices, not a [`crate::bitset::PointSet`], for direct reuse by
/// [`permutations_table`]) maps to itself.
pub fn hyperplane_stabilizer(points: &[usize], dimension: usize) -> Vec<Permutation> {
    let mut sorted_points = points.to_vec();
    sorted_points.sort_unstable();

    let mut group = SymmetryGroup::new(dimension);
    let mut stabilizer = Vec::new();
    while let Some(perm) = group.next() {
        if apply_permutation(&sorted_points, dimension, &perm) == sorted_points {
            stabilizer.push(perm);
        }
    }
    stabilizer
}

/// For every hyperplane (given as point-index lists) and every group
/// element, the index in `hyperplanes` that the permuted hyperplane matches.
///
/// Returns `None` at the position of a permuted hyperplane that matches none
/// of `hyperplanes`, rather than treating it as fatal: unlike the classifier
/// (where a missing match signals a broken invariant), this utility is
/// speculative and the caller decides whether an unmatched permutation is
/// acceptable.
pub fn permutations_table(hyperplanes: &[Vec<usize>], dimension: usize) -> Vec<Vec<Option<usize>>> {
    hyperplanes
        .iter()
        .map(|points| {
            let mut sorted_points = points.clone();
            sorted_points.sort_unstable();

            let mut group = SymmetryGroup::new(dimension);
            let mut row = Vec::new();
            while let Some(perm) = group.next() {
                let permuted = apply_permutation(&sorted_points, dimension, &perm);
                row.push(hyperplanes.iter().position(|h| {
                    let mut sorted_h = h.clone();
                    sorted_h.sort_unstable();
                    sorted_h == permuted
                }));
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetry_group_total_matches_factorial_formula() {
        let group = SymmetryGroup::new(2);
        // (4!)^2 * 2! = 576 * 2 = 1152
        assert_eq!(group.total(), 1152);
    }

    #[test]
    fn symmetry_group_enumerates_exactly_total_elements() {
        let mut group = SymmetryGroup::new(2);
        let mut count = 0;
        while group.next().is_some() {
            count += 1;
        }
        assert_eq!(count as u64, SymmetryGroup::new(2).total());
    }

    #[test]
    fn identity_always_stabilizes_any_hyperplane() {
        let points = vec![0, 1, 2, 3];
        let stabilizer = hyperplane_stabilizer(&points, 2);
        assert!(!stabilizer.is_empty());
    }

    #[test]
    fn full_geometry_is_stabilized_by_the_whole_group() {
        let points: Vec<usize> = (0..16).collect();
        let stabilizer = hyperplane_stabilizer(&points, 2);
        assert_eq!(stabilizer.len() as u64, SymmetryGroup::new(2).total());
    }

    #[test]
    fn permutations_table_maps_every_symmetry_of_a_singleton_set() {
        let hyperplanes = vec![vec![0usize]];
        let table = permutations_table(&hyperplanes, 1);
        assert_eq!(table.len(), 1);
        assert!(table[0].iter().all(|entry| *entry == Some(0)));
    }
}
