//! The point/line incidence structure of the Segre product, and its
//! recursive construction from dimension D to D+1 (the "cartesian lift").

use crate::bitset::PointSet;
use crate::error::{Error, Result};

/// Rows of the 4x2 table tensoring a point of the base `PointLine` geometry
/// (D = 1) onto the four slabs of the first lift. Grounded on the
/// reference's `TENSOR_2D` constant.
const TENSOR_2D: [[u8; 2]; 4] = [[1, 0], [0, 1], [1, 1], [1, 2]];

/// The points-per-line constant of the Segre product this crate implements:
/// a projective line with four points, tensored with itself D times.
pub const POINTS_PER_LINE: usize = 4;

pub const MAX_DIMENSION: usize = 4;

/// The point/line incidence structure of the Segre product at a runtime
/// dimension D in `{1, 2, 3, 4}`.
#[derive(Clone)]
pub struct Geometry {
    dimension: usize,
    num_points: usize,
    lines: Vec<PointSet>,
    /// Tensor coordinates over GF(3), one row of length `2^dimension` per
    /// point.
    tensors: Vec<Vec<u8>>,
    /// `sub_geometry_masks[axis][slice]`, empty when `dimension == 1`.
    sub_geometry_masks: Vec<Vec<PointSet>>,
}

impl Geometry {
    /// Validated constructor: checks that `lines` and `tensors` have the
    /// shape implied by `dimension` before trusting them.
    pub fn new(dimension: usize, lines: Vec<PointSet>, tensors: Vec<Vec<u8>>) -> Result<Self> {
        if !(1..=MAX_DIMENSION).contains(&dimension) {
            return Err(Error::InvalidInput(format!(
                "dimension must be in 1..={MAX_DIMENSION}, got {dimension}"
            )));
        }

        let num_points = POINTS_PER_LINE.pow(dimension as u32);
        let expected_lines = line_count(dimension);
        if lines.len() != expected_lines {
            return Err(Error::InvalidInput(format!(
                "geometry of dimension {dimension} expects {expected_lines} lines, got {}",
                lines.len()
            )));
        }
        if tensors.len() != num_points {
            return Err(Error::InvalidInput(format!(
                "geometry of dimension {dimension} expects {num_points} tensor rows, got {}",
                tensors.len()
            )));
        }
        let tensor_len = 1usize << dimension;
        if tensors.iter().any(|row| row.len() != tensor_len) {
            return Err(Error::InvalidInput(format!(
                "every tensor row of a dimension {dimension} geometry must have length {tensor_len}"
            )));
        }
        for line in &lines {
            if line.popcount() as usize != POINTS_PER_LINE {
                return Err(Error::InvalidInput(
                    "every line must contain exactly 4 points".to_string(),
                ));
            }
        }

        let sub_geometry_masks = compute_sub_geometry_masks(dimension, num_points);

        Ok(Geometry {
            dimension,
            num_points,
            lines,
            tensors,
            sub_geometry_masks,
        })
    }

    /// The base case: 4 points, 1 line, tensors taken directly from the
    /// `TENSOR_2D` table.
    pub fn dimension1() -> Self {
        let mut line = PointSet::empty();
        for i in 0..POINTS_PER_LINE {
            line.set(i);
        }
        let tensors = TENSOR_2D.iter().map(|row| row.to_vec()).collect();

        Geometry::new(1, vec![line], tensors).expect("dimension1 geometry is well-formed by construction")
    }

    /// Builds the D+1 geometry from `self` at dimension D (the cartesian
    /// lift, C5): 4 shifted copies of every line of `self`, plus one
    /// "vertical" line per point of `self` linking its 4 images across
    /// slabs. Tensors are the Kronecker product of `TENSOR_2D`'s rows with
    /// this geometry's tensors.
    pub fn lift(&self) -> Self {
        let n = self.num_points;
        let new_lines_count = 4 * self.lines.len() + n;
        let mut lines = Vec::with_capacity(new_lines_count);

        for slab in 0..POINTS_PER_LINE {
            for line in &self.lines {
                lines.push(line.shl(slab * n));
            }
        }
        for point in 0..n {
            let mut vertical = PointSet::empty();
            for slab in 0..POINTS_PER_LINE {
                vertical.set(slab * n + point);
            }
            lines.push(vertical);
        }

        let mut tensors = Vec::with_capacity(4 * n);
        for slab_row in &TENSOR_2D {
            for point_tensor in &self.tensors {
                let row: Vec<u8> = itertools::iproduct!(slab_row, point_tensor)
                    .map(|(&u, &t)| (u as u32 * t as u32 % 3) as u8)
                    .collect();
                tensors.push(row);
            }
        }

        Geometry::new(self.dimension + 1, lines, tensors)
            .expect("lift always produces a well-formed geometry")
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn lines(&self) -> &[PointSet] {
        &self.lines
    }

    pub fn tensors(&self) -> &[Vec<u8>] {
        &self.tensors
    }

    /// `sub_geometry_masks()[axis][slice]`: the mask of every point whose
    /// `axis`-th base-4 digit equals `slice`. Empty when `dimension() == 1`.
    pub fn sub_geometry_masks(&self) -> &[Vec<PointSet>] {
        &self.sub_geometry_masks
    }

    /// True iff `h` meets every line in exactly 1 point, or contains it
    /// entirely (4 points).
    pub fn is_hyperplane(&self, h: &PointSet) -> bool {
        self.lines.iter().all(|line| {
            let count = line.and(h).popcount();
            count == 1 || count == POINTS_PER_LINE as u32
        })
    }

    /// The tensor rows of exactly the points set in `h`, in ascending point
    /// order.
    pub fn build_matrix(&self, h: &PointSet) -> Vec<Vec<u8>> {
        (0..self.num_points)
            .filter(|&p| h.test(p))
            .map(|p| self.tensors[p].clone())
            .collect()
    }

    /// The number of lines of `self` entirely contained in `h`.
    pub fn lines_included_in(&self, h: &PointSet) -> usize {
        self.lines.iter().filter(|line| line.is_subset_of(h)).count()
    }

    /// The full-geometry bitmask: every one of the `num_points` active bits
    /// set.
    pub fn full_mask(&self) -> PointSet {
        PointSet::full(self.num_points)
    }
}

/// `L_D = 4 L_{D-1} + 4^{D-1}`, `L_1 = 1`.
pub fn line_count(dimension: usize) -> usize {
    let mut lines = 1usize;
    let mut points = POINTS_PER_LINE;
    for _ in 1..dimension {
        lines = 4 * lines + points;
        points *= POINTS_PER_LINE;
    }
    lines
}

fn compute_sub_geometry_masks(dimension: usize, num_points: usize) -> Vec<Vec<PointSet>> {
    if dimension == 1 {
        return Vec::new();
    }

    let mut masks = vec![vec![PointSet::empty(); POINTS_PER_LINE]; dimension];
    for point in 0..num_points {
        let mut digits = point;
        for axis in 0..dimension {
            let digit = digits % POINTS_PER_LINE;
            digits /= POINTS_PER_LINE;
            masks[axis][digit].set(point);
        }
    }
    masks
}

/// Gaussian elimination over GF(3): returns the number of linearly
/// independent rows of `matrix`. Pivoting swaps in the first row below the
/// current one with a non-zero entry in the pivot column; a pivot entry of
/// 2 is negated (multiplied by 2 mod 3, its own inverse) before eliminating
/// the rows below it.
pub fn rank_gf3(matrix: &[Vec<u8>]) -> usize {
    if matrix.is_empty() {
        return 0;
    }

    let cols = matrix[0].len();
    let rows = matrix.len();
    let mut m = matrix.to_vec();
    let mut pivot_row = 0usize;
    let mut rank = 0usize;

    for col in 0..cols {
        if pivot_row >= rows {
            break;
        }

        let pivot = (pivot_row..rows).find(|&r| m[r][col] != 0);
        let Some(pivot) = pivot else { continue };
        m.swap(pivot_row, pivot);

        if m[pivot_row][col] == 2 {
            for c in col..cols {
                m[pivot_row][c] = (m[pivot_row][c] * 2) % 3;
            }
        }

        for r in (pivot_row + 1)..rows {
            let factor = m[r][col];
            if factor == 0 {
                continue;
            }
            for c in col..cols {
                let product = (factor as u32 * m[pivot_row][c] as u32) % 3;
                m[r][c] = ((m[r][c] as u32 + 3 - product) % 3) as u8;
            }
        }

        pivot_row += 1;
        rank += 1;
    }

    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_counts_match_reference_fixture() {
        assert_eq!(line_count(1), 1);
        assert_eq!(line_count(2), 8);
        assert_eq!(line_count(3), 48);
        assert_eq!(line_count(4), 256);
    }

    #[test]
    fn dimension1_has_one_line_and_no_subgeometries() {
        let g = Geometry::dimension1();
        assert_eq!(g.num_points(), 4);
        assert_eq!(g.lines().len(), 1);
        assert!(g.sub_geometry_masks().is_empty());
        assert_eq!(g.lines()[0].popcount(), 4);
    }

    #[test]
    fn lift_produces_expected_shape() {
        let g1 = Geometry::dimension1();
        let g2 = g1.lift();
        assert_eq!(g2.dimension(), 2);
        assert_eq!(g2.num_points(), 16);
        assert_eq!(g2.lines().len(), 8);

        let g3 = g2.lift();
        assert_eq!(g3.lines().len(), 48);
        assert_eq!(g3.num_points(), 64);

        let g4 = g3.lift();
        assert_eq!(g4.lines().len(), 256);
        assert_eq!(g4.num_points(), 256);
    }

    #[test]
    fn dimension2_lines_match_reference_fixture() {
        let g2 = Geometry::dimension1().lift();
        let mut rows: Vec<Vec<usize>> = g2
            .lines()
            .iter()
            .map(|l| l.iter_points(16).collect())
            .collect();
        rows.sort();

        let mut expected = vec![
            vec![0, 1, 2, 3],
            vec![4, 5, 6, 7],
            vec![8, 9, 10, 11],
            vec![12, 13, 14, 15],
            vec![0, 4, 8, 12],
            vec![1, 5, 9, 13],
            vec![2, 6, 10, 14],
            vec![3, 7, 11, 15],
        ];
        expected.sort();

        assert_eq!(rows, expected);
    }

    #[test]
    fn tensor_kronecker_product_matches_reference_value() {
        let g2 = Geometry::dimension1().lift();
        let g3 = g2.lift();
        // Point 1*16 + 0 in dimension 3 = slab 1 tensored with point 0 of g2.
        assert_eq!(g3.tensors()[16], vec![0, 1, 0, 0]);
    }

    #[test]
    fn sub_geometry_masks_have_expected_popcount() {
        let g2 = Geometry::dimension1().lift();
        for axis_masks in g2.sub_geometry_masks() {
            assert_eq!(axis_masks.len(), 4);
            for mask in axis_masks {
                assert_eq!(mask.popcount() as usize, g2.num_points() / POINTS_PER_LINE);
            }
        }
    }

    #[test]
    fn rank_gf3_of_identity_rows_is_full() {
        let matrix = vec![vec![1, 0], vec![0, 1]];
        assert_eq!(rank_gf3(&matrix), 2);
    }

    #[test]
    fn rank_gf3_detects_linear_dependence() {
        // Row 2 is twice row 1 mod 3, i.e. -row1, so the rank is 1.
        let matrix = vec![vec![1, 1], vec![2, 2]];
        assert_eq!(rank_gf3(&matrix), 1);
    }

    #[test]
    fn rank_gf3_handles_more_rows_than_columns() {
        let matrix = vec![vec![1, 0], vec![0, 1], vec![1, 1]];
        assert_eq!(rank_gf3(&matrix), 2);
    }

    #[test]
    fn rank_gf3_of_empty_matrix_is_zero() {
        let matrix: Vec<Vec<u8>> = vec![];
        assert_eq!(rank_gf3(&matrix), 0);
    }

    #[test]
    fn new_rejects_invalid_dimension() {
        let err = Geometry::new(0, vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = Geometry::new(5, vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn new_rejects_wrong_line_count() {
        let err = Geometry::new(1, vec![], vec![vec![0; 2]; 4]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
