//! Enumerates and classifies the hyperplanes and Veldkamp lines of the
//! Segre product of four-point projective lines, for dimensions 2 through
//! 4.
//!
//! The public entry points are [`run_dimension`] and [`run_all`]; everything
//! else is exposed for callers (tests, the `tools` crate, or a library
//! consumer building its own driver) that need the individual stages.

pub mod bitset;
pub mod classify;
pub mod combinatorics;
pub mod error;
pub mod geometry;
pub mod hyperplane;
pub mod stabilizer;
pub mod veldkamp;

use std::collections::BTreeMap;

use serde::Serialize;

pub use bitset::PointSet;
pub use error::{Error, Result};
pub use geometry::Geometry;

use classify::{HyperplaneClass, VeldkampLineClass};
use veldkamp::VeldkampLines;

/// A renderer-facing row of the hyperplane classification table, one per
/// [`classify::HyperplaneClass`]; `sub_geometries[axis][-1]` counts slices
/// whose point count matched no entry of the D-1 table.
#[derive(Debug, Clone, Serialize)]
pub struct HyperplaneTableRow {
    pub points: usize,
    pub lines: usize,
    pub points_by_order: BTreeMap<u32, u32>,
    pub sub_geometries: Vec<BTreeMap<i64, u32>>,
    pub count: usize,
}

impl From<&HyperplaneClass> for HyperplaneTableRow {
    fn from(class: &HyperplaneClass) -> Self {
        HyperplaneTableRow {
            points: class.num_points,
            lines: class.num_lines,
            points_by_order: class.points_by_order.clone(),
            sub_geometries: class
                .sub_geometry_profile
                .iter()
                .map(|profile| profile.iter().map(|(&k, &v)| (k, v as u32)).collect())
                .collect(),
            count: class.count,
        }
    }
}

/// A renderer-facing row of the Veldkamp-line classification table, one per
/// [`classify::VeldkampLineClass`].
#[derive(Debug, Clone, Serialize)]
pub struct VeldkampLineTableRow {
    pub is_projective: bool,
    pub core_points: usize,
    pub core_lines: usize,
    pub points_type: BTreeMap<i64, u32>,
    pub count: usize,
}

impl From<&VeldkampLineClass> for VeldkampLineTableRow {
    fn from(class: &VeldkampLineClass) -> Self {
        VeldkampLineTableRow {
            is_projective: class.is_projective,
            core_points: class.core_points,
            core_lines: class.core_lines,
            points_type: class.points_type.iter().map(|(&k, &v)| (k, v as u32)).collect(),
            count: class.count,
        }
    }
}

/// Everything produced by running the pipeline at a single dimension: the
/// geometry itself, its hyperplanes and their classification, and (except at
/// D = 4, per the non-goal on the D = 4 Veldkamp-line classification) its
/// Veldkamp lines and their classification.
pub struct DimensionResult {
    pub dimension: usize,
    pub geometry: Geometry,
    pub hyperplanes: Vec<PointSet>,
    pub hyperplane_classes: Vec<HyperplaneClass>,
    pub veldkamp_lines: Option<VeldkampLines>,
    pub veldkamp_line_classes: Option<Vec<VeldkampLineClass>>,
}

impl DimensionResult {
    /// The hyperplane table, sorted by descending point count (the original
    /// driver's presentation order).
    pub fn hyperplane_table(&self) -> Vec<HyperplaneTableRow> {
        let mut rows: Vec<HyperplaneTableRow> = self.hyperplane_classes.iter().map(HyperplaneTableRow::from).collect();
        rows.sort_by(|a, b| b.points.cmp(&a.points));
        rows
    }

    /// The Veldkamp-line table, sorted by `(is_projective, core_points,
    /// core_lines)`, or `None` at D = 4.
    pub fn veldkamp_line_table(&self) -> Option<Vec<VeldkampLineTableRow>> {
        let classes = self.veldkamp_line_classes.as_ref()?;
        let mut rows: Vec<VeldkampLineTableRow> = classes.iter().map(VeldkampLineTableRow::from).collect();
        rows.sort_by_key(|r| (r.is_projective, r.core_points, r.core_lines));
        Some(rows)
    }
}

/// Runs the pipeline at dimension `d` (one of 2, 3, 4). `prev` must be `None`
/// at D = 2 and `Some` (the result of the previous dimension) at D = 3 and 4.
#[tracing::instrument(skip(prev), fields(dimension = d))]
pub fn run_dimension(d: usize, prev: Option<&DimensionResult>) -> Result<DimensionResult> {
    match (d, prev) {
        (2, None) => Ok(run_dimension2()),
        (3, Some(prev)) if prev.dimension == 2 => Ok(run_lifted_dimension(prev, true)),
        (4, Some(prev)) if prev.dimension == 3 => Ok(run_lifted_dimension(prev, false)),
        (2, Some(_)) => Err(Error::InvalidInput("dimension 2 has no predecessor".to_string())),
        (3 | 4, None) => Err(Error::InvalidInput(format!("dimension {d} requires the previous dimension's result"))),
        _ => Err(Error::InvalidInput(format!("dimension must be in {{2, 3, 4}}, got {d}"))),
    }
}

fn run_dimension2() -> DimensionResult {
    let g1 = Geometry::dimension1();
    let g2 = g1.lift();
    let g3 = g2.lift();

    let hyperplanes = hyperplane::brute_force(&g2);
    tracing::info!(count = hyperplanes.len(), "brute-forced hyperplanes");

    let mut lines = veldkamp::find_veldkamp_lines(&hyperplanes);
    veldkamp::distinguish(&mut lines, &hyperplanes, &g3);
    tracing::info!(
        projective = lines.projective.len(),
        exceptional = lines.exceptional.len(),
        "classified Veldkamp lines"
    );

    let hyperplane_classes = classify::classify_hyperplanes(&hyperplanes, &g2, &[]);
    let veldkamp_line_classes = classify::classify_veldkamp_lines(&lines, &hyperplanes, &g2, &hyperplane_classes);

    DimensionResult {
        dimension: 2,
        geometry: g2,
        hyperplanes,
        hyperplane_classes,
        veldkamp_lines: Some(lines),
        veldkamp_line_classes: Some(veldkamp_line_classes),
    }
}

/// Shared by D = 3 (`compute_veldkamp = true`) and D = 4 (`false`, per the
/// non-goal excluding the D = 4 Veldkamp-line classification).
fn run_lifted_dimension(prev: &DimensionResult, compute_veldkamp: bool) -> DimensionResult {
    let projective_lines = prev
        .veldkamp_lines
        .as_ref()
        .map(|lines| lines.projective.as_slice())
        .unwrap_or(&[]);

    let geometry = prev.geometry.lift();
    let hyperplanes = hyperplane::from_veldkamp_lines(&prev.geometry, &prev.hyperplanes, projective_lines);
    tracing::info!(count = hyperplanes.len(), "lifted hyperplanes from Veldkamp lines");

    let hyperplane_classes = classify::classify_hyperplanes(&hyperplanes, &geometry, &prev.hyperplane_classes);

    let (veldkamp_lines, veldkamp_line_classes) = if compute_veldkamp {
        let next_geometry = geometry.lift();
        let mut lines = veldkamp::find_veldkamp_lines(&hyperplanes);
        veldkamp::distinguish(&mut lines, &hyperplanes, &next_geometry);
        tracing::info!(
            projective = lines.projective.len(),
            exceptional = lines.exceptional.len(),
            "classified Veldkamp lines"
        );
        let classes = classify::classify_veldkamp_lines(&lines, &hyperplanes, &geometry, &hyperplane_classes);
        (Some(lines), Some(classes))
    } else {
        (None, None)
    };

    DimensionResult {
        dimension: prev.dimension + 1,
        geometry,
        hyperplanes,
        hyperplane_classes,
        veldkamp_lines,
        veldkamp_line_classes,
    }
}

/// Drives dimensions 2, 3, and 4 in order, feeding each dimension's result
/// into the next.
pub fn run_all() -> Result<[DimensionResult; 3]> {
    let d2 = run_dimension(2, None)?;
    let d3 = run_dimension(3, Some(&d2))?;
    let d4 = run_dimension(4, Some(&d3))?;
    Ok([d2, d3, d4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_dimension_rejects_out_of_range_inputs() {
        assert!(matches!(run_dimension(1, None), Err(Error::InvalidInput(_))));
        assert!(matches!(run_dimension(5, None), Err(Error::InvalidInput(_))));
        assert!(matches!(run_dimension(3, None), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn run_all_produces_consistent_dimension_chain() {
        let [d2, d3, d4] = run_all().expect("reference pipeline always succeeds");

        assert_eq!(d2.dimension, 2);
        assert_eq!(d2.hyperplanes.len(), 40);
        assert!(d2.veldkamp_line_table().is_some());

        assert_eq!(d3.dimension, 3);
        assert_eq!(d3.hyperplanes.len(), 3280);
        assert!(d3.veldkamp_line_table().is_some());

        assert_eq!(d4.dimension, 4);
        assert!(d4.veldkamp_line_table().is_none(), "D = 4 Veldkamp-line table is out of scope");
        assert!(!d4.hyperplanes.is_empty());

        let total_points: usize = d2.hyperplane_table().iter().map(|r| r.count).sum();
        assert_eq!(total_points, d2.hyperplanes.len());
    }
}
