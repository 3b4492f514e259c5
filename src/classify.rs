//! Structural classification of hyperplanes and Veldkamp lines (C8): groups
//! objects by a fingerprint so that the reporting layer can print a small
//! table of equivalence classes instead of every individual object.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::bitset::PointSet;
use crate::geometry::Geometry;
use crate::veldkamp::{VeldkampLine, VeldkampLines};

/// The structural fingerprint of a hyperplane: point count, line count, the
/// per-order point distribution, and the per-axis sub-geometry composition.
///
/// `sub_geometry_profile[axis]` maps a class index in the D-1 hyperplane
/// table to how many of the 4 axis-aligned slices fall into that class; the
/// sentinel key `-1` means the slice's point count matched no entry of the
/// D-1 table.
#[derive(Debug, Clone)]
pub struct HyperplaneClass {
    pub num_points: usize,
    pub num_lines: usize,
    pub points_by_order: BTreeMap<u32, u32>,
    pub sub_geometry_profile: Vec<BTreeMap<i64, usize>>,
    pub count: usize,
}

impl PartialEq for HyperplaneClass {
    fn eq(&self, other: &Self) -> bool {
        if self.num_points != other.num_points
            || self.num_lines != other.num_lines
            || self.points_by_order != other.points_by_order
            || self.sub_geometry_profile.len() != other.sub_geometry_profile.len()
        {
            return false;
        }

        let mut used = vec![false; other.sub_geometry_profile.len()];
        'outer: for profile in &self.sub_geometry_profile {
            for (i, other_profile) in other.sub_geometry_profile.iter().enumerate() {
                if !used[i] && profile == other_profile {
                    used[i] = true;
                    continue 'outer;
                }
            }
            return false;
        }

        true
    }
}

impl Eq for HyperplaneClass {}

/// Computes the fingerprint of `h` within `geometry`, using `precedent_table`
/// (the hyperplane classes of the D-1 geometry, possibly empty) to resolve
/// `sub_geometry_profile` class indices.
pub fn classify_hyperplane(
    h: &PointSet,
    geometry: &Geometry,
    precedent_table: &[HyperplaneClass],
) -> HyperplaneClass {
    let num_points = h.popcount() as usize;
    let included_lines: Vec<&PointSet> = geometry.lines().iter().filter(|line| line.is_subset_of(h)).collect();
    let num_lines = included_lines.len();

    let mut points_by_order = BTreeMap::new();
    if num_lines == 0 {
        points_by_order.insert(0, num_points as u32);
    } else {
        let mut remainder = num_points as u32;
        for point in 0..geometry.num_points() {
            if !h.test(point) {
                continue;
            }
            let order = included_lines.iter().filter(|line| line.test(point)).count() as u32;
            if order != 0 {
                *points_by_order.entry(order).or_insert(0) += 1;
                remainder -= 1;
            }
        }
        if remainder != 0 {
            points_by_order.insert(0, remainder);
        }
    }

    let mut sub_geometry_profile = Vec::with_capacity(geometry.sub_geometry_masks().len());
    for axis_masks in geometry.sub_geometry_masks() {
        let mut profile: BTreeMap<i64, usize> = BTreeMap::new();
        for mask in axis_masks {
            let slice_points = h.and(mask).popcount() as usize;
            let key = precedent_table
                .iter()
                .position(|class| class.num_points == slice_points)
                .map_or(-1, |index| index as i64);
            *profile.entry(key).or_insert(0) += 1;
        }
        sub_geometry_profile.push(profile);
    }

    HyperplaneClass {
        num_points,
        num_lines,
        points_by_order,
        sub_geometry_profile,
        count: 1,
    }
}

/// Groups every hyperplane of `geometry` by [`classify_hyperplane`], in
/// first-seen order.
pub fn classify_hyperplanes(
    hyperplanes: &[PointSet],
    geometry: &Geometry,
    precedent_table: &[HyperplaneClass],
) -> Vec<HyperplaneClass> {
    // Fingerprinting is embarrassingly parallel (each hyperplane only reads
    // the shared, immutable geometry and precedent table); the sequential
    // merge below keeps first-seen class order deterministic.
    let fingerprints: Vec<HyperplaneClass> = hyperplanes
        .par_iter()
        .map(|h| classify_hyperplane(h, geometry, precedent_table))
        .collect();

    let mut classes: Vec<HyperplaneClass> = Vec::new();
    for class in fingerprints {
        match classes.iter_mut().find(|c| **c == class) {
            Some(existing) => existing.count += 1,
            None => classes.push(class),
        }
    }
    classes
}

/// The structural fingerprint of a Veldkamp line: whether it is projective,
/// the size of its common core (points and lines), and the multiset of
/// hyperplane-class indices of its four members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeldkampLineClass {
    pub is_projective: bool,
    pub core_points: usize,
    pub core_lines: usize,
    pub points_type: BTreeMap<i64, usize>,
    pub count: usize,
}

/// Computes the fingerprint of a single Veldkamp line. Every hyperplane
/// referenced by `line` is expected to have a matching entry in
/// `points_table`; if one is missing, `points_type` silently omits that
/// member (the caller may cross-check `points_type`'s total against 4).
pub fn classify_veldkamp_line(
    is_projective: bool,
    line: &VeldkampLine,
    hyperplanes: &[PointSet],
    geometry: &Geometry,
    points_table: &[HyperplaneClass],
) -> VeldkampLineClass {
    let [h0, h1, ..] = line.hyperplanes;
    let kernel = hyperplanes[h0].and(&hyperplanes[h1]);
    let core_points = kernel.popcount() as usize;
    let core_lines = geometry.lines_included_in(&kernel);

    let mut points_type: BTreeMap<i64, usize> = BTreeMap::new();
    for &h_index in &line.hyperplanes {
        let nbr_points = hyperplanes[h_index].popcount() as usize;
        if let Some(index) = points_table.iter().position(|class| class.num_points == nbr_points) {
            *points_type.entry(index as i64).or_insert(0) += 1;
        }
    }

    VeldkampLineClass {
        is_projective,
        core_points,
        core_lines,
        points_type,
        count: 1,
    }
}

/// Groups every Veldkamp line of `lines` (projective first, then
/// exceptional) by [`classify_veldkamp_line`], in first-seen order.
pub fn classify_veldkamp_lines(
    lines: &VeldkampLines,
    hyperplanes: &[PointSet],
    geometry: &Geometry,
    points_table: &[HyperplaneClass],
) -> Vec<VeldkampLineClass> {
    let mut classes: Vec<VeldkampLineClass> = Vec::new();

    let tagged = lines
        .projective
        .iter()
        .map(|l| (true, l))
        .chain(lines.exceptional.iter().map(|l| (false, l)));

    for (is_projective, line) in tagged {
        let class = classify_veldkamp_line(is_projective, line, hyperplanes, geometry, points_table);
        match classes.iter_mut().find(|c| **c == class) {
            Some(existing) => existing.count += 1,
            None => classes.push(class),
        }
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperplane;
    use crate::veldkamp;

    #[test]
    fn classifying_dimension1_hyperplanes_is_trivially_empty() {
        let g1 = Geometry::dimension1();
        let classes = classify_hyperplanes(&[], &g1, &[]);
        assert!(classes.is_empty());
    }

    #[test]
    fn classifying_dimension2_hyperplanes_uses_empty_precedent_table() {
        let g1 = Geometry::dimension1();
        let g2 = g1.lift();
        let v2 = hyperplane::brute_force(&g2);

        let classes = classify_hyperplanes(&v2, &g2, &[]);
        let total: usize = classes.iter().map(|c| c.count).sum();
        assert_eq!(total, v2.len());

        // D=2 hyperplanes meet every line in 1 or 4 points, so every
        // sub-geometry slice's point count is either 1 or 4 -- and since
        // the D=1 table is empty, both map to the -1 sentinel.
        for class in &classes {
            for profile in &class.sub_geometry_profile {
                assert_eq!(profile.get(&-1).copied().unwrap_or(0), 4);
            }
        }
    }

    #[test]
    fn equal_fingerprints_compare_equal_regardless_of_axis_order() {
        let mut a = HyperplaneClass {
            num_points: 4,
            num_lines: 1,
            points_by_order: BTreeMap::new(),
            sub_geometry_profile: vec![
                BTreeMap::from([(0i64, 2usize), (-1, 2)]),
                BTreeMap::from([(-1i64, 4usize)]),
            ],
            count: 1,
        };
        let b = HyperplaneClass {
            sub_geometry_profile: vec![
                BTreeMap::from([(-1i64, 4usize)]),
                BTreeMap::from([(0i64, 2usize), (-1, 2)]),
            ],
            ..a.clone()
        };
        assert_eq!(a, b);

        a.sub_geometry_profile[0].insert(0, 3);
        assert_ne!(a, b);
    }

    #[test]
    fn dimension2_veldkamp_line_classes_are_nonempty() {
        let g1 = Geometry::dimension1();
        let g2 = g1.lift();
        let g3 = g2.lift();

        let v2 = hyperplane::brute_force(&g2);
        let mut lines2 = veldkamp::find_veldkamp_lines(&v2);
        veldkamp::distinguish(&mut lines2, &v2, &g3);

        let hyperplane_classes = classify_hyperplanes(&v2, &g2, &[]);
        let line_classes = classify_veldkamp_lines(&lines2, &v2, &g2, &hyperplane_classes);

        let total: usize = line_classes.iter().map(|c| c.count).sum();
        assert_eq!(total, lines2.projective.len() + lines2.exceptional.len());
        assert!(!line_classes.is_empty());
    }
}
