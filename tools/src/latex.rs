//! Text and LaTeX-flavored rendering of the classification tables.
//!
//! Grounded on `LatexPrinter.hpp`'s per-dimension hyperplane/Veldkamp-line
//! table structure, but emitting a plain `tabular` body directly rather than
//! feeding a json-driven template engine: the picture-drawing half of the
//! original printer (the `document.tex` assembly with generated figures) is
//! out of scope here.

use std::fmt;

use segre::{HyperplaneTableRow, VeldkampLineTableRow};

/// Wraps a dimension's hyperplane table for either plain-text or LaTeX
/// rendering via [`fmt::Display`].
pub struct HyperplaneTable<'a> {
    pub dimension: usize,
    pub rows: &'a [HyperplaneTableRow],
    pub sub_geometries_number: usize,
}

impl fmt::Display for HyperplaneTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimension {} hyperplanes", self.dimension)?;
        write!(f, "points | lines | order")?;
        for axis in 0..self.sub_geometries_number {
            write!(f, " | D{axis}")?;
        }
        writeln!(f, " | count")?;

        for row in self.rows {
            write!(f, "{:>6} | {:>5} | ", row.points, row.lines)?;
            for (k, v) in &row.points_by_order {
                write!(f, "{k}:{v} ")?;
            }
            for axis in 0..self.sub_geometries_number {
                let profile = row.sub_geometries.get(axis);
                let full = profile.and_then(|p| p.get(&-1)).copied().unwrap_or(0);
                write!(f, "| {full} ")?;
            }
            writeln!(f, "| {}", row.count)?;
        }

        Ok(())
    }
}

/// Emits the same table as a LaTeX `tabular` environment.
pub fn hyperplane_table_tex(table: &HyperplaneTable<'_>) -> String {
    use fmt::Write as _;

    let mut columns = "rr".to_string();
    for _ in 0..table.sub_geometries_number {
        columns.push('r');
    }
    columns.push('r');

    let mut out = String::new();
    let _ = writeln!(out, "% Dimension {} hyperplanes", table.dimension);
    let _ = writeln!(out, "\\begin{{tabular}}{{{columns}}}");
    let _ = write!(out, "Points & Lines");
    for axis in 0..table.sub_geometries_number {
        let _ = write!(out, " & $D_{axis}$");
    }
    let _ = writeln!(out, " & Count \\\\");

    for row in table.rows {
        let _ = write!(out, "{} & {}", row.points, row.lines);
        for axis in 0..table.sub_geometries_number {
            let full = row.sub_geometries.get(axis).and_then(|p| p.get(&-1)).copied().unwrap_or(0);
            let _ = write!(out, " & {full}");
        }
        let _ = writeln!(out, " & {} \\\\", row.count);
    }
    let _ = writeln!(out, "\\end{{tabular}}");
    out
}

/// Wraps a dimension's Veldkamp-line table for plain-text rendering.
pub struct VeldkampLineTable<'a> {
    pub dimension: usize,
    pub rows: &'a [VeldkampLineTableRow],
}

impl fmt::Display for VeldkampLineTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dimension {} Veldkamp lines", self.dimension)?;
        writeln!(f, "projective | core points | core lines | composition | count")?;
        for row in self.rows {
            write!(f, "{:>10} | {:>11} | {:>10} | ", row.is_projective, row.core_points, row.core_lines)?;
            for (class, amount) in &row.points_type {
                write!(f, "H{class}:{amount} ")?;
            }
            writeln!(f, "| {}", row.count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn hyperplane_table_renders_one_line_per_row() {
        let rows = vec![HyperplaneTableRow {
            points: 4,
            lines: 1,
            points_by_order: BTreeMap::new(),
            sub_geometries: vec![BTreeMap::from([(-1i64, 4usize)])],
            count: 2,
        }];
        let table = HyperplaneTable {
            dimension: 2,
            rows: &rows,
            sub_geometries_number: 1,
        };
        let rendered = format!("{table}");
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.contains("| 2"));
    }

    #[test]
    fn tex_rendering_wraps_a_tabular_environment() {
        let rows = vec![];
        let table = HyperplaneTable {
            dimension: 3,
            rows: &rows,
            sub_geometries_number: 0,
        };
        let tex = hyperplane_table_tex(&table);
        assert!(tex.contains("\\begin{tabular}"));
        assert!(tex.contains("\\end{tabular}"));
    }
}
