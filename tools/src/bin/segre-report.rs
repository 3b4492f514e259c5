//! Drives the hyperplane/Veldkamp-line pipeline over dimensions 2, 3 and 4,
//! times each phase, and renders the resulting classification tables.
//!
//! Grounded on the teacher's `tools/src/bin/apply-part.rs` for the
//! `getopts` + `anyhow::Context` CLI shape, and on `part-bench`'s use of
//! `tracing` spans to time phases of a pipeline.

use std::env;
use std::fs;
use std::io::Write as _;

use anyhow::Context as _;
use anyhow::Result;

use segre::{DimensionResult, HyperplaneTableRow, VeldkampLineTableRow};
use segre_tools::latex;

const USAGE: &str = "Usage: segre-report [options]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Latex,
    Json,
}

fn main() -> Result<()> {
    let mut options = getopts::Options::new();
    options.optflag("h", "help", "print this help menu");
    options.optflag("", "version", "print version information");
    options.optopt(
        "d",
        "dimension",
        "highest dimension to run, one of 2, 3 or 4 (default: 4)",
        "D",
    );
    options.optopt(
        "f",
        "format",
        "output format: text (default), latex or json",
        "FORMAT",
    );
    options.optopt("o", "output", "write the report to FILE instead of stdout", "FILE");

    let matches = options.parse(env::args().skip(1)).context("failed to parse arguments")?;

    if matches.opt_present("h") {
        println!("{}", options.usage(USAGE));
        return Ok(());
    }
    if matches.opt_present("version") {
        println!("segre-report version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    let max_dimension: usize = matches
        .opt_get_default("d", 4)
        .context("invalid value for option 'dimension'")?;
    if !(2..=4).contains(&max_dimension) {
        anyhow::bail!("dimension must be 2, 3 or 4, got {max_dimension}\n\n{}", options.usage(USAGE));
    }

    let format = match matches.opt_str("f").as_deref() {
        None | Some("text") => Format::Text,
        Some("latex") => Format::Latex,
        Some("json") => Format::Json,
        Some(other) => anyhow::bail!("unknown format {other:?}, expected text, latex or json"),
    };

    let report = run_report(max_dimension)?;

    let mut out: Box<dyn std::io::Write> = match matches.opt_str("o") {
        Some(path) => Box::new(fs::File::create(&path).with_context(|| format!("failed to create {path:?}"))?),
        None => Box::new(std::io::stdout()),
    };

    render(&report, format, &mut *out)?;
    Ok(())
}

/// One dimension's worth of tables, in the shape the renderer and the JSON
/// dump both consume.
struct DimensionReport {
    dimension: usize,
    hyperplanes: Vec<HyperplaneTableRow>,
    veldkamp_lines: Option<Vec<VeldkampLineTableRow>>,
}

#[tracing::instrument]
fn run_report(max_dimension: usize) -> Result<Vec<DimensionReport>> {
    let mut prev: Option<DimensionResult> = None;
    let mut reports = Vec::new();

    for d in 2..=max_dimension {
        let started = std::time::Instant::now();
        let result = segre::run_dimension(d, prev.as_ref()).with_context(|| format!("failed to run dimension {d}"))?;
        tracing::info!(dimension = d, elapsed = ?started.elapsed(), "ran dimension");

        reports.push(DimensionReport {
            dimension: result.dimension,
            hyperplanes: result.hyperplane_table(),
            veldkamp_lines: result.veldkamp_line_table(),
        });
        prev = Some(result);
    }

    Ok(reports)
}

fn render(reports: &[DimensionReport], format: Format, out: &mut dyn std::io::Write) -> Result<()> {
    match format {
        Format::Text => {
            for report in reports {
                let sub_geometries_number = report.dimension;
                let table = latex::HyperplaneTable {
                    dimension: report.dimension,
                    rows: &report.hyperplanes,
                    sub_geometries_number,
                };
                writeln!(out, "{table}")?;

                if let Some(rows) = &report.veldkamp_lines {
                    let table = latex::VeldkampLineTable {
                        dimension: report.dimension,
                        rows,
                    };
                    writeln!(out, "{table}")?;
                }
            }
        }
        Format::Latex => {
            for report in reports {
                let sub_geometries_number = report.dimension;
                let table = latex::HyperplaneTable {
                    dimension: report.dimension,
                    rows: &report.hyperplanes,
                    sub_geometries_number,
                };
                writeln!(out, "{}", latex::hyperplane_table_tex(&table))?;
            }
        }
        Format::Json => {
            #[derive(serde::Serialize)]
            struct JsonDimension<'a> {
                dimension: usize,
                hyperplanes: &'a [HyperplaneTableRow],
                veldkamp_lines: &'a Option<Vec<VeldkampLineTableRow>>,
            }

            let payload: Vec<JsonDimension> = reports
                .iter()
                .map(|r| JsonDimension {
                    dimension: r.dimension,
                    hyperplanes: &r.hyperplanes,
                    veldkamp_lines: &r.veldkamp_lines,
                })
                .collect();

            serde_json::to_writer_pretty(out, &payload).context("failed to serialize report as JSON")?;
        }
    }
    Ok(())
}
