//! Ambient stack around the `segre` core: text/LaTeX rendering of the
//! classification tables produced by the library. No argument parsing or
//! I/O lives here; that belongs to the `segre-report` binary.

pub mod latex;
