//! Lazy generators for combinations and permutations, used throughout the
//! geometric engine to enumerate pairs of hyperplanes, orderings of a
//! Veldkamp line, and (for the stabilizer utility) the full symmetry group
//! of a dimension.

mod combinations;
mod permutations;

pub use combinations::{binomial, Combinations};
pub use permutations::{MultiPermutations, Permutations};
