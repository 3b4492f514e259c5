//! Lazy permutation generators.
//!
//! `Permutations` yields the `n!` permutations of `[0, n)` in lexicographic
//! order using the standard "next permutation" algorithm, starting from the
//! identity permutation (which is what the reference generator calls its
//! initial state). `MultiPermutations` is the cartesian product of several
//! `Permutations` generators, used by the stabilizer utility (see
//! [`crate::stabilizer`]) to enumerate the full coordinate-and-axis symmetry
//! group of a dimension.

/// Lazily yields the `n!` permutations of `{0, ..., n-1}` in lexicographic
/// order.
pub struct Permutations {
    current: Vec<u32>,
    remaining: u64,
    total: u64,
    started: bool,
}

impl Permutations {
    pub fn new(n: u32) -> Self {
        let total = factorial(n);
        Permutations {
            current: (0..n).collect(),
            remaining: total,
            total,
            started: false,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Returns the next permutation as a borrowed slice, or `None` once all
    /// `n!` permutations have been produced.
    pub fn next_permutation(&mut self) -> Option<&[u32]> {
        if self.remaining == 0 {
            return None;
        }

        if !self.started {
            self.started = true;
            self.remaining -= 1;
            return Some(&self.current);
        }

        if !advance_to_next_permutation(&mut self.current) {
            self.remaining = 0;
            return None;
        }

        self.remaining -= 1;
        Some(&self.current)
    }
}

/// In-place replacement of `perm` with its lexicographically next
/// permutation. Returns `false` if `perm` was already the last (fully
/// descending) permutation.
fn advance_to_next_permutation(perm: &mut [u32]) -> bool {
    if perm.len() < 2 {
        return false;
    }

    let mut i = perm.len() - 1;
    while i > 0 && perm[i - 1] >= perm[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let pivot = i - 1;
    let mut j = perm.len() - 1;
    while perm[j] <= perm[pivot] {
        j -= 1;
    }
    perm.swap(pivot, j);
    perm[i..].reverse();
    true
}

fn factorial(n: u32) -> u64 {
    (1..=n as u64).product()
}

/// The cartesian product of `Permutations(n_1), ..., Permutations(n_m)`.
pub struct MultiPermutations {
    generators: Vec<Permutations>,
    current: Vec<Vec<u32>>,
    remaining: u64,
    started: bool,
}

impl MultiPermutations {
    pub fn new(sizes: &[u32]) -> Self {
        let generators: Vec<_> = sizes.iter().map(|&n| Permutations::new(n)).collect();
        let total = generators.iter().map(|g| g.total()).product();
        let current = sizes.iter().map(|&n| (0..n).collect()).collect();
        MultiPermutations {
            generators,
            current,
            remaining: total,
            started: false,
        }
    }

    pub fn total(&self) -> u64 {
        self.generators.iter().map(|g| g.total()).product()
    }

    /// Advances every axis's generator in an odometer fashion: the last axis
    /// cycles fastest, carrying into the previous axis on wraparound.
    pub fn next_permutation(&mut self) -> Option<&[Vec<u32>]> {
        if self.remaining == 0 {
            return None;
        }

        if !self.started {
            self.started = true;
            for (axis, gen) in self.generators.iter_mut().enumerate() {
                self.current[axis] = gen.next_permutation().unwrap().to_vec();
            }
            self.remaining -= 1;
            return Some(&self.current);
        }

        let mut axis = self.generators.len();
        loop {
            if axis == 0 {
                self.remaining = 0;
                return None;
            }
            axis -= 1;

            if let Some(next) = self.generators[axis].next_permutation() {
                self.current[axis] = next.to_vec();
                break;
            }

            self.generators[axis] = Permutations::new(self.current[axis].len() as u32);
            self.current[axis] = self.generators[axis].next_permutation().unwrap().to_vec();
        }

        self.remaining -= 1;
        Some(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_all_permutations_of_three() {
        let mut gen = Permutations::new(3);
        let mut seen = Vec::new();
        while let Some(p) = gen.next_permutation() {
            seen.push(p.to_vec());
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], vec![0, 1, 2]);
        assert_eq!(seen.last().unwrap(), &vec![2, 1, 0]);

        let mut dedup = seen.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 6);
    }

    #[test]
    fn four_element_permutations_count_24() {
        let mut gen = Permutations::new(4);
        let mut count = 0;
        while gen.next_permutation().is_some() {
            count += 1;
        }
        assert_eq!(count, 24);
    }

    #[test]
    fn multi_permutations_total_is_product_of_factorials() {
        let gen = MultiPermutations::new(&[2, 3]);
        assert_eq!(gen.total(), 2 * 6);
    }

    #[test]
    fn multi_permutations_enumerates_cartesian_product() {
        let mut gen = MultiPermutations::new(&[2, 2]);
        let mut seen = Vec::new();
        while let Some(step) = gen.next_permutation() {
            seen.push(step.to_vec());
        }
        assert_eq!(seen.len(), 4);
        let mut dedup = seen.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), 4);
    }
}
