//! Lexicographic permutations of `0..n`.
//!
//! Both exhaustive searches in the workspace (the per-agent route planner and
//! the greedy batch search) enumerate orderings through this iterator.  The
//! order is lexicographic over indices, so "first minimum wins" is a
//! well-defined tie-break: the lexicographically smallest minimising order.

/// Iterator over all `n!` permutations of `0..n` in lexicographic order.
///
/// `Permutations::new(0)` yields exactly one (empty) permutation.
#[derive(Debug, Clone)]
pub struct Permutations {
    current: Vec<usize>,
    done:    bool,
}

impl Permutations {
    pub fn new(n: usize) -> Self {
        Self {
            current: (0..n).collect(),
            done:    false,
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let out = self.current.clone();
        self.done = !next_permutation(&mut self.current);
        Some(out)
    }
}

/// Step `v` to its lexicographic successor in place.
///
/// Returns `false` (leaving `v` untouched) when `v` is already the last
/// permutation.
pub fn next_permutation(v: &mut [usize]) -> bool {
    if v.len() < 2 {
        return false;
    }
    // Longest non-increasing suffix starts at `i`.
    let mut i = v.len() - 1;
    while i > 0 && v[i - 1] >= v[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let pivot = i - 1;
    let mut j = v.len() - 1;
    while v[j] <= v[pivot] {
        j -= 1;
    }
    v.swap(pivot, j);
    v[i..].reverse();
    true
}
