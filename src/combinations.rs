use itertools::Itertools;

/// Returns every non-empty subsequence of `items`.
///
/// For an input of length `n` the result holds `2^n − 1` subsequences, each
/// preserving the relative order of `items`. The first emitted subsequence
/// is the singleton `[items[0]]` and the last is the full input. Because
/// order is preserved, the subsequences that begin with a given element are
/// exactly those whose first entry equals it; callers rely on that to select
/// the subsets anchored at a particular item.
///
/// Empty input yields an empty vector.
pub fn combinations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    items
        .iter()
        .cloned()
        .powerset()
        .filter(|subset| !subset.is_empty())
        .collect()
}
