// src/transform/priority.rs
//! Priority merge with de-duplication: rank candidates, then keep the first
//! occurrence per key. Identity canonicalisation, email selection and tag
//! de-duplication are all expressed with these two functions.

use std::collections::HashSet;
use std::hash::Hash;

/// Keep the first item seen for each key, in input order, stopping once
/// `limit` items have been kept.
pub fn first_unique_by<T, K, F>(items: impl IntoIterator<Item = T>, mut key: F, limit: Option<usize>) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if limit.is_some_and(|n| out.len() >= n) {
            break;
        }
        if seen.insert(key(&item)) {
            out.push(item);
        }
    }
    out
}

/// Stable-sort `items` by `rank` (lowest first) and keep the best item per key.
/// Items of equal rank keep their input order, so the earliest wins a tie.
pub fn best_by_rank<T, K, R, FK, FR>(mut items: Vec<T>, key: FK, mut rank: FR) -> Vec<T>
where
    K: Eq + Hash,
    R: Ord,
    FK: FnMut(&T) -> K,
    FR: FnMut(&T) -> R,
{
    items.sort_by_cached_key(|item| rank(item));
    first_unique_by(items, key, None)
}
