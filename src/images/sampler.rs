//! Random selection helpers
//!
//! Randomness is always supplied by the caller so selections can be
//! reproduced with a seeded generator.

use std::collections::HashSet;
use std::hash::Hash;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use super::ImageError;

/// Pick one element uniformly at random
pub fn pick_one<'a, T, R>(items: &'a [T], rng: &mut R) -> Result<&'a T, ImageError>
where
    R: Rng + ?Sized,
{
    items.choose(rng).ok_or(ImageError::EmptyPool)
}

/// Pick `count` elements with pairwise distinct keys
///
/// Duplicate keys collapse to their first occurrence before sampling.
/// Fails up front when fewer than `count` distinct keys exist. The result
/// is in selection order.
pub fn pick_distinct<'a, T, K, F, R>(
    items: &'a [T],
    count: usize,
    key: F,
    rng: &mut R,
) -> Result<Vec<&'a T>, ImageError>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    R: Rng + ?Sized,
{
    let mut seen = HashSet::with_capacity(items.len());
    let mut candidates: Vec<&T> = items.iter().filter(|item| seen.insert(key(*item))).collect();

    if count > candidates.len() {
        return Err(ImageError::NotEnoughImages {
            requested: count,
            available: candidates.len(),
        });
    }

    candidates.shuffle(rng);
    candidates.truncate(count);
    Ok(candidates)
}
