//! Uniform selection from a fixed set.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Pick one element uniformly at random. `None` when `items` is empty.
pub fn choose<'a, R: Rng, T>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Pick one variant of a non-empty enumerated set.
pub fn choose_variant<R: Rng, T: Copy>(rng: &mut R, variants: &'static [T]) -> T {
    debug_assert!(!variants.is_empty());
    variants[rng.random_range(0..variants.len())]
}
