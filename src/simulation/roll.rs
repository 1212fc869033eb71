//! Random draws shared by every simulation stage
//!
//! All draws go through a caller-supplied `Rng`, so a seeded generator replays a run.

use rand::Rng;

/// Uniform draw in `[0, n)`; zero when `n` is not positive
pub fn rand_below<R: Rng + ?Sized>(rng: &mut R, n: i64) -> i64 {
    if n <= 0 {
        0
    } else {
        rng.gen_range(0..n)
    }
}

/// Inclusive draw in `[min, max]`; `min` when the interval is empty
pub fn roll_interval<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min >= max {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Cumulative-weight scan against one uniform draw over the total weight
///
/// Negative weights count as zero. Returns `None` when the total weight is zero.
/// Totals past `i64::MAX` saturate, so later weights lose share instead of wrapping.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[i64]) -> Option<usize> {
    let total = weights
        .iter()
        .fold(0i64, |acc, w| acc.saturating_add((*w).max(0)));
    if total <= 0 {
        return None;
    }

    let roll = rand_below(rng, total);
    let mut running = 0i64;
    for (i, weight) in weights.iter().enumerate() {
        running = running.saturating_add((*weight).max(0));
        if roll < running {
            return Some(i);
        }
    }
    None
}
