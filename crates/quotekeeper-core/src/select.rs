//! Random selection over a filtered pool of quotes.

use crate::Quote;

/// Sentinel filter value meaning "no category filter".
pub const ALL_CATEGORY: &str = "all";

/// Pick a quote uniformly at random over the pool's indices.
///
/// Returns `None` on an empty pool; the caller renders an explicit
/// empty state instead of indexing out of bounds. The randomness source
/// does not need to be cryptographically strong.
pub fn pick_random<'a>(pool: &[&'a Quote]) -> Option<&'a Quote> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[fastrand::usize(..pool.len())])
}
