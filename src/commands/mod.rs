pub mod circuit;
pub mod stats;
pub mod train;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Seeded when a seed is known (flag or config), otherwise from OS entropy.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
