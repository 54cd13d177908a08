//! Deterministic random streams for round generation.
//!
//! Every simulated round owns its own [`RoundRng`], derived from the
//! run's master seed plus the (mode, bucket, attempt) coordinates of the
//! round. Streams are never shared between rounds or threads, so a batch
//! produces identical results whether it runs serially or on a rayon
//! pool, and a single failing round can be re-derived from its
//! coordinates alone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A seedable, derivable random stream for one round.
#[derive(Clone, Debug)]
pub struct RoundRng {
    inner: ChaCha8Rng,
}

impl RoundRng {
    /// Derive the stream for one (mode, bucket, attempt) coordinate.
    ///
    /// The coordinates are mixed into the ChaCha key directly; distinct
    /// coordinates yield statistically independent streams.
    pub fn new(master_seed: u64, mode: u32, bucket: u32, attempt: u64) -> Self {
        let mut seed = [0u8; 32];
        seed[..8].copy_from_slice(&master_seed.to_le_bytes());
        seed[8..12].copy_from_slice(&mode.to_le_bytes());
        seed[12..16].copy_from_slice(&bucket.to_le_bytes());
        seed[16..24].copy_from_slice(&attempt.to_le_bytes());
        Self {
            inner: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Stream at coordinate origin; convenient for tests and one-off rounds.
    pub fn from_seed_value(master_seed: u64) -> Self {
        Self::new(master_seed, 0, 0, 0)
    }

    /// Uniform stop index on a strip of the given length.
    pub fn stop(&mut self, strip_len: usize) -> usize {
        self.inner.gen_range(0..strip_len)
    }

    /// Bernoulli draw with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.gen::<f64>() < p
    }

    /// Uniform value in `lo..=hi`.
    pub fn range(&mut self, lo: u8, hi: u8) -> u8 {
        self.inner.gen_range(lo..=hi)
    }

    /// Uniform index below `len`.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }

    /// Weighted pick: returns an index into `weights` with probability
    /// proportional to its weight. Weights must not all be zero.
    pub fn pick_weighted(&mut self, weights: &[u32]) -> usize {
        let total: u64 = weights.iter().map(|&w| w as u64).sum();
        let mut draw = self.inner.gen_range(0..total);
        for (i, &w) in weights.iter().enumerate() {
            let w = w as u64;
            if draw < w {
                return i;
            }
            draw -= w;
        }
        weights.len() - 1
    }
}
