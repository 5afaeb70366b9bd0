//! Seed hierarchy for reproducible rounds.
//!
//! A master seed expands into one sub-seed per `(ticker, generation)` via
//! BLAKE3. Derivation is hash-based rather than sequential, so the round picked
//! for a given load does not depend on how many draws earlier loads made.

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for one load of `ticker`.
    pub fn sub_seed(&self, ticker: &str, generation: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(ticker.as_bytes());
        hasher.update(&generation.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    pub fn rng_for(&self, ticker: &str, generation: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(ticker, generation))
    }
}

/// Where round randomness comes from.
#[derive(Debug, Clone)]
pub enum RngSource {
    /// Fresh OS entropy for every load.
    Entropy,
    /// Reproducible rounds derived from a master seed.
    Seeded(SeedHierarchy),
}

impl RngSource {
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => RngSource::Seeded(SeedHierarchy::new(seed)),
            None => RngSource::Entropy,
        }
    }

    pub fn rng_for(&self, ticker: &str, generation: u64) -> StdRng {
        match self {
            RngSource::Entropy => StdRng::from_entropy(),
            RngSource::Seeded(hierarchy) => hierarchy.rng_for(ticker, generation),
        }
    }
}
