//! Seeded random number generation.
//!
//! A single master seed derives an independent ChaCha8 stream per named
//! system, so one system's roll count never perturbs another's and tests can
//! pin exact outcomes by seeding the engine.

use std::collections::HashMap;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master: ChaCha8Rng,
    streams: HashMap<&'static str, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master: ChaCha8Rng::seed_from_u64(seed),
            streams: HashMap::new(),
        }
    }

    /// Get the stream for a named system, deriving it from the master seed
    /// on first use. Streams derive in first-use order, so a fixed system
    /// ordering yields fixed streams.
    pub fn stream(&mut self, name: &'static str) -> SystemRng<'_> {
        let master = &mut self.master;
        let entry = self.streams.entry(name).or_insert_with(|| {
            let mut seed = [0u8; 32];
            master.fill_bytes(&mut seed);
            ChaCha8Rng::from_seed(seed)
        });
        SystemRng { inner: entry }
    }
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl SystemRng<'_> {
    /// Roll once against a probability in [0, 1].
    pub fn chance(&mut self, probability: f64) -> bool {
        self.inner.gen::<f64>() < probability
    }
}

impl RngCore for SystemRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}
