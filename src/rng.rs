//! Deterministic named randomness streams.
//!
//! Each consumer (tick systems, tile placement) draws from its own ChaCha8
//! stream whose seed is derived from the master seed and the stream name.
//! Streams are independent of the order in which they are first requested,
//! so adding a system never perturbs the draws of another.

use std::collections::BTreeMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct RngManager {
    master_seed: u64,
    streams: BTreeMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            streams: BTreeMap::new(),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn stream(&mut self, name: &str) -> SystemRng<'_> {
        let seed = derive_seed(self.master_seed, name);
        let inner = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
        SystemRng { inner }
    }
}

/// FNV-style fold of the stream name into the master seed.
fn derive_seed(master: u64, name: &str) -> u64 {
    let mut seed = master ^ 0x9e37_79b9_7f4a_7c15;
    for byte in name.bytes() {
        seed ^= byte as u64;
        seed = seed.wrapping_mul(0x0000_0100_0000_01b3);
    }
    seed
}

pub struct SystemRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl<'a> RngCore for SystemRng<'a> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_draws() {
        let mut a = RngManager::new(42);
        let mut b = RngManager::new(42);
        let x: f64 = a.stream("upgrade").gen();
        let y: f64 = b.stream("upgrade").gen();
        assert_eq!(x, y);
    }

    #[test]
    fn streams_are_independent_of_request_order() {
        let mut a = RngManager::new(7);
        let mut b = RngManager::new(7);
        let a_first: u64 = a.stream("alpha").gen();
        let _: u64 = b.stream("beta").gen();
        let b_second: u64 = b.stream("alpha").gen();
        assert_eq!(a_first, b_second);
    }

    #[test]
    fn different_names_diverge() {
        let mut manager = RngManager::new(7);
        let x: u64 = manager.stream("alpha").gen();
        let y: u64 = manager.stream("beta").gen();
        assert_ne!(x, y);
    }

    #[test]
    fn streams_advance_across_calls() {
        let mut manager = RngManager::new(7);
        let x: u64 = manager.stream("alpha").gen();
        let y: u64 = manager.stream("alpha").gen();
        assert_ne!(x, y);
    }
}
