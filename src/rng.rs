//! Deterministic RNG seeding.
//!
//! The core never reaches for a global or thread-local RNG: every function
//! that consumes randomness takes an explicit `RngCore + CryptoRng` handle.
//! This module only provides the one deterministic derivation the source
//! scenarios rely on: turning a 16-byte seed into a reproducible CSPRNG for
//! generator/key derivation.

use rand::{rngs::StdRng, SeedableRng};

/// A 16-byte seed, as used by `generate_public_key(seed, sk, L)` and the
/// seeded end-to-end test scenarios.
pub type Seed = [u8; 16];

/// Derive a deterministic CSPRNG from a 16-byte seed.
///
/// Only the first 8 bytes are used, interpreted big-endian, per the source's
/// seeding convention. This is a reproducibility aid for generator and
/// parameter derivation, not a substitute for a live CSPRNG when drawing
/// per-signature blinding values.
pub fn rng_from_seed(seed: &Seed) -> StdRng {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&seed[..8]);
    StdRng::seed_from_u64(u64::from_be_bytes(buf))
}
