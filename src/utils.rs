//! Shared scalar-field helpers: Lagrange interpolation at 0, and the
//! Fiat-Shamir challenge hash used by the zero-knowledge proof layer.

use ark_bls12_381::Fr;
use ark_ff::{BigInteger, Field, PrimeField};
use blake2::{digest::consts::U32, Blake2b, Digest};

use crate::error::{Error, Result};

/// BLAKE2b with a 32-byte output, as required by the Fiat-Shamir challenge hash.
pub type Blake2b256 = Blake2b<U32>;

/// The Lagrange coefficient at 0 for index `my_index`, interpolated over `all_indices`.
///
/// `L(j) = prod_{k in S, k != j} (-k) * (j - k)^-1`
pub fn lagrange_coefficient(my_index: u32, all_indices: &[u32]) -> Result<Fr> {
    for (pos, &i) in all_indices.iter().enumerate() {
        if all_indices[..pos].contains(&i) {
            return Err(Error::DuplicateShares);
        }
    }

    let mut numerator = Fr::ONE;
    let mut denominator = Fr::ONE;

    let my_index_field = Fr::from(my_index);

    for &j in all_indices.iter() {
        if j == my_index {
            continue;
        }
        let s = Fr::from(j);

        numerator *= s;
        denominator *= s - my_index_field;
    }

    if denominator == Fr::ZERO {
        return Err(Error::DuplicateShares);
    }

    Ok(numerator * denominator.inverse().ok_or(Error::DuplicateShares)?)
}

/// Reconstruct a secret shared via a degree `t - 1` Shamir sharing, given shares
/// at `t` of the `n` evaluation points `1..=n`.
pub fn lagrange_reconstruct(indices: &[u32], shares: &[Fr]) -> Result<Fr> {
    debug_assert_eq!(indices.len(), shares.len());
    let mut acc = Fr::ZERO;
    for (&i, &share) in indices.iter().zip(shares.iter()) {
        acc += lagrange_coefficient(i, indices)? * share;
    }
    Ok(acc)
}

/// Hash an arbitrary byte string to a scalar in Fr using BLAKE2b-256, reduced
/// modulo the field order (big-endian, per the wire format's convention).
pub fn hash_to_fr(bytes: &[u8]) -> Fr {
    let mut hasher = Blake2b256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    Fr::from_be_bytes_mod_order(&digest)
}

/// Encode a nonce for inclusion in the Fiat-Shamir challenge: raw nonce bytes
/// are hashed to Fr, then that scalar is serialized to its canonical 32-byte
/// big-endian encoding.
pub fn encode_nonce(nonce: &[u8]) -> [u8; 32] {
    let scalar = hash_to_fr(nonce);
    let mut out = [0u8; 32];
    let bytes = scalar.into_bigint().to_bytes_be();
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
