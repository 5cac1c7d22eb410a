//! The randomised-signature proof of knowledge: wire format and the shared
//! Fiat-Shamir challenge derivation used by both prover and verifier.

use ark_bls12_381::{Fr, G1Affine, G1Projective};
use ark_ec::CurveGroup;
use ark_serialize::CanonicalSerialize;

use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::utils::hash_to_fr;
use crate::zkp::commitment::SchnorrCommitment;

/// A proof of knowledge of a BBS+ signature on a message vector, selectively
/// disclosing a subset of the messages.
#[derive(Clone, Debug, PartialEq)]
pub struct Proof {
    pub(crate) a_prime: G1Projective,
    pub(crate) a_bar: G1Projective,
    pub(crate) d: G1Projective,
    pub(crate) vc1: SchnorrCommitment,
    pub(crate) vc2: SchnorrCommitment,
}

/// A full disclosure payload: the message count, the set of revealed
/// indices, and the [`Proof`] itself.
#[derive(Clone, Debug, PartialEq)]
pub struct PokPayload {
    pub message_count: usize,
    pub revealed: Vec<usize>,
    pub proof: Proof,
}

fn bitvector_len(message_count: usize) -> usize {
    message_count.div_ceil(8) + 1
}

impl PokPayload {
    /// Serialize as `L(2B BE) || bitvector(ceil(L/8)+1 B) || A'(48) || Ā(48) || d(48) || VC1 || VC2`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.message_count > u16::MAX as usize {
            return Err(Error::InvalidMessageCount {
                expected: u16::MAX as usize,
                actual: self.message_count,
            });
        }
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(self.message_count as u16).to_be_bytes());

        let mut bitvector = vec![0u8; bitvector_len(self.message_count)];
        for &i in &self.revealed {
            if i >= self.message_count {
                return Err(Error::InvalidSignerIndex(i as u32));
            }
            bitvector[i / 8] |= 0x80 >> (i % 8);
        }
        bytes.extend_from_slice(&bitvector);

        for point in [&self.proof.a_prime, &self.proof.a_bar, &self.proof.d] {
            let affine: G1Affine = point.into_affine();
            affine
                .serialize_compressed(&mut bytes)
                .map_err(|_| Error::SerializationError)?;
        }
        bytes.extend_from_slice(&self.proof.vc1.to_bytes()?);
        bytes.extend_from_slice(&self.proof.vc2.to_bytes()?);
        Ok(bytes)
    }

    /// Deserialize a [`PokPayload`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::ParseError);
        }
        let mut len_bytes = [0u8; 2];
        len_bytes.copy_from_slice(&bytes[0..2]);
        let message_count = u16::from_be_bytes(len_bytes) as usize;

        let bv_len = bitvector_len(message_count);
        if bytes.len() < 2 + bv_len {
            return Err(Error::ParseError);
        }
        let bitvector = &bytes[2..2 + bv_len];
        let mut revealed = Vec::new();
        for i in 0..message_count {
            if bitvector[i / 8] & (0x80 >> (i % 8)) != 0 {
                revealed.push(i);
            }
        }

        let mut offset = 2 + bv_len;
        let read_point = |bytes: &[u8], offset: &mut usize| -> Result<G1Projective> {
            use ark_ec::AffineRepr as _;
            use ark_serialize::CanonicalDeserialize;
            if *offset + 48 > bytes.len() {
                return Err(Error::ParseError);
            }
            let affine = G1Affine::deserialize_compressed(&bytes[*offset..*offset + 48])
                .map_err(|_| Error::DeserializationError)?;
            *offset += 48;
            Ok(affine.into_group())
        };

        let a_prime = read_point(bytes, &mut offset)?;
        let a_bar = read_point(bytes, &mut offset)?;
        let d = read_point(bytes, &mut offset)?;

        let (vc1, consumed1) = SchnorrCommitment::from_bytes(&bytes[offset..])?;
        offset += consumed1;
        let (vc2, consumed2) = SchnorrCommitment::from_bytes(&bytes[offset..])?;
        offset += consumed2;

        if offset != bytes.len() {
            return Err(Error::ParseError);
        }

        Ok(PokPayload {
            message_count,
            revealed,
            proof: Proof {
                a_prime,
                a_bar,
                d,
                vc1,
                vc2,
            },
        })
    }
}

/// Indices in `[0, message_count)` not present in `revealed`, ascending.
pub(crate) fn hidden_indices(message_count: usize, revealed: &[usize]) -> Vec<usize> {
    (0..message_count)
        .filter(|i| !revealed.contains(i))
        .collect()
}

/// Derive the Fiat-Shamir challenge from the transcript `Ā || A' || H0 || T1
/// || d || H0 || {H_i}_{i not in R} || T2`, followed by the nonce reduced to
/// its canonical Fr encoding.
#[allow(clippy::too_many_arguments)]
pub(crate) fn derive_challenge(
    a_bar: &G1Projective,
    a_prime: &G1Projective,
    h0: &G1Projective,
    t1: &G1Projective,
    d: &G1Projective,
    hidden_bases: &[G1Projective],
    t2: &G1Projective,
    nonce: &[u8],
) -> Result<Fr> {
    let mut bytes = Vec::new();
    let push_point = |p: &G1Projective, bytes: &mut Vec<u8>| -> Result<()> {
        let affine: G1Affine = p.into_affine();
        affine
            .serialize_compressed(bytes)
            .map_err(|_| Error::SerializationError)
    };
    push_point(a_bar, &mut bytes)?;
    push_point(a_prime, &mut bytes)?;
    push_point(h0, &mut bytes)?;
    push_point(t1, &mut bytes)?;
    push_point(d, &mut bytes)?;
    push_point(h0, &mut bytes)?;
    for base in hidden_bases {
        push_point(base, &mut bytes)?;
    }
    push_point(t2, &mut bytes)?;

    bytes.extend_from_slice(&crate::utils::encode_nonce(nonce));
    Ok(hash_to_fr(&bytes))
}

/// Hidden bases for VC2, `(d, H0, {H_i}_{i not in R})`, matching the base
/// order used in both challenge derivation and the linear-combination checks.
pub(crate) fn vc2_bases(pk: &PublicKey, d: &G1Projective, hidden: &[usize]) -> Vec<G1Projective> {
    let mut bases = Vec::with_capacity(2 + hidden.len());
    bases.push(*d);
    bases.push(pk.h0());
    for &i in hidden {
        bases.push(pk.h()[i]);
    }
    bases
}
