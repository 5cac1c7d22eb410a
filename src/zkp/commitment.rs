//! The Schnorr-style multi-base commitment shared by VC1 and VC2: a
//! commitment point plus one response scalar per secret/base pair.

use ark_bls12_381::{G1Affine, G1Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::error::{Error, Result};

/// A Schnorr-style commitment over an arbitrary number of `(base, secret)`
/// pairs: one group commitment point and one response scalar per pair.
#[derive(Clone, Debug, PartialEq)]
pub struct SchnorrCommitment {
    pub(crate) t: G1Projective,
    pub(crate) responses: Vec<ark_bls12_381::Fr>,
}

impl SchnorrCommitment {
    /// Serialize as `T(48B) || len(4B LE) || responses(32B each)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(48 + 4 + 32 * self.responses.len());
        let t: G1Affine = self.t.into_affine();
        t.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        bytes.extend_from_slice(&(self.responses.len() as u32).to_le_bytes());
        for r in &self.responses {
            r.serialize_compressed(&mut bytes)
                .map_err(|_| Error::SerializationError)?;
        }
        Ok(bytes)
    }

    /// Parse a [`SchnorrCommitment`] starting at `bytes[0]`, returning the
    /// value and the number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize)> {
        if bytes.len() < 48 + 4 {
            return Err(Error::ParseError);
        }
        let t = G1Affine::deserialize_compressed(&bytes[0..48])
            .map_err(|_| Error::DeserializationError)?
            .into_group();
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[48..52]);
        let len = u32::from_le_bytes(len_bytes) as usize;
        let mut offset = 52;
        let mut responses = Vec::with_capacity(len);
        for _ in 0..len {
            if offset + 32 > bytes.len() {
                return Err(Error::ParseError);
            }
            responses.push(
                ark_bls12_381::Fr::deserialize_compressed(&bytes[offset..offset + 32])
                    .map_err(|_| Error::DeserializationError)?,
            );
            offset += 32;
        }
        Ok((SchnorrCommitment { t, responses }, offset))
    }
}
