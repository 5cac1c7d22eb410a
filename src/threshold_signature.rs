//! Partial and combined threshold BBS+ signatures, direct single-key signing,
//! and pairing-based verification.

use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{Field, UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::keys::{PublicKey, SecretKey};
use crate::live_presignature::LivePreSignature;

/// Compute `g1 * H0^s * prod(H_i^m_i)` for a message vector of the public
/// key's expected length.
fn compute_b(pk: &PublicKey, s: Fr, messages: &[Fr]) -> Result<G1Projective> {
    if messages.len() != pk.message_count() {
        return Err(Error::InvalidMessageCount {
            expected: pk.message_count(),
            actual: messages.len(),
        });
    }
    let mut b = G1Projective::generator() + pk.h0() * s;
    for (h_i, m_i) in pk.h().iter().zip(messages.iter()) {
        b += *h_i * m_i;
    }
    Ok(b)
}

/// Compute `g1 * prod(H_i^m_i)`, the message-only term with no `H0^s`
/// blinding contribution. Used for partial signing: the blinding term is
/// folded in separately through each signer's `alpha` share (see
/// [`PartialThresholdSignature::new`]).
fn compute_b_unblinded(pk: &PublicKey, messages: &[Fr]) -> Result<G1Projective> {
    if messages.len() != pk.message_count() {
        return Err(Error::InvalidMessageCount {
            expected: pk.message_count(),
            actual: messages.len(),
        });
    }
    let mut b = G1Projective::generator();
    for (h_i, m_i) in pk.h().iter().zip(messages.iter()) {
        b += *h_i * m_i;
    }
    Ok(b)
}

/// One signer's contribution to a threshold signature over a message vector,
/// produced from its [`LivePreSignature`].
#[derive(Clone, Debug, PartialEq)]
pub struct PartialThresholdSignature {
    pub(crate) a_i: G1Projective,
    pub(crate) delta_i: Fr,
    pub(crate) e_i: Fr,
    pub(crate) s_i: Fr,
}

impl PartialThresholdSignature {
    /// Produce this party's partial signature over `messages` using its
    /// reconstructed [`LivePreSignature`] for this slot.
    pub fn new(messages: &[Fr], pk: &PublicKey, live: &LivePreSignature) -> Result<Self> {
        let b = compute_b_unblinded(pk, messages)?;
        let a_i = b * live.a + pk.h0() * live.alpha;
        Ok(PartialThresholdSignature {
            a_i,
            delta_i: live.delta,
            e_i: live.e,
            s_i: live.s,
        })
    }

    /// Serialize as `A_i(48B) || delta_i(32B) || e_i(32B) || s_i(32B)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(48 + 32 * 3);
        let a_i: G1Affine = self.a_i.into_affine();
        a_i.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        for scalar in [&self.delta_i, &self.e_i, &self.s_i] {
            scalar
                .serialize_compressed(&mut bytes)
                .map_err(|_| Error::SerializationError)?;
        }
        Ok(bytes)
    }

    /// Deserialize a [`PartialThresholdSignature`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 48 + 32 * 3 {
            return Err(Error::ParseError);
        }
        let a_i = G1Affine::deserialize_compressed(&bytes[0..48])
            .map_err(|_| Error::DeserializationError)?
            .into_group();
        let delta_i =
            Fr::deserialize_compressed(&bytes[48..80]).map_err(|_| Error::DeserializationError)?;
        let e_i =
            Fr::deserialize_compressed(&bytes[80..112]).map_err(|_| Error::DeserializationError)?;
        let s_i = Fr::deserialize_compressed(&bytes[112..144])
            .map_err(|_| Error::DeserializationError)?;
        Ok(PartialThresholdSignature {
            a_i,
            delta_i,
            e_i,
            s_i,
        })
    }
}

/// A complete BBS+ signature, either produced directly from a full secret key
/// or combined from `t` partial threshold signatures; the two are
/// indistinguishable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdSignature {
    pub(crate) a: G1Projective,
    pub(crate) e: Fr,
    pub(crate) s: Fr,
}

impl ThresholdSignature {
    /// Combine exactly `t` [`PartialThresholdSignature`]s (one per signer in
    /// the set used to produce them) into a final signature.
    pub fn from_partials(partials: &[PartialThresholdSignature]) -> Result<Self> {
        if partials.is_empty() {
            return Err(Error::InvalidSignerSetSize {
                expected: 1,
                actual: 0,
            });
        }
        let mut a_star = G1Projective::zero();
        let mut delta = Fr::zero();
        let mut e = Fr::zero();
        let mut s = Fr::zero();
        for p in partials {
            a_star += p.a_i;
            delta += p.delta_i;
            e += p.e_i;
            s += p.s_i;
        }
        let delta_inv = delta.inverse().ok_or(Error::InvariantViolation(
            "combined delta share summed to zero",
        ))?;
        let a = a_star * delta_inv;
        Ok(ThresholdSignature { a, e, s })
    }

    /// Produce a signature directly from a full secret key (used for
    /// reference implementations and tests); `e` and `s` are sampled fresh.
    pub fn sign(
        sk: &SecretKey,
        pk: &PublicKey,
        messages: &[Fr],
        mut rng: impl RngCore + CryptoRng,
    ) -> Result<Self> {
        let e = Fr::rand(&mut rng);
        let s = Fr::rand(&mut rng);
        let b = compute_b(pk, s, messages)?;
        let exponent_inv = (sk.0 + e)
            .inverse()
            .ok_or(Error::InvariantViolation("sk + e was zero"))?;
        let a = b * exponent_inv;
        Ok(ThresholdSignature { a, e, s })
    }

    /// Serialize as `A(48B) || e(32B) || s(32B)`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(112);
        let a: G1Affine = self.a.into_affine();
        a.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        self.e
            .serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        self.s
            .serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize a [`ThresholdSignature`], rejecting an identity `A`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 112 {
            return Err(Error::ParseError);
        }
        let a = G1Affine::deserialize_compressed(&bytes[0..48])
            .map_err(|_| Error::DeserializationError)?;
        if a.is_zero() {
            return Err(Error::BadSignature);
        }
        let e =
            Fr::deserialize_compressed(&bytes[48..80]).map_err(|_| Error::DeserializationError)?;
        let s =
            Fr::deserialize_compressed(&bytes[80..112]).map_err(|_| Error::DeserializationError)?;
        Ok(ThresholdSignature {
            a: a.into_group(),
            e,
            s,
        })
    }
}

impl PublicKey {
    /// Verify a [`ThresholdSignature`] over `messages` via the BBS+ pairing
    /// equation `e(A, W * g2^e) == e(B, g2)`.
    pub fn verify(&self, messages: &[Fr], signature: &ThresholdSignature) -> Result<()> {
        self.validate()?;
        if signature.a.is_zero() {
            return Err(Error::BadSignature);
        }
        let b = compute_b(self, signature.s, messages)?;
        let u = self.w() + G2Projective::generator() * signature.e;

        let a_affine: G1Affine = signature.a.into_affine();
        let u_affine: G2Affine = u.into_affine();
        let b_affine: G1Affine = b.into_affine();
        let g2_affine: G2Affine = G2Projective::generator().into_affine();

        let lhs = Bls12_381::pairing(a_affine, u_affine);
        let rhs = Bls12_381::pairing(b_affine, g2_affine);
        if lhs != rhs {
            return Err(Error::BadSignature);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::PartySecretKey;
    use crate::live_presignature::LivePreSignature;
    use crate::params::ThresholdParameters;
    use crate::presignature::Generator;
    use rand::rngs::OsRng;

    fn messages(l: usize) -> Vec<Fr> {
        (0..l).map(|i| Fr::from((i as u64) + 7)).collect()
    }

    #[test]
    fn direct_sign_and_verify_round_trip() {
        let sk = SecretKey::new(OsRng);
        let pk = PublicKey::derive(&sk, 4, OsRng);
        let m = messages(4);
        let sig = ThresholdSignature::sign(&sk, &pk, &m, OsRng).unwrap();
        pk.verify(&m, &sig).unwrap();
    }

    #[test]
    fn direct_sign_rejects_tampered_message() {
        let sk = SecretKey::new(OsRng);
        let pk = PublicKey::derive(&sk, 3, OsRng);
        let m = messages(3);
        let sig = ThresholdSignature::sign(&sk, &pk, &m, OsRng).unwrap();
        let mut tampered = m.clone();
        tampered[0] += Fr::from(1u64);
        assert!(pk.verify(&tampered, &sig).is_err());
    }

    #[test]
    fn threshold_signature_matches_direct_verification() {
        let params = ThresholdParameters::new(3, 5).unwrap();
        let l = 4;
        let batch = Generator::deal(params, l, 1, OsRng).unwrap();
        let signers = [1u32, 3, 5];
        let m = messages(l);

        let partials: Vec<PartialThresholdSignature> = signers
            .iter()
            .map(|&i| {
                let idx = (i - 1) as usize;
                let pps = &batch.pre_signatures[idx][0];
                let live = LivePreSignature::from_pre_signature(&params, &signers, pps).unwrap();
                PartialThresholdSignature::new(&m, &batch.public_key, &live).unwrap()
            })
            .collect();

        let sig = ThresholdSignature::from_partials(&partials).unwrap();
        batch.public_key.verify(&m, &sig).unwrap();
    }

    #[test]
    fn threshold_signature_fails_with_fewer_than_t_shares() {
        let params = ThresholdParameters::new(3, 5).unwrap();
        let l = 2;
        let batch = Generator::deal(params, l, 1, OsRng).unwrap();
        let signers = [1u32, 3, 5];
        let m = messages(l);

        let partials: Vec<PartialThresholdSignature> = signers
            .iter()
            .take(2)
            .map(|&i| {
                let idx = (i - 1) as usize;
                let pps = &batch.pre_signatures[idx][0];
                let live = LivePreSignature::from_pre_signature(&params, &signers, pps).unwrap();
                PartialThresholdSignature::new(&m, &batch.public_key, &live).unwrap()
            })
            .collect();

        let sig = ThresholdSignature::from_partials(&partials).unwrap();
        assert!(batch.public_key.verify(&m, &sig).is_err());
    }

    #[test]
    fn verify_rejects_wrong_message_count() {
        let sk = SecretKey::new(OsRng);
        let pk = PublicKey::derive(&sk, 4, OsRng);
        let sig = ThresholdSignature::sign(&sk, &pk, &messages(4), OsRng).unwrap();
        assert!(matches!(
            pk.verify(&messages(3), &sig),
            Err(Error::InvalidMessageCount { .. })
        ));
    }

    #[test]
    fn partial_and_final_signature_round_trip_bytes() {
        let params = ThresholdParameters::new(2, 3).unwrap();
        let l = 2;
        let batch = Generator::deal(params, l, 1, OsRng).unwrap();
        let signers = [1u32, 2];
        let m = messages(l);
        let pps = &batch.pre_signatures[0][0];
        let live = LivePreSignature::from_pre_signature(&params, &signers, pps).unwrap();
        let partial = PartialThresholdSignature::new(&m, &batch.public_key, &live).unwrap();
        let bytes = partial.to_bytes().unwrap();
        assert_eq!(bytes.len(), 48 + 32 * 3);
        let decoded = PartialThresholdSignature::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, partial);

        let _ = PartySecretKey::new(1, Fr::from(1u64));
    }
}
