//! BBS+ key material: the full signing key, per-party key shares, and the
//! public key (the G1 message generators plus the G2 "W" point).

use ark_bls12_381::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup, Group};
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::Error;
use crate::error::Result as CrateResult;
use crate::utils::lagrange_reconstruct;

/// A full BBS+ secret key: a uniformly random, non-zero scalar.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct SecretKey(pub(crate) Fr);

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SecretKey {
    /// Sample a uniformly random secret key, retrying on the negligible chance of zero.
    pub fn new(mut rng: impl RngCore + CryptoRng) -> Self {
        loop {
            let sk = Fr::rand(&mut rng);
            if !sk.is_zero() {
                return SecretKey(sk);
            }
        }
    }

    /// Reconstruct a full secret key from a `t`-subset of [`PartySecretKey`] shares,
    /// via Lagrange interpolation at 0.
    pub fn reconstruct(shares: &[PartySecretKey]) -> CrateResult<Self> {
        let indices: Vec<u32> = shares.iter().map(|s| s.index).collect();
        let scalars: Vec<Fr> = shares.iter().map(|s| s.share).collect();
        let sk = lagrange_reconstruct(&indices, &scalars)?;
        Ok(SecretKey(sk))
    }

    /// Serialize this secret key to its canonical 32-byte big-endian encoding.
    pub fn to_bytes(&self) -> CrateResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.0
            .serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        Ok(bytes)
    }

    /// Deserialize a secret key from its canonical encoding.
    pub fn from_bytes(bytes: &[u8]) -> CrateResult<Self> {
        let sk = Fr::deserialize_compressed(bytes).map_err(|_| Error::DeserializationError)?;
        if sk.is_zero() {
            return Err(Error::DeserializationError);
        }
        Ok(SecretKey(sk))
    }
}

/// One party's long-lived share of the group signing key, produced by a
/// `t`-out-of-`n` Shamir sharing of the group secret key.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct PartySecretKey {
    /// This party's index in `[1, n]`.
    #[zeroize(skip)]
    pub index: u32,
    /// This party's additive share of the group secret key.
    pub(crate) share: Fr,
}

impl Drop for PartySecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PartySecretKey {
    pub(crate) fn new(index: u32, share: Fr) -> Self {
        PartySecretKey { index, share }
    }

    /// This party's public verification share, `g2^share`.
    pub fn public_share(&self) -> G2Projective {
        G2Projective::generator() * self.share
    }

    /// Serialize as `share(32B) || pubkey(96B) || index(4B little-endian)`.
    pub fn to_bytes(&self) -> CrateResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(32 + 96 + 4);
        self.share
            .serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        let pubkey: G2Affine = self.public_share().into_affine();
        pubkey
            .serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        bytes.extend_from_slice(&self.index.to_le_bytes());
        Ok(bytes)
    }

    /// Deserialize a [`PartySecretKey`] from its wire format, checking that the
    /// embedded public share matches `share * g2`.
    pub fn from_bytes(bytes: &[u8]) -> CrateResult<Self> {
        if bytes.len() != 32 + 96 + 4 {
            return Err(Error::ParseError);
        }
        let share =
            Fr::deserialize_compressed(&bytes[0..32]).map_err(|_| Error::DeserializationError)?;
        let pubkey = G2Affine::deserialize_compressed(&bytes[32..128])
            .map_err(|_| Error::DeserializationError)?;
        let mut idx_bytes = [0u8; 4];
        idx_bytes.copy_from_slice(&bytes[128..132]);
        let index = u32::from_le_bytes(idx_bytes);

        if (G2Projective::generator() * share).into_affine() != pubkey {
            return Err(Error::ShareVerificationError);
        }

        Ok(PartySecretKey { index, share })
    }
}

/// The BBS+ public key: the G2 "W" commitment to the secret key, the G1 blinding
/// generator `H0`, and one G1 generator per message slot.
#[derive(Clone, Debug, Eq, PartialEq, CanonicalSerialize, CanonicalDeserialize)]
pub struct PublicKey {
    /// `g2^sk`.
    pub(crate) w: G2Projective,
    /// The blinding-term generator.
    pub(crate) h0: G1Projective,
    /// One generator per message slot; `h.len()` is the supported message count `L`.
    pub(crate) h: Vec<G1Projective>,
}

impl PublicKey {
    /// The number of messages this public key supports.
    pub fn message_count(&self) -> usize {
        self.h.len()
    }

    /// `g2^sk`.
    pub fn w(&self) -> G2Projective {
        self.w
    }

    /// The blinding-term generator `H0`.
    pub fn h0(&self) -> G1Projective {
        self.h0
    }

    /// The per-message generators `H1..HL`.
    pub fn h(&self) -> &[G1Projective] {
        &self.h
    }

    /// Derive a public key for a secret key `sk` supporting `message_count` messages,
    /// sampling the `H0, H1, .., H_L` generators from `rng`.
    ///
    /// `rng` may be a live CSPRNG, or a deterministic one seeded via
    /// [`crate::rng::rng_from_seed`] for reproducible derivation. Either way,
    /// the generators are sampled as `G1::generator() * Fr::rand(rng)`, which
    /// is uniform and, with overwhelming probability, non-zero and
    /// independent.
    pub fn derive(sk: &SecretKey, message_count: usize, mut rng: impl RngCore + CryptoRng) -> Self {
        let w = G2Projective::generator() * sk.0;
        let h0 = G1Projective::generator() * Fr::rand(&mut rng);
        let h = (0..message_count)
            .map(|_| G1Projective::generator() * Fr::rand(&mut rng))
            .collect();
        PublicKey { w, h0, h }
    }

    /// Check that `W`, `H0`, and every `H_i` are present and non-identity.
    pub fn validate(&self) -> CrateResult<()> {
        if self.w.is_zero() || self.h0.is_zero() || self.h.iter().any(|h| h.is_zero()) {
            return Err(Error::BadSignature);
        }
        Ok(())
    }

    /// Serialize as `W(96B) || H0(48B) || H1..HL(48B each)`. The message count `L`
    /// is inferred from the encoded length on deserialization.
    pub fn to_bytes(&self) -> CrateResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(96 + 48 * (1 + self.h.len()));
        let w: G2Affine = self.w.into_affine();
        w.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        let h0: G1Affine = self.h0.into_affine();
        h0.serialize_compressed(&mut bytes)
            .map_err(|_| Error::SerializationError)?;
        for h_i in &self.h {
            let h_i: G1Affine = h_i.into_affine();
            h_i.serialize_compressed(&mut bytes)
                .map_err(|_| Error::SerializationError)?;
        }
        Ok(bytes)
    }

    /// Deserialize a public key, inferring `L` from the encoded length.
    pub fn from_bytes(bytes: &[u8]) -> CrateResult<Self> {
        const G2_SIZE: usize = 96;
        const G1_SIZE: usize = 48;
        if bytes.len() < G2_SIZE + G1_SIZE || !(bytes.len() - G2_SIZE).is_multiple_of(G1_SIZE) {
            return Err(Error::ParseError);
        }

        let w = G2Affine::deserialize_compressed(&bytes[0..G2_SIZE])
            .map_err(|_| Error::DeserializationError)?
            .into_group();
        let h0 = G1Affine::deserialize_compressed(&bytes[G2_SIZE..G2_SIZE + G1_SIZE])
            .map_err(|_| Error::DeserializationError)?
            .into_group();

        let mut h = Vec::new();
        let mut offset = G2_SIZE + G1_SIZE;
        while offset < bytes.len() {
            let point = G1Affine::deserialize_compressed(&bytes[offset..offset + G1_SIZE])
                .map_err(|_| Error::DeserializationError)?;
            h.push(point.into_group());
            offset += G1_SIZE;
        }

        let pk = PublicKey { w, h0, h };
        pk.validate()?;
        Ok(pk)
    }
}
