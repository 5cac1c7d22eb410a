//! Correlated pre-signature material and the trusted-dealer [`Generator`] that
//! produces it.
//!
//! A batch of `K` pre-signatures for `n` parties consists of, per slot: an
//! additive sharing of fresh blinding values `(a, e, s)`, and three OLE/VOLE
//! correlations over those shares and the parties' secret-key shares: for
//! every ordered pair `(i, j)`, `i != j`, a split `x_i[j] + y_j[i] = a_i *
//! v_j` where `v` is `e`, `s`, or the secret-key share. This module's
//! [`Generator`] is a centralised stand-in for the distributed
//! correlated-randomness machinery that would normally produce such shares.

use ark_bls12_381::Fr;
use ark_ff::{UniformRand, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::Error;
use crate::error::Result as CrateResult;
use crate::keys::{PartySecretKey, PublicKey, SecretKey};
use crate::params::ThresholdParameters;

/// One party's share of one batch slot's correlated pre-signature material.
///
/// Cross-term vectors are indexed by `other_index - 1`; the entry at the
/// party's own index is unused (left zero).
#[derive(Clone, Debug, PartialEq, CanonicalSerialize, CanonicalDeserialize, Zeroize)]
pub struct PerPartyPreSignature {
    #[zeroize(skip)]
    pub(crate) index: u32,
    pub(crate) a: Fr,
    pub(crate) e: Fr,
    pub(crate) s: Fr,
    pub(crate) ae_own: Fr,
    pub(crate) as_own: Fr,
    pub(crate) ask_own: Fr,
    pub(crate) ae_a: Vec<Fr>,
    pub(crate) ae_e: Vec<Fr>,
    pub(crate) as_a: Vec<Fr>,
    pub(crate) as_s: Vec<Fr>,
    pub(crate) ask_a: Vec<Fr>,
    pub(crate) ask_sk: Vec<Fr>,
}

impl Drop for PerPartyPreSignature {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PerPartyPreSignature {
    /// Serialize as `a || e || s || ae_own || as_own || ask_own` followed by the
    /// six length-prefixed cross-term vectors, in the order `ae_a, ae_e, as_a,
    /// as_s, ask_a, ask_sk` (4-byte little-endian length prefix, matching the
    /// rest of the wire format's convention for variable-length fields).
    pub fn to_bytes(&self) -> CrateResult<Vec<u8>> {
        let mut bytes = Vec::new();
        for scalar in [
            &self.a,
            &self.e,
            &self.s,
            &self.ae_own,
            &self.as_own,
            &self.ask_own,
        ] {
            scalar
                .serialize_compressed(&mut bytes)
                .map_err(|_| Error::SerializationError)?;
        }
        for vector in [
            &self.ae_a,
            &self.ae_e,
            &self.as_a,
            &self.as_s,
            &self.ask_a,
            &self.ask_sk,
        ] {
            bytes.extend_from_slice(&(vector.len() as u32).to_le_bytes());
            for scalar in vector {
                scalar
                    .serialize_compressed(&mut bytes)
                    .map_err(|_| Error::SerializationError)?;
            }
        }
        Ok(bytes)
    }

    /// Deserialize a [`PerPartyPreSignature`] produced by [`Self::to_bytes`].
    /// The party `index` is not part of the wire format and must be supplied
    /// by the caller, who already knows which party the bytes came from.
    pub fn from_bytes(index: u32, bytes: &[u8]) -> CrateResult<Self> {
        let mut offset = 0usize;
        let read_scalar = |bytes: &[u8], offset: &mut usize| -> CrateResult<Fr> {
            if *offset + 32 > bytes.len() {
                return Err(Error::ParseError);
            }
            let scalar = Fr::deserialize_compressed(&bytes[*offset..*offset + 32])
                .map_err(|_| Error::DeserializationError)?;
            *offset += 32;
            Ok(scalar)
        };

        let a = read_scalar(bytes, &mut offset)?;
        let e = read_scalar(bytes, &mut offset)?;
        let s = read_scalar(bytes, &mut offset)?;
        let ae_own = read_scalar(bytes, &mut offset)?;
        let as_own = read_scalar(bytes, &mut offset)?;
        let ask_own = read_scalar(bytes, &mut offset)?;

        let read_vector = |bytes: &[u8], offset: &mut usize| -> CrateResult<Vec<Fr>> {
            if *offset + 4 > bytes.len() {
                return Err(Error::ParseError);
            }
            let mut len_bytes = [0u8; 4];
            len_bytes.copy_from_slice(&bytes[*offset..*offset + 4]);
            *offset += 4;
            let len = u32::from_le_bytes(len_bytes) as usize;
            let mut vector = Vec::with_capacity(len);
            for _ in 0..len {
                vector.push(read_scalar(bytes, offset)?);
            }
            Ok(vector)
        };

        let ae_a = read_vector(bytes, &mut offset)?;
        let ae_e = read_vector(bytes, &mut offset)?;
        let as_a = read_vector(bytes, &mut offset)?;
        let as_s = read_vector(bytes, &mut offset)?;
        let ask_a = read_vector(bytes, &mut offset)?;
        let ask_sk = read_vector(bytes, &mut offset)?;

        if offset != bytes.len() {
            return Err(Error::ParseError);
        }

        Ok(PerPartyPreSignature {
            index,
            a,
            e,
            s,
            ae_own,
            as_own,
            ask_own,
            ae_a,
            ae_e,
            as_a,
            as_s,
            ask_a,
            ask_sk,
        })
    }
}

/// The output of one run of the trusted-dealer [`Generator`]: a public key and,
/// for each of the `n` parties, its secret-key share and its `K`-slot batch of
/// [`PerPartyPreSignature`] records.
pub struct GeneratedBatch {
    pub public_key: PublicKey,
    pub party_secret_keys: Vec<PartySecretKey>,
    /// `pre_signatures[party_index - 1][slot]`.
    pub pre_signatures: Vec<Vec<PerPartyPreSignature>>,
}

/// A centralised stand-in for a correlated-randomness generator: it deals a
/// Shamir-shared secret key and `K` batches of correctly-structured OLE/VOLE
/// pre-signature material for `n` parties. Its own security properties as a
/// trusted dealer are out of scope; it exists so the rest of the core can be
/// built and tested against a conformant source of correlated randomness, and
/// is a drop-in replacement point for a distributed PCG-based implementation.
pub struct Generator;

impl Generator {
    /// Deal a fresh batch: a Shamir-shared secret key, a [`PublicKey`] for
    /// `message_count` messages, and `batch_size` slots of correlated
    /// pre-signature material for every one of `params.n` parties.
    pub fn deal(
        params: ThresholdParameters,
        message_count: usize,
        batch_size: usize,
        mut rng: impl RngCore + CryptoRng,
    ) -> CrateResult<GeneratedBatch> {
        if params.t == 0 || params.t > params.n {
            return Err(Error::InvalidParameters);
        }
        let n = params.n as usize;

        let sk = SecretKey::new(&mut rng);
        let sk_shares = shamir_share(&sk.0, params.t, params.n, &mut rng);
        let public_key = PublicKey::derive(&sk, message_count, &mut rng);
        let party_secret_keys: Vec<PartySecretKey> = sk_shares
            .iter()
            .enumerate()
            .map(|(idx, &share)| PartySecretKey::new((idx + 1) as u32, share))
            .collect();

        let mut pre_signatures: Vec<Vec<PerPartyPreSignature>> =
            (0..n).map(|_| Vec::with_capacity(batch_size)).collect();

        for _ in 0..batch_size {
            let slot = deal_slot(n, &sk_shares, &mut rng);
            for (party_records, record) in pre_signatures.iter_mut().zip(slot) {
                party_records.push(record);
            }
        }

        Ok(GeneratedBatch {
            public_key,
            party_secret_keys,
            pre_signatures,
        })
    }
}

/// Additively share `secret` into `n` values whose sum is `secret`. `t` is
/// unused for additive (non-Shamir) sharing, but accepted for symmetry with
/// [`shamir_share`]'s call sites.
fn additive_share(secret: &Fr, n: u32, mut rng: impl RngCore + CryptoRng) -> Vec<Fr> {
    let n = n as usize;
    let mut shares: Vec<Fr> = (0..n - 1).map(|_| Fr::rand(&mut rng)).collect();
    let sum: Fr = shares.iter().fold(Fr::zero(), |acc, s| acc + s);
    shares.push(*secret - sum);
    shares
}

/// Shamir-share `secret` over a degree `t - 1` random polynomial, evaluated at
/// `1..=n`.
fn shamir_share(secret: &Fr, t: u32, n: u32, mut rng: impl RngCore + CryptoRng) -> Vec<Fr> {
    let mut coefficients = vec![*secret];
    for _ in 1..t {
        coefficients.push(Fr::rand(&mut rng));
    }
    (1..=n)
        .map(|i| {
            let x = Fr::from(i);
            let mut acc = Fr::zero();
            let mut x_pow = Fr::from(1u64);
            for c in &coefficients {
                acc += *c * x_pow;
                x_pow *= x;
            }
            acc
        })
        .collect()
}

/// Deal the correlated material for a single batch slot, returning one
/// [`PerPartyPreSignature`] per party (index `0` is party 1, etc).
fn deal_slot(
    n: usize,
    sk_shares: &[Fr],
    mut rng: impl RngCore + CryptoRng,
) -> Vec<PerPartyPreSignature> {
    let a = additive_share(&Fr::rand(&mut rng), n as u32, &mut rng);
    let e = additive_share(&Fr::rand(&mut rng), n as u32, &mut rng);
    let s = additive_share(&Fr::rand(&mut rng), n as u32, &mut rng);

    let mut ae_a = vec![vec![Fr::zero(); n]; n];
    let mut ae_e = vec![vec![Fr::zero(); n]; n];
    let mut as_a = vec![vec![Fr::zero(); n]; n];
    let mut as_s = vec![vec![Fr::zero(); n]; n];
    let mut ask_a = vec![vec![Fr::zero(); n]; n];
    let mut ask_sk = vec![vec![Fr::zero(); n]; n];

    // For every ordered pair (i, j), i != j, split a_i * e_j (and the `as`,
    // `ask` analogues) additively between party i and party j.
    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let r_ae = Fr::rand(&mut rng);
            ae_a[i][j] = r_ae;
            ae_e[j][i] = a[i] * e[j] - r_ae;

            let r_as = Fr::rand(&mut rng);
            as_a[i][j] = r_as;
            as_s[j][i] = a[i] * s[j] - r_as;

            let r_ask = Fr::rand(&mut rng);
            ask_a[i][j] = r_ask;
            ask_sk[j][i] = a[i] * sk_shares[j] - r_ask;
        }
    }

    (0..n)
        .map(|i| PerPartyPreSignature {
            index: (i + 1) as u32,
            a: a[i],
            e: e[i],
            s: s[i],
            ae_own: a[i] * e[i],
            as_own: a[i] * s[i],
            ask_own: a[i] * sk_shares[i],
            ae_a: ae_a[i].clone(),
            ae_e: ae_e[i].clone(),
            as_a: as_a[i].clone(),
            as_s: as_s[i].clone(),
            ask_a: ask_a[i].clone(),
            ask_sk: ask_sk[i].clone(),
        })
        .collect()
}
