//! Proof-of-knowledge construction: randomise a signature, commit to the
//! hidden signature components and hidden messages, and derive the
//! Fiat-Shamir responses.

use ark_bls12_381::Fr;
use ark_ff::{Field, UniformRand, Zero};
use rand_core::{CryptoRng, RngCore};

use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::threshold_signature::ThresholdSignature;
use crate::zkp::commitment::SchnorrCommitment;
use crate::zkp::proof::{derive_challenge, hidden_indices, vc2_bases, PokPayload, Proof};

fn compute_b(pk: &PublicKey, s: Fr, messages: &[Fr]) -> ark_bls12_381::G1Projective {
    use ark_ec::Group;
    let mut b = ark_bls12_381::G1Projective::generator() + pk.h0() * s;
    for (h_i, m_i) in pk.h().iter().zip(messages.iter()) {
        b += *h_i * m_i;
    }
    b
}

/// Build a [`PokPayload`] proving knowledge of `signature` over `messages`,
/// revealing only the indices in `revealed` (ascending, deduplicated is the
/// caller's responsibility; duplicates are harmless but wasteful).
pub fn prove(
    pk: &PublicKey,
    signature: &ThresholdSignature,
    messages: &[Fr],
    revealed: &[usize],
    nonce: &[u8],
    mut rng: impl RngCore + CryptoRng,
) -> Result<PokPayload> {
    let l = pk.message_count();
    if messages.len() != l {
        return Err(Error::InvalidMessageCount {
            expected: l,
            actual: messages.len(),
        });
    }
    for &i in revealed {
        if i >= l {
            return Err(Error::InvalidSignerIndex(i as u32));
        }
    }

    let b = compute_b(pk, signature.s, messages);

    let r1 = Fr::rand(&mut rng);
    let r2 = Fr::rand(&mut rng);
    if r1.is_zero() {
        return Err(Error::InvariantViolation("sampled r1 == 0"));
    }

    let a_prime = signature.a * r1;
    let a_bar = b * r1 - a_prime * signature.e;
    let d = b * r1 - pk.h0() * r2;
    let r3 = r1
        .inverse()
        .ok_or(Error::InvariantViolation("r1 not invertible"))?;
    let s_prime = signature.s - r2 * r3;

    let hidden = hidden_indices(l, revealed);

    let f_e = Fr::rand(&mut rng);
    let f_r2 = Fr::rand(&mut rng);
    let t1 = a_prime * f_e + pk.h0() * f_r2;

    let f_r3 = Fr::rand(&mut rng);
    let f_s = Fr::rand(&mut rng);
    let f_hidden: Vec<Fr> = hidden.iter().map(|_| Fr::rand(&mut rng)).collect();

    let bases = vc2_bases(pk, &d, &hidden);
    let blindings: Vec<Fr> = [f_r3, f_s]
        .into_iter()
        .chain(f_hidden.iter().copied())
        .collect();
    let t2 = bases
        .iter()
        .zip(blindings.iter())
        .fold(ark_bls12_381::G1Projective::zero(), |acc, (base, b)| {
            acc + *base * b
        });

    let hidden_h_bases: Vec<_> = hidden.iter().map(|&i| pk.h()[i]).collect();
    let c = derive_challenge(
        &a_bar,
        &a_prime,
        &pk.h0(),
        &t1,
        &d,
        &hidden_h_bases,
        &t2,
        nonce,
    )?;

    let resp_e = f_e + c * signature.e;
    let resp_r2 = f_r2 - c * r2;
    let resp_r3 = f_r3 + c * r3;
    let resp_s = f_s - c * s_prime;
    let resp_hidden: Vec<Fr> = hidden
        .iter()
        .zip(f_hidden.iter())
        .map(|(&i, f)| *f - c * messages[i])
        .collect();

    let vc1 = SchnorrCommitment {
        t: t1,
        responses: vec![resp_e, resp_r2],
    };
    let mut vc2_responses = vec![resp_r3, resp_s];
    vc2_responses.extend(resp_hidden);
    let vc2 = SchnorrCommitment {
        t: t2,
        responses: vc2_responses,
    };

    Ok(PokPayload {
        message_count: l,
        revealed: revealed.to_vec(),
        proof: Proof {
            a_prime,
            a_bar,
            d,
            vc1,
            vc2,
        },
    })
}
