//! Proof-of-knowledge verification: recompute the Fiat-Shamir challenge and
//! check both Schnorr-style linear combinations and the signature-side
//! pairing equation.

use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, Group};
use ark_ff::Zero;

use crate::error::{Error, Result};
use crate::keys::PublicKey;
use crate::zkp::proof::{derive_challenge, hidden_indices, vc2_bases, PokPayload};

/// Verify a [`PokPayload`] against `pk`, a set of `(index, message)` pairs for
/// every revealed index, and the verifier's own copy of the nonce.
pub fn verify(
    pk: &PublicKey,
    revealed_messages: &[(usize, Fr)],
    nonce: &[u8],
    payload: &PokPayload,
) -> Result<()> {
    pk.validate()?;
    if payload.message_count != pk.message_count() {
        return Err(Error::InvalidMessageCount {
            expected: pk.message_count(),
            actual: payload.message_count,
        });
    }

    let mut revealed_indices: Vec<usize> = revealed_messages.iter().map(|(i, _)| *i).collect();
    revealed_indices.sort_unstable();
    let mut claimed = payload.revealed.clone();
    claimed.sort_unstable();
    if revealed_indices != claimed {
        return Err(Error::ParseError);
    }

    let proof = &payload.proof;
    if proof.a_prime.is_zero() {
        return Err(Error::BadSignature);
    }

    let g2 = ark_bls12_381::G2Projective::generator();
    let a_prime_affine: G1Affine = proof.a_prime.into_affine();
    let w_affine: G2Affine = pk.w().into_affine();
    let a_bar_affine: G1Affine = proof.a_bar.into_affine();
    let g2_affine: G2Affine = g2.into_affine();
    if Bls12_381::pairing(a_prime_affine, w_affine) != Bls12_381::pairing(a_bar_affine, g2_affine) {
        return Err(Error::BadSignature);
    }

    let hidden = hidden_indices(pk.message_count(), &payload.revealed);
    let hidden_h_bases: Vec<_> = hidden.iter().map(|&i| pk.h()[i]).collect();
    let c = derive_challenge(
        &proof.a_bar,
        &proof.a_prime,
        &pk.h0(),
        &proof.vc1.t,
        &proof.d,
        &hidden_h_bases,
        &proof.vc2.t,
        nonce,
    )?;

    if proof.vc1.responses.len() != 2 {
        return Err(Error::ParseError);
    }
    let resp_e = proof.vc1.responses[0];
    let resp_r2 = proof.vc1.responses[1];
    let vc1_check =
        proof.a_prime * resp_e + pk.h0() * resp_r2 + (proof.a_bar - proof.d) * c - proof.vc1.t;
    if !vc1_check.is_zero() {
        return Err(Error::BadHiddenMessageProof);
    }

    if proof.vc2.responses.len() != 2 + hidden.len() {
        return Err(Error::ParseError);
    }
    let g1 = G1Projective::generator();
    let mut pr = g1;
    for &(i, m_i) in revealed_messages {
        pr += pk.h()[i] * m_i;
    }

    let bases = vc2_bases(pk, &proof.d, &hidden);
    let mut vc2_check = bases
        .iter()
        .zip(proof.vc2.responses.iter())
        .fold(G1Projective::zero(), |acc, (base, r)| acc + *base * r);
    vc2_check += -pr * c;
    vc2_check -= proof.vc2.t;
    if !vc2_check.is_zero() {
        return Err(Error::BadRevealedMessageProof);
    }

    Ok(())
}
