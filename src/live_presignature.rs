//! Reconstruction of a live, single-use pre-signature from stored correlated
//! shares, once a concrete signer set is chosen.

use ark_bls12_381::Fr;
use ark_ff::Zero;
use zeroize::Zeroize;

use crate::error::Result;
#[cfg(test)]
use crate::keys::PartySecretKey;
use crate::params::{validate_signer_set, ThresholdParameters};
use crate::presignature::PerPartyPreSignature;
use crate::utils::lagrange_coefficient;

/// One party's ephemeral, single-use pre-signature, reconstructed from its
/// stored [`PerPartyPreSignature`] share and the chosen signer set.
///
/// `alpha` and `delta` are this party's additive shares of `a * s` and
/// `a * (e + sk)` respectively, restricted to the signer set `S`.
#[derive(Clone, Debug, Zeroize)]
pub struct LivePreSignature {
    /// The owning party's index; kept for callers that want to label a
    /// partial signature with who produced it.
    #[zeroize(skip)]
    pub index: u32,
    pub(crate) a: Fr,
    pub(crate) e: Fr,
    pub(crate) s: Fr,
    pub(crate) alpha: Fr,
    pub(crate) delta: Fr,
}

impl Drop for LivePreSignature {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl LivePreSignature {
    /// Reconstruct this party's live pre-signature from its stored share and
    /// the chosen signer set `signers` (which must include `pre_signature`'s
    /// own index and contain exactly `params.t` distinct indices in `[1, n]`).
    pub fn from_pre_signature(
        params: &ThresholdParameters,
        signers: &[u32],
        pre_signature: &PerPartyPreSignature,
    ) -> Result<Self> {
        validate_signer_set(params, signers)?;
        let own_index = pre_signature.index;
        debug_assert!(signers.contains(&own_index));

        let mut alpha = pre_signature.as_own;
        let mut delta_e = pre_signature.ae_own;
        let mut delta_sk = Fr::zero();
        let mut t = pre_signature.ask_own;

        for &j in signers {
            if j == own_index {
                continue;
            }
            let idx = (j - 1) as usize;
            alpha += pre_signature.as_a[idx] + pre_signature.as_s[idx];
            delta_e += pre_signature.ae_a[idx] + pre_signature.ae_e[idx];
            let l_j = lagrange_coefficient(j, signers)?;
            delta_sk += l_j * pre_signature.ask_a[idx];
            t += pre_signature.ask_sk[idx];
        }

        let l_own = lagrange_coefficient(own_index, signers)?;
        delta_sk += l_own * t;
        let delta = delta_e + delta_sk;

        Ok(LivePreSignature {
            index: own_index,
            a: pre_signature.a,
            e: pre_signature.e,
            s: pre_signature.s,
            alpha,
            delta,
        })
    }
}

/// A test/debug-only direct reconstruction of the `a, e, s, alpha = a*s,
/// delta = a*(e+sk)` quintuple restricted to a chosen signer set `S`, used to
/// check [`LivePreSignature::from_pre_signature`] against the values it is
/// meant to approximate. `a, e, s` are summed only over `S` (pre-signature
/// shares are additive only within the signer set that eventually combines
/// them); `sk` is the Lagrange-reconstructed secret key over `S`.
#[cfg(test)]
pub(crate) fn reconstruct_reference(
    pre_signatures: &[PerPartyPreSignature],
    secret_keys: &[PartySecretKey],
) -> (Fr, Fr, Fr, Fr, Fr) {
    let a: Fr = pre_signatures
        .iter()
        .map(|p| p.a)
        .fold(Fr::zero(), |x, y| x + y);
    let e: Fr = pre_signatures
        .iter()
        .map(|p| p.e)
        .fold(Fr::zero(), |x, y| x + y);
    let s: Fr = pre_signatures
        .iter()
        .map(|p| p.s)
        .fold(Fr::zero(), |x, y| x + y);
    let sk = crate::keys::SecretKey::reconstruct(secret_keys).unwrap();
    (a, e, s, a * s, a * (e + sk.0))
}
