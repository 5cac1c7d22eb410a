//! Explicit configuration types for the threshold scheme.
//!
//! Nothing in this crate reads configuration from the environment or from
//! process-wide state; every entry point that needs `(t, n)` takes a
//! [`ThresholdParameters`] by value or by reference.

use crate::error::{Error, Result};

/// The `(t, n)` parameters of a `t`-out-of-`n` threshold scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ThresholdParameters {
    /// The threshold: the minimum number of parties required to produce a signature.
    pub t: u32,
    /// The total number of parties holding a share of the signing key.
    pub n: u32,
}

impl ThresholdParameters {
    /// Construct new parameters, checking `1 <= t <= n`.
    pub fn new(t: u32, n: u32) -> Result<Self> {
        if t == 0 || t > n {
            return Err(Error::InvalidParameters);
        }
        Ok(ThresholdParameters { t, n })
    }
}

/// The role a caller plays when invoking this crate's API.
///
/// The core itself never branches on this value: it exists purely so that
/// collaborating wallet/transport code can tag which surface it is driving.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Role {
    /// Holds a key share and produces partial signatures.
    Signer,
    /// Collects partial signatures and signature presentations; proves knowledge of signatures.
    Holder,
    /// Runs the (trusted-dealer) correlated-randomness generator.
    Generator,
}

/// Validate that a signer set has exactly `t` distinct, in-range indices.
pub(crate) fn validate_signer_set(params: &ThresholdParameters, signers: &[u32]) -> Result<()> {
    if signers.len() != params.t as usize {
        return Err(Error::InvalidSignerSetSize {
            expected: params.t,
            actual: signers.len(),
        });
    }
    for &i in signers {
        if i == 0 || i > params.n {
            return Err(Error::InvalidSignerIndex(i));
        }
    }
    for (pos, &i) in signers.iter().enumerate() {
        if signers[..pos].contains(&i) {
            return Err(Error::DuplicateShares);
        }
    }
    Ok(())
}
