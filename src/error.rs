//! The error type returned by every fallible operation in this crate.
//!
//! Variants are grouped the way failures are grouped conceptually: malformed
//! caller input is rejected before any cryptographic work happens, crypto
//! rejections never panic, and internal invariant breaks (a malformed
//! correlated-randomness share, for instance) are reported rather than
//! silently patched over.

use core::fmt;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Failure modes produced by this crate.
///
/// No operation in this crate panics on attacker-controlled input; every
/// rejection is one of these variants.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// `ThresholdParameters` were inconsistent (e.g. `t == 0`, `t > n`).
    InvalidParameters,
    /// A message vector did not have the length the public key was derived for.
    InvalidMessageCount { expected: usize, actual: usize },
    /// A signer set did not have exactly `t` members.
    InvalidSignerSetSize { expected: u32, actual: usize },
    /// A signer index was out of the `[1, n]` range, or appeared twice in a set.
    InvalidSignerIndex(u32),
    /// Canonical serialization failed.
    SerializationError,
    /// Deserialization encountered a malformed, wrong-length, or non-canonical encoding.
    DeserializationError,
    /// An internal correlation (OLE/VOLE share, or Shamir share) failed its algebraic
    /// invariant when reconstructed. Either a generator bug, or adversarial input.
    InvariantViolation(&'static str),
    /// A Lagrange interpolation was attempted over a signer set containing duplicate indices.
    DuplicateShares,
    /// A party's public verification share did not match its committed polynomial.
    ShareVerificationError,
    /// The group element supplied as a signature component was the identity, or the
    /// pairing equation did not hold.
    BadSignature,
    /// The ZK-PoK's first Schnorr-style sub-proof (hidden signature components) failed.
    BadHiddenMessageProof,
    /// The ZK-PoK's second Schnorr-style sub-proof (hidden message components) failed.
    BadRevealedMessageProof,
    /// The wire payload was truncated, had an inconsistent length prefix, or an
    /// out-of-range revealed-index bitvector.
    ParseError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidParameters => write!(f, "invalid threshold parameters"),
            Error::InvalidMessageCount { expected, actual } => {
                write!(f, "expected {} messages, got {}", expected, actual)
            }
            Error::InvalidSignerSetSize { expected, actual } => write!(
                f,
                "expected a signer set of size {}, got {}",
                expected, actual
            ),
            Error::InvalidSignerIndex(i) => write!(f, "invalid signer index: {}", i),
            Error::SerializationError => write!(f, "serialization error"),
            Error::DeserializationError => write!(f, "deserialization error"),
            Error::InvariantViolation(what) => write!(f, "invariant violation: {}", what),
            Error::DuplicateShares => write!(f, "duplicate shares provided"),
            Error::ShareVerificationError => write!(f, "share verification failed"),
            Error::BadSignature => write!(f, "bad signature"),
            Error::BadHiddenMessageProof => {
                write!(f, "bad proof of knowledge of hidden signature components")
            }
            Error::BadRevealedMessageProof => {
                write!(f, "bad proof of knowledge of hidden messages")
            }
            Error::ParseError => write!(f, "malformed wire format"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
