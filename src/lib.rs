//! Threshold BBS+ signatures over BLS12-381, with a selective-disclosure
//! zero-knowledge proof-of-knowledge layer.
//!
//! The core is organised the way the algebra is laid out in the design doc:
//! key material ([`keys`]), correlated pre-signature shares
//! ([`presignature`]) and their live, per-signer-set reconstruction
//! ([`live_presignature`]), partial and combined threshold signatures
//! ([`threshold_signature`]), and the proof-of-knowledge layer ([`zkp`]).
//! Everything here is stateless and synchronous; callers own their own
//! concurrency and I/O.

pub mod error;
pub mod keys;
pub mod live_presignature;
pub mod params;
pub mod presignature;
pub mod rng;
pub mod threshold_signature;
pub mod utils;
pub mod zkp;

pub use error::{Error, Result};
pub use keys::{PartySecretKey, PublicKey, SecretKey};
pub use live_presignature::LivePreSignature;
pub use params::{Role, ThresholdParameters};
pub use presignature::{GeneratedBatch, Generator, PerPartyPreSignature};
pub use threshold_signature::{PartialThresholdSignature, ThresholdSignature};
