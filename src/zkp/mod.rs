//! Zero-knowledge proof of knowledge of a BBS+ signature, with selective
//! disclosure of a subset of the signed messages.

mod commitment;
pub mod proof;
mod prover;
mod verifier;

pub use proof::PokPayload;
pub use prover::prove;
pub use verifier::verify;
