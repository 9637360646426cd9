//! Sponsored batch execution for a delegated account.
//!
//! A principal signs `(nonce, calls)`; any sponsor may then submit the batch together with the
//! signature. This crate holds the parts that must agree bit-for-bit between the Stylus program
//! and off-chain tooling: call encoding, the authorisation digest, signature structure checks,
//! the nonce ledger and the dispatcher state machine.
//!
//! Environment specifics (how a signer is recovered, how a call reaches its target, where
//! records go) sit behind [`ExecutionHost`].

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod call;
pub mod digest;
pub mod errors;
pub mod executor;
pub mod host;
pub mod ledger;
pub mod signature;

pub use call::{encode_calls, Call};
pub use digest::{batch_digest, signed_message_digest, signing_digest, SIGNED_MESSAGE_PREFIX};
pub use errors::{ExecutionError, SignatureError};
pub use executor::{current_nonce, execute_as_principal, execute_with_signature};
pub use host::{ExecutionHost, ExecutionRecord};
pub use ledger::{NonceLedger, NonceRecord};
pub use signature::{BatchSignature, SECP256K1N, SECP256K1N_HALF, SIGNATURE_LENGTH};

#[cfg(test)]
mod tests;
