//! Authorisation digest construction.
//!
//! The principal signs the EIP-191 personal-message form of
//! `keccak256(nonce || encode_calls(calls))`. The prefix keeps batch digests apart from any
//! other 32-byte hash the same key might sign.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, FixedBytes, U256};

use crate::call::{encode_calls, Call};

/// EIP-191 version `0x45` prefix for a 32-byte message.
pub const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// `keccak256(nonce_be32 || encode_calls(calls))`.
///
/// `nonce` is the ledger value the batch is bound to, i.e. the value *before* it is advanced.
pub fn batch_digest(nonce: U256, calls: &[Call]) -> FixedBytes<32> {
    let encoded = encode_calls(calls);
    let mut buf = Vec::with_capacity(32 + encoded.len());
    buf.extend_from_slice(&nonce.to_be_bytes::<32>());
    buf.extend_from_slice(&encoded);
    keccak256(buf)
}

/// Wrap a digest as an Ethereum signed message: `keccak256(prefix || digest)`.
pub fn signed_message_digest(digest: FixedBytes<32>) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(SIGNED_MESSAGE_PREFIX.len() + 32);
    buf.extend_from_slice(SIGNED_MESSAGE_PREFIX);
    buf.extend_from_slice(digest.as_slice());
    keccak256(buf)
}

/// The exact 32 bytes the principal signs for `(nonce, calls)`.
pub fn signing_digest(nonce: U256, calls: &[Call]) -> FixedBytes<32> {
    signed_message_digest(batch_digest(nonce, calls))
}
