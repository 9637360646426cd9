//! Signer recovery through the `ecrecover` precompile.

use sponsored_batch_core::{BatchSignature, SignatureError};
use stylus_sdk::alloy_primitives::{Address, FixedBytes};

/// Precompile address 0x01.
pub const ECRECOVER: Address = Address::with_last_byte(1);

/// Lay out `digest || v || r || s` as four 32-byte words.
///
/// The signature has already passed the structural checks in [`BatchSignature::from_slice`], so
/// `v` is 27 or 28 here.
pub fn ecrecover_input(digest: FixedBytes<32>, sig: &BatchSignature) -> [u8; 128] {
    let mut input = [0u8; 128];
    input[0..32].copy_from_slice(digest.as_slice());
    input[63] = sig.v();
    input[64..96].copy_from_slice(sig.r().as_slice());
    input[96..128].copy_from_slice(sig.s().as_slice());
    input
}

/// Read the precompile's answer. An empty or zero word means no key recovers.
pub fn recovered_address(out: &[u8]) -> Result<Address, SignatureError> {
    if out.len() < 32 {
        return Err(SignatureError::Unrecoverable);
    }
    // precompile returns 32-byte word with address in the low 20 bytes.
    let recovered = Address::from_slice(&out[12..32]);
    if recovered == Address::ZERO {
        return Err(SignatureError::Unrecoverable);
    }
    Ok(recovered)
}
