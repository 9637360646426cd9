//! Signer recovery with `k256`, equivalent to the `ecrecover` precompile on canonical input.

use alloy_primitives::{Address, FixedBytes, U256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sponsored_batch_core::{signing_digest, BatchSignature, Call, SignatureError};

use crate::signer::address_of;

pub fn recover_signer(
    digest: FixedBytes<32>,
    signature: &BatchSignature,
) -> Result<Address, SignatureError> {
    let bytes = signature.to_bytes();
    let sig = Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::Unrecoverable)?;
    let recovery_id = RecoveryId::new(signature.y_parity(), false);
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id)
        .map_err(|_| SignatureError::Unrecoverable)?;
    Ok(address_of(&key))
}

/// Recover who signed `calls` at `nonce` from raw signature bytes.
pub fn recover_batch_signer(
    nonce: U256,
    calls: &[Call],
    signature: &[u8],
) -> Result<Address, SignatureError> {
    let signature = BatchSignature::from_slice(signature)?;
    recover_signer(signing_digest(nonce, calls), &signature)
}
