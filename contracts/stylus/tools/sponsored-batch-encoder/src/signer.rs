use std::fmt;

use alloy_primitives::{Address, FixedBytes, U256};
use k256::ecdsa::{RecoveryId, SigningKey, VerifyingKey};
use sha3::{Digest, Keccak256};
use sponsored_batch_core::{signing_digest, BatchSignature, Call};

use crate::errors::EncoderError;

/// Ethereum address of a secp256k1 public key: low 20 bytes of `keccak256(x || y)`.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let mut h = Keccak256::new();
    h.update(&point.as_bytes()[1..]);
    let out = h.finalize();
    Address::from_slice(&out[12..32])
}

/// The principal's signing key.
pub struct BatchSigner {
    key: SigningKey,
    address: Address,
}

impl BatchSigner {
    pub fn new(key: SigningKey) -> Self {
        let address = address_of(key.verifying_key());
        Self { key, address }
    }

    /// Build from a raw 32-byte secret scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self, EncoderError> {
        let key = SigningKey::from_slice(secret).map_err(EncoderError::InvalidKey)?;
        Ok(Self::new(key))
    }

    /// Build from a hex secret, with or without `0x`. Surrounding whitespace is ignored so key
    /// files can end in a newline.
    pub fn from_hex(secret: &str) -> Result<Self, EncoderError> {
        let trimmed = secret.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        Self::from_slice(&hex::decode(digits)?)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a 32-byte prehash. The result is always low-`s`.
    pub fn sign_digest(&self, digest: FixedBytes<32>) -> Result<BatchSignature, EncoderError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(EncoderError::Signing)?;
        let (signature, recovery_id) = match signature.normalize_s() {
            Some(low) => (
                low,
                RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced()),
            ),
            None => (signature, recovery_id),
        };

        let (r, s) = signature.split_bytes();
        let mut sig_bytes = Vec::with_capacity(65);
        sig_bytes.extend_from_slice(r.as_slice());
        sig_bytes.extend_from_slice(s.as_slice());
        sig_bytes.push(27 + u8::from(recovery_id.is_y_odd()));
        Ok(BatchSignature::from_slice(&sig_bytes)?)
    }

    /// Sign `(nonce, calls)` the way the program verifies it.
    pub fn sign_batch(&self, nonce: U256, calls: &[Call]) -> Result<BatchSignature, EncoderError> {
        let signature = self.sign_digest(signing_digest(nonce, calls))?;
        tracing::debug!(
            signer = %self.address,
            %nonce,
            calls = calls.len(),
            "signed batch"
        );
        Ok(signature)
    }
}

impl fmt::Debug for BatchSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
