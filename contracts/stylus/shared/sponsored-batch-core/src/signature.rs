//! 65-byte `r || s || v` secp256k1 signatures.
//!
//! Parsing enforces everything that can be checked without curve arithmetic, so that both
//! recovery back-ends (the `ecrecover` precompile and `k256`) only ever see canonical input.

use alloy_primitives::{FixedBytes, U256};

use crate::errors::SignatureError;

pub const SIGNATURE_LENGTH: usize = 65;

/// secp256k1 group order `n`.
pub const SECP256K1N: U256 = U256::from_limbs([
    0xBFD2_5E8C_D036_4141,
    0xBAAE_DCE6_AF48_A03B,
    0xFFFF_FFFF_FFFF_FFFE,
    0xFFFF_FFFF_FFFF_FFFF,
]);

/// `n / 2`; any valid `s` above this has a low-`s` twin and is rejected.
pub const SECP256K1N_HALF: U256 = U256::from_limbs([
    0xDFE9_2F46_681B_20A0,
    0x5D57_6E73_57A4_501D,
    0xFFFF_FFFF_FFFF_FFFF,
    0x7FFF_FFFF_FFFF_FFFF,
]);

/// A structurally valid, low-`s` recoverable signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchSignature {
    r: FixedBytes<32>,
    s: FixedBytes<32>,
    y_parity: bool,
}

impl BatchSignature {
    /// Parse `r (32) || s (32) || v (1)`.
    ///
    /// `v` may be given as 27/28 or as the raw parity 0/1.
    pub fn from_slice(sig: &[u8]) -> Result<Self, SignatureError> {
        if sig.len() != SIGNATURE_LENGTH {
            return Err(SignatureError::InvalidLength(sig.len()));
        }

        let r = U256::from_be_slice(&sig[0..32]);
        if r.is_zero() || r >= SECP256K1N {
            return Err(SignatureError::InvalidR);
        }
        let s = U256::from_be_slice(&sig[32..64]);
        if s.is_zero() || s >= SECP256K1N {
            return Err(SignatureError::InvalidS);
        }
        if s > SECP256K1N_HALF {
            return Err(SignatureError::HighS);
        }

        let y_parity = match sig[64] {
            0 | 27 => false,
            1 | 28 => true,
            v => return Err(SignatureError::InvalidV(v)),
        };

        Ok(Self {
            r: FixedBytes::from_slice(&sig[0..32]),
            s: FixedBytes::from_slice(&sig[32..64]),
            y_parity,
        })
    }

    pub fn r(&self) -> FixedBytes<32> {
        self.r
    }

    pub fn s(&self) -> FixedBytes<32> {
        self.s
    }

    pub fn y_parity(&self) -> bool {
        self.y_parity
    }

    /// Ethereum-style `v` (27 or 28).
    pub fn v(&self) -> u8 {
        27 + u8::from(self.y_parity)
    }

    /// Canonical wire form with `v` in {27, 28}.
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[0..32].copy_from_slice(self.r.as_slice());
        out[32..64].copy_from_slice(self.s.as_slice());
        out[64] = self.v();
        out
    }
}

impl TryFrom<&[u8]> for BatchSignature {
    type Error = SignatureError;

    fn try_from(sig: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(sig)
    }
}
