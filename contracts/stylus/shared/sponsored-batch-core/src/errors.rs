use alloc::vec::Vec;
use core::fmt;

use alloy_primitives::Address;

/// Reasons a signature is rejected before (or during) signer recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureError {
    /// Not exactly 65 bytes.
    InvalidLength(usize),
    /// `r` is zero or not below the curve order.
    InvalidR,
    /// `s` is zero or not below the curve order.
    InvalidS,
    /// `s` lies in the upper half of the curve order (malleable twin).
    HighS,
    /// `v` is not one of 0, 1, 27, 28.
    InvalidV(u8),
    /// Structurally sound, but no public key recovers from it.
    Unrecoverable,
}

/// Terminal outcome of a rejected execution. No variant leaves partial effects behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Direct path invoked by someone other than the principal.
    NotAuthorized { caller: Address },
    /// The signature is not a usable `(r, s, v)` triplet.
    MalformedSignature(SignatureError),
    /// The signature recovers to someone other than the principal for the current nonce.
    InvalidSignature { recovered: Address },
    /// The call at `index` was rejected by its target; `reason` is the raw revert data.
    OperationFailed { index: usize, reason: Vec<u8> },
}

impl From<SignatureError> for ExecutionError {
    fn from(err: SignatureError) -> Self {
        Self::MalformedSignature(err)
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => write!(f, "signature must be 65 bytes, got {len}"),
            Self::InvalidR => f.write_str("signature r is out of range"),
            Self::InvalidS => f.write_str("signature s is out of range"),
            Self::HighS => f.write_str("signature s is in the upper half of the curve order"),
            Self::InvalidV(v) => write!(f, "signature v {v} is not a recovery id"),
            Self::Unrecoverable => f.write_str("no public key recovers from signature"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthorized { caller } => write!(f, "caller {caller} is not the principal"),
            Self::MalformedSignature(err) => write!(f, "malformed signature: {err}"),
            Self::InvalidSignature { recovered } => {
                write!(f, "signature recovers to {recovered}, not the principal")
            }
            Self::OperationFailed { index, reason } => {
                write!(f, "call {index} reverted ({} bytes of revert data)", reason.len())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SignatureError {}

#[cfg(feature = "std")]
impl std::error::Error for ExecutionError {}
