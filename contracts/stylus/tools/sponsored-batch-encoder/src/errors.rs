use std::path::PathBuf;

use sponsored_batch_core::SignatureError;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("invalid signing key: {0}")]
    InvalidKey(#[source] k256::ecdsa::Error),

    #[error("signing failed: {0}")]
    Signing(#[source] k256::ecdsa::Error),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("invalid batch JSON: {0}")]
    BatchJson(#[from] serde_json::Error),

    #[error("failed reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("calldata does not match the batch account ABI: {0}")]
    Abi(#[from] alloy_sol_types::Error),
}
