//! Off-chain counterpart of the sponsored batch program.
//!
//! Signs batches for a principal, recovers signers the same way the program does, and encodes
//! the `execute` calldata a sponsor submits.

pub mod abi;
pub mod batch_file;
pub mod errors;
pub mod recover;
pub mod signer;

pub use errors::EncoderError;
pub use recover::{recover_batch_signer, recover_signer};
pub use signer::{address_of, BatchSigner};
