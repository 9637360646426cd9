//! The seam between the dispatcher and the environment it runs in.

use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes, U256};

use crate::{call::Call, errors::SignatureError, ledger::NonceLedger, signature::BatchSignature};

/// Observable outcome of a dispatched call or an accepted sponsored batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionRecord<'a> {
    /// A single call succeeded. `sender` is whoever invoked the entry point.
    CallExecuted { sender: Address, call: &'a Call },
    /// A sponsored batch completed; `nonce` is the value it consumed.
    BatchExecuted { nonce: U256, calls: &'a [Call] },
}

/// Environment the dispatcher acts through, implemented on-chain and off-chain.
///
/// A host is one unit of work: every effect made through it (ledger advance, dispatched calls,
/// records) must be discarded by the environment when an entry point returns `Err`, and kept
/// only when it returns `Ok`.
pub trait ExecutionHost: NonceLedger {
    /// Identity the engine acts for.
    fn principal(&self) -> Address;

    /// Identity invoking the current entry point.
    fn caller(&self) -> Address;

    /// Recover the signer of `digest`.
    fn recover(
        &self,
        digest: FixedBytes<32>,
        signature: &BatchSignature,
    ) -> Result<Address, SignatureError>;

    /// Perform one call from the principal's account. `Err` carries the target's revert data.
    fn dispatch(&mut self, call: &Call) -> Result<(), Vec<u8>>;

    fn record(&mut self, record: ExecutionRecord<'_>);
}
