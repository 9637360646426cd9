//! Batch execution for an EIP-7702 delegated account.
//!
//! The program's address is the EOA itself, so the principal is `contract_address` and storage
//! slot 0 holds the sponsored-batch nonce. Both `execute` overloads share one dispatcher:
//! - `execute(calls)` succeeds only when the account calls itself.
//! - `execute(calls, signature)` accepts a signature over `(nonce, calls)` from any sender.
//!
//! A failing call reverts the whole transaction, which also undoes the nonce advance.
//!
//! The program is built `reentrant` so the account can receive value while a batch runs. Only
//! the `execute` paths are locked: entering either one while a batch is dispatching reverts with
//! `Reentrancy()`.

use alloc::vec::Vec;

use alloy_sol_types::sol;
use sponsored_batch_core::{
    self as batch, BatchSignature, Call as BatchCall, ExecutionHost, ExecutionRecord, NonceLedger,
    SignatureError,
};
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
    stylus_core::{
        calls::{context::Call as CallConfig, CallAccess},
        log,
    },
};

use crate::{
    errors::{BatchError, Reentrancy},
    utils::crypto::{ecrecover_input, recovered_address, ECRECOVER},
};

sol! {
    struct Call {
        address to;
        uint256 value;
        bytes data;
    }

    event CallExecuted(address indexed sender, address indexed to, uint256 value, bytes data);
    event BatchExecuted(uint256 indexed nonce, Call[] calls);
}

/// ABI shape of one call: `(address to, uint256 value, bytes data)`.
pub type AbiCall = (Address, U256, Bytes);

sol_storage! {
    #[entrypoint]
    pub struct BatchAccount {
        /// Next nonce a sponsored batch must be signed over.
        uint256 nonce;
        /// Set while a batch is dispatching.
        bool dispatching;
    }
}

#[public]
impl BatchAccount {
    /// Run `calls` when the account invokes itself.
    #[payable]
    #[selector(name = "execute")]
    pub fn execute_as_principal(&mut self, calls: Vec<AbiCall>) -> Result<(), BatchError> {
        let calls = into_batch(calls);
        self.locked(|account| batch::execute_as_principal(account, &calls))
    }

    /// Run `calls` authorised by the account key's signature over the current nonce.
    #[payable]
    #[selector(name = "execute")]
    pub fn execute_with_signature(
        &mut self,
        calls: Vec<AbiCall>,
        signature: Bytes,
    ) -> Result<(), BatchError> {
        let calls = into_batch(calls);
        self.locked(|account| batch::execute_with_signature(account, &calls, &signature.0))
            .map(|_| ())
    }

    pub fn nonce(&self) -> U256 {
        batch::current_nonce(self)
    }

    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        Ok(())
    }
}

impl BatchAccount {
    /// Run one entry point with the dispatch lock held.
    fn locked<T>(
        &mut self,
        run: impl FnOnce(&mut Self) -> Result<T, batch::ExecutionError>,
    ) -> Result<T, BatchError> {
        if self.dispatching.get() {
            return Err(BatchError::Reentrancy(Reentrancy {}));
        }
        self.dispatching.set(true);
        let result = run(self);
        self.dispatching.set(false);
        Ok(result?)
    }
}

impl NonceLedger for BatchAccount {
    fn current(&self) -> U256 {
        self.nonce.get()
    }

    fn advance(&mut self) {
        let next = self.nonce.get().saturating_add(U256::from(1u64));
        self.nonce.set(next);
    }
}

impl ExecutionHost for BatchAccount {
    fn principal(&self) -> Address {
        self.vm().contract_address()
    }

    fn caller(&self) -> Address {
        self.vm().msg_sender()
    }

    fn recover(
        &self,
        digest: FixedBytes<32>,
        signature: &BatchSignature,
    ) -> Result<Address, SignatureError> {
        let input = ecrecover_input(digest, signature);
        let out = self
            .vm()
            .static_call(&self, ECRECOVER, &input)
            .map_err(|_| SignatureError::Unrecoverable)?;
        recovered_address(&out)
    }

    fn dispatch(&mut self, call: &BatchCall) -> Result<(), Vec<u8>> {
        // The host clears the storage cache before a mutating call, so the nonce advance and
        // the lock are visible to anything the target calls back into.
        let vm = dyn_clone::clone_box(self.vm());
        let config = CallConfig::new_in(self).value(call.value);
        vm.call(&config, call.target, &call.data)
            .map(|_| ())
            .map_err(Vec::from)
    }

    fn record(&mut self, record: ExecutionRecord<'_>) {
        match record {
            ExecutionRecord::CallExecuted { sender, call } => log(
                self.vm(),
                CallExecuted {
                    sender,
                    to: call.target,
                    value: call.value,
                    data: call.data.clone().into(),
                },
            ),
            ExecutionRecord::BatchExecuted { nonce, calls } => log(
                self.vm(),
                BatchExecuted {
                    nonce,
                    calls: calls.iter().map(to_event_call).collect(),
                },
            ),
        }
    }
}

fn into_batch(calls: Vec<AbiCall>) -> Vec<BatchCall> {
    calls
        .into_iter()
        .map(|(target, value, data)| BatchCall::new(target, value, data.0))
        .collect()
}

fn to_event_call(call: &BatchCall) -> Call {
    Call {
        to: call.target,
        value: call.value,
        data: call.data.clone().into(),
    }
}
