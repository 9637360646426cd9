use alloy_primitives::{Address, FixedBytes, U256};
use sponsored_batch_core::{
    BatchSignature, Call, ExecutionHost, ExecutionRecord, NonceLedger, SignatureError,
};
use sponsored_batch_encoder::recover_signer;

use crate::world::{LogEntry, World};

/// Engine host for one principal over a staged world.
pub(crate) struct PrincipalHost<'w> {
    world: &'w mut World,
    principal: Address,
    caller: Address,
}

impl<'w> PrincipalHost<'w> {
    pub(crate) fn new(world: &'w mut World, principal: Address, caller: Address) -> Self {
        Self {
            world,
            principal,
            caller,
        }
    }
}

impl NonceLedger for PrincipalHost<'_> {
    fn current(&self) -> U256 {
        self.world
            .engines
            .get(&self.principal)
            .map_or(U256::ZERO, NonceLedger::current)
    }

    fn advance(&mut self) {
        let record = self.world.engines.entry(self.principal).or_default();
        record.advance();
        tracing::debug!(principal = %self.principal, nonce = %record.current(), "nonce advanced");
    }
}

impl ExecutionHost for PrincipalHost<'_> {
    fn principal(&self) -> Address {
        self.principal
    }

    fn caller(&self) -> Address {
        self.caller
    }

    fn recover(
        &self,
        digest: FixedBytes<32>,
        signature: &BatchSignature,
    ) -> Result<Address, SignatureError> {
        recover_signer(digest, signature)
    }

    fn dispatch(&mut self, call: &Call) -> Result<(), Vec<u8>> {
        tracing::debug!(
            principal = %self.principal,
            target = %call.target,
            value = %call.value,
            data_len = call.data.len(),
            "dispatching call"
        );
        self.world
            .message_call(self.principal, call.target, call.value, &call.data)
            .map_err(|err| {
                tracing::debug!(principal = %self.principal, target = %call.target, %err, "call reverted");
                err.revert_data()
            })
    }

    fn record(&mut self, record: ExecutionRecord<'_>) {
        let entry = match record {
            ExecutionRecord::CallExecuted { sender, call } => LogEntry::CallExecuted {
                account: self.principal,
                sender,
                call: call.clone(),
            },
            ExecutionRecord::BatchExecuted { nonce, calls } => LogEntry::BatchExecuted {
                account: self.principal,
                nonce,
                calls: calls.to_vec(),
            },
        };
        self.world.logs.push(entry);
    }
}
