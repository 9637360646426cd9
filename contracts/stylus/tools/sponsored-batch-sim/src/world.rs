use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, U256};
use sponsored_batch_core::{
    current_nonce, execute_as_principal, execute_with_signature, Call, ExecutionError, NonceRecord,
};
use sponsored_batch_encoder::abi::{decode_entry, EntryCall};

use crate::{errors::SimError, host::PrincipalHost, token::MockToken};

/// Record emitted by a principal's engine, in emission order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEntry {
    CallExecuted {
        account: Address,
        sender: Address,
        call: Call,
    },
    BatchExecuted {
        account: Address,
        nonce: U256,
        calls: Vec<Call>,
    },
}

/// Simulated chain state.
#[derive(Clone, Debug, Default)]
pub struct World {
    pub(crate) balances: BTreeMap<Address, U256>,
    /// Accounts running the batch engine, with their nonce record.
    pub(crate) engines: BTreeMap<Address, NonceRecord>,
    pub(crate) tokens: BTreeMap<Address, MockToken>,
    /// Principals whose batch is mid-dispatch in the current transaction.
    pub(crate) dispatching: BTreeSet<Address>,
    pub(crate) logs: Vec<LogEntry>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the batch engine as `principal`'s code. The nonce starts at zero on first
    /// activation and is kept across repeated activation.
    pub fn activate(&mut self, principal: Address) {
        self.engines.entry(principal).or_insert_with(NonceRecord::new);
        tracing::info!(%principal, "batch engine activated");
    }

    pub fn is_active(&self, account: Address) -> bool {
        self.engines.contains_key(&account)
    }

    pub fn fund(&mut self, account: Address, amount: U256) -> Result<(), SimError> {
        self.credit(account, amount)
    }

    pub fn deploy_token(&mut self, address: Address) {
        self.tokens.entry(address).or_default();
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn token(&self, address: Address) -> Option<&MockToken> {
        self.tokens.get(&address)
    }

    pub fn nonce_of(&self, principal: Address) -> Result<U256, SimError> {
        self.engines
            .get(&principal)
            .map(current_nonce)
            .ok_or(SimError::NotActivated(principal))
    }

    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// `caller` invokes `execute(calls)` on `principal`.
    pub fn execute_as_principal(
        &mut self,
        caller: Address,
        principal: Address,
        calls: &[Call],
    ) -> Result<(), SimError> {
        self.commit_if_ok(|world| {
            world.enter(principal, caller, |host| execute_as_principal(host, calls))
        })
    }

    /// `sponsor` invokes `execute(calls, signature)` on `principal`. Returns the consumed nonce.
    pub fn execute_with_signature(
        &mut self,
        sponsor: Address,
        principal: Address,
        calls: &[Call],
        signature: &[u8],
    ) -> Result<U256, SimError> {
        self.commit_if_ok(|world| {
            world.enter(principal, sponsor, |host| {
                execute_with_signature(host, calls, signature)
            })
        })
    }

    /// Top-level transaction from `from` to `to` carrying `value` and ABI calldata.
    pub fn transact(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<(), SimError> {
        self.commit_if_ok(|world| world.message_call(from, to, value, data))
    }

    /// Run `f` on a staged copy and keep the copy only if `f` succeeds.
    fn commit_if_ok<T>(
        &mut self,
        f: impl FnOnce(&mut World) -> Result<T, SimError>,
    ) -> Result<T, SimError> {
        let mut staged = self.clone();
        match f(&mut staged) {
            Ok(out) => {
                *self = staged;
                Ok(out)
            }
            Err(err) => {
                tracing::warn!(%err, "transaction reverted; staged state discarded");
                Err(err)
            }
        }
    }

    /// A call frame inside an already staged transaction.
    pub(crate) fn message_call(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
        data: &[u8],
    ) -> Result<(), SimError> {
        self.transfer(from, to, value)?;
        if data.is_empty() {
            return Ok(());
        }

        if self.engines.contains_key(&to) {
            let entry = decode_entry(data).map_err(|err| SimError::BadCalldata(err.to_string()))?;
            return match entry {
                EntryCall::AsPrincipal(calls) => {
                    self.enter(to, from, |host| execute_as_principal(host, &calls))
                }
                EntryCall::WithSignature { calls, signature } => self
                    .enter(to, from, |host| {
                        execute_with_signature(host, &calls, &signature)
                    })
                    .map(|_| ()),
                EntryCall::Nonce => Ok(()),
            };
        }

        if let Some(token) = self.tokens.get_mut(&to) {
            return token
                .invoke(from, data)
                .map_err(|data| SimError::TokenReverted { token: to, data });
        }

        // Account without code: calldata is ignored.
        Ok(())
    }

    fn transfer(&mut self, from: Address, to: Address, value: U256) -> Result<(), SimError> {
        if value.is_zero() {
            return Ok(());
        }
        let balance = self.balance_of(from);
        if balance < value {
            return Err(SimError::InsufficientBalance {
                account: from,
                balance,
                needed: value,
            });
        }
        self.balances.insert(from, balance - value);
        self.credit(to, value)
    }

    fn credit(&mut self, account: Address, amount: U256) -> Result<(), SimError> {
        let balance = self.balances.entry(account).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(SimError::BalanceOverflow(account))?;
        Ok(())
    }

    /// Enter `principal`'s engine. Re-entering a principal whose batch is still dispatching is
    /// refused.
    fn enter<T>(
        &mut self,
        principal: Address,
        caller: Address,
        run: impl FnOnce(&mut PrincipalHost<'_>) -> Result<T, ExecutionError>,
    ) -> Result<T, SimError> {
        if !self.engines.contains_key(&principal) {
            return Err(SimError::NotActivated(principal));
        }
        if !self.dispatching.insert(principal) {
            return Err(SimError::Reentrancy(principal));
        }

        let result = run(&mut PrincipalHost::new(self, principal, caller));

        self.dispatching.remove(&principal);
        result.map_err(SimError::from)
    }
}
