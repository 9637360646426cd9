//! Minimal ERC-20-like target used as an opaque call destination.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, Panic, PanicKind, SolCall, SolError, SolInterface};

sol! {
    interface IMockToken {
        function mint(address to, uint256 amount) external;
        function transfer(address to, uint256 amount) external returns (bool);

        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
    }
}

pub fn encode_mint(to: Address, amount: U256) -> Vec<u8> {
    IMockToken::mintCall { to, amount }.abi_encode()
}

pub fn encode_transfer(to: Address, amount: U256) -> Vec<u8> {
    IMockToken::transferCall { to, amount }.abi_encode()
}

/// Token with unrestricted minting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockToken {
    balances: BTreeMap<Address, U256>,
    total_supply: U256,
}

impl MockToken {
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Execute `data` sent by `from`. `Err` carries revert data.
    pub fn invoke(&mut self, from: Address, data: &[u8]) -> Result<(), Vec<u8>> {
        let call = IMockToken::IMockTokenCalls::abi_decode(data, true).map_err(|_| Vec::new())?;
        match call {
            IMockToken::IMockTokenCalls::mint(IMockToken::mintCall { to, amount }) => {
                self.total_supply = checked_add(self.total_supply, amount)?;
                self.credit(to, amount)?;
            }
            IMockToken::IMockTokenCalls::transfer(IMockToken::transferCall { to, amount }) => {
                let balance = self.balance_of(from);
                if balance < amount {
                    return Err(IMockToken::ERC20InsufficientBalance {
                        sender: from,
                        balance,
                        needed: amount,
                    }
                    .abi_encode());
                }
                self.balances.insert(from, balance - amount);
                self.credit(to, amount)?;
            }
        }
        Ok(())
    }

    fn credit(&mut self, account: Address, amount: U256) -> Result<(), Vec<u8>> {
        let balance = self.balances.entry(account).or_default();
        *balance = checked_add(*balance, amount)?;
        Ok(())
    }
}

/// Checked addition reverting with `Panic(0x11)`, as a Solidity 0.8 token does.
fn checked_add(a: U256, b: U256) -> Result<U256, Vec<u8>> {
    a.checked_add(b)
        .ok_or_else(|| Panic::from(PanicKind::UnderOverflow).abi_encode())
}
