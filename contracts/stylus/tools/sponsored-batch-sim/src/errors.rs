use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, Panic, PanicKind, SolError};
use sponsored_batch_core::ExecutionError;
use sponsored_batch_encoder::abi;

sol! {
    /// Reverts raised by the simulated environment itself rather than by the engine.
    interface IWorld {
        error NoEngine(address account);
        error InsufficientBalance(address account, uint256 balance, uint256 needed);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimError {
    #[error("{0} has no active batch engine")]
    NotActivated(Address),

    #[error("batch engine of {0} entered while it is dispatching")]
    Reentrancy(Address),

    #[error("{account} holds {balance} wei, needs {needed}")]
    InsufficientBalance {
        account: Address,
        balance: U256,
        needed: U256,
    },

    #[error("balance of {0} would overflow")]
    BalanceOverflow(Address),

    #[error("token {token} reverted")]
    TokenReverted { token: Address, data: Vec<u8> },

    #[error("calldata rejected: {0}")]
    BadCalldata(String),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl SimError {
    /// Revert data a caller of the failing frame observes.
    pub fn revert_data(&self) -> Vec<u8> {
        match self {
            Self::NotActivated(account) => IWorld::NoEngine { account: *account }.abi_encode(),
            Self::Reentrancy(_) => abi::IBatchAccount::Reentrancy {}.abi_encode(),
            Self::InsufficientBalance {
                account,
                balance,
                needed,
            } => IWorld::InsufficientBalance {
                account: *account,
                balance: *balance,
                needed: *needed,
            }
            .abi_encode(),
            Self::BalanceOverflow(_) => Panic::from(PanicKind::UnderOverflow).abi_encode(),
            Self::TokenReverted { data, .. } => data.clone(),
            Self::BadCalldata(_) => Vec::new(),
            Self::Execution(err) => abi::revert_data(err),
        }
    }
}
