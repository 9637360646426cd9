use alloy_sol_types::sol;
use sponsored_batch_core::ExecutionError;
use stylus_sdk::{alloy_primitives::U256, stylus_proc::SolidityError};

sol! {
    error NotAuthorized();
    error MalformedSignature();
    error InvalidSignature();
    error CallReverted(uint256 index, bytes reason);
    error Reentrancy();
}

/// Revert reasons surfaced by the `execute` entry points.
#[derive(SolidityError)]
pub enum BatchError {
    NotAuthorized(NotAuthorized),
    MalformedSignature(MalformedSignature),
    InvalidSignature(InvalidSignature),
    CallReverted(CallReverted),
    Reentrancy(Reentrancy),
}

impl From<ExecutionError> for BatchError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::NotAuthorized { .. } => Self::NotAuthorized(NotAuthorized {}),
            ExecutionError::MalformedSignature(_) => Self::MalformedSignature(MalformedSignature {}),
            ExecutionError::InvalidSignature { .. } => Self::InvalidSignature(InvalidSignature {}),
            ExecutionError::OperationFailed { index, reason } => {
                Self::CallReverted(CallReverted {
                    index: U256::from(index),
                    reason: reason.into(),
                })
            }
        }
    }
}
