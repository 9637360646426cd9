//! Solidity ABI of the delegated batch account.
//!
//! Mirrors the `#[public]` surface and `sol!` errors/events of the Stylus program, so calldata
//! built here is exactly what the program decodes.

use alloy_primitives::{Bytes, U256};
use alloy_sol_types::{sol, SolCall, SolError, SolInterface};
use sponsored_batch_core::{Call, ExecutionError};

use crate::errors::EncoderError;

sol! {
    interface IBatchAccount {
        struct Call {
            address to;
            uint256 value;
            bytes data;
        }

        event CallExecuted(address indexed sender, address indexed to, uint256 value, bytes data);
        event BatchExecuted(uint256 indexed nonce, Call[] calls);

        error NotAuthorized();
        error MalformedSignature();
        error InvalidSignature();
        error CallReverted(uint256 index, bytes reason);
        error Reentrancy();

        function execute(Call[] calldata calls) external payable;
        function execute(Call[] calldata calls, bytes calldata signature) external payable;
        function nonce() external view returns (uint256);
    }
}

/// Decoded entry into the batch account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryCall {
    AsPrincipal(Vec<Call>),
    WithSignature { calls: Vec<Call>, signature: Vec<u8> },
    Nonce,
}

pub fn to_abi_calls(calls: &[Call]) -> Vec<IBatchAccount::Call> {
    calls
        .iter()
        .map(|call| IBatchAccount::Call {
            to: call.target,
            value: call.value,
            data: Bytes::from(call.data.clone()),
        })
        .collect()
}

pub fn from_abi_calls(calls: Vec<IBatchAccount::Call>) -> Vec<Call> {
    calls
        .into_iter()
        .map(|call| Call::new(call.to, call.value, call.data.to_vec()))
        .collect()
}

/// Calldata for `execute(Call[])`, the principal's own path.
pub fn encode_execute(calls: &[Call]) -> Vec<u8> {
    IBatchAccount::execute_0Call {
        calls: to_abi_calls(calls),
    }
    .abi_encode()
}

/// Calldata for `execute(Call[],bytes)`, the sponsored path.
pub fn encode_execute_with_signature(calls: &[Call], signature: &[u8]) -> Vec<u8> {
    IBatchAccount::execute_1Call {
        calls: to_abi_calls(calls),
        signature: Bytes::copy_from_slice(signature),
    }
    .abi_encode()
}

pub fn encode_nonce() -> Vec<u8> {
    IBatchAccount::nonceCall {}.abi_encode()
}

pub fn decode_entry(data: &[u8]) -> Result<EntryCall, EncoderError> {
    let entry = match IBatchAccount::IBatchAccountCalls::abi_decode(data, true)? {
        IBatchAccount::IBatchAccountCalls::execute_0(call) => {
            EntryCall::AsPrincipal(from_abi_calls(call.calls))
        }
        IBatchAccount::IBatchAccountCalls::execute_1(call) => EntryCall::WithSignature {
            calls: from_abi_calls(call.calls),
            signature: call.signature.to_vec(),
        },
        IBatchAccount::IBatchAccountCalls::nonce(_) => EntryCall::Nonce,
    };
    Ok(entry)
}

/// Revert data the program returns for `err`.
pub fn revert_data(err: &ExecutionError) -> Vec<u8> {
    match err {
        ExecutionError::NotAuthorized { .. } => IBatchAccount::NotAuthorized {}.abi_encode(),
        ExecutionError::MalformedSignature(_) => IBatchAccount::MalformedSignature {}.abi_encode(),
        ExecutionError::InvalidSignature { .. } => IBatchAccount::InvalidSignature {}.abi_encode(),
        ExecutionError::OperationFailed { index, reason } => IBatchAccount::CallReverted {
            index: U256::from(*index),
            reason: Bytes::from(reason.clone()),
        }
        .abi_encode(),
    }
}
