use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// Width of the packed `target` field.
const TARGET_LEN: usize = 20;
/// Width of the packed `value` field.
const VALUE_LEN: usize = 32;

/// One operation of a batch: send `value` wei to `target` with `data` as calldata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub target: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

impl Call {
    pub fn new(target: Address, value: U256, data: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            value,
            data: data.into(),
        }
    }

    /// Plain native-value transfer (empty calldata).
    pub fn transfer(target: Address, value: U256) -> Self {
        Self::new(target, value, Vec::new())
    }

    /// Length of this call's packed encoding.
    pub fn packed_len(&self) -> usize {
        TARGET_LEN + VALUE_LEN + self.data.len()
    }
}

/// Encode a batch as `target || value || data` per call, in order.
///
/// Matches Solidity `abi.encodePacked(to, value, data)` concatenated over the batch. The
/// encoding carries no length prefix for `data`, so two batches that differ only in where one
/// call's data ends and the next call begins can encode identically; signer and submitter must
/// agree on the exact batch out of band.
pub fn encode_calls(calls: &[Call]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(calls.iter().map(Call::packed_len).sum());
    for call in calls {
        buf.extend_from_slice(call.target.as_slice());
        buf.extend_from_slice(&call.value.to_be_bytes::<32>());
        buf.extend_from_slice(&call.data);
    }
    buf
}
