//! JSON batch files.
//!
//! ```json
//! [
//!   { "target": "0x…", "value": "0x1", "data": "0x" },
//!   { "target": "0x…" }
//! ]
//! ```
//!
//! `value` and `data` default to zero and empty.

use std::{fs, path::Path};

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};
use sponsored_batch_core::Call;

use crate::errors::EncoderError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallEntry {
    pub target: Address,
    #[serde(default)]
    pub value: U256,
    #[serde(default)]
    pub data: Bytes,
}

impl From<CallEntry> for Call {
    fn from(entry: CallEntry) -> Self {
        Call::new(entry.target, entry.value, entry.data.to_vec())
    }
}

impl From<&Call> for CallEntry {
    fn from(call: &Call) -> Self {
        Self {
            target: call.target,
            value: call.value,
            data: Bytes::from(call.data.clone()),
        }
    }
}

pub fn parse_batch(json: &str) -> Result<Vec<Call>, EncoderError> {
    let entries: Vec<CallEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(Call::from).collect())
}

pub fn load_batch(path: &Path) -> Result<Vec<Call>, EncoderError> {
    let json = fs::read_to_string(path).map_err(|source| EncoderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_batch(&json)
}

pub fn batch_to_json(calls: &[Call]) -> Result<String, EncoderError> {
    let entries: Vec<CallEntry> = calls.iter().map(CallEntry::from).collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}
