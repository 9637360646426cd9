//! Stylus program installed as the code of an EIP-7702 delegated EOA.
//!
//! The account is its own principal: it may run a batch by calling itself, or anyone may submit
//! a batch carrying the account key's signature over the current nonce.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

extern crate alloc;

pub mod batch_account;
pub mod errors;
pub mod utils;

pub use batch_account::BatchAccount;
