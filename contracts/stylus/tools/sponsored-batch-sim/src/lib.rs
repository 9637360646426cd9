//! In-memory execution environment for the sponsored batch engine.
//!
//! [`World`] holds native balances, delegated principals (each with its nonce record) and mock
//! token targets. Every top-level transaction runs against a staged copy of the world that is
//! committed only if the transaction succeeds, which gives batches the all-or-nothing behaviour
//! the chain provides on revert.

pub mod errors;
mod host;
pub mod token;
pub mod world;

pub use errors::SimError;
pub use token::MockToken;
pub use world::{LogEntry, World};
