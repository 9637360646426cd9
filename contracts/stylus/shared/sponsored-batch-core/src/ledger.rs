use alloy_primitives::U256;

/// Replay counter of a single principal.
///
/// Only the sponsored path advances it, exactly once per accepted batch and before any call of
/// that batch is dispatched.
pub trait NonceLedger {
    /// Value the next sponsored batch must be signed over.
    fn current(&self) -> U256;

    /// Consume the current value. Infallible; increases by exactly one.
    fn advance(&mut self);
}

/// In-memory nonce record for one principal. Starts at zero on activation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NonceRecord {
    nonce: U256,
}

impl NonceRecord {
    pub const fn new() -> Self {
        Self { nonce: U256::ZERO }
    }
}

impl NonceLedger for NonceRecord {
    fn current(&self) -> U256 {
        self.nonce
    }

    fn advance(&mut self) {
        // 2^256 accepted batches are out of reach; saturating keeps `advance` infallible.
        self.nonce = self.nonce.saturating_add(U256::from(1u64));
    }
}
