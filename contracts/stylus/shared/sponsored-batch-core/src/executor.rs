//! Dispatcher entry points.

use alloy_primitives::U256;

use crate::{
    call::Call,
    digest::signing_digest,
    errors::ExecutionError,
    host::{ExecutionHost, ExecutionRecord},
    ledger::NonceLedger,
    signature::BatchSignature,
};

/// Read-only view of the principal's nonce.
pub fn current_nonce<L: NonceLedger + ?Sized>(ledger: &L) -> U256 {
    ledger.current()
}

/// Run `calls` on behalf of the principal, invoked by the principal itself.
///
/// No signature is involved and the nonce is neither read nor advanced.
pub fn execute_as_principal<H: ExecutionHost + ?Sized>(
    host: &mut H,
    calls: &[Call],
) -> Result<(), ExecutionError> {
    let caller = host.caller();
    if caller != host.principal() {
        return Err(ExecutionError::NotAuthorized { caller });
    }
    dispatch_calls(host, calls)
}

/// Run `calls` authorised by the principal's signature over the current nonce.
///
/// Returns the consumed nonce. The nonce is advanced before the first call is dispatched, so a
/// nested attempt to reuse `signature` during dispatch already sees the next value.
pub fn execute_with_signature<H: ExecutionHost + ?Sized>(
    host: &mut H,
    calls: &[Call],
    signature: &[u8],
) -> Result<U256, ExecutionError> {
    let signature = BatchSignature::from_slice(signature)?;

    let nonce = host.current();
    let digest = signing_digest(nonce, calls);
    let recovered = host.recover(digest, &signature)?;
    if recovered != host.principal() {
        return Err(ExecutionError::InvalidSignature { recovered });
    }

    host.advance();
    dispatch_calls(host, calls)?;

    host.record(ExecutionRecord::BatchExecuted { nonce, calls });
    Ok(nonce)
}

/// Dispatch in order; the first failure aborts the batch.
fn dispatch_calls<H: ExecutionHost + ?Sized>(
    host: &mut H,
    calls: &[Call],
) -> Result<(), ExecutionError> {
    let sender = host.caller();
    for (index, call) in calls.iter().enumerate() {
        host.dispatch(call)
            .map_err(|reason| ExecutionError::OperationFailed { index, reason })?;
        host.record(ExecutionRecord::CallExecuted { sender, call });
    }
    Ok(())
}
