use alloc::{vec, vec::Vec};

use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};

use crate::{
    batch_digest, encode_calls, execute_as_principal, execute_with_signature, signed_message_digest,
    signing_digest, BatchSignature, Call, ExecutionError, ExecutionHost, ExecutionRecord,
    NonceLedger, NonceRecord, SignatureError, SECP256K1N, SECP256K1N_HALF, SIGNED_MESSAGE_PREFIX,
};

fn key(byte: u8) -> SigningKey {
    SigningKey::from_slice(&[byte; 32]).unwrap()
}

fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

fn sign(key: &SigningKey, digest: FixedBytes<32>) -> Vec<u8> {
    let (sig, recid) = key.sign_prehash_recoverable(digest.as_slice()).unwrap();
    let (sig, recid) = match sig.normalize_s() {
        Some(low) => (low, RecoveryId::new(!recid.is_y_odd(), recid.is_x_reduced())),
        None => (sig, recid),
    };
    let mut out = sig.to_bytes().to_vec();
    out.push(27 + u8::from(recid.is_y_odd()));
    out
}

fn recover(digest: FixedBytes<32>, sig: &BatchSignature) -> Result<Address, SignatureError> {
    let bytes = sig.to_bytes();
    let signature = Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::Unrecoverable)?;
    let recid = RecoveryId::new(sig.y_parity(), false);
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recid)
        .map_err(|_| SignatureError::Unrecoverable)?;
    Ok(address_of(&key))
}

#[derive(Debug, PartialEq, Eq)]
enum Recorded {
    Call { sender: Address, call: Call },
    Batch { nonce: U256, calls: Vec<Call> },
}

/// Host that keeps everything it is handed; discarding on error is left to the caller.
struct MockHost {
    principal: Address,
    caller: Address,
    ledger: NonceRecord,
    reject: Option<Address>,
    dispatched: Vec<(U256, Call)>,
    records: Vec<Recorded>,
}

impl MockHost {
    fn new(principal: Address, caller: Address) -> Self {
        Self {
            principal,
            caller,
            ledger: NonceRecord::new(),
            reject: None,
            dispatched: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl NonceLedger for MockHost {
    fn current(&self) -> U256 {
        self.ledger.current()
    }

    fn advance(&mut self) {
        self.ledger.advance();
    }
}

impl ExecutionHost for MockHost {
    fn principal(&self) -> Address {
        self.principal
    }

    fn caller(&self) -> Address {
        self.caller
    }

    fn recover(
        &self,
        digest: FixedBytes<32>,
        signature: &BatchSignature,
    ) -> Result<Address, SignatureError> {
        recover(digest, signature)
    }

    fn dispatch(&mut self, call: &Call) -> Result<(), Vec<u8>> {
        if self.reject == Some(call.target) {
            return Err(b"rejected".to_vec());
        }
        self.dispatched.push((self.ledger.current(), call.clone()));
        Ok(())
    }

    fn record(&mut self, record: ExecutionRecord<'_>) {
        self.records.push(match record {
            ExecutionRecord::CallExecuted { sender, call } => Recorded::Call {
                sender,
                call: call.clone(),
            },
            ExecutionRecord::BatchExecuted { nonce, calls } => Recorded::Batch {
                nonce,
                calls: calls.to_vec(),
            },
        });
    }
}

fn principal_key() -> SigningKey {
    key(0x11)
}

fn principal() -> Address {
    address_of(principal_key().verifying_key())
}

const SPONSOR: Address = Address::repeat_byte(0x5a);
const X: Address = Address::repeat_byte(0x01);
const Y: Address = Address::repeat_byte(0x02);

#[test]
fn encode_calls_packs_target_value_data() {
    let calls = vec![
        Call::new(X, U256::from(7u64), vec![0xaa, 0xbb]),
        Call::transfer(Y, U256::from(1u64)),
    ];
    let encoded = encode_calls(&calls);

    assert_eq!(encoded.len(), (20 + 32 + 2) + (20 + 32));
    assert_eq!(&encoded[0..20], X.as_slice());
    assert_eq!(&encoded[20..52], &U256::from(7u64).to_be_bytes::<32>());
    assert_eq!(&encoded[52..54], &[0xaa, 0xbb]);
    assert_eq!(&encoded[54..74], Y.as_slice());
    assert_eq!(encoded[105], 1);
}

#[test]
fn empty_batch_encodes_to_nothing() {
    assert!(encode_calls(&[]).is_empty());
}

#[test]
fn unframed_payloads_can_collide() {
    // Known property of the packed encoding: payload boundaries are not recoverable.
    let tail = Call::transfer(Y, U256::ZERO);
    let mut spilled = vec![0xff];
    spilled.extend_from_slice(&encode_calls(core::slice::from_ref(&tail)));

    let a = vec![Call::new(X, U256::ZERO, vec![0xff]), tail];
    let b = vec![Call::new(X, U256::ZERO, spilled)];
    assert_ne!(a, b);
    assert_eq!(encode_calls(&a), encode_calls(&b));
}

#[test]
fn digest_is_deterministic_and_nonce_bound() {
    let calls = vec![Call::transfer(X, U256::from(1u64))];

    assert_eq!(batch_digest(U256::ZERO, &calls), batch_digest(U256::ZERO, &calls));
    assert_ne!(batch_digest(U256::ZERO, &calls), batch_digest(U256::from(1u64), &calls));

    let mut preimage = U256::ZERO.to_be_bytes::<32>().to_vec();
    preimage.extend_from_slice(&encode_calls(&calls));
    assert_eq!(batch_digest(U256::ZERO, &calls), keccak256(&preimage));
}

#[test]
fn signing_digest_wraps_with_personal_message_prefix() {
    let calls = vec![Call::transfer(X, U256::from(1u64))];
    let inner = batch_digest(U256::from(3u64), &calls);

    let mut preimage = SIGNED_MESSAGE_PREFIX.to_vec();
    preimage.extend_from_slice(inner.as_slice());
    assert_eq!(signed_message_digest(inner), keccak256(&preimage));
    assert_eq!(signing_digest(U256::from(3u64), &calls), keccak256(&preimage));
    assert_ne!(signing_digest(U256::from(3u64), &calls), inner);
}

fn raw_signature(r: U256, s: U256, v: u8) -> Vec<u8> {
    let mut out = r.to_be_bytes::<32>().to_vec();
    out.extend_from_slice(&s.to_be_bytes::<32>());
    out.push(v);
    out
}

#[test]
fn signature_accepts_both_v_conventions() {
    let one = U256::from(1u64);
    for (v, parity) in [(0u8, false), (1, true), (27, false), (28, true)] {
        let sig = BatchSignature::from_slice(&raw_signature(one, one, v)).unwrap();
        assert_eq!(sig.y_parity(), parity);
        assert_eq!(sig.to_bytes()[64], 27 + u8::from(parity));
    }
}

#[test]
fn signature_rejects_bad_structure() {
    let one = U256::from(1u64);
    assert_eq!(
        BatchSignature::from_slice(&[0u8; 64]),
        Err(SignatureError::InvalidLength(64))
    );
    assert_eq!(
        BatchSignature::from_slice(&raw_signature(one, one, 29)),
        Err(SignatureError::InvalidV(29))
    );
    assert_eq!(
        BatchSignature::from_slice(&raw_signature(U256::ZERO, one, 27)),
        Err(SignatureError::InvalidR)
    );
    assert_eq!(
        BatchSignature::from_slice(&raw_signature(SECP256K1N, one, 27)),
        Err(SignatureError::InvalidR)
    );
    assert_eq!(
        BatchSignature::from_slice(&raw_signature(one, U256::ZERO, 27)),
        Err(SignatureError::InvalidS)
    );
    assert_eq!(
        BatchSignature::from_slice(&raw_signature(one, SECP256K1N_HALF + one, 27)),
        Err(SignatureError::HighS)
    );
    assert!(BatchSignature::from_slice(&raw_signature(one, SECP256K1N_HALF, 27)).is_ok());
}

#[test]
fn malleable_twin_is_rejected() {
    let calls = vec![Call::transfer(Y, U256::from(1u64))];
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &calls));

    let s = U256::from_be_slice(&sig[32..64]);
    let twin = raw_signature(
        U256::from_be_slice(&sig[0..32]),
        SECP256K1N - s,
        if sig[64] == 27 { 28 } else { 27 },
    );

    let mut host = MockHost::new(principal(), SPONSOR);
    assert_eq!(
        execute_with_signature(&mut host, &calls, &twin),
        Err(ExecutionError::MalformedSignature(SignatureError::HighS))
    );
    assert_eq!(host.current(), U256::ZERO);
}

#[test]
fn principal_runs_batch_without_touching_nonce() {
    let calls = vec![Call::transfer(X, U256::from(1u64))];
    let mut host = MockHost::new(principal(), principal());

    execute_as_principal(&mut host, &calls).unwrap();

    assert_eq!(host.current(), U256::ZERO);
    assert_eq!(host.dispatched, vec![(U256::ZERO, calls[0].clone())]);
    assert_eq!(
        host.records,
        vec![Recorded::Call {
            sender: principal(),
            call: calls[0].clone()
        }]
    );
}

#[test]
fn direct_path_rejects_other_callers() {
    let calls = vec![Call::transfer(X, U256::from(1u64))];
    let mut host = MockHost::new(principal(), SPONSOR);

    assert_eq!(
        execute_as_principal(&mut host, &calls),
        Err(ExecutionError::NotAuthorized { caller: SPONSOR })
    );
    assert!(host.dispatched.is_empty());
    assert!(host.records.is_empty());
}

#[test]
fn sponsored_batch_consumes_nonce_before_dispatch() {
    let calls = vec![Call::transfer(Y, U256::from(1u64))];
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &calls));
    let mut host = MockHost::new(principal(), SPONSOR);

    assert_eq!(execute_with_signature(&mut host, &calls, &sig), Ok(U256::ZERO));

    assert_eq!(host.current(), U256::from(1u64));
    // The call already observed the advanced nonce.
    assert_eq!(host.dispatched, vec![(U256::from(1u64), calls[0].clone())]);
    assert_eq!(
        host.records,
        vec![
            Recorded::Call {
                sender: SPONSOR,
                call: calls[0].clone()
            },
            Recorded::Batch {
                nonce: U256::ZERO,
                calls: calls.clone()
            },
        ]
    );
}

#[test]
fn replayed_signature_is_invalid() {
    let calls = vec![Call::transfer(Y, U256::from(1u64))];
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &calls));
    let mut host = MockHost::new(principal(), SPONSOR);

    execute_with_signature(&mut host, &calls, &sig).unwrap();
    let replay = execute_with_signature(&mut host, &calls, &sig);

    assert!(matches!(replay, Err(ExecutionError::InvalidSignature { .. })));
    assert_eq!(host.current(), U256::from(1u64));
    assert_eq!(host.dispatched.len(), 1);
}

#[test]
fn foreign_signer_is_invalid_and_mutates_nothing() {
    let calls = vec![Call::transfer(Y, U256::from(50u64))];
    let intruder = key(0x22);
    let sig = sign(&intruder, signing_digest(U256::ZERO, &calls));
    let mut host = MockHost::new(principal(), SPONSOR);

    assert_eq!(
        execute_with_signature(&mut host, &calls, &sig),
        Err(ExecutionError::InvalidSignature {
            recovered: address_of(intruder.verifying_key())
        })
    );
    assert_eq!(host.current(), U256::ZERO);
    assert!(host.dispatched.is_empty());
    assert!(host.records.is_empty());
}

#[test]
fn signature_over_other_batch_is_invalid() {
    let signed = vec![Call::transfer(Y, U256::from(1u64))];
    let submitted = vec![Call::transfer(Y, U256::from(2u64))];
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &signed));
    let mut host = MockHost::new(principal(), SPONSOR);

    assert!(matches!(
        execute_with_signature(&mut host, &submitted, &sig),
        Err(ExecutionError::InvalidSignature { .. })
    ));
    assert_eq!(host.current(), U256::ZERO);
}

#[test]
fn garbage_signature_is_malformed() {
    let calls = vec![Call::transfer(Y, U256::from(1u64))];
    let mut host = MockHost::new(principal(), SPONSOR);

    assert_eq!(
        execute_with_signature(&mut host, &calls, &[0u8; 65]),
        Err(ExecutionError::MalformedSignature(SignatureError::InvalidR))
    );
    assert_eq!(
        execute_with_signature(&mut host, &calls, &[1u8; 10]),
        Err(ExecutionError::MalformedSignature(SignatureError::InvalidLength(10)))
    );
    assert_eq!(host.current(), U256::ZERO);
}

#[test]
fn first_failing_call_stops_the_batch() {
    let calls = vec![
        Call::transfer(X, U256::from(1u64)),
        Call::transfer(Y, U256::from(1u64)),
        Call::transfer(X, U256::from(2u64)),
    ];
    let mut host = MockHost::new(principal(), principal());
    host.reject = Some(Y);

    assert_eq!(
        execute_as_principal(&mut host, &calls),
        Err(ExecutionError::OperationFailed {
            index: 1,
            reason: b"rejected".to_vec()
        })
    );
    assert_eq!(host.dispatched.len(), 1);
}

#[test]
fn failed_sponsored_batch_records_no_completion() {
    let calls = vec![Call::transfer(X, U256::from(1u64)), Call::transfer(Y, U256::from(1u64))];
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &calls));
    let mut host = MockHost::new(principal(), SPONSOR);
    host.reject = Some(Y);

    let err = execute_with_signature(&mut host, &calls, &sig).unwrap_err();

    assert!(matches!(err, ExecutionError::OperationFailed { index: 1, .. }));
    assert!(!host
        .records
        .iter()
        .any(|r| matches!(r, Recorded::Batch { .. })));
}

#[test]
fn empty_sponsored_batch_still_consumes_nonce() {
    let sig = sign(&principal_key(), signing_digest(U256::ZERO, &[]));
    let mut host = MockHost::new(principal(), SPONSOR);

    assert_eq!(execute_with_signature(&mut host, &[], &sig), Ok(U256::ZERO));
    assert_eq!(host.current(), U256::from(1u64));
    assert_eq!(
        host.records,
        vec![Recorded::Batch {
            nonce: U256::ZERO,
            calls: Vec::new()
        }]
    );
}

#[test]
fn nonce_record_advances_by_one() {
    let mut record = NonceRecord::default();
    assert_eq!(record.current(), U256::ZERO);
    record.advance();
    record.advance();
    assert_eq!(record.current(), U256::from(2u64));
}
