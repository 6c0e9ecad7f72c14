use dualstate_runtime::{
    state::EMPTY_ROOT, transition::payload_slot, Runtime, StateView, SyntheticHeader,
};

use crate::common::{RecordingEngine, TestData, INITIAL_GAS, MARKER_KEY, TARGET};

mod common;

/// Non-private calls see the public view as their private view
#[test]
fn test_public_call_aliases_private_view() {
    let mut executor = TestData::executor().with_engine(RecordingEngine::new(100));
    executor
        .execute(false, &TestData::origin_key(), TARGET, &[0x42])
        .unwrap();

    let calls = executor.engine().calls.borrow().clone();
    assert_eq!(calls.len(), 1);
    assert!(!calls[0].private);
    assert!(calls[0].aliased);

    // the write to the effective private view landed in public state
    assert_eq!(
        executor.public_state().storage_value(&TARGET, &MARKER_KEY),
        Some(vec![0x42])
    );
    assert_eq!(executor.private_state().root(), EMPTY_ROOT);
    assert_eq!(executor.gas_pool().gas(), INITIAL_GAS - 100);
}

/// Private calls get a dedicated private view and leave public state alone
#[test]
fn test_private_call_uses_private_view() {
    let mut executor = TestData::executor().with_engine(RecordingEngine::new(100));
    executor
        .execute(true, &TestData::origin_key(), TARGET, &[0x42])
        .unwrap();

    let calls = executor.engine().calls.borrow().clone();
    assert!(calls[0].private);
    assert!(!calls[0].aliased);

    assert_eq!(
        executor.private_state().storage_value(&TARGET, &MARKER_KEY),
        Some(vec![0x42])
    );
    assert_eq!(executor.public_state().root(), EMPTY_ROOT);
}

/// The engine receives the synthetic header and the sender as author
#[test]
fn test_execution_context() {
    let mut executor = TestData::executor().with_engine(RecordingEngine::new(0));
    executor
        .execute(true, &TestData::origin_key(), TARGET, &[])
        .unwrap();

    let call = executor.engine().calls.borrow()[0].clone();
    let header = SyntheticHeader::default();
    assert_eq!(call.from, TestData::origin_address());
    assert_eq!(call.to, TARGET);
    assert_eq!(call.coinbase, TestData::origin_address());
    assert_eq!(call.block_number, header.number);
    assert_eq!(call.timestamp, header.timestamp);
    assert_eq!(call.difficulty, header.difficulty);
    assert_eq!(call.gas_limit, header.gas_limit);
}

/// Any sequence of non-private calls leaves the private view untouched
#[test]
fn test_public_calls_never_diverge() {
    let mut executor = TestData::executor();
    for payload in [vec![], vec![0x01], vec![0x00, 0x02, 0x03]] {
        executor
            .execute(false, &TestData::origin_key(), TARGET, &payload)
            .unwrap();
        executor
            .execute(false, &TestData::other_key(), TARGET, &payload)
            .unwrap();
    }
    assert_eq!(executor.private_state().root(), EMPTY_ROOT);
    assert_eq!(executor.private_state().addresses().count(), 0);
}

/// Private calls change private storage only. Public state holds the nonce of the sender.
#[test]
fn test_private_calls_leave_no_public_trace() {
    let mut executor = TestData::executor();
    let origin = TestData::origin_address();
    executor
        .execute(true, &TestData::origin_key(), TARGET, &[0x01])
        .unwrap();
    executor
        .execute(true, &TestData::origin_key(), TARGET, &[0x02; 40])
        .unwrap();

    for nonce in 0..2 {
        let slot = payload_slot(&origin, nonce);
        assert_eq!(executor.public_state().storage_value(&TARGET, &slot), None);
        assert!(executor
            .private_state()
            .storage_value(&TARGET, &slot)
            .is_some());
    }
    assert!(executor.public_state().account(&TARGET).is_none());
    assert_eq!(executor.public_state().nonce(&origin), 2);
    assert_eq!(executor.private_state().nonce(&origin), 0);
}

/// A runtime without private state skips private calls but still sequences nonces
#[test]
fn test_non_participant_runtime() {
    let mut executor =
        TestData::executor().with_engine(Runtime::new().set_private_participant(false));
    let origin = TestData::origin_address();

    executor
        .execute(true, &TestData::origin_key(), TARGET, &[0x01])
        .unwrap();
    executor
        .execute(false, &TestData::origin_key(), TARGET, &[0x02])
        .unwrap();

    assert_eq!(executor.private_state().root(), EMPTY_ROOT);
    assert_eq!(
        executor
            .public_state()
            .storage_value(&TARGET, &payload_slot(&origin, 1)),
        Some(vec![0x02])
    );
    assert_eq!(executor.current_nonce(&origin), 2);
}
