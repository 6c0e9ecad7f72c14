use std::cell::RefCell;

use dualstate_runtime::{
    DualState, ExecutionContext, ExecutionOutcome, GasPool, PrivateMessage, PublicAddress,
    StateTransition, TransitionError,
};

/// Storage key the recording engine writes the payload of every call under.
pub const MARKER_KEY: [u8; 32] = [0xee; 32];

/// What the engine observed in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub from: PublicAddress,
    pub to: PublicAddress,
    pub nonce: u64,
    pub private: bool,
    pub aliased: bool,
    pub coinbase: PublicAddress,
    pub block_number: u64,
    pub timestamp: u64,
    pub difficulty: u64,
    pub gas_limit: u64,
}

/// Engine that records its inputs, writes the payload into the effective private view,
/// and charges a fixed amount of gas. It can be told to fail every call.
pub struct RecordingEngine {
    pub calls: RefCell<Vec<RecordedCall>>,
    pub gas_per_call: u64,
    pub fail_with: Option<TransitionError>,
}

impl RecordingEngine {
    pub fn new(gas_per_call: u64) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            gas_per_call,
            fail_with: None,
        }
    }

    pub fn failing(err: TransitionError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::new(0)
        }
    }

    pub fn nonces(&self) -> Vec<u64> {
        self.calls.borrow().iter().map(|c| c.nonce).collect()
    }
}

impl StateTransition for RecordingEngine {
    fn apply_message(
        &self,
        ctx: &ExecutionContext<'_>,
        states: &mut DualState<'_>,
        msg: &PrivateMessage,
        gas_pool: &mut GasPool,
    ) -> Result<ExecutionOutcome, TransitionError> {
        self.calls.borrow_mut().push(RecordedCall {
            from: msg.from,
            to: msg.to,
            nonce: msg.nonce,
            private: msg.is_private(),
            aliased: states.is_aliased(),
            coinbase: ctx.coinbase,
            block_number: ctx.block_number,
            timestamp: ctx.timestamp,
            difficulty: ctx.difficulty,
            gas_limit: ctx.gas_limit,
        });

        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }

        gas_pool.sub_gas(self.gas_per_call)?;
        states
            .private_mut()
            .set_storage_value(msg.to, MARKER_KEY, msg.data.clone());

        Ok(ExecutionOutcome {
            gas_used: self.gas_per_call,
            skipped: false,
        })
    }
}
