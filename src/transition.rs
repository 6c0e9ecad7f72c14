/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! transition defines the formulation of state transition.
//!
//! A [StateTransition] engine applies one [PrivateMessage] to a [DualState] within an
//! [ExecutionContext], drawing gas from a shared [GasPool]. [Runtime] is the engine shipped
//! with this library. It executes across phases:
//!
//! ```text
//! Pre-Check -> Buy Gas -> Execute (or Skip) -> Refund
//! ```
//!
//! Messages are executed against the effective private view when private and against the
//! public view otherwise. The sender's nonce and the gas fees always live in public state.

use tiny_keccak::{Hasher as _, Keccak};
use tracing::{trace, warn};

use crate::{
    context::ExecutionContext,
    error::TransitionError,
    gas::{self, GasPool},
    state::{DualState, StateView},
    types::{Message, PrivateMessage, PublicAddress, StorageKey},
};

/// StateTransition is the capability of applying a message's effects to state.
///
/// Implementations decide how private messages are treated, and are the sole authority on
/// execution semantics. They must take gas from `gas_pool` for whatever they consume.
pub trait StateTransition {
    fn apply_message(
        &self,
        ctx: &ExecutionContext<'_>,
        states: &mut DualState<'_>,
        msg: &PrivateMessage,
        gas_pool: &mut GasPool,
    ) -> Result<ExecutionOutcome, TransitionError>;
}

/// Result of a successful state transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Gas consumed by the message, intrinsic gas included.
    pub gas_used: u64,
    /// True if execution proper was skipped because this runtime does not hold private state.
    pub skipped: bool,
}

/// Runtime defines the state transition engine for value transfers and payload calls.
///
/// Execution proper transfers value to the recipient and, for a non-empty payload, records
/// the payload in the recipient's storage at [payload_slot]. Bytecode is not interpreted.
#[derive(Debug, Clone)]
pub struct Runtime {
    private_participant: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Instantiate Runtime. It participates in private state by default.
    pub fn new() -> Self {
        Self {
            private_participant: true,
        }
    }

    /// specify whether this runtime holds private state. A non-participant skips execution
    /// proper of private messages and only charges their intrinsic gas.
    pub fn set_private_participant(mut self, private_participant: bool) -> Self {
        self.private_participant = private_participant;
        self
    }

    pub fn is_private_participant(&self) -> bool {
        self.private_participant
    }
}

impl StateTransition for Runtime {
    fn apply_message(
        &self,
        ctx: &ExecutionContext<'_>,
        states: &mut DualState<'_>,
        msg: &PrivateMessage,
        gas_pool: &mut GasPool,
    ) -> Result<ExecutionOutcome, TransitionError> {
        let sender = msg.from;
        let intrinsic = pre_check(states.public(), msg)?;
        trace!(nonce = msg.nonce, intrinsic, "pre-check passed");

        // buy gas
        if let Err(err) = gas_pool.sub_gas(msg.gas_limit) {
            warn!(
                available = gas_pool.gas(),
                requested = msg.gas_limit,
                "gas pool cannot cover message"
            );
            return Err(err);
        }
        let upfront = msg.gas_limit * msg.gas_price;
        let sender_balance = states.public().balance(&sender);
        states.public_mut().set_balance(sender, sender_balance - upfront);

        let nonce = states.public().nonce(&sender);
        states.public_mut().set_nonce(sender, nonce.saturating_add(1));

        let available = msg.gas_limit - intrinsic;
        let (result, skipped) = if msg.is_private() && !self.private_participant {
            trace!(nonce = msg.nonce, "skip execution of private message");
            (Ok(0), true)
        } else {
            (execute(states.private_mut(), msg, available), false)
        };

        let gas_used = match &result {
            Ok(execution_gas) => intrinsic + execution_gas,
            Err(_) => msg.gas_limit,
        };
        refund(ctx, states.public_mut(), msg, gas_used, gas_pool);
        trace!(gas_used, skipped, remaining_pool = gas_pool.gas(), "message applied");

        result.map(|_| ExecutionOutcome { gas_used, skipped })
    }
}

/// Storage slot under which the payload of the message from `sender` with `nonce` is recorded.
pub fn payload_slot(sender: &PublicAddress, nonce: u64) -> StorageKey {
    let mut hasher = Keccak::v256();
    hasher.update(sender);
    hasher.update(&nonce.to_be_bytes());
    let mut slot = [0u8; 32];
    hasher.finalize(&mut slot);
    slot
}

/// Pre-Check is a Phase in State Transition. It validates the message against public state
/// without mutating anything, and returns the intrinsic gas of the message.
fn pre_check(public: &dyn StateView, msg: &PrivateMessage) -> Result<u64, TransitionError> {
    let sender = msg.from;
    if msg.check_nonce {
        let state_nonce = public.nonce(&sender);
        if state_nonce < msg.nonce {
            return Err(TransitionError::NonceTooHigh {
                state: state_nonce,
                message: msg.nonce,
            });
        }
        if state_nonce > msg.nonce {
            return Err(TransitionError::NonceTooLow {
                state: state_nonce,
                message: msg.nonce,
            });
        }
    }

    if msg.is_private() && msg.value > 0 {
        return Err(TransitionError::PrivateValueTransfer);
    }

    let intrinsic = gas::intrinsic_gas(&msg.data);
    if msg.gas_limit < intrinsic {
        return Err(TransitionError::IntrinsicGas {
            gas_limit: msg.gas_limit,
            intrinsic,
        });
    }

    let upfront = msg
        .gas_limit
        .checked_mul(msg.gas_price)
        .ok_or(TransitionError::InsufficientFundsForGas)?;
    let balance = public.balance(&sender);
    if balance < upfront {
        return Err(TransitionError::InsufficientFundsForGas);
    }
    if balance - upfront < msg.value {
        return Err(TransitionError::InsufficientBalanceForTransfer);
    }

    Ok(intrinsic)
}

/// Execute is a Phase in State Transition. Effects are applied only if the message can pay
/// for all of them, so a failed execution leaves `state` untouched.
fn execute(
    state: &mut dyn StateView,
    msg: &Message,
    available_gas: u64,
) -> Result<u64, TransitionError> {
    let cost = gas::storage_write_cost(&msg.data);
    if cost > available_gas {
        return Err(TransitionError::ExecutionGasExhausted);
    }

    if msg.value > 0 {
        let from_balance = state.balance(&msg.from);
        state.set_balance(msg.from, from_balance - msg.value);
        let to_balance = state.balance(&msg.to);
        state.set_balance(msg.to, to_balance.saturating_add(msg.value));
    }

    if !msg.data.is_empty() {
        state.set_storage_value(msg.to, payload_slot(&msg.from, msg.nonce), msg.data.clone());
    }

    Ok(cost)
}

/// Refund is a Phase in State Transition. Unused gas goes back to the sender and to the pool,
/// and the fee for used gas goes to the coinbase.
fn refund(
    ctx: &ExecutionContext<'_>,
    public: &mut dyn StateView,
    msg: &Message,
    gas_used: u64,
    gas_pool: &mut GasPool,
) {
    let gas_unused = msg.gas_limit.saturating_sub(gas_used);

    let sender_balance = public.balance(&msg.from);
    public.set_balance(
        msg.from,
        sender_balance.saturating_add(gas_unused * msg.gas_price),
    );

    let coinbase_balance = public.balance(&ctx.coinbase);
    public.set_balance(
        ctx.coinbase,
        coinbase_balance.saturating_add(gas_used * msg.gas_price),
    );

    gas_pool.add_gas(gas_unused);
}
