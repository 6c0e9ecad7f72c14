/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! error defines sets of error definitions in the life time of a dual-state execution.

use ed25519_dalek::SignatureError;

use crate::types::Sha256Hash;

/// Descriptive error definitions of a state transition, as reported by a
/// [StateTransition](crate::transition::StateTransition) engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Nonce of the message is behind the sender's nonce in state.
    #[error("nonce too low: state has {state}, message has {message}")]
    NonceTooLow { state: u64, message: u64 },

    /// Nonce of the message is ahead of the sender's nonce in state.
    #[error("nonce too high: state has {state}, message has {message}")]
    NonceTooHigh { state: u64, message: u64 },

    /// Gas limit was insufficient to cover the intrinsic cost of the message.
    #[error("intrinsic gas too low: have {gas_limit}, want {intrinsic}")]
    IntrinsicGas { gas_limit: u64, intrinsic: u64 },

    /// Not enough balance to pay for gas limit.
    #[error("insufficient funds for gas * price")]
    InsufficientFundsForGas,

    /// Not enough balance to pay for transfer.
    #[error("insufficient balance for transfer")]
    InsufficientBalanceForTransfer,

    /// The shared gas pool cannot cover the gas limit of the message.
    #[error("gas limit reached: pool has {available}, message requests {requested}")]
    GasLimitReached { available: u64, requested: u64 },

    /// Private messages cannot carry value.
    #[error("value transfer is not supported for private messages")]
    PrivateValueTransfer,

    /// Gas limit was insufficient to cover execution proper costs.
    #[error("out of gas")]
    ExecutionGasExhausted,
}

/// Errors surfaced to the caller of [DualStateExecutor::execute](crate::DualStateExecutor::execute).
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The signing key rejected the transaction.
    #[error("failed to sign transaction: {0}")]
    Signing(#[source] SignatureError),

    /// Sender could not be resolved from the transaction signature.
    #[error("invalid transaction signature: {0}")]
    InvalidSignature(#[source] SignatureError),

    /// The transaction could not be put into its canonical encoding.
    #[error("failed to encode transaction: {0}")]
    Encoding(#[source] std::io::Error),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Errors from opening or persisting a state view over its backing store.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// No snapshot is stored under the requested root.
    #[error("missing state snapshot for root 0x{}", hex::encode(.0))]
    MissingRoot(Sha256Hash),

    /// A snapshot exists but cannot be decoded.
    #[error("corrupted state snapshot: {0}")]
    Corrupted(#[source] std::io::Error),

    /// The backing store itself failed.
    #[error("database error: {0}")]
    Database(String),
}
