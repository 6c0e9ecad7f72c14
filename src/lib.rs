/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Dual-State Runtime executes signed transactions against one of two account-state views:
//! a **public** state that every participant holds, and a **private** state that only
//! participants of private transactions hold.
//!
//! ```text
//! f(PUB, PRIV, CTX, TX, private) -> (PUB', PRIV')
//!
//! PUB  = Public state view
//! PRIV = Private state view, an alias of PUB when `private` is false
//! CTX  = Execution context derived from a synthetic block header
//! TX   = Signed transaction
//! ```
//!
//! ### Example
//!
//! ```rust
//! // execute a private call, then a public one, from the same key.
//! let mut executor = dualstate_runtime::DualStateExecutor::new();
//! executor.execute(true, &key, recipient, &[0x01])?;
//! executor.execute(false, &key, recipient, &[])?;
//! ```
//!
//! The [executor] signs each transaction with a [signer] bound to a chain id, selects the
//! effective private [state] view, builds the execution [context], and delegates to a
//! [transition] engine that draws [gas] from the session's pool. Failures are reported as
//! [error]s. Session defaults live in [config].

pub mod config;
pub use config::ExecutorConfig;

pub mod context;
pub use context::{ChainContext, ExecutionContext, NullChain, SyntheticHeader};

pub mod error;
pub use error::{ExecutorError, StateError, TransitionError};

pub mod executor;
pub use executor::DualStateExecutor;

pub mod gas;
pub use gas::GasPool;

pub mod signer;
pub use signer::{address_of, TxSigner};

pub mod state;
pub use state::{Database, DualState, MemoryDb, StateView, WorldState};

pub mod transition;
pub use transition::{ExecutionOutcome, Runtime, StateTransition};

pub mod types;
pub use types::{Message, PrivateMessage, PublicAddress, SignedTransaction, Transaction};
