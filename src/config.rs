/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Session defaults of a [DualStateExecutor](crate::DualStateExecutor).

use serde::{Deserialize, Serialize};

use crate::context::SyntheticHeader;

/// Chain id that signatures are bound to unless configured otherwise.
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Gas the session pool starts with.
pub const DEFAULT_INITIAL_GAS: u64 = 5_000_000;

/// Gas limit of every transaction built by the executor.
pub const DEFAULT_CALL_GAS_LIMIT: u64 = 1_000_000;

/// ExecutorConfig fixes the economic parameters of the transactions an executor builds,
/// and the header it executes them in. Missing fields take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub chain_id: u64,
    pub initial_gas: u64,
    pub call_gas_limit: u64,
    pub gas_price: u64,
    /// Value transferred by every call
    pub value: u64,
    pub header: SyntheticHeader,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            initial_gas: DEFAULT_INITIAL_GAS,
            call_gas_limit: DEFAULT_CALL_GAS_LIMIT,
            gas_price: 0,
            value: 0,
            header: SyntheticHeader::default(),
        }
    }
}
