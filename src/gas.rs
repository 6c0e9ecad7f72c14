/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines formulas in calculation of gas which is a measurement unit for message
//! execution, and the [GasPool] shared by all executions in a session.
//!
//! The mapping of cost items to this module is as following:
//!
//! |Name           | Related Function / Constants      |
//! |:---           |:---                               |
//! |G_transaction  | [TX_GAS]                          |
//! |G_txdatazero   | [TX_DATA_ZERO_GAS]                |
//! |G_txdatanonzero| [TX_DATA_NON_ZERO_GAS]            |
//! |G_intrinsic    | [intrinsic_gas]                   |
//! |G_sset         | [STORAGE_SET_GAS], [storage_write_cost] |

use crate::error::TransitionError;

/// Base cost of every message.
pub const TX_GAS: u64 = 21_000;

/// Cost per zero byte of message payload.
pub const TX_DATA_ZERO_GAS: u64 = 4;

/// Cost per non-zero byte of message payload.
pub const TX_DATA_NON_ZERO_GAS: u64 = 68;

/// Cost of writing one word into account storage.
pub const STORAGE_SET_GAS: u64 = 20_000;

/// Size of a storage word in bytes.
pub const STORAGE_WORD_SIZE: usize = 32;

/// Gas charged before any execution happens, derived from the payload alone.
pub fn intrinsic_gas(data: &[u8]) -> u64 {
    let non_zero = data.iter().filter(|b| **b != 0).count() as u64;
    let zero = data.len() as u64 - non_zero;
    TX_GAS
        .saturating_add(non_zero.saturating_mul(TX_DATA_NON_ZERO_GAS))
        .saturating_add(zero.saturating_mul(TX_DATA_ZERO_GAS))
}

/// Cost of storing `data` as a storage value. Every started word is charged in full.
pub fn storage_write_cost(data: &[u8]) -> u64 {
    let words = data.len().div_ceil(STORAGE_WORD_SIZE) as u64;
    words.saturating_mul(STORAGE_SET_GAS)
}

/// GasPool tracks the amount of gas still available for executions in a session.
/// It is never replenished except for unused gas returned by an execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasPool(u64);

impl GasPool {
    pub fn new(gas: u64) -> Self {
        Self(gas)
    }

    /// Makes gas available for execution.
    pub fn add_gas(&mut self, amount: u64) -> &mut Self {
        self.0 = self.0.saturating_add(amount);
        self
    }

    /// Deducts the given amount from the pool if enough gas is available.
    pub fn sub_gas(&mut self, amount: u64) -> Result<(), TransitionError> {
        if self.0 < amount {
            return Err(TransitionError::GasLimitReached {
                available: self.0,
                requested: amount,
            });
        }
        self.0 -= amount;
        Ok(())
    }

    /// Gas still available in the pool.
    pub fn gas(&self) -> u64 {
        self.0
    }
}
