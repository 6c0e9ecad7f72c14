/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Account-state views and the storage they are backed by.
//!
//! An executor keeps two views, public and private, opened over one shared [Database].
//! During an execution both are handed to the engine as a [DualState], in which the private
//! view may be an alias of the public one.

pub mod db;
pub use db::{Database, MemoryDb};

pub mod dual;
pub use dual::DualState;

pub mod world_state;
pub use world_state::{Account, WorldState, EMPTY_ROOT};

use crate::types::{PublicAddress, Sha256Hash, StorageKey};

/// StateView is the address-keyed read/write access to account state that a
/// state transition engine works against.
pub trait StateView {
    fn balance(&self, address: &PublicAddress) -> u64;

    fn set_balance(&mut self, address: PublicAddress, balance: u64);

    fn nonce(&self, address: &PublicAddress) -> u64;

    fn set_nonce(&mut self, address: PublicAddress, nonce: u64);

    /// Contract code of the account. None if the account has no code.
    fn code(&self, address: &PublicAddress) -> Option<Vec<u8>>;

    fn set_code(&mut self, address: PublicAddress, code: Vec<u8>);

    fn storage_value(&self, address: &PublicAddress, key: &StorageKey) -> Option<Vec<u8>>;

    /// Setting an empty value removes the key.
    fn set_storage_value(&mut self, address: PublicAddress, key: StorageKey, value: Vec<u8>);

    /// Commitment to the current content of the view.
    fn root(&self) -> Sha256Hash;
}
