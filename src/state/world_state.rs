/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines an account-state view held in memory on top of a [Database].
//!
//! A view is opened at a root. The empty root opens an empty view without touching the
//! database; any other root is loaded from the snapshot that [WorldState::commit] stored
//! under it. Mutations stay in memory until the next commit.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use tiny_keccak::{Hasher as _, Keccak};

use super::{db::Database, StateView};
use crate::{
    error::StateError,
    types::{PublicAddress, Sha256Hash, StorageKey},
};

/// Root of a view with no non-empty accounts.
pub const EMPTY_ROOT: Sha256Hash = [0u8; 32];

const SNAPSHOT_PREFIX: &[u8] = b"state:";

/// Account holds balance, nonce, code and storage of one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Account {
    pub balance: u64,
    pub nonce: u64,
    pub code: Vec<u8>,
    pub storage: BTreeMap<StorageKey, Vec<u8>>,
}

impl Account {
    pub fn is_empty(&self) -> bool {
        self.balance == 0 && self.nonce == 0 && self.code.is_empty() && self.storage.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct WorldState<D> {
    db: D,
    accounts: BTreeMap<PublicAddress, Account>,
}

impl<D: Database> WorldState<D> {
    /// Opens a view at `root` over `db`.
    pub fn new(root: Sha256Hash, db: D) -> Result<Self, StateError> {
        if root == EMPTY_ROOT {
            return Ok(Self {
                db,
                accounts: BTreeMap::new(),
            });
        }

        let bytes = db
            .get(&snapshot_key(&root))?
            .ok_or(StateError::MissingRoot(root))?;
        let accounts = borsh::from_slice(&bytes).map_err(StateError::Corrupted)?;
        Ok(Self { db, accounts })
    }

    /// Stores a snapshot of the view in the database and returns its root.
    pub fn commit(&self) -> Result<Sha256Hash, StateError> {
        let root = self.root();
        if root == EMPTY_ROOT {
            return Ok(root);
        }
        let bytes = borsh::to_vec(&self.accounts).map_err(StateError::Corrupted)?;
        self.db.put(snapshot_key(&root), bytes)?;
        Ok(root)
    }

    pub fn account(&self, address: &PublicAddress) -> Option<&Account> {
        self.accounts.get(address)
    }

    /// Addresses of all non-empty accounts, in ascending order.
    pub fn addresses(&self) -> impl Iterator<Item = &PublicAddress> {
        self.accounts
            .iter()
            .filter(|(_, account)| !account.is_empty())
            .map(|(address, _)| address)
    }

    pub fn db(&self) -> &D {
        &self.db
    }

    fn account_mut(&mut self, address: PublicAddress) -> &mut Account {
        self.accounts.entry(address).or_default()
    }
}

impl<D: Database> StateView for WorldState<D> {
    fn balance(&self, address: &PublicAddress) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    fn set_balance(&mut self, address: PublicAddress, balance: u64) {
        self.account_mut(address).balance = balance;
    }

    fn nonce(&self, address: &PublicAddress) -> u64 {
        self.accounts.get(address).map_or(0, |a| a.nonce)
    }

    fn set_nonce(&mut self, address: PublicAddress, nonce: u64) {
        self.account_mut(address).nonce = nonce;
    }

    fn code(&self, address: &PublicAddress) -> Option<Vec<u8>> {
        self.accounts
            .get(address)
            .filter(|a| !a.code.is_empty())
            .map(|a| a.code.clone())
    }

    fn set_code(&mut self, address: PublicAddress, code: Vec<u8>) {
        self.account_mut(address).code = code;
    }

    fn storage_value(&self, address: &PublicAddress, key: &StorageKey) -> Option<Vec<u8>> {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(key))
            .cloned()
    }

    fn set_storage_value(&mut self, address: PublicAddress, key: StorageKey, value: Vec<u8>) {
        let account = self.account_mut(address);
        if value.is_empty() {
            account.storage.remove(&key);
        } else {
            account.storage.insert(key, value);
        }
    }

    fn root(&self) -> Sha256Hash {
        let mut hasher = Keccak::v256();
        let mut any = false;
        for (address, account) in self.accounts.iter().filter(|(_, a)| !a.is_empty()) {
            any = true;
            hasher.update(address);
            hasher.update(&account.balance.to_le_bytes());
            hasher.update(&account.nonce.to_le_bytes());
            hasher.update(&(account.code.len() as u64).to_le_bytes());
            hasher.update(&account.code);
            hasher.update(&(account.storage.len() as u64).to_le_bytes());
            for (key, value) in &account.storage {
                hasher.update(key);
                hasher.update(&(value.len() as u64).to_le_bytes());
                hasher.update(value);
            }
        }
        if !any {
            return EMPTY_ROOT;
        }
        let mut root = [0u8; 32];
        hasher.finalize(&mut root);
        root
    }
}

fn snapshot_key(root: &Sha256Hash) -> Vec<u8> {
    [SNAPSHOT_PREFIX, root.as_slice()].concat()
}
