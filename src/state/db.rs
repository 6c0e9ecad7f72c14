/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Backing key-value store shared by the state views of an executor.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use crate::error::StateError;

/// Database is the storage substrate a [WorldState](super::WorldState) is opened over.
/// Clones must observe the same underlying data.
pub trait Database: Clone {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError>;

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StateError>;
}

/// In-memory [Database]. Cloning it yields a handle to the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    inner: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Database for MemoryDb {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), StateError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(key, value);
        Ok(())
    }
}

fn poisoned() -> StateError {
    StateError::Database("memory database lock poisoned".to_string())
}
