/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Executes signed transactions against the public or the private state view.
//!
//! [DualStateExecutor] builds a transaction for every call, signs it, and hands it to a
//! [StateTransition] engine together with the selected state views. It keeps the nonce of each
//! sender itself instead of reading it from either view, and draws gas for every call from one
//! [GasPool] that lives as long as the executor.
//!
//! ### Example
//!
//! ```rust
//! let mut executor = DualStateExecutor::new();
//! executor.execute(true, &signing_key, recipient, &[0x01])?;
//! assert_eq!(executor.current_nonce(&address_of(&signing_key)), 1);
//! ```

use std::collections::HashMap;

use ed25519_dalek::SigningKey;
use tracing::debug;

use crate::{
    config::ExecutorConfig,
    context::{ChainContext, ExecutionContext, NullChain, SyntheticHeader},
    error::{ExecutorError, StateError},
    gas::GasPool,
    signer::{self, TxSigner},
    state::{Database, DualState, MemoryDb, WorldState, EMPTY_ROOT},
    transition::{Runtime, StateTransition},
    types::{PrivateMessage, PublicAddress, Sha256Hash, Transaction},
};

/// DualStateExecutor owns a public and a private state view, the nonce table of its senders,
/// and the gas pool of the session.
///
/// Calls must be sequential; `execute` takes `&mut self`, so sharing an executor across
/// threads requires wrapping the whole executor in a lock.
pub struct DualStateExecutor<D = MemoryDb, E = Runtime> {
    db: D,
    config: ExecutorConfig,
    signer: TxSigner,
    nonces: HashMap<PublicAddress, u64>,
    header: SyntheticHeader,
    gas_pool: GasPool,
    public_state: WorldState<D>,
    private_state: WorldState<D>,
    engine: E,
    chain: Box<dyn ChainContext>,
}

impl DualStateExecutor {
    /// Executor over a fresh in-memory database with default configuration.
    ///
    /// # Panics
    /// If the state views cannot be initialized.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Executor over a fresh in-memory database.
    ///
    /// # Panics
    /// If the state views cannot be initialized.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self::from_roots(MemoryDb::new(), EMPTY_ROOT, EMPTY_ROOT, config)
            .unwrap_or_else(|err| panic!("failed to initialize state views: {err}"))
    }
}

impl Default for DualStateExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Database> DualStateExecutor<D, Runtime> {
    /// Executor whose views are opened at the given roots over `db`.
    pub fn from_roots(
        db: D,
        public_root: Sha256Hash,
        private_root: Sha256Hash,
        config: ExecutorConfig,
    ) -> Result<Self, StateError> {
        let public_state = WorldState::new(public_root, db.clone())?;
        let private_state = WorldState::new(private_root, db.clone())?;

        Ok(Self {
            db,
            signer: TxSigner::new(config.chain_id),
            nonces: HashMap::new(),
            header: config.header,
            gas_pool: GasPool::new(config.initial_gas),
            public_state,
            private_state,
            engine: Runtime::new(),
            chain: Box::new(NullChain),
            config,
        })
    }
}

impl<D: Database, E: StateTransition> DualStateExecutor<D, E> {
    /// specify the state transition engine that executes messages.
    pub fn with_engine<T: StateTransition>(self, engine: T) -> DualStateExecutor<D, T> {
        DualStateExecutor {
            db: self.db,
            config: self.config,
            signer: self.signer,
            nonces: self.nonces,
            header: self.header,
            gas_pool: self.gas_pool,
            public_state: self.public_state,
            private_state: self.private_state,
            engine,
            chain: self.chain,
        }
    }

    /// specify the provider of chain data beyond the synthetic header.
    pub fn with_chain(mut self, chain: impl ChainContext + 'static) -> Self {
        self.chain = Box::new(chain);
        self
    }

    /// Nonce the next transaction from `address` will be signed with.
    pub fn current_nonce(&self, address: &PublicAddress) -> u64 {
        self.nonces.get(address).copied().unwrap_or(0)
    }

    /// Calls `to` with `input` as a transaction signed by `key`, against the private state if
    /// `is_private` is set and against the public state otherwise.
    ///
    /// Once the transaction is signed, the sender's nonce advances by one whatever the outcome.
    /// A failed call therefore still consumes its nonce.
    pub fn execute(
        &mut self,
        is_private: bool,
        key: &SigningKey,
        to: PublicAddress,
        input: &[u8],
    ) -> Result<(), ExecutorError> {
        let from = signer::address_of(key);
        let nonce = self.current_nonce(&from);
        self.header = self.config.header;

        let tx = Transaction::new(
            nonce,
            to,
            self.config.value,
            self.config.call_gas_limit,
            self.config.gas_price,
            input.to_vec(),
        );
        let signed = self.signer.sign(tx, key)?;
        let _advance = NonceAdvance {
            nonces: &mut self.nonces,
            address: from,
        };

        let msg = PrivateMessage::new(self.signer.to_message(&signed)?, is_private);
        let mut states =
            DualState::select(&mut self.public_state, &mut self.private_state, is_private);
        let ctx = ExecutionContext::new(&msg, &self.header, &*self.chain, from);

        debug!(
            sender = %hex::encode(from),
            recipient = %hex::encode(to),
            nonce,
            is_private,
            tx_hash = %hex::encode(signed.hash()),
            "executing transaction"
        );
        match self
            .engine
            .apply_message(&ctx, &mut states, &msg, &mut self.gas_pool)
        {
            Ok(outcome) => {
                debug!(
                    nonce,
                    gas_used = outcome.gas_used,
                    skipped = outcome.skipped,
                    remaining_gas = self.gas_pool.gas(),
                    "transaction executed"
                );
                Ok(())
            }
            Err(err) => {
                debug!(nonce, %err, remaining_gas = self.gas_pool.gas(), "transaction failed");
                Err(err.into())
            }
        }
    }

    /// Stores both views in the database and returns their roots as `(public, private)`.
    pub fn commit(&self) -> Result<(Sha256Hash, Sha256Hash), StateError> {
        Ok((self.public_state.commit()?, self.private_state.commit()?))
    }

    pub fn public_state(&self) -> &WorldState<D> {
        &self.public_state
    }

    pub fn public_state_mut(&mut self) -> &mut WorldState<D> {
        &mut self.public_state
    }

    pub fn private_state(&self) -> &WorldState<D> {
        &self.private_state
    }

    pub fn private_state_mut(&mut self) -> &mut WorldState<D> {
        &mut self.private_state
    }

    pub fn gas_pool(&self) -> &GasPool {
        &self.gas_pool
    }

    /// Header of the most recent execution.
    pub fn header(&self) -> &SyntheticHeader {
        &self.header
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn signer(&self) -> &TxSigner {
        &self.signer
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn database(&self) -> &D {
        &self.db
    }
}

/// Advances the nonce of `address` when dropped, so that every exit path of an execution
/// after signing consumes the nonce.
struct NonceAdvance<'a> {
    nonces: &'a mut HashMap<PublicAddress, u64>,
    address: PublicAddress,
}

impl Drop for NonceAdvance<'_> {
    fn drop(&mut self) {
        let nonce = self.nonces.entry(self.address).or_insert(0);
        *nonce = nonce.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::TransitionError, state::StateView};

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[11u8; 32])
    }

    #[test]
    fn test_nonce_advance_on_drop() {
        let mut nonces = HashMap::new();
        {
            let _advance = NonceAdvance {
                nonces: &mut nonces,
                address: [1u8; 32],
            };
        }
        assert_eq!(nonces.get(&[1u8; 32]), Some(&1));
    }

    #[test]
    fn test_header_stamped_from_config() {
        let config = ExecutorConfig {
            header: SyntheticHeader {
                number: 7,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut executor = DualStateExecutor::with_config(config);
        executor.execute(false, &key(), [2u8; 32], &[]).unwrap();
        assert_eq!(executor.header().number, 7);
        assert_eq!(executor.header().timestamp, 43);
    }

    #[test]
    fn test_failed_call_keeps_nonce_gap() {
        let config = ExecutorConfig {
            initial_gas: 10,
            ..Default::default()
        };
        let mut executor = DualStateExecutor::with_config(config);
        let sender = signer::address_of(&key());

        let err = executor.execute(false, &key(), [2u8; 32], &[]).unwrap_err();
        assert!(matches!(
            err,
            ExecutorError::Transition(TransitionError::GasLimitReached { .. })
        ));
        assert_eq!(executor.current_nonce(&sender), 1);
        assert_eq!(executor.public_state().nonce(&sender), 0);
    }
}
