/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines the block-level data supplied to a state transition.
//!
//! Outside of consensus there is no block to execute in, so the executor stamps a
//! [SyntheticHeader] with fixed values before every execution and combines it with a
//! [ChainContext] and the message into an [ExecutionContext].

use serde::{Deserialize, Serialize};

use crate::types::{Message, PublicAddress, Sha256Hash};

/// Number of ancestor blocks whose hashes are visible to an execution.
pub const BLOCK_HASH_WINDOW: u64 = 256;

/// Stand-in for a block header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticHeader {
    /// Height of the block
    pub number: u64,
    /// Unix timestamp
    pub timestamp: u64,
    pub difficulty: u64,
    /// Gas limit of the block
    pub gas_limit: u64,
}

impl Default for SyntheticHeader {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 43,
            difficulty: 1_000_488,
            gas_limit: 4_700_000,
        }
    }
}

/// ChainContext supplies chain data that is not part of the header. Providers are shared with
/// the executor, which may be moved across threads.
pub trait ChainContext: Send + Sync {
    /// Hash of the block at the given height, if known.
    fn block_hash(&self, number: u64) -> Option<Sha256Hash>;
}

/// A chain with no blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChain;

impl ChainContext for NullChain {
    fn block_hash(&self, _number: u64) -> Option<Sha256Hash> {
        None
    }
}

/// ExecutionContext is everything about the surrounding block that an engine may read while
/// executing a message. It does not change during one execution.
pub struct ExecutionContext<'a> {
    /// Sender of the message
    pub origin: PublicAddress,
    pub gas_price: u64,
    /// Beneficiary of gas fees
    pub coinbase: PublicAddress,
    pub block_number: u64,
    pub timestamp: u64,
    pub difficulty: u64,
    pub gas_limit: u64,
    chain: &'a dyn ChainContext,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        msg: &Message,
        header: &SyntheticHeader,
        chain: &'a dyn ChainContext,
        author: PublicAddress,
    ) -> Self {
        Self {
            origin: msg.from,
            gas_price: msg.gas_price,
            coinbase: author,
            block_number: header.number,
            timestamp: header.timestamp,
            difficulty: header.difficulty,
            gas_limit: header.gas_limit,
            chain,
        }
    }

    /// Hash of an ancestor block. Only the [BLOCK_HASH_WINDOW] most recent ancestors are visible.
    pub fn block_hash(&self, number: u64) -> Option<Sha256Hash> {
        if number >= self.block_number || self.block_number - number > BLOCK_HASH_WINDOW {
            return None;
        }
        self.chain.block_hash(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NumberedChain;

    impl ChainContext for NumberedChain {
        fn block_hash(&self, number: u64) -> Option<Sha256Hash> {
            Some([number as u8; 32])
        }
    }

    fn message() -> Message {
        Message {
            from: [1u8; 32],
            to: [2u8; 32],
            nonce: 0,
            value: 0,
            gas_limit: 1_000_000,
            gas_price: 3,
            data: Vec::new(),
            check_nonce: true,
        }
    }

    #[test]
    fn test_context_from_header() {
        let header = SyntheticHeader::default();
        let ctx = ExecutionContext::new(&message(), &header, &NullChain, [9u8; 32]);
        assert_eq!(ctx.origin, [1u8; 32]);
        assert_eq!(ctx.coinbase, [9u8; 32]);
        assert_eq!(ctx.gas_price, 3);
        assert_eq!(ctx.block_number, 0);
        assert_eq!(ctx.timestamp, 43);
        assert_eq!(ctx.difficulty, 1_000_488);
        assert_eq!(ctx.gas_limit, 4_700_000);
        assert_eq!(ctx.block_hash(0), None);
    }

    #[test]
    fn test_block_hash_window() {
        let header = SyntheticHeader {
            number: 300,
            ..Default::default()
        };
        let ctx = ExecutionContext::new(&message(), &header, &NumberedChain, [9u8; 32]);
        assert_eq!(ctx.block_hash(299), Some([43u8; 32]));
        assert_eq!(ctx.block_hash(44), Some([44u8; 32]));
        assert_eq!(ctx.block_hash(43), None);
        assert_eq!(ctx.block_hash(300), None);
    }
}
