/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Defines common data structures to be used inside this library, or from outside application.

use std::ops::Deref;

use borsh::{BorshDeserialize, BorshSerialize};

/// Address of an account. It is the ed25519 public key of the account holder.
pub type PublicAddress = [u8; 32];

/// 32-byte digest, used for transaction hashes and state roots.
pub type Sha256Hash = [u8; 32];

/// Ed25519 signature bytes.
pub type SignatureBytes = [u8; 64];

/// Key of a value in an account's storage.
pub type StorageKey = [u8; 32];

/// Transaction before signing. Its canonical encoding (together with the chain id) is what gets signed.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Transaction {
    pub nonce: u64,
    pub to: PublicAddress,
    pub value: u64,
    pub gas_limit: u64,
    pub gas_price: u64,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn new(
        nonce: u64,
        to: PublicAddress,
        value: u64,
        gas_limit: u64,
        gas_price: u64,
        data: Vec<u8>,
    ) -> Self {
        Self {
            nonce,
            to,
            value,
            gas_limit,
            gas_price,
            data,
        }
    }
}

/// A signed transaction. It cannot be modified after signing; the sender is not stored
/// separately but is the key the signature verifies against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    signer: PublicAddress,
    signature: SignatureBytes,
    hash: Sha256Hash,
}

impl SignedTransaction {
    pub(crate) fn new(
        tx: Transaction,
        signer: PublicAddress,
        signature: SignatureBytes,
        hash: Sha256Hash,
    ) -> Self {
        Self {
            tx,
            signer,
            signature,
            hash,
        }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Public key that produced the signature.
    pub fn signer(&self) -> &PublicAddress {
        &self.signer
    }

    pub fn signature(&self) -> &SignatureBytes {
        &self.signature
    }

    pub fn hash(&self) -> &Sha256Hash {
        &self.hash
    }
}

impl Deref for SignedTransaction {
    type Target = Transaction;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

/// Message is the executable view of a transaction, with the sender resolved from its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub from: PublicAddress,
    pub to: PublicAddress,
    pub nonce: u64,
    pub value: u64,
    pub gas_limit: u64,
    pub gas_price: u64,
    pub data: Vec<u8>,
    /// whether the engine should compare the nonce against the sender's nonce in state
    pub check_nonce: bool,
}

impl Message {
    pub(crate) fn from_transaction(from: PublicAddress, tx: &Transaction) -> Self {
        Self {
            from,
            to: tx.to,
            nonce: tx.nonce,
            value: tx.value,
            gas_limit: tx.gas_limit,
            gas_price: tx.gas_price,
            data: tx.data.clone(),
            check_nonce: true,
        }
    }
}

/// PrivateMessage tags a [Message] with the privacy flag chosen at submission time.
///
/// The flag is not covered by the transaction signature, so it belongs to a single execution
/// call and is never stored with the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateMessage {
    message: Message,
    private: bool,
}

impl PrivateMessage {
    pub fn new(message: Message, private: bool) -> Self {
        Self { message, private }
    }

    /// Returns whether the message should be considered private.
    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn into_inner(self) -> Message {
        self.message
    }
}

impl Deref for PrivateMessage {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}
