/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Signing of transactions under a fixed chain identity, and derivation of
//! executable [Message]s from signed transactions.

use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

use crate::{
    error::ExecutorError,
    types::{Message, PublicAddress, Sha256Hash, SignatureBytes, SignedTransaction, Transaction},
};

/// Address of the account controlled by the signing key.
pub fn address_of(key: &SigningKey) -> PublicAddress {
    key.verifying_key().to_bytes()
}

/// TxSigner binds every signature to one chain id, so that a transaction signed
/// for one chain is rejected on any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSigner {
    chain_id: u64,
}

impl TxSigner {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Canonical bytes covered by the signature: borsh encoding of `(chain_id, tx)`.
    pub fn signing_payload(&self, tx: &Transaction) -> Result<Vec<u8>, ExecutorError> {
        borsh::to_vec(&(self.chain_id, tx)).map_err(ExecutorError::Encoding)
    }

    pub fn sign(
        &self,
        tx: Transaction,
        key: &SigningKey,
    ) -> Result<SignedTransaction, ExecutorError> {
        let payload = self.signing_payload(&tx)?;
        let signature = key
            .try_sign(&payload)
            .map_err(ExecutorError::Signing)?
            .to_bytes();
        let hash = transaction_hash(&payload, &signature);
        Ok(SignedTransaction::new(
            tx,
            address_of(key),
            signature,
            hash,
        ))
    }

    /// Resolves the sender by verifying the signature, and converts the transaction into a [Message].
    pub fn to_message(&self, signed: &SignedTransaction) -> Result<Message, ExecutorError> {
        let payload = self.signing_payload(signed.transaction())?;
        let verifying_key =
            VerifyingKey::from_bytes(signed.signer()).map_err(ExecutorError::InvalidSignature)?;
        let signature = Signature::from_bytes(signed.signature());
        verifying_key
            .verify_strict(&payload, &signature)
            .map_err(ExecutorError::InvalidSignature)?;

        Ok(Message::from_transaction(
            verifying_key.to_bytes(),
            signed.transaction(),
        ))
    }
}

fn transaction_hash(payload: &[u8], signature: &SignatureBytes) -> Sha256Hash {
    let mut hasher = Sha256::new();
    hasher.update(payload);
    hasher.update(signature);
    hasher.finalize().into()
}
