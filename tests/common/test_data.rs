use dualstate_runtime::{address_of, DualStateExecutor, ExecutorConfig, PublicAddress};
use ed25519_dalek::SigningKey;

pub const INITIAL_GAS: u64 = 5_000_000;
pub const CALL_GAS_LIMIT: u64 = 1_000_000;

// Sender keys.
pub const ORIGIN_SECRET_KEY: [u8; 32] = [0x5b; 32];
pub const OTHER_SECRET_KEY: [u8; 32] = [0x2f; 32];
// Target Account.
pub const TARGET: PublicAddress = [2u8; 32];

pub struct TestData {}

impl TestData {
    pub fn origin_key() -> SigningKey {
        SigningKey::from_bytes(&ORIGIN_SECRET_KEY)
    }

    pub fn other_key() -> SigningKey {
        SigningKey::from_bytes(&OTHER_SECRET_KEY)
    }

    pub fn origin_address() -> PublicAddress {
        address_of(&Self::origin_key())
    }

    pub fn other_address() -> PublicAddress {
        address_of(&Self::other_key())
    }

    pub fn config() -> ExecutorConfig {
        ExecutorConfig {
            initial_gas: INITIAL_GAS,
            call_gas_limit: CALL_GAS_LIMIT,
            ..Default::default()
        }
    }

    pub fn executor() -> DualStateExecutor {
        init_tracing();
        DualStateExecutor::with_config(Self::config())
    }
}

/// Installs a test subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
