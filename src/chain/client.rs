//! Core chain client types and trait definitions

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use thiserror::Error;

use crate::config::NetworkConfig;

/// Failures from the chain collaborator.
///
/// These never abort a run on their own: adapters fold them into
/// `Outcome::Error`. Only connect and the initial balance query surface
/// them as fatal `CycleError::Chain`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("transaction {tx_hash} not confirmed within {timeout:?}")]
    ConfirmationTimeout { tx_hash: String, timeout: Duration },

    #[error("transaction {0} reverted")]
    Reverted(String),

    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("malformed call result: {0}")]
    Decode(String),
}

/// A transaction to sign and submit.
///
/// `to == None` is a contract creation with `input` as init code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub gas_limit: u64,
}

impl TxRequest {
    /// Contract call with no value attached
    pub fn call(to: Address, input: impl Into<Bytes>, gas_limit: u64) -> Self {
        Self {
            to: Some(to),
            value: U256::ZERO,
            input: input.into(),
            gas_limit,
        }
    }

    /// Plain value transfer
    pub fn transfer(to: Address, value: U256, gas_limit: u64) -> Self {
        Self {
            to: Some(to),
            value,
            input: Bytes::new(),
            gas_limit,
        }
    }

    /// Contract creation
    pub fn deploy(init_code: impl Into<Bytes>, gas_limit: u64) -> Self {
        Self {
            to: None,
            value: U256::ZERO,
            input: init_code.into(),
            gas_limit,
        }
    }

    /// Attach a value to the request
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn is_create(&self) -> bool {
        self.to.is_none()
    }
}

/// A confirmed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub contract_address: Option<Address>,
}

/// Signing handle bound to one account.
///
/// `submit` returns only after the transaction has one confirmation; it is
/// the adapter's suspension point.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing account
    fn address(&self) -> Address;

    /// Native balance of `owner` in wei
    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError>;

    /// Read-only call returning raw return data
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError>;

    /// Sign, submit and wait for one confirmation
    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError>;
}

/// Builds a `ChainClient` for a run from the network settings and a key.
pub trait ChainConnector: Send + Sync {
    fn connect(&self, network: &NetworkConfig, private_key: &str) -> Result<Arc<dyn ChainClient>, ChainError>;
}
