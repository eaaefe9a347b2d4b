//! JSON-RPC chain client backed by alloy.
//!
//! Signing, nonce, gas price and chain id are filled by the provider stack;
//! every network wait is bounded by the configured confirmation timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use log::debug;

use super::client::{ChainClient, ChainConnector, ChainError, TxReceipt, TxRequest};
use crate::config::NetworkConfig;

/// Signing client for one account on one JSON-RPC endpoint
pub struct RpcChain {
    provider: DynProvider,
    address: Address,
    timeout: Duration,
}

impl RpcChain {
    /// Build a signing provider for `private_key` against `rpc_url`.
    ///
    /// No request is made here; an unreachable endpoint surfaces on first use.
    pub fn connect(rpc_url: &str, private_key: &str, timeout: Duration) -> Result<Self, ChainError> {
        let key = private_key.trim();
        let signer: PrivateKeySigner = key
            .strip_prefix("0x")
            .unwrap_or(key)
            .parse()
            .map_err(|e| ChainError::InvalidKey(format!("{e}")))?;
        let address = signer.address();

        let url: Url = rpc_url
            .trim()
            .parse()
            .map_err(|e| ChainError::Rpc(format!("invalid rpc url {rpc_url:?}: {e}")))?;

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();

        Ok(Self {
            provider,
            address,
            timeout,
        })
    }

    async fn bounded<T, E, F>(&self, what: &str, fut: F) -> Result<T, ChainError>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result.map_err(|e| ChainError::Rpc(format!("{what}: {e}"))),
            Err(_) => Err(ChainError::Rpc(format!("{what}: timed out after {:?}", self.timeout))),
        }
    }
}

#[async_trait]
impl ChainClient for RpcChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn native_balance(&self, owner: Address) -> Result<U256, ChainError> {
        self.bounded("eth_getBalance", self.provider.get_balance(owner).into_future())
            .await
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        let request = TransactionRequest::default()
            .with_from(self.address)
            .with_to(to)
            .with_input(input);
        self.bounded("eth_call", self.provider.call(request).into_future()).await
    }

    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        let base = TransactionRequest::default()
            .with_from(self.address)
            .with_value(tx.value)
            .with_gas_limit(tx.gas_limit);
        let request = match tx.to {
            Some(to) => base.with_to(to).with_input(tx.input),
            None => base.with_deploy_code(tx.input),
        };

        let pending = self
            .bounded("eth_sendTransaction", self.provider.send_transaction(request))
            .await?;
        let tx_hash = *pending.tx_hash();
        debug!("submitted {tx_hash:#x}, waiting for confirmation");

        let receipt = match tokio::time::timeout(self.timeout, pending.get_receipt()).await {
            Ok(receipt) => receipt.map_err(|e| ChainError::Rpc(format!("receipt for {tx_hash:#x}: {e}")))?,
            Err(_) => {
                return Err(ChainError::ConfirmationTimeout {
                    tx_hash: format!("{tx_hash:#x}"),
                    timeout: self.timeout,
                });
            }
        };

        if !ReceiptResponse::status(&receipt) {
            return Err(ChainError::Reverted(format!("{tx_hash:#x}")));
        }

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
        })
    }
}

/// Connects runs to the configured JSON-RPC endpoint
#[derive(Debug, Default, Clone, Copy)]
pub struct RpcConnector;

impl ChainConnector for RpcConnector {
    fn connect(&self, network: &NetworkConfig, private_key: &str) -> Result<Arc<dyn ChainClient>, ChainError> {
        let chain = RpcChain::connect(&network.rpc, private_key, network.confirm_timeout())?;
        Ok(Arc::new(chain))
    }
}
