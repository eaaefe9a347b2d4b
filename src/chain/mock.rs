//! In-memory chain for tests and dry runs.
//!
//! Reads dispatch on the call selector and the contract address only:
//! `balanceOf` and `allowance` answer from per-contract tables regardless
//! of their arguments. Submissions are recorded and confirm instantly.
//! An `approve` raises the contract's allowance to the approved amount.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;

use super::client::{ChainClient, ChainConnector, ChainError, TxReceipt, TxRequest};
use super::contracts::IERC20;
use crate::config::NetworkConfig;

#[derive(Debug, Default)]
struct Ledger {
    token_balances: HashMap<Address, U256>,
    allowances: HashMap<Address, U256>,
    submitted: Vec<TxRequest>,
}

/// Scripted `ChainClient`
#[derive(Debug)]
pub struct MockChain {
    address: Address,
    native_balance: U256,
    failure: Option<ChainError>,
    ledger: Mutex<Ledger>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            address: Address::repeat_byte(0x5a),
            native_balance: U256::from(10u64).pow(U256::from(18)),
            failure: None,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    pub fn with_native_balance(mut self, balance: U256) -> Self {
        self.native_balance = balance;
        self
    }

    pub fn with_token_balance(self, token: Address, balance: U256) -> Self {
        self.ledger().token_balances.insert(token, balance);
        self
    }

    pub fn with_allowance(self, token: Address, allowance: U256) -> Self {
        self.ledger().allowances.insert(token, allowance);
        self
    }

    /// Every read and submission fails with `error`
    pub fn failing(mut self, error: ChainError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Transactions submitted so far, in order
    pub fn submitted(&self) -> Vec<TxRequest> {
        self.ledger().submitted.clone()
    }

    fn ledger(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check(&self) -> Result<(), ChainError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn word(value: U256) -> Bytes {
    Bytes::from(value.to_be_bytes::<32>().to_vec())
}

#[async_trait]
impl ChainClient for MockChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn native_balance(&self, _owner: Address) -> Result<U256, ChainError> {
        self.check()?;
        Ok(self.native_balance)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, ChainError> {
        self.check()?;
        let ledger = self.ledger();
        match input.get(..4) {
            Some(sel) if sel == IERC20::balanceOfCall::SELECTOR => {
                Ok(word(ledger.token_balances.get(&to).copied().unwrap_or_default()))
            }
            Some(sel) if sel == IERC20::allowanceCall::SELECTOR => {
                Ok(word(ledger.allowances.get(&to).copied().unwrap_or_default()))
            }
            _ => Err(ChainError::Rpc(format!("mock: unsupported call to {to}"))),
        }
    }

    async fn submit(&self, tx: TxRequest) -> Result<TxReceipt, ChainError> {
        self.check()?;
        let mut ledger = self.ledger();

        // approve(address spender, uint256 amount): amount is the second word
        if let Some(to) = tx.to {
            if tx.input.get(..4) == Some(&IERC20::approveCall::SELECTOR[..]) {
                if let Some(amount) = tx.input.get(36..68) {
                    ledger.allowances.insert(to, U256::from_be_slice(amount));
                }
            }
        }

        ledger.submitted.push(tx.clone());
        let nonce = ledger.submitted.len() as u64;
        let tx_hash = B256::left_padding_from(&nonce.to_be_bytes());
        let contract_address = tx.is_create().then(|| self.address.create(nonce - 1));

        Ok(TxReceipt {
            tx_hash,
            contract_address,
        })
    }
}

/// Hands every run the same `MockChain`
#[derive(Debug, Clone)]
pub struct MockConnector {
    chain: Arc<MockChain>,
}

impl MockConnector {
    pub fn new(chain: Arc<MockChain>) -> Self {
        Self { chain }
    }
}

impl ChainConnector for MockConnector {
    fn connect(&self, _network: &NetworkConfig, _private_key: &str) -> Result<Arc<dyn ChainClient>, ChainError> {
        Ok(self.chain.clone())
    }
}
