//! Native <-> token swaps through a V2-style router.
//!
//! One adapter per DEX. Buys spend native for a booked token; sells swap the
//! whole token balance back, approving the router first only when the
//! standing allowance does not cover the balance.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::{Address, U256};
use rand::seq::IteratorRandom;

use super::settle;
use crate::chain::{ChainClient, ChainError, Erc20, V2Router};
use crate::config::NetworkConfig;
use crate::domain::Outcome;

pub struct SwapAdapter {
    chain: Arc<dyn ChainClient>,
    router: V2Router,
    wrapped: Address,
    tokens: BTreeMap<String, Address>,
    approve_gas: u64,
    deadline_secs: u64,
}

impl SwapAdapter {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        router: Address,
        wrapped: Address,
        tokens: BTreeMap<String, Address>,
        network: &NetworkConfig,
    ) -> Self {
        Self {
            router: V2Router::new(chain.clone(), router, network.gas.contract_call),
            chain,
            wrapped,
            tokens,
            approve_gas: network.gas.approve,
            deadline_secs: network.deadline_secs,
        }
    }

    /// Booked symbols in sorted order
    pub fn symbols(&self) -> Vec<&str> {
        self.tokens.keys().map(String::as_str).collect()
    }

    /// Uniform draw over the booked symbols
    pub fn random_symbol(&self) -> Option<String> {
        self.tokens.keys().choose(&mut rand::rng()).cloned()
    }

    /// Spend `amount` native on `symbol`
    pub async fn buy(&self, symbol: &str, amount: U256) -> Outcome {
        settle("swap buy", self.try_buy(symbol, amount).await)
    }

    /// Sell the whole `symbol` balance for native
    pub async fn sell(&self, symbol: &str) -> Outcome {
        settle("swap sell", self.try_sell(symbol).await)
    }

    fn resolve(&self, symbol: &str) -> Result<Address, ChainError> {
        self.tokens
            .get(symbol)
            .copied()
            .ok_or_else(|| ChainError::UnknownToken(symbol.to_string()))
    }

    fn deadline(&self) -> U256 {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        U256::from(now.saturating_add(self.deadline_secs))
    }

    async fn try_buy(&self, symbol: &str, amount: U256) -> Result<Outcome, ChainError> {
        let token = self.resolve(symbol)?;
        let receipt = self
            .router
            .swap_exact_native_for_tokens(amount, vec![self.wrapped, token], self.chain.address(), self.deadline())
            .await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }

    async fn try_sell(&self, symbol: &str) -> Result<Outcome, ChainError> {
        let owner = self.chain.address();
        let token = Erc20::new(self.chain.clone(), self.resolve(symbol)?);

        let balance = token.balance_of(owner).await?;
        if balance.is_zero() {
            return Ok(Outcome::NoBalance);
        }

        let allowance = token.allowance(owner, self.router.address()).await?;
        if allowance < balance {
            log::debug!("Approving {} for router {}", symbol, self.router.address());
            token.approve(self.router.address(), U256::MAX, self.approve_gas).await?;
        }

        let receipt = self
            .router
            .swap_exact_tokens_for_native(balance, vec![token.address(), self.wrapped], owner, self.deadline())
            .await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }
}
