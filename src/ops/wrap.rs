//! Wrap native into the wrapped token and back.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use super::settle;
use crate::chain::{ChainClient, ChainError, WrappedNative};
use crate::domain::Outcome;

pub struct WrapAdapter {
    owner: Address,
    token: WrappedNative,
}

impl WrapAdapter {
    pub fn new(chain: Arc<dyn ChainClient>, wrapped: Address, gas_limit: u64) -> Self {
        Self {
            owner: chain.address(),
            token: WrappedNative::new(chain, wrapped, gas_limit),
        }
    }

    /// Deposit `amount` native
    pub async fn wrap(&self, amount: U256) -> Outcome {
        settle("wrap", self.try_wrap(amount).await)
    }

    /// Withdraw the whole wrapped balance
    pub async fn unwrap(&self) -> Outcome {
        settle("unwrap", self.try_unwrap().await)
    }

    async fn try_wrap(&self, amount: U256) -> Result<Outcome, ChainError> {
        let receipt = self.token.deposit(amount).await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }

    async fn try_unwrap(&self) -> Result<Outcome, ChainError> {
        let balance = self.token.balance_of(self.owner).await?;
        if balance.is_zero() {
            return Ok(Outcome::NoBalance);
        }
        let receipt = self.token.withdraw(balance).await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }
}
