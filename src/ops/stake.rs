//! Native staking through a fixed-selector call.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use super::settle;
use crate::chain::{ChainClient, ChainError, TxRequest};
use crate::domain::Outcome;

/// Argument-less stake entry point
pub const STAKE_SELECTOR: [u8; 4] = [0xd5, 0x57, 0x59, 0x82];

pub struct StakeAdapter {
    chain: Arc<dyn ChainClient>,
    contract: Address,
    gas_limit: u64,
}

impl StakeAdapter {
    pub fn new(chain: Arc<dyn ChainClient>, contract: Address, gas_limit: u64) -> Self {
        Self {
            chain,
            contract,
            gas_limit,
        }
    }

    /// Stake `amount` native
    pub async fn stake(&self, amount: U256) -> Outcome {
        settle("stake", self.try_stake(amount).await)
    }

    async fn try_stake(&self, amount: U256) -> Result<Outcome, ChainError> {
        let tx = TxRequest::call(self.contract, STAKE_SELECTOR.to_vec(), self.gas_limit).with_value(amount);
        let receipt = self.chain.submit(tx).await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChain;

    #[tokio::test]
    async fn test_stake_sends_selector_with_value() {
        let mock = Arc::new(MockChain::new());
        let contract = Address::repeat_byte(0x77);
        let adapter = StakeAdapter::new(mock.clone(), contract, 500_000);

        assert!(matches!(adapter.stake(U256::from(9)).await, Outcome::Success(_)));

        let sent = mock.submitted();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Some(contract));
        assert_eq!(sent[0].input.as_ref(), &STAKE_SELECTOR);
        assert_eq!(sent[0].value, U256::from(9));
    }

    #[tokio::test]
    async fn test_stake_failure_is_error_outcome() {
        let mock = Arc::new(MockChain::new().failing(ChainError::Reverted("0x01".to_string())));
        let adapter = StakeAdapter::new(mock, Address::ZERO, 500_000);

        let outcome = adapter.stake(U256::from(1)).await;
        assert_eq!(outcome, Outcome::Error("transaction 0x01 reverted".to_string()));
    }
}
