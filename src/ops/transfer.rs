//! Plain value transfer to a random recipient.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use rand::seq::IndexedRandom;

use super::settle;
use crate::chain::{ChainClient, ChainError, TxRequest};
use crate::domain::Outcome;

pub struct TransferAdapter {
    chain: Arc<dyn ChainClient>,
    recipients: Vec<Address>,
    gas_limit: u64,
}

impl TransferAdapter {
    pub fn new(chain: Arc<dyn ChainClient>, recipients: Vec<Address>, gas_limit: u64) -> Self {
        Self {
            chain,
            recipients,
            gas_limit,
        }
    }

    pub fn recipient_count(&self) -> usize {
        self.recipients.len()
    }

    /// Send `amount` native to a uniformly drawn recipient
    pub async fn send(&self, amount: U256) -> Outcome {
        let Some(to) = self.recipients.choose(&mut rand::rng()).copied() else {
            return Outcome::NoWallets;
        };
        settle("transfer", self.try_send(to, amount).await)
    }

    async fn try_send(&self, to: Address, amount: U256) -> Result<Outcome, ChainError> {
        let receipt = self.chain.submit(TxRequest::transfer(to, amount, self.gas_limit)).await?;
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }
}
