//! Counter contract deployment.
//!
//! The artifact is prebuilt: a storage slot `count` with `count()` and
//! `increment()`, no constructor arguments. Every call creates a new
//! instance.

use std::sync::Arc;

use alloy::primitives::hex;

use super::settle;
use crate::chain::{ChainClient, ChainError, TxRequest};
use crate::domain::Outcome;

/// Creation code: an 11-byte loader followed by the 52-byte runtime
pub const COUNTER_INIT_CODE: [u8; 63] = hex!(
    "603480600b6000396000f3"
    "60003560e01c806306661abd14601d5763d09de08a14602957600080fd"
    "5b60005460005260206000f3"
    "5b600054600101600055"
    "00"
);

pub struct DeployAdapter {
    chain: Arc<dyn ChainClient>,
    gas_limit: u64,
}

impl DeployAdapter {
    pub fn new(chain: Arc<dyn ChainClient>, gas_limit: u64) -> Self {
        Self { chain, gas_limit }
    }

    pub async fn deploy(&self) -> Outcome {
        settle("deploy", self.try_deploy().await)
    }

    async fn try_deploy(&self) -> Result<Outcome, ChainError> {
        let receipt = self
            .chain
            .submit(TxRequest::deploy(COUNTER_INIT_CODE.to_vec(), self.gas_limit))
            .await?;
        if let Some(address) = receipt.contract_address {
            log::info!("Counter deployed at {address}");
        }
        Ok(Outcome::Success(receipt.tx_hash.to_string()))
    }
}
