//! Operation adapters - one per protocol interaction in a cycle
//!
//! Every adapter call returns an `Outcome`. Chain failures are folded into
//! `Outcome::Error` here, so nothing an adapter does can abort a run.

pub mod deploy;
pub mod stake;
pub mod swap;
pub mod transfer;
pub mod wrap;

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::Address;

use crate::chain::{ChainClient, ChainError};
use crate::config::Config;
use crate::domain::Outcome;
use crate::error::{CycleError, Result};

pub use deploy::{COUNTER_INIT_CODE, DeployAdapter};
pub use stake::{STAKE_SELECTOR, StakeAdapter};
pub use swap::SwapAdapter;
pub use transfer::TransferAdapter;
pub use wrap::WrapAdapter;

/// Names reported in the dashboard service list, in execution order
pub const SERVICE_NAMES: [&str; 6] = ["swap", "uniswap", "beanSwap", "sendTx", "deploy", "kitsu"];

/// Symbol under which the second DEX's only token is booked
pub const SECOND_DEX_SYMBOL: &str = "USDC";

/// All adapters for one run, bound to the run's signer
pub struct Adapters {
    pub wrap: WrapAdapter,
    pub uniswap: SwapAdapter,
    pub beanswap: SwapAdapter,
    pub transfer: TransferAdapter,
    pub deploy: DeployAdapter,
    pub stake: StakeAdapter,
}

impl Adapters {
    /// Build every adapter from the configured addresses
    pub fn build(chain: Arc<dyn ChainClient>, config: &Config, recipients: &[String]) -> Result<Self> {
        let contracts = &config.contracts;
        let network = &config.network;
        let gas = &network.gas;

        let wmon = parse_address("contracts.wmon", &contracts.wmon)?;

        let mut uniswap_tokens = BTreeMap::new();
        for (symbol, raw) in &contracts.uniswap.tokens {
            let field = format!("contracts.uniswap.tokens.{symbol}");
            uniswap_tokens.insert(symbol.clone(), parse_address(&field, raw)?);
        }
        let uniswap = SwapAdapter::new(
            chain.clone(),
            parse_address("contracts.uniswap.router", &contracts.uniswap.router)?,
            parse_address("contracts.uniswap.weth", &contracts.uniswap.weth)?,
            uniswap_tokens,
            network,
        );

        let beanswap_tokens = BTreeMap::from([(
            SECOND_DEX_SYMBOL.to_string(),
            parse_address("contracts.beanswap.usdc", &contracts.beanswap.usdc)?,
        )]);
        let beanswap = SwapAdapter::new(
            chain.clone(),
            parse_address("contracts.beanswap.router", &contracts.beanswap.router)?,
            wmon,
            beanswap_tokens,
            network,
        );

        Ok(Self {
            wrap: WrapAdapter::new(chain.clone(), wmon, gas.contract_call),
            uniswap,
            beanswap,
            transfer: TransferAdapter::new(chain.clone(), parse_recipients(recipients), gas.transfer),
            deploy: DeployAdapter::new(chain.clone(), gas.contract_call),
            stake: StakeAdapter::new(
                chain,
                parse_address("contracts.kitsu.router", &contracts.kitsu.router)?,
                gas.contract_call,
            ),
        })
    }
}

/// Parse a configured contract address
pub fn parse_address(field: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| CycleError::Config(format!("{field}: invalid address {raw:?}: {e}")))
}

fn parse_recipients(recipients: &[String]) -> Vec<Address> {
    recipients
        .iter()
        .filter_map(|raw| match raw.parse::<Address>() {
            Ok(address) => Some(address),
            Err(e) => {
                log::warn!("Skipping recipient {raw}: {e}");
                None
            }
        })
        .collect()
}

/// Fold a chain failure into an `Outcome`
pub(crate) fn settle(operation: &str, result: std::result::Result<Outcome, ChainError>) -> Outcome {
    match result {
        Ok(outcome) => outcome,
        Err(e) => {
            log::warn!("{operation} failed: {e}");
            Outcome::Error(e.to_string())
        }
    }
}
