//! Cycle runner - drives one run from credentials to the last cycle.
//!
//! The runner is the only writer of the shared `RunState`. Every mutation
//! goes through `watch::Sender::send_modify`, so observers always see a
//! whole snapshot and are woken on each change.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::chain::ChainConnector;
use crate::config::Config;
use crate::domain::{CYCLE_TEMPLATE, CycleStep, Outcome, RunState, RunStatus, ServiceEntry, stamp};
use crate::error::{CycleError, Result};
use crate::ops::{Adapters, SECOND_DEX_SYMBOL, SERVICE_NAMES};
use crate::sampling::{format_amount, format_units, sample_amount, sample_delay};
use crate::wallet::{load_private_keys, load_recipients, mask_address};

/// Fractional digits shown for the starting balance
const BALANCE_DECIMALS: u32 = 6;

/// Executes the configured number of cycles against one signer.
pub struct CycleRunner {
    config: Arc<Config>,
    connector: Arc<dyn ChainConnector>,
    state: Arc<watch::Sender<RunState>>,
    cancel: CancellationToken,
}

impl CycleRunner {
    /// The caller resets `state` to `Starting` before handing it over
    pub fn new(
        config: Arc<Config>,
        connector: Arc<dyn ChainConnector>,
        state: Arc<watch::Sender<RunState>>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            connector,
            state,
            cancel,
        }
    }

    /// Run to completion, recording any failure in the state. Returns the final status.
    pub async fn run(self) -> RunStatus {
        match self.execute().await {
            Ok(()) => {
                tracing::info!(cycles = self.config.cycles.default, "Run completed");
                self.finish(RunStatus::Completed, "Finished all cycles");
            }
            Err(CycleError::Cancelled) => {
                tracing::warn!("Run cancelled");
                self.finish(RunStatus::Error, &CycleError::Cancelled.to_string());
            }
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                self.finish(RunStatus::Error, &format!("Fatal error: {e}"));
            }
        }
        self.state.borrow().status
    }

    async fn execute(&self) -> Result<()> {
        let total = self.config.cycles.default;
        self.log("Starting run");

        let keys = load_private_keys(&self.config.paths.private_keys)?;
        let key = keys
            .first()
            .ok_or_else(|| CycleError::Credentials("no signing key".to_string()))?;
        let chain = self.connector.connect(&self.config.network, key)?;

        let wallet = mask_address(&chain.address().to_string());
        self.state.send_modify(|state| state.wallet = wallet.clone());
        self.log(&format!("Wallet: {wallet}"));

        let balance = format_units(chain.native_balance(chain.address()).await?, BALANCE_DECIMALS);
        self.state.send_modify(|state| state.balance = balance.clone());
        self.log(&format!("Balance: {} {}", balance, self.config.network.symbol));

        let recipients = load_recipients(&self.config.paths.wallets)?;
        let adapters = Adapters::build(chain, &self.config, &recipients)?;

        self.state.send_modify(|state| {
            state.services = SERVICE_NAMES.iter().map(|name| ServiceEntry::ready(name)).collect();
            state.status = RunStatus::Running;
        });
        tracing::info!(total, recipients = recipients.len(), "Run started");

        for cycle in 1..=total {
            self.checkpoint()?;
            self.run_cycle(&adapters, cycle, total).await?;

            if cycle < total {
                let delay = sample_delay(&self.config.cycles.delays)?;
                self.log(&format!("Waiting {:.1}s before next cycle", delay.as_secs_f64()));
                self.pause(delay).await?;
            }
        }
        Ok(())
    }

    async fn run_cycle(&self, adapters: &Adapters, cycle: u32, total: u32) -> Result<()> {
        self.state.send_modify(|state| state.cycles.advance_to(cycle));
        self.log(&format!("Starting cycle {cycle}/{total}"));

        let amount = sample_amount(&self.config.cycles.amounts)?;
        let symbol = adapters
            .uniswap
            .random_symbol()
            .ok_or_else(|| CycleError::Config("contracts.uniswap.tokens is empty".to_string()))?;
        tracing::debug!(cycle, amount = %format_amount(amount), symbol = %symbol, "Cycle parameters");

        for step in CYCLE_TEMPLATE {
            self.checkpoint()?;
            self.log(&self.describe(step, amount, &symbol));

            let outcome = self.execute_step(adapters, step, amount, &symbol).await?;
            self.log(&format!("{}: {}", step.label(), outcome));

            if step.pauses_after() {
                self.pause(sample_delay(&self.config.cycles.delays)?).await?;
            }
        }
        Ok(())
    }

    async fn execute_step(&self, adapters: &Adapters, step: CycleStep, amount: U256, symbol: &str) -> Result<Outcome> {
        let outcome = match step {
            CycleStep::Wrap => adapters.wrap.wrap(amount).await,
            CycleStep::Unwrap => adapters.wrap.unwrap().await,
            CycleStep::SwapBuy => adapters.uniswap.buy(symbol, amount).await,
            CycleStep::SwapSell => adapters.uniswap.sell(symbol).await,
            CycleStep::SecondDexBuy => adapters.beanswap.buy(SECOND_DEX_SYMBOL, amount).await,
            CycleStep::SecondDexSell => adapters.beanswap.sell(SECOND_DEX_SYMBOL).await,
            CycleStep::Transfer => {
                let amount = sample_amount(&self.config.cycles.amounts)?;
                adapters.transfer.send(amount).await
            }
            CycleStep::Deploy => adapters.deploy.deploy().await,
            CycleStep::Stake => {
                let amount = sample_amount(&self.config.cycles.amounts)?;
                adapters.stake.stake(amount).await
            }
        };
        Ok(outcome)
    }

    /// Announcement logged before a step runs
    fn describe(&self, step: CycleStep, amount: U256, symbol: &str) -> String {
        let unit = &self.config.network.symbol;
        match step {
            CycleStep::Wrap => format!("Swap: Wrapping {} {}", format_amount(amount), unit),
            CycleStep::Unwrap => format!("Swap: Unwrapping W{unit}"),
            CycleStep::SwapBuy => format!("Uniswap: {unit} -> {symbol}"),
            CycleStep::SwapSell => format!("Uniswap: {symbol} -> {unit}"),
            CycleStep::SecondDexBuy => format!("BeanSwap: {unit} -> {SECOND_DEX_SYMBOL}"),
            CycleStep::SecondDexSell => format!("BeanSwap: {SECOND_DEX_SYMBOL} -> {unit}"),
            CycleStep::Transfer => "Transfer: random recipient".to_string(),
            CycleStep::Deploy => "Deploy: Counter contract".to_string(),
            CycleStep::Stake => format!("Kitsu: Stake {unit}"),
        }
    }

    fn checkpoint(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(CycleError::Cancelled);
        }
        Ok(())
    }

    async fn pause(&self, delay: Duration) -> Result<()> {
        tokio::select! {
            _ = self.cancel.cancelled() => Err(CycleError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    fn log(&self, message: &str) {
        log::info!("{message}");
        let line = stamp(message);
        self.state.send_modify(|state| state.logs.push(line));
    }

    fn finish(&self, status: RunStatus, message: &str) {
        log::info!("{message}");
        let line = stamp(message);
        self.state.send_modify(|state| {
            state.status = status;
            state.logs.push(line);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::contracts::IUniswapV2Router;
    use crate::chain::{ChainClient, ChainError, MockChain, MockConnector};
    use alloy::primitives::Address;
    use alloy::sol_types::SolCall;
    use crate::sampling::RandomRange;
    use std::fs;
    use tempfile::TempDir;

    fn addr(n: u8) -> String {
        format!("{:#x}", Address::repeat_byte(n))
    }

    fn test_config(dir: &TempDir, cycles: u32, delay_ms: u64) -> Config {
        let mut config = Config::default();
        config.cycles.default = cycles;
        config.cycles.delays = RandomRange::new(delay_ms, delay_ms);
        config.paths.private_keys = dir.path().join("private.key");
        config.paths.wallets = dir.path().join("wallets.txt");
        config.contracts.wmon = addr(1);
        config.contracts.uniswap.router = addr(2);
        config.contracts.uniswap.weth = addr(3);
        config.contracts.uniswap.tokens.insert("DAK".to_string(), addr(4));
        config.contracts.beanswap.router = addr(5);
        config.contracts.beanswap.usdc = addr(6);
        config.contracts.kitsu.router = addr(7);
        config
    }

    fn build_runner(config: Config, mock: Arc<MockChain>) -> (CycleRunner, Arc<watch::Sender<RunState>>, CancellationToken) {
        let total = config.cycles.default;
        let state = Arc::new(watch::Sender::new(RunState::starting(total)));
        let cancel = CancellationToken::new();
        let runner = CycleRunner::new(
            Arc::new(config),
            Arc::new(MockConnector::new(mock)),
            state.clone(),
            cancel.clone(),
        );
        (runner, state, cancel)
    }

    fn lines_with(state: &RunState, needle: &str) -> usize {
        state.logs.iter().filter(|line| line.contains(needle)).count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_cycles_complete() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("private.key"), "0xkey\n").unwrap();
        fs::write(dir.path().join("wallets.txt"), format!("{}\n", addr(9))).unwrap();

        let mock = Arc::new(MockChain::new());
        let (runner, state, _) = build_runner(test_config(&dir, 2, 1_000), mock.clone());

        assert_eq!(runner.run().await, RunStatus::Completed);

        let state = state.borrow();
        assert_eq!(state.cycles.current, 2);
        assert_eq!(state.cycles.total, 2);
        assert_eq!(state.wallet, mask_address(&mock.address().to_string()));
        assert_eq!(state.balance, "1.000000");
        assert_eq!(state.services.len(), 6);
        assert_eq!(lines_with(&state, "Starting cycle"), 2);
        assert_eq!(lines_with(&state, "Waiting"), 1);
        assert_eq!(lines_with(&state, "SendTx: Success"), 2);
        assert!(state.logs.last().unwrap().contains("Finished all cycles"));

        // wrap, uniswap buy, beanswap buy, transfer, deploy, stake per cycle
        assert_eq!(mock.submitted().len(), 12);
    }

    #[tokio::test]
    async fn test_missing_keys_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mock = Arc::new(MockChain::new());
        let (runner, state, _) = build_runner(test_config(&dir, 1, 0), mock.clone());

        assert_eq!(runner.run().await, RunStatus::Error);

        let state = state.borrow();
        let last = state.logs.last().unwrap();
        assert!(last.contains("Fatal error"));
        assert!(last.contains("not found"));
        assert_eq!(state.cycles.current, 0);
        assert!(mock.submitted().is_empty());
    }

    #[tokio::test]
    async fn test_balance_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("private.key"), "0xkey\n").unwrap();
        let mock = Arc::new(MockChain::new().failing(ChainError::Rpc("connection refused".to_string())));
        let (runner, state, _) = build_runner(test_config(&dir, 1, 0), mock);

        assert_eq!(runner.run().await, RunStatus::Error);
        assert!(state.borrow().logs.last().unwrap().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_pause() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("private.key"), "0xkey\n").unwrap();
        let mock = Arc::new(MockChain::new());
        let (runner, state, cancel) = build_runner(test_config(&dir, 3, 60_000), mock.clone());

        let handle = tokio::spawn(runner.run());
        // Let the run reach the pause after the first wrap
        tokio::time::sleep(Duration::from_millis(10)).await;
        cancel.cancel();

        assert_eq!(handle.await.unwrap(), RunStatus::Error);
        let state = state.borrow();
        assert_eq!(state.cycles.current, 1);
        assert!(state.logs.last().unwrap().ends_with("Run cancelled"));
        assert_eq!(mock.submitted().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_amount_and_token_are_shared() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("private.key"), "0xkey\n").unwrap();
        fs::write(dir.path().join("wallets.txt"), format!("{}\n", addr(9))).unwrap();

        let mut config = test_config(&dir, 1, 0);
        config.cycles.amounts = RandomRange::new(0.001, 1.0);
        config.contracts.uniswap.tokens.insert("YAKI".to_string(), addr(8));
        let (dak, yaki) = (Address::repeat_byte(4), Address::repeat_byte(8));
        let (uniswap, beanswap) = (Address::repeat_byte(2), Address::repeat_byte(5));

        let mock = Arc::new(
            MockChain::new()
                .with_native_balance(U256::from(2_500_000_000_000_000_000u128))
                .with_token_balance(dak, U256::from(500))
                .with_token_balance(yaki, U256::from(500)),
        );
        let (runner, state, _) = build_runner(config, mock.clone());
        assert_eq!(runner.run().await, RunStatus::Completed);
        assert_eq!(state.borrow().balance, "2.500000");

        let sent = mock.submitted();
        let to = |addr: Address| sent.iter().filter(move |tx| tx.to == Some(addr));

        let wrap = to(Address::repeat_byte(1)).next().unwrap();
        let buy = to(uniswap)
            .find(|tx| tx.input[..4] == IUniswapV2Router::swapExactETHForTokensCall::SELECTOR)
            .unwrap();
        let bean_buy = to(beanswap).next().unwrap();
        assert!(wrap.value > U256::ZERO);
        assert_eq!(buy.value, wrap.value);
        assert_eq!(bean_buy.value, wrap.value);

        let sell = to(uniswap)
            .find(|tx| tx.input[..4] == IUniswapV2Router::swapExactTokensForETHCall::SELECTOR)
            .unwrap();
        let bought = IUniswapV2Router::swapExactETHForTokensCall::abi_decode(&buy.input).unwrap();
        let sold = IUniswapV2Router::swapExactTokensForETHCall::abi_decode(&sell.input).unwrap();
        assert_eq!(bought.path[1], sold.path[0]);
        assert_eq!(to(dak).chain(to(yaki)).count(), 1, "only the drawn token is approved");
    }

    #[test]
    fn test_describe_transfer_is_not_an_outcome_line() {
        let dir = TempDir::new().unwrap();
        let (runner, _, _) = build_runner(test_config(&dir, 1, 0), Arc::new(MockChain::new()));
        let line = runner.describe(CycleStep::Transfer, U256::ZERO, "DAK");
        assert!(!line.contains(CycleStep::Transfer.label()));
    }
}
