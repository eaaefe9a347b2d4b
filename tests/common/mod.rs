//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use alloy::primitives::Address;
use tempfile::TempDir;
use txcycle::config::Config;
use txcycle::sampling::RandomRange;

/// Anvil/hardhat development account #0
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn addr(n: u8) -> String {
    format!("{:#x}", Address::repeat_byte(n))
}

/// Config with every contract set, files under `dir`, and fixed pacing
pub fn config_in(dir: &Path, cycles: u32, delay_ms: u64) -> Config {
    let mut config = Config::default();
    config.cycles.default = cycles;
    config.cycles.delays = RandomRange::new(delay_ms, delay_ms);
    config.paths.private_keys = dir.join("private.key");
    config.paths.wallets = dir.join("wallets.txt");
    config.paths.static_dir = dir.join("public");
    config.contracts.wmon = addr(1);
    config.contracts.uniswap.router = addr(2);
    config.contracts.uniswap.weth = addr(3);
    config.contracts.uniswap.tokens.insert("DAK".to_string(), addr(4));
    config.contracts.beanswap.router = addr(5);
    config.contracts.beanswap.usdc = addr(6);
    config.contracts.kitsu.router = addr(7);
    config
}

/// Temp dir holding a one-key credential file and no recipient file
pub fn workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("private.key"), format!("# signer\n{DEV_KEY}\n")).unwrap();
    dir
}
