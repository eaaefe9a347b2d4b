use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CycleError, Result};
use crate::sampling::{RandomRange, amount_units};

/// Environment variable overriding `server.port`
pub const PORT_ENV: &str = "PORT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cycles: CyclesConfig,
    pub network: NetworkConfig,
    pub contracts: ContractsConfig,
    pub paths: PathsConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CyclesConfig {
    /// Cycles per run
    pub default: u32,
    /// Native amount bounds, in whole units
    pub amounts: RandomRange<f64>,
    /// Pause bounds in milliseconds
    pub delays: RandomRange<u64>,
}

impl Default for CyclesConfig {
    fn default() -> Self {
        Self {
            default: 1,
            amounts: RandomRange::new(0.001, 0.01),
            delays: RandomRange::new(5_000, 15_000),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub rpc: String,
    /// Display symbol of the native unit
    pub symbol: String,
    pub confirm_timeout_ms: u64,
    pub deadline_secs: u64,
    pub gas: GasConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc: "https://testnet-rpc.monad.xyz".to_string(),
            symbol: "MON".to_string(),
            confirm_timeout_ms: 120_000,
            deadline_secs: 3_600,
            gas: GasConfig::default(),
        }
    }
}

impl NetworkConfig {
    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.confirm_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub contract_call: u64,
    pub approve: u64,
    pub transfer: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            contract_call: 500_000,
            approve: 100_000,
            transfer: 21_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Wrapped native token
    pub wmon: String,
    pub uniswap: UniswapConfig,
    pub beanswap: BeanSwapConfig,
    pub kitsu: StakeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniswapConfig {
    pub router: String,
    pub weth: String,
    /// Symbol -> token address; one symbol is drawn per cycle
    pub tokens: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BeanSwapConfig {
    pub router: String,
    pub usdc: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StakeConfig {
    pub router: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub private_keys: PathBuf,
    pub wallets: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            private_keys: PathBuf::from("private.key"),
            wallets: PathBuf::from("wallets.txt"),
            static_dir: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub status_interval_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            status_interval_ms: 2_000,
        }
    }
}

impl ServerConfig {
    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a YAML (or JSON) config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| {
            CycleError::Config(format!("failed to read {}: {}", path.as_ref().display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&content)?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the `PORT` override, ignoring values that are not a port
    pub fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var(PORT_ENV) {
            self.apply_port_override(&raw);
        }
    }

    fn apply_port_override(&mut self, raw: &str) {
        match raw.trim().parse::<u16>() {
            Ok(port) => self.server.port = port,
            Err(_) => log::warn!("Ignoring {}={:?}: not a valid port", PORT_ENV, raw),
        }
    }

    /// Reject settings that would fail every run
    pub fn validate(&self) -> Result<()> {
        if self.cycles.default == 0 {
            return Err(CycleError::Config("cycles.default must be at least 1".to_string()));
        }
        amount_units(&self.cycles.amounts)?;
        self.cycles.delays.check()?;
        if self.contracts.uniswap.tokens.is_empty() {
            return Err(CycleError::Config("contracts.uniswap.tokens is empty".to_string()));
        }
        if self.network.rpc.trim().is_empty() {
            return Err(CycleError::Config("network.rpc is empty".to_string()));
        }
        Ok(())
    }
}
