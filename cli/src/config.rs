//! Network configuration and test-account management

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Flat per-transaction gas limit
pub const GAS_LIMIT: u64 = 30_000_000;

/// Flat fee paid on every transaction, one amount per denomination
pub const FEE_COINS: [(&str, u128); 2] = [("uluna", 4_500_000), ("uusd", 4_500_000)];

/// A key in the node's test keyring plus its bech32 address
#[derive(Debug, Clone, Deserialize)]
pub struct TestAccount {
    pub name: String,
    pub address: String,
}

pub struct NetworkConfig {
    pub network: String,
    pub lcd_url: String,
    pub rpc_url: String,
    pub chain_id: String,
    pub terrad_path: PathBuf,
    pub keyring_backend: String,
    pub artifacts_dir: PathBuf,
    pub deployer: TestAccount,
    pub user1: TestAccount,
    pub user2: TestAccount,
    pub verbose: bool,
}

/// Optional TOML override file (`--config`); any field left out keeps the
/// network default.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    lcd_url: Option<String>,
    rpc_url: Option<String>,
    chain_id: Option<String>,
    terrad_path: Option<String>,
    keyring_backend: Option<String>,
    artifacts_dir: Option<String>,
    deployer: Option<TestAccount>,
    user1: Option<TestAccount>,
    user2: Option<TestAccount>,
}

impl NetworkConfig {
    pub fn new(
        network: &str,
        lcd_url: Option<String>,
        config_path: Option<PathBuf>,
        verbose: bool,
    ) -> Result<Self> {
        let (default_lcd, default_rpc, chain_id) = match network {
            "localterra" | "local" => (
                "http://localhost:1317".to_string(),
                "http://localhost:26657".to_string(),
                "localterra".to_string(),
            ),
            _ => bail!("Unknown network: {}. Use localterra", network),
        };

        // Stock LocalTerra accounts; the keys ship preloaded in the node's
        // test keyring.
        let mut config = Self {
            network: network.to_string(),
            lcd_url: lcd_url.unwrap_or(default_lcd),
            rpc_url: default_rpc,
            chain_id,
            terrad_path: PathBuf::from("terrad"),
            keyring_backend: "test".to_string(),
            artifacts_dir: PathBuf::from("artifacts"),
            deployer: TestAccount {
                name: "test1".to_string(),
                address: "terra1x46rqay4d3cssq8gxxvqz8xt6nwlz4td20k38v".to_string(),
            },
            user1: TestAccount {
                name: "test2".to_string(),
                address: "terra17lmam6zguazs5q5u6z5mmx76uj63gldnse2pdp".to_string(),
            },
            user2: TestAccount {
                name: "test3".to_string(),
                address: "terra1757tkx08n0cqrw7p86ny9lnxsqeth0wgp0em95".to_string(),
            },
            verbose,
        };

        if let Some(path) = config_path {
            config.apply_file(&path)?;
        }

        Ok(config)
    }

    /// Resolve a key name to one of the configured test accounts
    pub fn account(&self, name: &str) -> Result<&TestAccount> {
        [&self.deployer, &self.user1, &self.user2]
            .into_iter()
            .find(|a| a.name == name)
            .with_context(|| {
                format!(
                    "Unknown account: {}. Configured keys: {}, {}, {}",
                    name, self.deployer.name, self.user1.name, self.user2.name
                )
            })
    }

    fn apply_file(&mut self, path: &PathBuf) -> Result<()> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let file: ConfigFile = toml::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(v) = file.lcd_url {
            self.lcd_url = v;
        }
        if let Some(v) = file.rpc_url {
            self.rpc_url = v;
        }
        if let Some(v) = file.chain_id {
            self.chain_id = v;
        }
        if let Some(v) = file.terrad_path {
            self.terrad_path = PathBuf::from(shellexpand::tilde(&v).into_owned());
        }
        if let Some(v) = file.keyring_backend {
            self.keyring_backend = v;
        }
        if let Some(v) = file.artifacts_dir {
            self.artifacts_dir = PathBuf::from(shellexpand::tilde(&v).into_owned());
        }
        if let Some(v) = file.deployer {
            self.deployer = v;
        }
        if let Some(v) = file.user1 {
            self.user1 = v;
        }
        if let Some(v) = file.user2 {
            self.user2 = v;
        }

        Ok(())
    }
}
