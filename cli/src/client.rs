//! Chain client plumbing: transaction assembly, `terrad` signing and
//! broadcast, LCD balance queries.
//!
//! Signing and key management are delegated to the node's own CLI and its
//! test keyring; this module only builds proto-JSON transaction bodies and
//! interprets the node's responses.

use anyhow::{Context, Result};
use colored::Colorize;
use cosmwasm_std::{to_json_binary, Coin};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::Command;

use crate::config::{NetworkConfig, TestAccount, FEE_COINS, GAS_LIMIT};
use crate::msg;

/// Broadcast result as reported by the node
#[derive(Debug, Clone, Deserialize)]
pub struct TxResult {
    #[serde(default)]
    pub height: String,
    pub txhash: String,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Vec<TxLog>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxLog {
    #[serde(default)]
    pub msg_index: u32,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<TxAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TxAttribute {
    pub key: String,
    pub value: String,
}

impl TxResult {
    /// All values for `key` across events of type `kind`, in log order
    pub fn event_attrs(&self, kind: &str, key: &str) -> Vec<&str> {
        self.logs
            .iter()
            .flat_map(|log| &log.events)
            .filter(|event| event.kind == kind)
            .flat_map(|event| &event.attributes)
            .filter(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
            .collect()
    }

    pub fn first_event_attr(&self, kind: &str, key: &str) -> Option<&str> {
        self.event_attrs(kind, key).first().copied()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// The node accepted the broadcast but the transaction failed on-chain
    #[error("transaction failed: code={code} codespace={codespace} raw_log={raw_log}")]
    Tx {
        code: u32,
        codespace: String,
        raw_log: String,
    },

    /// `terrad` itself failed before a result was produced
    #[error("{command} exited with status {status}: {stderr}")]
    Cli {
        command: String,
        status: i32,
        stderr: String,
    },
}

pub struct ChainClient {
    lcd_url: String,
    rpc_url: String,
    chain_id: String,
    terrad_path: std::path::PathBuf,
    keyring_backend: String,
    verbose: bool,
    http: reqwest::Client,
}

impl ChainClient {
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            lcd_url: config.lcd_url.clone(),
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id.clone(),
            terrad_path: config.terrad_path.clone(),
            keyring_backend: config.keyring_backend.clone(),
            verbose: config.verbose,
            http: reqwest::Client::new(),
        }
    }

    /// Sign and broadcast `msgs` as one transaction. Multiple messages
    /// execute as a single all-or-nothing unit. Blocks until the node
    /// reports the committed result; a non-zero code becomes
    /// [`ChainError::Tx`].
    pub async fn broadcast(&self, sender: &TestAccount, msgs: Vec<Value>) -> Result<TxResult> {
        let unsigned = json!({
            "body": {
                "messages": msgs,
                "memo": "",
                "timeout_height": "0",
                "extension_options": [],
                "non_critical_extension_options": [],
            },
            "auth_info": {
                "signer_infos": [],
                "fee": {
                    "amount": FEE_COINS
                        .iter()
                        .map(|(denom, amount)| json!({ "denom": denom, "amount": amount.to_string() }))
                        .collect::<Vec<_>>(),
                    "gas_limit": GAS_LIMIT.to_string(),
                    "payer": "",
                    "granter": "",
                },
            },
            "signatures": [],
        });

        let dir = tempfile::tempdir().context("Failed to create tx scratch directory")?;
        let unsigned_path = dir.path().join("unsigned.json");
        let signed_path = dir.path().join("signed.json");

        fs::write(&unsigned_path, serde_json::to_vec(&unsigned)?)
            .context("Failed to write unsigned tx body")?;

        self.run_terrad(&[
            "tx",
            "sign",
            unsigned_path.to_str().context("Non-UTF-8 scratch path")?,
            "--from",
            &sender.name,
            "--chain-id",
            &self.chain_id,
            "--keyring-backend",
            &self.keyring_backend,
            "--node",
            &self.rpc_url,
            "--output-document",
            signed_path.to_str().context("Non-UTF-8 scratch path")?,
        ])?;

        let stdout = self.run_terrad(&[
            "tx",
            "broadcast",
            signed_path.to_str().context("Non-UTF-8 scratch path")?,
            "--broadcast-mode",
            "block",
            "--node",
            &self.rpc_url,
            "--output",
            "json",
        ])?;

        let result: TxResult = serde_json::from_str(stdout.trim())
            .with_context(|| format!("Failed to parse broadcast result: {}", stdout.trim()))?;

        if self.verbose {
            println!("{} {}", "TxHash:".magenta(), result.txhash);
            println!("{} {}", "Raw log:".magenta(), result.raw_log);
        }

        if result.code != 0 {
            return Err(ChainError::Tx {
                code: result.code,
                codespace: result.codespace,
                raw_log: result.raw_log,
            }
            .into());
        }

        Ok(result)
    }

    /// Upload contract bytecode. Returns the code id the node assigned.
    pub async fn store_code(&self, sender: &TestAccount, wasm_path: &Path) -> Result<u64> {
        if !wasm_path.exists() {
            anyhow::bail!(
                "Contract artifact not found: {}\nBuild the contracts and place the optimized wasm there first",
                wasm_path.display()
            );
        }

        let wasm = fs::read(wasm_path)
            .with_context(|| format!("Failed to read contract artifact: {}", wasm_path.display()))?;

        let result = self
            .broadcast(sender, vec![msg::store_code(&sender.address, &wasm)])
            .await?;

        result
            .first_event_attr("store_code", "code_id")
            .context("Broadcast result carries no store_code event")?
            .parse()
            .context("Invalid code_id in store_code event")
    }

    /// Instantiate a contract from a stored code id. The result's
    /// `instantiate` events carry the new contract addresses in creation
    /// order.
    pub async fn instantiate<T: serde::Serialize>(
        &self,
        sender: &TestAccount,
        admin: Option<&str>,
        code_id: u64,
        label: &str,
        init_msg: &T,
        funds: &[Coin],
    ) -> Result<TxResult> {
        self.broadcast(
            sender,
            vec![msg::instantiate(
                &sender.address,
                admin,
                code_id,
                label,
                init_msg,
                funds,
            )?],
        )
        .await
    }

    /// Execute a single contract call
    pub async fn execute<T: serde::Serialize>(
        &self,
        sender: &TestAccount,
        contract: &str,
        exec_msg: &T,
        funds: &[Coin],
    ) -> Result<TxResult> {
        self.broadcast(
            sender,
            vec![msg::execute(&sender.address, contract, exec_msg, funds)?],
        )
        .await
    }

    /// Native balance of `account` in `denom`; absent denominations read 0
    pub async fn query_native_balance(&self, account: &str, denom: &str) -> Result<u128> {
        #[derive(Deserialize)]
        struct BalancesResponse {
            #[serde(default)]
            balances: Vec<LcdCoin>,
        }
        #[derive(Deserialize)]
        struct LcdCoin {
            denom: String,
            amount: String,
        }

        let url = format!("{}/cosmos/bank/v1beta1/balances/{}", self.lcd_url, account);
        log::debug!("GET {}", url);

        let response: BalancesResponse = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Balance query failed for {}", account))?
            .json()
            .await
            .context("Failed to parse balance response")?;

        response
            .balances
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount.parse().context("Non-numeric balance amount"))
            .unwrap_or(Ok(0))
    }

    /// CW20 balance of `account` in the token at `contract`
    pub async fn query_token_balance(&self, contract: &str, account: &str) -> Result<u128> {
        #[derive(Deserialize)]
        struct SmartQueryResponse {
            data: msg::BalanceResponse,
        }

        let query = msg::Cw20QueryMsg::Balance {
            address: account.to_string(),
        };
        let url = format!(
            "{}/cosmwasm/wasm/v1/contract/{}/smart/{}",
            self.lcd_url,
            contract,
            to_json_binary(&query)?.to_base64()
        );
        log::debug!("GET {}", url);

        let response: SmartQueryResponse = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("Token balance query failed for {}", account))?
            .json()
            .await
            .context("Failed to parse smart query response")?;

        Ok(response.data.balance.u128())
    }

    fn run_terrad(&self, args: &[&str]) -> Result<String> {
        log::debug!("{} {}", self.terrad_path.display(), args.join(" "));

        let output = Command::new(&self.terrad_path)
            .args(args)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {}. Is the terrad CLI installed?",
                    self.terrad_path.display()
                )
            })?;

        if !output.status.success() {
            return Err(ChainError::Cli {
                command: format!("{} {}", self.terrad_path.display(), args[..2.min(args.len())].join(" ")),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
