//! Contract upload and instantiation: the setup phase
//!
//! Stores both wasm blobs, instantiates the token and the pair, and funds
//! the two test users. The three captured addresses are the only state the
//! scenarios share.

use anyhow::{Context, Result};
use colored::Colorize;
use cosmwasm_std::Uint128;

use crate::client::ChainClient;
use crate::config::NetworkConfig;
use crate::msg::{AssetInfo, MinterResponse, PairInstantiateMsg, TokenInstantiateMsg};
use crate::token;

const TOKEN_WASM: &str = "terraswap_token.wasm";
const PAIR_WASM: &str = "terraswap_pair.wasm";

/// uMIR minted to each test user during setup
pub const USER_FUNDING: u128 = 10_000_000_000;

/// Contract addresses captured during setup, written once
#[derive(Debug, Clone)]
pub struct Deployment {
    pub token: String,
    pub pair: String,
    pub lp_token: String,
}

/// Full setup phase: upload, instantiate, fund. Idempotent only in the
/// sense that rerunning deploys a fresh token/pair set.
pub async fn run_setup(config: &NetworkConfig) -> Result<Deployment> {
    println!("{}", "=== Contract Setup ===".bright_green().bold());
    println!("{} {}", "Network:".bright_cyan(), config.network);
    println!("{} {}", "Deployer:".bright_cyan(), config.deployer.address);
    println!("{} {}", "User 1:".bright_cyan(), config.user1.address);
    println!("{} {}\n", "User 2:".bright_cyan(), config.user2.address);

    let client = ChainClient::new(config);
    let deployer = &config.deployer;

    // Step 1: upload the CW20 token code
    println!("{}", "Uploading token code...".bright_yellow());
    let token_code_id = client
        .store_code(deployer, &config.artifacts_dir.join(TOKEN_WASM))
        .await?;
    println!("{} {} {}", "  └─".dimmed(), "codeId".bright_cyan(), token_code_id);

    // Step 2: instantiate the token
    println!("{}", "Instantiating token contract...".bright_yellow());
    let result = client
        .instantiate(
            deployer,
            Some(&deployer.address),
            token_code_id,
            "Mock Mirror Token",
            &TokenInstantiateMsg {
                name: "Mock Mirror Token".to_string(),
                symbol: "MIR".to_string(),
                decimals: 6,
                initial_balances: vec![],
                mint: Some(MinterResponse {
                    minter: deployer.address.clone(),
                    cap: None,
                }),
            },
            &[],
        )
        .await?;
    let token = result
        .first_event_attr("instantiate", "_contract_address")
        .context("Token instantiation produced no contract address")?
        .to_string();
    println!("{} {} {}", "  └─".dimmed(), "contractAddress".bright_cyan(), token);

    // Step 3: upload the pair code
    println!("{}", "Uploading pair code...".bright_yellow());
    let pair_code_id = client
        .store_code(deployer, &config.artifacts_dir.join(PAIR_WASM))
        .await?;
    println!("{} {} {}", "  └─".dimmed(), "codeId".bright_cyan(), pair_code_id);

    // Step 4: instantiate the pair. It instantiates its own LP token in
    // the same transaction, so the addresses come back in creation order:
    // pair first, LP token second.
    println!("{}", "Instantiating pair contract...".bright_yellow());
    let result = client
        .instantiate(
            deployer,
            Some(&deployer.address),
            pair_code_id,
            "MIR-UST pair",
            &PairInstantiateMsg {
                asset_infos: [
                    AssetInfo::Token {
                        contract_addr: token.clone(),
                    },
                    AssetInfo::NativeToken {
                        denom: "uusd".to_string(),
                    },
                ],
                token_code_id,
            },
            &[],
        )
        .await?;
    let addresses = result.event_attrs("instantiate", "_contract_address");
    let &[pair, lp_token] = addresses.as_slice() else {
        anyhow::bail!(
            "Pair instantiation produced {} contract addresses, expected 2",
            addresses.len()
        );
    };
    let (pair, lp_token) = (pair.to_string(), lp_token.to_string());
    println!("{} {} {}", "  ├─".dimmed(), "pair".bright_cyan(), pair);
    println!("{} {} {}", "  └─".dimmed(), "lpToken".bright_cyan(), lp_token);

    // Step 5: fund the test users
    for user in [&config.user1, &config.user2] {
        println!(
            "{}",
            format!("Funding {} with {} uMIR...", user.name, USER_FUNDING).bright_yellow()
        );
        token::mint(config, &token, &user.address, Uint128::new(USER_FUNDING)).await?;
    }

    println!("\n{}", "=== Setup Complete ===".bright_green().bold());

    Ok(Deployment {
        token,
        pair,
        lp_token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        assert!(TOKEN_WASM.ends_with(".wasm"));
        assert!(PAIR_WASM.ends_with(".wasm"));
    }
}
