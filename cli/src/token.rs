//! CW20 token operations

use anyhow::Result;
use colored::Colorize;
use cosmwasm_std::Uint128;

use crate::client::ChainClient;
use crate::config::NetworkConfig;
use crate::msg::Cw20ExecuteMsg;

/// Mint `amount` to `recipient`. Only the configured deployer holds the
/// minter role.
pub async fn mint(
    config: &NetworkConfig,
    contract: &str,
    recipient: &str,
    amount: Uint128,
) -> Result<()> {
    let client = ChainClient::new(config);

    let result = client
        .execute(
            &config.deployer,
            contract,
            &Cw20ExecuteMsg::Mint {
                recipient: recipient.to_string(),
                amount,
            },
            &[],
        )
        .await?;

    println!("{} {}", "Minted:".bright_green(), result.txhash);
    Ok(())
}

/// Print a CW20 balance
pub async fn show_balance(config: &NetworkConfig, contract: &str, account: &str) -> Result<()> {
    println!("{}", "=== Token Balance ===".bright_green().bold());
    println!("{} {}", "Contract:".bright_cyan(), contract);
    println!("{} {}", "Account:".bright_cyan(), account);

    let client = ChainClient::new(config);
    let balance = client.query_token_balance(contract, account).await?;

    println!("{} {}", "Balance:".bright_cyan(), balance);
    Ok(())
}
