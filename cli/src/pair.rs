//! Swap pair operations

use anyhow::Result;
use colored::Colorize;
use cosmwasm_std::{to_json_binary, Coin, Decimal, Uint128};

use crate::client::{ChainClient, TxResult};
use crate::config::{NetworkConfig, TestAccount};
use crate::msg::{Asset, AssetInfo, Cw20ExecuteMsg, PairExecuteMsg, PairHookMsg};

/// Provide token + native liquidity in one atomic transaction: the
/// allowance grant and the provide call execute as a single all-or-nothing
/// unit, with the native amount attached as funds.
pub async fn provide_liquidity(
    config: &NetworkConfig,
    sender: &TestAccount,
    pair: &str,
    token: &str,
    token_amount: Uint128,
    native_amount: Uint128,
) -> Result<TxResult> {
    println!("{}", "=== Provide Liquidity ===".bright_green().bold());
    println!("{} {}", "Sender:".bright_cyan(), sender.address);
    println!("{} {}", "Pair:".bright_cyan(), pair);
    println!("{} {} uMIR", "Token:".bright_cyan(), token_amount);
    println!("{} {} uusd", "Native:".bright_cyan(), native_amount);

    let client = ChainClient::new(config);

    let allowance = crate::msg::execute(
        &sender.address,
        token,
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: pair.to_string(),
            amount: token_amount,
        },
        &[],
    )?;

    let provide = crate::msg::execute(
        &sender.address,
        pair,
        &PairExecuteMsg::ProvideLiquidity {
            assets: [
                Asset {
                    info: AssetInfo::Token {
                        contract_addr: token.to_string(),
                    },
                    amount: token_amount,
                },
                Asset {
                    info: AssetInfo::NativeToken {
                        denom: "uusd".to_string(),
                    },
                    amount: native_amount,
                },
            ],
            slippage_tolerance: None,
        },
        &[Coin::new(native_amount, "uusd")],
    )?;

    let result = client.broadcast(sender, vec![allowance, provide]).await?;

    println!("{} {}", "Provided:".bright_green(), result.txhash);
    Ok(result)
}

/// Sell `offer_amount` of the token into the pair via a CW20 `send` with
/// an embedded swap hook.
pub async fn swap(
    config: &NetworkConfig,
    sender: &TestAccount,
    pair: &str,
    token: &str,
    offer_amount: Uint128,
    max_spread: Option<Decimal>,
) -> Result<TxResult> {
    println!("{}", "=== Swap ===".bright_green().bold());
    println!("{} {}", "Sender:".bright_cyan(), sender.address);
    println!("{} {} uMIR", "Offer:".bright_cyan(), offer_amount);
    if let Some(spread) = max_spread {
        println!("{} {}", "Max spread:".bright_cyan(), spread);
    }

    let client = ChainClient::new(config);

    let hook = PairHookMsg::Swap {
        belief_price: None,
        max_spread,
        to: None,
    };

    let result = client
        .execute(
            sender,
            token,
            &Cw20ExecuteMsg::Send {
                contract: pair.to_string(),
                amount: offer_amount,
                msg: to_json_binary(&hook)?,
            },
            &[],
        )
        .await?;

    println!("{} {}", "Swapped:".bright_green(), result.txhash);
    Ok(result)
}

/// Print the pool's reserves
pub async fn show_status(config: &NetworkConfig, pair: &str, token: &str) -> Result<()> {
    println!("{}", "=== Pair Status ===".bright_green().bold());
    println!("{} {}", "Pair:".bright_cyan(), pair);

    let client = ChainClient::new(config);
    let pool_token = client.query_token_balance(token, pair).await?;
    let pool_native = client.query_native_balance(pair, "uusd").await?;

    println!("{} {}", "Pool uMIR:".bright_cyan(), pool_token);
    println!("{} {}", "Pool uusd:".bright_cyan(), pool_native);
    Ok(())
}
