//! Contract message types and Cosmos proto-JSON envelope builders
//!
//! The CW20/pair types mirror the deployed contracts' schemas; the envelope
//! builders produce the `body.messages` entries `terrad tx sign` accepts.

use anyhow::Result;
use cosmwasm_std::{Binary, Coin, Decimal, Uint128};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// CW20 token instantiation
#[derive(Debug, Clone, Serialize)]
pub struct TokenInstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
    pub mint: Option<MinterResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cw20Coin {
    pub address: String,
    pub amount: Uint128,
}

#[derive(Debug, Clone, Serialize)]
pub struct MinterResponse {
    pub minter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<Uint128>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20ExecuteMsg {
    Mint {
        recipient: String,
        amount: Uint128,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
    },
    /// Transfer to a contract and trigger its receive hook with `msg`
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cw20QueryMsg {
    Balance { address: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub balance: Uint128,
}

/// Pair instantiation over a token/native asset pair
#[derive(Debug, Clone, Serialize)]
pub struct PairInstantiateMsg {
    pub asset_infos: [AssetInfo; 2],
    pub token_code_id: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetInfo {
    Token { contract_addr: String },
    NativeToken { denom: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub info: AssetInfo,
    pub amount: Uint128,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairExecuteMsg {
    ProvideLiquidity {
        assets: [Asset; 2],
        #[serde(skip_serializing_if = "Option::is_none")]
        slippage_tolerance: Option<Decimal>,
    },
}

/// Hook carried base64-encoded inside a CW20 `send`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairHookMsg {
    Swap {
        #[serde(skip_serializing_if = "Option::is_none")]
        belief_price: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max_spread: Option<Decimal>,
        #[serde(skip_serializing_if = "Option::is_none")]
        to: Option<String>,
    },
}

/// `MsgStoreCode` envelope
pub fn store_code(sender: &str, wasm: &[u8]) -> Value {
    json!({
        "@type": "/cosmwasm.wasm.v1.MsgStoreCode",
        "sender": sender,
        "wasm_byte_code": Binary::from(wasm).to_base64(),
    })
}

/// `MsgInstantiateContract` envelope
pub fn instantiate<T: Serialize>(
    sender: &str,
    admin: Option<&str>,
    code_id: u64,
    label: &str,
    msg: &T,
    funds: &[Coin],
) -> Result<Value> {
    Ok(json!({
        "@type": "/cosmwasm.wasm.v1.MsgInstantiateContract",
        "sender": sender,
        "admin": admin.unwrap_or(""),
        "code_id": code_id.to_string(),
        "label": label,
        "msg": serde_json::to_value(msg)?,
        "funds": coins_json(funds),
    }))
}

/// `MsgExecuteContract` envelope
pub fn execute<T: Serialize>(
    sender: &str,
    contract: &str,
    msg: &T,
    funds: &[Coin],
) -> Result<Value> {
    Ok(json!({
        "@type": "/cosmwasm.wasm.v1.MsgExecuteContract",
        "sender": sender,
        "contract": contract,
        "msg": serde_json::to_value(msg)?,
        "funds": coins_json(funds),
    }))
}

fn coins_json(funds: &[Coin]) -> Value {
    Value::Array(
        funds
            .iter()
            .map(|c| json!({ "denom": c.denom, "amount": c.amount.to_string() }))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmwasm_std::to_json_binary;

    #[test]
    fn execute_msgs_serialize_snake_case() {
        let msg = Cw20ExecuteMsg::Mint {
            recipient: "terra1recipient".to_string(),
            amount: Uint128::new(10_000_000_000),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "mint": { "recipient": "terra1recipient", "amount": "10000000000" } })
        );

        let msg = Cw20ExecuteMsg::IncreaseAllowance {
            spender: "terra1pair".to_string(),
            amount: Uint128::new(100_000_000),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "increase_allowance": { "spender": "terra1pair", "amount": "100000000" } })
        );
    }

    #[test]
    fn provide_liquidity_matches_contract_schema() {
        let msg = PairExecuteMsg::ProvideLiquidity {
            assets: [
                Asset {
                    info: AssetInfo::Token {
                        contract_addr: "terra1token".to_string(),
                    },
                    amount: Uint128::new(69_000_000),
                },
                Asset {
                    info: AssetInfo::NativeToken {
                        denom: "uusd".to_string(),
                    },
                    amount: Uint128::new(420_000_000),
                },
            ],
            slippage_tolerance: None,
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "provide_liquidity": {
                    "assets": [
                        { "info": { "token": { "contract_addr": "terra1token" } }, "amount": "69000000" },
                        { "info": { "native_token": { "denom": "uusd" } }, "amount": "420000000" }
                    ]
                }
            })
        );
    }

    #[test]
    fn swap_hook_encodes_max_spread_as_decimal_string() {
        let hook = PairHookMsg::Swap {
            belief_price: None,
            max_spread: Some(Decimal::percent(1)),
            to: None,
        };
        let bin = to_json_binary(&hook).unwrap();
        assert_eq!(
            serde_json::from_slice::<Value>(bin.as_slice()).unwrap(),
            json!({ "swap": { "max_spread": "0.01" } })
        );
    }

    #[test]
    fn envelopes_carry_proto_type_tags() {
        let msg = execute(
            "terra1sender",
            "terra1contract",
            &Cw20QueryMsg::Balance {
                address: "terra1sender".to_string(),
            },
            &[Coin::new(420_000_000u128, "uusd")],
        )
        .unwrap();
        assert_eq!(msg["@type"], "/cosmwasm.wasm.v1.MsgExecuteContract");
        assert_eq!(msg["funds"][0]["amount"], "420000000");

        let msg = instantiate("terra1sender", None, 1, "token", &json!({}), &[]).unwrap();
        assert_eq!(msg["@type"], "/cosmwasm.wasm.v1.MsgInstantiateContract");
        assert_eq!(msg["code_id"], "1");

        let msg = store_code("terra1sender", b"\x00asm");
        assert_eq!(msg["@type"], "/cosmwasm.wasm.v1.MsgStoreCode");
    }
}
