/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs nested inside API responses
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Unrecognized fields carried alongside the typed ones
pub type ExtraFields = Map<String, Value>;

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl TokenSearchResult {
    /// Mint address, whichever field the server filled
    pub fn address(&self) -> Option<&str> {
        self.mint.as_deref().or(self.token_address.as_deref())
    }
}

/// Holder cluster in a risk report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskGroup {
    pub count: u64,
    pub total_percentage: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcvBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Per-token PnL statistics; the server does not publish a fixed schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletPnlTokenStats {
    #[serde(flatten)]
    pub fields: ExtraFields,
}

impl WalletPnlTokenStats {
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTradeToken {
    pub token_address: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub amount: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTrade {
    pub tx: String,
    pub wallet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<WalletTradeToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<WalletTradeToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub trade_type: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTokenInfo {
    pub name: String,
    pub symbol: String,
    pub mint: String,
    pub decimals: u32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTokenPosition {
    pub token: WalletTokenInfo,
    pub balance: f64,
    pub value: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBuildFees {
    pub platform_fee_bps: u32,
    pub platform_fee_lamports: u64,
    pub user_fee_bps: u32,
    pub user_fee_lamports: u64,
    pub tip_lamports: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Per-key throughput limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyLimits {
    pub max_rps: u32,
    pub max_connections: u32,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402Payment {
    pub quote_id: String,
    pub tx_signature: String,
    pub payer_wallet: String,
    pub receiver_wallet: String,
    pub amount_lamports_credited: u64,
    pub amount_sol_credited: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct X402Tenant {
    pub id: String,
    pub name: String,
    pub limits: KeyLimits,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThsTotals {
    pub buys: u64,
    pub sells: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_result_keeps_unknown_fields() {
        let result: TokenSearchResult = serde_json::from_value(json!({
            "tokenAddress": "MintA",
            "symbol": "AAA",
            "logo": "https://img"
        }))
        .unwrap();

        assert_eq!(result.address(), Some("MintA"));
        assert_eq!(result.extra.get("logo"), Some(&json!("https://img")));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"tokenAddress": "MintA", "symbol": "AAA", "logo": "https://img"})
        );
    }

    #[test]
    fn test_wallet_trade_type_field() {
        let trade: WalletTrade = serde_json::from_value(json!({
            "tx": "sig",
            "wallet": "W1",
            "type": "buy",
            "time": 1_700_000_000
        }))
        .unwrap();

        assert_eq!(trade.trade_type.as_deref(), Some("buy"));
        assert!(trade.from.is_none());
        assert!(trade.extra.is_empty());
    }

    #[test]
    fn test_nested_records_keep_unknown_fields() {
        let bar: OhlcvBar = serde_json::from_value(json!({
            "time": 1, "open": 1.5, "high": 2.5, "low": 0.5, "close": 1.5, "volume": 3.5, "trades": 7
        }))
        .unwrap();
        assert_eq!(bar.extra.get("trades"), Some(&json!(7)));
        assert_eq!(serde_json::to_value(&bar).unwrap()["trades"], json!(7));

        let tenant: X402Tenant = serde_json::from_value(json!({
            "id": "t1",
            "name": "bot",
            "limits": {"maxRps": 10, "maxConnections": 2, "maxStreams": 4},
            "plan": "x402"
        }))
        .unwrap();
        assert_eq!(tenant.limits.extra.get("maxStreams"), Some(&json!(4)));
        assert_eq!(tenant.extra.get("plan"), Some(&json!("x402")));

        let totals: ThsTotals =
            serde_json::from_value(json!({"buys": 3, "sells": 1, "transfers": 2})).unwrap();
        assert_eq!(totals.extra.get("transfers"), Some(&json!(2)));
    }

    #[test]
    fn test_pnl_token_stats_accessor() {
        let stats: WalletPnlTokenStats =
            serde_json::from_value(json!({"realized": 1.5, "label": "x"})).unwrap();
        assert_eq!(stats.get_f64("realized"), Some(1.5));
        assert_eq!(stats.get_f64("label"), None);
    }
}
