/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{Chain, PaymentMethod, QuoteStatus};
use super::models::{
    ExtraFields, KeyLimits, OhlcvBar, RiskGroup, SwapBuildFees, ThsTotals, TokenSearchResult,
    WalletPnlTokenStats, WalletTokenPosition, WalletTrade, X402Payment, X402Tenant,
    null_as_default,
};
use crate::http::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSearchResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TokenSearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<TokenSearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<TokenSearchResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl TokenSearchResponse {
    /// Result list, whichever key the server used
    pub fn results(&self) -> &[TokenSearchResult] {
        self.data
            .as_deref()
            .or(self.tokens.as_deref())
            .or(self.results.as_deref())
            .unwrap_or_default()
    }

    /// Cursor for the next page, if any
    pub fn next_page_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().or(self.cursor.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPriceResponse {
    pub mint: String,
    pub dex: String,
    pub price_usd: f64,
    pub market_cap: Option<f64>,
    pub liquidity_sol: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadataResponse {
    pub mint: String,
    pub program_id: String,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u32,
    /// Raw supply in base units, kept as a string to avoid precision loss
    pub supply: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRiskResponse {
    pub mint: String,
    pub global_fees_paid: f64,
    pub bundlers: RiskGroup,
    pub insiders: RiskGroup,
    pub snipers: RiskGroup,
    pub top10: f64,
    pub dev_percentage: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenFirstBuyersResponse {
    pub mint: String,
    #[serde(default)]
    pub buyers: Value,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAggregatedResponse {
    /// Filled with the requested mint when the server omits it or sends null
    #[serde(default, deserialize_with = "null_as_default")]
    pub mint: String,
    pub price: TokenPriceResponse,
    #[serde(default)]
    pub metadata: Option<TokenMetadataResponse>,
    #[serde(default)]
    pub risk: Option<TokenRiskResponse>,
    #[serde(default)]
    pub bonding_curve_percent: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDeployerStatsResponse {
    pub mint: String,
    pub deployer: String,
    pub total: u64,
    pub deployed: u64,
    pub bonded: u64,
    pub non_bonded: u64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenOhlcvResponse {
    pub mint: String,
    pub timeframe: String,
    pub bucket_size_sec: u64,
    pub bonding_pool_id: Option<String>,
    pub graduated_pool_id: Option<String>,
    pub closed: Vec<OhlcvBar>,
    /// Bar still being built for the current bucket
    pub active: Option<OhlcvBar>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletPnlResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<BTreeMap<String, WalletPnlTokenStats>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ExtraFields>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPortfolioChartResponse {
    pub wallet: String,
    pub total: f64,
    pub total_invested: f64,
    pub total_wins: f64,
    pub total_losses: f64,
    pub win_percentage: f64,
    /// Portfolio value keyed by date label
    pub history: BTreeMap<String, f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicWalletInformationResponse {
    pub wallet: String,
    pub total_sol: f64,
    pub total_token_value: f64,
    pub total_value: f64,
    pub holdings: u64,
    pub total_holding_value: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTradesResponse {
    pub trades: Vec<WalletTrade>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletHoldingsResponse {
    pub wallet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sol: Option<f64>,
    pub tokens: Vec<WalletTokenPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBuildResponse {
    /// Unsigned transaction, base64 encoded
    pub transaction_base64: String,
    pub fees: SwapBuildFees,
    #[serde(default)]
    pub quote: Value,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl SwapBuildResponse {
    /// Decode the unsigned transaction for signing
    pub fn transaction_bytes(&self) -> Result<Vec<u8>> {
        Ok(BASE64.decode(self.transaction_base64.trim())?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapBroadcastResponse {
    pub signature: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402PricingResponse {
    pub chain: Chain,
    pub rate_sol_per_minute: f64,
    pub rate_lamports_per_minute: u64,
    pub receiver_wallet: Option<String>,
    pub quote_ttl_seconds: u64,
    pub key_limits: KeyLimits,
    pub formula: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ApiKeyQuoteResponse {
    pub status: QuoteStatus,
    pub quote_id: String,
    pub receiver_wallet: String,
    pub duration_minutes: u32,
    pub amount_lamports: u64,
    pub amount_sol: f64,
    pub rate_sol_per_minute: f64,
    pub expires_at: String,
    pub chain: Chain,
    pub payment_method: PaymentMethod,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl X402ApiKeyQuoteResponse {
    /// Quote expiry, when the server sent an RFC 3339 timestamp
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ApiKeyCreateResponse {
    pub ok: bool,
    pub api_key_id: String,
    pub api_key: String,
    pub key_prefix: String,
    pub expires_at: String,
    pub duration_minutes: u32,
    pub payment: X402Payment,
    pub tenant: X402Tenant,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl X402ApiKeyCreateResponse {
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires_at)
    }
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// Control-plane payload that failed to match its typed shape is kept as JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LenientPayload<T> {
    Typed(T),
    /// Shape mismatch, or `{"raw": <text>}` for non-JSON bodies
    Untyped(Value),
}

impl<T: DeserializeOwned> LenientPayload<T> {
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<T>(value.clone()) {
            Ok(typed) => LenientPayload::Typed(typed),
            Err(_) => LenientPayload::Untyped(value),
        }
    }
}

impl<T> LenientPayload<T> {
    pub fn typed(&self) -> Option<&T> {
        match self {
            LenientPayload::Typed(typed) => Some(typed),
            LenientPayload::Untyped(_) => None,
        }
    }

    pub fn into_typed(self) -> Option<T> {
        match self {
            LenientPayload::Typed(typed) => Some(typed),
            LenientPayload::Untyped(_) => None,
        }
    }

    pub fn is_typed(&self) -> bool {
        matches!(self, LenientPayload::Typed(_))
    }

    /// Raw body text when the server did not answer with JSON
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            LenientPayload::Untyped(value) => value.get("raw").and_then(Value::as_str),
            LenientPayload::Typed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThsResponse {
    pub wallet: String,
    pub score: f64,
    #[serde(rename = "realizedPnLUsd")]
    pub realized_pnl_usd: f64,
    #[serde(rename = "realizedPnLWeightedUsd")]
    pub realized_pnl_weighted_usd: f64,
    pub totals: ThsTotals,
    #[serde(rename = "analyzedTxns")]
    pub analyzed_txns: u64,
    #[serde(rename = "matchedTxCount")]
    pub matched_tx_count: u64,
    #[serde(rename = "unmatchedTxCount")]
    pub unmatched_tx_count: u64,
    #[serde(rename = "avgHoldTimeDays")]
    pub avg_hold_time_days: f64,
    #[serde(rename = "avgHoldTimeHours")]
    pub avg_hold_time_hours: f64,
    #[serde(rename = "avgHoldTimeMinutes")]
    pub avg_hold_time_minutes: f64,
    #[serde(rename = "avgHoldTimeSeconds")]
    pub avg_hold_time_seconds: f64,
    #[serde(rename = "avgHoldTimePretty")]
    pub avg_hold_time_pretty: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThsTopWalletsEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub score: ThsResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThsTopWalletsResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_more: bool,
    pub data: Vec<ThsTopWalletsEntry>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_result_list_aliases() {
        let response: TokenSearchResponse = serde_json::from_value(json!({
            "tokens": [{"mint": "A"}],
            "nextCursor": "c2"
        }))
        .unwrap();

        assert_eq!(response.results().len(), 1);
        assert_eq!(response.results()[0].address(), Some("A"));
        assert_eq!(response.next_page_cursor(), Some("c2"));
        assert!(TokenSearchResponse::default().results().is_empty());
    }

    #[test]
    fn test_aggregated_defaults_for_missing_sections() {
        let response: TokenAggregatedResponse = serde_json::from_value(json!({
            "price": {
                "mint": "A",
                "dex": "pumpfun",
                "priceUsd": 0.5,
                "marketCap": null,
                "liquiditySol": 12.0
            }
        }))
        .unwrap();

        assert_eq!(response.mint, "");
        assert!(response.metadata.is_none());
        assert!(response.risk.is_none());
        assert!(response.bonding_curve_percent.is_none());
        assert_eq!(response.price.market_cap, None);
    }

    #[test]
    fn test_aggregated_null_mint_and_sections() {
        let response: TokenAggregatedResponse = serde_json::from_value(json!({
            "mint": null,
            "price": {"mint": "A", "dex": "pumpfun", "priceUsd": 0.5},
            "metadata": null,
            "risk": null,
            "bondingCurvePercent": null
        }))
        .unwrap();

        assert_eq!(response.mint, "");
        assert!(response.metadata.is_none());
        assert!(response.risk.is_none());
        assert!(response.bonding_curve_percent.is_none());
    }

    #[test]
    fn test_swap_transaction_bytes() {
        let response: SwapBuildResponse = serde_json::from_value(json!({
            "transactionBase64": "AQID",
            "fees": {
                "platformFeeBps": 10,
                "platformFeeLamports": 1000,
                "userFeeBps": 0,
                "userFeeLamports": 0,
                "tipLamports": 5000,
                "jitoTipLamports": 1000
            },
            "quote": {"outAmount": "42"}
        }))
        .unwrap();

        assert_eq!(response.transaction_bytes().unwrap(), vec![1, 2, 3]);
        assert_eq!(response.fees.tip_lamports, 5000);
        assert_eq!(
            response.fees.extra.get("jitoTipLamports"),
            Some(&json!(1000))
        );
        let reencoded = serde_json::to_value(&response).unwrap();
        assert_eq!(reencoded["fees"]["jitoTipLamports"], json!(1000));
    }

    #[test]
    fn test_lenient_payload() {
        let payload: LenientPayload<SwapBroadcastResponse> =
            LenientPayload::from_value(json!({"signature": "sig"}));
        assert_eq!(payload.typed().map(|r| r.signature.as_str()), Some("sig"));

        let payload: LenientPayload<SwapBroadcastResponse> =
            LenientPayload::from_value(json!({"raw": "Bad Gateway"}));
        assert!(!payload.is_typed());
        assert_eq!(payload.raw_text(), Some("Bad Gateway"));
        assert!(payload.into_typed().is_none());
    }

    #[test]
    fn test_quote_expiry_parsing() {
        let quote: X402ApiKeyQuoteResponse = serde_json::from_value(json!({
            "status": "payment_required",
            "quoteId": "q1",
            "receiverWallet": "R",
            "durationMinutes": 60,
            "amountLamports": 1000,
            "amountSol": 0.000001,
            "rateSolPerMinute": 0.0000001,
            "expiresAt": "2026-01-01T00:05:00Z",
            "chain": "solana",
            "paymentMethod": "solana_transfer"
        }))
        .unwrap();

        let expires = quote.expires_at_utc().unwrap();
        assert_eq!(expires.to_rfc3339(), "2026-01-01T00:05:00+00:00");
    }

    #[test]
    fn test_top_wallets_entry_flattens_score() {
        let entry: ThsTopWalletsEntry = serde_json::from_value(json!({
            "rank": 1,
            "wallet": "W1",
            "score": 87.5,
            "realizedPnLUsd": 1200.0,
            "realizedPnLWeightedUsd": 900.0,
            "totals": {"buys": 10, "sells": 8},
            "analyzedTxns": 18,
            "matchedTxCount": 16,
            "unmatchedTxCount": 2,
            "avgHoldTimeDays": 0.5,
            "avgHoldTimeHours": 12.0,
            "avgHoldTimeMinutes": 720.0,
            "avgHoldTimeSeconds": 43200.0,
            "avgHoldTimePretty": "12h"
        }))
        .unwrap();

        assert_eq!(entry.rank, 1);
        assert_eq!(entry.score.wallet, "W1");
        assert_eq!(entry.score.totals.sells, 8);
        assert!(entry.score.extra.is_empty());
    }
}
