/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed request bodies and query options with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};

use crate::http::QueryParams;

const SEARCH_LIMIT_MIN: u32 = 1;
const SEARCH_LIMIT_MAX: u32 = 50;

/// Paging for `search_tokens`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSearchOptions {
    /// Clamped to 1..=50
    pub limit: Option<u32>,
    /// Takes precedence over `page` when non-blank
    pub cursor: Option<String>,
    /// Clamped to >= 1
    pub page: Option<u32>,
}

impl TokenSearchOptions {
    pub fn to_query(&self, query: &str) -> QueryParams {
        let mut params = QueryParams::new();
        params.set("query", query);
        params.set_opt(
            "limit",
            self.limit
                .map(|limit| limit.clamp(SEARCH_LIMIT_MIN, SEARCH_LIMIT_MAX)),
        );

        let cursor = self
            .cursor
            .as_deref()
            .map(str::trim)
            .filter(|cursor| !cursor.is_empty());
        match cursor {
            Some(cursor) => {
                params.set("cursor", cursor);
            }
            None => {
                params.set_opt("page", self.page.map(|page| page.max(1)));
            }
        }
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletPerformanceOptions {
    pub show_historic_pnl: Option<bool>,
    pub holding_check: Option<bool>,
    pub hide_details: Option<bool>,
}

impl WalletPerformanceOptions {
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .set_opt("showHistoricPnL", self.show_historic_pnl)
            .set_opt("holdingCheck", self.holding_check)
            .set_opt("hideDetails", self.hide_details);
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortfolioChartOptions {
    pub days: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeHistoryOptions {
    /// Opaque cursor from a previous page's `next_cursor`
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OhlcvOptions {
    /// Upper bound (unix seconds) of the returned bars
    pub time_to: Option<i64>,
}

/// Swap input amount; the server accepts either a JSON number or a string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SwapAmount {
    Raw(u64),
    Text(String),
}

impl From<u64> for SwapAmount {
    fn from(value: u64) -> Self {
        SwapAmount::Raw(value)
    }
}

impl From<&str> for SwapAmount {
    fn from(value: &str) -> Self {
        SwapAmount::Text(value.to_string())
    }
}

impl From<String> for SwapAmount {
    fn from(value: String) -> Self {
        SwapAmount::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBuildRequest {
    pub user_public_key: String,
    pub input_mint: String,
    pub output_mint: String,
    pub amount: SwapAmount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swap_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_bps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_percent: Option<f64>,
}

impl SwapBuildRequest {
    pub fn new(
        user_public_key: impl Into<String>,
        input_mint: impl Into<String>,
        output_mint: impl Into<String>,
        amount: impl Into<SwapAmount>,
    ) -> Self {
        Self {
            user_public_key: user_public_key.into(),
            input_mint: input_mint.into(),
            output_mint: output_mint.into(),
            amount: amount.into(),
            slippage_bps: None,
            swap_type: None,
            fee_wallet: None,
            fee_bps: None,
            fee_percent: None,
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapBroadcastRequest {
    pub signed_transaction_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ApiKeyQuoteRequest {
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_wallet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct X402ApiKeyCreateRequest {
    pub quote_id: String,
    pub payment_tx_signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_wallet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

/// Flags shared by the THS score endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThsOptions {
    pub debug: bool,
    pub breakdown: bool,
}

impl ThsOptions {
    /// Append `debug=1` / `breakdown=1` for enabled flags
    pub fn apply(&self, params: &mut QueryParams) {
        if self.debug {
            params.set("debug", 1);
        }
        if self.breakdown {
            params.set("breakdown", 1);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopWalletsOptions {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThsTokensRequest {
    pub token_mints: Vec<String>,
}
