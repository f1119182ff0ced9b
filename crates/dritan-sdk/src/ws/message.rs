/*
[INPUT]:  Decoded JSON stream payloads
[OUTPUT]: Typed DEX pool updates, wallet events and wallet-stream commands
[POS]:    WebSocket layer - message shapes
[UPDATE]: When adding new message types or changing format
*/

use serde::{Deserialize, Serialize};

use crate::types::{ExtraFields, WalletStreamMethod};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamLiquidity {
    pub base_pooled: Option<f64>,
    pub quote_pooled: Option<f64>,
    pub total_liquidity_solana: Option<f64>,
    pub total_liquidity_usdc: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMintPair {
    pub base: String,
    pub quote: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDecimals {
    pub base: Option<u8>,
    pub quote: Option<u8>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamReserves {
    pub base: Option<f64>,
    pub quote: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Pool state update pushed by a DEX stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexStreamPoolPayload {
    pub pool_id: String,
    pub mints: StreamMintPair,
    pub decimals: StreamDecimals,
    pub market_cap: Option<f64>,
    pub price_per_coin: Option<f64>,
    pub liquidity: StreamLiquidity,
    pub price_per_coin_usd: Option<f64>,
    pub token_supply: Option<f64>,
    pub reserves: StreamReserves,
    pub slot: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Bonding-curve progress, launchpad pools only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DexStreamEnvelope {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<DexStreamPoolPayload>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletStreamTokenDelta {
    pub address: String,
    pub amount: f64,
    pub decimals: u8,
    /// Raw integer amount, kept as text to avoid precision loss
    pub raw: String,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletStreamSide {
    pub address: String,
    pub amount: f64,
    pub token: WalletStreamTokenDelta,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletStreamVolume {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol: Option<f64>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletStreamSolBalance {
    pub pre: f64,
    pub post: f64,
    pub delta: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStreamTokenBalance {
    pub mint: String,
    pub token_account: String,
    pub pre: f64,
    pub post: f64,
    pub delta: f64,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletStreamBalances {
    pub sol: WalletStreamSolBalance,
    pub tokens: Vec<WalletStreamTokenBalance>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Trade or transfer observed on a subscribed wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStreamData {
    pub tx: String,
    pub wallet: String,
    pub time: i64,
    pub slot: u64,
    #[serde(rename = "type")]
    pub event_type: String,
    pub sol_delta: f64,
    pub fee_sol: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<WalletStreamSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<WalletStreamSide>,
    pub token_deltas: Vec<WalletStreamTokenDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<WalletStreamVolume>,
    pub balances: WalletStreamBalances,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Any message on the wallet stream: events, subscription acks, errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStreamEnvelope {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<WalletStreamData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_wallets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit_hit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_wallets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStreamCommand {
    pub method: WalletStreamMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallets: Option<Vec<String>>,
}

impl WalletStreamCommand {
    pub fn subscribe(wallets: Vec<String>) -> Self {
        Self {
            method: WalletStreamMethod::SubscribeWallets,
            wallets: Some(wallets),
        }
    }

    pub fn unsubscribe(wallets: Vec<String>) -> Self {
        Self {
            method: WalletStreamMethod::UnsubscribeWallets,
            wallets: Some(wallets),
        }
    }

    pub fn list_subscriptions() -> Self {
        Self {
            method: WalletStreamMethod::ListSubscriptions,
            wallets: None,
        }
    }
}
