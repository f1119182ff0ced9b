/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// DEX integrations with a dedicated pool-update stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnownDexStream {
    PumpAmm,
    PumpFun,
    Moonit,
    LaunchLab,
    Amm,
    Cpmm,
    Clmm,
    Orca,
    Dlmm,
    Damm2,
    Damm1,
    Dbc,
}

impl KnownDexStream {
    pub const ALL: [KnownDexStream; 12] = [
        KnownDexStream::PumpAmm,
        KnownDexStream::PumpFun,
        KnownDexStream::Moonit,
        KnownDexStream::LaunchLab,
        KnownDexStream::Amm,
        KnownDexStream::Cpmm,
        KnownDexStream::Clmm,
        KnownDexStream::Orca,
        KnownDexStream::Dlmm,
        KnownDexStream::Damm2,
        KnownDexStream::Damm1,
        KnownDexStream::Dbc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KnownDexStream::PumpAmm => "pumpamm",
            KnownDexStream::PumpFun => "pumpfun",
            KnownDexStream::Moonit => "moonit",
            KnownDexStream::LaunchLab => "launchlab",
            KnownDexStream::Amm => "amm",
            KnownDexStream::Cpmm => "cpmm",
            KnownDexStream::Clmm => "clmm",
            KnownDexStream::Orca => "orca",
            KnownDexStream::Dlmm => "dlmm",
            KnownDexStream::Damm2 => "damm2",
            KnownDexStream::Damm1 => "damm1",
            KnownDexStream::Dbc => "dbc",
        }
    }
}

impl AsRef<str> for KnownDexStream {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for KnownDexStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KnownDexStream {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        KnownDexStream::ALL
            .into_iter()
            .find(|dex| dex.as_str() == needle)
            .ok_or_else(|| format!("unknown dex stream: {s}"))
    }
}

/// Control commands accepted by the wallet stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletStreamMethod {
    SubscribeWallets,
    UnsubscribeWallets,
    ListSubscriptions,
}

/// Settlement chain of the x402 control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Solana,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    PaymentRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    SolanaTransfer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dex_stream_names() {
        assert_eq!(KnownDexStream::PumpAmm.as_str(), "pumpamm");
        assert_eq!(
            serde_json::to_string(&KnownDexStream::LaunchLab).unwrap(),
            r#""launchlab""#
        );
        assert_eq!("DAMM2".parse::<KnownDexStream>(), Ok(KnownDexStream::Damm2));
        assert!("raydium".parse::<KnownDexStream>().is_err());
    }

    #[test]
    fn test_wallet_stream_method_wire_names() {
        assert_eq!(
            serde_json::to_string(&WalletStreamMethod::SubscribeWallets).unwrap(),
            r#""subscribeWallets""#
        );
        assert_eq!(
            serde_json::to_string(&WalletStreamMethod::ListSubscriptions).unwrap(),
            r#""listSubscriptions""#
        );
    }

    #[test]
    fn test_control_plane_enums() {
        assert_eq!(
            serde_json::from_str::<QuoteStatus>(r#""payment_required""#).unwrap(),
            QuoteStatus::PaymentRequired
        );
        assert_eq!(
            serde_json::from_str::<PaymentMethod>(r#""solana_transfer""#).unwrap(),
            PaymentMethod::SolanaTransfer
        );
    }
}
