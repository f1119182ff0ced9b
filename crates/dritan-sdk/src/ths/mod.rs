/*
[INPUT]:  Wallet addresses, token mints and THS query flags
[OUTPUT]: Trading-health scores from the analytics service
[POS]:    THS layer - secondary, unauthenticated analytics client
[UPDATE]: When the analytics service adds endpoints
*/

pub mod client;

pub use client::{DEFAULT_THS_BASE_URL, ThsClient, ThsConfig};
