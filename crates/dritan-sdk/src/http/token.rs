/*
[INPUT]:  Mint addresses, search queries and timeframe parameters
[OUTPUT]: Token market data (search, price, metadata, risk, buyers, OHLCV)
[POS]:    HTTP layer - token endpoints (require x-api-key)
[UPDATE]: When adding new token endpoints or changing response format
*/

use crate::http::endpoint::{Endpoint, Service};
use crate::http::request::{QueryParams, require_non_empty};
use crate::http::{DritanClient, DritanError, Result};
use crate::types::{
    OhlcvOptions, TokenAggregatedResponse, TokenDeployerStatsResponse, TokenFirstBuyersResponse,
    TokenMetadataResponse, TokenOhlcvResponse, TokenPriceResponse, TokenRiskResponse,
    TokenSearchOptions, TokenSearchResponse,
};

impl DritanClient {
    /// Search tokens by name, symbol or address
    ///
    /// GET /token/search?query={query}&limit={limit}&cursor={cursor}|page={page}
    pub async fn search_tokens(
        &self,
        query: &str,
        options: &TokenSearchOptions,
    ) -> Result<TokenSearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DritanError::Validation("query is required".to_string()));
        }

        let request = self
            .request(Endpoint::TokenSearch, &[])?
            .query(&options.to_query(query));
        self.send_json(Service::Primary, request).await
    }

    /// GET /token/price/{mint}
    pub async fn get_token_price(&self, mint: &str) -> Result<TokenPriceResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenPrice, &[mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// GET /token/metadata/{mint}
    pub async fn get_token_metadata(&self, mint: &str) -> Result<TokenMetadataResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenMetadata, &[mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// Bundler / insider / sniper holdings for a token
    ///
    /// GET /token/risk/{mint}
    pub async fn get_token_risk(&self, mint: &str) -> Result<TokenRiskResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenRisk, &[mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// GET /token/first-buyers/{mint}
    pub async fn get_first_buyers(&self, mint: &str) -> Result<TokenFirstBuyersResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenFirstBuyers, &[mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// Price, metadata, risk and bonding-curve progress in one call
    ///
    /// GET /token/aggregated/{mint}
    pub async fn get_token_aggregated(&self, mint: &str) -> Result<TokenAggregatedResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenAggregated, &[mint])?;
        let mut response: TokenAggregatedResponse =
            self.send_json(Service::Primary, request).await?;
        if response.mint.is_empty() {
            response.mint = mint.to_string();
        }
        Ok(response)
    }

    /// GET /token/deployer-stats/{mint}
    pub async fn get_deployer_stats(&self, mint: &str) -> Result<TokenDeployerStatsResponse> {
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::TokenDeployerStats, &[mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// OHLCV bars for a token
    ///
    /// GET /token/ohlcv/{mint}/{timeframe}?time_to={time_to}
    pub async fn get_token_ohlcv(
        &self,
        mint: &str,
        timeframe: &str,
        options: &OhlcvOptions,
    ) -> Result<TokenOhlcvResponse> {
        let mint = require_non_empty("mint", mint)?;
        let timeframe = require_non_empty("timeframe", timeframe)?;

        let mut params = QueryParams::new();
        params.set_opt("time_to", options.time_to);

        let request = self
            .request(Endpoint::TokenOhlcv, &[mint, timeframe])?
            .query(&params);
        self.send_json(Service::Primary, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, DritanClient, DritanError};
    use crate::types::{ExtraFields, OhlcvBar, OhlcvOptions, TokenSearchOptions};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> DritanClient {
        DritanClient::with_config_and_base_urls(
            ClientConfig::new("test-key"),
            &server.uri(),
            &server.uri(),
        )
        .expect("client init")
    }

    #[tokio::test]
    async fn test_search_tokens() {
        let server = MockServer::start().await;
        let mock_response = r#"{
            "query": "bonk",
            "data": [{"mint": "DezX", "symbol": "BONK", "name": "Bonk", "verified": true}],
            "nextCursor": "next-1"
        }"#;

        let _mock = Mock::given(method("GET"))
            .and(path("/token/search"))
            .and(query_param("query", "bonk"))
            .and(query_param("limit", "50"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(mock_response, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        let options = TokenSearchOptions {
            limit: Some(80),
            ..Default::default()
        };
        let response = client_for(&server)
            .search_tokens("  bonk ", &options)
            .await
            .expect("search_tokens failed");

        assert_eq!(response.results().len(), 1);
        assert_eq!(response.results()[0].symbol.as_deref(), Some("BONK"));
        assert_eq!(
            response.results()[0].extra.get("verified"),
            Some(&serde_json::json!(true))
        );
        assert_eq!(response.next_page_cursor(), Some("next-1"));
    }

    #[tokio::test]
    async fn test_search_tokens_rejects_blank_query() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .search_tokens("   ", &TokenSearchOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid input: query is required");
    }

    #[tokio::test]
    async fn test_get_token_price() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/token/price/MintA"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "mint": "MintA",
                "dex": "pumpamm",
                "priceUsd": 0.0123,
                "marketCap": 1_230_000.0,
                "liquiditySol": null,
                "updatedAt": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let price = client_for(&server)
            .get_token_price("MintA")
            .await
            .expect("get_token_price failed");

        assert_eq!(price.mint, "MintA");
        assert_eq!(price.dex, "pumpamm");
        assert_eq!(price.market_cap, Some(1_230_000.0));
        assert_eq!(price.liquidity_sol, None);
        assert_eq!(
            price.extra.get("updatedAt"),
            Some(&serde_json::json!(1_700_000_000))
        );
    }

    #[tokio::test]
    async fn test_get_token_price_not_found() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/token/price/Missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_token_price("Missing")
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("404"), "{message}");
        assert!(message.contains("not found"), "{message}");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_token_aggregated_fills_missing_mint() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/token/aggregated/MintA"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "price": {
                    "mint": "MintA",
                    "dex": "pumpfun",
                    "priceUsd": 0.5,
                    "marketCap": 500_000.0,
                    "liquiditySol": 42.0
                },
                "bondingCurvePercent": 63.5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get_token_aggregated("MintA")
            .await
            .expect("get_token_aggregated failed");

        assert_eq!(response.mint, "MintA");
        assert_eq!(response.bonding_curve_percent, Some(63.5));
        assert!(response.metadata.is_none());
        assert!(response.risk.is_none());
    }

    #[tokio::test]
    async fn test_get_token_aggregated_fills_null_mint() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/token/aggregated/MintB"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "mint": null,
                "price": {"mint": "MintB", "dex": "orca", "priceUsd": 2.0},
                "metadata": null,
                "risk": null,
                "bondingCurvePercent": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get_token_aggregated("MintB")
            .await
            .expect("get_token_aggregated failed");

        assert_eq!(response.mint, "MintB");
        assert_eq!(response.price.price_usd, 2.0);
        assert!(response.bonding_curve_percent.is_none());
    }

    #[tokio::test]
    async fn test_get_token_ohlcv() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/token/ohlcv/MintA/1m"))
            .and(query_param("time_to", "1700000060"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "mint": "MintA",
                "timeframe": "1m",
                "bucketSizeSec": 60,
                "bondingPoolId": "PoolB",
                "graduatedPoolId": null,
                "closed": [
                    {"time": 1_700_000_000, "open": 1.0, "high": 1.5, "low": 0.9, "close": 1.2, "volume": 10.0, "trades": 7}
                ],
                "active": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client_for(&server)
            .get_token_ohlcv(
                "MintA",
                "1m",
                &OhlcvOptions {
                    time_to: Some(1_700_000_060),
                },
            )
            .await
            .expect("get_token_ohlcv failed");

        assert_eq!(response.bucket_size_sec, 60);
        let mut extra = ExtraFields::new();
        extra.insert("trades".to_string(), serde_json::json!(7));
        assert_eq!(
            response.closed,
            vec![OhlcvBar {
                time: 1_700_000_000,
                open: 1.0,
                high: 1.5,
                low: 0.9,
                close: 1.2,
                volume: 10.0,
                extra,
            }]
        );
        assert!(response.active.is_none());
    }

    #[tokio::test]
    async fn test_identifier_validation_happens_before_request() {
        let client = DritanClient::new("key").expect("client init");

        for err in [
            client.get_token_metadata("").await.unwrap_err(),
            client.get_token_risk(" ").await.unwrap_err(),
            client
                .get_token_ohlcv("MintA", "", &OhlcvOptions::default())
                .await
                .unwrap_err(),
        ] {
            assert!(matches!(err, DritanError::Validation(_)), "{err}");
        }
    }
}
