/*
[INPUT]:  Wallet addresses, optional mint and paging options
[OUTPUT]: Wallet analytics (PnL, portfolio chart, summary, trades, holdings)
[POS]:    HTTP layer - wallet endpoints (require x-api-key)
[UPDATE]: When adding new wallet endpoints or changing response format
*/

use crate::http::endpoint::{Endpoint, Service};
use crate::http::request::{QueryParams, require_non_empty};
use crate::http::{DritanClient, Result};
use crate::types::{
    BasicWalletInformationResponse, PortfolioChartOptions, TradeHistoryOptions,
    WalletHoldingsResponse, WalletPerformanceOptions, WalletPnlResponse, WalletPnlTokenStats,
    WalletPortfolioChartResponse, WalletTradesResponse,
};

impl DritanClient {
    /// Aggregate PnL for a wallet
    ///
    /// GET /wallet/performance/{wallet}?showHistoricPnL=&holdingCheck=&hideDetails=
    pub async fn get_wallet_performance(
        &self,
        wallet: &str,
        options: &WalletPerformanceOptions,
    ) -> Result<WalletPnlResponse> {
        let wallet = require_non_empty("wallet", wallet)?;
        let request = self
            .request(Endpoint::WalletPerformance, &[wallet])?
            .query(&options.to_query());
        self.send_json(Service::Primary, request).await
    }

    /// GET /wallet/performance/{wallet}/{mint}
    pub async fn get_wallet_token_performance(
        &self,
        wallet: &str,
        mint: &str,
    ) -> Result<WalletPnlTokenStats> {
        let wallet = require_non_empty("wallet", wallet)?;
        let mint = require_non_empty("mint", mint)?;
        let request = self.request(Endpoint::WalletTokenPerformance, &[wallet, mint])?;
        self.send_json(Service::Primary, request).await
    }

    /// GET /wallet/portfolio-chart/{wallet}?days={days}
    pub async fn get_wallet_portfolio_chart(
        &self,
        wallet: &str,
        options: &PortfolioChartOptions,
    ) -> Result<WalletPortfolioChartResponse> {
        let wallet = require_non_empty("wallet", wallet)?;

        let mut params = QueryParams::new();
        params.set_opt("days", options.days);

        let request = self
            .request(Endpoint::WalletPortfolioChart, &[wallet])?
            .query(&params);
        self.send_json(Service::Primary, request).await
    }

    /// SOL balance, token value and holding count
    ///
    /// GET /wallet/summary/{wallet}
    pub async fn get_basic_wallet_information(
        &self,
        wallet: &str,
    ) -> Result<BasicWalletInformationResponse> {
        let wallet = require_non_empty("wallet", wallet)?;
        let request = self.request(Endpoint::WalletSummary, &[wallet])?;
        self.send_json(Service::Primary, request).await
    }

    /// Paginated trade history; pass the previous page's `next_cursor` to continue
    ///
    /// GET /wallet/trade-history/{wallet}?cursor={cursor}
    pub async fn get_wallet_trade_history(
        &self,
        wallet: &str,
        options: &TradeHistoryOptions,
    ) -> Result<WalletTradesResponse> {
        let wallet = require_non_empty("wallet", wallet)?;

        let mut params = QueryParams::new();
        params.set_opt(
            "cursor",
            options.cursor.as_deref().filter(|cursor| !cursor.is_empty()),
        );

        let request = self
            .request(Endpoint::WalletTradeHistory, &[wallet])?
            .query(&params);
        self.send_json(Service::Primary, request).await
    }

    /// GET /wallet/holdings/{wallet}
    pub async fn get_wallet_holdings(&self, wallet: &str) -> Result<WalletHoldingsResponse> {
        let wallet = require_non_empty("wallet", wallet)?;
        let request = self.request(Endpoint::WalletHoldings, &[wallet])?;
        self.send_json(Service::Primary, request).await
    }

    /// GET /wallet/holdings/{wallet}/page/{page}
    pub async fn get_wallet_holdings_page(
        &self,
        wallet: &str,
        page: u32,
    ) -> Result<WalletHoldingsResponse> {
        let wallet = require_non_empty("wallet", wallet)?;
        let page = page.to_string();
        let request = self.request(Endpoint::WalletHoldingsPage, &[wallet, &page])?;
        self.send_json(Service::Primary, request).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, DritanClient};
    use crate::types::{PortfolioChartOptions, TradeHistoryOptions, WalletPerformanceOptions};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn client_for(server: &MockServer) -> DritanClient {
        DritanClient::with_config_and_base_urls(
            ClientConfig::new("test-key"),
            &server.uri(),
            &server.uri(),
        )
        .expect("client init")
    }

    #[tokio::test]
    async fn test_get_wallet_performance_flags() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/wallet/performance/W1"))
            .and(query_param("showHistoricPnL", "true"))
            .and(query_param("hideDetails", "false"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tokens": {
                    "MintA": {"realized": 12.5, "unrealized": -3.0}
                },
                "summary": {"realized": 12.5},
                "pnl_since": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let options = WalletPerformanceOptions {
            show_historic_pnl: Some(true),
            holding_check: None,
            hide_details: Some(false),
        };
        let response = client_for(&server)
            .get_wallet_performance("W1", &options)
            .await
            .expect("get_wallet_performance failed");

        let tokens = response.tokens.expect("tokens present");
        assert_eq!(tokens["MintA"].get_f64("unrealized"), Some(-3.0));
        assert!(response.extra.contains_key("pnl_since"));
    }

    #[tokio::test]
    async fn test_get_wallet_portfolio_chart_days() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/wallet/portfolio-chart/W1"))
            .and(query_param("days", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wallet": "W1",
                "total": 100.0,
                "totalInvested": 80.0,
                "totalWins": 30.0,
                "totalLosses": 10.0,
                "winPercentage": 75.0,
                "history": {"2024-01-01": 90.0, "2024-01-02": 100.0}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let chart = client_for(&server)
            .get_wallet_portfolio_chart("W1", &PortfolioChartOptions { days: Some(7) })
            .await
            .expect("get_wallet_portfolio_chart failed");

        assert_eq!(chart.win_percentage, 75.0);
        assert_eq!(chart.history.len(), 2);
    }

    #[tokio::test]
    async fn test_trade_history_omits_empty_cursor() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/wallet/trade-history/W1"))
            .respond_with(|req: &Request| {
                assert!(
                    req.url.query().is_none(),
                    "unexpected query: {:?}",
                    req.url.query()
                );
                ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "trades": [],
                    "nextCursor": "c-2",
                    "hasNextPage": true
                }))
            })
            .expect(1)
            .mount(&server)
            .await;

        let options = TradeHistoryOptions {
            cursor: Some(String::new()),
        };
        let trades = client_for(&server)
            .get_wallet_trade_history("W1", &options)
            .await
            .expect("get_wallet_trade_history failed");

        assert!(trades.trades.is_empty());
        assert_eq!(trades.next_cursor.as_deref(), Some("c-2"));
        assert_eq!(trades.has_next_page, Some(true));
    }

    #[tokio::test]
    async fn test_get_wallet_holdings_page() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/wallet/holdings/W1/page/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wallet": "W1",
                "tokens": [{
                    "token": {"name": "Bonk", "symbol": "BONK", "mint": "MintB", "decimals": 5},
                    "balance": 1000.0,
                    "value": 2.5
                }],
                "hasNextPage": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let holdings = client_for(&server)
            .get_wallet_holdings_page("W1", 2)
            .await
            .expect("get_wallet_holdings_page failed");

        assert_eq!(holdings.tokens.len(), 1);
        assert_eq!(holdings.tokens[0].token.symbol, "BONK");
        assert_eq!(holdings.total_sol, None);
        assert_eq!(holdings.has_next_page, Some(false));
    }

    #[tokio::test]
    async fn test_wallet_path_is_percent_encoded() {
        let server = MockServer::start().await;
        let _mock = Mock::given(method("GET"))
            .and(path("/wallet/summary/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "wallet": "a/b",
                "totalSol": 1.0,
                "totalTokenValue": 2.0,
                "totalValue": 3.0,
                "holdings": 4,
                "totalHoldingValue": 2.0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let summary = client_for(&server)
            .get_basic_wallet_information("a/b")
            .await
            .expect("get_basic_wallet_information failed");
        assert_eq!(summary.holdings, 4);
    }
}
