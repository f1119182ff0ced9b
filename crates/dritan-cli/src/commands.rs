/*
[INPUT]:  Parsed subcommands, resolved CliConfig
[OUTPUT]: Pretty JSON on stdout, one line per stream message
[POS]:    Command layer - maps subcommands onto SDK calls
[UPDATE]: When adding SDK operations to the CLI
*/

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use dritan_sdk::{
    DritanClient, OhlcvOptions, PortfolioChartOptions, StreamOptions, StreamPayload, SwapAmount,
    SwapBuildRequest, ThsClient, ThsOptions, TokenSearchOptions, TopWalletsOptions,
    TradeHistoryOptions, WalletPerformanceOptions, WalletStreamOptions, X402ApiKeyCreateRequest,
    X402ApiKeyQuoteRequest,
};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::CliConfig;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Token search, pricing and analytics
    #[command(subcommand)]
    Token(TokenCommand),
    /// Wallet performance, holdings and trades
    #[command(subcommand)]
    Wallet(WalletCommand),
    /// Build and broadcast swaps
    #[command(subcommand)]
    Swap(SwapCommand),
    /// Pay-per-use API key purchase
    #[command(subcommand)]
    X402(X402Command),
    /// Meteora THS wallet scores
    #[command(subcommand)]
    Ths(ThsCommand),
    /// Live DEX and wallet streams (runs until Ctrl-C)
    #[command(subcommand)]
    Stream(StreamCommand),
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    Price {
        mint: String,
    },
    Metadata {
        mint: String,
    },
    Risk {
        mint: String,
    },
    FirstBuyers {
        mint: String,
    },
    Aggregated {
        mint: String,
    },
    DeployerStats {
        mint: String,
    },
    Ohlcv {
        mint: String,
        /// Bar size, e.g. 1m, 5m, 1h
        timeframe: String,
        /// Upper bound in unix seconds
        #[arg(long)]
        time_to: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum WalletCommand {
    Performance {
        wallet: String,
        #[arg(long)]
        show_historic_pnl: Option<bool>,
        #[arg(long)]
        holding_check: Option<bool>,
        #[arg(long)]
        hide_details: Option<bool>,
    },
    TokenPerformance {
        wallet: String,
        mint: String,
    },
    Chart {
        wallet: String,
        #[arg(long)]
        days: Option<u32>,
    },
    Summary {
        wallet: String,
    },
    Trades {
        wallet: String,
        #[arg(long)]
        cursor: Option<String>,
    },
    Holdings {
        wallet: String,
        #[arg(long)]
        page: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SwapCommand {
    Build(SwapBuildArgs),
    /// Broadcast a signed transaction
    Broadcast {
        /// Base64 encoded signed transaction
        #[arg(long, conflicts_with = "tx_file", required_unless_present = "tx_file")]
        tx: Option<String>,
        /// File holding the raw signed transaction bytes
        #[arg(long)]
        tx_file: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct SwapBuildArgs {
    #[arg(long)]
    pub user: String,
    #[arg(long)]
    pub input_mint: String,
    #[arg(long)]
    pub output_mint: String,
    /// Integer base units, or any string the server accepts
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub slippage_bps: Option<u32>,
    #[arg(long)]
    pub swap_type: Option<String>,
    #[arg(long)]
    pub fee_wallet: Option<String>,
    #[arg(long)]
    pub fee_bps: Option<u32>,
    #[arg(long)]
    pub fee_percent: Option<f64>,
}

impl SwapBuildArgs {
    pub fn to_request(&self) -> SwapBuildRequest {
        let amount = self
            .amount
            .trim()
            .parse::<u64>()
            .map(SwapAmount::Raw)
            .unwrap_or_else(|_| SwapAmount::Text(self.amount.clone()));

        let mut request =
            SwapBuildRequest::new(&self.user, &self.input_mint, &self.output_mint, amount);
        request.slippage_bps = self.slippage_bps;
        request.swap_type = self.swap_type.clone();
        request.fee_wallet = self.fee_wallet.clone();
        request.fee_bps = self.fee_bps;
        request.fee_percent = self.fee_percent;
        request
    }
}

#[derive(Subcommand, Debug)]
pub enum X402Command {
    Pricing,
    Quote {
        #[arg(long)]
        minutes: u32,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "scope")]
        scopes: Vec<String>,
        #[arg(long)]
        payer_wallet: Option<String>,
    },
    Create {
        #[arg(long)]
        quote_id: String,
        #[arg(long)]
        signature: String,
        #[arg(long)]
        payer_wallet: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "scope")]
        scopes: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThsCommand {
    Health,
    Score {
        wallet: String,
        /// Restrict the score to these mints (repeatable)
        #[arg(long = "token")]
        tokens: Vec<String>,
        /// Send the mint list as a POST body
        #[arg(long, requires = "tokens")]
        post: bool,
        #[arg(long)]
        debug: bool,
        #[arg(long)]
        breakdown: bool,
    },
    Top {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum StreamCommand {
    Dex {
        /// Stream name, e.g. pumpamm, orca, dbc
        name: String,
        /// Extra query parameter as key=value (repeatable)
        #[arg(long = "query", value_parser = parse_key_value)]
        query: Vec<(String, String)>,
    },
    Wallets {
        wallets: Vec<String>,
    },
}

pub fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

/// Dispatch a command and print its result
pub async fn run(command: Command, config: &CliConfig, shutdown: CancellationToken) -> Result<()> {
    match command {
        Command::Ths(command) => {
            let client = ThsClient::with_config(config.ths_config())?;
            print_json(&ths_command(command, &client).await?)
        }
        Command::Stream(command) => {
            let client = DritanClient::with_config(config.client_config(true)?)?;
            stream_command(command, &client, shutdown).await
        }
        Command::X402(command) => {
            // control plane is unauthenticated
            let client = DritanClient::with_config(config.client_config(false)?)?;
            print_json(&x402_command(command, &client).await?)
        }
        Command::Token(command) => {
            let client = DritanClient::with_config(config.client_config(true)?)?;
            print_json(&token_command(command, &client).await?)
        }
        Command::Wallet(command) => {
            let client = DritanClient::with_config(config.client_config(true)?)?;
            print_json(&wallet_command(command, &client).await?)
        }
        Command::Swap(command) => {
            let client = DritanClient::with_config(config.client_config(true)?)?;
            print_json(&swap_command(command, &client).await?)
        }
    }
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("serialize response")
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

pub async fn token_command(command: TokenCommand, client: &DritanClient) -> Result<Value> {
    match command {
        TokenCommand::Search {
            query,
            limit,
            cursor,
            page,
        } => {
            let options = TokenSearchOptions {
                limit,
                cursor,
                page,
            };
            to_json(client.search_tokens(&query, &options).await?)
        }
        TokenCommand::Price { mint } => to_json(client.get_token_price(&mint).await?),
        TokenCommand::Metadata { mint } => to_json(client.get_token_metadata(&mint).await?),
        TokenCommand::Risk { mint } => to_json(client.get_token_risk(&mint).await?),
        TokenCommand::FirstBuyers { mint } => to_json(client.get_first_buyers(&mint).await?),
        TokenCommand::Aggregated { mint } => to_json(client.get_token_aggregated(&mint).await?),
        TokenCommand::DeployerStats { mint } => to_json(client.get_deployer_stats(&mint).await?),
        TokenCommand::Ohlcv {
            mint,
            timeframe,
            time_to,
        } => {
            let options = OhlcvOptions { time_to };
            to_json(client.get_token_ohlcv(&mint, &timeframe, &options).await?)
        }
    }
}

pub async fn wallet_command(command: WalletCommand, client: &DritanClient) -> Result<Value> {
    match command {
        WalletCommand::Performance {
            wallet,
            show_historic_pnl,
            holding_check,
            hide_details,
        } => {
            let options = WalletPerformanceOptions {
                show_historic_pnl,
                holding_check,
                hide_details,
            };
            to_json(client.get_wallet_performance(&wallet, &options).await?)
        }
        WalletCommand::TokenPerformance { wallet, mint } => {
            to_json(client.get_wallet_token_performance(&wallet, &mint).await?)
        }
        WalletCommand::Chart { wallet, days } => {
            let options = PortfolioChartOptions { days };
            to_json(client.get_wallet_portfolio_chart(&wallet, &options).await?)
        }
        WalletCommand::Summary { wallet } => {
            to_json(client.get_basic_wallet_information(&wallet).await?)
        }
        WalletCommand::Trades { wallet, cursor } => {
            let options = TradeHistoryOptions { cursor };
            to_json(client.get_wallet_trade_history(&wallet, &options).await?)
        }
        WalletCommand::Holdings { wallet, page } => match page {
            Some(page) => to_json(client.get_wallet_holdings_page(&wallet, page).await?),
            None => to_json(client.get_wallet_holdings(&wallet).await?),
        },
    }
}

pub async fn swap_command(command: SwapCommand, client: &DritanClient) -> Result<Value> {
    match command {
        SwapCommand::Build(args) => to_json(client.build_swap(&args.to_request()).await?),
        SwapCommand::Broadcast { tx, tx_file } => match (tx, tx_file) {
            (Some(tx), _) => to_json(client.broadcast_swap(&tx).await?),
            (None, Some(path)) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("read transaction file {}", path.display()))?;
                to_json(client.broadcast_swap_bytes(&bytes).await?)
            }
            (None, None) => bail!("either --tx or --tx-file is required"),
        },
    }
}

pub async fn x402_command(command: X402Command, client: &DritanClient) -> Result<Value> {
    let non_empty = |scopes: Vec<String>| (!scopes.is_empty()).then_some(scopes);
    match command {
        X402Command::Pricing => to_json(client.get_x402_pricing().await?),
        X402Command::Quote {
            minutes,
            name,
            scopes,
            payer_wallet,
        } => {
            let request = X402ApiKeyQuoteRequest {
                duration_minutes: minutes,
                name,
                scopes: non_empty(scopes),
                payer_wallet,
            };
            to_json(client.create_x402_api_key_quote(&request).await?)
        }
        X402Command::Create {
            quote_id,
            signature,
            payer_wallet,
            name,
            scopes,
        } => {
            let request = X402ApiKeyCreateRequest {
                quote_id,
                payment_tx_signature: signature,
                payer_wallet,
                name,
                scopes: non_empty(scopes),
            };
            to_json(client.create_x402_api_key(&request).await?)
        }
    }
}

pub async fn ths_command(command: ThsCommand, client: &ThsClient) -> Result<Value> {
    match command {
        ThsCommand::Health => Ok(serde_json::json!({ "healthy": client.health().await })),
        ThsCommand::Score {
            wallet,
            tokens,
            post,
            debug,
            breakdown,
        } => {
            let options = ThsOptions { debug, breakdown };
            let score = if tokens.is_empty() {
                client.get_ths_score(&wallet, &options).await?
            } else if post {
                client
                    .post_ths_score_for_tokens(&wallet, &tokens, &options)
                    .await?
            } else {
                client
                    .get_ths_score_for_tokens(&wallet, &tokens, &options)
                    .await?
            };
            to_json(score)
        }
        ThsCommand::Top { page, limit } => {
            let options = TopWalletsOptions { page, limit };
            to_json(client.get_top_wallets_by_score(&options).await?)
        }
    }
}

/// One stdout line per payload
pub fn render_payload(payload: &StreamPayload) -> String {
    match payload {
        StreamPayload::Json(value) => value.to_string(),
        StreamPayload::Text(text) => text.clone(),
        StreamPayload::Binary(bytes) => serde_json::json!({ "binaryLength": bytes.len() }).to_string(),
    }
}

/// Print payloads; cancel `closed` when the socket ends
fn printing_options(closed: CancellationToken) -> StreamOptions {
    StreamOptions::new()
        .on_message(|payload| println!("{}", render_payload(&payload)))
        .on_close(move |_| closed.cancel())
}

pub async fn stream_command(
    command: StreamCommand,
    client: &DritanClient,
    shutdown: CancellationToken,
) -> Result<()> {
    let closed = CancellationToken::new();
    let options = printing_options(closed.clone());

    match command {
        StreamCommand::Dex { name, query } => {
            let options = query
                .into_iter()
                .fold(options, |options, (key, value)| options.with_query(key, value));
            let stream = client.stream_dex(&name, options)?;
            tokio::select! {
                _ = shutdown.cancelled() => info!(stream = %name, "shutdown requested"),
                _ = closed.cancelled() => {}
            }
            stream.close();
            stream.join().await;
        }
        StreamCommand::Wallets { wallets } => {
            let stream = client.stream_wallets(WalletStreamOptions::new(wallets).with_stream(options))?;
            tokio::select! {
                _ = shutdown.cancelled() => info!("shutdown requested"),
                _ = closed.cancelled() => {}
            }
            stream.close();
            stream.join().await;
        }
    }
    Ok(())
}
