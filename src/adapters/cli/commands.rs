//! CLI Command Handlers
//!
//! Implementation of all CLI commands for tokenscope.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::client::{PollTarget, PollUpdate, Prefetcher, QueryClient, TokenApiClient, TokenPoller};
use crate::adapters::coingecko::CoinGeckoClient;
use crate::adapters::http::{self, AppState};
use crate::adapters::jupiter::JupiterTokenList;
use crate::adapters::raydium::RaydiumPriceClient;
use crate::adapters::solana::SolanaRpcClient;
use crate::application::{DirectoryCache, MetadataResolver, PriceResolver, TokenService, TrendingFetcher};
use crate::config::{load_config, Config};
use crate::domain::{
    format_market_cap, format_number_with_commas, format_percentage, format_price, format_price_change,
    format_supply, format_volume, CanonicalToken, CurrencyValue, TrendingEntry,
};
use crate::ports::SystemClock;

/// tokenscope - Solana token data aggregation
#[derive(Parser, Debug)]
#[command(
    name = "tokenscope",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Solana token data aggregation service",
    long_about = "tokenscope merges the Jupiter token list, Solana RPC supply, Raydium \
                  prices and CoinGecko market data into one record per token symbol, \
                  and serves it over a small HTTP API."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the request API
    Serve(ServeCmd),

    /// Look up one token
    Token(TokenCmd),

    /// Show the trending feed
    Trending(TrendingCmd),

    /// Poll a running API for one token
    Watch(WatchCmd),

    /// SPL token balance of a wallet
    Balance(BalanceCmd),
}

/// Run the request API
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Override listen host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Override listen port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// Look up one token
#[derive(Parser, Debug)]
pub struct TokenCmd {
    /// Token symbol (e.g., SOL)
    #[arg(value_name = "SYMBOL")]
    pub symbol: String,

    /// Print the raw JSON record
    #[arg(long)]
    pub json: bool,
}

/// Show the trending feed
#[derive(Parser, Debug)]
pub struct TrendingCmd {
    /// Number of entries to show
    #[arg(short, long, value_name = "N", default_value = "10")]
    pub limit: usize,

    /// Print the raw JSON entries
    #[arg(long)]
    pub json: bool,
}

/// Poll a running API
#[derive(Parser, Debug)]
pub struct WatchCmd {
    /// Token symbol to poll
    #[arg(value_name = "SYMBOL")]
    pub symbol: String,

    /// Symbols to warm in the cache before polling
    #[arg(long, value_name = "SYMBOL", num_args = 1..)]
    pub prefetch: Vec<String>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the refetch interval (seconds)
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,
}

/// SPL token balance
#[derive(Parser, Debug)]
pub struct BalanceCmd {
    /// Wallet address (base58)
    #[arg(value_name = "WALLET")]
    pub wallet: String,

    /// Token mint address (base58)
    #[arg(value_name = "MINT")]
    pub mint: String,
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_config(app.config.as_deref()).context("Failed to load configuration")?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Serve(cmd) => serve_command(cmd, config).await,
        Command::Token(cmd) => token_command(cmd, &config).await,
        Command::Trending(cmd) => trending_command(cmd, &config).await,
        Command::Watch(cmd) => watch_command(cmd, &config).await,
        Command::Balance(cmd) => balance_command(cmd, &config).await,
    }
}

/// Log filter directive: flags raise the configured level
fn log_directive(verbose: bool, debug: bool, configured: &str) -> String {
    if debug {
        "debug".to_string()
    } else if verbose {
        "info".to_string()
    } else {
        configured.to_lowercase()
    }
}

/// Initialize logging system; `RUST_LOG` wins over everything else
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose, debug, configured)));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

/// Wire the upstream adapters, caches and resolvers from configuration
pub fn build_state(config: &Config) -> Result<AppState> {
    let upstream = &config.upstream;

    let directory_source =
        Arc::new(JupiterTokenList::with_config(upstream.jupiter()).context("Failed to create Jupiter client")?);
    let rpc = Arc::new(SolanaRpcClient::with_config(upstream.solana()).context("Failed to create Solana RPC client")?);
    let dex = Arc::new(RaydiumPriceClient::with_config(upstream.raydium()).context("Failed to create Raydium client")?);
    let aggregator =
        Arc::new(CoinGeckoClient::with_config(upstream.coingecko()).context("Failed to create CoinGecko client")?);

    let directory = Arc::new(DirectoryCache::with_clock(
        directory_source,
        Arc::new(SystemClock),
        config.cache.directory_ttl(),
    ));
    let metadata = Arc::new(MetadataResolver::new(directory, rpc));
    let price = Arc::new(PriceResolver::new(Arc::clone(&metadata), dex, aggregator.clone()));
    let trending = Arc::new(TrendingFetcher::new(aggregator));
    let tokens = Arc::new(TokenService::new(Arc::clone(&trending), metadata, price));

    Ok(AppState::new(tokens, trending))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Handle serve command
async fn serve_command(cmd: ServeCmd, mut config: Config) -> Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.bind_address()))?;

    tracing::info!("Starting tokenscope API...");
    let state = build_state(&config)?;
    http::serve(state, addr, shutdown_signal()).await?;
    Ok(())
}

/// Handle token command
async fn token_command(cmd: TokenCmd, config: &Config) -> Result<()> {
    let symbol = cmd.symbol.trim();
    if symbol.is_empty() {
        bail!("Token symbol is required");
    }

    let state = build_state(config)?;
    let Some(token) = state.tokens.reconcile(symbol).await else {
        bail!("Token data not available for {}", symbol);
    };

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&token)?);
    } else {
        println!("{}", render_token(&token));
    }
    Ok(())
}

/// Handle trending command
async fn trending_command(cmd: TrendingCmd, config: &Config) -> Result<()> {
    let state = build_state(config)?;
    let entries = state
        .trending
        .get_trending()
        .await
        .context("Failed to fetch trending tokens")?;

    if cmd.json {
        let shown: Vec<&TrendingEntry> = entries.iter().take(cmd.limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
    } else {
        println!("{}", render_trending(&entries, cmd.limit));
    }
    Ok(())
}

/// Handle watch command
async fn watch_command(cmd: WatchCmd, config: &Config) -> Result<()> {
    let api_url = cmd.api_url.unwrap_or_else(|| config.client.api_url.clone());
    let interval = cmd
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.client.refetch_interval());
    if interval.is_zero() {
        bail!("Refetch interval must be > 0");
    }

    let feed = TokenApiClient::new(api_url.as_str(), config.client.timeout()).context("Failed to create API client")?;
    let client = Arc::new(QueryClient::new(Arc::new(feed), config.client.query()));

    let prefetcher = Prefetcher::with_debounce(Arc::clone(&client), config.client.prefetch_debounce());
    prefetcher.prefetch_many(&cmd.prefetch).await;

    let poller = Arc::new(
        TokenPoller::new(Arc::clone(&client), PollTarget::Token(cmd.symbol.clone())).with_interval(interval),
    );
    let mut updates = Arc::clone(&poller).spawn(4).await;

    println!("Watching {} via {} every {}s (Ctrl+C to stop)", cmd.symbol, api_url, interval.as_secs());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                poller.stop().await;
                break;
            }
            update = updates.recv() => match update {
                Some(PollUpdate::Token(Ok(token))) => println!("{}", render_token_line(&token)),
                Some(PollUpdate::Token(Err(e))) => eprintln!("{}: {}", cmd.symbol, e),
                Some(PollUpdate::Trending(_)) => {}
                None => break,
            }
        }
    }

    tracing::info!(prefetching = prefetcher.prefetching_count(), "Watch stopped");
    Ok(())
}

/// Handle balance command
async fn balance_command(cmd: BalanceCmd, config: &Config) -> Result<()> {
    let rpc = SolanaRpcClient::with_config(config.upstream.solana()).context("Failed to create Solana RPC client")?;
    let balance = rpc
        .token_balance(&cmd.wallet, &cmd.mint)
        .await
        .context("Failed to fetch token balance")?;

    println!("Wallet: {}", cmd.wallet);
    println!("Mint:   {}", cmd.mint);
    println!("Balance: {}", format_number_with_commas(balance));
    Ok(())
}

/// Multi-line view of one token
pub fn render_token(token: &CanonicalToken) -> String {
    let mut lines = vec![
        format!("{} ({})", token.name, token.symbol.to_uppercase()),
        format!("  Price:       {}", format_price(token.price)),
        format!("  24h Change:  {}", format_price_change(token.price_change_percent_24h)),
        format!("  Market Cap:  {}", format_market_cap(&CurrencyValue::Number(token.market_cap))),
        format!("  Volume 24h:  {}", format_volume(&CurrencyValue::Number(token.volume_24h))),
        format!("  Supply:      {}", format_supply(token.solana.supply)),
        format!("  Decimals:    {}", token.solana.decimals),
    ];
    if let Some(mint) = &token.solana.mint_address {
        lines.push(format!("  Mint:        {}", mint));
    }
    lines.join("\n")
}

/// One-line view used while polling
pub fn render_token_line(token: &CanonicalToken) -> String {
    format!(
        "{} {} ({})",
        token.symbol.to_uppercase(),
        format_price(token.price),
        format_price_change(token.price_change_percent_24h)
    )
}

/// Ranked trending table, at most `limit` rows
pub fn render_trending(entries: &[TrendingEntry], limit: usize) -> String {
    if entries.is_empty() {
        return "No trending tokens".to_string();
    }

    entries
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, entry)| {
            let price = entry.price_usd().map(format_price).unwrap_or_else(|| "-".to_string());
            let change = entry
                .price_change_pct_24h()
                .map(|pct| format_percentage(pct).text)
                .unwrap_or_else(|| "-".to_string());
            format!(
                "{:>2}. {:<24} {:<8} {:>16} {:>9}",
                i + 1,
                entry.name,
                entry.symbol.to_uppercase(),
                price,
                change
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
