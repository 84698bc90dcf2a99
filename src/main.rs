//! tokenscope - Solana token data aggregation service

use anyhow::Result;
use tokenscope::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
