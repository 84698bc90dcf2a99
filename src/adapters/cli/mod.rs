//! CLI Adapter
//!
//! Command-line interface for tokenscope.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    build_state, render_token, render_token_line, render_trending, BalanceCmd, CliApp, Command,
    ServeCmd, TokenCmd, TrendingCmd, WatchCmd,
};

use anyhow::Result;

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}

/// Execute the CLI command
pub async fn execute(app: CliApp) -> Result<()> {
    commands::execute(app).await
}
