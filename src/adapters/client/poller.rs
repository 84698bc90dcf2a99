//! Token Poller
//!
//! Refetches one query on a fixed interval and pushes every result, success
//! or failure, onto an mpsc channel. Each tick bypasses cache freshness and
//! refreshes the query cache. The loop ends when `stop` is called or the
//! receiver is dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, RwLock};

use super::query::QueryClient;
use crate::domain::{CanonicalToken, TrendingEntry};
use crate::ports::FeedError;

pub const DEFAULT_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

/// What the poller refreshes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollTarget {
    Token(String),
    Trending,
}

/// One poll result
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate {
    Token(Result<CanonicalToken, FeedError>),
    Trending(Result<Vec<TrendingEntry>, FeedError>),
}

impl PollUpdate {
    pub fn is_ok(&self) -> bool {
        match self {
            PollUpdate::Token(r) => r.is_ok(),
            PollUpdate::Trending(r) => r.is_ok(),
        }
    }
}

pub struct TokenPoller {
    client: Arc<QueryClient>,
    target: PollTarget,
    interval: Duration,
    is_running: Arc<RwLock<bool>>,
}

impl TokenPoller {
    pub fn new(client: Arc<QueryClient>, target: PollTarget) -> Self {
        Self {
            client,
            target,
            interval: DEFAULT_REFETCH_INTERVAL,
            is_running: Arc::new(RwLock::new(false)),
        }
    }

    /// Set custom refetch interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch once, bypassing freshness
    pub async fn tick(&self) -> PollUpdate {
        match &self.target {
            PollTarget::Token(symbol) => PollUpdate::Token(self.client.refetch_token(symbol).await),
            PollTarget::Trending => PollUpdate::Trending(self.client.refetch_trending().await),
        }
    }

    /// Poll until stopped, sending each result on `updates`
    pub async fn run(&self, updates: mpsc::Sender<PollUpdate>) {
        *self.is_running.write().await = true;
        self.poll_loop(updates).await;
    }

    /// Loop body shared by `run` and `spawn`; never raises the running flag,
    /// so a `stop` issued before the loop starts is honoured.
    async fn poll_loop(&self, updates: mpsc::Sender<PollUpdate>) {
        tracing::info!(query = ?self.target, interval = ?self.interval, "Starting poller");

        while *self.is_running.read().await {
            let update = self.tick().await;
            if !update.is_ok() {
                tracing::warn!(query = ?self.target, "Poll tick failed");
            }
            if updates.send(update).await.is_err() {
                tracing::debug!("Poll receiver dropped");
                break;
            }

            self.client.collect_garbage().await;
            tokio::time::sleep(self.interval).await;
        }

        *self.is_running.write().await = false;
        tracing::info!(query = ?self.target, "Poller stopped");
    }

    /// Spawn the poll loop, returning the receiving end of its channel.
    /// The poller counts as running once this returns.
    pub async fn spawn(self: Arc<Self>, buffer: usize) -> mpsc::Receiver<PollUpdate> {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        *self.is_running.write().await = true;
        tokio::spawn(async move { self.poll_loop(tx).await });
        rx
    }

    pub async fn stop(&self) {
        *self.is_running.write().await = false;
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}
