use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::mpsc;
use url::Url;
use voxgate_config::UsageConfig;

use crate::record::UsageRecord;

/// Bound on queued records; beyond this new records are dropped rather
/// than blocking a response
const QUEUE_CAPACITY: usize = 10_000;

/// Async usage recorder with a bounded, retry-free best-effort contract
///
/// Records are handed off through a channel and flushed to the remote
/// usage log in batches. The orchestrator never awaits a write, and a
/// recorder failure cannot affect a response already sent.
#[derive(Clone)]
pub struct UsageRecorder {
    tx: Option<mpsc::Sender<UsageRecord>>,
}

impl UsageRecorder {
    /// Spawn the background flush task and return a handle
    #[must_use]
    pub fn spawn(config: &UsageConfig) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);

        tokio::spawn(flush_loop(
            config.url.clone(),
            config.service_key.clone(),
            config.table.clone(),
            rx,
            Duration::from_secs(config.flush_interval_seconds),
        ));

        Self { tx: Some(tx) }
    }

    /// A recorder that drops every record (usage logging unconfigured)
    #[must_use]
    pub const fn disabled() -> Self {
        Self { tx: None }
    }

    /// A recorder whose records land in the returned receiver
    ///
    /// Useful for embedding and for asserting on records in tests.
    #[must_use]
    pub fn buffered(capacity: usize) -> (Self, mpsc::Receiver<UsageRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx: Some(tx) }, rx)
    }

    /// Enqueue a record (non-blocking, drops if the queue is full)
    pub fn record(&self, record: UsageRecord) {
        let Some(ref tx) = self.tx else { return };

        if let Err(e) = tx.try_send(record) {
            tracing::warn!(error = %e, "dropping usage record, queue full or recorder stopped");
        }
    }
}

impl std::fmt::Debug for UsageRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageRecorder")
            .field("enabled", &self.tx.is_some())
            .finish()
    }
}

async fn flush_loop(
    url: Url,
    service_key: SecretString,
    table: String,
    mut rx: mpsc::Receiver<UsageRecord>,
    interval: Duration,
) {
    let http = reqwest::Client::new();

    let endpoint = match url.join(&format!("rest/v1/{table}")) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::warn!(error = %e, %table, "invalid usage log URL, usage recording disabled");
            return;
        }
    };

    let mut buffer: Vec<UsageRecord> = Vec::new();
    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            Some(record) = rx.recv() => {
                buffer.push(record);
            }
            _ = ticker.tick() => {
                if buffer.is_empty() {
                    continue;
                }

                let records = std::mem::take(&mut buffer);
                let count = records.len();

                if let Err(e) = http
                    .post(endpoint.clone())
                    .header("apikey", service_key.expose_secret())
                    .bearer_auth(service_key.expose_secret())
                    .header("Prefer", "return=minimal")
                    .json(&records)
                    .send()
                    .await
                {
                    tracing::warn!(error = %e, count, "failed to append usage records");
                }
            }
        }
    }
}
