//! Status watcher: keeps a view of one asset eventually consistent with the
//! backend by polling while the asset is still being processed.
//!
//! A watcher is a single spawned task that owns the [`AssetState`] and
//! publishes it through a `tokio::sync::watch` channel. Fetches run as their
//! own tasks and report back tagged with the generation they were issued for;
//! re-associating the watcher with another asset bumps the generation, so a
//! slow response for the previous asset is dropped instead of overwriting the
//! new one. Dropping the [`AssetWatch`] handle cancels the task, its pending
//! timer, and the effect of any response still in flight.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use adconsole_core::{Asset, AssetId, AssetStatus, ConsoleResult, ErrorMetadata};
use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;

use crate::{log_error, ApiClient};

/// Interval between polls when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Shortest interval a watcher will poll at; smaller values are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Message used when a failed fetch carries no message of its own.
pub const DEFAULT_FETCH_ERROR: &str = "Failed to fetch asset";

/// Anything that can load an asset record by id.
#[async_trait]
pub trait AssetSource: Send + Sync + 'static {
    async fn fetch_asset(&self, id: &AssetId) -> ConsoleResult<Asset>;
}

#[async_trait]
impl AssetSource for ApiClient {
    async fn fetch_asset(&self, id: &AssetId) -> ConsoleResult<Asset> {
        self.get_asset(id).await
    }
}

/// Snapshot of what a page knows about the watched asset.
///
/// Before the first response: `loading` with nothing else set. After a
/// success: `asset` set, `error` cleared. After a failure: `error` set while
/// `asset` keeps the last successfully loaded record, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetState {
    pub asset: Option<Asset>,
    pub loading: bool,
    pub error: Option<String>,
}

impl AssetState {
    pub fn initial() -> Self {
        Self {
            asset: None,
            loading: true,
            error: None,
        }
    }

    fn idle() -> Self {
        Self {
            asset: None,
            loading: false,
            error: None,
        }
    }
}

/// Builds watchers with a shared polling policy.
#[derive(Debug, Clone)]
pub struct StatusWatcher {
    interval: Duration,
    in_progress: Vec<AssetStatus>,
}

impl Default for StatusWatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusWatcher {
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_POLL_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            in_progress: AssetStatus::ALL
                .into_iter()
                .filter(AssetStatus::is_in_progress)
                .collect(),
        }
    }

    /// Override which statuses keep the watcher polling.
    pub fn polling_on(mut self, statuses: &[AssetStatus]) -> Self {
        self.in_progress = statuses.to_vec();
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start watching `asset_id`. Must be called inside a tokio runtime.
    pub fn watch(&self, source: Arc<dyn AssetSource>, asset_id: Option<AssetId>) -> AssetWatch {
        let (state_tx, state_rx) = watch::channel(AssetState::initial());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let worker = Worker {
            source,
            interval: self.interval,
            in_progress: self.in_progress.clone(),
            asset_id: None,
            generation: 0,
            state: state_tx,
            results_tx,
            timer: None,
        };
        tokio::spawn(worker.run(asset_id, command_rx, results_rx, cancel.clone()));

        AssetWatch {
            commands: command_tx,
            state: state_rx,
            cancel,
        }
    }
}

enum Command {
    Refetch,
    Associate(Option<AssetId>),
}

/// Handle to a running watcher. Dropping it detaches the watcher.
#[derive(Debug)]
pub struct AssetWatch {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<AssetState>,
    cancel: CancellationToken,
}

impl AssetWatch {
    /// Current snapshot.
    pub fn state(&self) -> AssetState {
        self.state.borrow().clone()
    }

    /// Independent receiver for consumers that render on every change.
    pub fn subscribe(&self) -> watch::Receiver<AssetState> {
        self.state.clone()
    }

    /// Wait for the next published change. Returns `false` once the watcher
    /// has stopped.
    pub async fn changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// Fetch now instead of waiting for the next poll.
    pub fn refetch(&self) {
        let _ = self.commands.send(Command::Refetch);
    }

    /// Point the watcher at another asset (or none). Responses for the
    /// previous asset are discarded.
    pub fn set_asset_id(&self, asset_id: Option<AssetId>) {
        let _ = self.commands.send(Command::Associate(asset_id));
    }

    pub fn detach(self) {}
}

impl Drop for AssetWatch {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct FetchOutcome {
    generation: u64,
    result: ConsoleResult<Asset>,
}

struct Worker {
    source: Arc<dyn AssetSource>,
    interval: Duration,
    in_progress: Vec<AssetStatus>,
    asset_id: Option<AssetId>,
    generation: u64,
    state: watch::Sender<AssetState>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    // At most one scheduled poll.
    timer: Option<Pin<Box<Sleep>>>,
}

impl Worker {
    async fn run(
        mut self,
        asset_id: Option<AssetId>,
        mut commands: mpsc::UnboundedReceiver<Command>,
        mut results: mpsc::UnboundedReceiver<FetchOutcome>,
        cancel: CancellationToken,
    ) {
        self.associate(asset_id);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                command = commands.recv() => match command {
                    Some(Command::Refetch) => self.start_fetch(),
                    Some(Command::Associate(id)) => self.associate(id),
                    None => break,
                },
                Some(outcome) = results.recv() => self.apply(outcome),
                _ = wait_for_timer(&mut self.timer) => {
                    self.timer = None;
                    self.start_fetch();
                }
            }
        }

        tracing::debug!(asset_id = ?self.asset_id, "Status watcher detached");
    }

    fn associate(&mut self, asset_id: Option<AssetId>) {
        self.generation += 1;
        self.timer = None;
        self.asset_id = asset_id;

        if self.asset_id.is_some() {
            self.publish(AssetState::initial());
            self.start_fetch();
        } else {
            self.publish(AssetState::idle());
        }
    }

    fn start_fetch(&mut self) {
        self.timer = None;

        let Some(asset_id) = self.asset_id.clone() else {
            self.state.send_if_modified(|state| {
                let changed = state.loading;
                state.loading = false;
                changed
            });
            return;
        };

        let source = Arc::clone(&self.source);
        let results_tx = self.results_tx.clone();
        let generation = self.generation;
        tracing::debug!(asset_id = %asset_id, generation, "Fetching asset status");

        // The request itself is not cancelled on detach; its result is simply
        // never applied because the receiving loop is gone.
        tokio::spawn(async move {
            let result = source.fetch_asset(&asset_id).await;
            let _ = results_tx.send(FetchOutcome { generation, result });
        });
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.generation {
            tracing::debug!(
                generation = outcome.generation,
                current = self.generation,
                "Discarding response for a previous asset"
            );
            return;
        }

        let mut next = self.state.borrow().clone();
        match outcome.result {
            Ok(asset) => {
                next.asset = Some(asset);
                next.error = None;
            }
            Err(e) => {
                let message = e.client_message();
                let _span = tracing::debug_span!("asset_fetch", asset_id = ?self.asset_id).entered();
                log_error(&e, "Asset fetch failed");
                next.error = Some(if message.trim().is_empty() {
                    DEFAULT_FETCH_ERROR.to_string()
                } else {
                    message
                });
            }
        }
        next.loading = false;

        let keep_polling = next
            .asset
            .as_ref()
            .is_some_and(|asset| self.in_progress.contains(&asset.status));
        self.publish(next);

        self.timer = None;
        if keep_polling {
            self.timer = Some(Box::pin(tokio::time::sleep(self.interval)));
        }
    }

    fn publish(&self, next: AssetState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}

async fn wait_for_timer(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
