//! Drives one collection run end to end
//!
//! Sequencing: schema init, checkpoint crawl (plus optional enrichment),
//! relationship scoring, then the three persistence phases, all narrated
//! on the progress feed. Only schema failure and cancellation terminate a
//! run early; everything else is absorbed where it happens.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;

use crate::application::collector::{crawler, enrichment};
use crate::application::progress::{ProgressEvent, ProgressReporter, RunStats};
use crate::config::{AppConfig, RunConfig};
use crate::domain::errors::CollectorError;
use crate::domain::services::{score_relationships, Aggregator};
use crate::infrastructure::graph::schema::{initialize_schema, SPACE_WARMUP};
use crate::infrastructure::graph::{GraphStore, GraphWriter};
use crate::infrastructure::sui::SuiRpc;
use crate::utils::logging;

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Idle,
    Initializing,
    Crawling,
    Scoring,
    Persisting,
    Completed,
    Failed,
}

impl fmt::Display for CollectorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectorState::Idle => "idle",
            CollectorState::Initializing => "initializing",
            CollectorState::Crawling => "crawling",
            CollectorState::Scoring => "scoring",
            CollectorState::Persisting => "persisting",
            CollectorState::Completed => "completed",
            CollectorState::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Cooperative cancellation for a running collection.
/// Checked between checkpoints and between persistence phases.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Orchestrates collection runs against one Sui node and one graph store
pub struct Collector<R: SuiRpc, S: GraphStore> {
    rpc: Arc<R>,
    store: Arc<S>,
    config: AppConfig,
    /// The store is wiped at the start of every run, so runs must not
    /// overlap; a second start while one is live fails fast
    run_lock: Arc<Semaphore>,
    space_warmup: Duration,
}

impl<R: SuiRpc + 'static, S: GraphStore + 'static> Collector<R, S> {
    pub fn new(rpc: Arc<R>, store: Arc<S>, config: AppConfig) -> Self {
        Self {
            rpc,
            store,
            config,
            run_lock: Arc::new(Semaphore::new(1)),
            space_warmup: SPACE_WARMUP,
        }
    }

    /// Shorten the space warmup wait (tests)
    pub fn with_space_warmup(mut self, warmup: Duration) -> Self {
        self.space_warmup = warmup;
        self
    }

    /// Start one collection run as a background task. The task runs to
    /// completion or failure independently of the returned receiver;
    /// the handle is the only way to stop it early.
    pub fn start(&self, run: RunConfig) -> (UnboundedReceiver<ProgressEvent>, CancelHandle) {
        let (reporter, receiver) = ProgressReporter::channel();
        let cancel = CancelHandle::new();

        let rpc = Arc::clone(&self.rpc);
        let store = Arc::clone(&self.store);
        let run_lock = Arc::clone(&self.run_lock);
        let space = self.config.gateway.space.clone();
        let top_limit = self.config.collector.top_wallets_limit;
        let warmup = self.space_warmup;
        let task_cancel = cancel.clone();

        tokio::spawn(async move {
            let result = run_pipeline(
                rpc,
                store,
                run_lock,
                run,
                space,
                top_limit,
                warmup,
                &reporter,
                &task_cancel,
            )
            .await;

            if let Err(e) = result {
                logging::log_debug(&format!("Collector state -> {}", CollectorState::Failed));
                reporter.error(&format!("Data collection failed: {}", e));
            }
        });

        (receiver, cancel)
    }
}

fn transition(state: &mut CollectorState, next: CollectorState) {
    logging::log_debug(&format!("Collector state {} -> {}", state, next));
    *state = next;
}

#[allow(clippy::too_many_arguments)]
async fn run_pipeline<R: SuiRpc, S: GraphStore>(
    rpc: Arc<R>,
    store: Arc<S>,
    run_lock: Arc<Semaphore>,
    run: RunConfig,
    space: String,
    top_limit: usize,
    warmup: Duration,
    reporter: &ProgressReporter,
    cancel: &CancelHandle,
) -> Result<(), CollectorError> {
    let _permit = run_lock
        .try_acquire()
        .map_err(|_| CollectorError::RunInProgress)?;

    let mut state = CollectorState::Idle;
    let enhanced = run.enhanced_mode;

    reporter.info(&format!(
        "Starting data collection for {} checkpoints from {} ({} mode)",
        run.checkpoint_count,
        run.rpc_url,
        if enhanced { "enhanced" } else { "standard" }
    ));

    // Schema failure is the one fatal error class
    transition(&mut state, CollectorState::Initializing);
    initialize_schema(&*store, &space, enhanced, warmup, reporter).await?;

    transition(&mut state, CollectorState::Crawling);
    let mut aggregator = Aggregator::new();
    let checkpoints_processed =
        crawler::crawl(&*rpc, &run, &mut aggregator, reporter, cancel).await?;

    reporter.info(&format!(
        "Data processing complete, wallets: {}, transfers: {}",
        aggregator.wallet_count(),
        aggregator.edge_count()
    ));

    if enhanced && aggregator.wallet_count() > 0 {
        enrichment::enrich_top_wallets(&*rpc, &mut aggregator, top_limit, reporter).await;
    }

    if cancel.is_cancelled() {
        return Err(CollectorError::Cancelled);
    }

    transition(&mut state, CollectorState::Scoring);
    reporter.info("Computing relationships...");
    let pairs = score_relationships(aggregator.edges(), enhanced);

    transition(&mut state, CollectorState::Persisting);
    let writer = GraphWriter::new(&*store, reporter, &space, enhanced);

    let wallets = aggregator.wallets_sorted();
    let wallet_counts = writer
        .insert_wallets(&wallets, if enhanced { 40 } else { 30 })
        .await;

    if cancel.is_cancelled() {
        return Err(CollectorError::Cancelled);
    }

    let edge_counts = writer.insert_edges(aggregator.edges()).await;

    if cancel.is_cancelled() {
        return Err(CollectorError::Cancelled);
    }

    let relationship_counts = writer
        .insert_relationships(&pairs, if enhanced { 85 } else { 80 })
        .await;

    transition(&mut state, CollectorState::Completed);
    reporter.progress("Data collection complete", 100);
    reporter.complete(
        "Data collection finished successfully",
        &RunStats {
            checkpoints_processed,
            wallets_inserted: wallet_counts.inserted,
            transactions_inserted: edge_counts.inserted,
            relationships_inserted: relationship_counts.inserted,
        },
    );

    Ok(())
}
