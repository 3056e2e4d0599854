//! Sequential checkpoint crawl
//!
//! Checkpoints and transactions are processed one at a time, each remote
//! call awaited before the next is issued, to stay inside full-node rate
//! limits. Per-checkpoint and per-transaction failures are absorbed
//! locally and reported on the feed; they never unwind the loop.

use crate::application::collector::orchestrator::CancelHandle;
use crate::application::progress::ProgressReporter;
use crate::config::RunConfig;
use crate::domain::errors::CollectorError;
use crate::domain::services::{extract_transfers, Aggregator};
use crate::infrastructure::sui::SuiRpc;

/// Ingest the configured window of most-recent checkpoints into the
/// aggregator. Returns the number of checkpoints actually fetched.
pub async fn crawl<R: SuiRpc>(
    rpc: &R,
    run: &RunConfig,
    aggregator: &mut Aggregator,
    reporter: &ProgressReporter,
    cancel: &CancelHandle,
) -> Result<u64, CollectorError> {
    reporter.info("Fetching latest checkpoint...");
    let latest = rpc.latest_checkpoint_sequence_number().await?;
    let count = run.checkpoint_count.max(1);
    let start = latest.saturating_sub(count - 1);

    reporter.info(&format!("Processing range: {} - {}", start, latest));
    reporter.info("Processing checkpoint data...");

    let mut checkpoints_processed = 0u64;
    for seq in start..=latest {
        if cancel.is_cancelled() {
            return Err(CollectorError::Cancelled);
        }

        let percent = (((seq - start) * 30) / count) as u8;
        reporter.progress(&format!("Processing checkpoint {}/{}", seq, latest), percent);

        let checkpoint = match rpc.get_checkpoint(seq).await {
            Ok(checkpoint) => checkpoint,
            Err(e) => {
                reporter.error(&format!("Failed to process checkpoint {}: {}", seq, e));
                continue;
            }
        };
        checkpoints_processed += 1;

        let mut accepted = 0usize;
        for digest in &checkpoint.transactions {
            let tx = match rpc.get_transaction_block(digest).await {
                Ok(tx) => tx,
                Err(e) => {
                    reporter.warning(&format!("Skipping transaction {}: {}", digest, e));
                    continue;
                }
            };

            let outcome = extract_transfers(digest, &tx, checkpoint.timestamp_ms);
            if outcome.unresolved_recipients > 0 {
                reporter.warning(&format!(
                    "Skipped {} transfer command(s) with unresolvable recipient in {}",
                    outcome.unresolved_recipients, digest
                ));
            }
            for event in outcome.events {
                aggregator.record(event);
                accepted += 1;
            }
        }

        if accepted > 0 {
            reporter.info(&format!(
                "Checkpoint {} processed, {} transfers found",
                seq, accepted
            ));
        }
    }

    Ok(checkpoints_processed)
}
