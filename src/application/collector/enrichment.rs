//! Enhanced-mode wallet enrichment
//!
//! Balance, owned-object count and contract flag are fetched only for a
//! bounded top-N of most active wallets; fetching them for every observed
//! address would multiply the RPC load of a run.

use tokio::time::{sleep, Duration};

use crate::application::progress::ProgressReporter;
use crate::domain::services::Aggregator;
use crate::infrastructure::sui::SuiRpc;

/// Pause between per-wallet RPC bursts
const THROTTLE: Duration = Duration::from_millis(200);

/// Fetch balance/object/contract details for the most active wallets.
/// Per-wallet failures leave the enrichment fields at their defaults.
pub async fn enrich_top_wallets<R: SuiRpc>(
    rpc: &R,
    aggregator: &mut Aggregator,
    limit: usize,
    reporter: &ProgressReporter,
) {
    let addresses = aggregator.top_wallet_addresses(limit);
    if addresses.is_empty() {
        return;
    }

    reporter.info("Enhanced mode: fetching wallet details...");

    let total = addresses.len();
    for (i, address) in addresses.iter().enumerate() {
        reporter.info(&format!(
            "Fetching wallet {}/{}: {}...",
            i + 1,
            total,
            &address[..12.min(address.len())]
        ));

        let balance = rpc.get_balance(address).await;
        let objects = rpc.get_owned_objects_count(address).await;
        let contract = rpc.is_contract(address).await;

        if let Some(wallet) = aggregator.wallet_mut(address) {
            match balance {
                Ok(sui) => wallet.sui_balance = sui,
                Err(e) => reporter.warning(&format!(
                    "Failed to fetch balance for {}: {}",
                    &address[..12.min(address.len())],
                    e
                )),
            }
            match objects {
                Ok(count) => wallet.owned_objects_count = count,
                Err(e) => reporter.warning(&format!(
                    "Failed to fetch object count for {}: {}",
                    &address[..12.min(address.len())],
                    e
                )),
            }
            // Contract detection failures just leave the flag unset
            wallet.is_contract = contract.unwrap_or(false);

            reporter.info(&format!(
                "  balance: {:.2} SUI, objects: {}, contract: {}",
                wallet.sui_balance, wallet.owned_objects_count, wallet.is_contract
            ));
        }

        let percent = 30 + (((i + 1) * 10) / total) as u8;
        reporter.progress(&format!("Fetched wallet details {}/{}", i + 1, total), percent);

        if i + 1 < total {
            sleep(THROTTLE).await;
        }
    }

    reporter.success(&format!("Finished enrichment for {} wallets", total));
}
