//! In-memory aggregation state for one collection run
//!
//! An explicit value threaded through the crawl loop, so the aggregation
//! is testable without RPC or store concerns. Folding is commutative and
//! associative: checkpoint processing order does not change the result.

use std::collections::HashMap;

use crate::domain::models::{TransferEdge, Wallet};

/// Mutable wallet map plus append-only edge list
#[derive(Debug, Default)]
pub struct Aggregator {
    wallets: HashMap<String, Wallet>,
    edges: Vec<TransferEdge>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one wallet appearance. The address must already be normalized.
    pub fn update_wallet(&mut self, address: &str, timestamp_ms: i64) {
        self.wallets
            .entry(address.to_string())
            .or_insert_with(|| Wallet::new(address.to_string(), timestamp_ms))
            .observe(timestamp_ms);
    }

    /// Record one accepted transfer event: both endpoints get a wallet
    /// update and the edge is appended as-is (duplicate tx hashes allowed)
    pub fn record(&mut self, event: TransferEdge) {
        self.update_wallet(&event.src, event.timestamp_ms);
        self.update_wallet(&event.dst, event.timestamp_ms);
        self.edges.push(event);
    }

    pub fn wallet_count(&self) -> usize {
        self.wallets.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[TransferEdge] {
        &self.edges
    }

    pub fn wallets(&self) -> impl Iterator<Item = &Wallet> {
        self.wallets.values()
    }

    /// Sum of every wallet's transaction count; grows by exactly two per
    /// recorded edge
    pub fn total_wallet_transactions(&self) -> u64 {
        self.wallets.values().map(|w| w.transaction_count).sum()
    }

    /// Addresses of the most active wallets, busiest first, bounded by
    /// `limit`. Ties break on address for a stable order.
    pub fn top_wallet_addresses(&self, limit: usize) -> Vec<String> {
        let mut ranked: Vec<&Wallet> = self.wallets.values().collect();
        ranked.sort_by(|a, b| {
            b.transaction_count
                .cmp(&a.transaction_count)
                .then_with(|| a.address.cmp(&b.address))
        });
        ranked
            .into_iter()
            .take(limit)
            .map(|w| w.address.clone())
            .collect()
    }

    pub fn wallet_mut(&mut self, address: &str) -> Option<&mut Wallet> {
        self.wallets.get_mut(address)
    }

    /// Wallets in a stable order for persistence
    pub fn wallets_sorted(&self) -> Vec<Wallet> {
        let mut list: Vec<Wallet> = self.wallets.values().cloned().collect();
        list.sort_by(|a, b| a.address.cmp(&b.address));
        list
    }
}
