//! Persists the aggregated graph through the store gateway
//!
//! Each record is written independently: a rejected upsert increments a
//! failure counter and emits a warning, the phase keeps going. Only the
//! schema step (see `schema.rs`) may abort a run.

use crate::application::progress::ProgressReporter;
use crate::domain::models::{RelationshipPair, TransferEdge, Wallet};
use crate::infrastructure::graph::client::GraphStore;
use crate::infrastructure::graph::format_datetime;

/// Outcome of one write phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteCounts {
    pub inserted: u64,
    pub failed: u64,
}

/// Writes wallets, transfer edges and relationship pairs to the store
pub struct GraphWriter<'a, S: GraphStore> {
    store: &'a S,
    reporter: &'a ProgressReporter,
    space: &'a str,
    enhanced: bool,
}

impl<'a, S: GraphStore> GraphWriter<'a, S> {
    pub fn new(
        store: &'a S,
        reporter: &'a ProgressReporter,
        space: &'a str,
        enhanced: bool,
    ) -> Self {
        Self {
            store,
            reporter,
            space,
            enhanced,
        }
    }

    /// Upsert every wallet record; `progress_from` is the percentage the
    /// phase starts at (the band spans 25 points)
    pub async fn insert_wallets(&self, wallets: &[Wallet], progress_from: u8) -> WriteCounts {
        let mut counts = WriteCounts::default();
        if wallets.is_empty() {
            return counts;
        }

        self.reporter.info("Inserting wallet data...");
        for wallet in wallets {
            match self.store.execute(&self.wallet_stmt(wallet)).await {
                Ok(_) => {
                    counts.inserted += 1;
                    let percent = progress_from
                        + ((counts.inserted as usize * 25) / wallets.len()) as u8;
                    self.reporter.progress(
                        &format!("Inserted wallet {}/{}", counts.inserted, wallets.len()),
                        percent,
                    );
                }
                Err(e) => {
                    counts.failed += 1;
                    self.reporter.warning(&format!(
                        "Failed to insert wallet {}: {}",
                        &wallet.address[..16.min(wallet.address.len())],
                        e
                    ));
                }
            }
        }
        self.reporter
            .success(&format!("Inserted {} wallets", counts.inserted));
        counts
    }

    /// Insert every transfer edge. Edges referencing wallets that failed
    /// to upsert fail here and are counted, not silently dropped.
    pub async fn insert_edges(&self, edges: &[TransferEdge]) -> WriteCounts {
        let mut counts = WriteCounts::default();
        if edges.is_empty() {
            return counts;
        }

        self.reporter
            .info(&format!("Inserting {} transfer edges...", edges.len()));
        for edge in edges {
            match self.store.execute(&self.edge_stmt(edge)).await {
                Ok(_) => {
                    counts.inserted += 1;
                    if counts.inserted % 10 == 0 {
                        let percent = 60 + ((counts.inserted as usize * 25) / edges.len()) as u8;
                        self.reporter.progress(
                            &format!("Inserted edge {}/{}", counts.inserted, edges.len()),
                            percent,
                        );
                    }
                }
                Err(e) => {
                    counts.failed += 1;
                    self.reporter.warning(&format!(
                        "Failed to insert edge {}: {}",
                        &edge.tx_hash[..16.min(edge.tx_hash.len())],
                        e
                    ));
                }
            }
        }
        self.reporter.success(&format!(
            "Inserted {} transfer edges, {} failed",
            counts.inserted, counts.failed
        ));
        if counts.failed > 0 {
            self.reporter.warning(&format!(
                "{} edge inserts failed, likely referencing wallets that were not written",
                counts.failed
            ));
        }
        counts
    }

    /// Insert every relationship pair; the band spans 15 points from
    /// `progress_from`
    pub async fn insert_relationships(
        &self,
        pairs: &[RelationshipPair],
        progress_from: u8,
    ) -> WriteCounts {
        let mut counts = WriteCounts::default();
        if pairs.is_empty() {
            return counts;
        }

        self.reporter.info("Inserting relationship records...");
        for pair in pairs {
            match self.store.execute(&self.relationship_stmt(pair)).await {
                Ok(_) => {
                    counts.inserted += 1;
                    if counts.inserted % 5 == 0 {
                        let percent = progress_from
                            + ((counts.inserted as usize * 15) / pairs.len()) as u8;
                        self.reporter.progress(
                            &format!("Inserted relationship {}/{}", counts.inserted, pairs.len()),
                            percent,
                        );
                    }
                }
                Err(e) => {
                    counts.failed += 1;
                    self.reporter.warning(&format!(
                        "Failed to insert relationship {} - {}: {}",
                        &pair.src[..8.min(pair.src.len())],
                        &pair.dst[..8.min(pair.dst.len())],
                        e
                    ));
                }
            }
        }
        self.reporter
            .success(&format!("Inserted {} relationships", counts.inserted));
        counts
    }

    fn wallet_stmt(&self, wallet: &Wallet) -> String {
        let first_seen = format_datetime(wallet.first_seen_ms);
        let last_seen = format_datetime(wallet.last_seen_ms);
        if self.enhanced {
            format!(
                "USE {space}; INSERT VERTEX wallet(address, first_seen, last_seen, \
                 transaction_count, total_amount, is_contract, sui_balance, \
                 owned_objects_count, last_activity) VALUES \"{addr}\": (\"{addr}\", \
                 datetime(\"{first}\"), datetime(\"{last}\"), {count}, {amount}, \
                 {contract}, {balance}, {objects}, datetime(\"{activity}\"))",
                space = self.space,
                addr = wallet.address,
                first = first_seen,
                last = last_seen,
                count = wallet.transaction_count,
                amount = wallet.total_amount,
                contract = wallet.is_contract,
                balance = wallet.sui_balance,
                objects = wallet.owned_objects_count,
                activity = format_datetime(wallet.last_activity_ms),
            )
        } else {
            format!(
                "USE {space}; INSERT VERTEX wallet(address, first_seen, last_seen, \
                 transaction_count, total_amount, is_contract) VALUES \"{addr}\": \
                 (\"{addr}\", datetime(\"{first}\"), datetime(\"{last}\"), {count}, \
                 {amount}, {contract})",
                space = self.space,
                addr = wallet.address,
                first = first_seen,
                last = last_seen,
                count = wallet.transaction_count,
                amount = wallet.total_amount,
                contract = wallet.is_contract,
            )
        }
    }

    fn edge_stmt(&self, edge: &TransferEdge) -> String {
        let timestamp = format_datetime(edge.timestamp_ms);
        if self.enhanced {
            format!(
                "USE {space}; INSERT EDGE transaction(amount, tx_timestamp, tx_hash, \
                 gas_used, success, transaction_type) VALUES \"{src}\" -> \"{dst}\": \
                 ({amount}, datetime(\"{ts}\"), \"{hash}\", {gas}, {success}, \"{kind}\")",
                space = self.space,
                src = edge.src,
                dst = edge.dst,
                amount = edge.amount,
                ts = timestamp,
                hash = edge.tx_hash,
                gas = edge.gas_used,
                success = edge.success,
                kind = edge.kind.as_str(),
            )
        } else {
            format!(
                "USE {space}; INSERT EDGE transaction(amount, tx_timestamp, tx_hash, \
                 gas_used, success) VALUES \"{src}\" -> \"{dst}\": ({amount}, \
                 datetime(\"{ts}\"), \"{hash}\", {gas}, {success})",
                space = self.space,
                src = edge.src,
                dst = edge.dst,
                amount = edge.amount,
                ts = timestamp,
                hash = edge.tx_hash,
                gas = edge.gas_used,
                success = edge.success,
            )
        }
    }

    fn relationship_stmt(&self, pair: &RelationshipPair) -> String {
        let first = format_datetime(pair.first_interaction_ms);
        let last = format_datetime(pair.last_interaction_ms);
        if self.enhanced {
            format!(
                "USE {space}; INSERT EDGE related_to(relationship_score, \
                 common_transactions, total_amount, first_interaction, last_interaction, \
                 relationship_type, avg_gas_used) VALUES \"{src}\" -> \"{dst}\": \
                 ({score}, {n}, {amount}, datetime(\"{first}\"), datetime(\"{last}\"), \
                 \"{rel_type}\", {gas})",
                space = self.space,
                src = pair.src,
                dst = pair.dst,
                score = pair.relationship_score,
                n = pair.common_transactions,
                amount = pair.total_amount,
                first = first,
                last = last,
                rel_type = pair.relationship_type,
                gas = pair.avg_gas_used,
            )
        } else {
            format!(
                "USE {space}; INSERT EDGE related_to(relationship_score, \
                 common_transactions, total_amount, first_interaction, last_interaction, \
                 relationship_type) VALUES \"{src}\" -> \"{dst}\": ({score}, {n}, \
                 {amount}, datetime(\"{first}\"), datetime(\"{last}\"), \"{rel_type}\")",
                space = self.space,
                src = pair.src,
                dst = pair.dst,
                score = pair.relationship_score,
                n = pair.common_transactions,
                amount = pair.total_amount,
                first = first,
                last = last,
                rel_type = pair.relationship_type,
            )
        }
    }
}
