use serde::{Deserialize, Serialize};

/// Represents one address observed in the ingested checkpoint window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Normalized address (vertex id)
    pub address: String,

    /// Earliest transfer timestamp the wallet appeared in (epoch ms)
    pub first_seen_ms: i64,

    /// Latest transfer timestamp the wallet appeared in (epoch ms)
    pub last_seen_ms: i64,

    /// Number of accepted transfer events the wallet took part in,
    /// as sender or recipient
    pub transaction_count: u64,

    /// Accumulated transfer value. Stays at 0.0: command payloads do not
    /// carry amounts, those live in ledger effects not modeled here.
    pub total_amount: f64,

    /// Whether the address owns a published package
    pub is_contract: bool,

    /// On-chain balance in SUI, fetched only for top-N wallets in
    /// enhanced mode
    pub sui_balance: f64,

    /// Owned-object count, fetched only for top-N wallets in enhanced mode
    pub owned_objects_count: u64,

    /// Timestamp of the wallet's most recent activity (enhanced mode)
    pub last_activity_ms: i64,
}

impl Wallet {
    /// Create a wallet record from its first observed transfer
    pub fn new(address: String, timestamp_ms: i64) -> Self {
        Self {
            address,
            first_seen_ms: timestamp_ms,
            last_seen_ms: timestamp_ms,
            transaction_count: 0,
            total_amount: 0.0,
            is_contract: false,
            sui_balance: 0.0,
            owned_objects_count: 0,
            last_activity_ms: timestamp_ms,
        }
    }

    /// Fold one transfer appearance into the record.
    /// Keeps `first_seen_ms <= last_seen_ms` for any timestamp order.
    pub fn observe(&mut self, timestamp_ms: i64) {
        self.first_seen_ms = self.first_seen_ms.min(timestamp_ms);
        self.last_seen_ms = self.last_seen_ms.max(timestamp_ms);
        self.last_activity_ms = self.last_activity_ms.max(timestamp_ms);
        self.transaction_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_keeps_window_ordered() {
        let mut wallet = Wallet::new("a".repeat(64), 5_000);
        for ts in [9_000, 1_000, 7_000, 1_000] {
            wallet.observe(ts);
            assert!(wallet.first_seen_ms <= wallet.last_seen_ms);
        }
        assert_eq!(wallet.first_seen_ms, 1_000);
        assert_eq!(wallet.last_seen_ms, 9_000);
        assert_eq!(wallet.transaction_count, 4);
    }
}
