//! Second pass over collected edges: group transfers by canonical address
//! pair and score the relationship strength

use std::collections::BTreeMap;

use crate::domain::models::{RelationshipPair, TransferEdge};

/// Group edges by unordered address pair and compute one aggregate record
/// per pair. A single O(n) pass after ingestion completes; the score is
/// `ln(common_transactions + 1)`.
///
/// In enhanced mode the mean gas cost of the folded edges is tracked too.
pub fn score_relationships(edges: &[TransferEdge], enhanced: bool) -> Vec<RelationshipPair> {
    let mut pairs: BTreeMap<(String, String), PairAccumulator> = BTreeMap::new();

    for edge in edges {
        let key = RelationshipPair::canonical_key(&edge.src, &edge.dst);
        let acc = pairs.entry(key).or_insert_with(|| PairAccumulator {
            common_transactions: 0,
            total_amount: 0.0,
            total_gas: 0,
            first_interaction_ms: edge.timestamp_ms,
            last_interaction_ms: edge.timestamp_ms,
        });

        acc.common_transactions += 1;
        acc.total_amount += edge.amount;
        acc.total_gas += edge.gas_used;
        acc.first_interaction_ms = acc.first_interaction_ms.min(edge.timestamp_ms);
        acc.last_interaction_ms = acc.last_interaction_ms.max(edge.timestamp_ms);
    }

    pairs
        .into_iter()
        .map(|((src, dst), acc)| RelationshipPair {
            src,
            dst,
            relationship_score: relationship_score(acc.common_transactions),
            common_transactions: acc.common_transactions,
            total_amount: acc.total_amount,
            first_interaction_ms: acc.first_interaction_ms,
            last_interaction_ms: acc.last_interaction_ms,
            relationship_type: "unknown".to_string(),
            avg_gas_used: if enhanced {
                acc.total_gas as f64 / acc.common_transactions as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// Strength of a pair with `n` common transactions
pub fn relationship_score(common_transactions: u64) -> f64 {
    ((common_transactions + 1) as f64).ln()
}

struct PairAccumulator {
    common_transactions: u64,
    total_amount: f64,
    total_gas: u64,
    first_interaction_ms: i64,
    last_interaction_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::TransferKind;

    fn edge(src: &str, dst: &str, ts: i64, gas: u64) -> TransferEdge {
        TransferEdge {
            src: src.to_string(),
            dst: dst.to_string(),
            amount: 0.0,
            timestamp_ms: ts,
            tx_hash: "digest".to_string(),
            gas_used: gas,
            success: true,
            kind: TransferKind::TransferSui,
        }
    }

    #[test]
    fn test_score_is_strictly_increasing_from_zero() {
        assert_eq!(relationship_score(0), 0.0);
        for n in 0..100u64 {
            assert!(relationship_score(n) < relationship_score(n + 1));
        }
    }

    #[test]
    fn test_opposite_directions_fold_into_one_pair() {
        let edges = vec![edge("aaa", "bbb", 1_000, 10), edge("bbb", "aaa", 2_000, 30)];
        let pairs = score_relationships(&edges, false);

        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert_eq!(pair.src, "aaa");
        assert_eq!(pair.dst, "bbb");
        assert_eq!(pair.common_transactions, 2);
        assert_eq!(pair.first_interaction_ms, 1_000);
        assert_eq!(pair.last_interaction_ms, 2_000);
        assert!((pair.relationship_score - 3.0f64.ln()).abs() < 1e-9);
        assert_eq!(pair.relationship_type, "unknown");
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = vec![edge("aaa", "bbb", 1_000, 10), edge("bbb", "aaa", 2_000, 30)];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let a = score_relationships(&forward, false);
        let b = score_relationships(&reversed, false);
        assert_eq!(a[0].common_transactions, b[0].common_transactions);
        assert_eq!(a[0].first_interaction_ms, b[0].first_interaction_ms);
        assert_eq!(a[0].last_interaction_ms, b[0].last_interaction_ms);
    }

    #[test]
    fn test_single_edge_scores_ln_two() {
        let pairs = score_relationships(&[edge("aaa", "bbb", 1_000, 10)], false);
        assert!((pairs[0].relationship_score - 2.0f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_enhanced_mode_tracks_average_gas() {
        let edges = vec![edge("aaa", "bbb", 1_000, 10), edge("aaa", "bbb", 2_000, 30)];
        let pairs = score_relationships(&edges, true);
        assert!((pairs[0].avg_gas_used - 20.0).abs() < 1e-9);

        let plain = score_relationships(&edges, false);
        assert_eq!(plain[0].avg_gas_used, 0.0);
    }
}
