use serde::{Deserialize, Serialize};

/// Derived aggregate of all transfers between two addresses,
/// irrespective of direction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipPair {
    /// Lexicographically smaller address of the pair
    pub src: String,

    /// Lexicographically larger address of the pair
    pub dst: String,

    /// `ln(common_transactions + 1)`, monotonic and unnormalized
    pub relationship_score: f64,

    /// Number of transfer edges folded into the pair
    pub common_transactions: u64,

    /// Sum of folded edge amounts
    pub total_amount: f64,

    /// Earliest folded edge timestamp (epoch ms)
    pub first_interaction_ms: i64,

    /// Latest folded edge timestamp (epoch ms)
    pub last_interaction_ms: i64,

    /// Classification left to downstream consumers
    pub relationship_type: String,

    /// Mean gas cost of the folded edges (enhanced mode only)
    pub avg_gas_used: f64,
}

impl RelationshipPair {
    /// Canonical unordered key for a pair of addresses, so `A -> B` and
    /// `B -> A` fold into one record
    pub fn canonical_key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_key_is_direction_independent() {
        assert_eq!(
            RelationshipPair::canonical_key("bbb", "aaa"),
            RelationshipPair::canonical_key("aaa", "bbb")
        );
    }
}
