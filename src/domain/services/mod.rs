pub mod aggregator;
pub mod relationship_scorer;
pub mod transfer_decoder;

// Re-export services for direct imports
pub use aggregator::Aggregator;
pub use relationship_scorer::score_relationships;
pub use transfer_decoder::{extract_transfers, DecodeOutcome};
