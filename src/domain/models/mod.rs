pub mod address;
pub mod relationship;
pub mod transfer;
pub mod wallet;

// Re-export models for direct imports
pub use address::{normalize_address, is_valid_vid, VID_LEN};
pub use relationship::RelationshipPair;
pub use transfer::{RecipientRef, TransferEdge, TransferKind};
pub use wallet::Wallet;
