use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::address::normalize_address;

/// The two command shapes the pipeline recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferKind {
    /// `TransferObjects` command: move owned objects to a recipient
    TransferObjects,
    /// `TransferSui` command: move native coin to a recipient
    TransferSui,
}

impl TransferKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::TransferObjects => "TransferObjects",
            TransferKind::TransferSui => "TransferSui",
        }
    }
}

/// How a transfer command addresses its recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientRef {
    /// Address embedded directly in the command argument
    Literal(String),
    /// Reference into the transaction's input table
    InputIndex(usize),
}

impl RecipientRef {
    /// Parse a command argument into a recipient reference.
    /// Anything that is neither an `AddressOwner` literal nor an `Input`
    /// index is not a recipient we can resolve.
    pub fn parse(arg: &Value) -> Option<Self> {
        if let Some(idx) = arg.get("Input").and_then(Value::as_u64) {
            return Some(RecipientRef::InputIndex(idx as usize));
        }
        if let Some(addr) = arg.get("AddressOwner").and_then(Value::as_str) {
            return Some(RecipientRef::Literal(addr.to_string()));
        }
        None
    }

    /// Resolve the reference to a normalized address against the
    /// transaction's input table
    pub fn resolve(&self, inputs: &[Value]) -> Option<String> {
        let raw = match self {
            RecipientRef::Literal(addr) => Some(addr.clone()),
            RecipientRef::InputIndex(idx) => inputs
                .get(*idx)
                .and_then(|input| input.get("value"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }?;
        Some(normalize_address(&raw))
    }
}

/// One directed transfer event extracted from a transaction command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferEdge {
    /// Normalized sender address
    pub src: String,

    /// Normalized recipient address, never equal to `src`
    pub dst: String,

    /// Transfer value (always 0.0, see `Wallet::total_amount`)
    pub amount: f64,

    /// Checkpoint timestamp of the containing transaction (epoch ms)
    pub timestamp_ms: i64,

    /// Digest of the source transaction
    pub tx_hash: String,

    /// Computation cost from the transaction's effects
    pub gas_used: u64,

    /// Whether the transaction executed successfully
    pub success: bool,

    /// Which command shape produced this edge
    pub kind: TransferKind,
}
