use std::error::Error;
use std::fmt;

/// Represents errors that can occur talking to the Sui full node
#[derive(Debug, Clone)]
pub enum SuiClientError {
    /// Transport-level failure reaching the node
    NetworkError(String),
    /// Response could not be decoded into the expected shape
    ParseError(String),
    /// The node answered with an explicit JSON-RPC error
    RpcError { method: String, message: String },
}

impl fmt::Display for SuiClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiClientError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            SuiClientError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            SuiClientError::RpcError { method, message } => {
                write!(f, "RPC error from {}: {}", method, message)
            }
        }
    }
}

impl Error for SuiClientError {}
