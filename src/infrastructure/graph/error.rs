use std::error::Error;
use std::fmt;

/// Represents errors that can occur talking to the graph gateway
#[derive(Debug, Clone)]
pub enum GraphClientError {
    /// Transport-level failure reaching the gateway
    NetworkError(String),
    /// Gateway answered with a non-success HTTP status
    ResponseError(String),
    /// Gateway accepted the request but the query itself failed
    QueryError(String),
}

impl fmt::Display for GraphClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphClientError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            GraphClientError::ResponseError(msg) => write!(f, "Gateway response error: {}", msg),
            GraphClientError::QueryError(msg) => write!(f, "Query error: {}", msg),
        }
    }
}

impl Error for GraphClientError {}
