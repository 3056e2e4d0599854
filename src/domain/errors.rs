use std::error::Error;
use std::fmt;

use crate::infrastructure::graph::GraphClientError;
use crate::infrastructure::sui::SuiClientError;

/// Error type for collection runs
#[derive(Debug)]
pub enum CollectorError {
    /// Sui full node call failed
    SuiClientError(SuiClientError),
    /// Graph gateway call failed
    GraphClientError(GraphClientError),
    /// Graph space or schema (re)creation failed; this is the one fatal
    /// failure class in the pipeline
    SchemaError(String),
    /// Another run already holds the store
    RunInProgress,
    /// The run was cancelled through its handle
    Cancelled,
    /// Internal processing error
    ProcessingError(String),
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectorError::SuiClientError(e) => write!(f, "Sui client error: {}", e),
            CollectorError::GraphClientError(e) => write!(f, "Graph client error: {}", e),
            CollectorError::SchemaError(msg) => write!(f, "Schema initialization error: {}", msg),
            CollectorError::RunInProgress => {
                write!(f, "A collection run is already in progress")
            }
            CollectorError::Cancelled => write!(f, "Collection run cancelled"),
            CollectorError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for CollectorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CollectorError::SuiClientError(e) => Some(e),
            CollectorError::GraphClientError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SuiClientError> for CollectorError {
    fn from(error: SuiClientError) -> Self {
        CollectorError::SuiClientError(error)
    }
}

impl From<GraphClientError> for CollectorError {
    fn from(error: GraphClientError) -> Self {
        CollectorError::GraphClientError(error)
    }
}
