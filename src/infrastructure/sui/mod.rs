pub mod client;
mod error;

pub use client::{Checkpoint, HttpSuiClient, SuiRpc};
pub use error::SuiClientError;
