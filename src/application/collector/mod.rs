pub mod crawler;
pub mod enrichment;
pub mod orchestrator;

pub use orchestrator::{CancelHandle, Collector, CollectorState};
