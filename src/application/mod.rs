pub mod collector;
pub mod progress;
