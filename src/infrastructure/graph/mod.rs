pub mod client;
mod error;
pub mod schema;
pub mod writer;

pub use client::{GatewayClient, GraphStore, QueryResult};
pub use error::GraphClientError;
pub use writer::{GraphWriter, WriteCounts};

use chrono::TimeZone;

/// Format an epoch-milliseconds timestamp as the store's
/// `datetime("YYYY-MM-DD HH:MM:SS")` literal body (UTC)
pub fn format_datetime(timestamp_ms: i64) -> String {
    match chrono::Utc.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "1970-01-01 00:00:00".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime_epoch() {
        assert_eq!(format_datetime(0), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_datetime_drops_millis() {
        assert_eq!(format_datetime(86_400_500), "1970-01-02 00:00:00");
    }
}
