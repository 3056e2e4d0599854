//! Graph space and schema definition
//!
//! Every run starts by destroying and recreating the space, so the stored
//! graph always reflects exactly one ingestion window. Creation statements
//! are idempotent; the drop is what makes the run destructive.

use std::time::Duration;
use tokio::time::sleep;

use crate::application::progress::ProgressReporter;
use crate::domain::errors::CollectorError;
use crate::infrastructure::graph::client::GraphStore;

/// How long a freshly created space needs before schema statements land
pub const SPACE_WARMUP: Duration = Duration::from_secs(3);

pub fn drop_space_stmt(space: &str) -> String {
    format!("DROP SPACE IF EXISTS {}", space)
}

pub fn create_space_stmt(space: &str) -> String {
    format!(
        "CREATE SPACE IF NOT EXISTS {} (partition_num = 10, replica_factor = 1, \
         vid_type = FIXED_STRING(64))",
        space
    )
}

pub fn create_wallet_tag_stmt(space: &str, enhanced: bool) -> String {
    if enhanced {
        format!(
            "USE {}; CREATE TAG IF NOT EXISTS wallet (address string NOT NULL, \
             first_seen datetime, last_seen datetime, transaction_count int DEFAULT 0, \
             total_amount double DEFAULT 0.0, is_contract bool DEFAULT false, \
             sui_balance double DEFAULT 0.0, owned_objects_count int DEFAULT 0, \
             last_activity datetime)",
            space
        )
    } else {
        format!(
            "USE {}; CREATE TAG IF NOT EXISTS wallet (address string NOT NULL, \
             first_seen datetime, last_seen datetime, transaction_count int DEFAULT 0, \
             total_amount double DEFAULT 0.0, is_contract bool DEFAULT false)",
            space
        )
    }
}

pub fn create_transaction_edge_stmt(space: &str, enhanced: bool) -> String {
    if enhanced {
        format!(
            "USE {}; CREATE EDGE IF NOT EXISTS transaction (amount double NOT NULL, \
             tx_timestamp datetime NOT NULL, tx_hash string NOT NULL, \
             gas_used int DEFAULT 0, success bool DEFAULT true, \
             transaction_type string DEFAULT 'unknown')",
            space
        )
    } else {
        format!(
            "USE {}; CREATE EDGE IF NOT EXISTS transaction (amount double NOT NULL, \
             tx_timestamp datetime NOT NULL, tx_hash string NOT NULL, \
             gas_used int DEFAULT 0, success bool DEFAULT true)",
            space
        )
    }
}

pub fn create_related_to_edge_stmt(space: &str, enhanced: bool) -> String {
    if enhanced {
        format!(
            "USE {}; CREATE EDGE IF NOT EXISTS related_to (relationship_score double \
             NOT NULL, common_transactions int DEFAULT 0, total_amount double DEFAULT 0.0, \
             first_interaction datetime, last_interaction datetime, \
             relationship_type string DEFAULT \"unknown\", avg_gas_used double DEFAULT 0.0)",
            space
        )
    } else {
        format!(
            "USE {}; CREATE EDGE IF NOT EXISTS related_to (relationship_score double \
             NOT NULL, common_transactions int DEFAULT 0, total_amount double DEFAULT 0.0, \
             first_interaction datetime, last_interaction datetime, \
             relationship_type string DEFAULT \"unknown\")",
            space
        )
    }
}

/// Destroy and recreate the space, then define the wallet tag and the two
/// edge types. Any failure here is fatal for the run.
pub async fn initialize_schema<S: GraphStore>(
    store: &S,
    space: &str,
    enhanced: bool,
    warmup: Duration,
    reporter: &ProgressReporter,
) -> Result<(), CollectorError> {
    reporter.info("Reinitializing graph space...");

    store
        .execute(&drop_space_stmt(space))
        .await
        .map_err(|e| CollectorError::SchemaError(e.to_string()))?;
    reporter.info("Dropped previous graph space");

    store
        .execute(&create_space_stmt(space))
        .await
        .map_err(|e| CollectorError::SchemaError(e.to_string()))?;
    reporter.info("Created graph space");

    reporter.info("Waiting for graph space to come online...");
    sleep(warmup).await;

    store
        .execute(&create_wallet_tag_stmt(space, enhanced))
        .await
        .map_err(|e| CollectorError::SchemaError(e.to_string()))?;
    reporter.info(&format!(
        "Created wallet tag ({} mode)",
        if enhanced { "enhanced" } else { "standard" }
    ));

    store
        .execute(&create_transaction_edge_stmt(space, enhanced))
        .await
        .map_err(|e| CollectorError::SchemaError(e.to_string()))?;
    reporter.info("Created transaction edge type");

    store
        .execute(&create_related_to_edge_stmt(space, enhanced))
        .await
        .map_err(|e| CollectorError::SchemaError(e.to_string()))?;
    reporter.info("Created related_to edge type");

    reporter.success("Graph space initialization complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_statements_are_guarded() {
        for stmt in [
            create_space_stmt("sui_analysis"),
            create_wallet_tag_stmt("sui_analysis", false),
            create_wallet_tag_stmt("sui_analysis", true),
            create_transaction_edge_stmt("sui_analysis", false),
            create_related_to_edge_stmt("sui_analysis", true),
        ] {
            assert!(stmt.contains("IF NOT EXISTS"), "unguarded: {}", stmt);
        }
    }

    #[test]
    fn test_space_uses_fixed_width_vids() {
        assert!(create_space_stmt("sui_analysis").contains("FIXED_STRING(64)"));
    }

    #[test]
    fn test_enhanced_schema_adds_enrichment_fields() {
        assert!(create_wallet_tag_stmt("s", true).contains("sui_balance"));
        assert!(!create_wallet_tag_stmt("s", false).contains("sui_balance"));
        assert!(create_transaction_edge_stmt("s", true).contains("transaction_type"));
        assert!(create_related_to_edge_stmt("s", true).contains("avg_gas_used"));
    }
}
