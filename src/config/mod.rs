use dotenv::dotenv;
use std::env;

/// Configuration for the Sui full node client
#[derive(Debug, Clone)]
pub struct SuiConfig {
    /// Full node JSON-RPC URL
    pub rpc_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Configuration for the graph store gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL
    pub url: String,
    /// Graph space that holds the wallet graph
    pub space: String,
}

/// Configuration for the collector
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Number of most-recent checkpoints to ingest per run
    pub checkpoint_count: u64,
    /// Whether to fetch per-wallet balance/object/contract enrichment
    pub enhanced_mode: bool,
    /// Maximum number of most-active wallets to enrich in enhanced mode
    pub top_wallets_limit: usize,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Sui client configuration
    pub sui: SuiConfig,
    /// Graph gateway configuration
    pub gateway: GatewayConfig,
    /// Collector configuration
    pub collector: CollectorConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        // Ensure .env file is loaded
        dotenv().ok();

        let sui_config = SuiConfig {
            rpc_url: env::var("SUI_RPC_URL")
                .unwrap_or_else(|_| "https://fullnode.mainnet.sui.io:443".to_string()),
            timeout_secs: env::var("RPC_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .unwrap_or(30),
        };

        let gateway_config = GatewayConfig {
            url: env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:3002".to_string()),
            space: env::var("GRAPH_SPACE").unwrap_or_else(|_| "sui_analysis".to_string()),
        };

        let collector_config = CollectorConfig {
            checkpoint_count: env::var("CHECKPOINT_COUNT")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u64>()
                .unwrap_or(10),
            enhanced_mode: env::var("ENHANCED_MODE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            top_wallets_limit: env::var("TOP_WALLETS_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse::<usize>()
                .unwrap_or(20),
        };

        Self {
            sui: sui_config,
            gateway: gateway_config,
            collector: collector_config,
        }
    }

    /// Build the per-run configuration from the loaded defaults
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            checkpoint_count: self.collector.checkpoint_count,
            rpc_url: self.sui.rpc_url.clone(),
            enhanced_mode: self.collector.enhanced_mode,
        }
    }
}

/// Parameters for a single collection run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// How many most-recent checkpoints, ending at the chain head, to ingest
    pub checkpoint_count: u64,
    /// Full node URL the run reads from
    pub rpc_url: String,
    /// Whether this run performs top-N wallet enrichment
    pub enhanced_mode: bool,
}
