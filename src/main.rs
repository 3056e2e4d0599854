use std::sync::Arc;

use sui_graph_indexer::application::collector::Collector;
use sui_graph_indexer::application::progress::ProgressKind;
use sui_graph_indexer::config::AppConfig;
use sui_graph_indexer::infrastructure::graph::GatewayClient;
use sui_graph_indexer::infrastructure::sui::HttpSuiClient;
use sui_graph_indexer::utils::logging;

#[tokio::main]
async fn main() {
    logging::init_logger();

    let config = AppConfig::from_env();

    let rpc = match HttpSuiClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logging::log_error(&format!("Failed to create Sui client: {}", e));
            std::process::exit(1);
        }
    };

    let store = match GatewayClient::new(&config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            logging::log_error(&format!("Failed to create gateway client: {}", e));
            std::process::exit(1);
        }
    };

    let run = config.run_config();
    let collector = Collector::new(rpc, store, config);

    // Events are mirrored to the log by the reporter; the loop here only
    // watches for the terminal record
    let (mut receiver, cancel) = collector.start(run);

    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logging::log_warning("Interrupt received, stopping collection...");
            cancel_on_signal.cancel();
        }
    });

    let mut completed = false;
    while let Some(event) = receiver.recv().await {
        if event.kind == ProgressKind::Complete {
            completed = true;
        }
    }

    if !completed {
        std::process::exit(1);
    }
}
