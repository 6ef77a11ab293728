use metrics_exporter_prometheus::PrometheusHandle;
use receipt_points::config::{IdStrategy, ReceiptsConfig};
use receipt_points::receipts::{
    IdGenerator, InMemoryReceiptStore, SequentialIdGenerator, UuidIdGenerator,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Store whose identifier strategy is picked from configuration.
pub(crate) type ConfiguredStore = InMemoryReceiptStore<Box<dyn IdGenerator>>;

pub(crate) fn build_store(config: &ReceiptsConfig) -> ConfiguredStore {
    let ids: Box<dyn IdGenerator> = match config.id_strategy {
        IdStrategy::Uuid => Box::new(UuidIdGenerator),
        IdStrategy::Sequential => Box::new(SequentialIdGenerator::default()),
    };
    InMemoryReceiptStore::new(ids)
}

/// Resolves once SIGINT or SIGTERM arrives.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}
