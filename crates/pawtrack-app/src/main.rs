use std::sync::Arc;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use pawtrack_app::api::routes;
use pawtrack_app::config::ConfigHandler;
use pawtrack_app::state::{Services, ServicesHandler};
use pawtrack_core::config::load_config;
use pawtrack_service::access::OpenAccessGate;
use pawtrack_service::calendar::CalendarAggregator;
use pawtrack_service::reminder::ReminderLifecycle;
use pawtrack_store::memory::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Pawtrack reminder/calendar server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let store = MemoryStore::new();
    let gate = Arc::new(OpenAccessGate);

    let services = Arc::new(Services {
        reminders: ReminderLifecycle::new(Arc::new(store.clone()), gate.clone()),
        calendar: CalendarAggregator::new(Arc::new(store.clone()), Arc::new(store.clone()), gate),
        todos: Arc::new(store),
    });

    let bind_addr = config.server.bind_addr();
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: config.clone(),
        })
        .hoop(ServicesHandler { services })
        .push(routes());

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}
