//! stakepool-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use stakepool_gateway::api;
use stakepool_gateway::app_state::AppState;
use stakepool_gateway::config::GatewayConfig;
use stakepool_gateway::domain::EventBus;
use stakepool_gateway::logging;
use stakepool_gateway::service::LedgerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env()?;
    logging::init(config.log_format)?;
    tracing::info!(addr = %config.listen_addr, "starting stakepool-gateway");

    // Build service layer
    let event_bus = EventBus::new(config.event_bus_capacity);
    let ledger_service =
        LedgerService::shared(config.admin_address, config.registry_address, event_bus);
    tracing::info!(
        admin = %config.admin_address,
        registry = %config.registry_address,
        "ledger initialised"
    );

    if config.auto_bind_registry {
        ledger_service
            .bind_registry(&config.admin_address, config.registry_address)
            .await?;
    }

    let app = api::build_app(AppState::new(ledger_service), config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
