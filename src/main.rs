//! `safeguard-realtime` - runs the realtime core headless.
//!
//! Loads configuration, connects with the token in `SAFEGUARD_AUTH_TOKEN`,
//! and logs notification snapshots, connection changes, and UI signals
//! until Ctrl-C.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use safeguard_realtime::adapters::{
    BroadcastSignalSink, HttpNotificationFeed, InProcessEventRegistry, TungsteniteConnector,
};
use safeguard_realtime::application::RealtimeService;
use safeguard_realtime::config::AppConfig;
use safeguard_realtime::domain::notification::IdSynthesizer;
use safeguard_realtime::ports::NotificationFeed;

const TOKEN_VAR: &str = "SAFEGUARD_AUTH_TOKEN";

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let token = std::env::var(TOKEN_VAR)
        .map(SecretString::new)
        .map_err(|_| format!("{} is not set", TOKEN_VAR))?;

    let registry = InProcessEventRegistry::new_shared();
    let signals = Arc::new(BroadcastSignalSink::with_default_capacity());
    let connector = Arc::new(TungsteniteConnector::new(config.realtime.connect_timeout()));
    let ids = Arc::new(IdSynthesizer::new(config.notifications.id_strategy));
    let feed: Arc<dyn NotificationFeed> = Arc::new(HttpNotificationFeed::new(
        config.api.base_url.clone(),
        config.api.request_timeout(),
        config.notifications.placeholders(),
        ids.clone(),
    )?);

    let service = RealtimeService::with_ids(
        &config,
        registry,
        connector,
        Some(feed),
        signals.clone(),
        ids,
    );

    let mut notifications = service.subscribe_notifications();
    let mut connection = service.subscribe_connection();
    let mut ui_signals = signals.subscribe();

    info!(
        server_url = %config.realtime.server_url,
        realtime = config.features.enable_realtime,
        "Starting realtime core"
    );
    service.start(token).await;

    loop {
        tokio::select! {
            changed = notifications.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = notifications.borrow_and_update().clone();
                info!(
                    total = snapshot.len(),
                    unread = snapshot.unread_count,
                    latest = snapshot.notifications.first().map(|n| n.title.as_str()).unwrap_or(""),
                    "Notifications changed"
                );
            }
            changed = connection.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = connection.borrow_and_update().clone();
                info!(
                    status = state.status.as_str(),
                    attempt = state.attempt,
                    error = state.last_error.as_deref().unwrap_or(""),
                    "Connection changed"
                );
            }
            signal = ui_signals.recv() => match signal {
                Ok(signal) => info!(?signal, "UI signal"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(missed)) => {
                    error!(missed, "UI signal receiver lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    service.teardown();
    Ok(())
}
