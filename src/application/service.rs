//! RealtimeService - the process-wide realtime core.
//!
//! Constructed once at startup and passed by reference to every consumer.
//! It owns the connection manager, the adapter registrations, and the
//! notification store, and offers a single `teardown` for logout and tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::connection::ConnectionState;
use crate::domain::notification::{IdSynthesizer, NotificationSnapshot, NotificationStore};
use crate::ports::{
    Connector, EventBus, EventSubscriber, FeedError, NotificationFeed, UiSignalSink,
};

use super::connection_manager::{ConnectionConfig, ConnectionManager};
use super::handlers::{register_domain_adapters, AdapterContext, AdapterRegistrations};

/// Settings the service needs from [`AppConfig`].
#[derive(Debug, Clone)]
struct ServiceSettings {
    server_url: String,
    enable_realtime: bool,
    page_size: u32,
    max_pages: u32,
}

/// Realtime event distribution and notification state, as one object.
pub struct RealtimeService {
    settings: ServiceSettings,
    subscriber: Arc<dyn EventSubscriber>,
    signals: Arc<dyn UiSignalSink>,
    feed: Option<Arc<dyn NotificationFeed>>,
    ctx: AdapterContext,
    connection: ConnectionManager,
    registrations: Mutex<Option<AdapterRegistrations>>,
}

impl RealtimeService {
    /// Builds the service from configuration and its outer collaborators.
    ///
    /// `bus` is both the sink the connection manager emits into and the
    /// registry the domain adapters subscribe to. Without a `feed` the REST
    /// bootstrap is skipped.
    pub fn new<B>(
        config: &AppConfig,
        bus: Arc<B>,
        connector: Arc<dyn Connector>,
        feed: Option<Arc<dyn NotificationFeed>>,
        signals: Arc<dyn UiSignalSink>,
    ) -> Self
    where
        B: EventBus + 'static,
    {
        let ids = Arc::new(IdSynthesizer::new(config.notifications.id_strategy));
        Self::with_ids(config, bus, connector, feed, signals, ids)
    }

    /// Like [`new`](Self::new), but adapters synthesize IDs through `ids`.
    ///
    /// Pass the same synthesizer the REST feed was built with.
    pub fn with_ids<B>(
        config: &AppConfig,
        bus: Arc<B>,
        connector: Arc<dyn Connector>,
        feed: Option<Arc<dyn NotificationFeed>>,
        signals: Arc<dyn UiSignalSink>,
        ids: Arc<IdSynthesizer>,
    ) -> Self
    where
        B: EventBus + 'static,
    {
        let store = NotificationStore::new_shared(config.notifications.dedup_policy());
        let ctx = AdapterContext::new(store, ids, config.notifications.placeholders())
            .with_notifications_enabled(config.features.enable_notifications);

        let connection = ConnectionManager::new(
            connector,
            bus.clone(),
            ConnectionConfig {
                reconnect: config.realtime.reconnect_policy(),
                heartbeat_interval: config.realtime.heartbeat_interval(),
            },
        );

        Self {
            settings: ServiceSettings {
                server_url: config.realtime.server_url.clone(),
                enable_realtime: config.features.enable_realtime,
                page_size: config.api.page_size,
                max_pages: config.api.max_pages,
            },
            subscriber: bus,
            signals,
            feed,
            ctx,
            connection,
            registrations: Mutex::new(None),
        }
    }

    fn registrations(&self) -> MutexGuard<'_, Option<AdapterRegistrations>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers the domain adapters, loads the initial notification list,
    /// then opens the push connection (unless realtime is disabled).
    ///
    /// Calling `start` again re-authenticates and reconnects without
    /// registering the adapters twice.
    pub async fn start(&self, token: SecretString) {
        {
            let mut registrations = self.registrations();
            if registrations.is_none() {
                *registrations = Some(register_domain_adapters(
                    Arc::clone(&self.subscriber),
                    self.ctx.clone(),
                    Arc::clone(&self.signals),
                ));
            }
        }

        if let Err(e) = self.bootstrap_notifications(&token).await {
            warn!(error = %e, "Notification bootstrap failed, continuing with realtime only");
        }

        if self.settings.enable_realtime {
            self.connection.connect(self.settings.server_url.clone(), token);
        } else {
            info!("Realtime disabled, running REST-only");
        }
    }

    /// Fetches the initial notification list and feeds it into the store.
    ///
    /// Pages are fetched until the server reports no more or `max_pages` is
    /// reached. Entries go through the same dedup rules as realtime ones.
    /// Any failure leaves the store untouched. Returns how many were added.
    pub async fn bootstrap_notifications(&self, token: &SecretString) -> Result<usize, FeedError> {
        let Some(feed) = &self.feed else {
            return Ok(0);
        };
        if !self.ctx.notifications_enabled() {
            return Ok(0);
        }

        let mut items = Vec::new();
        for page in 1..=self.settings.max_pages {
            let fetched = feed.fetch_page(token, page, self.settings.page_size).await?;
            let has_more = fetched.has_more();
            items.extend(fetched.items);
            if !has_more {
                break;
            }
        }

        let fetched = items.len();
        let added = self.ctx.store().add_many(items);
        info!(fetched, added, "Bootstrapped notifications");
        Ok(added)
    }

    /// Replaces the token used for the next reconnection.
    pub fn update_auth_token(&self, token: SecretString) {
        self.connection.update_auth_token(token);
    }

    /// Closes the push connection and cancels pending reconnection.
    pub fn disconnect(&self) {
        self.connection.disconnect();
    }

    /// Disconnects, unregisters every adapter, and clears the store.
    ///
    /// Leaves the service ready for another `start` (e.g. after re-login).
    pub fn teardown(&self) {
        self.connection.disconnect();
        let removed = self
            .registrations()
            .take()
            .map(|mut registrations| registrations.unregister())
            .unwrap_or(0);
        let cleared = self.ctx.store().clear();
        info!(listeners = removed, notifications = cleared, "Realtime core torn down");
    }

    pub fn store(&self) -> &Arc<NotificationStore> {
        self.ctx.store()
    }

    pub fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn subscribe_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection.subscribe_state()
    }

    pub fn subscribe_notifications(&self) -> watch::Receiver<Arc<NotificationSnapshot>> {
        self.ctx.store().subscribe()
    }

    /// True between `start` and `teardown`.
    pub fn is_started(&self) -> bool {
        self.registrations().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::events::InProcessEventRegistry;
    use crate::adapters::signals::BroadcastSignalSink;
    use crate::domain::connection::ConnectionStatus;
    use crate::domain::foundation::{names, RealtimeEvent};
    use crate::domain::notification::{IdStrategy, Notification};
    use crate::ports::{
        ConnectRequest, EventPublisher, NotificationPage, TransportError, TransportSession,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RefusingConnector {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Connector for RefusingConnector {
        async fn connect(
            &self,
            _request: &ConnectRequest,
        ) -> Result<Box<dyn TransportSession>, TransportError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::ConnectFailed("refused".into()))
        }
    }

    /// Serves `pages` pages of two notifications each, or fails on `fail_on`.
    struct PagedFeed {
        pages: u32,
        fail_on: Option<u32>,
        requests: AtomicUsize,
    }

    #[async_trait]
    impl NotificationFeed for PagedFeed {
        async fn fetch_page(
            &self,
            _token: &SecretString,
            page: u32,
            _limit: u32,
        ) -> Result<NotificationPage, FeedError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(page) {
                return Err(FeedError::Status(503));
            }
            let items = (0..2)
                .map(|i| {
                    Notification::new(format!("p{}-{}", page, i), format!("T{}{}", page, i), "")
                })
                .collect();
            Ok(NotificationPage {
                items,
                page,
                total_pages: self.pages,
            })
        }
    }

    fn service(
        config: AppConfig,
        feed: Option<Arc<PagedFeed>>,
    ) -> (RealtimeService, Arc<InProcessEventRegistry>) {
        let registry = InProcessEventRegistry::new_shared();
        let service = RealtimeService::new(
            &config,
            registry.clone(),
            Arc::new(RefusingConnector {
                attempts: AtomicUsize::new(0),
            }),
            feed.map(|f| f as Arc<dyn NotificationFeed>),
            Arc::new(BroadcastSignalSink::default()),
        );
        (service, registry)
    }

    fn paged(pages: u32, fail_on: Option<u32>) -> Arc<PagedFeed> {
        Arc::new(PagedFeed {
            pages,
            fail_on,
            requests: AtomicUsize::new(0),
        })
    }

    fn token() -> SecretString {
        SecretString::new("t".to_string())
    }

    #[tokio::test]
    async fn bootstrap_stops_at_last_page() {
        let feed = paged(2, None);
        let (service, _) = service(AppConfig::default(), Some(feed.clone()));

        let added = service.bootstrap_notifications(&token()).await.unwrap();

        assert_eq!(added, 4);
        assert_eq!(feed.requests.load(Ordering::SeqCst), 2);
        let snapshot = service.store().snapshot();
        assert_eq!(snapshot.notifications[0].id.as_str(), "p1-0");
        assert_eq!(snapshot.notifications[3].id.as_str(), "p2-1");
    }

    #[tokio::test]
    async fn bootstrap_respects_max_pages() {
        let feed = paged(10, None);
        let (service, _) = service(AppConfig::default(), Some(feed.clone()));

        service.bootstrap_notifications(&token()).await.unwrap();

        assert_eq!(feed.requests.load(Ordering::SeqCst), 4);
        assert_eq!(service.store().len(), 8);
    }

    #[tokio::test]
    async fn failed_bootstrap_leaves_store_untouched() {
        let (service, _) = service(AppConfig::default(), Some(paged(3, Some(2))));

        let result = service.bootstrap_notifications(&token()).await;

        assert!(matches!(result, Err(FeedError::Status(503))));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn rest_only_mode_never_connects() {
        let mut config = AppConfig::default();
        config.features.enable_realtime = false;
        let (service, registry) = service(config, Some(paged(1, None)));

        service.start(token()).await;

        assert!(service.is_started());
        assert_eq!(service.store().len(), 2);
        assert_eq!(service.connection_state().status, ConnectionStatus::Disconnected);
        assert!(registry.listener_count(names::INCIDENT_REPORTED) > 0);
    }

    #[tokio::test]
    async fn start_twice_does_not_duplicate_adapters() {
        let mut config = AppConfig::default();
        config.features.enable_realtime = false;
        let (service, registry) = service(config, None);

        service.start(token()).await;
        let listeners = registry.total_listeners();
        service.start(token()).await;

        assert_eq!(registry.total_listeners(), listeners);
    }

    #[tokio::test]
    async fn teardown_resets_everything() {
        let mut config = AppConfig::default();
        config.features.enable_realtime = false;
        let (service, registry) = service(config, Some(paged(1, None)));
        service.start(token()).await;

        service.teardown();

        assert!(!service.is_started());
        assert!(service.store().is_empty());
        assert_eq!(registry.total_listeners(), 0);

        registry.emit(RealtimeEvent::new(
            names::INCIDENT_REPORTED,
            json!({"incident": {"title": "Late"}}),
        ));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn disabled_notifications_skip_bootstrap_and_adapters() {
        let mut config = AppConfig::default();
        config.features.enable_realtime = false;
        config.features.enable_notifications = false;
        let feed = paged(1, None);
        let (service, registry) = service(config, Some(feed.clone()));
        service.start(token()).await;

        registry.emit(RealtimeEvent::new(
            names::INCIDENT_REPORTED,
            json!({"incident": {"title": "Fire"}}),
        ));

        assert_eq!(feed.requests.load(Ordering::SeqCst), 0);
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn adapters_use_injected_id_synthesizer() {
        let mut config = AppConfig::default();
        config.features.enable_realtime = false;
        let ids = Arc::new(IdSynthesizer::new(IdStrategy::EntityScoped));
        let registry = InProcessEventRegistry::new_shared();
        let service = RealtimeService::with_ids(
            &config,
            registry.clone(),
            Arc::new(RefusingConnector {
                attempts: AtomicUsize::new(0),
            }),
            None,
            Arc::new(BroadcastSignalSink::default()),
            ids.clone(),
        );
        service.start(token()).await;

        registry.emit(RealtimeEvent::new(
            names::INCIDENT_REPORTED,
            json!({"incident": {"_id": "i7", "title": "Spill"}}),
        ));

        assert!(std::ptr::eq(service.ctx.ids(), &*ids));
        let snapshot = service.store().snapshot();
        assert_eq!(snapshot.notifications[0].id.as_str(), "incident_reported-i7");
    }
}
