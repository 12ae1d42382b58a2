//! ConnectionManager - owns the single physical push connection.
//!
//! Drives `Disconnected → Connecting → Connected`, reconnects with linear
//! backoff up to the policy's bound, and reports every transition through
//! the event registry as `connection_status` (plus `connection_error` or
//! `auth_error` on failures). It never touches the store or the UI.
//!
//! # Cancellation
//!
//! Each `connect` starts a new *generation*. `disconnect` bumps the
//! generation synchronously; the background task checks it before every
//! emit and every reconnect, so a pending backoff timer can never resurrect
//! a connection. A superseded task closes its session (sending a close
//! frame) and exits, and the next generation waits for that before opening
//! a new session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::connection::{ConnectionState, ConnectionStatus, ReconnectPolicy};
use crate::domain::foundation::{names, RealtimeEvent, StateMachine};
use crate::ports::{ConnectRequest, Connector, EventPublisher, TransportError, TransportSession};

/// Upper bound on waiting for a superseded session to close.
const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Manager settings.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub reconnect: ReconnectPolicy,
    pub heartbeat_interval: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            reconnect: ReconnectPolicy::default(),
            heartbeat_interval: Duration::from_secs(25),
        }
    }
}

struct Inner {
    generation: u64,
    server_url: Option<String>,
    token: Option<SecretString>,
    task: Option<JoinHandle<()>>,
}

struct Shared {
    connector: Arc<dyn Connector>,
    publisher: Arc<dyn EventPublisher>,
    config: ConnectionConfig,
    inner: Mutex<Inner>,
    /// Mirrors `Inner::generation` so tasks can await being superseded.
    generations: watch::Sender<u64>,
    state: watch::Sender<ConnectionState>,
}

/// Owner of the push connection.
///
/// # Example
///
/// ```ignore
/// let manager = ConnectionManager::new(connector, registry.clone(), ConnectionConfig::default());
/// manager.connect("wss://push.example.com/ws", token);
/// // ...
/// manager.update_auth_token(refreshed);
/// manager.disconnect();
/// ```
pub struct ConnectionManager {
    shared: Arc<Shared>,
}

impl ConnectionManager {
    pub fn new(
        connector: Arc<dyn Connector>,
        publisher: Arc<dyn EventPublisher>,
        config: ConnectionConfig,
    ) -> Self {
        let (state, _) = watch::channel(ConnectionState::default());
        let (generations, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                connector,
                publisher,
                config,
                inner: Mutex::new(Inner {
                    generation: 0,
                    server_url: None,
                    token: None,
                    task: None,
                }),
                generations,
                state,
            }),
        }
    }

    /// Tears down any existing connection, then connects to `server_url`.
    ///
    /// Returns immediately; progress is reported through `connection_status`
    /// events and [`subscribe_state`](Self::subscribe_state). Must be called
    /// from within a tokio runtime.
    pub fn connect(&self, server_url: impl Into<String>, token: SecretString) {
        let server_url = server_url.into();
        let (generation, previous) = {
            let mut inner = self.shared.lock();
            let generation = self.shared.advance(&mut inner);
            inner.server_url = Some(server_url.clone());
            inner.token = Some(token);
            (generation, inner.task.take())
        };
        info!(server_url = %server_url, generation, "Connecting");

        let was_live = self.shared.reset_state();
        if was_live {
            self.shared.emit_status(&self.state());
        }

        let mut inner = self.shared.lock();
        // A disconnect or newer connect may have raced us; the previous task
        // then exits on its own.
        if inner.generation == generation {
            inner.task = Some(tokio::spawn(Shared::run(
                Arc::clone(&self.shared),
                generation,
                previous,
            )));
        }
    }

    /// Closes the connection and cancels any pending reconnection.
    ///
    /// No automatic reconnection happens until `connect` is called again.
    pub fn disconnect(&self) {
        let had_task = {
            let mut inner = self.shared.lock();
            self.shared.advance(&mut inner);
            // The task sees the new generation, closes its session and exits
            inner.task.take().is_some()
        };

        let was_live = self.shared.reset_state();
        if had_task || was_live {
            info!("Disconnected");
        }
        if was_live {
            self.shared.emit_status(&self.state());
        }
    }

    /// Replaces the token used for future (re)connections.
    ///
    /// A live connection is left untouched.
    pub fn update_auth_token(&self, token: SecretString) {
        self.shared.lock().token = Some(token);
        debug!("Auth token updated");
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.borrow().is_connected
    }

    /// Server URL of the most recent `connect`.
    pub fn server_url(&self) -> Option<String> {
        self.shared.lock().server_url.clone()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        let mut inner = self.shared.lock();
        self.shared.advance(&mut inner);
        inner.task = None;
    }
}

async fn close_gracefully(session: &mut Box<dyn TransportSession>) {
    if tokio::time::timeout(CLOSE_GRACE, session.close()).await.is_err() {
        debug!("Timed out closing superseded session");
    }
}

/// Why a session ended.
enum SessionEnd {
    /// This generation was superseded; stop quietly.
    Superseded,
    Failed(TransportError),
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Starts a new generation. Called with the lock held.
    fn advance(&self, inner: &mut Inner) -> u64 {
        inner.generation += 1;
        self.generations.send_replace(inner.generation);
        inner.generation
    }

    /// Resolves once `generation` is no longer current.
    async fn superseded(&self, generation: u64) {
        let mut generations = self.generations.subscribe();
        // Errs only if the sender is gone, which means stop as well
        let _ = generations.wait_for(|current| *current != generation).await;
    }

    /// Back to a fresh `Disconnected` state. Returns true if the status was
    /// anything else.
    fn reset_state(&self) -> bool {
        let mut was_live = false;
        self.state.send_modify(|state| {
            was_live = state.status != ConnectionStatus::Disconnected;
            *state = ConnectionState::default();
        });
        was_live
    }

    /// Applies `update` if `generation` is still current, returning the new state.
    fn update_state<F>(&self, generation: u64, update: F) -> Option<ConnectionState>
    where
        F: FnOnce(&mut ConnectionState),
    {
        let inner = self.lock();
        if inner.generation != generation {
            return None;
        }
        let mut next = None;
        self.state.send_modify(|state| {
            update(state);
            next = Some(state.clone());
        });
        next
    }

    /// Validated status transition for `generation`.
    fn transition(&self, generation: u64, to: ConnectionStatus) -> Option<ConnectionState> {
        let from = self.state.borrow().status;
        if let Err(e) = from.transition_to(to) {
            warn!(error = %e, "Ignoring invalid connection transition");
            return None;
        }
        self.update_state(generation, |state| *state = state.with_status(to))
    }

    fn request_for(&self, generation: u64) -> Option<ConnectRequest> {
        let inner = self.lock();
        if inner.generation != generation {
            return None;
        }
        Some(ConnectRequest {
            server_url: inner.server_url.clone()?,
            auth_token: inner.token.clone()?,
        })
    }

    fn emit_status(&self, state: &ConnectionState) {
        self.publisher.emit(RealtimeEvent::new(
            names::CONNECTION_STATUS,
            json!({
                "status": state.status.as_str(),
                "isConnected": state.is_connected,
                "attempt": state.attempt,
            }),
        ));
    }

    async fn run(shared: Arc<Shared>, generation: u64, previous: Option<JoinHandle<()>>) {
        if let Some(previous) = previous {
            // At most one physical connection: let the old session close first
            let _ = previous.await;
        }

        loop {
            let Some(request) = shared.request_for(generation) else {
                return;
            };
            let Some(state) = shared.transition(generation, ConnectionStatus::Connecting) else {
                return;
            };
            shared.emit_status(&state);

            let attempt = tokio::select! {
                _ = shared.superseded(generation) => return,
                attempt = shared.connector.connect(&request) => attempt,
            };

            let error = match attempt {
                Ok(mut session) => {
                    let connected = shared.update_state(generation, |state| {
                        *state = ConnectionState::default().with_status(ConnectionStatus::Connected);
                    });
                    let Some(state) = connected else {
                        close_gracefully(&mut session).await;
                        return;
                    };
                    info!(server_url = %request.server_url, "Connected");
                    shared.emit_status(&state);

                    match shared.pump(generation, session).await {
                        SessionEnd::Superseded => return,
                        SessionEnd::Failed(e) => e,
                    }
                }
                Err(e) => e,
            };

            let Some(delay) = shared.handle_failure(generation, &error) else {
                return;
            };
            tokio::select! {
                _ = shared.superseded(generation) => return,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Delivers events in arrival order until the session ends.
    async fn pump(&self, generation: u64, mut session: Box<dyn TransportSession>) -> SessionEnd {
        let mut heartbeat = tokio::time::interval(self.config.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        heartbeat.tick().await;

        let superseded = self.superseded(generation);
        tokio::pin!(superseded);

        loop {
            tokio::select! {
                _ = &mut superseded => {
                    close_gracefully(&mut session).await;
                    return SessionEnd::Superseded;
                }
                next = session.next_event() => match next {
                    Some(Ok(event)) => {
                        if !self.is_current(generation) {
                            close_gracefully(&mut session).await;
                            return SessionEnd::Superseded;
                        }
                        let report = self.publisher.emit(event);
                        if !report.failed.is_empty() {
                            debug!(failed = ?report.failed, "Some handlers failed");
                        }
                    }
                    Some(Err(e)) => return SessionEnd::Failed(e),
                    None => {
                        return SessionEnd::Failed(TransportError::ConnectionLost(
                            "closed by server".to_string(),
                        ))
                    }
                },
                _ = heartbeat.tick() => {
                    if let Err(e) = session.send_heartbeat().await {
                        return SessionEnd::Failed(e);
                    }
                }
            }
        }
    }

    /// Records a failure and decides whether to retry.
    ///
    /// Returns the backoff delay, or `None` when this generation is done.
    fn handle_failure(&self, generation: u64, error: &TransportError) -> Option<Duration> {
        let policy = &self.config.reconnect;
        let auth_failure = error.is_auth_failure();
        let retryable = !auth_failure || policy.retry_on_auth_failure;

        let mut delay = None;
        let state = self.update_state(generation, |state| {
            delay = if retryable {
                policy.next_delay(state.attempt)
            } else {
                None
            };
            let attempt = if delay.is_some() {
                state.attempt + 1
            } else {
                state.attempt
            };
            *state = ConnectionState {
                is_connected: false,
                last_error: Some(error.to_string()),
                status: ConnectionStatus::Disconnected,
                attempt,
                retries_exhausted: retryable && delay.is_none(),
            };
        })?;

        match delay {
            Some(delay) => warn!(
                error = %error,
                attempt = state.attempt,
                delay_ms = delay.as_millis() as u64,
                "Connection failed, reconnecting"
            ),
            None if auth_failure => warn!(error = %error, "Authentication rejected, not reconnecting"),
            None => warn!(
                error = %error,
                attempts = state.attempt,
                "Reconnection attempts exhausted"
            ),
        }

        self.emit_status(&state);
        if auth_failure {
            self.publisher.emit(RealtimeEvent::new(
                names::AUTH_ERROR,
                json!({ "message": error.to_string() }),
            ));
        } else {
            self.publisher.emit(RealtimeEvent::new(
                names::CONNECTION_ERROR,
                json!({
                    "message": error.to_string(),
                    "attempt": state.attempt,
                    "willRetry": delay.is_some(),
                }),
            ));
        }

        delay
    }
}
