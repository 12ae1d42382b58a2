//! tokio-tungstenite implementation of the transport ports.
//!
//! The auth token travels in the upgrade request's `Authorization` header.
//! A 401/403 answer to the upgrade is reported as an authentication failure
//! so the manager can stop retrying a token the server will never accept.

use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use secrecy::ExposeSecret;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::domain::foundation::{is_known_event, RealtimeEvent};
use crate::ports::{ConnectRequest, Connector, TransportError, TransportSession};

use super::messages::{ClientMessage, ServerFrame};

/// Opens WebSocket sessions against the push server.
#[derive(Debug, Clone)]
pub struct TungsteniteConnector {
    connect_timeout: Duration,
}

impl TungsteniteConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TungsteniteConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

#[async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(
        &self,
        request: &ConnectRequest,
    ) -> Result<Box<dyn TransportSession>, TransportError> {
        let mut upgrade = request
            .server_url
            .as_str()
            .into_client_request()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        let bearer = HeaderValue::from_str(&format!(
            "Bearer {}",
            request.auth_token.expose_secret()
        ))
        .map_err(|_| {
            TransportError::InvalidRequest("auth token is not a valid header value".to_string())
        })?;
        upgrade.headers_mut().insert(AUTHORIZATION, bearer);

        let (stream, response) = tokio::time::timeout(self.connect_timeout, connect_async(upgrade))
            .await
            .map_err(|_| {
                TransportError::ConnectFailed(format!(
                    "handshake timed out after {}s",
                    self.connect_timeout.as_secs()
                ))
            })?
            .map_err(map_handshake_error)?;

        tracing::debug!(status = %response.status(), "WebSocket upgrade accepted");

        Ok(Box::new(TungsteniteSession { stream }))
    }
}

fn map_handshake_error(err: tungstenite::Error) -> TransportError {
    match err {
        tungstenite::Error::Http(response)
            if matches!(
                response.status(),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
            ) =>
        {
            TransportError::Unauthorized(format!("server answered {}", response.status()))
        }
        other => TransportError::ConnectFailed(other.to_string()),
    }
}

struct TungsteniteSession {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl TransportSession for TungsteniteSession {
    async fn next_event(&mut self) -> Option<Result<RealtimeEvent, TransportError>> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => match ServerFrame::parse(&text) {
                    Ok(frame) => {
                        if !is_known_event(&frame.event) {
                            tracing::debug!(event = %frame.event, "Forwarding unrecognized event");
                        }
                        return Some(Ok(frame.into_event()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Skipping malformed frame");
                    }
                },
                Ok(Message::Close(frame)) => {
                    tracing::debug!(?frame, "Server closed the connection");
                    return None;
                }
                // Pings are answered by tungstenite; pongs and binary frames carry no events.
                Ok(_) => {}
                Err(e) => return Some(Err(TransportError::ConnectionLost(e.to_string()))),
            }
        }
    }

    async fn send_heartbeat(&mut self) -> Result<(), TransportError> {
        self.stream
            .send(Message::Text(ClientMessage::ping().to_json().into()))
            .await
            .map_err(|e| TransportError::ConnectionLost(e.to_string()))
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            tracing::debug!(error = %e, "Error while closing WebSocket");
        }
    }
}
