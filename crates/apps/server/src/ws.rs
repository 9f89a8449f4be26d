//! WebSocket event relay.
//!
//! Each connection is told the session configuration and the current map,
//! then receives every accepted ownership change. Requests are validated
//! against the shared registry; rejected ones are logged and dropped.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use protocol::{decode_client, encode_server, ClientEvent, OwnerId, ServerEvent, SessionConfig};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::registry::LandRegistry;

const BROADCAST_CAPACITY: usize = 1024;
const OUTBOX_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionConfig>,
    pub registry: Arc<LandRegistry>,
    pub events: broadcast::Sender<ServerEvent>,
}

impl AppState {
    pub fn new(session: SessionConfig, registry: LandRegistry) -> Self {
        let (events, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            session: Arc::new(session),
            registry: Arc::new(registry),
            events,
        }
    }

    /// Applies one client request. Accepted requests are broadcast to every
    /// connection, including the requester.
    pub fn apply(&self, requester: &OwnerId, request: ClientEvent) {
        let outcome = match &request {
            ClientEvent::PurchaseLand { id } => self.registry.purchase(*id, requester),
            ClientEvent::SellLand { id } => self.registry.sell(*id, requester),
        };
        match outcome {
            Ok(event) => {
                info!(client = %requester, event = event.name(), "ownership changed");
                // No receivers simply means nobody is connected.
                let _ = self.events.send(event);
            }
            Err(err) => warn!(
                client = %requester,
                land = %request.land_id(),
                "{} rejected: {err}",
                request.name()
            ),
        }
    }
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let client = OwnerId::new(Uuid::new_v4().to_string());
    let (mut ws_tx, mut ws_rx) = socket.split();

    // Subscribe before the snapshot so no change between the two is lost.
    let mut events = state.events.subscribe();
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<ServerEvent>(OUTBOX_CAPACITY);

    let greeting = [
        ServerEvent::Variables((*state.session).clone()),
        ServerEvent::MapData(state.registry.snapshot()),
    ];
    for event in greeting {
        if outbox_tx.send(event).await.is_err() {
            return;
        }
    }

    info!(client = %client, "client connected");

    let sender_task = tokio::spawn(async move {
        while let Some(event) = outbox_rx.recv().await {
            let text = match encode_server(&event) {
                Ok(t) => t,
                Err(e) => {
                    warn!("failed to encode {}: {e}", event.name());
                    continue;
                }
            };
            if let Err(e) = ws_tx.send(Message::Text(text)).await {
                debug!("send failed: {e}");
                break;
            }
        }
    });

    let relay_tx = outbox_tx.clone();
    let relay_client = client.clone();
    let relay_task = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if relay_tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(client = %relay_client, skipped, "client fell behind; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(msg) = ws_rx.next().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                warn!(client = %client, "receive error: {e}");
                break;
            }
        };

        match msg {
            Message::Text(text) => match decode_client(&text) {
                Ok(request) => state.apply(&client, request),
                Err(e) => warn!(client = %client, "dropping frame: {e}"),
            },
            Message::Close(_) => break,
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    relay_task.abort();
    drop(outbox_tx);
    let _ = sender_task.await;
    info!(client = %client, "client disconnected");
}
