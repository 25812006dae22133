//! Push channel: server-to-client change notifications over a websocket.
//!
//! The server pushes `{"type": ..., "payload": ...}` JSON text frames
//! outside the request/response cycle. Frames that do not parse into a
//! known event are dropped at this boundary and never reach the store
//! as errors. The connection task reconnects forever on a fixed delay;
//! the store is not told about gaps and serves its last page silently
//! until the stream resumes.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::{eyre::eyre, Result};
use futures::StreamExt;
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, trace, warn};
use url::Url;

use crate::api::types::Item;
use crate::api::Gateway;
use crate::store::InventoryStore;

const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// A change notification pushed by the server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum PushEvent {
  /// An item changed; the payload is its full new representation.
  ItemUpdated(Item),
  /// An item was deleted.
  ItemDeleted { id: String },
  /// Something changed that the server will not describe as a delta; the
  /// client refetches its current page.
  InventoryChanged,
}

impl PushEvent {
  /// Safe parse of one text frame. Anything unrecognized (malformed JSON,
  /// an unknown type tag, a payload of the wrong shape) is dropped.
  pub fn parse(text: &str) -> Option<Self> {
    match serde_json::from_str(text) {
      Ok(event) => Some(event),
      Err(err) => {
        trace!(%err, "dropping unparseable push frame");
        None
      }
    }
  }
}

/// Derive the websocket endpoint from the server URL: same host, fixed
/// `/ws` path, ciphertext framing when the server itself is secure.
pub fn ws_url(server: &Url) -> Result<Url> {
  let mut url = server.clone();
  let scheme = if server.scheme() == "https" { "wss" } else { "ws" };
  url
    .set_scheme(scheme)
    .map_err(|_| eyre!("cannot derive a websocket url from {server}"))?;
  url.set_path("/ws");
  url.set_query(None);
  Ok(url)
}

/// Apply one push event to the store.
///
/// `item_updated` merges in place when the item is on the current page and
/// is ignored otherwise, including for an item the client already
/// deleted locally. `inventory_changed` triggers exactly one fetch with
/// the filter/page/size active at receipt time.
pub async fn dispatch<G: Gateway>(store: &InventoryStore<G>, event: PushEvent) {
  match event {
    PushEvent::ItemUpdated(item) => store.update_item(item),
    PushEvent::ItemDeleted { id } => store.remove_item(&id),
    PushEvent::InventoryChanged => {
      if let Err(err) = store.fetch().await {
        warn!(%err, "full refresh after inventory_changed failed");
      }
    }
  }
}

/// Long-lived connection task feeding push events into the store.
pub struct PushChannel<G> {
  store: Arc<InventoryStore<G>>,
  url: Url,
  reconnect_delay: Duration,
}

impl<G: Gateway + 'static> PushChannel<G> {
  pub fn new(store: Arc<InventoryStore<G>>, server: &Url) -> Result<Self> {
    Ok(Self {
      store,
      url: ws_url(server)?,
      reconnect_delay: RECONNECT_DELAY,
    })
  }

  /// Connect, drain messages, reconnect after a fixed delay, forever.
  /// No backoff growth and no attempt ceiling: single-session client.
  pub async fn run(self) {
    loop {
      match connect_async(self.url.as_str()).await {
        Ok((mut socket, _)) => {
          info!(url = %self.url, "push channel connected");
          while let Some(message) = socket.next().await {
            match message {
              Ok(Message::Text(text)) => {
                if let Some(event) = PushEvent::parse(&text) {
                  dispatch(&self.store, event).await;
                }
              }
              Ok(Message::Close(_)) => break,
              // Pings are answered by the transport; binary frames are
              // not part of the protocol.
              Ok(_) => {}
              Err(err) => {
                warn!(%err, "push channel read failed");
                break;
              }
            }
          }
          info!("push channel disconnected");
        }
        Err(err) => warn!(%err, "push channel connect failed"),
      }
      tokio::time::sleep(self.reconnect_delay).await;
    }
  }
}
