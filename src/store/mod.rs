//! The inventory store: a single-session, in-memory mirror of one page of
//! the remote item collection.
//!
//! The store holds exactly the last successfully fetched page for the
//! current filter/page/page-size triple, plus whatever an in-flight
//! optimistic mutation has touched. All state mutation happens in
//! synchronous critical sections under one mutex; no await point ever
//! holds the lock, so no consumer observes a half-applied change. Across
//! independent calls the model is eventual, last-resolved-wins: there are
//! no per-item locks, queues, or version stamps.
//!
//! Overlapping list fetches are not coalesced or cancelled; instead each
//! fetch carries a sequence number and a response older than the newest
//! issued fetch is discarded on arrival.

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::api::payloads::{ItemDraft, ItemPatch};
use crate::api::types::{Container, Item, ItemStatus};
use crate::api::Gateway;
use crate::error::ApiError;
use crate::filter::{FilterPatch, FilterSet};

pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Change notifications broadcast to store subscribers.
#[derive(Debug, Clone)]
pub enum StoreEvent {
  /// The current page (items and total) was replaced by a fetch.
  PageLoaded,
  /// An item on the current page changed in place.
  ItemUpdated(String),
  /// An item left the current page.
  ItemRemoved(String),
  /// The container list was replaced.
  ContainersLoaded,
}

#[derive(Debug, Clone)]
struct StoreState {
  items: Vec<Item>,
  total: u64,
  page: u32,
  page_size: u32,
  filters: FilterSet,
  loading: bool,
  containers: Vec<Container>,
  loading_containers: bool,
  /// Sequence number of the newest issued fetch.
  fetch_seq: u64,
}

/// A cloned, point-in-time read view of the store.
#[derive(Debug, Clone)]
pub struct Snapshot {
  pub items: Vec<Item>,
  pub total: u64,
  pub page: u32,
  pub page_size: u32,
  pub filters: FilterSet,
  pub loading: bool,
  pub containers: Vec<Container>,
  pub loading_containers: bool,
}

/// The process-wide inventory cache, generic over the remote gateway so
/// tests can substitute a scripted one.
///
/// Construct once, share via `Arc`; every consumer may call every entry
/// point.
pub struct InventoryStore<G> {
  gateway: G,
  state: Mutex<StoreState>,
  events_tx: broadcast::Sender<StoreEvent>,
}

impl<G: Gateway> InventoryStore<G> {
  pub fn new(gateway: G) -> Self {
    let (events_tx, _) = broadcast::channel(64);
    Self {
      gateway,
      state: Mutex::new(StoreState {
        items: Vec::new(),
        total: 0,
        page: 1,
        page_size: DEFAULT_PAGE_SIZE,
        filters: FilterSet::default(),
        loading: false,
        containers: Vec::new(),
        loading_containers: false,
        fetch_seq: 0,
      }),
      events_tx,
    }
  }

  pub fn with_page_size(self, page_size: u32) -> Self {
    self.state.lock().page_size = page_size.max(1);
    self
  }

  pub fn with_page(self, page: u32) -> Self {
    self.state.lock().page = page.max(1);
    self
  }

  pub fn with_filters(self, filters: FilterSet) -> Self {
    self.state.lock().filters = filters;
    self
  }

  /// Subscribe to change notifications.
  pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
    self.events_tx.subscribe()
  }

  /// Cloned read view of the current state.
  pub fn snapshot(&self) -> Snapshot {
    let state = self.state.lock();
    Snapshot {
      items: state.items.clone(),
      total: state.total,
      page: state.page,
      page_size: state.page_size,
      filters: state.filters.clone(),
      loading: state.loading,
      containers: state.containers.clone(),
      loading_containers: state.loading_containers,
    }
  }

  fn emit(&self, event: StoreEvent) {
    if self.events_tx.send(event).is_err() {
      trace!("no subscribers for store event");
    }
  }

  /// Fetch the current page from the gateway and replace the item list and
  /// total count atomically.
  ///
  /// On failure the prior page is left untouched and the classified error
  /// is returned. A response that was overtaken by a newer fetch is
  /// discarded on arrival; the loading flag clears when the newest
  /// outstanding fetch resolves.
  pub async fn fetch(&self) -> Result<(), ApiError> {
    let (filters, page, page_size, seq) = {
      let mut state = self.state.lock();
      state.loading = true;
      state.fetch_seq += 1;
      (state.filters.clone(), state.page, state.page_size, state.fetch_seq)
    };

    let result = self.gateway.list_items(&filters, page, page_size).await;

    let mut state = self.state.lock();
    let newest = seq == state.fetch_seq;
    if newest {
      state.loading = false;
    }
    match result {
      Ok(fetched) => {
        if !newest {
          debug!(seq, current = state.fetch_seq, "discarding stale page response");
          return Ok(());
        }
        state.items = fetched.items;
        state.total = fetched.total;
        drop(state);
        self.emit(StoreEvent::PageLoaded);
        Ok(())
      }
      Err(err) => Err(err),
    }
  }

  /// Fetch the flat container list.
  pub async fn fetch_containers(&self) -> Result<(), ApiError> {
    self.state.lock().loading_containers = true;
    let result = self.gateway.list_containers().await;
    let mut state = self.state.lock();
    state.loading_containers = false;
    match result {
      Ok(containers) => {
        state.containers = containers;
        drop(state);
        self.emit(StoreEvent::ContainersLoaded);
        Ok(())
      }
      Err(err) => Err(err),
    }
  }

  /// Merge a partial filter update, reset to the first page, and fetch.
  pub async fn set_filter(&self, patch: FilterPatch) -> Result<(), ApiError> {
    {
      let mut state = self.state.lock();
      state.filters.apply(patch);
      state.page = 1;
    }
    self.fetch().await
  }

  pub async fn set_page(&self, page: u32) -> Result<(), ApiError> {
    self.state.lock().page = page.max(1);
    self.fetch().await
  }

  /// Change the page size; resets to the first page.
  pub async fn set_page_size(&self, page_size: u32) -> Result<(), ApiError> {
    {
      let mut state = self.state.lock();
      state.page_size = page_size.max(1);
      state.page = 1;
    }
    self.fetch().await
  }

  /// Adjust an item's quantity optimistically.
  ///
  /// The tentative quantity (clamped at zero) is applied synchronously and
  /// is visible to readers before the network round-trip; the gateway gets
  /// the original, unclamped delta. On confirmation the server's item
  /// replaces the local one wholesale, picking up any cascaded changes. On
  /// failure the captured prior quantity is restored verbatim and the
  /// classified error returned; no automatic retry.
  ///
  /// If the item is not on the current page there is nothing to apply or
  /// roll back; the remote call still proceeds.
  ///
  /// Two rapid adjustments of one item each capture their own prior value;
  /// a rollback of the first can clobber the second's tentative value.
  /// That race is part of the consistency model, not defended against.
  pub async fn adjust_quantity(
    &self,
    id: &str,
    delta: f64,
    note: Option<&str>,
  ) -> Result<Item, ApiError> {
    let previous = {
      let mut state = self.state.lock();
      match state.items.iter_mut().find(|i| i.id == id) {
        Some(item) => {
          let prev = item.quantity;
          item.quantity = (item.quantity + delta).max(0.0);
          Some(prev)
        }
        None => None,
      }
    };
    if previous.is_some() {
      self.emit(StoreEvent::ItemUpdated(id.to_string()));
    }

    match self.gateway.adjust_quantity(id, delta, note).await {
      Ok(confirmed) => {
        self.update_item(confirmed.clone());
        Ok(confirmed)
      }
      Err(err) => {
        if let Some(prev) = previous {
          let mut state = self.state.lock();
          if let Some(item) = state.items.iter_mut().find(|i| i.id == id) {
            item.quantity = prev;
          }
          drop(state);
          self.emit(StoreEvent::ItemUpdated(id.to_string()));
        }
        Err(err)
      }
    }
  }

  /// Replace the cached entry with a matching id, in place.
  ///
  /// Used both for push-driven merges and post-mutation reconciliation.
  /// A no-op when the id is not on the current page: the item belongs to
  /// a page that is not loaded, or was deleted locally in the meantime.
  pub fn update_item(&self, item: Item) {
    let mut state = self.state.lock();
    let Some(slot) = state.items.iter_mut().find(|i| i.id == item.id) else {
      trace!(id = %item.id, "update for off-page item dropped");
      return;
    };
    let id = item.id.clone();
    *slot = item;
    drop(state);
    self.emit(StoreEvent::ItemUpdated(id));
  }

  /// Remove an item from the current page and decrement the total count by
  /// exactly one. Idempotent: absent ids change nothing. The page is never
  /// refilled here; it may show fewer than `page_size` rows until the
  /// next fetch.
  pub fn remove_item(&self, id: &str) {
    let mut state = self.state.lock();
    let before = state.items.len();
    state.items.retain(|i| i.id != id);
    if state.items.len() == before {
      return;
    }
    state.total = state.total.saturating_sub(1);
    drop(state);
    self.emit(StoreEvent::ItemRemoved(id.to_string()));
  }

  /// Create an item, then refresh the current page: the new row's
  /// position is server-determined.
  pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
    let created = self.gateway.create_item(draft).await?;
    if let Err(err) = self.fetch().await {
      warn!(%err, "page refresh after create failed");
    }
    Ok(created)
  }

  /// Patch item fields; replace-on-confirm, not optimistic.
  pub async fn update_fields(&self, id: &str, patch: &ItemPatch) -> Result<Item, ApiError> {
    let confirmed = self.gateway.update_item_fields(id, patch).await?;
    self.update_item(confirmed.clone());
    Ok(confirmed)
  }

  /// Delete an item remotely, then drop it from the page.
  pub async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
    self.gateway.delete_item(id).await?;
    self.remove_item(id);
    Ok(())
  }

  /// Change lifecycle status; replace-on-confirm.
  pub async fn change_status(
    &self,
    id: &str,
    status: ItemStatus,
    assignee: Option<&str>,
  ) -> Result<Item, ApiError> {
    let confirmed = self.gateway.change_status(id, status, assignee).await?;
    self.update_item(confirmed.clone());
    Ok(confirmed)
  }

  /// Move an item into a container and/or under a parent item;
  /// replace-on-confirm.
  pub async fn move_item(
    &self,
    id: &str,
    container_id: Option<&str>,
    parent_item_id: Option<&str>,
  ) -> Result<Item, ApiError> {
    let confirmed = self
      .gateway
      .move_item(id, container_id, parent_item_id)
      .await?;
    self.update_item(confirmed.clone());
    Ok(confirmed)
  }
}
