//! Shared test doubles: a scripted gateway and domain-object builders.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::api::payloads::{ItemDraft, ItemPatch};
use crate::api::types::{Container, Item, ItemKind, ItemPage, ItemStatus};
use crate::api::Gateway;
use crate::error::ApiError;
use crate::filter::FilterSet;

pub(crate) fn item(id: &str, quantity: f64) -> Item {
  Item {
    id: id.into(),
    kind: ItemKind::Consumable,
    name: format!("item {id}"),
    sku: None,
    category: "misc".into(),
    container_id: None,
    parent_item_id: None,
    location_note: None,
    quantity,
    unit: "pcs".into(),
    min_stock: None,
    unit_price: None,
    purchase_date: None,
    status: ItemStatus::InStock,
    assigned_to: None,
    attributes: HashMap::new(),
    restock_url: None,
    barcode: None,
    image_url: None,
    created_at: Utc::now(),
    updated_at: Utc::now(),
  }
}

pub(crate) fn container(id: &str) -> Container {
  Container {
    id: id.into(),
    name: format!("container {id}"),
    description: None,
    location: None,
    scan_code: format!("QR-{id}"),
    parent_container_id: None,
    created_at: Utc::now(),
    updated_at: Utc::now(),
  }
}

pub(crate) fn draft(name: &str) -> ItemDraft {
  ItemDraft {
    kind: ItemKind::Consumable,
    name: name.into(),
    sku: None,
    category: "misc".into(),
    container_id: None,
    quantity: 1.0,
    unit: "pcs".into(),
    min_stock: None,
    unit_price: None,
    barcode: None,
    attributes: HashMap::new(),
  }
}

/// A scripted response; when gated, the call blocks until the test releases
/// it, so mid-flight state can be observed and completion order forced.
pub(crate) struct Scripted<T> {
  result: Result<T, ApiError>,
  gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
  fn ready(result: Result<T, ApiError>) -> Self {
    Self { result, gate: None }
  }
}

#[derive(Default)]
pub(crate) struct StubInner {
  pub(crate) list_calls: Mutex<Vec<(FilterSet, u32, u32)>>,
  list_responses: Mutex<VecDeque<Scripted<ItemPage>>>,
  pub(crate) adjust_calls: Mutex<Vec<(String, f64)>>,
  adjust_responses: Mutex<VecDeque<Scripted<Item>>>,
  item_responses: Mutex<VecDeque<Result<Item, ApiError>>>,
  delete_responses: Mutex<VecDeque<Result<(), ApiError>>>,
  container_responses: Mutex<VecDeque<Result<Vec<Container>, ApiError>>>,
}

/// Scripted test double for the gateway. Responses are queued per
/// operation; gated responses let a test hold a call open to observe
/// mid-flight state or force completion order.
#[derive(Clone, Default)]
pub(crate) struct StubGateway(pub(crate) Arc<StubInner>);

impl StubGateway {
  fn page(items: Vec<Item>, total: u64) -> ItemPage {
    let page_size = items.len().max(1) as u32;
    ItemPage {
      items,
      total,
      page: 1,
      page_size,
    }
  }

  pub(crate) fn script_list(&self, items: Vec<Item>, total: u64) {
    self
      .0
      .list_responses
      .lock()
      .push_back(Scripted::ready(Ok(Self::page(items, total))));
  }

  pub(crate) fn script_list_err(&self, err: ApiError) {
    self.0.list_responses.lock().push_back(Scripted::ready(Err(err)));
  }

  pub(crate) fn script_list_gated(&self, items: Vec<Item>, total: u64) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.0.list_responses.lock().push_back(Scripted {
      result: Ok(Self::page(items, total)),
      gate: Some(rx),
    });
    tx
  }

  pub(crate) fn script_adjust(&self, result: Result<Item, ApiError>) {
    self.0.adjust_responses.lock().push_back(Scripted::ready(result));
  }

  pub(crate) fn script_adjust_gated(&self, result: Result<Item, ApiError>) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.0.adjust_responses.lock().push_back(Scripted {
      result,
      gate: Some(rx),
    });
    tx
  }

  pub(crate) fn script_item(&self, result: Result<Item, ApiError>) {
    self.0.item_responses.lock().push_back(result);
  }

  pub(crate) fn script_delete(&self, result: Result<(), ApiError>) {
    self.0.delete_responses.lock().push_back(result);
  }

  pub(crate) fn script_containers(&self, result: Result<Vec<Container>, ApiError>) {
    self.0.container_responses.lock().push_back(result);
  }

  pub(crate) fn list_calls(&self) -> Vec<(FilterSet, u32, u32)> {
    self.0.list_calls.lock().clone()
  }
}

#[async_trait]
impl Gateway for StubGateway {
  async fn list_items(
    &self,
    filters: &FilterSet,
    page: u32,
    page_size: u32,
  ) -> Result<ItemPage, ApiError> {
    self
      .0
      .list_calls
      .lock()
      .push((filters.clone(), page, page_size));
    let scripted = self
      .0
      .list_responses
      .lock()
      .pop_front()
      .expect("unscripted list call");
    if let Some(gate) = scripted.gate {
      let _ = gate.await;
    }
    scripted.result
  }

  async fn list_containers(&self) -> Result<Vec<Container>, ApiError> {
    self
      .0
      .container_responses
      .lock()
      .pop_front()
      .expect("unscripted containers call")
  }

  async fn create_item(&self, _draft: &ItemDraft) -> Result<Item, ApiError> {
    self
      .0
      .item_responses
      .lock()
      .pop_front()
      .expect("unscripted create call")
  }

  async fn update_item_fields(&self, _id: &str, _patch: &ItemPatch) -> Result<Item, ApiError> {
    self
      .0
      .item_responses
      .lock()
      .pop_front()
      .expect("unscripted update call")
  }

  async fn delete_item(&self, _id: &str) -> Result<(), ApiError> {
    self
      .0
      .delete_responses
      .lock()
      .pop_front()
      .expect("unscripted delete call")
  }

  async fn adjust_quantity(
    &self,
    id: &str,
    delta: f64,
    _note: Option<&str>,
  ) -> Result<Item, ApiError> {
    self.0.adjust_calls.lock().push((id.to_string(), delta));
    let scripted = self
      .0
      .adjust_responses
      .lock()
      .pop_front()
      .expect("unscripted adjust call");
    if let Some(gate) = scripted.gate {
      let _ = gate.await;
    }
    scripted.result
  }

  async fn change_status(
    &self,
    _id: &str,
    _status: ItemStatus,
    _assignee: Option<&str>,
  ) -> Result<Item, ApiError> {
    self
      .0
      .item_responses
      .lock()
      .pop_front()
      .expect("unscripted status call")
  }

  async fn move_item(
    &self,
    _id: &str,
    _container_id: Option<&str>,
    _parent_item_id: Option<&str>,
  ) -> Result<Item, ApiError> {
    self
      .0
      .item_responses
      .lock()
      .pop_front()
      .expect("unscripted move call")
  }
}
