//! Remote query gateway: typed access to the inventory service.

pub mod client;
pub mod payloads;
pub mod types;

pub use client::InventoryClient;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::filter::FilterSet;
use payloads::{ItemDraft, ItemPatch};
use types::{Container, Item, ItemPage, ItemStatus};

/// Operations the inventory store depends on.
///
/// The seam between the store and the network: `InventoryClient` is the
/// real implementation, tests substitute a scripted stub.
#[async_trait]
pub trait Gateway: Send + Sync {
  async fn list_items(
    &self,
    filters: &FilterSet,
    page: u32,
    page_size: u32,
  ) -> Result<ItemPage, ApiError>;

  async fn list_containers(&self) -> Result<Vec<Container>, ApiError>;

  async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError>;

  async fn update_item_fields(&self, id: &str, patch: &ItemPatch) -> Result<Item, ApiError>;

  async fn delete_item(&self, id: &str) -> Result<(), ApiError>;

  /// The server clamps at zero on its side and may cascade a status
  /// transition; the returned item is authoritative.
  async fn adjust_quantity(
    &self,
    id: &str,
    delta: f64,
    note: Option<&str>,
  ) -> Result<Item, ApiError>;

  async fn change_status(
    &self,
    id: &str,
    status: ItemStatus,
    assignee: Option<&str>,
  ) -> Result<Item, ApiError>;

  async fn move_item(
    &self,
    id: &str,
    container_id: Option<&str>,
    parent_item_id: Option<&str>,
  ) -> Result<Item, ApiError>;
}
