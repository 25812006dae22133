//! Domain types for the inventory service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Whether an item is counted stock or a tracked unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
  /// Counted stock; quantity is adjustable.
  Consumable,
  /// A single tracked unit; quantity is pinned to 1 server-side.
  Asset,
}

/// Lifecycle status of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
  InStock,
  InService,
  Idle,
  Loaned,
  Damaged,
  Retired,
}

/// A tracked consumable or asset record.
///
/// Ids are opaque, server-assigned, and immutable; the cache never invents
/// them. Quantity is the only field under concurrent-mutation pressure;
/// everything else is replaced wholesale on confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
  pub id: String,
  #[serde(rename = "item_type")]
  pub kind: ItemKind,
  pub name: String,
  pub sku: Option<String>,
  pub category: String,
  pub container_id: Option<String>,
  pub parent_item_id: Option<String>,
  pub location_note: Option<String>,
  pub quantity: f64,
  pub unit: String,
  pub min_stock: Option<f64>,
  pub unit_price: Option<f64>,
  pub purchase_date: Option<String>,
  pub status: ItemStatus,
  pub assigned_to: Option<String>,
  #[serde(default)]
  pub attributes: HashMap<String, serde_json::Value>,
  pub restock_url: Option<String>,
  pub barcode: Option<String>,
  pub image_url: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Item {
  /// True when a minimum-stock threshold is set and the quantity is at or
  /// below it.
  pub fn low_stock(&self) -> bool {
    self.min_stock.is_some_and(|min| self.quantity <= min)
  }
}

/// A physical or logical grouping of items, addressable by a scannable code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
  pub id: String,
  pub name: String,
  pub description: Option<String>,
  pub location: Option<String>,
  #[serde(rename = "qr_code_id")]
  pub scan_code: String,
  pub parent_container_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// One server-returned page of the item collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPage {
  pub items: Vec<Item>,
  pub total: u64,
  pub page: u32,
  pub page_size: u32,
}

impl ItemKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      ItemKind::Consumable => "consumable",
      ItemKind::Asset => "asset",
    }
  }
}

impl fmt::Display for ItemKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ItemKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "consumable" => Ok(ItemKind::Consumable),
      "asset" => Ok(ItemKind::Asset),
      other => Err(format!("unknown item kind: {other}")),
    }
  }
}

impl ItemStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      ItemStatus::InStock => "in_stock",
      ItemStatus::InService => "in_service",
      ItemStatus::Idle => "idle",
      ItemStatus::Loaned => "loaned",
      ItemStatus::Damaged => "damaged",
      ItemStatus::Retired => "retired",
    }
  }
}

impl fmt::Display for ItemStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for ItemStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "in_stock" => Ok(ItemStatus::InStock),
      "in_service" => Ok(ItemStatus::InService),
      "idle" => Ok(ItemStatus::Idle),
      "loaned" => Ok(ItemStatus::Loaned),
      "damaged" => Ok(ItemStatus::Damaged),
      "retired" => Ok(ItemStatus::Retired),
      other => Err(format!("unknown status: {other}")),
    }
  }
}
