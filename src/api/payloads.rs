//! Serializable request payloads for the inventory REST surface.
//!
//! These are kept separate from the domain types: the server owns id,
//! status cascades, and timestamps, so outbound shapes carry only what a
//! client may set.

use serde::Serialize;
use std::collections::HashMap;

use super::types::{ItemKind, ItemStatus};

/// Fields for creating an item. The server assigns the id and timestamps,
/// and pins quantity to 1 for assets.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDraft {
  #[serde(rename = "item_type")]
  pub kind: ItemKind,
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sku: Option<String>,
  pub category: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub container_id: Option<String>,
  pub quantity: f64,
  pub unit: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_stock: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit_price: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub barcode: Option<String>,
  #[serde(skip_serializing_if = "HashMap::is_empty")]
  pub attributes: HashMap<String, serde_json::Value>,
}

/// Partial field update; absent fields are left untouched server-side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sku: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub category: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location_note: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub quantity: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub min_stock: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub unit_price: Option<f64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub restock_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub barcode: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attributes: Option<HashMap<String, serde_json::Value>>,
}

/// Body of the quantity-adjust endpoint. The delta is the caller's raw
/// value; the server revalidates independently of any local clamping.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustPayload {
  pub delta: f64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,
}

/// Body of the status-change endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusPayload {
  pub status: ItemStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assigned_to: Option<String>,
}

/// Body of the move endpoint. Both targets are always sent: an explicit
/// null clears the corresponding reference server-side.
#[derive(Debug, Clone, Serialize)]
pub struct MovePayload {
  pub container_id: Option<String>,
  pub parent_item_id: Option<String>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn adjust_omits_missing_note() {
    let body = serde_json::to_value(AdjustPayload {
      delta: -2.0,
      note: None,
    })
    .unwrap();
    assert_eq!(body, serde_json::json!({"delta": -2.0}));
  }

  #[test]
  fn move_sends_explicit_nulls() {
    let body = serde_json::to_value(MovePayload {
      container_id: None,
      parent_item_id: Some("itm-9".into()),
    })
    .unwrap();
    assert_eq!(
      body,
      serde_json::json!({"container_id": null, "parent_item_id": "itm-9"})
    );
  }

  #[test]
  fn patch_skips_untouched_fields() {
    let body = serde_json::to_value(ItemPatch {
      category: Some("optics".into()),
      ..Default::default()
    })
    .unwrap();
    assert_eq!(body, serde_json::json!({"category": "optics"}));
  }
}
