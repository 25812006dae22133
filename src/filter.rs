//! Filter state for the item list.
//!
//! A `FilterSet` is the active query narrowing the collection; a
//! `FilterPatch` merges partial changes into it. Each patch slot is a
//! three-way tag so a caller can distinguish "leave untouched" from
//! "clear this dimension". Setting a string dimension to the empty string
//! also clears it rather than filtering for emptiness.

use crate::api::types::{ItemKind, ItemStatus};

/// One slot of a partial filter update.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
  /// Leave the current value untouched.
  Keep,
  /// Remove this filter dimension.
  Clear,
  /// Set this dimension to the given value.
  Set(T),
}

// Hand-written so that `Patch<T>: Default` holds without `T: Default`.
impl<T> Default for Patch<T> {
  fn default() -> Self {
    Patch::Keep
  }
}

impl<T> Patch<T> {
  fn apply(self, slot: &mut Option<T>) {
    match self {
      Patch::Keep => {}
      Patch::Clear => *slot = None,
      Patch::Set(v) => *slot = Some(v),
    }
  }
}

impl Patch<String> {
  /// String dimensions treat an empty value as the clear sentinel.
  fn apply_str(self, slot: &mut Option<String>) {
    match self {
      Patch::Set(s) if s.is_empty() => *slot = None,
      other => other.apply(slot),
    }
  }
}

/// The active query dimensions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
  pub kind: Option<ItemKind>,
  pub category: Option<String>,
  pub status: Option<ItemStatus>,
  pub container_id: Option<String>,
  pub search: Option<String>,
  pub low_stock: bool,
}

/// A partial update to a `FilterSet`.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
  pub kind: Patch<ItemKind>,
  pub category: Patch<String>,
  pub status: Patch<ItemStatus>,
  pub container_id: Patch<String>,
  pub search: Patch<String>,
  pub low_stock: Patch<bool>,
}

impl FilterSet {
  /// Merge a partial update into this filter set.
  pub fn apply(&mut self, patch: FilterPatch) {
    patch.kind.apply(&mut self.kind);
    patch.category.apply_str(&mut self.category);
    patch.status.apply(&mut self.status);
    patch.container_id.apply_str(&mut self.container_id);
    patch.search.apply_str(&mut self.search);
    match patch.low_stock {
      Patch::Keep => {}
      Patch::Clear => self.low_stock = false,
      Patch::Set(v) => self.low_stock = v,
    }
  }

  /// Encode the active dimensions as query parameters for the list endpoint.
  ///
  /// Inactive dimensions are omitted entirely; `low_stock` is only sent when
  /// set, matching the server's `false` default.
  pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(kind) = self.kind {
      pairs.push(("item_type", kind.to_string()));
    }
    if let Some(category) = &self.category {
      pairs.push(("category", category.clone()));
    }
    if let Some(status) = self.status {
      pairs.push(("status", status.to_string()));
    }
    if let Some(container_id) = &self.container_id {
      pairs.push(("container_id", container_id.clone()));
    }
    if let Some(search) = &self.search {
      pairs.push(("search", search.clone()));
    }
    if self.low_stock {
      pairs.push(("low_stock", "true".to_string()));
    }
    pairs
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn patch_merges_and_keeps() {
    let mut filters = FilterSet {
      category: Some("cables".into()),
      ..Default::default()
    };
    filters.apply(FilterPatch {
      status: Patch::Set(ItemStatus::Idle),
      ..Default::default()
    });
    assert_eq!(filters.category.as_deref(), Some("cables"));
    assert_eq!(filters.status, Some(ItemStatus::Idle));
  }

  #[test]
  fn empty_string_clears_the_dimension() {
    let mut filters = FilterSet {
      search: Some("gpu".into()),
      ..Default::default()
    };
    filters.apply(FilterPatch {
      search: Patch::Set(String::new()),
      ..Default::default()
    });
    assert_eq!(filters.search, None);
  }

  #[test]
  fn clear_removes_without_touching_others() {
    let mut filters = FilterSet {
      kind: Some(ItemKind::Asset),
      low_stock: true,
      ..Default::default()
    };
    filters.apply(FilterPatch {
      kind: Patch::Clear,
      ..Default::default()
    });
    assert_eq!(filters.kind, None);
    assert!(filters.low_stock);
  }

  #[test]
  fn query_pairs_omit_inactive_dimensions() {
    let filters = FilterSet {
      kind: Some(ItemKind::Consumable),
      search: Some("m3".into()),
      low_stock: true,
      ..Default::default()
    };
    let pairs = filters.query_pairs();
    assert_eq!(
      pairs,
      vec![
        ("item_type", "consumable".to_string()),
        ("search", "m3".to_string()),
        ("low_stock", "true".to_string()),
      ]
    );
    assert!(FilterSet::default().query_pairs().is_empty());
  }
}
