//! Reqwest-backed implementation of the gateway.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::ApiError;
use crate::filter::FilterSet;

use super::payloads::{AdjustPayload, ItemDraft, ItemPatch, MovePayload, StatusPayload};
use super::types::{Container, Item, ItemPage, ItemStatus};
use super::Gateway;

/// HTTP client for the inventory REST surface.
///
/// Carries the opaque bearer credential on every call; credential-rejected
/// responses come back as `ApiError::Unauthorized` like any other
/// classified failure.
#[derive(Clone)]
pub struct InventoryClient {
  http: reqwest::Client,
  base: Url,
  token: String,
}

/// Error body shape the server uses for every failure class.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  detail: String,
}

impl InventoryClient {
  pub fn new(base: Url, token: String) -> Self {
    Self {
      http: reqwest::Client::new(),
      base,
      token,
    }
  }

  fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
    let url = self
      .base
      .join(path)
      .map_err(|e| ApiError::Network(format!("invalid url {path}: {e}")))?;
    Ok(self.http.request(method, url).bearer_auth(&self.token))
  }

  async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = Self::check(response).await?;
    response
      .json()
      .await
      .map_err(|e| ApiError::Network(format!("malformed response body: {e}")))
  }

  /// Classify a non-success response, surfacing the server's detail string
  /// verbatim.
  async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
      .map(|b| b.detail)
      .unwrap_or(text);
    Err(ApiError::from_status(status.as_u16(), detail))
  }
}

#[async_trait]
impl Gateway for InventoryClient {
  async fn list_items(
    &self,
    filters: &FilterSet,
    page: u32,
    page_size: u32,
  ) -> Result<ItemPage, ApiError> {
    let response = self
      .request(Method::GET, "api/v1/items")?
      .query(&[("page", page.to_string()), ("page_size", page_size.to_string())])
      .query(&filters.query_pairs())
      .send()
      .await?;
    Self::read_json(response).await
  }

  async fn list_containers(&self) -> Result<Vec<Container>, ApiError> {
    let response = self.request(Method::GET, "api/v1/containers")?.send().await?;
    Self::read_json(response).await
  }

  async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
    let response = self
      .request(Method::POST, "api/v1/items")?
      .json(draft)
      .send()
      .await?;
    Self::read_json(response).await
  }

  async fn update_item_fields(&self, id: &str, patch: &ItemPatch) -> Result<Item, ApiError> {
    let response = self
      .request(Method::PATCH, &format!("api/v1/items/{id}"))?
      .json(patch)
      .send()
      .await?;
    Self::read_json(response).await
  }

  async fn delete_item(&self, id: &str) -> Result<(), ApiError> {
    let response = self
      .request(Method::DELETE, &format!("api/v1/items/{id}"))?
      .send()
      .await?;
    // 204, no body to read.
    Self::check(response).await?;
    Ok(())
  }

  async fn adjust_quantity(
    &self,
    id: &str,
    delta: f64,
    note: Option<&str>,
  ) -> Result<Item, ApiError> {
    let payload = AdjustPayload {
      delta,
      note: note.map(String::from),
    };
    let response = self
      .request(Method::POST, &format!("api/v1/items/{id}/adjust"))?
      .json(&payload)
      .send()
      .await?;
    Self::read_json(response).await
  }

  async fn change_status(
    &self,
    id: &str,
    status: ItemStatus,
    assignee: Option<&str>,
  ) -> Result<Item, ApiError> {
    let payload = StatusPayload {
      status,
      assigned_to: assignee.map(String::from),
    };
    let response = self
      .request(Method::PATCH, &format!("api/v1/items/{id}/status"))?
      .json(&payload)
      .send()
      .await?;
    Self::read_json(response).await
  }

  async fn move_item(
    &self,
    id: &str,
    container_id: Option<&str>,
    parent_item_id: Option<&str>,
  ) -> Result<Item, ApiError> {
    let payload = MovePayload {
      container_id: container_id.map(String::from),
      parent_item_id: parent_item_id.map(String::from),
    };
    let response = self
      .request(Method::PATCH, &format!("api/v1/items/{id}/move"))?
      .json(&payload)
      .send()
      .await?;
    Self::read_json(response).await
  }
}
