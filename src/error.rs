//! Classified errors for gateway calls.
//!
//! Every remote operation fails with exactly one of these classes so that
//! callers can decide between retry, rollback reporting, and logout routing
//! without string-matching messages.

use thiserror::Error;

/// Errors returned by the remote query gateway.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request never completed: DNS, connect, timeout, or body read.
  #[error("network error: {0}")]
  Network(String),

  /// The server rejected the bearer credential.
  #[error("unauthorized: credential rejected by the server")]
  Unauthorized,

  /// The addressed entity does not exist server-side.
  #[error("not found: {0}")]
  NotFound(String),

  /// The server rejected the payload; detail is surfaced verbatim.
  #[error("validation failed: {0}")]
  Validation(String),

  /// Opaque 5xx-class failure.
  #[error("server error ({status}): {message}")]
  Server { status: u16, message: String },
}

impl ApiError {
  /// Classify a non-success HTTP status together with the error detail the
  /// server sent in the body.
  pub fn from_status(status: u16, detail: String) -> Self {
    match status {
      401 => ApiError::Unauthorized,
      404 => ApiError::NotFound(detail),
      400 | 409 | 422 => ApiError::Validation(detail),
      s if s >= 500 => ApiError::Server {
        status: s,
        message: detail,
      },
      // Remaining 4xx shapes are payload problems from our perspective.
      _ => ApiError::Validation(detail),
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    ApiError::Network(err.to_string())
  }
}
