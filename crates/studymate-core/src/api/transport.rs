use std::fmt;

use thiserror::Error;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Method {
  Get,
  Post,
  Put,
  Patch,
  Delete
}

impl Method {
  pub fn as_str(self) -> &'static str {
    match self {
      | Method::Get => "GET",
      | Method::Post => "POST",
      | Method::Put => "PUT",
      | Method::Patch => "PATCH",
      | Method::Delete => "DELETE"
    }
  }
}

impl fmt::Display for Method {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single file sent as a multipart
/// form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
  pub field:     String,
  pub file_name: String,
  pub mime:      Option<String>,
  pub bytes:     Vec<u8>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
  Empty,
  Json(String),
  Multipart(FileUpload)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
  pub method: Method,
  pub url:    String,
  pub bearer: Option<String>,
  pub body:   RequestBody
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
  pub status: u16,
  pub body:   String
}

impl ApiResponse {
  pub fn is_success(&self) -> bool {
    (200..=299).contains(&self.status)
  }
}

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
#[error("{0}")]
pub struct TransportError(
  pub String
);

/// Sends one request and hands back the
/// raw status and body. Implementations
/// never interpret the status; a
/// `TransportError` means the request
/// could not complete at all.
#[allow(async_fn_in_trait)]
pub trait Transport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn transport_error_reads_as_its_cause() {
    let err: Box<dyn std::error::Error> =
      Box::new(TransportError(
        "connection refused".to_string()
      ));
    assert_eq!(
      err.to_string(),
      "connection refused"
    );
  }

  #[test]
  fn only_2xx_counts_as_success() {
    let response = |status| ApiResponse {
      status,
      body: String::new()
    };
    assert!(response(204).is_success());
    assert!(!response(199).is_success());
    assert!(!response(401).is_success());
  }
}
