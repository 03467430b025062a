mod client;
mod transport;

pub use client::{
  ApiClient,
  DEFAULT_LOCAL_API,
  DEFAULT_REMOTE_API,
  base_url_for_host
};
pub use transport::{
  ApiRequest,
  ApiResponse,
  FileUpload,
  Method,
  RequestBody,
  Transport,
  TransportError
};
