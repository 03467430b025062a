use std::ops::Deref;
use std::rc::Rc;

use gloo::net::http::{
  Request,
  RequestBuilder
};
use studymate_core::api::{
  ApiClient,
  ApiRequest,
  ApiResponse,
  FileUpload,
  Method,
  RequestBody,
  Transport,
  TransportError
};
use wasm_bindgen::JsValue;

pub type Client = ApiClient<FetchTransport>;

/// `fetch` through gloo-net.
#[derive(
  Debug, Clone, Copy, Default, PartialEq,
)]
pub struct FetchTransport;

fn builder(
  method: Method,
  url: &str
) -> RequestBuilder {
  match method {
    | Method::Get => Request::get(url),
    | Method::Post => Request::post(url),
    | Method::Put => Request::put(url),
    | Method::Patch => Request::patch(url),
    | Method::Delete => Request::delete(url)
  }
}

fn js_error(value: JsValue) -> TransportError {
  TransportError(format!("{value:?}"))
}

fn form_data(
  file: &FileUpload
) -> Result<web_sys::FormData, TransportError>
{
  let blob = gloo::file::Blob::new_with_options(
    file.bytes.as_slice(),
    file.mime.as_deref()
  );
  let form = web_sys::FormData::new()
    .map_err(js_error)?;
  form
    .append_with_blob_and_filename(
      &file.field,
      &web_sys::Blob::from(blob),
      &file.file_name
    )
    .map_err(js_error)?;
  Ok(form)
}

impl Transport for FetchTransport {
  async fn send(
    &self,
    request: ApiRequest
  ) -> Result<ApiResponse, TransportError>
  {
    let ApiRequest {
      method,
      url,
      bearer,
      body
    } = request;

    let mut req = builder(method, &url);
    if let Some(token) = bearer.as_deref() {
      req = req.header(
        "Authorization",
        &format!("Bearer {token}")
      );
    }

    // Multipart bodies get their boundary
    // header from the browser.
    let built = match body {
      | RequestBody::Empty => req.build(),
      | RequestBody::Json(json) => req
        .header(
          "Content-Type",
          "application/json"
        )
        .body(json),
      | RequestBody::Multipart(file) => {
        req.body(form_data(&file)?)
      }
    }
    .map_err(|err| {
      TransportError(err.to_string())
    })?;

    let response =
      built.send().await.map_err(|err| {
        tracing::warn!(
          %method,
          url = %url,
          error = %err,
          "fetch failed"
        );
        TransportError(err.to_string())
      })?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|err| {
        TransportError(err.to_string())
      })?;

    tracing::debug!(
      %method,
      url = %url,
      status,
      "fetch completed"
    );
    Ok(ApiResponse { status, body })
  }
}

/// Shared client handle; equal only to
/// itself so props change when the token
/// does.
#[derive(Clone)]
pub struct ClientHandle(pub Rc<Client>);

impl ClientHandle {
  pub fn new(client: Client) -> Self {
    Self(Rc::new(client))
  }
}

impl PartialEq for ClientHandle {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.0, &other.0)
  }
}

impl Deref for ClientHandle {
  type Target = Client;

  fn deref(&self) -> &Client {
    &self.0
  }
}
