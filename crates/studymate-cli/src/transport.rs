use anyhow::Context;
use reqwest::multipart::{
  Form,
  Part
};
use studymate_core::api::{
  ApiRequest,
  ApiResponse,
  Method,
  RequestBody,
  Transport,
  TransportError
};
use tracing::{
  debug,
  warn
};

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client
}

impl ReqwestTransport {
  pub fn new() -> anyhow::Result<Self> {
    let client =
      reqwest::Client::builder()
        .user_agent(concat!(
          "studymate-cli/",
          env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context(
          "failed building HTTP client"
        )?;
    Ok(Self { client })
  }
}

fn to_reqwest(
  method: Method
) -> reqwest::Method {
  match method {
    | Method::Get => reqwest::Method::GET,
    | Method::Post => {
      reqwest::Method::POST
    }
    | Method::Put => reqwest::Method::PUT,
    | Method::Patch => {
      reqwest::Method::PATCH
    }
    | Method::Delete => {
      reqwest::Method::DELETE
    }
  }
}

impl Transport for ReqwestTransport {
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

    let mut builder = self
      .client
      .request(to_reqwest(method), &url);
    if let Some(token) = bearer.as_deref() {
      builder = builder.bearer_auth(token);
    }

    builder = match body {
      | RequestBody::Empty => builder,
      | RequestBody::Json(json) => builder
        .header(
          reqwest::header::CONTENT_TYPE,
          "application/json"
        )
        .body(json),
      | RequestBody::Multipart(file) => {
        let mut part = Part::bytes(file.bytes)
          .file_name(file.file_name);
        if let Some(mime) =
          file.mime.as_deref()
        {
          part = part
            .mime_str(mime)
            .map_err(|err| {
              TransportError(format!(
                "invalid mime type \
                 {mime}: {err}"
              ))
            })?;
        }
        builder.multipart(
          Form::new().part(file.field, part)
        )
      }
    };

    let response =
      builder.send().await.map_err(|err| {
        warn!(
          %method,
          url = %url,
          error = %err,
          "request did not complete"
        );
        TransportError(err.to_string())
      })?;

    let status = response.status().as_u16();
    let body =
      response.text().await.map_err(
        |err| {
          TransportError(format!(
            "failed reading response \
             body: {err}"
          ))
        }
      )?;

    debug!(
      %method,
      url = %url,
      status,
      bytes = body.len(),
      "response received"
    );
    Ok(ApiResponse { status, body })
  }
}
