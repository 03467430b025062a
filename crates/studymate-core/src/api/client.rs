use serde::Serialize;
use serde::de::DeserializeOwned;
use studymate_shared::{
  ActivityCreate,
  ActivityDto,
  ActivityEnvelope,
  AuthResponse,
  ChatRequest,
  ChatResponse,
  ErrorBody,
  LoginRequest,
  MeResponse,
  RecordId,
  RegisterRequest,
  StudyPlanRequest,
  StudyPlanResponse,
  SummaryRequest,
  SummaryResponse,
  UserDto
};

use super::transport::{
  ApiRequest,
  ApiResponse,
  FileUpload,
  Method,
  RequestBody,
  Transport
};
use crate::draft::Submission;
use crate::error::ApiError;
use crate::resource::{
  Resource,
  Tasks
};

pub const DEFAULT_LOCAL_API: &str =
  "http://localhost:8080/api";
pub const DEFAULT_REMOTE_API: &str =
  "https://studymate-back.onrender.com/api";

/// API base for the host the page was
/// served from.
pub fn base_url_for_host(
  host: &str
) -> &'static str {
  let host = host
    .split(':')
    .next()
    .unwrap_or_default();
  match host {
    | "localhost" | "127.0.0.1" => {
      DEFAULT_LOCAL_API
    }
    | _ => DEFAULT_REMOTE_API
  }
}

/// Typed calls against the StudyMate
/// REST API. The bearer token is attached
/// to every request once set.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
  transport: T,
  base_url:  String,
  token:     Option<String>
}

impl<T: Transport> ApiClient<T> {
  pub fn new(
    transport: T,
    base_url: impl Into<String>
  ) -> Self {
    let base_url = base_url.into();
    Self {
      transport,
      base_url: base_url
        .trim_end_matches('/')
        .to_string(),
      token: None
    }
  }

  pub fn with_token(
    mut self,
    token: Option<String>
  ) -> Self {
    self.token = token;
    self
  }

  pub fn set_token(
    &mut self,
    token: Option<String>
  ) {
    self.token = token;
  }

  pub fn token(&self) -> Option<&str> {
    self.token.as_deref()
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  pub fn transport(&self) -> &T {
    &self.transport
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.base_url)
  }

  #[tracing::instrument(skip(self, body))]
  async fn execute(
    &self,
    method: Method,
    path: &str,
    body: RequestBody
  ) -> Result<ApiResponse, ApiError> {
    let request = ApiRequest {
      method,
      url: self.url(path),
      bearer: self.token.clone(),
      body
    };

    let response = self
      .transport
      .send(request)
      .await
      .map_err(|err| {
        tracing::error!(
          error = %err,
          "request did not complete"
        );
        ApiError::Transport(err.0)
      })?;

    if response.is_success() {
      tracing::debug!(
        status = response.status,
        "request succeeded"
      );
      return Ok(response);
    }

    let message =
      serde_json::from_str::<ErrorBody>(
        &response.body
      )
      .ok()
      .and_then(ErrorBody::into_message);
    tracing::warn!(
      status = response.status,
      reason = message.as_deref(),
      "request rejected"
    );
    Err(ApiError::Rejected {
      status: response.status,
      message
    })
  }

  async fn json<B, R>(
    &self,
    method: Method,
    path: &str,
    body: Option<&B>
  ) -> Result<R, ApiError>
  where
    B: Serialize + ?Sized,
    R: DeserializeOwned
  {
    let body = encode_body(body)?;
    let response = self
      .execute(method, path, body)
      .await?;
    decode(&response.body)
  }

  /// Sends a request whose success body
  /// carries nothing the caller needs.
  async fn command<B>(
    &self,
    method: Method,
    path: &str,
    body: Option<&B>
  ) -> Result<(), ApiError>
  where
    B: Serialize + ?Sized
  {
    let body = encode_body(body)?;
    self
      .execute(method, path, body)
      .await
      .map(|_| ())
  }

  pub async fn login(
    &self,
    credentials: &LoginRequest
  ) -> Result<AuthResponse, ApiError> {
    self
      .json(
        Method::Post,
        "/auth/login",
        Some(credentials)
      )
      .await
  }

  pub async fn register(
    &self,
    profile: &RegisterRequest
  ) -> Result<AuthResponse, ApiError> {
    self
      .json(
        Method::Post,
        "/auth/registro",
        Some(profile)
      )
      .await
  }

  pub async fn me(
    &self
  ) -> Result<UserDto, ApiError> {
    let response: MeResponse = self
      .json::<(), _>(
        Method::Get,
        "/auth/me",
        None
      )
      .await?;
    Ok(response.user)
  }

  /// Reads the list envelope keyed by the
  /// collection name. A missing key is an
  /// empty list.
  pub async fn list<R: Resource>(
    &self
  ) -> Result<Vec<R::Record>, ApiError> {
    let response = self
      .execute(
        Method::Get,
        &R::collection_path(),
        RequestBody::Empty
      )
      .await?;
    decode_envelope(
      &response.body,
      R::COLLECTION
    )
  }

  pub async fn fetch<R: Resource>(
    &self,
    id: RecordId
  ) -> Result<R::Record, ApiError> {
    self
      .json::<(), _>(
        Method::Get,
        &R::item_path(id),
        None
      )
      .await
  }

  pub async fn submit<P: Serialize>(
    &self,
    submission: &Submission<P>
  ) -> Result<(), ApiError> {
    self
      .command(
        submission.method,
        &submission.path,
        Some(&submission.payload)
      )
      .await
  }

  pub async fn delete<R: Resource>(
    &self,
    id: RecordId
  ) -> Result<(), ApiError> {
    self
      .command::<()>(
        Method::Delete,
        &R::item_path(id),
        None
      )
      .await
  }

  pub async fn complete_task(
    &self,
    id: RecordId
  ) -> Result<(), ApiError> {
    let path = format!(
      "{}/completar",
      Tasks::item_path(id)
    );
    self
      .command::<()>(
        Method::Patch,
        &path,
        None
      )
      .await
  }

  pub async fn chat(
    &self,
    request: &ChatRequest
  ) -> Result<ChatResponse, ApiError> {
    self
      .json(
        Method::Post,
        "/ai/chatbot",
        Some(request)
      )
      .await
  }

  pub async fn study_plan(
    &self,
    request: &StudyPlanRequest
  ) -> Result<StudyPlanResponse, ApiError>
  {
    self
      .json(
        Method::Post,
        "/ai/plan-estudio",
        Some(request)
      )
      .await
  }

  pub async fn summarize_text(
    &self,
    request: &SummaryRequest
  ) -> Result<SummaryResponse, ApiError> {
    self
      .json(
        Method::Post,
        "/ai/resumir-pdf",
        Some(request)
      )
      .await
  }

  pub async fn summarize_file(
    &self,
    file: FileUpload
  ) -> Result<SummaryResponse, ApiError> {
    let response = self
      .execute(
        Method::Post,
        "/ai/resumir-pdf-archivo",
        RequestBody::Multipart(file)
      )
      .await?;
    decode(&response.body)
  }

  pub async fn activity(
    &self
  ) -> Result<Vec<ActivityDto>, ApiError>
  {
    let envelope: ActivityEnvelope = self
      .json::<(), _>(
        Method::Get,
        "/usuarios/actividad",
        None
      )
      .await?;
    Ok(envelope.entries)
  }

  pub async fn log_activity(
    &self,
    entry: &ActivityCreate
  ) -> Result<(), ApiError> {
    self
      .command(
        Method::Post,
        "/usuarios/actividad",
        Some(entry)
      )
      .await
  }
}

fn encode_body<B>(
  body: Option<&B>
) -> Result<RequestBody, ApiError>
where
  B: Serialize + ?Sized
{
  match body {
    | None => Ok(RequestBody::Empty),
    | Some(body) => {
      serde_json::to_string(body)
        .map(RequestBody::Json)
        .map_err(|err| {
          ApiError::Decode(err.to_string())
        })
    }
  }
}

fn decode<R: DeserializeOwned>(
  raw: &str
) -> Result<R, ApiError> {
  serde_json::from_str(raw).map_err(
    |err| {
      tracing::error!(
        error = %err,
        "failed to decode response body"
      );
      ApiError::Decode(err.to_string())
    }
  )
}

fn decode_envelope<R: DeserializeOwned>(
  raw: &str,
  key: &str
) -> Result<Vec<R>, ApiError> {
  let value: serde_json::Value =
    decode(raw)?;
  let items = match value {
    | items @ serde_json::Value::Array(_) => {
      items
    }
    | serde_json::Value::Object(
      mut map
    ) => {
      match map.remove(key) {
        | Some(items) if !items.is_null() => {
          items
        }
        | _ => return Ok(Vec::new())
      }
    }
    | _ => return Ok(Vec::new())
  };

  serde_json::from_value(items).map_err(
    |err| {
      tracing::error!(
        key,
        error = %err,
        "failed to decode list envelope"
      );
      ApiError::Decode(err.to_string())
    }
  )
}

#[cfg(test)]
mod tests {
  use studymate_shared::NoteDto;

  use super::*;

  #[test]
  fn base_url_follows_page_host() {
    assert_eq!(
      base_url_for_host("localhost"),
      DEFAULT_LOCAL_API
    );
    assert_eq!(
      base_url_for_host("127.0.0.1:8081"),
      DEFAULT_LOCAL_API
    );
    assert_eq!(
      base_url_for_host("studymate.app"),
      DEFAULT_REMOTE_API
    );
  }

  #[test]
  fn envelope_missing_key_is_empty() {
    let notes: Vec<NoteDto> =
      decode_envelope(
        r#"{"total":0}"#,
        "notas"
      )
      .expect("empty envelope");
    assert!(notes.is_empty());

    let notes: Vec<NoteDto> =
      decode_envelope(
        r#"{"notas":null}"#,
        "notas"
      )
      .expect("null envelope");
    assert!(notes.is_empty());

    let notes: Vec<NoteDto> =
      decode_envelope(
        r#"{"notas":[{"id":1,"titulo":"a","contenido":"b"}]}"#,
        "notas"
      )
      .expect("filled envelope");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "a");
  }

  #[test]
  fn envelope_with_wrong_shape_is_decode_error()
  {
    let result: Result<Vec<NoteDto>, _> =
      decode_envelope(
        r#"{"notas":"nope"}"#,
        "notas"
      );
    assert!(matches!(
      result,
      Err(ApiError::Decode(_))
    ));
  }
}
