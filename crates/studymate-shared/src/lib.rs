use serde::{
  Deserialize,
  Serialize
};

pub type RecordId = u64;

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct UserDto {
  pub id:        RecordId,
  #[serde(rename = "nombre", default)]
  pub name:      String,
  #[serde(
    rename = "apellido",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub last_name: Option<String>,
  #[serde(
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub email:     Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct LoginRequest {
  pub email:    String,
  pub password: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct RegisterRequest {
  #[serde(rename = "nombre")]
  pub name:      String,
  #[serde(rename = "apellido")]
  pub last_name: String,
  pub email:     String,
  pub password:  String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct AuthResponse {
  pub token: String,
  #[serde(rename = "usuario")]
  pub user:  UserDto
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct MeResponse {
  #[serde(rename = "usuario")]
  pub user: UserDto
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct NoteDto {
  pub id:      RecordId,
  #[serde(rename = "titulo", default)]
  pub title:   String,
  #[serde(rename = "contenido", default)]
  pub content: String,
  #[serde(rename = "materia", default)]
  pub subject: Option<String>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct NotePayload {
  #[serde(rename = "titulo")]
  pub title:   String,
  #[serde(rename = "contenido")]
  pub content: String,
  #[serde(rename = "materia")]
  pub subject: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct SubjectRef {
  pub id:   RecordId,
  #[serde(
    rename = "nombre",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub name: Option<String>
}

fn default_priority() -> String {
  "MEDIA".to_string()
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct TaskDto {
  pub id:          RecordId,
  #[serde(rename = "titulo", default)]
  pub title:       String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(
    rename = "prioridad",
    default = "default_priority"
  )]
  pub priority:    String,
  #[serde(
    rename = "fechaLimite",
    alias = "fechaVencimiento",
    default
  )]
  pub due:         Option<String>,
  #[serde(rename = "completada", default)]
  pub completed:   bool,
  #[serde(rename = "materia", default)]
  pub subject:     Option<SubjectRef>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct TaskPayload {
  #[serde(rename = "titulo")]
  pub title:       String,
  #[serde(rename = "descripcion")]
  pub description: String,
  #[serde(rename = "prioridad")]
  pub priority:    String,
  #[serde(
    rename = "fechaLimite",
    skip_serializing_if = "Option::is_none"
  )]
  pub due:         Option<String>,
  #[serde(
    rename = "materia",
    skip_serializing_if = "Option::is_none"
  )]
  pub subject:     Option<SubjectRef>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
)]
pub struct SubjectDto {
  pub id:          RecordId,
  #[serde(rename = "nombre", default)]
  pub name:        String,
  #[serde(rename = "descripcion", default)]
  pub description: Option<String>,
  #[serde(rename = "profesor", default)]
  pub professor:   Option<String>,
  #[serde(rename = "horario", default)]
  pub schedule:    Option<String>,
  #[serde(default)]
  pub color:       Option<String>,
  #[serde(rename = "activa", default)]
  pub active:      bool
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct SubjectPayload {
  #[serde(rename = "nombre")]
  pub name:        String,
  #[serde(rename = "descripcion")]
  pub description: String,
  #[serde(rename = "profesor")]
  pub professor:   String,
  #[serde(rename = "horario")]
  pub schedule:    String,
  pub color:       String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ChatRequest {
  #[serde(rename = "pregunta")]
  pub question: String,
  #[serde(rename = "contexto")]
  pub context:  String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ChatResponse {
  #[serde(rename = "respuesta", default)]
  pub answer: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct StudyPlanRequest {
  #[serde(rename = "materias")]
  pub subjects:        Vec<String>,
  #[serde(rename = "horasDisponibles")]
  pub available_hours: u32
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct StudyPlanResponse {
  #[serde(default)]
  pub plan: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SummaryRequest {
  #[serde(rename = "contenido")]
  pub content: String
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct SummaryResponse {
  #[serde(rename = "resumen", default)]
  pub summary: String
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ActivityDto {
  #[serde(rename = "tipo", default)]
  pub kind:        String,
  #[serde(rename = "descripcion", default)]
  pub description: String,
  #[serde(rename = "fecha", default)]
  pub created_at:  Option<String>
}

#[derive(
  Debug, Clone, Serialize, Deserialize,
)]
pub struct ActivityEnvelope {
  #[serde(rename = "actividades", default)]
  pub entries: Vec<ActivityDto>
}

#[derive(
  Debug,
  Clone,
  Serialize,
  Deserialize,
  PartialEq,
  Eq,
)]
pub struct ActivityCreate {
  #[serde(rename = "tipo")]
  pub kind:        String,
  #[serde(rename = "descripcion")]
  pub description: String
}

/// Error body returned by the API on
/// non-2xx responses. Either field may
/// carry the human readable reason.
#[derive(
  Debug,
  Clone,
  Default,
  Serialize,
  Deserialize,
)]
pub struct ErrorBody {
  #[serde(default)]
  pub message: Option<String>,
  #[serde(default)]
  pub error:   Option<String>
}

impl ErrorBody {
  pub fn into_message(
    self
  ) -> Option<String> {
    self
      .message
      .filter(|m| !m.trim().is_empty())
      .or(
        self.error.filter(|e| {
          !e.trim().is_empty()
        })
      )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn task_reads_legacy_due_field_and_defaults()
  {
    let raw = r#"{
      "id": 7,
      "titulo": "Parcial",
      "fechaVencimiento": "2025-05-02T10:00:00",
      "materia": { "id": 3, "nombre": "Física" }
    }"#;
    let task: TaskDto =
      serde_json::from_str(raw)
        .expect("task json");

    assert_eq!(task.priority, "MEDIA");
    assert!(!task.completed);
    assert_eq!(
      task.due.as_deref(),
      Some("2025-05-02T10:00:00")
    );
    assert_eq!(
      task.subject,
      Some(SubjectRef {
        id:   3,
        name: Some("Física".to_string())
      })
    );
  }

  #[test]
  fn task_payload_omits_empty_optionals()
  {
    let payload = TaskPayload {
      title:       "Leer".to_string(),
      description: String::new(),
      priority:    "ALTA".to_string(),
      due:         None,
      subject:     None
    };
    let value =
      serde_json::to_value(&payload)
        .expect("payload json");

    assert_eq!(value["titulo"], "Leer");
    assert_eq!(value["prioridad"], "ALTA");
    assert!(
      value.get("fechaLimite").is_none()
    );
    assert!(
      value.get("materia").is_none()
    );
  }

  #[test]
  fn error_body_prefers_message_then_error()
  {
    let both: ErrorBody =
      serde_json::from_str(
        r#"{"message":"m","error":"e"}"#
      )
      .expect("error json");
    assert_eq!(
      both.into_message().as_deref(),
      Some("m")
    );

    let only_error: ErrorBody =
      serde_json::from_str(
        r#"{"message":"  ","error":"e"}"#
      )
      .expect("error json");
    assert_eq!(
      only_error
        .into_message()
        .as_deref(),
      Some("e")
    );

    assert_eq!(
      ErrorBody::default().into_message(),
      None
    );
  }

  #[test]
  fn register_request_uses_wire_names() {
    let request = RegisterRequest {
      name:      "Ana".to_string(),
      last_name: "Ruiz".to_string(),
      email:     "ana@example.com"
        .to_string(),
      password:  "secret".to_string()
    };
    let value =
      serde_json::to_value(&request)
        .expect("register json");

    assert_eq!(value["nombre"], "Ana");
    assert_eq!(value["apellido"], "Ruiz");
  }
}
