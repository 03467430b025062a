//! Chatbot, study plan and summary flows.

use studymate_shared::{
  ChatRequest,
  StudyPlanRequest,
  SummaryRequest
};

use crate::activity::ActivityKind;
use crate::api::{
  ApiClient,
  FileUpload,
  Transport
};
use crate::error::ValidationError;
use crate::notify::NoticeLevel;
use crate::workflow::{
  Feedback,
  log_activity,
  report_failure
};

pub const DEFAULT_CHAT_CONTEXT: &str =
  "Chat académico";
pub const CHAT_GREETING: &str =
  "¡Hola! Soy tu asistente de estudio. \
   ¿En qué puedo ayudarte hoy?";
pub const CHAT_FAILED_REPLY: &str =
  "Lo siento, hubo un error al procesar tu \
   pregunta. Por favor, intenta de nuevo.";
pub const CHAT_OFFLINE_REPLY: &str =
  "Error de conexión. Por favor, verifica \
   tu conexión a internet.";
pub const PLAN_FIELDS_REQUIRED: &str =
  "Por favor, completa todos los campos";
pub const PLAN_HOURS_INVALID: &str =
  "Las horas disponibles deben ser un \
   número positivo";
pub const PLAN_FAILED: &str =
  "Error al generar el plan";
pub const SUMMARY_INPUT_REQUIRED: &str =
  "Por favor, sube un archivo PDF o \
   ingresa contenido para resumir";
pub const SUMMARY_FAILED: &str =
  "Error al generar el resumen";
pub const SUMMARY_FILE_FIELD: &str =
  "archivo";

const QUESTION_PREVIEW_CHARS: usize = 50;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Speaker {
  User,
  Bot
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
  pub speaker: Speaker,
  pub text:    String
}

impl ChatMessage {
  pub fn user(text: impl Into<String>) -> Self {
    Self {
      speaker: Speaker::User,
      text:    text.into()
    }
  }

  pub fn bot(text: impl Into<String>) -> Self {
    Self {
      speaker: Speaker::Bot,
      text:    text.into()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
  messages: Vec<ChatMessage>,
  pending:  bool
}

impl Default for ChatTranscript {
  fn default() -> Self {
    Self {
      messages: vec![ChatMessage::bot(
        CHAT_GREETING
      )],
      pending:  false
    }
  }
}

impl ChatTranscript {
  pub fn messages(&self) -> &[ChatMessage] {
    &self.messages
  }

  /// While a reply is pending the send
  /// button stays disabled.
  pub fn is_pending(&self) -> bool {
    self.pending
  }

  /// Records the question and marks the
  /// transcript pending. Blank input is
  /// ignored and yields `None`.
  pub fn ask(
    &mut self,
    raw: &str
  ) -> Option<String> {
    let question = raw.trim();
    if question.is_empty() || self.pending {
      return None;
    }
    self
      .messages
      .push(ChatMessage::user(question));
    self.pending = true;
    Some(question.to_string())
  }

  pub fn answer(&mut self, reply: ChatMessage) {
    self.messages.push(reply);
    self.pending = false;
  }
}

/// Activity text for a chat question:
/// the first 50 characters and an
/// ellipsis.
pub fn question_activity(
  question: &str
) -> String {
  let preview: String = question
    .chars()
    .take(QUESTION_PREVIEW_CHARS)
    .collect();
  format!("Pregunta: {preview}...")
}

/// Sends one question and returns the bot
/// message to append, which is an apology
/// when the call fails.
pub async fn send_chat<T, F>(
  client: &ApiClient<T>,
  feedback: &F,
  question: &str,
  context: &str
) -> ChatMessage
where
  T: Transport,
  F: Feedback + ?Sized
{
  let request = ChatRequest {
    question: question.to_string(),
    context:  context.to_string()
  };

  match client.chat(&request).await {
    | Ok(response) => {
      log_activity(
        client,
        feedback,
        ActivityKind::Chat
          .entry(question_activity(question))
      )
      .await;
      ChatMessage::bot(response.answer)
    }
    | Err(err) => {
      tracing::error!(
        error = %err,
        "chat request failed"
      );
      if err.is_transport() {
        ChatMessage::bot(CHAT_OFFLINE_REPLY)
      } else {
        ChatMessage::bot(CHAT_FAILED_REPLY)
      }
    }
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct PlanForm {
  /// Comma separated subject names.
  pub subjects: String,
  pub hours:    String
}

impl PlanForm {
  pub fn request(
    &self
  ) -> Result<StudyPlanRequest, ValidationError>
  {
    let subjects: Vec<String> = self
      .subjects
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
      .collect();
    let hours = self.hours.trim();

    if subjects.is_empty() || hours.is_empty()
    {
      return Err(ValidationError::required(
        if subjects.is_empty() {
          "materias"
        } else {
          "horasDisponibles"
        },
        PLAN_FIELDS_REQUIRED
      ));
    }

    let available_hours = hours
      .parse::<u32>()
      .ok()
      .filter(|h| *h > 0)
      .ok_or_else(|| {
        ValidationError::required(
          "horasDisponibles",
          PLAN_HOURS_INVALID
        )
      })?;

    Ok(StudyPlanRequest {
      subjects,
      available_hours
    })
  }
}

pub async fn generate_plan<T, F>(
  client: &ApiClient<T>,
  feedback: &F,
  form: &PlanForm
) -> Option<String>
where
  T: Transport,
  F: Feedback + ?Sized
{
  let request = match form.request() {
    | Ok(request) => request,
    | Err(err) => {
      feedback
        .notify(NoticeLevel::Error, &err.message);
      return None;
    }
  };

  feedback.loading(true);
  let result = client.study_plan(&request).await;
  feedback.loading(false);

  match result {
    | Ok(response) => {
      log_activity(
        client,
        feedback,
        ActivityKind::Plan.entry(format!(
          "Generado para {} materias",
          request.subjects.len()
        ))
      )
      .await;
      Some(response.plan)
    }
    | Err(err) => {
      report_failure(feedback, &err, PLAN_FAILED);
      None
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummarySource {
  File(FileUpload),
  Text(String)
}

impl SummarySource {
  /// A chosen file wins over pasted text.
  pub fn pick(
    file: Option<FileUpload>,
    text: &str
  ) -> Result<Self, ValidationError> {
    if let Some(file) = file {
      return Ok(SummarySource::File(file));
    }
    let text = text.trim();
    if text.is_empty() {
      return Err(ValidationError::required(
        "contenido",
        SUMMARY_INPUT_REQUIRED
      ));
    }
    Ok(SummarySource::Text(text.to_string()))
  }

  pub fn activity(&self) -> String {
    match self {
      | SummarySource::File(file) => format!(
        "Resumen generado de archivo: {}",
        file.file_name
      ),
      | SummarySource::Text(text) => format!(
        "Resumen generado ({} caracteres)",
        text.chars().count()
      )
    }
  }
}

pub async fn summarize<T, F>(
  client: &ApiClient<T>,
  feedback: &F,
  source: SummarySource
) -> Option<String>
where
  T: Transport,
  F: Feedback + ?Sized
{
  let activity = source.activity();

  feedback.loading(true);
  let result = match source {
    | SummarySource::File(file) => {
      client.summarize_file(file).await
    }
    | SummarySource::Text(content) => {
      client
        .summarize_text(&SummaryRequest {
          content
        })
        .await
    }
  };
  feedback.loading(false);

  match result {
    | Ok(response) => {
      log_activity(
        client,
        feedback,
        ActivityKind::Pdf.entry(activity)
      )
      .await;
      Some(response.summary)
    }
    | Err(err) => {
      report_failure(
        feedback,
        &err,
        SUMMARY_FAILED
      );
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn transcript_ignores_blank_and_pending() {
    let mut transcript =
      ChatTranscript::default();
    assert_eq!(transcript.messages().len(), 1);

    assert_eq!(transcript.ask("   "), None);
    assert_eq!(
      transcript.ask(" ¿Qué es un vector? "),
      Some("¿Qué es un vector?".to_string())
    );
    assert!(transcript.is_pending());
    assert_eq!(transcript.ask("otra"), None);

    transcript
      .answer(ChatMessage::bot("Una magnitud"));
    assert!(!transcript.is_pending());
    assert_eq!(transcript.messages().len(), 3);
    assert_eq!(
      transcript.messages()[1].speaker,
      Speaker::User
    );
  }

  #[test]
  fn question_activity_truncates_by_chars() {
    let long = "á".repeat(60);
    let text = question_activity(&long);
    assert_eq!(
      text,
      format!("Pregunta: {}...", "á".repeat(50))
    );
    assert_eq!(
      question_activity("hola"),
      "Pregunta: hola..."
    );
  }

  #[test]
  fn plan_form_validation() {
    let form = PlanForm {
      subjects: " Física, , Química ,"
        .to_string(),
      hours:    "12".to_string()
    };
    let request =
      form.request().expect("valid plan");
    assert_eq!(
      request.subjects,
      vec!["Física", "Química"]
    );
    assert_eq!(request.available_hours, 12);

    let missing = PlanForm {
      subjects: " , ".to_string(),
      hours:    "4".to_string()
    };
    assert_eq!(
      missing
        .request()
        .expect_err("no subjects")
        .message,
      PLAN_FIELDS_REQUIRED
    );

    let zero = PlanForm {
      hours: "0".to_string(),
      ..form
    };
    assert_eq!(
      zero
        .request()
        .expect_err("zero hours")
        .message,
      PLAN_HOURS_INVALID
    );
  }

  #[test]
  fn file_takes_precedence_over_text() {
    let file = FileUpload {
      field:     SUMMARY_FILE_FIELD
        .to_string(),
      file_name: "tema1.pdf".to_string(),
      mime:      Some(
        "application/pdf".to_string()
      ),
      bytes:     vec![1, 2, 3]
    };
    let source = SummarySource::pick(
      Some(file),
      "texto pegado"
    )
    .expect("file source");
    assert_eq!(
      source.activity(),
      "Resumen generado de archivo: \
       tema1.pdf"
    );

    let source =
      SummarySource::pick(None, " señal ")
        .expect("text source");
    assert_eq!(
      source.activity(),
      "Resumen generado (5 caracteres)"
    );

    assert_eq!(
      SummarySource::pick(None, "  ")
        .expect_err("nothing to summarize")
        .message,
      SUMMARY_INPUT_REQUIRED
    );
  }
}
