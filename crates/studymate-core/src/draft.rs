//! Typed create/edit form state for
//! notes, tasks and subjects.
//!
//! A draft is bound to its dialog once
//! and turned into a [`Submission`] only
//! after the required fields check out,
//! so a failed check never reaches the
//! network.

use chrono::{
  DateTime,
  NaiveDateTime
};
use studymate_shared::{
  NoteDto,
  NotePayload,
  RecordId,
  SubjectDto,
  SubjectPayload,
  SubjectRef,
  TaskDto,
  TaskPayload
};

use crate::api::Method;
use crate::error::ValidationError;
use crate::priority::Priority;
use crate::resource::{
  Notes,
  Resource,
  Subjects,
  Tasks
};
use crate::schedule::ScheduleRows;

pub const DEFAULT_SUBJECT_COLOR: &str =
  "#6c757d";

const DUE_INPUT_FORMAT: &str =
  "%Y-%m-%dT%H:%M";
const DUE_WIRE_FORMAT: &str =
  "%Y-%m-%dT%H:%M:00";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum FormMode {
  #[default]
  Create,
  Edit(RecordId)
}

impl FormMode {
  pub fn method(self) -> Method {
    match self {
      | FormMode::Create => Method::Post,
      | FormMode::Edit(_) => Method::Put
    }
  }

  pub fn path<R: Resource>(
    self
  ) -> String {
    match self {
      | FormMode::Create => {
        R::collection_path()
      }
      | FormMode::Edit(id) => {
        R::item_path(id)
      }
    }
  }

  pub fn edit_id(
    self
  ) -> Option<RecordId> {
    match self {
      | FormMode::Create => None,
      | FormMode::Edit(id) => Some(id)
    }
  }

  pub fn is_edit(self) -> bool {
    matches!(self, FormMode::Edit(_))
  }
}

/// A validated draft ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<P> {
  pub mode:            FormMode,
  pub method:          Method,
  pub path:            String,
  pub payload:         P,
  pub success_message: String,
  pub activity:        String
}

pub trait EntityDraft:
  Default + Clone + PartialEq
{
  type Resource: Resource;

  fn from_record(
    record: &<Self::Resource as Resource>::Record
  ) -> Self;

  fn validate(
    &self
  ) -> Result<(), ValidationError>;

  fn payload(
    &self
  ) -> <Self::Resource as Resource>::Payload;

  /// Human readable name used in the
  /// activity log.
  fn label(&self) -> String;

  fn submission(
    &self,
    mode: FormMode
  ) -> Result<
    Submission<
      <Self::Resource as Resource>::Payload
    >,
    ValidationError
  > {
    self.validate()?;

    let label = <Self::Resource as Resource>::LABEL;
    let (success_message, activity) =
      match mode {
        | FormMode::Create => (
          <Self::Resource as Resource>::created_message(),
          format!(
            "{label} creada: {}",
            self.label()
          )
        ),
        | FormMode::Edit(_) => (
          <Self::Resource as Resource>::updated_message(),
          format!(
            "{label} actualizada: {}",
            self.label()
          )
        )
      };

    Ok(Submission {
      mode,
      method: mode.method(),
      path: mode.path::<Self::Resource>(),
      payload: self.payload(),
      success_message,
      activity
    })
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct NoteDraft {
  pub title:   String,
  pub content: String,
  /// Subject name, empty for none.
  pub subject: String
}

impl EntityDraft for NoteDraft {
  type Resource = Notes;

  fn from_record(record: &NoteDto) -> Self {
    Self {
      title:   record.title.clone(),
      content: record.content.clone(),
      subject: record
        .subject
        .clone()
        .unwrap_or_default()
    }
  }

  fn validate(
    &self
  ) -> Result<(), ValidationError> {
    if self.title.trim().is_empty() {
      return Err(ValidationError::required(
        "titulo",
        "El título de la nota es \
         obligatorio"
      ));
    }
    if self.content.trim().is_empty() {
      return Err(ValidationError::required(
        "contenido",
        "El contenido de la nota es \
         obligatorio"
      ));
    }
    Ok(())
  }

  fn payload(&self) -> NotePayload {
    NotePayload {
      title:   self.title.trim().to_string(),
      content: self
        .content
        .trim()
        .to_string(),
      subject: self
        .subject
        .trim()
        .to_string()
    }
  }

  fn label(&self) -> String {
    self.title.trim().to_string()
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct TaskDraft {
  pub title:       String,
  pub description: String,
  pub priority:    Priority,
  /// Raw `datetime-local` input value.
  pub due:         String,
  pub subject_id:  Option<RecordId>
}

impl EntityDraft for TaskDraft {
  type Resource = Tasks;

  fn from_record(record: &TaskDto) -> Self {
    Self {
      title:       record.title.clone(),
      description: record
        .description
        .clone()
        .unwrap_or_default(),
      priority:    Priority::from_wire(
        &record.priority
      )
      .unwrap_or_default(),
      due:         record
        .due
        .as_deref()
        .map(due_from_wire)
        .unwrap_or_default(),
      subject_id:  record
        .subject
        .as_ref()
        .map(|subject| subject.id)
    }
  }

  fn validate(
    &self
  ) -> Result<(), ValidationError> {
    if self.title.trim().is_empty() {
      return Err(ValidationError::required(
        "titulo",
        "El título de la tarea es \
         obligatorio"
      ));
    }
    Ok(())
  }

  fn payload(&self) -> TaskPayload {
    TaskPayload {
      title:       self.title.trim().to_string(),
      description: self
        .description
        .trim()
        .to_string(),
      priority:    self
        .priority
        .as_wire()
        .to_string(),
      due:         due_to_wire(&self.due),
      subject:     self.subject_id.map(
        |id| SubjectRef { id, name: None }
      )
    }
  }

  fn label(&self) -> String {
    self.title.trim().to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectDraft {
  pub name:        String,
  pub description: String,
  pub professor:   String,
  pub color:       String,
  pub schedule:    ScheduleRows
}

impl Default for SubjectDraft {
  fn default() -> Self {
    Self {
      name:        String::new(),
      description: String::new(),
      professor:   String::new(),
      color:       DEFAULT_SUBJECT_COLOR
        .to_string(),
      schedule:    ScheduleRows::blank()
    }
  }
}

impl EntityDraft for SubjectDraft {
  type Resource = Subjects;

  fn from_record(
    record: &SubjectDto
  ) -> Self {
    Self {
      name:        record.name.clone(),
      description: record
        .description
        .clone()
        .unwrap_or_default(),
      professor:   record
        .professor
        .clone()
        .unwrap_or_default(),
      color:       record
        .color
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| {
          DEFAULT_SUBJECT_COLOR.to_string()
        }),
      schedule:    ScheduleRows::from_schedule(
        record.schedule.as_deref()
      )
    }
  }

  fn validate(
    &self
  ) -> Result<(), ValidationError> {
    if self.name.trim().is_empty() {
      return Err(ValidationError::required(
        "nombre",
        "El nombre de la materia es \
         obligatorio"
      ));
    }
    Ok(())
  }

  fn payload(&self) -> SubjectPayload {
    SubjectPayload {
      name:        self.name.trim().to_string(),
      description: self
        .description
        .trim()
        .to_string(),
      professor:   self
        .professor
        .trim()
        .to_string(),
      schedule:    self
        .schedule
        .to_schedule_string(),
      color:       self.color.clone()
    }
  }

  fn label(&self) -> String {
    self.name.trim().to_string()
  }
}

/// Select value of a subject dropdown;
/// the empty option means no subject.
pub fn parse_subject_choice(
  raw: &str
) -> Option<RecordId> {
  raw.trim().parse().ok()
}

/// `datetime-local` input to the
/// `fechaLimite` wire form. Blank input is
/// no due date; unparseable input is
/// dropped with a warning.
pub fn due_to_wire(
  input: &str
) -> Option<String> {
  let input = input.trim();
  if input.is_empty() {
    return None;
  }

  match parse_server_datetime(input) {
    | Some(at) => {
      Some(
        at.format(DUE_WIRE_FORMAT)
          .to_string()
      )
    }
    | None => {
      tracing::warn!(
        input,
        "ignoring invalid task due date"
      );
      None
    }
  }
}

/// Server due date to the
/// `datetime-local` input form.
pub fn due_from_wire(raw: &str) -> String {
  parse_server_datetime(raw)
    .map(|at| {
      at.format(DUE_INPUT_FORMAT)
        .to_string()
    })
    .unwrap_or_default()
}

pub fn parse_server_datetime(
  raw: &str
) -> Option<NaiveDateTime> {
  let raw = raw.trim();

  for format in [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S"
  ] {
    if let Ok(at) =
      NaiveDateTime::parse_from_str(
        raw, format
      )
    {
      return Some(at);
    }
  }

  DateTime::parse_from_rfc3339(raw)
    .ok()
    .map(|at| at.naive_local())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mode_selects_verb_and_path() {
    assert_eq!(
      FormMode::Create.method(),
      Method::Post
    );
    assert_eq!(
      FormMode::Create.path::<Notes>(),
      "/notas"
    );
    assert_eq!(
      FormMode::Edit(4).method(),
      Method::Put
    );
    assert_eq!(
      FormMode::Edit(4).path::<Tasks>(),
      "/tareas/4"
    );
    assert_eq!(
      FormMode::Edit(4).edit_id(),
      Some(4)
    );
  }

  #[test]
  fn note_checks_title_before_content() {
    let draft = NoteDraft::default();
    let err = draft
      .submission(FormMode::Create)
      .expect_err("blank note");
    assert_eq!(err.field, "titulo");

    let draft = NoteDraft {
      title: "Repaso".to_string(),
      ..NoteDraft::default()
    };
    let err = draft
      .submission(FormMode::Create)
      .expect_err("blank content");
    assert_eq!(
      err.message,
      "El contenido de la nota es \
       obligatorio"
    );
  }

  #[test]
  fn note_submission_carries_messages() {
    let draft = NoteDraft {
      title:   "  Repaso ".to_string(),
      content: "Capítulo 3".to_string(),
      subject: "Física".to_string()
    };
    let submission = draft
      .submission(FormMode::Edit(9))
      .expect("valid note");

    assert_eq!(
      submission.path,
      "/notas/9"
    );
    assert_eq!(
      submission.payload.title,
      "Repaso"
    );
    assert_eq!(
      submission.success_message,
      "Nota actualizada exitosamente"
    );
    assert_eq!(
      submission.activity,
      "Nota actualizada: Repaso"
    );
  }

  #[test]
  fn task_due_date_and_subject_mapping() {
    let draft = TaskDraft {
      title: "Entregar informe"
        .to_string(),
      priority: Priority::High,
      due: "2025-06-01T08:30".to_string(),
      subject_id: parse_subject_choice(
        "3"
      ),
      ..TaskDraft::default()
    };
    let payload = draft.payload();

    assert_eq!(payload.priority, "ALTA");
    assert_eq!(
      payload.due.as_deref(),
      Some("2025-06-01T08:30:00")
    );
    assert_eq!(
      payload.subject,
      Some(SubjectRef { id: 3, name: None })
    );

    let bad = TaskDraft {
      due: "mañana".to_string(),
      subject_id: parse_subject_choice(""),
      ..draft
    };
    let payload = bad.payload();
    assert_eq!(payload.due, None);
    assert_eq!(payload.subject, None);
  }

  #[test]
  fn task_prefills_from_record() {
    let record = TaskDto {
      id:          5,
      title:       "Parcial".to_string(),
      description: None,
      priority:    "URGENTE".to_string(),
      due:         Some(
        "2025-05-02T10:00:00".to_string()
      ),
      completed:   false,
      subject:     Some(SubjectRef {
        id:   2,
        name: Some("Química".to_string())
      })
    };
    let draft =
      TaskDraft::from_record(&record);

    assert_eq!(
      draft.priority,
      Priority::Urgent
    );
    assert_eq!(draft.due, "2025-05-02T10:00");
    assert_eq!(draft.subject_id, Some(2));
    assert!(draft.description.is_empty());
  }

  #[test]
  fn subject_defaults_and_schedule() {
    let draft = SubjectDraft::default();
    assert_eq!(
      draft.color,
      DEFAULT_SUBJECT_COLOR
    );
    assert_eq!(draft.schedule.len(), 1);
    assert!(draft.validate().is_err());

    let record = SubjectDto {
      id:          1,
      name:        "Álgebra".to_string(),
      description: None,
      professor:   Some("Pérez".to_string()),
      schedule:    Some(
        "Lunes 08:00-10:00".to_string()
      ),
      color:       None,
      active:      true
    };
    let draft =
      SubjectDraft::from_record(&record);
    let payload = draft.payload();

    assert_eq!(
      payload.schedule,
      "Lunes 08:00-10:00"
    );
    assert_eq!(
      payload.color,
      DEFAULT_SUBJECT_COLOR
    );
    assert_eq!(payload.professor, "Pérez");
  }

  #[test]
  fn server_datetimes_parse_in_several_forms()
  {
    for raw in [
      "2025-03-04T09:05:00",
      "2025-03-04T09:05:00.123456",
      "2025-03-04T09:05",
      "2025-03-04T09:05:00Z"
    ] {
      let at = parse_server_datetime(raw)
        .expect("datetime");
      assert_eq!(
        at.format("%H:%M").to_string(),
        "09:05"
      );
    }
    assert!(
      parse_server_datetime("ayer")
        .is_none()
    );
  }
}
