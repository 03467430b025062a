//! Server-owned collections and the
//! wording the UI uses for each of them.

use serde::Serialize;
use serde::de::DeserializeOwned;
use studymate_shared::{
  NoteDto,
  NotePayload,
  RecordId,
  SubjectDto,
  SubjectPayload,
  TaskDto,
  TaskPayload
};

use crate::activity::ActivityKind;

pub trait Resource {
  type Record: DeserializeOwned
    + Clone
    + PartialEq;
  type Payload: Serialize;

  /// Path segment under the API base,
  /// also the key of the list envelope.
  const COLLECTION: &'static str;
  /// Lowercase singular noun.
  const NOUN: &'static str;
  /// Capitalized singular noun.
  const LABEL: &'static str;
  const ACTIVITY: ActivityKind;

  fn record_id(
    record: &Self::Record
  ) -> RecordId;

  fn collection_path() -> String {
    format!("/{}", Self::COLLECTION)
  }

  fn item_path(id: RecordId) -> String {
    format!(
      "/{}/{id}",
      Self::COLLECTION
    )
  }

  fn created_message() -> String {
    format!(
      "{} creada exitosamente",
      Self::LABEL
    )
  }

  fn updated_message() -> String {
    format!(
      "{} actualizada exitosamente",
      Self::LABEL
    )
  }

  fn deleted_message() -> String {
    format!(
      "{} eliminada correctamente",
      Self::LABEL
    )
  }

  fn save_failed_message() -> String {
    format!(
      "Error al procesar {}",
      Self::NOUN
    )
  }

  fn load_failed_message() -> String {
    format!(
      "Error al cargar la {}",
      Self::NOUN
    )
  }

  fn delete_failed_message() -> String {
    format!(
      "Error al eliminar la {}",
      Self::NOUN
    )
  }

  fn delete_prompt() -> String {
    format!(
      "¿Estás seguro de que quieres \
       eliminar esta {}?",
      Self::NOUN
    )
  }

  fn empty_message() -> String {
    format!(
      "No hay {} disponibles",
      Self::COLLECTION
    )
  }
}

#[derive(Debug, Clone, Copy)]
pub struct Notes;

#[derive(Debug, Clone, Copy)]
pub struct Tasks;

#[derive(Debug, Clone, Copy)]
pub struct Subjects;

impl Resource for Notes {
  type Payload = NotePayload;
  type Record = NoteDto;

  const ACTIVITY: ActivityKind =
    ActivityKind::Note;
  const COLLECTION: &'static str =
    "notas";
  const LABEL: &'static str = "Nota";
  const NOUN: &'static str = "nota";

  fn record_id(
    record: &NoteDto
  ) -> RecordId {
    record.id
  }
}

impl Resource for Tasks {
  type Payload = TaskPayload;
  type Record = TaskDto;

  const ACTIVITY: ActivityKind =
    ActivityKind::Task;
  const COLLECTION: &'static str =
    "tareas";
  const LABEL: &'static str = "Tarea";
  const NOUN: &'static str = "tarea";

  fn record_id(
    record: &TaskDto
  ) -> RecordId {
    record.id
  }
}

impl Resource for Subjects {
  type Payload = SubjectPayload;
  type Record = SubjectDto;

  const ACTIVITY: ActivityKind =
    ActivityKind::Subject;
  const COLLECTION: &'static str =
    "materias";
  const LABEL: &'static str = "Materia";
  const NOUN: &'static str = "materia";

  fn record_id(
    record: &SubjectDto
  ) -> RecordId {
    record.id
  }
}
