//! Create, edit, delete and complete flows
//! shared by every entity panel.
//!
//! After a successful write the order is
//! fixed: success notice, form closed, list
//! reloaded, one activity entry appended.

use studymate_shared::{
  ActivityCreate,
  RecordId
};

use crate::api::{
  ApiClient,
  Transport
};
use crate::draft::{
  EntityDraft,
  FormMode
};
use crate::error::{
  ApiError,
  CONNECTION_ERROR
};
use crate::notify::NoticeLevel;
use crate::resource::{
  Resource,
  Tasks
};

pub const TASK_COMPLETED_MESSAGE: &str =
  "Tarea marcada como completada";
pub const TASK_COMPLETE_FAILED_MESSAGE: &str =
  "Error al completar la tarea";

/// UI hooks a workflow drives.
pub trait Feedback {
  fn notify(
    &self,
    level: NoticeLevel,
    message: &str
  );

  fn loading(&self, active: bool);

  fn confirm(&self, prompt: &str) -> bool;

  /// An activity entry was stored.
  fn activity_logged(&self) {}
}

pub trait EntityView<R: Resource>: Feedback {
  fn close_form(&self);

  fn show_records(
    &self,
    records: Vec<R::Record>
  );
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Outcome {
  /// Validation failed; nothing was sent.
  Invalid,
  /// The user declined the confirmation.
  Cancelled,
  Failed,
  Done { activity_logged: bool }
}

impl Outcome {
  pub fn is_done(self) -> bool {
    matches!(self, Outcome::Done { .. })
  }
}

pub(crate) fn report_failure<F: Feedback + ?Sized>(
  feedback: &F,
  err: &ApiError,
  fallback: &str
) {
  tracing::error!(
    error = %err,
    fallback,
    "entity request failed"
  );
  let message = if err.is_transport() {
    CONNECTION_ERROR.to_string()
  } else {
    err.user_message(fallback)
  };
  feedback.notify(NoticeLevel::Error, &message);
}

/// Failures only reach the log.
pub async fn log_activity<T, F>(
  client: &ApiClient<T>,
  feedback: &F,
  entry: ActivityCreate
) -> bool
where
  T: Transport,
  F: Feedback + ?Sized
{
  match client.log_activity(&entry).await {
    | Ok(()) => {
      feedback.activity_logged();
      true
    }
    | Err(err) => {
      tracing::warn!(
        error = %err,
        kind = %entry.kind,
        "failed to record activity"
      );
      false
    }
  }
}

/// List failures are logged and leave the
/// current list untouched.
pub async fn load<R, T, V>(
  client: &ApiClient<T>,
  view: &V
) -> bool
where
  R: Resource,
  T: Transport,
  V: EntityView<R> + ?Sized
{
  match client.list::<R>().await {
    | Ok(records) => {
      tracing::debug!(
        collection = R::COLLECTION,
        count = records.len(),
        "collection loaded"
      );
      view.show_records(records);
      true
    }
    | Err(err) => {
      tracing::error!(
        collection = R::COLLECTION,
        error = %err,
        "failed to load collection"
      );
      false
    }
  }
}

/// Fetches a record and builds the
/// pre-filled draft for its edit form.
pub async fn open_edit<D, T, F>(
  client: &ApiClient<T>,
  feedback: &F,
  id: RecordId
) -> Option<D>
where
  D: EntityDraft,
  T: Transport,
  F: Feedback + ?Sized
{
  match client.fetch::<D::Resource>(id).await
  {
    | Ok(record) => {
      Some(D::from_record(&record))
    }
    | Err(err) => {
      report_failure(
        feedback,
        &err,
        &<D::Resource as Resource>::load_failed_message()
      );
      None
    }
  }
}

pub async fn submit<D, T, V>(
  client: &ApiClient<T>,
  view: &V,
  draft: &D,
  mode: FormMode
) -> Outcome
where
  D: EntityDraft,
  T: Transport,
  V: EntityView<D::Resource> + ?Sized
{
  let submission = match draft.submission(mode)
  {
    | Ok(submission) => submission,
    | Err(err) => {
      tracing::debug!(
        field = err.field,
        "draft rejected before submit"
      );
      view.notify(
        NoticeLevel::Error,
        &err.message
      );
      return Outcome::Invalid;
    }
  };

  view.loading(true);
  let result = client.submit(&submission).await;
  view.loading(false);

  if let Err(err) = result {
    report_failure(
      view,
      &err,
      &<D::Resource as Resource>::save_failed_message()
    );
    return Outcome::Failed;
  }

  view.notify(
    NoticeLevel::Success,
    &submission.success_message
  );
  view.close_form();
  load::<D::Resource, _, _>(client, view).await;
  let activity_logged = log_activity(
    client,
    view,
    <D::Resource as Resource>::ACTIVITY
      .entry(submission.activity)
  )
  .await;

  Outcome::Done { activity_logged }
}

pub async fn delete<R, T, V>(
  client: &ApiClient<T>,
  view: &V,
  id: RecordId
) -> Outcome
where
  R: Resource,
  T: Transport,
  V: EntityView<R> + ?Sized
{
  if !view.confirm(&R::delete_prompt()) {
    return Outcome::Cancelled;
  }

  view.loading(true);
  let result = client.delete::<R>(id).await;
  view.loading(false);

  if let Err(err) = result {
    report_failure(
      view,
      &err,
      &R::delete_failed_message()
    );
    return Outcome::Failed;
  }

  view.notify(
    NoticeLevel::Success,
    &R::deleted_message()
  );
  view.close_form();
  load::<R, _, _>(client, view).await;
  let activity_logged = log_activity(
    client,
    view,
    R::ACTIVITY
      .entry(format!("{} eliminada", R::LABEL))
  )
  .await;

  Outcome::Done { activity_logged }
}

pub async fn complete_task<T, V>(
  client: &ApiClient<T>,
  view: &V,
  id: RecordId
) -> Outcome
where
  T: Transport,
  V: EntityView<Tasks> + ?Sized
{
  view.loading(true);
  let result = client.complete_task(id).await;
  view.loading(false);

  if let Err(err) = result {
    report_failure(
      view,
      &err,
      TASK_COMPLETE_FAILED_MESSAGE
    );
    return Outcome::Failed;
  }

  view.notify(
    NoticeLevel::Success,
    TASK_COMPLETED_MESSAGE
  );
  view.close_form();
  load::<Tasks, _, _>(client, view).await;
  let activity_logged = log_activity(
    client,
    view,
    Tasks::ACTIVITY.entry("Tarea completada")
  )
  .await;

  Outcome::Done { activity_logged }
}
