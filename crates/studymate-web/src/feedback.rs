use gloo::console::log;
use studymate_core::notify::NoticeLevel;
use studymate_core::resource::Resource;
use studymate_core::workflow::{
  EntityView,
  Feedback
};
use yew::Callback;

pub fn ui_debug(
  event: &str,
  detail: &str
) {
  tracing::debug!(
    event, detail, "ui-debug"
  );
  log!(format!(
    "[ui-debug] {event}: {detail}"
  ));
}

/// Workflow hooks routed to the app's
/// toast stack, loading overlay and
/// activity feed.
#[derive(Clone, PartialEq)]
pub struct UiFeedback {
  pub notify:   Callback<(NoticeLevel, String)>,
  pub loading:  Callback<bool>,
  pub activity: Callback<()>
}

impl Feedback for UiFeedback {
  fn notify(
    &self,
    level: NoticeLevel,
    message: &str
  ) {
    self
      .notify
      .emit((level, message.to_string()));
  }

  fn loading(&self, active: bool) {
    self.loading.emit(active);
  }

  fn confirm(&self, prompt: &str) -> bool {
    let accepted =
      gloo::dialogs::confirm(prompt);
    ui_debug(
      "confirm",
      if accepted { "accepted" } else { "declined" }
    );
    accepted
  }

  fn activity_logged(&self) {
    self.activity.emit(());
  }
}

/// One entity panel: where reloaded
/// records go and how its form closes.
pub struct PanelView<R: Resource> {
  pub feedback: UiFeedback,
  pub records:  Callback<Vec<R::Record>>,
  pub close:    Callback<()>
}

impl<R: Resource> Feedback for PanelView<R> {
  fn notify(
    &self,
    level: NoticeLevel,
    message: &str
  ) {
    self.feedback.notify(level, message);
  }

  fn loading(&self, active: bool) {
    self.feedback.loading(active);
  }

  fn confirm(&self, prompt: &str) -> bool {
    self.feedback.confirm(prompt)
  }

  fn activity_logged(&self) {
    self.feedback.activity_logged();
  }
}

impl<R: Resource> EntityView<R> for PanelView<R> {
  fn close_form(&self) {
    self.close.emit(());
  }

  fn show_records(
    &self,
    records: Vec<R::Record>
  ) {
    self.records.emit(records);
  }
}
