mod activity_feed;
mod auth_modal;
mod chat_panel;
mod entity_panel;
mod feature_cards;
mod loading_overlay;
mod modal;
mod notes_panel;
mod plan_panel;
mod schedule_editor;
mod subject_select;
mod subjects_panel;
mod summary_panel;
mod tasks_panel;
mod toast_host;

pub use activity_feed::ActivityFeed;
pub use auth_modal::AuthModal;
pub use chat_panel::ChatPanel;
pub use feature_cards::{
  Feature,
  FeatureCards
};
pub use loading_overlay::LoadingOverlay;
pub use modal::Modal;
pub use notes_panel::NotesPanel;
pub use plan_panel::PlanPanel;
pub use subjects_panel::SubjectsPanel;
pub use summary_panel::SummaryPanel;
pub use tasks_panel::TasksPanel;
pub use toast_host::ToastHost;
use studymate_core::draft::FormMode;
use wasm_bindgen::JsCast;
use yew::{
  Callback,
  NodeRef,
  UseStateHandle
};

/// An entity dialog's contents. The draft
/// outlives `open` so the form keeps its
/// values during the close animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState<D> {
  pub open:  bool,
  pub mode:  FormMode,
  pub draft: D
}

impl<D: Default> FormState<D> {
  pub fn create() -> Self {
    Self {
      open:  true,
      mode:  FormMode::Create,
      draft: D::default()
    }
  }

  pub fn edit(
    mode: FormMode,
    draft: D
  ) -> Self {
    Self {
      open: true,
      mode,
      draft
    }
  }
}

impl<D> FormState<D> {
  pub fn closed(self) -> Self {
    Self {
      open: false,
      ..self
    }
  }

  pub fn title(
    &self,
    noun: &str
  ) -> String {
    if self.mode.is_edit() {
      format!("Editar {noun}")
    } else {
      format!("Nueva {noun}")
    }
  }
}

/// Current value of an input, textarea or
/// select behind a form event.
pub(crate) fn field_value(
  event: &web_sys::Event
) -> Option<String> {
  let target = event.target()?;
  if let Some(input) =
    target.dyn_ref::<web_sys::HtmlInputElement>()
  {
    return Some(input.value());
  }
  if let Some(area) = target
    .dyn_ref::<web_sys::HtmlTextAreaElement>()
  {
    return Some(area.value());
  }
  if let Some(select) = target
    .dyn_ref::<web_sys::HtmlSelectElement>()
  {
    return Some(select.value());
  }
  tracing::warn!(
    "form event had no value target"
  );
  None
}

/// Callback writing a field's value into a
/// state copy.
pub(crate) fn bind<T, E>(
  state: &UseStateHandle<T>,
  apply: fn(&mut T, String)
) -> Callback<E>
where
  T: Clone + 'static,
  E: AsRef<web_sys::Event> + 'static
{
  let state = state.clone();
  Callback::from(move |e: E| {
    if let Some(value) =
      field_value(e.as_ref())
    {
      let mut next = (*state).clone();
      apply(&mut next, value);
      state.set(next);
    }
  })
}

pub(crate) fn focus(node: &NodeRef) {
  if let Some(element) =
    node.cast::<web_sys::HtmlElement>()
    && let Err(err) = element.focus()
  {
    tracing::debug!(error = ?err, "focus failed");
  }
}

#[cfg(test)]
mod tests {
  use studymate_core::draft::NoteDraft;

  use super::*;

  #[test]
  fn closing_keeps_the_draft() {
    let draft = NoteDraft {
      title: "Parcial".into(),
      ..NoteDraft::default()
    };
    let form = FormState::edit(
      FormMode::Edit(3),
      draft.clone()
    )
    .closed();

    assert!(!form.open);
    assert_eq!(form.mode, FormMode::Edit(3));
    assert_eq!(form.draft, draft);
    assert_eq!(form.title("nota"), "Editar nota");
  }

  #[test]
  fn create_starts_blank() {
    let form = FormState::<NoteDraft>::create();
    assert!(form.open);
    assert_eq!(form.title("nota"), "Nueva nota");
    assert_eq!(form.draft, NoteDraft::default());
  }
}
