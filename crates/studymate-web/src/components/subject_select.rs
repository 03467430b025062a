use studymate_core::resource::Subjects;
use studymate_shared::SubjectDto;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};

use crate::api::ClientHandle;

/// What the option values carry: tasks
/// reference a subject by id, notes by
/// name.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum SubjectKey {
  Id,
  Name
}

impl SubjectKey {
  fn value(self, subject: &SubjectDto) -> String {
    match self {
      | SubjectKey::Id => subject.id.to_string(),
      | SubjectKey::Name => subject.name.clone()
    }
  }
}

#[derive(Properties, PartialEq)]
pub struct SubjectSelectProps {
  pub id:        String,
  pub client:    ClientHandle,
  pub key_by:    SubjectKey,
  pub value:     String,
  pub on_change: Callback<web_sys::Event>,
  /// Bumped whenever a subject is saved.
  pub reload:    u64
}

/// Subject dropdown, fetched from
/// `/materias` on mount and on every
/// reload tick.
#[function_component(SubjectSelect)]
pub fn subject_select(
  props: &SubjectSelectProps
) -> Html {
  let subjects =
    use_state(Vec::<SubjectDto>::new);

  {
    let subjects = subjects.clone();
    let client = props.client.clone();
    use_effect_with(
      (props.reload, props.client.clone()),
      move |_| {
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.list::<Subjects>().await {
              | Ok(list) => subjects.set(list),
              | Err(err) => {
                tracing::error!(
                  error = %err,
                  "failed to load subject options"
                );
              }
            }
          }
        );
        || ()
      }
    );
  }

  let key_by = props.key_by;
  html! {
      <select id={props.id.clone()} class="form-select" onchange={props.on_change.clone()}>
          <option value="" selected={props.value.is_empty()}>{ "Sin materia" }</option>
          { for subjects.iter().map(|subject| {
              let value = key_by.value(subject);
              let selected = value == props.value;
              html! {
                  <option key={subject.id} value={value} selected={selected}>{ subject.name.clone() }</option>
              }
          }) }
      </select>
  }
}
