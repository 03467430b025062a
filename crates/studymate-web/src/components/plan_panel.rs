use studymate_core::assistant::{
  PlanForm,
  generate_plan
};
use web_sys::{
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_state
};

use super::{
  Modal,
  bind
};
use crate::api::ClientHandle;
use crate::feedback::UiFeedback;

#[derive(Properties, PartialEq)]
pub struct PlanPanelProps {
  pub open:     bool,
  pub on_close: Callback<()>,
  pub client:   ClientHandle,
  pub feedback: UiFeedback
}

#[function_component(PlanPanel)]
pub fn plan_panel(
  props: &PlanPanelProps
) -> Html {
  let form = use_state(PlanForm::default);
  let plan = use_state(|| None::<String>);
  let busy = use_state(|| false);

  let on_subjects =
    bind::<_, InputEvent>(&form, |f, v| {
      f.subjects = v
    });
  let on_hours = bind::<_, InputEvent>(
    &form,
    |f, v| f.hours = v
  );

  let on_submit = {
    let form = form.clone();
    let plan = plan.clone();
    let busy = busy.clone();
    let client = props.client.clone();
    let feedback = props.feedback.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *busy {
        return;
      }
      busy.set(true);

      let submitted = (*form).clone();
      let plan = plan.clone();
      let busy = busy.clone();
      let client = client.clone();
      let feedback = feedback.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          if let Some(text) = generate_plan(
            &*client, &feedback, &submitted
          )
          .await
          {
            plan.set(Some(text));
          }
          busy.set(false);
        }
      );
    })
  };

  html! {
      <Modal id="plan-estudio" open={props.open} title="Plan de estudio" wide={true} on_close={props.on_close.clone()}>
          <form onsubmit={on_submit}>
              <div class="mb-3">
                  <label class="form-label" for="plan-materias">{ "Materias (separadas por coma)" }</label>
                  <input id="plan-materias" class="form-control" type="text" placeholder="Matemáticas, Física" value={form.subjects.clone()} oninput={on_subjects} />
              </div>
              <div class="mb-3">
                  <label class="form-label" for="plan-horas">{ "Horas disponibles" }</label>
                  <input id="plan-horas" class="form-control" type="number" min="1" value={form.hours.clone()} oninput={on_hours} />
              </div>
              <button type="submit" class="btn btn-primary" disabled={*busy}>
                  <i class="fas fa-magic me-1"></i>{ "Generar plan" }
              </button>
          </form>
          if let Some(text) = (*plan).clone() {
              <div class="card mt-3">
                  <div class="card-body ai-output">{ text }</div>
              </div>
          }
      </Modal>
  }
}
