use studymate_core::draft::{
  TaskDraft,
  due_from_wire,
  parse_subject_choice
};
use studymate_core::priority::{
  Priority,
  badge_for
};
use studymate_core::resource::{
  Resource,
  Tasks
};
use studymate_core::workflow;
use studymate_shared::RecordId;
use web_sys::{
  Event,
  InputEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_node_ref
};

use super::entity_panel::use_entity_panel;
use super::subject_select::{
  SubjectKey,
  SubjectSelect
};
use super::{
  Modal,
  bind,
  focus
};
use crate::api::ClientHandle;
use crate::feedback::{
  UiFeedback,
  ui_debug
};

#[derive(Properties, PartialEq)]
pub struct TasksPanelProps {
  pub open:          bool,
  pub on_close:      Callback<()>,
  pub client:        ClientHandle,
  pub feedback:      UiFeedback,
  pub subjects_tick: u64
}

#[function_component(TasksPanel)]
pub fn tasks_panel(
  props: &TasksPanelProps
) -> Html {
  let panel = use_entity_panel::<TaskDraft>(
    props.open,
    props.client.clone(),
    props.feedback.clone(),
    Callback::noop()
  );
  let title_ref = use_node_ref();
  let form = &panel.form;

  let on_complete = {
    let client = props.client.clone();
    let view = panel.view.clone();
    Callback::from(move |id: RecordId| {
      let client = client.clone();
      let view = view.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = workflow::complete_task(
            &*client, &*view, id
          )
          .await;
          ui_debug(
            "tasks.complete",
            &format!("{id}: {outcome:?}")
          );
        }
      );
    })
  };

  let on_title = bind::<_, InputEvent>(
    form,
    |f, v| f.draft.title = v
  );
  let on_description =
    bind::<_, InputEvent>(form, |f, v| {
      f.draft.description = v
    });
  let on_priority =
    bind::<_, Event>(form, |f, v| {
      f.draft.priority =
        Priority::from_wire(&v)
          .unwrap_or_default()
    });
  let on_due = bind::<_, InputEvent>(
    form,
    |f, v| f.draft.due = v
  );
  let on_subject =
    bind::<_, Event>(form, |f, v| {
      f.draft.subject_id =
        parse_subject_choice(&v)
    });

  let on_shown = {
    let title_ref = title_ref.clone();
    Callback::from(move |()| {
      focus(&title_ref)
    })
  };

  let rows = if panel.records.is_empty() {
    html! {
        <tr><td colspan="5" class="text-muted text-center">{ Tasks::empty_message() }</td></tr>
    }
  } else {
    panel
      .records
      .iter()
      .map(|task| {
        let id = task.id;
        let on_edit = panel.on_edit.clone();
        let on_delete =
          panel.on_delete.clone();
        let on_complete = on_complete.clone();
        let label = Priority::from_wire(
          &task.priority
        )
        .map(Priority::label)
        .unwrap_or(task.priority.as_str())
        .to_string();
        let badge = format!(
          "badge bg-{}",
          badge_for(&task.priority)
        );
        let due = task
          .due
          .as_deref()
          .map(due_from_wire)
          .unwrap_or_default()
          .replace('T', " ");
        html! {
            <tr key={id} class={classes!(task.completed.then_some("table-success"))}>
                <td class={classes!(task.completed.then_some("text-decoration-line-through"))}>{ task.title.clone() }</td>
                <td><span class={badge}>{ label }</span></td>
                <td>{ due }</td>
                <td>{ task.subject.as_ref().and_then(|s| s.name.clone()).unwrap_or_default() }</td>
                <td class="text-end">
                    if !task.completed {
                        <button class="btn btn-sm btn-outline-success me-1" title="Completar" onclick={move |_| on_complete.emit(id)}>
                            <i class="fas fa-check"></i>
                        </button>
                    }
                    <button class="btn btn-sm btn-outline-primary me-1" title="Editar" onclick={move |_| on_edit.emit(id)}>
                        <i class="fas fa-edit"></i>
                    </button>
                    <button class="btn btn-sm btn-outline-danger" title="Eliminar" onclick={move |_| on_delete.emit(id)}>
                        <i class="fas fa-trash"></i>
                    </button>
                </td>
            </tr>
        }
      })
      .collect::<Html>()
  };

  let on_new = panel.on_new.clone();
  let on_cancel = panel.on_cancel.clone();
  let footer = html! {
      <button type="button" class="btn btn-primary" onclick={move |_| on_new.emit(())}>
          <i class="fas fa-plus me-1"></i>{ "Nueva tarea" }
      </button>
  };
  let subject_value = form
    .draft
    .subject_id
    .map(|id| id.to_string())
    .unwrap_or_default();

  html! {
      <>
          <Modal id="tareas" open={props.open} title="Mis tareas" wide={true} on_close={props.on_close.clone()} footer={footer}>
              <table class="table table-hover align-middle">
                  <thead>
                      <tr><th>{ "Título" }</th><th>{ "Prioridad" }</th><th>{ "Fecha límite" }</th><th>{ "Materia" }</th><th></th></tr>
                  </thead>
                  <tbody>{ rows }</tbody>
              </table>
          </Modal>
          <Modal id="tarea-form" open={props.open && form.open} title={form.title(Tasks::NOUN)} on_close={panel.on_cancel.clone()} on_shown={on_shown}>
              <form onsubmit={panel.on_submit.clone()}>
                  <div class="mb-3">
                      <label class="form-label" for="tarea-titulo">{ "Título" }</label>
                      <input id="tarea-titulo" class="form-control" type="text" ref={title_ref} value={form.draft.title.clone()} oninput={on_title} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="tarea-descripcion">{ "Descripción" }</label>
                      <textarea id="tarea-descripcion" class="form-control" rows="3" value={form.draft.description.clone()} oninput={on_description} />
                  </div>
                  <div class="row">
                      <div class="col-md-6 mb-3">
                          <label class="form-label" for="tarea-prioridad">{ "Prioridad" }</label>
                          <select id="tarea-prioridad" class="form-select" onchange={on_priority}>
                              { for Priority::ALL.into_iter().map(|priority| html! {
                                  <option value={priority.as_wire()} selected={priority == form.draft.priority}>{ priority.label() }</option>
                              }) }
                          </select>
                      </div>
                      <div class="col-md-6 mb-3">
                          <label class="form-label" for="tarea-fecha">{ "Fecha límite" }</label>
                          <input id="tarea-fecha" class="form-control" type="datetime-local" value={form.draft.due.clone()} oninput={on_due} />
                      </div>
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="tarea-materia">{ "Materia" }</label>
                      <SubjectSelect id="tarea-materia" client={props.client.clone()} key_by={SubjectKey::Id} value={subject_value} on_change={on_subject} reload={props.subjects_tick} />
                  </div>
                  <div class="d-flex justify-content-end gap-2">
                      <button type="button" class="btn btn-secondary" onclick={move |_| on_cancel.emit(())}>{ "Cancelar" }</button>
                      <button type="submit" class="btn btn-primary" disabled={*panel.busy}>{ "Guardar" }</button>
                  </div>
              </form>
          </Modal>
      </>
  }
}
