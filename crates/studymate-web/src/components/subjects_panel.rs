use studymate_core::draft::{
  DEFAULT_SUBJECT_COLOR,
  SubjectDraft
};
use studymate_core::resource::{
  Resource,
  Subjects
};
use studymate_core::schedule::ScheduleRows;
use web_sys::InputEvent;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_node_ref
};

use super::entity_panel::use_entity_panel;
use super::schedule_editor::ScheduleEditor;
use super::{
  Modal,
  bind,
  focus
};
use crate::api::ClientHandle;
use crate::feedback::UiFeedback;

#[derive(Properties, PartialEq)]
pub struct SubjectsPanelProps {
  pub open:     bool,
  pub on_close: Callback<()>,
  pub client:   ClientHandle,
  pub feedback: UiFeedback,
  /// Fires after a subject is created,
  /// edited or deleted so the dropdowns in
  /// the other forms reload.
  pub on_saved: Callback<()>
}

#[function_component(SubjectsPanel)]
pub fn subjects_panel(
  props: &SubjectsPanelProps
) -> Html {
  let panel =
    use_entity_panel::<SubjectDraft>(
      props.open,
      props.client.clone(),
      props.feedback.clone(),
      props.on_saved.clone()
    );
  let name_ref = use_node_ref();
  let form = &panel.form;

  let on_name = bind::<_, InputEvent>(
    form,
    |f, v| f.draft.name = v
  );
  let on_description =
    bind::<_, InputEvent>(form, |f, v| {
      f.draft.description = v
    });
  let on_professor =
    bind::<_, InputEvent>(form, |f, v| {
      f.draft.professor = v
    });
  let on_color = bind::<_, InputEvent>(
    form,
    |f, v| f.draft.color = v
  );
  let on_schedule = {
    let form = form.clone();
    Callback::from(move |rows: ScheduleRows| {
      let mut next = (*form).clone();
      next.draft.schedule = rows;
      form.set(next);
    })
  };

  let on_shown = {
    let name_ref = name_ref.clone();
    Callback::from(move |()| {
      focus(&name_ref)
    })
  };

  let cards = if panel.records.is_empty() {
    html! {
        <p class="text-muted text-center">{ Subjects::empty_message() }</p>
    }
  } else {
    panel
      .records
      .iter()
      .map(|subject| {
        let id = subject.id;
        let on_edit = panel.on_edit.clone();
        let on_delete =
          panel.on_delete.clone();
        let color = subject
          .color
          .clone()
          .unwrap_or_else(|| {
            DEFAULT_SUBJECT_COLOR.to_string()
          });
        html! {
            <div class="col-md-6" key={id}>
                <div class="card subject-card h-100" style={format!("border-left: 6px solid {color};")}>
                    <div class="card-body">
                        <h5 class="card-title">{ subject.name.clone() }</h5>
                        if let Some(professor) = subject.professor.clone().filter(|p| !p.is_empty()) {
                            <p class="card-text mb-1"><i class="fas fa-user me-1"></i>{ professor }</p>
                        }
                        if let Some(schedule) = subject.schedule.clone().filter(|s| !s.is_empty()) {
                            <p class="card-text mb-1"><i class="fas fa-clock me-1"></i>{ schedule }</p>
                        }
                        if let Some(description) = subject.description.clone().filter(|d| !d.is_empty()) {
                            <p class="card-text text-muted">{ description }</p>
                        }
                    </div>
                    <div class="card-footer text-end">
                        <button class="btn btn-sm btn-outline-primary me-1" title="Editar" onclick={move |_| on_edit.emit(id)}>
                            <i class="fas fa-edit"></i>
                        </button>
                        <button class="btn btn-sm btn-outline-danger" title="Eliminar" onclick={move |_| on_delete.emit(id)}>
                            <i class="fas fa-trash"></i>
                        </button>
                    </div>
                </div>
            </div>
        }
      })
      .collect::<Html>()
  };

  let on_new = panel.on_new.clone();
  let on_cancel = panel.on_cancel.clone();
  let footer = html! {
      <button type="button" class="btn btn-primary" onclick={move |_| on_new.emit(())}>
          <i class="fas fa-plus me-1"></i>{ "Nueva materia" }
      </button>
  };

  html! {
      <>
          <Modal id="materias" open={props.open} title="Mis materias" wide={true} on_close={props.on_close.clone()} footer={footer}>
              <div class="row g-3">{ cards }</div>
          </Modal>
          <Modal id="materia-form" open={props.open && form.open} title={form.title(Subjects::NOUN)} wide={true} on_close={panel.on_cancel.clone()} on_shown={on_shown}>
              <form onsubmit={panel.on_submit.clone()}>
                  <div class="row">
                      <div class="col-md-8 mb-3">
                          <label class="form-label" for="materia-nombre">{ "Nombre" }</label>
                          <input id="materia-nombre" class="form-control" type="text" ref={name_ref} value={form.draft.name.clone()} oninput={on_name} />
                      </div>
                      <div class="col-md-4 mb-3">
                          <label class="form-label" for="materia-color">{ "Color" }</label>
                          <input id="materia-color" class="form-control form-control-color" type="color" value={form.draft.color.clone()} oninput={on_color} />
                      </div>
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="materia-profesor">{ "Profesor" }</label>
                      <input id="materia-profesor" class="form-control" type="text" value={form.draft.professor.clone()} oninput={on_professor} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="materia-descripcion">{ "Descripción" }</label>
                      <textarea id="materia-descripcion" class="form-control" rows="2" value={form.draft.description.clone()} oninput={on_description} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label">{ "Horario" }</label>
                      <ScheduleEditor rows={form.draft.schedule.clone()} on_change={on_schedule} />
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
