use studymate_core::draft::NoteDraft;
use studymate_core::resource::{
  Notes,
  Resource
};
use web_sys::{
  Event,
  InputEvent
};
use yew::{
  Callback,
  Html,
  Properties,
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
use crate::feedback::UiFeedback;

#[derive(Properties, PartialEq)]
pub struct NotesPanelProps {
  pub open:          bool,
  pub on_close:      Callback<()>,
  pub client:        ClientHandle,
  pub feedback:      UiFeedback,
  pub subjects_tick: u64
}

#[function_component(NotesPanel)]
pub fn notes_panel(
  props: &NotesPanelProps
) -> Html {
  let panel = use_entity_panel::<NoteDraft>(
    props.open,
    props.client.clone(),
    props.feedback.clone(),
    Callback::noop()
  );
  let title_ref = use_node_ref();
  let form = &panel.form;

  let on_title = bind::<_, InputEvent>(
    form,
    |f, v| f.draft.title = v
  );
  let on_content =
    bind::<_, InputEvent>(form, |f, v| {
      f.draft.content = v
    });
  let on_subject = bind::<_, Event>(
    form,
    |f, v| f.draft.subject = v
  );

  let on_shown = {
    let title_ref = title_ref.clone();
    Callback::from(move |()| {
      focus(&title_ref)
    })
  };

  let rows = if panel.records.is_empty() {
    html! {
        <tr><td colspan="4" class="text-muted text-center">{ Notes::empty_message() }</td></tr>
    }
  } else {
    panel
      .records
      .iter()
      .map(|note| {
        let id = note.id;
        let on_edit = panel.on_edit.clone();
        let on_delete =
          panel.on_delete.clone();
        html! {
            <tr key={id}>
                <td>{ note.title.clone() }</td>
                <td class="text-truncate note-preview">{ note.content.clone() }</td>
                <td>{ note.subject.clone().unwrap_or_default() }</td>
                <td class="text-end">
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
          <i class="fas fa-plus me-1"></i>{ "Nueva nota" }
      </button>
  };

  html! {
      <>
          <Modal id="notas" open={props.open} title="Mis notas" wide={true} on_close={props.on_close.clone()} footer={footer}>
              <table class="table table-hover align-middle">
                  <thead>
                      <tr><th>{ "Título" }</th><th>{ "Contenido" }</th><th>{ "Materia" }</th><th></th></tr>
                  </thead>
                  <tbody>{ rows }</tbody>
              </table>
          </Modal>
          <Modal id="nota-form" open={props.open && form.open} title={form.title(Notes::NOUN)} on_close={panel.on_cancel.clone()} on_shown={on_shown}>
              <form onsubmit={panel.on_submit.clone()}>
                  <div class="mb-3">
                      <label class="form-label" for="nota-titulo">{ "Título" }</label>
                      <input id="nota-titulo" class="form-control" type="text" ref={title_ref} value={form.draft.title.clone()} oninput={on_title} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="nota-contenido">{ "Contenido" }</label>
                      <textarea id="nota-contenido" class="form-control" rows="6" value={form.draft.content.clone()} oninput={on_content} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="nota-materia">{ "Materia" }</label>
                      <SubjectSelect id="nota-materia" client={props.client.clone()} key_by={SubjectKey::Name} value={form.draft.subject.clone()} on_change={on_subject} reload={props.subjects_tick} />
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
