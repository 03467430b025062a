use std::rc::Rc;

use studymate_core::draft::{
  EntityDraft,
  FormMode
};
use studymate_core::resource::Resource;
use studymate_core::workflow;
use studymate_shared::RecordId;
use web_sys::SubmitEvent;
use yew::{
  Callback,
  UseStateHandle,
  hook,
  use_effect_with,
  use_state
};

use super::FormState;
use crate::api::ClientHandle;
use crate::feedback::{
  PanelView,
  UiFeedback,
  ui_debug
};

pub type RecordOf<D> =
  <<D as EntityDraft>::Resource as Resource>::Record;

/// State and handlers shared by the notes,
/// tasks and subjects dialogs.
pub struct EntityPanel<D: EntityDraft> {
  pub records:   UseStateHandle<Vec<RecordOf<D>>>,
  pub form:      UseStateHandle<FormState<D>>,
  pub busy:      UseStateHandle<bool>,
  pub view:      Rc<PanelView<D::Resource>>,
  pub on_new:    Callback<()>,
  pub on_edit:   Callback<RecordId>,
  pub on_delete: Callback<RecordId>,
  pub on_submit: Callback<SubmitEvent>,
  pub on_cancel: Callback<()>
}

/// `on_saved` fires after every successful
/// write, once the list has reloaded.
#[hook]
pub fn use_entity_panel<D>(
  open: bool,
  client: ClientHandle,
  feedback: UiFeedback,
  on_saved: Callback<()>
) -> EntityPanel<D>
where
  D: EntityDraft + 'static,
  D::Resource: 'static
{
  let records =
    use_state(Vec::<RecordOf<D>>::new);
  let form =
    use_state(FormState::<D>::default);
  let busy = use_state(|| false);

  let view = {
    let records = records.clone();
    let form = form.clone();
    Rc::new(PanelView::<D::Resource> {
      feedback,
      records: Callback::from(
        move |list| records.set(list)
      ),
      close: Callback::from(move |()| {
        form.set((*form).clone().closed())
      })
    })
  };

  {
    let view = view.clone();
    use_effect_with(
      (open, client.clone()),
      move |(open, client)| {
        if *open {
          let client = client.clone();
          wasm_bindgen_futures::spawn_local(
            async move {
              workflow::load::<D::Resource, _, _>(
                &*client, &*view
              )
              .await;
            }
          );
        }
        || ()
      }
    );
  }

  let on_new = {
    let form = form.clone();
    Callback::from(move |()| {
      form.set(FormState::create())
    })
  };

  let on_cancel = {
    let form = form.clone();
    Callback::from(move |()| {
      form.set((*form).clone().closed())
    })
  };

  let on_edit = {
    let form = form.clone();
    let client = client.clone();
    let view = view.clone();
    Callback::from(move |id: RecordId| {
      let form = form.clone();
      let client = client.clone();
      let view = view.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          if let Some(draft) =
            workflow::open_edit::<D, _, _>(
              &*client, &*view, id
            )
            .await
          {
            form.set(FormState::edit(
              FormMode::Edit(id),
              draft
            ));
          }
        }
      );
    })
  };

  let on_delete = {
    let client = client.clone();
    let view = view.clone();
    let on_saved = on_saved.clone();
    Callback::from(move |id: RecordId| {
      let client = client.clone();
      let view = view.clone();
      let on_saved = on_saved.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = workflow::delete::<
            D::Resource,
            _,
            _
          >(
            &*client, &*view, id
          )
          .await;
          ui_debug(
            "entity.delete",
            &format!(
              "{} {id}: {outcome:?}",
              <D::Resource as Resource>::COLLECTION
            )
          );
          if outcome.is_done() {
            on_saved.emit(());
          }
        }
      );
    })
  };

  let on_submit = {
    let form = form.clone();
    let busy = busy.clone();
    let view = view.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *busy {
        return;
      }
      busy.set(true);

      let draft = form.draft.clone();
      let mode = form.mode;
      let busy = busy.clone();
      let client = client.clone();
      let view = view.clone();
      let on_saved = on_saved.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let outcome = workflow::submit(
            &*client, &*view, &draft, mode
          )
          .await;
          busy.set(false);
          ui_debug(
            "entity.submit",
            &format!(
              "{}: {outcome:?}",
              <D::Resource as Resource>::COLLECTION
            )
          );
          if outcome.is_done() {
            on_saved.emit(());
          }
        }
      );
    })
  };

  EntityPanel {
    records,
    form,
    busy,
    view,
    on_new,
    on_edit,
    on_delete,
    on_submit,
    on_cancel
  }
}
