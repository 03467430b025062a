use studymate_core::auth::{
  self,
  AuthForm,
  AuthMode
};
use studymate_core::notify::NoticeLevel;
use studymate_core::workflow::Feedback;
use studymate_shared::AuthResponse;
use web_sys::{
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_node_ref,
  use_state
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

pub const AUTH_DIALOG: &str = "auth";

#[derive(Properties, PartialEq)]
pub struct AuthModalProps {
  pub open:             bool,
  pub client:           ClientHandle,
  pub feedback:         UiFeedback,
  pub on_authenticated: Callback<AuthResponse>
}

/// Login and registration. Static: it only
/// goes away once a session exists.
#[function_component(AuthModal)]
pub fn auth_modal(
  props: &AuthModalProps
) -> Html {
  let mode = use_state(AuthMode::default);
  let form = use_state(AuthForm::default);
  let busy = use_state(|| false);
  let first_field = use_node_ref();

  let on_submit = {
    let mode = mode.clone();
    let form = form.clone();
    let busy = busy.clone();
    let client = props.client.clone();
    let feedback = props.feedback.clone();
    let on_authenticated =
      props.on_authenticated.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *busy {
        return;
      }
      busy.set(true);

      let mode = *mode;
      let submitted = (*form).clone();
      let form = form.clone();
      let busy = busy.clone();
      let client = client.clone();
      let feedback = feedback.clone();
      let on_authenticated =
        on_authenticated.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          feedback.loading(true);
          let result = auth::submit(
            &*client, mode, &submitted
          )
          .await;
          feedback.loading(false);
          busy.set(false);

          match result {
            | Ok(response) => {
              form.set(AuthForm::default());
              on_authenticated.emit(response);
            }
            | Err(err) => {
              ui_debug(
                "auth.rejected",
                &err.to_string()
              );
              feedback.notify(
                NoticeLevel::Error,
                &err.user_message()
              );
            }
          }
        }
      );
    })
  };

  let on_toggle = {
    let mode = mode.clone();
    Callback::from(move |e: MouseEvent| {
      e.prevent_default();
      mode.set(mode.toggled());
    })
  };

  let on_shown = {
    let first_field = first_field.clone();
    Callback::from(move |()| {
      focus(&first_field)
    })
  };

  let profile = mode.shows_profile_fields();
  let on_name = bind::<_, InputEvent>(
    &form,
    |f, v| f.name = v
  );
  let on_last_name =
    bind::<_, InputEvent>(&form, |f, v| {
      f.last_name = v
    });
  let on_email = bind::<_, InputEvent>(
    &form,
    |f, v| f.email = v
  );
  let on_password =
    bind::<_, InputEvent>(&form, |f, v| {
      f.password = v
    });
  let on_confirm =
    bind::<_, InputEvent>(&form, |f, v| {
      f.confirm = v
    });

  html! {
      <Modal id={AUTH_DIALOG} open={props.open} title={mode.title()} static_backdrop={true} on_close={Callback::noop()} on_shown={on_shown}>
          <form onsubmit={on_submit}>
              if profile {
                  <div class="mb-3">
                      <label class="form-label" for="auth-nombre">{ "Nombre" }</label>
                      <input id="auth-nombre" class="form-control" type="text" ref={first_field.clone()} value={form.name.clone()} oninput={on_name} />
                  </div>
                  <div class="mb-3">
                      <label class="form-label" for="auth-apellido">{ "Apellido" }</label>
                      <input id="auth-apellido" class="form-control" type="text" value={form.last_name.clone()} oninput={on_last_name} />
                  </div>
              }
              <div class="mb-3">
                  <label class="form-label" for="auth-email">{ "Email" }</label>
                  if profile {
                      <input id="auth-email" class="form-control" type="email" autocomplete="email" value={form.email.clone()} oninput={on_email} />
                  } else {
                      <input id="auth-email" class="form-control" type="email" autocomplete="email" ref={first_field.clone()} value={form.email.clone()} oninput={on_email} />
                  }
              </div>
              <div class="mb-3">
                  <label class="form-label" for="auth-password">{ "Contraseña" }</label>
                  <input id="auth-password" class="form-control" type="password" value={form.password.clone()} oninput={on_password} />
              </div>
              if profile {
                  <div class="mb-3">
                      <label class="form-label" for="auth-confirm">{ "Confirmar contraseña" }</label>
                      <input id="auth-confirm" class="form-control" type="password" value={form.confirm.clone()} oninput={on_confirm} />
                  </div>
              }
              <button type="submit" class="btn btn-primary w-100" disabled={*busy}>{ mode.submit_label() }</button>
              <p class="text-center mt-3 mb-0">
                  <a href="#" onclick={on_toggle}>{ mode.switch_prompt() }</a>
              </p>
          </form>
      </Modal>
  }
}
