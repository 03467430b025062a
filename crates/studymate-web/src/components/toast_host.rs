use studymate_core::notify::Notice;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ToastHostProps {
  pub notices:    Vec<Notice>,
  pub on_dismiss: Callback<u64>
}

#[function_component(ToastHost)]
pub fn toast_host(
  props: &ToastHostProps
) -> Html {
  if props.notices.is_empty() {
    return html! {};
  }

  html! {
      <div class="toast-stack">
          { for props.notices.iter().map(|notice| {
              let id = notice.id;
              let on_dismiss = props.on_dismiss.clone();
              let class = format!(
                "alert alert-{} alert-dismissible fade show",
                notice.level.class()
              );
              let icon = format!("fas fa-{} me-2", notice.level.icon());
              html! {
                  <div key={id} class={class} role="alert">
                      <i class={icon}></i>
                      { notice.message.clone() }
                      <button type="button" class="btn-close" aria-label="Cerrar" onclick={move |_| on_dismiss.emit(id)}></button>
                  </div>
              }
          }) }
      </div>
  }
}
