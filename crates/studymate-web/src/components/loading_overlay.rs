use yew::{
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
  pub active: bool
}

#[function_component(LoadingOverlay)]
pub fn loading_overlay(
  props: &LoadingOverlayProps
) -> Html {
  if !props.active {
    return html! {};
  }

  html! {
      <div class="loading-overlay" aria-busy="true">
          <div class="spinner-border text-primary" role="status">
              <span class="visually-hidden">{ "Cargando..." }</span>
          </div>
      </div>
  }
}
