use studymate_core::overlay::{
  Effect,
  Transition
};
use web_sys::AnimationEvent;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  classes,
  function_component,
  html,
  use_context,
  use_effect_with,
  use_state
};

use crate::overlay::OverlayHub;

const OPEN_ANIMATION: &str = "modal-in";
const CLOSE_ANIMATION: &str = "modal-out";

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
enum Stage {
  Hidden,
  Opening,
  Shown,
  Closing
}

#[derive(Properties, PartialEq)]
pub struct ModalProps {
  pub id:              String,
  pub open:            bool,
  pub title:           String,
  pub on_close:        Callback<()>,
  #[prop_or_default]
  pub on_shown:        Callback<()>,
  /// Backdrop clicks and escape bounce
  /// instead of closing.
  #[prop_or_default]
  pub static_backdrop: bool,
  #[prop_or_default]
  pub wide:            bool,
  #[prop_or_default]
  pub footer:          Option<Html>,
  #[prop_or_default]
  pub children:        Html
}

/// Dialog shell. Every open and close is
/// reported to the shared overlay hub;
/// `Closed` only goes out once the close
/// animation has really ended; unmounting
/// sends `Removed`.
#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
  let hub = use_context::<OverlayHub>()
    .unwrap_or_default();
  let stage = use_state(|| Stage::Hidden);
  let bouncing = use_state(|| false);

  {
    let hub = hub.clone();
    let bouncing = bouncing.clone();
    use_effect_with(
      (
        props.id.clone(),
        props.static_backdrop,
        props.on_close.clone()
      ),
      move |(id, static_backdrop, on_close)| {
        hub.register(
          id,
          *static_backdrop,
          on_close.clone(),
          Callback::from(move |()| {
            bouncing.set(true)
          })
        );
        let id = id.clone();
        move || hub.unregister(&id)
      }
    );
  }

  {
    let hub = hub.clone();
    use_effect_with(
      props.id.clone(),
      move |id| {
        let id = id.clone();
        move || {
          hub.apply(Transition::Removed(id));
        }
      }
    );
  }

  {
    let hub = hub.clone();
    let stage = stage.clone();
    let id = props.id.clone();
    use_effect_with(props.open, move |open| {
      if *open {
        if matches!(
          *stage,
          Stage::Hidden | Stage::Closing
        ) {
          hub.apply(Transition::Opened(
            id.clone()
          ));
          stage.set(Stage::Opening);
        }
      } else if matches!(
        *stage,
        Stage::Opening | Stage::Shown
      ) {
        hub.apply(Transition::CloseRequested(
          id.clone()
        ));
        stage.set(Stage::Closing);
      }
      || ()
    });
  }

  let on_animation_end = {
    let hub = hub.clone();
    let stage = stage.clone();
    let bouncing = bouncing.clone();
    let id = props.id.clone();
    let on_shown = props.on_shown.clone();
    Callback::from(
      move |e: AnimationEvent| {
        match (e.animation_name().as_str(), *stage)
        {
          | (OPEN_ANIMATION, Stage::Opening) => {
            stage.set(Stage::Shown);
            on_shown.emit(());
          }
          | (CLOSE_ANIMATION, Stage::Closing) => {
            hub.apply(Transition::Closed(
              id.clone()
            ));
            stage.set(Stage::Hidden);
          }
          | _ => bouncing.set(false)
        }
      }
    )
  };

  let on_backdrop = {
    let hub = hub.clone();
    let bouncing = bouncing.clone();
    let id = props.id.clone();
    let on_close = props.on_close.clone();
    Callback::from(move |e: MouseEvent| {
      if e.target() != e.current_target() {
        return;
      }
      match hub.backdrop_click(&id) {
        | Effect::Bounce => bouncing.set(true),
        | Effect::BeginClose => {
          on_close.emit(())
        }
        | Effect::None => {}
      }
    })
  };

  if *stage == Stage::Hidden {
    return html! {};
  }

  let on_close_click = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      on_close.emit(())
    })
  };

  let class = classes!(
    "modal",
    "d-block",
    match *stage {
      | Stage::Closing => "closing",
      | _ => "showing"
    },
    (*bouncing).then_some("modal-static")
  );
  let dialog_class = classes!(
    "modal-dialog",
    props.wide.then_some("modal-lg")
  );

  html! {
      <div id={props.id.clone()} class={class} tabindex="-1" role="dialog" aria-modal="true" onclick={on_backdrop} onanimationend={on_animation_end}>
          <div class={dialog_class}>
              <div class="modal-content">
                  <div class="modal-header">
                      <h5 class="modal-title">{ props.title.clone() }</h5>
                      if !props.static_backdrop {
                          <button type="button" class="btn-close" aria-label="Cerrar" onclick={on_close_click}></button>
                      }
                  </div>
                  <div class="modal-body">{ props.children.clone() }</div>
                  if let Some(footer) = props.footer.clone() {
                      <div class="modal-footer">{ footer }</div>
                  }
              </div>
          </div>
      </div>
  }
}
