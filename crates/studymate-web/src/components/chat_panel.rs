use studymate_core::assistant::{
  ChatTranscript,
  Speaker,
  send_chat
};
use web_sys::{
  InputEvent,
  SubmitEvent
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html,
  use_node_ref,
  use_state
};

use super::{
  Modal,
  field_value,
  focus
};
use crate::api::ClientHandle;
use crate::feedback::UiFeedback;

#[derive(Properties, PartialEq)]
pub struct ChatPanelProps {
  pub open:     bool,
  pub on_close: Callback<()>,
  pub client:   ClientHandle,
  pub feedback: UiFeedback,
  pub context:  String
}

#[function_component(ChatPanel)]
pub fn chat_panel(
  props: &ChatPanelProps
) -> Html {
  let transcript =
    use_state(ChatTranscript::default);
  let question = use_state(String::new);
  let input_ref = use_node_ref();

  let on_input = {
    let question = question.clone();
    Callback::from(move |e: InputEvent| {
      if let Some(value) = field_value(&e) {
        question.set(value);
      }
    })
  };

  let on_send = {
    let transcript = transcript.clone();
    let question = question.clone();
    let client = props.client.clone();
    let feedback = props.feedback.clone();
    let context = props.context.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      let mut next = (*transcript).clone();
      let Some(asked) = next.ask(&question)
      else {
        return;
      };
      transcript.set(next.clone());
      question.set(String::new());

      let transcript = transcript.clone();
      let client = client.clone();
      let feedback = feedback.clone();
      let context = context.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          let reply = send_chat(
            &*client, &feedback, &asked,
            &context
          )
          .await;
          next.answer(reply);
          transcript.set(next);
        }
      );
    })
  };

  let on_shown = {
    let input_ref = input_ref.clone();
    Callback::from(move |()| {
      focus(&input_ref)
    })
  };

  html! {
      <Modal id="chatbot" open={props.open} title="Chatbot académico" wide={true} on_close={props.on_close.clone()} on_shown={on_shown}>
          <div class="chat-messages">
              { for transcript.messages().iter().map(|message| {
                  let (class, icon) = match message.speaker {
                      | Speaker::User => ("user-message", "fas fa-user"),
                      | Speaker::Bot => ("bot-message", "fas fa-robot")
                  };
                  html! {
                      <div class={classes!("message", class)}>
                          <i class={classes!(icon, "me-2")}></i>
                          <span>{ message.text.clone() }</span>
                      </div>
                  }
              }) }
              if transcript.is_pending() {
                  <div class="message bot-message text-muted">
                      <i class="fas fa-spinner fa-spin me-2"></i>{ "Pensando..." }
                  </div>
              }
          </div>
          <form class="input-group mt-3" onsubmit={on_send}>
              <input class="form-control" type="text" placeholder="Escribe tu pregunta..." ref={input_ref} value={(*question).clone()} oninput={on_input} />
              <button type="submit" class="btn btn-primary" disabled={transcript.is_pending()}>
                  <i class="fas fa-paper-plane"></i>
              </button>
          </form>
      </Modal>
  }
}
