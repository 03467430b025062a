use studymate_core::api::FileUpload;
use studymate_core::assistant::{
  SUMMARY_FILE_FIELD,
  SummarySource,
  summarize
};
use studymate_core::notify::NoticeLevel;
use studymate_core::workflow::Feedback;
use wasm_bindgen::JsCast;
use web_sys::{
  Event,
  HtmlInputElement,
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
  field_value
};
use crate::api::ClientHandle;
use crate::feedback::UiFeedback;

const PDF_MIME: &str = "application/pdf";

async fn read_upload(
  file: web_sys::File
) -> Result<FileUpload, String> {
  let file = gloo::file::File::from(file);
  let bytes =
    gloo::file::futures::read_as_bytes(&file)
      .await
      .map_err(|err| err.to_string())?;
  let mime = file.raw_mime_type();
  Ok(FileUpload {
    field:     SUMMARY_FILE_FIELD.to_string(),
    file_name: file.name(),
    mime:      Some(if mime.is_empty() {
      PDF_MIME.to_string()
    } else {
      mime
    }),
    bytes
  })
}

#[derive(Properties, PartialEq)]
pub struct SummaryPanelProps {
  pub open:     bool,
  pub on_close: Callback<()>,
  pub client:   ClientHandle,
  pub feedback: UiFeedback
}

#[function_component(SummaryPanel)]
pub fn summary_panel(
  props: &SummaryPanelProps
) -> Html {
  let upload = use_state(|| None::<FileUpload>);
  let text = use_state(String::new);
  let summary = use_state(|| None::<String>);
  let busy = use_state(|| false);

  let on_file = {
    let upload = upload.clone();
    let feedback = props.feedback.clone();
    Callback::from(move |e: Event| {
      let chosen = e
        .target()
        .and_then(|t| {
          t.dyn_into::<HtmlInputElement>().ok()
        })
        .and_then(|input| input.files())
        .and_then(|files| files.get(0));
      let Some(file) = chosen else {
        upload.set(None);
        return;
      };

      let upload = upload.clone();
      let feedback = feedback.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match read_upload(file).await {
            | Ok(file) => {
              tracing::debug!(
                name = %file.file_name,
                bytes = file.bytes.len(),
                "summary file read"
              );
              upload.set(Some(file));
            }
            | Err(err) => {
              tracing::error!(
                error = %err,
                "failed to read summary file"
              );
              feedback.notify(
                NoticeLevel::Error,
                "No se pudo leer el archivo"
              );
              upload.set(None);
            }
          }
        }
      );
    })
  };

  let on_text = {
    let text = text.clone();
    Callback::from(move |e: InputEvent| {
      if let Some(value) = field_value(&e) {
        text.set(value);
      }
    })
  };

  let on_submit = {
    let upload = upload.clone();
    let text = text.clone();
    let summary = summary.clone();
    let busy = busy.clone();
    let client = props.client.clone();
    let feedback = props.feedback.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      if *busy {
        return;
      }
      let source = match SummarySource::pick(
        (*upload).clone(),
        &text
      ) {
        | Ok(source) => source,
        | Err(err) => {
          feedback.notify(
            NoticeLevel::Error,
            &err.message
          );
          return;
        }
      };
      busy.set(true);

      let summary = summary.clone();
      let busy = busy.clone();
      let client = client.clone();
      let feedback = feedback.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          if let Some(result) = summarize(
            &*client, &feedback, source
          )
          .await
          {
            summary.set(Some(result));
          }
          busy.set(false);
        }
      );
    })
  };

  html! {
      <Modal id="resumen-pdf" open={props.open} title="Resumen de PDF" wide={true} on_close={props.on_close.clone()}>
          <form onsubmit={on_submit}>
              <div class="mb-3">
                  <label class="form-label" for="resumen-archivo">{ "Archivo PDF" }</label>
                  <input id="resumen-archivo" class="form-control" type="file" accept=".pdf,application/pdf" onchange={on_file} />
              </div>
              <div class="mb-3">
                  <label class="form-label" for="resumen-contenido">{ "O pega el contenido" }</label>
                  <textarea id="resumen-contenido" class="form-control" rows="6" value={(*text).clone()} oninput={on_text} />
              </div>
              <button type="submit" class="btn btn-primary" disabled={*busy}>
                  <i class="fas fa-compress-alt me-1"></i>{ "Resumir" }
              </button>
          </form>
          if let Some(result) = (*summary).clone() {
              <div class="card mt-3">
                  <div class="card-body ai-output">{ result }</div>
              </div>
          }
      </Modal>
  }
}
