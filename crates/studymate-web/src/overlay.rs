use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use studymate_core::overlay::{
  Effect,
  OverlayController,
  OverlaySurface,
  Transition
};
use wasm_bindgen::JsCast;
use yew::Callback;

const BACKDROP_SELECTOR: &str =
  ".modal-backdrop";
const BODY_OPEN_CLASS: &str = "modal-open";

/// The live document body and its
/// backdrop elements.
#[derive(Debug, Default)]
pub struct DomSurface;

fn document() -> Option<web_sys::Document> {
  web_sys::window()
    .and_then(|window| window.document())
}

fn body() -> Option<web_sys::HtmlElement> {
  document().and_then(|doc| doc.body())
}

fn scrollbar_width() -> f64 {
  let Some(window) = web_sys::window()
  else {
    return 0.0;
  };
  let inner = window
    .inner_width()
    .ok()
    .and_then(|w| w.as_f64())
    .unwrap_or_default();
  let client = document()
    .and_then(|doc| doc.document_element())
    .map(|root| f64::from(root.client_width()))
    .unwrap_or(inner);
  (inner - client).max(0.0)
}

impl OverlaySurface for DomSurface {
  fn backdrop_count(&self) -> usize {
    document()
      .and_then(|doc| {
        doc
          .query_selector_all(
            BACKDROP_SELECTOR
          )
          .ok()
      })
      .map(|nodes| nodes.length() as usize)
      .unwrap_or_default()
  }

  fn append_backdrop(&mut self) {
    let (Some(doc), Some(body)) =
      (document(), body())
    else {
      return;
    };
    match doc.create_element("div") {
      | Ok(backdrop) => {
        backdrop.set_class_name(
          "modal-backdrop fade show"
        );
        if let Err(err) =
          body.append_child(&backdrop)
        {
          tracing::warn!(error = ?err, "failed to append backdrop");
        }
      }
      | Err(err) => {
        tracing::warn!(error = ?err, "failed to create backdrop");
      }
    }
  }

  fn remove_backdrops(&mut self) {
    let Some(nodes) = document().and_then(
      |doc| {
        doc
          .query_selector_all(
            BACKDROP_SELECTOR
          )
          .ok()
      }
    ) else {
      return;
    };
    // NodeList is static; removing while
    // iterating is safe.
    for index in 0..nodes.length() {
      if let Some(element) = nodes
        .item(index)
        .and_then(|node| {
          node.dyn_into::<web_sys::Element>().ok()
        })
      {
        element.remove();
      }
    }
  }

  fn lock_body(&mut self) {
    let Some(body) = body() else {
      return;
    };
    logged(
      body.class_list().add_1(BODY_OPEN_CLASS),
      "add modal-open class"
    );
    let style = body.style();
    logged(
      style.set_property("overflow", "hidden"),
      "hide body overflow"
    );
    logged(
      style.set_property(
        "padding-right",
        &format!("{}px", scrollbar_width())
      ),
      "pad body for scrollbar"
    );
  }

  fn unlock_body(&mut self) {
    let Some(body) = body() else {
      return;
    };
    logged(
      body
        .class_list()
        .remove_1(BODY_OPEN_CLASS),
      "remove modal-open class"
    );
    let style = body.style();
    logged(
      style.remove_property("overflow"),
      "restore body overflow"
    );
    logged(
      style.remove_property("padding-right"),
      "restore body padding"
    );
  }
}

/// Body style calls only fail on a broken
/// document; the failure is logged and the
/// overlay carries on.
fn logged<T, E: fmt::Debug>(
  result: Result<T, E>,
  action: &str
) -> Option<T> {
  match result {
    | Ok(value) => Some(value),
    | Err(err) => {
      tracing::warn!(error = ?err, action, "body style update failed");
      None
    }
  }
}

/// Shared handle to the one overlay
/// controller plus the close callbacks of
/// mounted dialogs, so the escape key can
/// reach whichever dialog is on top.
#[derive(Clone, Default)]
pub struct OverlayHub {
  inner: Rc<RefCell<HubState>>
}

#[derive(Default)]
struct HubState {
  controller: Option<OverlayController<DomSurface>>,
  dialogs:    BTreeMap<String, DialogHooks>
}

#[derive(Clone)]
struct DialogHooks {
  close:  Callback<()>,
  bounce: Callback<()>
}

impl PartialEq for OverlayHub {
  fn eq(&self, other: &Self) -> bool {
    Rc::ptr_eq(&self.inner, &other.inner)
  }
}

impl OverlayHub {
  fn with<R>(
    &self,
    f: impl FnOnce(
      &mut OverlayController<DomSurface>
    ) -> R
  ) -> R {
    let mut state = self.inner.borrow_mut();
    let controller = state
      .controller
      .get_or_insert_with(|| {
        OverlayController::new(DomSurface)
      });
    f(controller)
  }

  pub fn register(
    &self,
    id: &str,
    static_backdrop: bool,
    close: Callback<()>,
    bounce: Callback<()>
  ) {
    self.with(|c| {
      c.set_static(id, static_backdrop)
    });
    self.inner.borrow_mut().dialogs.insert(
      id.to_string(),
      DialogHooks { close, bounce }
    );
  }

  pub fn unregister(&self, id: &str) {
    self.inner.borrow_mut().dialogs.remove(id);
  }

  pub fn apply(
    &self,
    transition: Transition
  ) -> Effect {
    self.with(|c| c.apply(transition))
  }

  pub fn backdrop_click(
    &self,
    id: &str
  ) -> Effect {
    self.with(|c| c.backdrop_click(id))
  }

  /// Routes the escape key to the topmost
  /// open dialog: its close callback, or
  /// its bounce when it is static. The
  /// borrow ends before the callback runs.
  pub fn escape(&self) {
    let (closing, top) = self.with(|c| {
      let closing = c.escape();
      (closing, c.topmost_open().map(str::to_string))
    });

    let hook = |id: &str| {
      self.inner.borrow().dialogs.get(id).cloned()
    };
    match (closing, top) {
      | (Some(id), _) => {
        if let Some(hooks) = hook(&id) {
          hooks.close.emit(());
        }
      }
      | (None, Some(id)) => {
        if let Some(hooks) = hook(&id) {
          hooks.bounce.emit(());
        }
      }
      | (None, None) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failed_style_calls_are_swallowed() {
    assert_eq!(
      logged(
        Err::<(), _>("NoModificationAllowed"),
        "hide body overflow"
      ),
      None
    );
    assert_eq!(
      logged(
        Ok::<_, &str>("hidden".to_string()),
        "restore body overflow"
      )
      .as_deref(),
      Some("hidden")
    );
  }
}
