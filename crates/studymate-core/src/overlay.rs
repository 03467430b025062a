//! Single owner of the modal backdrop and
//! the body scroll lock.
//!
//! Dialogs report what happened to them as
//! [`Transition`]s; after each one the
//! controller reconciles the surface once.
//! A backdrop exists iff some dialog is
//! `Open`, and there is never more than
//! one.

use std::collections::BTreeSet;

/// The document as far as modal
/// bookkeeping is concerned.
pub trait OverlaySurface {
  fn backdrop_count(&self) -> usize;

  fn append_backdrop(&mut self);

  fn remove_backdrops(&mut self);

  /// `modal-open` class, hidden overflow
  /// and scrollbar padding on the body.
  fn lock_body(&mut self);

  fn unlock_body(&mut self);
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Phase {
  Open,
  Closing
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
  Opened(String),
  CloseRequested(String),
  /// The close animation finished.
  Closed(String),
  HidePrevented(String),
  /// The dialog left the document,
  /// whatever phase it was in.
  Removed(String)
}

impl Transition {
  pub fn dialog(&self) -> &str {
    match self {
      | Transition::Opened(id)
      | Transition::CloseRequested(id)
      | Transition::Closed(id)
      | Transition::HidePrevented(id)
      | Transition::Removed(id) => id
    }
  }
}

/// What the dialog should do after a
/// transition was applied.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum Effect {
  None,
  /// Start the close animation.
  BeginClose,
  /// Static dialog refused to close;
  /// play the bounce animation.
  Bounce
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Dialog {
  id:    String,
  phase: Phase
}

#[derive(Debug)]
pub struct OverlayController<S> {
  surface:        S,
  /// Stacking order, topmost last.
  dialogs:        Vec<Dialog>,
  static_dialogs: BTreeSet<String>
}

impl<S: OverlaySurface> OverlayController<S> {
  pub fn new(surface: S) -> Self {
    Self {
      surface,
      dialogs: Vec::new(),
      static_dialogs: BTreeSet::new()
    }
  }

  pub fn surface(&self) -> &S {
    &self.surface
  }

  /// Marks a dialog as refusing backdrop
  /// clicks.
  pub fn set_static(
    &mut self,
    id: &str,
    static_backdrop: bool
  ) {
    if static_backdrop {
      self.static_dialogs.insert(id.to_string());
    } else {
      self.static_dialogs.remove(id);
    }
  }

  pub fn open_count(&self) -> usize {
    self
      .dialogs
      .iter()
      .filter(|d| d.phase == Phase::Open)
      .count()
  }

  pub fn phase(&self, id: &str) -> Option<Phase> {
    self
      .dialogs
      .iter()
      .find(|d| d.id == id)
      .map(|d| d.phase)
  }

  pub fn is_open(&self, id: &str) -> bool {
    self.phase(id) == Some(Phase::Open)
  }

  /// The dialog escape should close.
  pub fn topmost_open(&self) -> Option<&str> {
    self
      .dialogs
      .iter()
      .rev()
      .find(|d| d.phase == Phase::Open)
      .map(|d| d.id.as_str())
  }

  pub fn apply(
    &mut self,
    transition: Transition
  ) -> Effect {
    let effect = match &transition {
      | Transition::Opened(id) => {
        self.dialogs.retain(|d| &d.id != id);
        self.dialogs.push(Dialog {
          id:    id.clone(),
          phase: Phase::Open
        });
        Effect::None
      }
      | Transition::CloseRequested(id) => {
        match self.find_mut(id) {
          | Some(dialog)
            if dialog.phase == Phase::Open =>
          {
            dialog.phase = Phase::Closing;
            Effect::BeginClose
          }
          | _ => Effect::None
        }
      }
      | Transition::Closed(id) => {
        self.dialogs.retain(|d| {
          &d.id != id || d.phase == Phase::Open
        });
        Effect::None
      }
      | Transition::HidePrevented(_) => {
        Effect::Bounce
      }
      | Transition::Removed(id) => {
        self.dialogs.retain(|d| &d.id != id);
        Effect::None
      }
    };

    tracing::debug!(
      ?transition,
      ?effect,
      open = self.open_count(),
      "overlay transition"
    );
    self.reconcile();
    effect
  }

  /// Escape key: closes the topmost open
  /// dialog. A static dialog on top only
  /// bounces and `None` is returned.
  pub fn escape(&mut self) -> Option<String> {
    let id = self.topmost_open()?.to_string();
    if self.static_dialogs.contains(&id) {
      self.apply(Transition::HidePrevented(id));
      return None;
    }
    self.apply(Transition::CloseRequested(
      id.clone()
    ));
    Some(id)
  }

  /// Click on the backdrop area of `id`.
  pub fn backdrop_click(
    &mut self,
    id: &str
  ) -> Effect {
    if self.static_dialogs.contains(id) {
      self.apply(Transition::HidePrevented(
        id.to_string()
      ))
    } else {
      self.apply(Transition::CloseRequested(
        id.to_string()
      ))
    }
  }

  fn find_mut(
    &mut self,
    id: &str
  ) -> Option<&mut Dialog> {
    self.dialogs.iter_mut().find(|d| d.id == id)
  }

  fn reconcile(&mut self) {
    if self.open_count() == 0 {
      if self.surface.backdrop_count() > 0 {
        self.surface.remove_backdrops();
      }
      self.surface.unlock_body();
      return;
    }

    self.surface.lock_body();
    match self.surface.backdrop_count() {
      | 0 => self.surface.append_backdrop(),
      | 1 => {}
      | extra => {
        tracing::debug!(
          extra,
          "collapsing duplicate backdrops"
        );
        self.surface.remove_backdrops();
        self.surface.append_backdrop();
      }
    }
  }
}

/// In-memory surface for tests and for
/// hosts without a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountingSurface {
  pub backdrops:   usize,
  pub body_locked: bool,
  pub mutations:   usize
}

impl OverlaySurface for CountingSurface {
  fn backdrop_count(&self) -> usize {
    self.backdrops
  }

  fn append_backdrop(&mut self) {
    self.backdrops += 1;
    self.mutations += 1;
  }

  fn remove_backdrops(&mut self) {
    self.backdrops = 0;
    self.mutations += 1;
  }

  fn lock_body(&mut self) {
    self.body_locked = true;
  }

  fn unlock_body(&mut self) {
    self.body_locked = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn controller()
  -> OverlayController<CountingSurface> {
    OverlayController::new(
      CountingSurface::default()
    )
  }

  #[test]
  fn stacked_dialogs_share_one_backdrop() {
    let mut overlay = controller();
    overlay.apply(Transition::Opened(
      "notes".to_string()
    ));
    overlay.apply(Transition::Opened(
      "note-form".to_string()
    ));

    assert_eq!(overlay.surface().backdrops, 1);
    assert!(overlay.surface().body_locked);
    assert_eq!(
      overlay.topmost_open(),
      Some("note-form")
    );

    assert_eq!(
      overlay.escape().as_deref(),
      Some("note-form")
    );
    assert_eq!(overlay.surface().backdrops, 1);

    overlay.apply(Transition::Closed(
      "note-form".to_string()
    ));
    overlay.apply(Transition::CloseRequested(
      "notes".to_string()
    ));
    assert_eq!(overlay.surface().backdrops, 0);
    assert!(!overlay.surface().body_locked);
  }

  #[test]
  fn static_dialog_refuses_backdrop_click() {
    let mut overlay = controller();
    overlay.set_static("auth", true);
    overlay.apply(Transition::Opened(
      "auth".to_string()
    ));

    assert_eq!(
      overlay.backdrop_click("auth"),
      Effect::Bounce
    );
    assert!(overlay.is_open("auth"));
    assert_eq!(overlay.escape(), None);
    assert!(overlay.is_open("auth"));

    overlay.apply(Transition::Opened(
      "chat".to_string()
    ));
    assert_eq!(
      overlay.backdrop_click("chat"),
      Effect::BeginClose
    );
    assert_eq!(
      overlay.phase("chat"),
      Some(Phase::Closing)
    );
  }

  #[test]
  fn stray_backdrops_collapse_to_one() {
    let mut overlay = controller();
    overlay.apply(Transition::Opened(
      "tasks".to_string()
    ));
    // Something else appended extras.
    overlay.surface = CountingSurface {
      backdrops: 3,
      ..CountingSurface::default()
    };
    overlay.apply(Transition::HidePrevented(
      "tasks".to_string()
    ));
    assert_eq!(overlay.surface().backdrops, 1);
  }

  #[test]
  fn reopen_during_close_animation_stays_open()
  {
    let mut overlay = controller();
    let id = "subjects".to_string();
    overlay.apply(Transition::Opened(id.clone()));
    overlay
      .apply(Transition::CloseRequested(id.clone()));
    overlay.apply(Transition::Opened(id.clone()));
    // Late animation end of the first close.
    overlay.apply(Transition::Closed(id.clone()));

    assert!(overlay.is_open(&id));
    assert_eq!(overlay.surface().backdrops, 1);
  }

  #[test]
  fn removing_an_open_dialog_releases_the_body()
  {
    let mut overlay = controller();
    overlay.apply(Transition::Opened(
      "notes".to_string()
    ));
    overlay.apply(Transition::Removed(
      "notes".to_string()
    ));

    assert_eq!(overlay.phase("notes"), None);
    assert_eq!(overlay.surface().backdrops, 0);
    assert!(!overlay.surface().body_locked);
  }
}
