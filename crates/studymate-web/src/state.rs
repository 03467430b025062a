use std::rc::Rc;

use chrono::{
  DateTime,
  Utc
};
use studymate_core::notify::{
  NoticeBoard,
  NoticeLevel
};
use yew::Reducible;

/// Toasts, the loading overlay and the
/// revision counters that trigger reloads.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
  pub board:        NoticeBoard,
  /// Requests currently showing the
  /// overlay; it stays up until all end.
  pub loading:      u32,
  pub activity_rev: u64,
  pub subjects_rev: u64
}

impl UiState {
  pub fn new(board: NoticeBoard) -> Self {
    Self {
      board,
      loading: 0,
      activity_rev: 0,
      subjects_rev: 0
    }
  }

  pub fn is_loading(&self) -> bool {
    self.loading > 0
  }
}

pub enum UiAction {
  Notify(NoticeLevel, String, DateTime<Utc>),
  AppError(String, DateTime<Utc>),
  Dismiss(u64),
  Expire(DateTime<Utc>),
  Loading(bool),
  ActivityLogged,
  SubjectsSaved
}

impl Reducible for UiState {
  type Action = UiAction;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next = (*self).clone();
    match action {
      | UiAction::Notify(level, message, now) => {
        next.board.push(level, message, now);
      }
      | UiAction::AppError(message, now) => {
        next.board.push_app_error(message, now);
      }
      | UiAction::Dismiss(id) => {
        if !next.board.dismiss(id) {
          return self;
        }
      }
      | UiAction::Expire(now) => {
        if next.board.expire(now) == 0 {
          return self;
        }
      }
      | UiAction::Loading(true) => {
        next.loading += 1;
      }
      | UiAction::Loading(false) => {
        next.loading =
          next.loading.saturating_sub(1);
      }
      | UiAction::ActivityLogged => {
        next.activity_rev += 1;
      }
      | UiAction::SubjectsSaved => {
        next.subjects_rev += 1;
      }
    }
    Rc::new(next)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeDelta,
    TimeZone
  };

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0)
      .single()
      .expect("valid timestamp")
      + TimeDelta::seconds(secs)
  }

  fn state() -> Rc<UiState> {
    Rc::new(UiState::new(NoticeBoard::default()))
  }

  #[test]
  fn loading_nests_and_never_underflows() {
    let state = state()
      .reduce(UiAction::Loading(true))
      .reduce(UiAction::Loading(true))
      .reduce(UiAction::Loading(false));
    assert!(state.is_loading());

    let state = state
      .reduce(UiAction::Loading(false))
      .reduce(UiAction::Loading(false));
    assert!(!state.is_loading());
    assert_eq!(state.loading, 0);
  }

  #[test]
  fn app_errors_outlive_plain_notices() {
    let state = state()
      .reduce(UiAction::Notify(
        NoticeLevel::Success,
        "Nota creada exitosamente".into(),
        at(0)
      ))
      .reduce(UiAction::AppError(
        "Error de conexión".into(),
        at(0)
      ))
      .reduce(UiAction::Expire(at(3)));

    let left: Vec<_> = state
      .board
      .notices()
      .iter()
      .map(|n| n.message.as_str())
      .collect();
    assert_eq!(left, ["Error de conexión"]);

    let state =
      state.reduce(UiAction::Expire(at(5)));
    assert!(state.board.notices().is_empty());
  }

  #[test]
  fn revisions_only_move_forward() {
    let state = state()
      .reduce(UiAction::SubjectsSaved)
      .reduce(UiAction::ActivityLogged)
      .reduce(UiAction::ActivityLogged);
    assert_eq!(state.subjects_rev, 1);
    assert_eq!(state.activity_rev, 2);
  }

  #[test]
  fn noop_actions_keep_the_same_state() {
    let before = state();
    let after = before
      .clone()
      .reduce(UiAction::Dismiss(42));
    assert!(Rc::ptr_eq(&before, &after));

    let after = before
      .clone()
      .reduce(UiAction::Expire(at(60)));
    assert!(Rc::ptr_eq(&before, &after));
  }
}
