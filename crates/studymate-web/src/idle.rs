use std::cell::RefCell;
use std::rc::{
  Rc,
  Weak
};

use chrono::{
  TimeDelta,
  Utc
};
use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use studymate_core::idle::IdleCheck;
use studymate_core::session::SessionManager;
use yew::Callback;

use crate::storage::BrowserStore;

pub type SharedSession =
  Rc<RefCell<SessionManager<BrowserStore>>>;

const ACTIVITY_EVENTS: [&str; 4] =
  ["mousemove", "keypress", "click", "scroll"];

/// Owner of the pending idle timer. The
/// timer callback only holds a
/// [`WeakSlot`], so dropping the owner
/// cancels the timer and ends the chain.
struct TimerSlot<T>(Rc<RefCell<Option<T>>>);

impl<T> Default for TimerSlot<T> {
  fn default() -> Self {
    Self(Rc::new(RefCell::new(None)))
  }
}

impl<T> TimerSlot<T> {
  fn downgrade(&self) -> WeakSlot<T> {
    WeakSlot(Rc::downgrade(&self.0))
  }
}

struct WeakSlot<T>(Weak<RefCell<Option<T>>>);

impl<T> Clone for WeakSlot<T> {
  fn clone(&self) -> Self {
    Self(self.0.clone())
  }
}

impl<T> WeakSlot<T> {
  fn is_live(&self) -> bool {
    self.0.strong_count() > 0
  }

  /// Replaces the pending timer. Returns
  /// `false` and drops `timer` when the
  /// owner is gone.
  fn store(&self, timer: T) -> bool {
    match self.0.upgrade() {
      | Some(cell) => {
        *cell.borrow_mut() = Some(timer);
        true
      }
      | None => false
    }
  }
}

/// Document listeners feeding the idle
/// tracker plus one timer armed for the
/// remaining time. Dropping the watcher
/// removes both.
pub struct IdleWatcher {
  _listeners: Vec<EventListener>,
  _timer:     TimerSlot<Timeout>
}

impl IdleWatcher {
  pub fn start(
    session: SharedSession,
    on_expired: Callback<()>
  ) -> Option<Self> {
    let document = web_sys::window()
      .and_then(|window| window.document())?;

    let listeners = ACTIVITY_EVENTS
      .iter()
      .map(|event| {
        let session = session.clone();
        EventListener::new(
          &document,
          *event,
          move |_| {
            if let Ok(mut session) =
              session.try_borrow_mut()
            {
              session
                .record_activity(Utc::now());
            }
          }
        )
      })
      .collect();

    let timeout =
      session.borrow().idle().timeout();
    let timer = TimerSlot::default();
    arm(
      session,
      timer.downgrade(),
      on_expired,
      timeout
    );

    tracing::debug!(
      minutes = timeout.num_minutes(),
      "idle watcher started"
    );
    Some(Self {
      _listeners: listeners,
      _timer:     timer
    })
  }
}

fn arm(
  session: SharedSession,
  slot: WeakSlot<Timeout>,
  on_expired: Callback<()>,
  delay: TimeDelta
) {
  let millis = delay
    .num_milliseconds()
    .clamp(0, i64::from(u32::MAX))
    as u32;
  let next = slot.clone();
  let timeout = Timeout::new(millis, move || {
    fire(session, next, on_expired);
  });
  if !slot.store(timeout) {
    tracing::debug!("idle watcher gone, not re-arming");
  }
}

/// Timer callback: activity may have
/// pushed the deadline out, in which case
/// the timer is armed again for the rest.
fn fire(
  session: SharedSession,
  slot: WeakSlot<Timeout>,
  on_expired: Callback<()>
) {
  if !slot.is_live() {
    return;
  }
  let check = match session.try_borrow_mut() {
    | Ok(mut session) => {
      session.check_idle(Utc::now())
    }
    | Err(_) => {
      IdleCheck::Remaining(TimeDelta::seconds(1))
    }
  };

  match check {
    | IdleCheck::Remaining(rest) => {
      arm(session, slot, on_expired, rest);
    }
    | IdleCheck::Expired => {
      on_expired.emit(());
    }
    | IdleCheck::Disarmed => {}
  }
}
