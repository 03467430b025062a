use chrono::{
  DateTime,
  TimeDelta,
  Utc
};

pub const IDLE_TIMEOUT_MINUTES: i64 = 30;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum IdleCheck {
  Disarmed,
  Remaining(TimeDelta),
  /// Reported once; the tracker disarms
  /// itself when it expires.
  Expired
}

/// Inactivity countdown. Activity only
/// moves the last-seen timestamp; callers
/// poll [`IdleTracker::check`] from a
/// single timer armed for the remaining
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleTracker {
  timeout:       TimeDelta,
  last_activity: Option<DateTime<Utc>>
}

impl Default for IdleTracker {
  fn default() -> Self {
    Self::new(TimeDelta::minutes(
      IDLE_TIMEOUT_MINUTES
    ))
  }
}

impl IdleTracker {
  pub fn new(timeout: TimeDelta) -> Self {
    Self {
      timeout,
      last_activity: None
    }
  }

  pub fn timeout(&self) -> TimeDelta {
    self.timeout
  }

  pub fn is_armed(&self) -> bool {
    self.last_activity.is_some()
  }

  pub fn arm(&mut self, now: DateTime<Utc>) {
    self.last_activity = Some(now);
  }

  pub fn disarm(&mut self) {
    self.last_activity = None;
  }

  /// Ignored while disarmed so events
  /// before login never start a countdown.
  pub fn record_activity(
    &mut self,
    now: DateTime<Utc>
  ) {
    if let Some(last) =
      self.last_activity.as_mut()
      && now > *last
    {
      *last = now;
    }
  }

  pub fn check(
    &mut self,
    now: DateTime<Utc>
  ) -> IdleCheck {
    let Some(last) = self.last_activity
    else {
      return IdleCheck::Disarmed;
    };

    let idle_for = now - last;
    if idle_for >= self.timeout {
      tracing::info!(
        idle_minutes = idle_for.num_minutes(),
        "idle timeout reached"
      );
      self.disarm();
      return IdleCheck::Expired;
    }

    IdleCheck::Remaining(
      self.timeout - idle_for
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn at(minute: i64) -> DateTime<Utc> {
    let base = Utc
      .with_ymd_and_hms(2025, 1, 1, 8, 0, 0)
      .single()
      .expect("valid base time");
    base + TimeDelta::minutes(minute)
  }

  #[test]
  fn disarmed_tracker_never_expires() {
    let mut tracker =
      IdleTracker::default();
    tracker.record_activity(at(0));
    assert_eq!(
      tracker.check(at(120)),
      IdleCheck::Disarmed
    );
  }

  #[test]
  fn gaps_under_timeout_keep_session() {
    let mut tracker =
      IdleTracker::default();
    tracker.arm(at(0));

    for minute in [29, 58, 87, 116] {
      tracker.record_activity(at(minute));
      assert!(matches!(
        tracker.check(at(minute)),
        IdleCheck::Remaining(_)
      ));
    }

    assert_eq!(
      tracker.check(at(130)),
      IdleCheck::Remaining(
        TimeDelta::minutes(16)
      )
    );
  }

  #[test]
  fn long_gap_expires_exactly_once() {
    let mut tracker =
      IdleTracker::default();
    tracker.arm(at(0));
    tracker.record_activity(at(10));

    assert_eq!(
      tracker.check(at(40)),
      IdleCheck::Expired
    );
    assert_eq!(
      tracker.check(at(41)),
      IdleCheck::Disarmed
    );
    assert!(!tracker.is_armed());
  }

  #[test]
  fn stale_activity_does_not_rewind() {
    let mut tracker =
      IdleTracker::default();
    tracker.arm(at(20));
    tracker.record_activity(at(5));
    assert_eq!(
      tracker.check(at(50)),
      IdleCheck::Expired
    );
  }
}
