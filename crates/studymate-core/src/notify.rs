use chrono::{
  DateTime,
  TimeDelta,
  Utc
};

pub const DEFAULT_NOTICE_SECS: i64 = 3;
pub const APP_ERROR_NOTICE_SECS: i64 = 5;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum NoticeLevel {
  Success,
  Error,
  Warning,
  Info
}

impl NoticeLevel {
  /// Alert class suffix.
  pub fn class(self) -> &'static str {
    match self {
      | NoticeLevel::Success => "success",
      | NoticeLevel::Error => "danger",
      | NoticeLevel::Warning => "warning",
      | NoticeLevel::Info => "info"
    }
  }

  pub fn icon(self) -> &'static str {
    match self {
      | NoticeLevel::Success => {
        "check-circle"
      }
      | NoticeLevel::Error => {
        "exclamation-circle"
      }
      | NoticeLevel::Warning => {
        "exclamation-triangle"
      }
      | NoticeLevel::Info => "info-circle"
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
  pub id:         u64,
  pub level:      NoticeLevel,
  pub message:    String,
  pub expires_at: DateTime<Utc>
}

/// Stack of transient notices, oldest
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeBoard {
  next_id:     u64,
  notices:     Vec<Notice>,
  default_ttl: TimeDelta,
  error_ttl:   TimeDelta
}

impl Default for NoticeBoard {
  fn default() -> Self {
    Self::new(
      TimeDelta::seconds(DEFAULT_NOTICE_SECS),
      TimeDelta::seconds(
        APP_ERROR_NOTICE_SECS
      )
    )
  }
}

impl NoticeBoard {
  pub fn new(
    default_ttl: TimeDelta,
    error_ttl: TimeDelta
  ) -> Self {
    Self {
      next_id: 1,
      notices: Vec::new(),
      default_ttl,
      error_ttl
    }
  }

  pub fn notices(&self) -> &[Notice] {
    &self.notices
  }

  pub fn default_ttl(&self) -> TimeDelta {
    self.default_ttl
  }

  pub fn push(
    &mut self,
    level: NoticeLevel,
    message: impl Into<String>,
    now: DateTime<Utc>
  ) -> u64 {
    let ttl = self.default_ttl;
    self.push_with_ttl(level, message, now, ttl)
  }

  /// Unexpected failures outside a form
  /// flow stay up longer.
  pub fn push_app_error(
    &mut self,
    message: impl Into<String>,
    now: DateTime<Utc>
  ) -> u64 {
    let ttl = self.error_ttl;
    self.push_with_ttl(
      NoticeLevel::Error,
      message,
      now,
      ttl
    )
  }

  fn push_with_ttl(
    &mut self,
    level: NoticeLevel,
    message: impl Into<String>,
    now: DateTime<Utc>,
    ttl: TimeDelta
  ) -> u64 {
    let id = self.next_id;
    self.next_id += 1;
    self.notices.push(Notice {
      id,
      level,
      message: message.into(),
      expires_at: now + ttl
    });
    id
  }

  pub fn dismiss(&mut self, id: u64) -> bool {
    let before = self.notices.len();
    self.notices.retain(|n| n.id != id);
    before != self.notices.len()
  }

  /// Drops every notice whose time is up
  /// and returns how many were removed.
  pub fn expire(
    &mut self,
    now: DateTime<Utc>
  ) -> usize {
    let before = self.notices.len();
    self
      .notices
      .retain(|n| n.expires_at > now);
    before - self.notices.len()
  }

  pub fn next_expiry(
    &self
  ) -> Option<DateTime<Utc>> {
    self
      .notices
      .iter()
      .map(|n| n.expires_at)
      .min()
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn notices_expire_by_their_own_ttl() {
    let start = Utc
      .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
      .single()
      .expect("valid time");
    let mut board = NoticeBoard::default();

    let saved = board.push(
      NoticeLevel::Success,
      "Nota creada exitosamente",
      start
    );
    board.push_app_error("boom", start);
    assert_eq!(board.notices().len(), 2);
    assert_eq!(
      board.next_expiry(),
      Some(start + TimeDelta::seconds(3))
    );

    assert_eq!(
      board.expire(
        start + TimeDelta::seconds(3)
      ),
      1
    );
    assert!(!board.dismiss(saved));
    assert_eq!(
      board.notices()[0].level,
      NoticeLevel::Error
    );
    assert_eq!(
      board.expire(
        start + TimeDelta::seconds(5)
      ),
      1
    );
    assert!(board.notices().is_empty());
  }
}
