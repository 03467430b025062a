use chrono::TimeDelta;
use serde::{
  Deserialize,
  Serialize
};

use crate::api::base_url_for_host;
use crate::assistant::DEFAULT_CHAT_CONTEXT;
use crate::idle::IDLE_TIMEOUT_MINUTES;
use crate::notify::{
  APP_ERROR_NOTICE_SECS,
  DEFAULT_NOTICE_SECS,
  NoticeBoard
};

fn default_idle_minutes() -> i64 {
  IDLE_TIMEOUT_MINUTES
}

fn default_notice_secs() -> i64 {
  DEFAULT_NOTICE_SECS
}

fn default_error_notice_secs() -> i64 {
  APP_ERROR_NOTICE_SECS
}

fn default_chat_context() -> String {
  DEFAULT_CHAT_CONTEXT.to_string()
}

/// Front-end settings, read from the
/// bundled `studymate.toml`.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct AppSettings {
  #[serde(default)]
  pub version:           u32,
  /// Fixed API base. Empty means pick by
  /// page host.
  #[serde(default)]
  pub api_base_url:      Option<String>,
  #[serde(default = "default_idle_minutes")]
  pub idle_minutes:      i64,
  #[serde(default = "default_notice_secs")]
  pub notice_secs:       i64,
  #[serde(
    default = "default_error_notice_secs"
  )]
  pub error_notice_secs: i64,
  #[serde(default = "default_chat_context")]
  pub chat_context:      String
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      version:           1,
      api_base_url:      None,
      idle_minutes:      default_idle_minutes(),
      notice_secs:       default_notice_secs(),
      error_notice_secs:
        default_error_notice_secs(),
      chat_context:      default_chat_context()
    }
  }
}

impl AppSettings {
  pub fn sanitize(&mut self) {
    if self
      .api_base_url
      .as_deref()
      .is_some_and(|url| url.trim().is_empty())
    {
      self.api_base_url = None;
    }

    if self.idle_minutes <= 0 {
      self.idle_minutes =
        default_idle_minutes();
    }

    if self.notice_secs <= 0 {
      self.notice_secs =
        default_notice_secs();
    }

    if self.error_notice_secs <= 0 {
      self.error_notice_secs =
        default_error_notice_secs();
    }

    if self.chat_context.trim().is_empty() {
      self.chat_context =
        default_chat_context();
    }
  }

  pub fn api_base_for_host(
    &self,
    host: &str
  ) -> String {
    self
      .api_base_url
      .clone()
      .unwrap_or_else(|| {
        base_url_for_host(host).to_string()
      })
  }

  pub fn idle_timeout(&self) -> TimeDelta {
    TimeDelta::minutes(self.idle_minutes)
  }

  pub fn notice_board(&self) -> NoticeBoard {
    NoticeBoard::new(
      TimeDelta::seconds(self.notice_secs),
      TimeDelta::seconds(
        self.error_notice_secs
      )
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::{
    DEFAULT_LOCAL_API,
    DEFAULT_REMOTE_API
  };

  #[test]
  fn sanitize_restores_defaults() {
    let mut settings = AppSettings {
      version:           1,
      api_base_url:      Some("  ".to_string()),
      idle_minutes:      0,
      notice_secs:       -1,
      error_notice_secs: 0,
      chat_context:      String::new()
    };
    settings.sanitize();
    assert_eq!(settings, AppSettings::default());
  }

  #[test]
  fn api_base_prefers_override() {
    let mut settings = AppSettings::default();
    assert_eq!(
      settings.api_base_for_host("localhost"),
      DEFAULT_LOCAL_API
    );
    assert_eq!(
      settings.api_base_for_host("example.org"),
      DEFAULT_REMOTE_API
    );

    settings.api_base_url =
      Some("http://10.0.0.2:9000/api".to_string());
    assert_eq!(
      settings.api_base_for_host("localhost"),
      "http://10.0.0.2:9000/api"
    );
  }
}
