//! Bearer token, current user and idle
//! countdown, persisted through a
//! [`SessionStore`].

use std::collections::BTreeMap;

use chrono::{
  DateTime,
  Utc
};
use studymate_shared::{
  AuthResponse,
  UserDto
};
use thiserror::Error;

use crate::idle::{
  IdleCheck,
  IdleTracker
};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "currentUser";
pub const FALLBACK_USER_NAME: &str =
  "Usuario";

#[derive(
  Debug, Clone, PartialEq, Eq, Error,
)]
#[error("session storage failed: {0}")]
pub struct StoreError(pub String);

/// Key/value persistence for the session.
/// Browser local storage on the web, a
/// JSON file in the terminal client.
pub trait SessionStore {
  fn load(&self, key: &str) -> Option<String>;

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StoreError>;

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  entries: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

impl SessionStore for MemoryStore {
  fn load(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StoreError> {
    self
      .entries
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StoreError> {
    self.entries.remove(key);
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  pub token: String,
  pub user:  Option<UserDto>
}

/// Result of checking a stored token
/// against `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
  Valid(UserDto),
  Invalid,
  Missing
}

#[derive(Debug)]
pub struct SessionManager<S> {
  store:   S,
  session: Option<Session>,
  idle:    IdleTracker
}

impl<S: SessionStore> SessionManager<S> {
  /// Restores whatever the store holds. A
  /// restored session is not trusted until
  /// [`SessionManager::apply_status`]
  /// confirms it.
  pub fn restore(
    store: S,
    idle: IdleTracker
  ) -> Self {
    let session =
      store.load(TOKEN_KEY).filter(|t| !t.trim().is_empty()).map(
        |token| {
          let user = store
            .load(USER_KEY)
            .and_then(|raw| {
              serde_json::from_str(&raw)
                .map_err(|err| {
                  tracing::warn!(
                    error = %err,
                    "discarding unreadable stored user"
                  );
                })
                .ok()
            });
          Session { token, user }
        }
      );

    tracing::debug!(
      restored = session.is_some(),
      "session restored from store"
    );

    Self {
      store,
      session,
      idle
    }
  }

  pub fn store(&self) -> &S {
    &self.store
  }

  pub fn token(&self) -> Option<&str> {
    self
      .session
      .as_ref()
      .map(|s| s.token.as_str())
  }

  pub fn current_user(
    &self
  ) -> Option<&UserDto> {
    self
      .session
      .as_ref()
      .and_then(|s| s.user.as_ref())
  }

  pub fn display_name(&self) -> String {
    self
      .current_user()
      .map(|user| user.name.trim())
      .filter(|name| !name.is_empty())
      .unwrap_or(FALLBACK_USER_NAME)
      .to_string()
  }

  pub fn is_authenticated(&self) -> bool {
    self.session.is_some()
  }

  pub fn idle(&self) -> &IdleTracker {
    &self.idle
  }

  /// Stores a fresh login and starts the
  /// idle countdown.
  pub fn begin(
    &mut self,
    auth: AuthResponse,
    now: DateTime<Utc>
  ) {
    self.persist(TOKEN_KEY, &auth.token);
    self.persist_user(&auth.user);
    tracing::info!(
      user_id = auth.user.id,
      "session started"
    );
    self.session = Some(Session {
      token: auth.token,
      user:  Some(auth.user)
    });
    self.idle.arm(now);
  }

  /// Applies a validation result. Returns
  /// whether the session survived.
  pub fn apply_status(
    &mut self,
    status: SessionStatus,
    now: DateTime<Utc>
  ) -> bool {
    match status {
      | SessionStatus::Valid(user) => {
        self.persist_user(&user);
        if let Some(session) =
          self.session.as_mut()
        {
          session.user = Some(user);
        }
        if !self.idle.is_armed() {
          self.idle.arm(now);
        }
        self.session.is_some()
      }
      | SessionStatus::Invalid => {
        tracing::warn!(
          "stored session rejected; clearing"
        );
        self.end();
        false
      }
      | SessionStatus::Missing => {
        self.end();
        false
      }
    }
  }

  /// Clears the token and user and stops
  /// the idle countdown.
  pub fn end(&mut self) {
    for key in [TOKEN_KEY, USER_KEY] {
      if let Err(err) = self.store.remove(key)
      {
        tracing::error!(
          key,
          error = %err,
          "failed to clear session key"
        );
      }
    }
    self.session = None;
    self.idle.disarm();
  }

  pub fn record_activity(
    &mut self,
    now: DateTime<Utc>
  ) {
    self.idle.record_activity(now);
  }

  /// Ends the session when the idle
  /// countdown has run out.
  pub fn check_idle(
    &mut self,
    now: DateTime<Utc>
  ) -> IdleCheck {
    let check = self.idle.check(now);
    if check == IdleCheck::Expired {
      self.end();
    }
    check
  }

  fn persist_user(&mut self, user: &UserDto) {
    match serde_json::to_string(user) {
      | Ok(raw) => self.persist(USER_KEY, &raw),
      | Err(err) => {
        tracing::error!(
          error = %err,
          "failed to encode current user"
        );
      }
    }
  }

  fn persist(&mut self, key: &str, value: &str) {
    if let Err(err) =
      self.store.save(key, value)
    {
      tracing::error!(
        key,
        error = %err,
        "failed to persist session key"
      );
    }
  }
}
