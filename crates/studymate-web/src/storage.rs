use studymate_core::config::AppSettings;
use studymate_core::session::{
  SessionStore,
  StoreError
};

const SETTINGS_TOML: &str =
  include_str!("../assets/studymate.toml");

fn local_storage() -> Option<web_sys::Storage>
{
  web_sys::window().and_then(|window| {
    window
      .local_storage()
      .ok()
      .flatten()
  })
}

/// Session keys in `window.localStorage`.
#[derive(
  Debug, Clone, Copy, Default, PartialEq,
)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
  fn load(&self, key: &str) -> Option<String> {
    local_storage().and_then(|storage| {
      storage.get_item(key).ok().flatten()
    })
  }

  fn save(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), StoreError> {
    let storage =
      local_storage().ok_or_else(|| {
        StoreError(
          "local storage unavailable"
            .to_string()
        )
      })?;
    storage.set_item(key, value).map_err(
      |err| StoreError(format!("{err:?}"))
    )
  }

  fn remove(
    &mut self,
    key: &str
  ) -> Result<(), StoreError> {
    let Some(storage) = local_storage()
    else {
      return Ok(());
    };
    storage.remove_item(key).map_err(
      |err| StoreError(format!("{err:?}"))
    )
  }
}

pub fn load_settings() -> AppSettings {
  parse_settings(SETTINGS_TOML)
}

fn parse_settings(text: &str) -> AppSettings {
  match toml::from_str::<AppSettings>(text)
  {
    | Ok(mut settings) => {
      settings.sanitize();
      tracing::info!(
        version = settings.version,
        idle_minutes = settings.idle_minutes,
        api = ?settings.api_base_url,
        "loaded studymate settings"
      );
      settings
    }
    | Err(error) => {
      tracing::error!(%error, "failed parsing studymate settings; using defaults");
      AppSettings::default()
    }
  }
}

pub fn page_host() -> String {
  web_sys::window()
    .and_then(|window| {
      window.location().host().ok()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bundled_settings_parse() {
    let settings = parse_settings(SETTINGS_TOML);
    assert_eq!(settings.idle_minutes, 30);
    assert_eq!(settings.api_base_url, None);
  }

  #[test]
  fn bad_values_are_sanitized() {
    let settings = parse_settings(
      "version = 1\napi_base_url = \"  \"\nidle_minutes = 0\nnotice_secs = -2\n"
    );
    assert_eq!(settings.api_base_url, None);
    assert_eq!(settings.idle_minutes, 30);
    assert_eq!(settings.notice_secs, 3);
  }

  #[test]
  fn unreadable_settings_fall_back() {
    assert_eq!(
      parse_settings("idle_minutes = \"soon\""),
      AppSettings::default()
    );
  }
}
