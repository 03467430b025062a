//! `~/.studymaterc`: one `key = value`
//! setting per line, `#` starts a comment.
//!
//! | key             | meaning                         |
//! |-----------------|---------------------------------|
//! | `api.url`       | backend base URL                |
//! | `data.location` | directory holding the session   |
//! | `color`         | colored tables (`on`/`off`)     |
//! | `chat.context`  | context sent with chat questions |
//! | `confirmation`  | ask before deleting (`on`/`off`) |

use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow,
  bail
};
use studymate_core::api::DEFAULT_REMOTE_API;
use studymate_core::assistant::DEFAULT_CHAT_CONTEXT;

pub const RC_ENV: &str = "STUDYMATERC";
const RC_NAME: &str = ".studymaterc";
const SESSION_DIR_NAME: &str = ".studymate";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub api_url:         String,
  /// `data.location`; `None` means
  /// `~/.studymate`.
  pub session_dir:     Option<PathBuf>,
  pub color:           bool,
  pub chat_context:    String,
  pub confirm_deletes: bool,
  /// The rc file the values came from.
  pub source:          Option<PathBuf>
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      api_url:         DEFAULT_REMOTE_API
        .to_string(),
      session_dir:     None,
      color:           true,
      chat_context:    DEFAULT_CHAT_CONTEXT
        .to_string(),
      confirm_deletes: true,
      source:          None
    }
  }
}

impl Settings {
  /// Defaults overlaid with the rc file:
  /// `--studymaterc`, else `$STUDYMATERC`
  /// (`/dev/null` disables it), else
  /// `~/.studymaterc` when present.
  #[tracing::instrument(skip(rc_flag))]
  pub fn load(
    rc_flag: Option<&Path>
  ) -> anyhow::Result<Self> {
    let mut settings = Self::default();
    match locate_rc(
      rc_flag,
      std::env::var_os(RC_ENV)
    ) {
      | Some(path) => {
        tracing::info!(rc = %path.display(), "reading studymaterc");
        settings.read_rc(&path)?;
      }
      | None => {
        tracing::debug!(
          "no studymaterc, using defaults"
        );
      }
    }
    Ok(settings)
  }

  /// `--rc` and positional `rc.KEY=VALUE`
  /// overrides, applied after the file.
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (key, value) in overrides {
      let key = key
        .strip_prefix("rc.")
        .unwrap_or(&key);
      self.set(key, &value).with_context(
        || format!("invalid override {key}")
      )?;
    }
    Ok(())
  }

  /// Where `session.json` lives: the
  /// `--data` flag wins over the rc value.
  pub fn session_dir(
    &self,
    flag: Option<&Path>
  ) -> anyhow::Result<PathBuf> {
    if let Some(dir) =
      flag.or(self.session_dir.as_deref())
    {
      return Ok(dir.to_path_buf());
    }
    dirs::home_dir()
      .map(|home| home.join(SESSION_DIR_NAME))
      .ok_or_else(|| {
        anyhow!(
          "cannot determine home \
           directory; pass --data"
        )
      })
  }

  pub fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    let value = value.trim();
    match key.trim() {
      | "api.url" => {
        let url = value.trim_end_matches('/');
        if url.is_empty() {
          bail!("api.url cannot be empty");
        }
        self.api_url = url.to_string();
      }
      | "data.location" => {
        self.session_dir = (!value.is_empty())
          .then(|| home_relative(value));
      }
      | "color" => {
        self.color = switch(key, value)?;
      }
      | "chat.context" => {
        self.chat_context = if value.is_empty()
        {
          DEFAULT_CHAT_CONTEXT.to_string()
        } else {
          value.to_string()
        };
      }
      | "confirmation" => {
        self.confirm_deletes =
          switch(key, value)?;
      }
      | other => {
        tracing::warn!(
          key = other,
          "ignoring unknown setting"
        );
      }
    }
    Ok(())
  }

  fn read_rc(
    &mut self,
    path: &Path
  ) -> anyhow::Result<()> {
    let text = fs::read_to_string(path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;

    for (index, line) in
      text.lines().enumerate()
    {
      let line = line.trim();
      if line.is_empty() || line.starts_with('#')
      {
        continue;
      }
      let Some((key, value)) =
        line.split_once('=')
      else {
        bail!(
          "{}:{}: expected key = value",
          path.display(),
          index + 1
        );
      };
      self.set(key, value).with_context(
        || {
          format!(
            "{}:{}",
            path.display(),
            index + 1
          )
        }
      )?;
    }

    self.source = Some(path.to_path_buf());
    Ok(())
  }
}

fn locate_rc(
  flag: Option<&Path>,
  env: Option<std::ffi::OsString>
) -> Option<PathBuf> {
  if let Some(path) = flag {
    return Some(path.to_path_buf());
  }
  if let Some(env) = env {
    return (env != "/dev/null")
      .then(|| PathBuf::from(env));
  }
  dirs::home_dir()
    .map(|home| home.join(RC_NAME))
    .filter(|path| path.is_file())
}

fn home_relative(value: &str) -> PathBuf {
  match (
    value.strip_prefix("~/"),
    dirs::home_dir()
  ) {
    | (Some(rest), Some(home)) => {
      home.join(rest)
    }
    | _ => PathBuf::from(value)
  }
}

fn switch(
  key: &str,
  value: &str
) -> anyhow::Result<bool> {
  match value.to_ascii_lowercase().as_str() {
    | "on" | "yes" | "true" | "1" => Ok(true),
    | "off" | "no" | "false" | "0" => {
      Ok(false)
    }
    | _ => {
      bail!("{key} must be on or off, got {value:?}")
    }
  }
}
