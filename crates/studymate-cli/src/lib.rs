pub mod cli;
pub mod commands;
pub mod config;
pub mod render;
pub mod session_file;
pub mod transport;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;

use crate::cli::GlobalCli;
use crate::config::Settings;
use crate::render::Renderer;
use crate::session_file::SessionFile;
use crate::transport::ReqwestTransport;

/// Entry point of the `studymate` binary.
#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let pre = cli::preprocess_args(&raw_args)?;
  let args =
    GlobalCli::parse_from(pre.cleaned_args);
  cli::init_tracing(args.verbose, args.quiet)?;

  let flag_overrides = args
    .rc_overrides
    .iter()
    .map(|kv| (kv.key.clone(), kv.value.clone()));
  let settings = settings(
    &args,
    pre.rc_overrides.into_iter().chain(flag_overrides)
  )?;
  tracing::debug!(?settings, "settings resolved");

  let session_dir =
    settings.session_dir(args.data.as_deref())?;
  let store = SessionFile::open(&session_dir)
    .with_context(|| {
      format!(
        "cannot use session directory {}",
        session_dir.display()
      )
    })?;

  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .context("failed to start async runtime")?
    .block_on(commands::dispatch(
      store,
      &settings,
      &Renderer::new(&settings),
      ReqwestTransport::new()?,
      args.command
    ))
}

/// rc file first, then positional
/// `rc.KEY=VALUE` and `--rc` overrides.
fn settings(
  args: &GlobalCli,
  overrides: impl IntoIterator<
    Item = (String, String)
  >
) -> anyhow::Result<Settings> {
  let mut settings =
    Settings::load(args.studymaterc.as_deref())?;
  settings.apply_overrides(overrides)?;
  Ok(settings)
}
