/* src/server/core/rust/src/process.rs */

// Child process helpers shared by the bundler and renderer invocations.

use std::ffi::OsStr;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::errors::{Error, Result};
use crate::settings::RenderSettings;

pub(crate) struct Captured {
  pub status: ExitStatus,
  pub stdout: String,
  pub stderr: String,
}

/// `{"error": {"message": ..., "stack": ...}}` as printed by the driver scripts.
#[derive(Debug, Deserialize)]
pub(crate) struct ScriptError {
  pub message: String,
  #[serde(default)]
  pub stack: Option<String>,
}

impl ScriptError {
  /// Prefer the stack, which already starts with the message.
  pub fn into_message(self) -> String {
    match self.stack {
      Some(stack) if !stack.is_empty() => stack,
      _ => self.message,
    }
  }
}

/// Run `<node> <script> <args...>`, feeding `stdin`, and wait for it to exit.
pub(crate) fn run_script<I, S>(
  settings: &RenderSettings,
  script: &Path,
  args: I,
  stdin: &str,
) -> Result<Captured>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let mut cmd = node_command(settings, script, args);
  cmd.stdin(Stdio::piped()).stdout(Stdio::piped()).stderr(Stdio::piped());
  let mut child = spawn(settings, script, &mut cmd)?;

  // Feed stdin from a separate thread so a chatty child cannot deadlock us.
  let writer = child.stdin.take().map(|mut pipe| {
    let input = stdin.to_owned();
    std::thread::spawn(move || {
      // The child may exit without reading; a broken pipe here is not our error.
      let _ = pipe.write_all(input.as_bytes());
    })
  });

  let output = child.wait_with_output().map_err(|e| Error::io(script, e))?;
  if let Some(handle) = writer {
    let _ = handle.join();
  }

  Ok(Captured {
    status: output.status,
    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
  })
}

/// Start `<node> <script> <args...>` without waiting for it. All stdio is discarded.
pub(crate) fn spawn_script<I, S>(settings: &RenderSettings, script: &Path, args: I) -> Result<Child>
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let mut cmd = node_command(settings, script, args);
  cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
  spawn(settings, script, &mut cmd)
}

fn node_command<I, S>(settings: &RenderSettings, script: &Path, args: I) -> Command
where
  I: IntoIterator<Item = S>,
  S: AsRef<OsStr>,
{
  let mut cmd = Command::new(&settings.node);
  cmd.arg(script);
  cmd.args(args);
  cmd.env("NODE_PATH", &settings.node_modules);
  cmd
}

fn spawn(settings: &RenderSettings, script: &Path, cmd: &mut Command) -> Result<Child> {
  let program = settings.node.to_string_lossy().into_owned();
  tracing::debug!(program = %program, script = %script.display(), "spawning");
  cmd.spawn().map_err(|source| Error::Spawn { program, source })
}

/// Parse the last non-empty stdout line as JSON.
pub(crate) fn last_json_line<T: DeserializeOwned>(stdout: &str) -> Option<T> {
  let line = stdout.lines().rev().map(str::trim).find(|l| !l.is_empty())?;
  serde_json::from_str(line).ok()
}

/// Failure text that shows both streams, stderr first.
pub(crate) fn describe_failure(label: &str, captured: &Captured) -> String {
  let mut msg = format!("{label} exited with status {}", captured.status);
  if !captured.stderr.trim().is_empty() {
    msg.push('\n');
    msg.push_str(captured.stderr.trim_end());
  }
  if !captured.stdout.trim().is_empty() {
    msg.push('\n');
    msg.push_str(captured.stdout.trim_end());
  }
  msg
}
