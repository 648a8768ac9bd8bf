/* src/server/core/rust/src/watcher.rs */

// Background webpack watchers, at most one live process per generated config.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Child;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::errors::Result;
use crate::process::spawn_script;
use crate::settings::RenderSettings;

/// Flag that makes the bundle driver stay in webpack's watch loop.
pub(crate) const DAEMON_FLAG: &str = "--watch-daemon";

fn registry() -> MutexGuard<'static, HashMap<PathBuf, Child>> {
  static WATCHERS: OnceLock<Mutex<HashMap<PathBuf, Child>>> = OnceLock::new();
  WATCHERS.get_or_init(Mutex::default).lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start a watcher for `config` unless one this process started is still running.
/// Returns whether a new process was spawned.
pub(crate) fn ensure_watcher(
  settings: &RenderSettings,
  script: &Path,
  config: &Path,
) -> Result<bool> {
  let mut watchers = registry();
  if let Some(child) = watchers.get_mut(config) {
    match child.try_wait() {
      Ok(None) => {
        tracing::debug!(config = %config.display(), pid = child.id(), "watcher already running");
        return Ok(false);
      }
      Ok(Some(status)) => {
        tracing::warn!(config = %config.display(), %status, "watcher exited, restarting");
      }
      Err(e) => {
        tracing::warn!(config = %config.display(), error = %e, "cannot poll watcher, restarting");
        let _ = child.kill();
      }
    }
  }

  let args = [config.as_os_str(), settings.bundle_dir.as_os_str(), OsStr::new(DAEMON_FLAG)];
  let child = spawn_script(settings, script, args)?;
  tracing::info!(config = %config.display(), pid = child.id(), "watcher started");
  watchers.insert(config.to_path_buf(), child);
  Ok(true)
}

fn shut_down(config: &Path, child: &mut Child) {
  let _ = child.kill();
  let _ = child.wait();
  tracing::debug!(config = %config.display(), "watcher stopped");
}

/// Stop the watcher for one config (see [`get_config_filename`](crate::get_config_filename)).
/// Returns whether one was registered.
pub fn stop_watcher(config: &Path) -> bool {
  let removed = registry().remove(config);
  match removed {
    Some(mut child) => {
      shut_down(config, &mut child);
      true
    }
    None => false,
  }
}

/// Kill every watcher started by this process and return how many were registered.
pub fn stop_watchers() -> usize {
  let drained: Vec<_> = registry().drain().collect();
  let count = drained.len();
  for (config, mut child) in drained {
    shut_down(&config, &mut child);
  }
  count
}
