/* src/cli/core/src/config/loader.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::ReactRenderConfig;

pub const CONFIG_FILE: &str = "react-render.toml";

/// Walk upward from `start` to find `react-render.toml`, like Cargo.toml discovery
pub fn find_config(start: &Path) -> Result<PathBuf> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      bail!("{CONFIG_FILE} not found (searched upward from {})", start.display());
    }
  }
}

pub fn load_config(path: &Path) -> Result<ReactRenderConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: ReactRenderConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  if config.render.static_url.is_empty() {
    bail!("render.static_url must not be empty");
  }
  Ok(config)
}

/// Resolve the config (explicit path, discovered, or implicit defaults) and
/// return it with the directory its relative paths are anchored to.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<(PathBuf, ReactRenderConfig)> {
  let path = match explicit {
    Some(p) => Some(if p.is_absolute() { p.to_path_buf() } else { cwd.join(p) }),
    None => find_config(cwd).ok(),
  };
  match path {
    Some(path) => {
      let config = load_config(&path)?;
      let base_dir = path.parent().map_or_else(|| cwd.to_path_buf(), Path::to_path_buf);
      tracing::debug!(config = %path.display(), "loaded config");
      Ok((base_dir, config))
    }
    None => {
      tracing::debug!(cwd = %cwd.display(), "no {CONFIG_FILE} found, using defaults");
      Ok((cwd.to_path_buf(), ReactRenderConfig::implicit(cwd)))
    }
  }
}
