/* src/cli/core/src/config/types.rs */

use std::path::Path;

use react_render::RenderSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ReactRenderConfig {
  pub project: ProjectConfig,
  /// Pipeline settings; relative paths are taken from the config file's directory.
  #[serde(default)]
  pub render: RenderSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
  pub name: String,
}

impl ReactRenderConfig {
  /// Config used when no `react-render.toml` exists: defaults, named after `dir`.
  pub fn implicit(dir: &Path) -> Self {
    let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or("react-render").to_string();
    Self { project: ProjectConfig { name }, render: RenderSettings::default() }
  }

  /// Settings with every relative path resolved against `base_dir`.
  pub fn settings(&self, base_dir: &Path) -> RenderSettings {
    self.render.clone().rooted_at(base_dir)
  }
}
