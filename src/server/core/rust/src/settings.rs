/* src/server/core/rust/src/settings.rs */

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::finder::{DirectoryFinder, StaticFileFinder};

/// Everything the pipeline needs, passed explicitly into each operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
  /// Executable used for both the bundler and the renderer drivers.
  pub node: PathBuf,
  /// `node_modules` holding `react`, `webpack`, `resolve` and the loaders.
  pub node_modules: PathBuf,
  /// Relative component paths are resolved against this directory first.
  pub base_dir: PathBuf,
  /// Fallback lookup for relative component paths.
  pub static_dirs: Vec<PathBuf>,
  /// Root of the bundler output; bundles land in `<bundle_dir>/react-components`.
  pub bundle_dir: PathBuf,
  /// Public URL prefix that maps onto `bundle_dir`.
  pub static_url: String,
  /// Generated configs and materialized driver scripts.
  pub cache_dir: PathBuf,
  /// Emit `devtool: 'eval'` in generated configs.
  pub dev_tool: bool,
  pub render_script: Option<PathBuf>,
  pub bundle_script: Option<PathBuf>,
}

impl Default for RenderSettings {
  fn default() -> Self {
    Self {
      node: PathBuf::from("node"),
      node_modules: PathBuf::from("node_modules"),
      base_dir: PathBuf::from("."),
      static_dirs: Vec::new(),
      bundle_dir: PathBuf::from("static"),
      static_url: default_static_url(),
      cache_dir: PathBuf::from(".react-render"),
      dev_tool: false,
      render_script: None,
      bundle_script: None,
    }
  }
}

fn default_static_url() -> String {
  "/static/".to_string()
}

impl RenderSettings {
  /// Resolve every relative directory against `root`.
  pub fn rooted_at(mut self, root: &Path) -> Self {
    let join = |p: &mut PathBuf| {
      if p.is_relative() {
        *p = crate::naming::absolute_path(&*p, root);
      }
    };
    join(&mut self.node_modules);
    join(&mut self.base_dir);
    join(&mut self.bundle_dir);
    join(&mut self.cache_dir);
    self.static_dirs.iter_mut().for_each(join);
    if let Some(p) = self.render_script.as_mut() {
      join(p);
    }
    if let Some(p) = self.bundle_script.as_mut() {
      join(p);
    }
    self
  }

  pub fn finder(&self) -> impl StaticFileFinder + '_ {
    DirectoryFinder::new(&self.static_dirs)
  }

  pub(crate) fn configs_dir(&self) -> PathBuf {
    self.cache_dir.join("configs")
  }

  pub(crate) fn scripts_dir(&self) -> PathBuf {
    self.cache_dir.join("scripts")
  }

  /// Public URL for an asset written under `bundle_dir`.
  pub(crate) fn url_for(&self, asset: &Path) -> Option<String> {
    let rel = asset.strip_prefix(&self.bundle_dir).ok()?;
    let rel: Vec<_> = rel.components().map(|c| c.as_os_str().to_string_lossy()).collect();
    let prefix = self.static_url.trim_end_matches('/');
    Some(format!("{prefix}/{}", rel.join("/")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let s = RenderSettings::default();
    assert_eq!(s.node, PathBuf::from("node"));
    assert_eq!(s.static_url, "/static/");
    assert!(!s.dev_tool);
    assert!(s.render_script.is_none());
  }

  #[test]
  fn partial_deserialize_keeps_defaults() {
    let s: RenderSettings =
      serde_json::from_str(r#"{ "dev_tool": true, "static_url": "/assets/" }"#).unwrap();
    assert!(s.dev_tool);
    assert_eq!(s.static_url, "/assets/");
    assert_eq!(s.cache_dir, PathBuf::from(".react-render"));
  }

  #[test]
  fn rooted_at_leaves_absolute_paths() {
    let s = RenderSettings {
      bundle_dir: PathBuf::from("/var/www/static"),
      static_dirs: vec![PathBuf::from("assets")],
      ..RenderSettings::default()
    }
    .rooted_at(Path::new("/srv/app"));
    assert_eq!(s.bundle_dir, PathBuf::from("/var/www/static"));
    assert_eq!(s.cache_dir, PathBuf::from("/srv/app/.react-render"));
    assert_eq!(s.base_dir, PathBuf::from("/srv/app"));
    assert_eq!(s.static_dirs, vec![PathBuf::from("/srv/app/assets")]);
    assert_eq!(s.node, PathBuf::from("node"));
  }

  #[test]
  fn url_for_asset_under_bundle_dir() {
    let s = RenderSettings { bundle_dir: PathBuf::from("/srv/static"), ..Default::default() };
    let url = s.url_for(Path::new("/srv/static/react-components/a__B-1f2e.js"));
    assert_eq!(url.as_deref(), Some("/static/react-components/a__B-1f2e.js"));
    assert_eq!(s.url_for(Path::new("/elsewhere/x.js")), None);
  }
}
