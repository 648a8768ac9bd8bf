/* src/server/core/rust/src/bundle.rs */

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cache::ConfigCache;
use crate::errors::{Error, Result};
use crate::process::{ScriptError, describe_failure, last_json_line, run_script};
use crate::scripts::bundle_script;
use crate::settings::RenderSettings;
use crate::source::ComponentSource;
use crate::watcher::ensure_watcher;
use crate::webpack::OUTPUT_SUBDIR;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BundleOptions {
  /// Run the source through the JSX translation loader.
  pub translate: bool,
  /// Keep a watcher rebuilding the bundle after the first build. Only one
  /// watcher per config runs at a time; later requests reuse it.
  pub watch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
  pub path: PathBuf,
  pub url: String,
}

/// Output of one bundler run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
  var: String,
  assets: Vec<Asset>,
}

impl Bundle {
  pub fn new(var: impl Into<String>, assets: Vec<Asset>) -> Self {
    Self { var: var.into(), assets }
  }

  /// Global JS variable the bundle exposes its component as.
  pub fn var(&self) -> &str {
    &self.var
  }

  pub fn assets(&self) -> &[Asset] {
    &self.assets
  }

  pub fn urls(&self) -> Vec<&str> {
    self.assets.iter().map(|a| a.url.as_str()).collect()
  }

  /// The asset the renderer executes server-side.
  pub fn entry(&self) -> Option<&Asset> {
    self.assets.first()
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BundlerOutput {
  Assets { assets: Vec<PathBuf> },
  Error { error: ScriptError },
}

/// Bundle a component source with webpack.
pub fn bundle_component(
  settings: &RenderSettings,
  path: &Path,
  options: BundleOptions,
) -> Result<Bundle> {
  let source = ComponentSource::resolve(settings, path)?;
  bundle_source(settings, &source, options)
}

pub(crate) fn bundle_source(
  settings: &RenderSettings,
  source: &ComponentSource,
  options: BundleOptions,
) -> Result<Bundle> {
  let config = ConfigCache::new(settings).config_filename(source.path(), options.translate)?;
  let script = bundle_script(settings)?;

  let args = [config.as_os_str(), settings.bundle_dir.as_os_str()];

  tracing::debug!(source = %source.path().display(), translate = options.translate, watch = options.watch, "bundling");
  let captured = run_script(settings, &script, args, "")?;

  let assets = match last_json_line::<BundlerOutput>(&captured.stdout) {
    Some(BundlerOutput::Error { error }) => {
      return Err(Error::rendering(source.path(), error.into_message()));
    }
    Some(BundlerOutput::Assets { assets }) if captured.status.success() && !assets.is_empty() => {
      assets
    }
    _ => return Err(Error::rendering(source.path(), describe_failure("bundler", &captured))),
  };

  let assets: Vec<Asset> = assets
    .into_iter()
    .map(|path| {
      let url = settings.url_for(&path).unwrap_or_else(|| fallback_url(settings, &path));
      Asset { path, url }
    })
    .collect();
  tracing::info!(var = source.var(), assets = assets.len(), "bundle ready");
  if options.watch {
    ensure_watcher(settings, &script, &config)?;
  }
  Ok(Bundle::new(source.var(), assets))
}

/// Assets written outside `bundle_dir` still get a URL under the output subdirectory.
fn fallback_url(settings: &RenderSettings, path: &Path) -> String {
  let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
  format!("{}/{OUTPUT_SUBDIR}/{name}", settings.static_url.trim_end_matches('/'))
}
