/* src/server/core/rust/src/scripts.rs */

// JS driver scripts shipped inside the crate and written to the cache on demand.

use std::path::PathBuf;

use sha2::{Digest, Sha256};

use crate::cache::write_atomic;
use crate::errors::Result;
use crate::settings::RenderSettings;

pub const RENDER_JS: &str = include_str!("../scripts/render.js");
pub const BUNDLE_JS: &str = include_str!("../scripts/bundle.js");

/// Write `contents` as `<cache_dir>/scripts/<name>-<hash>.js` unless already present.
fn materialize(settings: &RenderSettings, name: &str, contents: &str) -> Result<PathBuf> {
  let hash = Sha256::digest(contents.as_bytes());
  let path = settings.scripts_dir().join(format!("{name}-{}.js", hex::encode(&hash[..4])));
  if !path.is_file() {
    write_atomic(&path, contents.as_bytes())?;
  }
  Ok(path)
}

pub(crate) fn render_script(settings: &RenderSettings) -> Result<PathBuf> {
  match &settings.render_script {
    Some(path) => Ok(path.clone()),
    None => materialize(settings, "render", RENDER_JS),
  }
}

pub(crate) fn bundle_script(settings: &RenderSettings) -> Result<PathBuf> {
  match &settings.bundle_script {
    Some(path) => Ok(path.clone()),
    None => materialize(settings, "bundle", BUNDLE_JS),
  }
}
