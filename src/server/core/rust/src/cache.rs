/* src/server/core/rust/src/cache.rs */

// On-disk cache of generated webpack configs.

use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::errors::{Error, Result};
use crate::naming::{absolute_path, var_from_path};
use crate::settings::RenderSettings;
use crate::webpack::generate_config;

/// First 16 hex chars of SHA-256 over the inputs that shape a config.
pub fn config_key(source: &Path, translate: bool, dev_tool: bool) -> String {
  let mut hasher = Sha256::new();
  hasher.update(source.to_string_lossy().as_bytes());
  hasher.update([0, u8::from(translate), u8::from(dev_tool)]);
  hex::encode(&hasher.finalize()[..8])
}

/// Maps (source, translate, dev_tool) to a config file under `<cache_dir>/configs`.
#[derive(Debug, Clone, Copy)]
pub struct ConfigCache<'a> {
  settings: &'a RenderSettings,
}

impl<'a> ConfigCache<'a> {
  pub fn new(settings: &'a RenderSettings) -> Self {
    Self { settings }
  }

  /// Deterministic path of the config for `source`; does not touch the filesystem.
  pub fn path_for(&self, source: &Path, translate: bool) -> PathBuf {
    let source = absolute_path(source, &self.settings.base_dir);
    let key = config_key(&source, translate, self.settings.dev_tool);
    let var = var_from_path(&source);
    self.settings.configs_dir().join(format!("{var}-{key}.webpack.config.js"))
  }

  /// Path of an up-to-date config for `source`, writing it on a miss.
  pub fn config_filename(&self, source: &Path, translate: bool) -> Result<PathBuf> {
    let path = self.path_for(source, translate);
    let config = generate_config(self.settings, source, translate);

    match std::fs::read_to_string(&path) {
      Ok(existing) if existing == config => {
        tracing::debug!(config = %path.display(), "config cache hit");
        return Ok(path);
      }
      Ok(_) => tracing::warn!(config = %path.display(), "cached config is stale, rewriting"),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        tracing::debug!(config = %path.display(), "config cache miss");
      }
      Err(e) => return Err(Error::io(&path, e)),
    }

    write_atomic(&path, config.as_bytes())?;
    Ok(path)
  }
}

/// Write through a sibling temp file and rename, so readers never see a partial file.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
  let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
  tmp.write_all(contents).map_err(|e| Error::io(tmp.path(), e))?;
  tmp.persist(path).map_err(|e| Error::io(path, e.error))?;
  Ok(())
}

/// Convenience wrapper over [`ConfigCache::config_filename`].
pub fn get_config_filename(
  settings: &RenderSettings,
  source: &Path,
  translate: bool,
) -> Result<PathBuf> {
  ConfigCache::new(settings).config_filename(source, translate)
}
