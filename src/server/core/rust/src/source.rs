/* src/server/core/rust/src/source.rs */

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::finder::StaticFileFinder;
use crate::naming::{absolute_path, var_from_path};
use crate::settings::RenderSettings;

/// A component source file that was found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSource {
  path: PathBuf,
  var: String,
}

impl ComponentSource {
  /// Resolve `path` using the settings' base directory and static dirs.
  pub fn resolve(settings: &RenderSettings, path: &Path) -> Result<Self> {
    Self::resolve_with(path, &settings.base_dir, &settings.finder())
  }

  /// Absolute paths must exist as given. Relative paths are tried against
  /// `base_dir` first, then handed to `finder`.
  pub fn resolve_with(
    path: &Path,
    base_dir: &Path,
    finder: &dyn StaticFileFinder,
  ) -> Result<Self> {
    let direct = absolute_path(path, base_dir);
    let found = if direct.is_file() {
      Some(direct)
    } else if path.is_relative() {
      finder.find(path).map(|p| absolute_path(p, base_dir))
    } else {
      None
    };
    match found {
      Some(path) => Ok(Self::from_existing(path)),
      None => Err(Error::SourceFileNotFound { path: path.to_path_buf() }),
    }
  }

  fn from_existing(path: PathBuf) -> Self {
    let var = var_from_path(&path);
    Self { path, var }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// JS identifier the bundled component is exposed as.
  pub fn var(&self) -> &str {
    &self.var
  }

  /// Whether the source uses JSX syntax and needs a translation step.
  pub fn is_translated(&self) -> bool {
    self.path.extension().is_some_and(|ext| ext == "jsx")
  }
}
