/* src/server/core/rust/src/finder.rs */

use std::path::{Path, PathBuf};

/// Looks up a relative path among static asset locations.
pub trait StaticFileFinder {
  fn find(&self, relative: &Path) -> Option<PathBuf>;
}

/// Searches a list of directories in order, first hit wins.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryFinder<'a> {
  dirs: &'a [PathBuf],
}

impl<'a> DirectoryFinder<'a> {
  pub fn new(dirs: &'a [PathBuf]) -> Self {
    Self { dirs }
  }
}

impl StaticFileFinder for DirectoryFinder<'_> {
  fn find(&self, relative: &Path) -> Option<PathBuf> {
    if relative.is_absolute() {
      return None;
    }
    self.dirs.iter().map(|dir| dir.join(relative)).find(|candidate| candidate.is_file())
  }
}

impl<F> StaticFileFinder for F
where
  F: Fn(&Path) -> Option<PathBuf>,
{
  fn find(&self, relative: &Path) -> Option<PathBuf> {
    self(relative)
  }
}
