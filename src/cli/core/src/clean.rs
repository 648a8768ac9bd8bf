/* src/cli/core/src/clean.rs */

// `react-render clean` command: removes the config/script cache and,
// optionally, the bundler output.

use std::path::Path;

use anyhow::{Context, Result};
use react_render::RenderSettings;
use react_render::webpack::OUTPUT_SUBDIR;

use crate::ui;

pub fn run_clean(settings: &RenderSettings, bundles: bool) -> Result<()> {
  ui::arrow("cleaning project");

  if !settings.cache_dir.exists() {
    ui::warn(&format!("no cache at {}", settings.cache_dir.display()));
  }
  delete_dir_if_exists(&settings.cache_dir)?;
  if bundles {
    delete_dir_if_exists(&settings.bundle_dir.join(OUTPUT_SUBDIR))?;
  }

  ui::ok("clean complete");
  Ok(())
}

fn delete_dir_if_exists(path: &Path) -> Result<()> {
  if path.exists() {
    std::fs::remove_dir_all(path)
      .with_context(|| format!("failed to remove {}", path.display()))?;
    ui::detail(&format!("deleted {}", path.display()));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn settings(root: &Path) -> RenderSettings {
    RenderSettings { bundle_dir: "public".into(), ..RenderSettings::default() }.rooted_at(root)
  }

  #[test]
  fn delete_dir_if_exists_noop_on_missing() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(delete_dir_if_exists(&tmp.path().join("missing")).is_ok());
  }

  #[test]
  fn removes_cache_but_keeps_bundles_by_default() {
    let tmp = tempfile::tempdir().unwrap();
    let s = settings(tmp.path());
    std::fs::create_dir_all(s.cache_dir.join("configs")).unwrap();
    std::fs::write(s.cache_dir.join("configs/a.webpack.config.js"), "//").unwrap();
    let bundles = s.bundle_dir.join(OUTPUT_SUBDIR);
    std::fs::create_dir_all(&bundles).unwrap();

    run_clean(&s, false).unwrap();
    assert!(!s.cache_dir.exists());
    assert!(bundles.exists());
  }

  #[test]
  fn bundles_flag_removes_bundler_output_only() {
    let tmp = tempfile::tempdir().unwrap();
    let s = settings(tmp.path());
    let bundles = s.bundle_dir.join(OUTPUT_SUBDIR);
    std::fs::create_dir_all(&bundles).unwrap();
    std::fs::write(s.bundle_dir.join("app.css"), "").unwrap();

    run_clean(&s, true).unwrap();
    assert!(!bundles.exists());
    assert!(s.bundle_dir.join("app.css").exists());
  }
}
