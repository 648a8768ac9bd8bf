/* src/cli/core/src/bundle.rs */

// `react-render bundle` and `react-render config` commands.

use std::path::Path;

use anyhow::{Context, Result};
use react_render::{Bundle, BundleOptions, RenderSettings, bundle_component, get_config_filename};

use crate::ui;

pub fn run_bundle(settings: &RenderSettings, path: &Path, options: BundleOptions) -> Result<()> {
  ui::arrow(&format!("bundling {}", path.display()));
  let bundle = bundle_component(settings, path, options)
    .with_context(|| format!("failed to bundle {}", path.display()))?;

  ui::ok(&format!("{} ({} asset{})", bundle.var(), bundle.assets().len(), plural(&bundle)));
  if options.watch {
    ui::detail("watcher running in the background");
  }
  ui::emit(&asset_lines(&bundle));
  Ok(())
}

/// One `<path>\t<url>` line per asset.
fn asset_lines(bundle: &Bundle) -> String {
  bundle
    .assets()
    .iter()
    .map(|a| format!("{}\t{}", a.path.display(), a.url))
    .collect::<Vec<_>>()
    .join("\n")
}

fn plural(bundle: &Bundle) -> &'static str {
  if bundle.assets().len() == 1 { "" } else { "s" }
}

/// Write (or reuse) the cached webpack config and print its path, or its text with `print`.
pub fn run_config(settings: &RenderSettings, path: &Path, translate: bool, print: bool) -> Result<()> {
  let source = react_render::ComponentSource::resolve(settings, path)
    .with_context(|| format!("failed to resolve {}", path.display()))?;
  let config = get_config_filename(settings, source.path(), translate)
    .context("failed to write webpack config")?;

  if print {
    let text = std::fs::read_to_string(&config)
      .with_context(|| format!("failed to read {}", config.display()))?;
    ui::emit(text.trim_end());
  } else {
    ui::emit(&config.display().to_string());
  }
  Ok(())
}
