/* src/cli/core/src/render.rs */

// `react-render render` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use react_render::{Props, RenderMode, RenderOptions, RenderSettings, RenderedComponent, render_component};

use crate::ui;

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
  /// Component source file (absolute, or relative to the base/static dirs)
  pub path: PathBuf,
  /// Props as a JSON object
  #[arg(long, conflicts_with = "props_file")]
  pub props: Option<String>,
  /// Read props from a JSON file
  #[arg(long)]
  pub props_file: Option<PathBuf>,
  /// Render plain HTML without React data attributes
  #[arg(long = "static")]
  pub static_markup: bool,
  /// Bundle the component before rendering
  #[arg(long)]
  pub bundle: bool,
  /// Translate JSX while bundling
  #[arg(long)]
  pub translate: bool,
  /// Keep a watcher rebuilding the bundle
  #[arg(long)]
  pub watch_source: bool,
  /// Also print the script tags that mount the component in a browser
  #[arg(long)]
  pub js: bool,
  /// Mount container id (defaults to `reactComponent-<var>`)
  #[arg(long)]
  pub container_id: Option<String>,
}

impl RenderArgs {
  pub fn options(&self) -> RenderOptions {
    RenderOptions {
      mode: if self.static_markup { RenderMode::StaticMarkup } else { RenderMode::String },
      // Mount code needs a bundle to point at.
      bundle: self.bundle || self.js,
      translate: self.translate,
      watch_source: self.watch_source,
      container_id: self.container_id.clone(),
    }
  }

  pub fn load_props(&self) -> Result<Props> {
    let text = match (&self.props, &self.props_file) {
      (Some(json), _) => json.clone(),
      (None, Some(file)) => std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?,
      (None, None) => return Ok(Props::new()),
    };
    let value: serde_json::Value = serde_json::from_str(&text).context("failed to parse props")?;
    Props::from_json(value).context("props must be a JSON object")
  }
}

/// Render once and return what the command prints.
pub fn render_output(settings: &RenderSettings, args: &RenderArgs) -> Result<String> {
  let props = args.load_props()?;
  let rendered = render_component(settings, &args.path, props, &args.options())
    .with_context(|| format!("failed to render {}", args.path.display()))?;
  format_output(&rendered, args.js)
}

fn format_output(rendered: &RenderedComponent, js: bool) -> Result<String> {
  let mut out = rendered.to_string();
  if js {
    out.push_str(&rendered.render_js()?);
  }
  Ok(out)
}

pub fn run_render(settings: &RenderSettings, args: &RenderArgs) -> Result<()> {
  let output = render_output(settings, args)?;
  ui::emit(&output);
  Ok(())
}
