/* src/server/core/rust/src/render.rs */

// Server-side render pipeline:
//   NotStarted -> SourceResolved -> (Bundled)? -> PropsSerialized -> Executed -> Done
// Any step may end in Failed; the error is returned as-is.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::bundle::{BundleOptions, bundle_source};
use crate::component::RenderedComponent;
use crate::errors::{Error, Result};
use crate::process::{ScriptError, describe_failure, last_json_line, run_script};
use crate::props::{Props, serialize_props};
use crate::scripts::render_script;
use crate::settings::RenderSettings;
use crate::source::ComponentSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
  /// Markup carrying React's reconciliation attributes.
  #[default]
  String,
  /// Plain HTML without React data attributes.
  StaticMarkup,
}

impl RenderMode {
  /// Flag understood by the renderer driver.
  pub fn as_arg(self) -> &'static str {
    match self {
      Self::String => "toString",
      Self::StaticMarkup => "toStaticMarkup",
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
  pub mode: RenderMode,
  pub bundle: bool,
  pub translate: bool,
  pub watch_source: bool,
  /// Overrides the `reactComponent-<var>` mount container id.
  pub container_id: Option<String>,
}

impl RenderOptions {
  pub fn static_markup() -> Self {
    Self { mode: RenderMode::StaticMarkup, ..Self::default() }
  }

  pub fn bundled(mut self) -> Self {
    self.bundle = true;
    self
  }

  pub fn translated(mut self) -> Self {
    self.translate = true;
    self
  }

  pub fn watched(mut self) -> Self {
    self.watch_source = true;
    self
  }

  fn needs_bundle(&self) -> bool {
    self.bundle || self.translate || self.watch_source
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
  SourceResolved,
  Bundled,
  PropsSerialized,
  Executed,
  Done,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::SourceResolved => "source_resolved",
      Self::Bundled => "bundled",
      Self::PropsSerialized => "props_serialized",
      Self::Executed => "executed",
      Self::Done => "done",
    })
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RendererOutput {
  Markup { markup: String },
  Error { error: ScriptError },
}

/// Render a component to HTML, bundling it first when the options ask for it.
pub fn render_component(
  settings: &RenderSettings,
  path: &Path,
  props: Props,
  options: &RenderOptions,
) -> Result<RenderedComponent> {
  let span = tracing::debug_span!("render", path = %path.display(), mode = options.mode.as_arg());
  let _enter = span.enter();

  let result = run_pipeline(settings, path, props, options);
  if let Err(e) = &result {
    tracing::debug!(code = e.code(), "render failed");
  }
  result
}

fn run_pipeline(
  settings: &RenderSettings,
  path: &Path,
  props: Props,
  options: &RenderOptions,
) -> Result<RenderedComponent> {
  let source = ComponentSource::resolve(settings, path)?;
  advance(Stage::SourceResolved);

  let bundle = if options.needs_bundle() {
    let bundle_options =
      BundleOptions { translate: options.translate, watch: options.watch_source };
    let bundle = bundle_source(settings, &source, bundle_options)?;
    advance(Stage::Bundled);
    Some(bundle)
  } else {
    None
  };

  let serialized = serialize_props(&props)?;
  advance(Stage::PropsSerialized);

  let module = match &bundle {
    Some(b) => match b.entry() {
      Some(asset) => asset.path.clone(),
      None => return Err(Error::rendering(source.path(), "bundle produced no assets")),
    },
    None => source.path().to_path_buf(),
  };
  let markup = execute(settings, source.path(), &module, &serialized, options.mode)?;
  advance(Stage::Executed);

  let rendered =
    RenderedComponent::new(markup, props, serialized, bundle, options.container_id.clone());
  advance(Stage::Done);
  Ok(rendered)
}

fn advance(stage: Stage) {
  tracing::debug!(%stage, "render stage");
}

/// Run the renderer driver on `module` and return its markup.
fn execute(
  settings: &RenderSettings,
  source: &Path,
  module: &Path,
  serialized_props: &str,
  mode: RenderMode,
) -> Result<String> {
  let script = render_script(settings)?;
  let args = [module.as_os_str(), OsStr::new(mode.as_arg())];
  let captured = run_script(settings, &script, args, serialized_props)?;

  match last_json_line::<RendererOutput>(&captured.stdout) {
    Some(RendererOutput::Markup { markup }) if captured.status.success() => Ok(markup),
    Some(RendererOutput::Error { error }) => Err(Error::rendering(source, error.into_message())),
    _ => Err(Error::rendering(source, describe_failure("renderer", &captured))),
  }
}
