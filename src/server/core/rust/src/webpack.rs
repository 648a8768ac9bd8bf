/* src/server/core/rust/src/webpack.rs */

// Webpack configuration generated per (source, translate, dev_tool).
// The rendered text must be a pure function of its inputs: the config
// cache compares and names files by it.

use std::path::{Path, PathBuf};

use crate::naming::{absolute_path, var_from_path};
use crate::settings::RenderSettings;

/// Placeholder substituted by the bundle driver with the real output root.
pub const BUNDLE_DIR_PLACEHOLDER: &str = "[bundle_dir]";
pub const OUTPUT_SUBDIR: &str = "react-components";

/// Browser global every bundle expects instead of a bundled React.
pub const REACT_GLOBAL: &str = "React";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct External {
  pub package: String,
  pub root: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
  pub test: String,
  pub exclude: String,
  pub loader: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebpackConfig {
  pub context_dir: PathBuf,
  pub entry_file: String,
  pub output_filename: String,
  pub library_name: String,
  pub externals: Vec<External>,
  pub loaders: Vec<Loader>,
  pub devtool: Option<String>,
  /// Module used inside the config to locate externals for server-side `require`.
  pub resolve_module: PathBuf,
  pub loader_root: Option<PathBuf>,
}

impl WebpackConfig {
  pub fn new(settings: &RenderSettings, source: &Path, translate: bool) -> Self {
    let source = absolute_path(source, &settings.base_dir);
    let context_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();
    let file_name = source.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let var = var_from_path(&source);
    let node_modules = absolute_path(&settings.node_modules, &settings.base_dir);

    let externals = ["react", "react/addons"]
      .into_iter()
      .map(|package| External { package: package.to_string(), root: REACT_GLOBAL.to_string() })
      .collect();

    let (loaders, loader_root) = if translate {
      let ext = source.extension().map_or_else(|| "jsx".into(), |e| e.to_string_lossy());
      let loader = Loader {
        test: format!(r"\.{}$", regex::escape(&ext)),
        exclude: "node_modules".to_string(),
        loader: "babel-loader".to_string(),
      };
      (vec![loader], Some(node_modules.clone()))
    } else {
      (Vec::new(), None)
    };

    Self {
      context_dir,
      entry_file: format!("./{file_name}"),
      output_filename: format!("{var}-[hash].js"),
      library_name: var,
      externals,
      loaders,
      devtool: settings.dev_tool.then(|| "eval".to_string()),
      resolve_module: node_modules.join("resolve"),
      loader_root,
    }
  }

  /// Render as a CommonJS module consumable by `webpack --config`.
  pub fn render(&self) -> String {
    let context = js_str(&self.context_dir.to_string_lossy());
    let mut props = vec![
      format!("    context: {context}"),
      format!("    entry: {}", js_str(&self.entry_file)),
      format!(
        "    output: {{\n        path: {},\n        filename: {},\n        libraryTarget: 'umd',\n        library: {}\n    }}",
        js_str(&format!("{BUNDLE_DIR_PLACEHOLDER}/{OUTPUT_SUBDIR}")),
        js_str(&self.output_filename),
        js_str(&self.library_name),
      ),
    ];

    let externals: Vec<String> = self
      .externals
      .iter()
      .map(|e| {
        format!(
          "      {}: {{\n        commonjs2: resolve.sync({}, {{basedir: {context}}}),\n        root: {}\n      }}",
          js_key(&e.package),
          js_str(&e.package),
          js_str(&e.root),
        )
      })
      .collect();
    props.push(format!("    externals: [{{\n{}\n    }}]", externals.join(",\n")));

    if let Some(devtool) = &self.devtool {
      props.push(format!("    devtool: {}", js_str(devtool)));
    }

    if !self.loaders.is_empty() {
      let loaders: Vec<String> = self
        .loaders
        .iter()
        .map(|l| {
          format!(
            "{{\n            test: /{}/,\n            exclude: /{}/,\n            loader: {}\n        }}",
            l.test,
            l.exclude,
            js_str(&l.loader),
          )
        })
        .collect();
      props.push(format!("    module: {{\n        loaders: [{}]\n    }}", loaders.join(", ")));
    }

    if let Some(root) = &self.loader_root {
      props.push(format!(
        "    resolveLoader: {{\n        root: {}\n    }}",
        js_str(&root.to_string_lossy())
      ));
    }

    format!(
      "\nvar resolve = require({});\n\nmodule.exports = {{\n{}\n}};\n",
      js_str(&self.resolve_module.to_string_lossy()),
      props.join(",\n"),
    )
  }
}

/// Generate the config text for a component source.
pub fn generate_config(settings: &RenderSettings, source: &Path, translate: bool) -> String {
  WebpackConfig::new(settings, source, translate).render()
}

/// Single-quoted JS string literal.
fn js_str(s: &str) -> String {
  let mut out = String::with_capacity(s.len() + 2);
  out.push('\'');
  for ch in s.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      _ => out.push(ch),
    }
  }
  out.push('\'');
  out
}

/// Object key: bare when it is a plain identifier, quoted otherwise.
fn js_key(s: &str) -> String {
  let is_ident = s.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
    && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
  if is_ident { s.to_string() } else { js_str(s) }
}
