/* src/server/core/rust/src/errors.rs */

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
  /// The component source could not be resolved to an existing file.
  #[error("cannot find component source file `{}`", path.display())]
  SourceFileNotFound { path: PathBuf },

  /// The bundler or the headless runtime reported a failure.
  #[error("failed to render `{}`\n{message}", path.display())]
  Rendering { path: PathBuf, message: String },

  /// A prop value has no JSON representation.
  #[error("cannot serialize prop value of type `{type_name}`: {}", args.join(", "))]
  PropSerialization { type_name: String, args: Vec<String> },

  #[error("component was not bundled; render it with `bundle`, `translate` or `watch_source`")]
  ComponentWasNotBundled,

  #[error("i/o error on `{}`: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to start `{program}`: {source}")]
  Spawn {
    program: String,
    #[source]
    source: std::io::Error,
  },
}

impl Error {
  pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io { path: path.into(), source }
  }

  pub(crate) fn rendering(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
    Self::Rendering { path: path.into(), message: message.into() }
  }

  /// Stable machine-readable identifier, used in CLI output and logs.
  pub fn code(&self) -> &'static str {
    match self {
      Self::SourceFileNotFound { .. } => "SOURCE_NOT_FOUND",
      Self::Rendering { .. } => "RENDERING_ERROR",
      Self::PropSerialization { .. } => "PROP_SERIALIZATION_ERROR",
      Self::ComponentWasNotBundled => "NOT_BUNDLED",
      Self::Io { .. } => "IO_ERROR",
      Self::Spawn { .. } => "SPAWN_ERROR",
    }
  }
}
