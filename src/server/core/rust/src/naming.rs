/* src/server/core/rust/src/naming.rs */

// Deterministic names derived from component source paths.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

fn non_alnum_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"))
}

/// Split on `/` and on the platform separator, dropping empty segments.
/// `/` paths therefore name the same on every platform; a backslash only
/// separates where it is the native separator.
fn segments(path: &str) -> Vec<&str> {
  path.split(|c| c == '/' || c == std::path::MAIN_SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// File stem where a leading dot belongs to the name: `woz.jsx` -> `woz`, `.a` -> `.a`.
fn file_stem(name: &str) -> &str {
  match name.rfind('.') {
    Some(i) if !name[..i].chars().all(|c| c == '.') => &name[..i],
    _ => name,
  }
}

fn collapse(segment: &str) -> String {
  non_alnum_re().replace_all(segment, "_").into_owned()
}

/// Derive a JS identifier from the last directory name and the file stem.
///
/// `/foo/bar/woz.jsx` -> `bar__woz`, `/foo-bar/woz.jsx` -> `foo_bar__woz`.
pub fn var_from_path(path: impl AsRef<Path>) -> String {
  let raw = path.as_ref().to_string_lossy();
  let parts = segments(&raw);
  let mut var = match parts.as_slice() {
    [] => String::new(),
    [file] => collapse(file_stem(file)),
    [.., dir, file] => format!("{}__{}", collapse(dir), collapse(file_stem(file))),
  };
  if var.is_empty() || var.starts_with(|c: char| c.is_ascii_digit()) {
    var.insert(0, '_');
  }
  var
}

/// Join a relative path onto `base` and lexically remove `.` and `..` components.
///
/// A relative `base` is itself anchored at the current directory, so the
/// result is absolute whenever the working directory can be read.
pub fn absolute_path(path: impl AsRef<Path>, base: impl AsRef<Path>) -> PathBuf {
  let path = path.as_ref();
  let joined = if path.is_absolute() { path.to_path_buf() } else { anchor(base.as_ref()).join(path) };
  path_clean::clean(joined)
}

fn anchor(base: &Path) -> PathBuf {
  if base.is_absolute() {
    return base.to_path_buf();
  }
  match std::env::current_dir() {
    Ok(cwd) => cwd.join(base),
    Err(e) => {
      tracing::warn!(base = %base.display(), error = %e, "cannot read current dir, keeping relative base");
      base.to_path_buf()
    }
  }
}
