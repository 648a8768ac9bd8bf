/* src/server/core/rust/tests/pipeline.rs */

// End-to-end pipeline runs against a fake runtime: `node` is `sh` and the
// driver scripts are small shell scripts that follow the JSON line protocol.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use react_render::{
  BundleOptions, Error, PropValue, Props, RenderOptions, RenderSettings, bundle_component,
  get_config_filename, render_component, stop_watcher,
};
use tempfile::TempDir;

const ECHO_RENDERER: &str = r#"cat > "$(dirname "$0")/stdin.txt"
printf '%s' "$1" > "$(dirname "$0")/module.txt"
printf 'some log noise\n{"markup":"<span>%s</span>"}\n' "$2"
"#;

const FAKE_BUNDLER: &str = r#"if [ "$3" = "--watch-daemon" ]; then
  printf '%s\n' "$$" >> "$(dirname "$0")/watchers.txt"
  exec sleep 10
fi
printf '%s\n' "$@" > "$(dirname "$0")/bundle-args.txt"
out="$2/react-components"
mkdir -p "$out"
printf 'var x;' > "$out/bundle-abc123.js"
printf '{"assets":["%s"]}\n' "$out/bundle-abc123.js"
"#;

struct Project {
  dir: TempDir,
  settings: RenderSettings,
}

impl Project {
  fn new(renderer: &str) -> Self {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("drivers")).unwrap();
    std::fs::create_dir_all(root.join("components")).unwrap();
    std::fs::write(root.join("drivers/render.sh"), renderer).unwrap();
    std::fs::write(root.join("drivers/bundle.sh"), FAKE_BUNDLER).unwrap();
    std::fs::write(root.join("components/HelloWorld.jsx"), "module.exports = null;\n").unwrap();

    let settings = RenderSettings {
      node: PathBuf::from("sh"),
      render_script: Some(PathBuf::from("drivers/render.sh")),
      bundle_script: Some(PathBuf::from("drivers/bundle.sh")),
      ..RenderSettings::default()
    }
    .rooted_at(root);
    Self { dir, settings }
  }

  fn root(&self) -> &Path {
    self.dir.path()
  }

  fn driver_output(&self, name: &str) -> Option<String> {
    std::fs::read_to_string(self.root().join("drivers").join(name)).ok()
  }

  /// Pids recorded by background watchers, once the first one has reported in.
  fn watcher_pids(&self) -> Vec<String> {
    for _ in 0..40 {
      if self.driver_output("watchers.txt").is_some() {
        break;
      }
      std::thread::sleep(Duration::from_millis(50));
    }
    std::thread::sleep(Duration::from_millis(200));
    let pids = self.driver_output("watchers.txt").unwrap_or_default();
    pids.lines().map(str::to_string).collect()
  }
}

#[test]
fn renders_markup_from_the_runtime() {
  let p = Project::new(ECHO_RENDERER);
  let c = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new(),
    &RenderOptions::default(),
  )
  .unwrap();

  assert_eq!(c.markup(), "<span>toString</span>");
  assert_eq!(c.to_string(), c.markup());
  assert!(!c.is_bundled());
  assert!(matches!(c.bundle(), Err(Error::ComponentWasNotBundled)));
  assert_eq!(p.driver_output("module.txt").unwrap(), p.root().join("components/HelloWorld.jsx").to_string_lossy());
}

#[test]
fn static_markup_mode_is_forwarded() {
  let p = Project::new(ECHO_RENDERER);
  let c = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new(),
    &RenderOptions::static_markup(),
  )
  .unwrap();
  assert_eq!(c.markup(), "<span>toStaticMarkup</span>");
}

#[test]
fn props_reach_the_runtime_serialized_once() {
  let p = Project::new(ECHO_RENDERER);
  let props = Props::new()
    .with("name", "world!")
    .with("date", NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
  let c = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    props,
    &RenderOptions::default(),
  )
  .unwrap();

  assert_eq!(c.serialized_props(), r#"{"name": "world!", "date": "2015-01-01"}"#);
  assert_eq!(p.driver_output("stdin.txt").unwrap(), c.serialized_props());
  assert_eq!(c.props().len(), 2);
}

#[test]
fn runtime_error_line_becomes_rendering_error() {
  let renderer = r#"cat > /dev/null
printf '{"error":{"message":"boom","stack":"Error: boom\\n    at ErrorThrowingComponent"}}\n'
exit 1
"#;
  let p = Project::new(renderer);
  for options in [RenderOptions::default(), RenderOptions::static_markup()] {
    let err = render_component(
      &p.settings,
      Path::new("components/HelloWorld.jsx"),
      Props::new(),
      &options,
    )
    .unwrap_err();
    match err {
      Error::Rendering { path, message } => {
        assert_eq!(path, p.root().join("components/HelloWorld.jsx"));
        assert!(message.contains("at ErrorThrowingComponent"));
      }
      other => panic!("unexpected {other:?}"),
    }
  }
}

#[test]
fn silent_crash_reports_exit_status_and_stderr() {
  let p = Project::new("cat > /dev/null\necho 'SyntaxError: Unexpected token <' >&2\nexit 7\n");
  let err = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new(),
    &RenderOptions::default(),
  )
  .unwrap_err();
  let message = err.to_string();
  assert!(message.contains("renderer exited with status"));
  assert!(message.contains("SyntaxError: Unexpected token <"));
}

#[test]
fn missing_source_is_not_found() {
  let p = Project::new(ECHO_RENDERER);
  let err = render_component(
    &p.settings,
    Path::new("path/to/nothing.jsx"),
    Props::new(),
    &RenderOptions::default(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::SourceFileNotFound { ref path } if path == Path::new("path/to/nothing.jsx")));
  assert!(p.driver_output("module.txt").is_none());
}

#[test]
fn unserializable_props_stop_before_the_runtime() {
  struct Handle;
  let p = Project::new(ECHO_RENDERER);
  let props = Props::new().with("handle", PropValue::opaque::<Handle>("<Handle>"));
  let err = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    props,
    &RenderOptions::default(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::PropSerialization { .. }));
  assert!(p.driver_output("stdin.txt").is_none());
}

#[test]
fn bundled_render_executes_the_bundle() {
  let p = Project::new(ECHO_RENDERER);
  let c = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new().with("name", "world!"),
    &RenderOptions::default().bundled(),
  )
  .unwrap();

  let bundle = c.bundle().unwrap();
  assert_eq!(bundle.var(), "components__HelloWorld");
  assert_eq!(bundle.urls(), vec!["/static/react-components/bundle-abc123.js"]);
  assert_eq!(p.driver_output("module.txt").unwrap(), bundle.assets()[0].path.to_string_lossy());
  assert_eq!(
    c.to_string(),
    "<span id=\"reactComponent-components__HelloWorld\"><span>toString</span></span>"
  );

  let js = c.render_js().unwrap();
  assert!(js.starts_with("\n<script src=\"/static/react-components/bundle-abc123.js\"></script>\n"));
  assert!(js.contains("var props = {\"name\": \"world!\"};"));
}

#[test]
fn translate_and_watch_imply_a_bundle() {
  let p = Project::new(ECHO_RENDERER);
  for options in [RenderOptions::default().translated(), RenderOptions::default().watched()] {
    let c = render_component(
      &p.settings,
      Path::new("components/HelloWorld.jsx"),
      Props::new(),
      &options,
    )
    .unwrap();
    assert!(c.is_bundled());
  }
  let args = p.driver_output("bundle-args.txt").unwrap();
  assert_eq!(args.lines().count(), 2);
  assert_eq!(p.watcher_pids().len(), 1);

  let config = get_config_filename(&p.settings, Path::new("components/HelloWorld.jsx"), false).unwrap();
  assert!(stop_watcher(&config));
}

#[test]
fn repeated_watch_bundles_share_one_watcher() {
  let p = Project::new(ECHO_RENDERER);
  let source = Path::new("components/HelloWorld.jsx");
  let options = BundleOptions { translate: false, watch: true };
  for _ in 0..3 {
    bundle_component(&p.settings, source, options).unwrap();
  }
  assert_eq!(p.watcher_pids().len(), 1);

  let config = get_config_filename(&p.settings, source, false).unwrap();
  assert!(stop_watcher(&config));
  assert!(!stop_watcher(&config));
}

#[test]
fn bundler_receives_the_cached_config() {
  let p = Project::new(ECHO_RENDERER);
  let source = Path::new("components/HelloWorld.jsx");
  let options = BundleOptions { translate: true, watch: false };
  let bundle = bundle_component(&p.settings, source, options).unwrap();
  assert_eq!(bundle.assets().len(), 1);

  let config = get_config_filename(&p.settings, source, true).unwrap();
  let args = p.driver_output("bundle-args.txt").unwrap();
  let args: Vec<&str> = args.lines().collect();
  let config = config.to_string_lossy();
  let bundle_dir = p.settings.bundle_dir.to_string_lossy();
  assert_eq!(args, vec![&*config, &*bundle_dir]);

  let text = std::fs::read_to_string(&*config).unwrap();
  assert!(text.contains("loader: 'babel-loader'"));
  assert!(text.contains("library: 'components__HelloWorld'"));
}

#[test]
fn bundler_failure_is_a_rendering_error() {
  let p = Project::new(ECHO_RENDERER);
  std::fs::write(
    p.root().join("drivers/bundle.sh"),
    "printf '{\"error\":{\"message\":\"Module parse failed\"}}\\n'\nexit 2\n",
  )
  .unwrap();
  let err = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new(),
    &RenderOptions::default().translated(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::Rendering { ref message, .. } if message == "Module parse failed"));
  assert!(p.driver_output("module.txt").is_none());
}

#[test]
fn missing_runtime_is_a_spawn_error() {
  let mut p = Project::new(ECHO_RENDERER);
  p.settings.node = p.root().join("no-such-node");
  let err = render_component(
    &p.settings,
    Path::new("components/HelloWorld.jsx"),
    Props::new(),
    &RenderOptions::default(),
  )
  .unwrap_err();
  assert!(matches!(err, Error::Spawn { .. }));
}
