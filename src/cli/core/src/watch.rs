/* src/cli/core/src/watch.rs */

// `react-render watch`: re-render a component whenever its directory changes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use react_render::webpack::OUTPUT_SUBDIR;
use react_render::{ComponentSource, RenderSettings};
use tokio::signal;
use tokio::sync::mpsc::Receiver;

use crate::render::{RenderArgs, render_output};
use crate::ui::{self, CYAN, GREEN, RED, RESET};

const DEBOUNCE: Duration = Duration::from_millis(150);

fn setup_watcher(ignored: Vec<PathBuf>) -> Result<(RecommendedWatcher, Receiver<PathBuf>)> {
  let (tx, rx) = tokio::sync::mpsc::channel(64);
  let watcher = RecommendedWatcher::new(
    move |res: std::result::Result<notify::Event, notify::Error>| {
      let Ok(event) = res else { return };
      if matches!(event.kind, EventKind::Access(_)) {
        return;
      }
      for path in event.paths {
        if !is_ignored(&path, &ignored) {
          let _ = tx.blocking_send(path);
        }
      }
    },
    notify::Config::default(),
  )?;
  Ok((watcher, rx))
}

/// Output written by the pipeline itself must not trigger another render.
fn is_ignored(path: &Path, ignored: &[PathBuf]) -> bool {
  ignored.iter().any(|dir| path.starts_with(dir))
}

async fn handle_change(settings: &RenderSettings, args: &RenderArgs, changed: &Path) {
  let started = Instant::now();
  eprintln!("  {CYAN}[react-render]{RESET} {} changed, re-rendering...", changed.display());

  let s = settings.clone();
  let a = args.clone();
  let result = tokio::task::spawn_blocking(move || render_output(&s, &a)).await;

  match result {
    Ok(Ok(output)) => {
      ui::emit(&output);
      eprintln!("  {GREEN}[react-render]{RESET} rendered ({:.1}s)", started.elapsed().as_secs_f64());
    }
    Ok(Err(e)) => eprintln!("  {RED}[react-render]{RESET} render failed: {e:#}"),
    Err(e) => eprintln!("  {RED}[react-render]{RESET} render task panicked: {e}"),
  }
}

/// Drain events arriving within the debounce window so a burst renders once.
async fn settle(rx: &mut Receiver<PathBuf>) {
  while let Ok(Some(_)) = tokio::time::timeout(DEBOUNCE, rx.recv()).await {}
}

pub async fn run_watch(settings: &RenderSettings, args: &RenderArgs) -> Result<()> {
  let source = ComponentSource::resolve(settings, &args.path)
    .with_context(|| format!("failed to resolve {}", args.path.display()))?;
  let dir = source.path().parent().map(Path::to_path_buf).context("component has no parent directory")?;

  match render_output(settings, args) {
    Ok(output) => ui::emit(&output),
    Err(e) => ui::fail(&format!("{e:#}")),
  }

  let ignored = vec![settings.cache_dir.clone(), settings.bundle_dir.join(OUTPUT_SUBDIR)];
  let (mut watcher, mut rx) = setup_watcher(ignored)?;
  watcher
    .watch(&dir, RecursiveMode::Recursive)
    .with_context(|| format!("failed to watch {}", dir.display()))?;
  ui::arrow(&format!("watching {} (Ctrl-C to stop)", dir.display()));

  loop {
    tokio::select! {
      changed = rx.recv() => {
        let Some(changed) = changed else { break };
        settle(&mut rx).await;
        handle_change(settings, args, &changed).await;
      }
      _ = signal::ctrl_c() => break,
    }
  }

  let stopped = react_render::stop_watchers();
  if stopped > 0 {
    ui::detail(&format!("stopped {stopped} bundle watcher(s)"));
  }
  ui::ok("stopped watching");
  Ok(())
}
