/* src/cli/core/src/logger.rs */

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used by `--verbose`, `--quiet` and the default, in that order of
/// precedence. `RUST_LOG` replaces the default when set.
fn filter(verbose: bool, quiet: bool) -> EnvFilter {
  if verbose {
    EnvFilter::new("react_render=debug,react_render_cli=debug")
  } else if quiet {
    EnvFilter::new("react_render=error,react_render_cli=error")
  } else {
    EnvFilter::try_from_default_env()
      .unwrap_or_else(|_| EnvFilter::new("react_render=info,react_render_cli=info"))
  }
}

/// Install the global subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool) {
  let no_color = std::env::var_os("NO_COLOR").is_some();
  let fmt_layer = fmt::layer()
    .with_target(false)
    .with_level(true)
    .with_ansi(!no_color)
    .with_writer(std::io::stderr)
    .compact();

  tracing_subscriber::registry().with(filter(verbose, quiet)).with(fmt_layer).init();
}
