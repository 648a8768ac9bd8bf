/* src/cli/core/src/main.rs */

mod bundle;
mod clean;
mod config;
mod logger;
mod render;
mod ui;
mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use react_render::{BundleOptions, RenderSettings};

use config::{ReactRenderConfig, resolve_config};
use render::RenderArgs;

#[derive(Parser)]
#[command(name = "react-render", version, about = "Render and bundle React components")]
struct Cli {
  /// Path to react-render.toml (auto-detected if omitted)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,
  /// Debug-level logging
  #[arg(short, long, global = true)]
  verbose: bool,
  /// Errors only
  #[arg(short, long, global = true, conflicts_with = "verbose")]
  quiet: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Render a component to HTML
  Render(RenderArgs),
  /// Bundle a component with webpack
  Bundle {
    /// Component source file
    path: PathBuf,
    /// Translate JSX while bundling
    #[arg(long)]
    translate: bool,
    /// Keep a watcher rebuilding the bundle in the background
    #[arg(long)]
    watch: bool,
  },
  /// Write the cached webpack config for a component and print its path
  Config {
    /// Component source file
    path: PathBuf,
    /// Include the JSX translation loader
    #[arg(long)]
    translate: bool,
    /// Print the config text instead of its path
    #[arg(long)]
    print: bool,
  },
  /// Re-render a component whenever its directory changes
  Watch(RenderArgs),
  /// Remove the config and script cache
  Clean {
    /// Also remove bundler output
    #[arg(long)]
    bundles: bool,
  },
}

fn load_settings(explicit: Option<PathBuf>) -> Result<(ReactRenderConfig, RenderSettings)> {
  let cwd = std::env::current_dir().context("failed to get cwd")?;
  let (base_dir, config) = resolve_config(explicit.as_deref(), &cwd)?;
  let settings = config.settings(&base_dir);
  Ok((config, settings))
}

async fn run(cli: Cli) -> Result<()> {
  let (config, settings) = load_settings(cli.config)?;

  match cli.command {
    Command::Render(args) => render::run_render(&settings, &args)?,
    Command::Bundle { path, translate, watch } => {
      bundle::run_bundle(&settings, &path, BundleOptions { translate, watch })?;
    }
    Command::Config { path, translate, print } => {
      bundle::run_config(&settings, &path, translate, print)?;
    }
    Command::Watch(args) => {
      ui::banner("watch", &config.project.name);
      watch::run_watch(&settings, &args).await?;
    }
    Command::Clean { bundles } => clean::run_clean(&settings, bundles)?,
  }
  Ok(())
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  logger::init_logger(cli.verbose, cli.quiet);

  if let Err(e) = run(cli).await {
    ui::fail(&format!("{e:#}"));
    std::process::exit(1);
  }
}
