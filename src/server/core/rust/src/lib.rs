/* src/server/core/rust/src/lib.rs */

//! Server-side rendering and bundling of React components.
//!
//! The heavy lifting happens in an external JavaScript runtime: this crate
//! resolves component sources, generates and caches webpack configs, runs the
//! bundler and renderer driver scripts through `node`, and turns their output
//! into a [`RenderedComponent`] that can emit its markup and client-side mount
//! code.

pub mod bundle;
pub mod cache;
pub mod component;
pub mod errors;
pub mod finder;
pub mod mount;
pub mod naming;
mod process;
pub mod props;
pub mod render;
mod scripts;
pub mod settings;
pub mod source;
pub mod watcher;
pub mod webpack;

pub use bundle::{Asset, Bundle, BundleOptions, bundle_component};
pub use cache::{ConfigCache, get_config_filename};
pub use component::RenderedComponent;
pub use errors::{Error, Result};
pub use finder::{DirectoryFinder, StaticFileFinder};
pub use naming::{absolute_path, var_from_path};
pub use props::{PropValue, Props, serialize_props};
pub use render::{RenderMode, RenderOptions, render_component};
pub use scripts::{BUNDLE_JS, RENDER_JS};
pub use settings::RenderSettings;
pub use source::ComponentSource;
pub use watcher::{stop_watcher, stop_watchers};
pub use webpack::{WebpackConfig, generate_config};
