//! `snipsync_core` keeps code snippets in documentation in sync with the
//! source files they come from. Regions of code are delimited in source files
//! with `@@@SNIPSTART id` and `@@@SNIPEND` comments, collected into a
//! registry, and spliced into every matching marker pair in the target
//! documents.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Origins (remote checkouts and local globs)
//!   → Registry (scans source files for delimited snippets)
//!   → Marker scanner (pairs SNIPSTART / SNIPEND markers in each target)
//!   → Selection (line ranges and regex bounds from the marker options)
//!   → Renderer (dedent, code fence, source link)
//!   → Splice (replaces region content, writes changed targets once)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `snipsync.config.yaml`.
//! - [`origin`]: Fetching remote origins and expanding local globs and
//!   targets into files.
//! - [`dedent`]: Common indentation removal.
//! - [`markers`]: Recognition of source delimiters and target markers.
//!
//! ## Target markers
//!
//! ```md
//! <!--SNIPSTART hello-world-activity {"selectedLines": ["1-3"]}-->
//! <!--SNIPEND-->
//!
//! {/* SNIPSTART hello-world-activity */}
//! {/* SNIPEND */}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snipsync_core::Snipsync;
//! use snipsync_core::SnipsyncConfig;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let config = SnipsyncConfig::load(root).unwrap().unwrap_or_default();
//! let report = Snipsync::new(&config, root).run().unwrap();
//!
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{}", diagnostic.message());
//! }
//! println!("updated {} file(s)", report.changes.len());
//! ```

pub use config::*;
pub use diagnostic::*;
pub use error::*;
pub use markers::MarkerStyle;
pub use registry::*;
pub use render::*;
pub use selection::*;
pub use snippet::*;
pub use splice::*;
pub use sync::*;

pub mod config;
pub mod dedent;
mod diagnostic;
#[allow(unused_assignments)]
mod error;
pub mod markers;
pub mod origin;
mod registry;
mod render;
mod selection;
mod snippet;
mod splice;
mod sync;

#[cfg(test)]
mod __fixtures;
