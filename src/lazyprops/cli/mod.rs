//! # CLI Behavior
//!
//! A small client for trying collection merges on real files and for managing
//! the `lazyprops.json` settings they run with.
//!
//! ### `lazyprops merge <FILE>`
//!
//! Reads a JSON collection (an object, or an array of bare entries and
//! `[key, value]` pairs), writes it to a collection attribute on a scratch
//! document and prints the merged collection as pretty JSON. `--kind` names
//! the model kind the entries are built as.
//!
//! ### `lazyprops config [KEY [VALUE]]`
//!
//! Shows all settings, shows one, or sets one.
//!
//! ### Config directory
//!
//! `--config-dir` wins. Otherwise the current directory is used when it holds
//! a `lazyprops.json`, then the per-user config directory.
//!
//! Set `LAZYPROPS_LOG` (for example `LAZYPROPS_LOG=lazyprops=trace`) to see
//! the library's logging on stderr. `--verbose` is a shortcut for `debug`.

mod commands;
mod render;
pub mod setup;

pub use commands::run;
