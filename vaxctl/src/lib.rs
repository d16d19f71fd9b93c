//! vaxctl library: client for the device automation service.
//!
//! # Modules
//!
//! - [`api`]: blocking REST client and the [`api::ResourceApi`] boundary.
//! - [`model`]: resource shapes and their table/JSON/YAML renderings.
//! - [`cmd`]: one module per CLI subcommand.
//! - [`generator`]: YAML templates for `vaxctl generate`.
//! - [`tui`]: the full-screen editor, including the live regex highlighter
//!   used to build rules from a state's OCR text.
//! - [`settings`]: config file and environment resolution.

pub mod api;
pub mod cli;
pub mod cmd;
pub mod errors;
pub mod generator;
pub mod model;
pub mod settings;
pub mod style;
pub mod tracing_init;
pub mod tui;
pub mod version;
