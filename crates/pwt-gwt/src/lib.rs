//! Compiles GWT modules to javascript.
//!
//! Applying the [`GwtPlugin`](plugin::GwtPlugin) to a project registers the
//! [`PutnamiExtension`](extensions::PutnamiExtension), which holds the compiler options shared by
//! every [`GwtCompile`](compile::GwtCompile) task. Settings can be read from a `pwt.toml` file.

#[macro_use]
extern crate log;

pub mod cli;
pub mod compile;
pub mod config;
pub mod extensions;
pub mod flags;
pub mod options;
pub mod plugin;

pub use compile::GwtCompile;
pub use extensions::PutnamiExtension;
pub use plugin::GwtPlugin;
