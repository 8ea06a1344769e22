//! Extension settings desktop app.
//!
//! A GPUI window for viewing installed extensions, enabling and disabling
//! them, and rebinding their keyboard shortcuts. The extension catalog lives
//! in a separate host process that this app talks to over a line-delimited
//! JSON bridge; global hotkeys are registered directly with the OS.

pub mod bridge;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod extensions;
pub mod hotkeys;
pub mod keymap;
pub mod logging;
pub mod store;
pub mod theme;

pub use error::{Result, SettingsError};
