//! Configuration module for edge-dock
//!
//! Holds the caller-facing description of where and how the AppBar should be
//! docked, together with the validation applied before any shell call.

pub mod appbar;

pub use appbar::{AppBarConfig, ConfigError, DesiredAttributes, MonitorTarget};
