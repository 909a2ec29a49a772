//! Dock a window to a screen edge as a shell AppBar
//!
//! The shell reserves a strip of the monitor for a registered AppBar so that
//! maximized windows do not cover it. [`AppBarHandler`] negotiates that strip,
//! keeps the window in it, optionally auto-hides it, and puts the window back
//! where it was when the bar is removed.
//!
//! Platform access goes through the [`ShellAppBar`], [`MonitorResolver`] and
//! [`HostWindow`] traits. The Win32 implementations are only built on
//! Windows; everything else is platform independent.

pub mod app;
pub mod config;
pub mod domain;
pub mod platform;

pub use app::{AppBarError, AppBarHandler, AppBarState, PlacementOutcome, Rejection};
pub use config::{AppBarConfig, ConfigError, DesiredAttributes, MonitorTarget};
pub use domain::core::{Point, Rect, WindowGeometry};
pub use domain::edge::ScreenEdge;
pub use platform::monitors::MonitorResolver;
pub use platform::shell::ShellAppBar;
pub use platform::window::HostWindow;
