//! Platform-specific Windows implementations
//!
//! This module defines the seams between the AppBar handler and the
//! operating system (shell, monitors, host window) and provides the Win32
//! adapters behind them.

pub mod monitors;
pub mod shell;
pub mod window;
#[cfg(windows)]
pub mod windows;

#[cfg(test)]
pub mod fake;
