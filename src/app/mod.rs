//! Application orchestration layer
//!
//! Sequences the shell, monitor and host-window collaborators to dock a
//! window, and owns the registration state and the pre-docking snapshot.

pub mod auto_hide;
pub mod controller;
pub mod original;
pub mod state;

pub use controller::{AppBarError, AppBarHandler, PlacementOutcome, Rejection};
pub use state::{AppBarState, AutoHide, Docked};
