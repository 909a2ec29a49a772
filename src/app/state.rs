//! AppBar state management
//!
//! Defines what the shell currently believes about the docked window and the
//! transitions between those beliefs. Each transition is applied only after
//! the shell call it mirrors has succeeded.

use crate::domain::core::Rect;
use crate::domain::edge::ScreenEdge;

/// Auto-hide membership of a registered bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoHide {
    /// Standard bar, always shown at the visible margin
    Off,
    /// Auto-hide bar expanded to the visible margin
    Visible,
    /// Auto-hide bar collapsed to the hidden margin
    Hidden,
}

impl AutoHide {
    pub fn is_on(self) -> bool {
        !matches!(self, AutoHide::Off)
    }
}

/// Everything the shell knows about a registered bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Docked {
    pub edge: ScreenEdge,
    pub visible_margin: f64,
    pub hidden_margin: f64,
    /// Current window rectangle, which for auto-hide bars follows visibility
    pub window_rect: Rect,
    pub monitor_rect: Rect,
    pub auto_hide: AutoHide,
}

impl Docked {
    /// Margin whose strip is reserved with the shell
    pub fn reserved_margin(&self) -> f64 {
        if self.auto_hide.is_on() {
            self.hidden_margin
        } else {
            self.visible_margin
        }
    }
}

/// Registration state of the handled window
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AppBarState {
    /// Not known to the shell
    #[default]
    Unregistered,
    /// Registered and holding a negotiated rectangle
    Registered(Docked),
}

impl AppBarState {
    pub fn docked(&self) -> Option<&Docked> {
        match self {
            AppBarState::Unregistered => None,
            AppBarState::Registered(docked) => Some(docked),
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, AppBarState::Registered(_))
    }
}

/// Shell outcomes that move the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEvent {
    /// Negotiation succeeded; the bar holds this placement
    Placed(Docked),
    /// The auto-hide claim was released while the bar stays registered
    AutoHideReleased,
    /// Pointer entered a hidden bar, which now covers `window_rect`
    Shown { window_rect: Rect },
    /// Pointer left a visible bar, which now covers `window_rect`
    Hidden { window_rect: Rect },
    /// The bar was removed from the shell
    Removed,
}

/// State machine for AppBar registration transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes a state event and returns the new state
    ///
    /// Events that make no sense in the current state leave it unchanged.
    pub fn process_event(current_state: AppBarState, event: StateEvent) -> AppBarState {
        match (current_state, event) {
            (_, StateEvent::Placed(docked)) => AppBarState::Registered(docked),

            (_, StateEvent::Removed) => AppBarState::Unregistered,

            (AppBarState::Registered(mut docked), StateEvent::AutoHideReleased)
                if docked.auto_hide.is_on() =>
            {
                docked.auto_hide = AutoHide::Off;
                AppBarState::Registered(docked)
            }

            (AppBarState::Registered(mut docked), StateEvent::Shown { window_rect })
                if docked.auto_hide == AutoHide::Hidden =>
            {
                docked.auto_hide = AutoHide::Visible;
                docked.window_rect = window_rect;
                AppBarState::Registered(docked)
            }

            (AppBarState::Registered(mut docked), StateEvent::Hidden { window_rect })
                if docked.auto_hide == AutoHide::Visible =>
            {
                docked.auto_hide = AutoHide::Hidden;
                docked.window_rect = window_rect;
                AppBarState::Registered(docked)
            }

            // Invalid transitions - ignore event
            (state, _) => state,
        }
    }
}
