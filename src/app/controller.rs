//! AppBar registration controller
//!
//! The controller sequences the shell, monitor and host-window collaborators
//! to dock a single window to a screen edge. It owns the registration state
//! and the pre-docking snapshot, and is the only place either changes.
//!
//! Expected refusals from the shell are reported as
//! [`PlacementOutcome::Rejected`] and roll the registration back; only caller
//! mistakes surface as [`AppBarError`].
//!
//! All entry points, including the notification callbacks, must be called
//! from the thread that owns the host window.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::app::auto_hide::AutoHideController;
use crate::app::original::{OriginalAttributes, OriginalStateStore};
use crate::app::state::{AppBarState, AutoHide, Docked, StateEvent, StateMachine};
use crate::config::{AppBarConfig, ConfigError, DesiredAttributes, MonitorTarget};
use crate::domain::core::Rect;
use crate::domain::edge::ScreenEdge;
use crate::domain::placement::{
    compute_desired_rect, compute_hidden_rect, is_accepted, reconcile_after_query,
};
use crate::platform::monitors::{MonitorError, MonitorResolver};
use crate::platform::shell::{CallbackId, ShellAppBar, ShellError, ShellNotification};
use crate::platform::window::{HostEvent, HostWindow, WindowChrome};
use tracing::{debug, info, warn};

/// Distinguishes the callback message names of handlers in one process
static NEXT_HANDLER_ID: AtomicU32 = AtomicU32::new(1);

/// Caller mistakes and setup failures
#[derive(Debug, thiserror::Error)]
pub enum AppBarError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Shell(#[from] ShellError),
}

/// Why the shell did not end up holding the requested placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The operation needs a registered bar
    NotRegistered,
    /// The target monitor could not be resolved
    MonitorUnavailable,
    /// The shell declined the registration
    RegistrationRejected,
    /// Another bar already holds the auto-hide slot
    AutoHideRejected,
    /// The negotiated rectangle does not honour the requested margin
    PlacementRejected { requested: Rect, granted: Rect },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::NotRegistered => write!(f, "AppBar is not registered"),
            Rejection::MonitorUnavailable => write!(f, "target monitor could not be resolved"),
            Rejection::RegistrationRejected => write!(f, "shell declined the registration"),
            Rejection::AutoHideRejected => write!(f, "shell declined the auto-hide claim"),
            Rejection::PlacementRejected { requested, granted } => {
                write!(f, "requested {requested} but the shell granted {granted}")
            }
        }
    }
}

/// Result of a placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// The bar is docked at this rectangle
    Placed(Rect),
    Rejected(Rejection),
}

impl PlacementOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementOutcome::Placed(_))
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            PlacementOutcome::Placed(rect) => Some(*rect),
            PlacementOutcome::Rejected(_) => None,
        }
    }
}

/// Docks one host window as a shell AppBar
pub struct AppBarHandler<S, M, W>
where
    S: ShellAppBar,
    M: MonitorResolver,
    W: HostWindow,
{
    shell: S,
    monitors: M,
    host: W,
    callback_id: CallbackId,
    state: AppBarState,
    original: OriginalStateStore,
    auto_hide: AutoHideController,
    /// Message and close hooks are installed on the host
    hooks_installed: bool,
    /// A full-screen application is open, so the bar is not topmost
    full_screen_app: bool,
}

impl<S, M, W> AppBarHandler<S, M, W>
where
    S: ShellAppBar,
    M: MonitorResolver,
    W: HostWindow,
{
    /// Creates a handler for `host` and allocates its callback message
    pub fn new(mut shell: S, monitors: M, host: W) -> Result<Self, AppBarError> {
        let name = format!(
            "{}_{}_{}",
            AppBarConfig::CALLBACK_MESSAGE_PREFIX,
            std::process::id(),
            NEXT_HANDLER_ID.fetch_add(1, Ordering::Relaxed)
        );
        let callback_id = shell.register_callback_message(&name)?;
        debug!(%name, callback = callback_id.0, "allocated AppBar callback message");

        Ok(Self {
            shell,
            monitors,
            host,
            callback_id,
            state: AppBarState::Unregistered,
            original: OriginalStateStore::new(),
            auto_hide: AutoHideController::new(),
            hooks_installed: false,
            full_screen_app: false,
        })
    }

    pub fn callback_id(&self) -> CallbackId {
        self.callback_id
    }

    pub fn state(&self) -> &AppBarState {
        &self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state.is_registered()
    }

    pub fn is_auto_hide(&self) -> bool {
        self.state.docked().is_some_and(|docked| docked.auto_hide.is_on())
    }

    pub fn is_hidden(&self) -> bool {
        self.state
            .docked()
            .is_some_and(|docked| docked.auto_hide == AutoHide::Hidden)
    }

    pub fn screen_edge(&self) -> Option<ScreenEdge> {
        self.state.docked().map(|docked| docked.edge)
    }

    pub fn window_rect(&self) -> Option<Rect> {
        self.state.docked().map(|docked| docked.window_rect)
    }

    pub fn monitor_rect(&self) -> Option<Rect> {
        self.state.docked().map(|docked| docked.monitor_rect)
    }

    /// Snapshot that will be restored on removal
    pub fn original_attributes(&self) -> Option<&OriginalAttributes> {
        self.original.saved()
    }

    pub fn host(&self) -> &W {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut W {
        &mut self.host
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn shell_mut(&mut self) -> &mut S {
        &mut self.shell
    }

    pub fn monitors(&self) -> &M {
        &self.monitors
    }

    pub fn monitors_mut(&mut self) -> &mut M {
        &mut self.monitors
    }

    /// Registers (if needed) and docks the host as described by `desired`
    ///
    /// A bar that is already registered is re-negotiated in place. If that
    /// fails, the previous placement is not recovered: the bar ends
    /// unregistered and the host is restored.
    pub fn place(&mut self, desired: &DesiredAttributes) -> Result<PlacementOutcome, AppBarError> {
        desired.validate()?;

        let edge = desired.screen_edge;
        let monitor = match self.resolve_monitor(desired.target) {
            Ok(monitor) => monitor,
            Err(e) => {
                warn!(error = %e, "could not resolve the target monitor");
                return Ok(PlacementOutcome::Rejected(Rejection::MonitorUnavailable));
            }
        };
        info!(
            %edge,
            %monitor,
            auto_hide = desired.auto_hide,
            visible_margin = desired.visible_margin,
            hidden_margin = desired.hidden_margin,
            "placing AppBar"
        );

        let was_registered = match self.state {
            AppBarState::Unregistered => {
                if let Err(rejection) = self.register_with_shell() {
                    return Ok(PlacementOutcome::Rejected(rejection));
                }
                false
            }
            AppBarState::Registered(docked) => {
                let mode_changes = docked.auto_hide.is_on() != desired.auto_hide;
                let target_changes = docked.edge != edge || docked.monitor_rect != monitor;
                // The shell must never see two auto-hide claims for one bar.
                if self.auto_hide.is_bound() && (mode_changes || target_changes) {
                    self.auto_hide.unregister(&mut self.shell, &mut self.host);
                    self.apply(StateEvent::AutoHideReleased);
                }
                true
            }
        };

        if desired.auto_hide
            && !self.auto_hide.is_bound()
            && !self
                .auto_hide
                .register(&mut self.shell, &mut self.host, edge, monitor)
        {
            self.roll_back(Rejection::AutoHideRejected, was_registered);
            return Ok(PlacementOutcome::Rejected(Rejection::AutoHideRejected));
        }

        let reserved_margin = if desired.auto_hide {
            desired.hidden_margin
        } else {
            desired.visible_margin
        };
        let granted = match self.negotiate(edge, reserved_margin, &monitor, desired.auto_hide) {
            Ok(rect) => rect,
            Err(rejection) => {
                self.roll_back(rejection, was_registered);
                return Ok(PlacementOutcome::Rejected(rejection));
            }
        };

        self.apply_docked_chrome();
        self.move_host(granted);
        self.apply(StateEvent::Placed(Docked {
            edge,
            visible_margin: desired.visible_margin,
            hidden_margin: desired.hidden_margin,
            window_rect: granted,
            monitor_rect: monitor,
            auto_hide: if desired.auto_hide {
                AutoHide::Hidden
            } else {
                AutoHide::Off
            },
        }));

        info!(rect = %granted, "AppBar placed");
        Ok(PlacementOutcome::Placed(granted))
    }

    /// Re-places the registered bar with auto-hide switched on or off
    pub fn set_auto_hide(&mut self, enabled: bool) -> Result<PlacementOutcome, AppBarError> {
        let Some(docked) = self.state.docked().copied() else {
            return Ok(PlacementOutcome::Rejected(Rejection::NotRegistered));
        };

        let desired = DesiredAttributes::new(docked.edge)
            .with_visible_margin(docked.visible_margin)
            .with_hidden_margin(docked.hidden_margin)
            .with_auto_hide(enabled)
            .on_monitor(MonitorTarget::Explicit(docked.monitor_rect));
        self.place(&desired)
    }

    /// Unregisters the bar and restores the host window
    ///
    /// Does nothing if the bar is not registered.
    pub fn remove(&mut self) {
        if !self.state.is_registered() {
            debug!("remove called on an unregistered AppBar");
            return;
        }

        info!("removing AppBar");
        self.tear_down(true);
    }

    /// Handles a window message forwarded by the host
    ///
    /// Returns true only if the message was this handler's callback and it
    /// acted on it. Unknown notification codes are ignored.
    pub fn on_shell_notification(&mut self, message: u32, wparam: usize, lparam: isize) -> bool {
        if message != self.callback_id.0 {
            return false;
        }

        let AppBarState::Registered(docked) = self.state else {
            debug!(code = wparam, "shell notification while unregistered");
            return false;
        };

        match ShellNotification::from_code(wparam) {
            Some(ShellNotification::PosChanged) => {
                debug!("shell layout changed, negotiating again");
                self.renegotiate(docked);
                true
            }
            Some(ShellNotification::FullScreenApp) => {
                let opening = lparam != 0;
                debug!(opening, "full-screen application notification");
                self.full_screen_app = opening;
                if let Err(e) = self.host.set_topmost(!opening) {
                    warn!(error = %e, "failed to change topmost state");
                }
                true
            }
            other => {
                debug!(?other, code = wparam, "ignoring shell notification");
                false
            }
        }
    }

    /// Expands a hidden auto-hide bar
    pub fn on_pointer_enter(&mut self) {
        if let AppBarState::Registered(docked) = self.state {
            if docked.auto_hide == AutoHide::Hidden {
                let window_rect = self.auto_hide.show(&mut self.host, &docked);
                debug!(rect = %window_rect, "auto-hide bar shown");
                self.apply(StateEvent::Shown { window_rect });
            }
        }
    }

    /// Collapses a visible auto-hide bar
    pub fn on_pointer_leave(&mut self) {
        if let AppBarState::Registered(docked) = self.state {
            if docked.auto_hide == AutoHide::Visible {
                let window_rect = self.auto_hide.hide(&mut self.host, &docked);
                debug!(rect = %window_rect, "auto-hide bar hidden");
                self.apply(StateEvent::Hidden { window_rect });
            }
        }
    }

    /// The host window is closing; release the reservation
    pub fn on_host_closed(&mut self) {
        self.remove();
    }

    /// Forwards activation of the host to the shell
    pub fn on_activated(&mut self) {
        if self.state.is_registered() {
            self.shell.activate(self.host.handle());
        }
    }

    /// Forwards a move of the host to the shell
    pub fn on_window_pos_changed(&mut self) {
        if self.state.is_registered() {
            self.shell.window_pos_changed(self.host.handle());
        }
    }

    fn resolve_monitor(&self, target: MonitorTarget) -> Result<Rect, MonitorError> {
        match target {
            MonitorTarget::CurrentWindow => self.monitors.from_window(self.host.handle()),
            MonitorTarget::ContainingPoint(point) => self.monitors.from_point(point),
            MonitorTarget::Explicit(rect) => Ok(rect),
        }
    }

    /// Snapshots the host and registers with the shell
    fn register_with_shell(&mut self) -> Result<(), Rejection> {
        let snapshot = OriginalAttributes::capture(&self.host, &self.monitors).map_err(|e| {
            warn!(error = %e, "could not resolve the host window's monitor");
            Rejection::MonitorUnavailable
        })?;

        if !self.shell.register(self.host.handle(), self.callback_id) {
            warn!("shell declined the AppBar registration");
            return Err(Rejection::RegistrationRejected);
        }

        debug!("registered with the shell");
        self.original.save(snapshot);
        self.install_hooks();
        Ok(())
    }

    /// Query/set round trip for a bar of `margin` on `edge` of `monitor`
    fn negotiate(
        &mut self,
        edge: ScreenEdge,
        margin: f64,
        monitor: &Rect,
        hidden: bool,
    ) -> Result<Rect, Rejection> {
        let requested = if hidden {
            compute_hidden_rect(edge, margin, monitor)
        } else {
            compute_desired_rect(edge, margin, monitor)
        };

        let window = self.host.handle();
        let queried = self.shell.query_pos(window, edge, requested);
        let corrected = reconcile_after_query(&queried, &requested, edge);
        let granted = self.shell.set_pos(window, edge, corrected);
        debug!(%requested, %queried, %granted, "negotiated AppBar rectangle");

        if is_accepted(&granted, &requested, monitor, edge) {
            Ok(granted)
        } else {
            Err(Rejection::PlacementRejected { requested, granted })
        }
    }

    /// Negotiates the current placement again after a shell layout change
    ///
    /// The monitor is resolved again from the bar's rectangle, since a
    /// display change also reaches the bar as a layout change.
    fn renegotiate(&mut self, docked: Docked) {
        let monitor = match self.monitors.from_rect(&docked.window_rect) {
            Ok(monitor) => monitor,
            Err(e) => {
                warn!(error = %e, "could not resolve the bar's monitor, keeping the last bounds");
                docked.monitor_rect
            }
        };

        if monitor != docked.monitor_rect {
            info!(previous = %docked.monitor_rect, current = %monitor, "monitor bounds changed");
            // The auto-hide claim is keyed by monitor bounds, so it moves too.
            if self.auto_hide.is_bound()
                && !self
                    .auto_hide
                    .register(&mut self.shell, &mut self.host, docked.edge, monitor)
            {
                self.roll_back(Rejection::AutoHideRejected, true);
                return;
            }
        }

        let hidden = docked.auto_hide.is_on();
        match self.negotiate(docked.edge, docked.reserved_margin(), &monitor, hidden) {
            Ok(granted) => {
                self.move_host(granted);
                let mut updated = Docked {
                    window_rect: granted,
                    monitor_rect: monitor,
                    ..docked
                };
                if docked.auto_hide == AutoHide::Visible {
                    updated.window_rect = self.auto_hide.show(&mut self.host, &updated);
                }
                self.apply(StateEvent::Placed(updated));
            }
            Err(rejection) => self.roll_back(rejection, true),
        }
    }

    /// Undoes a failed placement
    ///
    /// `restore_host` is set when the host already carries docked chrome.
    fn roll_back(&mut self, rejection: Rejection, restore_host: bool) {
        warn!(%rejection, "AppBar placement rejected, unregistering");
        self.tear_down(restore_host);
    }

    fn tear_down(&mut self, restore_host: bool) {
        self.auto_hide.unregister(&mut self.shell, &mut self.host);
        self.shell.remove(self.host.handle());
        self.remove_hooks();

        if restore_host {
            self.original.restore(&mut self.host, &self.monitors);
        } else {
            self.original.discard();
        }

        self.full_screen_app = false;
        self.apply(StateEvent::Removed);
    }

    fn install_hooks(&mut self) {
        if !self.hooks_installed {
            self.host.subscribe_messages(self.callback_id);
            self.host.subscribe(HostEvent::Closed);
            self.hooks_installed = true;
        }
    }

    fn remove_hooks(&mut self) {
        if self.hooks_installed {
            self.host.unsubscribe_messages(self.callback_id);
            self.host.unsubscribe(HostEvent::Closed);
            self.hooks_installed = false;
        }
    }

    fn apply_docked_chrome(&mut self) {
        let chrome = WindowChrome {
            topmost: !self.full_screen_app,
            ..WindowChrome::docked()
        };
        if let Err(e) = self.host.set_chrome(chrome) {
            warn!(error = %e, "failed to apply AppBar chrome");
        }
    }

    fn move_host(&mut self, rect: Rect) {
        if let Err(e) = self.host.set_geometry(rect.into()) {
            warn!(error = %e, %rect, "failed to move host window");
        }
    }

    fn apply(&mut self, event: StateEvent) {
        let next = StateMachine::process_event(self.state, event);
        if next != self.state {
            debug!(?event, "AppBar state changed");
        }
        self.state = next;
    }
}

impl<S, M, W> Drop for AppBarHandler<S, M, W>
where
    S: ShellAppBar,
    M: MonitorResolver,
    W: HostWindow,
{
    fn drop(&mut self) {
        // A reservation outliving the handler would block the screen strip.
        self.remove();
    }
}
