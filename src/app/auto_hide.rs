//! Auto-hide claim and visibility handling
//!
//! The shell allows one auto-hide bar per edge and monitor. This controller
//! owns that claim and the pointer subscriptions that come with it, and
//! resizes the host window between its hidden and visible margins.
//!
//! The reservation negotiated with the shell never changes on a visibility
//! toggle; only the window grows over, or shrinks back from, other windows.

use crate::app::state::Docked;
use crate::domain::core::Rect;
use crate::domain::edge::ScreenEdge;
use crate::domain::placement::{extent_for, resize_docked};
use crate::platform::shell::ShellAppBar;
use crate::platform::window::{HostEvent, HostWindow};
use tracing::{debug, warn};

/// Edge and monitor of an accepted auto-hide claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoHideBinding {
    pub edge: ScreenEdge,
    pub monitor: Rect,
}

#[derive(Debug, Default)]
pub struct AutoHideController {
    binding: Option<AutoHideBinding>,
    pointer_subscribed: bool,
}

impl AutoHideController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binding(&self) -> Option<AutoHideBinding> {
        self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    /// Claims the auto-hide slot of `edge` on `monitor`
    ///
    /// On success the host starts forwarding pointer enter/leave. Returns
    /// false if the shell refused, e.g. because another bar holds the slot.
    pub fn register<S, W>(
        &mut self,
        shell: &mut S,
        host: &mut W,
        edge: ScreenEdge,
        monitor: Rect,
    ) -> bool
    where
        S: ShellAppBar,
        W: HostWindow,
    {
        if let Some(binding) = self.binding {
            if binding.edge == edge && binding.monitor == monitor {
                return true;
            }
            self.unregister(shell, host);
        }

        if !shell.set_auto_hide_bar(host.handle(), edge, monitor, true) {
            warn!(%edge, %monitor, "shell refused the auto-hide claim");
            return false;
        }

        debug!(%edge, %monitor, "auto-hide claim registered");
        self.binding = Some(AutoHideBinding { edge, monitor });
        if !self.pointer_subscribed {
            host.subscribe(HostEvent::PointerEnter);
            host.subscribe(HostEvent::PointerLeave);
            self.pointer_subscribed = true;
        }
        true
    }

    /// Releases the claim, if any, and stops pointer forwarding
    ///
    /// Safe to call repeatedly; the pointer subscriptions are dropped once.
    pub fn unregister<S, W>(&mut self, shell: &mut S, host: &mut W)
    where
        S: ShellAppBar,
        W: HostWindow,
    {
        if let Some(binding) = self.binding.take() {
            if !shell.set_auto_hide_bar(host.handle(), binding.edge, binding.monitor, false) {
                // The slot is ours, so this only happens if the shell forgot it.
                warn!(edge = %binding.edge, "shell refused to release the auto-hide claim");
            }
            debug!(edge = %binding.edge, "auto-hide claim released");
        }

        if self.pointer_subscribed {
            host.unsubscribe(HostEvent::PointerEnter);
            host.unsubscribe(HostEvent::PointerLeave);
            self.pointer_subscribed = false;
        }
    }

    /// Expands the window to the visible margin
    pub fn show<W: HostWindow>(&self, host: &mut W, docked: &Docked) -> Rect {
        self.resize(host, docked, docked.visible_margin, false)
    }

    /// Collapses the window to the hidden margin
    pub fn hide<W: HostWindow>(&self, host: &mut W, docked: &Docked) -> Rect {
        self.resize(host, docked, docked.hidden_margin, true)
    }

    fn resize<W: HostWindow>(
        &self,
        host: &mut W,
        docked: &Docked,
        margin: f64,
        hidden: bool,
    ) -> Rect {
        let extent = extent_for(docked.edge, margin, &docked.monitor_rect, hidden);
        let rect = resize_docked(&docked.window_rect, docked.edge, &docked.monitor_rect, extent);
        if let Err(e) = host.set_geometry(rect.into()) {
            warn!(error = %e, "failed to resize auto-hide bar");
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::AutoHide;
    use crate::domain::core::WindowGeometry;
    use crate::platform::fake::{self, ShellCall};

    fn monitor() -> Rect {
        Rect::new(0, 0, 1000, 800)
    }

    #[test]
    fn register_subscribes_pointer_once() {
        let (mut shell, _monitors, mut host) =
            fake::desktop(vec![monitor()], WindowGeometry::new(0.0, 0.0, 20.0, 800.0));
        let mut controller = AutoHideController::new();

        assert!(controller.register(&mut shell, &mut host, ScreenEdge::Left, monitor()));
        assert!(controller.register(&mut shell, &mut host, ScreenEdge::Left, monitor()));
        assert!(host.is_subscribed(HostEvent::PointerEnter));
        assert_eq!(host.subscription_count(HostEvent::PointerEnter, true), 1);
        assert_eq!(shell.auto_hide_claims, vec![(ScreenEdge::Left, monitor())]);
    }

    #[test]
    fn refused_claim_leaves_no_subscription() {
        let (mut shell, _monitors, mut host) =
            fake::desktop(vec![monitor()], WindowGeometry::new(0.0, 0.0, 20.0, 800.0));
        shell.refuse_auto_hide = true;
        let mut controller = AutoHideController::new();

        assert!(!controller.register(&mut shell, &mut host, ScreenEdge::Top, monitor()));
        assert!(!controller.is_bound());
        assert!(!host.is_subscribed(HostEvent::PointerEnter));
    }

    #[test]
    fn unregister_is_idempotent() {
        let (mut shell, _monitors, mut host) =
            fake::desktop(vec![monitor()], WindowGeometry::new(0.0, 0.0, 20.0, 800.0));
        let mut controller = AutoHideController::new();
        controller.register(&mut shell, &mut host, ScreenEdge::Left, monitor());

        controller.unregister(&mut shell, &mut host);
        controller.unregister(&mut shell, &mut host);

        assert!(shell.auto_hide_claims.is_empty());
        assert_eq!(host.subscription_count(HostEvent::PointerLeave, false), 1);
        assert_eq!(
            shell.count(|call| matches!(call, ShellCall::SetAutoHide { enable: false, .. })),
            1
        );
    }

    #[test]
    fn moving_the_claim_releases_the_old_edge() {
        let (mut shell, _monitors, mut host) =
            fake::desktop(vec![monitor()], WindowGeometry::new(0.0, 0.0, 20.0, 800.0));
        let mut controller = AutoHideController::new();
        controller.register(&mut shell, &mut host, ScreenEdge::Left, monitor());
        controller.register(&mut shell, &mut host, ScreenEdge::Right, monitor());

        assert_eq!(shell.auto_hide_claims, vec![(ScreenEdge::Right, monitor())]);
        assert_eq!(
            controller.binding(),
            Some(AutoHideBinding {
                edge: ScreenEdge::Right,
                monitor: monitor()
            })
        );
        assert!(host.is_subscribed(HostEvent::PointerLeave));
    }

    #[test]
    fn show_and_hide_resize_along_docked_dimension() {
        let (_shell, _monitors, mut host) =
            fake::desktop(vec![monitor()], WindowGeometry::new(0.0, 0.0, 20.0, 800.0));
        let controller = AutoHideController::new();
        let docked = Docked {
            edge: ScreenEdge::Left,
            visible_margin: 0.10,
            hidden_margin: 0.02,
            window_rect: Rect::new(0, 0, 20, 800),
            monitor_rect: monitor(),
            auto_hide: AutoHide::Hidden,
        };

        let shown = controller.show(&mut host, &docked);
        assert_eq!(shown, Rect::new(0, 0, 100, 800));
        assert_eq!(host.rect().width(), 100);

        let docked = Docked {
            window_rect: shown,
            auto_hide: AutoHide::Visible,
            ..docked
        };
        let hidden = controller.hide(&mut host, &docked);
        assert_eq!(hidden.width(), 20);
        assert_eq!(host.rect(), Rect::new(0, 0, 20, 800));
    }
}
