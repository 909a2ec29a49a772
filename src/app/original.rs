//! Pre-docking snapshot of the host window
//!
//! Docking changes the window's geometry and chrome. The snapshot taken on
//! registration records both, plus the monitor the window was on, so that
//! undocking can put the window back in an analogous place even if monitors
//! were added, removed or resized in the meantime.

use crate::domain::core::{Rect, WindowGeometry};
use crate::platform::monitors::{MonitorError, MonitorResolver};
use crate::platform::window::{HostWindow, WindowChrome};
use tracing::{debug, warn};

/// Host attributes captured before the window became an AppBar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalAttributes {
    pub geometry: WindowGeometry,
    pub chrome: WindowChrome,
    /// Bounds of the monitor the window overlapped at snapshot time
    pub monitor: Rect,
}

impl OriginalAttributes {
    /// Reads the host's current attributes and the monitor it is on
    pub fn capture<W, M>(host: &W, monitors: &M) -> Result<Self, MonitorError>
    where
        W: HostWindow,
        M: MonitorResolver,
    {
        let geometry = host.geometry();
        let monitor = monitors.from_rect(&geometry.to_rect())?;
        Ok(Self {
            geometry,
            chrome: host.chrome(),
            monitor,
        })
    }

    /// Geometry with the same relative position and size on `monitor`
    ///
    /// Each coordinate is expressed as a fraction of the original monitor's
    /// dimensions and re-applied to the given monitor's current bounds.
    pub fn restored_geometry(&self, monitor: &Rect) -> WindowGeometry {
        let original_left = f64::from(self.monitor.left);
        let original_top = f64::from(self.monitor.top);
        let original_width = f64::from(self.monitor.width());
        let original_height = f64::from(self.monitor.height());

        let relative_left = (self.geometry.left - original_left) / original_width;
        let relative_top = (self.geometry.top - original_top) / original_height;
        let relative_width = self.geometry.width / original_width;
        let relative_height = self.geometry.height / original_height;

        let width = f64::from(monitor.width());
        let height = f64::from(monitor.height());

        WindowGeometry::new(
            f64::from(monitor.left) + relative_left * width,
            f64::from(monitor.top) + relative_top * height,
            relative_width * width,
            relative_height * height,
        )
    }
}

/// Holds the snapshot between registration and removal
#[derive(Debug, Default)]
pub struct OriginalStateStore {
    saved: Option<OriginalAttributes>,
}

impl OriginalStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }

    pub fn saved(&self) -> Option<&OriginalAttributes> {
        self.saved.as_ref()
    }

    /// Keeps `attributes` until the next restore; an existing snapshot wins
    pub fn save(&mut self, attributes: OriginalAttributes) {
        if self.saved.is_none() {
            self.saved = Some(attributes);
        }
    }

    /// Drops the snapshot without touching the host
    pub fn discard(&mut self) {
        self.saved = None;
    }

    /// Puts the host back where it was before docking and clears the snapshot
    ///
    /// The monitor best matching the original window rectangle is resolved
    /// now, so a changed topology is taken into account. Returns the applied
    /// geometry, or `None` if there was nothing to restore.
    pub fn restore<W, M>(&mut self, host: &mut W, monitors: &M) -> Option<WindowGeometry>
    where
        W: HostWindow,
        M: MonitorResolver,
    {
        let original = self.saved.take()?;

        let monitor = match monitors.from_rect(&original.geometry.to_rect()) {
            Ok(monitor) => monitor,
            Err(e) => {
                warn!(error = %e, "monitor lookup failed, restoring on the snapshot's bounds");
                original.monitor
            }
        };

        let geometry = original.restored_geometry(&monitor);
        debug!(
            left = geometry.left,
            top = geometry.top,
            width = geometry.width,
            height = geometry.height,
            %monitor,
            "restoring host window"
        );

        // Geometry before chrome so a maximized window un-maximizes to it.
        if let Err(e) = host.set_geometry(geometry) {
            warn!(error = %e, "failed to restore window geometry");
        }
        if let Err(e) = host.set_chrome(original.chrome) {
            warn!(error = %e, "failed to restore window chrome");
        }

        Some(geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::fake;
    use crate::platform::window::{ResizeMode, WindowState, WindowStyle};

    fn assert_close(actual: WindowGeometry, expected: WindowGeometry) {
        let pairs = [
            (actual.left, expected.left),
            (actual.top, expected.top),
            (actual.width, expected.width),
            (actual.height, expected.height),
        ];
        for (a, e) in pairs {
            assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn unchanged_monitor_restores_exact_geometry() {
        let original = OriginalAttributes {
            geometry: WindowGeometry::new(100.0, 150.0, 800.0, 600.0),
            chrome: WindowChrome::default(),
            monitor: Rect::new(0, 0, 1920, 1080),
        };
        assert_close(
            original.restored_geometry(&Rect::new(0, 0, 1920, 1080)),
            original.geometry,
        );
    }

    #[test]
    fn resized_monitor_scales_geometry() {
        let original = OriginalAttributes {
            geometry: WindowGeometry::new(100.0, 150.0, 800.0, 600.0),
            chrome: WindowChrome::default(),
            monitor: Rect::new(0, 0, 1920, 1080),
        };
        assert_close(
            original.restored_geometry(&Rect::new(0, 0, 3840, 2160)),
            WindowGeometry::new(200.0, 300.0, 1600.0, 1200.0),
        );
    }

    #[test]
    fn geometry_is_relative_to_monitor_origin() {
        let original = OriginalAttributes {
            geometry: WindowGeometry::new(-1180.0, -100.0, 640.0, 512.0),
            chrome: WindowChrome::default(),
            monitor: Rect::new(-1280, -200, 0, 824),
        };
        // Same monitor moved to the right of a primary and halved.
        assert_close(
            original.restored_geometry(&Rect::new(1920, 0, 2560, 512)),
            WindowGeometry::new(1970.0, 50.0, 320.0, 256.0),
        );
    }

    #[test]
    fn restore_applies_chrome_and_clears_snapshot() {
        let monitor = Rect::new(0, 0, 1920, 1080);
        let (_shell, monitors, mut host) =
            fake::desktop(vec![monitor], WindowGeometry::new(100.0, 100.0, 800.0, 600.0));
        let chrome = WindowChrome {
            style: WindowStyle::ThreeDBorder,
            resize_mode: ResizeMode::CanResizeWithGrip,
            state: WindowState::Normal,
            topmost: false,
        };
        host.set_chrome(chrome).unwrap();

        let mut store = OriginalStateStore::new();
        store.save(OriginalAttributes::capture(&host, &monitors).unwrap());
        assert!(store.is_saved());

        host.set_chrome(WindowChrome::docked()).unwrap();
        host.set_geometry(WindowGeometry::new(0.0, 0.0, 1920.0, 216.0)).unwrap();

        let restored = store.restore(&mut host, &monitors).unwrap();
        assert_close(restored, WindowGeometry::new(100.0, 100.0, 800.0, 600.0));
        assert_eq!(host.chrome(), chrome);
        assert_eq!(host.rect(), Rect::new(100, 100, 900, 700));
        assert!(!store.is_saved());
        assert_eq!(store.restore(&mut host, &monitors), None);
    }

    #[test]
    fn restore_uses_monitor_matching_original_rect() {
        let (_shell, mut monitors, mut host) = fake::desktop(
            vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 3840, 1080)],
            WindowGeometry::new(2020.0, 100.0, 800.0, 600.0),
        );
        let mut store = OriginalStateStore::new();
        store.save(OriginalAttributes::capture(&host, &monitors).unwrap());
        assert_eq!(store.saved().unwrap().monitor, Rect::new(1920, 0, 3840, 1080));

        // The secondary monitor is unplugged while docked.
        monitors
            .layout
            .set_monitors(vec![Rect::new(0, 0, 1920, 1080)], 0)
            .unwrap();

        let restored = store.restore(&mut host, &monitors).unwrap();
        assert_close(restored, WindowGeometry::new(100.0, 100.0, 800.0, 600.0));
        assert_eq!(host.rect(), Rect::new(100, 100, 900, 700));
    }
}
