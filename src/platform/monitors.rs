//! Monitor resolution
//!
//! This module is responsible for:
//! - Finding the monitor that best matches a point, rectangle or window
//! - Falling back to the primary monitor when nothing intersects
//! - Enumerating monitors for diagnostics
//!
//! CRITICAL: This module must handle the Windows virtual coordinate system
//! where secondary monitors can have negative coordinates.

use crate::domain::core::{Point, Rect};
use crate::platform::window::WindowHandle;

/// A monitor with the rectangles the AppBar logic cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    /// Zero-based index for stable identification
    pub index: usize,
    /// Full monitor bounds in virtual-screen pixels
    pub rect: Rect,
    /// Work area (bounds minus taskbar and AppBars)
    pub work_area: Rect,
    /// Whether this is the primary monitor
    pub is_primary: bool,
}

/// Error types for monitor operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorError {
    /// Failed to enumerate monitors
    EnumerationFailed,
    /// Failed to get monitor information for a native monitor handle
    InfoFailed(isize),
    /// No monitors found during enumeration
    NoMonitors,
    /// Monitor not found at specified location
    MonitorNotFound,
}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorError::EnumerationFailed => write!(f, "Failed to enumerate monitors"),
            MonitorError::InfoFailed(handle) => {
                write!(f, "Failed to get info for monitor {:#x}", handle)
            }
            MonitorError::NoMonitors => write!(f, "No monitors found during enumeration"),
            MonitorError::MonitorNotFound => write!(f, "Monitor not found at specified location"),
        }
    }
}

impl std::error::Error for MonitorError {}

/// Resolves the bounds of the monitor best matching a location
///
/// Every query falls back to the primary monitor when the location does not
/// intersect any monitor. Results are deterministic for an unchanged
/// topology.
pub trait MonitorResolver {
    /// Monitor with the largest intersection with `rect`
    fn from_rect(&self, rect: &Rect) -> Result<Rect, MonitorError>;

    /// Monitor containing `point`
    fn from_point(&self, point: Point) -> Result<Rect, MonitorError>;

    /// Monitor with the largest intersection with the window's bounds
    fn from_window(&self, window: WindowHandle) -> Result<Rect, MonitorError>;
}

/// In-memory monitor topology with the shell's matching rules
///
/// Used where no live desktop is available and as the reference for what the
/// Win32 resolver returns. Unmatched queries fall back to the primary monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorLayout {
    monitors: Vec<Rect>,
    primary: usize,
}

impl MonitorLayout {
    /// Creates a layout; `primary` indexes into `monitors`
    pub fn new(monitors: Vec<Rect>, primary: usize) -> Result<Self, MonitorError> {
        if monitors.is_empty() {
            return Err(MonitorError::NoMonitors);
        }
        if primary >= monitors.len() {
            return Err(MonitorError::MonitorNotFound);
        }
        Ok(Self { monitors, primary })
    }

    pub fn monitors(&self) -> &[Rect] {
        &self.monitors
    }

    pub fn primary(&self) -> Rect {
        self.monitors[self.primary]
    }

    /// Replaces the topology, e.g. after a display change
    pub fn set_monitors(
        &mut self,
        monitors: Vec<Rect>,
        primary: usize,
    ) -> Result<(), MonitorError> {
        *self = Self::new(monitors, primary)?;
        Ok(())
    }

    /// Monitor with the largest overlap with `rect`; the first one wins ties
    pub fn best_match(&self, rect: &Rect) -> Rect {
        let mut best: Option<(i64, Rect)> = None;
        for monitor in &self.monitors {
            if let Some(overlap) = monitor.intersection(rect) {
                let area = overlap.area();
                if best.is_none_or(|(best_area, _)| area > best_area) {
                    best = Some((area, *monitor));
                }
            }
        }
        best.map(|(_, monitor)| monitor).unwrap_or_else(|| self.primary())
    }

    /// Monitor containing `point`, or the primary one
    pub fn containing(&self, point: Point) -> Rect {
        self.monitors
            .iter()
            .copied()
            .find(|monitor| monitor.contains_point(point))
            .unwrap_or_else(|| self.primary())
    }
}

/// Monitor resolver backed by the Win32 `MonitorFrom*` queries
#[derive(Debug, Default)]
pub struct Win32Monitors;

impl Win32Monitors {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
mod win32 {
    use super::*;
    use windows::Win32::Foundation::*;
    use windows::Win32::Graphics::Gdi::*;

    use crate::platform::windows::{rect_to_win32_rect, win32_rect_to_rect};

    /// Reads the bounds of a native monitor handle
    fn monitor_info(hmonitor: HMONITOR) -> Result<MONITORINFO, MonitorError> {
        if hmonitor.is_invalid() {
            return Err(MonitorError::MonitorNotFound);
        }

        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };

        unsafe {
            if GetMonitorInfoW(hmonitor, &mut info) == FALSE {
                return Err(MonitorError::InfoFailed(hmonitor.0));
            }
        }

        Ok(info)
    }

    fn monitor_rect(hmonitor: HMONITOR) -> Result<Rect, MonitorError> {
        monitor_info(hmonitor).map(|info| win32_rect_to_rect(&info.rcMonitor))
    }

    impl MonitorResolver for Win32Monitors {
        fn from_rect(&self, rect: &Rect) -> Result<Rect, MonitorError> {
            let native = rect_to_win32_rect(rect);
            monitor_rect(unsafe { MonitorFromRect(&native, MONITOR_DEFAULTTOPRIMARY) })
        }

        fn from_point(&self, point: Point) -> Result<Rect, MonitorError> {
            let native = POINT {
                x: point.x,
                y: point.y,
            };
            monitor_rect(unsafe { MonitorFromPoint(native, MONITOR_DEFAULTTOPRIMARY) })
        }

        fn from_window(&self, window: WindowHandle) -> Result<Rect, MonitorError> {
            monitor_rect(unsafe { MonitorFromWindow(HWND(window.0), MONITOR_DEFAULTTOPRIMARY) })
        }
    }

    /// Context for monitor enumeration callback
    struct EnumContext {
        monitors: Vec<Monitor>,
    }

    /// Callback function for monitor enumeration
    ///
    /// Monitors whose information cannot be read are skipped; enumeration
    /// continues with the rest.
    unsafe extern "system" fn enum_monitor_proc(
        hmonitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        lparam: LPARAM,
    ) -> BOOL {
        unsafe {
            let context = &mut *(lparam.0 as *mut EnumContext);

            if let Ok(info) = monitor_info(hmonitor) {
                let index = context.monitors.len();
                context.monitors.push(Monitor {
                    index,
                    rect: win32_rect_to_rect(&info.rcMonitor),
                    work_area: win32_rect_to_rect(&info.rcWork),
                    is_primary: (info.dwFlags & 1) != 0, // MONITORINFOF_PRIMARY
                });
            }

            TRUE // Continue enumeration
        }
    }

    /// Enumerates all monitors in the order the system reports them
    pub fn enumerate_monitors() -> Result<Vec<Monitor>, MonitorError> {
        let mut context = EnumContext {
            monitors: Vec::new(),
        };

        unsafe {
            if EnumDisplayMonitors(
                HDC(0),
                None,
                Some(enum_monitor_proc),
                LPARAM(&mut context as *mut _ as isize),
            ) == FALSE
            {
                return Err(MonitorError::EnumerationFailed);
            }
        }

        if context.monitors.is_empty() {
            return Err(MonitorError::NoMonitors);
        }

        Ok(context.monitors)
    }
}

#[cfg(windows)]
pub use win32::enumerate_monitors;

#[cfg(test)]
mod tests {
    use super::*;

    fn dual_layout() -> MonitorLayout {
        // Secondary monitor to the left of the primary, slightly raised.
        MonitorLayout::new(
            vec![Rect::new(0, 0, 1920, 1080), Rect::new(-1280, -200, 0, 824)],
            0,
        )
        .unwrap()
    }

    #[test]
    fn empty_layout_is_rejected() {
        assert_eq!(MonitorLayout::new(Vec::new(), 0), Err(MonitorError::NoMonitors));
        assert_eq!(
            MonitorLayout::new(vec![Rect::new(0, 0, 10, 10)], 1),
            Err(MonitorError::MonitorNotFound)
        );
    }

    #[test]
    fn rect_resolves_to_largest_overlap() {
        let layout = dual_layout();
        // Mostly on the secondary monitor.
        let window = Rect::new(-1000, 100, 200, 600);
        assert_eq!(layout.best_match(&window), Rect::new(-1280, -200, 0, 824));

        // Mostly on the primary monitor.
        let window = Rect::new(-100, 100, 1000, 600);
        assert_eq!(layout.best_match(&window), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn no_intersection_falls_back_to_primary() {
        let layout = dual_layout();
        let offscreen = Rect::new(5000, 5000, 5100, 5100);
        assert_eq!(layout.best_match(&offscreen), layout.primary());
        assert_eq!(layout.containing(Point::new(-5000, 0)), layout.primary());
    }

    #[test]
    fn point_resolves_to_containing_monitor() {
        let layout = dual_layout();
        assert_eq!(layout.containing(Point::new(-1, -150)), Rect::new(-1280, -200, 0, 824));
        assert_eq!(layout.containing(Point::new(0, 0)), layout.primary());
    }

    #[test]
    fn resolution_is_deterministic() {
        let layout = dual_layout();
        let window = Rect::new(-640, 0, 640, 500); // Equal overlap on both
        let first = layout.best_match(&window);
        for _ in 0..5 {
            assert_eq!(layout.best_match(&window), first);
        }
        assert_eq!(first, Rect::new(0, 0, 1920, 1080));
    }
}
