//! Host window capability surface
//!
//! The AppBar handler never owns the window it docks. It reads and writes a
//! small set of attributes (geometry, chrome, topmost) and toggles which
//! events the window forwards to it. This module defines that surface and
//! the Win32 adapter implementing it.
//!
//! CRITICAL: the host forwards events on the thread that owns the window.
//! All handler entry points run on that thread.

use std::collections::HashSet;

use crate::domain::core::WindowGeometry;
use crate::platform::shell::CallbackId;

/// Opaque native window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(pub isize);

/// Border decoration of the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStyle {
    /// No caption and no border
    None,
    SingleBorder,
    ThreeDBorder,
    ToolWindow,
}

impl WindowStyle {
    /// Whether the window carries the tool-window frame once `self` is applied
    ///
    /// A borderless style keeps what the window had, so a tool window stays
    /// out of the taskbar and Alt-Tab while docked.
    pub fn keeps_tool_window(self, is_tool_window: bool) -> bool {
        match self {
            WindowStyle::ToolWindow => true,
            WindowStyle::None => is_tool_window,
            WindowStyle::SingleBorder | WindowStyle::ThreeDBorder => false,
        }
    }
}

/// Whether and how the user may resize the host window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    NoResize,
    CanMinimize,
    CanResize,
    CanResizeWithGrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Normal,
    Minimized,
    Maximized,
}

/// Chrome attributes changed while a window is docked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowChrome {
    pub style: WindowStyle,
    pub resize_mode: ResizeMode,
    pub state: WindowState,
    pub topmost: bool,
}

impl WindowChrome {
    /// Chrome of a docked AppBar: borderless, fixed size, normal, topmost
    pub fn docked() -> Self {
        Self {
            style: WindowStyle::None,
            resize_mode: ResizeMode::NoResize,
            state: WindowState::Normal,
            topmost: true,
        }
    }
}

impl Default for WindowChrome {
    fn default() -> Self {
        Self {
            style: WindowStyle::SingleBorder,
            resize_mode: ResizeMode::CanResize,
            state: WindowState::Normal,
            topmost: false,
        }
    }
}

/// Host events the handler can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostEvent {
    Closed,
    PointerEnter,
    PointerLeave,
}

/// Error types for host window operations
#[derive(Debug, thiserror::Error)]
pub enum WindowError {
    #[error("invalid window handle {0:?}")]
    InvalidHandle(WindowHandle),

    #[error("failed to position window {0:?}")]
    PositionFailed(WindowHandle),

    #[error("failed to change the style of window {0:?}")]
    StyleFailed(WindowHandle),
}

/// Attribute and event surface of the window being docked
pub trait HostWindow {
    fn handle(&self) -> WindowHandle;

    /// Current outer geometry in virtual-screen pixels
    fn geometry(&self) -> WindowGeometry;

    fn set_geometry(&mut self, geometry: WindowGeometry) -> Result<(), WindowError>;

    fn chrome(&self) -> WindowChrome;

    fn set_chrome(&mut self, chrome: WindowChrome) -> Result<(), WindowError>;

    fn set_topmost(&mut self, topmost: bool) -> Result<(), WindowError>;

    /// Starts forwarding `event` to the handler
    fn subscribe(&mut self, event: HostEvent);

    /// Stops forwarding `event`. Called at most once per subscription.
    fn unsubscribe(&mut self, event: HostEvent);

    /// Starts forwarding window messages carrying `callback` to the handler
    fn subscribe_messages(&mut self, callback: CallbackId);

    fn unsubscribe_messages(&mut self, callback: CallbackId);
}

/// Win32 adapter around a top-level window handle
///
/// Subscriptions are bookkeeping only: the window procedure that owns the
/// window asks [`Win32HostWindow::is_subscribed`] and
/// [`Win32HostWindow::routes_message`] before forwarding anything.
#[derive(Debug)]
pub struct Win32HostWindow {
    handle: WindowHandle,
    events: HashSet<HostEvent>,
    message_callback: Option<CallbackId>,
}

impl Win32HostWindow {
    pub fn new(handle: WindowHandle) -> Self {
        Self {
            handle,
            events: HashSet::new(),
            message_callback: None,
        }
    }

    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.events.contains(&event)
    }

    /// True if `message` is the callback message the handler listens for
    pub fn routes_message(&self, message: u32) -> bool {
        self.message_callback.is_some_and(|callback| callback.0 == message)
    }
}

#[cfg(windows)]
mod win32 {
    use super::*;
    use windows::Win32::Foundation::{HWND, RECT};
    use windows::Win32::UI::WindowsAndMessaging::*;

    use crate::platform::windows::win32_rect_to_rect;

    const CHROME_STYLE_MASK: WINDOW_STYLE = WINDOW_STYLE(
        WS_CAPTION.0 | WS_SYSMENU.0 | WS_THICKFRAME.0 | WS_MINIMIZEBOX.0 | WS_MAXIMIZEBOX.0,
    );

    impl Win32HostWindow {
        fn hwnd(&self) -> HWND {
            HWND(self.handle.0)
        }

        fn style(&self) -> WINDOW_STYLE {
            unsafe { WINDOW_STYLE(GetWindowLongW(self.hwnd(), GWL_STYLE) as u32) }
        }

        fn ex_style(&self) -> WINDOW_EX_STYLE {
            unsafe { WINDOW_EX_STYLE(GetWindowLongW(self.hwnd(), GWL_EXSTYLE) as u32) }
        }

        fn ensure_valid(&self) -> Result<(), WindowError> {
            if unsafe { IsWindow(self.hwnd()) }.as_bool() {
                Ok(())
            } else {
                Err(WindowError::InvalidHandle(self.handle))
            }
        }

        fn apply_state(&self, state: WindowState) {
            let command = match state {
                WindowState::Normal => SW_SHOWNORMAL,
                WindowState::Minimized => SW_SHOWMINIMIZED,
                WindowState::Maximized => SW_SHOWMAXIMIZED,
            };
            // ShowWindow reports the previous visibility, not success.
            let _ = unsafe { ShowWindow(self.hwnd(), command) };
        }
    }

    impl HostWindow for Win32HostWindow {
        fn handle(&self) -> WindowHandle {
            self.handle
        }

        fn geometry(&self) -> WindowGeometry {
            let mut rect = RECT::default();
            if unsafe { GetWindowRect(self.hwnd(), &mut rect) }.is_err() {
                tracing::warn!(handle = ?self.handle, "GetWindowRect failed");
            }
            win32_rect_to_rect(&rect).into()
        }

        fn set_geometry(&mut self, geometry: WindowGeometry) -> Result<(), WindowError> {
            self.ensure_valid()?;
            let rect = geometry.to_rect();
            unsafe {
                SetWindowPos(
                    self.hwnd(),
                    HWND(0), // Ignored due to SWP_NOZORDER flag
                    rect.left,
                    rect.top,
                    rect.width(),
                    rect.height(),
                    SWP_NOACTIVATE | SWP_NOZORDER,
                )
            }
            .map_err(|_| WindowError::PositionFailed(self.handle))
        }

        fn chrome(&self) -> WindowChrome {
            let style = self.style();
            let ex_style = self.ex_style();

            let window_style = if (style & WS_CAPTION).0 == 0 {
                WindowStyle::None
            } else if (ex_style & WS_EX_TOOLWINDOW).0 != 0 {
                WindowStyle::ToolWindow
            } else if (ex_style & WS_EX_CLIENTEDGE).0 != 0 {
                WindowStyle::ThreeDBorder
            } else {
                WindowStyle::SingleBorder
            };

            // A size grip is drawn by the client, Win32 cannot tell it apart
            // from a plain resizable frame.
            let resize_mode = if (style & WS_THICKFRAME).0 != 0 {
                ResizeMode::CanResize
            } else if (style & WS_MINIMIZEBOX).0 != 0 {
                ResizeMode::CanMinimize
            } else {
                ResizeMode::NoResize
            };

            let state = unsafe {
                if IsIconic(self.hwnd()).as_bool() {
                    WindowState::Minimized
                } else if IsZoomed(self.hwnd()).as_bool() {
                    WindowState::Maximized
                } else {
                    WindowState::Normal
                }
            };

            WindowChrome {
                style: window_style,
                resize_mode,
                state,
                topmost: (ex_style & WS_EX_TOPMOST).0 != 0,
            }
        }

        fn set_chrome(&mut self, chrome: WindowChrome) -> Result<(), WindowError> {
            self.ensure_valid()?;

            let current_ex_style = self.ex_style();
            let is_tool_window = (current_ex_style & WS_EX_TOOLWINDOW).0 != 0;
            let mut style = self.style() & !CHROME_STYLE_MASK;
            let mut ex_style = current_ex_style & !(WS_EX_TOOLWINDOW | WS_EX_CLIENTEDGE);
            if chrome.style.keeps_tool_window(is_tool_window) {
                ex_style |= WS_EX_TOOLWINDOW;
            }

            match chrome.style {
                WindowStyle::None => {}
                WindowStyle::SingleBorder => style |= WS_CAPTION | WS_SYSMENU,
                WindowStyle::ThreeDBorder => {
                    style |= WS_CAPTION | WS_SYSMENU;
                    ex_style |= WS_EX_CLIENTEDGE;
                }
                WindowStyle::ToolWindow => style |= WS_CAPTION | WS_SYSMENU,
            }

            match chrome.resize_mode {
                ResizeMode::NoResize => {}
                ResizeMode::CanMinimize => style |= WS_MINIMIZEBOX,
                ResizeMode::CanResize | ResizeMode::CanResizeWithGrip => {
                    style |= WS_THICKFRAME | WS_MINIMIZEBOX | WS_MAXIMIZEBOX
                }
            }

            unsafe {
                SetWindowLongW(self.hwnd(), GWL_STYLE, style.0 as i32);
                SetWindowLongW(self.hwnd(), GWL_EXSTYLE, ex_style.0 as i32);
            }

            self.apply_state(chrome.state);

            let insert_after = if chrome.topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
            unsafe {
                SetWindowPos(
                    self.hwnd(),
                    insert_after,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_FRAMECHANGED,
                )
            }
            .map_err(|_| WindowError::StyleFailed(self.handle))
        }

        fn set_topmost(&mut self, topmost: bool) -> Result<(), WindowError> {
            self.ensure_valid()?;
            let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
            unsafe {
                SetWindowPos(
                    self.hwnd(),
                    insert_after,
                    0,
                    0,
                    0,
                    0,
                    SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
                )
            }
            .map_err(|_| WindowError::PositionFailed(self.handle))
        }

        fn subscribe(&mut self, event: HostEvent) {
            self.events.insert(event);
        }

        fn unsubscribe(&mut self, event: HostEvent) {
            self.events.remove(&event);
        }

        fn subscribe_messages(&mut self, callback: CallbackId) {
            self.message_callback = Some(callback);
        }

        fn unsubscribe_messages(&mut self, callback: CallbackId) {
            if self.message_callback == Some(callback) {
                self.message_callback = None;
            }
        }
    }
}
