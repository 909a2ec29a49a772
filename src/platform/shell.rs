//! Shell AppBar protocol bridge
//!
//! Wraps the shell's AppBar messages behind the [`ShellAppBar`] trait so the
//! handler can be driven by a scripted shell in tests. The bridge is pure
//! request/response and keeps no state of its own.
//!
//! Every request travels in a fixed-size, versioned record
//! (`APPBARDATA`). [`AppBarRecord`] is the plain Rust form of that record;
//! packing and unpacking happen only at the native call site.

use crate::domain::core::Rect;
use crate::domain::edge::ScreenEdge;
use crate::platform::window::WindowHandle;

/// Window message identifier the shell uses to notify this handler
///
/// Obtained once per handler and constant for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(pub u32);

/// Notification codes carried in `wParam` of the callback message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellNotification {
    /// Taskbar auto-hide or always-on-top state changed
    StateChange = 0,
    /// Layout of the taskbar or another AppBar changed
    PosChanged = 1,
    /// A full-screen application opened (`lParam != 0`) or closed
    FullScreenApp = 2,
    WindowArrange = 3,
}

impl ShellNotification {
    pub fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(ShellNotification::StateChange),
            1 => Some(ShellNotification::PosChanged),
            2 => Some(ShellNotification::FullScreenApp),
            3 => Some(ShellNotification::WindowArrange),
            _ => None,
        }
    }
}

/// Shell message identifiers (`ABM_*`)
pub mod message {
    pub const NEW: u32 = 0x00;
    pub const REMOVE: u32 = 0x01;
    pub const QUERY_POS: u32 = 0x02;
    pub const SET_POS: u32 = 0x03;
    pub const ACTIVATE: u32 = 0x06;
    pub const WINDOW_POS_CHANGED: u32 = 0x09;
    pub const SET_AUTO_HIDE_BAR_EX: u32 = 0x0C;
}

/// Plain form of the record exchanged with the shell
///
/// Which fields a message reads depends on the message: `NEW` uses the
/// callback message, `QUERY_POS`/`SET_POS` use edge and rectangle,
/// `SET_AUTO_HIDE_BAR_EX` uses edge, the monitor rectangle and `param`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AppBarRecord {
    pub window: WindowHandle,
    pub callback_message: u32,
    pub edge: u32,
    pub rect: Rect,
    pub param: isize,
}

impl AppBarRecord {
    pub fn for_window(window: WindowHandle) -> Self {
        Self {
            window,
            ..Default::default()
        }
    }

    pub fn with_callback(mut self, callback: CallbackId) -> Self {
        self.callback_message = callback.0;
        self
    }

    pub fn with_edge(mut self, edge: ScreenEdge, rect: Rect) -> Self {
        self.edge = edge.code();
        self.rect = rect;
        self
    }

    pub fn with_param(mut self, param: isize) -> Self {
        self.param = param;
        self
    }
}

/// Error types for shell operations
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("failed to register callback message '{0}'")]
    CallbackRegistrationFailed(String),
}

/// Request/response surface of the shell AppBar protocol
pub trait ShellAppBar {
    /// Allocates a window message identifier unique for `name`
    fn register_callback_message(&mut self, name: &str) -> Result<CallbackId, ShellError>;

    /// Registers `window` as an AppBar (`ABM_NEW`)
    fn register(&mut self, window: WindowHandle, callback: CallbackId) -> bool;

    /// Asks where a bar on `edge` may go (`ABM_QUERYPOS`); advisory
    fn query_pos(&mut self, window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect;

    /// Reserves space for a bar on `edge` (`ABM_SETPOS`); authoritative
    fn set_pos(&mut self, window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect;

    /// Unregisters `window` (`ABM_REMOVE`). Documented to always succeed.
    fn remove(&mut self, window: WindowHandle);

    /// Claims or releases the auto-hide slot of `edge` on `monitor`
    /// (`ABM_SETAUTOHIDEBAREX`)
    fn set_auto_hide_bar(
        &mut self,
        window: WindowHandle,
        edge: ScreenEdge,
        monitor: Rect,
        enable: bool,
    ) -> bool;

    /// Tells the shell the bar window was activated (`ABM_ACTIVATE`)
    fn activate(&mut self, window: WindowHandle);

    /// Tells the shell the bar window moved (`ABM_WINDOWPOSCHANGED`)
    fn window_pos_changed(&mut self, window: WindowHandle);
}

/// Shell bridge backed by `SHAppBarMessage`
#[derive(Debug, Default)]
pub struct Win32Shell;

impl Win32Shell {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
mod win32 {
    use super::*;
    use windows::Win32::Foundation::{HWND, LPARAM};
    use windows::Win32::UI::Shell::{APPBARDATA, SHAppBarMessage};
    use windows::Win32::UI::WindowsAndMessaging::RegisterWindowMessageW;
    use windows::core::PCWSTR;

    use crate::platform::windows::{rect_to_win32_rect, to_wide, win32_rect_to_rect};

    impl AppBarRecord {
        /// Packs the record into the native layout
        fn to_native(self) -> APPBARDATA {
            APPBARDATA {
                cbSize: std::mem::size_of::<APPBARDATA>() as u32,
                hWnd: HWND(self.window.0),
                uCallbackMessage: self.callback_message,
                uEdge: self.edge,
                rc: rect_to_win32_rect(&self.rect),
                lParam: LPARAM(self.param),
            }
        }

        fn from_native(data: &APPBARDATA) -> Self {
            Self {
                window: WindowHandle(data.hWnd.0),
                callback_message: data.uCallbackMessage,
                edge: data.uEdge,
                rect: win32_rect_to_rect(&data.rc),
                param: data.lParam.0,
            }
        }
    }

    /// Sends one message and returns the raw result with the record as the
    /// shell left it
    fn send(message: u32, record: AppBarRecord) -> (usize, AppBarRecord) {
        let mut data = record.to_native();
        let result = unsafe { SHAppBarMessage(message, &mut data) };
        (result, AppBarRecord::from_native(&data))
    }

    impl ShellAppBar for Win32Shell {
        fn register_callback_message(&mut self, name: &str) -> Result<CallbackId, ShellError> {
            let wide = to_wide(name);
            let id = unsafe { RegisterWindowMessageW(PCWSTR(wide.as_ptr())) };
            if id == 0 {
                return Err(ShellError::CallbackRegistrationFailed(name.to_string()));
            }
            Ok(CallbackId(id))
        }

        fn register(&mut self, window: WindowHandle, callback: CallbackId) -> bool {
            let record = AppBarRecord::for_window(window).with_callback(callback);
            send(message::NEW, record).0 != 0
        }

        fn query_pos(&mut self, window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect {
            let record = AppBarRecord::for_window(window).with_edge(edge, rect);
            send(message::QUERY_POS, record).1.rect
        }

        fn set_pos(&mut self, window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect {
            let record = AppBarRecord::for_window(window).with_edge(edge, rect);
            send(message::SET_POS, record).1.rect
        }

        fn remove(&mut self, window: WindowHandle) {
            send(message::REMOVE, AppBarRecord::for_window(window));
        }

        fn set_auto_hide_bar(
            &mut self,
            window: WindowHandle,
            edge: ScreenEdge,
            monitor: Rect,
            enable: bool,
        ) -> bool {
            let record = AppBarRecord::for_window(window)
                .with_edge(edge, monitor)
                .with_param(isize::from(enable));
            send(message::SET_AUTO_HIDE_BAR_EX, record).0 != 0
        }

        fn activate(&mut self, window: WindowHandle) {
            send(message::ACTIVATE, AppBarRecord::for_window(window));
        }

        fn window_pos_changed(&mut self, window: WindowHandle) {
            send(message::WINDOW_POS_CHANGED, AppBarRecord::for_window(window));
        }
    }
}
