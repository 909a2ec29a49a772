//! Docks a small window to a screen edge as a shell AppBar
//!
//! Usage: `edge-dock <left|top|right|bottom> [standard|autohide] [visible-margin] [hidden-margin]`
//!
//! Logging follows `RUST_LOG` and defaults to `info`.

use std::process::ExitCode;

use tracing_subscriber::prelude::*;

const DEFAULT_LOG_FILTER: &str = "info";

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    #[cfg(windows)]
    {
        match demo::run() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "edge-dock failed");
                ExitCode::FAILURE
            }
        }
    }

    #[cfg(not(windows))]
    {
        tracing::error!("edge-dock needs the Windows shell");
        ExitCode::FAILURE
    }
}

#[cfg(windows)]
mod demo {
    use std::cell::RefCell;

    use edge_dock::platform::monitors::{Win32Monitors, enumerate_monitors};
    use edge_dock::platform::shell::Win32Shell;
    use edge_dock::platform::window::{HostEvent, Win32HostWindow, WindowHandle};
    use edge_dock::{AppBarError, AppBarHandler, ConfigError, DesiredAttributes, PlacementOutcome};
    use tracing::{debug, info, warn};
    use windows::Win32::Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
    use windows::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows::Win32::UI::Input::KeyboardAndMouse::{TME_LEAVE, TRACKMOUSEEVENT, TrackMouseEvent};
    use windows::Win32::UI::WindowsAndMessaging::*;
    use windows::core::w;

    type Handler = AppBarHandler<Win32Shell, Win32Monitors, Win32HostWindow>;

    const WINDOW_WIDTH: i32 = 480;
    const WINDOW_HEIGHT: i32 = 320;

    thread_local! {
        // Owned by the UI thread; the window procedure reaches it from here.
        static HANDLER: RefCell<Option<Handler>> = const { RefCell::new(None) };
    }

    const USAGE: &str = concat!(
        "usage: edge-dock <left|top|right|bottom> ",
        "[standard|autohide] [visible-margin] [hidden-margin]"
    );

    #[derive(Debug, thiserror::Error)]
    pub enum DemoError {
        #[error("{0}\n{USAGE}")]
        Usage(#[from] ConfigError),

        #[error(transparent)]
        AppBar(#[from] AppBarError),

        #[error("Failed to register window class")]
        ClassRegistrationFailed,

        #[error("Failed to create window")]
        WindowCreationFailed,

        #[error("Win32 error: {0}")]
        Win32Error(String),
    }

    pub fn run() -> Result<(), DemoError> {
        let desired = DesiredAttributes::from_args(std::env::args().skip(1))?;

        match enumerate_monitors() {
            Ok(monitors) => {
                for monitor in &monitors {
                    info!(
                        index = monitor.index,
                        rect = %monitor.rect,
                        work_area = %monitor.work_area,
                        primary = monitor.is_primary,
                        "monitor"
                    );
                }
            }
            Err(e) => warn!(error = %e, "could not enumerate monitors"),
        }

        let hwnd = create_window()?;
        let handler = AppBarHandler::new(
            Win32Shell::new(),
            Win32Monitors::new(),
            Win32HostWindow::new(WindowHandle(hwnd.0)),
        )?;
        HANDLER.with(|cell| *cell.borrow_mut() = Some(handler));

        match with_handler(|handler| handler.place(&desired)) {
            Some(Ok(PlacementOutcome::Placed(rect))) => info!(%rect, "docked"),
            Some(Ok(PlacementOutcome::Rejected(rejection))) => {
                warn!(%rejection, "could not dock the window");
                release_handler();
                let _ = unsafe { DestroyWindow(hwnd) };
                return Ok(());
            }
            Some(Err(e)) => {
                release_handler();
                let _ = unsafe { DestroyWindow(hwnd) };
                return Err(e.into());
            }
            None => return Err(DemoError::Win32Error("handler unavailable".to_string())),
        }

        let _ = unsafe { ShowWindow(hwnd, SW_SHOWNOACTIVATE) };
        run_message_loop();

        release_handler();
        Ok(())
    }

    /// Runs `f` on the handler unless it is already borrowed further up the stack
    ///
    /// Win32 calls made by the handler send messages back to the window
    /// procedure synchronously; those re-entrant messages are left to
    /// `DefWindowProcW`.
    fn with_handler<R>(f: impl FnOnce(&mut Handler) -> R) -> Option<R> {
        HANDLER.with(|cell| {
            let mut handler = cell.try_borrow_mut().ok()?;
            handler.as_mut().map(f)
        })
    }

    /// Drops the handler, which removes any remaining registration
    fn release_handler() {
        let handler = HANDLER.with(|cell| cell.borrow_mut().take());
        drop(handler);
    }

    fn create_window() -> Result<HWND, DemoError> {
        unsafe {
            let module =
                GetModuleHandleW(None).map_err(|e| DemoError::Win32Error(format!("{:?}", e)))?;
            let instance: HINSTANCE = module.into();
            let class_name = w!("EdgeDockWindow");

            let wnd_class = WNDCLASSW {
                style: CS_HREDRAW | CS_VREDRAW,
                lpfnWndProc: Some(window_proc),
                hInstance: instance,
                hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
                lpszClassName: class_name,
                ..Default::default()
            };
            if RegisterClassW(&wnd_class) == 0 {
                return Err(DemoError::ClassRegistrationFailed);
            }

            let hwnd = CreateWindowExW(
                WS_EX_TOOLWINDOW,
                class_name,
                w!("Edge Dock"),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                WINDOW_WIDTH,
                WINDOW_HEIGHT,
                None,
                None,
                instance,
                None,
            );
            if hwnd.0 == 0 {
                return Err(DemoError::WindowCreationFailed);
            }

            Ok(hwnd)
        }
    }

    fn run_message_loop() {
        let mut msg = MSG::default();
        loop {
            let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            // 0 is WM_QUIT, -1 an error
            if result.0 == 0 || result.0 == -1 {
                break;
            }
            unsafe {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }

    fn track_mouse_leave(hwnd: HWND) {
        let mut track = TRACKMOUSEEVENT {
            cbSize: std::mem::size_of::<TRACKMOUSEEVENT>() as u32,
            dwFlags: TME_LEAVE,
            hwndTrack: hwnd,
            dwHoverTime: 0,
        };
        if let Err(e) = unsafe { TrackMouseEvent(&mut track) } {
            debug!(error = ?e, "TrackMouseEvent failed");
        }
    }

    unsafe extern "system" fn window_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        match msg {
            WM_MOUSEMOVE => {
                track_mouse_leave(hwnd);
                with_handler(|handler| {
                    if handler.host().is_subscribed(HostEvent::PointerEnter) {
                        handler.on_pointer_enter();
                    }
                });
                LRESULT(0)
            }
            WM_MOUSELEAVE => {
                with_handler(|handler| {
                    if handler.host().is_subscribed(HostEvent::PointerLeave) {
                        handler.on_pointer_leave();
                    }
                });
                LRESULT(0)
            }
            WM_ACTIVATE => {
                with_handler(|handler| handler.on_activated());
                unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
            }
            WM_WINDOWPOSCHANGED => {
                with_handler(|handler| handler.on_window_pos_changed());
                unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
            }
            WM_CLOSE => {
                with_handler(|handler| {
                    if handler.host().is_subscribed(HostEvent::Closed) {
                        handler.on_host_closed();
                    }
                });
                let _ = unsafe { DestroyWindow(hwnd) };
                LRESULT(0)
            }
            WM_DESTROY => {
                unsafe { PostQuitMessage(0) };
                LRESULT(0)
            }
            _ => {
                let handled = with_handler(|handler| {
                    handler.host().routes_message(msg)
                        && handler.on_shell_notification(msg, wparam.0, lparam.0)
                })
                .unwrap_or(false);

                if handled {
                    LRESULT(0)
                } else {
                    unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) }
                }
            }
        }
    }
}
