//! Scripted shell, monitors and host window for tests
//!
//! The fake shell mimics how the real one keeps a taskbar clear: it clips the
//! side of a requested rectangle that overlaps the taskbar, on query and
//! again on set. Another claimant can be simulated by capping the extent the
//! shell grants.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::domain::core::{Point, Rect, WindowGeometry};
use crate::domain::edge::ScreenEdge;
use crate::platform::monitors::{MonitorError, MonitorLayout, MonitorResolver};
use crate::platform::shell::{CallbackId, ShellAppBar, ShellError};
use crate::platform::window::{HostEvent, HostWindow, WindowChrome, WindowError, WindowHandle};

/// One request received by [`FakeShell`]
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCall {
    RegisterCallback(String),
    Register(CallbackId),
    QueryPos(ScreenEdge, Rect),
    SetPos(ScreenEdge, Rect),
    Remove,
    SetAutoHide {
        edge: ScreenEdge,
        monitor: Rect,
        enable: bool,
    },
    Activate,
    WindowPosChanged,
}

#[derive(Debug, Default)]
pub struct FakeShell {
    pub refuse_register: bool,
    pub refuse_auto_hide: bool,
    /// Edge and bounds of a taskbar the shell keeps clear
    pub taskbar: Option<(ScreenEdge, Rect)>,
    /// Largest docked extent the shell grants on `SET_POS`
    pub max_extent: Option<i32>,
    pub registered: bool,
    pub auto_hide_claims: Vec<(ScreenEdge, Rect)>,
    pub calls: Vec<ShellCall>,
}

impl FakeShell {
    fn keep_taskbar_clear(&self, mut rect: Rect) -> Rect {
        if let Some((edge, taskbar)) = self.taskbar {
            if rect.intersection(&taskbar).is_some() {
                match edge {
                    ScreenEdge::Left => rect.left = rect.left.max(taskbar.right),
                    ScreenEdge::Right => rect.right = rect.right.min(taskbar.left),
                    ScreenEdge::Top => rect.top = rect.top.max(taskbar.bottom),
                    ScreenEdge::Bottom => rect.bottom = rect.bottom.min(taskbar.top),
                }
            }
        }
        rect
    }

    fn cap_extent(&self, edge: ScreenEdge, mut rect: Rect) -> Rect {
        if let Some(max) = self.max_extent {
            match edge {
                ScreenEdge::Left => rect.right = rect.right.min(rect.left + max),
                ScreenEdge::Right => rect.left = rect.left.max(rect.right - max),
                ScreenEdge::Top => rect.bottom = rect.bottom.min(rect.top + max),
                ScreenEdge::Bottom => rect.top = rect.top.max(rect.bottom - max),
            }
        }
        rect
    }

    /// Number of recorded calls matching `predicate`
    pub fn count(&self, predicate: impl Fn(&ShellCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }
}

impl ShellAppBar for FakeShell {
    fn register_callback_message(&mut self, name: &str) -> Result<CallbackId, ShellError> {
        self.calls.push(ShellCall::RegisterCallback(name.to_string()));
        Ok(CallbackId(0xC0DE))
    }

    fn register(&mut self, _window: WindowHandle, callback: CallbackId) -> bool {
        self.calls.push(ShellCall::Register(callback));
        if self.refuse_register || self.registered {
            return false;
        }
        self.registered = true;
        true
    }

    fn query_pos(&mut self, _window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect {
        self.calls.push(ShellCall::QueryPos(edge, rect));
        self.keep_taskbar_clear(rect)
    }

    fn set_pos(&mut self, _window: WindowHandle, edge: ScreenEdge, rect: Rect) -> Rect {
        self.calls.push(ShellCall::SetPos(edge, rect));
        let rect = self.keep_taskbar_clear(rect);
        self.cap_extent(edge, rect)
    }

    fn remove(&mut self, _window: WindowHandle) {
        self.calls.push(ShellCall::Remove);
        self.registered = false;
    }

    fn set_auto_hide_bar(
        &mut self,
        _window: WindowHandle,
        edge: ScreenEdge,
        monitor: Rect,
        enable: bool,
    ) -> bool {
        self.calls.push(ShellCall::SetAutoHide {
            edge,
            monitor,
            enable,
        });
        if enable {
            if self.refuse_auto_hide {
                return false;
            }
            self.auto_hide_claims.push((edge, monitor));
        } else {
            self.auto_hide_claims
                .retain(|claim| *claim != (edge, monitor));
        }
        true
    }

    fn activate(&mut self, _window: WindowHandle) {
        self.calls.push(ShellCall::Activate);
    }

    fn window_pos_changed(&mut self, _window: WindowHandle) {
        self.calls.push(ShellCall::WindowPosChanged);
    }
}

/// Attributes of the fake host window, shared with [`FakeMonitors`]
#[derive(Debug)]
pub struct WindowRecord {
    pub geometry: WindowGeometry,
    pub chrome: WindowChrome,
    pub events: HashSet<HostEvent>,
    pub subscription_log: Vec<(HostEvent, bool)>,
    pub message_callback: Option<CallbackId>,
}

#[derive(Debug)]
pub struct FakeWindow {
    handle: WindowHandle,
    pub record: Rc<RefCell<WindowRecord>>,
}

impl FakeWindow {
    pub fn rect(&self) -> Rect {
        self.record.borrow().geometry.to_rect()
    }

    pub fn is_subscribed(&self, event: HostEvent) -> bool {
        self.record.borrow().events.contains(&event)
    }

    /// How many times `event` was (un)subscribed
    pub fn subscription_count(&self, event: HostEvent, subscribed: bool) -> usize {
        self.record
            .borrow()
            .subscription_log
            .iter()
            .filter(|entry| **entry == (event, subscribed))
            .count()
    }
}

impl HostWindow for FakeWindow {
    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn geometry(&self) -> WindowGeometry {
        self.record.borrow().geometry
    }

    fn set_geometry(&mut self, geometry: WindowGeometry) -> Result<(), WindowError> {
        self.record.borrow_mut().geometry = geometry;
        Ok(())
    }

    fn chrome(&self) -> WindowChrome {
        self.record.borrow().chrome
    }

    fn set_chrome(&mut self, chrome: WindowChrome) -> Result<(), WindowError> {
        self.record.borrow_mut().chrome = chrome;
        Ok(())
    }

    fn set_topmost(&mut self, topmost: bool) -> Result<(), WindowError> {
        self.record.borrow_mut().chrome.topmost = topmost;
        Ok(())
    }

    fn subscribe(&mut self, event: HostEvent) {
        let mut record = self.record.borrow_mut();
        assert!(record.events.insert(event), "{event:?} subscribed twice");
        record.subscription_log.push((event, true));
    }

    fn unsubscribe(&mut self, event: HostEvent) {
        let mut record = self.record.borrow_mut();
        assert!(record.events.remove(&event), "{event:?} unsubscribed without subscription");
        record.subscription_log.push((event, false));
    }

    fn subscribe_messages(&mut self, callback: CallbackId) {
        let mut record = self.record.borrow_mut();
        assert!(record.message_callback.is_none(), "message hook added twice");
        record.message_callback = Some(callback);
    }

    fn unsubscribe_messages(&mut self, callback: CallbackId) {
        let mut record = self.record.borrow_mut();
        assert_eq!(record.message_callback, Some(callback), "message hook not installed");
        record.message_callback = None;
    }
}

/// Monitor topology that resolves the fake window by its current geometry
#[derive(Debug)]
pub struct FakeMonitors {
    pub layout: MonitorLayout,
    window: Rc<RefCell<WindowRecord>>,
}

impl MonitorResolver for FakeMonitors {
    fn from_rect(&self, rect: &Rect) -> Result<Rect, MonitorError> {
        Ok(self.layout.best_match(rect))
    }

    fn from_point(&self, point: Point) -> Result<Rect, MonitorError> {
        Ok(self.layout.containing(point))
    }

    fn from_window(&self, _window: WindowHandle) -> Result<Rect, MonitorError> {
        let rect = self.window.borrow().geometry.to_rect();
        Ok(self.layout.best_match(&rect))
    }
}

/// Builds a desktop with `monitors` (the first is primary) and one window
pub fn desktop(
    monitors: Vec<Rect>,
    window: WindowGeometry,
) -> (FakeShell, FakeMonitors, FakeWindow) {
    let record = Rc::new(RefCell::new(WindowRecord {
        geometry: window,
        chrome: WindowChrome::default(),
        events: HashSet::new(),
        subscription_log: Vec::new(),
        message_callback: None,
    }));

    let monitors = FakeMonitors {
        layout: MonitorLayout::new(monitors, 0).expect("fake desktop needs a monitor"),
        window: Rc::clone(&record),
    };
    let window = FakeWindow {
        handle: WindowHandle(0x1234),
        record,
    };

    (FakeShell::default(), monitors, window)
}
