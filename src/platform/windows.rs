//! General Windows platform utilities
//!
//! This module contains Win32 helper functions that don't fit into
//! other specialized platform modules.

use crate::domain::core::Rect;
use windows::Win32::Foundation::RECT;

/// Converts a domain rectangle to a Windows RECT structure
pub fn rect_to_win32_rect(rect: &Rect) -> RECT {
    RECT {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

/// Converts a Windows RECT to a domain rectangle
pub fn win32_rect_to_rect(rect: &RECT) -> Rect {
    Rect::new(rect.left, rect.top, rect.right, rect.bottom)
}

/// Encodes a string as a NUL-terminated UTF-16 buffer for `PCWSTR` arguments
pub fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}
