//! Native Win32 windows with an explicit device context style.
//!
//! The class style flag is the variable under test: it controls whether each
//! window allocates its own device context, shares the common one, or
//! inherits its parent's, and it is known to interact with surface and
//! swapchain creation in driver-specific ways.

use std::ffi::OsStr;
use std::io;
use std::iter::once;
use std::os::raw::c_void;
use std::os::windows::ffi::OsStrExt;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use raw_window_handle::{windows::WindowsHandle, HasRawWindowHandle, RawWindowHandle};
use winapi::shared::minwindef::{ATOM, HINSTANCE, LPARAM, LRESULT, UINT, WPARAM};
use winapi::shared::windef::HWND;
use winapi::um::libloaderapi::GetModuleHandleW;
use winapi::um::winuser::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, LoadCursorW, RegisterClassExW,
    UnregisterClassW, CS_HREDRAW, CS_OWNDC, CS_PARENTDC, CS_VREDRAW, IDC_ARROW, WNDCLASSEXW,
    WS_OVERLAPPEDWINDOW, WS_VISIBLE,
};

use crate::harness::DeviceContextStyle;
use crate::{ChurnError, Result};

/// Windows are fixed-size, the extent reported back through the surface
/// capabilities is what the swapchain is created with.
const WINDOW_SIZE: i32 = 500;

static CLASS_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// The window procedure performs default message handling only.
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: UINT,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    DefWindowProcW(hwnd, msg, wparam, lparam)
}

fn wide_null(s: &str) -> Vec<u16> {
    OsStr::new(s).encode_wide().chain(once(0)).collect()
}

impl DeviceContextStyle {
    fn class_style_bits(self) -> UINT {
        match self {
            DeviceContextStyle::OwnDc => CS_OWNDC,
            DeviceContextStyle::Shared => 0,
            DeviceContextStyle::ParentDc => CS_PARENTDC,
        }
    }
}

/// A registered window class carrying one device context style. Registered
/// once per style and kept alive for the whole style loop.
#[derive(Debug)]
pub struct WindowClass {
    atom: ATOM,
    hinstance: HINSTANCE,
}

impl WindowClass {
    /// Registers a window class with the given device context style.
    ///
    /// Class names are made process-unique so repeated registration, e.g.
    /// from tests, never collides with an earlier registration.
    pub fn register(style: DeviceContextStyle) -> Result<WindowClass> {
        let name = wide_null(&format!(
            "surface_churn_{}_{}",
            style.class_suffix(),
            CLASS_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        let hinstance = unsafe { GetModuleHandleW(ptr::null()) };

        let class = WNDCLASSEXW {
            cbSize: std::mem::size_of::<WNDCLASSEXW>() as UINT,
            style: CS_HREDRAW | CS_VREDRAW | style.class_style_bits(),
            lpfnWndProc: Some(window_proc),
            cbClsExtra: 0,
            cbWndExtra: 0,
            hInstance: hinstance,
            hIcon: ptr::null_mut(),
            hCursor: unsafe { LoadCursorW(ptr::null_mut(), IDC_ARROW) },
            hbrBackground: ptr::null_mut(),
            lpszMenuName: ptr::null(),
            lpszClassName: name.as_ptr(),
            hIconSm: ptr::null_mut(),
        };

        let atom = unsafe { RegisterClassExW(&class) };
        if atom == 0 {
            return Err(ChurnError::ClassRegistration(io::Error::last_os_error()));
        }

        Ok(Self { atom, hinstance })
    }
}

impl Drop for WindowClass {
    fn drop(&mut self) {
        unsafe {
            UnregisterClassW(self.atom as usize as *const u16, self.hinstance);
        };
    }
}

/// One native window of a pre-registered class, visible and fixed at
/// 500x500. Lives for a single test iteration.
#[derive(Debug)]
pub struct Window {
    hwnd: HWND,
    hinstance: HINSTANCE,
}

impl Window {
    /// Creates a new visible top-level `Window` of the given class.
    pub fn create(class: &WindowClass, title: &str) -> Result<Window> {
        let title = wide_null(title);

        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class.atom as usize as *const u16,
                title.as_ptr(),
                WS_OVERLAPPEDWINDOW | WS_VISIBLE,
                0,
                0,
                WINDOW_SIZE,
                WINDOW_SIZE,
                ptr::null_mut(),
                ptr::null_mut(),
                class.hinstance,
                ptr::null_mut(),
            )
        };
        if hwnd.is_null() {
            return Err(ChurnError::WindowCreation(io::Error::last_os_error()));
        }

        Ok(Self {
            hwnd,
            hinstance: class.hinstance,
        })
    }
}

unsafe impl HasRawWindowHandle for Window {
    fn raw_window_handle(&self) -> RawWindowHandle {
        RawWindowHandle::Windows(WindowsHandle {
            hwnd: self.hwnd as *mut c_void,
            hinstance: self.hinstance as *mut c_void,
            ..WindowsHandle::empty()
        })
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        unsafe {
            DestroyWindow(self.hwnd);
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_strings_are_nul_terminated() {
        let wide = wide_null("class=CS_OWNDC");
        assert_eq!(wide.last(), Some(&0));
        assert_eq!(wide.len(), "class=CS_OWNDC".len() + 1);
    }

    #[test]
    fn style_bits_differ_per_style() {
        assert_eq!(DeviceContextStyle::OwnDc.class_style_bits(), CS_OWNDC);
        assert_eq!(DeviceContextStyle::Shared.class_style_bits(), 0);
        assert_eq!(DeviceContextStyle::ParentDc.class_style_bits(), CS_PARENTDC);
    }
}
