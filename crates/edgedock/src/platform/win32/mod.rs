/*!
Win32 implementation of [`Platform`].

Handles:
- Foreground, rect, style and process queries
- Monitor enumeration and monitor-from-window
- System and per-window DPI
- Bounds, z-order, visibility and tool-window style changes
- The window subclass that feeds native messages to a docked window (`subclass.rs`)
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

mod subclass;

pub use subclass::{attach, SubclassGuard};

use std::ffi::c_void;

use windows::core::BOOL;
use windows::Win32::Foundation::{HWND, LPARAM, POINT, RECT};
use windows::Win32::Graphics::Dwm::{DwmGetWindowAttribute, DWMWA_CLOAKED};
use windows::Win32::Graphics::Gdi::{
  ClientToScreen, EnumDisplayMonitors, GetMonitorInfoW, MonitorFromWindow, HDC, HMONITOR,
  MONITORINFO, MONITORINFOEXW, MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::HiDpi::{GetDpiForSystem, GetDpiForWindow};
use windows::Win32::UI::WindowsAndMessaging::{
  GetClassNameW, GetClientRect, GetForegroundWindow, GetWindowLongW, GetWindowRect,
  GetWindowThreadProcessId, IsIconic, IsWindow, IsWindowVisible, SetWindowLongW, SetWindowPos,
  ShowWindow, GWL_EXSTYLE, GWL_STYLE, HWND_BOTTOM, HWND_TOPMOST, SET_WINDOW_POS_FLAGS,
  SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SW_HIDE,
  SW_SHOWNOACTIVATE, WS_CAPTION, WS_EX_APPWINDOW, WS_EX_TOOLWINDOW, WS_THICKFRAME,
};

use super::{Platform, WindowStyle};
use crate::dpi::scale_from_dpi;
use crate::types::{AppBarError, AppBarResult, ProcessId, Rect, ScreenInfo, WindowHandle};

/// `MONITORINFOF_PRIMARY`
const MONITOR_PRIMARY_FLAG: u32 = 1;

pub(crate) fn hwnd(window: WindowHandle) -> HWND {
  HWND(window.0 as *mut c_void)
}

pub(crate) fn window_handle(hwnd: HWND) -> WindowHandle {
  WindowHandle(hwnd.0 as isize)
}

fn to_rect(rect: RECT) -> Rect {
  Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom)
}

fn wide_to_string(buffer: &[u16]) -> String {
  let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
  String::from_utf16_lossy(buffer.get(..len).unwrap_or_default())
}

/// The native windowing layer on Windows.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsPlatform;

impl WindowsPlatform {
  pub const fn new() -> Self {
    Self
  }

  fn set_pos(
    window: WindowHandle,
    insert_after: Option<HWND>,
    rect: Rect,
    flags: SET_WINDOW_POS_FLAGS,
  ) -> AppBarResult<()> {
    // Z-order changes may re-enter the docked window's message handler
    unsafe {
      SetWindowPos(
        hwnd(window),
        insert_after,
        rect.left,
        rect.top,
        rect.width(),
        rect.height(),
        flags,
      )
    }
    .map_err(|e| AppBarError::native("SetWindowPos", e))
  }
}

impl Platform for WindowsPlatform {
  fn current_process_id(&self) -> ProcessId {
    ProcessId(unsafe { GetCurrentProcessId() })
  }

  fn foreground_window(&self) -> Option<WindowHandle> {
    let hwnd = unsafe { GetForegroundWindow() };
    (!hwnd.is_invalid()).then(|| window_handle(hwnd))
  }

  fn window_rect(&self, window: WindowHandle) -> AppBarResult<Rect> {
    let mut rect = RECT::default();
    unsafe { GetWindowRect(hwnd(window), &mut rect) }
      .map_err(|e| AppBarError::native("GetWindowRect", e))?;
    Ok(to_rect(rect))
  }

  fn client_rect_on_screen(&self, window: WindowHandle) -> AppBarResult<Rect> {
    let hwnd = hwnd(window);
    let mut rect = RECT::default();
    unsafe { GetClientRect(hwnd, &mut rect) }
      .map_err(|e| AppBarError::native("GetClientRect", e))?;

    let mut origin = POINT {
      x: rect.left,
      y: rect.top,
    };
    if !unsafe { ClientToScreen(hwnd, &mut origin) }.as_bool() {
      return Err(AppBarError::native("ClientToScreen", "mapping failed"));
    }
    Ok(Rect::new(
      origin.x,
      origin.y,
      rect.right - rect.left,
      rect.bottom - rect.top,
    ))
  }

  fn window_style(&self, window: WindowHandle) -> WindowStyle {
    let style = unsafe { GetWindowLongW(hwnd(window), GWL_STYLE) } as u32;
    WindowStyle {
      caption: style & WS_CAPTION.0 == WS_CAPTION.0,
      thick_frame: style & WS_THICKFRAME.0 != 0,
    }
  }

  fn window_process_id(&self, window: WindowHandle) -> Option<ProcessId> {
    let mut pid = 0u32;
    let thread =
      unsafe { GetWindowThreadProcessId(hwnd(window), Some(std::ptr::from_mut(&mut pid))) };
    (thread != 0).then_some(ProcessId(pid))
  }

  fn is_window(&self, window: WindowHandle) -> bool {
    unsafe { IsWindow(Some(hwnd(window))) }.as_bool()
  }

  fn is_visible(&self, window: WindowHandle) -> bool {
    unsafe { IsWindowVisible(hwnd(window)) }.as_bool()
  }

  fn is_minimized(&self, window: WindowHandle) -> bool {
    unsafe { IsIconic(hwnd(window)) }.as_bool()
  }

  fn class_name(&self, window: WindowHandle) -> AppBarResult<String> {
    let mut buffer = [0u16; 256];
    let len = unsafe { GetClassNameW(hwnd(window), &mut buffer) };
    if len <= 0 {
      return Err(AppBarError::native("GetClassNameW", "no class name"));
    }
    Ok(wide_to_string(&buffer))
  }

  fn is_cloaked(&self, window: WindowHandle) -> AppBarResult<bool> {
    let mut cloaked: u32 = 0;
    unsafe {
      DwmGetWindowAttribute(
        hwnd(window),
        DWMWA_CLOAKED,
        std::ptr::from_mut(&mut cloaked).cast::<c_void>(),
        std::mem::size_of::<u32>() as u32,
      )
    }
    .map_err(|e| AppBarError::native("DwmGetWindowAttribute", e))?;
    Ok(cloaked != 0)
  }

  fn monitors(&self) -> AppBarResult<Vec<ScreenInfo>> {
    let mut screens: Vec<ScreenInfo> = Vec::new();
    let ok = unsafe {
      EnumDisplayMonitors(
        None,
        None,
        Some(enum_monitors_callback),
        LPARAM(std::ptr::from_mut(&mut screens) as isize),
      )
    };
    if !ok.as_bool() {
      return Err(AppBarError::native("EnumDisplayMonitors", "enumeration failed"));
    }
    if screens.is_empty() {
      return Err(AppBarError::NoMonitors);
    }
    log::debug!("Enumerated {} monitors", screens.len());
    Ok(screens)
  }

  fn monitor_from_window(&self, window: WindowHandle) -> Option<String> {
    let monitor = unsafe { MonitorFromWindow(hwnd(window), MONITOR_DEFAULTTONEAREST) };
    if monitor.is_invalid() {
      return None;
    }
    monitor_info(monitor).map(|screen| screen.device_name)
  }

  fn system_dpi_scale(&self) -> f64 {
    scale_from_dpi(unsafe { GetDpiForSystem() })
  }

  fn window_dpi_scale(&self, window: WindowHandle) -> Option<f64> {
    let dpi = unsafe { GetDpiForWindow(hwnd(window)) };
    (dpi != 0).then(|| scale_from_dpi(dpi))
  }

  fn set_window_bounds(&self, window: WindowHandle, rect: Rect, resize: bool) -> AppBarResult<()> {
    let mut flags = SWP_NOZORDER | SWP_NOACTIVATE;
    if !resize {
      flags |= SWP_NOSIZE;
    }
    Self::set_pos(window, None, rect, flags)
  }

  fn show_top_most(&self, window: WindowHandle) -> AppBarResult<()> {
    Self::set_pos(
      window,
      Some(HWND_TOPMOST),
      Rect::default(),
      SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_SHOWWINDOW,
    )
  }

  fn show_bottom_most(&self, window: WindowHandle) -> AppBarResult<()> {
    Self::set_pos(
      window,
      Some(HWND_BOTTOM),
      Rect::default(),
      SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE,
    )
  }

  fn set_visible(&self, window: WindowHandle, visible: bool) -> AppBarResult<()> {
    let command = if visible { SW_SHOWNOACTIVATE } else { SW_HIDE };
    // Returns the previous visibility, not success
    let _was_visible = unsafe { ShowWindow(hwnd(window), command) };
    Ok(())
  }

  fn hide_from_tasks(&self, window: WindowHandle) -> AppBarResult<()> {
    let hwnd = hwnd(window);
    let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;
    let updated = (ex_style | WS_EX_TOOLWINDOW.0) & !WS_EX_APPWINDOW.0;
    if updated != ex_style {
      unsafe { SetWindowLongW(hwnd, GWL_EXSTYLE, updated as i32) };
    }
    Ok(())
  }
}

fn monitor_info(monitor: HMONITOR) -> Option<ScreenInfo> {
  let mut info = MONITORINFOEXW::default();
  info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

  let ok = unsafe {
    GetMonitorInfoW(
      monitor,
      std::ptr::from_mut(&mut info).cast::<MONITORINFO>(),
    )
  };
  if !ok.as_bool() {
    return None;
  }

  let mut screen = ScreenInfo::new(
    wide_to_string(&info.szDevice),
    to_rect(info.monitorInfo.rcMonitor),
    info.monitorInfo.dwFlags & MONITOR_PRIMARY_FLAG != 0,
  );
  screen.work_area = to_rect(info.monitorInfo.rcWork);
  Some(screen)
}

/// Collects each monitor into the `Vec<ScreenInfo>` behind `lparam`.
unsafe extern "system" fn enum_monitors_callback(
  monitor: HMONITOR,
  _hdc: HDC,
  _clip: *mut RECT,
  lparam: LPARAM,
) -> BOOL {
  // SAFETY: lparam is the &mut Vec passed to EnumDisplayMonitors above
  let screens = unsafe { &mut *(lparam.0 as *mut Vec<ScreenInfo>) };
  match monitor_info(monitor) {
    Some(screen) => screens.push(screen),
    None => log::debug!("Skipping monitor {monitor:?}: no info"),
  }
  // Continue enumeration even if one monitor fails
  BOOL::from(true)
}
