/*!
Window subclass that routes native messages into a [`DockedWindow`].

[`attach`] installs the subclass; the returned [`SubclassGuard`] removes it
on drop. Messages are decoded into [`WindowMessage`] values; consumed ones
return 0, the rest continue to the original window procedure.
*/

#![allow(unsafe_code)]
#![allow(clippy::cast_possible_truncation)]

use std::ptr::NonNull;

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::Shell::{DefSubclassProc, RemoveWindowSubclass, SetWindowSubclass};
use windows::Win32::UI::WindowsAndMessaging::{
  SWP_NOZORDER, WINDOWPOS, WM_ACTIVATE, WM_CLOSE, WM_DEVICECHANGE, WM_DISPLAYCHANGE,
  WM_DPICHANGED, WM_DWMCOMPOSITIONCHANGED, WM_NCDESTROY, WM_WINDOWPOSCHANGED,
  WM_WINDOWPOSCHANGING,
};

use super::{hwnd, window_handle};
use crate::dock::{
  CloseDecision, DockedWindow, InsertAfter, PendingPosition, RegistryNotification, WindowMessage,
};
use crate::types::{AppBarError, AppBarResult, WindowHandle};

const SUBCLASS_ID: usize = 0xED6E;

// Reserved `hwndInsertAfter` values
const RAW_TOP: isize = 0;
const RAW_BOTTOM: isize = 1;
const RAW_TOPMOST: isize = -1;
const RAW_NOTOPMOST: isize = -2;

fn insert_after_from_raw(raw: isize) -> InsertAfter {
  match raw {
    RAW_TOP => InsertAfter::Top,
    RAW_BOTTOM => InsertAfter::Bottom,
    RAW_TOPMOST => InsertAfter::Topmost,
    RAW_NOTOPMOST => InsertAfter::NoTopmost,
    other => InsertAfter::Window(WindowHandle(other)),
  }
}

const fn insert_after_to_raw(insert_after: InsertAfter) -> isize {
  match insert_after {
    InsertAfter::Top => RAW_TOP,
    InsertAfter::Bottom => RAW_BOTTOM,
    InsertAfter::Topmost => RAW_TOPMOST,
    InsertAfter::NoTopmost => RAW_NOTOPMOST,
    InsertAfter::Window(window) => window.0,
  }
}

/// Decode every message except position-changing, which carries a
/// writable payload and is handled in place.
fn decode(
  msg: u32,
  wparam: usize,
  lparam: isize,
  registry_message: Option<u32>,
) -> Option<WindowMessage<'static>> {
  if registry_message == Some(msg) {
    return RegistryNotification::from_raw(wparam, lparam).map(|notification| {
      WindowMessage::Registry {
        message_id: msg,
        notification,
      }
    });
  }
  match msg {
    WM_ACTIVATE => Some(WindowMessage::Activate),
    WM_WINDOWPOSCHANGED => Some(WindowMessage::PositionChanged),
    WM_DPICHANGED => Some(WindowMessage::DpiChanged {
      dpi: (wparam & 0xFFFF) as u32,
    }),
    WM_DISPLAYCHANGE => Some(WindowMessage::DisplayChanged),
    WM_DEVICECHANGE => Some(WindowMessage::DeviceChanged {
      event: wparam as u32,
    }),
    WM_DWMCOMPOSITIONCHANGED => Some(WindowMessage::CompositionChanged),
    _ => None,
  }
}

/// Removes the subclass and releases its window reference on drop.
pub struct SubclassGuard {
  hwnd: HWND,
  dock: NonNull<DockedWindow>,
}

// SAFETY: the guard only stores the handle and a boxed DockedWindow, which is
// itself Send + Sync. Removal happens through RemoveWindowSubclass.
unsafe impl Send for SubclassGuard {}
unsafe impl Sync for SubclassGuard {}

impl std::fmt::Debug for SubclassGuard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubclassGuard")
      .field("window", &window_handle(self.hwnd))
      .finish_non_exhaustive()
  }
}

impl Drop for SubclassGuard {
  fn drop(&mut self) {
    // SAFETY: same procedure and id as installed; fails harmlessly if the
    // window already removed it on WM_NCDESTROY
    let removed = unsafe { RemoveWindowSubclass(self.hwnd, Some(subclass_proc), SUBCLASS_ID) };
    if removed.as_bool() {
      log::debug!("Removed subclass from {}", window_handle(self.hwnd));
    }
    // SAFETY: allocated in attach(); the subclass no longer references it
    drop(unsafe { Box::from_raw(self.dock.as_ptr()) });
  }
}

/// Route `dock`'s native messages into [`DockedWindow::handle_message`].
///
/// Must be called on the thread that owns the window. Keep the guard alive
/// for as long as the window is docked.
pub fn attach(dock: &DockedWindow) -> AppBarResult<SubclassGuard> {
  let hwnd = hwnd(dock.handle());
  let dock = NonNull::from(Box::leak(Box::new(dock.clone())));

  // SAFETY: the reference data outlives the subclass; see SubclassGuard::drop
  let installed =
    unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, dock.as_ptr() as usize) };
  if !installed.as_bool() {
    // SAFETY: never handed to the window
    drop(unsafe { Box::from_raw(dock.as_ptr()) });
    return Err(AppBarError::native("SetWindowSubclass", "installation failed"));
  }

  log::debug!("Attached to {}", window_handle(hwnd));
  Ok(SubclassGuard { hwnd, dock })
}

unsafe extern "system" fn subclass_proc(
  hwnd: HWND,
  msg: u32,
  wparam: WPARAM,
  lparam: LPARAM,
  _subclass_id: usize,
  ref_data: usize,
) -> LRESULT {
  // SAFETY: ref_data is the DockedWindow boxed in attach(), freed only after
  // the subclass is removed
  let dock = unsafe { &*(ref_data as *const DockedWindow) };

  match msg {
    WM_CLOSE => {
      if dock.request_close() == CloseDecision::Veto {
        return LRESULT(0);
      }
    }
    WM_NCDESTROY => {
      // SAFETY: removing our own subclass from inside its procedure is allowed
      let _removed = unsafe { RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID) };
    }
    WM_WINDOWPOSCHANGING if lparam.0 != 0 => {
      // SAFETY: lparam points to a WINDOWPOS per the WM_WINDOWPOSCHANGING contract
      let pos = unsafe { &mut *(lparam.0 as *mut WINDOWPOS) };
      let mut pending = PendingPosition {
        insert_after: insert_after_from_raw(pos.hwndInsertAfter.0 as isize),
        no_zorder: pos.flags.contains(SWP_NOZORDER),
      };
      dock.handle_message(WindowMessage::PositionChanging(&mut pending));
      pos.hwndInsertAfter = HWND(insert_after_to_raw(pending.insert_after) as *mut _);
    }
    _ => {
      if let Some(message) = decode(msg, wparam.0, lparam.0, dock.message_id()) {
        if dock.handle_message(message) {
          return LRESULT(0);
        }
      }
    }
  }

  // SAFETY: DefSubclassProc is safe when called from a subclass proc
  unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
}
