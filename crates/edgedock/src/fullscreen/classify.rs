/*!
Full-screen classification of a single window.

A window is full-screen when its bounds exactly equal a monitor's bounds (or,
with more than one monitor, the virtual screen's), and it is a real,
visible, uncloaked application window from another process.
*/

use crate::config::Config;
use crate::platform::Platform;
use crate::screens::MonitorCache;
use crate::types::{FullScreenApp, Rect, WindowHandle};

/// Bounds used for comparison: the client area for framed, resizable windows
/// (their non-client chrome overhangs the monitor), the window rect otherwise.
fn comparison_rect(platform: &dyn Platform, window: WindowHandle) -> Option<Rect> {
  let result = if platform.window_style(window).has_resizable_frame() {
    platform.client_rect_on_screen(window)
  } else {
    platform.window_rect(window)
  };
  match result {
    Ok(rect) => Some(rect),
    Err(e) => {
      log::debug!("No bounds for {window}: {e}");
      None
    }
  }
}

/// Check the window is something that can legitimately be full-screen.
fn is_eligible(platform: &dyn Platform, config: &Config, window: WindowHandle) -> bool {
  if platform.window_process_id(window) == Some(platform.current_process_id()) {
    return false;
  }

  if !platform.is_window(window) || !platform.is_visible(window) || platform.is_minimized(window) {
    return false;
  }

  match platform.class_name(window) {
    Ok(class) if config.is_desktop_class(&class) => return false,
    Ok(_) => {}
    Err(e) => log::debug!("Class name unavailable for {window}: {e}"),
  }

  match platform.is_cloaked(window) {
    Ok(cloaked) => !cloaked,
    Err(e) => {
      log::debug!("Cloak query failed for {window}, assuming visible: {e}");
      true
    }
  }
}

/// Classify `window`, returning the monitor it fills.
pub(crate) fn classify(
  platform: &dyn Platform,
  monitors: &MonitorCache,
  config: &Config,
  window: WindowHandle,
) -> Option<FullScreenApp> {
  if window.is_null() {
    return None;
  }

  let rect = comparison_rect(platform, window)?;
  let screens = match monitors.with_virtual() {
    Ok(screens) => screens,
    Err(e) => {
      log::warn!("Cannot classify {window}: {e}");
      return None;
    }
  };

  let screen = screens.into_iter().find(|s| s.bounds == rect)?;
  if !is_eligible(platform, config, window) {
    return None;
  }

  Some(FullScreenApp {
    handle: window,
    screen,
    rect,
  })
}
