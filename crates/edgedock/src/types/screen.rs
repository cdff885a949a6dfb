/*! Monitor description used for docking and full-screen classification. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::Rect;

/// Device name given to the synthetic monitor spanning every display.
pub const VIRTUAL_SCREEN_NAME: &str = "VirtualScreen";

/// A physical monitor, or the synthetic virtual screen.
///
/// `device_name` is the monitor identity: two infos describe the same monitor
/// exactly when their device names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScreenInfo {
  pub device_name: String,
  /// Full monitor bounds in device pixels.
  pub bounds: Rect,
  /// Bounds minus space reserved by docked bars.
  pub work_area: Rect,
  pub primary: bool,
  /// True only for the synthetic all-monitor span.
  pub is_virtual: bool,
}

impl ScreenInfo {
  /// Physical monitor whose work area is its full bounds.
  pub fn new(device_name: impl Into<String>, bounds: Rect, primary: bool) -> Self {
    Self {
      device_name: device_name.into(),
      bounds,
      work_area: bounds,
      primary,
      is_virtual: false,
    }
  }

  /// Synthetic screen covering every monitor.
  ///
  /// Only meaningful with more than one monitor; returns `None` otherwise.
  pub fn virtual_screen(screens: &[ScreenInfo]) -> Option<ScreenInfo> {
    if screens.len() < 2 {
      return None;
    }
    let mut physical = screens.iter().filter(|s| !s.is_virtual);
    let first = physical.next()?.bounds;
    let bounds = physical.fold(first, |acc, s| acc.union(&s.bounds));
    Some(ScreenInfo {
      device_name: VIRTUAL_SCREEN_NAME.to_string(),
      bounds,
      work_area: bounds,
      primary: false,
      is_virtual: true,
    })
  }

  /// Check if both infos identify the same monitor.
  pub fn same_device(&self, other: &ScreenInfo) -> bool {
    self.device_name == other.device_name
  }
}
