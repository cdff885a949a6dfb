/*!
Platform abstraction trait.

This trait defines the contract between core code and platform implementations.
Core code only uses this trait - never platform-specific types directly.

Implementations must not call back into edgedock while holding their own locks:
z-order and bounds changes may synchronously deliver position-changing
messages to the docked window being moved.
*/

use crate::types::{AppBarResult, ProcessId, Rect, ScreenInfo, WindowHandle};

/// Frame styles relevant to full-screen classification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowStyle {
  /// `WS_CAPTION`
  pub caption: bool,
  /// `WS_THICKFRAME`
  pub thick_frame: bool,
}

impl WindowStyle {
  /// Windows with both a caption and a sizing frame carry non-client chrome
  /// that must be excluded before comparing against monitor bounds.
  pub const fn has_resizable_frame(self) -> bool {
    self.caption && self.thick_frame
  }
}

/// Native windowing operations.
pub trait Platform: Send + Sync + 'static {
  /// ID of the process edgedock runs in.
  fn current_process_id(&self) -> ProcessId;

  /// Current foreground window, if any.
  fn foreground_window(&self) -> Option<WindowHandle>;

  /// Outer window bounds in screen pixels.
  fn window_rect(&self, window: WindowHandle) -> AppBarResult<Rect>;

  /// Client area bounds mapped to screen pixels.
  fn client_rect_on_screen(&self, window: WindowHandle) -> AppBarResult<Rect>;

  fn window_style(&self, window: WindowHandle) -> WindowStyle;

  /// Process owning the window. None if the window is gone.
  fn window_process_id(&self, window: WindowHandle) -> Option<ProcessId>;

  fn is_window(&self, window: WindowHandle) -> bool;

  fn is_visible(&self, window: WindowHandle) -> bool;

  fn is_minimized(&self, window: WindowHandle) -> bool;

  fn class_name(&self, window: WindowHandle) -> AppBarResult<String>;

  /// Whether the compositor hides the window despite its visibility flags.
  ///
  /// Fails on platforms without a compositor cloak attribute.
  fn is_cloaked(&self, window: WindowHandle) -> AppBarResult<bool>;

  /// Enumerate physical monitors. Uncached; see [`crate::MonitorCache`].
  fn monitors(&self) -> AppBarResult<Vec<ScreenInfo>>;

  /// Device name of the monitor nearest to the window.
  fn monitor_from_window(&self, window: WindowHandle) -> Option<String>;

  /// System DPI scale (1.0 = 96 DPI).
  fn system_dpi_scale(&self) -> f64;

  /// DPI scale of the monitor the window is on.
  fn window_dpi_scale(&self, window: WindowHandle) -> Option<f64>;

  /// Move (and optionally resize) without changing z-order or activation.
  fn set_window_bounds(&self, window: WindowHandle, rect: Rect, resize: bool) -> AppBarResult<()>;

  /// Show the window and place it in the topmost band.
  fn show_top_most(&self, window: WindowHandle) -> AppBarResult<()>;

  /// Send the window to the bottom of the z-order without activating it.
  fn show_bottom_most(&self, window: WindowHandle) -> AppBarResult<()>;

  fn set_visible(&self, window: WindowHandle, visible: bool) -> AppBarResult<()>;

  /// Keep the window out of Alt-Tab and task switchers.
  fn hide_from_tasks(&self, window: WindowHandle) -> AppBarResult<()>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resizable_frame_needs_both_styles() {
    let both = WindowStyle {
      caption: true,
      thick_frame: true,
    };
    let caption_only = WindowStyle {
      caption: true,
      thick_frame: false,
    };
    assert!(both.has_resizable_frame());
    assert!(!caption_only.has_resizable_frame());
    assert!(!WindowStyle::default().has_resizable_frame());
  }
}
