/*!
Yielding the topmost band to full-screen applications.

A bar concedes when a full-screen app occupies its monitor (or spans every
monitor), and reclaims topmost once none does.
*/

use std::sync::Weak;

use super::{DockInner, DockedWindow};
use crate::fullscreen::{FullScreenListener, MembershipChange};
use crate::types::{DockProperty, FullScreenApp, Lifecycle};

/// Tracker subscription for one docked window. Holds the window weakly.
pub(super) struct ConcessionListener {
  dock: Weak<DockInner>,
}

impl ConcessionListener {
  pub(super) fn new(dock: Weak<DockInner>) -> Self {
    Self { dock }
  }
}

impl FullScreenListener for ConcessionListener {
  fn membership_changed(&self, _change: &MembershipChange, apps: &[FullScreenApp]) {
    if let Some(inner) = self.dock.upgrade() {
      DockedWindow { inner }.apply_full_screen_state(apps);
    }
  }
}

impl DockedWindow {
  /// Concede or reclaim topmost for the given full-screen set.
  pub(super) fn apply_full_screen_state(&self, apps: &[FullScreenApp]) {
    let (device_name, topmost, lifecycle) =
      self.read(|s| (s.screen.device_name.clone(), s.topmost, s.lifecycle));
    if matches!(lifecycle, Lifecycle::Opening | Lifecycle::Closed) {
      return;
    }

    let occupied = apps
      .iter()
      .any(|app| app.screen.is_virtual || app.screen.device_name == device_name);

    if occupied && topmost {
      self.concede(&device_name);
    } else if !occupied && !topmost {
      self.reclaim(&device_name);
    }
  }

  fn concede(&self, device_name: &str) {
    log::debug!("{} on {device_name} conceding to full-screen app", self.handle());
    self.write(|s| s.topmost = false);
    self.emit_property(DockProperty::Topmost(false));

    if let Err(e) = self.ctx().platform.show_bottom_most(self.handle()) {
      log::warn!("Failed to lower {}: {e}", self.handle());
    }
  }

  fn reclaim(&self, device_name: &str) {
    log::debug!("{} on {device_name} returning to topmost", self.handle());
    self.write(|s| s.topmost = true);
    self.emit_property(DockProperty::Topmost(true));
    self.raise_to_top_most();
  }

  /// Put the window in the topmost band, forcing the insert-after of any
  /// position change delivered meanwhile.
  pub(super) fn raise_to_top_most(&self) {
    self.write(|s| s.raising = true);
    // May re-enter handle_message with a position-changing message
    if let Err(e) = self.ctx().platform.show_top_most(self.handle()) {
      log::warn!("Failed to raise {}: {e}", self.handle());
    }
    self.write(|s| s.raising = false);
  }
}
