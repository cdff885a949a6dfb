/*!
Native message reactions.

Platform glue decodes raw window messages into [`WindowMessage`] and feeds
them to [`DockedWindow::handle_message`]. The return value says whether the
message was consumed; unconsumed messages continue to default processing.
*/

use super::DockedWindow;
use crate::dpi::scale_from_dpi;
use crate::types::{DockMode, DockProperty, Lifecycle, ScreenInfo};

/// `DBT_DEVNODES_CHANGED`: a device was added or removed.
pub const DEVNODES_CHANGED: u32 = 0x0007;

/// Notifications the registry sends on a bar's message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryNotification {
  /// Taskbar auto-hide or always-on-top state changed.
  StateChange,
  /// Another bar moved or the work area changed; re-request a position.
  PositionChanged,
  /// A full-screen app opened or closed (the registry's own signal; the
  /// tracker is authoritative).
  FullScreenApp { opening: bool },
  /// The user is cascading or tiling windows.
  WindowArrange { beginning: bool },
}

impl RegistryNotification {
  /// Decode `ABN_*` from a registry message's parameters.
  pub fn from_raw(wparam: usize, lparam: isize) -> Option<Self> {
    match wparam {
      0 => Some(Self::StateChange),
      1 => Some(Self::PositionChanged),
      2 => Some(Self::FullScreenApp {
        opening: lparam != 0,
      }),
      3 => Some(Self::WindowArrange {
        beginning: lparam != 0,
      }),
      _ => None,
    }
  }
}

/// Z-order target of a pending position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAfter {
  Top,
  Bottom,
  Topmost,
  NoTopmost,
  Window(crate::types::WindowHandle),
}

/// A position change about to happen, which the handler may amend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingPosition {
  pub insert_after: InsertAfter,
  /// The change leaves z-order alone.
  pub no_zorder: bool,
}

/// Why a screen-change reprocessing pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenChangeReason {
  DpiChange,
  DisplayChange,
  DeviceChange,
  CompositionChange,
}

/// Decoded native messages a docked window reacts to.
#[derive(Debug, PartialEq)]
pub enum WindowMessage<'a> {
  /// A message on the id the registry assigned at registration.
  Registry {
    message_id: u32,
    notification: RegistryNotification,
  },
  Activate,
  PositionChanging(&'a mut PendingPosition),
  PositionChanged,
  /// New DPI of the window's monitor.
  DpiChanged { dpi: u32 },
  DisplayChanged,
  DeviceChanged { event: u32 },
  CompositionChanged,
}

impl DockedWindow {
  /// React to a native message. Returns true when the message was consumed.
  pub fn handle_message(&self, message: WindowMessage<'_>) -> bool {
    match message {
      WindowMessage::Registry {
        message_id,
        notification,
      } => {
        if self.message_id() != Some(message_id) {
          return false;
        }
        self.on_registry_notification(notification);
        true
      }

      WindowMessage::Activate => {
        if self.notifies_registry() {
          self.ctx().registry.notify_activated(self.handle());
        }
        false
      }

      WindowMessage::PositionChanging(pending) => {
        if self.read(|s| s.raising)
          && !pending.no_zorder
          && pending.insert_after != InsertAfter::Topmost
        {
          log::debug!("{} forcing topmost while raising", self.handle());
          pending.insert_after = InsertAfter::Topmost;
        }
        false
      }

      WindowMessage::PositionChanged => {
        if self.notifies_registry() {
          self.ctx().registry.notify_position_changed(self.handle());
        }
        false
      }

      WindowMessage::DpiChanged { dpi } => {
        self.on_dpi_changed(dpi);
        false
      }

      WindowMessage::DisplayChanged => {
        self.process_screen_change(ScreenChangeReason::DisplayChange);
        true
      }

      WindowMessage::DeviceChanged { event } => {
        if event != DEVNODES_CHANGED {
          return false;
        }
        self.process_screen_change(ScreenChangeReason::DeviceChange);
        true
      }

      WindowMessage::CompositionChanged => {
        self.process_screen_change(ScreenChangeReason::CompositionChange);
        true
      }
    }
  }

  /// Activation and move notifications go to the registry only for
  /// registry-managed bars that aren't shutting down.
  fn notifies_registry(&self) -> bool {
    !self.ctx().running_as_shell
      && self.read(|s| s.mode == DockMode::Normal && !s.is_shutting_down())
  }

  fn on_registry_notification(&self, notification: RegistryNotification) {
    match notification {
      RegistryNotification::PositionChanged => {
        let (width, height) = self.sized_request(self.actual_size());
        let screen = self.screen();
        let assigned = self.ctx().registry.set_position(&crate::registry::BarRequest {
          window: self.handle(),
          screen: &screen,
          edge: self.edge(),
          width,
          height,
        });
        if let Some(rect) = assigned {
          self.apply_assigned_position(rect);
        }
      }
      RegistryNotification::WindowArrange { beginning } => self.set_visible(!beginning),
      RegistryNotification::StateChange | RegistryNotification::FullScreenApp { .. } => {}
    }
  }

  fn on_dpi_changed(&self, dpi: u32) {
    let scale = scale_from_dpi(dpi);
    let (primary, opening) = self.write(|s| {
      s.dpi_scale = scale;
      (s.screen.primary, s.lifecycle == Lifecycle::Opening)
    });
    self.emit_property(DockProperty::DpiScale(scale));

    if primary {
      self.ctx().dpi.set_scale(scale);
    }
    // Positioning during open triggers this message itself
    if !opening {
      self.process_screen_change(ScreenChangeReason::DpiChange);
    }
  }

  /// Reprocess screen setup: only on the primary monitor (unless disabled),
  /// or on any monitor for DPI changes, and never while shutting down.
  pub fn process_screen_change(&self, reason: ScreenChangeReason) {
    let run = self.read(|s| {
      ((s.screen.primary && s.process_screen_changes) || reason == ScreenChangeReason::DpiChange)
        && !s.is_shutting_down()
    });
    if run {
      log::debug!("{} reprocessing screens: {reason:?}", self.handle());
      self.set_screen_properties(reason);
    }
  }

  fn set_screen_properties(&self, reason: ScreenChangeReason) {
    self.ctx().tracker.notify_screens_changed();

    let primary = self.read(|s| s.screen.primary);
    if primary && reason != ScreenChangeReason::DpiChange {
      match self.ctx().monitors.primary() {
        Ok(screen) => self.set_screen(screen),
        Err(e) => log::warn!("Keeping previous screen for {}: {e}", self.handle()),
      }
    }
    self.set_screen_position();
  }

  fn set_screen(&self, screen: ScreenInfo) {
    let changed = self.write(|s| {
      if s.screen == screen {
        return false;
      }
      s.screen = screen.clone();
      true
    });
    if changed {
      self.emit_property(DockProperty::Screen(screen));
    }
  }
}
