/*! Embedder hooks for docked windows. */

use super::DockedWindow;
use crate::types::Rect;

/// Overridable behavior of a [`DockedWindow`].
///
/// Both methods have defaults, so an implementation only overrides what it
/// needs.
pub trait DockHooks: Send + Sync {
  /// Cleanup run during a close request, before the window is torn down.
  ///
  /// Return true to proceed; false vetoes the close and the window returns to
  /// its previous state. `allow_close` is the window's current flag.
  fn cleanup(&self, allow_close: bool) -> bool {
    allow_close
  }

  /// Called after a registry-assigned rectangle was applied.
  ///
  /// `same_coords` is true when the window already had that rectangle. The
  /// default re-asserts a changed rectangle once after the configured delay,
  /// since the native layer sometimes overrides the first move.
  fn after_position_assigned(&self, dock: &DockedWindow, same_coords: bool, rect: Rect) {
    if !same_coords {
      dock.reassert_position_later(rect);
    }
  }
}

/// Hooks with every default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl DockHooks for DefaultHooks {}
