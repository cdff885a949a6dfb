/*! Geometry types for device-pixel screen coordinates. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rectangle in device pixels. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export)]
pub struct Rect {
  pub left: i32,
  pub top: i32,
  pub right: i32,
  pub bottom: i32,
}

impl Rect {
  /// Create a rect from origin and size. Edges saturate at the `i32` range.
  pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
    Self {
      left,
      top,
      right: left.saturating_add(width),
      bottom: top.saturating_add(height),
    }
  }

  /// Create a rect from its four edges.
  pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
    Self {
      left,
      top,
      right,
      bottom,
    }
  }

  pub const fn width(&self) -> i32 {
    self.right.saturating_sub(self.left)
  }

  pub const fn height(&self) -> i32 {
    self.bottom.saturating_sub(self.top)
  }

  /// Smallest rect containing both.
  #[must_use]
  pub fn union(&self, other: &Rect) -> Rect {
    Rect {
      left: self.left.min(other.left),
      top: self.top.min(other.top),
      right: self.right.max(other.right),
      bottom: self.bottom.max(other.bottom),
    }
  }

  /// Check if this rect's size is negative on either axis.
  ///
  /// Registries report such rects when only the origin is meaningful.
  pub const fn has_negative_size(&self) -> bool {
    self.width() < 0 || self.height() < 0
  }
}
