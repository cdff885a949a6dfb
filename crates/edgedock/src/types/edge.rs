/*! Docking edge, orientation, mode and lifecycle enums. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Screen edge a bar is docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Edge {
  #[default]
  Left,
  Top,
  Right,
  Bottom,
}

impl Edge {
  /// Orientation implied by the edge. Left/Right bars are vertical.
  pub const fn orientation(self) -> Orientation {
    match self {
      Self::Left | Self::Right => Orientation::Vertical,
      Self::Top | Self::Bottom => Orientation::Horizontal,
    }
  }
}

/// Layout axis of a docked bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Orientation {
  Horizontal,
  Vertical,
}

/// How a docked bar holds its screen reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DockMode {
  /// Persistent reservation with the position registry.
  #[default]
  Normal,
  /// Collapsible reservation with the auto-hide registry.
  AutoHide,
  /// No reservation; the bar only positions itself.
  None,
}

/// Lifecycle of a docked window.
///
/// `Opening -> Active -> Closing -> Closed`, with `Closing -> Active` when
/// the cleanup hook vetoes the close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Lifecycle {
  #[default]
  Opening,
  Active,
  Closing,
  Closed,
}
