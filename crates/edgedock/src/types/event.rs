/*! Event types for docking state changes and full-screen membership. */

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{DockMode, Edge, Lifecycle, Orientation, Rect, ScreenInfo, WindowHandle};

/// A foreground window that exactly fills a monitor (or the virtual screen).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FullScreenApp {
  pub handle: WindowHandle,
  /// Monitor the window fills at classification time.
  pub screen: ScreenInfo,
  /// Window bounds at classification time.
  pub rect: Rect,
}

/// An observable property of a docked window, with its new value.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "property", content = "value")]
#[ts(export)]
pub enum DockProperty {
  #[serde(rename = "edge")]
  Edge(Edge),
  #[serde(rename = "mode")]
  Mode(DockMode),
  #[serde(rename = "orientation")]
  Orientation(Orientation),
  #[serde(rename = "dpiScale")]
  DpiScale(f64),
  #[serde(rename = "topmost")]
  Topmost(bool),
  #[serde(rename = "screen")]
  Screen(ScreenInfo),
  #[serde(rename = "visible")]
  Visible(bool),
}

/// Events emitted when state changes.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  // Docked window state (from property setters and native notifications)
  #[serde(rename = "dock:property")]
  PropertyChanged {
    window: WindowHandle,
    property: DockProperty,
  },
  #[serde(rename = "dock:lifecycle")]
  LifecycleChanged {
    window: WindowHandle,
    lifecycle: Lifecycle,
  },

  // Full-screen membership (from polling)
  #[serde(rename = "fullscreen:added")]
  FullScreenAdded { app: FullScreenApp },
  #[serde(rename = "fullscreen:removed")]
  FullScreenRemoved { app: FullScreenApp },
}
