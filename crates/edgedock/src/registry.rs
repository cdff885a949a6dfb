/*!
Docking registry contract.

The registry is the collaborator that communicates edge reservations to the
host shell, arbitrates between bars, and assigns each bar its rectangle. It is
implemented by the embedding application; edgedock only drives it.

Registries must tolerate inconsistent requests (unregistering a bar that was
never registered, for instance) as no-ops.
*/

use crate::types::{Edge, Rect, ScreenInfo, WindowHandle};

/// A position request for one bar. Sizes are in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarRequest<'a> {
  pub window: WindowHandle,
  pub screen: &'a ScreenInfo,
  pub edge: Edge,
  pub width: f64,
  pub height: f64,
}

/// Result of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
  /// Message identifier the registry will use for this bar's notifications.
  pub message_id: u32,
  /// Rectangle assigned while registering, if one was computed.
  pub assigned: Option<Rect>,
}

/// The host-shell side of edge reservations.
pub trait DockingRegistry: Send + Sync + 'static {
  /// Whether the bar currently holds a position reservation.
  fn is_registered(&self, window: WindowHandle) -> bool;

  /// Establish a position reservation.
  fn register(&self, request: &BarRequest<'_>) -> Registration;

  /// Release the position reservation.
  fn unregister(&self, window: WindowHandle, width: f64, height: f64);

  /// Ask for a position; returns the rectangle the registry assigned.
  fn set_position(&self, request: &BarRequest<'_>) -> Option<Rect>;

  /// Combined thickness, in device-independent units, of other bars already
  /// docked to `edge` on `screen`.
  fn edge_reserved_thickness(&self, edge: Edge, screen: &ScreenInfo) -> f64;

  /// Recompute the screen's work area from current reservations.
  fn set_work_area(&self, screen: &ScreenInfo);

  fn register_auto_hide(&self, window: WindowHandle, edge: Edge, screen: &ScreenInfo);

  fn unregister_auto_hide(&self, window: WindowHandle);

  /// A normal-priority bar was activated.
  fn notify_activated(&self, window: WindowHandle);

  /// A bar's window position changed.
  fn notify_position_changed(&self, window: WindowHandle);
}
