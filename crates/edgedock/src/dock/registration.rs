/*!
Registry reservations and position assertion.

Two ways a bar gets its rectangle:

- self-placed: [`DockedWindow::set_position`] computes it from the monitor
  bounds (shell mode, or any mode other than Normal);
- registry-assigned: the registry answers a position request, and the answer
  goes through [`DockedWindow::apply_assigned_position`].
*/

use std::sync::Arc;

use super::geometry::{compute_screen_position, request_size};
use super::DockedWindow;
use crate::registry::BarRequest;
use crate::types::{DockMode, Lifecycle, Rect};

impl DockedWindow {
  /// Rendered size in pixels, for the cross axis of registry requests.
  pub(super) fn actual_size(&self) -> (f64, f64) {
    let rect = match self.ctx().platform.window_rect(self.handle()) {
      Ok(rect) => rect,
      Err(e) => {
        log::debug!("Using last known size for {}: {e}", self.handle());
        self.read(|s| s.last_asserted.unwrap_or(s.screen.bounds))
      }
    };
    (f64::from(rect.width()), f64::from(rect.height()))
  }

  /// Docking-axis thickness times DPI, cross axis from `cross`.
  pub(super) fn sized_request(&self, cross: (f64, f64)) -> (f64, f64) {
    self.read(|s| {
      request_size(
        s.edge.orientation(),
        s.desired_width,
        s.desired_height,
        s.dpi_scale,
        cross,
      )
    })
  }

  /// Establish the position reservation. No-op unless mode is Normal and the
  /// bar is not already registered.
  pub(crate) fn register(&self) {
    let registry = &self.ctx().registry;
    if self.mode() != DockMode::Normal || registry.is_registered(self.handle()) {
      return;
    }

    let (width, height) = self.sized_request(self.actual_size());
    let (edge, screen) = self.read(|s| (s.edge, s.screen.clone()));
    let registration = registry.register(&BarRequest {
      window: self.handle(),
      screen: &screen,
      edge,
      width,
      height,
    });

    log::debug!(
      "{} registered on {edge:?} of {} (message {:#x})",
      self.handle(),
      screen.device_name,
      registration.message_id
    );
    self.write(|s| s.message_id = Some(registration.message_id));

    if let Some(rect) = registration.assigned {
      self.apply_assigned_position(rect);
    }
  }

  /// Release the position reservation. No-op unless registered.
  pub(crate) fn unregister(&self) {
    let registry = &self.ctx().registry;
    if !registry.is_registered(self.handle()) {
      return;
    }

    let (width, height) = self.sized_request(self.actual_size());
    registry.unregister(self.handle(), width, height);
    self.write(|s| s.message_id = None);
    log::debug!("{} unregistered", self.handle());
  }

  /// Compute and assert this bar's rectangle from the monitor bounds.
  pub fn set_position(&self) {
    let (screen, edge, width, height, scale, requires_edge) = self.read(|s| {
      (
        s.screen.clone(),
        s.edge,
        s.desired_width,
        s.desired_height,
        s.dpi_scale,
        s.requires_screen_edge,
      )
    });

    let offset = if requires_edge {
      0.0
    } else {
      self.ctx().registry.edge_reserved_thickness(edge, &screen)
    };
    let rect = compute_screen_position(&screen.bounds, edge, width, height, scale, offset);
    self.assert_bounds(rect);

    if self.ctx().running_as_shell {
      self.ctx().registry.set_work_area(&screen);
    }
  }

  /// Position for the current screen: self-placed (deferred) when running as
  /// shell or not in Normal mode, otherwise requested from the registry at
  /// full monitor extent on the cross axis.
  pub fn set_screen_position(&self) {
    let (mode, screen) = self.read(|s| (s.mode, s.screen.clone()));
    if self.ctx().running_as_shell || mode != DockMode::Normal {
      self.delay_set_position();
      return;
    }

    let bounds = screen.bounds;
    let cross = (f64::from(bounds.width()), f64::from(bounds.height()));
    let (width, height) = self.sized_request(cross);
    let assigned = self.ctx().registry.set_position(&BarRequest {
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

  /// Apply a registry-assigned rectangle if the window isn't already there,
  /// then run the post-assignment hook.
  pub fn apply_assigned_position(&self, rect: Rect) {
    let current = self.ctx().platform.window_rect(self.handle()).ok();
    let same_coords = current == Some(rect);
    if !same_coords {
      self.assert_bounds(rect);
    }
    let hooks = Arc::clone(&self.inner.hooks);
    hooks.after_position_assigned(self, same_coords, rect);
  }

  /// Re-assert `rect` once, after the configured delay.
  pub fn reassert_position_later(&self, rect: Rect) {
    let weak = Arc::downgrade(&self.inner);
    self
      .ctx()
      .event_loop
      .post_delayed(self.ctx().reassert_delay, move || {
        if let Some(inner) = weak.upgrade() {
          DockedWindow { inner }.assert_bounds(rect);
        }
      });
  }

  /// `set_position` once, after the configured delay.
  pub(crate) fn delay_set_position(&self) {
    let weak = Arc::downgrade(&self.inner);
    self
      .ctx()
      .event_loop
      .post_delayed(self.ctx().reassert_delay, move || {
        if let Some(inner) = weak.upgrade() {
          let dock = DockedWindow { inner };
          if dock.lifecycle() != Lifecycle::Closed {
            dock.set_position();
          }
        }
      });
  }

  /// Move the window without touching z-order or activation. Rects with a
  /// negative size only move.
  pub(super) fn assert_bounds(&self, rect: Rect) {
    let resize = !rect.has_negative_size();
    match self.ctx().platform.set_window_bounds(self.handle(), rect, resize) {
      Ok(()) if resize => self.write(|s| s.last_asserted = Some(rect)),
      Ok(()) => {}
      Err(e) => log::warn!("Failed to position {} at {rect:?}: {e}", self.handle()),
    }
  }
}
