/*!
Docked window geometry.

Sizes arrive in device-independent units and leave as device pixels. The bar
spans the full monitor edge on the cross axis.
*/

use crate::dpi::to_px;
use crate::types::{Edge, Orientation, Rect};

/// Rectangle for a bar docked to `edge` of a monitor with `bounds`.
///
/// `edge_offset` is the thickness (DIPs) of bars already docked to the same
/// edge; zero puts the bar flush against the screen edge. Out-of-range sizes
/// clamp to the `i32` pixel range.
pub fn compute_screen_position(
  bounds: &Rect,
  edge: Edge,
  desired_width: f64,
  desired_height: f64,
  dpi_scale: f64,
  edge_offset: f64,
) -> Rect {
  let offset = to_px(edge_offset * dpi_scale);

  match edge {
    Edge::Left | Edge::Right => {
      let width = to_px(desired_width * dpi_scale);
      let left = if edge == Edge::Left {
        bounds.left.saturating_add(offset)
      } else {
        bounds.right.saturating_sub(width).saturating_sub(offset)
      };
      Rect::new(left, bounds.top, width, bounds.height())
    }
    Edge::Top | Edge::Bottom => {
      let height = to_px(desired_height * dpi_scale);
      let top = if edge == Edge::Top {
        bounds.top.saturating_add(offset)
      } else {
        bounds.bottom.saturating_sub(height).saturating_sub(offset)
      };
      Rect::new(bounds.left, top, bounds.width(), height)
    }
  }
}

/// Request size in pixels: the desired thickness on the docking axis, and
/// `cross` (already pixels) on the other.
pub(crate) fn request_size(
  orientation: Orientation,
  desired_width: f64,
  desired_height: f64,
  dpi_scale: f64,
  cross: (f64, f64),
) -> (f64, f64) {
  match orientation {
    Orientation::Vertical => (desired_width * dpi_scale, cross.1),
    Orientation::Horizontal => (cross.0, desired_height * dpi_scale),
  }
}
