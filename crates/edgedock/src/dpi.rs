/*!
DPI scale bookkeeping and device-independent unit conversion.

One [`DpiContext`] is shared by every docked window of a [`crate::Shell`]. It
holds two scales:

- the logon scale: system DPI when the user signed in, which is what system
  metrics are still expressed in;
- the current scale: updated when the primary monitor reports a DPI change.

Both are read from the platform on first use and can be set explicitly.
*/

use parking_lot::RwLock;
use std::sync::Arc;

use crate::platform::Platform;

/// DPI at which one device-independent unit is one pixel.
pub const BASE_DPI: f64 = 96.0;

/// Scale factor for a raw DPI value (e.g. 144 -> 1.5).
pub fn scale_from_dpi(dpi: u32) -> f64 {
  f64::from(dpi) / BASE_DPI
}

/// Round a pixel value the way the native layer does (ties to even).
pub(crate) fn to_px(value: f64) -> i32 {
  value.round_ties_even() as i32
}

#[derive(Debug, Default)]
struct DpiState {
  logon: Option<f64>,
  current: Option<f64>,
}

/// Process-wide DPI scale. Clone is cheap (Arc bump).
#[derive(Clone)]
pub struct DpiContext {
  platform: Arc<dyn Platform>,
  state: Arc<RwLock<DpiState>>,
}

impl std::fmt::Debug for DpiContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DpiContext")
      .field("state", &*self.state.read())
      .finish_non_exhaustive()
  }
}

impl DpiContext {
  pub fn new(platform: Arc<dyn Platform>) -> Self {
    Self {
      platform,
      state: Arc::new(RwLock::new(DpiState::default())),
    }
  }

  /// Current scale. Initialized from the system DPI on first use.
  pub fn scale(&self) -> f64 {
    if let Some(scale) = self.state.read().current {
      return scale;
    }
    let system = self.platform.system_dpi_scale();
    *self.state.write().current.get_or_insert(system)
  }

  pub fn set_scale(&self, scale: f64) {
    self.state.write().current = Some(scale);
  }

  /// Scale at user logon. Initialized from the system DPI on first use.
  pub fn logon_scale(&self) -> f64 {
    if let Some(scale) = self.state.read().logon {
      return scale;
    }
    let system = self.platform.system_dpi_scale();
    *self.state.write().logon.get_or_insert(system)
  }

  /// How much to scale logon-DPI system metrics to match the current DPI.
  pub fn scale_adjustment(&self) -> f64 {
    self.scale() / self.logon_scale()
  }

  /// Device-independent units to pixels.
  pub fn to_pixels(&self, x: f64, y: f64) -> (i32, i32) {
    let scale = self.scale();
    (to_px(x * scale), to_px(y * scale))
  }

  /// Pixels to device-independent units.
  pub fn from_pixels(&self, x: f64, y: f64) -> (i32, i32) {
    let scale = self.scale();
    (to_px(x / scale), to_px(y / scale))
  }
}
