/*!
Monitor enumeration cache.

Enumerating monitors is comparatively expensive and the full-screen poll needs
the list every tick, so it is cached here. The cache must be invalidated
whenever display topology, DPI or devices change; otherwise classification
compares against stale monitor bounds. Docked windows do this from their
screen-change reprocessing pass via
[`FullScreenTracker::notify_screens_changed`](crate::FullScreenTracker::notify_screens_changed).
*/

use parking_lot::Mutex;
use std::sync::Arc;

use crate::platform::Platform;
use crate::types::{AppBarError, AppBarResult, ScreenInfo};

/// Cached monitor list. Clone is cheap (Arc bump); clones share the cache.
#[derive(Clone)]
pub struct MonitorCache {
  platform: Arc<dyn Platform>,
  cached: Arc<Mutex<Option<Arc<[ScreenInfo]>>>>,
}

impl std::fmt::Debug for MonitorCache {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MonitorCache")
      .field("cached", &self.cached.lock().as_ref().map(|s| s.len()))
      .finish_non_exhaustive()
  }
}

impl MonitorCache {
  pub fn new(platform: Arc<dyn Platform>) -> Self {
    Self {
      platform,
      cached: Arc::new(Mutex::new(None)),
    }
  }

  /// Physical monitors, enumerated on first use after an invalidation.
  pub fn all(&self) -> AppBarResult<Arc<[ScreenInfo]>> {
    if let Some(screens) = self.cached.lock().as_ref() {
      return Ok(Arc::clone(screens));
    }

    // Enumerate without holding the lock
    let screens: Arc<[ScreenInfo]> = self.platform.monitors()?.into();
    if screens.is_empty() {
      return Err(AppBarError::NoMonitors);
    }
    *self.cached.lock() = Some(Arc::clone(&screens));
    log::debug!("Cached {} monitors", screens.len());
    Ok(screens)
  }

  /// Physical monitors plus the virtual screen when there is more than one.
  pub fn with_virtual(&self) -> AppBarResult<Vec<ScreenInfo>> {
    let screens = self.all()?;
    let mut list = screens.to_vec();
    if let Some(virtual_screen) = ScreenInfo::virtual_screen(&screens) {
      list.push(virtual_screen);
    }
    Ok(list)
  }

  /// The primary monitor.
  pub fn primary(&self) -> AppBarResult<ScreenInfo> {
    let screens = self.all()?;
    screens
      .iter()
      .find(|s| s.primary)
      .or_else(|| screens.first())
      .cloned()
      .ok_or(AppBarError::NoMonitors)
  }

  /// Look up a cached monitor by device name.
  pub fn by_device_name(&self, device_name: &str) -> Option<ScreenInfo> {
    self
      .all()
      .ok()?
      .iter()
      .find(|s| s.device_name == device_name)
      .cloned()
  }

  /// Drop the cached list; the next read re-enumerates.
  pub fn invalidate(&self) {
    if self.cached.lock().take().is_some() {
      log::debug!("Monitor cache invalidated");
    }
  }
}
