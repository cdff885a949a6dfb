/*!
Membership reconciliation for one poll tick.

Pure over a classification function so the keep/remove/add rules can be
tested without a platform.
*/

use crate::types::{FullScreenApp, WindowHandle};

/// What a tick changes in the membership set.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Reconciliation {
  /// Entries to drop, in membership order.
  pub removed: Vec<FullScreenApp>,
  pub added: Option<FullScreenApp>,
}

impl Reconciliation {
  pub(crate) fn is_empty(&self) -> bool {
    self.removed.is_empty() && self.added.is_none()
  }
}

/// Decide membership changes for this tick.
///
/// `foreground_monitor` is the device name of the monitor hosting
/// `foreground`; `None` when unknown, in which case existing entries that
/// still classify are kept. An unknown monitor is not treated as the primary
/// one, so a missing foreground never evicts a full-screen app on the primary
/// monitor.
pub(crate) fn reconcile(
  current: &[FullScreenApp],
  foreground: Option<WindowHandle>,
  foreground_monitor: Option<&str>,
  mut classify: impl FnMut(WindowHandle) -> Option<FullScreenApp>,
) -> Reconciliation {
  let mut removed = Vec::new();
  let mut kept: Vec<&FullScreenApp> = Vec::new();
  let mut skip_add = false;

  for app in current {
    let same_monitor = classify(app.handle).is_some_and(|now| now.screen.same_device(&app.screen));
    let is_foreground = foreground == Some(app.handle);

    if same_monitor && is_foreground {
      skip_add = true;
      kept.push(app);
    } else if same_monitor && foreground_monitor.is_none_or(|m| m != app.screen.device_name) {
      kept.push(app);
    } else {
      removed.push(app.clone());
    }
  }

  let added = if skip_add {
    None
  } else {
    foreground.and_then(&mut classify)
  };

  // One entry per monitor: a new arrival displaces a kept entry on the same one
  if let Some(new_app) = &added {
    removed.extend(
      kept
        .into_iter()
        .filter(|app| app.screen.same_device(&new_app.screen))
        .cloned(),
    );
  }

  Reconciliation { removed, added }
}
