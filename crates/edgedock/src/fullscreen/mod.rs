/*!
Full-screen application tracking.

The tracker polls the foreground window on the event loop, classifies it,
and keeps the authoritative set of full-screen applications: at most one per
monitor, with the virtual screen counting as one synthetic monitor.

Every membership change is delivered synchronously to each subscribed
[`FullScreenListener`] before the tick returns, removals before additions,
together with a snapshot of the set after that change. Changes are also
broadcast as [`Event::FullScreenAdded`] / [`Event::FullScreenRemoved`].

# Module Structure

- `mod.rs` - tracker, subscriptions, tick
- `classify.rs` - is one window full-screen, and on which monitor
- `membership.rs` - keep/remove/add rules for a tick
*/

mod classify;
mod membership;

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::config::Config;
use crate::dispatch::EventLoop;
use crate::events::EventSink;
use crate::platform::Platform;
use crate::polling::{self, PollingHandle};
use crate::screens::MonitorCache;
use crate::types::{Event, FullScreenApp, WindowHandle};

/// A single change to the full-screen set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipChange {
  Removed(FullScreenApp),
  Added(FullScreenApp),
}

/// Receives membership changes synchronously on the UI thread.
pub trait FullScreenListener: Send + Sync {
  /// `apps` is the full set after `change` was applied.
  fn membership_changed(&self, change: &MembershipChange, apps: &[FullScreenApp]);
}

/// Subscription token returned by [`FullScreenTracker::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Default)]
struct TrackerState {
  apps: Vec<FullScreenApp>,
  listeners: Vec<(ListenerId, Weak<dyn FullScreenListener>)>,
  next_listener: u64,
}

struct TrackerInner {
  platform: Arc<dyn Platform>,
  monitors: MonitorCache,
  config: Config,
  events: EventSink,
  state: Mutex<TrackerState>,
  polling: Mutex<Option<PollingHandle>>,
}

/// Full-screen tracker. Clone is cheap (Arc bump); clones share state.
#[derive(Clone)]
pub struct FullScreenTracker {
  inner: Arc<TrackerInner>,
}

impl std::fmt::Debug for FullScreenTracker {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.inner.state.lock();
    f.debug_struct("FullScreenTracker")
      .field("apps", &state.apps)
      .field("listeners", &state.listeners.len())
      .finish_non_exhaustive()
  }
}

impl FullScreenTracker {
  pub(crate) fn new(
    platform: Arc<dyn Platform>,
    monitors: MonitorCache,
    config: Config,
    events: EventSink,
  ) -> Self {
    Self {
      inner: Arc::new(TrackerInner {
        platform,
        monitors,
        config,
        events,
        state: Mutex::new(TrackerState::default()),
        polling: Mutex::new(None),
      }),
    }
  }

  /// Start polling on `event_loop` at the configured interval.
  ///
  /// Restarting replaces the previous schedule. Polling stops when every
  /// clone of the tracker is dropped.
  pub fn start(&self, event_loop: &EventLoop) {
    let weak = Arc::downgrade(&self.inner);
    let interval = Duration::from_millis(self.inner.config.poll_interval_ms);
    let handle = polling::start_polling(event_loop, interval, move || {
      let Some(inner) = weak.upgrade() else {
        return false;
      };
      FullScreenTracker { inner }.tick();
      true
    });
    *self.inner.polling.lock() = Some(handle);
  }

  /// Stop polling. The membership set is left as is.
  pub fn stop(&self) {
    if let Some(handle) = self.inner.polling.lock().take() {
      handle.stop();
    }
  }

  /// Snapshot of the current full-screen set.
  pub fn apps(&self) -> Vec<FullScreenApp> {
    self.inner.state.lock().apps.clone()
  }

  /// Register a listener. The tracker holds it weakly: dropping the last
  /// strong reference unsubscribes it.
  pub fn subscribe(&self, listener: &Arc<dyn FullScreenListener>) -> ListenerId {
    let mut state = self.inner.state.lock();
    let id = ListenerId(state.next_listener);
    state.next_listener += 1;
    state.listeners.push((id, Arc::downgrade(listener)));
    id
  }

  pub fn unsubscribe(&self, id: ListenerId) {
    self
      .inner
      .state
      .lock()
      .listeners
      .retain(|(listener_id, _)| *listener_id != id);
  }

  /// Display topology, DPI or devices changed: drop the cached monitor list.
  pub fn notify_screens_changed(&self) {
    self.inner.monitors.invalidate();
  }

  /// Run one poll iteration.
  pub fn tick(&self) {
    let inner = &*self.inner;
    let platform = inner.platform.as_ref();

    let foreground = platform.foreground_window().filter(|w| !w.is_null());
    let foreground_monitor = foreground.and_then(|w| platform.monitor_from_window(w));

    // Classify with no lock held: platform calls only
    let current = self.apps();
    let plan = membership::reconcile(
      &current,
      foreground,
      foreground_monitor.as_deref(),
      |window| classify::classify(platform, &inner.monitors, &inner.config, window),
    );
    if plan.is_empty() {
      return;
    }

    let (changes, listeners) = {
      let mut state = inner.state.lock();
      let mut changes = Vec::new();
      for app in plan.removed {
        if let Some(index) = state.apps.iter().position(|a| a.handle == app.handle) {
          let removed = state.apps.remove(index);
          changes.push((MembershipChange::Removed(removed), state.apps.clone()));
        }
      }
      if let Some(app) = plan.added {
        state.apps.push(app.clone());
        changes.push((MembershipChange::Added(app), state.apps.clone()));
      }
      state.listeners.retain(|(_, l)| l.strong_count() > 0);
      let listeners: Vec<Arc<dyn FullScreenListener>> =
        state.listeners.iter().filter_map(|(_, l)| l.upgrade()).collect();
      (changes, listeners)
    };

    for (change, snapshot) in &changes {
      self.deliver(change, snapshot, &listeners);
    }
  }

  fn deliver(
    &self,
    change: &MembershipChange,
    snapshot: &[FullScreenApp],
    listeners: &[Arc<dyn FullScreenListener>],
  ) {
    match change {
      MembershipChange::Removed(app) => {
        log::debug!("Full-screen app {} left {}", app.handle, app.screen.device_name);
        self
          .inner
          .events
          .emit(Event::FullScreenRemoved { app: app.clone() });
      }
      MembershipChange::Added(app) => {
        log::debug!("Full-screen app {} on {}", app.handle, app.screen.device_name);
        self
          .inner
          .events
          .emit(Event::FullScreenAdded { app: app.clone() });
      }
    }

    for listener in listeners {
      listener.membership_changed(change, snapshot);
    }
  }

  /// Check if `window` is currently in the set.
  pub fn contains(&self, window: WindowHandle) -> bool {
    self
      .inner
      .state
      .lock()
      .apps
      .iter()
      .any(|a| a.handle == window)
  }
}
