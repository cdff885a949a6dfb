/*!
Internal polling implementation.

Fixed-interval ticks scheduled on the [`EventLoop`] rather than a thread, so
each tick runs on the UI thread alongside native message handling.
Consumers don't interact with this directly - polling is owned by the
[`crate::FullScreenTracker`].
*/

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::EventLoop;

/// Handle to control polling lifetime. Stops on drop.
pub(crate) struct PollingHandle {
  stop_signal: Arc<AtomicBool>,
}

impl std::fmt::Debug for PollingHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PollingHandle")
      .field("stopped", &self.is_stopped())
      .finish_non_exhaustive()
  }
}

impl PollingHandle {
  pub(crate) fn stop(&self) {
    self.stop_signal.store(true, Ordering::SeqCst);
  }

  pub(crate) fn is_stopped(&self) -> bool {
    self.stop_signal.load(Ordering::SeqCst)
  }
}

impl Drop for PollingHandle {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Run `tick` every `interval` on `event_loop` until the handle is stopped or
/// dropped, or `tick` returns false.
pub(crate) fn start_polling(
  event_loop: &EventLoop,
  interval: Duration,
  tick: impl Fn() -> bool + Send + Sync + 'static,
) -> PollingHandle {
  let stop_signal = Arc::new(AtomicBool::new(false));
  schedule(
    event_loop.clone(),
    interval,
    Arc::clone(&stop_signal),
    Arc::new(tick),
  );
  PollingHandle { stop_signal }
}

fn schedule(
  event_loop: EventLoop,
  interval: Duration,
  stop_signal: Arc<AtomicBool>,
  tick: Arc<dyn Fn() -> bool + Send + Sync>,
) {
  let next_loop = event_loop.clone();
  event_loop.post_delayed(interval, move || {
    if stop_signal.load(Ordering::SeqCst) {
      return;
    }
    if tick() {
      schedule(next_loop, interval, stop_signal, tick);
    } else {
      log::debug!("Polling source gone, stopping");
    }
  });
}
