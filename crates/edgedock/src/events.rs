/*! Event emission onto the shared broadcast channel. */

use async_broadcast::Sender;

use crate::types::Event;

/// Sending half of the event channel. Clone is cheap.
#[derive(Debug, Clone)]
pub(crate) struct EventSink {
  tx: Sender<Event>,
}

impl EventSink {
  pub(crate) fn new(tx: Sender<Event>) -> Self {
    Self { tx }
  }

  /// Broadcast an event. Dropped silently when nobody is subscribed.
  pub(crate) fn emit(&self, event: Event) {
    if let Err(e) = self.tx.try_broadcast(event) {
      if e.is_full() {
        log::error!(
          "Event channel overflow - events are being dropped. \
           Consider increasing eventChannelCapacity or processing events faster."
        );
      }
    }
  }
}
