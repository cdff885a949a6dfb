/*!
Core Shell instance - owns the shared collaborators and event broadcasting.

A [`Shell`] wires one platform, one docking registry, one DPI context, one
monitor cache and one full-screen tracker together, and hands them to every
window it docks. Full-screen polling starts on the shell's event loop when the
shell is built and stops when the last clone is dropped.

# Example

```ignore
use edgedock::{DockOptions, Edge, Shell};

let shell = Shell::builder().registry(registry).build()?;
let bar = shell.dock(handle, DockOptions::new(Edge::Top, 32.0))?;
bar.open()?;

let mut events = shell.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}
```
*/

use async_broadcast::{InactiveReceiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::dispatch::EventLoop;
use crate::dock::{DockContext, DockOptions, DockedWindow};
use crate::dpi::DpiContext;
use crate::events::EventSink;
use crate::fullscreen::FullScreenTracker;
use crate::platform::Platform;
use crate::registry::DockingRegistry;
use crate::screens::MonitorCache;
use crate::types::{AppBarError, AppBarResult, Event, WindowHandle};

/// Main edgedock instance.
///
/// Clone is cheap (Arc bumps) - share freely across threads. Reactions still
/// run on the thread that drives [`Shell::event_loop`].
#[derive(Clone)]
pub struct Shell {
  platform: Arc<dyn Platform>,
  registry: Arc<dyn DockingRegistry>,
  tracker: FullScreenTracker,
  monitors: MonitorCache,
  dpi: DpiContext,
  event_loop: EventLoop,
  events_tx: Sender<Event>,
  events_keepalive: InactiveReceiver<Event>,
  config: Config,
}

impl std::fmt::Debug for Shell {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Shell")
      .field("config", &self.config)
      .field("tracker", &self.tracker)
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a Shell instance.
///
/// # Example
///
/// ```ignore
/// let shell = Shell::builder()
///     .config(Config { running_as_shell: true, ..Default::default() })
///     .registry(registry)
///     .build()?;
/// ```
#[derive(Default, Clone)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct ShellBuilder {
  config: Config,
  platform: Option<Arc<dyn Platform>>,
  registry: Option<Arc<dyn DockingRegistry>>,
  event_loop: Option<EventLoop>,
}

impl std::fmt::Debug for ShellBuilder {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ShellBuilder")
      .field("config", &self.config)
      .field("platform", &self.platform.is_some())
      .field("registry", &self.registry.is_some())
      .field("event_loop", &self.event_loop.is_some())
      .finish()
  }
}

impl ShellBuilder {
  pub fn config(mut self, config: Config) -> Self {
    self.config = config;
    self
  }

  /// Windowing backend. Default: [`crate::WindowsPlatform`] on Windows;
  /// required elsewhere.
  pub fn platform(mut self, platform: Arc<dyn Platform>) -> Self {
    self.platform = Some(platform);
    self
  }

  /// Position reservation service. Required.
  pub fn registry(mut self, registry: Arc<dyn DockingRegistry>) -> Self {
    self.registry = Some(registry);
    self
  }

  /// Loop to run reactions on, when the host already drives one. Default: a
  /// new [`EventLoop`].
  pub fn event_loop(mut self, event_loop: EventLoop) -> Self {
    self.event_loop = Some(event_loop);
    self
  }

  /// Build the shell and start full-screen polling.
  #[must_use = "Shell instance must be stored to keep polling active"]
  pub fn build(self) -> AppBarResult<Shell> {
    self.config.validate()?;
    let platform = match self.platform {
      Some(platform) => platform,
      None => default_platform()?,
    };
    let registry = self
      .registry
      .ok_or_else(|| AppBarError::InvalidConfig("a docking registry is required".to_string()))?;
    let event_loop = self.event_loop.unwrap_or_default();
    Ok(Shell::create(self.config, platform, registry, event_loop))
  }
}

#[cfg(windows)]
fn default_platform() -> AppBarResult<Arc<dyn Platform>> {
  Ok(Arc::new(crate::platform::WindowsPlatform::new()))
}

#[cfg(not(windows))]
fn default_platform() -> AppBarResult<Arc<dyn Platform>> {
  Err(AppBarError::NotSupported(
    "no native platform on this OS; supply one with ShellBuilder::platform".to_string(),
  ))
}

impl Shell {
  pub fn builder() -> ShellBuilder {
    ShellBuilder::default()
  }

  fn create(
    config: Config,
    platform: Arc<dyn Platform>,
    registry: Arc<dyn DockingRegistry>,
    event_loop: EventLoop,
  ) -> Self {
    let (mut tx, rx) = async_broadcast::broadcast(config.event_channel_capacity);
    tx.set_overflow(true); // Drop oldest messages when full

    let monitors = MonitorCache::new(Arc::clone(&platform));
    let dpi = DpiContext::new(Arc::clone(&platform));
    let tracker = FullScreenTracker::new(
      Arc::clone(&platform),
      monitors.clone(),
      config.clone(),
      EventSink::new(tx.clone()),
    );
    tracker.start(&event_loop);

    Shell {
      platform,
      registry,
      tracker,
      monitors,
      dpi,
      event_loop,
      events_tx: tx,
      events_keepalive: rx.deactivate(),
      config,
    }
  }

  /// Subscribe to events from this instance.
  pub fn subscribe(&self) -> async_broadcast::Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  /// Dock `handle` with `options`. The window stays in `Opening` until
  /// [`DockedWindow::open`] is called.
  pub fn dock(&self, handle: WindowHandle, options: DockOptions) -> AppBarResult<DockedWindow> {
    let ctx = DockContext {
      platform: Arc::clone(&self.platform),
      registry: Arc::clone(&self.registry),
      tracker: self.tracker.clone(),
      monitors: self.monitors.clone(),
      dpi: self.dpi.clone(),
      event_loop: self.event_loop.clone(),
      events: EventSink::new(self.events_tx.clone()),
      running_as_shell: self.config.running_as_shell,
      reassert_delay: Duration::from_millis(self.config.reassert_delay_ms),
    };
    DockedWindow::new(ctx, handle, options)
  }

  pub fn tracker(&self) -> &FullScreenTracker {
    &self.tracker
  }

  pub fn dpi(&self) -> &DpiContext {
    &self.dpi
  }

  pub fn monitors(&self) -> &MonitorCache {
    &self.monitors
  }

  /// The loop every reaction of this shell runs on. Drive it from the UI
  /// thread.
  pub fn event_loop(&self) -> &EventLoop {
    &self.event_loop
  }

  pub fn config(&self) -> &Config {
    &self.config
  }
}
