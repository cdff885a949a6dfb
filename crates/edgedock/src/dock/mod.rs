/*!
Docked windows: the screen-edge (AppBar) state machine.

A [`DockedWindow`] reserves a strip along one edge of a monitor, keeps its
reservation in sync with the [`DockingRegistry`], follows DPI and display
topology changes, and steps out of the way of full-screen applications.

```text
Opening --open()--> Active --request_close()--> Closing --proceed--> Closed
                      ^                            |
                      +----------- veto -----------+
```

# Module Structure

- `mod.rs` - DockedWindow, options, properties
- `lifecycle.rs` - `open()` and two-phase close
- `registration.rs` - registry reservations and position assertion
- `messages.rs` - native message reactions, screen-change reprocessing
- `concession.rs` - yielding topmost to full-screen apps
- `geometry.rs` - pure rectangle computation
- `hooks.rs` - embedder overrides

Locking: state lives behind one `RwLock`, never held while calling the
platform, the registry, hooks or the tracker. Native calls may synchronously
deliver messages back into [`DockedWindow::handle_message`].
*/

mod concession;
mod geometry;
mod hooks;
mod lifecycle;
mod messages;
mod registration;

pub use geometry::compute_screen_position;
pub use hooks::{DefaultHooks, DockHooks};
pub use lifecycle::CloseDecision;
pub use messages::{
  InsertAfter, PendingPosition, RegistryNotification, ScreenChangeReason, WindowMessage,
  DEVNODES_CHANGED,
};

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatch::EventLoop;
use crate::dpi::DpiContext;
use crate::events::EventSink;
use crate::fullscreen::{FullScreenListener, FullScreenTracker, ListenerId};
use crate::platform::Platform;
use crate::registry::DockingRegistry;
use crate::screens::MonitorCache;
use crate::types::{
  AppBarResult, DockMode, DockProperty, Edge, Event, Lifecycle, Orientation, Rect, ScreenInfo,
  WindowHandle,
};

/// Construction parameters for a docked window.
///
/// # Example
///
/// ```ignore
/// let options = DockOptions::new(Edge::Bottom, 40.0)
///     .mode(DockMode::AutoHide)
///     .requires_screen_edge(true);
/// let bar = shell.dock(handle, options)?;
/// bar.open()?;
/// ```
#[derive(Clone)]
#[must_use = "Options do nothing until passed to Shell::dock"]
pub struct DockOptions {
  screen: Option<ScreenInfo>,
  edge: Edge,
  mode: DockMode,
  size: f64,
  requires_screen_edge: bool,
  process_screen_changes: bool,
  hooks: Option<Arc<dyn DockHooks>>,
}

impl std::fmt::Debug for DockOptions {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("DockOptions")
      .field("screen", &self.screen.as_ref().map(|s| &s.device_name))
      .field("edge", &self.edge)
      .field("mode", &self.mode)
      .field("size", &self.size)
      .finish_non_exhaustive()
  }
}

impl DockOptions {
  /// Dock to `edge` with a thickness of `size` device-independent units.
  pub fn new(edge: Edge, size: f64) -> Self {
    Self {
      screen: None,
      edge,
      mode: DockMode::Normal,
      size,
      requires_screen_edge: false,
      process_screen_changes: true,
      hooks: None,
    }
  }

  /// Target monitor. Default: the primary monitor.
  pub fn screen(mut self, screen: ScreenInfo) -> Self {
    self.screen = Some(screen);
    self
  }

  /// Default: [`DockMode::Normal`].
  pub fn mode(mut self, mode: DockMode) -> Self {
    self.mode = mode;
    self
  }

  /// Sit flush against the screen edge instead of stacking after bars
  /// already docked there. Default: false.
  pub fn requires_screen_edge(mut self, requires: bool) -> Self {
    self.requires_screen_edge = requires;
    self
  }

  /// React to display, device and compositor changes while on the primary
  /// monitor. Default: true.
  pub fn process_screen_changes(mut self, process: bool) -> Self {
    self.process_screen_changes = process;
    self
  }

  /// Default: [`DefaultHooks`].
  pub fn hooks(mut self, hooks: Arc<dyn DockHooks>) -> Self {
    self.hooks = Some(hooks);
    self
  }
}

struct DockState {
  lifecycle: Lifecycle,
  edge: Edge,
  mode: DockMode,
  desired_width: f64,
  desired_height: f64,
  dpi_scale: f64,
  screen: ScreenInfo,
  requires_screen_edge: bool,
  process_screen_changes: bool,
  allow_close: bool,
  topmost: bool,
  /// Set only while bringing the window back to the topmost band.
  raising: bool,
  visible: bool,
  message_id: Option<u32>,
  listener: Option<(ListenerId, Arc<dyn FullScreenListener>)>,
  last_asserted: Option<Rect>,
}

impl DockState {
  fn is_shutting_down(&self) -> bool {
    self.allow_close || matches!(self.lifecycle, Lifecycle::Closing | Lifecycle::Closed)
  }
}

/// Shared collaborators handed to every docked window by the shell.
#[derive(Clone)]
pub(crate) struct DockContext {
  pub(crate) platform: Arc<dyn Platform>,
  pub(crate) registry: Arc<dyn DockingRegistry>,
  pub(crate) tracker: FullScreenTracker,
  pub(crate) monitors: MonitorCache,
  pub(crate) dpi: DpiContext,
  pub(crate) event_loop: EventLoop,
  pub(crate) events: EventSink,
  pub(crate) running_as_shell: bool,
  pub(crate) reassert_delay: Duration,
}

struct DockInner {
  handle: WindowHandle,
  state: RwLock<DockState>,
  hooks: Arc<dyn DockHooks>,
  ctx: DockContext,
}

/// A window docked to a screen edge.
///
/// Clone is cheap (Arc bump); clones refer to the same window.
#[derive(Clone)]
pub struct DockedWindow {
  inner: Arc<DockInner>,
}

impl std::fmt::Debug for DockedWindow {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = self.inner.state.read();
    f.debug_struct("DockedWindow")
      .field("handle", &self.inner.handle)
      .field("lifecycle", &state.lifecycle)
      .field("edge", &state.edge)
      .field("mode", &state.mode)
      .field("screen", &state.screen.device_name)
      .finish_non_exhaustive()
  }
}

impl DockedWindow {
  pub(crate) fn new(ctx: DockContext, handle: WindowHandle, options: DockOptions) -> AppBarResult<Self> {
    let screen = match options.screen {
      Some(screen) => screen,
      None => ctx.monitors.primary()?,
    };
    let (desired_width, desired_height) = match options.edge.orientation() {
      Orientation::Vertical => (options.size, 0.0),
      Orientation::Horizontal => (0.0, options.size),
    };

    let state = DockState {
      lifecycle: Lifecycle::Opening,
      edge: options.edge,
      mode: options.mode,
      desired_width,
      desired_height,
      dpi_scale: 1.0,
      screen,
      requires_screen_edge: options.requires_screen_edge,
      process_screen_changes: options.process_screen_changes,
      allow_close: false,
      topmost: true,
      raising: false,
      visible: true,
      message_id: None,
      listener: None,
      last_asserted: None,
    };

    Ok(Self {
      inner: Arc::new(DockInner {
        handle,
        state: RwLock::new(state),
        hooks: options.hooks.unwrap_or_else(|| Arc::new(DefaultHooks)),
        ctx,
      }),
    })
  }

  fn ctx(&self) -> &DockContext {
    &self.inner.ctx
  }

  /// Read state. Never call platform/registry functions inside the closure.
  #[inline]
  fn read<R>(&self, f: impl FnOnce(&DockState) -> R) -> R {
    f(&self.inner.state.read())
  }

  /// Write state. Never call platform/registry functions inside the closure.
  #[inline]
  fn write<R>(&self, f: impl FnOnce(&mut DockState) -> R) -> R {
    f(&mut self.inner.state.write())
  }

  pub fn handle(&self) -> WindowHandle {
    self.inner.handle
  }

  pub fn lifecycle(&self) -> Lifecycle {
    self.read(|s| s.lifecycle)
  }

  pub fn edge(&self) -> Edge {
    self.read(|s| s.edge)
  }

  /// Layout axis, derived from the edge.
  pub fn orientation(&self) -> Orientation {
    self.edge().orientation()
  }

  pub fn mode(&self) -> DockMode {
    self.read(|s| s.mode)
  }

  /// Thickness along the docking axis, in device-independent units.
  pub fn desired_size(&self) -> (f64, f64) {
    self.read(|s| (s.desired_width, s.desired_height))
  }

  /// DPI scale of this window's monitor.
  pub fn dpi_scale(&self) -> f64 {
    self.read(|s| s.dpi_scale)
  }

  pub fn screen(&self) -> ScreenInfo {
    self.read(|s| s.screen.clone())
  }

  /// Whether the window intends to be in the topmost band. False while
  /// conceding to a full-screen application.
  pub fn is_topmost(&self) -> bool {
    self.read(|s| s.topmost)
  }

  pub fn is_visible(&self) -> bool {
    self.read(|s| s.visible)
  }

  pub fn allow_close(&self) -> bool {
    self.read(|s| s.allow_close)
  }

  /// Identifier of this window's registry notifications, once registered.
  pub fn message_id(&self) -> Option<u32> {
    self.read(|s| s.message_id)
  }

  /// Permit the next close request to proceed under the default cleanup hook.
  pub fn set_allow_close(&self, allow: bool) {
    self.write(|s| s.allow_close = allow);
  }

  pub fn set_requires_screen_edge(&self, requires: bool) {
    self.write(|s| s.requires_screen_edge = requires);
  }

  pub fn set_process_screen_changes(&self, process: bool) {
    self.write(|s| s.process_screen_changes = process);
  }

  /// Move the bar to another edge.
  ///
  /// Orientation follows the edge, and the docking-axis thickness carries
  /// over when the orientation flips. An active bar drops its reservation
  /// before re-registering on the new edge.
  pub fn set_edge(&self, edge: Edge) {
    let Some((old, lifecycle, mode)) = self.write(|s| {
      if s.edge == edge {
        return None;
      }
      let old = s.edge;
      s.edge = edge;
      if old.orientation() != edge.orientation() {
        std::mem::swap(&mut s.desired_width, &mut s.desired_height);
      }
      Some((old, s.lifecycle, s.mode))
    }) else {
      return;
    };

    log::debug!("{} edge {old:?} -> {edge:?}", self.handle());
    self.emit_property(DockProperty::Edge(edge));
    if old.orientation() != edge.orientation() {
      self.emit_property(DockProperty::Orientation(edge.orientation()));
    }

    if lifecycle != Lifecycle::Active {
      return;
    }
    match mode {
      DockMode::Normal => {
        self.unregister();
        self.register();
      }
      DockMode::AutoHide => {
        let screen = self.screen();
        self.ctx().registry.unregister_auto_hide(self.handle());
        self.ctx().registry.register_auto_hide(self.handle(), edge, &screen);
      }
      DockMode::None => {}
    }
    self.set_screen_position();
  }

  /// Switch how the bar holds its reservation.
  ///
  /// Ignored by the registries while opening; `open()` registers according
  /// to the mode it finds.
  pub fn set_mode(&self, mode: DockMode) {
    let Some(lifecycle) = self.write(|s| {
      if s.mode == mode {
        return None;
      }
      s.mode = mode;
      Some(s.lifecycle)
    }) else {
      return;
    };

    log::debug!("{} mode -> {mode:?}", self.handle());
    self.emit_property(DockProperty::Mode(mode));

    if matches!(lifecycle, Lifecycle::Opening | Lifecycle::Closed) {
      return;
    }

    if mode == DockMode::Normal {
      self.register();
    } else {
      self.unregister();
    }

    if mode == DockMode::AutoHide {
      let (edge, screen) = self.read(|s| (s.edge, s.screen.clone()));
      self.ctx().registry.register_auto_hide(self.handle(), edge, &screen);
    } else {
      self.ctx().registry.unregister_auto_hide(self.handle());
    }
  }

  fn set_lifecycle(&self, lifecycle: Lifecycle) {
    let changed = self.write(|s| std::mem::replace(&mut s.lifecycle, lifecycle) != lifecycle);
    if changed {
      log::debug!("{} is {lifecycle:?}", self.handle());
      self.ctx().events.emit(Event::LifecycleChanged {
        window: self.handle(),
        lifecycle,
      });
    }
  }

  fn set_visible(&self, visible: bool) {
    if let Err(e) = self.ctx().platform.set_visible(self.handle(), visible) {
      log::warn!("Failed to set visibility of {}: {e}", self.handle());
      return;
    }
    let changed = self.write(|s| std::mem::replace(&mut s.visible, visible) != visible);
    if changed {
      self.emit_property(DockProperty::Visible(visible));
    }
  }

  fn emit_property(&self, property: DockProperty) {
    self.ctx().events.emit(Event::PropertyChanged {
      window: self.handle(),
      property,
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{
    test_shell, MockPlatform, MockWindow, PlatformCall, RecordingRegistry, RegistryCall,
  };
  use crate::{Config, Shell};

  pub(super) const BAR: WindowHandle = WindowHandle(0xBA4);

  /// A shell with one bar window on a single 1920x1080 monitor.
  pub(super) fn setup(config: Config) -> (Arc<MockPlatform>, Arc<RecordingRegistry>, Shell) {
    let (platform, registry, shell) = test_shell(MockPlatform::single_monitor(), config);
    platform.add_window(BAR, MockWindow::own(Rect::new(0, 0, 100, 100)));
    (platform, registry, shell)
  }

  pub(super) fn open_bar(shell: &Shell, options: DockOptions) -> DockedWindow {
    let bar = shell.dock(BAR, options).unwrap();
    bar.open().unwrap();
    bar
  }

  pub(super) fn drain(rx: &mut async_broadcast::Receiver<Event>) -> Vec<Event> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
  }

  mod options_tests {
    use super::*;

    #[test]
    fn size_goes_to_docking_axis() {
      let (_platform, _registry, shell) = setup(Config::default());
      let left = shell.dock(BAR, DockOptions::new(Edge::Left, 60.0)).unwrap();
      assert_eq!(left.desired_size(), (60.0, 0.0));
      assert_eq!(left.orientation(), Orientation::Vertical);

      let bottom = shell.dock(BAR, DockOptions::new(Edge::Bottom, 40.0)).unwrap();
      assert_eq!(bottom.desired_size(), (0.0, 40.0));
      assert_eq!(bottom.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn defaults_to_primary_monitor() {
      let (_platform, _registry, shell) = test_shell(MockPlatform::new(vec![
        crate::testing::screen("DISPLAY2", 1920, 0, 1920, 1080, false),
        crate::testing::screen("DISPLAY1", 0, 0, 1920, 1080, true),
      ]), Config::default());
      let bar = shell.dock(BAR, DockOptions::new(Edge::Top, 30.0)).unwrap();
      assert_eq!(bar.screen().device_name, "DISPLAY1");
      assert_eq!(bar.lifecycle(), Lifecycle::Opening);
      assert!(bar.is_topmost());
    }
  }

  mod edge_tests {
    use super::*;

    #[test]
    fn orientation_follows_edge() {
      let (_platform, _registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0));
      let mut rx = shell.subscribe();

      bar.set_edge(Edge::Top);
      assert_eq!(bar.orientation(), Orientation::Horizontal);
      assert_eq!(bar.desired_size(), (0.0, 60.0), "thickness carries over");

      let events = drain(&mut rx);
      assert!(events.iter().any(|e| matches!(
        e,
        Event::PropertyChanged { property: DockProperty::Edge(Edge::Top), .. }
      )));
      assert!(events.iter().any(|e| matches!(
        e,
        Event::PropertyChanged {
          property: DockProperty::Orientation(Orientation::Horizontal),
          ..
        }
      )));

      bar.set_edge(Edge::Bottom);
      assert_eq!(bar.orientation(), Orientation::Horizontal);
      assert_eq!(bar.desired_size(), (0.0, 60.0));
    }

    #[test]
    fn edge_change_unregisters_before_registering() {
      let (_platform, registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0));
      registry.clear_calls();

      bar.set_edge(Edge::Right);

      let calls = registry.calls();
      let unregister = calls
        .iter()
        .position(|c| *c == RegistryCall::Unregister(BAR))
        .unwrap();
      let register = calls
        .iter()
        .position(|c| matches!(c, RegistryCall::Register { edge: Edge::Right, .. }))
        .unwrap();
      assert!(unregister < register);
      assert!(registry.is_registered(BAR));
    }

    #[test]
    fn same_edge_is_a_no_op() {
      let (_platform, registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0));
      registry.clear_calls();
      bar.set_edge(Edge::Left);
      assert!(registry.calls().is_empty());
    }
  }

  mod mode_tests {
    use super::*;

    #[test]
    fn normal_to_auto_hide_swaps_registrations() {
      let (_platform, registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0));
      assert!(registry.is_registered(BAR));

      bar.set_mode(DockMode::AutoHide);
      assert!(!registry.is_registered(BAR));
      assert!(registry.is_auto_hide(BAR));

      bar.set_mode(DockMode::Normal);
      assert!(registry.is_registered(BAR));
      assert!(!registry.is_auto_hide(BAR));
    }

    #[test]
    fn none_drops_both_registrations() {
      let (_platform, registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0).mode(DockMode::AutoHide));
      assert!(registry.is_auto_hide(BAR));

      bar.set_mode(DockMode::None);
      assert!(!registry.is_registered(BAR));
      assert!(!registry.is_auto_hide(BAR));
    }

    #[test]
    fn mode_switch_suppressed_while_opening() {
      let (_platform, registry, shell) = setup(Config::default());
      let bar = shell.dock(BAR, DockOptions::new(Edge::Left, 60.0)).unwrap();

      bar.set_mode(DockMode::AutoHide);
      assert!(registry.calls().is_empty());

      bar.open().unwrap();
      assert!(registry.is_auto_hide(BAR), "open registers for the current mode");
      assert!(!registry.is_registered(BAR));
    }
  }

  mod visibility_tests {
    use super::*;

    #[test]
    fn set_visible_records_and_emits_once() {
      let (platform, _registry, shell) = setup(Config::default());
      let bar = open_bar(&shell, DockOptions::new(Edge::Left, 60.0));
      let mut rx = shell.subscribe();

      bar.set_visible(false);
      bar.set_visible(false);
      assert!(!bar.is_visible());
      assert!(platform.calls().contains(&PlatformCall::Visible(BAR, false)));

      let visibility_events = drain(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, Event::PropertyChanged { property: DockProperty::Visible(_), .. }))
        .count();
      assert_eq!(visibility_events, 1);
    }
  }
}
