/*!
Test doubles: a scripted platform and a recording registry.

`MockPlatform` keeps a small window table and records every mutating call so
tests can assert on what a docked window asked the native layer to do.
*/

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::EventLoop;
use crate::dpi::to_px;
use crate::platform::{Platform, WindowStyle};
use crate::registry::{BarRequest, DockingRegistry, Registration};
use crate::types::{
  AppBarError, AppBarResult, Edge, ProcessId, Rect, ScreenInfo, WindowHandle,
};
use crate::{Config, Shell};

/// Process ID the mock reports for edgedock itself.
pub(crate) const OWN_PID: ProcessId = ProcessId(1000);

pub(crate) fn screen(name: &str, left: i32, top: i32, width: i32, height: i32, primary: bool) -> ScreenInfo {
  ScreenInfo::new(name, Rect::new(left, top, width, height), primary)
}

/// A scripted native window.
#[derive(Debug, Clone)]
pub(crate) struct MockWindow {
  pub rect: Rect,
  /// Client rect in screen coordinates. Defaults to `rect`.
  pub client_rect: Option<Rect>,
  pub style: WindowStyle,
  pub pid: ProcessId,
  pub visible: bool,
  pub minimized: bool,
  pub class: String,
  pub cloaked: bool,
  /// Cloak query fails instead of answering.
  pub cloak_error: bool,
  pub dpi_scale: Option<f64>,
}

impl MockWindow {
  /// A visible application window from another process.
  pub fn app(rect: Rect) -> Self {
    Self {
      rect,
      client_rect: None,
      style: WindowStyle::default(),
      pid: ProcessId(4242),
      visible: true,
      minimized: false,
      class: "ApplicationFrameWindow".to_string(),
      cloaked: false,
      cloak_error: false,
      dpi_scale: None,
    }
  }

  /// A window owned by edgedock's own process.
  pub fn own(rect: Rect) -> Self {
    Self {
      pid: OWN_PID,
      class: "EdgedockBar".to_string(),
      ..Self::app(rect)
    }
  }
}

/// Mutating platform calls, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlatformCall {
  SetBounds {
    window: WindowHandle,
    rect: Rect,
    resize: bool,
  },
  TopMost(WindowHandle),
  BottomMost(WindowHandle),
  Visible(WindowHandle, bool),
  HideFromTasks(WindowHandle),
}

#[derive(Debug)]
struct MockState {
  monitors: Vec<ScreenInfo>,
  windows: HashMap<WindowHandle, MockWindow>,
  foreground: Option<WindowHandle>,
  system_dpi_scale: f64,
  enumerations: usize,
  calls: Vec<PlatformCall>,
}

type TopMostHook = Arc<dyn Fn(WindowHandle) + Send + Sync>;

pub(crate) struct MockPlatform {
  state: Mutex<MockState>,
  on_top_most: Mutex<Option<TopMostHook>>,
}

impl std::fmt::Debug for MockPlatform {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MockPlatform")
      .field("state", &*self.state.lock())
      .finish_non_exhaustive()
  }
}

impl MockPlatform {
  pub fn new(monitors: Vec<ScreenInfo>) -> Self {
    Self {
      state: Mutex::new(MockState {
        monitors,
        windows: HashMap::new(),
        foreground: None,
        system_dpi_scale: 1.0,
        enumerations: 0,
        calls: Vec::new(),
      }),
      on_top_most: Mutex::new(None),
    }
  }

  /// One 1920x1080 primary monitor named `DISPLAY1`.
  pub fn single_monitor() -> Self {
    Self::new(vec![screen("DISPLAY1", 0, 0, 1920, 1080, true)])
  }

  /// `DISPLAY1` (primary) with `DISPLAY2` to its right, both 1920x1080.
  pub fn dual_monitor() -> Self {
    Self::new(vec![
      screen("DISPLAY1", 0, 0, 1920, 1080, true),
      screen("DISPLAY2", 1920, 0, 1920, 1080, false),
    ])
  }

  pub fn set_monitors(&self, monitors: Vec<ScreenInfo>) {
    self.state.lock().monitors = monitors;
  }

  pub fn set_system_dpi_scale(&self, scale: f64) {
    self.state.lock().system_dpi_scale = scale;
  }

  pub fn monitor_enumerations(&self) -> usize {
    self.state.lock().enumerations
  }

  pub fn add_window(&self, window: WindowHandle, mock: MockWindow) {
    self.state.lock().windows.insert(window, mock);
  }

  pub fn update_window(&self, window: WindowHandle, f: impl FnOnce(&mut MockWindow)) {
    if let Some(mock) = self.state.lock().windows.get_mut(&window) {
      f(mock);
    }
  }

  pub fn remove_window(&self, window: WindowHandle) {
    self.state.lock().windows.remove(&window);
  }

  pub fn set_foreground(&self, window: Option<WindowHandle>) {
    self.state.lock().foreground = window;
  }

  pub fn calls(&self) -> Vec<PlatformCall> {
    self.state.lock().calls.clone()
  }

  pub fn clear_calls(&self) {
    self.state.lock().calls.clear();
  }

  /// Run `hook` synchronously from `show_top_most`, like a native
  /// position-changing message delivered during the z-order change.
  pub fn on_top_most(&self, hook: impl Fn(WindowHandle) + Send + Sync + 'static) {
    *self.on_top_most.lock() = Some(Arc::new(hook));
  }

  fn record(&self, call: PlatformCall) {
    self.state.lock().calls.push(call);
  }

  fn with_window<R>(&self, window: WindowHandle, f: impl FnOnce(&MockWindow) -> R) -> Option<R> {
    self.state.lock().windows.get(&window).map(f)
  }
}

impl Platform for MockPlatform {
  fn current_process_id(&self) -> ProcessId {
    OWN_PID
  }

  fn foreground_window(&self) -> Option<WindowHandle> {
    self.state.lock().foreground
  }

  fn window_rect(&self, window: WindowHandle) -> AppBarResult<Rect> {
    self
      .with_window(window, |w| w.rect)
      .ok_or(AppBarError::WindowNotFound(window))
  }

  fn client_rect_on_screen(&self, window: WindowHandle) -> AppBarResult<Rect> {
    self
      .with_window(window, |w| w.client_rect.unwrap_or(w.rect))
      .ok_or(AppBarError::WindowNotFound(window))
  }

  fn window_style(&self, window: WindowHandle) -> WindowStyle {
    self.with_window(window, |w| w.style).unwrap_or_default()
  }

  fn window_process_id(&self, window: WindowHandle) -> Option<ProcessId> {
    self.with_window(window, |w| w.pid)
  }

  fn is_window(&self, window: WindowHandle) -> bool {
    self.with_window(window, |_| ()).is_some()
  }

  fn is_visible(&self, window: WindowHandle) -> bool {
    self.with_window(window, |w| w.visible).unwrap_or(false)
  }

  fn is_minimized(&self, window: WindowHandle) -> bool {
    self.with_window(window, |w| w.minimized).unwrap_or(false)
  }

  fn class_name(&self, window: WindowHandle) -> AppBarResult<String> {
    self
      .with_window(window, |w| w.class.clone())
      .ok_or(AppBarError::WindowNotFound(window))
  }

  fn is_cloaked(&self, window: WindowHandle) -> AppBarResult<bool> {
    match self.with_window(window, |w| (w.cloaked, w.cloak_error)) {
      Some((_, true)) => Err(AppBarError::native("DwmGetWindowAttribute", "mock failure")),
      Some((cloaked, false)) => Ok(cloaked),
      None => Err(AppBarError::WindowNotFound(window)),
    }
  }

  fn monitors(&self) -> AppBarResult<Vec<ScreenInfo>> {
    let mut state = self.state.lock();
    state.enumerations += 1;
    Ok(state.monitors.clone())
  }

  fn monitor_from_window(&self, window: WindowHandle) -> Option<String> {
    let state = self.state.lock();
    let rect = state.windows.get(&window)?.rect;
    let (x, y) = (rect.left + rect.width() / 2, rect.top + rect.height() / 2);
    state
      .monitors
      .iter()
      .find(|m| {
        (m.bounds.left..m.bounds.right).contains(&x) && (m.bounds.top..m.bounds.bottom).contains(&y)
      })
      .or_else(|| state.monitors.iter().find(|m| m.primary))
      .map(|m| m.device_name.clone())
  }

  fn system_dpi_scale(&self) -> f64 {
    self.state.lock().system_dpi_scale
  }

  fn window_dpi_scale(&self, window: WindowHandle) -> Option<f64> {
    self.with_window(window, |w| w.dpi_scale).flatten()
  }

  fn set_window_bounds(&self, window: WindowHandle, rect: Rect, resize: bool) -> AppBarResult<()> {
    let mut state = self.state.lock();
    let mock = state
      .windows
      .get_mut(&window)
      .ok_or(AppBarError::WindowNotFound(window))?;
    mock.rect = if resize {
      rect
    } else {
      Rect::new(rect.left, rect.top, mock.rect.width(), mock.rect.height())
    };
    state.calls.push(PlatformCall::SetBounds {
      window,
      rect,
      resize,
    });
    Ok(())
  }

  fn show_top_most(&self, window: WindowHandle) -> AppBarResult<()> {
    self.record(PlatformCall::TopMost(window));
    // Clone out so the hook runs without the lock held
    let hook = self.on_top_most.lock().clone();
    if let Some(hook) = hook {
      hook(window);
    }
    Ok(())
  }

  fn show_bottom_most(&self, window: WindowHandle) -> AppBarResult<()> {
    self.record(PlatformCall::BottomMost(window));
    Ok(())
  }

  fn set_visible(&self, window: WindowHandle, visible: bool) -> AppBarResult<()> {
    self.record(PlatformCall::Visible(window, visible));
    if let Some(mock) = self.state.lock().windows.get_mut(&window) {
      mock.visible = visible;
    }
    Ok(())
  }

  fn hide_from_tasks(&self, window: WindowHandle) -> AppBarResult<()> {
    self.record(PlatformCall::HideFromTasks(window));
    Ok(())
  }
}

/// Registry calls, in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RegistryCall {
  Register {
    window: WindowHandle,
    edge: Edge,
    width: f64,
    height: f64,
  },
  Unregister(WindowHandle),
  SetPosition {
    window: WindowHandle,
    edge: Edge,
    width: f64,
    height: f64,
  },
  SetWorkArea(String),
  RegisterAutoHide(WindowHandle, Edge),
  UnregisterAutoHide(WindowHandle),
  Activated(WindowHandle),
  PositionChanged(WindowHandle),
}

#[derive(Debug, Default)]
struct RegistryState {
  registered: HashSet<WindowHandle>,
  auto_hide: HashSet<WindowHandle>,
  reserved: HashMap<Edge, f64>,
  assignment: Option<Rect>,
  next_message_id: u32,
  calls: Vec<RegistryCall>,
}

/// Registry that places bars flush against their edge and records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingRegistry {
  state: Mutex<RegistryState>,
}

/// First message ID handed out by [`RecordingRegistry`].
pub(crate) const FIRST_MESSAGE_ID: u32 = 0xC100;

impl RecordingRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> Vec<RegistryCall> {
    self.state.lock().calls.clone()
  }

  pub fn clear_calls(&self) {
    self.state.lock().calls.clear();
  }

  pub fn is_auto_hide(&self, window: WindowHandle) -> bool {
    self.state.lock().auto_hide.contains(&window)
  }

  /// Thickness already reserved on an edge by other bars.
  pub fn set_reserved(&self, edge: Edge, thickness: f64) {
    self.state.lock().reserved.insert(edge, thickness);
  }

  /// Force every assignment to `rect` instead of computing one.
  pub fn set_assignment(&self, rect: Option<Rect>) {
    self.state.lock().assignment = rect;
  }

  fn assign(&self, request: &BarRequest<'_>) -> Rect {
    if let Some(rect) = self.state.lock().assignment {
      return rect;
    }
    let bounds = request.screen.bounds;
    let width = to_px(request.width);
    let height = to_px(request.height);
    match request.edge {
      Edge::Left | Edge::Top => Rect::new(bounds.left, bounds.top, width, height),
      Edge::Right => Rect::new(bounds.right - width, bounds.top, width, height),
      Edge::Bottom => Rect::new(bounds.left, bounds.bottom - height, width, height),
    }
  }
}

impl DockingRegistry for RecordingRegistry {
  fn is_registered(&self, window: WindowHandle) -> bool {
    self.state.lock().registered.contains(&window)
  }

  fn register(&self, request: &BarRequest<'_>) -> Registration {
    let assigned = self.assign(request);
    let mut state = self.state.lock();
    state.registered.insert(request.window);
    state.calls.push(RegistryCall::Register {
      window: request.window,
      edge: request.edge,
      width: request.width,
      height: request.height,
    });
    let message_id = FIRST_MESSAGE_ID + state.next_message_id;
    state.next_message_id += 1;
    Registration {
      message_id,
      assigned: Some(assigned),
    }
  }

  fn unregister(&self, window: WindowHandle, _width: f64, _height: f64) {
    let mut state = self.state.lock();
    state.registered.remove(&window);
    state.calls.push(RegistryCall::Unregister(window));
  }

  fn set_position(&self, request: &BarRequest<'_>) -> Option<Rect> {
    let assigned = self.assign(request);
    self.state.lock().calls.push(RegistryCall::SetPosition {
      window: request.window,
      edge: request.edge,
      width: request.width,
      height: request.height,
    });
    Some(assigned)
  }

  fn edge_reserved_thickness(&self, edge: Edge, _screen: &ScreenInfo) -> f64 {
    self.state.lock().reserved.get(&edge).copied().unwrap_or(0.0)
  }

  fn set_work_area(&self, screen: &ScreenInfo) {
    self
      .state
      .lock()
      .calls
      .push(RegistryCall::SetWorkArea(screen.device_name.clone()));
  }

  fn register_auto_hide(&self, window: WindowHandle, edge: Edge, _screen: &ScreenInfo) {
    let mut state = self.state.lock();
    state.auto_hide.insert(window);
    state.calls.push(RegistryCall::RegisterAutoHide(window, edge));
  }

  fn unregister_auto_hide(&self, window: WindowHandle) {
    let mut state = self.state.lock();
    state.auto_hide.remove(&window);
    state.calls.push(RegistryCall::UnregisterAutoHide(window));
  }

  fn notify_activated(&self, window: WindowHandle) {
    self.state.lock().calls.push(RegistryCall::Activated(window));
  }

  fn notify_position_changed(&self, window: WindowHandle) {
    self
      .state
      .lock()
      .calls
      .push(RegistryCall::PositionChanged(window));
  }
}

/// A shell over a mock platform and recording registry.
pub(crate) fn test_shell(
  platform: MockPlatform,
  config: Config,
) -> (Arc<MockPlatform>, Arc<RecordingRegistry>, Shell) {
  let platform = Arc::new(platform);
  let registry = Arc::new(RecordingRegistry::new());
  let shell = Shell::builder()
    .config(config)
    .platform(platform.clone())
    .registry(registry.clone())
    .event_loop(EventLoop::with_manual_clock(Instant::now()))
    .build()
    .expect("test shell builds");
  (platform, registry, shell)
}
