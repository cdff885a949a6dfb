/*!
Opening and two-phase closing of a docked window.
*/

use std::sync::Arc;

use super::concession::ConcessionListener;
use super::DockedWindow;
use crate::fullscreen::FullScreenListener;
use crate::types::{AppBarError, AppBarResult, DockMode, DockProperty, Lifecycle};

/// Outcome of [`DockedWindow::request_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "A vetoed close must suppress the native close"]
pub enum CloseDecision {
  /// Cleanup ran and the window may be destroyed.
  Proceed,
  /// The cleanup hook declined; the native close must be suppressed.
  Veto,
}

impl DockedWindow {
  /// Complete the first position and registration cycle.
  ///
  /// Calling `open` on a window that is already open does nothing.
  pub fn open(&self) -> AppBarResult<()> {
    if self.lifecycle() != Lifecycle::Opening {
      log::debug!("{} already opened", self.handle());
      return Ok(());
    }
    let ctx = self.ctx();
    if !ctx.platform.is_window(self.handle()) {
      return Err(AppBarError::WindowNotFound(self.handle()));
    }

    // Seed the shared scale from the window itself: the system DPI may have
    // changed since logon.
    let primary = self.read(|s| s.screen.primary);
    if primary {
      if let Some(scale) = ctx.platform.window_dpi_scale(self.handle()) {
        ctx.dpi.set_scale(scale);
      }
    }
    let scale = ctx.dpi.scale();
    self.write(|s| s.dpi_scale = scale);
    self.emit_property(DockProperty::DpiScale(scale));

    self.set_position();
    if ctx.running_as_shell {
      self.delay_set_position();
    }

    let (mode, edge, screen) = self.read(|s| (s.mode, s.edge, s.screen.clone()));
    match mode {
      DockMode::Normal => self.register(),
      DockMode::AutoHide => ctx.registry.register_auto_hide(self.handle(), edge, &screen),
      DockMode::None => {}
    }
    self.raise_to_top_most();

    if let Err(e) = ctx.platform.hide_from_tasks(self.handle()) {
      log::warn!("Failed to hide {} from task switchers: {e}", self.handle());
    }

    let listener: Arc<dyn FullScreenListener> =
      Arc::new(ConcessionListener::new(Arc::downgrade(&self.inner)));
    let id = ctx.tracker.subscribe(&listener);
    self.write(|s| s.listener = Some((id, listener)));

    self.set_lifecycle(Lifecycle::Active);
    Ok(())
  }

  /// Two-phase close: run the cleanup hook, then either tear down or veto.
  ///
  /// On [`CloseDecision::Veto`] the window returns to its previous state and
  /// the caller must cancel the native close.
  pub fn request_close(&self) -> CloseDecision {
    let previous = self.lifecycle();
    if previous == Lifecycle::Closed {
      return CloseDecision::Proceed;
    }
    self.set_lifecycle(Lifecycle::Closing);

    let hooks = Arc::clone(&self.inner.hooks);
    if !hooks.cleanup(self.allow_close()) {
      log::debug!("{} close vetoed", self.handle());
      self.set_lifecycle(previous);
      return CloseDecision::Veto;
    }

    self.set_allow_close(true);
    self.unregister();
    self.ctx().registry.unregister_auto_hide(self.handle());
    if let Some((id, _listener)) = self.write(|s| s.listener.take()) {
      self.ctx().tracker.unsubscribe(id);
    }

    self.set_lifecycle(Lifecycle::Closed);
    CloseDecision::Proceed
  }
}
