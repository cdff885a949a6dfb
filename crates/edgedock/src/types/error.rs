/*! Error types for edgedock operations. */

use std::thread::ThreadId;

use super::WindowHandle;

/// Errors that can occur during docking operations.
///
/// Most reactions inside a docked window never surface these: a failed native
/// call is logged and the update is skipped. They are returned from the
/// construction and loop-driving entry points.
#[derive(Debug, thiserror::Error)]
pub enum AppBarError {
  #[error("Native call {call} failed: {reason}")]
  NativeCall { call: &'static str, reason: String },

  #[error("Window not found: {0}")]
  WindowNotFound(WindowHandle),

  #[error("No monitors available")]
  NoMonitors,

  #[error("Event loop owned by thread {owner:?} was driven from thread {actual:?}")]
  WrongThread { owner: ThreadId, actual: ThreadId },

  #[error("Operation not supported: {0}")]
  NotSupported(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),
}

impl AppBarError {
  pub(crate) fn native(call: &'static str, reason: impl std::fmt::Display) -> Self {
    Self::NativeCall {
      call,
      reason: reason.to_string(),
    }
  }
}

/// Result type for edgedock operations.
pub type AppBarResult<T> = Result<T, AppBarError>;
