/*! Branded ID types for native entities. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Native top-level window handle (an `HWND` on Windows).
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct WindowHandle(pub isize);

impl WindowHandle {
  /// The null handle.
  pub const NULL: Self = Self(0);

  pub const fn is_null(self) -> bool {
    self.0 == 0
  }
}

/// Process ID - branded type to distinguish from other u32 values.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct ProcessId(pub u32);
