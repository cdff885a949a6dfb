/*!
Platform layer.

Core code talks to the windowing system only through [`Platform`]. The Win32
implementation lives in `win32` and is compiled on Windows only; tests use a
scripted mock.
*/

mod traits;

#[cfg(windows)]
mod win32;

pub use traits::{Platform, WindowStyle};

#[cfg(windows)]
pub use win32::{attach, SubclassGuard, WindowsPlatform};
