/*! Core types for edgedock.

Regenerate TypeScript types: `cargo test export_bindings`
*/

#![allow(missing_docs)]

mod edge;
mod error;
mod event;
mod geometry;
mod ids;
mod screen;

pub use edge::{DockMode, Edge, Lifecycle, Orientation};
pub use error::{AppBarError, AppBarResult};
pub use event::{DockProperty, Event, FullScreenApp};
pub use geometry::Rect;
pub use ids::{ProcessId, WindowHandle};
pub use screen::{ScreenInfo, VIRTUAL_SCREEN_NAME};
