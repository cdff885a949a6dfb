/*!
edgedock - screen-edge docking for desktop shells

Docks windows to a monitor edge as application bars, keeps their reservations
in sync with a docking registry, and gets them out of the way of full-screen
applications.

```ignore
use edgedock::{attach, DockOptions, Edge, Shell};

// Polling for full-screen apps starts automatically
let shell = Shell::builder().registry(registry).build()?;

// Dock a window along the bottom of the primary monitor
let bar = shell.dock(handle, DockOptions::new(Edge::Bottom, 40.0))?;
let _guard = attach(&bar)?; // route native messages (Windows)
bar.open()?;

// Subscribe to events
let mut events = shell.subscribe();
while let Ok(event) = events.recv().await {
    // handle event
}

// Drive every reaction from the UI thread
shell.event_loop().run(&stop)?;
```
*/

mod config;
mod core;
mod dispatch;
mod dock;
mod dpi;
mod events;
mod fullscreen;
mod platform;
mod polling;
mod registry;
mod screens;

#[cfg(test)]
mod testing;

mod types;
pub use types::*;

pub use crate::config::Config;
pub use crate::core::{Shell, ShellBuilder};
pub use crate::dispatch::{EventLoop, Task, TimerId};
pub use crate::dock::{
  compute_screen_position, CloseDecision, DefaultHooks, DockHooks, DockOptions, DockedWindow,
  InsertAfter, PendingPosition, RegistryNotification, ScreenChangeReason, WindowMessage,
  DEVNODES_CHANGED,
};
pub use crate::dpi::{scale_from_dpi, DpiContext, BASE_DPI};
pub use crate::fullscreen::{FullScreenListener, FullScreenTracker, ListenerId, MembershipChange};
pub use crate::platform::{Platform, WindowStyle};
pub use crate::registry::{BarRequest, DockingRegistry, Registration};
pub use crate::screens::MonitorCache;

#[cfg(windows)]
pub use crate::platform::{attach, SubclassGuard, WindowsPlatform};
