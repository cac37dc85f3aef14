//! # keybridge
//!
//! Global keyboard and mouse events, delivered on your application's own
//! update loop.
//!
//! The OS calls low-level hooks for every keystroke and mouse action in the
//! system, whether or not the application has focus. keybridge translates each
//! notification into a [`KeyboardEvent`] or [`MouseEvent`], queues it, and
//! hands it to your subscribers the next time you call [`GlobalInput::update`].
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn main() -> keybridge::Result<()> {
//! use keybridge::{GlobalInput, Key, Modifiers};
//!
//! let mut input = GlobalInput::native();
//! input.subscribe_keyboard(|event| {
//!     if event.is_key_down && event.key == Key::F12 && event.has_modifiers(Modifiers::CONTROL) {
//!         println!("Ctrl+F12 pressed somewhere");
//!     }
//! });
//! input.subscribe_mouse(|event| {
//!     if event.is_wheel {
//!         println!("wheel {} at {:?}", event.wheel_delta, event.position());
//!     }
//! });
//! input.start()?;
//!
//! loop {
//!     // Once per frame, on the thread that called `start`.
//!     input.update();
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! # }
//! # #[cfg(not(target_os = "windows"))]
//! # fn main() {}
//! ```
//!
//! ## Architecture
//!
//! - [`platform`]: the [`Platform`] trait over the OS hook API, with the
//!   Windows implementation.
//! - [`adapter`]: hook procedures that run on the OS callback thread and
//!   translate raw structs into events.
//! - [`channel`]: lock-free-for-producers queues between the callback thread
//!   and the consumer thread.
//! - [`hook`]: [`HookManager`], the start/stop lifecycle of the hook pair.
//! - [`dispatch`]: subscriber lists and the per-frame drain step.
//!
//! Hooks are removed when the [`HookManager`] (and so the [`GlobalInput`]) is
//! dropped, including during unwinding.

pub mod adapter;
pub mod channel;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hook;
pub mod keycode;
pub mod platform;

// Re-exports
pub use channel::{EventChannel, EventChannels};
pub use dispatch::{Dispatcher, GlobalInput, SubscriptionId};
pub use error::{Error, OsError, Result};
pub use event::{KeyboardEvent, Modifiers, MouseButton, MouseEvent};
pub use hook::HookManager;
pub use keycode::Key;
#[cfg(target_os = "windows")]
pub use platform::NativePlatform;
pub use platform::{HookHandle, HookKind, HookProc, Platform};
