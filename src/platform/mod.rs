//! The seam between the bridge and the operating system's hook API.
//!
//! [`Platform`] exposes the four primitives a low-level hook needs: install,
//! remove, pass a notification down the hook chain, and query the physical
//! state of a key. The Windows implementation lives in the `windows` submodule; tests drive
//! the bridge through a fake implementation.

use crate::error::OsError;
use std::fmt;
use std::num::NonZeroIsize;
use std::sync::Arc;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(test)]
pub(crate) mod fake;

/// `WH_KEYBOARD_LL`
pub const WH_KEYBOARD_LL: i32 = 13;
/// `WH_MOUSE_LL`
pub const WH_MOUSE_LL: i32 = 14;

/// The two hook classes the bridge installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Keyboard,
    Mouse,
}

impl HookKind {
    /// The platform hook id (`idHook`) for this kind.
    pub fn id(self) -> i32 {
        match self {
            HookKind::Keyboard => WH_KEYBOARD_LL,
            HookKind::Mouse => WH_MOUSE_LL,
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Keyboard => f.write_str("keyboard"),
            HookKind::Mouse => f.write_str("mouse"),
        }
    }
}

/// Opaque handle of an installed hook. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookHandle(NonZeroIsize);

impl HookHandle {
    /// Wrap a raw handle value, `None` if it is the null handle.
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(HookHandle)
    }

    /// The raw handle value.
    pub fn as_raw(self) -> isize {
        self.0.get()
    }
}

/// A procedure the OS calls for every notification of one hook class.
pub trait HookProc: Send + Sync {
    /// Handle one notification and return the value to hand back to the OS.
    ///
    /// # Safety
    ///
    /// When `code >= 0`, `data` must point to a live raw struct matching the
    /// hook class (`RawKeyboard` or `RawMouse`) for the duration of the call.
    unsafe fn invoke(&self, code: i32, message: usize, data: isize) -> isize;
}

/// Operating system hook primitives.
pub trait Platform: Send + Sync + 'static {
    /// Install a system-wide hook of `kind` that calls `hook_proc`.
    ///
    /// The platform may keep a clone of `hook_proc` until [`Platform::unregister`]
    /// is called with the returned handle.
    fn register(&self, kind: HookKind, hook_proc: Arc<dyn HookProc>) -> Result<HookHandle, OsError>;

    /// Remove a hook installed by [`Platform::register`].
    fn unregister(&self, handle: HookHandle) -> Result<(), OsError>;

    /// Pass a notification to the next hook in the chain and return its result.
    fn forward(&self, handle: Option<HookHandle>, code: i32, message: usize, data: isize) -> isize;

    /// Whether the key with virtual-key code `vk` is physically held down.
    fn key_down(&self, vk: u32) -> bool;

    /// Deliver pending OS messages on the calling thread.
    ///
    /// Low-level hooks on Windows only fire while the installing thread
    /// retrieves messages. Hosts that already run a message loop can ignore this.
    fn pump(&self) {}
}

/// The platform implementation for the current target.
#[cfg(target_os = "windows")]
pub type NativePlatform = self::windows::WindowsPlatform;
