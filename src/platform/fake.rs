//! In-memory platform used by the unit tests.

use super::{HookHandle, HookKind, HookProc, Platform};
use crate::adapter::{RawKeyboard, RawMouse};
use crate::error::OsError;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// Error code reported for simulated failures (`ERROR_ACCESS_DENIED`).
pub const ACCESS_DENIED: i32 = 5;

#[derive(Default)]
struct State {
    next_handle: isize,
    installed: HashMap<HookHandle, HookKind>,
    register_calls: Vec<HookKind>,
    unregister_calls: Vec<HookKind>,
    fail_register: HashSet<HookKind>,
    fail_unregister: HashSet<HookKind>,
    // Kept after unregistering, to model a notification that was already
    // in flight when the hook was removed.
    last_proc: HashMap<HookKind, Arc<dyn HookProc>>,
    forwarded: Vec<(Option<isize>, i32, usize)>,
    pressed: HashSet<u32>,
    panic_on_key_query: bool,
}

/// Fake hook API that records every call.
#[derive(Default)]
pub struct FakePlatform {
    state: Mutex<State>,
}

impl FakePlatform {
    /// Value returned by [`Platform::forward`].
    pub const FORWARD_RESULT: isize = 0x5A;

    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn fail_register(&self, kind: HookKind) {
        self.state().fail_register.insert(kind);
    }

    pub fn fail_unregister(&self, kind: HookKind) {
        self.state().fail_unregister.insert(kind);
    }

    pub fn clear_failures(&self) {
        let mut state = self.state();
        state.fail_register.clear();
        state.fail_unregister.clear();
    }

    pub fn press(&self, vk: u32) {
        self.state().pressed.insert(vk);
    }

    pub fn panic_on_key_query(&self, enabled: bool) {
        self.state().panic_on_key_query = enabled;
    }

    /// Number of hooks currently installed.
    pub fn installed(&self) -> usize {
        self.state().installed.len()
    }

    pub fn register_calls(&self) -> Vec<HookKind> {
        self.state().register_calls.clone()
    }

    pub fn unregister_calls(&self) -> Vec<HookKind> {
        self.state().unregister_calls.clone()
    }

    pub fn forwarded(&self) -> Vec<(Option<isize>, i32, usize)> {
        self.state().forwarded.clone()
    }

    fn last_proc(&self, kind: HookKind) -> Option<Arc<dyn HookProc>> {
        self.state().last_proc.get(&kind).cloned()
    }

    /// Deliver a keyboard notification the way the OS would.
    ///
    /// Returns `None` if no keyboard hook was ever installed.
    pub fn send_keyboard(&self, code: i32, message: usize, input: RawKeyboard) -> Option<isize> {
        let hook_proc = self.last_proc(HookKind::Keyboard)?;
        // SAFETY: `input` outlives the call.
        Some(unsafe { hook_proc.invoke(code, message, &input as *const RawKeyboard as isize) })
    }

    /// Deliver a mouse notification the way the OS would.
    pub fn send_mouse(&self, code: i32, message: usize, input: RawMouse) -> Option<isize> {
        let hook_proc = self.last_proc(HookKind::Mouse)?;
        // SAFETY: `input` outlives the call.
        Some(unsafe { hook_proc.invoke(code, message, &input as *const RawMouse as isize) })
    }
}

impl Platform for FakePlatform {
    fn register(&self, kind: HookKind, hook_proc: Arc<dyn HookProc>) -> Result<HookHandle, OsError> {
        let mut state = self.state();
        state.register_calls.push(kind);
        if state.fail_register.contains(&kind) {
            return Err(OsError::new(ACCESS_DENIED, "Access is denied."));
        }
        state.next_handle += 1;
        let handle = HookHandle::from_raw(state.next_handle).unwrap();
        state.installed.insert(handle, kind);
        state.last_proc.insert(kind, hook_proc);
        Ok(handle)
    }

    fn unregister(&self, handle: HookHandle) -> Result<(), OsError> {
        let mut state = self.state();
        let Some(kind) = state.installed.get(&handle).copied() else {
            return Err(OsError::new(1404, "Invalid hook handle."));
        };
        state.unregister_calls.push(kind);
        if state.fail_unregister.contains(&kind) {
            return Err(OsError::new(ACCESS_DENIED, "Access is denied."));
        }
        state.installed.remove(&handle);
        Ok(())
    }

    fn forward(&self, handle: Option<HookHandle>, code: i32, message: usize, _data: isize) -> isize {
        self.state()
            .forwarded
            .push((handle.map(HookHandle::as_raw), code, message));
        Self::FORWARD_RESULT
    }

    fn key_down(&self, vk: u32) -> bool {
        let state = self.state();
        if state.panic_on_key_query {
            drop(state);
            panic!("key state query failed");
        }
        state.pressed.contains(&vk)
    }
}
