//! Windows low-level hooks through `SetWindowsHookExW`.
//!
//! The OS calls a plain function pointer without user data, so each hook
//! class has a process-wide slot holding the procedure its trampoline
//! forwards to. Only one hook per class can be installed through this
//! platform at a time.

use super::{HookHandle, HookKind, HookProc, Platform};
use crate::error::OsError;
use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

use windows::Win32::Foundation::{LPARAM, LRESULT, WIN32_ERROR, WPARAM};
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, HHOOK, MSG, PM_REMOVE, PeekMessageW, PostQuitMessage,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, WINDOWS_HOOK_ID, WM_QUIT,
};

/// `ERROR_ALREADY_EXISTS`
const ERROR_ALREADY_EXISTS: i32 = 183;
/// `ERROR_INVALID_HOOK_HANDLE`
const ERROR_INVALID_HOOK_HANDLE: i32 = 1404;

struct Installed {
    handle: isize,
    hook_proc: Arc<dyn HookProc>,
}

type ProcSlot = RwLock<Option<Installed>>;

static KEYBOARD: ProcSlot = RwLock::new(None);
static MOUSE: ProcSlot = RwLock::new(None);

fn slot(kind: HookKind) -> &'static ProcSlot {
    match kind {
        HookKind::Keyboard => &KEYBOARD,
        HookKind::Mouse => &MOUSE,
    }
}

fn hhook(handle: HookHandle) -> HHOOK {
    HHOOK(handle.as_raw() as *mut c_void)
}

/// Keeps the plain Win32 code for `HRESULT_FROM_WIN32` failures.
fn os_error(err: windows::core::Error) -> OsError {
    let code = WIN32_ERROR::from_error(&err).map_or(err.code().0, |win32| win32.0 as i32);
    OsError::new(code, err.message())
}

/// Runs the stored procedure, or only forwards if there is none.
///
/// Panics never cross back into the OS.
unsafe fn trampoline(slot: &ProcSlot, code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    let hook_proc = slot
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|installed| installed.hook_proc.clone());

    if let Some(hook_proc) = hook_proc {
        // SAFETY: the OS passes a valid hook struct for the duration of the call.
        let result = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
            hook_proc.invoke(code, wparam.0, lparam.0)
        }));
        if let Ok(result) = result {
            return LRESULT(result);
        }
        log::error!("hook procedure panicked, notification passed through");
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

unsafe extern "system" fn keyboard_trampoline(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { trampoline(&KEYBOARD, code, wparam, lparam) }
}

unsafe extern "system" fn mouse_trampoline(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    unsafe { trampoline(&MOUSE, code, wparam, lparam) }
}

/// The native Windows hook API.
///
/// Low-level hooks are called on the thread that installed them, and only
/// while that thread retrieves messages. Either run a message loop on that
/// thread or call [`Platform::pump`] regularly.
#[derive(Debug, Default)]
pub struct WindowsPlatform;

impl WindowsPlatform {
    pub fn new() -> Self {
        WindowsPlatform
    }
}

impl Platform for WindowsPlatform {
    fn register(&self, kind: HookKind, hook_proc: Arc<dyn HookProc>) -> Result<HookHandle, OsError> {
        let mut installed = slot(kind).write().unwrap_or_else(PoisonError::into_inner);
        if installed.is_some() {
            return Err(OsError::new(
                ERROR_ALREADY_EXISTS,
                format!("a {kind} hook is already installed by this process"),
            ));
        }

        let entry: unsafe extern "system" fn(i32, WPARAM, LPARAM) -> LRESULT = match kind {
            HookKind::Keyboard => keyboard_trampoline,
            HookKind::Mouse => mouse_trampoline,
        };
        // Thread id 0 and no module: a global low-level hook in this executable.
        let hook = unsafe { SetWindowsHookExW(WINDOWS_HOOK_ID(kind.id()), Some(entry), None, 0) }
            .map_err(os_error)?;
        let handle = HookHandle::from_raw(hook.0 as isize)
            .ok_or_else(|| OsError::new(ERROR_INVALID_HOOK_HANDLE, "null hook handle"))?;

        *installed = Some(Installed {
            handle: handle.as_raw(),
            hook_proc,
        });
        Ok(handle)
    }

    fn unregister(&self, handle: HookHandle) -> Result<(), OsError> {
        let result = unsafe { UnhookWindowsHookEx(hhook(handle)) }.map_err(os_error);

        // The procedure is released either way; a hook the OS refused to
        // remove falls back to plain forwarding in its trampoline.
        for kind in [HookKind::Keyboard, HookKind::Mouse] {
            let mut installed = slot(kind).write().unwrap_or_else(PoisonError::into_inner);
            if installed.as_ref().is_some_and(|i| i.handle == handle.as_raw()) {
                *installed = None;
            }
        }
        result
    }

    fn forward(&self, handle: Option<HookHandle>, code: i32, message: usize, data: isize) -> isize {
        unsafe { CallNextHookEx(handle.map(hhook), code, WPARAM(message), LPARAM(data)) }.0
    }

    fn key_down(&self, vk: u32) -> bool {
        let state = unsafe { GetAsyncKeyState(vk as i32) };
        (state as u16 & 0x8000) != 0
    }

    fn pump(&self) {
        let mut msg = MSG::default();
        unsafe {
            while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    // Leave the quit request for the host's own loop.
                    PostQuitMessage(msg.wParam.0 as i32);
                    break;
                }
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
            }
        }
    }
}
