//! Translation of raw hook notifications into events.
//!
//! The hook procedures in this module run on the OS callback thread. They do
//! the minimum: decode the raw struct, push one event into the channel, and
//! always hand the notification on to the next hook in the chain.

use crate::channel::EventChannel;
use crate::event::{KeyboardEvent, Modifiers, MouseButton, MouseEvent};
use crate::keycode::Key;
use crate::platform::{HookHandle, HookKind, HookProc, Platform};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};

// Keyboard messages
pub const WM_KEYDOWN: usize = 0x0100;
pub const WM_KEYUP: usize = 0x0101;
pub const WM_SYSKEYDOWN: usize = 0x0104;
pub const WM_SYSKEYUP: usize = 0x0105;

// Mouse messages
pub const WM_MOUSEMOVE: usize = 0x0200;
pub const WM_LBUTTONDOWN: usize = 0x0201;
pub const WM_LBUTTONUP: usize = 0x0202;
pub const WM_RBUTTONDOWN: usize = 0x0204;
pub const WM_RBUTTONUP: usize = 0x0205;
pub const WM_MBUTTONDOWN: usize = 0x0207;
pub const WM_MBUTTONUP: usize = 0x0208;
pub const WM_MOUSEWHEEL: usize = 0x020A;
pub const WM_XBUTTONDOWN: usize = 0x020B;
pub const WM_XBUTTONUP: usize = 0x020C;

/// `XBUTTON1` in the high word of `mouse_data`.
const XBUTTON1: u32 = 0x0001;

/// Sided modifier keys sampled for every keyboard event.
const MODIFIER_SLOTS: [(Key, Key, Modifiers); 3] = [
    (Key::ShiftLeft, Key::ShiftRight, Modifiers::SHIFT),
    (Key::ControlLeft, Key::ControlRight, Modifiers::CONTROL),
    (Key::AltLeft, Key::AltRight, Modifiers::ALT),
];

/// Layout of `KBDLLHOOKSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawKeyboard {
    pub vk_code: u32,
    pub scan_code: u32,
    pub flags: u32,
    pub time: u32,
    pub extra_info: usize,
}

/// Layout of `MSLLHOOKSTRUCT`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct RawMouse {
    pub x: i32,
    pub y: i32,
    /// Wheel delta or X button id in the high word.
    pub mouse_data: u32,
    pub flags: u32,
    pub time: u32,
    pub extra_info: usize,
}

/// Build a keyboard event from a raw notification.
///
/// `key_down` reports the live physical state of a virtual key and is used to
/// sample the modifiers.
pub fn translate_keyboard(
    message: usize,
    raw: &RawKeyboard,
    mut key_down: impl FnMut(u32) -> bool,
) -> KeyboardEvent {
    let mut modifiers = Modifiers::empty();
    for (left, right, flag) in MODIFIER_SLOTS {
        if key_down(left.vk()) || key_down(right.vk()) {
            modifiers |= flag;
        }
    }

    KeyboardEvent {
        key: Key::from_vk(raw.vk_code),
        vk_code: raw.vk_code,
        scan_code: raw.scan_code,
        modifiers,
        is_key_down: matches!(message, WM_KEYDOWN | WM_SYSKEYDOWN),
        time: raw.time,
        handled: false,
    }
}

/// Build a mouse event from a raw notification.
///
/// Unknown messages produce an event with only the position and time set.
pub fn translate_mouse(message: usize, raw: &RawMouse) -> MouseEvent {
    let mut event = MouseEvent {
        x: raw.x,
        y: raw.y,
        time: raw.time,
        is_move: message == WM_MOUSEMOVE,
        is_wheel: message == WM_MOUSEWHEEL,
        ..Default::default()
    };

    let high_word = raw.mouse_data >> 16;
    let (button, down) = match message {
        WM_LBUTTONDOWN => (MouseButton::Left, true),
        WM_LBUTTONUP => (MouseButton::Left, false),
        WM_RBUTTONDOWN => (MouseButton::Right, true),
        WM_RBUTTONUP => (MouseButton::Right, false),
        WM_MBUTTONDOWN => (MouseButton::Middle, true),
        WM_MBUTTONUP => (MouseButton::Middle, false),
        WM_XBUTTONDOWN | WM_XBUTTONUP => {
            let button = if high_word == XBUTTON1 {
                MouseButton::XButton1
            } else {
                MouseButton::XButton2
            };
            (button, message == WM_XBUTTONDOWN)
        }
        WM_MOUSEWHEEL => {
            event.wheel_delta = i32::from(high_word as u16 as i16);
            (MouseButton::None, false)
        }
        _ => (MouseButton::None, false),
    };
    event.button = button;
    event.is_mouse_down = down;
    event
}

/// Hook procedure for the keyboard hook.
pub(crate) struct KeyboardProc<P: Platform> {
    platform: Arc<P>,
    handle: Arc<AtomicIsize>,
    channel: Arc<EventChannel<KeyboardEvent>>,
}

impl<P: Platform> KeyboardProc<P> {
    pub(crate) fn new(
        platform: Arc<P>,
        handle: Arc<AtomicIsize>,
        channel: Arc<EventChannel<KeyboardEvent>>,
    ) -> Self {
        Self {
            platform,
            handle,
            channel,
        }
    }
}

impl<P: Platform> HookProc for KeyboardProc<P> {
    unsafe fn invoke(&self, code: i32, message: usize, data: isize) -> isize {
        let handle = HookHandle::from_raw(self.handle.load(Ordering::Acquire));
        if code >= 0 && handle.is_some() && data != 0 {
            // SAFETY: the caller guarantees `data` points to a KBDLLHOOKSTRUCT.
            let input = unsafe { *(data as *const RawKeyboard) };
            contain_panic(HookKind::Keyboard, || {
                let event = translate_keyboard(message, &input, |vk| self.platform.key_down(vk));
                self.channel.enqueue(event);
            });
        }
        self.platform.forward(handle, code, message, data)
    }
}

/// Run one translation step, keeping a panic on this side of the OS callback.
///
/// Returns `false` if `step` panicked.
fn contain_panic(kind: HookKind, step: impl FnOnce()) -> bool {
    let contained = panic::catch_unwind(AssertUnwindSafe(step)).is_ok();
    if !contained {
        log::error!("{kind} hook: translation panicked, notification passed through");
    }
    contained
}

/// Hook procedure for the mouse hook.
pub(crate) struct MouseProc<P: Platform> {
    platform: Arc<P>,
    handle: Arc<AtomicIsize>,
    channel: Arc<EventChannel<MouseEvent>>,
}

impl<P: Platform> MouseProc<P> {
    pub(crate) fn new(
        platform: Arc<P>,
        handle: Arc<AtomicIsize>,
        channel: Arc<EventChannel<MouseEvent>>,
    ) -> Self {
        Self {
            platform,
            handle,
            channel,
        }
    }
}

impl<P: Platform> HookProc for MouseProc<P> {
    unsafe fn invoke(&self, code: i32, message: usize, data: isize) -> isize {
        let handle = HookHandle::from_raw(self.handle.load(Ordering::Acquire));
        if code >= 0 && handle.is_some() && data != 0 {
            // SAFETY: the caller guarantees `data` points to a MSLLHOOKSTRUCT.
            let input = unsafe { *(data as *const RawMouse) };
            contain_panic(HookKind::Mouse, || {
                self.channel.enqueue(translate_mouse(message, &input));
            });
        }
        self.platform.forward(handle, code, message, data)
    }
}
