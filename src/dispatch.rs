//! Delivery of queued events to subscribers on the consumer thread.

use crate::channel::EventChannels;
use crate::error::Result;
use crate::event::{KeyboardEvent, MouseEvent};
use crate::hook::HookManager;
use crate::platform::Platform;

/// Identifies a subscription for [`Dispatcher::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<E> = (SubscriptionId, Box<dyn FnMut(&mut E)>);

/// Ordered subscriber lists for both event classes.
///
/// Subscribers run synchronously on the thread that calls
/// [`Dispatcher::dispatch`], in the order they were added.
#[derive(Default)]
pub struct Dispatcher {
    keyboard: Vec<Subscriber<KeyboardEvent>>,
    mouse: Vec<Subscriber<MouseEvent>>,
    next_id: u64,
}

impl Dispatcher {
    /// Create a dispatcher without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Add a keyboard subscriber.
    pub fn subscribe_keyboard<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&mut KeyboardEvent) + 'static,
    {
        let id = self.next_id();
        self.keyboard.push((id, Box::new(subscriber)));
        id
    }

    /// Add a mouse subscriber.
    pub fn subscribe_mouse<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&mut MouseEvent) + 'static,
    {
        let id = self.next_id();
        self.mouse.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.keyboard.len() + self.mouse.len();
        self.keyboard.retain(|(sub, _)| *sub != id);
        self.mouse.retain(|(sub, _)| *sub != id);
        before != self.keyboard.len() + self.mouse.len()
    }

    /// Number of registered subscribers across both classes.
    pub fn subscriber_count(&self) -> usize {
        self.keyboard.len() + self.mouse.len()
    }

    /// Drain both channels, keyboard first, and hand every event to the
    /// subscribers of its class.
    ///
    /// Returns the number of events drained.
    pub fn dispatch(&mut self, channels: &EventChannels) -> usize {
        let keyboard = channels.keyboard.drain_all();
        let mouse = channels.mouse.drain_all();
        let drained = keyboard.len() + mouse.len();

        for mut event in keyboard {
            for (_, subscriber) in self.keyboard.iter_mut() {
                subscriber(&mut event);
            }
        }
        for mut event in mouse {
            for (_, subscriber) in self.mouse.iter_mut() {
                subscriber(&mut event);
            }
        }

        if drained > 0 {
            log::trace!("dispatched {drained} global input events");
        }
        drained
    }
}

/// Global keyboard and mouse input for one application.
///
/// Call [`GlobalInput::update`] once per tick of the host's update loop; all
/// subscribers run inside that call.
///
/// ```no_run
/// # #[cfg(target_os = "windows")]
/// # fn main() -> keybridge::Result<()> {
/// use keybridge::GlobalInput;
///
/// let mut input = GlobalInput::native();
/// input.subscribe_keyboard(|event| {
///     if event.is_key_down {
///         println!("{:?} {:?}", event.key, event.modifiers);
///     }
/// });
/// input.start()?;
///
/// loop {
///     input.update();
///     std::thread::sleep(std::time::Duration::from_millis(16));
/// }
/// # }
/// # #[cfg(not(target_os = "windows"))]
/// # fn main() {}
/// ```
pub struct GlobalInput<P: Platform> {
    manager: HookManager<P>,
    dispatcher: Dispatcher,
}

#[cfg(target_os = "windows")]
impl GlobalInput<crate::platform::NativePlatform> {
    /// Global input through the Windows low-level hooks.
    ///
    /// Hooks are delivered on the thread that calls [`GlobalInput::start`];
    /// call [`GlobalInput::update`] from that same thread.
    pub fn native() -> Self {
        Self::new(crate::platform::NativePlatform::new())
    }
}

impl<P: Platform> GlobalInput<P> {
    /// Create an inactive instance on top of `platform`.
    pub fn new(platform: P) -> Self {
        Self {
            manager: HookManager::new(platform),
            dispatcher: Dispatcher::new(),
        }
    }

    /// Install both hooks. See [`HookManager::start`].
    pub fn start(&self) -> Result<()> {
        self.manager.start()
    }

    /// Remove both hooks. See [`HookManager::stop`].
    pub fn stop(&self) -> Result<()> {
        self.manager.stop()
    }

    /// Whether both hooks are installed.
    pub fn is_active(&self) -> bool {
        self.manager.is_active()
    }

    /// Add a keyboard subscriber.
    pub fn subscribe_keyboard<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&mut KeyboardEvent) + 'static,
    {
        self.dispatcher.subscribe_keyboard(subscriber)
    }

    /// Add a mouse subscriber.
    pub fn subscribe_mouse<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&mut MouseEvent) + 'static,
    {
        self.dispatcher.subscribe_mouse(subscriber)
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.dispatcher.unsubscribe(id)
    }

    /// Pump platform messages, then deliver every queued event.
    ///
    /// Returns the number of events delivered.
    pub fn update(&mut self) -> usize {
        self.manager.platform().pump();
        self.dispatcher.dispatch(self.manager.channels())
    }

    /// The underlying hook manager.
    pub fn manager(&self) -> &HookManager<P> {
        &self.manager
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{
        RawKeyboard, RawMouse, WM_KEYDOWN, WM_KEYUP, WM_LBUTTONDOWN, WM_MOUSEMOVE, WM_MOUSEWHEEL,
    };
    use crate::event::MouseButton;
    use crate::keycode::Key;
    use crate::platform::fake::FakePlatform;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(vk_code: u32) -> RawKeyboard {
        RawKeyboard {
            vk_code,
            ..Default::default()
        }
    }

    fn mouse(x: i32, y: i32, mouse_data: u32) -> RawMouse {
        RawMouse {
            x,
            y,
            mouse_data,
            ..Default::default()
        }
    }

    #[test]
    fn test_dispatch_empty() {
        let mut dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.dispatch(&EventChannels::new()), 0);
    }

    #[test]
    fn test_subscribers_run_in_registration_order() {
        let channels = EventChannels::new();
        let mut dispatcher = Dispatcher::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let calls = calls.clone();
            dispatcher.subscribe_keyboard(move |event| {
                calls.borrow_mut().push((name, event.vk_code));
            });
        }

        channels.keyboard.enqueue(KeyboardEvent {
            vk_code: 1,
            ..Default::default()
        });
        channels.keyboard.enqueue(KeyboardEvent {
            vk_code: 2,
            ..Default::default()
        });

        assert_eq!(dispatcher.dispatch(&channels), 2);
        assert_eq!(
            *calls.borrow(),
            vec![
                ("first", 1),
                ("second", 1),
                ("third", 1),
                ("first", 2),
                ("second", 2),
                ("third", 2),
            ]
        );
    }

    #[test]
    fn test_events_are_drained_without_subscribers() {
        let channels = EventChannels::new();
        channels.mouse.enqueue(MouseEvent::default());
        let mut dispatcher = Dispatcher::new();

        assert_eq!(dispatcher.dispatch(&channels), 1);
        assert_eq!(dispatcher.dispatch(&channels), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let channels = EventChannels::new();
        let mut dispatcher = Dispatcher::new();
        let count = Rc::new(RefCell::new(0));

        let counter = count.clone();
        let id = dispatcher.subscribe_mouse(move |_| *counter.borrow_mut() += 1);
        assert_eq!(dispatcher.subscriber_count(), 1);

        channels.mouse.enqueue(MouseEvent::default());
        dispatcher.dispatch(&channels);
        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));

        channels.mouse.enqueue(MouseEvent::default());
        dispatcher.dispatch(&channels);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }

    #[test]
    fn test_subscribers_may_mark_events_handled() {
        let channels = EventChannels::new();
        let mut dispatcher = Dispatcher::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        dispatcher.subscribe_keyboard(|event| event.handled = true);
        let sink = seen.clone();
        dispatcher.subscribe_keyboard(move |event| sink.borrow_mut().push(event.handled));

        channels.keyboard.enqueue(KeyboardEvent::default());
        dispatcher.dispatch(&channels);
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn test_global_input_end_to_end() {
        let mut input = GlobalInput::new(FakePlatform::new());
        let keys = Rc::new(RefCell::new(Vec::new()));
        let mice = Rc::new(RefCell::new(Vec::new()));

        let sink = keys.clone();
        input.subscribe_keyboard(move |event| sink.borrow_mut().push(event.clone()));
        let sink = mice.clone();
        input.subscribe_mouse(move |event| sink.borrow_mut().push(event.clone()));

        input.start().unwrap();
        assert!(input.is_active());

        let platform = input.manager().platform().clone();
        platform.press(0xA2);
        platform.send_keyboard(0, WM_KEYDOWN, key(0x43));
        platform.send_mouse(0, WM_MOUSEMOVE, mouse(5, 6, 0));
        platform.send_mouse(-1, WM_LBUTTONDOWN, mouse(5, 6, 0));
        platform.send_mouse(0, WM_MOUSEWHEEL, mouse(5, 6, 0x0078_0000));
        platform.send_keyboard(0, WM_KEYUP, key(0x43));

        // Nothing is delivered before the update step.
        assert!(keys.borrow().is_empty());
        assert_eq!(input.update(), 4);

        let keys = keys.borrow();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].key, Key::KeyC);
        assert!(keys[0].is_key_down);
        assert!(keys[0].has_modifiers(crate::event::Modifiers::CONTROL));
        assert!(!keys[1].is_key_down);

        let mice = mice.borrow();
        assert_eq!(mice.len(), 2);
        assert!(mice[0].is_move);
        assert!(mice[1].is_wheel);
        assert_eq!(mice[1].wheel_delta, 120);
        assert_eq!(mice[1].button, MouseButton::None);
    }

    #[test]
    fn test_update_after_stop_delivers_nothing_new() {
        let mut input = GlobalInput::new(FakePlatform::new());
        input.start().unwrap();
        input.stop().unwrap();
        assert!(!input.is_active());

        let platform = input.manager().platform().clone();
        platform.send_keyboard(0, WM_KEYDOWN, key(0x41));
        assert_eq!(input.update(), 0);
    }
}
