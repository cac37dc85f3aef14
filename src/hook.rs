//! Hook lifecycle management.
//!
//! [`HookManager`] installs the keyboard and mouse hooks as a pair, keeps the
//! hook procedures alive while the OS may call them, and removes both hooks
//! again on [`HookManager::stop`] or when it is dropped.

use crate::adapter::{KeyboardProc, MouseProc};
use crate::channel::EventChannels;
use crate::error::{Error, OsError, Result};
use crate::platform::{HookHandle, HookKind, HookProc, Platform};
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Handle slot shared with a hook procedure. Zero means no hook.
type Slot = Arc<AtomicIsize>;

/// Owns the pair of system-wide hooks and the channels they feed.
///
/// Only one hook pair is active per manager. Starting an active manager or
/// stopping an inactive one does nothing.
pub struct HookManager<P: Platform> {
    platform: Arc<P>,
    channels: EventChannels,
    keyboard: Slot,
    mouse: Slot,
    // Serializes start/stop. Holds the hook procedures while the hooks are
    // installed, empty otherwise.
    retained: Mutex<Vec<Arc<dyn HookProc>>>,
}

impl<P: Platform> HookManager<P> {
    /// Create an inactive manager on top of `platform`.
    pub fn new(platform: P) -> Self {
        Self {
            platform: Arc::new(platform),
            channels: EventChannels::new(),
            keyboard: Arc::new(AtomicIsize::new(0)),
            mouse: Arc::new(AtomicIsize::new(0)),
            retained: Mutex::new(Vec::new()),
        }
    }

    /// The platform the hooks are installed through.
    pub fn platform(&self) -> &Arc<P> {
        &self.platform
    }

    /// The channels the hook procedures push events into.
    pub fn channels(&self) -> &EventChannels {
        &self.channels
    }

    /// Whether both hooks are installed.
    pub fn is_active(&self) -> bool {
        handle(&self.keyboard).is_some() && handle(&self.mouse).is_some()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<dyn HookProc>>> {
        self.retained.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the keyboard hook, then the mouse hook.
    ///
    /// If only one of them can be installed it is removed again and
    /// [`Error::PartialActivation`] is returned; the manager stays inactive.
    pub fn start(&self) -> Result<()> {
        let mut retained = self.lock();
        if !retained.is_empty() {
            log::warn!("global hooks are already active, ignoring start");
            return Ok(());
        }

        log::info!("installing global keyboard and mouse hooks");
        let keyboard_proc: Arc<dyn HookProc> = Arc::new(KeyboardProc::new(
            self.platform.clone(),
            self.keyboard.clone(),
            self.channels.keyboard.clone(),
        ));
        let mouse_proc: Arc<dyn HookProc> = Arc::new(MouseProc::new(
            self.platform.clone(),
            self.mouse.clone(),
            self.channels.mouse.clone(),
        ));

        let keyboard = self.install(HookKind::Keyboard, &keyboard_proc, &self.keyboard);
        let mouse = self.install(HookKind::Mouse, &mouse_proc, &self.mouse);

        match (keyboard, mouse) {
            (Ok(()), Ok(())) => {
                *retained = vec![keyboard_proc, mouse_proc];
                log::info!("global hooks active");
                Ok(())
            }
            (Err(source), Err(_)) => {
                log::error!("no global hook could be installed");
                Err(Error::HookStartFailed {
                    kind: HookKind::Keyboard,
                    source,
                })
            }
            (Ok(()), Err(source)) => {
                self.roll_back(HookKind::Keyboard, &self.keyboard);
                Err(Error::PartialActivation {
                    failed: HookKind::Mouse,
                    source,
                })
            }
            (Err(source), Ok(())) => {
                self.roll_back(HookKind::Mouse, &self.mouse);
                Err(Error::PartialActivation {
                    failed: HookKind::Keyboard,
                    source,
                })
            }
        }
    }

    fn install(
        &self,
        kind: HookKind,
        hook_proc: &Arc<dyn HookProc>,
        slot: &Slot,
    ) -> std::result::Result<(), OsError> {
        match self.platform.register(kind, hook_proc.clone()) {
            Ok(handle) => {
                slot.store(handle.as_raw(), Ordering::Release);
                log::debug!("{kind} hook installed: {:#x}", handle.as_raw());
                Ok(())
            }
            Err(err) => {
                log::error!("failed to install {kind} hook: {err}");
                Err(err)
            }
        }
    }

    // Remove the one hook that did get installed during a failed start.
    fn roll_back(&self, kind: HookKind, slot: &Slot) {
        log::error!("only the {kind} hook was installed, removing it again");
        if let Err(err) = self.remove(kind, slot) {
            log::warn!("{err}");
        }
    }

    /// Remove both hooks.
    ///
    /// Each hook is removed independently. Handles are cleared even when the
    /// OS refuses to remove a hook; the first such failure is returned after
    /// both removals were attempted.
    pub fn stop(&self) -> Result<()> {
        let mut retained = self.lock();
        if retained.is_empty() && handle(&self.keyboard).is_none() && handle(&self.mouse).is_none()
        {
            log::info!("global hooks are not active, nothing to stop");
            return Ok(());
        }

        log::info!("removing global hooks");
        let keyboard = self.remove(HookKind::Keyboard, &self.keyboard);
        let mouse = self.remove(HookKind::Mouse, &self.mouse);

        // Procedures are only released once the OS no longer references them.
        retained.clear();

        if let Err(err) = &keyboard {
            log::warn!("{err}; the hook may stay installed until the process exits");
        }
        if let Err(err) = &mouse {
            log::warn!("{err}; the hook may stay installed until the process exits");
        }
        log::info!("global hooks released");
        keyboard.and(mouse)
    }

    fn remove(&self, kind: HookKind, slot: &Slot) -> Result<()> {
        let Some(handle) = HookHandle::from_raw(slot.swap(0, Ordering::AcqRel)) else {
            return Ok(());
        };
        self.platform
            .unregister(handle)
            .map_err(|source| Error::HookStopFailed { kind, source })
    }
}

impl<P: Platform> Drop for HookManager<P> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

fn handle(slot: &Slot) -> Option<HookHandle> {
    HookHandle::from_raw(slot.load(Ordering::Acquire))
}
