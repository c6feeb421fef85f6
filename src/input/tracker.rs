use std::rc::Rc;

use super::events::{KeyEventHub, KeyEventKind, ListenerId};
use super::key_state::{KeyState, SharedKeyState};

/// Keeps a [`KeyState`] in sync with a [`KeyEventHub`].
///
/// `mount` subscribes one key-down and one key-up listener; `unmount` removes
/// both. The listeners only hold a weak reference to the state, so a tracker
/// dropped while still mounted leaves behind listeners that do nothing.
#[derive(Debug)]
pub struct InputTracker {
    state: SharedKeyState,
    subscriptions: Option<[ListenerId; 2]>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::with_state(KeyState::shared())
    }

    /// Track into an existing state handle
    pub fn with_state(state: SharedKeyState) -> Self {
        Self {
            state,
            subscriptions: None,
        }
    }

    /// Handle to the tracked state, for the movement resolver
    pub fn key_state(&self) -> SharedKeyState {
        self.state.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Subscribe to `hub`. Does nothing if already mounted.
    pub fn mount(&mut self, hub: &mut KeyEventHub) {
        if self.subscriptions.is_some() {
            return;
        }

        let state = Rc::downgrade(&self.state);
        let down = hub.add_listener(KeyEventKind::Down, move |event| {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().press(&event.key);
            }
        });

        let state = Rc::downgrade(&self.state);
        let up = hub.add_listener(KeyEventKind::Up, move |event| {
            if let Some(state) = state.upgrade() {
                state.borrow_mut().release(&event.key);
            }
        });

        log::debug!("Input tracker mounted ({:?}, {:?})", down, up);
        self.subscriptions = Some([down, up]);
    }

    /// Unsubscribe from `hub`. Does nothing if not mounted.
    pub fn unmount(&mut self, hub: &mut KeyEventHub) {
        if let Some(ids) = self.subscriptions.take() {
            for id in ids {
                if !hub.remove_listener(id) {
                    log::warn!("Input tracker listener {:?} was already removed", id);
                }
            }
            log::debug!("Input tracker unmounted");
        }
    }

    /// Release every key, e.g. when the window loses focus
    pub fn release_all(&self) {
        self.state.borrow_mut().reset();
    }
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}
