use std::fmt;

/// Which edge of a key press an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    Down,
    Up,
}

/// A key-down or key-up carrying the key's name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventKind,
    pub key: String,
}

impl KeyEvent {
    pub fn down(key: impl Into<String>) -> Self {
        Self {
            kind: KeyEventKind::Down,
            key: key.into(),
        }
    }

    pub fn up(key: impl Into<String>) -> Self {
        Self {
            kind: KeyEventKind::Up,
            key: key.into(),
        }
    }
}

/// Handle returned by [`KeyEventHub::add_listener`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&KeyEvent)>;

/// Window-level keyboard event target.
///
/// Listeners subscribe to one event kind and stay subscribed until removed
/// by id. Dispatch order is subscription order.
pub struct KeyEventHub {
    next_id: u64,
    listeners: Vec<(ListenerId, KeyEventKind, Listener)>,
}

impl KeyEventHub {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Subscribe `listener` to events of `kind`
    pub fn add_listener<F>(&mut self, kind: KeyEventKind, listener: F) -> ListenerId
    where
        F: FnMut(&KeyEvent) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Unsubscribe; returns false if `id` was not registered
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener subscribed to its kind
    pub fn dispatch(&mut self, event: &KeyEvent) {
        for (_, kind, listener) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for KeyEventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyEventHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEventHub")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
