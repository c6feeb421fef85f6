use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key state handle shared between the tracker's listeners and the
/// movement resolver. Single-threaded: both run on the event loop.
pub type SharedKeyState = Rc<RefCell<KeyState>>;

/// Held/released state per key name.
///
/// Key names are lowercased on write, so `"W"` and `"w"` are the same key.
/// Lookups expect an already-lowercase name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyState {
    keys: HashMap<String, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedKeyState {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Record a key as held or released
    pub fn set(&mut self, key: &str, down: bool) {
        self.keys.insert(key.to_lowercase(), down);
    }

    pub fn press(&mut self, key: &str) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: &str) {
        self.set(key, false);
    }

    /// Whether `key` (lowercase) is currently held
    pub fn is_down(&self, key: &str) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Mark every known key as released
    pub fn reset(&mut self) {
        self.keys.values_mut().for_each(|held| *held = false);
    }

    /// Names of all currently held keys
    pub fn pressed(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|(_, held)| **held)
            .map(|(key, _)| key.as_str())
    }

    pub fn all_released(&self) -> bool {
        self.keys.values().all(|held| !held)
    }

    /// Number of distinct keys seen so far
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
