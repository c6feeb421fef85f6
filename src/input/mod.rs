pub mod events;
pub mod key_state;
pub mod pointer;
pub mod tracker;
pub mod winit_adapter;

pub use events::{KeyEvent, KeyEventHub, KeyEventKind, ListenerId};
pub use key_state::{KeyState, SharedKeyState};
pub use pointer::PointerState;
pub use tracker::InputTracker;
