pub mod clock;
pub mod fps;
pub mod frame;

pub use clock::Clock;
pub use fps::FpsCounter;
pub use frame::{FrameInfo, FrameIterator};
