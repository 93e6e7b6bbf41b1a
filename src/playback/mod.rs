//! Playback core: the controller state machine and the sink abstraction it drives.
//! Nothing in here touches the DOM, so it runs and is tested on any target.

mod controller;
mod progress;
mod seek;
mod shortcuts;
mod sink;
mod typewriter;

pub use controller::*;
pub use progress::*;
pub use seek::*;
pub use shortcuts::*;
pub use sink::*;
pub use typewriter::*;
