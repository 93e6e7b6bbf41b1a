//! The components module contains the UI binding for the player.

mod app;
mod audio_bridge;
mod icons;
mod player;
mod story_list;
mod wake_lock;

pub use app::*;
pub use audio_bridge::*;
pub use icons::*;
pub use player::*;
pub use story_list::*;
