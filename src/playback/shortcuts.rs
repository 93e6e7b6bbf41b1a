/// Keyboard commands understood by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
}

impl Shortcut {
    /// Maps a `KeyboardEvent.code` value.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Shortcut::TogglePlay),
            "ArrowLeft" => Some(Shortcut::SeekBackward),
            "ArrowRight" => Some(Shortcut::SeekForward),
            "ArrowUp" => Some(Shortcut::VolumeUp),
            "ArrowDown" => Some(Shortcut::VolumeDown),
            _ => None,
        }
    }
}
