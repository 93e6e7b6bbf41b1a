use super::progress::Progress;
use super::seek::{SeekBounds, SeekDrag};
use super::shortcuts::Shortcut;
use super::sink::{MediaSink, PlayRequest, SinkEvent};
use crate::config::PlayerConfig;
use crate::error::{PlayError, PlayerError};
use crate::playlist::Track;

pub const MIN_PLAYBACK_RATE: f64 = 0.25;
pub const MAX_PLAYBACK_RATE: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub volume: f64,
    pub playback_rate: f64,
    pub current_time: f64,
    pub duration: Option<f64>,
}

impl PlaybackState {
    fn new(volume: f64) -> Self {
        Self {
            current_index: None,
            is_playing: false,
            volume,
            playback_rate: 1.0,
            current_time: 0.0,
            duration: None,
        }
    }
}

/// Result of a resolved play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Playing,
    /// Needs a user gesture; the UI offers a manual play affordance.
    Blocked,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeLevel {
    Muted,
    Low,
    High,
}

/// Owns playback state for one playlist and drives a [`MediaSink`].
///
/// Methods that may start output return the sink's deferred [`PlayRequest`]; the caller
/// awaits it and hands the result back through [`PlaybackController::complete_play`].
pub struct PlaybackController<S: MediaSink> {
    sink: S,
    tracks: Vec<Track>,
    state: PlaybackState,
    progress: Progress,
    drag: SeekDrag,
    blocked: bool,
    load_generation: u64,
    volume_before_mute: Option<f64>,
    autoplay_on_select: bool,
    initial_volume: f64,
    seek_step: f64,
    volume_step: f64,
}

impl<S: MediaSink> PlaybackController<S> {
    pub fn new(mut sink: S, tracks: Vec<Track>, config: &PlayerConfig) -> Self {
        let volume = config.initial_volume.clamp(0.0, 1.0);
        sink.set_volume(volume);
        Self {
            sink,
            tracks,
            state: PlaybackState::new(volume),
            progress: Progress::default(),
            drag: SeekDrag::default(),
            blocked: false,
            load_generation: 0,
            volume_before_mute: None,
            autoplay_on_select: config.autoplay_on_select,
            initial_volume: volume,
            seek_step: config.seek_step_secs,
            volume_step: config.volume_step,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.state.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Bumped every time the sink is pointed at a source, including the same one again.
    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    /// Replaces the playlist, resetting to the "no track" state.
    pub fn set_tracks(&mut self, tracks: Vec<Track>) {
        self.sink.pause();
        self.tracks = tracks;
        self.load_generation += 1;
        self.state.current_index = None;
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = None;
        self.blocked = false;
        self.drag.end();
        self.refresh_progress();
    }

    /// Points the sink at track `index` without starting it.
    pub fn load_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.tracks.len();
        let track = self
            .tracks
            .get(index)
            .ok_or(PlayerError::TrackOutOfRange { index, len })?;
        tracing::info!("Loading story {} of {}: {}", index + 1, len, track.title);

        self.sink.load(&track.audio_source);
        self.sink.set_playback_rate(self.state.playback_rate);
        self.load_generation += 1;
        self.state.current_index = Some(index);
        self.state.is_playing = false;
        self.state.current_time = 0.0;
        self.state.duration = None;
        self.blocked = false;
        self.drag.end();
        self.refresh_progress();
        Ok(())
    }

    /// Manual selection; plays only when `autoplay_on_select` is configured.
    pub fn select_track(&mut self, index: usize) -> Result<Option<PlayRequest>, PlayerError> {
        self.load_track(index)?;
        if self.autoplay_on_select {
            Ok(self.play())
        } else {
            Ok(None)
        }
    }

    pub fn play(&mut self) -> Option<PlayRequest> {
        if self.state.current_index.is_none() {
            if self.tracks.is_empty() {
                tracing::debug!("Ignoring play with an empty playlist");
                return None;
            }
            self.load_track(0).ok()?;
        }
        Some(self.sink.play())
    }

    /// Records how a request returned by [`Self::play`] resolved.
    pub fn complete_play(&mut self, result: Result<(), PlayError>) -> PlayOutcome {
        match result {
            Ok(()) => {
                self.state.is_playing = true;
                self.blocked = false;
                PlayOutcome::Playing
            }
            Err(err) if err.is_blocked() => {
                tracing::warn!("{err}");
                self.state.is_playing = false;
                self.blocked = true;
                PlayOutcome::Blocked
            }
            Err(err) => {
                tracing::warn!("Error playing audio: {err}");
                self.state.is_playing = false;
                PlayOutcome::Failed
            }
        }
    }

    pub fn pause(&mut self) {
        self.sink.pause();
        self.state.is_playing = false;
    }

    pub fn toggle(&mut self) -> Option<PlayRequest> {
        if self.state.is_playing {
            self.pause();
            None
        } else {
            self.play()
        }
    }

    pub fn next(&mut self) -> Option<PlayRequest> {
        let index = self.next_index()?;
        self.select_track(index).ok().flatten()
    }

    pub fn previous(&mut self) -> Option<PlayRequest> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let index = match self.state.current_index {
            Some(i) => (i + len - 1) % len,
            None => len - 1,
        };
        self.select_track(index).ok().flatten()
    }

    fn next_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some(match self.state.current_index {
            Some(i) => (i + 1) % len,
            None => 0,
        })
    }

    /// Completion always continues playback, whatever the manual-selection policy.
    fn auto_advance(&mut self) -> Option<PlayRequest> {
        let index = self.next_index()?;
        self.load_track(index).ok()?;
        self.play()
    }

    pub fn seek_to(&mut self, fraction: f64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.apply_seek(fraction * duration);
    }

    pub fn seek_by(&mut self, delta_secs: f64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        if !delta_secs.is_finite() {
            return;
        }
        self.apply_seek((self.state.current_time + delta_secs).clamp(0.0, duration));
    }

    fn apply_seek(&mut self, time: f64) {
        self.sink.seek(time);
        self.state.current_time = time;
        self.refresh_progress();
    }

    fn known_duration(&self) -> Option<f64> {
        self.state
            .duration
            .filter(|d| d.is_finite() && *d > 0.0)
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        self.sink.set_volume(volume);
        self.state.volume = volume;
        if volume > 0.0 {
            self.volume_before_mute = None;
        }
    }

    pub fn toggle_mute(&mut self) {
        if self.state.volume > 0.0 {
            let previous = self.state.volume;
            self.set_volume(0.0);
            self.volume_before_mute = Some(previous);
        } else {
            let restored = self
                .volume_before_mute
                .take()
                .filter(|v| *v > 0.0)
                .unwrap_or(self.initial_volume);
            self.set_volume(restored);
        }
    }

    pub fn volume_level(&self) -> VolumeLevel {
        if self.state.volume <= 0.0 {
            VolumeLevel::Muted
        } else if self.state.volume < 0.5 {
            VolumeLevel::Low
        } else {
            VolumeLevel::High
        }
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        if !rate.is_finite() || rate <= 0.0 {
            return;
        }
        let rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        self.sink.set_playback_rate(rate);
        self.state.playback_rate = rate;
    }

    /// Starts a drag session. Unmeasured bounds start the session without seeking; the
    /// caller follows up with [`Self::update_seek_drag`] once the control is measured.
    pub fn begin_seek_drag(&mut self, x: f64, bounds: SeekBounds) {
        self.drag.begin();
        if bounds.is_measured() {
            self.seek_to(bounds.fraction_at(x));
        }
    }

    pub fn update_seek_drag(&mut self, x: f64, bounds: SeekBounds) {
        if self.drag.is_active() {
            self.seek_to(bounds.fraction_at(x));
        }
    }

    pub fn end_seek_drag(&mut self) {
        self.drag.end();
    }

    pub fn apply_shortcut(&mut self, shortcut: Shortcut) -> Option<PlayRequest> {
        match shortcut {
            Shortcut::TogglePlay => return self.toggle(),
            Shortcut::SeekBackward => self.seek_by(-self.seek_step),
            Shortcut::SeekForward => self.seek_by(self.seek_step),
            Shortcut::VolumeUp => self.set_volume(self.state.volume + self.volume_step),
            Shortcut::VolumeDown => self.set_volume(self.state.volume - self.volume_step),
        }
        None
    }

    /// Feeds a sink signal into the controller. End-of-track yields the request for the
    /// next story.
    pub fn handle_event(&mut self, event: SinkEvent) -> Option<PlayRequest> {
        match event {
            SinkEvent::MetadataReady { duration } => {
                self.state.duration = Some(duration).filter(|d| d.is_finite() && *d > 0.0);
                self.refresh_progress();
            }
            SinkEvent::TimeUpdated { current_time } => {
                if current_time.is_finite() {
                    self.state.current_time = current_time.max(0.0);
                }
                self.refresh_progress();
            }
            SinkEvent::Started => {
                self.state.is_playing = true;
                self.blocked = false;
            }
            SinkEvent::Paused => {
                self.state.is_playing = false;
            }
            SinkEvent::Ended => {
                tracing::debug!("Story finished, advancing");
                return self.auto_advance();
            }
        }
        None
    }

    fn refresh_progress(&mut self) {
        self.progress = Progress::compute(self.state.current_time, self.state.duration);
    }
}
