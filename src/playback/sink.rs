use crate::error::PlayError;
use futures_util::future::LocalBoxFuture;

/// Deferred result of asking the sink to start output.
pub type PlayRequest = LocalBoxFuture<'static, Result<(), PlayError>>;

/// Environment-provided audio output.
pub trait MediaSink {
    fn load(&mut self, source: &str);
    fn play(&mut self) -> PlayRequest;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_playback_rate(&mut self, rate: f64);
}

/// Signals emitted by the sink while a track is loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    MetadataReady { duration: f64 },
    TimeUpdated { current_time: f64 },
    Ended,
    Started,
    Paused,
}

/// Point-in-time view of the sink, as polled by the UI binding.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Deserialize)]
pub struct SinkSnapshot {
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub ended: bool,
}

impl SinkSnapshot {
    /// A sink with no source: paused at zero, duration unknown.
    pub fn idle() -> Self {
        Self {
            paused: true,
            ..Self::default()
        }
    }

    fn duration_known(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }
}

/// Remembers the previous poll so each new snapshot can be turned into events.
///
/// `generation` is the controller's load generation. When it moves, the sink has been
/// pointed at a new source, so the next snapshot is compared against an idle one and the
/// duration is reported again even if it equals the previous story's.
#[derive(Debug, Clone)]
pub struct SnapshotDiffer {
    last: SinkSnapshot,
    generation: u64,
}

impl SnapshotDiffer {
    pub fn new() -> Self {
        Self {
            last: SinkSnapshot::idle(),
            generation: 0,
        }
    }

    pub fn advance(&mut self, generation: u64, next: SinkSnapshot) -> Vec<SinkEvent> {
        if generation != self.generation {
            self.generation = generation;
            self.last = SinkSnapshot::idle();
        }
        let events = events_between(&self.last, &next);
        self.last = next;
        events
    }
}

impl Default for SnapshotDiffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the signals implied by moving from `prev` to `next`.
///
/// Platforms without push callbacks poll the sink and feed the resulting events into the
/// controller, so a single poll may yield several signals. `Ended` comes last so the
/// controller sees the final tick before it advances.
pub fn events_between(prev: &SinkSnapshot, next: &SinkSnapshot) -> Vec<SinkEvent> {
    let mut events = Vec::new();

    if next.duration_known() && (!prev.duration_known() || (next.duration - prev.duration).abs() > 0.5)
    {
        events.push(SinkEvent::MetadataReady {
            duration: next.duration,
        });
    }
    if prev.paused && !next.paused {
        events.push(SinkEvent::Started);
    }
    if (next.current_time - prev.current_time).abs() > f64::EPSILON {
        events.push(SinkEvent::TimeUpdated {
            current_time: next.current_time,
        });
    }
    if !prev.paused && next.paused && !next.ended {
        events.push(SinkEvent::Paused);
    }
    if next.ended && !prev.ended {
        events.push(SinkEvent::Ended);
    }

    events
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use futures_util::future::ready;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SinkCall {
        Load(String),
        Play,
        Pause,
        Seek(f64),
        Volume(f64),
        Rate(f64),
    }

    /// Sink that records every command and answers play requests from a script.
    #[derive(Clone, Default)]
    pub struct RecordingSink {
        pub calls: Rc<RefCell<Vec<SinkCall>>>,
        pub play_results: Rc<RefCell<VecDeque<Result<(), PlayError>>>>,
    }

    impl RecordingSink {
        pub fn reject_next_play(&self, error: PlayError) {
            self.play_results.borrow_mut().push_back(Err(error));
        }

        pub fn calls(&self) -> Vec<SinkCall> {
            self.calls.borrow().clone()
        }

        pub fn last_seek(&self) -> Option<f64> {
            self.calls.borrow().iter().rev().find_map(|call| match call {
                SinkCall::Seek(t) => Some(*t),
                _ => None,
            })
        }
    }

    impl MediaSink for RecordingSink {
        fn load(&mut self, source: &str) {
            self.calls.borrow_mut().push(SinkCall::Load(source.to_string()));
        }

        fn play(&mut self) -> PlayRequest {
            self.calls.borrow_mut().push(SinkCall::Play);
            let result = self.play_results.borrow_mut().pop_front().unwrap_or(Ok(()));
            Box::pin(ready(result))
        }

        fn pause(&mut self) {
            self.calls.borrow_mut().push(SinkCall::Pause);
        }

        fn seek(&mut self, seconds: f64) {
            self.calls.borrow_mut().push(SinkCall::Seek(seconds));
        }

        fn set_volume(&mut self, volume: f64) {
            self.calls.borrow_mut().push(SinkCall::Volume(volume));
        }

        fn set_playback_rate(&mut self, rate: f64) {
            self.calls.borrow_mut().push(SinkCall::Rate(rate));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(current_time: f64, duration: f64, paused: bool, ended: bool) -> SinkSnapshot {
        SinkSnapshot {
            current_time,
            duration,
            paused,
            ended,
        }
    }

    #[test]
    fn metadata_and_start_are_detected() {
        let prev = snap(0.0, f64::NAN, true, false);
        let next = snap(0.3, 120.0, false, false);
        assert_eq!(
            events_between(&prev, &next),
            vec![
                SinkEvent::MetadataReady { duration: 120.0 },
                SinkEvent::Started,
                SinkEvent::TimeUpdated { current_time: 0.3 },
            ]
        );
    }

    #[test]
    fn unchanged_snapshot_yields_nothing() {
        let s = snap(12.0, 120.0, false, false);
        assert!(events_between(&s, &s).is_empty());
    }

    #[test]
    fn end_of_track_is_reported_once_and_last() {
        let prev = snap(119.8, 120.0, false, false);
        let next = snap(120.0, 120.0, true, true);
        assert_eq!(
            events_between(&prev, &next),
            vec![SinkEvent::TimeUpdated { current_time: 120.0 }, SinkEvent::Ended]
        );
        assert!(events_between(&next, &next).is_empty());
    }

    #[test]
    fn new_generation_reports_metadata_again() {
        let mut differ = SnapshotDiffer::new();
        let playing = snap(10.0, 300.0, false, false);
        assert!(differ
            .advance(1, playing)
            .contains(&SinkEvent::MetadataReady { duration: 300.0 }));
        assert!(differ.advance(1, snap(10.0, 300.0, false, false)).is_empty());

        let reloaded = snap(0.2, 300.0, true, false);
        assert_eq!(
            differ.advance(2, reloaded),
            vec![
                SinkEvent::MetadataReady { duration: 300.0 },
                SinkEvent::TimeUpdated { current_time: 0.2 },
            ]
        );
    }

    #[test]
    fn user_pause_is_not_mistaken_for_end() {
        let prev = snap(30.0, 120.0, false, false);
        let next = snap(30.0, 120.0, true, false);
        assert_eq!(events_between(&prev, &next), vec![SinkEvent::Paused]);
    }
}
