//! Audio Bridge - binds the playback controller to the platform audio element.
//! The controller never sees the DOM: commands go out through [`PlatformSink`], and the
//! element's state comes back by polling snapshots and diffing them into sink events.

use super::wake_lock::ScreenWakeLock;
use crate::error::PlayError;
use crate::playback::{
    MediaSink, PlayRequest, PlaybackController, SinkEvent, SinkSnapshot, SnapshotDiffer,
};
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
use futures_util::future::ready;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{window, HtmlAudioElement};

#[cfg(target_arch = "wasm32")]
const AUDIO_ELEMENT_ID: &str = "storyplayer-audio";
const POLL_INTERVAL_MS: u32 = 200;

pub type Player = PlaybackController<PlatformSink>;

/// Context handle for the single controller instance.
#[derive(Clone, Copy)]
pub struct PlayerSignal(pub Signal<Player>);

/// Awaits a deferred play request and records the outcome on the controller.
pub fn drive_play(mut player: Signal<Player>, request: PlayRequest) {
    spawn(async move {
        let result = request.await;
        player.write().complete_play(result);
    });
}

pub fn dispatch_event(mut player: Signal<Player>, event: SinkEvent) {
    let request = player.write().handle_event(event);
    if let Some(request) = request {
        drive_play(player, request);
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) async fn sleep_ms(ms: u32) {
    gloo_timers::future::TimeoutFuture::new(ms).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) async fn sleep_ms(ms: u32) {
    tokio::time::sleep(std::time::Duration::from_millis(ms as u64)).await;
}

/// Initialize the hidden audio element once.
#[cfg(target_arch = "wasm32")]
fn get_or_create_audio_element() -> Option<HtmlAudioElement> {
    let document = window()?.document()?;

    if let Some(existing) = document.get_element_by_id(AUDIO_ELEMENT_ID) {
        return existing.dyn_into::<HtmlAudioElement>().ok();
    }

    let audio: HtmlAudioElement = document.create_element("audio").ok()?.dyn_into().ok()?;
    audio.set_id(AUDIO_ELEMENT_ID);
    audio.set_attribute("preload", "metadata").ok()?;
    document.body()?.append_child(&audio).ok()?;

    Some(audio)
}

/// `HtmlAudioElement`-backed sink.
#[cfg(target_arch = "wasm32")]
pub struct PlatformSink {
    audio: Option<HtmlAudioElement>,
}

#[cfg(target_arch = "wasm32")]
impl PlatformSink {
    pub fn new() -> Self {
        let audio = get_or_create_audio_element();
        if audio.is_none() {
            tracing::warn!("Audio element unavailable; playback disabled");
        }
        Self { audio }
    }
}

#[cfg(target_arch = "wasm32")]
impl MediaSink for PlatformSink {
    fn load(&mut self, source: &str) {
        if let Some(audio) = &self.audio {
            audio.set_src(source);
        }
    }

    fn play(&mut self) -> PlayRequest {
        let Some(audio) = &self.audio else {
            return Box::pin(ready(Err(PlayError::Failed(
                "no audio element".to_string(),
            ))));
        };
        match audio.play() {
            Ok(promise) => Box::pin(async move {
                wasm_bindgen_futures::JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(PlayError::from)
            }),
            Err(err) => Box::pin(ready(Err(PlayError::from(err)))),
        }
    }

    fn pause(&mut self) {
        if let Some(audio) = &self.audio {
            let _ = audio.pause();
        }
    }

    fn seek(&mut self, seconds: f64) {
        if let Some(audio) = &self.audio {
            audio.set_current_time(seconds);
        }
    }

    fn set_volume(&mut self, volume: f64) {
        if let Some(audio) = &self.audio {
            audio.set_volume(volume);
        }
    }

    fn set_playback_rate(&mut self, rate: f64) {
        if let Some(audio) = &self.audio {
            audio.set_playback_rate(rate);
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn platform_snapshot() -> Option<SinkSnapshot> {
    let audio = get_or_create_audio_element()?;
    Some(SinkSnapshot {
        current_time: audio.current_time(),
        duration: audio.duration(),
        paused: audio.paused(),
        ended: audio.ended(),
    })
}

// Desktop-webview JavaScript bridge used by non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
const BRIDGE_BOOTSTRAP_JS: &str = r#"
(() => {
  if (window.__storyplayerAudio) {
    return true;
  }
  const existing = document.getElementById("storyplayer-audio");
  const audio = existing || document.createElement("audio");
  if (!existing) {
    audio.id = "storyplayer-audio";
    audio.preload = "metadata";
    audio.style.display = "none";
    document.body.appendChild(audio);
  }
  window.__storyplayerAudio = {
    apply(cmd) {
      switch (cmd.type) {
        case "load": audio.src = cmd.src; break;
        case "pause": audio.pause(); break;
        case "seek": audio.currentTime = cmd.position; break;
        case "volume": audio.volume = cmd.value; break;
        case "rate": audio.playbackRate = cmd.value; break;
      }
    },
    async play() {
      try {
        await audio.play();
        return { ok: true, name: "", message: "" };
      } catch (err) {
        return { ok: false, name: (err && err.name) || "Error", message: (err && err.message) || "" };
      }
    },
    snapshot() {
      const finite = (v) => (Number.isFinite(v) ? v : 0);
      return {
        current_time: finite(audio.currentTime),
        duration: finite(audio.duration),
        paused: !!audio.paused,
        ended: !!audio.ended,
      };
    },
  };
  return true;
})();
"#;

#[cfg(not(target_arch = "wasm32"))]
#[derive(serde::Deserialize)]
struct PlayReply {
    ok: bool,
    name: String,
    message: String,
}

#[cfg(not(target_arch = "wasm32"))]
fn ensure_audio_bridge() {
    let _ = document::eval(BRIDGE_BOOTSTRAP_JS);
}

#[cfg(not(target_arch = "wasm32"))]
fn bridge_command(value: serde_json::Value) {
    ensure_audio_bridge();
    let script = format!("window.__storyplayerAudio && window.__storyplayerAudio.apply({value});");
    let _ = document::eval(&script);
}

/// Webview bridge sink for desktop builds: commands are evaluated as JavaScript against
/// an `<audio>` element inside the webview.
#[cfg(not(target_arch = "wasm32"))]
pub struct PlatformSink;

#[cfg(not(target_arch = "wasm32"))]
impl PlatformSink {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl MediaSink for PlatformSink {
    fn load(&mut self, source: &str) {
        bridge_command(serde_json::json!({ "type": "load", "src": source }));
    }

    fn play(&mut self) -> PlayRequest {
        ensure_audio_bridge();
        let eval = document::eval(
            r#"return (async function () {
                const bridge = window.__storyplayerAudio;
                if (!bridge) return { ok: false, name: "Error", message: "audio bridge missing" };
                return await bridge.play();
            })();"#,
        );
        Box::pin(async move {
            match eval.join::<PlayReply>().await {
                Ok(reply) if reply.ok => Ok(()),
                Ok(reply) => Err(PlayError::from_exception(&reply.name, &reply.message)),
                Err(err) => Err(PlayError::Failed(format!("{err:?}"))),
            }
        })
    }

    fn pause(&mut self) {
        bridge_command(serde_json::json!({ "type": "pause" }));
    }

    fn seek(&mut self, seconds: f64) {
        bridge_command(serde_json::json!({ "type": "seek", "position": seconds.max(0.0) }));
    }

    fn set_volume(&mut self, volume: f64) {
        bridge_command(serde_json::json!({ "type": "volume", "value": volume }));
    }

    fn set_playback_rate(&mut self, rate: f64) {
        bridge_command(serde_json::json!({ "type": "rate", "value": rate }));
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn platform_snapshot() -> Option<SinkSnapshot> {
    ensure_audio_bridge();
    let eval = document::eval(
        r#"return (function () {
            const bridge = window.__storyplayerAudio;
            return bridge ? bridge.snapshot() : { current_time: 0, duration: 0, paused: true, ended: false };
        })();"#,
    );
    eval.join::<SinkSnapshot>().await.ok()
}

/// Polls the audio element and feeds the resulting signals into the controller. The
/// screen wake lock follows the playing state on the same tick.
#[component]
pub fn AudioBridge() -> Element {
    let player = use_context::<PlayerSignal>().0;

    use_future(move || async move {
        let mut differ = SnapshotDiffer::new();
        let mut wake_lock = ScreenWakeLock::default();
        loop {
            sleep_ms(POLL_INTERVAL_MS).await;
            // Read before polling: a load racing the poll is then picked up next tick.
            let generation = player.peek().load_generation();
            let Some(snapshot) = platform_snapshot().await else {
                continue;
            };
            for event in differ.advance(generation, snapshot) {
                dispatch_event(player, event);
            }
            let playing = player.peek().state().is_playing;
            wake_lock.sync(playing).await;
        }
    });

    rsx! {}
}
