use crate::components::{drive_play, PlayerSignal};
use crate::config::PlayerConfig;
use crate::playlist::Track;
use dioxus::prelude::*;

#[component]
pub fn StoryList() -> Element {
    let player = use_context::<PlayerSignal>().0;
    let config = use_context::<PlayerConfig>();
    let (tracks, current) = {
        let player = player.read();
        (player.tracks().to_vec(), player.state().current_index)
    };

    rsx! {
        div { id: "storyList", class: "story-list",
            for (index, track) in tracks.into_iter().enumerate() {
                StoryCard {
                    key: "{index}",
                    index,
                    track,
                    playing: current == Some(index),
                    default_artwork: config.default_artwork.clone(),
                }
            }
        }
    }
}

#[component]
fn StoryCard(index: usize, track: Track, playing: bool, default_artwork: String) -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    let mut artwork_failed = use_signal(|| false);

    let artwork = if artwork_failed() {
        default_artwork.clone()
    } else {
        track.artwork_or(&default_artwork).to_string()
    };
    let description = track.description.clone().unwrap_or_default();
    let duration = track.duration_label.clone().unwrap_or_default();

    let on_select = move |_: MouseEvent| {
        let request = player.write().select_track(index);
        match request {
            Ok(Some(request)) => drive_play(player, request),
            Ok(None) => {}
            Err(err) => tracing::warn!("{err}"),
        }
    };

    rsx! {
        div {
            class: if playing { "story-card playing" } else { "story-card" },
            onclick: on_select,
            div { class: "story-image",
                img {
                    src: "{artwork}",
                    alt: "{track.title}",
                    onerror: move |_| artwork_failed.set(true),
                }
            }
            div { class: "story-content",
                div { class: "story-title", "{track.title}" }
                if !description.is_empty() {
                    div { class: "story-description", "{description}" }
                }
                if !duration.is_empty() {
                    div { class: "story-duration", "{duration}" }
                }
            }
        }
    }
}
