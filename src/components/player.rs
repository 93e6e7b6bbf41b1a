use crate::components::{drive_play, sleep_ms, Icon, PlayerSignal};
use crate::config::PlayerConfig;
use crate::playback::{typewriter_len, typewriter_prefix, SeekBounds, VolumeLevel};
use crate::settings::{PlatformPreferences, PreferenceStore, Theme};
use dioxus::prelude::*;
use std::rc::Rc;

/// Current theme, provided by the app shell.
#[derive(Clone, Copy)]
pub struct ThemeSignal(pub Signal<Theme>);

/// Last measured extent of the seek bar, shared with the app-level pointer handlers so a
/// drag keeps tracking after the pointer leaves the bar.
#[derive(Clone, Copy)]
pub struct SeekSurface(pub Signal<SeekBounds>);

#[component]
pub fn PlayerBar() -> Element {
    rsx! {
        div { id: "player", class: "player",
            NowPlaying {}
            SeekBar {}
            div { class: "controls",
                PrevButton {}
                PlayPauseButton {}
                NextButton {}
            }
            div { class: "secondary-controls",
                VolumeControl {}
                SpeedSelect {}
            }
        }
    }
}

/// Now-playing title and artist, optionally revealed typewriter style.
#[component]
fn NowPlaying() -> Element {
    let player = use_context::<PlayerSignal>().0;
    let config = use_context::<PlayerConfig>();
    let typewriter = config.typewriter_title;
    let tick_ms = config.typewriter_tick_ms;

    let title = use_memo(move || {
        player
            .read()
            .current_track()
            .map(|track| track.title.clone())
            .unwrap_or_default()
    });
    let (artist, artwork) = player
        .read()
        .current_track()
        .map(|track| {
            (
                track.artist.clone(),
                Some(track.artwork_or(&config.default_artwork).to_string()),
            )
        })
        .unwrap_or_default();
    let mut visible = use_signal(|| 0usize);

    use_future(move || async move {
        if !typewriter {
            return;
        }
        let mut shown_for = String::new();
        loop {
            sleep_ms(tick_ms).await;
            let current = (*title.peek()).clone();
            if current != shown_for {
                shown_for = current;
                visible.set(0);
            } else if *visible.peek() < typewriter_len(&shown_for) {
                visible += 1;
            }
        }
    });

    let full_title = title();
    let shown = if typewriter {
        typewriter_prefix(&full_title, visible()).to_string()
    } else {
        full_title.clone()
    };

    rsx! {
        div { class: "now-playing",
            if let Some(artwork) = artwork {
                img { id: "currentStoryImage", class: "now-playing-art", src: "{artwork}" }
            }
            div { class: "now-playing-text",
                div { id: "currentStoryTitle", class: "now-playing-title", "{shown}" }
                if !artist.is_empty() {
                    div { class: "now-playing-artist", "{artist}" }
                }
            }
        }
    }
}

/// Progress bar with click and drag seeking.
#[component]
fn SeekBar() -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    let mut surface = use_context::<SeekSurface>().0;
    let mut mounted = use_signal(|| None::<Rc<MountedData>>);

    let progress = player.read().progress().clone();
    let fill_percent = progress.percent();

    let on_mounted = move |evt: MountedEvent| {
        let element = evt.data();
        mounted.set(Some(element.clone()));
        spawn(async move {
            if let Ok(rect) = element.get_client_rect().await {
                surface.set(SeekBounds::new(rect.origin.x, rect.size.width));
            }
        });
    };

    // The session starts right away so a pointer-up handled before the bounds refresh
    // still ends it; the refreshed bounds only re-seek a session that is still active.
    let on_pointer_down = move |evt: PointerEvent| {
        let x = evt.client_coordinates().x;
        let was_measured = surface.peek().is_measured();
        player.write().begin_seek_drag(x, *surface.peek());
        spawn(async move {
            let Some(element) = mounted() else {
                return;
            };
            let Ok(rect) = element.get_client_rect().await else {
                return;
            };
            let bounds = SeekBounds::new(rect.origin.x, rect.size.width);
            surface.set(bounds);
            let mut player = player.write();
            if player.is_dragging() {
                player.update_seek_drag(x, bounds);
            } else if !was_measured {
                // A tap that ended before the first measurement still lands.
                player.seek_to(bounds.fraction_at(x));
            }
        });
    };

    rsx! {
        div {
            id: "progressBar",
            class: "progress-bar",
            onmounted: on_mounted,
            onpointerdown: on_pointer_down,
            div { id: "progressFill", class: "progress-fill", style: "width: {fill_percent}%" }
        }
        div { class: "time-row",
            span { id: "currentTime", "{progress.elapsed}" }
            span { class: "time-remaining", "-{progress.remaining}" }
            span { id: "duration", "{progress.total}" }
        }
    }
}

#[component]
fn PlayPauseButton() -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    let playing = player.read().state().is_playing;

    rsx! {
        button {
            id: "playPauseBtn",
            r#type: "button",
            class: if playing { "control-btn pause-btn" } else { "control-btn play-btn" },
            onclick: move |_| {
                let request = player.write().toggle();
                if let Some(request) = request {
                    drive_play(player, request);
                }
            },
            Icon {
                name: if playing { "pause".to_string() } else { "play".to_string() },
                class: "icon".to_string(),
            }
        }
    }
}

#[component]
fn PrevButton() -> Element {
    let mut player = use_context::<PlayerSignal>().0;

    rsx! {
        button {
            id: "prevBtn",
            r#type: "button",
            class: "control-btn",
            onclick: move |_| {
                let request = player.write().previous();
                if let Some(request) = request {
                    drive_play(player, request);
                }
            },
            Icon { name: "previous".to_string(), class: "icon".to_string() }
        }
    }
}

#[component]
fn NextButton() -> Element {
    let mut player = use_context::<PlayerSignal>().0;

    rsx! {
        button {
            id: "nextBtn",
            r#type: "button",
            class: "control-btn",
            onclick: move |_| {
                let request = player.write().next();
                if let Some(request) = request {
                    drive_play(player, request);
                }
            },
            Icon { name: "next".to_string(), class: "icon".to_string() }
        }
    }
}

#[component]
fn VolumeControl() -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    let (volume, level) = {
        let player = player.read();
        (player.state().volume, player.volume_level())
    };
    let slider_value = (volume * 100.0).round();
    let icon = match level {
        VolumeLevel::Muted => "volume-muted",
        VolumeLevel::Low => "volume-low",
        VolumeLevel::High => "volume-high",
    };

    let on_volume_change = move |e: Event<FormData>| {
        if let Ok(val) = e.value().parse::<f64>() {
            player.write().set_volume(val / 100.0);
        }
    };

    rsx! {
        div { class: "volume-control",
            button {
                id: "volumeBtn",
                r#type: "button",
                class: "control-btn",
                onclick: move |_| player.write().toggle_mute(),
                Icon { name: icon.to_string(), class: "icon".to_string() }
            }
            input {
                id: "volumeSlider",
                r#type: "range",
                min: "0",
                max: "100",
                value: "{slider_value}",
                oninput: on_volume_change,
            }
        }
    }
}

#[component]
fn SpeedSelect() -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    let config = use_context::<PlayerConfig>();
    let current = player.read().state().playback_rate;

    rsx! {
        select {
            id: "speedSelect",
            class: "speed-select",
            onchange: move |e: Event<FormData>| {
                if let Ok(rate) = e.value().parse::<f64>() {
                    player.write().set_playback_rate(rate);
                }
            },
            for rate in config.playback_rates.iter().copied() {
                option {
                    key: "{rate}",
                    value: "{rate}",
                    selected: (rate - current).abs() < 1e-9,
                    "{rate}×"
                }
            }
        }
    }
}

#[component]
pub fn ThemeToggle() -> Element {
    let mut theme = use_context::<ThemeSignal>().0;
    let is_dark = theme().is_dark();

    rsx! {
        button {
            id: "themeToggle",
            r#type: "button",
            class: "control-btn theme-toggle",
            onclick: move |_| {
                let next = theme.peek().toggled();
                theme.set(next);
                if let Err(err) = PlatformPreferences::default().save_theme(next) {
                    tracing::warn!("Failed to save theme: {err}");
                }
            },
            Icon {
                name: if is_dark { "moon".to_string() } else { "sun".to_string() },
                class: "icon".to_string(),
            }
        }
    }
}

/// Shown when the browser refused to start playback without a gesture; clicking it is
/// that gesture.
#[component]
pub fn PlayPrompt() -> Element {
    let mut player = use_context::<PlayerSignal>().0;
    if !player.read().is_blocked() {
        return rsx! {};
    }

    rsx! {
        div { class: "play-prompt",
            div { class: "play-prompt-body",
                h3 { "برای پخش صدا کلیک کنید" }
                button {
                    r#type: "button",
                    class: "play-prompt-btn",
                    onclick: move |_| {
                        let request = player.write().play();
                        if let Some(request) = request {
                            drive_play(player, request);
                        }
                    },
                    "پخش"
                }
            }
        }
    }
}
