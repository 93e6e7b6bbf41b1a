use crate::components::{
    drive_play, AudioBridge, PlayPrompt, Player, PlayerBar, PlayerSignal, PlatformSink,
    SeekSurface, StoryList, ThemeSignal, ThemeToggle,
};
use crate::config::PlayerConfig;
use crate::offline::{CacheManifest, OfflineCache, PlatformCacheBackend, PlatformFetcher};
use crate::playback::{SeekBounds, Shortcut};
use crate::playlist::load_playlist;
use crate::settings::{PlatformPreferences, PreferenceStore};
use dioxus::prelude::*;

#[component]
pub fn AppShell() -> Element {
    let config = use_hook(PlayerConfig::load);
    let theme = use_signal(|| PlatformPreferences::default().load_theme());
    let mut player = {
        let config = config.clone();
        use_signal(move || Player::new(PlatformSink::new(), Vec::new(), &config))
    };
    let surface = use_signal(SeekBounds::default);
    let mut loading = use_signal(|| true);

    // Provide state via context
    use_context_provider(|| PlayerSignal(player));
    use_context_provider(|| ThemeSignal(theme));
    use_context_provider(|| SeekSurface(surface));
    use_context_provider({
        let config = config.clone();
        move || config
    });

    // Bootstrap: bring the offline cache up to date, then load stories through it.
    {
        let config = config.clone();
        use_future(move || {
            let config = config.clone();
            async move {
                let cache = OfflineCache::new(
                    CacheManifest::from(&config.offline),
                    PlatformCacheBackend::default(),
                    PlatformFetcher::new(&config.offline.asset_root),
                );
                if config.offline.enabled && cache.ensure_ready().await {
                    tracing::info!("Offline cache {} ready", cache.manifest().cache_name);
                }
                let tracks = load_playlist(&cache, &config).await;
                player.write().set_tracks(tracks);
                loading.set(false);
            }
        });
    }

    let on_key_down = move |evt: KeyboardEvent| {
        let Some(shortcut) = Shortcut::from_code(&evt.code().to_string()) else {
            return;
        };
        evt.prevent_default();
        let request = player.write().apply_shortcut(shortcut);
        if let Some(request) = request {
            drive_play(player, request);
        }
    };

    // Drag-seek continues anywhere in the app; the bar only starts the session.
    let on_pointer_move = move |evt: PointerEvent| {
        if player.peek().is_dragging() {
            player
                .write()
                .update_seek_drag(evt.client_coordinates().x, surface());
        }
    };

    let on_pointer_up = move |_: PointerEvent| {
        if player.peek().is_dragging() {
            player.write().end_seek_drag();
        }
    };

    let app_class = if theme().is_dark() {
        "story-app dark-mode"
    } else {
        "story-app"
    };

    rsx! {
        div {
            class: "{app_class}",
            tabindex: "0",
            // Focus the shell so shortcuts work before anything has been clicked.
            onmounted: move |evt: MountedEvent| {
                spawn(async move {
                    let _ = evt.data().set_focus(true).await;
                });
            },
            onkeydown: on_key_down,
            onpointermove: on_pointer_move,
            onpointerup: on_pointer_up,
            onpointercancel: move |_| player.write().end_seek_drag(),
            header { class: "app-header",
                h1 { class: "app-title", "قصه‌ها" }
                ThemeToggle {}
            }
            main { class: "app-main",
                if loading() {
                    div { class: "loading", "…" }
                } else {
                    StoryList {}
                }
            }
            PlayerBar {}
            PlayPrompt {}
            AudioBridge {}
        }
    }
}
