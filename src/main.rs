use dioxus::prelude::*;

mod components;
mod config;
mod error;
mod offline;
mod playback;
mod playlist;
mod settings;

use components::AppShell;

const PLAYER_CSS: Asset = asset!("/assets/styling/player.css");

fn main() {
    if let Err(err) = dioxus::logger::init(tracing::Level::INFO) {
        eprintln!("Failed to initialize logger: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        // Theme color for mobile browsers
        document::Meta { name: "theme-color", content: "#6c5ce7" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "StoryPlayer" }

        document::Stylesheet { href: PLAYER_CSS }

        AppShell {}
    }
}
