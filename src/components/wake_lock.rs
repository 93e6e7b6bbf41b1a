//! Screen wake lock while a story is playing.
//! Web builds drive `navigator.wakeLock` through `Reflect`; other targets do nothing.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeLockAction {
    Acquire,
    Release,
    Keep,
}

/// The browser drops the lock whenever the page is hidden, so it is requested again once
/// the page is visible and playback is still running.
pub fn wake_lock_action(playing: bool, visible: bool, held: bool) -> WakeLockAction {
    match (playing && visible, held) {
        (true, false) => WakeLockAction::Acquire,
        (false, true) => WakeLockAction::Release,
        _ => WakeLockAction::Keep,
    }
}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{wake_lock_action, WakeLockAction};
    use js_sys::{Function, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
        Reflect::get(target, &JsValue::from_str(key))
    }

    fn page_visible() -> bool {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| get(&JsValue::from(document), "visibilityState").ok())
            .and_then(|state| state.as_string())
            .map(|state| state == "visible")
            .unwrap_or(true)
    }

    fn wake_lock_api() -> Option<JsValue> {
        let window = JsValue::from(web_sys::window()?);
        let navigator = get(&window, "navigator").ok()?;
        let api = get(&navigator, "wakeLock").ok()?;
        if api.is_undefined() || api.is_null() {
            None
        } else {
            Some(api)
        }
    }

    async fn call_async(
        target: &JsValue,
        method: &str,
        arg: Option<&str>,
    ) -> Result<JsValue, JsValue> {
        let function: Function = get(target, method)?.dyn_into()?;
        let result = match arg {
            Some(arg) => function.call1(target, &JsValue::from_str(arg))?,
            None => function.call0(target)?,
        };
        let promise: Promise = result.dyn_into()?;
        JsFuture::from(promise).await
    }

    #[derive(Default)]
    pub struct ScreenWakeLock {
        sentinel: Option<JsValue>,
        unsupported: bool,
    }

    impl ScreenWakeLock {
        fn is_held(&self) -> bool {
            self.sentinel
                .as_ref()
                .and_then(|sentinel| get(sentinel, "released").ok())
                .and_then(|released| released.as_bool())
                .map(|released| !released)
                .unwrap_or(false)
        }

        pub async fn sync(&mut self, playing: bool) {
            if self.unsupported {
                return;
            }
            match wake_lock_action(playing, page_visible(), self.is_held()) {
                WakeLockAction::Acquire => {
                    let Some(api) = wake_lock_api() else {
                        tracing::debug!("Screen wake lock unsupported");
                        self.unsupported = true;
                        return;
                    };
                    match call_async(&api, "request", Some("screen")).await {
                        Ok(sentinel) => {
                            tracing::debug!("Screen wake lock acquired");
                            self.sentinel = Some(sentinel);
                        }
                        Err(err) => tracing::debug!("Screen wake lock refused: {err:?}"),
                    }
                }
                WakeLockAction::Release => {
                    if let Some(sentinel) = self.sentinel.take() {
                        if let Err(err) = call_async(&sentinel, "release", None).await {
                            tracing::debug!("Screen wake lock release failed: {err:?}");
                        }
                    }
                }
                WakeLockAction::Keep => {}
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::ScreenWakeLock;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct ScreenWakeLock;

#[cfg(not(target_arch = "wasm32"))]
impl ScreenWakeLock {
    pub async fn sync(&mut self, _playing: bool) {}
}
