//! Page navigation through `window.location`.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::task::spawn_local;
use warehouse_client::{ClientConfig, Navigator, Surface};

pub struct LocationNavigator {
    config: Rc<ClientConfig>,
}

impl LocationNavigator {
    pub fn new(config: Rc<ClientConfig>) -> Self {
        Self { config }
    }
}

/// `replace` keeps the guard redirect out of the history stack.
fn go_to(path: &str) {
    let Some(window) = web_sys::window() else {
        log::error!("cannot navigate to {path}: window is unavailable");
        return;
    };
    if let Err(e) = window.location().replace(path) {
        log::error!("navigation to {path} failed: {e:?}");
    }
}

impl Navigator for LocationNavigator {
    fn redirect(&self, surface: Surface) {
        go_to(self.config.surface_path(surface));
    }

    fn redirect_after(&self, surface: Surface, delay_ms: u32) {
        let path = self.config.surface_path(surface).to_string();
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            go_to(&path);
        });
    }
}

/// Surface served at the current pathname.
pub fn current_surface(config: &ClientConfig) -> Surface {
    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string());
    config.surface_for_path(&path)
}
