//! Runtime configuration from `window.WAREHOUSE_CONFIG`.

use wasm_bindgen::JsValue;
use warehouse_client::ClientConfig;

const CONFIG_GLOBAL: &str = "WAREHOUSE_CONFIG";

/// Missing or invalid configuration falls back to defaults.
pub fn load_config() -> ClientConfig {
    let Some(window) = web_sys::window() else {
        return ClientConfig::default();
    };

    let value = match js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return ClientConfig::default(),
    };

    let parsed = serde_wasm_bindgen::from_value::<ClientConfig>(value)
        .map_err(|e| e.to_string())
        .and_then(|config| config.normalized().map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => {
            log::debug!("loaded {CONFIG_GLOBAL}: {config:?}");
            config
        }
        Err(e) => {
            log::warn!("ignoring {CONFIG_GLOBAL}: {e}");
            ClientConfig::default()
        }
    }
}
