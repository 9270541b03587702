use explorer_state::flags::FlagStorage;
use explorer_state::ExplorerError;

#[cfg(feature = "hydrate")]
mod js {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    extern "C" {
        #[wasm_bindgen(js_namespace = localStorage, js_name = getItem, catch)]
        pub fn get_item(key: &str) -> Result<Option<String>, JsValue>;

        #[wasm_bindgen(js_namespace = localStorage, js_name = setItem, catch)]
        pub fn set_item(key: &str, value: &str) -> Result<(), JsValue>;
    }
}

/// `window.localStorage`; empty and write-ignoring outside the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl FlagStorage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, ExplorerError> {
        #[cfg(feature = "hydrate")]
        {
            js::get_item(key).map_err(|e| ExplorerError::Storage(format!("{:?}", e)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), ExplorerError> {
        #[cfg(feature = "hydrate")]
        {
            js::set_item(key, value).map_err(|e| ExplorerError::Storage(format!("{:?}", e)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }
}
