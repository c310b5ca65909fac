//! Sakura theme page runtime for the browser
//!
//! Exposes [`SakuraPage`] to JavaScript. The page owns a [`WebHal`] and the
//! registered components; browser callbacks drive them through the HAL.
//!
//! ```js
//! import init, { SakuraPage } from './pkg/sakura_web.js';
//!
//! await init();
//! const page = new SakuraPage();
//! page.start();
//! document.dispatchEvent(new Event('sakura:refresh'));
//! ```

mod hal;
mod runtime;
mod startup;
mod util;

use std::cell::RefCell;
use std::rc::Rc;

use sakura_rain::RainConfigPatch;
use wasm_bindgen::prelude::*;

pub use hal::{WebHal, WebSession, OVERLAY_CLASS};

use runtime::PageRuntime;
use util::log;

/// Page-level handle exported to JavaScript
#[wasm_bindgen]
pub struct SakuraPage {
    runtime: Rc<RefCell<PageRuntime>>,
}

impl Default for SakuraPage {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SakuraPage {
    /// Create the page runtime (nothing is registered until `start`)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            runtime: PageRuntime::create(),
        }
    }

    /// Run the startup registrations
    #[wasm_bindgen]
    pub fn start(&self) -> Result<(), JsValue> {
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let mut runtime = self
            .runtime
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Page runtime busy"))?;
        runtime.start();
        Ok(())
    }

    /// True once `start` has run (and `shutdown` has not)
    #[wasm_bindgen]
    pub fn is_started(&self) -> bool {
        self.runtime
            .try_borrow()
            .map(|runtime| runtime.is_started())
            .unwrap_or(false)
    }

    /// Merge a partial rain config, e.g. `{"dropsCount": 300}`
    ///
    /// Returns false when the rain effect is not active.
    #[wasm_bindgen]
    pub fn update_rain_config(&self, json: &str) -> Result<bool, JsValue> {
        let patch = RainConfigPatch::from_json(json)
            .map_err(|e| JsValue::from_str(&format!("Invalid rain config: {}", e)))?;
        let mut runtime = self
            .runtime
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Page runtime busy"))?;
        Ok(runtime.rain.update_config(&patch))
    }

    /// Re-read `data-bg-url` and swap the background texture
    ///
    /// Returns false when the rain effect is not active.
    #[wasm_bindgen]
    pub fn reload_rain_texture(&self) -> Result<bool, JsValue> {
        let mut runtime = self
            .runtime
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("Page runtime busy"))?;
        let PageRuntime { hal, rain, .. } = &mut *runtime;
        Ok(rain.reload_texture(hal))
    }

    /// True while the rain effect is animating
    #[wasm_bindgen]
    pub fn is_rain_active(&self) -> bool {
        self.runtime
            .try_borrow()
            .ok()
            .and_then(|runtime| runtime.rain.effect().map(|effect| effect.is_running()))
            .unwrap_or(false)
    }

    /// Tear down every component and release its resources
    #[wasm_bindgen]
    pub fn shutdown(&self) {
        match self.runtime.try_borrow_mut() {
            Ok(mut runtime) => runtime.shutdown(),
            Err(_) => log("[sakura] Shutdown skipped: page runtime busy"),
        }
    }
}
