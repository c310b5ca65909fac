//! Texture byte loading via `fetch`

use sakura_rain::HalError;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::util::{describe, log};

/// Fetch `url` and return the raw response body.
///
/// Non-2xx responses fail with [`HalError::Http`].
pub(crate) async fn fetch_bytes(url: &str) -> Result<Vec<u8>, HalError> {
    let window = web_sys::window().ok_or(HalError::NotSupported)?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| {
        log(&format!("[wasm-hal] fetch: bad request for {}: {}", url, describe(&e)));
        HalError::InvalidArgument
    })?;

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| {
            log(&format!("[wasm-hal] fetch: {} failed: {}", url, describe(&e)));
            HalError::Network
        })?;
    let response: Response = response.dyn_into().map_err(|_| HalError::Network)?;

    if !response.ok() {
        return Err(HalError::Http(response.status()));
    }

    let body = response.array_buffer().map_err(|_| HalError::Network)?;
    let body = JsFuture::from(body).await.map_err(|_| HalError::Network)?;
    Ok(js_sys::Uint8Array::new(&body).to_vec())
}
