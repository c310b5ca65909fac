//! Browser tests for the exported page API
//!
//! Run with `wasm-pack test --headless --firefox crates/sakura-web`.

#![cfg(target_arch = "wasm32")]

use sakura_web::SakuraPage;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_new_page_is_idle() {
    let page = SakuraPage::new();
    assert!(!page.is_started());
    assert!(!page.is_rain_active());
}

#[wasm_bindgen_test]
fn test_start_without_theme_leaves_rain_off() {
    // No window.sakura: the enable flag is missing, so rain stays disabled
    let page = SakuraPage::new();
    page.start().unwrap();

    assert!(page.is_started());
    assert!(!page.is_rain_active());
    assert_eq!(page.update_rain_config(r#"{"dropsCount": 300}"#), Ok(false));
    assert_eq!(page.reload_rain_texture(), Ok(false));
}

#[wasm_bindgen_test]
fn test_invalid_config_json_is_rejected() {
    let page = SakuraPage::new();
    assert!(page.update_rain_config("{not json").is_err());
}

#[wasm_bindgen_test]
fn test_shutdown_allows_restart() {
    let page = SakuraPage::new();
    page.start().unwrap();
    page.shutdown();
    assert!(!page.is_started());

    page.start().unwrap();
    assert!(page.is_started());
    page.shutdown();
}
