//! Integration tests for RainEffect
//!
//! These tests drive the effect through the mock page and verify:
//! - Deferred setup (document ready, 300 ms delay)
//! - Texture acquisition and the gradient fallback
//! - The animation loop and its time scaling
//! - Live config updates, resize and texture reload
//! - Teardown from every phase

use sakura_rain::settings::BACKGROUND_URL_ATTRIBUTE;
use sakura_rain::testing::{png_bytes, MockEvent, MockHal, Teardown};
use sakura_rain::{
    HalError, PageEvent, Phase, RainConfig, RainConfigPatch, RainEffect, Signal, TextureSource,
    Viewport, SETUP_DELAY_MS,
};

type Effect = RainEffect<MockHal>;

fn dispatch(effect: &mut Effect, hal: &MockHal, event: Option<MockEvent>) {
    effect.handle_event(hal, event.expect("an event should be pending"));
}

fn loaded(url: &str) -> TextureSource {
    TextureSource::Loaded {
        url: url.to_string(),
    }
}

/// Complete the pending session build
fn finish_session(effect: &mut Effect, hal: &MockHal) {
    let request = hal.pending_session().expect("session pending").request;
    effect.handle_event(hal, hal.complete_session(request));
}

/// Complete the pending texture load with a small PNG
fn finish_texture(effect: &mut Effect, hal: &MockHal) {
    let (request, _) = hal.last_texture_load().expect("texture load pending");
    effect.handle_event(
        hal,
        hal.complete_texture(request, Ok(png_bytes(8, 8, [40, 80, 120, 255]))),
    );
}

/// Init, fire the setup delay and finish every pending step
fn start_running(hal: &MockHal, config: RainConfig) -> Effect {
    let mut effect = RainEffect::new(config);
    effect.init(hal);
    dispatch(&mut effect, hal, hal.fire_timer());
    if hal.last_texture_load().is_some() {
        finish_texture(&mut effect, hal);
    }
    finish_session(&mut effect, hal);
    assert_eq!(effect.phase(), Phase::Running);
    effect
}

// =============================================================================
// Deferred Setup Tests
// =============================================================================

#[test]
fn test_init_waits_for_document_then_delay() {
    let hal = MockHal::new();
    hal.set_document_ready(false);

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);

    assert_eq!(effect.phase(), Phase::AwaitingDocument);
    assert!(hal.has_listener(Signal::DocumentReady));
    assert_eq!(hal.pending_timer_count(), 0);

    effect.handle_event(&hal, PageEvent::DocumentReady);

    assert_eq!(effect.phase(), Phase::AwaitingDelay);
    assert!(!hal.has_listener(Signal::DocumentReady));
    assert_eq!(hal.pending_timer_delays(), vec![SETUP_DELAY_MS]);
    assert_eq!(SETUP_DELAY_MS, 300);

    dispatch(&mut effect, &hal, hal.fire_timer());
    assert_eq!(effect.phase(), Phase::BuildingSession);
}

#[test]
fn test_init_with_loaded_document_arms_delay() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);

    assert_eq!(effect.phase(), Phase::AwaitingDelay);
    assert_eq!(hal.pending_timer_delays(), vec![300]);
    assert_eq!(hal.listener_count(), 0);
    assert_eq!(hal.sessions_started(), 0);
}

#[test]
fn test_init_twice_is_noop() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    effect.init(&hal);
    assert_eq!(hal.pending_timer_count(), 1);
}

#[test]
fn test_unrelated_timer_is_ignored() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);

    effect.handle_event(&hal, PageEvent::Timer(sakura_rain::TimerId(9999)));
    assert_eq!(effect.phase(), Phase::AwaitingDelay);
}

#[test]
fn test_refused_timer_sets_up_immediately() {
    let hal = MockHal::new();
    hal.refuse_timers(true);

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);

    assert_eq!(effect.phase(), Phase::BuildingSession);
    assert!(hal.has_log_containing("setting up now"));
}

// =============================================================================
// Texture Acquisition Tests
// =============================================================================

#[test]
fn test_no_url_uses_gradient_with_unit_density() {
    let hal = MockHal::new();
    let effect = start_running(&hal, RainConfig::new(150, 5.0, 0.3));

    let texture = effect.texture().unwrap();
    assert!(texture.is_fallback());
    assert_eq!((texture.width(), texture.height()), (512, 512));

    let session = hal.last_session().unwrap();
    assert_eq!(session.texture, TextureSource::Gradient);
    assert_eq!(session.inputs.rain_amount, 1.0);
    assert_eq!(session.inputs.glass_blur, 0.3);
    assert_eq!(session.inputs.resolution, [1920.0, 1080.0, 1.0]);
    assert_eq!(session.inputs.time, 0.0);
    assert!(hal.has_log_containing("No data-bg-url"));
}

#[test]
fn test_texture_acquired_before_session_requested() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/img/bg.png");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    assert_eq!(effect.phase(), Phase::AcquiringTexture);
    assert_eq!(hal.last_texture_load().unwrap().1, "/img/bg.png");
    assert_eq!(hal.sessions_started(), 0);

    finish_texture(&mut effect, &hal);

    assert_eq!(effect.phase(), Phase::BuildingSession);
    let request = hal.pending_session().unwrap();
    assert_eq!(request.texture, loaded("/img/bg.png"));
    assert_eq!(effect.texture().unwrap().width(), 8);
}

#[test]
fn test_http_error_falls_back_to_gradient() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/missing.jpg");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    let (request, _) = hal.last_texture_load().unwrap();
    effect.handle_event(&hal, hal.complete_texture(request, Err(HalError::Http(404))));

    assert_eq!(effect.phase(), Phase::BuildingSession);
    assert_eq!(hal.pending_session().unwrap().texture, TextureSource::Gradient);
    assert!(hal.has_log_containing("HTTP 404"));
    assert!(hal.has_log_containing("using fallback gradient"));
}

#[test]
fn test_undecodable_body_falls_back_to_gradient() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/bg.png");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    let (request, _) = hal.last_texture_load().unwrap();
    let body = b"<html>Not Found</html>".to_vec();
    effect.handle_event(&hal, hal.complete_texture(request, Ok(body)));

    assert!(effect.texture().unwrap().is_fallback());
    assert_eq!(effect.phase(), Phase::BuildingSession);
}

#[test]
fn test_refused_load_falls_back_to_gradient() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/bg.png");
    hal.refuse_texture_loads(true);

    let effect = start_running(&hal, RainConfig::default());

    assert!(effect.texture().unwrap().is_fallback());
    assert!(hal.has_log_containing("Failed to start texture load"));
}

#[test]
fn test_blank_url_treated_as_absent() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "  ");

    let effect = start_running(&hal, RainConfig::default());

    assert!(hal.pending_texture_loads().is_empty());
    assert!(effect.texture().unwrap().is_fallback());
}

// =============================================================================
// Session Construction Tests
// =============================================================================

#[test]
fn test_session_build_failure_returns_to_idle() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    let request = hal.pending_session().unwrap().request;
    effect.handle_event(&hal, hal.fail_session(request, HalError::NotSupported));

    assert_eq!(effect.phase(), Phase::Idle);
    assert!(effect.texture().is_none());
    assert!(!effect.frame_pending());
    assert_eq!(hal.pending_frame_count(), 0);
    assert_eq!(hal.live_session_count(), 0);
    assert!(hal.has_log_containing("Failed to create render session"));
}

#[test]
fn test_refused_session_returns_to_idle() {
    let hal = MockHal::new();
    hal.refuse_sessions(true);

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    assert_eq!(effect.phase(), Phase::Idle);
    assert!(effect.texture().is_none());
}

#[test]
fn test_session_uses_viewport_at_arrival() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    hal.set_viewport(Viewport::new(1000.0, 800.0, 1.5));
    finish_session(&mut effect, &hal);

    let session = hal.last_session().unwrap();
    assert_eq!(session.viewport, Viewport::new(1000.0, 800.0, 1.5));
    assert_eq!(session.inputs.resolution, [1500.0, 1200.0, 1.0]);
}

#[test]
fn test_resize_listener_only_while_running() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());
    assert!(!hal.has_listener(Signal::Resize));

    finish_session(&mut effect, &hal);
    assert!(hal.has_listener(Signal::Resize));

    effect.destroy(&hal);
    assert!(!hal.has_listener(Signal::Resize));
}

// =============================================================================
// Animation Loop Tests
// =============================================================================

#[test]
fn test_time_scales_with_speed() {
    let hal = MockHal::new();
    hal.set_time(1000.0);
    let mut effect = start_running(&hal, RainConfig::new(100, 10.0, 0.3));

    dispatch(&mut effect, &hal, hal.fire_frame(3000.0));

    // 2 s elapsed at twice the reference speed
    assert_eq!(effect.inputs().time, 4.0);
    assert_eq!(hal.last_session().unwrap().inputs.time, 4.0);
}

#[test]
fn test_default_speed_runs_at_wall_clock() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    dispatch(&mut effect, &hal, hal.fire_frame(1500.0));
    assert_eq!(effect.inputs().time, 1.5);
}

#[test]
fn test_one_render_per_frame() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());
    assert_eq!(hal.pending_frame_count(), 1);

    for i in 1..=3 {
        dispatch(&mut effect, &hal, hal.fire_frame(i as f64 * 16.0));
        assert_eq!(hal.pending_frame_count(), 1);
    }

    assert_eq!(hal.total_renders(), 3);
}

#[test]
fn test_render_error_is_logged_and_loop_continues() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    hal.set_render_error(Some(HalError::Gpu));
    dispatch(&mut effect, &hal, hal.fire_frame(16.0));

    assert!(hal.has_log_containing("Render failed: GPU error"));
    assert_eq!(hal.pending_frame_count(), 1);

    hal.clear_debug_log();
    hal.set_render_error(Some(HalError::FrameSkipped));
    dispatch(&mut effect, &hal, hal.fire_frame(32.0));

    assert!(!hal.has_log_containing("Render failed"));
    assert_eq!(hal.pending_frame_count(), 1);
}

// =============================================================================
// Config Update Tests
// =============================================================================

#[test]
fn test_update_config_pushes_density_live() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    let patch = RainConfigPatch::from_json(r#"{"dropsCount": 300}"#).unwrap();
    effect.update_config(&patch);

    assert_eq!(effect.inputs().rain_amount, 2.0);
    assert_eq!(hal.last_session().unwrap().inputs.rain_amount, 2.0);
    assert_eq!(effect.config().speed, 5.0);
    assert_eq!(hal.sessions_started(), 1);
}

#[test]
fn test_update_config_glass_blur_live() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    effect.update_config(&RainConfigPatch {
        glass_blur: Some(0.7),
        ..Default::default()
    });

    assert_eq!(hal.last_session().unwrap().inputs.glass_blur, 0.7);
}

#[test]
fn test_update_config_before_setup_is_used_at_build() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);

    let patch = RainConfigPatch::from_json(r#"{"dropsCount": 300, "glassBlur": 0.6}"#).unwrap();
    effect.update_config(&patch);

    dispatch(&mut effect, &hal, hal.fire_timer());
    let request = hal.pending_session().unwrap();
    assert_eq!(request.inputs.rain_amount, 2.0);
    assert_eq!(request.inputs.glass_blur, 0.6);
}

#[test]
fn test_update_config_speed_applies_on_next_frame() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    effect.update_config(&RainConfigPatch {
        speed: Some(2.5),
        ..Default::default()
    });
    dispatch(&mut effect, &hal, hal.fire_frame(2000.0));

    assert_eq!(effect.inputs().time, 1.0);
}

// =============================================================================
// Resize Tests
// =============================================================================

#[test]
fn test_resize_updates_resolution_with_pixel_ratio() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    hal.set_viewport(Viewport::new(1280.0, 720.0, 2.0));
    effect.handle_event(&hal, PageEvent::Resize);

    let session = hal.last_session().unwrap();
    assert_eq!(session.inputs.resolution, [2560.0, 1440.0, 1.0]);
    assert_eq!(session.resizes.last(), Some(&Viewport::new(1280.0, 720.0, 2.0)));
}

#[test]
fn test_resize_before_session_is_ignored() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    effect.handle_event(&hal, PageEvent::Resize);
    assert_eq!(effect.phase(), Phase::AwaitingDelay);
}

// =============================================================================
// Texture Reload Tests
// =============================================================================

#[test]
fn test_reload_swaps_texture_in_live_session() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/day.png");
    let mut effect = start_running(&hal, RainConfig::default());
    assert_eq!(hal.last_session().unwrap().texture, loaded("/day.png"));

    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/night.png");
    effect.reload_texture(&hal);

    // Old texture stays bound until the new one arrives
    assert_eq!(hal.last_session().unwrap().texture, loaded("/day.png"));
    assert_eq!(effect.texture().unwrap().source(), &loaded("/day.png"));

    finish_texture(&mut effect, &hal);

    let session = hal.last_session().unwrap();
    assert_eq!(session.texture, loaded("/night.png"));
    assert_eq!(session.texture_binds, 1);
    assert_eq!(effect.texture().unwrap().source(), &loaded("/night.png"));
    assert_eq!(hal.sessions_started(), 1);
    assert!(hal.has_log_containing("Texture reloaded"));
}

#[test]
fn test_reload_last_request_wins() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());

    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/a.png");
    effect.reload_texture(&hal);
    let (first, _) = hal.last_texture_load().unwrap();

    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/b.png");
    effect.reload_texture(&hal);
    let (second, _) = hal.last_texture_load().unwrap();

    let png = png_bytes(4, 4, [1, 2, 3, 255]);
    effect.handle_event(&hal, hal.complete_texture(second, Ok(png.clone())));
    effect.handle_event(&hal, hal.complete_texture(first, Ok(png)));

    let session = hal.last_session().unwrap();
    assert_eq!(session.texture, loaded("/b.png"));
    assert_eq!(session.texture_binds, 1);
    assert!(hal.has_log_containing("stale texture load"));
}

#[test]
fn test_reload_during_acquisition_restarts_it() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/old.png");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());
    let (stale, _) = hal.last_texture_load().unwrap();

    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/new.png");
    effect.reload_texture(&hal);

    effect.handle_event(&hal, hal.complete_texture(stale, Err(HalError::Network)));
    assert_eq!(effect.phase(), Phase::AcquiringTexture);
    assert_eq!(hal.sessions_started(), 0);

    finish_texture(&mut effect, &hal);
    assert_eq!(effect.phase(), Phase::BuildingSession);
    assert_eq!(hal.pending_session().unwrap().texture, loaded("/new.png"));
    assert_eq!(hal.sessions_started(), 1);
}

#[test]
fn test_reload_before_setup_does_nothing() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/bg.png");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.reload_texture(&hal);
    effect.init(&hal);
    effect.reload_texture(&hal);

    assert!(hal.pending_texture_loads().is_empty());
    assert_eq!(effect.phase(), Phase::AwaitingDelay);
}

#[test]
fn test_reload_while_building_binds_on_arrival() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());
    assert_eq!(effect.phase(), Phase::BuildingSession);

    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/late.png");
    effect.reload_texture(&hal);
    finish_texture(&mut effect, &hal);
    assert_eq!(effect.texture().unwrap().source(), &loaded("/late.png"));

    finish_session(&mut effect, &hal);

    let session = hal.last_session().unwrap();
    assert_eq!(session.texture, loaded("/late.png"));
    assert_eq!(session.texture_binds, 1);
}

#[test]
fn test_reload_bind_failure_keeps_previous_texture() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/day.png");
    let mut effect = start_running(&hal, RainConfig::default());

    hal.set_bind_error(Some(HalError::InvalidArgument));
    hal.remove_attribute(BACKGROUND_URL_ATTRIBUTE);
    effect.reload_texture(&hal);

    assert_eq!(effect.texture().unwrap().source(), &loaded("/day.png"));
    assert_eq!(hal.last_session().unwrap().texture, loaded("/day.png"));
    assert!(hal.has_log_containing("keeping previous"));
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn test_destroy_stops_rendering() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());
    dispatch(&mut effect, &hal, hal.fire_frame(16.0));
    assert_eq!(hal.total_renders(), 1);

    effect.destroy(&hal);

    assert_eq!(effect.phase(), Phase::Idle);
    assert!(!effect.frame_pending());
    assert!(effect.texture().is_none());
    assert!(effect.session().is_none());
    assert_eq!(hal.pending_frame_count(), 0);
    assert!(hal.fire_frame(32.0).is_none());
    assert_eq!(hal.listener_count(), 0);
    assert_eq!(hal.live_session_count(), 0);

    // A frame that slipped through is not rendered
    effect.handle_event(&hal, PageEvent::Frame { now_ms: 48.0 });
    assert_eq!(hal.total_renders(), 1);
    assert_eq!(hal.pending_frame_count(), 0);
}

#[test]
fn test_destroy_stops_loop_before_disposing_session() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());
    let request = hal.last_session().unwrap().request;
    assert!(effect.frame_pending());
    assert!(effect.texture().is_some());

    effect.destroy(&hal);

    let log = hal.teardown_log();
    let dispose = log
        .iter()
        .position(|t| *t == Teardown::DisposeSession(request))
        .expect("session disposed");
    let frame = log
        .iter()
        .position(|t| matches!(t, Teardown::CancelFrame(_)))
        .expect("frame cancelled");
    let resize = log
        .iter()
        .position(|t| *t == Teardown::RemoveListener(Signal::Resize))
        .expect("resize listener removed");
    assert!(frame < dispose);
    assert!(resize < dispose);
    assert_eq!(log.len(), 3);

    assert!(hal.last_session().unwrap().disposed);
    assert!(effect.texture().is_none());

    // Second destroy releases nothing further
    effect.destroy(&hal);
    assert_eq!(hal.teardown_log().len(), 3);
}

#[test]
fn test_destroy_during_delay_cancels_timer() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    effect.destroy(&hal);

    assert_eq!(effect.phase(), Phase::Idle);
    assert_eq!(hal.pending_timer_count(), 0);
}

#[test]
fn test_destroy_while_awaiting_document_removes_listener() {
    let hal = MockHal::new();
    hal.set_document_ready(false);

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    effect.destroy(&hal);

    assert_eq!(hal.listener_count(), 0);
    effect.handle_event(&hal, PageEvent::DocumentReady);
    assert_eq!(hal.pending_timer_count(), 0);
}

#[test]
fn test_destroy_while_loading_abandons_texture() {
    let hal = MockHal::new();
    hal.set_attribute(BACKGROUND_URL_ATTRIBUTE, "/bg.png");

    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());
    effect.destroy(&hal);

    finish_texture(&mut effect, &hal);

    assert_eq!(effect.phase(), Phase::Idle);
    assert!(effect.texture().is_none());
    assert_eq!(hal.sessions_started(), 0);
}

#[test]
fn test_destroy_while_building_disposes_late_session() {
    let hal = MockHal::new();
    let mut effect = RainEffect::new(RainConfig::default());
    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());

    let request = hal.pending_session().unwrap().request;
    effect.destroy(&hal);
    effect.handle_event(&hal, hal.complete_session(request));

    assert_eq!(effect.phase(), Phase::Idle);
    assert!(hal.last_session().unwrap().disposed);
    assert_eq!(hal.live_session_count(), 0);
    assert_eq!(hal.pending_frame_count(), 0);
}

#[test]
fn test_destroy_is_idempotent() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());
    effect.destroy(&hal);
    effect.destroy(&hal);

    assert_eq!(effect.phase(), Phase::Idle);
    assert_eq!(hal.sessions().len(), 1);
}

#[test]
fn test_init_after_destroy_starts_over() {
    let hal = MockHal::new();
    let mut effect = start_running(&hal, RainConfig::default());
    effect.destroy(&hal);

    effect.init(&hal);
    dispatch(&mut effect, &hal, hal.fire_timer());
    finish_session(&mut effect, &hal);

    assert!(effect.is_running());
    assert_eq!(hal.live_session_count(), 1);
    assert_eq!(hal.sessions().len(), 2);
}

#[test]
fn test_dropping_effect_disposes_session() {
    let hal = MockHal::new();
    let effect = start_running(&hal, RainConfig::default());
    drop(effect);
    assert_eq!(hal.live_session_count(), 0);
}
