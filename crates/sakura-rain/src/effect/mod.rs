//! Rain effect lifecycle
//!
//! [`RainEffect`] owns the overlay session, the background texture and the
//! animation loop. It is a single-threaded state machine: public methods and
//! [`RainEffect::handle_event`] never block, and every side effect goes
//! through the [`PageHal`].
//!
//! ```text
//! Idle ─init─▶ AwaitingDocument ─ready─▶ AwaitingDelay ─300ms─▶ AcquiringTexture
//!                                                                    │
//!            Running ◀─session ready─ BuildingSession ◀─texture ready─┘
//! ```
//!
//! `destroy()` returns to `Idle` from any phase.

mod acquire;
mod session;

use crate::config::{RainConfig, RainConfigPatch};
use crate::hal::{FrameHandle, ListenerId, PageEvent, PageHal, RenderSession, RequestId, Signal, TimerId};
use crate::inputs::ShaderInputs;
use crate::texture::TextureImage;

use acquire::PendingLoad;

/// Delay between document ready and setup, so the theme background is applied first
pub const SETUP_DELAY_MS: u32 = 300;

/// Where the effect is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Never initialized, or destroyed
    Idle,
    /// Waiting for the document to finish loading
    AwaitingDocument,
    /// Waiting out [`SETUP_DELAY_MS`]
    AwaitingDelay,
    /// Loading the background texture
    AcquiringTexture,
    /// Texture ready, waiting for the render session
    BuildingSession,
    /// Session live, animation loop running
    Running,
}

/// Rain-on-glass overlay manager
pub struct RainEffect<H: PageHal> {
    config: RainConfig,
    phase: Phase,
    inputs: ShaderInputs,

    /// Active texture; the only one held at any time
    texture: Option<TextureImage>,
    /// Active texture has not been bound to the live session yet
    texture_dirty: bool,

    pending_load: Option<PendingLoad>,
    pending_session: Option<RequestId>,
    session: Option<H::Session>,

    /// Frame clock origin, set when the session goes live
    clock_start_ms: Option<f64>,
    frame: Option<FrameHandle>,
    delay_timer: Option<TimerId>,
    ready_listener: Option<ListenerId>,
    resize_listener: Option<ListenerId>,
}

impl<H: PageHal> RainEffect<H> {
    /// Create an uninitialized effect. Performs no I/O.
    pub fn new(config: RainConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            inputs: ShaderInputs::new(&config, Default::default()),
            texture: None,
            texture_dirty: false,
            pending_load: None,
            pending_session: None,
            session: None,
            clock_start_ms: None,
            frame: None,
            delay_timer: None,
            ready_listener: None,
            resize_listener: None,
        }
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Last inputs pushed (or about to be pushed) to the session
    pub fn inputs(&self) -> &ShaderInputs {
        &self.inputs
    }

    /// Active texture, if acquisition has completed
    pub fn texture(&self) -> Option<&TextureImage> {
        self.texture.as_ref()
    }

    pub fn session(&self) -> Option<&H::Session> {
        self.session.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// True while an animation frame is scheduled
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Defer setup until the document is ready plus [`SETUP_DELAY_MS`].
    ///
    /// No-op unless the effect is `Idle`.
    pub fn init(&mut self, hal: &H) {
        if self.phase != Phase::Idle {
            return;
        }

        if hal.document_ready() {
            self.arm_setup_delay(hal);
            return;
        }

        match hal.add_listener(Signal::DocumentReady) {
            Ok(id) => {
                self.ready_listener = Some(id);
                self.phase = Phase::AwaitingDocument;
            }
            Err(e) => {
                hal.debug_write(&format!(
                    "[rain] Cannot wait for document ready ({}), arming setup now",
                    e
                ));
                self.arm_setup_delay(hal);
            }
        }
    }

    /// Route a page event to the matching handler
    pub fn handle_event(&mut self, hal: &H, event: PageEvent<H::Session>) {
        match event {
            PageEvent::DocumentReady => self.on_document_ready(hal),
            PageEvent::Timer(id) => self.on_timer(hal, id),
            PageEvent::Frame { now_ms } => self.on_frame(hal, now_ms),
            PageEvent::Resize => self.on_resize(hal),
            // Settings refresh is handled by the owning context
            PageEvent::ThemeRefresh => {}
            PageEvent::TextureLoaded { request, result } => {
                self.on_texture_loaded(hal, request, result)
            }
            PageEvent::SessionReady { request, result } => {
                self.on_session_ready(hal, request, result)
            }
        }
    }

    /// Merge `patch` into the configuration.
    ///
    /// A live session gets the new `rainAmount` and `glassBlur` immediately;
    /// otherwise the merged config is used when the session is built.
    pub fn update_config(&mut self, patch: &RainConfigPatch) {
        self.config.merge(patch);
        self.inputs.apply_config(&self.config);
        if let Some(session) = self.session.as_mut() {
            session.set_inputs(&self.inputs);
        }
    }

    /// Tear everything down and return to `Idle`. Safe in every phase.
    pub fn destroy(&mut self, hal: &H) {
        if let Some(frame) = self.frame.take() {
            hal.cancel_frame(frame);
        }
        if let Some(timer) = self.delay_timer.take() {
            hal.clear_timeout(timer);
        }
        if let Some(listener) = self.ready_listener.take() {
            hal.remove_listener(listener);
        }
        if let Some(listener) = self.resize_listener.take() {
            hal.remove_listener(listener);
        }

        self.pending_load = None;
        self.pending_session = None;

        if let Some(session) = self.session.take() {
            session.dispose();
        }

        self.texture = None;
        self.texture_dirty = false;
        self.clock_start_ms = None;
        self.inputs.time = 0.0;

        if self.phase != Phase::Idle {
            hal.debug_write("[rain] Rain effect destroyed");
        }
        self.phase = Phase::Idle;
    }

    fn on_document_ready(&mut self, hal: &H) {
        if self.phase != Phase::AwaitingDocument {
            return;
        }
        if let Some(listener) = self.ready_listener.take() {
            hal.remove_listener(listener);
        }
        self.arm_setup_delay(hal);
    }

    fn arm_setup_delay(&mut self, hal: &H) {
        match hal.set_timeout(SETUP_DELAY_MS) {
            Ok(id) => {
                self.delay_timer = Some(id);
                self.phase = Phase::AwaitingDelay;
            }
            Err(e) => {
                hal.debug_write(&format!("[rain] Setup timer unavailable ({}), setting up now", e));
                self.setup(hal);
            }
        }
    }

    fn on_timer(&mut self, hal: &H, id: TimerId) {
        if self.delay_timer != Some(id) {
            return;
        }
        self.delay_timer = None;
        self.setup(hal);
    }

    /// Texture first, then the session once the texture is in hand
    fn setup(&mut self, hal: &H) {
        self.phase = Phase::AcquiringTexture;
        self.start_acquire(hal);
    }
}

impl<H: PageHal> Drop for RainEffect<H> {
    fn drop(&mut self) {
        // Without a HAL only the session can be released
        if let Some(session) = self.session.take() {
            session.dispose();
        }
    }
}
