//! Render session, animation loop and resize handling

use super::{Phase, RainEffect};
use crate::hal::{HalError, PageHal, RenderSession, RequestId, SessionSpec, Signal};
use crate::inputs::ShaderInputs;

impl<H: PageHal> RainEffect<H> {
    pub(super) fn build_session(&mut self, hal: &H) {
        self.phase = Phase::BuildingSession;
        self.inputs = ShaderInputs::new(&self.config, hal.viewport());

        let Some(texture) = self.texture.as_ref() else {
            self.abandon_setup(hal, "no texture");
            return;
        };

        let spec = SessionSpec {
            viewport: hal.viewport(),
            texture,
            inputs: self.inputs,
        };

        match hal.start_session(spec) {
            Ok(request) => self.pending_session = Some(request),
            Err(e) => self.abandon_setup(hal, &e.to_string()),
        }
    }

    pub(super) fn on_session_ready(
        &mut self,
        hal: &H,
        request: RequestId,
        result: Result<H::Session, HalError>,
    ) {
        if self.pending_session != Some(request) {
            if let Ok(session) = result {
                session.dispose();
            }
            hal.debug_write(&format!("[rain] Discarding stale session {:?}", request));
            return;
        }
        self.pending_session = None;

        let mut session = match result {
            Ok(session) => session,
            Err(e) => {
                self.abandon_setup(hal, &e.to_string());
                return;
            }
        };

        // The viewport may have changed while the session was being built
        let viewport = hal.viewport();
        self.inputs = ShaderInputs::new(&self.config, viewport);
        session.resize(viewport);

        if self.texture_dirty {
            if let Some(texture) = self.texture.as_ref() {
                if let Err(e) = session.bind_texture(texture) {
                    hal.debug_write(&format!("[rain] Failed to bind texture: {}", e));
                }
            }
            self.texture_dirty = false;
        }

        session.set_inputs(&self.inputs);
        self.session = Some(session);

        match hal.add_listener(Signal::Resize) {
            Ok(id) => self.resize_listener = Some(id),
            Err(e) => hal.debug_write(&format!("[rain] Resize listener unavailable: {}", e)),
        }

        self.clock_start_ms = Some(hal.now_ms());
        self.phase = Phase::Running;
        hal.debug_write("[rain] Glass rain effect initialized");

        self.schedule_frame(hal);
    }

    /// Session build failed: release the texture and go back to `Idle`
    fn abandon_setup(&mut self, hal: &H, reason: &str) {
        hal.debug_write(&format!("[rain] Failed to create render session: {}", reason));
        self.pending_load = None;
        self.pending_session = None;
        self.texture = None;
        self.texture_dirty = false;
        self.phase = Phase::Idle;
    }

    fn schedule_frame(&mut self, hal: &H) {
        if self.frame.is_some() {
            return;
        }
        match hal.request_frame() {
            Ok(handle) => self.frame = Some(handle),
            Err(e) => hal.debug_write(&format!("[rain] Failed to request frame: {}", e)),
        }
    }

    pub(super) fn on_frame(&mut self, hal: &H, now_ms: f64) {
        self.frame = None;
        if self.phase != Phase::Running {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let start = self.clock_start_ms.unwrap_or(now_ms);
        let elapsed_s = ((now_ms - start) / 1000.0).max(0.0) as f32;
        self.inputs.time = elapsed_s * self.config.time_scale();
        session.set_inputs(&self.inputs);

        match session.render() {
            Ok(()) | Err(HalError::FrameSkipped) => {}
            Err(e) => hal.debug_write(&format!("[rain] Render failed: {}", e)),
        }

        self.schedule_frame(hal);
    }

    pub(super) fn on_resize(&mut self, hal: &H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let viewport = hal.viewport();
        self.inputs.resolution = viewport.resolution();
        session.resize(viewport);
        session.set_inputs(&self.inputs);
    }
}
