//! Texture acquisition and reload

use super::{Phase, RainEffect};
use crate::hal::{HalError, PageHal, RenderSession, RequestId};
use crate::settings;
use crate::texture::{self, TextureImage};

/// What to do with a texture once it arrives
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum LoadPurpose {
    /// Part of setup; the session is built next
    Setup,
    /// Replace the active texture
    Reload,
}

#[derive(Clone, Debug)]
pub(super) struct PendingLoad {
    request: RequestId,
    url: String,
    purpose: LoadPurpose,
}

impl<H: PageHal> RainEffect<H> {
    /// Re-run acquisition and swap the result into the live session.
    ///
    /// Before setup reaches the texture step this does nothing, since setup
    /// will read the current background anyway. During acquisition the
    /// in-flight load is abandoned and acquisition restarts. Only the most
    /// recent reload is honoured.
    pub fn reload_texture(&mut self, hal: &H) {
        match self.phase {
            Phase::Idle | Phase::AwaitingDocument | Phase::AwaitingDelay => {}
            Phase::AcquiringTexture => self.start_acquire(hal),
            Phase::BuildingSession | Phase::Running => {
                if let Some(texture) = self.begin_load(hal, LoadPurpose::Reload) {
                    self.install_texture(hal, texture);
                }
            }
        }
    }

    pub(super) fn start_acquire(&mut self, hal: &H) {
        if let Some(texture) = self.begin_load(hal, LoadPurpose::Setup) {
            self.finish_acquire(hal, texture);
        }
    }

    /// Start a load, or return the fallback right away when no load can start.
    ///
    /// Any earlier pending load is superseded.
    fn begin_load(&mut self, hal: &H, purpose: LoadPurpose) -> Option<TextureImage> {
        self.pending_load = None;

        let Some(url) = settings::background_url(hal) else {
            hal.debug_write("[rain] No data-bg-url on body, using fallback gradient");
            return Some(texture::fallback_gradient());
        };

        hal.debug_write(&format!("[rain] Loading background texture from {}", url));
        match hal.start_texture_load(&url) {
            Ok(request) => {
                self.pending_load = Some(PendingLoad {
                    request,
                    url,
                    purpose,
                });
                None
            }
            Err(e) => {
                hal.debug_write(&format!(
                    "[rain] Failed to start texture load: {}, using fallback gradient",
                    e
                ));
                Some(texture::fallback_gradient())
            }
        }
    }

    pub(super) fn on_texture_loaded(
        &mut self,
        hal: &H,
        request: RequestId,
        result: Result<Vec<u8>, HalError>,
    ) {
        let pending = match self.pending_load.take() {
            Some(pending) if pending.request == request => pending,
            other => {
                self.pending_load = other;
                hal.debug_write(&format!("[rain] Ignoring stale texture load {:?}", request));
                return;
            }
        };

        let texture = resolve_texture(hal, &pending.url, result);
        match pending.purpose {
            LoadPurpose::Setup => self.finish_acquire(hal, texture),
            LoadPurpose::Reload => self.install_texture(hal, texture),
        }
    }

    fn finish_acquire(&mut self, hal: &H, texture: TextureImage) {
        self.texture = Some(texture);
        self.texture_dirty = false;
        self.build_session(hal);
    }

    /// Make `texture` the active one.
    ///
    /// With a live session the new texture is bound first and the old one is
    /// released only once the bind succeeds. Without one it is bound when the
    /// session arrives.
    fn install_texture(&mut self, hal: &H, texture: TextureImage) {
        let Some(session) = self.session.as_mut() else {
            self.texture = Some(texture);
            self.texture_dirty = true;
            return;
        };

        match session.bind_texture(&texture) {
            Ok(()) => {
                self.texture = Some(texture);
                self.texture_dirty = false;
                hal.debug_write("[rain] Texture reloaded for theme change");
            }
            Err(e) => {
                hal.debug_write(&format!(
                    "[rain] Failed to bind reloaded texture: {}, keeping previous",
                    e
                ));
            }
        }
    }
}

/// Turn a load result into a texture, falling back to the gradient on any failure
fn resolve_texture<H: PageHal>(
    hal: &H,
    url: &str,
    result: Result<Vec<u8>, HalError>,
) -> TextureImage {
    let outcome = match result {
        Ok(bytes) => texture::decode(&bytes, url).map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(texture) => {
            hal.debug_write(&format!(
                "[rain] Loaded background texture {}x{}",
                texture.width(),
                texture.height()
            ));
            texture
        }
        Err(reason) => {
            hal.debug_write(&format!(
                "[rain] Failed to load background texture: {}, using fallback gradient",
                reason
            ));
            texture::fallback_gradient()
        }
    }
}
