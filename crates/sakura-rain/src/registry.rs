//! Theme-driven registration of the rain effect
//!
//! [`RainContext`] holds the page's single rain effect (if any) and keeps it
//! in sync with the theme: it creates the effect when the theme enables it,
//! pushes new settings on every refresh, and tears it down when the theme
//! disables it.

use crate::config::RainConfigPatch;
use crate::effect::RainEffect;
use crate::hal::{ListenerId, PageEvent, PageHal, RenderSession, Signal};
use crate::settings::RainSettings;

/// Owner of the page's rain effect
pub struct RainContext<H: PageHal> {
    effect: Option<RainEffect<H>>,
    refresh_listener: Option<ListenerId>,
}

impl<H: PageHal> Default for RainContext<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: PageHal> RainContext<H> {
    pub fn new() -> Self {
        Self {
            effect: None,
            refresh_listener: None,
        }
    }

    /// The live effect, if the theme has it enabled
    pub fn effect(&self) -> Option<&RainEffect<H>> {
        self.effect.as_ref()
    }

    /// True once `register` has subscribed to theme refreshes
    pub fn is_registered(&self) -> bool {
        self.refresh_listener.is_some()
    }

    /// Read the theme and, if the effect is enabled, create it and follow
    /// theme refreshes. When disabled nothing is created or subscribed.
    pub fn register(&mut self, hal: &H) {
        if self.is_registered() || self.effect.is_some() {
            hal.debug_write("[rain] Rain effect already registered");
            return;
        }

        let settings = RainSettings::read(hal);
        if !settings.enabled {
            hal.debug_write("[rain] Rain effect disabled by theme");
            return;
        }

        self.spawn(hal, &settings);

        match hal.add_listener(Signal::ThemeRefresh) {
            Ok(id) => self.refresh_listener = Some(id),
            Err(e) => hal.debug_write(&format!("[rain] Theme refresh listener unavailable: {}", e)),
        }
    }

    /// Route an event: refreshes are handled here, everything else goes to the effect
    pub fn handle_event(&mut self, hal: &H, event: PageEvent<H::Session>) {
        match event {
            PageEvent::ThemeRefresh => self.on_refresh(hal),
            event => match self.effect.as_mut() {
                Some(effect) => effect.handle_event(hal, event),
                None => {
                    // The effect that asked for this session is gone
                    if let PageEvent::SessionReady {
                        result: Ok(session),
                        ..
                    } = event
                    {
                        session.dispose();
                    }
                }
            },
        }
    }

    /// Merge a partial config into the live effect
    pub fn update_config(&mut self, patch: &RainConfigPatch) -> bool {
        match self.effect.as_mut() {
            Some(effect) => {
                effect.update_config(patch);
                true
            }
            None => false,
        }
    }

    /// Reload the live effect's background texture
    pub fn reload_texture(&mut self, hal: &H) -> bool {
        match self.effect.as_mut() {
            Some(effect) => {
                effect.reload_texture(hal);
                true
            }
            None => false,
        }
    }

    /// Destroy the effect and stop following the theme
    pub fn shutdown(&mut self, hal: &H) {
        if let Some(mut effect) = self.effect.take() {
            effect.destroy(hal);
        }
        if let Some(listener) = self.refresh_listener.take() {
            hal.remove_listener(listener);
        }
    }

    fn on_refresh(&mut self, hal: &H) {
        let settings = RainSettings::read(hal);

        if !settings.enabled {
            if let Some(mut effect) = self.effect.take() {
                effect.destroy(hal);
            }
            return;
        }

        match self.effect.as_mut() {
            Some(effect) => {
                effect.update_config(&RainConfigPatch::from(settings.config));
                effect.reload_texture(hal);
            }
            None => {
                hal.debug_write("[rain] Rain effect re-enabled");
                self.spawn(hal, &settings);
            }
        }
    }

    fn spawn(&mut self, hal: &H, settings: &RainSettings) {
        let mut effect = RainEffect::new(settings.config);
        effect.init(hal);
        self.effect = Some(effect);
    }
}
