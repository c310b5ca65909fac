//! Browser implementation of the Page Abstraction Layer
//!
//! `WebHal` maps every [`PageHal`] call onto web-sys. Browser callbacks
//! (timers, animation frames, DOM events, fetch and GPU completions) turn
//! into [`PageEvent`]s and are fed back through [`dispatch`].
//!
//! ## Callback ownership
//!
//! - Timer closures live in `timers` until they fire or are cleared
//! - One animation-frame closure is reused for every frame; the last
//!   requested handle is cancelled on drop
//! - Listener closures live in `listeners` until removed
//!
//! Dropping a closure from inside its own invocation is deferred by
//! wasm-bindgen until the call returns.

mod fetch;
mod session;

pub use session::{WebSession, OVERLAY_CLASS};

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use sakura_rain::{
    FrameHandle, HalError, ListenerId, PageEvent, PageHal, RequestId, SessionSpec, Signal,
    TimerId, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::EventTarget;

use crate::runtime::{dispatch, RuntimeRef};
use crate::util::{describe, log};

/// Global object exposing the theme configuration
const THEME_GLOBAL: &str = "sakura";
const THEME_GETTER: &str = "getThemeConfig";

struct Timer {
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

type TimerMap = Rc<RefCell<HashMap<TimerId, Timer>>>;

/// web-sys backed [`PageHal`]
pub struct WebHal {
    runtime: RuntimeRef,
    next_id: Cell<u32>,
    timers: TimerMap,
    listeners: RefCell<HashMap<ListenerId, Listener>>,
    frame_callback: Closure<dyn FnMut(f64)>,
    /// Most recent `requestAnimationFrame` handle, possibly already fired
    last_frame: Cell<Option<FrameHandle>>,
}

impl WebHal {
    pub(crate) fn new(runtime: RuntimeRef) -> Self {
        let frame_runtime = runtime.clone();
        let frame_callback = Closure::wrap(Box::new(move |now_ms: f64| {
            dispatch(&frame_runtime, PageEvent::Frame { now_ms });
        }) as Box<dyn FnMut(f64)>);

        Self {
            runtime,
            next_id: Cell::new(1),
            timers: Rc::new(RefCell::new(HashMap::new())),
            listeners: RefCell::new(HashMap::new()),
            frame_callback,
            last_frame: Cell::new(None),
        }
    }

    /// Handle of the most recent frame request not explicitly cancelled
    #[cfg(test)]
    pub(crate) fn last_frame(&self) -> Option<FrameHandle> {
        self.last_frame.get()
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1).max(1));
        id
    }

    fn signal_target(signal: Signal) -> Result<EventTarget, HalError> {
        let window = web_sys::window().ok_or(HalError::NotSupported)?;
        match signal {
            Signal::Resize => Ok(window.into()),
            Signal::DocumentReady | Signal::ThemeRefresh => window
                .document()
                .map(Into::into)
                .ok_or(HalError::NotSupported),
        }
    }

    fn signal_event(signal: Signal) -> fn() -> PageEvent<WebSession> {
        match signal {
            Signal::DocumentReady => || PageEvent::DocumentReady,
            Signal::Resize => || PageEvent::Resize,
            Signal::ThemeRefresh => || PageEvent::ThemeRefresh,
        }
    }
}

impl PageHal for WebHal {
    type Session = WebSession;

    fn body_attribute(&self, name: &str) -> Option<String> {
        web_sys::window()?
            .document()?
            .body()?
            .get_attribute(name)
    }

    fn theme_setting(&self, section: &str, key: &str) -> Option<serde_json::Value> {
        let window = web_sys::window()?;
        let theme = js_sys::Reflect::get(&window, &THEME_GLOBAL.into()).ok()?;
        if theme.is_undefined() || theme.is_null() {
            return None;
        }
        let getter = js_sys::Reflect::get(&theme, &THEME_GETTER.into())
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;

        let value = match getter.call2(&theme, &section.into(), &key.into()) {
            Ok(value) => value,
            Err(e) => {
                log(&format!(
                    "[wasm-hal] {}.{}({}, {}) threw: {}",
                    THEME_GLOBAL,
                    THEME_GETTER,
                    section,
                    key,
                    describe(&e)
                ));
                return None;
            }
        };
        if value.is_undefined() || value.is_null() {
            return None;
        }

        let json = js_sys::JSON::stringify(&value).ok()?.as_string()?;
        serde_json::from_str(&json).ok()
    }

    fn document_ready(&self) -> bool {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return false;
        };
        js_sys::Reflect::get(&document, &"readyState".into())
            .ok()
            .and_then(|state| state.as_string())
            .is_some_and(|state| state != "loading")
    }

    fn viewport(&self) -> Viewport {
        let Some(window) = web_sys::window() else {
            return Viewport::default();
        };
        let width = window.inner_width().ok().and_then(|v| v.as_f64());
        let height = window.inner_height().ok().and_then(|v| v.as_f64());
        match (width, height) {
            (Some(width), Some(height)) => {
                Viewport::new(width, height, window.device_pixel_ratio())
            }
            _ => Viewport::default(),
        }
    }

    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }

    fn set_timeout(&self, delay_ms: u32) -> Result<TimerId, HalError> {
        let window = web_sys::window().ok_or(HalError::NotSupported)?;
        let id = TimerId(self.allocate_id());

        let timers = Rc::clone(&self.timers);
        let runtime = self.runtime.clone();
        let closure = Closure::wrap(Box::new(move || {
            timers.borrow_mut().remove(&id);
            dispatch(&runtime, PageEvent::Timer(id));
        }) as Box<dyn FnMut()>);

        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .map_err(|e| {
                log(&format!("[wasm-hal] setTimeout failed: {}", describe(&e)));
                HalError::NotSupported
            })?;

        self.timers.borrow_mut().insert(
            id,
            Timer {
                handle,
                _closure: closure,
            },
        );
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        let Some(timer) = self.timers.borrow_mut().remove(&id) else {
            return;
        };
        if let Some(window) = web_sys::window() {
            window.clear_timeout_with_handle(timer.handle);
        }
    }

    fn request_frame(&self) -> Result<FrameHandle, HalError> {
        let window = web_sys::window().ok_or(HalError::NotSupported)?;
        let handle = window
            .request_animation_frame(self.frame_callback.as_ref().unchecked_ref())
            .map(FrameHandle)
            .map_err(|e| {
                log(&format!(
                    "[wasm-hal] requestAnimationFrame failed: {}",
                    describe(&e)
                ));
                HalError::NotSupported
            })?;
        self.last_frame.set(Some(handle));
        Ok(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if self.last_frame.get() == Some(handle) {
            self.last_frame.set(None);
        }
        if let Some(window) = web_sys::window() {
            let _ = window.cancel_animation_frame(handle.0);
        }
    }

    fn add_listener(&self, signal: Signal) -> Result<ListenerId, HalError> {
        let target = Self::signal_target(signal)?;
        let event = signal.event_name();
        let make_event = Self::signal_event(signal);

        let runtime = self.runtime.clone();
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            dispatch(&runtime, make_event());
        }) as Box<dyn FnMut(web_sys::Event)>);

        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|_| HalError::Dom)?;

        let id = ListenerId(self.allocate_id());
        self.listeners.borrow_mut().insert(
            id,
            Listener {
                target,
                event,
                closure,
            },
        );
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        let Some(listener) = self.listeners.borrow_mut().remove(&id) else {
            return;
        };
        let _ = listener.target.remove_event_listener_with_callback(
            listener.event,
            listener.closure.as_ref().unchecked_ref(),
        );
    }

    fn start_texture_load(&self, url: &str) -> Result<RequestId, HalError> {
        if web_sys::window().is_none() {
            return Err(HalError::NotSupported);
        }
        let request = RequestId(self.allocate_id());
        let runtime = self.runtime.clone();
        let url = url.to_string();

        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch::fetch_bytes(&url).await;
            dispatch(&runtime, PageEvent::TextureLoaded { request, result });
        });
        Ok(request)
    }

    fn start_session(&self, spec: SessionSpec<'_>) -> Result<RequestId, HalError> {
        if web_sys::window().is_none() {
            return Err(HalError::NotSupported);
        }
        let request = RequestId(self.allocate_id());
        let runtime = self.runtime.clone();
        let viewport = spec.viewport;
        let texture = spec.texture.clone();
        let inputs = spec.inputs;

        wasm_bindgen_futures::spawn_local(async move {
            let result = WebSession::build(viewport, texture, inputs).await;
            dispatch(&runtime, PageEvent::SessionReady { request, result });
        });
        Ok(request)
    }
}

impl Drop for WebHal {
    fn drop(&mut self) {
        // The frame closure dies with the HAL; a late callback would throw
        if let Some(handle) = self.last_frame.take() {
            self.cancel_frame(handle);
        }
        let timers: Vec<TimerId> = self.timers.borrow().keys().copied().collect();
        for id in timers {
            self.clear_timeout(id);
        }
        let listeners: Vec<ListenerId> = self.listeners.borrow().keys().copied().collect();
        for id in listeners {
            self.remove_listener(id);
        }
    }
}
