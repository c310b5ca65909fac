//! Mock page HAL

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::rc::Rc;

use image::{ImageFormat, Rgba, RgbaImage};
use serde_json::Value;

use crate::hal::{
    FrameHandle, HalError, ListenerId, PageEvent, PageHal, RenderSession, RequestId, SessionSpec,
    Signal, TimerId,
};
use crate::inputs::ShaderInputs;
use crate::settings::THEME_SECTION;
use crate::texture::{TextureImage, TextureSource};
use crate::viewport::Viewport;

/// Event type produced by [`MockHal`]
pub type MockEvent = PageEvent<MockSession>;

/// A session build the effect asked for
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRequest {
    pub request: RequestId,
    pub viewport: Viewport,
    pub texture: TextureSource,
    pub inputs: ShaderInputs,
}

/// Everything a [`MockSession`] observed
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRecord {
    pub request: RequestId,
    /// Latest viewport (construction or resize)
    pub viewport: Viewport,
    /// Latest inputs pushed
    pub inputs: ShaderInputs,
    /// Texture currently bound to `iChannel0`
    pub texture: TextureSource,
    /// Binds after construction
    pub texture_binds: u32,
    pub renders: u32,
    pub resizes: Vec<Viewport>,
    pub disposed: bool,
}

/// A teardown call seen by [`MockHal`], in the order it was made
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Teardown {
    ClearTimeout(TimerId),
    CancelFrame(FrameHandle),
    RemoveListener(Signal),
    DisposeSession(RequestId),
}

/// Render session backed by a shared [`SessionRecord`]
#[derive(Debug)]
pub struct MockSession {
    record: Rc<RefCell<SessionRecord>>,
    teardown: Rc<RefCell<Vec<Teardown>>>,
    render_error: Rc<Cell<Option<HalError>>>,
    bind_error: Rc<Cell<Option<HalError>>>,
}

impl MockSession {
    /// Snapshot of what this session has seen so far
    pub fn record(&self) -> SessionRecord {
        self.record.borrow().clone()
    }
}

impl RenderSession for MockSession {
    fn set_inputs(&mut self, inputs: &ShaderInputs) {
        self.record.borrow_mut().inputs = *inputs;
    }

    fn bind_texture(&mut self, texture: &TextureImage) -> Result<(), HalError> {
        if let Some(e) = self.bind_error.get() {
            return Err(e);
        }
        let mut record = self.record.borrow_mut();
        record.texture = texture.source().clone();
        record.texture_binds += 1;
        Ok(())
    }

    fn render(&mut self) -> Result<(), HalError> {
        if let Some(e) = self.render_error.get() {
            return Err(e);
        }
        self.record.borrow_mut().renders += 1;
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport) {
        let mut record = self.record.borrow_mut();
        record.viewport = viewport;
        record.resizes.push(viewport);
    }

    fn dispose(self) {
        let mut record = self.record.borrow_mut();
        record.disposed = true;
        self.teardown
            .borrow_mut()
            .push(Teardown::DisposeSession(record.request));
    }
}

/// Mock HAL for unit testing
///
/// Timers, frames, texture loads and session builds stay pending until the
/// test turns them into events with `fire_*` / `complete_*`, so every
/// interleaving can be reproduced exactly.
pub struct MockHal {
    attributes: RefCell<HashMap<String, String>>,
    theme: RefCell<HashMap<(String, String), Value>>,
    document_ready: Cell<bool>,
    viewport: Cell<Viewport>,
    /// Simulated time in milliseconds
    time_ms: Cell<f64>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
    next_id: Cell<u32>,

    timers: RefCell<BTreeMap<TimerId, u32>>,
    frames: RefCell<Vec<FrameHandle>>,
    listeners: RefCell<BTreeMap<ListenerId, Signal>>,
    texture_loads: RefCell<Vec<(RequestId, String)>>,
    session_requests: RefCell<Vec<SessionRequest>>,
    sessions_started: Cell<u32>,
    sessions: RefCell<Vec<Rc<RefCell<SessionRecord>>>>,
    teardown: Rc<RefCell<Vec<Teardown>>>,

    refuse_timers: Cell<bool>,
    refuse_texture_loads: Cell<bool>,
    refuse_sessions: Cell<bool>,
    render_error: Rc<Cell<Option<HalError>>>,
    bind_error: Rc<Cell<Option<HalError>>>,
}

impl Default for MockHal {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHal {
    /// A loaded page with a 1920x1080 viewport and no theme settings
    pub fn new() -> Self {
        Self {
            attributes: RefCell::new(HashMap::new()),
            theme: RefCell::new(HashMap::new()),
            document_ready: Cell::new(true),
            viewport: Cell::new(Viewport::default()),
            time_ms: Cell::new(0.0),
            debug_log: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            timers: RefCell::new(BTreeMap::new()),
            frames: RefCell::new(Vec::new()),
            listeners: RefCell::new(BTreeMap::new()),
            texture_loads: RefCell::new(Vec::new()),
            session_requests: RefCell::new(Vec::new()),
            sessions_started: Cell::new(0),
            sessions: RefCell::new(Vec::new()),
            teardown: Rc::new(RefCell::new(Vec::new())),
            refuse_timers: Cell::new(false),
            refuse_texture_loads: Cell::new(false),
            refuse_sessions: Cell::new(false),
            render_error: Rc::new(Cell::new(None)),
            bind_error: Rc::new(Cell::new(None)),
        }
    }

    fn alloc_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    // === Page setup ===

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    /// Set a key in the `theme` section
    pub fn set_theme(&self, key: &str, value: Value) {
        self.theme
            .borrow_mut()
            .insert((THEME_SECTION.to_string(), key.to_string()), value);
    }

    pub fn set_document_ready(&self, ready: bool) {
        self.document_ready.set(ready);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn set_time(&self, ms: f64) {
        self.time_ms.set(ms);
    }

    pub fn advance_time(&self, ms: f64) {
        self.time_ms.set(self.time_ms.get() + ms);
    }

    // === Failure injection ===

    pub fn refuse_timers(&self, refuse: bool) {
        self.refuse_timers.set(refuse);
    }

    pub fn refuse_texture_loads(&self, refuse: bool) {
        self.refuse_texture_loads.set(refuse);
    }

    pub fn refuse_sessions(&self, refuse: bool) {
        self.refuse_sessions.set(refuse);
    }

    /// Make every session's `render` fail with `error`
    pub fn set_render_error(&self, error: Option<HalError>) {
        self.render_error.set(error);
    }

    /// Make every session's `bind_texture` fail with `error`
    pub fn set_bind_error(&self, error: Option<HalError>) {
        self.bind_error.set(error);
    }

    // === Debug log ===

    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    pub fn clear_debug_log(&self) {
        self.debug_log.borrow_mut().clear();
    }

    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log.borrow().iter().any(|line| line.contains(substr))
    }

    // === Timers, frames, listeners ===

    pub fn pending_timer_count(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Delays of every pending timer, oldest first
    pub fn pending_timer_delays(&self) -> Vec<u32> {
        self.timers.borrow().values().copied().collect()
    }

    /// Fire the oldest pending timer
    pub fn fire_timer(&self) -> Option<MockEvent> {
        let id = *self.timers.borrow().keys().next()?;
        self.timers.borrow_mut().remove(&id);
        Some(PageEvent::Timer(id))
    }

    pub fn pending_frame_count(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Advance the clock to `now_ms` and fire the oldest pending frame
    pub fn fire_frame(&self, now_ms: f64) -> Option<MockEvent> {
        let mut frames = self.frames.borrow_mut();
        if frames.is_empty() {
            return None;
        }
        frames.remove(0);
        self.time_ms.set(now_ms);
        Some(PageEvent::Frame { now_ms })
    }

    pub fn has_listener(&self, signal: Signal) -> bool {
        self.listeners.borrow().values().any(|s| *s == signal)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // === Texture loads ===

    /// Loads that have started but not completed
    pub fn pending_texture_loads(&self) -> Vec<(RequestId, String)> {
        self.texture_loads.borrow().clone()
    }

    /// Most recently started pending load
    pub fn last_texture_load(&self) -> Option<(RequestId, String)> {
        self.texture_loads.borrow().last().cloned()
    }

    /// Complete a load with the given body or error
    pub fn complete_texture(
        &self,
        request: RequestId,
        result: Result<Vec<u8>, HalError>,
    ) -> MockEvent {
        self.texture_loads.borrow_mut().retain(|(id, _)| *id != request);
        PageEvent::TextureLoaded { request, result }
    }

    // === Sessions ===

    /// Most recently started pending session build
    pub fn pending_session(&self) -> Option<SessionRequest> {
        self.session_requests.borrow().last().cloned()
    }

    /// Session builds started so far, completed or not
    pub fn sessions_started(&self) -> u32 {
        self.sessions_started.get()
    }

    /// Finish a session build successfully
    pub fn complete_session(&self, request: RequestId) -> MockEvent {
        let spec = {
            let mut requests = self.session_requests.borrow_mut();
            let position = requests.iter().position(|r| r.request == request);
            position.map(|i| requests.remove(i))
        };
        let spec = spec.unwrap_or_else(|| SessionRequest {
            request,
            viewport: self.viewport.get(),
            texture: TextureSource::Gradient,
            inputs: ShaderInputs::default(),
        });

        let record = Rc::new(RefCell::new(SessionRecord {
            request,
            viewport: spec.viewport,
            inputs: spec.inputs,
            texture: spec.texture,
            texture_binds: 0,
            renders: 0,
            resizes: Vec::new(),
            disposed: false,
        }));
        self.sessions.borrow_mut().push(record.clone());

        let session = MockSession {
            record,
            teardown: self.teardown.clone(),
            render_error: self.render_error.clone(),
            bind_error: self.bind_error.clone(),
        };
        PageEvent::SessionReady {
            request,
            result: Ok(session),
        }
    }

    /// Finish a session build with an error
    pub fn fail_session(&self, request: RequestId, error: HalError) -> MockEvent {
        self.session_requests
            .borrow_mut()
            .retain(|r| r.request != request);
        PageEvent::SessionReady {
            request,
            result: Err(error),
        }
    }

    /// Snapshots of every session ever created
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.sessions
            .borrow()
            .iter()
            .map(|r| r.borrow().clone())
            .collect()
    }

    pub fn last_session(&self) -> Option<SessionRecord> {
        self.sessions.borrow().last().map(|r| r.borrow().clone())
    }

    /// Sessions not yet disposed, i.e. overlays attached to the page
    pub fn live_session_count(&self) -> usize {
        self.sessions
            .borrow()
            .iter()
            .filter(|r| !r.borrow().disposed)
            .count()
    }

    pub fn total_renders(&self) -> u32 {
        self.sessions.borrow().iter().map(|r| r.borrow().renders).sum()
    }

    /// Timer, frame, listener and session releases in call order
    pub fn teardown_log(&self) -> Vec<Teardown> {
        self.teardown.borrow().clone()
    }
}

impl PageHal for MockHal {
    type Session = MockSession;

    fn body_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn theme_setting(&self, section: &str, key: &str) -> Option<Value> {
        self.theme
            .borrow()
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn document_ready(&self) -> bool {
        self.document_ready.get()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn now_ms(&self) -> f64 {
        self.time_ms.get()
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(msg.to_string());
    }

    fn set_timeout(&self, delay_ms: u32) -> Result<TimerId, HalError> {
        if self.refuse_timers.get() {
            return Err(HalError::NotSupported);
        }
        let id = TimerId(self.alloc_id());
        self.timers.borrow_mut().insert(id, delay_ms);
        Ok(id)
    }

    fn clear_timeout(&self, id: TimerId) {
        if self.timers.borrow_mut().remove(&id).is_some() {
            self.teardown.borrow_mut().push(Teardown::ClearTimeout(id));
        }
    }

    fn request_frame(&self) -> Result<FrameHandle, HalError> {
        let handle = FrameHandle(self.alloc_id() as i32);
        self.frames.borrow_mut().push(handle);
        Ok(handle)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        let mut frames = self.frames.borrow_mut();
        let before = frames.len();
        frames.retain(|h| *h != handle);
        if frames.len() != before {
            self.teardown.borrow_mut().push(Teardown::CancelFrame(handle));
        }
    }

    fn add_listener(&self, signal: Signal) -> Result<ListenerId, HalError> {
        let id = ListenerId(self.alloc_id());
        self.listeners.borrow_mut().insert(id, signal);
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) {
        if let Some(signal) = self.listeners.borrow_mut().remove(&id) {
            self.teardown
                .borrow_mut()
                .push(Teardown::RemoveListener(signal));
        }
    }

    fn start_texture_load(&self, url: &str) -> Result<RequestId, HalError> {
        if self.refuse_texture_loads.get() {
            return Err(HalError::NotSupported);
        }
        let request = RequestId(self.alloc_id());
        self.texture_loads
            .borrow_mut()
            .push((request, url.to_string()));
        Ok(request)
    }

    fn start_session(&self, spec: SessionSpec<'_>) -> Result<RequestId, HalError> {
        if self.refuse_sessions.get() {
            return Err(HalError::Gpu);
        }
        let request = RequestId(self.alloc_id());
        self.sessions_started.set(self.sessions_started.get() + 1);
        self.session_requests.borrow_mut().push(SessionRequest {
            request,
            viewport: spec.viewport,
            texture: spec.texture.source().clone(),
            inputs: spec.inputs,
        });
        Ok(request)
    }
}

/// Encode a solid-color PNG, for feeding texture loads
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(rgba));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding of an in-memory image");
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_order() {
        let hal = MockHal::new();
        let first = hal.set_timeout(300).unwrap();
        let second = hal.set_timeout(10).unwrap();
        assert_eq!(hal.pending_timer_delays(), vec![300, 10]);

        assert!(matches!(hal.fire_timer(), Some(PageEvent::Timer(id)) if id == first));
        assert!(matches!(hal.fire_timer(), Some(PageEvent::Timer(id)) if id == second));
        assert!(hal.fire_timer().is_none());
    }

    #[test]
    fn test_cancelled_frame_never_fires() {
        let hal = MockHal::new();
        let handle = hal.request_frame().unwrap();
        hal.cancel_frame(handle);
        assert!(hal.fire_frame(16.0).is_none());
    }

    #[test]
    fn test_teardown_log_records_calls_in_order() {
        let hal = MockHal::new();
        let event = hal.complete_session(RequestId(99));
        let PageEvent::SessionReady { result: Ok(session), .. } = event else {
            panic!("expected a session");
        };
        let frame = hal.request_frame().unwrap();
        let listener = hal.add_listener(Signal::Resize).unwrap();

        assert_eq!(hal.live_session_count(), 1);
        session.dispose();
        hal.remove_listener(listener);
        hal.cancel_frame(frame);
        // Unknown ids are not logged
        hal.cancel_frame(frame);
        hal.remove_listener(listener);

        assert_eq!(hal.live_session_count(), 0);
        assert_eq!(
            hal.teardown_log(),
            vec![
                Teardown::DisposeSession(RequestId(99)),
                Teardown::RemoveListener(Signal::Resize),
                Teardown::CancelFrame(frame),
            ]
        );
    }

    #[test]
    fn test_png_bytes_decode() {
        let bytes = png_bytes(3, 2, [1, 2, 3, 4]);
        let image = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Rgba([1, 2, 3, 4]));
    }
}
