//! Page Abstraction Layer
//!
//! The rain effect never touches the browser directly. Every query, timer,
//! listener and asynchronous job goes through [`PageHal`]; everything the
//! browser reports back arrives as a [`PageEvent`]. This keeps the effect a
//! plain state machine that runs unchanged against `web-sys` in the browser
//! and against [`crate::testing::MockHal`] in unit tests.
//!
//! # Platform Implementations
//!
//! - **Browser**: `sakura-web`'s `WebHal` (timers via `setTimeout`, frames via
//!   `requestAnimationFrame`, textures via `fetch`, sessions via wgpu)
//! - **Tests**: [`crate::testing::MockHal`], fully deterministic

use std::fmt;

use crate::inputs::ShaderInputs;
use crate::texture::TextureImage;
use crate::viewport::Viewport;

/// Handle to a pending one-shot timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Handle to a pending animation frame callback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub i32);

/// Handle to an installed signal listener
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

/// Identifies one asynchronous request (texture load or session build)
///
/// Allocated by the HAL, unique for the lifetime of the page. Completions
/// carry the id back so the caller can tell current results from stale ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u32);

/// Page-level notifications a component can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Document finished parsing (`DOMContentLoaded`)
    DocumentReady,
    /// Window was resized or its pixel ratio changed
    Resize,
    /// Theme settings changed (`sakura:refresh`)
    ThemeRefresh,
}

impl Signal {
    /// DOM event name the browser dispatches for this signal
    pub fn event_name(self) -> &'static str {
        match self {
            Signal::DocumentReady => "DOMContentLoaded",
            Signal::Resize => "resize",
            Signal::ThemeRefresh => "sakura:refresh",
        }
    }
}

/// HAL errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalError {
    /// Operation not supported on this platform (no GPU adapter, no `fetch`)
    NotSupported,
    /// Required page element or global is missing
    NotFound,
    /// Request failed before a response arrived
    Network,
    /// Server answered with a non-success status
    Http(u16),
    /// GPU device, surface or pipeline failure
    Gpu,
    /// DOM manipulation failed
    Dom,
    /// Invalid argument
    InvalidArgument,
    /// Frame was skipped because the surface needed reconfiguring
    FrameSkipped,
}

impl fmt::Display for HalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalError::NotSupported => write!(f, "not supported"),
            HalError::NotFound => write!(f, "not found"),
            HalError::Network => write!(f, "network error"),
            HalError::Http(status) => write!(f, "HTTP {}", status),
            HalError::Gpu => write!(f, "GPU error"),
            HalError::Dom => write!(f, "DOM error"),
            HalError::InvalidArgument => write!(f, "invalid argument"),
            HalError::FrameSkipped => write!(f, "frame skipped"),
        }
    }
}

impl std::error::Error for HalError {}

/// Everything needed to build a render session
#[derive(Clone, Copy, Debug)]
pub struct SessionSpec<'a> {
    /// Viewport at construction; sizes the overlay and drawing buffer
    pub viewport: Viewport,
    /// Texture bound to `iChannel0` at construction
    pub texture: &'a TextureImage,
    /// Initial scalar inputs
    pub inputs: ShaderInputs,
}

/// Events the page delivers back to its components
///
/// `S` is the platform's [`RenderSession`] type.
#[derive(Debug)]
pub enum PageEvent<S> {
    /// The document finished loading
    DocumentReady,
    /// A timer armed with [`PageHal::set_timeout`] fired
    Timer(TimerId),
    /// An animation frame requested with [`PageHal::request_frame`] fired
    Frame {
        /// Frame timestamp in milliseconds (same clock as [`PageHal::now_ms`])
        now_ms: f64,
    },
    /// The viewport changed
    Resize,
    /// Theme settings changed
    ThemeRefresh,
    /// A texture load started with [`PageHal::start_texture_load`] finished
    TextureLoaded {
        request: RequestId,
        /// Raw response body on success
        result: Result<Vec<u8>, HalError>,
    },
    /// A session build started with [`PageHal::start_session`] finished
    SessionReady {
        request: RequestId,
        result: Result<S, HalError>,
    },
}

/// A live render session: overlay, canvas, GPU context and shader program
///
/// A session either exists in full or not at all. Dropping it without
/// calling [`RenderSession::dispose`] is allowed but releases resources in
/// an unspecified order.
pub trait RenderSession {
    /// Push scalar inputs (`iTime`, `iResolution`, `rainAmount`, `glassBlur`)
    fn set_inputs(&mut self, inputs: &ShaderInputs);

    /// Upload `texture` and bind it to `iChannel0`
    ///
    /// On error the previously bound texture stays in place.
    fn bind_texture(&mut self, texture: &TextureImage) -> Result<(), HalError>;

    /// Draw exactly one frame
    fn render(&mut self) -> Result<(), HalError>;

    /// Resize the overlay and drawing buffer
    fn resize(&mut self, viewport: Viewport);

    /// Tear down: rendering context, then shader program, then GPU texture,
    /// then the overlay element
    fn dispose(self);
}

/// Page Abstraction Layer trait
///
/// All methods take `&self`; implementations use interior mutability the way
/// a browser global would. Nothing here blocks: asynchronous work returns a
/// [`RequestId`] immediately and completes later through a [`PageEvent`].
pub trait PageHal {
    /// Platform render session type
    type Session: RenderSession;

    // === Page Queries ===

    /// Read an attribute from `<body>`
    ///
    /// # Returns
    /// * `Some(value)` - Attribute present (possibly empty)
    /// * `None` - Attribute absent or no body yet
    fn body_attribute(&self, name: &str) -> Option<String>;

    /// Read a theme setting such as `("theme", "enable_rain_effect")`
    ///
    /// Values are returned as JSON since the theme layer stores booleans,
    /// numbers and strings interchangeably.
    fn theme_setting(&self, section: &str, key: &str) -> Option<serde_json::Value>;

    /// True once the document has finished parsing
    fn document_ready(&self) -> bool;

    /// Current viewport in CSS pixels plus device pixel ratio
    fn viewport(&self) -> Viewport;

    /// Monotonic time in milliseconds
    ///
    /// On WASM: `performance.now()`
    fn now_ms(&self) -> f64;

    // === Debug ===

    /// Write a debug message to the platform's console/log
    ///
    /// On WASM: Uses `console.log()`
    fn debug_write(&self, msg: &str);

    // === Scheduling ===

    /// Arm a one-shot timer; fires [`PageEvent::Timer`]
    fn set_timeout(&self, delay_ms: u32) -> Result<TimerId, HalError>;

    /// Disarm a timer. Unknown or already fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);

    /// Request one display-refresh callback; fires [`PageEvent::Frame`]
    fn request_frame(&self) -> Result<FrameHandle, HalError>;

    /// Cancel a pending frame. Unknown or already fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);

    /// Subscribe to a page signal until [`PageHal::remove_listener`]
    fn add_listener(&self, signal: Signal) -> Result<ListenerId, HalError>;

    /// Unsubscribe. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);

    // === Async Work ===
    // These methods start work and return immediately with a request id.
    // Results are delivered as PageEvent::TextureLoaded / PageEvent::SessionReady.

    /// Start fetching the bytes at `url`
    ///
    /// # Returns
    /// * `Ok(request_id)` - Result arrives as [`PageEvent::TextureLoaded`]
    /// * `Err(HalError)` - Load could not be started
    fn start_texture_load(&self, url: &str) -> Result<RequestId, HalError>;

    /// Start building a render session
    ///
    /// # Returns
    /// * `Ok(request_id)` - Result arrives as [`PageEvent::SessionReady`]
    /// * `Err(HalError)` - Build could not be started
    fn start_session(&self, spec: SessionSpec<'_>) -> Result<RequestId, HalError>;
}
