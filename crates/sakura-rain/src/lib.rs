//! Rain-on-glass background for the Sakura blog theme
//!
//! This crate provides the effect's core:
//! - Configuration and theme settings parsing
//! - Background texture acquisition with a gradient fallback
//! - The [`RainEffect`] lifecycle (deferred setup, animation loop, reload, teardown)
//! - The [`RainContext`] that follows theme refreshes
//!
//! ## Architecture
//!
//! - [`config`]: `RainConfig` and partial updates
//! - [`settings`]: reading theme keys and `<body>` attributes
//! - [`texture`]: decoded images, the fallback gradient, sampling
//! - [`inputs`]: shader input names and values
//! - [`hal`]: the page abstraction every browser call goes through
//! - [`effect`]: the rain effect state machine
//! - [`registry`]: theme-driven creation and teardown
//! - [`testing`]: a deterministic mock page
//!
//! ## Example
//!
//! ```rust
//! use sakura_rain::testing::MockHal;
//! use sakura_rain::RainContext;
//! use serde_json::json;
//!
//! let hal = MockHal::new();
//! hal.set_theme("enable_rain_effect", json!(true));
//!
//! let mut rain = RainContext::new();
//! rain.register(&hal);
//! assert!(rain.effect().is_some());
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable without a browser
//! 2. **Event Driven**: Nothing blocks; async work completes through `PageEvent`s
//! 3. **Renderer Behind a Feature**: the wgpu renderer only builds with `wasm`

pub mod config;
pub mod effect;
pub mod hal;
pub mod inputs;
pub mod registry;
pub mod settings;
pub mod testing;
pub mod texture;

mod viewport;

// GPU renderer (only available with "wasm" feature)
#[cfg(feature = "wasm")]
pub mod gpu;

pub use config::{RainConfig, RainConfigPatch};
pub use effect::{Phase, RainEffect, SETUP_DELAY_MS};
pub use hal::{
    FrameHandle, HalError, ListenerId, PageEvent, PageHal, RenderSession, RequestId, SessionSpec,
    Signal, TimerId,
};
pub use inputs::ShaderInputs;
pub use registry::RainContext;
pub use settings::RainSettings;
pub use texture::{TextureImage, TextureSource};
pub use viewport::Viewport;
