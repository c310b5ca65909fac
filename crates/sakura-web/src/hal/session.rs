//! Overlay + canvas render session

use std::fmt;

use sakura_rain::gpu::{fit_surface_size, RainRenderer};
use sakura_rain::inputs::ShaderInputs;
use sakura_rain::{HalError, RenderSession, TextureImage, Viewport};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use crate::util::{describe, log};

/// Class of the overlay element
pub const OVERLAY_CLASS: &str = "rain-canvas";

const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
     pointer-events: none; z-index: -9999; \
     background-color: var(--background-color, #fff);";

const CANVAS_STYLE: &str = "display: block; width: 100%; height: 100%;";

/// A live session: the overlay element, its canvas and the GPU renderer
pub struct WebSession {
    renderer: RainRenderer,
    canvas: HtmlCanvasElement,
    overlay: HtmlElement,
}

impl fmt::Debug for WebSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSession")
            .field("surface_size", &self.renderer.surface_size())
            .finish_non_exhaustive()
    }
}

impl WebSession {
    /// Attach the overlay to `<body>` and acquire the GPU.
    ///
    /// On failure the overlay is removed again, so nothing is left behind.
    pub(crate) async fn build(
        viewport: Viewport,
        texture: TextureImage,
        inputs: ShaderInputs,
    ) -> Result<Self, HalError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or(HalError::NotSupported)?;
        let body = document.body().ok_or(HalError::NotFound)?;

        let (overlay, canvas) = create_overlay(&document, viewport)?;
        body.append_child(&overlay).map_err(|_| HalError::Dom)?;

        match RainRenderer::new(canvas.clone(), &texture, &inputs).await {
            Ok(renderer) => {
                let (width, height) = renderer.surface_size();
                canvas.set_width(width);
                canvas.set_height(height);
                Ok(Self {
                    renderer,
                    canvas,
                    overlay,
                })
            }
            Err(e) => {
                log(&format!("[wasm-hal] GPU initialization failed: {}", e));
                overlay.remove();
                Err(HalError::Gpu)
            }
        }
    }
}

fn create_overlay(
    document: &Document,
    viewport: Viewport,
) -> Result<(HtmlElement, HtmlCanvasElement), HalError> {
    let overlay: HtmlElement = document
        .create_element("div")
        .map_err(|e| dom_error("div", &e))?
        .dyn_into()
        .map_err(|_| HalError::Dom)?;
    overlay.set_class_name(OVERLAY_CLASS);
    overlay
        .set_attribute("style", OVERLAY_STYLE)
        .map_err(|_| HalError::Dom)?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| dom_error("canvas", &e))?
        .dyn_into()
        .map_err(|_| HalError::Dom)?;
    canvas
        .set_attribute("style", CANVAS_STYLE)
        .map_err(|_| HalError::Dom)?;
    let (width, height) = viewport.drawing_size();
    canvas.set_width(width);
    canvas.set_height(height);

    overlay.append_child(&canvas).map_err(|_| HalError::Dom)?;
    Ok((overlay, canvas))
}

fn dom_error(tag: &str, e: &wasm_bindgen::JsValue) -> HalError {
    log(&format!("[wasm-hal] Failed to create <{}>: {}", tag, describe(e)));
    HalError::Dom
}

impl RenderSession for WebSession {
    fn set_inputs(&mut self, inputs: &ShaderInputs) {
        self.renderer.set_inputs(inputs);
    }

    fn bind_texture(&mut self, texture: &TextureImage) -> Result<(), HalError> {
        self.renderer.bind_texture(texture)
    }

    fn render(&mut self) -> Result<(), HalError> {
        self.renderer.render()
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.drawing_size();
        let (width, height) = fit_surface_size(width, height, self.renderer.max_dimension());
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.renderer.resize(width, height);
    }

    fn dispose(self) {
        let Self {
            renderer, overlay, ..
        } = self;
        renderer.dispose();
        overlay.remove();
    }
}
