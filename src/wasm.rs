//! WASM API module for browser/JS interop
//!
//! Exposes a [`Backdrop`] that owns a particle engine and draws it into a
//! `<canvas>` 2D context. The host page drives it from its own
//! `requestAnimationFrame` loop:
//!
//! ```js
//! const backdrop = new Backdrop(document.getElementById("snow"));
//! function tick() { backdrop.advance_frame(); requestAnimationFrame(tick); }
//! tick();
//! button.onclick = () => backdrop.select_effect("warm");
//! ```

use std::f64::consts::TAU;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::to_css_rgba;
use crate::effects::{EffectKind, EffectRegistry};
use crate::overlays::{self, OverlayKind};
use crate::particle::ParticleEngine;
use crate::surface::{Disc, DrawSurface, Viewport};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(message: &str) -> JsValue {
    JsValue::from_str(message)
}

/// Seed drawn from the browser's RNG.
fn random_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

/// [`DrawSurface`] over a canvas 2D context.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl DrawSurface for CanvasSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.ctx.clear_rect(0.0, 0.0, viewport.width(), viewport.height());
    }

    fn fill_disc(&mut self, disc: &Disc) {
        let ctx = &self.ctx;
        ctx.save();
        ctx.set_global_alpha(disc.opacity);
        ctx.set_fill_style_str(&to_css_rgba(disc.color));
        if let Some(glow) = disc.glow {
            ctx.set_shadow_blur(glow.blur);
            ctx.set_shadow_color(&to_css_rgba(glow.tint));
        }
        ctx.begin_path();
        match ctx.arc(disc.x, disc.y, disc.radius, 0.0, TAU) {
            Ok(()) => ctx.fill(),
            Err(e) => log::warn!("skipping particle at ({}, {}): {:?}", disc.x, disc.y, e),
        }
        ctx.restore();
    }
}

/// Animated particle backdrop bound to one canvas.
#[wasm_bindgen]
pub struct Backdrop {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    engine: ParticleEngine,
}

#[wasm_bindgen]
impl Backdrop {
    /// Bind to `canvas`, sized to its current pixel dimensions, showing the
    /// default effect.
    ///
    /// Fails if the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<Backdrop, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| js_err("2D canvas context not available"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let viewport = Viewport::new(canvas.width() as f64, canvas.height() as f64);
        let engine = ParticleEngine::new(EffectRegistry::builtin(), viewport, random_seed());

        Ok(Backdrop { canvas, surface: CanvasSurface::new(ctx), engine })
    }

    /// Switch to the named effect. Unknown names are ignored and return `false`.
    pub fn select_effect(&mut self, name: &str) -> bool {
        self.engine.select_effect(name)
    }

    /// Resize the canvas and the simulation bounds, then reseed.
    pub fn resize(&mut self, width: f64, height: f64) {
        let viewport = Viewport::new(width, height);
        self.canvas.set_width(viewport.width() as u32);
        self.canvas.set_height(viewport.height() as u32);
        self.engine.configure_viewport(viewport.width(), viewport.height());
        self.engine.reseed();
    }

    /// Change the simulation bounds only.
    pub fn configure_viewport(&mut self, width: f64, height: f64) {
        self.engine.configure_viewport(width, height);
    }

    pub fn reseed(&mut self) {
        self.engine.reseed();
    }

    /// Clear the canvas, then step and draw every particle once.
    pub fn advance_frame(&mut self) {
        self.engine.advance_frame(&mut self.surface);
    }

    /// Name of the active effect
    #[wasm_bindgen(getter)]
    pub fn effect(&self) -> String {
        self.engine.effect().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> usize {
        self.engine.particles().len()
    }
}

/// Names of all effects, in registry order.
#[wasm_bindgen]
pub fn effect_names() -> Vec<String> {
    EffectKind::names().iter().map(|s| s.to_string()).collect()
}

/// Placement table of an overlay layer, as a JSON array.
#[wasm_bindgen]
pub fn overlay_layer(kind: &str, seed: Option<u64>) -> Result<String, JsValue> {
    let kind: OverlayKind = kind.parse().map_err(|e: overlays::UnknownOverlay| js_err(&e.to_string()))?;
    let mut rng = fastrand::Rng::with_seed(seed.unwrap_or_else(random_seed));
    serde_json::to_string(&kind.generate(&mut rng)).map_err(|e| js_err(&e.to_string()))
}

/// Bulbs needed for one string of lights across `width` pixels.
#[wasm_bindgen]
pub fn light_bulb_count(width: f64) -> u32 {
    overlays::light_bulb_count(width)
}
