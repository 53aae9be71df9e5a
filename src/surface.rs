//! Drawing surface abstraction.
//!
//! The engine never talks to a canvas directly. Each frame it issues one
//! [`DrawSurface::clear`] followed by one [`DrawSurface::fill_disc`] per
//! particle. Implementations:
//!
//! - [`crate::raster::ImageSurface`]: software rasterizer into an `RgbaImage`
//! - [`RecordingSurface`]: keeps the command stream, for tests and benchmarks
//! - `wasm::CanvasSurface`: browser 2D context (feature `wasm`)

use image::Rgba;

/// Smallest accepted viewport dimension.
pub const MIN_VIEWPORT: f64 = 1.0;

/// Logical drawing bounds in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    /// Create a viewport, clamping each dimension to at least 1 pixel.
    ///
    /// Zero, negative and non-finite sizes would otherwise poison the
    /// horizontal wrap with a division by zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width: clamp_dimension(width), height: clamp_dimension(height) }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

fn clamp_dimension(v: f64) -> f64 {
    if v.is_finite() {
        v.max(MIN_VIEWPORT)
    } else {
        MIN_VIEWPORT
    }
}

/// Halo drawn behind a disc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels
    pub blur: f64,
    pub tint: Rgba<u8>,
}

/// One filled circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disc {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgba<u8>,
    /// Multiplied with the color's own alpha
    pub opacity: f64,
    pub glow: Option<Glow>,
}

/// Target for the engine's per-frame drawing commands.
pub trait DrawSurface {
    /// Wipe the whole surface before a frame.
    fn clear(&mut self, viewport: Viewport);

    /// Fill a disc, with its halo if it has one.
    fn fill_disc(&mut self, disc: &Disc);
}

/// A command captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Viewport),
    Disc(Disc),
}

/// Surface that records every command it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Discs drawn since the most recent clear.
    pub fn last_frame(&self) -> Vec<&Disc> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear(_)))
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Disc(d) => Some(d),
                DrawCommand::Clear(_) => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, viewport: Viewport) {
        self.commands.push(DrawCommand::Clear(viewport));
    }

    fn fill_disc(&mut self, disc: &Disc) {
        self.commands.push(DrawCommand::Disc(*disc));
    }
}
