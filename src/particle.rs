//! Particle engine: a fixed-size population of falling particles.
//!
//! The engine owns every [`Particle`] and the [`EffectRegistry`] they are
//! drawn from. Particles never keep a copy of their parameters; each spawn
//! reads the bundle of the *currently active* effect, so a particle that
//! leaves the bottom edge comes back with whatever effect is live at that
//! moment.
//!
//! # Frame model
//!
//! The host calls [`ParticleEngine::advance_frame`] once per display refresh.
//! There is no delta time: motion is expressed in pixels per frame.
//!
//! ```
//! use snowglobe::effects::EffectRegistry;
//! use snowglobe::particle::ParticleEngine;
//! use snowglobe::surface::{RecordingSurface, Viewport};
//!
//! let mut engine = ParticleEngine::new(EffectRegistry::builtin(), Viewport::new(320.0, 200.0), 7);
//! let mut surface = RecordingSurface::new();
//! engine.advance_frame(&mut surface);
//! assert_eq!(surface.last_frame().len(), 150);
//!
//! assert!(engine.select_effect("warm"));
//! assert_eq!(engine.particles().len(), 80);
//! ```

use std::f64::consts::TAU;

use image::Rgba;
use log::{debug, warn};

use crate::effects::{EffectKind, EffectParameters, EffectRegistry, RenderMode};
use crate::surface::{Disc, DrawSurface, Viewport};

/// Recycled particles re-enter this many pixels above the top edge.
pub const SPAWN_OFFSET: f64 = 10.0;
/// Sway phase per pixel of vertical position.
pub const SWAY_FREQUENCY: f64 = 0.01;
/// Peak horizontal sway in pixels per frame.
pub const SWAY_AMPLITUDE: f64 = 0.5;
/// Width of the random horizontal speed spread, centered on the wind.
pub const DRIFT_SPREAD: f64 = 0.5;
/// Width of the random spin spread, centered on zero (radians per frame).
pub const SPIN_SPREAD: f64 = 0.02;
/// Floor for particle radii so a zero-size bundle still draws something.
pub const MIN_RADIUS: f64 = 0.1;

/// One falling particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub speed_x: f64,
    pub speed_y: f64,
    pub radius: f64,
    pub color: Rgba<u8>,
    /// Tracked for rotated sprites; current render modes ignore it
    pub rotation: f64,
    pub spin: f64,
    /// In `[0.5, 1.0)`
    pub opacity: f64,
}

impl Particle {
    /// Build a particle from `params`.
    ///
    /// Initial seeding scatters particles over the whole viewport; recycled
    /// particles start just above the top edge.
    fn spawn(
        params: &EffectParameters,
        viewport: Viewport,
        rng: &mut fastrand::Rng,
        initial: bool,
    ) -> Self {
        let x = rng.f64() * viewport.width();
        let y = if initial { rng.f64() * viewport.height() } else { -SPAWN_OFFSET };
        let radius = (params.size_base + rng.f64() * params.size_range).max(MIN_RADIUS);
        let speed_y = params.speed_base + rng.f64() * params.speed_range;
        let speed_x = (rng.f64() - 0.5) * DRIFT_SPREAD + params.wind;
        let color = params.palette[rng.usize(..params.palette.len())];
        let rotation = rng.f64() * TAU;
        let spin = (rng.f64() - 0.5) * SPIN_SPREAD;
        let opacity = 0.5 + rng.f64() * 0.5;

        Self { x, y, speed_x, speed_y, radius, color, rotation, spin, opacity }
    }

    /// Advance one frame. Returns `true` if the particle was recycled.
    fn step(&mut self, params: &EffectParameters, viewport: Viewport, rng: &mut fastrand::Rng) -> bool {
        self.y += self.speed_y;
        self.x += self.speed_x + (self.y * SWAY_FREQUENCY).sin() * SWAY_AMPLITUDE;
        self.rotation += self.spin;

        let recycled = self.y > viewport.height();
        if recycled {
            *self = Self::spawn(params, viewport, rng, false);
        }

        // Horizontal edges wrap; only the bottom edge recycles.
        self.x = wrap(self.x, viewport.width());
        recycled
    }

    /// Drawing command for this particle under `mode`.
    pub fn disc(&self, mode: RenderMode) -> Disc {
        Disc {
            x: self.x,
            y: self.y,
            radius: self.radius,
            color: self.color,
            opacity: self.opacity,
            glow: mode.glow(self.color),
        }
    }
}

/// Wrap `x` into `[0, width)`.
fn wrap(x: f64, width: f64) -> f64 {
    if (0.0..width).contains(&x) {
        return x;
    }
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round up to `width` for tiny negative inputs
    if wrapped >= width {
        0.0
    } else {
        wrapped
    }
}

/// Owns the particle population and advances it frame by frame.
#[derive(Debug, Clone)]
pub struct ParticleEngine {
    registry: EffectRegistry,
    active: EffectKind,
    viewport: Viewport,
    particles: Vec<Particle>,
    rng: fastrand::Rng,
    frames: u64,
}

impl ParticleEngine {
    /// Create an engine showing the default effect, already seeded.
    ///
    /// The same `seed` always produces the same animation.
    pub fn new(registry: EffectRegistry, viewport: Viewport, seed: u64) -> Self {
        let mut engine = Self {
            registry,
            active: EffectKind::default(),
            viewport,
            particles: Vec::new(),
            rng: fastrand::Rng::with_seed(seed),
            frames: 0,
        };
        engine.reseed();
        engine
    }

    /// Builder form of [`ParticleEngine::set_effect`].
    pub fn with_effect(mut self, kind: EffectKind) -> Self {
        self.set_effect(kind);
        self
    }

    /// Set the drawing bounds. Does not reseed: out-of-range particles are
    /// corrected as they next wrap or recycle. Call [`reseed`](Self::reseed)
    /// to apply new bounds immediately.
    pub fn configure_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        debug!("viewport set to {}x{}", self.viewport.width(), self.viewport.height());
    }

    /// Switch to the effect called `name` and reseed.
    ///
    /// Unknown names are ignored: the current effect and particles are left
    /// untouched and `false` is returned.
    pub fn select_effect(&mut self, name: &str) -> bool {
        match self.registry.resolve(name) {
            Ok(kind) => {
                self.set_effect(kind);
                true
            }
            Err(e) => {
                warn!("ignoring effect selection: {}", e);
                false
            }
        }
    }

    /// Switch to `kind` and reseed.
    pub fn set_effect(&mut self, kind: EffectKind) {
        self.active = kind;
        debug!("effect switched to {}", kind);
        self.reseed();
    }

    /// Replace the whole population with freshly drawn particles.
    pub fn reseed(&mut self) {
        let params = self.registry.get(self.active);
        let viewport = self.viewport;
        let rng = &mut self.rng;
        self.particles = (0..params.particle_count)
            .map(|_| Particle::spawn(params, viewport, rng, true))
            .collect();
        debug!("reseeded {} particles for {}", self.particles.len(), self.active);
    }

    /// Simulate one frame without drawing.
    pub fn step(&mut self) {
        let params = self.registry.get(self.active);
        for p in &mut self.particles {
            p.step(params, self.viewport, &mut self.rng);
        }
        self.frames += 1;
    }

    /// Clear `surface`, then step and draw every particle once.
    pub fn advance_frame<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear(self.viewport);
        let params = self.registry.get(self.active);
        for p in &mut self.particles {
            p.step(params, self.viewport, &mut self.rng);
            surface.fill_disc(&p.disc(params.mode));
        }
        self.frames += 1;
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn effect(&self) -> EffectKind {
        self.active
    }

    /// Parameters of the active effect.
    pub fn params(&self) -> &EffectParameters {
        self.registry.get(self.active)
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of frames simulated so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}
