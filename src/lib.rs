//! Snowglobe - Library for holiday particle backdrops
//!
//! This library provides functionality to:
//! - Simulate falling particles for a closed set of named effects
//! - Draw them onto any [`surface::DrawSurface`] (browser canvas, raster image)
//! - Export simulated runs as animated GIF or PNG
//! - Generate placement tables for the page's CSS overlays

pub mod cli;
pub mod color;
pub mod config;
pub mod effects;
pub mod gif;
pub mod output;
pub mod overlays;
pub mod particle;
pub mod raster;
pub mod suggest;
pub mod surface;

#[cfg(feature = "wasm")]
pub mod wasm;
