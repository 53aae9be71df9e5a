//! Placement tables for the page's CSS-animated overlays.
//!
//! Stars, confetti and embers are not simulated here. The page animates them
//! with CSS keyframes; all it needs from us is where each sprite sits, which
//! color it has and how its animation is staggered. Tables are generated
//! once per toggle and serialized to JSON for the host.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::suggest::closest;

/// Horizontal spacing of bulbs on a string of lights, in pixels.
pub const BULB_SPACING: f64 = 40.0;

const CONFETTI_COLORS: [&str; 6] = ["#ff3366", "#33ff66", "#ffcc00", "#3399ff", "#ff66cc", "#66ffcc"];
const EMBER_COLORS: [&str; 3] = ["#ff6600", "#ff9900", "#ffcc00"];

/// Which overlay layer to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Stars,
    Confetti,
    Embers,
}

impl OverlayKind {
    pub const ALL: [OverlayKind; 3] = [OverlayKind::Stars, OverlayKind::Confetti, OverlayKind::Embers];

    pub fn as_str(self) -> &'static str {
        match self {
            OverlayKind::Stars => "stars",
            OverlayKind::Confetti => "confetti",
            OverlayKind::Embers => "embers",
        }
    }

    /// Number of sprites in the layer.
    pub fn count(self) -> usize {
        match self {
            OverlayKind::Stars => 30,
            OverlayKind::Confetti => 50,
            OverlayKind::Embers => 25,
        }
    }

    /// Generate the layer's placement table.
    pub fn generate(self, rng: &mut fastrand::Rng) -> Vec<OverlaySprite> {
        (0..self.count()).map(|_| self.sprite(rng)).collect()
    }

    fn sprite(self, rng: &mut fastrand::Rng) -> OverlaySprite {
        match self {
            OverlayKind::Stars => OverlaySprite {
                left_pct: rng.f64() * 100.0,
                bottom_pct: Some(rng.f64() * 30.0),
                delay_s: rng.f64() * 4.0,
                duration_s: 3.0 + rng.f64() * 3.0,
                color: None,
                shape: SpriteShape::Round,
            },
            OverlayKind::Confetti => OverlaySprite {
                left_pct: rng.f64() * 100.0,
                // Confetti falls from the stylesheet's start position
                bottom_pct: None,
                delay_s: rng.f64() * 5.0,
                duration_s: 4.0 + rng.f64() * 3.0,
                color: Some(pick(rng, &CONFETTI_COLORS)),
                shape: if rng.bool() { SpriteShape::Round } else { SpriteShape::Square },
            },
            OverlayKind::Embers => OverlaySprite {
                left_pct: 40.0 + rng.f64() * 20.0,
                bottom_pct: Some(0.0),
                delay_s: rng.f64() * 3.0,
                duration_s: 2.0 + rng.f64() * 2.0,
                color: Some(pick(rng, &EMBER_COLORS)),
                shape: SpriteShape::Round,
            },
        }
    }
}

impl fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown overlay name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown overlay '{name}'")]
pub struct UnknownOverlay {
    pub name: String,
    pub suggestion: Option<&'static str>,
}

impl FromStr for OverlayKind {
    type Err = UnknownOverlay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        OverlayKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownOverlay {
                name: trimmed.to_string(),
                suggestion: closest(trimmed, &OverlayKind::ALL.map(OverlayKind::as_str), 3),
            })
    }
}

/// Corner style of an overlay sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteShape {
    Round,
    Square,
}

/// Placement of one overlay sprite, in page-relative units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySprite {
    pub left_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_pct: Option<f64>,
    /// Animation delay in seconds
    pub delay_s: f64,
    /// Animation duration in seconds
    pub duration_s: f64,
    /// CSS color; `None` leaves the stylesheet's color in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub shape: SpriteShape,
}

fn pick(rng: &mut fastrand::Rng, colors: &[&str]) -> String {
    colors[rng.usize(..colors.len())].to_string()
}

/// Bulbs needed to span `width` pixels on one string of lights.
pub fn light_bulb_count(width: f64) -> u32 {
    if !width.is_finite() || width <= 0.0 {
        return 0;
    }
    (width / BULB_SPACING).ceil() as u32
}
