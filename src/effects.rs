//! Effect registry: named parameter bundles for the particle engine.
//!
//! Every effect the backdrop can show is one variant of [`EffectKind`]. The
//! [`EffectRegistry`] maps each kind to an immutable [`EffectParameters`]
//! bundle; the engine only ever changes *which* bundle it reads, never the
//! bundle itself.
//!
//! Names coming from the outside (buttons, CLI flags, config tables) are
//! resolved at this boundary. An unknown name yields [`EffectError::Unknown`],
//! which the engine swallows so the current effect stays in place.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::NEUTRAL_GLOW;
use crate::suggest::closest;
use crate::surface::Glow;

/// Blur radius of the soft glow halo, in pixels.
pub const SOFT_GLOW_BLUR: f64 = 5.0;
/// Blur radius of the strong glow halo, in pixels.
pub const STRONG_GLOW_BLUR: f64 = 10.0;

/// The closed set of effects the backdrop knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Dense, small, plain snowflakes
    #[default]
    Winter,
    /// Larger fluffy flakes with a soft halo and a slight breeze
    Classic,
    /// Slow golden bokeh lights
    Warm,
}

impl EffectKind {
    /// Every kind, in registry order.
    pub const ALL: [EffectKind; 3] = [EffectKind::Winter, EffectKind::Classic, EffectKind::Warm];

    pub fn as_str(self) -> &'static str {
        match self {
            EffectKind::Winter => "winter",
            EffectKind::Classic => "classic",
            EffectKind::Warm => "warm",
        }
    }

    /// All effect names, in registry order.
    pub fn names() -> [&'static str; 3] {
        Self::ALL.map(Self::as_str)
    }

    fn index(self) -> usize {
        match self {
            EffectKind::Winter => 0,
            EffectKind::Classic => 1,
            EffectKind::Warm => 2,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectKind {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| EffectError::unknown(trimmed))
    }
}

/// Visual treatment of a particle. Has no effect on the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMode {
    /// Flat disc
    #[default]
    Plain,
    /// Small halo tinted with the particle's own color
    GlowSoft,
    /// Larger halo with a fixed neutral tint
    GlowStrong,
}

impl RenderMode {
    /// Halo to draw around a particle of the given color, if any.
    pub fn glow(self, color: Rgba<u8>) -> Option<Glow> {
        match self {
            RenderMode::Plain => None,
            RenderMode::GlowSoft => Some(Glow { blur: SOFT_GLOW_BLUR, tint: color }),
            RenderMode::GlowStrong => Some(Glow { blur: STRONG_GLOW_BLUR, tint: NEUTRAL_GLOW }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Plain => "plain",
            RenderMode::GlowSoft => "glow-soft",
            RenderMode::GlowStrong => "glow-strong",
        }
    }
}

/// Errors raised at the registry boundary.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EffectError {
    /// Name does not match any [`EffectKind`]
    #[error("unknown effect '{name}'")]
    Unknown { name: String, suggestion: Option<&'static str> },
    /// A parameter bundle failed validation
    #[error("effect '{effect}': {message}")]
    Invalid { effect: EffectKind, message: String },
}

impl EffectError {
    fn unknown(name: &str) -> Self {
        EffectError::Unknown {
            name: name.to_string(),
            suggestion: closest(name, &EffectKind::names(), 3),
        }
    }
}

/// Parameter bundle describing one effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParameters {
    /// Target population size
    pub particle_count: usize,
    /// Colors sampled uniformly per particle at spawn; never empty once registered
    pub palette: Vec<Rgba<u8>>,
    /// Fall speed is `speed_base + U(0, speed_range)` pixels per frame
    pub speed_base: f64,
    pub speed_range: f64,
    /// Radius is `size_base + U(0, size_range)` pixels
    pub size_base: f64,
    pub size_range: f64,
    /// Constant horizontal drift added to every particle
    pub wind: f64,
    pub mode: RenderMode,
}

impl EffectParameters {
    /// Check the bundle, returning one message per problem.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.palette.is_empty() {
            problems.push("palette must contain at least one color".to_string());
        }
        let ranges = [
            ("speed_base", self.speed_base),
            ("speed_range", self.speed_range),
            ("size_base", self.size_base),
            ("size_range", self.size_range),
        ];
        for (field, value) in ranges {
            if !value.is_finite() || value < 0.0 {
                problems.push(format!("{} must be a finite number >= 0 (got {})", field, value));
            }
        }
        if !self.wind.is_finite() {
            problems.push(format!("wind must be finite (got {})", self.wind));
        }
        problems
    }

    /// Validate the bundle for `effect`.
    pub fn validate(&self, effect: EffectKind) -> Result<(), EffectError> {
        match self.problems().into_iter().next() {
            None => Ok(()),
            Some(message) => Err(EffectError::Invalid { effect, message }),
        }
    }
}

/// Immutable lookup table from [`EffectKind`] to its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRegistry {
    entries: [EffectParameters; 3],
}

impl EffectRegistry {
    /// The three effects shipped with the backdrop.
    pub fn builtin() -> Self {
        Self { entries: [winter(), classic(), warm()] }
    }

    /// Replace one effect's parameters, consuming the registry.
    ///
    /// Used while assembling a registry from configuration, before it is
    /// handed to an engine.
    pub fn with_effect(
        mut self,
        kind: EffectKind,
        params: EffectParameters,
    ) -> Result<Self, EffectError> {
        params.validate(kind)?;
        self.entries[kind.index()] = params;
        Ok(self)
    }

    /// Parameters for a kind. Every kind is always present.
    pub fn get(&self, kind: EffectKind) -> &EffectParameters {
        &self.entries[kind.index()]
    }

    /// Resolve a name to its kind.
    pub fn resolve(&self, name: &str) -> Result<EffectKind, EffectError> {
        name.parse()
    }

    /// Resolve a name straight to its parameters.
    pub fn lookup(&self, name: &str) -> Result<&EffectParameters, EffectError> {
        self.resolve(name).map(|kind| self.get(kind))
    }

    /// All `(kind, parameters)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, &EffectParameters)> {
        EffectKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// Palettes are the byte values of the page's rgba() strings, e.g.
// rgba(255, 255, 255, 0.8) -> alpha round(0.8 * 255) = 204.

fn winter() -> EffectParameters {
    EffectParameters {
        particle_count: 150,
        palette: vec![Rgba([255, 255, 255, 204]), Rgba([230, 240, 255, 153])],
        speed_base: 1.0,
        speed_range: 1.5,
        size_base: 1.0,
        size_range: 3.0,
        wind: 0.0,
        mode: RenderMode::Plain,
    }
}

fn classic() -> EffectParameters {
    EffectParameters {
        particle_count: 100,
        palette: vec![Rgba([255, 255, 255, 230]), Rgba([255, 255, 255, 128])],
        speed_base: 0.5,
        speed_range: 1.0,
        size_base: 2.0,
        size_range: 4.0,
        wind: 0.2,
        mode: RenderMode::GlowSoft,
    }
}

fn warm() -> EffectParameters {
    EffectParameters {
        particle_count: 80,
        palette: vec![
            Rgba([255, 215, 0, 204]),
            Rgba([255, 140, 0, 153]),
            Rgba([255, 255, 255, 102]),
        ],
        speed_base: 0.2,
        speed_range: 0.5,
        size_base: 2.0,
        size_range: 3.0,
        wind: 0.0,
        mode: RenderMode::GlowStrong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    #[test]
    fn test_builtin_lookup() {
        let registry = EffectRegistry::builtin();
        let warm = registry.lookup("warm").unwrap();
        assert_eq!(warm.particle_count, 80);
        assert_eq!(warm.palette.len(), 3);
        assert_eq!(warm.wind, 0.0);
        assert_eq!(registry.lookup("winter").unwrap().particle_count, 150);
        assert_eq!(registry.lookup("classic").unwrap().mode, RenderMode::GlowSoft);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = EffectRegistry::builtin();
        assert_eq!(registry.resolve(" Warm ").unwrap(), EffectKind::Warm);
    }

    #[test]
    fn test_unknown_effect_suggests() {
        let registry = EffectRegistry::builtin();
        match registry.lookup("wintr") {
            Err(EffectError::Unknown { name, suggestion }) => {
                assert_eq!(name, "wintr");
                assert_eq!(suggestion, Some("winter"));
            }
            other => panic!("expected unknown effect, got {:?}", other),
        }
        assert!(matches!(
            registry.lookup("nonexistent"),
            Err(EffectError::Unknown { suggestion: None, .. })
        ));
    }

    #[test]
    fn test_builtin_palettes_match_css_sources() {
        let sources: [(EffectKind, &[&str]); 3] = [
            (EffectKind::Winter, &["rgba(255, 255, 255, 0.8)", "rgba(230, 240, 255, 0.6)"]),
            (EffectKind::Classic, &["rgba(255, 255, 255, 0.9)", "rgba(255, 255, 255, 0.5)"]),
            (
                EffectKind::Warm,
                &["rgba(255, 215, 0, 0.8)", "rgba(255, 140, 0, 0.6)", "rgba(255, 255, 255, 0.4)"],
            ),
        ];
        let registry = EffectRegistry::builtin();
        for (kind, css) in sources {
            let palette = &registry.get(kind).palette;
            assert_eq!(palette.len(), css.len());
            for (stored, source) in palette.iter().zip(css) {
                let parsed = parse_color(source).unwrap();
                for channel in 0..4 {
                    let diff = (stored[channel] as i16 - parsed[channel] as i16).abs();
                    assert!(diff <= 1, "{} channel {} differs: {:?} vs {:?}", kind, channel, stored, parsed);
                }
            }
        }
    }

    #[test]
    fn test_with_effect_replaces_only_that_kind() {
        let mut custom = EffectRegistry::builtin().get(EffectKind::Warm).clone();
        custom.particle_count = 12;
        let registry = EffectRegistry::builtin().with_effect(EffectKind::Warm, custom).unwrap();
        assert_eq!(registry.get(EffectKind::Warm).particle_count, 12);
        assert_eq!(registry.get(EffectKind::Winter), EffectRegistry::builtin().get(EffectKind::Winter));
    }

    #[test]
    fn test_with_effect_rejects_invalid() {
        let mut bad = EffectRegistry::builtin().get(EffectKind::Winter).clone();
        bad.palette.clear();
        let err = EffectRegistry::builtin().with_effect(EffectKind::Winter, bad).unwrap_err();
        assert!(matches!(err, EffectError::Invalid { effect: EffectKind::Winter, .. }));

        let mut negative = EffectRegistry::builtin().get(EffectKind::Classic).clone();
        negative.size_range = -1.0;
        negative.speed_base = f64::NAN;
        assert_eq!(negative.problems().len(), 2);
    }

    #[test]
    fn test_glow_per_mode() {
        let gold = Rgba([255, 215, 0, 204]);
        assert_eq!(RenderMode::Plain.glow(gold), None);
        assert_eq!(RenderMode::GlowSoft.glow(gold), Some(Glow { blur: SOFT_GLOW_BLUR, tint: gold }));
        assert_eq!(
            RenderMode::GlowStrong.glow(gold),
            Some(Glow { blur: STRONG_GLOW_BLUR, tint: NEUTRAL_GLOW })
        );
    }
}
