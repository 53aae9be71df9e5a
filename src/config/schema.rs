//! Configuration schema types for `snowglobe.toml`
//!
//! ```toml
//! [canvas]
//! width = 640
//! height = 360
//! background = "#0b1d33"
//!
//! [animation]
//! effect = "warm"
//! frames = 180
//! frame_ms = 40
//! seed = 7
//!
//! [effects.warm]
//! particle_count = 120
//! palette = ["rgba(255, 215, 0, 0.8)", "#ff8c00"]
//! mode = "glow-strong"
//! ```

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::effects::{EffectKind, EffectParameters, EffectRegistry, RenderMode};

/// Output surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// CSS color the surface is cleared to before each frame
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            background: default_background(),
        }
    }
}

fn default_width() -> u32 {
    480
}

fn default_height() -> u32 {
    270
}

fn default_background() -> String {
    "#0b1d33".to_string()
}

/// Simulation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnimationConfig {
    /// Effect shown from the first frame
    #[serde(default = "default_effect")]
    pub effect: String,
    /// Number of frames to simulate
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Display time of each frame in exported animations
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u32,
    /// Fixed seed for reproducible output; random when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            effect: default_effect(),
            frames: default_frames(),
            frame_ms: default_frame_ms(),
            seed: None,
        }
    }
}

fn default_effect() -> String {
    EffectKind::default().as_str().to_string()
}

fn default_frames() -> u32 {
    120
}

fn default_frame_ms() -> u32 {
    40
}

/// Partial parameter set layered over a built-in effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectOverride {
    pub particle_count: Option<usize>,
    pub palette: Option<Vec<String>>,
    pub speed_base: Option<f64>,
    pub speed_range: Option<f64>,
    pub size_base: Option<f64>,
    pub size_range: Option<f64>,
    pub wind: Option<f64>,
    pub mode: Option<RenderMode>,
}

impl EffectOverride {
    /// Layer this override over `base`, collecting every problem found.
    pub fn apply(&self, kind: EffectKind, base: &EffectParameters) -> Result<EffectParameters, Vec<String>> {
        let mut errors = Vec::new();
        let mut params = base.clone();

        if let Some(palette) = &self.palette {
            params.palette.clear();
            for css in palette {
                match parse_color(css) {
                    Ok(color) => params.palette.push(color),
                    Err(e) => errors.push(format!("effects.{}.palette: '{}': {}", kind, css, e)),
                }
            }
        }
        params.particle_count = self.particle_count.unwrap_or(params.particle_count);
        params.speed_base = self.speed_base.unwrap_or(params.speed_base);
        params.speed_range = self.speed_range.unwrap_or(params.speed_range);
        params.size_base = self.size_base.unwrap_or(params.size_base);
        params.size_range = self.size_range.unwrap_or(params.size_range);
        params.wind = self.wind.unwrap_or(params.wind);
        params.mode = self.mode.unwrap_or(params.mode);

        // An unparseable palette already reported; don't also call it empty.
        if errors.is_empty() {
            errors.extend(params.problems().into_iter().map(|p| format!("effects.{}: {}", kind, p)));
        }

        if errors.is_empty() {
            Ok(params)
        } else {
            Err(errors)
        }
    }
}

/// Per-effect overrides. Only known effects may appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winter: Option<EffectOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic: Option<EffectOverride>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warm: Option<EffectOverride>,
}

impl EffectsConfig {
    pub fn get(&self, kind: EffectKind) -> Option<&EffectOverride> {
        match kind {
            EffectKind::Winter => self.winter.as_ref(),
            EffectKind::Classic => self.classic.as_ref(),
            EffectKind::Warm => self.warm.as_ref(),
        }
    }

    /// Build a registry from the built-ins with these overrides applied.
    pub fn build_registry(&self) -> Result<EffectRegistry, Vec<String>> {
        let mut registry = EffectRegistry::builtin();
        let mut errors = Vec::new();

        for kind in EffectKind::ALL {
            let Some(over) = self.get(kind) else { continue };
            match over.apply(kind, registry.get(kind)) {
                Ok(params) => match registry.clone().with_effect(kind, params) {
                    Ok(updated) => registry = updated,
                    Err(e) => errors.push(e.to_string()),
                },
                Err(mut problems) => errors.append(&mut problems),
            }
        }

        if errors.is_empty() {
            Ok(registry)
        } else {
            Err(errors)
        }
    }
}

/// Root of `snowglobe.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnowglobeConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

impl SnowglobeConfig {
    /// Every problem with this configuration; empty when valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.canvas.width == 0 || self.canvas.height == 0 {
            errors.push(format!(
                "canvas size must be at least 1x1 (got {}x{})",
                self.canvas.width, self.canvas.height
            ));
        }
        if let Err(e) = parse_color(&self.canvas.background) {
            errors.push(format!("canvas.background: '{}': {}", self.canvas.background, e));
        }
        if let Err(e) = self.animation.effect.parse::<EffectKind>() {
            errors.push(format!("animation.effect: {}", e));
        }
        if self.animation.frames == 0 {
            errors.push("animation.frames must be at least 1".to_string());
        }
        if let Err(mut problems) = self.effects.build_registry() {
            errors.append(&mut problems);
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SnowglobeConfig = toml::from_str("").unwrap();
        assert_eq!(config.canvas.width, 480);
        assert_eq!(config.canvas.height, 270);
        assert_eq!(config.animation.effect, "winter");
        assert_eq!(config.animation.frames, 120);
        assert_eq!(config.animation.seed, None);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_override_layers_over_builtin() {
        let config: SnowglobeConfig = toml::from_str(
            r##"
[effects.warm]
particle_count = 12
palette = ["#ff0000", "rgba(0, 0, 255, 0.5)"]
mode = "plain"
"##,
        )
        .unwrap();

        let registry = config.effects.build_registry().unwrap();
        let warm = registry.get(EffectKind::Warm);
        assert_eq!(warm.particle_count, 12);
        assert_eq!(warm.palette, vec![Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 128])]);
        assert_eq!(warm.mode, RenderMode::Plain);
        // Untouched fields keep the built-in values
        assert_eq!(warm.speed_base, 0.2);
        assert_eq!(registry.get(EffectKind::Winter), EffectRegistry::builtin().get(EffectKind::Winter));
    }

    #[test]
    fn test_unknown_effect_table_is_rejected() {
        let result: Result<SnowglobeConfig, _> = toml::from_str("[effects.blizzard]\nwind = 1.0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_render_mode_is_rejected() {
        let result: Result<SnowglobeConfig, _> = toml::from_str("[effects.winter]\nmode = \"sparkle\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let config: SnowglobeConfig = toml::from_str(
            r#"
[canvas]
width = 0
background = "not-a-color"

[animation]
effect = "wintr"
frames = 0

[effects.classic]
palette = []
size_range = -2.0
"#,
        )
        .unwrap();

        let errors = config.validate();
        assert_eq!(errors.len(), 6, "{:#?}", errors);
        assert!(errors.iter().any(|e| e.contains("canvas size")));
        assert!(errors.iter().any(|e| e.contains("canvas.background")));
        assert!(errors.iter().any(|e| e.contains("unknown effect 'wintr'")));
        assert!(errors.iter().any(|e| e.contains("animation.frames")));
        assert!(errors.iter().any(|e| e.contains("palette must contain")));
        assert!(errors.iter().any(|e| e.contains("size_range")));
    }

    #[test]
    fn test_bad_palette_color_reported_once() {
        let over = EffectOverride { palette: Some(vec!["nope".to_string()]), ..Default::default() };
        let base = EffectRegistry::builtin().get(EffectKind::Winter).clone();
        let errors = over.apply(EffectKind::Winter, &base).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("effects.winter.palette"));
    }
}
