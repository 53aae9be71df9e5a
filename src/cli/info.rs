//! Info command implementations (effects, overlay, lights)

use clap::Subcommand;
use std::process::ExitCode;

use crate::color::to_css_rgba;
use crate::effects::{EffectError, EffectKind, EffectRegistry};
use crate::overlays::{light_bulb_count, OverlayKind, BULB_SPACING};
use crate::suggest::format_suggestion;

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum EffectsAction {
    /// List all built-in effects
    List,
    /// Show the parameters of one effect
    Show {
        /// Name of the effect to show
        name: String,
    },
}

/// Print an unknown-name error with its hint and the valid names.
pub(crate) fn report_unknown(what: &str, name: &str, suggestion: Option<&str>, valid: &[&str]) {
    eprintln!("Error: Unknown {} '{}'", what, name);
    if let Some(hint) = format_suggestion(suggestion) {
        eprintln!("{}", hint);
    }
    eprintln!();
    eprintln!("Available: {}", valid.join(", "));
}

/// Execute the effects command
pub fn run_effects(action: EffectsAction) -> ExitCode {
    let registry = EffectRegistry::builtin();
    match action {
        EffectsAction::List => {
            println!("Built-in effects:");
            for (kind, params) in registry.iter() {
                println!(
                    "  {:<8} {:>4} particles  {}",
                    kind.as_str(),
                    params.particle_count,
                    params.mode.as_str()
                );
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        EffectsAction::Show { name } => match name.parse::<EffectKind>() {
            Ok(kind) => {
                let params = registry.get(kind);
                println!("Effect: {}", kind);
                println!();
                println!("  particles  {}", params.particle_count);
                println!("  speed      {} + U(0, {})", params.speed_base, params.speed_range);
                println!("  size       {} + U(0, {})", params.size_base, params.size_range);
                println!("  wind       {}", params.wind);
                println!("  mode       {}", params.mode.as_str());
                println!("  palette");
                for color in &params.palette {
                    println!("    {}", to_css_rgba(*color));
                }
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(EffectError::Unknown { name, suggestion }) => {
                report_unknown("effect", &name, suggestion, &EffectKind::names());
                ExitCode::from(EXIT_INVALID_ARGS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}

/// Execute the overlay command
pub fn run_overlay(kind: &str, seed: Option<u64>) -> ExitCode {
    let kind = match kind.parse::<OverlayKind>() {
        Ok(kind) => kind,
        Err(e) => {
            report_unknown("overlay", &e.name, e.suggestion, &OverlayKind::ALL.map(OverlayKind::as_str));
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let sprites = kind.generate(&mut rng);

    match serde_json::to_string_pretty(&sprites) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to serialize {} overlay: {}", kind, e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the lights command
pub fn run_lights(width: f64) -> ExitCode {
    if !width.is_finite() || width < 0.0 {
        eprintln!("Error: --width must be a non-negative number (got {})", width);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    log::info!("bulb spacing {}px", BULB_SPACING);
    println!("{}", light_bulb_count(width));
    ExitCode::from(EXIT_SUCCESS)
}
