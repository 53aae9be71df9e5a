//! Render command implementation and helpers

use std::path::Path;
use std::process::ExitCode;

use image::RgbaImage;

use crate::color::parse_color;
use crate::config::loader::{load_config, merge_cli_overrides, CliOverrides, ConfigError};
use crate::effects::{EffectError, EffectKind};
use crate::gif::render_gif;
use crate::output::{output_path, save_png, OutputFormat};
use crate::particle::ParticleEngine;
use crate::raster::ImageSurface;
use crate::surface::Viewport;

use super::info::report_unknown;
use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Arguments of the render command, borrowed from the parsed CLI.
pub struct RenderArgs<'a> {
    pub output: Option<&'a Path>,
    pub effect: Option<&'a str>,
    pub frames: Option<u32>,
    pub size: Option<&'a str>,
    pub seed: Option<u64>,
    pub frame_ms: Option<u32>,
    pub background: Option<&'a str>,
    pub switches: &'a [String],
    pub png: bool,
    pub config: Option<&'a Path>,
}

/// A scheduled effect change: `kind` becomes active before `frame` is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Switch {
    pub frame: u32,
    pub kind: EffectKind,
}

/// Parse `WIDTHxHEIGHT`.
pub(crate) fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{}', expected WIDTHxHEIGHT", s))?;
    let parse = |v: &str| -> Result<u32, String> {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid size '{}', dimensions must be positive integers", s))
    };
    Ok((parse(w)?, parse(h)?))
}

/// Parse `FRAME:EFFECT`.
pub(crate) fn parse_switch(s: &str) -> Result<Switch, SwitchError> {
    let (frame, name) = s
        .split_once(':')
        .ok_or_else(|| SwitchError::Syntax(format!("invalid switch '{}', expected FRAME:EFFECT", s)))?;
    let frame = frame
        .trim()
        .parse::<u32>()
        .map_err(|_| SwitchError::Syntax(format!("invalid switch '{}', FRAME must be a frame number", s)))?;
    let kind = name.parse::<EffectKind>().map_err(SwitchError::Effect)?;
    Ok(Switch { frame, kind })
}

#[derive(Debug)]
pub(crate) enum SwitchError {
    Syntax(String),
    Effect(EffectError),
}

/// Report a bad effect name. Returns the exit code to use.
fn report_effect_error(e: &EffectError) -> ExitCode {
    match e {
        EffectError::Unknown { name, suggestion } => {
            report_unknown("effect", name, *suggestion, &EffectKind::names());
            ExitCode::from(EXIT_INVALID_ARGS)
        }
        other => {
            eprintln!("Error: {}", other);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the render command
pub fn run_render(args: RenderArgs<'_>) -> ExitCode {
    // Reject bad names before touching the config so the hint is about the flag
    if let Some(effect) = args.effect {
        if let Err(e) = effect.parse::<EffectKind>() {
            return report_effect_error(&e);
        }
    }

    let mut switches = Vec::with_capacity(args.switches.len());
    for raw in args.switches {
        match parse_switch(raw) {
            Ok(switch) => switches.push(switch),
            Err(SwitchError::Syntax(msg)) => {
                eprintln!("Error: {}", msg);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
            Err(SwitchError::Effect(e)) => return report_effect_error(&e),
        }
    }
    // Stable sort: for the same frame the last flag wins
    switches.sort_by_key(|s| s.frame);

    let size = match args.size.map(parse_size).transpose() {
        Ok(size) => size,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let mut config = match load_config(args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let overrides = CliOverrides {
        effect: args.effect.map(str::to_string),
        frames: args.frames,
        frame_ms: args.frame_ms,
        width: size.map(|(w, _)| w),
        height: size.map(|(_, h)| h),
        seed: args.seed,
        background: args.background.map(str::to_string),
    };
    if let Err(e) = merge_cli_overrides(&mut config, &overrides) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    // Both were validated above; a failure here is a bug in validation
    let registry = match config.effects.build_registry() {
        Ok(registry) => registry,
        Err(errors) => {
            eprintln!("Error: {}", ConfigError::Validation(errors));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let (kind, background) = match (
        config.animation.effect.parse::<EffectKind>(),
        parse_color(&config.canvas.background),
    ) {
        (Ok(kind), Ok(background)) => (kind, background),
        (Err(e), _) => return report_effect_error(&e),
        (_, Err(e)) => {
            eprintln!("Error: Invalid background '{}': {}", config.canvas.background, e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let seed = config.animation.seed.unwrap_or_else(|| fastrand::u64(..));
    let (width, height) = (config.canvas.width, config.canvas.height);
    let frame_count = config.animation.frames;
    log::info!("rendering {} frames of {} at {}x{}, seed {}", frame_count, kind, width, height, seed);

    for switch in switches.iter().filter(|s| s.frame >= frame_count) {
        log::warn!("switch to {} at frame {} is past the last frame, ignoring", switch.kind, switch.frame);
    }

    let mut engine =
        ParticleEngine::new(registry, Viewport::new(width as f64, height as f64), seed).with_effect(kind);
    let mut surface = ImageSurface::new(width, height, background);
    let frames = simulate(&mut engine, &mut surface, frame_count, &switches, !args.png);

    let format = if args.png { OutputFormat::Png } else { OutputFormat::Gif };
    let path = output_path(args.output, kind.as_str(), format);
    let result = match format {
        OutputFormat::Png => save_png(surface.image(), &path),
        OutputFormat::Gif => render_gif(&frames, config.animation.frame_ms, &path),
    };

    match result {
        Ok(()) => {
            println!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run `frame_count` frames, applying `switches` (sorted by frame) as they
/// come due. Returns a copy of every frame when `keep_frames` is set.
pub(crate) fn simulate(
    engine: &mut ParticleEngine,
    surface: &mut ImageSurface,
    frame_count: u32,
    switches: &[Switch],
    keep_frames: bool,
) -> Vec<RgbaImage> {
    let mut frames = Vec::new();
    let mut pending = switches.iter().peekable();

    for frame in 0..frame_count {
        while let Some(switch) = pending.next_if(|s| s.frame <= frame) {
            log::info!("frame {}: switching to {}", frame, switch.kind);
            engine.set_effect(switch.kind);
        }
        engine.advance_frame(surface);
        if keep_frames {
            frames.push(surface.image().clone());
        }
    }

    frames
}
