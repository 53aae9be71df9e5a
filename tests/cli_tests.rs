//! CLI integration tests
//!
//! These tests run the snowglobe binary and check exit codes, stdout and the
//! images it writes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use tempfile::TempDir;

fn snowglobe(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_snowglobe"))
        .args(args)
        .current_dir(dir)
        // Keep discovery away from the user's real config
        .env("XDG_CONFIG_HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute snowglobe")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_render_gif_with_switch() {
    let temp = TempDir::new().expect("should create temp dir");
    let out = temp.path().join("snow.gif");

    let output = snowglobe(
        temp.path(),
        &[
            "render",
            "-o",
            out.to_str().unwrap(),
            "--frames",
            "4",
            "--size",
            "40x30",
            "--seed",
            "1",
            "--switch",
            "2:warm",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Saved:"));

    let file = fs::File::open(&out).expect("gif should exist");
    let frames = GifDecoder::new(std::io::BufReader::new(file))
        .expect("should decode gif")
        .into_frames()
        .collect_frames()
        .expect("should decode frames");
    assert_eq!(frames.len(), 4);
    assert_eq!(frames[0].buffer().dimensions(), (40, 30));
}

#[test]
fn test_render_png_default_path() {
    let temp = TempDir::new().expect("should create temp dir");

    let output = snowglobe(
        temp.path(),
        &["render", "--png", "--effect", "classic", "--frames", "2", "--size", "24x16", "--seed", "2"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let image = image::open(temp.path().join("snowglobe_classic.png")).expect("png should exist");
    assert_eq!((image.width(), image.height()), (24, 16));
}

#[test]
fn test_render_is_reproducible_with_seed() {
    let temp = TempDir::new().expect("should create temp dir");
    let args = |name: &str| {
        vec![
            "render".to_string(),
            "--png".to_string(),
            "-o".to_string(),
            name.to_string(),
            "--frames".to_string(),
            "5".to_string(),
            "--size".to_string(),
            "32x32".to_string(),
            "--seed".to_string(),
            "99".to_string(),
        ]
    };

    for name in ["a.png", "b.png"] {
        let args = args(name);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        assert!(snowglobe(temp.path(), &args).status.success());
    }

    let a = image::open(temp.path().join("a.png")).unwrap().to_rgba8();
    let b = image::open(temp.path().join("b.png")).unwrap().to_rgba8();
    assert_eq!(a, b);
}

#[test]
fn test_render_uses_discovered_config() {
    let temp = TempDir::new().expect("should create temp dir");
    fs::write(
        temp.path().join("snowglobe.toml"),
        "[canvas]\nwidth = 20\nheight = 10\n\n[animation]\neffect = \"warm\"\nframes = 2\nseed = 5\n",
    )
    .unwrap();

    let output = snowglobe(temp.path(), &["render", "--png"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let image = image::open(temp.path().join("snowglobe_warm.png")).expect("png should exist");
    assert_eq!((image.width(), image.height()), (20, 10));
}

#[test]
fn test_render_invalid_config_lists_problems() {
    let temp = TempDir::new().expect("should create temp dir");
    let config = temp.path().join("bad.toml");
    fs::write(&config, "[animation]\nframes = 0\n\n[effects.winter]\npalette = []\n").unwrap();

    let output = snowglobe(temp.path(), &["render", "--config", config.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Config validation failed"));
    assert!(err.contains("animation.frames"));
    assert!(err.contains("palette must contain"));
}

#[test]
fn test_render_unknown_effect_suggests() {
    let temp = TempDir::new().expect("should create temp dir");
    let output = snowglobe(temp.path(), &["render", "--effect", "wintr"]);

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Unknown effect 'wintr'"));
    assert!(err.contains("Did you mean 'winter'?"));
}

#[test]
fn test_render_bad_switch_and_size() {
    let temp = TempDir::new().expect("should create temp dir");
    assert_eq!(snowglobe(temp.path(), &["render", "--switch", "warm"]).status.code(), Some(2));
    assert_eq!(snowglobe(temp.path(), &["render", "--size", "big"]).status.code(), Some(2));
}

#[test]
fn test_effects_list_and_show() {
    let temp = TempDir::new().expect("should create temp dir");

    let list = snowglobe(temp.path(), &["effects", "list"]);
    assert!(list.status.success());
    let text = stdout(&list);
    for name in ["winter", "classic", "warm"] {
        assert!(text.contains(name));
    }

    let show = snowglobe(temp.path(), &["effects", "show", "warm"]);
    assert!(show.status.success());
    let text = stdout(&show);
    assert!(text.contains("particles  80"));
    assert!(text.contains("glow-strong"));
    assert!(text.contains("rgba(255, 215, 0, 0.8)"));

    let unknown = snowglobe(temp.path(), &["effects", "show", "blizzard"]);
    assert_eq!(unknown.status.code(), Some(2));
}

#[test]
fn test_overlay_json() {
    let temp = TempDir::new().expect("should create temp dir");
    let output = snowglobe(temp.path(), &["overlay", "embers", "--seed", "3"]);

    assert!(output.status.success());
    let sprites: serde_json::Value = serde_json::from_str(&stdout(&output)).expect("valid JSON");
    let sprites = sprites.as_array().expect("array");
    assert_eq!(sprites.len(), 25);
    for sprite in sprites {
        let left = sprite["left_pct"].as_f64().unwrap();
        assert!((40.0..60.0).contains(&left));
        assert_eq!(sprite["bottom_pct"].as_f64(), Some(0.0));
    }

    let unknown = snowglobe(temp.path(), &["overlay", "confeti"]);
    assert_eq!(unknown.status.code(), Some(2));
    assert!(stderr(&unknown).contains("Did you mean 'confetti'?"));
}

#[test]
fn test_lights() {
    let temp = TempDir::new().expect("should create temp dir");
    let output = snowglobe(temp.path(), &["lights", "--width", "1000"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "25");
}
