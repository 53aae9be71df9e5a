//! PNG output and output path handling

use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Output container chosen for a render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Every frame as an animated GIF
    Gif,
    /// Only the last frame as a PNG
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Gif => "gif",
            OutputFormat::Png => "png",
        }
    }
}

/// Create the parent directory of `path` if it doesn't exist yet.
pub(crate) fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Resolve where a render should be written.
///
/// - No output given: `snowglobe_{effect}.{ext}` in the working directory
/// - Output ends with `/` or is an existing directory: `dir/{effect}.{ext}`
/// - Otherwise the path is used as given
pub fn output_path(output: Option<&Path>, effect: &str, format: OutputFormat) -> PathBuf {
    let ext = format.extension();
    match output {
        None => PathBuf::from(format!("snowglobe_{}.{}", effect, ext)),
        Some(path) => {
            let is_dir = path.to_string_lossy().ends_with('/') || path.is_dir();
            if is_dir {
                path.join(format!("{}.{}", effect, ext))
            } else {
                path.to_path_buf()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/frame.png");
        let image = RgbaImage::from_pixel(3, 2, Rgba([255, 215, 0, 255]));

        save_png(&image, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(*loaded.get_pixel(0, 0), Rgba([255, 215, 0, 255]));
    }

    #[test]
    fn test_output_path_default() {
        assert_eq!(
            output_path(None, "warm", OutputFormat::Gif),
            PathBuf::from("snowglobe_warm.gif")
        );
    }

    #[test]
    fn test_output_path_directory() {
        let dir = tempdir().unwrap();
        assert_eq!(
            output_path(Some(dir.path()), "winter", OutputFormat::Png),
            dir.path().join("winter.png")
        );
        assert_eq!(
            output_path(Some(Path::new("renders/")), "classic", OutputFormat::Gif),
            PathBuf::from("renders/classic.gif")
        );
    }

    #[test]
    fn test_output_path_file() {
        assert_eq!(
            output_path(Some(Path::new("out/snow.gif")), "winter", OutputFormat::Gif),
            PathBuf::from("out/snow.gif")
        );
    }
}
