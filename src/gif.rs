//! Animated GIF export of a simulated run

use crate::output::{ensure_parent, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write `frames` as an infinitely looping GIF, `frame_ms` per frame.
///
/// GIF delays are stored in centiseconds, so `frame_ms` is rounded down to a
/// multiple of 10 with a floor of 10ms. An empty frame list writes nothing.
pub fn render_gif(frames: &[RgbaImage], frame_ms: u32, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    ensure_parent(path)?;
    let writer = BufWriter::new(File::create(path)?);
    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay_ms = (frame_ms / 10).max(1) * 10;
    for image in frames {
        let frame = Frame::from_parts(image.clone(), 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame)?;
    }

    Ok(())
}
