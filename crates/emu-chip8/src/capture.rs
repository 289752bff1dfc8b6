//! Headless capture: PNG screenshots and ASCII display dumps.

use std::error::Error;
use std::fs;
use std::io::BufWriter;
use std::path::Path;

use chip8_core::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// Lit pixel colour, RGBA (the classic green-on-black phosphor look).
const PIXEL_ON: [u8; 4] = [0x00, 0xFF, 0x00, 0xFF];
/// Dark pixel colour, RGBA.
const PIXEL_OFF: [u8; 4] = [0x00, 0x00, 0x00, 0xFF];

/// Save the current display as a 64x32 RGBA PNG.
pub fn save_screenshot(chip: &Chip8, path: &Path) -> Result<(), Box<dyn Error>> {
    let file = fs::File::create(path)?;
    let w = BufWriter::new(file);
    let mut encoder = png::Encoder::new(w, DISPLAY_WIDTH as u32, DISPLAY_HEIGHT as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;

    let mut rgba = Vec::with_capacity(DISPLAY_WIDTH * DISPLAY_HEIGHT * 4);
    for &px in chip.display() {
        let colour = if px != 0 { PIXEL_ON } else { PIXEL_OFF };
        rgba.extend_from_slice(&colour);
    }

    writer.write_image_data(&rgba)?;
    Ok(())
}

/// Render the display as text, one line per row, `#` for lit pixels.
#[must_use]
pub fn ascii_dump(chip: &Chip8) -> String {
    let mut out = String::with_capacity((DISPLAY_WIDTH + 1) * DISPLAY_HEIGHT);
    for y in 0..DISPLAY_HEIGHT {
        for x in 0..DISPLAY_WIDTH {
            out.push(if chip.pixel(x, y) { '#' } else { ' ' });
        }
        out.push('\n');
    }
    out
}
