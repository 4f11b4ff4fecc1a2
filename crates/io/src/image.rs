// Classified-image decoding

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use lithoframe_core::ImageInput;

use crate::error::IoError;

/// Decode an image to flat RGB pixels plus its `Description` metadata blob.
/// Non-RGB inputs are converted; alpha is discarded. The description only
/// exists for PNGs (a `Description` text chunk); other formats yield `None`.
pub fn read_image(path: &Path) -> Result<ImageInput, IoError> {
    let decoded = image::open(path).map_err(|e| IoError::Image {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgb = decoded.to_rgb8();
    let pixels = rgb.pixels().map(|p| [p[0], p[1], p[2]]).collect();

    let description = if has_png_extension(path) {
        png_description(path)
    } else {
        None
    };
    Ok(ImageInput { pixels, description })
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// Pull the `Description` keyword out of the PNG's text chunks (tEXt, zTXt
/// or iTXt). Metadata is ancillary, so decoding problems yield `None`
/// rather than an error.
fn png_description(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder.read_info().ok()?;
    let info = reader.info();

    for chunk in &info.uncompressed_latin1_text {
        if chunk.keyword == "Description" {
            return Some(chunk.text.clone());
        }
    }
    for chunk in &info.compressed_latin1_text {
        if chunk.keyword == "Description" {
            return chunk.get_text().ok();
        }
    }
    for chunk in &info.utf8_text {
        if chunk.keyword == "Description" {
            return chunk.get_text().ok();
        }
    }
    None
}
