//! PNG encoding for RGB tile rasters.
//!
//! Tiles are written as 8-bit truecolor (color type 2) with filter type 0 on
//! every scanline and a fixed deflate level, so the same pixels always encode
//! to the same bytes. Stored tiles can therefore be compared byte-for-byte.

use std::io::Write;

use crate::RenderError;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// IHDR color type for 8-bit RGB
const COLOR_TYPE_RGB: u8 = 2;

/// Create a PNG image from RGB pixel data (3 bytes per pixel).
///
/// # Arguments
/// - `pixels`: RGB pixel data in row-major order
/// - `width`: Image width in pixels
/// - `height`: Image height in pixels
pub fn create_png_rgb(pixels: &[u8], width: usize, height: usize) -> Result<Vec<u8>, RenderError> {
    if pixels.len() != width * height * 3 {
        return Err(RenderError::Encode(format!(
            "expected {} bytes for {}x{} RGB, got {}",
            width * height * 3,
            width,
            height,
            pixels.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr_data.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(COLOR_TYPE_RGB);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr_data);

    let idat_data = deflate_idat_rgb(pixels, width, height)
        .map_err(|e| RenderError::Encode(format!("IDAT compression failed: {}", e)))?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Header fields of an encoded PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
}

impl PngHeader {
    /// True for the 8-bit RGB layout produced by [`create_png_rgb`].
    pub fn is_rgb8(&self) -> bool {
        self.bit_depth == 8 && self.color_type == COLOR_TYPE_RGB
    }
}

/// Read the IHDR chunk without decoding pixel data.
pub fn read_png_header(data: &[u8]) -> Result<PngHeader, RenderError> {
    // signature (8) + length (4) + "IHDR" (4) + 13 bytes of header data
    if data.len() < 29 {
        return Err(RenderError::InvalidImage(format!(
            "truncated PNG ({} bytes)",
            data.len()
        )));
    }
    if data[0..8] != PNG_SIGNATURE {
        return Err(RenderError::InvalidImage("missing PNG signature".to_string()));
    }
    if &data[12..16] != b"IHDR" {
        return Err(RenderError::InvalidImage("first chunk is not IHDR".to_string()));
    }

    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);

    Ok(PngHeader {
        width,
        height,
        bit_depth: data[24],
        color_type: data[25],
    })
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate RGB image data for IDAT chunk.
fn deflate_idat_rgb(
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let row_len = width * 3;
    let mut uncompressed = Vec::with_capacity(height * (1 + row_len));
    for row in pixels.chunks_exact(row_len.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed)?;
    let compressed = encoder.finish()?;

    Ok(compressed)
}
