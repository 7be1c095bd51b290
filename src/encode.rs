//! Lossless PNG encoding of readback buffers (RGB, 8 bits per channel).

use crate::rendering::PixelBuffer;
use crate::{Error, Result};

/// Encode an RGB24 buffer as PNG bytes.
pub fn encode_png_rgb8(pixels: &PixelBuffer) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixels.width(), pixels.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixels.as_bytes())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Decode PNG bytes produced by `encode_png_rgb8`.
///
/// Only 8-bit RGB images are accepted.
pub fn decode_png_rgb8(bytes: &[u8]) -> Result<PixelBuffer> {
    let decoder = png::Decoder::new(bytes);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    if info.color_type != png::ColorType::Rgb || info.bit_depth != png::BitDepth::Eight {
        return Err(Error::RenderError(format!(
            "expected 8-bit RGB PNG, got {:?} at {:?}",
            info.color_type, info.bit_depth
        )));
    }
    buf.truncate(info.buffer_size());
    PixelBuffer::from_raw(info.width, info.height, buf)
}
