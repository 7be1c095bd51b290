/// Off-screen render targets, the active-target slot and pixel readback

use crate::{Error, Result};

/// Bits of precision kept in the depth attachment.
pub const DEPTH_BITS: u32 = 24;
/// Depth value a cleared target holds (farthest).
pub const DEPTH_FAR: u32 = (1 << DEPTH_BITS) - 1;

const RGBA_CHANNELS: usize = 4;
const RGB_CHANNELS: usize = 3;

/// Identity of a render texture allocated from a `RenderContext`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(u64);

/// An off-screen color buffer with a 24-bit depth attachment.
///
/// Rows are stored top to bottom, RGBA8 interleaved.
#[derive(Debug)]
pub struct RenderTexture {
    id: TargetId,
    width: u32,
    height: u32,
    color: Vec<u8>,
    depth: Vec<u32>,
}

impl RenderTexture {
    pub fn id(&self) -> TargetId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill color with an opaque color and reset depth to far.
    pub fn clear(&mut self, rgb: [u8; 3]) {
        for px in self.color.chunks_exact_mut(RGBA_CHANNELS) {
            px.copy_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        self.depth.fill(DEPTH_FAR);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.color[i..i + RGBA_CHANNELS]);
        Some(out)
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y as usize * self.width as usize + x as usize])
    }

    /// Depth-tested write (less-or-equal). `depth` is already quantized.
    /// Translucent colors are blended over what is already there.
    pub(crate) fn plot(&mut self, x: u32, y: u32, depth: u32, rgba: [u8; 4]) {
        let idx = y as usize * self.width as usize + x as usize;
        if depth > self.depth[idx] {
            return;
        }
        self.depth[idx] = depth;
        let i = idx * RGBA_CHANNELS;
        let dst = &mut self.color[i..i + RGBA_CHANNELS];
        let a = rgba[3] as u32;
        for c in 0..3 {
            dst[c] = ((rgba[c] as u32 * a + dst[c] as u32 * (255 - a) + 127) / 255) as u8;
        }
        dst[3] = 255;
    }
}

/// Host-side RGB24 pixel buffer, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height, RGB_CHANNELS)?;
        Ok(Self { width, height, data: vec![0; len] })
    }

    /// Wrap tightly packed RGB24 bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height, RGB_CHANNELS)?;
        if data.len() != expected {
            return Err(Error::RenderError(format!(
                "pixel buffer requires {} bytes for {}x{} RGB, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * RGB_CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

/// A rectangle of pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Owns the single "currently active render target" slot.
///
/// Readback always reads from whichever texture is active, so callers that
/// install an off-screen target must put the previous one back when done.
#[derive(Debug, Default)]
pub struct RenderContext {
    active: Option<TargetId>,
    next_id: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<TargetId> {
        self.active
    }

    /// Make `target` active, returning the previously active target.
    pub fn set_active(&mut self, target: Option<TargetId>) -> Option<TargetId> {
        std::mem::replace(&mut self.active, target)
    }

    /// Allocate a cleared off-screen texture with a depth attachment.
    pub fn allocate_texture(&mut self, width: u32, height: u32) -> Result<RenderTexture> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResolution { width: width as i64, height: height as i64 });
        }
        let color_len = buffer_len(width, height, RGBA_CHANNELS)?;
        let depth_len = buffer_len(width, height, 1)?;
        self.next_id += 1;
        Ok(RenderTexture {
            id: TargetId(self.next_id),
            width,
            height,
            color: vec![0; color_len],
            depth: vec![DEPTH_FAR; depth_len],
        })
    }

    /// Copy `src` of the active target into `dst` at `(dst_x, dst_y)`, dropping alpha.
    pub fn read_pixels(
        &self,
        texture: &RenderTexture,
        src: PixelRect,
        dst: &mut PixelBuffer,
        dst_x: u32,
        dst_y: u32,
    ) -> Result<()> {
        if self.active != Some(texture.id) {
            return Err(Error::RenderError("readback source is not the active render target".into()));
        }
        let fits = |start: u32, len: u32, limit: u32| start.checked_add(len).map_or(false, |end| end <= limit);
        if !fits(src.x, src.width, texture.width)
            || !fits(src.y, src.height, texture.height)
            || !fits(dst_x, src.width, dst.width)
            || !fits(dst_y, src.height, dst.height)
        {
            return Err(Error::RenderError(format!(
                "readback rect {:?} does not fit {}x{} source / {}x{} destination",
                src, texture.width, texture.height, dst.width, dst.height
            )));
        }

        for row in 0..src.height {
            let sy = (src.y + row) as usize;
            let dy = (dst_y + row) as usize;
            for col in 0..src.width {
                let s = (sy * texture.width as usize + (src.x + col) as usize) * RGBA_CHANNELS;
                let d = (dy * dst.width as usize + (dst_x + col) as usize) * RGB_CHANNELS;
                dst.data[d..d + RGB_CHANNELS].copy_from_slice(&texture.color[s..s + RGB_CHANNELS]);
            }
        }
        Ok(())
    }
}

fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(channels))
        .ok_or(Error::InvalidResolution { width: width as i64, height: height as i64 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_textures_are_distinct_and_cleared_far() {
        let mut ctx = RenderContext::new();
        let a = ctx.allocate_texture(4, 2).unwrap();
        let b = ctx.allocate_texture(4, 2).unwrap();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.depth_at(3, 1), Some(DEPTH_FAR));
        assert_eq!(a.pixel(4, 0), None);
    }

    #[test]
    fn zero_sized_textures_are_rejected() {
        let mut ctx = RenderContext::new();
        assert!(matches!(ctx.allocate_texture(0, 10), Err(Error::InvalidResolution { .. })));
    }

    #[test]
    fn set_active_returns_previous() {
        let mut ctx = RenderContext::new();
        let t = ctx.allocate_texture(1, 1).unwrap();
        assert_eq!(ctx.set_active(Some(t.id())), None);
        assert_eq!(ctx.set_active(None), Some(t.id()));
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn plot_respects_depth() {
        let mut ctx = RenderContext::new();
        let mut t = ctx.allocate_texture(1, 1).unwrap();
        t.clear([0, 0, 0]);
        t.plot(0, 0, 100, [255, 0, 0, 255]);
        t.plot(0, 0, 200, [0, 255, 0, 255]);
        assert_eq!(t.pixel(0, 0), Some([255, 0, 0, 255]));
        t.plot(0, 0, 50, [0, 0, 255, 255]);
        assert_eq!(t.pixel(0, 0), Some([0, 0, 255, 255]));
    }

    #[test]
    fn readback_requires_active_target() {
        let mut ctx = RenderContext::new();
        let mut t = ctx.allocate_texture(2, 2).unwrap();
        t.clear([10, 20, 30]);
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        assert!(ctx.read_pixels(&t, PixelRect::full(2, 2), &mut buf, 0, 0).is_err());

        ctx.set_active(Some(t.id()));
        ctx.read_pixels(&t, PixelRect::full(2, 2), &mut buf, 0, 0).unwrap();
        assert_eq!(buf.pixel(1, 1), Some([10, 20, 30]));
        assert_eq!(buf.as_bytes().len(), 12);
    }

    #[test]
    fn readback_rejects_out_of_bounds_rect() {
        let mut ctx = RenderContext::new();
        let t = ctx.allocate_texture(2, 2).unwrap();
        ctx.set_active(Some(t.id()));
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        let rect = PixelRect { x: 1, y: 0, width: 2, height: 2 };
        assert!(ctx.read_pixels(&t, rect, &mut buf, 0, 0).is_err());
    }

    #[test]
    fn from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 11]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 12]).is_ok());
    }
}
