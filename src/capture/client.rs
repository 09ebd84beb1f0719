//! In-process rasterization backend.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use super::{CaptureBackend, CaptureOptions, CaptureTarget, RasterFormat};
use crate::error::{Error, Result};

/// Captures pages by asking the owning view to rasterize them directly.
///
/// No network round trip: the node is rasterized at the requested scale
/// and encoded in-process.
#[derive(Debug, Clone)]
pub struct ClientRasterBackend {
    background: [u8; 3],
}

impl ClientRasterBackend {
    /// Create a backend that flattens transparency over white.
    pub fn new() -> Self {
        Self {
            background: [255, 255, 255],
        }
    }

    /// Set the background used when flattening for JPEG.
    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }
}

impl Default for ClientRasterBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for ClientRasterBackend {
    fn name(&self) -> &str {
        "client"
    }

    fn capture(&self, target: &CaptureTarget, options: &CaptureOptions) -> Result<Vec<u8>> {
        let (width, height) = target.layout_size();
        if width == 0 || height == 0 {
            return Err(Error::Capture(format!(
                "section {} page {} has an empty layout box",
                target.section_index + 1,
                target.page_index + 1
            )));
        }

        let raster = target.node().rasterize(options.scale)?;
        log::debug!(
            "Rasterized section {} page {} at {}x{} (scale {})",
            target.section_index + 1,
            target.page_index + 1,
            raster.width(),
            raster.height(),
            options.scale
        );
        encode_raster(&raster, options, self.background)
    }
}

/// Encode an RGBA raster as PNG or JPEG.
///
/// JPEG has no alpha channel, so translucent pixels are composited over
/// `background` first.
pub fn encode_raster(
    raster: &RgbaImage,
    options: &CaptureOptions,
    background: [u8; 3],
) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match options.format {
        RasterFormat::Png => {
            PngEncoder::new(&mut out).write_image(
                raster.as_raw(),
                raster.width(),
                raster.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        RasterFormat::Jpeg => {
            let flat = flatten(raster, background);
            JpegEncoder::new_with_quality(&mut out, options.jpeg_quality_percent()).write_image(
                flat.as_raw(),
                flat.width(),
                flat.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
    }
    Ok(out.into_inner())
}

fn flatten(raster: &RgbaImage, background: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        let [r, g, b, a] = raster.get_pixel(x, y).0;
        let a = a as u16;
        let blend = |c: u8, bg: u8| ((c as u16 * a + bg as u16 * (255 - a)) / 255) as u8;
        image::Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RenderedNode;

    struct SolidNode {
        size: (u32, u32),
    }

    impl RenderedNode for SolidNode {
        fn outer_html(&self) -> String {
            "<section></section>".to_string()
        }

        fn layout_size(&self) -> (u32, u32) {
            self.size
        }

        fn rasterize(&self, scale: f32) -> Result<RgbaImage> {
            let w = (self.size.0 as f32 * scale).round() as u32;
            let h = (self.size.1 as f32 * scale).round() as u32;
            Ok(RgbaImage::from_pixel(w, h, image::Rgba([10, 120, 40, 255])))
        }
    }

    #[test]
    fn test_capture_png_at_scale() {
        let target = CaptureTarget::new(0, 0, Box::new(SolidNode { size: (40, 20) }));
        let options = CaptureOptions::new().with_scale(1.5);
        let bytes = ClientRasterBackend::new().capture(&target, &options).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), 60);
        assert_eq!(decoded.height(), 30);
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn test_capture_jpeg() {
        let target = CaptureTarget::new(0, 0, Box::new(SolidNode { size: (16, 16) }));
        let options = CaptureOptions::new()
            .with_scale(1.0)
            .with_format(RasterFormat::Jpeg);
        let bytes = ClientRasterBackend::new().capture(&target, &options).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_empty_layout_box_fails() {
        let target = CaptureTarget::new(2, 1, Box::new(SolidNode { size: (0, 100) }));
        let result = ClientRasterBackend::new().capture(&target, &CaptureOptions::default());
        match result {
            Err(Error::Capture(msg)) => assert!(msg.contains("section 3 page 2")),
            other => panic!("Expected capture error, got {:?}", other),
        }
    }

    #[test]
    fn test_flatten_transparent_over_background() {
        let raster = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 0]));
        let flat = flatten(&raster, [255, 255, 255]);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);

        let raster = RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        let flat = flatten(&raster, [255, 255, 255]);
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
