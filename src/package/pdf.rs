//! PDF assembly of captured images.
//!
//! Two layout modes, kept separate:
//!
//! - **Auto**: one page per image, sized exactly to the image's pixel
//!   dimensions (96 px per inch), image filling the page.
//! - **Fixed** (A4, Letter, Legal): images aspect-fit and centered inside
//!   the margins. With `sections_per_page > 1` each page is split into a
//!   grid of cells and every cell holds one image, fitted independently.

use std::io::Write;
use std::str::FromStr;

use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as PdfDocument, Object, StringFormat, Stream};

use super::CapturedImage;
use crate::error::{Error, Result};

/// Millimetres per CSS pixel (96 px per inch).
pub const PX_TO_MM: f32 = 25.4 / 96.0;

/// PDF points per millimetre.
pub const MM_TO_PT: f32 = 72.0 / 25.4;

/// Target page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// Each page matches its image
    #[default]
    Auto,
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait dimensions in millimetres; `None` for auto.
    pub fn dimensions_mm(&self) -> Option<(f32, f32)> {
        match self {
            PageSize::Auto => None,
            PageSize::A4 => Some((210.0, 297.0)),
            PageSize::Letter => Some((215.9, 279.4)),
            PageSize::Legal => Some((215.9, 355.6)),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(PageSize::Auto),
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!("unknown page size: {}", other)),
        }
    }
}

/// Page orientation for fixed page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// PDF layout options.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// Page size
    pub page_size: PageSize,

    /// Orientation (fixed sizes only)
    pub orientation: Orientation,

    /// Margin in mm (fixed sizes only)
    pub margin_mm: f32,

    /// Images per page; grid layout when greater than 1 (fixed sizes only)
    pub sections_per_page: usize,

    /// Gap between grid cells in mm
    pub gap_mm: f32,
}

impl PdfOptions {
    /// Create PDF options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the orientation.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the margin in mm.
    pub fn with_margin(mut self, margin_mm: f32) -> Self {
        self.margin_mm = margin_mm.max(0.0);
        self
    }

    /// Set how many images share a page.
    pub fn with_sections_per_page(mut self, count: usize) -> Self {
        self.sections_per_page = count.max(1);
        self
    }

    /// Set the grid gap in mm.
    pub fn with_gap(mut self, gap_mm: f32) -> Self {
        self.gap_mm = gap_mm.max(0.0);
        self
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::Auto,
            orientation: Orientation::Portrait,
            margin_mm: 10.0,
            sections_per_page: 1,
            gap_mm: 5.0,
        }
    }
}

/// Where one image lands on a page, in PDF points (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index into the image list
    pub image: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One planned PDF page.
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    /// Page width in points
    pub width_pt: f32,
    /// Page height in points
    pub height_pt: f32,
    /// Images drawn on this page
    pub placements: Vec<Placement>,
}

/// Plan pages for images with the given pixel dimensions.
pub fn plan_layout(dims: &[(u32, u32)], options: &PdfOptions) -> Vec<PagePlan> {
    let Some((w_mm, h_mm)) = options.page_size.dimensions_mm() else {
        return dims
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| {
                let width_pt = w as f32 * PX_TO_MM * MM_TO_PT;
                let height_pt = h as f32 * PX_TO_MM * MM_TO_PT;
                PagePlan {
                    width_pt,
                    height_pt,
                    placements: vec![Placement {
                        image: i,
                        x: 0.0,
                        y: 0.0,
                        width: width_pt,
                        height: height_pt,
                    }],
                }
            })
            .collect();
    };

    let (page_w, page_h) = match options.orientation {
        Orientation::Portrait => (w_mm * MM_TO_PT, h_mm * MM_TO_PT),
        Orientation::Landscape => (h_mm * MM_TO_PT, w_mm * MM_TO_PT),
    };
    let margin = options.margin_mm * MM_TO_PT;
    let gap = options.gap_mm * MM_TO_PT;
    let per_page = options.sections_per_page.max(1);
    let cols = (per_page as f32).sqrt().ceil() as usize;
    let rows = per_page.div_ceil(cols);

    let content_w = (page_w - 2.0 * margin).max(1.0);
    let content_h = (page_h - 2.0 * margin).max(1.0);
    let cell_w = ((content_w - gap * (cols - 1) as f32) / cols as f32).max(1.0);
    let cell_h = ((content_h - gap * (rows - 1) as f32) / rows as f32).max(1.0);

    dims.chunks(per_page)
        .enumerate()
        .map(|(page_no, chunk)| {
            let placements = chunk
                .iter()
                .enumerate()
                .map(|(slot, &(iw, ih))| {
                    let (row, col) = (slot / cols, slot % cols);
                    let cell_x = margin + col as f32 * (cell_w + gap);
                    let cell_top = page_h - margin - row as f32 * (cell_h + gap);
                    let (width, height) = fit(iw, ih, cell_w, cell_h);
                    Placement {
                        image: page_no * per_page + slot,
                        x: cell_x + (cell_w - width) / 2.0,
                        y: cell_top - cell_h + (cell_h - height) / 2.0,
                        width,
                        height,
                    }
                })
                .collect();
            PagePlan {
                width_pt: page_w,
                height_pt: page_h,
                placements,
            }
        })
        .collect()
}

/// Scale `(iw, ih)` to fit inside `(box_w, box_h)` keeping aspect ratio.
fn fit(iw: u32, ih: u32, box_w: f32, box_h: f32) -> (f32, f32) {
    let (iw, ih) = (iw.max(1) as f32, ih.max(1) as f32);
    let scale = (box_w / iw).min(box_h / ih);
    (iw * scale, ih * scale)
}

/// An image decoded and ready to embed.
struct EmbeddedImage {
    width: u32,
    height: u32,
    stream: Stream,
    smask: Option<Stream>,
}

fn embed_image(image: &CapturedImage, position: usize) -> Result<EmbeddedImage> {
    let decode_err = |e: image::ImageError| {
        Error::ImageDecode(format!("{} (image {}): {}", image.file_name, position + 1, e))
    };
    let format = image::guess_format(&image.bytes).map_err(decode_err)?;
    let decoded = image::load_from_memory_with_format(&image.bytes, format).map_err(decode_err)?;
    let (width, height) = decoded.dimensions();

    // CMYK and other component layouts are decoded to RGB by `image`, so
    // only gray and RGB scans can be passed through as DCT streams.
    let passthrough = if format == image::ImageFormat::Jpeg {
        jpeg_color_space(&image.bytes)
    } else {
        None
    };
    if let Some(color_space) = passthrough {
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(width as i64),
                "Height" => Object::Integer(height as i64),
                "ColorSpace" => color_space,
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            image.bytes.clone(),
        )
        .with_compression(false);
        return Ok(EmbeddedImage {
            width,
            height,
            stream,
            smask: None,
        });
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity(pixel_bytes(width, height, 3));
    let mut alpha = Vec::with_capacity(pixel_bytes(width, height, 1));
    let mut translucent = false;
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        translucent |= a != 255;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }

    let smask = if translucent {
        Some(
            Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => Object::Integer(width as i64),
                    "Height" => Object::Integer(height as i64),
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => Object::Integer(8),
                    "Filter" => "FlateDecode",
                },
                deflate(&alpha)?,
            )
            .with_compression(false),
        )
    } else {
        None
    };

    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(width as i64),
            "Height" => Object::Integer(height as i64),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => Object::Integer(8),
            "Filter" => "FlateDecode",
        },
        deflate(&rgb)?,
    )
    .with_compression(false);

    Ok(EmbeddedImage {
        width,
        height,
        stream,
        smask,
    })
}

/// Buffer length for a `width` x `height` raster, computed without `u32` overflow.
fn pixel_bytes(width: u32, height: u32, channels: usize) -> usize {
    width as usize * height as usize * channels
}

/// Number of colour components declared in a JPEG frame header.
fn jpeg_components(bytes: &[u8]) -> Option<u8> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            // standalone markers
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // length(2) precision(1) height(2) width(2) components(1)
            return bytes.get(pos + 9).copied();
        }
        pos += 2 + length;
    }
    None
}

/// PDF colour space for a JPEG that can be embedded as-is.
fn jpeg_color_space(bytes: &[u8]) -> Option<&'static str> {
    match jpeg_components(bytes)? {
        1 => Some("DeviceGray"),
        3 => Some("DeviceRGB"),
        _ => None,
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Lay captured images out as a PDF.
///
/// Any image that fails to decode aborts the whole document.
pub fn build_pdf(images: &[CapturedImage], options: &PdfOptions, title: &str) -> Result<Vec<u8>> {
    let embedded = images
        .iter()
        .enumerate()
        .map(|(i, image)| embed_image(image, i))
        .collect::<Result<Vec<_>>>()?;

    let dims: Vec<(u32, u32)> = embedded.iter().map(|e| (e.width, e.height)).collect();
    let plan = plan_layout(&dims, options);

    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut image_ids = Vec::with_capacity(embedded.len());
    for image in embedded {
        let mut stream = image.stream;
        if let Some(smask) = image.smask {
            let smask_id = doc.add_object(smask);
            stream.dict.set("SMask", smask_id);
        }
        image_ids.push(doc.add_object(stream));
    }

    let mut kids: Vec<Object> = Vec::with_capacity(plan.len());
    for page in &plan {
        let mut xobjects = Dictionary::new();
        let mut operations = Vec::new();
        for placement in &page.placements {
            let name = format!("Im{}", placement.image);
            xobjects.set(name.as_bytes().to_vec(), image_ids[placement.image]);
            operations.push(Operation::new("q", vec![]));
            operations.push(Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(placement.height),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ));
            operations.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            operations.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations }.encode()?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width_pt),
                Object::Real(page.height_pt),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => xobjects,
            },
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(plan.len() as i64),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => text_string(title),
        "Producer" => Object::string_literal(format!("bulletin-export {}", env!("CARGO_PKG_VERSION"))),
        "CreationDate" => Object::string_literal(Utc::now().format("D:%Y%m%d%H%M%SZ").to_string()),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

/// PDF text string: UTF-16BE with byte order mark.
fn text_string(s: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RasterFormat;
    use image::{Rgba, RgbaImage};

    fn png(width: u32, height: u32, alpha: u8) -> CapturedImage {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, alpha]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        CapturedImage {
            section_index: 0,
            page_index: 0,
            file_name: format!("{}x{}.png", width, height),
            format: RasterFormat::Png,
            bytes,
        }
    }

    fn number(obj: &Object) -> f32 {
        match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("not a number: {:?}", other),
        }
    }

    fn media_boxes(pdf: &[u8]) -> Vec<(f32, f32)> {
        let doc = PdfDocument::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|id| {
                let page = doc.get_dictionary(*id).unwrap();
                let mb = page.get(b"MediaBox").unwrap().as_array().unwrap();
                (number(&mb[2]), number(&mb[3]))
            })
            .collect()
    }

    #[test]
    fn test_auto_pages_match_image_pixels() {
        let images = vec![png(800, 600, 255), png(400, 1000, 255)];
        let pdf = build_pdf(&images, &PdfOptions::default(), "Boletín").unwrap();
        let boxes = media_boxes(&pdf);

        assert_eq!(boxes.len(), 2);
        // 800 px * 25.4/96 mm * 72/25.4 pt/mm = 600 pt
        assert!((boxes[0].0 - 600.0).abs() < 0.01);
        assert!((boxes[0].1 - 450.0).abs() < 0.01);
        assert!((boxes[1].0 / MM_TO_PT - 400.0 * PX_TO_MM).abs() < 0.01);
        assert!((boxes[1].1 / MM_TO_PT - 1000.0 * PX_TO_MM).abs() < 0.01);
    }

    #[test]
    fn test_auto_plan_fills_page() {
        let plan = plan_layout(&[(96, 192)], &PdfOptions::default());
        assert_eq!(plan.len(), 1);
        let p = plan[0].placements[0];
        assert_eq!((p.x, p.y), (0.0, 0.0));
        assert!((p.width - 72.0).abs() < 1e-3);
        assert!((p.height - 144.0).abs() < 1e-3);
    }

    #[test]
    fn test_auto_ignores_grid_setting() {
        let options = PdfOptions::new().with_sections_per_page(4);
        let plan = plan_layout(&[(10, 10), (10, 10), (10, 10)], &options);
        assert_eq!(plan.len(), 3);
    }

    #[test]
    fn test_fixed_a4_fit_and_center() {
        let options = PdfOptions::new().with_page_size(PageSize::A4).with_margin(0.0);
        let plan = plan_layout(&[(1000, 500)], &options);
        let page = &plan[0];
        assert!((page.width_pt - 210.0 * MM_TO_PT).abs() < 0.01);
        assert!((page.height_pt - 297.0 * MM_TO_PT).abs() < 0.01);

        let p = page.placements[0];
        assert!((p.width - page.width_pt).abs() < 0.01);
        assert!((p.height - page.width_pt / 2.0).abs() < 0.01);
        assert!(p.x.abs() < 0.01);
        let top_gap = page.height_pt - (p.y + p.height);
        assert!((top_gap - p.y).abs() < 0.01, "image should be vertically centered");
    }

    #[test]
    fn test_fixed_landscape_swaps_dimensions() {
        let options = PdfOptions::new()
            .with_page_size(PageSize::Letter)
            .with_orientation(Orientation::Landscape);
        let plan = plan_layout(&[(10, 10)], &options);
        assert!(plan[0].width_pt > plan[0].height_pt);
    }

    #[test]
    fn test_grid_layout_tiles_images() {
        let options = PdfOptions::new()
            .with_page_size(PageSize::A4)
            .with_sections_per_page(4);
        let dims = vec![(100, 100); 6];
        let plan = plan_layout(&dims, &options);

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].placements.len(), 4);
        assert_eq!(plan[1].placements.len(), 2);
        let order: Vec<usize> = plan
            .iter()
            .flat_map(|p| p.placements.iter().map(|pl| pl.image))
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);

        let first = plan[0].placements[0];
        let second = plan[0].placements[1];
        let third = plan[0].placements[2];
        assert!(second.x > first.x, "second image sits to the right");
        assert!((second.y - first.y).abs() < 0.01);
        assert!(third.y < first.y, "third image starts the next row");

        let margin = 10.0 * MM_TO_PT;
        for p in &plan[0].placements {
            assert!(p.x >= margin - 0.01);
            assert!(p.x + p.width <= plan[0].width_pt - margin + 0.01);
        }
    }

    #[test]
    fn test_translucent_png_gets_smask() {
        let pdf = build_pdf(&[png(4, 4, 128)], &PdfOptions::default(), "t").unwrap();
        let doc = PdfDocument::load_mem(&pdf).unwrap();
        let has_smask = doc.objects.values().any(|o| match o {
            Object::Stream(s) => s.dict.get(b"SMask").is_ok(),
            _ => false,
        });
        assert!(has_smask);
    }

    #[test]
    fn test_jpeg_embedded_as_dct() {
        let mut bytes = Vec::new();
        image::RgbImage::from_pixel(8, 8, image::Rgb([1, 2, 3]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        let image = CapturedImage {
            section_index: 0,
            page_index: 0,
            file_name: "a.jpg".to_string(),
            format: RasterFormat::Jpeg,
            bytes,
        };
        let pdf = build_pdf(&[image], &PdfOptions::default(), "t").unwrap();
        let doc = PdfDocument::load_mem(&pdf).unwrap();
        let dct = doc.objects.values().any(|o| match o {
            Object::Stream(s) => matches!(
                s.dict.get(b"Filter"),
                Ok(Object::Name(n)) if n == b"DCTDecode"
            ),
            _ => false,
        });
        assert!(dct);
    }

    #[test]
    fn test_decode_failure_aborts() {
        let bad = CapturedImage {
            section_index: 0,
            page_index: 1,
            file_name: "broken.png".to_string(),
            format: RasterFormat::Png,
            bytes: b"definitely not an image".to_vec(),
        };
        let result = build_pdf(&[png(2, 2, 255), bad], &PdfOptions::default(), "t");
        match result {
            Err(Error::ImageDecode(msg)) => assert!(msg.contains("broken.png")),
            other => panic!("Expected decode error, got {:?}", other.map(|b| b.len())),
        }
    }

    fn jpeg_bytes(image: image::DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn frame_component_offset(bytes: &[u8]) -> usize {
        let sof = bytes
            .windows(4)
            .position(|w| w == [0xFF, 0xC0, 0x00, 0x11])
            .expect("baseline frame header");
        sof + 9
    }

    #[test]
    fn test_jpeg_components_from_frame_header() {
        let rgb = jpeg_bytes(image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([10, 20, 30]),
        )));
        let gray = jpeg_bytes(image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            8,
            8,
            image::Luma([90]),
        )));

        assert_eq!(jpeg_components(&rgb), Some(3));
        assert_eq!(jpeg_color_space(&rgb), Some("DeviceRGB"));
        assert_eq!(jpeg_components(&gray), Some(1));
        assert_eq!(jpeg_color_space(&gray), Some("DeviceGray"));
        assert_eq!(jpeg_components(b"\x89PNG"), None);
        assert_eq!(jpeg_components(&[0xFF, 0xD8, 0xFF]), None);
    }

    #[test]
    fn test_four_component_jpeg_not_passed_through() {
        let mut bytes = jpeg_bytes(image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([10, 20, 30]),
        )));
        let offset = frame_component_offset(&bytes);
        bytes[offset] = 4;

        assert_eq!(jpeg_components(&bytes), Some(4));
        assert_eq!(jpeg_color_space(&bytes), None);
    }

    #[test]
    fn test_gray_jpeg_embedded_as_gray_dct() {
        let bytes = jpeg_bytes(image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            8,
            8,
            image::Luma([90]),
        )));
        let capture = CapturedImage {
            section_index: 0,
            page_index: 0,
            file_name: "gray.jpg".to_string(),
            format: RasterFormat::Jpeg,
            bytes,
        };
        let embedded = embed_image(&capture, 0).unwrap();
        assert!(matches!(
            embedded.stream.dict.get(b"ColorSpace"),
            Ok(Object::Name(n)) if n == b"DeviceGray"
        ));
        assert!(matches!(
            embedded.stream.dict.get(b"Filter"),
            Ok(Object::Name(n)) if n == b"DCTDecode"
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_pixel_bytes_exceeds_u32() {
        assert_eq!(pixel_bytes(70_000, 70_000, 3), 14_700_000_000);
        assert_eq!(pixel_bytes(70_000, 70_000, 1), 4_900_000_000);
        assert_eq!(pixel_bytes(4, 2, 3), 24);
    }

    #[test]
    fn test_page_size_parse() {
        assert_eq!("A4".parse::<PageSize>(), Ok(PageSize::A4));
        assert_eq!("legal".parse::<PageSize>(), Ok(PageSize::Legal));
        assert!("tabloid".parse::<PageSize>().is_err());
    }
}
