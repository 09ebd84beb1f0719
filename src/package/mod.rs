//! Packaging of captured images into the final downloadable artifact.
//!
//! - one image and an image format: the image itself
//! - several images and an image format: a ZIP archive
//! - PDF format: a PDF laid out per [`PdfOptions`]

mod archive;
mod pdf;

pub use archive::build_zip;
pub use pdf::{
    build_pdf, plan_layout, Orientation, PagePlan, PageSize, PdfOptions, Placement, MM_TO_PT,
    PX_TO_MM,
};

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::capture::{CaptureOptions, RasterFormat};
use crate::error::{Error, Result};
use crate::export::sanitize_file_stem;

/// Requested export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
    Pdf,
}

impl ExportFormat {
    /// Raster encoding to capture pages with.
    ///
    /// Image formats dictate it; PDF uses whatever the capture options ask for.
    pub fn raster_format(&self, capture: &CaptureOptions) -> RasterFormat {
        match self {
            ExportFormat::Png => RasterFormat::Png,
            ExportFormat::Jpeg => RasterFormat::Jpeg,
            ExportFormat::Pdf => capture.format,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpeg" | "jpg" => Ok(ExportFormat::Jpeg),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Raster bytes for one captured page.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// 0-based section index
    pub section_index: usize,
    /// 0-based page index within the section
    pub page_index: usize,
    /// Generated file name
    pub file_name: String,
    /// Encoding of `bytes`
    pub format: RasterFormat,
    /// Encoded raster bytes
    pub bytes: Vec<u8>,
}

/// Kind of artifact produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Image,
    Zip,
    Pdf,
}

/// The final downloadable file.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested file name
    pub file_name: String,
    /// MIME type
    pub mime_type: &'static str,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// Number of captured pages it contains
    pub page_count: usize,
    /// File contents
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Save into `dir` under the artifact's file name, creating `dir` if needed.
    pub fn save_to<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        log::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// Turn captured images into an artifact.
///
/// Images are packaged in the order given.
pub fn package(
    images: Vec<CapturedImage>,
    format: ExportFormat,
    document_name: &str,
    pdf_options: &PdfOptions,
) -> Result<ExportArtifact> {
    if images.is_empty() {
        return Err(Error::NothingCaptured);
    }
    let stem = sanitize_file_stem(document_name);
    let page_count = images.len();

    if format == ExportFormat::Pdf {
        let bytes = build_pdf(&images, pdf_options, document_name)?;
        return Ok(ExportArtifact {
            file_name: format!("{}.pdf", stem),
            mime_type: "application/pdf",
            kind: ArtifactKind::Pdf,
            page_count,
            bytes,
        });
    }

    if page_count == 1 {
        let image = images.into_iter().next().ok_or(Error::NothingCaptured)?;
        return Ok(ExportArtifact {
            file_name: format!("{}.{}", stem, image.format.extension()),
            mime_type: image.format.mime_type(),
            kind: ArtifactKind::Image,
            page_count,
            bytes: image.bytes,
        });
    }

    Ok(ExportArtifact {
        file_name: format!("{}.zip", stem),
        mime_type: "application/zip",
        kind: ArtifactKind::Zip,
        page_count,
        bytes: build_zip(&images)?,
    })
}
