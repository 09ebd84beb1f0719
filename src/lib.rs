//! # bulletin-export
//!
//! Export pipeline for agroclimatic bulletins.
//!
//! A bulletin is an ordered list of sections; each section renders as one
//! or more printable pages. This library captures every rendered page as
//! a raster image, in order, and packages the result as a single image, a
//! ZIP archive or a PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bulletin_export::{load_document_file, BulletinExport, ExportFormat, HtmlPreview};
//!
//! fn main() -> bulletin_export::Result<()> {
//!     let document = load_document_file("bulletin.json")?;
//!     let mut preview = HtmlPreview::from_file("preview.html")?;
//!
//!     let artifact = BulletinExport::new()
//!         .with_format(ExportFormat::Pdf)
//!         .run(&document, &mut preview)?;
//!     artifact.save_to("out")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Pagination**: list and card fields overflow onto extra pages
//! - **Two capture strategies**: in-process rasterization or a headless rendering service
//! - **Packaging**: single image, ZIP archive, or PDF with grid layouts
//! - **Progress and cancellation**: monotonic percentages, cooperative cancel

pub mod capture;
pub mod content;
pub mod error;
pub mod export;
pub mod model;
pub mod package;

// Re-export commonly used types
pub use capture::{
    CaptureBackend, CaptureOptions, CaptureStrategy, CaptureTarget, ClientRasterBackend,
    HtmlPreview, QualityLevel, RasterFormat, RenderSurface, RenderedNode, ServerRenderBackend,
    ServerRenderConfig,
};
pub use content::{
    load_document, load_document_file, ContentKind, ContentProvider, ContentResponse,
    FileContentProvider, HttpContentProvider,
};
pub use error::{Error, Result};
pub use export::{
    run_export, CancellationToken, ExportOptions, ExportProgress, Exporter, NoProgress,
    ProgressObserver, SectionSelection, SettleOptions,
};
pub use model::{pages_for_section, total_pages, Block, Document, Field, FieldType, Section};
pub use package::{
    package, ArtifactKind, CapturedImage, ExportArtifact, ExportFormat, Orientation, PageSize,
    PdfOptions,
};

use std::path::Path;

/// Page count of every section, in order.
///
/// # Example
///
/// ```
/// use bulletin_export::{section_page_counts, Block, Document, Field, Section};
///
/// let mut doc = Document::new("Boletín");
/// doc.add_section(Section::new("Portada"));
/// doc.add_section(Section::new("Pronóstico").with_block(Block::with_fields(vec![Field::list(5, Some(2))])));
/// assert_eq!(section_page_counts(&doc), vec![1, 3]);
/// ```
pub fn section_page_counts(document: &Document) -> Vec<usize> {
    document.sections.iter().map(pages_for_section).collect()
}

/// Export a document file against a saved preview with default options.
///
/// Uses the in-process capture strategy.
///
/// # Example
///
/// ```no_run
/// use bulletin_export::export_files;
///
/// let artifact = export_files("bulletin.json", "preview.html").unwrap();
/// artifact.save_to("out").unwrap();
/// ```
pub fn export_files<P: AsRef<Path>, Q: AsRef<Path>>(
    document_path: P,
    preview_path: Q,
) -> Result<ExportArtifact> {
    let document = load_document_file(document_path)?;
    let mut preview = HtmlPreview::from_file(preview_path)?;
    BulletinExport::new().run(&document, &mut preview)
}

/// Builder for configuring and running an export.
///
/// # Example
///
/// ```no_run
/// use bulletin_export::{BulletinExport, CaptureStrategy, ExportFormat, HtmlPreview, QualityLevel};
///
/// let document = bulletin_export::load_document_file("bulletin.json")?;
/// let mut preview = HtmlPreview::from_file("preview.html")?;
/// let artifact = BulletinExport::new()
///     .with_strategy(CaptureStrategy::Server)
///     .with_render_url("http://localhost:3000")
///     .with_quality(QualityLevel::Ultra)
///     .with_format(ExportFormat::Png)
///     .run(&document, &mut preview)?;
/// # Ok::<(), bulletin_export::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct BulletinExport {
    strategy: CaptureStrategy,
    server: Option<ServerRenderConfig>,
    options: ExportOptions,
}

impl BulletinExport {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the capture strategy.
    pub fn with_strategy(mut self, strategy: CaptureStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the rendering service endpoint for the server strategy.
    pub fn with_render_url(mut self, endpoint: impl Into<String>) -> Self {
        self.server = Some(ServerRenderConfig::new(endpoint));
        self
    }

    /// Set the full rendering service configuration.
    pub fn with_server_config(mut self, config: ServerRenderConfig) -> Self {
        self.server = Some(config);
        self
    }

    /// Set the artifact format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.options = self.options.with_format(format);
        self
    }

    /// Set the quality preset.
    pub fn with_quality(mut self, level: QualityLevel) -> Self {
        self.options = self.options.with_quality(level);
        self
    }

    /// Restrict the export to some sections.
    pub fn with_sections(mut self, selection: SectionSelection) -> Self {
        self.options = self.options.with_sections(selection);
        self
    }

    /// Set PDF layout options.
    pub fn with_pdf(mut self, pdf: PdfOptions) -> Self {
        self.options = self.options.with_pdf(pdf);
        self
    }

    /// Replace all export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// The export options that will be used.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Run the export without progress reporting.
    pub fn run(self, document: &Document, surface: &mut dyn RenderSurface) -> Result<ExportArtifact> {
        self.run_with_progress(document, surface, &mut NoProgress)
    }

    /// Run the export, reporting progress to `progress`.
    pub fn run_with_progress(
        self,
        document: &Document,
        surface: &mut dyn RenderSurface,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ExportArtifact> {
        let backend = self.strategy.build(self.server)?;
        Exporter::new(backend.as_ref())
            .with_options(self.options)
            .run(document, surface, progress)
    }
}
