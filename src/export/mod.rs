//! Export orchestration.
//!
//! # Example
//!
//! ```no_run
//! use bulletin_export::capture::{HtmlPreview, ServerRenderBackend, ServerRenderConfig};
//! use bulletin_export::export::{ExportOptions, ExportProgress, Exporter};
//! use bulletin_export::{Document, ExportFormat};
//!
//! fn main() -> bulletin_export::Result<()> {
//!     let document = Document::from_json(&std::fs::read_to_string("bulletin.json")?)?;
//!     let mut preview = HtmlPreview::from_file("preview.html")?;
//!     let backend = ServerRenderBackend::new(ServerRenderConfig::new("http://localhost:3000"))?;
//!
//!     let options = ExportOptions::new().with_format(ExportFormat::Pdf);
//!     let mut progress = |p: &ExportProgress| println!("{:>3}% {}", p.percentage, p.message);
//!     let artifact = Exporter::new(&backend)
//!         .with_options(options)
//!         .run(&document, &mut preview, &mut progress)?;
//!     artifact.save_to("out")?;
//!     Ok(())
//! }
//! ```

mod cancel;
mod naming;
mod options;
mod orchestrator;
mod progress;

pub use cancel::CancellationToken;
pub use naming::{capture_file_name, sanitize_file_stem, FALLBACK_STEM};
pub use options::{ExportOptions, SectionSelection, SettleOptions};
pub use orchestrator::{run_export, Exporter};
pub use progress::{ExportProgress, NoProgress, ProgressObserver, ProgressTracker};
