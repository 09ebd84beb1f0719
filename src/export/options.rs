//! Export options and configuration.

use std::time::Duration;

use super::CancellationToken;
use crate::capture::{CaptureOptions, QualityLevel, RasterFormat, ReadinessOptions};
use crate::error::{Error, Result};
use crate::package::{ExportFormat, PdfOptions};

/// Options for one export run.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Sections to export
    pub selection: SectionSelection,

    /// Artifact format
    pub format: ExportFormat,

    /// Options passed to the capture backend
    pub capture: CaptureOptions,

    /// PDF layout (PDF format only)
    pub pdf: PdfOptions,

    /// Settle timing after activating a section or page
    pub settle: SettleOptions,

    /// Image and font readiness timeouts
    pub readiness: ReadinessOptions,

    /// Optional cancellation signal
    pub cancel: Option<CancellationToken>,
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the section selection.
    pub fn with_sections(mut self, selection: SectionSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Export specific 0-based section indices.
    pub fn with_section_indices(mut self, indices: Vec<usize>) -> Self {
        self.selection = SectionSelection::Indices(indices);
        self
    }

    /// Set the artifact format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set capture options.
    pub fn with_capture(mut self, capture: CaptureOptions) -> Self {
        self.capture = capture;
        self
    }

    /// Set the capture scale from a quality preset.
    pub fn with_quality(mut self, level: QualityLevel) -> Self {
        self.capture = self.capture.with_quality(level);
        self
    }

    /// Embed JPEG rather than PNG captures in a PDF.
    pub fn with_pdf_images(mut self, format: RasterFormat) -> Self {
        self.capture = self.capture.with_format(format);
        self
    }

    /// Set PDF layout options.
    pub fn with_pdf(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set settle timing.
    pub fn with_settle(mut self, settle: SettleOptions) -> Self {
        self.settle = settle;
        self
    }

    /// Set readiness timeouts.
    pub fn with_readiness(mut self, readiness: ReadinessOptions) -> Self {
        self.readiness = readiness;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Fallback delays used when the view cannot signal render completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleOptions {
    /// Wait after activating a section
    pub activation_delay: Duration,

    /// Wait before locating each page
    pub page_delay: Duration,
}

impl SettleOptions {
    /// No waiting at all.
    pub fn immediate() -> Self {
        Self {
            activation_delay: Duration::ZERO,
            page_delay: Duration::ZERO,
        }
    }
}

impl Default for SettleOptions {
    fn default() -> Self {
        Self {
            activation_delay: Duration::from_millis(500),
            page_delay: Duration::from_millis(150),
        }
    }
}

/// Which sections to export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SectionSelection {
    /// Every section, in order
    #[default]
    All,
    /// Specific sections (0-based)
    Indices(Vec<usize>),
}

impl SectionSelection {
    /// Resolve to sorted, de-duplicated 0-based indices.
    pub fn resolve(&self, section_count: usize) -> Result<Vec<usize>> {
        let indices = match self {
            SectionSelection::All => (0..section_count).collect::<Vec<_>>(),
            SectionSelection::Indices(indices) => {
                if let Some(bad) = indices.iter().find(|i| **i >= section_count) {
                    return Err(Error::InvalidSelection(format!(
                        "section {} does not exist (document has {} sections)",
                        bad + 1,
                        section_count
                    )));
                }
                let mut indices = indices.clone();
                indices.sort_unstable();
                indices.dedup();
                indices
            }
        };

        if indices.is_empty() {
            return Err(Error::InvalidSelection("no sections to export".to_string()));
        }
        Ok(indices)
    }

    /// Parse a 1-based selection string (e.g., "all", "2", "1,3,5-7").
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(SectionSelection::All);
        }

        let mut indices = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((a, b)) => (parse_section_number(a)?, parse_section_number(b)?),
                None => {
                    let n = parse_section_number(part)?;
                    (n, n)
                }
            };
            if start > end {
                return Err(format!("Invalid section range: {}", part));
            }
            indices.extend((start..=end).map(|n| n - 1));
        }

        indices.sort_unstable();
        indices.dedup();
        Ok(SectionSelection::Indices(indices))
    }
}

fn parse_section_number(s: &str) -> std::result::Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Section numbers start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("Invalid section number: {}", s.trim())),
    }
}
