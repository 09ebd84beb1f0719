//! Capture backends: turning a located page node into raster bytes.
//!
//! Two interchangeable strategies sit behind [`CaptureBackend`]:
//!
//! - [`ClientRasterBackend`] rasterizes the node in-process, through the
//!   view layer that owns the rendered tree.
//! - [`ServerRenderBackend`] serializes the node to a self-contained HTML
//!   page and asks a headless rendering service to rasterize it.
//!
//! The orchestrator only ever calls [`CaptureBackend::capture`], so either
//! strategy can be selected at call time via [`CaptureStrategy`].

mod client;
mod preview;
mod readiness;
mod server;
mod target;

pub use client::{encode_raster, ClientRasterBackend};
pub use preview::{HtmlPreview, DEFAULT_CONTAINER_SELECTOR};
pub use readiness::{await_target_ready, ReadinessOptions, ReadinessReport};
pub use server::{build_standalone_html, ServerRenderBackend, ServerRenderConfig};
pub use target::{CaptureTarget, RenderSurface, RenderWait, RenderedNode};

use crate::error::{Error, Result};
use std::str::FromStr;

/// Raster encoding of a captured page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Png,
    Jpeg,
}

impl RasterFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Named quality presets.
///
/// Both backends map a preset to the same scale factor so output does not
/// depend on which strategy produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityLevel {
    Low,
    Medium,
    #[default]
    High,
    Ultra,
}

impl QualityLevel {
    /// Scale (device pixel ratio) applied when capturing.
    pub fn scale_factor(&self) -> f32 {
        match self {
            QualityLevel::Low => 1.0,
            QualityLevel::Medium => 1.5,
            QualityLevel::High => 2.0,
            QualityLevel::Ultra => 3.0,
        }
    }
}

impl FromStr for QualityLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityLevel::Low),
            "medium" => Ok(QualityLevel::Medium),
            "high" => Ok(QualityLevel::High),
            "ultra" => Ok(QualityLevel::Ultra),
            other => Err(format!("unknown quality level: {}", other)),
        }
    }
}

/// Options passed to every capture call.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureOptions {
    /// Output encoding
    pub format: RasterFormat,

    /// Scale / device scale factor
    pub scale: f32,

    /// JPEG quality in `0.0..=1.0`
    pub jpeg_quality: f32,
}

impl CaptureOptions {
    /// Create capture options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options whose scale follows a quality preset.
    pub fn from_quality(level: QualityLevel) -> Self {
        Self::default().with_quality(level)
    }

    /// Set the output encoding.
    pub fn with_format(mut self, format: RasterFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the scale from a quality preset.
    pub fn with_quality(mut self, level: QualityLevel) -> Self {
        self.scale = level.scale_factor();
        self
    }

    /// Set an explicit scale factor.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        self
    }

    /// Set JPEG quality, clamped to `0.0..=1.0`.
    pub fn with_jpeg_quality(mut self, quality: f32) -> Self {
        self.jpeg_quality = if quality.is_nan() {
            Self::DEFAULT_JPEG_QUALITY
        } else {
            quality.clamp(0.0, 1.0)
        };
        self
    }

    /// JPEG quality on the 1-100 scale used by encoders and the render service.
    pub fn jpeg_quality_percent(&self) -> u8 {
        ((self.jpeg_quality * 100.0).round() as u8).clamp(1, 100)
    }

    const DEFAULT_JPEG_QUALITY: f32 = 0.92;
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            format: RasterFormat::Png,
            scale: QualityLevel::default().scale_factor(),
            jpeg_quality: Self::DEFAULT_JPEG_QUALITY,
        }
    }
}

/// A strategy that turns a capture target into encoded raster bytes.
pub trait CaptureBackend {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Capture one page node.
    fn capture(&self, target: &CaptureTarget, options: &CaptureOptions) -> Result<Vec<u8>>;
}

/// Which capture backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureStrategy {
    /// In-process rasterization
    #[default]
    Client,
    /// Headless rendering service
    Server,
}

impl CaptureStrategy {
    /// Build the backend for this strategy.
    ///
    /// The server strategy needs a service configuration.
    pub fn build(self, server: Option<ServerRenderConfig>) -> Result<Box<dyn CaptureBackend>> {
        match self {
            CaptureStrategy::Client => Ok(Box::new(ClientRasterBackend::new())),
            CaptureStrategy::Server => {
                let config = server.ok_or_else(|| {
                    Error::Unsupported(
                        "server capture requires a rendering service endpoint".to_string(),
                    )
                })?;
                Ok(Box::new(ServerRenderBackend::new(config)?))
            }
        }
    }
}

impl FromStr for CaptureStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "client" => Ok(CaptureStrategy::Client),
            "server" => Ok(CaptureStrategy::Server),
            other => Err(format!("unknown capture strategy: {}", other)),
        }
    }
}
