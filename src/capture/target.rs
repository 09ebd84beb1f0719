//! View-layer contract: rendered page nodes and the surface that hosts them.

use std::fmt;
use std::time::Duration;

use image::RgbaImage;

use crate::error::Result;

/// A rendered page node that can be captured.
///
/// Implemented by whatever owns the rendered tree: a live view, a parsed
/// preview document, or a headless browser page.
pub trait RenderedNode {
    /// Serialized outer HTML of the node.
    fn outer_html(&self) -> String;

    /// Stylesheet rules the node depends on.
    fn stylesheet_rules(&self) -> Vec<String> {
        Vec::new()
    }

    /// Current layout box in CSS pixels, `(width, height)`.
    fn layout_size(&self) -> (u32, u32);

    /// Sources of images embedded in the node.
    fn image_sources(&self) -> Vec<String> {
        Vec::new()
    }

    /// Block until the image finished loading or `timeout` elapses.
    ///
    /// Returns `false` on timeout.
    fn wait_for_image(&self, _src: &str, _timeout: Duration) -> bool {
        true
    }

    /// Block until custom fonts are ready or `timeout` elapses.
    fn wait_for_fonts(&self, _timeout: Duration) -> bool {
        true
    }

    /// Rasterize the node at the given scale factor.
    fn rasterize(&self, scale: f32) -> Result<RgbaImage>;
}

/// A located, capturable handle for one `(section, page)` pair.
///
/// Exists only while an export runs.
pub struct CaptureTarget {
    /// 0-based section index
    pub section_index: usize,
    /// 0-based page index within the section
    pub page_index: usize,
    node: Box<dyn RenderedNode>,
}

impl CaptureTarget {
    /// Wrap a rendered node.
    pub fn new(section_index: usize, page_index: usize, node: Box<dyn RenderedNode>) -> Self {
        Self {
            section_index,
            page_index,
            node,
        }
    }

    /// The underlying rendered node.
    pub fn node(&self) -> &dyn RenderedNode {
        self.node.as_ref()
    }

    /// Layout size in CSS pixels.
    pub fn layout_size(&self) -> (u32, u32) {
        self.node.layout_size()
    }
}

impl fmt::Debug for CaptureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureTarget")
            .field("section_index", &self.section_index)
            .field("page_index", &self.page_index)
            .field("layout_size", &self.node.layout_size())
            .finish()
    }
}

/// Outcome of waiting for the view to finish re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderWait {
    /// The view signalled that rendering completed.
    Ready,
    /// The view supports the signal but did not fire it in time.
    TimedOut,
    /// No render-complete signal; callers fall back to a fixed delay.
    Unsupported,
}

/// The view layer an export drives.
pub trait RenderSurface {
    /// Whether the top-level preview container exists.
    fn has_container(&self) -> bool;

    /// Bring a section into view so its pages become addressable.
    fn activate_section(&mut self, index: usize) -> Result<()>;

    /// Wait for the view to finish re-rendering.
    fn wait_for_render(&mut self, _timeout: Duration) -> RenderWait {
        RenderWait::Unsupported
    }

    /// Locate the rendered node for a page, if present.
    fn locate(&self, section_index: usize, page_index: usize) -> Option<CaptureTarget>;

    /// Release any capture scaffolding. Called once per export.
    fn teardown(&mut self) {}
}
