//! Pre-capture waits for embedded images and fonts.

use std::time::Duration;

use super::CaptureTarget;

/// Bounded waits applied before each capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessOptions {
    /// Per-image load timeout
    pub image_timeout: Duration,

    /// Font readiness timeout
    pub font_timeout: Duration,
}

impl ReadinessOptions {
    /// Create readiness options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-image timeout.
    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    /// Set the font timeout.
    pub fn with_font_timeout(mut self, timeout: Duration) -> Self {
        self.font_timeout = timeout;
        self
    }
}

impl Default for ReadinessOptions {
    fn default() -> Self {
        Self {
            image_timeout: Duration::from_secs(5),
            font_timeout: Duration::from_secs(5),
        }
    }
}

/// What the readiness wait observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadinessReport {
    /// Number of embedded images
    pub images_total: usize,

    /// Sources that did not load within the timeout
    pub images_timed_out: Vec<String>,

    /// Whether fonts reported ready in time
    pub fonts_ready: bool,
}

impl ReadinessReport {
    /// True when every image loaded and fonts were ready.
    pub fn is_complete(&self) -> bool {
        self.images_timed_out.is_empty() && self.fonts_ready
    }
}

/// Wait for every embedded image, then for fonts.
///
/// Timeouts are soft: they are logged and capture proceeds with whatever
/// rendered.
pub fn await_target_ready(target: &CaptureTarget, options: &ReadinessOptions) -> ReadinessReport {
    let node = target.node();
    let sources = node.image_sources();
    let mut report = ReadinessReport {
        images_total: sources.len(),
        ..Default::default()
    };

    for src in sources {
        if !node.wait_for_image(&src, options.image_timeout) {
            log::warn!(
                "Image {} in section {} page {} did not load within {:?}",
                src,
                target.section_index + 1,
                target.page_index + 1,
                options.image_timeout
            );
            report.images_timed_out.push(src);
        }
    }

    report.fonts_ready = node.wait_for_fonts(options.font_timeout);
    if !report.fonts_ready {
        log::warn!(
            "Fonts not ready for section {} page {} after {:?}",
            target.section_index + 1,
            target.page_index + 1,
            options.font_timeout
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::RenderedNode;
    use crate::error::Result;
    use image::RgbaImage;

    struct SlowNode;

    impl RenderedNode for SlowNode {
        fn outer_html(&self) -> String {
            "<div></div>".to_string()
        }

        fn layout_size(&self) -> (u32, u32) {
            (10, 10)
        }

        fn image_sources(&self) -> Vec<String> {
            vec!["logo.png".to_string(), "map.png".to_string()]
        }

        fn wait_for_image(&self, src: &str, _timeout: Duration) -> bool {
            src != "map.png"
        }

        fn wait_for_fonts(&self, _timeout: Duration) -> bool {
            false
        }

        fn rasterize(&self, _scale: f32) -> Result<RgbaImage> {
            Ok(RgbaImage::new(10, 10))
        }
    }

    #[test]
    fn test_timeouts_are_reported_not_fatal() {
        let target = CaptureTarget::new(0, 0, Box::new(SlowNode));
        let report = await_target_ready(&target, &ReadinessOptions::default());

        assert_eq!(report.images_total, 2);
        assert_eq!(report.images_timed_out, vec!["map.png".to_string()]);
        assert!(!report.fonts_ready);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_readiness_builder() {
        let options = ReadinessOptions::new()
            .with_image_timeout(Duration::from_millis(10))
            .with_font_timeout(Duration::from_millis(20));
        assert_eq!(options.image_timeout, Duration::from_millis(10));
        assert_eq!(options.font_timeout, Duration::from_millis(20));
    }
}
