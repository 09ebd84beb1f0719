//! Render surface backed by a saved preview HTML document.
//!
//! The web editor renders every bulletin page into a container and tags
//! each page node with `data-section-index` / `data-page-index`. A saved
//! copy of that markup is enough to drive the server backend; the client
//! backend additionally needs a browser snapshot per page, referenced by a
//! `data-snapshot` attribute.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use image::imageops::FilterType;
use image::RgbaImage;
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;
use regex::Regex;

use super::{CaptureTarget, RenderSurface, RenderedNode};
use crate::error::{Error, Result};

/// Selector of the preview root container.
pub const DEFAULT_CONTAINER_SELECTOR: &str = "[data-export-root]";

/// A4 at 96 dpi, used when a page node declares no size.
const DEFAULT_PAGE_SIZE: (u32, u32) = (794, 1123);

const IMAGE_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A parsed preview document.
pub struct HtmlPreview {
    document: NodeRef,
    base_dir: PathBuf,
    container_selector: String,
    stylesheet_rules: Vec<String>,
    active_section: Option<usize>,
}

impl HtmlPreview {
    /// Parse preview markup; relative paths resolve against `base_dir`.
    pub fn from_html(html: &str, base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let document = kuchiki::parse_html().one(html);
        let stylesheet_rules = collect_stylesheets(&document, &base_dir);
        Self {
            document,
            base_dir,
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            stylesheet_rules,
            active_section: None,
        }
    }

    /// Load a preview file from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let html = fs::read_to_string(path)?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::from_html(&html, base_dir))
    }

    /// Use a different root container selector.
    pub fn with_container_selector(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = selector.into();
        self
    }

    /// Section most recently activated.
    pub fn active_section(&self) -> Option<usize> {
        self.active_section
    }

    /// Stylesheet rules collected from the document.
    pub fn stylesheet_rules(&self) -> &[String] {
        &self.stylesheet_rules
    }
}

impl RenderSurface for HtmlPreview {
    fn has_container(&self) -> bool {
        self.document.select_first(&self.container_selector).is_ok()
    }

    fn activate_section(&mut self, index: usize) -> Result<()> {
        self.active_section = Some(index);
        Ok(())
    }

    fn locate(&self, section_index: usize, page_index: usize) -> Option<CaptureTarget> {
        let container = self.document.select_first(&self.container_selector).ok()?;
        let selector = format!(
            "[data-section-index=\"{}\"][data-page-index=\"{}\"]",
            section_index, page_index
        );
        let element = container.as_node().select_first(&selector).ok()?;

        let (declared, snapshot) = {
            let attrs = element.attributes.borrow();
            let declared = declared_size(
                attrs.get("data-width"),
                attrs.get("data-height"),
                attrs.get("style"),
            );
            (declared, attrs.get("data-snapshot").map(str::to_string))
        };

        let image_sources = element
            .as_node()
            .select("img[src]")
            .map(|imgs| {
                imgs.filter_map(|img| {
                    let src = img.attributes.borrow().get("src").map(str::to_string);
                    src
                })
                .collect()
            })
            .unwrap_or_default();

        let node = HtmlNode {
            outer_html: element.as_node().to_string(),
            stylesheet_rules: self.stylesheet_rules.clone(),
            size: declared.unwrap_or(DEFAULT_PAGE_SIZE),
            image_sources,
            base_dir: self.base_dir.clone(),
            snapshot: snapshot.map(|s| self.base_dir.join(s)),
        };
        Some(CaptureTarget::new(section_index, page_index, Box::new(node)))
    }
}

/// One page node extracted from the preview.
struct HtmlNode {
    outer_html: String,
    stylesheet_rules: Vec<String>,
    size: (u32, u32),
    image_sources: Vec<String>,
    base_dir: PathBuf,
    snapshot: Option<PathBuf>,
}

impl RenderedNode for HtmlNode {
    fn outer_html(&self) -> String {
        self.outer_html.clone()
    }

    fn stylesheet_rules(&self) -> Vec<String> {
        self.stylesheet_rules.clone()
    }

    fn layout_size(&self) -> (u32, u32) {
        self.size
    }

    fn image_sources(&self) -> Vec<String> {
        self.image_sources.clone()
    }

    fn wait_for_image(&self, src: &str, timeout: Duration) -> bool {
        if is_external(src) {
            return true;
        }
        let path = self.base_dir.join(src);
        let deadline = Instant::now() + timeout;
        loop {
            if path.is_file() {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(IMAGE_POLL_INTERVAL);
        }
    }

    fn rasterize(&self, scale: f32) -> Result<RgbaImage> {
        let path = self.snapshot.as_ref().ok_or_else(|| {
            Error::Unsupported(
                "page node has no data-snapshot; use the server backend".to_string(),
            )
        })?;
        let snapshot = image::open(path)?.to_rgba8();

        let width = ((self.size.0 as f32) * scale).round().max(1.0) as u32;
        let height = ((self.size.1 as f32) * scale).round().max(1.0) as u32;
        if snapshot.dimensions() == (width, height) {
            return Ok(snapshot);
        }
        Ok(image::imageops::resize(
            &snapshot,
            width,
            height,
            FilterType::Lanczos3,
        ))
    }
}

fn is_external(src: &str) -> bool {
    src.starts_with("data:")
        || src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with("//")
}

/// Collect `<style>` blocks and local `<link rel="stylesheet">` files.
fn collect_stylesheets(document: &NodeRef, base_dir: &Path) -> Vec<String> {
    let mut rules = Vec::new();

    if let Ok(styles) = document.select("style") {
        for style in styles {
            let text = style.as_node().text_contents();
            if !text.trim().is_empty() {
                rules.push(text);
            }
        }
    }

    if let Ok(links) = document.select("link[rel=stylesheet][href]") {
        for link in links {
            let href = match link.attributes.borrow().get("href") {
                Some(h) => h.to_string(),
                None => continue,
            };
            if is_external(&href) {
                log::debug!("Leaving remote stylesheet {} to the renderer", href);
                continue;
            }
            match fs::read_to_string(base_dir.join(&href)) {
                Ok(css) => rules.push(css),
                Err(e) => log::warn!("Skipping stylesheet {}: {}", href, e),
            }
        }
    }

    rules
}

/// Size from `data-width`/`data-height`, else from inline `width`/`height` px.
fn declared_size(
    data_width: Option<&str>,
    data_height: Option<&str>,
    style: Option<&str>,
) -> Option<(u32, u32)> {
    let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<f32>().ok());
    if let (Some(w), Some(h)) = (parse(data_width), parse(data_height)) {
        return Some((w.round() as u32, h.round() as u32));
    }

    let style = style?;
    let width = style_px(style, style_width())?;
    let height = style_px(style, style_height())?;
    Some((width, height))
}

fn style_width() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|;)\s*width\s*:\s*([0-9]+(?:\.[0-9]+)?)px").unwrap())
}

fn style_height() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|;)\s*height\s*:\s*([0-9]+(?:\.[0-9]+)?)px").unwrap())
}

fn style_px(style: &str, re: &Regex) -> Option<u32> {
    let caps = re.captures(style)?;
    caps[1].parse::<f32>().ok().map(|v| v.round() as u32)
}
