//! Headless rendering service backend.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use super::{CaptureBackend, CaptureOptions, CaptureTarget, RasterFormat};
use crate::error::{Error, Result};

/// Path of the render endpoint on the service.
pub const RENDER_PATH: &str = "/api/export-bulletin";

/// Default timeout for a single render request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// User agent sent to the rendering service.
pub const USER_AGENT: &str = "bulletin-export";

/// Connection settings for the rendering service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRenderConfig {
    /// Service origin, e.g. `http://localhost:3000`
    pub endpoint: String,

    /// Base URL relative assets in the page resolve against
    pub base_url: String,

    /// Request timeout
    pub timeout: Duration,
}

impl ServerRenderConfig {
    /// Configure a service at `endpoint`; assets resolve against the same origin.
    pub fn new(endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self {
            base_url: endpoint.clone(),
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the base URL for relative assets.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the render endpoint.
    pub fn render_url(&self) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), RENDER_PATH)
    }
}

/// JSON body of a render request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderRequest<'a> {
    html: String,
    width: u32,
    height: u32,
    format: &'static str,
    quality: u8,
    device_scale_factor: f32,
    base_url: &'a str,
}

/// JSON body of a failed render response.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    details: Option<String>,
}

/// Captures pages by posting self-contained HTML to a rendering service.
pub struct ServerRenderBackend {
    config: ServerRenderConfig,
    client: Client,
}

impl ServerRenderBackend {
    /// Build a backend with its own HTTP client.
    pub fn new(config: ServerRenderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    /// The active configuration.
    pub fn config(&self) -> &ServerRenderConfig {
        &self.config
    }
}

impl CaptureBackend for ServerRenderBackend {
    fn name(&self) -> &str {
        "server"
    }

    fn capture(&self, target: &CaptureTarget, options: &CaptureOptions) -> Result<Vec<u8>> {
        let node = target.node();
        let (width, height) = node.layout_size();
        let html = build_standalone_html(
            &node.outer_html(),
            &node.stylesheet_rules(),
            &self.config.base_url,
        );

        let request = RenderRequest {
            html,
            width,
            height,
            format: match options.format {
                RasterFormat::Png => "png",
                RasterFormat::Jpeg => "jpg",
            },
            quality: options.jpeg_quality_percent(),
            device_scale_factor: options.scale,
            base_url: &self.config.base_url,
        };

        log::debug!(
            "Requesting render of section {} page {} ({}x{}) from {}",
            target.section_index + 1,
            target.page_index + 1,
            width,
            height,
            self.config.render_url()
        );

        let response = self
            .client
            .post(self.config.render_url())
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(service_error(status.as_u16(), &body));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type {
            if !ct.starts_with("image/") {
                return Err(Error::Capture(format!(
                    "rendering service returned {} instead of an image",
                    ct
                )));
            }
        }

        let bytes = response.bytes()?;
        if bytes.is_empty() {
            return Err(Error::Capture(
                "rendering service returned an empty body".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }
}

/// Map a non-success response to an error carrying the service's detail.
fn service_error(status: u16, body: &str) -> Error {
    let details = serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.details)
        .unwrap_or_else(|| format!("rendering service returned HTTP {}", status));
    Error::RenderService { status, details }
}

/// Wrap a node's outer HTML into a page the service can render on its own.
pub fn build_standalone_html(outer_html: &str, stylesheet_rules: &[String], base_url: &str) -> String {
    let mut html = String::with_capacity(outer_html.len() + 512);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    if !base_url.is_empty() {
        html.push_str(&format!("<base href=\"{}\">\n", escape_attr(base_url)));
    }
    html.push_str("<style>\n");
    for rule in stylesheet_rules {
        html.push_str(rule);
        html.push('\n');
    }
    html.push_str("html, body { margin: 0; padding: 0; background: #ffffff; }\n");
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(outer_html);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
