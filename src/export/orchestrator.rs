//! The per-page capture loop.

use std::thread;
use std::time::Duration;

use super::{capture_file_name, ExportOptions, ProgressObserver, ProgressTracker};
use crate::capture::{await_target_ready, CaptureBackend, RenderSurface, RenderWait};
use crate::error::{Error, Result};
use crate::model::{pages_for_section, Document};
use crate::package::{package, CapturedImage, ExportArtifact};

/// Drives a capture backend over every selected page of a document.
///
/// Pages are captured one at a time, in `(section, page)` order, because
/// only one section is active in the view at a time.
pub struct Exporter<'a> {
    backend: &'a dyn CaptureBackend,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    /// Create an exporter with default options.
    pub fn new(backend: &'a dyn CaptureBackend) -> Self {
        Self {
            backend,
            options: ExportOptions::default(),
        }
    }

    /// Replace the export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// The active options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Run a full export: capture every selected page, then package.
    ///
    /// The surface is torn down exactly once, whatever the outcome.
    pub fn run(
        &self,
        document: &Document,
        surface: &mut dyn RenderSurface,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ExportArtifact> {
        log::info!(
            "Exporting \"{}\" as {:?} with the {} backend",
            document.name,
            self.options.format,
            self.backend.name()
        );
        let result = self.run_inner(document, surface, progress);
        surface.teardown();

        match &result {
            Ok(artifact) => log::info!(
                "Export finished: {} ({} pages, {} bytes)",
                artifact.file_name,
                artifact.page_count,
                artifact.len()
            ),
            Err(e) => log::warn!("Export failed: {}", e),
        }
        result
    }

    fn run_inner(
        &self,
        document: &Document,
        surface: &mut dyn RenderSurface,
        progress: &mut dyn ProgressObserver,
    ) -> Result<ExportArtifact> {
        let sections = self.options.selection.resolve(document.section_count())?;
        if !surface.has_container() {
            return Err(Error::ContainerNotFound(
                "the preview root is not rendered".to_string(),
            ));
        }

        // Page counts are fixed up front so percentages stay consistent.
        let plan: Vec<(usize, usize)> = sections
            .iter()
            .map(|&i| (i, pages_for_section(&document.sections[i])))
            .collect();
        let total_pages: usize = plan.iter().map(|(_, pages)| pages).sum();
        let mut tracker = ProgressTracker::new(total_pages + 1);

        let images = self.capture_pages(document, &plan, surface, progress, &mut tracker)?;

        self.check_cancelled()?;
        if images.is_empty() {
            return Err(Error::NothingCaptured);
        }
        progress.on_progress(&tracker.status(format!("Packaging {} images", images.len())));

        let artifact = package(images, self.options.format, &document.name, &self.options.pdf)?;
        progress.on_progress(&tracker.complete(format!("Export complete: {}", artifact.file_name)));
        Ok(artifact)
    }

    fn capture_pages(
        &self,
        document: &Document,
        plan: &[(usize, usize)],
        surface: &mut dyn RenderSurface,
        progress: &mut dyn ProgressObserver,
        tracker: &mut ProgressTracker,
    ) -> Result<Vec<CapturedImage>> {
        let raster = self.options.format.raster_format(&self.options.capture);
        let capture_options = self.options.capture.clone().with_format(raster);
        let settle = self.options.settle;
        let mut images = Vec::with_capacity(tracker.total_steps());
        let mut active: Option<usize> = None;

        for (position, &(section_index, pages)) in plan.iter().enumerate() {
            if active != Some(section_index) {
                self.check_cancelled()?;
                surface.activate_section(section_index)?;
                wait_for_render(surface, settle.activation_delay);
                active = Some(section_index);
            }

            for page_index in 0..pages {
                self.check_cancelled()?;
                progress.on_progress(&tracker.advance(format!(
                    "Capturing section {} of {}, page {} of {}",
                    position + 1,
                    plan.len(),
                    page_index + 1,
                    pages
                )));
                wait_for_render(surface, settle.page_delay);

                let Some(target) = surface.locate(section_index, page_index) else {
                    log::warn!(
                        "No rendered node for section {} page {}; skipping",
                        section_index + 1,
                        page_index + 1
                    );
                    continue;
                };

                await_target_ready(&target, &self.options.readiness);
                let bytes = self.backend.capture(&target, &capture_options)?;
                log::debug!(
                    "Captured section {} page {} ({} bytes)",
                    section_index + 1,
                    page_index + 1,
                    bytes.len()
                );

                images.push(CapturedImage {
                    section_index,
                    page_index,
                    file_name: capture_file_name(
                        &document.name,
                        section_index,
                        page_index,
                        pages,
                        plan.len(),
                        raster.extension(),
                    ),
                    format: raster,
                    bytes,
                });
            }
        }

        Ok(images)
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.options.cancel {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

/// Wait for the view's render signal, falling back to a fixed delay.
fn wait_for_render(surface: &mut dyn RenderSurface, delay: Duration) {
    match surface.wait_for_render(delay) {
        RenderWait::Ready => {}
        RenderWait::TimedOut => log::debug!("View did not signal render completion within {:?}", delay),
        RenderWait::Unsupported => {
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
    }
}

/// Export with the given backend and options.
pub fn run_export(
    document: &Document,
    surface: &mut dyn RenderSurface,
    backend: &dyn CaptureBackend,
    options: ExportOptions,
    progress: &mut dyn ProgressObserver,
) -> Result<ExportArtifact> {
    Exporter::new(backend)
        .with_options(options)
        .run(document, surface, progress)
}
