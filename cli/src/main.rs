//! bulletin-export CLI - export rendered bulletins to images, ZIP or PDF

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use bulletin_export::{
    load_document_file, pages_for_section, CaptureStrategy, ExportFormat, ExportOptions,
    ExportProgress, Exporter, HtmlPreview, Orientation, PageSize, PdfOptions, QualityLevel,
    RasterFormat, SectionSelection, ServerRenderConfig, SettleOptions,
};

#[derive(Parser)]
#[command(name = "bulletin-export")]
#[command(version)]
#[command(about = "Export agroclimatic bulletins to images, ZIP archives and PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture every page of a bulletin and package the result
    Export {
        /// Bulletin document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Saved preview markup the pages are captured from
        #[arg(short, long, value_name = "HTML")]
        preview: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Artifact format
        #[arg(short, long, value_enum, default_value = "png")]
        format: FormatArg,

        /// Capture quality preset
        #[arg(short, long, value_enum, default_value = "high")]
        quality: QualityArg,

        /// Capture strategy
        #[arg(short, long, value_enum, default_value = "client")]
        backend: BackendArg,

        /// Rendering service URL (server backend)
        #[arg(long, value_name = "URL", env = "BULLETIN_RENDER_URL")]
        render_url: Option<String>,

        /// Sections to export, 1-based (e.g., "1,3-4")
        #[arg(short, long)]
        sections: Option<String>,

        /// PDF page size
        #[arg(long, value_enum, default_value = "auto")]
        page_size: PageSizeArg,

        /// Landscape PDF pages
        #[arg(long)]
        landscape: bool,

        /// Captured pages per PDF page (grid layout when > 1)
        #[arg(long, default_value = "1")]
        sections_per_page: usize,

        /// Embed JPEG instead of PNG captures in the PDF
        #[arg(long)]
        jpeg: bool,

        /// Skip render settle delays (saved previews are already laid out)
        #[arg(long)]
        no_settle: bool,
    },

    /// Show how many pages every section renders to
    Pages {
        /// Bulletin document (JSON)
        #[arg(value_name = "DOCUMENT")]
        document: PathBuf,

        /// Print the page counts as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// One PNG per page (ZIP when several)
    Png,
    /// One JPEG per page (ZIP when several)
    Jpeg,
    /// A single PDF
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Png => ExportFormat::Png,
            FormatArg::Jpeg => ExportFormat::Jpeg,
            FormatArg::Pdf => ExportFormat::Pdf,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum QualityArg {
    /// 1x scale
    Low,
    /// 1.5x scale
    Medium,
    /// 2x scale (default)
    High,
    /// 3x scale
    Ultra,
}

impl From<QualityArg> for QualityLevel {
    fn from(quality: QualityArg) -> Self {
        match quality {
            QualityArg::Low => QualityLevel::Low,
            QualityArg::Medium => QualityLevel::Medium,
            QualityArg::High => QualityLevel::High,
            QualityArg::Ultra => QualityLevel::Ultra,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    /// Rasterize in-process from page snapshots
    Client,
    /// Render through a headless rendering service
    Server,
}

impl From<BackendArg> for CaptureStrategy {
    fn from(backend: BackendArg) -> Self {
        match backend {
            BackendArg::Client => CaptureStrategy::Client,
            BackendArg::Server => CaptureStrategy::Server,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    /// Page sized to each image
    Auto,
    A4,
    Letter,
    Legal,
}

impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::Auto => PageSize::Auto,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
        }
    }
}

/// Arguments of the `export` subcommand.
struct ExportArgs {
    document: PathBuf,
    preview: PathBuf,
    output: PathBuf,
    format: FormatArg,
    quality: QualityArg,
    backend: BackendArg,
    render_url: Option<String>,
    sections: Option<String>,
    page_size: PageSizeArg,
    landscape: bool,
    sections_per_page: usize,
    jpeg: bool,
    no_settle: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Export {
            document,
            preview,
            output,
            format,
            quality,
            backend,
            render_url,
            sections,
            page_size,
            landscape,
            sections_per_page,
            jpeg,
            no_settle,
        } => cmd_export(ExportArgs {
            document,
            preview,
            output,
            format,
            quality,
            backend,
            render_url,
            sections,
            page_size,
            landscape,
            sections_per_page,
            jpeg,
            no_settle,
        }),
        Commands::Pages { document, json } => cmd_pages(&document, json),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document_file(&args.document)?;
    let mut preview = HtmlPreview::from_file(&args.preview)?;

    let selection = match args.sections.as_deref() {
        Some(s) => SectionSelection::parse(s).map_err(|e| format!("Invalid sections: {}", e))?,
        None => SectionSelection::All,
    };

    let orientation = if args.landscape {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    let pdf = PdfOptions::new()
        .with_page_size(args.page_size.into())
        .with_orientation(orientation)
        .with_sections_per_page(args.sections_per_page);

    let mut options = ExportOptions::new()
        .with_sections(selection)
        .with_format(args.format.into())
        .with_quality(args.quality.into())
        .with_pdf(pdf);
    if args.jpeg {
        options = options.with_pdf_images(RasterFormat::Jpeg);
    }
    if args.no_settle {
        options = options.with_settle(SettleOptions::immediate());
    }

    let strategy: CaptureStrategy = args.backend.into();
    let server = args.render_url.map(ServerRenderConfig::new);
    log::debug!(
        "Exporting {} from {} ({:?} backend)",
        args.document.display(),
        args.preview.display(),
        strategy
    );
    let backend = strategy.build(server)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    let mut on_progress = |p: &ExportProgress| {
        pb.set_position(u64::from(p.percentage));
        pb.set_message(p.message.clone());
    };

    let result = Exporter::new(backend.as_ref())
        .with_options(options)
        .run(&document, &mut preview, &mut on_progress);

    let artifact = match result {
        Ok(artifact) => {
            pb.finish_with_message("Done!");
            artifact
        }
        Err(e) => {
            pb.abandon_with_message("Failed");
            return Err(e.into());
        }
    };

    let path = artifact.save_to(&args.output)?;

    println!("\n{}", "Export complete:".green().bold());
    println!("  {} {}", "├─".dimmed(), path.display());
    println!("  {} {} pages", "├─".dimmed(), artifact.page_count);
    println!("  {} {} bytes", "└─".dimmed(), artifact.len());

    Ok(())
}

fn cmd_pages(path: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let document = load_document_file(path)?;

    if json {
        let sections: Vec<_> = document
            .sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                serde_json::json!({
                    "section": i + 1,
                    "name": section.name,
                    "pages": pages_for_section(section),
                })
            })
            .collect();
        let total: usize = document.sections.iter().map(pages_for_section).sum();
        let report = serde_json::json!({
            "name": document.name,
            "sections": sections,
            "total_pages": total,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", document.name.cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let mut total = 0;
    for (i, section) in document.sections.iter().enumerate() {
        let pages = pages_for_section(section);
        total += pages;
        let name = if section.name.is_empty() {
            "(untitled)".dimmed().to_string()
        } else {
            section.name.clone()
        };
        println!("{:>3}. {} {}", i + 1, name, format!("({} pages)", pages).dimmed());
    }

    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), document.section_count());
    println!("{}: {}", "Pages".bold(), total);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "bulletin-export".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Agroclimatic bulletin export tool");
}
