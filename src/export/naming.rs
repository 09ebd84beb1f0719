//! File naming for captured pages and artifacts.

use std::sync::OnceLock;

use regex::Regex;

/// Stem used when a document name sanitizes to nothing.
pub const FALLBACK_STEM: &str = "bulletin";

fn disallowed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_]+").unwrap())
}

fn repeated_underscores() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_{2,}").unwrap())
}

/// Lowercase a display name and restrict it to `[a-z0-9_]`.
pub fn sanitize_file_stem(name: &str) -> String {
    let lower = name.to_lowercase();
    let replaced = disallowed().replace_all(&lower, "_");
    let collapsed = repeated_underscores().replace_all(&replaced, "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// File name for one captured page.
///
/// - section spanning several pages: `section_{n}_page_{p}.{ext}`
/// - several sections exported: `section_{n}.{ext}`
/// - otherwise: `{document}.{ext}`
///
/// `section_index` and `page_index` are 0-based; names are 1-based.
pub fn capture_file_name(
    document_name: &str,
    section_index: usize,
    page_index: usize,
    section_pages: usize,
    sections_exported: usize,
    extension: &str,
) -> String {
    if section_pages > 1 {
        format!(
            "section_{}_page_{}.{}",
            section_index + 1,
            page_index + 1,
            extension
        )
    } else if sections_exported > 1 {
        format!("section_{}.{}", section_index + 1, extension)
    } else {
        format!("{}.{}", sanitize_file_stem(document_name), extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_file_stem("Boletín Mensual"), "bolet_n_mensual");
        assert_eq!(sanitize_file_stem("  Puno -- Julio 2024 "), "puno_julio_2024");
        assert_eq!(sanitize_file_stem("already_fine_1"), "already_fine_1");
        assert_eq!(sanitize_file_stem("a/b\\c.pdf"), "a_b_c_pdf");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_file_stem(""), FALLBACK_STEM);
        assert_eq!(sanitize_file_stem("¿¡!?"), FALLBACK_STEM);
    }

    #[test]
    fn test_multi_page_section_name() {
        assert_eq!(
            capture_file_name("Doc", 0, 2, 3, 1, "png"),
            "section_1_page_3.png"
        );
        assert_eq!(
            capture_file_name("Doc", 4, 0, 2, 5, "jpg"),
            "section_5_page_1.jpg"
        );
    }

    #[test]
    fn test_multi_section_name() {
        assert_eq!(capture_file_name("Doc", 1, 0, 1, 2, "png"), "section_2.png");
    }

    #[test]
    fn test_single_page_uses_document_name() {
        assert_eq!(
            capture_file_name("Boletín Puno", 3, 0, 1, 1, "png"),
            "bolet_n_puno.png"
        );
    }
}
