//! Filename derivation and MIME inference for acquired documents.
//!
//! Filenames are built from the human-readable title supplied by the catalog,
//! never from the URL itself. The URL is only consulted to guess the document
//! format. Both the extension and the hand-off MIME type come from the same
//! URL-substring heuristic, so they can never disagree with each other.

use std::path::Path;

/// Maximum filename stem length in characters, before the extension.
///
/// Keeps the full path comfortably under common OS path-length limits even
/// inside deeply nested destination directories.
pub const MAX_STEM_CHARS: usize = 100;

/// Stem used when sanitization leaves nothing of the display name.
const FALLBACK_STEM: &str = "document";

/// Document format recognized by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format — the catalog's dominant format.
    Pdf,
    /// EPUB electronic publication.
    Epub,
}

impl DocumentFormat {
    /// Filename extension including the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Epub => ".epub",
        }
    }

    /// MIME type used when handing the file to an external viewer.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Epub => "application/epub+zip",
        }
    }
}

/// Guesses the document format from the URL path and query.
///
/// This is a substring heuristic, not content-type sniffing: a PDF served
/// from an extensionless URL is misclassified as PDF only by luck of the
/// default. Known accuracy limitation — downstream MIME selection depends on
/// the same guess, which keeps the two consistent.
#[must_use]
pub fn infer_format(source_url: &str) -> DocumentFormat {
    let haystack = url::Url::parse(source_url)
        .map(|u| {
            let mut text = u.path().to_lowercase();
            if let Some(query) = u.query() {
                text.push('?');
                text.push_str(&query.to_lowercase());
            }
            text
        })
        .unwrap_or_else(|_| source_url.to_lowercase());

    if haystack.ends_with(".pdf") {
        DocumentFormat::Pdf
    } else if haystack.ends_with(".epub") {
        DocumentFormat::Epub
    } else if haystack.contains("pdf") {
        DocumentFormat::Pdf
    } else if haystack.contains("epub") {
        DocumentFormat::Epub
    } else {
        DocumentFormat::Pdf
    }
}

/// Builds a safe, bounded filename from a display name and source URL.
///
/// Deterministic: identical inputs always yield the identical filename.
/// Characters invalid on common filesystems (`/ \ ? % * : | " < >`) are
/// replaced, whitespace runs collapse to single spaces, and the stem is
/// capped at [`MAX_STEM_CHARS`] characters.
#[must_use]
pub fn build_file_name(display_name: &str, source_url: &str) -> String {
    let format = infer_format(source_url);
    let stem = sanitize_stem(display_name);
    format!("{stem}{}", format.extension())
}

/// Returns the hand-off MIME type for an acquired file path.
///
/// Driven by the extension that [`build_file_name`] chose, so it shares the
/// accuracy limitations of [`infer_format`].
#[must_use]
pub fn mime_for_path(path: &Path) -> &'static str {
    let is_epub = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("epub"));
    if is_epub {
        DocumentFormat::Epub.mime()
    } else {
        DocumentFormat::Pdf.mime()
    }
}

fn sanitize_stem(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '%' | '*' | ':' | '|' | '"' | '<' | '>' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();

    // Collapse whitespace runs to single spaces, then trim.
    let mut stem = String::new();
    let mut previous_was_space = false;
    for ch in replaced.chars() {
        if ch.is_whitespace() {
            if !previous_was_space {
                stem.push(' ');
                previous_was_space = true;
            }
        } else {
            stem.push(ch);
            previous_was_space = false;
        }
    }
    let stem: String = stem.trim().chars().take(MAX_STEM_CHARS).collect();
    let stem = stem.trim_end().to_string();

    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_file_name_is_deterministic() {
        let first = build_file_name("Dune", "https://example.com/book.pdf");
        let second = build_file_name("Dune", "https://example.com/book.pdf");
        assert_eq!(first, second);
        assert_eq!(first, "Dune.pdf");
    }

    #[test]
    fn test_extension_epub_from_url_with_query() {
        let name = build_file_name("My Book", "https://x/vol.epub?x=1");
        assert!(name.ends_with(".epub"), "got: {name}");
    }

    #[test]
    fn test_extension_defaults_to_pdf_without_hint() {
        let name = build_file_name("My Book", "https://x/vol");
        assert!(name.ends_with(".pdf"), "got: {name}");
    }

    #[test]
    fn test_extension_pdf_substring_in_query() {
        assert_eq!(
            infer_format("https://example.com/get?format=pdf&id=7"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_extension_epub_substring_without_extension() {
        assert_eq!(
            infer_format("https://example.com/epub/12345"),
            DocumentFormat::Epub
        );
    }

    #[test]
    fn test_extension_pdf_wins_over_epub_substring() {
        // An epub mention earlier in the path loses to the exact .pdf ending.
        assert_eq!(
            infer_format("https://example.com/epub-converted/book.pdf"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_extension_case_insensitive() {
        assert_eq!(
            infer_format("https://example.com/Book.PDF"),
            DocumentFormat::Pdf
        );
    }

    #[test]
    fn test_infer_format_unparseable_url_falls_back_to_raw_text() {
        assert_eq!(infer_format("not a url but epub"), DocumentFormat::Epub);
    }

    #[test]
    fn test_sanitize_removes_invalid_chars() {
        let name = build_file_name("A/B\\C?D%E*F:G|H\"I<J>K", "https://x/f.pdf");
        for forbidden in ['/', '\\', '?', '%', '*', ':', '|', '"', '<', '>'] {
            assert!(
                !name.contains(forbidden),
                "filename still contains {forbidden:?}: {name}"
            );
        }
    }

    #[test]
    fn test_sanitize_collapses_whitespace_runs() {
        let name = build_file_name("The   Left\t\tHand  of Darkness", "https://x/f.pdf");
        assert_eq!(name, "The Left Hand of Darkness.pdf");
    }

    #[test]
    fn test_sanitize_trims_surrounding_whitespace() {
        let name = build_file_name("  Hyperion  ", "https://x/f.pdf");
        assert_eq!(name, "Hyperion.pdf");
    }

    #[test]
    fn test_stem_capped_at_max_chars() {
        let long_title = "x".repeat(400);
        let name = build_file_name(&long_title, "https://x/f.pdf");
        let stem = name.trim_end_matches(".pdf");
        assert_eq!(stem.chars().count(), MAX_STEM_CHARS);
    }

    #[test]
    fn test_all_invalid_name_falls_back() {
        let name = build_file_name("////", "https://x/f.pdf");
        assert_eq!(name, "----.pdf");
        let name = build_file_name("   ", "https://x/f.pdf");
        assert_eq!(name, "document.pdf");
    }

    #[test]
    fn test_mime_for_path_pdf() {
        assert_eq!(
            mime_for_path(&PathBuf::from("/tmp/Dune.pdf")),
            "application/pdf"
        );
    }

    #[test]
    fn test_mime_for_path_epub() {
        assert_eq!(
            mime_for_path(&PathBuf::from("/tmp/Dune.epub")),
            "application/epub+zip"
        );
    }

    #[test]
    fn test_mime_for_path_unknown_defaults_to_pdf() {
        assert_eq!(mime_for_path(&PathBuf::from("/tmp/file")), "application/pdf");
    }
}
