//! Word-processor export of generation results.
//!
//! A pure formatting transform: the script is re-split on the segment
//! delimiter and rendered as paragraphs inside a minimal Word-compatible
//! HTML wrapper, with a download filename sanitized from the title. Any UI
//! layer can offer the produced document as a file; the CLI writes it to
//! disk.

use crate::processor::{GenerationResult, SEGMENT_DELIMITER};

/// Longest filename stem derived from a title.
const MAX_FILE_STEM_CHARS: usize = 60;

/// A document ready to be offered for download.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    /// Sanitized filename, including the `.doc` extension.
    pub file_name: String,
    /// Full document markup.
    pub contents: String,
}

/// Render a result as a downloadable word-processor document.
pub fn export_document(result: &GenerationResult) -> ExportDocument {
    let mut body = String::new();
    body.push_str("<h1>");
    body.push_str(&escape_html(&result.title));
    body.push_str("</h1>\n<p><i>");
    body.push_str(&escape_html(&result.author));
    body.push_str(" — ");
    body.push_str(&escape_html(&result.category));
    body.push_str("</i></p>\n");

    for segment in result.script.split(SEGMENT_DELIMITER) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        body.push_str("<p>");
        body.push_str(&escape_html(segment));
        body.push_str("</p>\n");
    }

    let contents = format!(
        "<html xmlns:o=\"urn:schemas-microsoft-com:office:office\" \
         xmlns:w=\"urn:schemas-microsoft-com:office:word\" \
         xmlns=\"http://www.w3.org/TR/REC-html40\">\
         <head><meta charset=\"utf-8\"><title>{}</title></head>\
         <body>\n{}</body></html>",
        escape_html(&result.title),
        body
    );

    ExportDocument {
        file_name: format!("{}.doc", sanitize_file_stem(&result.title)),
        contents,
    }
}

/// Build a safe filename stem from a title.
///
/// Keeps alphanumerics, hyphens and underscores, turns whitespace into
/// single underscores, caps the length, and falls back to `script` when
/// nothing survives.
pub fn sanitize_file_stem(title: &str) -> String {
    let mut stem = String::new();
    let mut kept = 0;
    let mut last_was_separator = true;

    for c in title.trim().chars() {
        if kept >= MAX_FILE_STEM_CHARS {
            break;
        }
        if c.is_alphanumeric() || c == '-' {
            stem.push(c);
            kept += 1;
            last_was_separator = false;
        } else if (c.is_whitespace() || c == '_') && !last_was_separator {
            stem.push('_');
            kept += 1;
            last_was_separator = true;
        }
    }

    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        "script".to_string()
    } else {
        stem.to_string()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(title: &str, script: &str) -> GenerationResult {
        GenerationResult {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            author: "Автор".to_string(),
            category: "Категория".to_string(),
            script: script.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_segments_become_paragraphs() {
        let doc = export_document(&result(
            "Көктем",
            "Бірінші сөйлем.\n\n\nЕкінші сөйлем.",
        ));

        assert!(doc.contents.contains("<p>Бірінші сөйлем.</p>"));
        assert!(doc.contents.contains("<p>Екінші сөйлем.</p>"));
        assert!(doc.contents.contains("<h1>Көктем</h1>"));
        assert!(doc.contents.contains("schemas-microsoft-com:office:word"));
        assert_eq!(doc.file_name, "Көктем.doc");
    }

    #[test]
    fn test_empty_script_still_exports() {
        let doc = export_document(&result("Пустой", ""));
        assert!(!doc.contents.contains("<p></p>"));
        assert_eq!(doc.file_name, "Пустой.doc");
    }

    #[test]
    fn test_html_is_escaped() {
        let doc = export_document(&result("A & B", "One < two.\n\n\nTwo > one."));
        assert!(doc.contents.contains("<h1>A &amp; B</h1>"));
        assert!(doc.contents.contains("<p>One &lt; two.</p>"));
        assert!(doc.contents.contains("<p>Two &gt; one.</p>"));
    }

    #[test]
    fn test_file_stem_sanitization() {
        assert_eq!(sanitize_file_stem("Hello, World!"), "Hello_World");
        assert_eq!(sanitize_file_stem("  spaced   out  "), "spaced_out");
        assert_eq!(sanitize_file_stem("dash-and_under"), "dash-and_under");
        assert_eq!(sanitize_file_stem("???"), "script");
        assert_eq!(sanitize_file_stem(""), "script");

        let long = "x".repeat(200);
        assert_eq!(sanitize_file_stem(&long).chars().count(), 60);
    }
}
