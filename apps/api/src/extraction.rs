//! Document text extraction: PDF bytes to text, and carving the text window
//! belonging to a specific clause number out of the full standard.
//!
//! Clause carving is best-effort. A clause that cannot be located simply
//! yields `None`; the generator falls back to general document context.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;

/// Word-bounded clause number token, e.g. "4.1" or "7.3.2". Used both to
/// locate a clause and to find the next clause bounding its window.
static CLAUSE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d+\.\d+(?:\.\d+)*\b").expect("clause number pattern is valid"));

/// Extracts the full text of a PDF document.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Pdf(format!("PDF seems empty or unreadable: {e}")))
}

/// Finds a short content window around a clause number, e.g. "4.1".
/// The window runs from 500 characters before the match to the next clause
/// number (searched within 3000 characters) or 2500 characters after.
pub fn find_clause_content<'a>(text: &'a str, clause_number: &str) -> Option<&'a str> {
    clause_window(text, clause_number, 500, 3000, 2500)
}

/// Extracts the complete clause text including sub-points: a wider window
/// than `find_clause_content`, from 200 characters before the match to the
/// next clause number (searched within 5000 characters) or 5000 after.
pub fn extract_full_clause_text<'a>(text: &'a str, clause_number: &str) -> Option<&'a str> {
    clause_window(text, clause_number, 200, 5000, 5000)
}

fn clause_window<'a>(
    text: &'a str,
    clause_number: &str,
    before: usize,
    lookahead: usize,
    fallback_after: usize,
) -> Option<&'a str> {
    let (match_start, match_end) = find_clause_position(text, clause_number)?;

    let start = floor_char_boundary(text, match_start.saturating_sub(before));

    // Look for the next clause number (e.g. "4.2", "5.1") to bound the window
    let window_end = ceil_char_boundary(text, (match_end + lookahead).min(text.len()));
    let remaining = &text[floor_char_boundary(text, match_end)..window_end];

    let end = match CLAUSE_NUMBER.find(remaining) {
        Some(m) => match_end + m.start(),
        None => (match_end + fallback_after).min(text.len()),
    };
    let end = ceil_char_boundary(text, end.min(text.len()));

    Some(&text[start..end])
}

/// Locates the earliest occurrence of the clause number as a standalone
/// token. Word boundaries make prefixed forms ("Clause 4.1", "Section 4.1")
/// match through the bare number.
fn find_clause_position(text: &str, clause_number: &str) -> Option<(usize, usize)> {
    CLAUSE_NUMBER
        .find_iter(text)
        .find(|m| m.as_str() == clause_number)
        .map(|m| (m.start(), m.end()))
}

/// Largest char boundary `<= index`. PDF text is arbitrary UTF-8; byte
/// offsets from window arithmetic may land inside a multi-byte character.
pub fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Smallest char boundary `>= index`.
pub fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    const STANDARD_TEXT: &str = "\
        Quality management systems - Requirements\n\
        4.1 Understanding the organization and its context\n\
        The organization shall determine external and internal issues that are \
        relevant to its purpose and that affect its ability to achieve the \
        intended results of its quality management system.\n\
        4.2 Understanding the needs and expectations of interested parties\n\
        The organization shall determine the interested parties that are \
        relevant to the quality management system.\n";

    #[test]
    fn test_finds_clause_window_bounded_by_next_clause() {
        let window = find_clause_content(STANDARD_TEXT, "4.1").unwrap();
        assert!(window.contains("Understanding the organization"));
        assert!(window.contains("external and internal issues"));
        assert!(!window.contains("interested parties that are relevant"));
    }

    #[test]
    fn test_full_clause_text_includes_requirements() {
        let window = extract_full_clause_text(STANDARD_TEXT, "4.1").unwrap();
        assert!(window.contains("The organization shall determine external"));
    }

    #[test]
    fn test_missing_clause_returns_none() {
        assert!(find_clause_content(STANDARD_TEXT, "9.3").is_none());
    }

    #[test]
    fn test_clause_prefixed_with_keyword_is_found() {
        let text = "Introduction. See Clause 7.3 for design requirements. More text follows here.";
        let window = find_clause_content(text, "7.3").unwrap();
        assert!(window.contains("design requirements"));
    }

    #[test]
    fn test_clause_number_dots_are_not_wildcards() {
        // "4.1" must not match "471" via the dot
        let text = "Reference 471 is unrelated. Clause 4.1 starts here with content.";
        let window = find_clause_content(text, "4.1").unwrap();
        assert!(window.contains("starts here"));
    }

    #[test]
    fn test_finds_clause_past_earlier_number_tokens() {
        let text = "Revision 1.2, issued 2016. Supersedes edition 3.9. \
                    4.1 Context of the organization starts here with requirements.";
        let window = find_clause_content(text, "4.1").unwrap();
        assert!(window.contains("Context of the organization"));
    }

    #[test]
    fn test_sub_clause_number_does_not_match_parent() {
        // "7.3.1" is one token; it must not anchor a search for "7.3"
        let text = "Cross-reference 7.3.1 appears first. 7.3 Design and development follows.";
        let window = find_clause_content(text, "7.3").unwrap();
        assert!(window.contains("Design and development"));
    }

    #[test]
    fn test_char_boundary_helpers_snap_to_boundaries() {
        let text = "a\u{00e9}b"; // é is two bytes
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(ceil_char_boundary(text, 2), 3);
        assert_eq!(floor_char_boundary(text, 100), text.len());
    }
}
