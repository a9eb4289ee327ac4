//! Resume text extraction.

use tracing::warn;

/// Extracts plain text from an uploaded resume. Returns `None` when the
/// content type is unsupported or extraction fails — a malformed document
/// is not fatal to the application, it just scores zero.
pub fn extract_text(bytes: &[u8], content_type: &str) -> Option<String> {
    match content_type {
        "application/pdf" => match pdf_extract::extract_text_from_mem(bytes) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("PDF text extraction failed: {e}");
                None
            }
        },
        "text/plain" => String::from_utf8(bytes.to_vec()).ok(),
        other => {
            warn!("unsupported resume content type {other}");
            None
        }
    }
}
