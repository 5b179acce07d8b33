use std::panic::{self, AssertUnwindSafe};

/// Extracts text page by page; every page is followed by a newline.
///
/// pdf-extract panics on some malformed inputs, so the call is isolated and a
/// panic is reported like any other parse failure.
pub(super) fn extract(bytes: &[u8]) -> Result<String, String> {
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| "PDF parser aborted on malformed input".to_string())?
    .map_err(|e| e.to_string())?;

    let mut text = String::new();
    for page in &pages {
        text.push_str(page);
        text.push('\n');
    }
    Ok(text)
}
