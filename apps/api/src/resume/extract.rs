//! Text extraction for uploaded resume files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type '{0}' (expected .pdf, .txt or .md)")]
    UnsupportedType(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("file is not valid UTF-8 text")]
    NotUtf8(#[from] std::string::FromUtf8Error),

    #[error("no text could be extracted from the file")]
    Empty,
}

/// Extracts plain text from a resume file, choosing the decoder by extension.
pub fn extract_resume_text(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?,
        "txt" | "md" => String::from_utf8(data.to_vec())?,
        _ => return Err(ExtractError::UnsupportedType(file_name.to_string())),
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ExtractError::Empty);
    }
    Ok(text)
}

/// Trims trailing whitespace on every line and collapses runs of blank lines,
/// which PDF extraction produces in bulk.
fn normalize_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
