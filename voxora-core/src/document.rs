//! Document summaries. The service extracts the text and writes a short gist;
//! the client only checks the upload is acceptable and reads the result.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpeechError;

pub const MAX_DOCUMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf", "odt"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    #[serde(default)]
    pub extracted_text: String,
    #[serde(default)]
    pub gist: String,
}

/// Reject documents the service would refuse anyway
pub fn validate_document(path: &Path, size: u64) -> Result<(), SpeechError> {
    if size > MAX_DOCUMENT_BYTES {
        return Err(SpeechError::validation("File size must be less than 10MB"));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        let formats: Vec<String> = SUPPORTED_EXTENSIONS.iter().map(|e| format!(".{e}")).collect();
        return Err(SpeechError::validation(format!(
            "Unsupported file format. Please upload: {}",
            formats.join(", ")
        )));
    }

    Ok(())
}
