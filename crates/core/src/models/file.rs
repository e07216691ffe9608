//! Uploaded file metadata.

use serde::{Deserialize, Serialize};

use super::{KeySpellings, lenient};
use crate::types::FileId;

/// Metadata for a file stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(alias = "Id", alias = "fid")]
    pub id: FileId,
    #[serde(
        alias = "name",
        alias = "fileName",
        alias = "file_name",
        alias = "originalName",
        alias = "original_name"
    )]
    pub filename: String,
    #[serde(
        default,
        alias = "path",
        alias = "location",
        deserialize_with = "lenient::optional_text"
    )]
    pub url: Option<String>,
    #[serde(default, alias = "bytes")]
    pub size: Option<u64>,
    #[serde(
        default,
        alias = "contentType",
        alias = "mimeType",
        alias = "mime_type",
        deserialize_with = "lenient::optional_text"
    )]
    pub content_type: Option<String>,
    #[serde(
        default,
        alias = "uploadedAt",
        alias = "createdAt",
        alias = "created_at",
        deserialize_with = "lenient::optional_text"
    )]
    pub uploaded_at: Option<String>,
}

impl KeySpellings for FileRecord {
    const SPELLINGS: &'static [&'static [&'static str]] = &[
        &["id", "Id", "fid"],
        &[
            "filename",
            "name",
            "fileName",
            "file_name",
            "originalName",
            "original_name",
        ],
        &["url", "path", "location"],
        &["size", "bytes"],
        &["content_type", "contentType", "mimeType", "mime_type"],
        &["uploaded_at", "uploadedAt", "createdAt", "created_at"],
    ];
}

impl FileRecord {
    /// Human-readable size, e.g. `1.5 KB`.
    #[must_use]
    pub fn size_label(&self) -> String {
        self.size.map_or_else(|| "-".to_owned(), format_size)
    }
}

/// Format a byte count with binary units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = "KB";
    for next in UNITS.iter().skip(1) {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_original_name_and_mime() {
        let file: FileRecord = serde_json::from_str(
            r#"{"Id": 2, "originalName": "invoice.pdf", "mimeType": "application/pdf", "size": 2048}"#,
        )
        .unwrap();
        assert_eq!(file.filename, "invoice.pdf");
        assert_eq!(file.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(file.size_label(), "2.0 KB");
    }

    #[test]
    fn test_formats_sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_file_with_repeated_spellings_decodes() {
        let files: Vec<FileRecord> = crate::models::decode(
            br#"[{"id": 1, "fid": 1, "filename": "a.csv", "original_name": "a.csv",
                "size": 10, "bytes": 10, "createdAt": "x", "created_at": "x"}]"#,
        )
        .unwrap();
        let file = files.first().unwrap();
        assert_eq!(file.filename, "a.csv");
        assert_eq!(file.size, Some(10));
        assert_eq!(file.uploaded_at.as_deref(), Some("x"));
    }
}
