//! Uploaded file endpoints (`/files`).

use depot_core::FileId;
use depot_core::models::FileRecord;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{BackendClient, BackendError};

/// A file received from the browser, ready to forward to the backend.
#[derive(Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    fn into_part(self) -> Result<Part, BackendError> {
        let part = Part::bytes(self.bytes).file_name(self.filename);
        match self.content_type {
            Some(content_type) => Ok(part.mime_str(&content_type)?),
            None => Ok(part),
        }
    }
}

impl BackendClient {
    /// List uploaded files.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the body does not decode.
    #[instrument(skip(self))]
    pub async fn list_files(&self) -> Result<Vec<FileRecord>, BackendError> {
        self.get_json("files").await
    }

    /// Upload one file as the multipart field `file`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the content type is malformed or the backend
    /// rejects the upload.
    #[instrument(skip(self, upload), fields(filename = %upload.filename, size = upload.bytes.len()))]
    pub async fn upload_file(&self, upload: Upload) -> Result<(), BackendError> {
        let form = Form::new().part("file", upload.into_part()?);
        self.post_multipart("files", form).await
    }

    /// Delete an uploaded file.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the backend refuses the deletion.
    #[instrument(skip(self), fields(file_id = %id))]
    pub async fn delete_file(&self, id: FileId) -> Result<(), BackendError> {
        self.delete(&format!("files/{id}")).await
    }
}
