//! Uploaded files: list, multipart upload and delete.

use askama::Template;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Redirect, Response},
};
use depot_core::FileId;
use depot_core::models::FileRecord;
use depot_core::pagination::paginate;
use tower_sessions::Session;
use tracing::instrument;

use super::{ListQuery, Pager, loaded, matches_search, render};
use crate::{backend::Upload, filters, state::AppState, toast, toast::Toast};

/// File row for the list page.
#[derive(Debug, Clone)]
pub struct FileRowView {
    pub id: FileId,
    pub filename: String,
    pub url: Option<String>,
    pub content_type: String,
    pub size: String,
    pub uploaded_at: Option<String>,
}

impl From<&FileRecord> for FileRowView {
    fn from(file: &FileRecord) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            url: file.url.clone(),
            content_type: file.content_type.clone().unwrap_or_else(|| "-".to_owned()),
            size: file.size_label(),
            uploaded_at: file.uploaded_at.clone(),
        }
    }
}

/// Files list template.
#[derive(Template)]
#[template(path = "files/index.html")]
pub struct FilesIndexTemplate {
    pub current_path: &'static str,
    pub toasts: Vec<Toast>,
    pub load_errors: Vec<String>,
    pub search: String,
    pub files: Vec<FileRowView>,
    pub pager: Pager,
    pub max_upload_mb: usize,
}

/// Files list page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListQuery>,
) -> Response {
    let mut load_errors = Vec::new();
    let mut files = loaded(state.backend().list_files().await, "files", &mut load_errors);

    let search = query.search();
    files.retain(|f| {
        matches_search(
            search,
            &[
                f.filename.as_str(),
                f.content_type.as_deref().unwrap_or_default(),
            ],
        )
    });
    // Newest first; undated uploads sort last.
    files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then(b.id.cmp(&a.id)));

    let page = paginate(files, query.page(), state.config().page_size);
    let pager = Pager::new(&page, "/files", &[("q", search)]);

    let template = FilesIndexTemplate {
        current_path: "/files",
        toasts: toast::take(&session).await,
        load_errors,
        search: search.unwrap_or_default().to_string(),
        files: page.items.iter().map(FileRowView::from).collect(),
        pager,
        max_upload_mb: super::MAX_UPLOAD_BYTES / (1024 * 1024),
    };
    render(&template)
}

/// Pull the `file` field out of the multipart body.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Could not read the upload: {e}"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Could not read the upload: {e}"))?;

        let Some(filename) = filename else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Err(format!("{filename} is empty"));
        }
        return Ok(Some(Upload {
            filename,
            content_type,
            bytes: bytes.to_vec(),
        }));
    }
    Ok(None)
}

/// Forward an uploaded file to the backend.
#[instrument(skip(state, session, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> Redirect {
    let upload = match read_upload(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            toast::push_error(&session, "Choose a file to upload").await;
            return Redirect::to("/files");
        }
        Err(message) => {
            tracing::warn!(%message, "Rejected upload");
            toast::push_error(&session, message).await;
            return Redirect::to("/files");
        }
    };

    let filename = upload.filename.clone();
    match state.backend().upload_file(upload).await {
        Ok(()) => {
            tracing::info!(%filename, "File uploaded");
            toast::push_success(&session, format!("Uploaded {filename}")).await;
        }
        Err(e) => {
            tracing::error!(%filename, error = %e, "Failed to upload file");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/files")
}

/// Delete a stored file.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<FileId>,
) -> Redirect {
    match state.backend().delete_file(id).await {
        Ok(()) => {
            tracing::info!(file_id = %id, "File deleted");
            toast::push_success(&session, "File deleted").await;
        }
        Err(e) => {
            tracing::error!(file_id = %id, error = %e, "Failed to delete file");
            toast::push_error(&session, e.user_message()).await;
        }
    }
    Redirect::to("/files")
}
