use crate::domain::assets::TempFile;
use crate::shared::error::AppError;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// A parsed multipart form: file parts spooled to the upload directory as
/// [`TempFile`]s, text parts kept in memory.
///
/// Files nobody takes are removed when the form is dropped.
#[derive(Debug, Default)]
pub struct UploadedFiles {
    files: HashMap<String, TempFile>,
    fields: HashMap<String, String>,
}

impl UploadedFiles {
    pub async fn from_multipart(mut multipart: Multipart, dir: &Path) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalServerError(e.into()))?;

        let mut form = Self::default();

        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field
                    .text()
                    .await
                    .map_err(multipart_error)?;
                form.fields.insert(name, text);
                continue;
            };

            let path = spool_path(dir, &file_name);
            // Owned before the first byte lands so a failed stream still cleans up.
            let temp = TempFile::new(&path);
            let mut out = tokio::fs::File::create(&path)
                .await
                .map_err(|e| AppError::InternalServerError(e.into()))?;

            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(multipart_error)?
            {
                out.write_all(&chunk)
                    .await
                    .map_err(|e| AppError::InternalServerError(e.into()))?;
            }
            out.flush()
                .await
                .map_err(|e| AppError::InternalServerError(e.into()))?;

            tracing::debug!(field = %name, path = %path.display(), "spooled upload");
            form.files.insert(name, temp);
        }

        Ok(form)
    }

    pub fn take_required(&mut self, field: &str) -> Result<TempFile, AppError> {
        self.take_optional(field)
            .ok_or_else(|| AppError::ValidationError(format!("Missing file field: {field}")))
    }

    pub fn take_optional(&mut self, field: &str) -> Option<TempFile> {
        self.files.remove(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Text value, or an empty string; validation reports it as blank.
    pub fn text_or_default(&self, field: &str) -> String {
        self.text(field).unwrap_or_default().to_string()
    }
}

/// Random name that keeps the client's extension, which drives resource
/// kind detection.
/// Keeps the status axum assigns, so an oversized body stays a 413.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::ValidationError(e.body_text())
    }
}

fn spool_path(dir: &Path, file_name: &str) -> PathBuf {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();

    dir.join(format!("{}{}", Uuid::new_v4(), ext))
}
