//! 上传接收：流式读取、大小上限与计数。

use axum::extract::{Extension, Multipart};
use axum::response::Json as JsonResponse;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::background::spawn_retention_sweep;
use crate::config::READ_CHUNK_SIZE;
use crate::counter::UploadCounter;
use crate::error::ApiError;
use crate::http::SiteConfig;
use crate::storage::Storage;

#[derive(Debug)]
pub struct UploadConfig {
    pub max_file_size: u64,
    pub max_file_age: Duration,
}

#[derive(Serialize)]
pub(crate) struct UploadResponse {
    filename: String,
    url: String,
    status: &'static str,
}

/// 接收 multipart 上传；读取过程中超过大小上限立即中止，不落盘。
pub async fn upload_file(
    Extension(storage): Extension<Arc<Storage>>,
    Extension(counter): Extension<Arc<UploadCounter>>,
    Extension(site): Extension<Arc<SiteConfig>>,
    Extension(upload): Extension<Arc<UploadConfig>>,
    mut multipart: Multipart,
) -> Result<JsonResponse<UploadResponse>, ApiError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| ApiError::BadRequest("filename is required".into()))?;

        // Frames arrive transport sized; the buffer grows in fixed steps and
        // the running total is checked before anything touches the disk.
        let mut contents: Vec<u8> = Vec::with_capacity(READ_CHUNK_SIZE);
        let mut total_read: u64 = 0;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?
        {
            total_read += chunk.len() as u64;
            if total_read > upload.max_file_size {
                return Err(ApiError::BadRequest(format!(
                    "file too large, limit is {} bytes",
                    upload.max_file_size
                )));
            }
            if contents.len() + chunk.len() > contents.capacity() {
                contents.reserve(READ_CHUNK_SIZE);
            }
            contents.extend_from_slice(&chunk);
        }

        storage
            .save(&filename, &contents)
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        let total_uploads = counter
            .increment()
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        spawn_retention_sweep(storage.clone(), upload.max_file_age);

        info!(filename, size = total_read, total_uploads, "file uploaded");
        return Ok(JsonResponse(UploadResponse {
            url: site.file_url(&filename),
            filename,
            status: "uploaded",
        }));
    }

    Err(ApiError::BadRequest("file field is required".into()))
}
