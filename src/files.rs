//! 文件列表分页与已上传文件的下载。

use axum::body::Body as AxumBody;
use axum::extract::{Extension, Path as UrlPath, Query};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json as JsonResponse, Response};
use httpdate::fmt_http_date;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::config::{DEFAULT_PAGE, DEFAULT_PAGE_LIMIT};
use crate::counter::UploadCounter;
use crate::error::ApiError;
use crate::http::SiteConfig;
use crate::storage::{Storage, format_timestamp};

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    #[serde(default = "default_limit")]
    limit: usize,
    #[serde(default = "default_page")]
    page: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

fn default_page() -> usize {
    DEFAULT_PAGE
}

#[derive(Serialize)]
pub(crate) struct ListedFile {
    filename: String,
    url: String,
    size: u64,
    modified: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct ListResponse {
    files: Vec<ListedFile>,
    total_files: usize,
    total_all_time_files: u64,
}

/// 分页列出已上传的文件（按修改时间倒序）。
pub async fn list_files(
    Query(query): Query<ListQuery>,
    Extension(storage): Extension<Arc<Storage>>,
    Extension(counter): Extension<Arc<UploadCounter>>,
    Extension(site): Extension<Arc<SiteConfig>>,
) -> Result<JsonResponse<ListResponse>, ApiError> {
    let entries = storage
        .list_files()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    let total_files = entries.len();
    let page = query.page.max(DEFAULT_PAGE);
    let start = (page - 1).saturating_mul(query.limit);

    let files = entries
        .into_iter()
        .skip(start)
        .take(query.limit)
        .map(|entry| ListedFile {
            url: site.file_url(&entry.name),
            size: entry.size,
            modified: format_timestamp(entry.modified),
            filename: entry.name,
        })
        .collect::<Vec<_>>();

    info!(page, limit = query.limit, total_files, "list files");
    Ok(JsonResponse(ListResponse {
        files,
        total_files,
        total_all_time_files: counter.get().await,
    }))
}

/// 按文件名读取已上传文件并流式返回。
pub async fn serve_upload(
    UrlPath(filename): UrlPath<String>,
    Extension(storage): Extension<Arc<Storage>>,
) -> Result<Response, ApiError> {
    let target = storage.file_path(&filename);
    let metadata = fs::metadata(&target).await?;
    if !metadata.is_file() {
        return Err(ApiError::NotFound("file not found".into()));
    }

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.essence_str())
            .map_err(|_| ApiError::Internal("invalid mime type".into()))?,
    );
    response_headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&metadata.len().to_string())
            .map_err(|_| ApiError::Internal("invalid header value".into()))?,
    );
    if let Ok(modified) = metadata.modified() {
        let value = fmt_http_date(modified);
        response_headers.insert(
            header::LAST_MODIFIED,
            HeaderValue::from_str(&value)
                .map_err(|_| ApiError::Internal("invalid header value".into()))?,
        );
    }

    let file = File::open(&target).await?;
    debug!(filename, size = metadata.len(), "serve upload");
    let stream = ReaderStream::new(file);
    Ok((
        StatusCode::OK,
        response_headers,
        AxumBody::from_stream(stream),
    )
        .into_response())
}
