//! HTTP 适配：把 multipart 请求交给图片上传处理器。

use axum::extract::{Extension, Multipart};
use axum::response::Json as JsonResponse;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::source::{FileHandle, UploadedFile};
use crate::upload::ImageUploader;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    path: String,
    size: u64,
}

/// 接收第一个带文件名的表单字段并保存为图片。
///
/// The field is buffered before validation. Bodies over the route's
/// `DefaultBodyLimit` (2 MiB unless raised) fail with 413 before the size
/// check, so mount it with a limit above `UploadConfig::max_size`.
pub async fn upload_image(
    Extension(uploader): Extension<Arc<ImageUploader>>,
    mut multipart: Multipart,
) -> Result<JsonResponse<UploadImageResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.file_name().is_none() {
            continue;
        }
        let file = UploadedFile::from_field(field).await?;
        let path = uploader.process_image_upload(&file).await?;
        let path = path
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");
        info!(path, size = file.size(), "image uploaded");
        return Ok(JsonResponse(UploadImageResponse {
            path,
            size: file.size(),
        }));
    }

    Err(ApiError::BadRequest("no image uploaded".into()))
}
