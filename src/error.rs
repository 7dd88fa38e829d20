//! 上传错误类型与 HTTP 响应转换。

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// 创建上传目录失败。
#[derive(Debug, Error)]
#[error("failed to create upload directory {}: {source}", .path.display())]
pub struct DirectoryCreateError {
    pub path: PathBuf,
    pub source: io::Error,
}

/// 写入上传文件时各步骤的失败。
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to open uploaded file: {0}")]
    OpenSource(#[source] io::Error),
    #[error("failed to create destination file: {0}")]
    CreateDest(#[source] io::Error),
    #[error("failed to copy file contents: {0}")]
    Copy(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid image type: only {allowed} are allowed")]
    InvalidType { extension: String, allowed: String },
    #[error("image size must be less than {}", format_limit(.limit))]
    TooLarge { size: u64, limit: u64 },
    #[error("failed to prepare upload directory: {0}")]
    Prepare(#[from] DirectoryCreateError),
    #[error("failed to save image: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: SaveError,
    },
}

fn format_limit(limit: &u64) -> String {
    const MB: u64 = 1 << 20;
    const KB: u64 = 1 << 10;
    match *limit {
        0 => "0 bytes".to_string(),
        value if value % MB == 0 => format!("{}MB", value / MB),
        value if value % KB == 0 => format!("{}KB", value / KB),
        value => format!("{value} bytes"),
    }
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        match error.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(error.body_text()),
            status if status.is_server_error() => ApiError::Internal(error.body_text()),
            _ => ApiError::BadRequest(error.body_text()),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(error: UploadError) -> Self {
        match error {
            UploadError::InvalidType { .. } => ApiError::BadRequest(error.to_string()),
            UploadError::TooLarge { .. } => ApiError::PayloadTooLarge(error.to_string()),
            UploadError::Prepare(_) | UploadError::Save { .. } => {
                ApiError::Internal(error.to_string())
            }
        }
    }
}
