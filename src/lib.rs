//! AxoDrive image uploads.
//!
//! Validates an uploaded image's extension and declared size, makes sure the
//! upload directory exists, and stores the content under a timestamp-derived
//! name. Diagnostics go through an injected [`logging::UploadLogger`].

pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod source;
pub mod storage;
pub mod upload;

pub use config::UploadConfig;
pub use error::{ApiError, DirectoryCreateError, SaveError, UploadError};
pub use logging::{LogEvent, LogLevel, TracingLogger, UploadLogger};
pub use source::{FileHandle, LocalFile, UploadedFile};
pub use upload::ImageUploader;
