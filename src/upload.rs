//! 图片上传处理：类型与大小校验、目录准备、落盘与失败清理。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::UploadConfig;
use crate::error::{DirectoryCreateError, SaveError, UploadError};
use crate::logging::{LogEvent, TracingLogger, UploadLogger};
use crate::source::FileHandle;
use crate::storage::{ensure_directory, image_extension, remove_file, save_file, stored_file_name};

/// Validates and stores uploaded images under the configured directory.
pub struct ImageUploader {
    config: UploadConfig,
    logger: Arc<dyn UploadLogger>,
}

impl std::fmt::Debug for ImageUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUploader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImageUploader {
    pub fn new(config: UploadConfig, logger: Arc<dyn UploadLogger>) -> Self {
        Self { config, logger }
    }

    /// 使用 tracing 作为日志输出。
    pub fn with_tracing(config: UploadConfig) -> Self {
        Self::new(config, Arc::new(TracingLogger))
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// 确保上传目录存在，失败时记录 error 日志。
    pub async fn ensure_upload_directory(&self, dir: &Path) -> Result<(), DirectoryCreateError> {
        if let Err(err) = ensure_directory(dir, self.config.dir_mode).await {
            self.logger.log(
                LogEvent::error("failed to create upload directory")
                    .directory(dir)
                    .with_error(&err.source),
            );
            return Err(err);
        }
        Ok(())
    }

    /// 校验并保存图片，返回 `<upload_dir>/<纳秒时间戳><ext>`。
    ///
    /// Type and size are checked before any filesystem access. There is a
    /// single save attempt; a failure is logged and returned.
    pub async fn process_image_upload<H: FileHandle>(
        &self,
        file: &H,
    ) -> Result<PathBuf, UploadError> {
        let extension = image_extension(file.name());
        if !self.config.is_allowed(&extension) {
            return Err(UploadError::InvalidType {
                extension,
                allowed: self.config.allowed_display(),
            });
        }

        let size = file.size();
        if size > self.config.max_size {
            return Err(UploadError::TooLarge {
                size,
                limit: self.config.max_size,
            });
        }

        let upload_dir = &self.config.upload_dir;
        self.ensure_upload_directory(upload_dir).await?;

        let image_path = upload_dir.join(stored_file_name(&extension));
        if let Err(err) = self.save_uploaded_file(file, &image_path).await {
            self.logger.log(
                LogEvent::error("failed to save uploaded file")
                    .path(&image_path)
                    .with_error(&err),
            );
            return Err(UploadError::Save {
                path: image_path,
                source: err,
            });
        }

        self.logger.log(
            LogEvent::debug("uploaded image successfully")
                .path(&image_path)
                .size(size),
        );
        Ok(image_path)
    }

    /// 尽力删除已保存的文件，删除失败只记录 debug 日志。
    pub async fn cleanup_image_on_failure(&self, image_path: &Path) {
        if let Err(err) = remove_file(image_path).await {
            self.logger.log(
                LogEvent::debug("failed to cleanup uploaded file")
                    .path(image_path)
                    .with_error(&err),
            );
        }
    }

    pub async fn save_uploaded_file<H: FileHandle>(
        &self,
        file: &H,
        dst: &Path,
    ) -> Result<u64, SaveError> {
        save_file(file, dst).await
    }
}
