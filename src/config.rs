//! 上传配置与默认值。

use serde::Deserialize;
use std::path::PathBuf;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads/products";
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5 << 20;
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Settings handed to [`crate::upload::ImageUploader`] at construction time.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UploadConfig {
    /// 图片存放目录，相对路径以进程工作目录为基准。
    pub upload_dir: PathBuf,
    /// 声明大小的上限（字节），等于上限时仍允许。
    pub max_size: u64,
    /// 允许的扩展名，带前导点，比较时不区分大小写。
    pub allowed_extensions: Vec<String>,
    /// 新建目录的权限位（仅 unix 生效）。
    pub dir_mode: u32,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_size: DEFAULT_MAX_IMAGE_SIZE,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            dir_mode: DEFAULT_DIR_MODE,
        }
    }
}

impl UploadConfig {
    /// 使用默认限制，仅替换存放目录。
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            ..Self::default()
        }
    }

    /// 判断已小写化的扩展名（如 `.png`）是否在允许列表中。
    pub fn is_allowed(&self, extension: &str) -> bool {
        !extension.is_empty()
            && self
                .allowed_extensions
                .iter()
                .filter_map(|allowed| normalize_extension(allowed))
                .any(|allowed| allowed == extension)
    }

    /// Human readable list used in error messages, e.g. `JPG, JPEG, PNG`.
    pub fn allowed_display(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_uppercase())
            .filter(|ext| !ext.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 统一为小写并带前导点；空项（含只有 `.` 的项）返回 `None`。
fn normalize_extension(value: &str) -> Option<String> {
    let bare = value.trim().trim_start_matches('.').to_lowercase();
    if bare.is_empty() {
        return None;
    }
    Some(format!(".{bare}"))
}
