//! 文件系统操作：目录准备、流式落盘、删除与存储文件名生成。

use chrono::Utc;
use std::io;
use std::path::Path;
use tokio::fs::{self, DirBuilder, File};
use tokio::io::AsyncWriteExt;

use crate::error::{DirectoryCreateError, SaveError};
use crate::source::FileHandle;

/// 递归创建目录；目录已存在时直接成功。
pub async fn ensure_directory(path: &Path, mode: u32) -> Result<(), DirectoryCreateError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    builder
        .create(path)
        .await
        .map_err(|source| DirectoryCreateError {
            path: path.to_path_buf(),
            source,
        })
}

/// 将来源内容完整复制到 `dst`，返回写入的字节数。
///
/// The source is opened before the destination is created, so a source that
/// cannot be opened never leaves a file behind. A failed copy may leave a
/// truncated destination for the caller to remove.
pub async fn save_file<H: FileHandle>(file: &H, dst: &Path) -> Result<u64, SaveError> {
    let mut src = file.open().await.map_err(SaveError::OpenSource)?;
    let mut out = File::create(dst).await.map_err(SaveError::CreateDest)?;

    let copied = tokio::io::copy(&mut src, &mut out)
        .await
        .map_err(SaveError::Copy)?;
    out.flush().await.map_err(SaveError::Copy)?;
    Ok(copied)
}

pub async fn remove_file(path: &Path) -> io::Result<()> {
    fs::remove_file(path).await
}

/// 取最后一个路径段中最后一个 `.` 起的后缀并小写化，没有则返回空串。
///
/// Both `/` and `\\` count as separators on every platform, since browsers on
/// Windows may send the full client path as the file name.
pub fn image_extension(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rfind('.') {
        Some(index) => base[index..].to_lowercase(),
        None => String::new(),
    }
}

/// `<unix 纳秒时间戳><ext>`
pub fn stored_file_name(extension: &str) -> String {
    format!("{}{extension}", unix_nanos())
}

fn unix_nanos() -> i64 {
    let now = Utc::now();
    now.timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1_000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UploadedFile;
    use tempfile::tempdir;

    #[test]
    fn image_extension_uses_last_component() {
        assert_eq!(image_extension("photo.PNG"), ".png");
        assert_eq!(image_extension("archive.tar.JPeG"), ".jpeg");
        assert_eq!(image_extension("dir.png/noext"), "");
        assert_eq!(image_extension("C:\\pics\\cat.Jpg"), ".jpg");
        assert_eq!(image_extension("trailing."), ".");
        assert_eq!(image_extension(""), "");
    }

    #[test]
    fn stored_file_name_is_numeric_stem() {
        let name = stored_file_name(".png");
        let stem = name.strip_suffix(".png").expect("suffix");
        assert!(!stem.is_empty());
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn ensure_directory_creates_parents_and_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let target = temp.path().join("uploads").join("products");
        ensure_directory(&target, 0o755).await.expect("first create");
        ensure_directory(&target, 0o755).await.expect("second create");
        assert!(target.is_dir());
    }

    #[tokio::test]
    async fn ensure_directory_fails_when_path_is_file() {
        let temp = tempdir().expect("tempdir");
        let blocker = temp.path().join("uploads");
        std::fs::write(&blocker, b"not a dir").expect("write blocker");

        let result = ensure_directory(&blocker.join("products"), 0o755).await;
        let err = result.expect_err("should fail");
        assert_eq!(err.path, blocker.join("products"));
    }

    #[tokio::test]
    async fn save_file_copies_all_bytes() {
        let temp = tempdir().expect("tempdir");
        let dst = temp.path().join("out.png");
        let payload: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
        let file = UploadedFile::new("in.png", payload.clone());

        let written = save_file(&file, &dst).await.expect("save");
        assert_eq!(written, payload.len() as u64);
        assert_eq!(std::fs::read(&dst).expect("read"), payload);
    }

    #[tokio::test]
    async fn save_file_reports_create_dest_failure() {
        let temp = tempdir().expect("tempdir");
        let dst = temp.path().join("missing").join("out.png");
        let file = UploadedFile::new("in.png", vec![1u8; 4]);

        let result = save_file(&file, &dst).await;
        assert!(matches!(result, Err(SaveError::CreateDest(_))));
    }

    #[tokio::test]
    async fn remove_file_reports_missing() {
        let temp = tempdir().expect("tempdir");
        let result = remove_file(&temp.path().join("gone.png")).await;
        assert_eq!(result.map_err(|err| err.kind()), Err(io::ErrorKind::NotFound));
    }
}
