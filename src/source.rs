//! 上传来源抽象：文件名、声明大小与可读流。

use axum::body::Bytes;
use axum::extract::multipart::{Field, MultipartError};
use std::future::Future;
use std::io::{self, Cursor};
use std::path::PathBuf;
use tokio::fs::{self, File};
use tokio::io::AsyncRead;

/// A file offered for upload. The uploader opens it at most once per call.
pub trait FileHandle: Send + Sync {
    type Reader: AsyncRead + Unpin + Send;

    /// 客户端提供的原始文件名。
    fn name(&self) -> &str;

    /// 声明的字节数，用于在读取内容前做大小校验。
    fn size(&self) -> u64;

    fn open(&self) -> impl Future<Output = io::Result<Self::Reader>> + Send;
}

/// 磁盘上已存在的文件。
#[derive(Clone, Debug)]
pub struct LocalFile {
    name: String,
    path: PathBuf,
    size: u64,
}

impl LocalFile {
    /// 读取元数据，以路径最后一段作为文件名。
    pub async fn from_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let metadata = fs::metadata(&path).await?;
        if metadata.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "path is not a file",
            ));
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            path,
            size: metadata.len(),
        })
    }
}

impl FileHandle for LocalFile {
    type Reader = File;

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn open(&self) -> io::Result<File> {
        File::open(&self.path).await
    }
}

/// 已缓冲到内存的 multipart 文件字段。
#[derive(Clone, Debug)]
pub struct UploadedFile {
    name: String,
    data: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// 读取整个字段内容；没有文件名的字段得到空名称。
    pub async fn from_field(field: Field<'_>) -> Result<Self, MultipartError> {
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        Ok(Self { name, data })
    }
}

impl FileHandle for UploadedFile {
    type Reader = Cursor<Bytes>;

    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    async fn open(&self) -> io::Result<Cursor<Bytes>> {
        Ok(Cursor::new(self.data.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::io::AsyncReadExt;

    #[tokio::test]
    async fn local_file_reports_name_and_size() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("Cover.JPG");
        std::fs::write(&path, b"jpeg-bytes").expect("write source");

        let file = LocalFile::from_path(&path).await.expect("local file");
        assert_eq!(file.name(), "Cover.JPG");
        assert_eq!(file.size(), 10);

        let mut reader = file.open().await.expect("open");
        let mut contents = Vec::new();
        reader.read_to_end(&mut contents).await.expect("read");
        assert_eq!(contents, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn local_file_rejects_missing_and_directories() {
        let temp = tempdir().expect("tempdir");
        let missing = LocalFile::from_path(temp.path().join("nope.png")).await;
        assert_eq!(
            missing.map(|_| ()).map_err(|err| err.kind()),
            Err(io::ErrorKind::NotFound)
        );
        let dir = LocalFile::from_path(temp.path()).await;
        assert!(dir.is_err());
    }

    #[tokio::test]
    async fn uploaded_file_can_be_opened_repeatedly() {
        let file = UploadedFile::new("a.png", vec![1u8, 2, 3]);
        assert_eq!(file.size(), 3);
        for _ in 0..2 {
            let mut reader = file.open().await.expect("open");
            let mut contents = Vec::new();
            reader.read_to_end(&mut contents).await.expect("read");
            assert_eq!(contents, vec![1, 2, 3]);
        }
    }
}
