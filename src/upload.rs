//! Temporary storage for uploaded images.
//!
//! Each upload lives in a named temp file under the upload directory for the
//! duration of one request. The file is deleted when [`StagedImage`] drops,
//! whether analysis succeeded or not.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::vision::ImageInput;

const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const DEFAULT_FILENAME: &str = "upload";

#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    filename: String,
    mime_type: String,
    size: usize,
}

impl StagedImage {
    /// Write `bytes` to a new temp file in `dir`. Empty uploads are rejected.
    pub async fn stage(
        dir: &Path,
        filename: Option<String>,
        mime_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AppError> {
        if bytes.is_empty() {
            return Err(AppError::MissingUpload);
        }

        let dir: PathBuf = dir.to_path_buf();
        let size = bytes.len();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
            std::fs::create_dir_all(&dir)?;
            let mut file = tempfile::Builder::new()
                .prefix("upload-")
                .tempfile_in(&dir)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok(file)
        })
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))??;

        let filename = filename
            .map(|name| base_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        let mime_type = mime_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        tracing::debug!(
            path = %file.path().display(),
            %filename,
            %mime_type,
            size,
            "image staged"
        );

        Ok(Self {
            file,
            filename,
            mime_type,
            size,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Client-supplied file name, without any directory part.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Read the staged bytes back for the vision provider.
    pub async fn load(&self) -> Result<ImageInput, AppError> {
        let bytes = tokio::fs::read(self.path()).await?;
        Ok(ImageInput {
            bytes,
            mime_type: self.mime_type.clone(),
        })
    }
}

fn base_name(name: &str) -> String {
    name.rsplit(['/', '\\']).next().unwrap_or(name).trim().to_string()
}
