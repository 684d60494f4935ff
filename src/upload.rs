//! Files selected for upload to the document endpoint

use std::path::Path;

/// A file read into memory, ready to become one multipart part
#[derive(Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file from disk, guessing its content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self, String> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| format!("Not a file path: {}", path.display()))?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        Ok(Self::new(file_name, mime.essence_str(), bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn reads_file_and_guesses_mime() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, b"retrieval corpus").unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.file_name, "notes.txt");
        assert_eq!(file.mime, "text/plain");
        assert_eq!(file.bytes, b"retrieval corpus");
    }

    #[tokio::test]
    async fn unknown_extension_falls_back_to_octet_stream() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blob.zzqx");
        std::fs::write(&path, [0u8, 1, 2]).unwrap();

        let file = UploadFile::from_path(&path).await.unwrap();
        assert_eq!(file.mime, "application/octet-stream");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = UploadFile::from_path(&temp_dir.path().join("nope.pdf"))
            .await
            .unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
