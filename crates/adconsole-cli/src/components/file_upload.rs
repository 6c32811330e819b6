//! Local file selection for the upload forms.

use std::path::{Component, Path};

use adconsole_api_client::UploadFile;
use adconsole_core::{format_file_size, ConsoleError, ConsoleResult};

/// Media types a form takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    ImagesAndVideos,
    VideosOnly,
}

impl Accept {
    fn allows(&self, content_type: &str) -> bool {
        match self {
            Accept::ImagesAndVideos => {
                content_type.starts_with("image/") || content_type.starts_with("video/")
            }
            Accept::VideosOnly => content_type.starts_with("video/"),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Accept::ImagesAndVideos => "image or video",
            Accept::VideosOnly => "video",
        }
    }
}

/// A file read from disk and typed, ready to hand to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    upload: UploadFile,
}

impl SelectedFile {
    pub fn from_path(path: impl AsRef<Path>, accept: Accept) -> ConsoleResult<Self> {
        let path = path.as_ref();
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(ConsoleError::validation(format!(
                "Invalid input: {}",
                path.display()
            )));
        }

        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(ConsoleError::validation(format!(
                "File is empty: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ConsoleError::validation(format!("Invalid file name: {}", path.display()))
            })?;

        let content_type = detect_content_type(&bytes, path);
        if !accept.allows(&content_type) {
            return Err(ConsoleError::validation(format!(
                "Unsupported file type {} (expected {})",
                content_type,
                accept.description()
            )));
        }

        tracing::debug!(file = %path.display(), content_type = %content_type, size = bytes.len(), "Selected file");

        Ok(Self {
            upload: UploadFile::new(file_name, content_type, bytes),
        })
    }

    pub fn name(&self) -> &str {
        &self.upload.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.upload.content_type
    }

    pub fn size(&self) -> u64 {
        self.upload.size()
    }

    /// `Name: ..., Size: ..., Type: ...` summary shown under the picker.
    pub fn summary(&self) -> String {
        format!(
            "Name: {}\nSize: {}\nType: {}",
            self.name(),
            format_file_size(Some(self.size())),
            self.content_type()
        )
    }

    pub fn to_upload(&self) -> UploadFile {
        self.upload.clone()
    }
}

/// Sniff magic bytes first, then fall back to the extension.
fn detect_content_type(bytes: &[u8], path: &Path) -> String {
    if let Some(kind) = infer::get(bytes) {
        return kind.mime_type().to_string();
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn sniffs_image_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "banner.bin", PNG_HEADER);

        let selected = SelectedFile::from_path(&path, Accept::ImagesAndVideos).unwrap();
        assert_eq!(selected.content_type(), "image/png");
        assert_eq!(selected.name(), "banner.bin");
        assert_eq!(selected.size(), PNG_HEADER.len() as u64);
        assert!(selected.summary().contains("Size: 12 B"));
    }

    #[test]
    fn falls_back_to_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "spot.MOV", b"not really a movie");

        let selected = SelectedFile::from_path(&path, Accept::VideosOnly).unwrap();
        assert_eq!(selected.content_type(), "video/quicktime");
        assert_eq!(selected.to_upload().file_name, "spot.MOV");
    }

    #[test]
    fn templates_reject_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "banner.png", PNG_HEADER);

        let err = SelectedFile::from_path(&path, Accept::VideosOnly).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn rejects_other_media() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "notes.txt", b"hello");

        let err = SelectedFile::from_path(&path, Accept::ImagesAndVideos).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_parent_dir_and_empty_files() {
        let err = SelectedFile::from_path("../secret.png", Accept::ImagesAndVideos).unwrap_err();
        assert!(err.to_string().starts_with("Invalid input"));

        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "empty.png", b"");
        assert!(SelectedFile::from_path(&path, Accept::ImagesAndVideos)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SelectedFile::from_path(dir.path().join("gone.mp4"), Accept::VideosOnly)
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Io(_)));
    }
}
