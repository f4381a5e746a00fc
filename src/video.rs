use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::VideoError;

/// Extensions the picker accepts, with the content type sent to the service
const ACCEPTED: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
];

/// A clip selected on the analyze step
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl VideoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, VideoError> {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name)
            .ok_or_else(|| VideoError::UnsupportedType(file_name.clone()))?;
        if bytes.is_empty() {
            return Err(VideoError::Empty(file_name));
        }

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, VideoError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| VideoError::UnsupportedType(path.display().to_string()))?;

        // check the extension before reading a possibly large file
        if mime_for(&file_name).is_none() {
            return Err(VideoError::UnsupportedType(file_name));
        }

        let bytes = fs::read(path).map_err(|source| VideoError::Read {
            path: path.display().to_string(),
            source,
        })?;
        debug!(file = %file_name, len = bytes.len(), "video loaded");

        Self::new(file_name, bytes)
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name)
        .extension()?
        .to_string_lossy()
        .to_lowercase();
    ACCEPTED
        .iter()
        .find(|(accepted, _)| *accepted == ext)
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_mime_types() {
        assert_eq!(mime_for("run.mp4"), Some("video/mp4"));
        assert_eq!(mime_for("RUN.MOV"), Some("video/quicktime"));
        assert_eq!(mime_for("clip.webm"), Some("video/webm"));
        assert_eq!(mime_for("notes.txt"), None);
        assert_eq!(mime_for("no_extension"), None);
    }

    #[test]
    fn test_from_path_reads_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kickflip.mp4");
        fs::write(&path, b"\x00\x00\x00\x18ftypmp42").unwrap();

        let video = VideoFile::from_path(&path).unwrap();
        assert_eq!(video.file_name, "kickflip.mp4");
        assert_eq!(video.mime_type, "video/mp4");
        assert_eq!(video.bytes.len(), 12);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let result = VideoFile::from_path(dir.path().join("missing.mp4"));
        assert_matches!(result, Err(VideoError::Read { .. }));
    }

    #[test]
    fn test_rejects_unsupported_and_empty() {
        assert_matches!(
            VideoFile::new("slides.pdf", vec![1, 2, 3]),
            Err(VideoError::UnsupportedType(_))
        );
        assert_matches!(VideoFile::new("empty.mp4", vec![]), Err(VideoError::Empty(_)));
    }

    #[test]
    fn test_debug_omits_bytes() {
        let video = VideoFile::new("a.mp4", vec![7; 64]).unwrap();
        let dbg = format!("{:?}", video);
        assert!(dbg.contains("len: 64"));
        assert!(!dbg.contains("7, 7"));
    }
}
