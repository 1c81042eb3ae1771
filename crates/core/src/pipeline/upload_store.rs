use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Per-request scoped storage for an uploaded recording.
///
/// Each upload lands in its own generated temp directory, so concurrent
/// requests with the same file name cannot collide. Only the original
/// extension is kept, for format sniffing. The directory and everything
/// derived into it (the normalizer's canonical wav) are removed on drop,
/// on success and failure paths alike.
pub struct ScopedUpload {
    dir: TempDir,
    path: PathBuf,
}

impl ScopedUpload {
    pub fn persist(original_name: &str, bytes: &[u8]) -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("callcoach-").tempdir()?;

        let file_name = match Path::new(original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("upload.{ext}"),
            None => "upload".to_string(),
        };
        let path = dir.path().join(file_name);
        fs::write(&path, bytes)?;

        log::debug!("stored upload at {}", path.display());
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_writes_bytes() {
        let upload = ScopedUpload::persist("call.mp3", b"fake mp3 bytes").unwrap();
        assert_eq!(fs::read(upload.path()).unwrap(), b"fake mp3 bytes");
    }

    #[test]
    fn test_persist_keeps_extension_only() {
        let upload = ScopedUpload::persist("Quarterly Review (final).m4a", b"x").unwrap();
        assert_eq!(upload.path().file_name().unwrap(), "upload.m4a");
    }

    #[test]
    fn test_same_name_uploads_do_not_collide() {
        let a = ScopedUpload::persist("call.wav", b"a").unwrap();
        let b = ScopedUpload::persist("call.wav", b"b").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(fs::read(a.path()).unwrap(), b"a");
        assert_eq!(fs::read(b.path()).unwrap(), b"b");
    }

    #[test]
    fn test_drop_removes_directory_and_derived_files() {
        let upload = ScopedUpload::persist("call.mp3", b"x").unwrap();
        let dir = upload.dir().to_path_buf();
        let derived = dir.join("upload.wav");
        fs::write(&derived, b"converted").unwrap();

        drop(upload);
        assert!(!derived.exists());
        assert!(!dir.exists());
    }
}
