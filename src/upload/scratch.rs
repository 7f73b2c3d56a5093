//! Per-request scratch storage
//!
//! A [`ScratchSpace`] is a uniquely named directory inside the shared scratch
//! root. Every file a request writes is allocated inside it, and dropping the
//! space deletes the directory together with everything in it. The request
//! owns the space, so cleanup runs on every exit path: success, error,
//! timeout, or cancellation of the request future.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use uuid::Uuid;

/// Directory prefix for request scratch spaces
const SCRATCH_PREFIX: &str = "passport-ocr-";

/// Scoped scratch directory owned by one request
#[derive(Debug)]
pub struct ScratchSpace {
    dir: Option<TempDir>,
    files: Vec<PathBuf>,
}

impl ScratchSpace {
    /// Create a fresh scratch space under `root`, creating `root` if needed
    pub fn create_in(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir_in(root)?;

        tracing::debug!(scratch = %dir.path().display(), "Scratch space created");

        Ok(Self {
            dir: Some(dir),
            files: Vec::new(),
        })
    }

    /// Directory holding this request's files
    pub fn path(&self) -> &Path {
        self.dir
            .as_ref()
            .map(TempDir::path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Reserve a unique path for `name`.
    ///
    /// The file is not created; the caller writes it. The name is prefixed
    /// with a random UUID so no two allocations collide.
    pub fn allocate(&mut self, name: &str) -> PathBuf {
        let path = self.path().join(format!("{}_{}", Uuid::new_v4(), name));
        self.files.push(path.clone());
        path
    }

    /// Delete one file ahead of the final cleanup
    pub async fn discard(&mut self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await?;
        self.files.retain(|p| p != path);
        Ok(())
    }

    /// Files allocated and not yet discarded
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Delete the scratch space now, reporting failure to the caller
    pub fn cleanup(mut self) -> io::Result<()> {
        self.files.clear();
        match self.dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => tracing::debug!(
                scratch = %path.display(),
                files = self.files.len(),
                "Scratch space removed"
            ),
            Err(e) => tracing::warn!(
                scratch = %path.display(),
                error = %e,
                "Failed to remove scratch space"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn test_drop_removes_all_files() {
        let root = tempfile::TempDir::new().unwrap();

        let space_path = {
            let mut space = ScratchSpace::create_in(root.path()).unwrap();
            for name in ["a.png", "b.jpg"] {
                let path = space.allocate(name);
                std::fs::write(&path, b"bytes").unwrap();
            }
            assert_eq!(entries(space.path()), 2);
            space.path().to_path_buf()
        };

        assert!(!space_path.exists());
        assert_eq!(entries(root.path()), 0);
    }

    #[test]
    fn test_allocations_are_unique() {
        let root = tempfile::TempDir::new().unwrap();
        let mut space = ScratchSpace::create_in(root.path()).unwrap();

        let first = space.allocate("scan.png");
        let second = space.allocate("scan.png");

        assert_ne!(first, second);
        assert!(first.file_name().unwrap().to_str().unwrap().ends_with("_scan.png"));
        assert_eq!(space.files().len(), 2);
    }

    #[test]
    fn test_spaces_do_not_share_directories() {
        let root = tempfile::TempDir::new().unwrap();
        let one = ScratchSpace::create_in(root.path()).unwrap();
        let two = ScratchSpace::create_in(root.path()).unwrap();

        assert_ne!(one.path(), two.path());
        assert_eq!(entries(root.path()), 2);
    }

    #[tokio::test]
    async fn test_discard_removes_single_file() {
        let root = tempfile::TempDir::new().unwrap();
        let mut space = ScratchSpace::create_in(root.path()).unwrap();

        let keep = space.allocate("keep.jpg");
        let gone = space.allocate("gone.pdf");
        std::fs::write(&keep, b"k").unwrap();
        std::fs::write(&gone, b"g").unwrap();

        space.discard(&gone).await.unwrap();

        assert!(!gone.exists());
        assert!(keep.exists());
        assert_eq!(space.files(), &[keep]);
    }

    #[test]
    fn test_explicit_cleanup() {
        let root = tempfile::TempDir::new().unwrap();
        let space = ScratchSpace::create_in(root.path()).unwrap();
        let path = space.path().to_path_buf();

        space.cleanup().unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_missing_root_is_created() {
        let root = tempfile::TempDir::new().unwrap();
        let nested = root.path().join("nested").join("scratch");

        let space = ScratchSpace::create_in(&nested).unwrap();
        assert!(space.path().starts_with(&nested));
    }
}
