//! Scratch space for per-page intermediates.
//!
//! Every page gets its own pair of files, named by page index so pages never
//! collide. A [`PageScratch`] removes its files when dropped, which also
//! covers early returns through `?`.

use std::path::{Path, PathBuf};

use slidereveal_common::error::SlideResult;

/// A private working directory, removed with everything in it on drop.
#[derive(Debug)]
pub struct ScratchDir {
    dir: tempfile::TempDir,
}

impl ScratchDir {
    /// Create a fresh directory under the system temp dir.
    pub fn new() -> SlideResult<Self> {
        let dir = tempfile::Builder::new().prefix("slidereveal-").tempdir()?;
        tracing::debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir })
    }

    /// Create a fresh directory inside `parent`.
    pub fn new_in(parent: &Path) -> SlideResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("slidereveal-")
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Claim the intermediates of one page.
    pub fn page(&self, index: usize, image_extension: &str) -> PageScratch {
        PageScratch {
            pdf: self.dir.path().join(format!("page-{index}.pdf")),
            image: self
                .dir
                .path()
                .join(format!("page-{index}.{image_extension}")),
        }
    }
}

/// The single-page PDF and raster of one page. Both are deleted on drop.
#[derive(Debug)]
pub struct PageScratch {
    pub pdf: PathBuf,
    pub image: PathBuf,
}

impl Drop for PageScratch {
    fn drop(&mut self) {
        for path in [&self.pdf, &self.image] {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove intermediate");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_files_are_named_by_index() {
        let scratch = ScratchDir::new().unwrap();
        let page = scratch.page(7, "jpg");
        assert_eq!(page.pdf.file_name().unwrap(), "page-7.pdf");
        assert_eq!(page.image.file_name().unwrap(), "page-7.jpg");
        assert!(page.pdf.starts_with(scratch.path()));
    }

    #[test]
    fn test_page_files_removed_on_drop() {
        let scratch = ScratchDir::new().unwrap();
        let (pdf, image) = {
            let page = scratch.page(0, "jpg");
            std::fs::write(&page.pdf, b"%PDF-1.5").unwrap();
            std::fs::write(&page.image, b"jpeg").unwrap();
            (page.pdf.clone(), page.image.clone())
        };
        assert!(!pdf.exists());
        assert!(!image.exists());
        assert!(scratch.path().exists());
    }

    #[test]
    fn test_missing_files_are_fine_on_drop() {
        let scratch = ScratchDir::new().unwrap();
        drop(scratch.page(3, "png"));
    }

    #[test]
    fn test_files_removed_when_processing_fails() {
        fn failing_step(scratch: &ScratchDir) -> SlideResult<()> {
            let page = scratch.page(1, "jpg");
            std::fs::write(&page.pdf, b"%PDF-1.5")?;
            Err(slidereveal_common::SlideError::rasterize("boom"))
        }

        let scratch = ScratchDir::new().unwrap();
        assert!(failing_step(&scratch).is_err());
        assert!(!scratch.path().join("page-1.pdf").exists());
    }

    #[test]
    fn test_directory_removed_on_drop() {
        let parent = tempfile::tempdir().unwrap();
        let path = {
            let scratch = ScratchDir::new_in(parent.path()).unwrap();
            std::fs::write(scratch.path().join("flattened.pdf"), b"x").unwrap();
            scratch.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
