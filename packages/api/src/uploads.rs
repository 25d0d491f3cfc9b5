//! # Uploaded image storage
//!
//! Images live under `<static_dir>/images/<folder>/` so the static file
//! service can hand them straight back to the browser:
//!
//! ```text
//! static/images/
//! ├── records/        # uploads submitted to /predict
//! ├── localized/      # the same uploads with detection boxes drawn
//! └── profile_pics/   # 125×125 thumbnails
//! ```
//!
//! Stored names are random (16 hex chars) plus the original, lower-cased
//! extension. Only PNG and JPEG are accepted.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use rand::RngCore;
use thiserror::Error;

use crate::models::DEFAULT_PROFILE_IMAGE;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Edge of the box profile pictures are shrunk into.
pub const THUMBNAIL_SIZE: u32 = 125;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    Empty,
    #[error("File type .{0} is not allowed, use png, jpg or jpeg")]
    Extension(String),
    #[error("Invalid file name")]
    Name,
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folder {
    Records,
    Localized,
    ProfilePics,
}

impl Folder {
    pub const ALL: [Folder; 3] = [Folder::Records, Folder::Localized, Folder::ProfilePics];

    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Records => "records",
            Folder::Localized => "localized",
            Folder::ProfilePics => "profile_pics",
        }
    }
}

/// Validated lower-case extension of an uploaded file name.
pub fn allowed_extension(filename: &str) -> Result<String, UploadError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| UploadError::Extension(String::new()))?;

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(UploadError::Extension(ext))
    }
}

/// Whether `name` is a bare file name we could have generated.
pub fn is_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-')
}

fn random_stem() -> String {
    let mut bytes = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Filesystem-backed image store rooted at the static directory.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: static_dir.into().join("images"),
        }
    }

    /// Create the image folders.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for folder in Folder::ALL {
            std::fs::create_dir_all(self.folder_dir(folder))?;
        }
        Ok(())
    }

    pub fn folder_dir(&self, folder: Folder) -> PathBuf {
        self.root.join(folder.as_str())
    }

    pub fn path(&self, folder: Folder, name: &str) -> Result<PathBuf, UploadError> {
        if !is_stored_name(name) {
            return Err(UploadError::Name);
        }
        Ok(self.folder_dir(folder).join(name))
    }

    pub fn exists(&self, folder: Folder, name: &str) -> bool {
        self.path(folder, name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Store the uploaded bytes unchanged. Returns the stored name.
    pub fn save_raw(
        &self,
        folder: Folder,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        let ext = allowed_extension(original_name)?;
        let name = format!("{}.{ext}", random_stem());
        std::fs::write(self.folder_dir(folder).join(&name), bytes)?;
        tracing::debug!(folder = folder.as_str(), %name, size = bytes.len(), "Stored upload");
        Ok(name)
    }

    /// Shrink `image` to fit [`THUMBNAIL_SIZE`] and store it as a profile picture.
    pub fn save_thumbnail(
        &self,
        original_name: &str,
        image: &DynamicImage,
    ) -> Result<String, UploadError> {
        let ext = allowed_extension(original_name)?;
        let name = format!("{}.{ext}", random_stem());
        // JPEG has no alpha channel.
        let thumbnail = DynamicImage::ImageRgb8(image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgb8());
        thumbnail.save(self.folder_dir(Folder::ProfilePics).join(&name))?;
        Ok(name)
    }

    /// Store an already rendered image under `name` (same stem as its source).
    pub fn save_image(
        &self,
        folder: Folder,
        name: &str,
        image: &DynamicImage,
    ) -> Result<(), UploadError> {
        image.save(self.path(folder, name)?)?;
        Ok(())
    }

    /// Best-effort removal; the default profile picture is never touched.
    pub fn remove(&self, folder: Folder, name: &str) {
        if folder == Folder::ProfilePics && name == DEFAULT_PROFILE_IMAGE {
            return;
        }
        match self.path(folder, name) {
            Ok(path) => {
                if let Err(e) = std::fs::remove_file(&path) {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %path.display(), "Failed to remove image: {}", e);
                    }
                }
            }
            Err(_) => tracing::warn!(%name, "Refusing to remove suspicious file name"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.ensure_dirs().unwrap();
        (dir, store)
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("crowd.JPG").unwrap(), "jpg");
        assert_eq!(allowed_extension("a.b.png").unwrap(), "png");
        assert!(matches!(allowed_extension("clip.gif"), Err(UploadError::Extension(e)) if e == "gif"));
        assert!(allowed_extension("noext").is_err());
    }

    #[test]
    fn test_is_stored_name() {
        assert!(is_stored_name("0123abcd.png"));
        assert!(!is_stored_name("../etc/passwd"));
        assert!(!is_stored_name("dir/file.png"));
        assert!(!is_stored_name(".hidden"));
        assert!(!is_stored_name(""));
    }

    #[test]
    fn test_save_raw() {
        let (_dir, store) = store();
        let name = store.save_raw(Folder::Records, "photo.JPEG", b"bytes").unwrap();
        assert!(name.ends_with(".jpeg"));
        assert_eq!(name.len(), 16 + ".jpeg".len());
        assert!(store.exists(Folder::Records, &name));

        assert!(matches!(
            store.save_raw(Folder::Records, "photo.png", b""),
            Err(UploadError::Empty)
        ));
        assert!(matches!(
            store.save_raw(Folder::Records, "photo.exe", b"x"),
            Err(UploadError::Extension(_))
        ));
    }

    #[test]
    fn test_save_thumbnail_fits_box() {
        let (_dir, store) = store();
        let image = DynamicImage::new_rgb8(500, 250);
        let name = store.save_thumbnail("me.png", &image).unwrap();

        let saved = image::open(store.path(Folder::ProfilePics, &name).unwrap()).unwrap();
        assert_eq!(saved.width(), THUMBNAIL_SIZE);
        assert!(saved.height() < THUMBNAIL_SIZE);
    }

    #[test]
    fn test_remove_keeps_default_picture() {
        let (_dir, store) = store();
        let default = store.path(Folder::ProfilePics, DEFAULT_PROFILE_IMAGE).unwrap();
        std::fs::write(&default, b"png").unwrap();

        store.remove(Folder::ProfilePics, DEFAULT_PROFILE_IMAGE);
        assert!(default.exists());

        let name = store.save_raw(Folder::ProfilePics, "x.png", b"png").unwrap();
        store.remove(Folder::ProfilePics, &name);
        assert!(!store.exists(Folder::ProfilePics, &name));
    }
}
