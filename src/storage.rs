use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tokio::fs;

use crate::error::AppError;
use crate::models::Image;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];
pub const SUPPORTED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif"];

/// Content sniffing looks at no more than this many leading bytes.
const SNIFF_LEN: usize = 512;

/// Filesystem storage for gallery images.
///
/// Every gallery owns `{root}/gallery-{id}/`; an image is just a file in that
/// directory, identified by its base name.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn gallery_dir(&self, gallery_id: i64) -> PathBuf {
        self.root.join(format!("gallery-{gallery_id}"))
    }

    /// Images of a gallery sorted by file name. Files with unsupported
    /// extensions are skipped; a gallery without a directory has no images.
    pub async fn list(&self, gallery_id: i64) -> Result<Vec<Image>, AppError> {
        let dir = self.gallery_dir(gallery_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if has_supported_extension(&filename) {
                images.push(Image {
                    gallery_id,
                    path: entry.path(),
                    filename,
                });
            }
        }
        images.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(images)
    }

    /// Only files `list` would show can be found.
    pub async fn find(&self, gallery_id: i64, filename: &str) -> Result<Image, AppError> {
        let filename = sanitize_filename(filename)
            .filter(|name| has_supported_extension(name))
            .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;
        let path = self.gallery_dir(gallery_id).join(filename);

        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Image {
                gallery_id,
                filename: filename.to_string(),
                path,
            }),
            Ok(_) => Err(AppError::NotFound("Image not found".to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AppError::NotFound("Image not found".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate and store an uploaded image, overwriting a file of the same
    /// name. The write is not atomic.
    pub async fn create(
        &self,
        gallery_id: i64,
        filename: &str,
        contents: &[u8],
    ) -> Result<Image, AppError> {
        let filename = validate_upload(filename, contents)?;

        let dir = self.gallery_dir(gallery_id);
        fs::create_dir_all(&dir).await?;
        let path = dir.join(filename);
        fs::write(&path, contents).await?;

        tracing::info!(gallery_id, filename, bytes = contents.len(), "Stored image");
        Ok(Image {
            gallery_id,
            filename: filename.to_string(),
            path,
        })
    }

    pub async fn delete(&self, gallery_id: i64, filename: &str) -> Result<(), AppError> {
        let image = self.find(gallery_id, filename).await?;
        fs::remove_file(&image.path).await?;
        Ok(())
    }

    /// Remove the whole gallery directory. Missing directories are fine.
    pub async fn delete_gallery(&self, gallery_id: i64) -> Result<(), AppError> {
        match fs::remove_dir_all(self.gallery_dir(gallery_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Strip any directory components from a client-supplied name. Returns `None`
/// when nothing usable is left.
pub fn sanitize_filename(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    match base {
        "" | "." | ".." => None,
        base => Some(base),
    }
}

/// Check an upload by extension and by sniffed content. Returns the
/// sanitized file name to store it under.
pub fn validate_upload<'a>(filename: &'a str, contents: &[u8]) -> Result<&'a str, AppError> {
    let invalid = || {
        AppError::Validation(format!(
            "{filename} has an invalid content type or extension. Only png, gif, and jpg files can be uploaded."
        ))
    };

    let name = sanitize_filename(filename).ok_or_else(invalid)?;
    if !has_supported_extension(name) {
        return Err(invalid());
    }
    match sniff_mime_type(contents) {
        Some(mime) if SUPPORTED_MIME_TYPES.contains(&mime) => Ok(name),
        _ => Err(invalid()),
    }
}

fn has_supported_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

fn sniff_mime_type(contents: &[u8]) -> Option<&'static str> {
    let head = &contents[..contents.len().min(SNIFF_LEN)];
    image::guess_format(head)
        .ok()
        .map(|format: ImageFormat| format.to_mime_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0";
    const JPEG: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0\x01\x01\0\0\x01\0\x01\0\0";
    const GIF: &[u8] = b"GIF89a\x01\0\x01\0\x80\0\0\0\0\0\xff\xff\xff";

    #[test]
    fn sanitize_drops_directories() {
        assert_eq!(sanitize_filename("cat.png"), Some("cat.png"));
        assert_eq!(sanitize_filename("../../etc/passwd"), Some("passwd"));
        assert_eq!(sanitize_filename("C:\\photos\\dog.jpg"), Some("dog.jpg"));
        assert_eq!(sanitize_filename("dir/"), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn accepts_supported_images() {
        assert_eq!(validate_upload("a.png", PNG).unwrap(), "a.png");
        assert_eq!(validate_upload("b.JPG", JPEG).unwrap(), "b.JPG");
        assert_eq!(validate_upload("c.jpeg", JPEG).unwrap(), "c.jpeg");
        assert_eq!(validate_upload("d.gif", GIF).unwrap(), "d.gif");
    }

    #[test]
    fn rejects_bad_extension_regardless_of_content() {
        assert!(matches!(validate_upload("x.exe", PNG), Err(AppError::Validation(_))));
        assert!(matches!(validate_upload("noext", PNG), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_image_content_with_image_extension() {
        let err = validate_upload("x.png", b"<html><body>hi</body></html>").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("x.png")));
        assert!(matches!(validate_upload("x.png", b""), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn create_list_find_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());

        assert!(store.list(3).await.unwrap().is_empty());

        store.create(3, "b.png", PNG).await.unwrap();
        store.create(3, "a.gif", GIF).await.unwrap();
        fs::write(store.gallery_dir(3).join("notes.txt"), b"x").await.unwrap();

        let names: Vec<_> = store
            .list(3)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.filename)
            .collect();
        assert_eq!(names, ["a.gif", "b.png"]);

        let found = store.find(3, "b.png").await.unwrap();
        assert_eq!(found.path, tmp.path().join("gallery-3").join("b.png"));
        assert!(matches!(store.find(3, "zzz.png").await, Err(AppError::NotFound(_))));
        assert!(matches!(store.find(4, "b.png").await, Err(AppError::NotFound(_))));

        store.delete(3, "b.png").await.unwrap();
        assert!(matches!(store.find(3, "b.png").await, Err(AppError::NotFound(_))));
        assert!(matches!(store.delete(3, "b.png").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn find_ignores_unsupported_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());

        store.create(5, "a.png", PNG).await.unwrap();
        fs::write(store.gallery_dir(5).join("notes.txt"), b"x").await.unwrap();
        fs::write(store.gallery_dir(5).join("secret"), b"x").await.unwrap();

        assert!(store.find(5, "a.png").await.is_ok());
        assert!(matches!(store.find(5, "notes.txt").await, Err(AppError::NotFound(_))));
        assert!(matches!(store.find(5, "secret").await, Err(AppError::NotFound(_))));
        assert!(matches!(store.delete(5, "notes.txt").await, Err(AppError::NotFound(_))));
        assert!(store.gallery_dir(5).join("notes.txt").exists());
    }

    #[tokio::test]
    async fn uploads_cannot_escape_gallery_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("images"));

        let image = store.create(1, "../../evil.png", PNG).await.unwrap();
        assert_eq!(image.filename, "evil.png");
        assert_eq!(image.path, tmp.path().join("images/gallery-1/evil.png"));
        assert!(!tmp.path().join("evil.png").exists());
    }

    #[tokio::test]
    async fn delete_gallery_removes_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());

        store.delete_gallery(9).await.unwrap();
        store.create(9, "a.png", PNG).await.unwrap();
        store.delete_gallery(9).await.unwrap();
        assert!(!store.gallery_dir(9).exists());
    }
}
