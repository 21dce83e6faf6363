// Blogicum - A blog platform built with Rust
// Copyright (C) 2026 Blogicum Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use std::path::Path;
use uuid::Uuid;

use crate::forms::UploadedImage;

pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["gif", "jpeg", "jpg", "png", "webp"];

/// Lowercased extension of an uploaded filename, if it is an allowed image
/// type. The stored name is generated, so this is the only part of the
/// client-supplied filename that survives.
pub fn image_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename).extension()?.to_str()?.to_lowercase();

    if ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Write an uploaded image under a generated name and return that name
pub async fn save_image(uploads_dir: &str, image: &UploadedImage) -> Result<String> {
    let ext = image_extension(&image.filename)
        .ok_or_else(|| anyhow::anyhow!("Unsupported image type: {}", image.filename))?;

    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);

    tokio::fs::create_dir_all(uploads_dir)
        .await
        .context("Failed to create uploads directory")?;

    let path = Path::new(uploads_dir).join(&stored_name);
    tokio::fs::write(&path, &image.data)
        .await
        .context("Failed to write uploaded image")?;

    Ok(stored_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_allowed() {
        assert_eq!(image_extension("photo.jpg").as_deref(), Some("jpg"));
        assert_eq!(image_extension("photo.JPEG").as_deref(), Some("jpeg"));
        assert_eq!(image_extension("a.b.png").as_deref(), Some("png"));
    }

    #[test]
    fn test_image_extension_rejected() {
        assert!(image_extension("script.sh").is_none());
        assert!(image_extension("noextension").is_none());
        assert!(image_extension("archive.tar.gz").is_none());
        assert!(image_extension("").is_none());
    }

    #[tokio::test]
    async fn test_save_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let uploads_dir = dir.path().to_string_lossy().to_string();

        let image = UploadedImage {
            filename: "photo.PNG".to_string(),
            data: vec![1, 2, 3, 4],
        };

        let stored_name = save_image(&uploads_dir, &image).await.unwrap();
        assert!(stored_name.ends_with(".png"));

        let written = tokio::fs::read(dir.path().join(&stored_name)).await.unwrap();
        assert_eq!(written, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_save_image_rejects_bad_type() {
        let dir = tempfile::tempdir().unwrap();
        let uploads_dir = dir.path().to_string_lossy().to_string();

        let image = UploadedImage {
            filename: "evil.exe".to_string(),
            data: vec![0],
        };

        assert!(save_image(&uploads_dir, &image).await.is_err());
    }

    #[tokio::test]
    async fn test_save_image_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let uploads_dir = dir.path().to_string_lossy().to_string();

        let image = UploadedImage {
            filename: "photo.jpg".to_string(),
            data: vec![9],
        };

        let first = save_image(&uploads_dir, &image).await.unwrap();
        let second = save_image(&uploads_dir, &image).await.unwrap();
        assert_ne!(first, second);
    }
}
