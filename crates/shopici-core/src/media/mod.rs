//! Object storage contract and image upload validation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{Result, StoreError};

/// Bucket holding product listing images.
pub const ITEM_IMAGE_BUCKET: &str = "item-images";

/// Upload size cap enforced before any bytes leave the device.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// The consumed surface of the hosted object storage service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads an object and returns its public URL.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;
}

/// An image file selected for upload, validated client-side before the
/// storage call.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name; only the extension is kept for the object path.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Checks the constraints the listing form enforces: an `image/*`
    /// content type and at most [`MAX_IMAGE_BYTES`] bytes.
    pub fn validate(&self) -> Result<()> {
        if !self.content_type.starts_with("image/") {
            return Err(StoreError::validation(format!(
                "not an image file: {}",
                self.content_type
            )));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(StoreError::validation(
                "image exceeds the 5MB upload limit",
            ));
        }
        Ok(())
    }

    /// Object path `<user_id>/<unique>.<ext>`, namespacing uploads per
    /// seller so row-level storage policies can key on the prefix.
    pub fn object_path(&self, user_id: &str) -> String {
        let ext = match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext,
            _ => "bin",
        };
        format!("{user_id}/{}.{ext}", Uuid::new_v4())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, len: usize) -> ImageUpload {
        ImageUpload {
            file_name: "photo.jpg".into(),
            content_type: content_type.into(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn test_validate_accepts_small_image() {
        assert!(upload("image/jpeg", 1024).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_image_content_type() {
        let err = upload("application/pdf", 10).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_rejects_oversized_image() {
        assert!(upload("image/png", MAX_IMAGE_BYTES).validate().is_ok());
        let err = upload("image/png", MAX_IMAGE_BYTES + 1).validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_object_path_is_namespaced_and_keeps_extension() {
        let path = upload("image/jpeg", 1).object_path("user-1");
        assert!(path.starts_with("user-1/"));
        assert!(path.ends_with(".jpg"));
    }

    #[test]
    fn test_object_path_defaults_extension_when_missing() {
        let mut up = upload("image/jpeg", 1);
        up.file_name = "photo".into();
        assert!(up.object_path("user-1").ends_with(".bin"));
    }
}
