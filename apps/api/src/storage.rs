//! Object storage — pluggable, trait-based store for resume and logo blobs.
//!
//! The core never touches bytes beyond handing them to the store; it persists
//! the returned public URL and storage key verbatim and deletes by key.
//!
//! `AppState` holds an `Arc<dyn ObjectStore>`; the default backend is
//! S3/MinIO via `aws-sdk-s3`.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;

/// Result of a successful upload: what the database persists.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub url: String,
    pub key: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// S3-compatible backend (MinIO locally, AWS in production).
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    endpoint: String,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String, endpoint: String) -> Self {
        Self {
            client,
            bucket,
            endpoint,
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of '{key}' failed: {e}")))?;

        tracing::info!("Uploaded object to s3://{}/{}", self.bucket, key);

        Ok(StoredObject {
            url: self.public_url(key),
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("delete of '{key}' failed: {e}")))?;

        tracing::info!("Deleted object s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// Derives a storage key scoped under a per-owner prefix so keys from
/// different owners can never collide, preserving the original extension.
pub fn object_key(prefix: &str, owner: Uuid, file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match ext {
        Some(ext) => format!("{prefix}/{owner}/{}.{}", Uuid::new_v4(), ext.to_lowercase()),
        None => format!("{prefix}/{owner}/{}", Uuid::new_v4()),
    }
}

/// Guesses a content type from the file extension; the store is not in the
/// business of sniffing bytes.
pub fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()) {
        Some(ext) if ext == "pdf" => "application/pdf",
        Some(ext) if ext == "png" => "image/png",
        Some(ext) if ext == "jpg" || ext == "jpeg" => "image/jpeg",
        Some(ext) if ext == "svg" => "image/svg+xml",
        Some(ext) if ext == "doc" => "application/msword",
        Some(ext) if ext == "docx" => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_owner_scoped() {
        let owner = Uuid::new_v4();
        let key = object_key("resumes", owner, "cv.pdf");
        assert!(key.starts_with(&format!("resumes/{owner}/")));
        assert!(key.ends_with(".pdf"));
    }

    #[test]
    fn test_object_key_without_extension() {
        let owner = Uuid::new_v4();
        let key = object_key("logos", owner, "logo");
        assert!(key.starts_with(&format!("logos/{owner}/")));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_object_key_ignores_suspicious_extension() {
        let owner = Uuid::new_v4();
        let key = object_key("resumes", owner, "cv.p/df");
        assert!(!key.ends_with("p/df"));
    }

    #[test]
    fn test_keys_never_collide_for_same_name() {
        let owner = Uuid::new_v4();
        let a = object_key("resumes", owner, "cv.pdf");
        let b = object_key("resumes", owner, "cv.pdf");
        assert_ne!(a, b);
    }

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("cv.pdf"), "application/pdf");
        assert_eq!(content_type_for("logo.PNG"), "image/png");
        assert_eq!(content_type_for("unknown.bin"), "application/octet-stream");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }
}
