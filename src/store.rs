//! Object-storage capability contract.
//!
//! Bucket/key style providers (S3, Azure Blob, GCS, ...) are reached through
//! the narrow [`ObjectStore`] trait: given a bucket and key, return the raw
//! bytes plus the content type the provider reports, if any. The crate ships
//! an S3 implementation behind the `s3` feature; other providers are injected
//! client objects supplied by the caller.

use std::collections::HashMap;

use bytes::Bytes;
use futures::future::BoxFuture;

use crate::error::Result;

/// A fetched object: its bytes and the provider-reported content type.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Minimal capability contract for bucket/key object storage.
///
/// Implementations map provider failures to
/// [`FileError::SourceUnavailable`](crate::FileError::SourceUnavailable).
pub trait ObjectStore: Send + Sync {
    /// Fetch one object, fully buffered.
    fn fetch<'a>(&'a self, bucket: &'a str, key: &'a str) -> BoxFuture<'a, Result<StoredObject>>;
}

/// In-memory store for tests and embedded fixtures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: HashMap<(String, String), StoredObject>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object under `bucket`/`key`.
    pub fn insert(
        &mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        data: impl Into<Bytes>,
        content_type: Option<&str>,
    ) {
        self.objects.insert(
            (bucket.into(), key.into()),
            StoredObject {
                data: data.into(),
                content_type: content_type.map(|s| s.to_string()),
            },
        );
    }
}

impl ObjectStore for MemoryStore {
    fn fetch<'a>(&'a self, bucket: &'a str, key: &'a str) -> BoxFuture<'a, Result<StoredObject>> {
        Box::pin(async move {
            self.objects
                .get(&(bucket.to_string(), key.to_string()))
                .cloned()
                .ok_or_else(|| {
                    crate::FileError::SourceUnavailable(format!(
                        "no such object: {}/{}",
                        bucket, key
                    ))
                })
        })
    }
}

#[cfg(feature = "s3")]
pub use s3::S3Store;

#[cfg(feature = "s3")]
mod s3 {
    use aws_sdk_s3::Client as S3Client;
    use bytes::Bytes;
    use futures::future::BoxFuture;

    use super::{ObjectStore, StoredObject};
    use crate::error::{FileError, Result};

    /// Amazon S3 provider wrapping a configured [`aws_sdk_s3::Client`].
    #[derive(Debug, Clone)]
    pub struct S3Store {
        client: S3Client,
    }

    impl S3Store {
        pub fn new(client: S3Client) -> Self {
            Self { client }
        }

        /// Build a store from the default AWS environment configuration.
        pub async fn from_env() -> Self {
            let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            Self::new(S3Client::new(&config))
        }
    }

    impl ObjectStore for S3Store {
        fn fetch<'a>(
            &'a self,
            bucket: &'a str,
            key: &'a str,
        ) -> BoxFuture<'a, Result<StoredObject>> {
            Box::pin(async move {
                let resp = self
                    .client
                    .get_object()
                    .bucket(bucket)
                    .key(key)
                    .send()
                    .await
                    .map_err(|e| FileError::SourceUnavailable(e.to_string()))?;

                let content_type = resp.content_type().map(|ct| ct.to_string());

                let body = resp.body.collect().await.map_err(|e| {
                    FileError::SourceUnavailable(format!("failed to read S3 body: {}", e))
                })?;

                Ok(StoredObject {
                    data: Bytes::from(body.into_bytes().to_vec()),
                    content_type,
                })
            })
        }
    }
}
