//! The core `RawFile` value type and its acquisition constructors.
//!
//! A `RawFile` is an immutable pairing of fully-buffered contents and a
//! recognized extension. Construction goes through one of the named
//! acquisition constructors; every transient I/O handle is drained and
//! released before a constructor returns, so the value never holds a live
//! external resource.

use std::io::{Read, Write};
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use bytes::Bytes;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::StreamExt;
use tokio::io::AsyncReadExt;

use crate::digest::{hex_digest, DigestAlgorithm};
use crate::error::{FileError, Result};
use crate::extension::FileExtension;
use crate::store::ObjectStore;

/// An immutable in-memory file: raw contents plus a recognized extension.
///
/// Instances are value types: equality compares contents and extension,
/// clones are cheap (the buffer is reference-counted), and immutability makes
/// cross-thread sharing synchronization-free. Anything that looks like a
/// transform (`compress`, `decompress`) returns a new instance.
///
/// # Examples
///
/// ```
/// # use rawfile::{RawFile, FileExtension};
/// # use bytes::Bytes;
/// let file = RawFile::from_bytes(Bytes::from("Hello, World!"), FileExtension::Txt);
/// assert_eq!(file.size(), 13);
/// assert_eq!(file.mime_type(), "text/plain");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RawFile {
    contents: Bytes,
    extension: FileExtension,
}

impl RawFile {
    // -----------------------------------------------------------------------
    // Acquisition constructors
    // -----------------------------------------------------------------------

    /// Create a `RawFile` from a local filesystem path.
    ///
    /// Without an explicit `extension` the file's suffix must be one of the
    /// recognized extensions.
    pub async fn from_path<P: AsRef<Path>>(
        path: P,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let path = path.as_ref();

        let meta = match tokio::fs::metadata(path).await {
            Ok(meta) => meta,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileError::NotFound(path.display().to_string()));
            }
            Err(err) => return Err(err.into()),
        };
        if !meta.is_file() {
            return Err(FileError::InvalidArgument(format!(
                "{} is not a file",
                path.display()
            )));
        }

        let extension = match extension {
            Some(ext) => ext,
            None => FileExtension::from_path_suffix(path)
                .ok_or_else(|| FileError::TypeResolution(path.display().to_string()))?,
        };

        let data = Bytes::from(tokio::fs::read(path).await?);

        tracing::info!(path = %path.display(), %extension, size = data.len(), "file acquired from path");

        Ok(Self {
            contents: data,
            extension,
        })
    }

    /// Create a `RawFile` from raw bytes.
    pub fn from_bytes(data: Bytes, extension: FileExtension) -> Self {
        Self {
            contents: data,
            extension,
        }
    }

    /// Create a `RawFile` from a standard base64 string.
    pub fn from_base64(encoded: &str, extension: FileExtension) -> Result<Self> {
        let data = BASE64
            .decode(encoded.trim())
            .map_err(|e| FileError::Decode(format!("invalid base64: {}", e)))?;
        Ok(Self::from_bytes(Bytes::from(data), extension))
    }

    /// Create a `RawFile` from a string, encoded as UTF-8.
    pub fn from_string(content: &str, extension: FileExtension) -> Self {
        Self::from_bytes(Bytes::copy_from_slice(content.as_bytes()), extension)
    }

    /// Create a `RawFile` from an async byte stream.
    ///
    /// The stream is fully consumed and buffered into memory.
    pub async fn from_stream<S>(stream: S, extension: FileExtension) -> Result<Self>
    where
        S: futures::Stream<Item = std::result::Result<Bytes, std::io::Error>> + Unpin,
    {
        let mut buf = Vec::new();
        tokio::pin!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buf.extend_from_slice(&chunk);
        }

        let data = Bytes::from(buf);
        tracing::info!(%extension, size = data.len(), "file acquired from stream");

        Ok(Self {
            contents: data,
            extension,
        })
    }

    /// Create a `RawFile` from an HTTP/HTTPS URL.
    ///
    /// The extension resolves from, in order: the explicit `extension`
    /// argument, the mapped `Content-Type` response header, and finally a
    /// generic [`FileExtension::Html`] when neither applies.
    pub async fn from_url(url: &str, extension: Option<FileExtension>) -> Result<Self> {
        let parsed = url::Url::parse(url)
            .map_err(|e| FileError::InvalidArgument(format!("invalid URL {}: {}", url, e)))?;

        let response = reqwest::get(parsed)
            .await
            .map_err(|e| FileError::SourceUnavailable(e.to_string()))?;

        // Take only the mime part of the header, not charset etc.
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_string());

        let data = response
            .bytes()
            .await
            .map_err(|e| FileError::SourceUnavailable(e.to_string()))?;

        let extension = extension
            .or_else(|| {
                content_type
                    .as_deref()
                    .and_then(FileExtension::from_content_type)
            })
            .unwrap_or(FileExtension::Html);

        tracing::info!(%url, %extension, size = data.len(), "file acquired from URL");

        Ok(Self {
            contents: data,
            extension,
        })
    }

    /// Create a `RawFile` from a bucket/key object through any
    /// [`ObjectStore`] provider (S3, Azure Blob, GCS, ...).
    ///
    /// The extension resolves from, in order: the explicit `extension`
    /// argument, the key's suffix, and the provider-reported content type.
    /// Unlike [`from_url`](Self::from_url) there is no generic fallback; an
    /// unresolved extension is a [`FileError::TypeResolution`].
    pub async fn from_object_store(
        store: &dyn ObjectStore,
        bucket: &str,
        key: &str,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let object = store.fetch(bucket, key).await?;

        let extension = match extension.or_else(|| FileExtension::from_path_suffix(key)) {
            Some(ext) => ext,
            None => object
                .content_type
                .as_deref()
                .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
                .and_then(FileExtension::from_content_type)
                .ok_or_else(|| FileError::TypeResolution(format!("{}/{}", bucket, key)))?,
        };

        tracing::info!(%bucket, %key, %extension, size = object.data.len(), "file acquired from object store");

        Ok(Self {
            contents: object.data,
            extension,
        })
    }

    /// Create a `RawFile` from an S3 object using the default AWS
    /// environment configuration.
    #[cfg(feature = "s3")]
    pub async fn from_s3(bucket: &str, key: &str, extension: Option<FileExtension>) -> Result<Self> {
        let store = crate::store::S3Store::from_env().await;
        Self::from_object_store(&store, bucket, key, extension).await
    }

    /// Create a `RawFile` from an S3 object using a provided client.
    /// Useful for testing or when you already have a configured client.
    #[cfg(feature = "s3")]
    pub async fn from_s3_with_client(
        client: &aws_sdk_s3::Client,
        bucket: &str,
        key: &str,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let store = crate::store::S3Store::new(client.clone());
        Self::from_object_store(&store, bucket, key, extension).await
    }

    #[cfg(not(feature = "s3"))]
    pub async fn from_s3(
        _bucket: &str,
        _key: &str,
        _extension: Option<FileExtension>,
    ) -> Result<Self> {
        Err(FileError::MissingCapability("s3"))
    }

    /// Create a `RawFile` from one member of a ZIP archive on disk.
    ///
    /// A missing or unreadable archive or member is a [`FileError::Decode`].
    #[cfg(feature = "zip")]
    pub async fn from_zip<P: AsRef<Path>>(
        archive_path: P,
        member_path: &str,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let archive_path = archive_path.as_ref().to_path_buf();
        let member = member_path.to_string();

        let data = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let file = std::fs::File::open(&archive_path).map_err(|e| {
                FileError::Decode(format!(
                    "cannot open archive {}: {}",
                    archive_path.display(),
                    e
                ))
            })?;
            let mut archive = ::zip::ZipArchive::new(file).map_err(|e| {
                FileError::Decode(format!("invalid archive {}: {}", archive_path.display(), e))
            })?;
            let mut entry = archive
                .by_name(&member)
                .map_err(|e| FileError::Decode(format!("missing member {}: {}", member, e)))?;
            let mut buf = Vec::with_capacity(entry.size() as usize);
            entry
                .read_to_end(&mut buf)
                .map_err(|e| FileError::Decode(format!("cannot read member {}: {}", member, e)))?;
            Ok(buf)
        })
        .await
        .map_err(|e| FileError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

        let extension = match extension {
            Some(ext) => ext,
            None => FileExtension::from_path_suffix(member_path)
                .ok_or_else(|| FileError::TypeResolution(member_path.to_string()))?,
        };

        tracing::info!(member = %member_path, %extension, size = data.len(), "file acquired from archive");

        Ok(Self {
            contents: Bytes::from(data),
            extension,
        })
    }

    #[cfg(not(feature = "zip"))]
    pub async fn from_zip<P: AsRef<Path>>(
        _archive_path: P,
        _member_path: &str,
        _extension: Option<FileExtension>,
    ) -> Result<Self> {
        Err(FileError::MissingCapability("zip"))
    }

    /// Create a `RawFile` by reading standard input to EOF.
    pub async fn from_stdin(extension: FileExtension) -> Result<Self> {
        let mut buf = Vec::new();
        tokio::io::stdin().read_to_end(&mut buf).await?;

        let data = Bytes::from(buf);
        tracing::info!(%extension, size = data.len(), "file acquired from stdin");

        Ok(Self {
            contents: data,
            extension,
        })
    }

    /// Create a `RawFile` by retrieving a path over FTP.
    ///
    /// Connection, authentication, and transfer failures all surface as
    /// [`FileError::SourceUnavailable`].
    #[cfg(feature = "ftp")]
    pub async fn from_ftp(
        host: &str,
        path: &str,
        username: &str,
        password: &str,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let host = host.to_string();
        let file_path = path.to_string();
        let user = username.to_string();
        let pass = password.to_string();

        let data = tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
            let addr = if host.contains(':') {
                host.clone()
            } else {
                format!("{}:21", host)
            };
            let mut ftp = suppaftp::FtpStream::connect(addr).map_err(|e| {
                FileError::SourceUnavailable(format!("FTP connect to {} failed: {}", host, e))
            })?;
            ftp.login(&user, &pass)
                .map_err(|e| FileError::SourceUnavailable(format!("FTP login failed: {}", e)))?;
            let buffer = ftp.retr_as_buffer(&file_path).map_err(|e| {
                FileError::SourceUnavailable(format!("FTP retrieve of {} failed: {}", file_path, e))
            })?;
            // Best-effort; the transfer is already complete.
            let _ = ftp.quit();
            Ok(buffer.into_inner())
        })
        .await
        .map_err(|e| FileError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))??;

        let extension = match extension {
            Some(ext) => ext,
            None => FileExtension::from_path_suffix(path)
                .ok_or_else(|| FileError::TypeResolution(path.to_string()))?,
        };

        tracing::info!(%path, %extension, size = data.len(), "file acquired from FTP");

        Ok(Self {
            contents: Bytes::from(data),
            extension,
        })
    }

    #[cfg(not(feature = "ftp"))]
    pub async fn from_ftp(
        _host: &str,
        _path: &str,
        _username: &str,
        _password: &str,
        _extension: Option<FileExtension>,
    ) -> Result<Self> {
        Err(FileError::MissingCapability("ftp"))
    }

    /// Create a `RawFile` from a database blob column.
    pub fn from_database_blob(data: Bytes, extension: FileExtension) -> Self {
        Self::from_bytes(data, extension)
    }

    // -----------------------------------------------------------------------
    // Blocking facades
    // -----------------------------------------------------------------------

    /// Synchronous [`from_path`](Self::from_path), safe to call whether or
    /// not a runtime is active on the calling thread.
    pub fn from_path_blocking<P: AsRef<Path>>(
        path: P,
        extension: Option<FileExtension>,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        crate::bridge::run_sync(async move { Self::from_path(path, extension).await })?
    }

    /// Synchronous [`from_url`](Self::from_url), safe to call whether or not
    /// a runtime is active on the calling thread.
    pub fn from_url_blocking(url: &str, extension: Option<FileExtension>) -> Result<Self> {
        let url = url.to_string();
        crate::bridge::run_sync(async move { Self::from_url(&url, extension).await })?
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The raw contents.
    pub fn contents(&self) -> &Bytes {
        &self.contents
    }

    /// The recognized extension.
    pub fn extension(&self) -> FileExtension {
        self.extension
    }

    /// The byte length of the contents.
    pub fn size(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read the contents asynchronously.
    ///
    /// Resolves immediately; this exists for interface uniformity with the
    /// acquisition constructors, not because any I/O remains.
    pub async fn read(&self) -> Bytes {
        self.contents.clone()
    }

    /// Read the contents as a UTF-8 string, replacing invalid sequences.
    pub fn read_text(&self) -> String {
        String::from_utf8_lossy(&self.contents).to_string()
    }

    // -----------------------------------------------------------------------
    // Digests
    // -----------------------------------------------------------------------

    /// Hex-encoded digest of the contents with the given algorithm.
    pub fn digest(&self, algorithm: DigestAlgorithm) -> String {
        hex_digest(algorithm, &self.contents)
    }

    /// Hex-encoded MD5 digest of the contents.
    pub fn md5(&self) -> String {
        self.digest(DigestAlgorithm::Md5)
    }

    /// Hex-encoded SHA-256 digest of the contents.
    pub fn sha256(&self) -> String {
        self.digest(DigestAlgorithm::Sha256)
    }

    // -----------------------------------------------------------------------
    // MIME
    // -----------------------------------------------------------------------

    /// Best-effort MIME string for the extension.
    ///
    /// Falls back to `application/octet-stream` when the extension has no
    /// canonical content type; never fails.
    pub fn mime_type(&self) -> &'static str {
        self.extension
            .content_type()
            .unwrap_or("application/octet-stream")
    }

    // -----------------------------------------------------------------------
    // Compression
    // -----------------------------------------------------------------------

    /// Gzip-compress the contents into a new `RawFile` with the same
    /// extension. The original is untouched.
    pub fn compress(&self) -> Result<Self> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(self.contents.len() / 2),
            Compression::default(),
        );
        encoder.write_all(&self.contents)?;
        let compressed = encoder.finish()?;

        Ok(Self {
            contents: Bytes::from(compressed),
            extension: self.extension,
        })
    }

    /// Gzip-decompress the contents into a new `RawFile` with the same
    /// extension. Contents that are not valid gzip data are a
    /// [`FileError::Decode`].
    pub fn decompress(&self) -> Result<Self> {
        let mut decoder = GzDecoder::new(self.contents.as_ref());
        let mut buf = Vec::new();
        decoder
            .read_to_end(&mut buf)
            .map_err(|e| FileError::Decode(format!("invalid gzip data: {}", e)))?;

        Ok(Self {
            contents: Bytes::from(buf),
            extension: self.extension,
        })
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Write the contents verbatim to `path`.
    ///
    /// Writes to a sibling temporary file and renames it into place, so a
    /// failed write never leaves a truncated file at the destination.
    pub async fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FileError::InvalidArgument(format!("{} has no file name", path.display()))
            })?;

        let tmp = path.with_file_name(format!("{}.tmp", file_name));
        if let Err(err) = tokio::fs::write(&tmp, &self.contents).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }

        tracing::info!(path = %path.display(), size = self.contents.len(), "file saved");
        Ok(())
    }

    /// Returns a JSON string representation of the file (extension and size).
    pub fn to_string_pretty(&self) -> String {
        #[derive(serde::Serialize)]
        struct FileRepr<'a> {
            extension: &'a FileExtension,
            size: usize,
        }
        let repr = FileRepr {
            extension: &self.extension,
            size: self.contents.len(),
        };
        serde_json::to_string(&repr).unwrap_or_default()
    }
}

impl std::fmt::Display for RawFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string_pretty())
    }
}

impl std::fmt::Debug for RawFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawFile")
            .field("extension", &self.extension)
            .field("size", &self.contents.len())
            .finish()
    }
}
