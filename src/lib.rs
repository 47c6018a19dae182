//! Immutable in-memory file values with multi-source acquisition.
//!
//! # Overview
//!
//! This crate provides the [`RawFile`] struct, an immutable pairing of
//! fully-buffered contents and a closed-set [`FileExtension`], acquired from
//! any of several origins:
//!
//! - **Local filesystem**: paths on disk
//! - **Raw bytes / base64 / strings / streams**: in-memory data
//! - **URLs**: HTTP/HTTPS resources
//! - **Object storage**: S3 built in, other providers via [`ObjectStore`]
//! - **ZIP archives**: a single member, fully extracted
//! - **Standard input** and **FTP**
//!
//! Derived operations (size, digests, MIME type, gzip compression, atomic
//! persistence) read only the stored bytes; the original source is never
//! touched again. The [`bridge`] module lets synchronous callers reuse the
//! async acquisition paths without deadlocking an active runtime.
//!
//! # Examples
//!
//! ```
//! # use rawfile::{RawFile, FileExtension};
//! # use bytes::Bytes;
//! let file = RawFile::from_bytes(Bytes::from("Hello, World!"), FileExtension::Txt);
//! assert_eq!(file.size(), 13);
//! assert_eq!(file.mime_type(), "text/plain");
//! assert_eq!(file.md5(), "65a8e27d8879283831b664bd8b7f0ad4");
//! ```

pub mod bridge;
pub mod digest;
pub mod error;
pub mod extension;
pub mod file;
pub mod store;

// Re-export primary types at the crate root for convenience.
pub use crate::bridge::{fire_and_forget, run_sync, run_sync_with_timeout};
pub use crate::digest::DigestAlgorithm;
pub use crate::error::{FileError, Result};
pub use crate::extension::FileExtension;
pub use crate::file::RawFile;
pub use crate::store::{MemoryStore, ObjectStore, StoredObject};
#[cfg(feature = "s3")]
pub use crate::store::S3Store;

/// The crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
