//! The closed set of recognized file extensions.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FileError;

/// A recognized file kind. The set is closed: adding a kind is a source-level
/// change, never a runtime operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileExtension {
    Pdf,
    Json,
    Png,
    Jpeg,
    Jpg,
    Html,
    Txt,
    Md,
}

impl FileExtension {
    /// The extension string without a leading dot (e.g. `"pdf"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            FileExtension::Pdf => "pdf",
            FileExtension::Json => "json",
            FileExtension::Png => "png",
            FileExtension::Jpeg => "jpeg",
            FileExtension::Jpg => "jpg",
            FileExtension::Html => "html",
            FileExtension::Txt => "txt",
            FileExtension::Md => "md",
        }
    }

    /// Look up an extension from a suffix string, case-insensitively.
    /// A leading dot is tolerated.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(FileExtension::Pdf),
            "json" => Some(FileExtension::Json),
            "png" => Some(FileExtension::Png),
            "jpeg" => Some(FileExtension::Jpeg),
            "jpg" => Some(FileExtension::Jpg),
            "html" => Some(FileExtension::Html),
            "txt" => Some(FileExtension::Txt),
            "md" => Some(FileExtension::Md),
            _ => None,
        }
    }

    /// Look up an extension from the suffix of a path, key, or blob name.
    pub fn from_path_suffix<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_suffix)
    }

    /// Map a declared content-type string to an extension.
    ///
    /// Only the canonical strings are recognized; anything else (including
    /// parameters such as `; charset=utf-8`, which callers strip first)
    /// yields `None`.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type.trim() {
            "application/pdf" => Some(FileExtension::Pdf),
            "application/json" => Some(FileExtension::Json),
            "image/png" => Some(FileExtension::Png),
            "image/jpeg" => Some(FileExtension::Jpeg),
            "image/jpg" => Some(FileExtension::Jpg),
            "text/html" => Some(FileExtension::Html),
            "text/plain" => Some(FileExtension::Txt),
            _ => None,
        }
    }

    /// The canonical content type for this extension, if one exists.
    ///
    /// `Md` has no canonical mapping and returns `None`; callers fall back
    /// to `application/octet-stream`.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            FileExtension::Pdf => Some("application/pdf"),
            FileExtension::Json => Some("application/json"),
            FileExtension::Png => Some("image/png"),
            FileExtension::Jpeg => Some("image/jpeg"),
            FileExtension::Jpg => Some("image/jpeg"),
            FileExtension::Html => Some("text/html"),
            FileExtension::Txt => Some("text/plain"),
            FileExtension::Md => None,
        }
    }
}

impl fmt::Display for FileExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileExtension {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_suffix(s).ok_or_else(|| FileError::TypeResolution(s.to_string()))
    }
}
