//! Persisted record types.

use std::fmt;
use std::str::FromStr;

use aura_crypto::TransformPipeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::normalize_dir;

/// Content category of a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// Source code.
    Code,
    /// JSON documents.
    Json,
    /// Markdown documents.
    Markdown,
    /// Configuration files.
    Config,
    /// Plain text. Also the fallback for unknown categories.
    #[default]
    #[serde(other)]
    Text,
}

impl FileType {
    /// Every category, in display order.
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Code,
        Self::Json,
        Self::Markdown,
        Self::Config,
    ];

    /// Infer a category from a file name's extension.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "md" | "markdown" => Self::Markdown,
            "json" => Self::Json,
            "js" | "jsx" | "ts" | "tsx" | "rs" | "py" | "html" | "css" | "xml" | "sh" => {
                Self::Code
            },
            "config" | "conf" | "ini" | "toml" | "yaml" | "yml" | "env" => Self::Config,
            _ => Self::Text,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown file type '{s}'"))
    }
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Creation-ordered identifier (UUID v7).
    pub id: String,
    /// File name, unique within `path`.
    pub name: String,
    /// Containing directory.
    pub path: String,
    /// Stored payload, after transforms.
    pub content: String,
    /// Plaintext as last written.
    #[serde(default)]
    pub original_content: String,
    /// Content category.
    #[serde(rename = "type", default)]
    pub file_type: FileType,
    /// Plaintext size in bytes at last write.
    #[serde(default)]
    pub size: u64,
    /// User tags, de-duplicated.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether `content` is encrypted.
    #[serde(default)]
    pub is_encrypted: bool,
    /// Whether `content` is compressed.
    #[serde(default)]
    pub is_compressed: bool,
    /// First write.
    pub created_at: DateTime<Utc>,
    /// Last write.
    pub updated_at: DateTime<Utc>,
    /// Last read or write.
    pub last_opened: DateTime<Utc>,
}

impl FileRecord {
    /// The transforms applied to `content`.
    #[must_use]
    pub fn pipeline(&self) -> TransformPipeline {
        TransformPipeline::from_flags(self.is_compressed, self.is_encrypted)
    }

    /// `path` joined with `name`.
    #[must_use]
    pub fn full_path(&self) -> String {
        format!("{}{}", self.path, self.name)
    }

    /// Whether this record is `(name, path)`.
    #[must_use]
    pub fn is_at(&self, name: &str, path: &str) -> bool {
        self.name == name && self.path == path
    }

    /// Case-insensitive match on name, plaintext, or any tag.
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.original_content.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// A stored folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    /// Creation-ordered identifier (UUID v7).
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Own path, `parent_path + name + "/"`.
    pub path: String,
    /// Containing directory.
    pub parent_path: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// One entry of the recent-files list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecentEntry {
    /// File name.
    pub name: String,
    /// Containing directory.
    pub path: String,
}

impl RecentEntry {
    /// Entry for `(name, path)`.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A persisted recent-files item: an entry, or a bare file name from older data.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredRecent {
    Entry(RecentEntry),
    Name(String),
}

/// Arguments to [`VirtualFileSystem::save_file`](crate::VirtualFileSystem::save_file).
#[derive(Clone, Default)]
pub struct SaveRequest {
    pub(crate) name: String,
    pub(crate) content: String,
    pub(crate) file_type: FileType,
    pub(crate) path: String,
    pub(crate) encrypt: bool,
    pub(crate) compress: bool,
    pub(crate) encryption_key: Option<String>,
}

impl SaveRequest {
    /// Save `content` as `name` in the root directory.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            path: crate::path::ROOT.to_owned(),
            ..Self::default()
        }
    }

    /// Set the content category.
    #[must_use]
    pub fn file_type(mut self, file_type: FileType) -> Self {
        self.file_type = file_type;
        self
    }

    /// Set the containing directory.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.path = normalize_dir(path.as_ref());
        self
    }

    /// Encrypt the stored content.
    #[must_use]
    pub fn encrypt(mut self, encrypt: bool) -> Self {
        self.encrypt = encrypt;
        self
    }

    /// Compress the stored content.
    #[must_use]
    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Use `key` instead of the configured default.
    #[must_use]
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }
}

impl fmt::Debug for SaveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveRequest")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("file_type", &self.file_type)
            .field("bytes", &self.content.len())
            .field("encrypt", &self.encrypt)
            .field("compress", &self.compress)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Trim, drop empties, and de-duplicate tags, keeping first occurrence order.
#[must_use]
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_owned());
        }
    }
    out
}
