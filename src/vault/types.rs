use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Files must carry this extension to be surfaced as posts.
pub const MARKDOWN_EXTENSION: &str = ".md";

const WORDS_PER_MINUTE: usize = 200;
const EXCERPT_CHARS: usize = 150;

pub const DEFAULT_TAG: &str = "General";
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub name: String,
    pub avatar_url: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            name: "Local User".to_string(),
            avatar_url: "https://ui-avatars.com/api/?name=Local+User&background=random"
                .to_string(),
        }
    }
}

/// Link from a post to the file that backs it. The post's lifetime is
/// independent of the file; this is a lookup key, not ownership of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    path: PathBuf,
}

impl FileRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|name| name.to_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Filename (with extension) when vault-backed, a generated token otherwise.
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub author: Author,
    pub cover_image_url: String,
    pub published_at: DateTime<Utc>,
    pub read_time_minutes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Present only when write access to the backing file was established.
    #[serde(skip)]
    pub file_ref: Option<FileRef>,
}

impl Post {
    pub fn is_writable(&self) -> bool {
        self.file_ref.is_some()
    }

    /// Publish-time defaults: empty tag/category lists fall back to a single
    /// placeholder value. Scan results are left as parsed.
    pub fn with_publish_defaults(mut self) -> Self {
        if self.tags.is_empty() {
            self.tags = vec![DEFAULT_TAG.to_string()];
        }
        if self.categories.is_empty() {
            self.categories = vec![DEFAULT_CATEGORY.to_string()];
        }
        self
    }
}

/// Estimated reading time for a markdown body, recomputed at every parse.
pub fn read_time_minutes(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Leading slice of the body used as a card preview when no authored excerpt
/// exists.
pub fn derive_excerpt(body: &str) -> String {
    let mut excerpt: String = body.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

/// A decoded header value: a plain scalar or a bracketed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaValue {
    Scalar(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::Scalar(value) => Some(value),
            MetaValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetaValue::List(items) => Some(items),
            MetaValue::Scalar(_) => None,
        }
    }
}

/// Decoded header mapping. Unknown keys are preserved here even though the
/// encoder only ever writes its fixed key set.
pub type Metadata = HashMap<String, MetaValue>;
