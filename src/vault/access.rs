//! Filesystem access levels and the vault variants built on them.
//!
//! Write capability is enforced at the type level: the writer only accepts a
//! [`VaultRoot`], so an [`ImportedFiles`] vault can never be written through.

use super::error::VaultError;
use super::scanner;
use super::types::{MARKDOWN_EXTENSION, Post};
use std::path::{Path, PathBuf};
use tracing::info;

/// What the host grants for a given path, evaluated once per connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Arbitrary-depth read and write under the root.
    Full,
    /// Flat read-only import; the fallback whenever the full-access test fails.
    ReadOnly,
}

impl Capability {
    /// Side-effect-free probe. Never errors: any failure to inspect the path
    /// degrades to [`Capability::ReadOnly`].
    pub async fn probe(path: &Path) -> Capability {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_dir() && !meta.permissions().readonly() => Capability::Full,
            _ => Capability::ReadOnly,
        }
    }
}

/// A connected vault, tagged by access level.
#[derive(Debug, Clone)]
pub enum Vault {
    Full(VaultRoot),
    Imported(ImportedFiles),
}

impl Vault {
    /// Probe `path` and construct the matching variant. In the read-only case
    /// the top-level markdown files are snapshotted as the flat import list;
    /// re-scanning later means re-connecting.
    pub async fn connect(path: &Path) -> Result<Vault, VaultError> {
        match Capability::probe(path).await {
            Capability::Full => {
                info!("Connected vault {:?} with full access", path);
                Ok(Vault::Full(VaultRoot::new(path)))
            }
            Capability::ReadOnly => {
                let files = list_markdown_files(path).await?;
                info!(
                    "Connected vault {:?} read-only ({} files)",
                    path,
                    files.len()
                );
                Ok(Vault::Imported(ImportedFiles::new(files)))
            }
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            Vault::Full(_) => Capability::Full,
            Vault::Imported(_) => Capability::ReadOnly,
        }
    }

    /// The writable root, when this vault has one.
    pub fn root(&self) -> Option<&VaultRoot> {
        match self {
            Vault::Full(root) => Some(root),
            Vault::Imported(_) => None,
        }
    }

    pub async fn scan(&self) -> Result<Vec<Post>, VaultError> {
        match self {
            Vault::Full(root) => root.scan().await,
            Vault::Imported(files) => Ok(files.scan().await),
        }
    }
}

/// A root directory with full read/write access. Long-lived: sequential
/// operations (scan, rescan, save) reuse it without re-connecting.
#[derive(Debug, Clone)]
pub struct VaultRoot {
    path: PathBuf,
}

impl VaultRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn scan(&self) -> Result<Vec<Post>, VaultError> {
        scanner::scan_root(&self.path).await
    }
}

/// A flat, read-only set of files selected once. Posts scanned from it carry
/// no file reference and can never be upgraded to writable.
#[derive(Debug, Clone)]
pub struct ImportedFiles {
    files: Vec<PathBuf>,
}

impl ImportedFiles {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub async fn scan(&self) -> Vec<Post> {
        scanner::scan_files(&self.files).await
    }
}

async fn list_markdown_files(path: &Path) -> Result<Vec<PathBuf>, VaultError> {
    let mut files = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await?;

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        let entry_path = entry.path();
        let is_markdown = entry_path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(MARKDOWN_EXTENSION));

        if file_type.is_file() && is_markdown {
            files.push(entry_path);
        }
    }

    Ok(files)
}
