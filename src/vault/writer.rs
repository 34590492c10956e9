//! Create-or-update persistence for a single post.

use super::access::VaultRoot;
use super::error::VaultError;
use super::frontmatter;
use super::types::{FileRef, MARKDOWN_EXTENSION, Post};
use std::path::PathBuf;
use tracing::debug;

/// Filename for a post that has never been written: lower-cased title with
/// every non-alphanumeric character replaced by an underscore.
/// `"Hello, World! 2024"` becomes `hello__world__2024.md`.
pub fn derive_filename(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return format!("untitled{}", MARKDOWN_EXTENSION);
    }

    let stem: String = trimmed
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("{}{}", stem, MARKDOWN_EXTENSION)
}

/// Write `post` to its backing file, creating one under `root` when the post
/// has no file reference yet. With neither reference nor root the save fails
/// with [`VaultError::NoDestination`]; callers must report that, never drop
/// the edit silently.
///
/// The whole file is replaced on every save. On success the returned post's
/// `id` matches the file name and its file reference is attached.
pub async fn save_post(mut post: Post, root: Option<&VaultRoot>) -> Result<Post, VaultError> {
    let path: PathBuf = match (&post.file_ref, root) {
        (Some(file_ref), _) => file_ref.path().to_path_buf(),
        (None, Some(root)) => root.path().join(derive_filename(&post.title)),
        (None, None) => return Err(VaultError::NoDestination),
    };

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| VaultError::InvalidFileName(path.display().to_string()))?
        .to_string();

    let text = frontmatter::encode(&post);

    // Stage the full contents next to the target and swap them in, so an
    // interrupted write never leaves a truncated post behind.
    let staged = path.with_extension("md.tmp");
    if let Err(e) = tokio::fs::write(&staged, &text).await {
        let _ = tokio::fs::remove_file(&staged).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&staged, &path).await {
        let _ = tokio::fs::remove_file(&staged).await;
        return Err(e.into());
    }

    debug!("Saved post to {:?}", path);

    post.id = file_name;
    post.file_ref = Some(FileRef::new(path));
    Ok(post)
}
