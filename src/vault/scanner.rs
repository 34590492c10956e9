//! Vault traversal: turn markdown files under a root (or a flat imported
//! file list) into post candidates.

use super::error::VaultError;
use super::frontmatter;
use super::types::{
    Author, FileRef, MARKDOWN_EXTENSION, MetaValue, Metadata, Post, derive_excerpt,
    read_time_minutes,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// Recursively enumerate every markdown file at or below `root`.
///
/// The traversal is an explicit worklist rather than recursion, so depth is
/// bounded by the worklist alone. Only a root that cannot be opened fails the
/// scan; unreadable subdirectories and broken files are logged and skipped.
/// Dot-prefixed directories (tool-private metadata) are never descended into.
/// No ordering is guaranteed.
pub async fn scan_root(root: &Path) -> Result<Vec<Post>, VaultError> {
    let mut posts = Vec::new();
    let mut pending = VecDeque::new();

    scan_directory(root, &mut posts, &mut pending).await?;

    while let Some(dir) = pending.pop_front() {
        if let Err(e) = scan_directory(&dir, &mut posts, &mut pending).await {
            warn!("Skipping unreadable directory {:?}: {}", dir, e);
        }
    }

    Ok(posts)
}

async fn scan_directory(
    dir: &Path,
    posts: &mut Vec<Post>,
    pending: &mut VecDeque<PathBuf>,
) -> Result<(), VaultError> {
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        let file_type = match entry.file_type().await {
            Ok(file_type) => file_type,
            Err(e) => {
                warn!("Skipping unreadable entry {:?}: {}", path, e);
                continue;
            }
        };

        if file_type.is_dir() {
            if !name.starts_with('.') {
                pending.push_back(path);
            }
        } else if file_type.is_file() && name.ends_with(MARKDOWN_EXTENSION) {
            match load_post(&path, true).await {
                Ok(post) => {
                    debug!("Loaded post: {}", post.id);
                    posts.push(post);
                }
                Err(e) => {
                    warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }
    }

    Ok(())
}

/// Flat fallback scan over a pre-selected file list. The resulting posts
/// carry no file reference and are read-only for the session.
pub async fn scan_files(files: &[PathBuf]) -> Vec<Post> {
    let mut posts = Vec::new();

    for path in files {
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !name.ends_with(MARKDOWN_EXTENSION) {
            continue;
        }
        match load_post(path, false).await {
            Ok(post) => posts.push(post),
            Err(e) => {
                warn!("Failed to load imported file {:?}: {}", path, e);
            }
        }
    }

    posts
}

/// Read and decode a single file into a post. `writable` controls whether a
/// file reference is attached.
pub async fn load_post(path: &Path, writable: bool) -> Result<Post, VaultError> {
    let text = tokio::fs::read_to_string(path).await?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| VaultError::InvalidFileName(path.display().to_string()))?
        .to_string();

    let modified = tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok());

    let (metadata, body) = frontmatter::decode(&text);
    let file_ref = writable.then(|| FileRef::new(path));

    Ok(build_post(file_name, &metadata, body, modified, file_ref))
}

fn build_post(
    file_name: String,
    metadata: &Metadata,
    body: String,
    modified: Option<SystemTime>,
    file_ref: Option<FileRef>,
) -> Post {
    let title = metadata
        .get("title")
        .and_then(MetaValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| file_name.trim_end_matches(MARKDOWN_EXTENSION).to_string());

    let excerpt = metadata
        .get("excerpt")
        .and_then(MetaValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| derive_excerpt(&body));

    let published_at = metadata
        .get("date")
        .and_then(MetaValue::as_str)
        .and_then(parse_date)
        .or_else(|| modified.map(DateTime::<Utc>::from))
        .unwrap_or_else(Utc::now);

    let cover_image_url = metadata
        .get("coverImage")
        .and_then(MetaValue::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://picsum.photos/seed/{}/1200/800", file_name));

    let tags = metadata
        .get("tags")
        .and_then(MetaValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let categories = metadata
        .get("categories")
        .and_then(MetaValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default();

    let read_time_minutes = read_time_minutes(&body);

    Post {
        id: file_name,
        title,
        excerpt,
        content: body,
        author: Author::default(),
        cover_image_url,
        published_at,
        read_time_minutes,
        tags,
        categories,
        file_ref,
    }
}

fn parse_date(date_str: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(date_str) {
        return Some(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
}
