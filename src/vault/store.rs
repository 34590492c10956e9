//! Server-side holder of the post collection over a writable vault root.
//!
//! The collection is owned here and mutated only by whole-collection
//! replacement under the lock; callers get snapshots.

use super::access::VaultRoot;
use super::error::VaultError;
use super::reconcile;
use super::scanner;
use super::types::{FileRef, MARKDOWN_EXTENSION, Post};
use super::writer;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

pub struct VaultStore {
    root: VaultRoot,
    posts: RwLock<Vec<Post>>,
}

impl VaultStore {
    pub fn new(root: VaultRoot) -> Self {
        Self {
            root,
            posts: RwLock::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &VaultRoot {
        &self.root
    }

    /// Full rescan of the vault. Disk wins for every re-scanned id, posts
    /// that were never file-backed survive, and file-backed posts not
    /// reconfirmed by this pass are dropped.
    pub async fn refresh(&self) -> Result<usize, VaultError> {
        info!("Refreshing posts from vault: {:?}", self.root.path());

        let scanned = self.root.scan().await?;
        let count = scanned.len();

        let mut posts = self.posts.write().await;
        let previous = std::mem::take(&mut *posts);
        *posts = reconcile::merge_full_rescan(scanned, previous);

        info!("Found {} posts", count);
        Ok(count)
    }

    /// Snapshot of the collection, newest first.
    pub async fn list(&self) -> Vec<Post> {
        let posts = self.posts.read().await;
        let mut snapshot = posts.clone();
        snapshot.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        snapshot
    }

    /// Persist `post` into the vault, reload it from the file just written,
    /// and merge the re-parsed result into the collection. Callers observe
    /// exactly what was persisted, derived fields included.
    pub async fn save(&self, mut post: Post) -> Result<Post, VaultError> {
        // An id that is already a filename targets that file for overwrite.
        // Ids are bare filenames, never paths.
        if post.file_ref.is_none()
            && post.id.ends_with(MARKDOWN_EXTENSION)
            && !post.id.contains(['/', '\\'])
        {
            post.file_ref = Some(FileRef::new(self.root.path().join(&post.id)));
        }

        let saved = writer::save_post(post, Some(&self.root)).await?;

        let persisted = match &saved.file_ref {
            Some(file_ref) => scanner::load_post(file_ref.path(), true).await?,
            None => saved,
        };

        let mut posts = self.posts.write().await;
        let previous = std::mem::take(&mut *posts);
        *posts = reconcile::merge(vec![persisted.clone()], previous);

        Ok(persisted)
    }

    pub fn start_background_refresh(store: Arc<VaultStore>, interval_minutes: u64) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_minutes * 60));
            interval.tick().await; // Skip the first immediate tick

            loop {
                interval.tick().await;
                info!("Starting scheduled vault refresh");

                if let Err(e) = store.refresh().await {
                    error!("Scheduled vault refresh failed: {}", e);
                }
            }
        });
    }
}
