//! Merge freshly scanned posts into a previously held collection by identity.
//!
//! Two policies exist and the asymmetry is intentional: a full-vault rescan
//! can tell that a file vanished and drops its stale entry, while a flat
//! import cannot distinguish "deleted" from "not re-selected" and therefore
//! never drops anything.

use super::types::Post;
use std::collections::HashSet;

/// Connect / fallback policy: a scanned post replaces any previous entry with
/// the same id, and every previous entry whose id was not re-scanned survives.
pub fn merge(scanned: Vec<Post>, previous: Vec<Post>) -> Vec<Post> {
    let seen: HashSet<String> = scanned.iter().map(|post| post.id.clone()).collect();

    let mut merged = scanned;
    merged.extend(previous.into_iter().filter(|post| !seen.contains(&post.id)));
    merged
}

/// Full-rescan policy: the scan is authoritative for everything file-backed.
/// Previous file-backed entries not reconfirmed by this pass are dropped;
/// memory-only posts (no file reference) are preserved unchanged.
pub fn merge_full_rescan(scanned: Vec<Post>, previous: Vec<Post>) -> Vec<Post> {
    let seen: HashSet<String> = scanned.iter().map(|post| post.id.clone()).collect();

    let mut merged = scanned;
    merged.extend(
        previous
            .into_iter()
            .filter(|post| post.file_ref.is_none() && !seen.contains(&post.id)),
    );
    merged
}
