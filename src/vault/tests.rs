#[cfg(test)]
mod tests {
    use super::super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn sample_post(id: &str, title: &str, file_ref: Option<FileRef>) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            excerpt: "An excerpt".to_string(),
            content: "Some body text.".to_string(),
            author: Author::default(),
            cover_image_url: String::new(),
            published_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            read_time_minutes: 1,
            tags: vec!["alpha".to_string()],
            categories: vec!["Tech".to_string()],
            file_ref,
        }
    }

    fn setup_vault() -> TempDir {
        let temp = TempDir::new().unwrap();

        let first = r#"---
title: "First Post"
date: 2024-01-01T09:00:00+00:00
tags: ["alpha", "beta"]
categories: ["Tech"]
---

Body of the first post."#;
        fs::write(temp.path().join("first_post.md"), first).unwrap();

        let notes_dir = temp.path().join("notes");
        fs::create_dir(&notes_dir).unwrap();
        let second = r#"---
title: "Second Post"
date: 2024-02-01
---

Body of the second post."#;
        fs::write(notes_dir.join("second_post.md"), second).unwrap();

        // Tool-private metadata directory and a non-markdown file, both of
        // which must never surface as posts.
        let hidden_dir = temp.path().join(".obsidian");
        fs::create_dir(&hidden_dir).unwrap();
        fs::write(hidden_dir.join("ignored.md"), "not a post").unwrap();
        fs::write(temp.path().join("readme.txt"), "not markdown").unwrap();

        temp
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut post = sample_post("round_trip.md", "Round Trip", None);
        post.tags = vec!["a".to_string(), "b c".to_string()];
        post.categories = vec!["Tech".to_string()];
        post.content = "First paragraph.\n\nSecond: with a colon.".to_string();

        let text = frontmatter::encode(&post);
        let (metadata, body) = frontmatter::decode(&text);
        let date = post.published_at.to_rfc3339();

        assert_eq!(
            metadata.get("title").and_then(MetaValue::as_str),
            Some("Round Trip")
        );
        assert_eq!(
            metadata.get("date").and_then(MetaValue::as_str),
            Some(date.as_str())
        );
        assert_eq!(
            metadata.get("tags").and_then(MetaValue::as_list),
            Some(&["a".to_string(), "b c".to_string()][..])
        );
        assert_eq!(
            metadata.get("categories").and_then(MetaValue::as_list),
            Some(&["Tech".to_string()][..])
        );
        assert_eq!(body, post.content);
    }

    #[test]
    fn encode_decode_round_trip_with_empty_lists() {
        let mut post = sample_post("empty.md", "Empty Lists", None);
        post.tags = Vec::new();
        post.categories = Vec::new();

        let (metadata, _) = frontmatter::decode(&frontmatter::encode(&post));

        let tags = metadata.get("tags").and_then(MetaValue::as_list).unwrap();
        assert!(tags.is_empty());
        let categories = metadata
            .get("categories")
            .and_then(MetaValue::as_list)
            .unwrap();
        assert!(categories.is_empty());
    }

    #[test]
    fn decode_without_header_returns_input_as_body() {
        let text = "Just content\n\nwith no header block.";
        let (metadata, body) = frontmatter::decode(text);

        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn decode_splits_only_on_first_colon() {
        let text = "---\ntitle: \"Colons\"\ndate: 2024-01-15T10:30:00Z\n---\n\nBody.";
        let (metadata, _) = frontmatter::decode(text);

        assert_eq!(
            metadata.get("date").and_then(MetaValue::as_str),
            Some("2024-01-15T10:30:00Z")
        );
    }

    #[test]
    fn decode_ignores_header_lines_without_colon() {
        let text = "---\ntitle: \"T\"\nnot a key value line\n---\n\nBody.";
        let (metadata, body) = frontmatter::decode(text);

        assert_eq!(metadata.len(), 1);
        assert_eq!(body, "Body.");
    }

    #[test]
    fn decode_strips_matching_quotes() {
        let text = "---\ntitle: 'Single'\nsubtitle: \"Double\"\ntags: ['x', \"y\", z]\n---\n\nBody.";
        let (metadata, _) = frontmatter::decode(text);

        assert_eq!(
            metadata.get("title").and_then(MetaValue::as_str),
            Some("Single")
        );
        assert_eq!(
            metadata.get("subtitle").and_then(MetaValue::as_str),
            Some("Double")
        );
        assert_eq!(
            metadata.get("tags").and_then(MetaValue::as_list),
            Some(&["x".to_string(), "y".to_string(), "z".to_string()][..])
        );
    }

    #[test]
    fn decode_unclosed_header_is_all_body() {
        let text = "---\ntitle: \"T\"\nno closing delimiter here";
        let (metadata, body) = frontmatter::decode(text);

        assert!(metadata.is_empty());
        assert_eq!(body, text);
    }

    #[test]
    fn filename_derivation_is_pinned() {
        assert_eq!(
            writer::derive_filename("Hello, World! 2024"),
            "hello__world__2024.md"
        );
        assert_eq!(writer::derive_filename("plain"), "plain.md");
        assert_eq!(writer::derive_filename(""), "untitled.md");
        assert_eq!(writer::derive_filename("   "), "untitled.md");
    }

    #[test]
    fn read_time_has_a_floor_of_one_minute() {
        assert_eq!(types::read_time_minutes(""), 1);
        assert_eq!(types::read_time_minutes("a few short words"), 1);

        let long_body = vec!["word"; 201].join(" ");
        assert_eq!(types::read_time_minutes(&long_body), 2);
    }

    #[test]
    fn excerpt_truncates_on_character_boundaries() {
        let body = "é".repeat(200);
        let excerpt = types::derive_excerpt(&body);

        assert_eq!(excerpt.chars().count(), 153);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn publish_defaults_fill_empty_lists_only() {
        let mut post = sample_post("draft", "Draft", None);
        post.tags.clear();
        post.categories.clear();

        let post = post.with_publish_defaults();
        assert_eq!(post.tags, vec!["General".to_string()]);
        assert_eq!(post.categories, vec!["Uncategorized".to_string()]);

        let tagged = sample_post("tagged", "Tagged", None).with_publish_defaults();
        assert_eq!(tagged.tags, vec!["alpha".to_string()]);
        assert_eq!(tagged.categories, vec!["Tech".to_string()]);
    }

    #[test]
    fn merge_prefers_scanned_over_previous() {
        let stale = sample_post("a.md", "Old Title", Some(FileRef::new("/vault/a.md")));
        let fresh = sample_post("a.md", "New Title", Some(FileRef::new("/vault/a.md")));
        let brand_new = sample_post("b.md", "Brand New", Some(FileRef::new("/vault/b.md")));

        let merged = reconcile::merge(vec![fresh, brand_new], vec![stale]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].title, "New Title");
        assert_eq!(merged[1].title, "Brand New");
    }

    #[test]
    fn full_rescan_preserves_memory_only_posts() {
        let memory_only = sample_post("draft-1", "Unsaved", None);
        let vanished = sample_post("gone.md", "Deleted on disk", Some(FileRef::new("/vault/gone.md")));

        let merged = reconcile::merge_full_rescan(Vec::new(), vec![memory_only, vanished]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "draft-1");
    }

    #[test]
    fn fallback_merge_never_drops_previous_posts() {
        let file_backed = sample_post("kept.md", "Still wanted", Some(FileRef::new("/vault/kept.md")));

        let merged = reconcile::merge(Vec::new(), vec![file_backed]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].id, "kept.md");
    }

    #[tokio::test]
    async fn scan_finds_markdown_recursively_and_skips_hidden() {
        let temp = setup_vault();

        let posts = scanner::scan_root(temp.path()).await.unwrap();

        let mut ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, ["first_post.md", "second_post.md"]);

        let first = posts.iter().find(|post| post.id == "first_post.md").unwrap();
        assert_eq!(first.title, "First Post");
        assert_eq!(first.tags, ["alpha", "beta"]);
        assert_eq!(first.categories, ["Tech"]);
        assert_eq!(first.read_time_minutes, 1);
        assert!(first.is_writable());
    }

    #[tokio::test]
    async fn rescan_of_unchanged_vault_is_idempotent() {
        let temp = setup_vault();

        let mut first_pass = scanner::scan_root(temp.path()).await.unwrap();
        let mut second_pass = scanner::scan_root(temp.path()).await.unwrap();
        first_pass.sort_by(|a, b| a.id.cmp(&b.id));
        second_pass.sort_by(|a, b| a.id.cmp(&b.id));

        let key = |posts: &[Post]| {
            posts
                .iter()
                .map(|post| {
                    (
                        post.id.clone(),
                        post.title.clone(),
                        post.content.clone(),
                        post.published_at,
                    )
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(key(&first_pass), key(&second_pass));
    }

    #[tokio::test]
    async fn broken_file_does_not_abort_scan() {
        let temp = setup_vault();
        // Invalid UTF-8 makes this file unreadable as text.
        fs::write(temp.path().join("broken.md"), [0xC3u8, 0x28]).unwrap();

        let posts = scanner::scan_root(temp.path()).await.unwrap();

        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn file_without_header_becomes_body_only_post() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("plain.md"), "Just some text.\n\nNo header.").unwrap();

        let posts = scanner::scan_root(temp.path()).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "plain");
        assert_eq!(posts[0].content, "Just some text.\n\nNo header.");
        assert!(posts[0].tags.is_empty());
    }

    #[tokio::test]
    async fn imported_posts_are_read_only_and_never_save() {
        let temp = setup_vault();
        let files = vec![
            temp.path().join("first_post.md"),
            temp.path().join("readme.txt"),
        ];

        let posts = scanner::scan_files(&files).await;

        assert_eq!(posts.len(), 1);
        assert!(!posts[0].is_writable());

        let result = writer::save_post(posts[0].clone(), None).await;
        assert!(matches!(result, Err(VaultError::NoDestination)));
    }

    #[tokio::test]
    async fn save_without_destination_fails() {
        let post = sample_post("draft-1", "Unsaved", None);

        let result = writer::save_post(post, None).await;

        assert!(matches!(result, Err(VaultError::NoDestination)));
    }

    #[tokio::test]
    async fn save_creates_file_then_overwrites_it() {
        let temp = TempDir::new().unwrap();
        let root = VaultRoot::new(temp.path());

        let post = sample_post("temp-id", "Hello, World! 2024", None);
        let saved = writer::save_post(post, Some(&root)).await.unwrap();

        assert_eq!(saved.id, "hello__world__2024.md");
        assert!(saved.is_writable());
        let on_disk = fs::read_to_string(temp.path().join("hello__world__2024.md")).unwrap();
        assert!(on_disk.starts_with("---\ntitle: \"Hello, World! 2024\""));

        let mut updated = saved;
        updated.content = "Rewritten body.".to_string();
        let saved_again = writer::save_post(updated, None).await.unwrap();

        assert_eq!(saved_again.id, "hello__world__2024.md");
        let on_disk = fs::read_to_string(temp.path().join("hello__world__2024.md")).unwrap();
        assert!(on_disk.contains("Rewritten body."));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn capability_probe_distinguishes_access_levels() {
        let temp = TempDir::new().unwrap();

        assert_eq!(Capability::probe(temp.path()).await, Capability::Full);
        assert_eq!(
            Capability::probe(&temp.path().join("missing")).await,
            Capability::ReadOnly
        );

        let file = temp.path().join("file.md");
        fs::write(&file, "x").unwrap();
        assert_eq!(Capability::probe(&file).await, Capability::ReadOnly);
    }

    #[tokio::test]
    async fn connect_grants_full_access_to_writable_directory() {
        let temp = setup_vault();

        let vault = Vault::connect(temp.path()).await.unwrap();

        assert_eq!(vault.capability(), Capability::Full);
        assert!(vault.root().is_some());
        assert_eq!(vault.scan().await.unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn connect_degrades_to_read_only_import() {
        use std::os::unix::fs::PermissionsExt;

        let temp = setup_vault();
        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o555)).unwrap();

        let vault = Vault::connect(temp.path()).await.unwrap();

        assert_eq!(vault.capability(), Capability::ReadOnly);
        assert!(vault.root().is_none());

        // Flat import: only top-level files, no hierarchy, nothing writable.
        let posts = vault.scan().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "first_post.md");
        assert!(!posts[0].is_writable());

        fs::set_permissions(temp.path(), fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn store_refresh_drops_stale_file_backed_posts() {
        let temp = setup_vault();
        let store = VaultStore::new(VaultRoot::new(temp.path()));

        store.refresh().await.unwrap();
        assert_eq!(store.list().await.len(), 2);

        fs::remove_file(temp.path().join("first_post.md")).unwrap();
        store.refresh().await.unwrap();

        let posts = store.list().await;
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "second_post.md");
    }

    #[tokio::test]
    async fn store_save_returns_reparsed_post() {
        let temp = TempDir::new().unwrap();
        let store = VaultStore::new(VaultRoot::new(temp.path()));

        let mut post = sample_post("not-a-filename", "Fresh Draft", None);
        post.content = "A body worth reading.".to_string();
        post.excerpt = String::new();

        let saved = store.save(post).await.unwrap();

        assert_eq!(saved.id, "fresh_draft.md");
        assert_eq!(saved.content, "A body worth reading.");
        assert_eq!(saved.excerpt, "A body worth reading....");
        assert!(saved.is_writable());
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn store_save_overwrites_by_filename_id() {
        let temp = setup_vault();
        let store = VaultStore::new(VaultRoot::new(temp.path()));
        store.refresh().await.unwrap();

        let mut post = sample_post("first_post.md", "First Post", None);
        post.content = "Replaced body.".to_string();

        let saved = store.save(post).await.unwrap();

        assert_eq!(saved.id, "first_post.md");
        let on_disk = fs::read_to_string(temp.path().join("first_post.md")).unwrap();
        assert!(on_disk.contains("Replaced body."));
        assert_eq!(store.list().await.len(), 2);
    }
}
