//! Structured-header codec for vault files.
//!
//! A file is a delimited header block of `key: value` lines followed by a
//! markdown body. Decoding never fails: anything that is not a well-formed
//! header degrades to empty metadata with the whole input as body.

use super::types::{MetaValue, Metadata, Post};

const DELIMITER: &str = "---";

/// Split raw file text into a metadata mapping and the body.
///
/// Values are split from keys on the first colon only, so timestamps and
/// other colon-bearing values survive intact. Header lines without a colon
/// are ignored.
pub fn decode(text: &str) -> (Metadata, String) {
    let mut lines = text.lines();

    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return (Metadata::new(), text.trim().to_string()),
    }

    let mut header = Vec::new();
    let mut body_lines = Vec::new();
    let mut closed = false;

    for line in lines {
        if closed {
            body_lines.push(line);
        } else if line.trim_end() == DELIMITER {
            closed = true;
        } else {
            header.push(line);
        }
    }

    if !closed {
        // Opening delimiter without a closing one is not a header block.
        return (Metadata::new(), text.trim().to_string());
    }

    let mut metadata = Metadata::new();
    for line in header {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key.to_string(), parse_value(value.trim()));
    }

    (metadata, body_lines.join("\n").trim().to_string())
}

fn parse_value(raw: &str) -> MetaValue {
    if let Some(inner) = raw.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(|item| strip_quotes(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        MetaValue::List(items)
    } else {
        MetaValue::Scalar(strip_quotes(raw).to_string())
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Render a post's persisted fields plus body as file text.
///
/// Only the fixed key set is written: `title`, `date`, `tags`, `categories`.
/// The output is always a valid `decode` input.
pub fn encode(post: &Post) -> String {
    format!(
        "{delim}\ntitle: \"{title}\"\ndate: {date}\ntags: {tags}\ncategories: {categories}\n{delim}\n\n{body}",
        delim = DELIMITER,
        title = post.title,
        date = post.published_at.to_rfc3339(),
        tags = encode_list(&post.tags),
        categories = encode_list(&post.categories),
        body = post.content,
    )
}

fn encode_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("\"{}\"", item)).collect();
    format!("[{}]", quoted.join(", "))
}
