//! Doc comments attached to IR nodes.
//!
//! A raw `/** ... */` block is split into a free-text comment and a set of
//! `@tag value` entries. Recognized tags are coerced to their declared type in
//! [`DocTags`]; anything else is kept verbatim.

mod tags;

pub use tags::{DocTags, TagType};

use serde::{Deserialize, Serialize};

/// Parsed documentation of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    /// The leading description text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Tags with parsed values.
    #[serde(default)]
    pub tags: DocTags,
}

impl Doc {
    /// Parse a raw doc block. Returns `None` when the block carries neither a
    /// comment nor any tag.
    pub fn parse(raw: &str) -> Option<Doc> {
        let mut comment_lines: Vec<&str> = Vec::new();
        let mut entries: Vec<(&str, Vec<&str>)> = Vec::new();

        for line in strip_delimiters(raw).lines().map(strip_gutter) {
            match split_tag(line) {
                Some((name, text)) => entries.push((name, vec![text])),
                None => match entries.last_mut() {
                    Some((_, text)) => text.push(line),
                    None => comment_lines.push(line),
                },
            }
        }

        let mut doc = Doc {
            comment: non_empty(comment_lines.join("\n")),
            tags: DocTags::default(),
        };
        for (name, text) in entries {
            let text = non_empty(text.join("\n"));
            doc.tags.set(name, text.as_deref());
        }

        if doc.is_empty() { None } else { Some(doc) }
    }

    /// A doc with only a comment.
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            comment: Some(text.into()),
            tags: DocTags::default(),
        }
    }

    pub fn with_tags(mut self, tags: DocTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.comment.is_none() && self.tags.is_empty()
    }
}

fn strip_delimiters(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("/**")
        .or_else(|| trimmed.strip_prefix("/*"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("*/").unwrap_or(trimmed)
}

fn strip_gutter(line: &str) -> &str {
    let line = line.trim();
    match line.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end(),
        None => line,
    }
}

fn split_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('@')?;
    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let (name, text) = rest.split_at(end);
    if name.is_empty() {
        return None;
    }
    Some((name, text.trim()))
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
