//! Work planning: the ordered, deduplicated cross-product of keywords,
//! date sub-ranges, and categories.
//!
//! Every work item derives a deterministic [`OutputKey`] from its fields.
//! The key is both the completion-check probe and the persisted filename
//! stem, which is what makes interrupted batches safely resumable.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::dates::DateRange;
use crate::keywords::Keyword;

/// Opaque topic-category identifier (e.g. `0-7-107`). The core never
/// interprets its structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryId(String);

impl CategoryId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deterministic, filesystem-safe identifier for one work item.
///
/// Two items with the same (display name, range, category) always derive the
/// same key, so repeated runs probe and write the same file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OutputKey(String);

impl OutputKey {
    /// Derives the key: `<slug>_<category|all>_<start>~<end>`.
    #[must_use]
    pub fn derive(display_name: &str, category: Option<&CategoryId>, range: &DateRange) -> Self {
        let slug = slugify(display_name);
        let cat = category.map_or_else(|| "all".to_owned(), |c| sanitize_category(c.as_str()));
        Self(format!("{slug}_{cat}_{range}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutputKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lowercases and maps anything outside `[a-z0-9]` to `-`, collapsing runs.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_dash = true; // suppress a leading dash
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            last_was_dash = false;
        } else if !last_was_dash {
            slug.push('-');
            last_was_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("keyword");
    }
    slug
}

/// Categories are already dot/dash-delimited identifiers; keep those
/// delimiters, replace anything else unsafe.
fn sanitize_category(id: &str) -> String {
    id.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '-'
            }
        })
        .collect()
}

/// One concrete fetch: a keyword over one sub-range, under one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub keyword: Keyword,
    pub range: DateRange,
    pub category: Option<CategoryId>,
    pub key: OutputKey,
}

impl WorkItem {
    #[must_use]
    pub fn new(keyword: Keyword, range: DateRange, category: Option<CategoryId>) -> Self {
        let key = OutputKey::derive(keyword.display_name(), category.as_ref(), &range);
        Self {
            keyword,
            range,
            category,
            key,
        }
    }
}

/// Builds the ordered cross-product of keywords, ranges, and categories.
///
/// Keyword input order is preserved; duplicate display phrases are coalesced
/// (first occurrence wins) so each unique keyword is queried once per
/// range/category pair. An empty `categories` slice means "no category
/// filter" and contributes a single uncategorized item per pair.
#[must_use]
pub fn plan(keywords: &[Keyword], ranges: &[DateRange], categories: &[CategoryId]) -> Vec<WorkItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();

    for keyword in keywords {
        if !seen.insert(keyword.display_name()) {
            tracing::debug!(keyword = keyword.display_name(), "duplicate keyword coalesced");
            continue;
        }
        for range in ranges {
            if categories.is_empty() {
                items.push(WorkItem::new(keyword.clone(), *range, None));
            } else {
                for category in categories {
                    items.push(WorkItem::new(
                        keyword.clone(),
                        *range,
                        Some(category.clone()),
                    ));
                }
            }
        }
    }
    items
}
