//! Free-text search.

use crate::types::{Entity, Record};
use std::fmt;
use std::sync::Arc;

type Extract<R> = Arc<dyn Fn(&R) -> Vec<&str> + Send + Sync>;

/// A searchable text field of an item.
pub struct TextField<R> {
    name: &'static str,
    extract: Extract<R>,
}

impl<R> Clone for TextField<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<R> fmt::Debug for TextField<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextField").field(&self.name).finish()
    }
}

fn extractor<R, F>(f: F) -> Extract<R>
where
    F: Fn(&R) -> Vec<&str> + Send + Sync + 'static,
{
    Arc::new(f)
}

impl<R: 'static> TextField<R> {
    /// A single string field.
    pub fn new<F>(name: &'static str, field: F) -> Self
    where
        F: Fn(&R) -> &str + Send + Sync + 'static,
    {
        Self {
            name,
            extract: extractor(move |item| vec![field(item)]),
        }
    }

    /// An optional string field. Absent never matches.
    pub fn optional<F>(name: &'static str, field: F) -> Self
    where
        F: Fn(&R) -> Option<&str> + Send + Sync + 'static,
    {
        Self {
            name,
            extract: extractor(move |item| field(item).into_iter().collect()),
        }
    }

    /// A field holding several strings (tags, nested bodies). Any of them may match.
    pub fn many<F>(name: &'static str, field: F) -> Self
    where
        F: Fn(&R) -> Vec<&str> + Send + Sync + 'static,
    {
        Self {
            name,
            extract: extractor(field),
        }
    }
}

impl<T: Entity> TextField<Record<T>> {
    /// The entity's own idea of what is searchable.
    pub fn entity() -> Self {
        Self::many("text", |record: &Record<T>| record.fields.search_text())
    }
}

impl<R> TextField<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether any value of this field contains `needle`, which must already be lowercase.
    fn contains_lowercase(&self, item: &R, needle: &str) -> bool {
        (self.extract)(item)
            .into_iter()
            .any(|value| value.to_lowercase().contains(needle))
    }
}

/// Keep the items where `text` is a case-insensitive substring of any field.
///
/// Blank text keeps everything.
pub fn search<R>(mut items: Vec<R>, text: &str, fields: &[TextField<R>]) -> Vec<R> {
    let needle = text.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items.retain(|item| matches(item, &needle, fields));
    items
}

/// Whether one item matches. `needle` must be trimmed and lowercase.
fn matches<R>(item: &R, needle: &str, fields: &[TextField<R>]) -> bool {
    fields.iter().any(|f| f.contains_lowercase(item, needle))
}
