//! StatusTree - the raw, nested server status document.

use std::collections::BTreeMap;

use crate::StatusValue;

/// A raw server status document.
///
/// This is the read-only input to the flattener. Field names are strings and
/// values are either scalars or nested trees. The schema is open: which
/// fields exist depends on the server version and storage engine.
///
/// # Example
///
/// ```rust
/// use serverstat_types::StatusTree;
///
/// let tree = StatusTree::builder()
///     .field("uptime", 100)
///     .document("connections", |c| c.field("current", 12).field("available", 800))
///     .build();
///
/// assert!(tree.get("connections").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusTree {
    /// Child nodes, keyed by field name.
    pub fields: BTreeMap<String, StatusValue>,
}

impl StatusTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing trees.
    pub fn builder() -> StatusTreeBuilder {
        StatusTreeBuilder::new()
    }

    /// Check if the tree has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of top-level fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Get a top-level field.
    pub fn get(&self, name: &str) -> Option<&StatusValue> {
        self.fields.get(name)
    }

    /// Follow a dotted path through nested documents.
    ///
    /// Field names containing dots cannot be addressed this way; use
    /// [`StatusTree::get`] on the intermediate documents instead.
    pub fn get_path(&self, path: &str) -> Option<&StatusValue> {
        let mut segments = path.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            match current {
                StatusValue::Document(tree) => current = tree.fields.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Insert or replace a top-level field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<StatusValue>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Iterate over top-level fields.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StatusValue)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, StatusValue)> for StatusTree {
    fn from_iter<I: IntoIterator<Item = (String, StatusValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Builder for `StatusTree` instances.
#[derive(Debug, Default)]
pub struct StatusTreeBuilder {
    fields: BTreeMap<String, StatusValue>,
}

impl StatusTreeBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scalar (or pre-built nested) field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<StatusValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Add a field wrapped as a 64-bit counter.
    pub fn long(mut self, name: impl Into<String>, value: i64) -> Self {
        self.fields.insert(name.into(), StatusValue::Long(value));
        self
    }

    /// Add a nested document built using a closure.
    pub fn document<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(StatusTreeBuilder) -> StatusTreeBuilder,
    {
        let tree = f(StatusTreeBuilder::new()).build();
        self.fields.insert(name.into(), StatusValue::Document(tree));
        self
    }

    /// Build the tree.
    pub fn build(self) -> StatusTree {
        StatusTree {
            fields: self.fields,
        }
    }
}
