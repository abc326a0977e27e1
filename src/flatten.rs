//! Flattening of nested status trees into dotted-path statistics.

use serverstat_types::{FlatStats, Scalar, StatusTree, StatusValue};

use crate::config::DEFAULT_HANDLE_MARKER;

/// Flatten a tree with the default handle marker.
pub fn flatten(tree: &StatusTree) -> FlatStats {
    Flattener::default().flatten(tree)
}

/// Converts a [`StatusTree`] into [`FlatStats`].
///
/// Paths are the dot-joined field names from the root to each leaf. Fields
/// named exactly like the handle marker are skipped at every depth, together
/// with everything below them. Array elements use their index as the path
/// segment.
#[derive(Debug, Clone)]
pub struct Flattener {
    marker: String,
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(DEFAULT_HANDLE_MARKER)
    }
}

impl Flattener {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn flatten(&self, tree: &StatusTree) -> FlatStats {
        let mut out = FlatStats::new();
        self.walk_tree(tree, "", &mut out);
        out
    }

    fn walk_tree(&self, tree: &StatusTree, prefix: &str, out: &mut FlatStats) {
        for (name, value) in tree.iter() {
            if *name == self.marker {
                continue;
            }
            self.walk_value(value, format!("{}{}", prefix, name), out);
        }
    }

    fn walk_value(&self, value: &StatusValue, path: String, out: &mut FlatStats) {
        let scalar = match value {
            StatusValue::Document(tree) => {
                self.walk_tree(tree, &format!("{}.", path), out);
                return;
            }
            StatusValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.walk_value(item, format!("{}.{}", path, index), out);
                }
                return;
            }
            // 64-bit counters are stored as plain integers
            StatusValue::Long(v) | StatusValue::Int(v) => Scalar::Int(*v),
            StatusValue::Float(v) => Scalar::Float(*v),
            StatusValue::Bool(v) => Scalar::Bool(*v),
            StatusValue::Text(v) => Scalar::Text(v.clone()),
            StatusValue::Null => Scalar::Null,
        };
        out.insert(path, scalar);
    }
}
