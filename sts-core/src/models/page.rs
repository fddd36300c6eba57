use super::{AggregationNode, Level, NodeId, NodeMap};

/// A request for one window of rows at one level of the tree.
///
/// This mirrors what an infinite-scrolling tree grid asks for: the chain of
/// expanded ancestors (empty for the root level) and a half-open row range.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TreePageQuery {
    /// Ids of the expanded ancestors, root first. Only the last one matters.
    #[cfg_attr(feature = "serde", serde(default))]
    pub group_keys: Vec<NodeId>,
    /// First row of the window (inclusive)
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_row: usize,
    /// End of the window (exclusive)
    pub end_row: usize,
}

/// A node as the grid consumes it: its data plus its id.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct GridRow {
    /// The node id, doubling as the grid's group key
    pub id: NodeId,
    /// Whether the row can be expanded
    pub group: bool,
    /// The node data
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub node: AggregationNode,
}

/// One window of rows plus the total number of rows at that level.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TreePage {
    /// The rows of the requested window
    pub rows: Vec<GridRow>,
    /// How many rows exist at this level in total
    pub row_count: usize,
}

impl TreePageQuery {
    /// Shrink the window so it spans at most `limit` rows.
    pub fn limited(mut self, limit: usize) -> Self {
        self.end_row = self.end_row.min(self.start_row.saturating_add(limit));
        self
    }

    /// Resolve the query against a built tree.
    ///
    /// An unknown ancestor yields an empty page rather than an error: the grid
    /// may still hold keys from a tree built for another metric.
    pub fn page(&self, tree: &NodeMap) -> TreePage {
        let level: Vec<(&NodeId, &AggregationNode)> = match self.group_keys.last() {
            None => tree
                .iter()
                .filter(|(id, _)| id.level() == Some(Level::Supplier))
                .collect(),
            Some(parent) => tree
                .get(parent)
                .map(|node| {
                    node.child_ids
                        .iter()
                        .filter_map(|child| tree.get_key_value(child))
                        .collect()
                })
                .unwrap_or_default(),
        };

        let row_count = level.len();
        let start = self.start_row.min(row_count);
        let end = self.end_row.clamp(start, row_count);

        TreePage {
            rows: level[start..end]
                .iter()
                .map(|(id, node)| GridRow {
                    id: (*id).clone(),
                    group: node.is_group(),
                    node: (*node).clone(),
                })
                .collect(),
            row_count,
        }
    }
}
