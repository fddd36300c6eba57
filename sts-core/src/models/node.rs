use super::{Map, NodeId, Series};

/// One node of an aggregated tree.
///
/// Every level shares this shape; which segment of the id is the node's
/// display name is derived from the id itself (see [`NodeId::name`]).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct AggregationNode {
    /// The immediate children of the node (empty for articles)
    pub child_ids: Vec<NodeId>,
    /// The metric by day, slot 0 being today
    pub metric_data: Series,
    /// The total over days with data. None for metrics that do not sum (cost)
    /// and for nodes without any data.
    pub sum: Option<f64>,
    /// The mean per day, or None when no day holds data
    pub average: Option<f64>,
}

impl AggregationNode {
    /// Whether the grid should render the node as an expandable group.
    pub fn is_group(&self) -> bool {
        !self.child_ids.is_empty()
    }
}

/// A fully built tree: every node keyed by its id, in creation order.
pub type NodeMap = Map<NodeId, AggregationNode>;
