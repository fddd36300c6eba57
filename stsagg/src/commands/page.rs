use std::io::Read;
use sts_core::models::{NodeMap, TreePage, TreePageQuery};

/// Read an aggregated tree and extract one page of it.
pub fn page_tree(input: impl Read, query: &TreePageQuery) -> anyhow::Result<TreePage> {
    let tree: NodeMap = serde_json::from_reader(input)?;
    Ok(query.page(&tree))
}
