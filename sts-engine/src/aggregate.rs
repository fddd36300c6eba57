use crate::{
    DayWindow, project,
    rollup::{Additive, Rollup, Stats, Tally, Weighted},
};
use sts_core::models::{
    AggregationNode, Level, Map, Metric, NodeId, NodeMap, ProductRecord,
};
use time::Date;
use tracing::{Level as LogLevel, event};

/// Build the supplier → brand → type → article tree of `metric` over the
/// thirty days ending `today`.
///
/// `cost` is weight-averaged up the tree (see [`Weighted`]); every other
/// metric is summed (see [`Additive`]). Products are visited once, in order;
/// nodes appear in the returned map in the order they were first reached. A
/// product repeating an article that is already present is skipped.
pub fn aggregate(products: &[ProductRecord], metric: Metric, today: Date) -> NodeMap {
    if metric.is_additive() {
        TreeBuilder::new(Additive).build(products, metric, today)
    } else {
        TreeBuilder::new(Weighted).build(products, metric, today)
    }
}

/// A node under construction: its settled values plus the tally it hands to
/// its parent. The tally never leaves the builder.
#[derive(Default)]
struct Draft {
    child_ids: Vec<NodeId>,
    stats: Stats,
    tally: Tally,
}

struct TreeBuilder<R> {
    rollup: R,
    drafts: Map<NodeId, Draft>,
    // internal nodes awaiting settlement, indexed by level depth
    pending: [Vec<NodeId>; 3],
}

impl<R: Rollup> TreeBuilder<R> {
    fn new(rollup: R) -> Self {
        Self {
            rollup,
            drafts: Map::default(),
            pending: Default::default(),
        }
    }

    fn build(mut self, products: &[ProductRecord], metric: Metric, today: Date) -> NodeMap {
        for product in products {
            self.insert(product, metric, today);
        }
        self.settle();
        self.finish()
    }

    /// Pass 1: create the product's path, settle its article and fold it
    /// into the type node above it.
    fn insert(&mut self, product: &ProductRecord, metric: Metric, today: Date) {
        let path = product.path();
        let leaf_id = NodeId::from_segments(&path);
        if self.drafts.contains_key(&leaf_id) {
            event!(
                LogLevel::WARN,
                node = leaf_id.as_str(),
                "skipping duplicate article"
            );
            return;
        }

        let window = DayWindow::resolve(product.last_update, today);
        let series = project(
            &window.pad(&product.cost),
            &window.pad(&product.orders),
            &window.pad(&product.returns),
            metric,
        );
        let (stats, tally) = self.rollup.leaf(&series, window);

        let mut parent: Option<NodeId> = None;
        for (depth, level) in Level::ORDERED.into_iter().enumerate() {
            let id = NodeId::from_segments(&path[..=depth]);
            if !self.drafts.contains_key(&id) {
                self.drafts.insert(id.clone(), Draft::default());
                if let Some(parent) = parent.as_ref().and_then(|p| self.drafts.get_mut(p)) {
                    parent.child_ids.push(id.clone());
                }
                if level != Level::Article {
                    self.pending[level.depth()].push(id.clone());
                }
            }
            parent = Some(id);
        }

        if let Some(leaf) = self.drafts.get_mut(&leaf_id) {
            leaf.stats = stats;
            leaf.tally = tally;
        }
        if let Some(parent) = leaf_id.parent().and_then(|id| self.drafts.get_mut(&id)) {
            parent.tally.absorb(&tally);
        }
    }

    /// Pass 2: settle type nodes from what pass 1 folded into them, then
    /// re-derive each brand and supplier from its settled children.
    fn settle(&mut self) {
        for id in std::mem::take(&mut self.pending[Level::Type.depth()]) {
            if let Some(draft) = self.drafts.get_mut(&id) {
                draft.stats = self.rollup.settle(&draft.tally);
            }
        }

        for level in [Level::Brand, Level::Supplier] {
            for id in std::mem::take(&mut self.pending[level.depth()]) {
                let Some(draft) = self.drafts.get(&id) else {
                    continue;
                };
                let mut tally = Tally::default();
                for child in draft.child_ids.iter() {
                    if let Some(child) = self.drafts.get(child) {
                        tally.absorb(&child.tally);
                    }
                }
                let stats = self.rollup.settle(&tally);
                if let Some(draft) = self.drafts.get_mut(&id) {
                    draft.stats = stats;
                    draft.tally = tally;
                }
            }
        }
    }

    fn finish(self) -> NodeMap {
        self.drafts
            .into_iter()
            .map(|(id, draft)| {
                let Draft {
                    child_ids, stats, ..
                } = draft;
                let node = AggregationNode {
                    child_ids,
                    metric_data: stats.metric_data,
                    sum: stats.sum,
                    average: stats.average,
                };
                (id, node)
            })
            .collect()
    }
}
