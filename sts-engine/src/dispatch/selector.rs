use super::{DispatchError, Dispatcher, Generation, Pending, Superseding, lock};
use std::sync::{Arc, Mutex};
use sts_core::{
    models::{Metric, NodeMap},
    ports::CacheRepository,
};
use tracing::{Level, event};

type Selected = (Metric, Arc<NodeMap>);

/// Tracks which metric a consumer is looking at.
///
/// Each call to [`Selector::select`] supersedes the previous one: however
/// the answers interleave, only the answer to the latest selection is kept.
pub struct Selector<C> {
    dispatcher: Dispatcher<C>,
    state: Arc<Mutex<Superseding<Selected>>>,
}

/// A selection waiting for its tree.
#[derive(Debug)]
pub struct Selection {
    generation: Generation,
    pending: Pending,
    state: Arc<Mutex<Superseding<Selected>>>,
}

impl<C: CacheRepository + 'static> Selector<C> {
    /// A selector with nothing selected yet.
    pub fn new(dispatcher: Dispatcher<C>) -> Self {
        Self {
            dispatcher,
            state: Arc::default(),
        }
    }

    /// Select `metric`, queueing it first and the other metrics behind it.
    pub fn select(&self, metric: Metric) -> Selection {
        let generation = lock(&self.state).issue();
        Selection {
            generation,
            pending: self.dispatcher.select(metric),
            state: self.state.clone(),
        }
    }

    /// The metric and tree of the latest selection that has resolved.
    pub fn current(&self) -> Option<Selected> {
        lock(&self.state).current().cloned()
    }
}

impl Selection {
    /// The generation this selection was issued with
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Wait for the tree.
    ///
    /// # Returns
    ///
    /// - Ok(Some(tree)) if this is still the latest selection
    /// - Ok(None) if a newer selection was made in the meantime
    /// - Err if the worker failed; selecting again retries
    pub async fn resolve(self) -> Result<Option<Arc<NodeMap>>, DispatchError> {
        let metric = self.pending.metric();
        let tree = self.pending.wait().await?;
        if lock(&self.state).accept(self.generation, (metric, tree.clone())) {
            Ok(Some(tree))
        } else {
            event!(
                Level::DEBUG,
                metric = metric.as_str(),
                generation = self.generation.get(),
                "discarding superseded selection"
            );
            Ok(None)
        }
    }
}
