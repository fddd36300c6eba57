use super::lock;
use crate::aggregate;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};
use sts_core::{
    models::{Metric, NodeMap, ProductRecord},
    ports::CacheRepository,
};
use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset};
use tokio::{
    sync::{Notify, oneshot, watch},
    task::JoinHandle,
};
use tracing::{Level, event};

/// Failures reported to callers waiting on a metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The aggregation task died; re-issuing the request runs it again
    #[error("aggregation worker failed: {0}")]
    Worker(String),
    /// The dispatcher no longer accepts or answers requests
    #[error("dispatcher has been disposed")]
    Disposed,
}

/// The states a [`Dispatcher`] moves through. There is no way back from
/// `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Requests are queued and answered
    Accepting,
    /// Requests are refused and the worker has been told to stop
    Disposed,
}

type Answer = Result<Arc<NodeMap>, DispatchError>;

struct Job {
    metric: Metric,
    // None for prefetches
    reply: Option<oneshot::Sender<Answer>>,
}

struct Queue {
    lifecycle: Lifecycle,
    jobs: VecDeque<Job>,
}

type Clock = Box<dyn Fn() -> OffsetDateTime + Send + Sync>;

type Aggregator = Arc<dyn Fn(&[ProductRecord], Metric, Date) -> NodeMap + Send + Sync>;

struct Shared<C> {
    cache: C,
    clock: Clock,
    aggregator: Aggregator,
    products: watch::Sender<Arc<Vec<ProductRecord>>>,
    queue: Mutex<Queue>,
    wake: Notify,
}

/// Runs aggregations on a single background worker, in front of a cache.
///
/// Requests for a metric jump to the front of the queue, prefetches join at
/// the back, and the worker handles one metric at a time: it serves the
/// cached tree when one was built today, otherwise it aggregates the
/// current product snapshot on the blocking pool, stores the result and
/// only then answers. Cache failures are logged and otherwise ignored.
///
/// The dispatcher is a cheap handle; clones share the queue and worker.
pub struct Dispatcher<C> {
    shared: Arc<Shared<C>>,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
            worker: self.worker.clone(),
        }
    }
}

/// An answer the worker still owes.
#[derive(Debug)]
pub struct Pending {
    metric: Metric,
    receiver: oneshot::Receiver<Answer>,
}

impl Pending {
    /// The metric that was requested
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Wait for the tree.
    pub async fn wait(self) -> Answer {
        // a dropped sender means the job was discarded on shutdown
        self.receiver.await.unwrap_or(Err(DispatchError::Disposed))
    }
}

impl<C: CacheRepository + 'static> Dispatcher<C> {
    /// Start a dispatcher over `products` using the system clock.
    ///
    /// This spawns the worker, so it must be called from within a Tokio
    /// runtime.
    pub fn new(cache: C, products: Vec<ProductRecord>) -> Self {
        Self::with_clock(cache, products, OffsetDateTime::now_utc)
    }

    /// Start a dispatcher that reads the time from `clock`.
    pub fn with_clock(
        cache: C,
        products: Vec<ProductRecord>,
        clock: impl Fn() -> OffsetDateTime + Send + Sync + 'static,
    ) -> Self {
        Self::with_aggregator(cache, products, clock, aggregate)
    }

    /// Start a dispatcher that builds trees with `aggregator` instead of
    /// [`aggregate`].
    ///
    /// `aggregator` runs on the blocking pool. If it panics, the waiting
    /// request fails with [`DispatchError::Worker`] and the worker moves on
    /// to the next job.
    pub fn with_aggregator(
        cache: C,
        products: Vec<ProductRecord>,
        clock: impl Fn() -> OffsetDateTime + Send + Sync + 'static,
        aggregator: impl Fn(&[ProductRecord], Metric, Date) -> NodeMap + Send + Sync + 'static,
    ) -> Self {
        let shared = Arc::new(Shared {
            cache,
            clock: Box::new(clock),
            aggregator: Arc::new(aggregator),
            products: watch::Sender::new(Arc::new(products)),
            queue: Mutex::new(Queue {
                lifecycle: Lifecycle::Accepting,
                jobs: VecDeque::new(),
            }),
            wake: Notify::new(),
        });
        let worker = tokio::spawn(run(shared.clone()));
        Self {
            shared,
            worker: Arc::new(Mutex::new(Some(worker))),
        }
    }

    /// The current lifecycle state.
    pub fn lifecycle(&self) -> Lifecycle {
        lock(&self.shared.queue).lifecycle
    }

    /// The current time according to the dispatcher's clock.
    pub fn now(&self) -> OffsetDateTime {
        (self.shared.clock)()
    }

    /// The storage trees are cached in.
    pub fn cache(&self) -> &C {
        &self.shared.cache
    }

    /// The product snapshot the next aggregation will read.
    pub fn products(&self) -> Arc<Vec<ProductRecord>> {
        self.shared.products.borrow().clone()
    }

    /// Swap in a new product snapshot. Runs already in progress keep the
    /// snapshot they started with.
    pub fn replace_products(&self, products: Vec<ProductRecord>) {
        self.shared.products.send_replace(Arc::new(products));
    }

    /// Ask for the tree of `metric` ahead of anything already queued.
    pub fn request(&self, metric: Metric) -> Pending {
        let (sender, receiver) = oneshot::channel();
        let mut queue = lock(&self.shared.queue);
        match queue.lifecycle {
            Lifecycle::Accepting => {
                queue.jobs.push_front(Job {
                    metric,
                    reply: Some(sender),
                });
                self.shared.wake.notify_one();
            }
            Lifecycle::Disposed => {
                let _ = sender.send(Err(DispatchError::Disposed));
            }
        }
        Pending { metric, receiver }
    }

    /// Queue `metrics` for computation after everything already queued.
    /// Metrics already waiting in the queue are not queued twice.
    pub fn prefetch(&self, metrics: impl IntoIterator<Item = Metric>) {
        let mut queue = lock(&self.shared.queue);
        if queue.lifecycle == Lifecycle::Disposed {
            return;
        }
        for metric in metrics {
            if queue.jobs.iter().all(|job| job.metric != metric) {
                queue.jobs.push_back(Job {
                    metric,
                    reply: None,
                });
            }
        }
        self.shared.wake.notify_one();
    }

    /// Request `metric` and queue every other metric behind it.
    ///
    /// Queued metrics whose cached tree is still fresh cost only a timestamp
    /// lookup when their turn comes; their trees are not read.
    pub fn select(&self, metric: Metric) -> Pending {
        let pending = self.request(metric);
        self.prefetch(Metric::ALL.into_iter().filter(|&other| other != metric));
        pending
    }

    /// Whether the cache holds a tree for `metric` built today. A failing
    /// cache counts as holding nothing.
    pub async fn is_fresh(&self, metric: Metric) -> bool {
        match self.shared.cache.is_fresh(metric, self.now()).await {
            Ok(fresh) => fresh,
            Err(err) => {
                event!(
                    Level::WARN,
                    metric = metric.as_str(),
                    err = err.to_string(),
                    "cache lookup failed"
                );
                false
            }
        }
    }

    /// Stop accepting requests, fail everything still queued and wait for
    /// the worker to finish the metric it is working on.
    pub async fn dispose(&self) {
        let discarded: Vec<Job> = {
            let mut queue = lock(&self.shared.queue);
            queue.lifecycle = Lifecycle::Disposed;
            queue.jobs.drain(..).collect()
        };
        for job in discarded {
            if let Some(reply) = job.reply {
                let _ = reply.send(Err(DispatchError::Disposed));
            }
        }
        self.shared.wake.notify_one();

        let worker = lock(&self.worker).take();
        if let Some(worker) = worker {
            if let Err(err) = worker.await {
                event!(Level::ERROR, err = err.to_string(), "worker did not stop cleanly");
            }
        }
    }
}

async fn run<C: CacheRepository>(shared: Arc<Shared<C>>) {
    while let Some(Job { metric, reply }) = shared.next_job().await {
        match reply {
            Some(reply) => {
                let answer = shared.process(metric).await;
                // the caller may have given up waiting
                let _ = reply.send(answer);
            }
            None => shared.warm(metric).await,
        }
    }
    event!(Level::DEBUG, "aggregation worker stopped");
}

impl<C: CacheRepository> Shared<C> {
    async fn next_job(&self) -> Option<Job> {
        loop {
            {
                let mut queue = lock(&self.queue);
                if let Some(job) = queue.jobs.pop_front() {
                    return Some(job);
                }
                if queue.lifecycle == Lifecycle::Disposed {
                    return None;
                }
            }
            self.wake.notified().await;
        }
    }

    /// Make sure today's tree of `metric` is cached, without reading it.
    async fn warm(&self, metric: Metric) {
        let now = (self.clock)();
        match self.cache.is_fresh(metric, now).await {
            Ok(true) => {
                event!(Level::DEBUG, metric = metric.as_str(), "already cached");
                return;
            }
            Ok(false) => {}
            Err(err) => {
                event!(
                    Level::WARN,
                    metric = metric.as_str(),
                    err = err.to_string(),
                    "cache timestamp lookup failed, recomputing"
                );
            }
        }
        // failures are logged by build; nobody is waiting on the answer
        let _ = self.build(metric, now).await;
    }

    async fn process(&self, metric: Metric) -> Answer {
        let now = (self.clock)();
        match self.cache.get_fresh(metric, now).await {
            Ok(Some(tree)) => {
                event!(Level::DEBUG, metric = metric.as_str(), "served from cache");
                return Ok(Arc::new(tree));
            }
            Ok(None) => {}
            Err(err) => {
                event!(
                    Level::WARN,
                    metric = metric.as_str(),
                    err = err.to_string(),
                    "cache read failed, recomputing"
                );
            }
        }
        self.build(metric, now).await
    }

    async fn build(&self, metric: Metric, now: OffsetDateTime) -> Answer {
        let products = self.products.borrow().clone();
        let aggregator = self.aggregator.clone();
        let today = now.to_offset(UtcOffset::UTC).date();
        let tree = tokio::task::spawn_blocking(move || {
            aggregator(products.as_slice(), metric, today)
        })
        .await
        .map_err(|err| {
            event!(
                Level::ERROR,
                metric = metric.as_str(),
                err = err.to_string(),
                "aggregation failed"
            );
            DispatchError::Worker(err.to_string())
        })?;

        if let Err(err) = self.cache.put(metric, &tree, now).await {
            event!(
                Level::WARN,
                metric = metric.as_str(),
                err = err.to_string(),
                "cache write failed"
            );
        }
        event!(
            Level::INFO,
            metric = metric.as_str(),
            nodes = tree.len(),
            "aggregated"
        );
        Ok(Arc::new(tree))
    }
}
