//! REST API endpoints for the metric catalogue and the aggregated trees.
//!
//! Every tree request goes through the dispatcher: a cached tree built today
//! is served as is, anything else is rebuilt on the worker and cached before
//! it is answered.

use std::sync::Arc;

use crate::{ApiCache, config::AxumConfig};
use aide::axum::{
    ApiRouter,
    routing::{get, post},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sts_core::models::{InvalidMetric, Metric, NodeMap, TreePage, TreePageQuery};
use sts_engine::dispatch::{DispatchError, Dispatcher};
use tracing::{Level, event};

/// Path parameter for metric-specific endpoints.
#[derive(Deserialize, JsonSchema)]
struct MetricPath {
    /// The metric name, e.g. `revenue`
    metric: String,
}

/// An entry of the metric catalogue.
#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct MetricInfo {
    /// The metric name as used in paths
    metric: Metric,
    /// The column header to display
    label: &'static str,
    /// Whether sums are reported (false for averaged metrics)
    additive: bool,
    /// Whether a tree built today is cached
    cached: bool,
}

/// Creates a router with metric-related endpoints.
pub fn router<C: ApiCache>() -> ApiRouter<Dispatcher<C>> {
    ApiRouter::new()
        .api_route("/", get(list_metrics::<C>))
        .api_route("/{metric}/tree", get(get_tree::<C>))
        .api_route("/{metric}/rows", post(get_rows::<C>))
}

fn parse_metric(metric: &str) -> Result<Metric, (StatusCode, String)> {
    metric
        .parse()
        .map_err(|err: InvalidMetric| (StatusCode::BAD_REQUEST, err.to_string()))
}

fn worker_failure(metric: Metric) -> impl FnOnce(DispatchError) -> (StatusCode, String) {
    move |err| {
        event!(Level::ERROR, metric = metric.as_str(), err = err.to_string());
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to build the {} tree", metric),
        )
    }
}

/// List the available metrics.
///
/// # Returns
///
/// - `200 OK`: Every metric, in display order, with its cache state
async fn list_metrics<C: ApiCache>(
    State(dispatcher): State<Dispatcher<C>>,
) -> Json<Vec<MetricInfo>> {
    let mut metrics = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        metrics.push(MetricInfo {
            metric,
            label: metric.label(),
            additive: metric.is_additive(),
            cached: dispatcher.is_fresh(metric).await,
        });
    }
    Json(metrics)
}

/// Retrieve the complete tree of a metric, keyed by node id.
///
/// # Returns
///
/// - `200 OK`: The tree
/// - `400 Bad Request`: Unknown metric
/// - `500 Internal Server Error`: The tree could not be built
async fn get_tree<C: ApiCache>(
    State(dispatcher): State<Dispatcher<C>>,
    Path(MetricPath { metric }): Path<MetricPath>,
) -> Result<Json<NodeMap>, (StatusCode, String)> {
    let metric = parse_metric(&metric)?;
    let tree = dispatcher
        .select(metric)
        .wait()
        .await
        .map_err(worker_failure(metric))?;
    Ok(Json(Arc::unwrap_or_clone(tree)))
}

/// Retrieve one window of rows at one level of a metric's tree.
///
/// An empty `groupKeys` asks for the suppliers; otherwise the children of
/// the last key are listed. The window is capped by the configured page
/// limit, and `rowCount` always reports the full size of the level.
///
/// # Returns
///
/// - `200 OK`: The rows and the level's row count
/// - `400 Bad Request`: Unknown metric
/// - `500 Internal Server Error`: The tree could not be built
async fn get_rows<C: ApiCache>(
    State(dispatcher): State<Dispatcher<C>>,
    Extension(config): Extension<Arc<AxumConfig>>,
    Path(MetricPath { metric }): Path<MetricPath>,
    Json(query): Json<TreePageQuery>,
) -> Result<Json<TreePage>, (StatusCode, String)> {
    let metric = parse_metric(&metric)?;
    let tree = dispatcher
        .select(metric)
        .wait()
        .await
        .map_err(worker_failure(metric))?;
    Ok(Json(query.limited(config.page_limit).page(&tree)))
}
