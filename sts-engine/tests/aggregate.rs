use approx::assert_relative_eq;
use rstest::*;
use rstest_reuse::{self, *};
use sts_core::models::{DAYS, Level, Metric, NodeId, NodeMap, ProductRecord};
use sts_engine::aggregate;
use time::{Date, Duration, macros::date};

use additive_metrics::additive_metrics;

const TODAY: Date = date!(2024-05-31);

fn product(
    id: &str,
    days_ago: i64,
    cost: Vec<Option<f64>>,
    orders: Vec<Option<f64>>,
    returns: Vec<Option<f64>>,
) -> ProductRecord {
    let segments: Vec<&str> = id.split(':').collect();
    ProductRecord {
        supplier: segments[0].to_owned(),
        brand: segments[1].to_owned(),
        r#type: segments[2].to_owned(),
        article: segments[3].to_owned(),
        last_update: TODAY.midnight().assume_utc() - Duration::days(days_ago),
        cost,
        orders,
        returns,
    }
}

fn constant(value: f64, len: usize) -> Vec<Option<f64>> {
    vec![Some(value); len]
}

#[fixture]
fn catalogue() -> Vec<ProductRecord> {
    let groups = [
        "north:alpha:boots",
        "north:alpha:socks",
        "north:beta:boots",
        "south:gamma:hats",
    ];
    let mut products = Vec::new();
    for (i, group) in groups.into_iter().enumerate() {
        for article in 0..3 {
            let seed = (i * 3 + article) as f64;
            let days_ago = ((i * 7 + article * 11) % 40) as i64;
            let len = 10 + (i + article * 5) % 25;
            let cost = (0..len)
                .map(|d| (d % 4 != 3).then(|| 10.0 + seed + d as f64 * 0.5))
                .collect();
            let orders = (0..len)
                .map(|d| (d % 5 != 2).then(|| (seed + d as f64) % 7.0 + 1.0))
                .collect();
            let returns = (0..len)
                .map(|d| (d % 3 == 0).then(|| (seed + d as f64) % 3.0))
                .collect();
            products.push(product(
                &format!("{group}:A{article}"),
                days_ago,
                cost,
                orders,
                returns,
            ));
        }
    }
    products
}

/// Number of leaf-days with data below `id` on `day`.
fn leaf_days(tree: &NodeMap, id: &NodeId, day: usize) -> f64 {
    let node = &tree[id];
    if node.child_ids.is_empty() {
        node.metric_data[day].map_or(0.0, |_| 1.0)
    } else {
        node.child_ids
            .iter()
            .map(|child| leaf_days(tree, child, day))
            .sum()
    }
}

#[rstest]
#[case::cost(Metric::Cost)]
#[case::revenue(Metric::Revenue)]
fn aggregation_is_idempotent(#[case] metric: Metric, catalogue: Vec<ProductRecord>) {
    let first = aggregate(&catalogue, metric, TODAY);
    let second = aggregate(&catalogue, metric, TODAY);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[rstest]
fn every_level_is_present(catalogue: Vec<ProductRecord>) {
    let tree = aggregate(&catalogue, Metric::Orders, TODAY);
    let count = |level| tree.keys().filter(|id| id.level() == Some(level)).count();
    assert_eq!(count(Level::Supplier), 2);
    assert_eq!(count(Level::Brand), 3);
    assert_eq!(count(Level::Type), 4);
    assert_eq!(count(Level::Article), 12);

    for (id, node) in tree.iter() {
        for child in node.child_ids.iter() {
            assert_eq!(child.parent().as_ref(), Some(id));
            assert!(tree.contains_key(child));
        }
    }
}

#[apply(additive_metrics)]
#[rstest]
fn additive_rollup(#[case] metric: Metric, catalogue: Vec<ProductRecord>) {
    let tree = aggregate(&catalogue, metric, TODAY);

    for node in tree.values().filter(|node| node.is_group()) {
        for day in 0..DAYS {
            let children: Vec<f64> = node
                .child_ids
                .iter()
                .filter_map(|child| tree[child].metric_data[day])
                .collect();
            match node.metric_data[day] {
                Some(value) => assert_relative_eq!(value, children.iter().sum::<f64>()),
                None => assert!(children.is_empty()),
            }
        }

        let defined: Vec<f64> = node.metric_data.defined().map(|(_, v)| v).collect();
        if defined.is_empty() {
            assert_eq!(node.sum, None);
            assert_eq!(node.average, None);
        } else {
            let sum: f64 = defined.iter().sum();
            assert_relative_eq!(node.sum.unwrap(), sum);
            assert_relative_eq!(node.average.unwrap(), sum / defined.len() as f64);
        }
    }
}

#[rstest]
fn weighted_rollup(catalogue: Vec<ProductRecord>) {
    let tree = aggregate(&catalogue, Metric::Cost, TODAY);

    for node in tree.values() {
        assert_eq!(node.sum, None);
    }

    for node in tree.values().filter(|node| node.is_group()) {
        for day in 0..DAYS {
            let (weighted, weights) = node
                .child_ids
                .iter()
                .filter_map(|child| {
                    let value = tree[child].metric_data[day]?;
                    let weight = leaf_days(&tree, child, day);
                    Some((value * weight, weight))
                })
                .fold((0.0, 0.0), |(a, b), (x, w)| (a + x, b + w));
            match node.metric_data[day] {
                Some(value) => assert_relative_eq!(value, weighted / weights, epsilon = 1e-9),
                None => assert_eq!(weights, 0.0),
            }
        }
    }
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(12)]
#[case(29)]
#[case(30)]
#[case(45)]
fn window_padding(#[case] days_ago: usize) {
    let raw: Vec<Option<f64>> = (1..=DAYS).map(|v| Some(v as f64)).collect();
    let products = [product("s:b:t:a", days_ago as i64, vec![], raw.clone(), vec![])];
    let tree = aggregate(&products, Metric::Orders, TODAY);
    let leaf = &tree["s:b:t:a"];

    let gap = days_ago.min(DAYS);
    for day in 0..gap {
        assert_eq!(leaf.metric_data[day], None);
    }
    for day in gap..DAYS {
        assert_eq!(leaf.metric_data[day], raw[day - gap]);
    }
}

#[test]
fn revenue_reference_series() {
    let cost = (0..30).map(|d| Some(150.50 + 0.25 * d as f64)).collect();
    let orders = (0..30).map(|d| Some((20 + d % 10) as f64)).collect();
    let returns = (0..30).map(|d| Some((5 + d % 8) as f64)).collect();
    let products = [product("s:b:t:a", 0, cost, orders, returns)];
    let tree = aggregate(&products, Metric::Revenue, TODAY);

    for id in ["s", "s:b", "s:b:t", "s:b:t:a"] {
        assert_relative_eq!(tree[id].sum.unwrap(), 74948.75, epsilon = 1e-6);
        assert_relative_eq!(tree[id].average.unwrap(), 2498.29, epsilon = 1e-2);
    }
}

#[test]
fn single_fresh_product_cost() {
    let products = [product("s:b:t:a", 0, constant(100.0, 30), vec![], vec![])];
    let tree = aggregate(&products, Metric::Cost, TODAY);
    assert_eq!(tree["s"].average, Some(100.0));
    assert_eq!(tree["s"].sum, None);
    assert!(tree["s"].metric_data.0.iter().all(|v| *v == Some(100.0)));
}

#[rstest]
#[case::cost(Metric::Cost)]
#[case::orders(Metric::Orders)]
#[case::revenue(Metric::Revenue)]
fn stale_product_has_no_data(#[case] metric: Metric) {
    let products = [product(
        "s:b:t:a",
        31,
        constant(100.0, 30),
        constant(4.0, 30),
        constant(1.0, 30),
    )];
    let tree = aggregate(&products, metric, TODAY);
    assert_eq!(tree.len(), 4);
    for node in tree.values() {
        assert!(node.metric_data.is_empty());
        assert_eq!(node.average, None);
        assert_eq!(node.sum, None);
    }
}

#[test]
fn mixed_staleness_weights_by_valid_days() {
    let products = [
        product("s:b:t:a", 10, constant(50.0, 30), vec![], vec![]),
        product("s:b:u:b", 25, constant(100.0, 30), vec![], vec![]),
    ];
    let tree = aggregate(&products, Metric::Cost, TODAY);
    assert_relative_eq!(tree["s"].average.unwrap(), 60.0);
    assert_relative_eq!(tree["s:b"].average.unwrap(), 60.0);
    assert_eq!(tree["s:b:t:a"].average, Some(50.0));
    assert_eq!(tree["s:b:u:b"].average, Some(100.0));

    // days 10 to 24 only hold the first product, 25 onwards hold both
    assert_eq!(tree["s"].metric_data[9], None);
    assert_eq!(tree["s"].metric_data[10], Some(50.0));
    assert_eq!(tree["s"].metric_data[25], Some(75.0));
}

#[test]
fn sparse_children_do_not_zero_the_parent() {
    let products = [
        product("s:b:t:a", 0, vec![], vec![Some(3.0), None], vec![]),
        product("s:b:t:b", 0, vec![], vec![None, None], vec![]),
    ];
    let tree = aggregate(&products, Metric::Orders, TODAY);
    assert_eq!(tree["s:b:t"].metric_data[0], Some(3.0));
    assert_eq!(tree["s:b:t"].metric_data[1], None);
    assert_eq!(tree["s:b:t:b"].sum, None);
    assert_eq!(tree["s:b:t:b"].average, None);
}

#[test]
fn leaf_average_divides_by_days_in_window() {
    // five days in range, two of them with data
    let products = [product(
        "s:b:t:a",
        25,
        vec![],
        vec![Some(4.0), None, Some(6.0)],
        vec![],
    )];
    let tree = aggregate(&products, Metric::Orders, TODAY);
    assert_eq!(tree["s:b:t:a"].average, Some(2.0));
    assert_eq!(tree["s:b:t"].average, Some(5.0));
}

#[test]
fn wire_format() {
    let products = [product("s:b:t:a", 0, constant(2.0, 1), vec![], vec![])];
    let tree = aggregate(&products, Metric::Cost, TODAY);
    let value = serde_json::to_value(&tree).unwrap();

    assert_eq!(value["s"]["childIds"], serde_json::json!(["s:b"]));
    assert_eq!(value["s:b:t:a"]["metricData"][0], serde_json::json!(2.0));
    assert!(value["s:b:t:a"]["metricData"][1].is_null());
    assert!(value["s"]["sum"].is_null());
    assert!(value["s"].get("cellCount").is_none());
}
