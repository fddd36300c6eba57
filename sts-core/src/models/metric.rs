use std::{fmt, str::FromStr};
use thiserror::Error;

/// The logical metrics a tree can be built for.
///
/// `cost`, `orders` and `returns` are read straight from the product records;
/// `buyouts` and `revenue` are derived from them day by day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Metric {
    /// The unit price of the article on a given day
    Cost,
    /// The number of units ordered on a given day
    Orders,
    /// The number of units returned on a given day
    Returns,
    /// `cost × (orders − returns)`
    Revenue,
    /// `orders − returns`
    Buyouts,
}

impl Metric {
    /// Every metric, in catalogue order.
    pub const ALL: [Metric; 5] = [
        Metric::Cost,
        Metric::Orders,
        Metric::Returns,
        Metric::Revenue,
        Metric::Buyouts,
    ];

    /// The wire tag of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Orders => "orders",
            Self::Returns => "returns",
            Self::Revenue => "revenue",
            Self::Buyouts => "buyouts",
        }
    }

    /// A human-readable label for column headers and selectors.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::Orders => "Orders",
            Self::Returns => "Returns",
            Self::Revenue => "Revenue",
            Self::Buyouts => "Buyouts",
        }
    }

    /// Whether a parent's value is the plain sum of its children's values.
    ///
    /// Cost is a price: summing the prices of two articles means nothing, so it
    /// rolls up as a weighted mean instead and reports no `sum`.
    pub fn is_additive(&self) -> bool {
        !matches!(self, Self::Cost)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The requested metric tag is not one of [`Metric::ALL`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid metric {0:?}, expected one of cost, orders, returns, revenue, buyouts")]
pub struct InvalidMetric(pub String);

impl FromStr for Metric {
    type Err = InvalidMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| InvalidMetric(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>(), Ok(metric));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "profit".parse::<Metric>(),
            Err(InvalidMetric("profit".to_owned()))
        );
        // tags are case sensitive on the wire
        assert!("Cost".parse::<Metric>().is_err());
    }

    #[test]
    fn test_only_cost_is_non_additive() {
        let non_additive: Vec<_> = Metric::ALL
            .into_iter()
            .filter(|metric| !metric.is_additive())
            .collect();
        assert_eq!(non_additive, vec![Metric::Cost]);
    }

    #[test]
    fn test_serde_tag() {
        assert_eq!(
            serde_json::to_value(Metric::Buyouts).unwrap(),
            serde_json::json!("buyouts")
        );
        assert!(serde_json::from_str::<Metric>(r#""refunds""#).is_err());
    }
}
