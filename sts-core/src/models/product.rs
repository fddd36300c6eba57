use super::{NodeId, parse_timestamp};
use thiserror::Error;
use time::OffsetDateTime;

/// A product row exactly as the feed delivers it.
///
/// Every field is optional so a single bad row can be rejected on its own
/// (see [`MalformedRecord`]) instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RawProductRecord {
    /// The supplier name
    #[cfg_attr(feature = "serde", serde(default))]
    pub supplier: Option<String>,
    /// The brand name
    #[cfg_attr(feature = "serde", serde(default))]
    pub brand: Option<String>,
    /// The product type
    #[cfg_attr(feature = "serde", serde(default, rename = "type"))]
    pub r#type: Option<String>,
    /// The article code
    #[cfg_attr(feature = "serde", serde(default))]
    pub article: Option<String>,
    /// ISO-8601 timestamp of the day index 0 of the series refers to
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_update: Option<String>,
    /// Unit price per day, most recent first
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: Vec<Option<f64>>,
    /// Units ordered per day, most recent first
    #[cfg_attr(feature = "serde", serde(default))]
    pub orders: Vec<Option<f64>>,
    /// Units returned per day, most recent first
    #[cfg_attr(feature = "serde", serde(default))]
    pub returns: Vec<Option<f64>>,
}

/// The reasons a raw row cannot take part in an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedRecord {
    /// An identifying field or the anchor date is absent
    #[error("missing field {0}")]
    MissingField(&'static str),
    /// An identifying field contains the node id separator
    #[error("field {field} contains ':' ({value:?})")]
    Separator {
        /// The offending field
        field: &'static str,
        /// Its value
        value: String,
    },
    /// The anchor date is not an ISO-8601 timestamp
    #[error("unparseable lastUpdate {0:?}")]
    InvalidTimestamp(String),
}

/// A validated product: its position in the hierarchy, the anchor date and
/// the three raw daily series.
///
/// Index 0 of each series is the day of `last_update`, index `i` is
/// `last_update - i` days. The series may be shorter than the aggregation
/// window; missing entries are simply absent days.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawProductRecord", into = "RawProductRecord")
)]
pub struct ProductRecord {
    /// The supplier name (trimmed)
    pub supplier: String,
    /// The brand name (trimmed)
    pub brand: String,
    /// The product type (trimmed)
    pub r#type: String,
    /// The article code (trimmed)
    pub article: String,
    /// The day index 0 of the series refers to
    pub last_update: OffsetDateTime,
    /// Unit price per day
    pub cost: Vec<Option<f64>>,
    /// Units ordered per day
    pub orders: Vec<Option<f64>>,
    /// Units returned per day
    pub returns: Vec<Option<f64>>,
}

impl ProductRecord {
    /// The path segments of the product, root first.
    pub fn path(&self) -> [&str; 4] {
        [&self.supplier, &self.brand, &self.r#type, &self.article]
    }

    /// The id of the article node for this product.
    pub fn node_id(&self) -> NodeId {
        NodeId::from_segments(&self.path())
    }
}

fn segment(value: Option<String>, field: &'static str) -> Result<String, MalformedRecord> {
    // the feed pads some codes with whitespace
    let value = value.ok_or(MalformedRecord::MissingField(field))?;
    let value = value.trim();
    if value.contains(':') {
        return Err(MalformedRecord::Separator {
            field,
            value: value.to_owned(),
        });
    }
    Ok(value.to_owned())
}

impl TryFrom<RawProductRecord> for ProductRecord {
    type Error = MalformedRecord;

    fn try_from(value: RawProductRecord) -> Result<Self, Self::Error> {
        let supplier = segment(value.supplier, "supplier")?;
        let brand = segment(value.brand, "brand")?;
        let r#type = segment(value.r#type, "type")?;
        let article = segment(value.article, "article")?;

        let last_update = value
            .last_update
            .ok_or(MalformedRecord::MissingField("lastUpdate"))?;
        let last_update = parse_timestamp(&last_update)
            .map_err(|_| MalformedRecord::InvalidTimestamp(last_update))?;

        Ok(Self {
            supplier,
            brand,
            r#type,
            article,
            last_update,
            cost: value.cost,
            orders: value.orders,
            returns: value.returns,
        })
    }
}

impl From<ProductRecord> for RawProductRecord {
    fn from(value: ProductRecord) -> Self {
        let last_update = value
            .last_update
            .format(&time::format_description::well_known::Rfc3339)
            .ok();
        Self {
            supplier: Some(value.supplier),
            brand: Some(value.brand),
            r#type: Some(value.r#type),
            article: Some(value.article),
            last_update,
            cost: value.cost,
            orders: value.orders,
            returns: value.returns,
        }
    }
}
