mod datetime;
pub use datetime::{is_same_utc_day, parse_timestamp};

mod level;
pub use level::Level;

mod map;
pub use map::Map;

mod metric;
pub use metric::{InvalidMetric, Metric};

mod node;
pub use node::{AggregationNode, NodeMap};

mod node_id;
pub use node_id::NodeId;

mod page;
pub use page::{GridRow, TreePage, TreePageQuery};

mod product;
pub use product::{MalformedRecord, ProductRecord, RawProductRecord};

mod series;
pub use series::{DAYS, Series};
