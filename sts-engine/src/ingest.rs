use sts_core::models::{ProductRecord, RawProductRecord};
use tracing::{Level, event};

/// Validate raw feed rows, logging and skipping the malformed ones.
///
/// One bad row never fails the batch; the survivors keep their feed order.
pub fn ingest(rows: impl IntoIterator<Item = RawProductRecord>) -> Vec<ProductRecord> {
    let mut skipped = 0usize;
    let products: Vec<ProductRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(row, raw)| match ProductRecord::try_from(raw) {
            Ok(product) => Some(product),
            Err(err) => {
                skipped += 1;
                event!(Level::WARN, row, err = err.to_string(), "skipping product");
                None
            }
        })
        .collect();

    if skipped > 0 {
        event!(
            Level::WARN,
            skipped,
            kept = products.len(),
            "malformed products were skipped"
        );
    }
    products
}
