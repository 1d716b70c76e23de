//! Slider range scaling and map-point filtering.

use super::error::{PipelineError, PipelineResult};
use crate::models::{AbsoluteRange, Collection, Item, NormalizedRange};

/// Scale a slider range by the largest `log_views` in `collection`.
///
/// # Errors
/// `InvalidState` when the collection is empty and no maximum exists.
pub fn normalized_to_absolute(
    range: NormalizedRange,
    collection: &Collection,
) -> PipelineResult<AbsoluteRange> {
    let max = collection
        .max_log_views()
        .ok_or_else(|| PipelineError::empty_collection("normalized_to_absolute"))?;
    Ok(range.scale(max))
}

/// Items with `low <= log_views <= high`, in collection order.
///
/// Both ends are inclusive, so zero-view items show up whenever `low <= 0`.
pub fn select(collection: &Collection, range: AbsoluteRange) -> Vec<&Item> {
    collection
        .iter()
        .filter(|item| range.contains(item.log_views()))
        .collect()
}
