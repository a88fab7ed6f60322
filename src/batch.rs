//! Batch planning

use crate::types::{Batch, Record};

/// Split records into contiguous batches of `batch_size`
///
/// A size of 0 means "send everything at once": one batch holding every
/// record, even when there are none. Order is preserved.
pub fn batch_data(records: &[Record], batch_size: usize) -> Vec<Batch> {
    if batch_size == 0 {
        return vec![records.to_vec()];
    }

    records
        .chunks(batch_size)
        .map(<[Record]>::to_vec)
        .collect()
}
