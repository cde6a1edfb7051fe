// ============================================================
// Layer 4 — Sequential Data Loader
// ============================================================
// Walks a dataset front to back in fixed-size batches and keeps
// the final partial batch. No shuffling: the partitions are
// already sorted by document length, so neighbouring items have
// similar lengths and padding stays small.

use std::sync::Arc;

use burn::{
    data::{
        dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
        dataset::Dataset,
    },
    prelude::*,
};

use crate::error::{PrepError, Result};

/// Build a sequential DataLoader over `dataset`.
pub fn create_data_loader<B, I, O, D, Bt>(
    dataset:    D,
    batch_size: usize,
    batcher:    Bt,
    device:     &B::Device,
) -> Result<Arc<dyn DataLoader<B, O>>>
where
    B:  Backend,
    I:  Send + Sync + Clone + std::fmt::Debug + 'static,
    O:  Send + Sync + Clone + std::fmt::Debug + 'static,
    D:  Dataset<I> + 'static,
    Bt: Batcher<B, I, O> + 'static,
{
    if batch_size == 0 {
        return Err(PrepError::Config("batch_size must be at least 1".to_string()));
    }

    Ok(DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .set_device(device.clone())
        .build(dataset))
}

/// Number of batches a sequential loader yields for `len` items.
pub fn steps_per_epoch(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    len.div_ceil(batch_size)
}
