// ============================================================
// Layer 4 — Instance Batching
// ============================================================
// Groups token sequences into fixed-size batches and pads every
// sequence to the longest one in its own batch:
//
//   sequences = [[1,2],[3],[4,5,6]], batch_size = 2, pad = 0
//
//   batch 0:  [[1,2],          labels [l0, l1]
//              [3,0]]
//   batch 1:  [[4,5,6]]        labels [l2]
//
// Padding is local to each batch, so the tensor widths differ
// from batch to batch. The last batch keeps the remainder.
//
// Two entry points:
//   - batch_by_instances: whole list → Vec of tensors up front
//   - SequenceBatcher:    burn Batcher used by a DataLoader

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};
use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_PAD_TOKEN:  i64   = 0;

/// Pad `batch` to its longest sequence.
/// Returns the row-major flattened values and the padded width.
pub fn pad_batch(batch: &[Vec<i64>], pad_token: i64) -> (Vec<i64>, usize) {
    let max_len = batch.iter().map(Vec::len).max().unwrap_or(0);

    let mut flat = Vec::with_capacity(batch.len() * max_len);
    for seq in batch {
        flat.extend_from_slice(seq);
        flat.extend(std::iter::repeat(pad_token).take(max_len - seq.len()));
    }

    (flat, max_len)
}

/// Pad `batch` and stack it into a `[rows, max_len]` Int tensor.
pub fn padded_tensor<B: Backend>(
    batch:     &[Vec<i64>],
    pad_token: i64,
    device:    &B::Device,
) -> Tensor<B, 2, Int> {
    let (flat, max_len) = pad_batch(batch, pad_token);
    Tensor::<B, 2, Int>::from_data(TensorData::new(flat, [batch.len(), max_len]), device)
}

/// Create batches of `batch_size` instances and pad all instances
/// within a batch to the same length.
///
/// Returns the padded input batches and their label batches, one
/// pair per `ceil(sequences.len() / batch_size)`.
pub fn batch_by_instances<B: Backend>(
    device:     &B::Device,
    sequences:  &[Vec<i64>],
    labels:     &[i64],
    batch_size: usize,
    pad_token:  i64,
) -> Result<(Vec<Tensor<B, 2, Int>>, Vec<Tensor<B, 1, Int>>)> {
    if batch_size == 0 {
        return Err(PrepError::Config("batch_size must be at least 1".to_string()));
    }
    if sequences.len() != labels.len() {
        return Err(PrepError::LengthMismatch {
            sequences: sequences.len(),
            labels:    labels.len(),
        });
    }

    let mut batches_x = Vec::with_capacity(sequences.len().div_ceil(batch_size));
    let mut batches_y = Vec::with_capacity(batches_x.capacity());

    for (batch_x, batch_y) in sequences.chunks(batch_size).zip(labels.chunks(batch_size)) {
        batches_x.push(padded_tensor::<B>(batch_x, pad_token, device));
        batches_y.push(Tensor::<B, 1, Int>::from_data(
            TensorData::new(batch_y.to_vec(), [batch_y.len()]),
            device,
        ));
    }

    tracing::debug!(
        "Built {} batches from {} sequences (batch_size={})",
        batches_x.len(),
        sequences.len(),
        batch_size
    );

    Ok((batches_x, batches_y))
}

// ─── Seq2seq items for the DataLoader ─────────────────────────────────────────
/// One tokenised document with its tokenised summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedSample {
    pub input_ids:  Vec<i64>,
    pub target_ids: Vec<i64>,
}

/// Inputs and targets, each padded to its own maximum within the batch.
#[derive(Debug, Clone)]
pub struct SequenceBatch<B: Backend> {
    /// shape: [batch_size, max_input_len]
    pub inputs:  Tensor<B, 2, Int>,
    /// shape: [batch_size, max_target_len]
    pub targets: Tensor<B, 2, Int>,
}

#[derive(Debug, Clone, Copy)]
pub struct SequenceBatcher {
    pad_token: i64,
}

impl SequenceBatcher {
    pub fn new(pad_token: i64) -> Self {
        Self { pad_token }
    }
}

impl Default for SequenceBatcher {
    fn default() -> Self {
        Self::new(DEFAULT_PAD_TOKEN)
    }
}

impl<B: Backend> Batcher<B, TokenizedSample, SequenceBatch<B>> for SequenceBatcher {
    fn batch(&self, items: Vec<TokenizedSample>, device: &B::Device) -> SequenceBatch<B> {
        let (inputs, targets): (Vec<Vec<i64>>, Vec<Vec<i64>>) = items
            .into_iter()
            .map(|s| (s.input_ids, s.target_ids))
            .unzip();

        SequenceBatch {
            inputs:  padded_tensor::<B>(&inputs, self.pad_token, device),
            targets: padded_tensor::<B>(&targets, self.pad_token, device),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn values<const D: usize>(t: Tensor<TestBackend, D, Int>) -> Vec<i64> {
        t.into_data().convert::<i64>().to_vec::<i64>().unwrap()
    }

    #[test]
    fn test_pads_to_batch_maximum() {
        let device = Default::default();
        let (xs, ys) = batch_by_instances::<TestBackend>(
            &device,
            &[vec![1, 2], vec![3]],
            &[0, 1],
            2,
            0,
        )
        .unwrap();

        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].dims(), [2, 2]);
        assert_eq!(values(xs[0].clone()), vec![1, 2, 3, 0]);
        assert_eq!(values(ys[0].clone()), vec![0, 1]);
    }

    #[test]
    fn test_batch_count_is_ceiling() {
        let device    = Default::default();
        let sequences: Vec<Vec<i64>> = (0..7).map(|i| vec![i; (i as usize % 3) + 1]).collect();
        let labels:    Vec<i64>      = (0..7).collect();

        let (xs, ys) =
            batch_by_instances::<TestBackend>(&device, &sequences, &labels, 3, -1).unwrap();

        assert_eq!(xs.len(), 3);
        assert_eq!(ys.len(), 3);
        assert_eq!(ys[2].dims(), [1]);
        // padding is per batch: the final batch holds a single length-1 sequence
        assert_eq!(xs[2].dims(), [1, 1]);
    }

    #[test]
    fn test_custom_pad_token() {
        let device = Default::default();
        let (xs, _) = batch_by_instances::<TestBackend>(
            &device,
            &[vec![5], vec![6, 7, 8]],
            &[1, 2],
            DEFAULT_BATCH_SIZE,
            9,
        )
        .unwrap();

        assert_eq!(values(xs[0].clone()), vec![5, 9, 9, 6, 7, 8]);
    }

    #[test]
    fn test_empty_input_gives_no_batches() {
        let device = Default::default();
        let (xs, ys) = batch_by_instances::<TestBackend>(&device, &[], &[], 4, 0).unwrap();
        assert!(xs.is_empty() && ys.is_empty());
    }

    #[test]
    fn test_rejects_zero_batch_size_and_mismatch() {
        let device = Default::default();
        let err = batch_by_instances::<TestBackend>(&device, &[vec![1]], &[0], 0, 0).unwrap_err();
        assert!(err.is_config());

        let err = batch_by_instances::<TestBackend>(&device, &[vec![1]], &[0, 1], 2, 0).unwrap_err();
        assert_eq!(err, PrepError::LengthMismatch { sequences: 1, labels: 2 });
    }

    #[test]
    fn test_pad_batch_helper() {
        let (flat, width) = pad_batch(&[vec![1], vec![2, 3, 4], vec![]], 0);
        assert_eq!(width, 3);
        assert_eq!(flat, vec![1, 0, 0, 2, 3, 4, 0, 0, 0]);
    }

    #[test]
    fn test_sequence_batcher_pads_inputs_and_targets_separately() {
        let device  = Default::default();
        let batcher = SequenceBatcher::new(0);
        let batch: SequenceBatch<TestBackend> = batcher.batch(
            vec![
                TokenizedSample { input_ids: vec![1, 2, 3], target_ids: vec![7] },
                TokenizedSample { input_ids: vec![4],       target_ids: vec![8, 9] },
            ],
            &device,
        );

        assert_eq!(batch.inputs.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 2]);
        assert_eq!(values(batch.inputs), vec![1, 2, 3, 4, 0, 0]);
        assert_eq!(values(batch.targets), vec![7, 0, 8, 9]);
    }
}
