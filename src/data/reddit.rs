// ============================================================
// Layer 4 — Reddit TIFU Pipeline
// ============================================================
// Source → partitions, in order:
//
//   short pairs ─┐
//                ├─ concat → length filter → shuffle + split → sort by doc_len
//   long pairs  ─┘
//
// Each returned partition is sorted shortest document first.

use anyhow::Result;

use crate::data::{
    dataset::SummaryDataset,
    preprocessor::{Preprocessor, DEFAULT_MIN_LEN},
    splitter::split_data,
};
use crate::domain::traits::PostSource;

/// Parameters of one `load_reddit` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub train_split: f64,
    pub val_split:   f64,
    pub min_len:     usize,
    pub seed:        Option<u64>,
}

impl SplitConfig {
    pub fn new(train_split: f64, val_split: f64) -> Self {
        Self {
            train_split,
            val_split,
            min_len: DEFAULT_MIN_LEN,
            seed:    None,
        }
    }

    pub fn with_min_len(mut self, min_len: usize) -> Self {
        self.min_len = min_len;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// The three sorted partitions produced by `load_reddit`.
#[derive(Debug, Clone, Default)]
pub struct RedditSplits {
    pub train: SummaryDataset,
    pub val:   SummaryDataset,
    pub test:  SummaryDataset,
}

impl RedditSplits {
    pub fn total(&self) -> usize {
        self.train.sample_count() + self.val.sample_count() + self.test.sample_count()
    }

    /// Partitions paired with their file-friendly names
    pub fn named(&self) -> [(&'static str, &SummaryDataset); 3] {
        [("train", &self.train), ("val", &self.val), ("test", &self.test)]
    }
}

/// Concatenate both corpus variants, keep only the docs and their
/// summaries, filter by length, split and sort each partition.
pub fn load_reddit<S: PostSource + ?Sized>(source: &S, cfg: &SplitConfig) -> Result<RedditSplits> {
    let pairs = source.load_all_variants()?;
    tracing::info!("Concatenated {} pairs from both variants", pairs.len());

    let samples = Preprocessor::new(cfg.min_len).apply(pairs);
    tracing::info!("{} pairs left after length filtering", samples.len());

    let (train, val, test) = split_data(samples, cfg.train_split, cfg.val_split, cfg.seed)?;

    let splits = RedditSplits {
        train: SummaryDataset::new(train).sort_by_doc_len(),
        val:   SummaryDataset::new(val).sort_by_doc_len(),
        test:  SummaryDataset::new(test).sort_by_doc_len(),
    };

    tracing::info!(
        "Split: {} train, {} validation, {} test",
        splits.train.sample_count(),
        splits.val.sample_count(),
        splits.test.sample_count()
    );

    Ok(splits)
}
