// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw Reddit TIFU dump to padded tensor
// batches:
//
//   JSON-lines dump
//       │
//       ▼
//   RedditTifuLoader  → short + long document/summary pairs
//       │
//       ▼
//   Preprocessor      → length filter, doc_len annotation
//       │
//       ▼
//   split_data        → shuffle, train / val / test
//       │
//       ▼
//   SummaryDataset    → sorted by doc_len, burn Dataset
//       │
//       ▼
//   batch_by_instances / SequenceBatcher + DataLoader
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the Reddit TIFU JSON-lines dump
pub mod loader;

/// Length filtering and doc_len annotation
pub mod preprocessor;

/// burn Dataset over annotated samples
pub mod dataset;

/// Shuffles and splits samples into train/validation/test
pub mod splitter;

/// load_reddit: the full source → partitions pipeline
pub mod reddit;

/// Fixed-size batching with per-batch padding
pub mod batcher;

/// Sequential burn DataLoader construction
pub mod dataloader;
