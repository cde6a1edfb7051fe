// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File-system concerns shared by the use cases:
//
//   partition_store.rs — JSONL partitions, tokenized partitions
//                        and the JSON config of a prepare run
//
//   tokenizer_store.rs — word-level tokenizer built from the
//                        training partition, saved and reloaded
//                        as tokenizer.json
//
//   schedule_log.rs    — per-step learning rates as CSV
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Partition and config persistence
pub mod partition_store;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Learning-rate CSV logger
pub mod schedule_log;
