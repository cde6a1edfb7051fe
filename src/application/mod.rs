// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data, ml and infra layers for each CLI
// command. No formulas or file formats live here.

/// Load, filter, split, sort, tokenize and save the corpus
pub mod prepare_use_case;

/// Trace a learning-rate schedule to CSV
pub mod schedule_use_case;
