// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs and traits describing the corpus:
// no burn types, no file I/O.

/// A document paired with its reference summary
pub mod summary_pair;

/// The two Reddit TIFU corpus configurations
pub mod variant;

/// Abstractions implemented by the data layer
pub mod traits;
