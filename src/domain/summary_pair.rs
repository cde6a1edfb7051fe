// ============================================================
// Layer 3 — SummaryPair Domain Type
// ============================================================
// One document/summary pair from the corpus. The summary is
// either the post title (short variant) or the author's TL;DR
// (long variant).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPair {
    /// Post body with the TL;DR removed
    pub document: String,

    /// Reference summary
    pub summary: String,
}

impl SummaryPair {
    pub fn new(document: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            summary:  summary.into(),
        }
    }

    /// Document length in characters (Unicode scalar values)
    pub fn document_len(&self) -> usize {
        self.document.chars().count()
    }

    /// Summary length in characters (Unicode scalar values)
    pub fn summary_len(&self) -> usize {
        self.summary.chars().count()
    }
}
