// ============================================================
// Layer 4 — Length Filter and Annotation
// ============================================================
// Drops pairs that are too short to be useful for summarisation
// and tags the survivors with their document length.
//
// A pair is kept only when all three hold (lengths in characters):
//   1. document longer than min_len
//   2. summary  longer than min_len
//   3. document longer than its summary
//
// Example with min_len = 3:
//   ("abcdef", "abcd")  → kept, doc_len = 6
//   ("abcdef", "abc")   → dropped (summary not > 3)
//   ("abcd",   "abcde") → dropped (document not > summary)

use crate::data::dataset::SummarySample;
use crate::domain::summary_pair::SummaryPair;

/// Default minimum length (exclusive) for documents and summaries
pub const DEFAULT_MIN_LEN: usize = 50;

pub struct Preprocessor {
    min_len: usize,
}

impl Preprocessor {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    pub fn min_len(&self) -> usize {
        self.min_len
    }

    /// True if the pair passes all three length checks
    pub fn keep(&self, pair: &SummaryPair) -> bool {
        let doc_len     = pair.document_len();
        let summary_len = pair.summary_len();

        doc_len > self.min_len && summary_len > self.min_len && doc_len > summary_len
    }

    /// Filter `pairs` and annotate each survivor with its document length.
    /// Source order is preserved.
    pub fn apply(&self, pairs: Vec<SummaryPair>) -> Vec<SummarySample> {
        let before = pairs.len();

        let samples: Vec<SummarySample> = pairs
            .into_iter()
            .filter(|p| self.keep(p))
            .map(SummarySample::from)
            .collect();

        tracing::debug!(
            "Length filter (min_len={}): kept {} of {} pairs",
            self.min_len,
            samples.len(),
            before
        );

        samples
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_LEN)
    }
}
