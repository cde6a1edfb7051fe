use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::summary_pair::SummaryPair;

/// A document/summary pair annotated with its document length
/// in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySample {
    pub document: String,
    pub summary:  String,
    pub doc_len:  usize,
}

impl From<SummaryPair> for SummarySample {
    fn from(pair: SummaryPair) -> Self {
        let doc_len = pair.document_len();
        Self {
            document: pair.document,
            summary:  pair.summary,
            doc_len,
        }
    }
}

/// One partition (train, validation or test) of the corpus.
#[derive(Debug, Clone, Default)]
pub struct SummaryDataset {
    samples: Vec<SummarySample>,
}

impl SummaryDataset {
    pub fn new(samples: Vec<SummarySample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[SummarySample] { &self.samples }

    pub fn into_samples(self) -> Vec<SummarySample> { self.samples }

    /// Stable sort by document length, shortest first.
    pub fn sort_by_doc_len(mut self) -> Self {
        self.samples.sort_by_key(|s| s.doc_len);
        self
    }

    pub fn is_sorted_by_doc_len(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].doc_len <= w[1].doc_len)
    }
}

impl From<Vec<SummarySample>> for SummaryDataset {
    fn from(samples: Vec<SummarySample>) -> Self { Self::new(samples) }
}

impl Dataset<SummarySample> for SummaryDataset {
    fn get(&self, index: usize) -> Option<SummarySample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
