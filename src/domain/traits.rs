// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data pipeline only sees these traits, so a JSONL dump,
// an in-memory fixture or any other corpus backend can feed
// the same split/sort logic.

use anyhow::Result;

use crate::domain::{summary_pair::SummaryPair, variant::TifuVariant};

// ─── PostSource ───────────────────────────────────────────────────────────────
/// Anything that can produce the document/summary pairs of one
/// corpus variant.
///
/// Implementations:
///   - RedditTifuLoader → reads the JSON-lines dump from disk
///   - Vec<(TifuVariant, SummaryPair)> → in-memory fixtures
pub trait PostSource {
    /// Load every pair belonging to `variant`, in source order.
    fn load_variant(&self, variant: TifuVariant) -> Result<Vec<SummaryPair>>;

    /// Pairs of every variant, concatenated in `TifuVariant::ALL` order.
    /// Sources that parse a file should override this to read it once.
    fn load_all_variants(&self) -> Result<Vec<SummaryPair>> {
        let mut pairs = Vec::new();
        for variant in TifuVariant::ALL {
            pairs.extend(self.load_variant(variant)?);
        }
        Ok(pairs)
    }
}

/// In-memory source: each pair is tagged with the variant it belongs to.
impl PostSource for Vec<(TifuVariant, SummaryPair)> {
    fn load_variant(&self, variant: TifuVariant) -> Result<Vec<SummaryPair>> {
        Ok(self
            .iter()
            .filter(|(v, _)| *v == variant)
            .map(|(_, p)| p.clone())
            .collect())
    }
}
