// ============================================================
// Layer 4 — Reddit TIFU Loader
// ============================================================
// Reads the Reddit TIFU JSON-lines dump: one post per line.
//
// A raw line carries many fields; only three matter here:
//
//   {"selftext_without_tldr": "...", "trimmed_title": "...",
//    "tldr": "..." | null, "ups": 12, "score": 12, ...}
//
// Rows exported from a dataset hub use `documents` / `title`
// instead, so both spellings are accepted. Everything else
// (ups, num_comments, upvote_ratio, score) is dropped.
//
// Variant mapping:
//   short → (document, title)   every post
//   long  → (document, tldr)    posts with a non-empty tldr

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::domain::{summary_pair::SummaryPair, traits::PostSource, variant::TifuVariant};

/// One raw post as it appears in the dump.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub documents: Option<String>,
    #[serde(default)]
    pub selftext_without_tldr: Option<String>,
    #[serde(default)]
    pub trimmed_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub tldr: Option<String>,
}

impl RawPost {
    pub fn document(&self) -> &str {
        self.documents
            .as_deref()
            .or(self.selftext_without_tldr.as_deref())
            .unwrap_or("")
    }

    pub fn title(&self) -> &str {
        self.trimmed_title
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("")
    }

    pub fn tldr(&self) -> &str {
        self.tldr.as_deref().unwrap_or("")
    }

    /// Project this post onto `variant`, or None if the variant skips it.
    pub fn to_pair(&self, variant: TifuVariant) -> Option<SummaryPair> {
        match variant {
            TifuVariant::Short => Some(SummaryPair::new(self.document(), self.title())),
            TifuVariant::Long if self.tldr().is_empty() => None,
            TifuVariant::Long => Some(SummaryPair::new(self.document(), self.tldr())),
        }
    }
}

/// Loads Reddit TIFU posts from a JSON-lines file.
pub struct RedditTifuLoader {
    path: PathBuf,
}

impl RedditTifuLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every non-blank line of the file.
    pub fn read_posts(&self) -> Result<Vec<RawPost>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open dataset file '{}'", self.path.display()))?;

        let mut posts = Vec::new();
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Cannot read '{}'", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            let post: RawPost = serde_json::from_str(&line).with_context(|| {
                format!("Malformed post at {}:{}", self.path.display(), idx + 1)
            })?;
            posts.push(post);
        }

        tracing::debug!("Read {} posts from '{}'", posts.len(), self.path.display());
        Ok(posts)
    }
}

/// Project already-parsed posts onto one variant.
fn variant_pairs(posts: &[RawPost], variant: TifuVariant) -> Vec<SummaryPair> {
    let pairs: Vec<SummaryPair> = posts.iter().filter_map(|p| p.to_pair(variant)).collect();
    tracing::info!("Loaded {} '{}' pairs", pairs.len(), variant);
    pairs
}

impl PostSource for RedditTifuLoader {
    fn load_variant(&self, variant: TifuVariant) -> Result<Vec<SummaryPair>> {
        Ok(variant_pairs(&self.read_posts()?, variant))
    }

    /// One pass over the file, projected onto every variant.
    fn load_all_variants(&self) -> Result<Vec<SummaryPair>> {
        let posts = self.read_posts()?;
        Ok(TifuVariant::ALL
            .into_iter()
            .flat_map(|variant| variant_pairs(&posts, variant))
            .collect())
    }
}
