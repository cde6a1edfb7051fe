// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds a word-level tokenizer from the training partition, or
// reloads the one saved by an earlier run, so every partition is
// encoded with the same vocabulary.
//
// The tokenizer JSON is written by hand in the HuggingFace format
// and loaded back with Tokenizer::from_file. Words are counted
// through the same normalizer and pre-tokenizer the saved file
// declares, so every vocabulary entry is reachable when encoding.
//
// Special tokens:
//   [PAD] = 0   [UNK] = 1   [BOS] = 2   [EOS] = 3

use anyhow::{Context, Result};
use std::{collections::HashMap, path::PathBuf};
use tokenizers::{
    normalizers::bert::BertNormalizer, pre_tokenizers::whitespace::Whitespace, Normalizer,
    OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer,
};

pub const PAD_ID: u32 = 0;
pub const UNK_ID: u32 = 1;
pub const BOS_ID: u32 = 2;
pub const EOS_ID: u32 = 3;

const SPECIAL_TOKENS: [(&str, u32); 4] = [
    ("[PAD]", PAD_ID),
    ("[UNK]", UNK_ID),
    ("[BOS]", BOS_ID),
    ("[EOS]", EOS_ID),
];

const TOKENIZER_FILE: &str = "tokenizer.json";

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    /// Load existing tokenizer or build a new one from texts
    pub fn load_or_build<S: AsRef<str>>(&self, texts: &[S], vocab_size: usize) -> Result<Tokenizer> {
        if self.path().exists() {
            tracing::info!("Loading existing tokenizer from '{}'", self.path().display());
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    /// Load a previously saved tokenizer from JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e))
    }

    fn build_and_save<S: AsRef<str>>(&self, texts: &[S], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        // lowercase, strip accents, split CJK characters
        let normalizer    = BertNormalizer::new(true, true, None, true);
        let pre_tokenizer = Whitespace::default();

        // ── Step 1: word frequencies ──────────────────────────────────────────
        let freq = word_counts(texts, &normalizer, &pre_tokenizer)?;

        // Most frequent first; ties broken alphabetically so the ids are stable
        let mut words: Vec<(String, usize)> = freq.into_iter().collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        words.truncate(vocab_size.saturating_sub(SPECIAL_TOKENS.len()));

        // ── Step 2: vocab ─────────────────────────────────────────────────────
        let mut vocab = serde_json::Map::new();
        for (token, id) in SPECIAL_TOKENS {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }
        let mut next_id = SPECIAL_TOKENS.len();
        for (word, _) in &words {
            if !vocab.contains_key(word) {
                vocab.insert(word.clone(), serde_json::json!(next_id));
                next_id += 1;
            }
        }

        // ── Step 3: tokenizer JSON ────────────────────────────────────────────
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .map(|(content, id)| {
                serde_json::json!({
                    "id": id, "content": content, "single_word": false, "lstrip": false,
                    "rstrip": false, "normalized": false, "special": true
                })
            })
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": serde_json::to_value(&normalizer)?,
            "pre_tokenizer": serde_json::to_value(&pre_tokenizer)?,
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.path();
        std::fs::write(&tok_path, serde_json::to_string_pretty(&tokenizer_json)?)
            .with_context(|| format!("Cannot write tokenizer JSON to '{}'", tok_path.display()))?;

        tracing::info!("Tokenizer built with {} tokens, saved to '{}'", next_id, tok_path.display());

        self.load()
    }
}

/// Word frequencies of `texts` as the encoder will see them.
fn word_counts<S: AsRef<str>>(
    texts:         &[S],
    normalizer:    &BertNormalizer,
    pre_tokenizer: &Whitespace,
) -> Result<HashMap<String, usize>> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        let mut pretok = PreTokenizedString::from(text.as_ref());
        pretok
            .normalize(|s| normalizer.normalize(s))
            .map_err(|e| anyhow::anyhow!("Normalisation error: {e}"))?;
        pre_tokenizer
            .pre_tokenize(&mut pretok)
            .map_err(|e| anyhow::anyhow!("Pre-tokenisation error: {e}"))?;

        for (word, _, _) in pretok.get_splits(OffsetReferential::Original, OffsetType::Byte) {
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }
    Ok(freq)
}

/// Encode `text` into token ids widened to i64 for Int tensors.
pub fn encode_ids(tokenizer: &Tokenizer, text: &str) -> Result<Vec<i64>> {
    let enc = tokenizer
        .encode(text, false)
        .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
    Ok(enc.get_ids().iter().map(|&id| i64::from(id)).collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn counts(texts: &[&str]) -> HashMap<String, usize> {
        word_counts(texts, &BertNormalizer::new(true, true, None, true), &Whitespace::default()).unwrap()
    }

    #[test]
    fn test_word_counts_split_words_and_punctuation() {
        let freq = counts(&["So I, uh... fell", "   "]);
        let expected: HashMap<String, usize> = ["so", "i", ",", "uh", "...", "fell"]
            .into_iter()
            .map(|w| (w.to_string(), 1))
            .collect();
        assert_eq!(freq, expected);
    }

    #[test]
    fn test_word_counts_strip_accents() {
        let freq = counts(&["Café CAFE cafe"]);
        assert_eq!(freq.get("cafe"), Some(&3));
        assert_eq!(freq.len(), 1);
    }

    #[test]
    fn test_accented_words_encode_to_their_own_id() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["café café café dog"], 100).unwrap();

        assert_eq!(encode_ids(&tok, "café dog").unwrap(), vec![4, 5]);
        assert_eq!(encode_ids(&tok, "CAFE").unwrap(), vec![4]);
    }

    #[test]
    fn test_cjk_characters_are_separate_words() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["東京 東京"], 100).unwrap();

        // 京 (U+4EAC) sorts before 東 (U+6771) on the frequency tie
        assert_eq!(encode_ids(&tok, "東京").unwrap(), vec![5, 4]);
    }

    #[test]
    fn test_vocab_ordered_by_frequency() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["b a a", "a c"], 100).unwrap();

        // a=4 (3 uses), then b=5, c=6 alphabetically; unknown words map to [UNK]
        assert_eq!(encode_ids(&tok, "A c zzz").unwrap(), vec![4, 6, i64::from(UNK_ID)]);
    }

    #[test]
    fn test_vocab_size_caps_word_count() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        let tok   = store.load_or_build(&["x x y"], 5).unwrap();

        assert_eq!(encode_ids(&tok, "x y").unwrap(), vec![4, i64::from(UNK_ID)]);
    }

    #[test]
    fn test_second_call_reloads_saved_tokenizer() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path());
        store.load_or_build(&["alpha beta"], 50).unwrap();

        // a different corpus must not change the saved vocabulary
        let tok = store.load_or_build(&["gamma"], 50).unwrap();
        assert_eq!(encode_ids(&tok, "gamma").unwrap(), vec![i64::from(UNK_ID)]);
        assert!(store.path().exists());
    }
}
