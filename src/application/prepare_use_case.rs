// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Runs the full preparation pipeline in order:
//
//   Step 1: Read the Reddit TIFU dump       (Layer 4 - data)
//   Step 2: Filter, split and sort          (Layer 4 - data)
//   Step 3: Save partitions + config        (Layer 6 - infra)
//   Step 4: Build / load tokenizer          (Layer 6 - infra)
//   Step 5: Tokenize and save partitions    (Layer 6 - infra)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::{TokenizedSample, DEFAULT_BATCH_SIZE},
    dataloader::steps_per_epoch,
    dataset::SummaryDataset,
    loader::RedditTifuLoader,
    preprocessor::DEFAULT_MIN_LEN,
    reddit::{load_reddit, SplitConfig},
};
use crate::infra::{
    partition_store::PartitionStore,
    tokenizer_store::{encode_ids, TokenizerStore, BOS_ID, EOS_ID},
};

pub const CONFIG_FILE: &str = "prepare_config.json";

// ─── Preparation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepareConfig {
    pub data_file:   String,
    pub output_dir:  String,
    pub train_split: f64,
    pub val_split:   f64,
    pub min_len:     usize,
    pub seed:        Option<u64>,
    pub vocab_size:  usize,
    pub batch_size:  usize,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            data_file:   "data/tifu_all_tokenized_and_filtered.json".to_string(),
            output_dir:  "prepared".to_string(),
            train_split: 0.8,
            val_split:   0.1,
            min_len:     DEFAULT_MIN_LEN,
            seed:        None,
            vocab_size:  30000,
            batch_size:  DEFAULT_BATCH_SIZE,
        }
    }
}

impl PrepareConfig {
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig::new(self.train_split, self.val_split)
            .with_min_len(self.min_len)
            .with_seed(self.seed)
    }
}

/// Sizes of what a run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrepareReport {
    pub train: usize,
    pub val:   usize,
    pub test:  usize,
    /// Batches per epoch over the training partition
    pub train_steps: usize,
}

pub struct PrepareUseCase {
    config: PrepareConfig,
}

impl PrepareUseCase {
    pub fn new(config: PrepareConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<PrepareReport> {
        let cfg = &self.config;

        // ── Steps 1-2: load, filter, split, sort ──────────────────────────────
        tracing::info!("Reading Reddit TIFU posts from '{}'", cfg.data_file);
        let loader = RedditTifuLoader::new(&cfg.data_file);
        let splits = load_reddit(&loader, &cfg.split_config())?;

        // ── Step 3: persist partitions and the settings used ──────────────────
        let store = PartitionStore::new(&cfg.output_dir)?;
        for (name, part) in splits.named() {
            store.save_partition(name, part)?;
        }
        store.save_config(CONFIG_FILE, cfg)?;

        // ── Step 4: tokenizer from the training partition only ────────────────
        let corpus: Vec<&str> = splits
            .train
            .samples()
            .iter()
            .flat_map(|s| [s.document.as_str(), s.summary.as_str()])
            .collect();
        let tokenizer = TokenizerStore::new(&cfg.output_dir).load_or_build(corpus.as_slice(), cfg.vocab_size)?;

        // ── Step 5: tokenize every partition ──────────────────────────────────
        for (name, part) in splits.named() {
            let tokenized = tokenize_partition(&tokenizer, part)?;
            store.save_tokenized(name, &tokenized)?;
            tracing::info!(
                "{}: {} samples, {} batches of {}",
                name,
                tokenized.len(),
                steps_per_epoch(tokenized.len(), cfg.batch_size),
                cfg.batch_size
            );
        }

        Ok(PrepareReport {
            train:       splits.train.sample_count(),
            val:         splits.val.sample_count(),
            test:        splits.test.sample_count(),
            train_steps: steps_per_epoch(splits.train.sample_count(), cfg.batch_size),
        })
    }
}

/// Document ids as inputs; summary ids wrapped in [BOS] … [EOS] as targets.
fn tokenize_partition(
    tokenizer: &tokenizers::Tokenizer,
    part:      &SummaryDataset,
) -> Result<Vec<TokenizedSample>> {
    part.samples()
        .iter()
        .map(|s| -> Result<TokenizedSample> {
            let input_ids = encode_ids(tokenizer, &s.document)?;

            let mut target_ids = vec![i64::from(BOS_ID)];
            target_ids.extend(encode_ids(tokenizer, &s.summary)?);
            target_ids.push(i64::from(EOS_ID));

            Ok(TokenizedSample { input_ids, target_ids })
        })
        .collect()
}
