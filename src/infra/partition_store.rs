// ============================================================
// Layer 6 — Partition Store
// ============================================================
// Persists prepared partitions and the settings that produced
// them.
//
// File layout:
//   <output_dir>/
//     train.jsonl            ← one SummarySample per line, sorted
//     val.jsonl
//     test.jsonl
//     train.tokens.jsonl     ← one TokenizedSample per line
//     ...
//     prepare_config.json    ← PrepareConfig used for this run

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs::{self, File},
    io::{BufRead, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::data::{batcher::TokenizedSample, dataset::SummaryDataset};

pub struct PartitionStore {
    dir: PathBuf,
}

impl PartitionStore {
    /// Create the store, creating its directory like `mkdir -p`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn partition_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.jsonl"))
    }

    pub fn tokens_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.tokens.jsonl"))
    }

    pub fn save_partition(&self, name: &str, dataset: &SummaryDataset) -> Result<PathBuf> {
        let path = self.partition_path(name);
        write_jsonl(&path, dataset.samples())?;
        tracing::debug!("Saved {} samples to '{}'", dataset.sample_count(), path.display());
        Ok(path)
    }

    pub fn load_partition(&self, name: &str) -> Result<SummaryDataset> {
        let path = self.partition_path(name);
        Ok(SummaryDataset::new(read_jsonl(&path).with_context(|| {
            format!("Cannot load partition '{name}'. Have you run 'prepare' first?")
        })?))
    }

    pub fn save_tokenized(&self, name: &str, samples: &[TokenizedSample]) -> Result<PathBuf> {
        let path = self.tokens_path(name);
        write_jsonl(&path, samples)?;
        tracing::debug!("Saved {} tokenized samples to '{}'", samples.len(), path.display());
        Ok(path)
    }

    pub fn load_tokenized(&self, name: &str) -> Result<Vec<TokenizedSample>> {
        read_jsonl(&self.tokens_path(name))
    }

    /// Write any serialisable config as pretty JSON.
    pub fn save_config<C: Serialize>(&self, file_name: &str, cfg: &C) -> Result<()> {
        let path = self.dir.join(file_name);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config<C: DeserializeOwned>(&self, file_name: &str) -> Result<C> {
        let path = self.dir.join(file_name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config in '{}'", path.display()))
    }
}

fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;
    let mut out = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut out, item)?;
        out.write_all(b"\n")?;
    }
    out.flush()
        .with_context(|| format!("Cannot write '{}'", path.display()))
}

fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)
        .with_context(|| format!("Cannot open '{}'", path.display()))?;

    let mut items = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        items.push(
            serde_json::from_str(&line)
                .with_context(|| format!("Malformed record at {}:{}", path.display(), idx + 1))?,
        );
    }
    Ok(items)
}
