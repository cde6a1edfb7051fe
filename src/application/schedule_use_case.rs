// ============================================================
// Layer 2 — ScheduleUseCase
// ============================================================
// Builds a scheduler by name and steps it through a whole
// training run, writing the rate of every step to CSV. A run of
// `total` optimiser steps uses the rates of steps 0..total.
//
// steps_per_epoch comes from the config when given; otherwise
// it is derived from a prepared training partition and the
// batch size, the same number a sequential loader would yield.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{batcher::DEFAULT_BATCH_SIZE, dataloader::steps_per_epoch};
use crate::infra::{
    partition_store::PartitionStore,
    schedule_log::{LrPoint, ScheduleLogger},
};
use crate::ml::scheduler::{init_schedule, total_steps};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub sched:           String,
    pub lr:              f64,
    pub epochs:          usize,
    pub emb_dim:         usize,
    pub steps_per_epoch: Option<usize>,
    pub batch_size:      usize,
    /// Holds train.jsonl when steps_per_epoch is not given; receives schedule.csv
    pub output_dir:      String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sched:           "constant".to_string(),
            lr:              1e-4,
            epochs:          10,
            emb_dim:         512,
            steps_per_epoch: None,
            batch_size:      DEFAULT_BATCH_SIZE,
            output_dir:      "prepared".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleReport {
    pub csv_path:    PathBuf,
    pub total_steps: usize,
    pub first_lr:    f64,
    pub peak_lr:     f64,
    pub last_lr:     f64,
}

pub struct ScheduleUseCase {
    config: ScheduleConfig,
}

impl ScheduleUseCase {
    pub fn new(config: ScheduleConfig) -> Self {
        Self { config }
    }

    fn resolve_steps_per_epoch(&self) -> Result<usize> {
        let cfg = &self.config;
        if let Some(steps) = cfg.steps_per_epoch {
            return Ok(steps);
        }

        let store = PartitionStore::new(&cfg.output_dir)?;
        let train = store
            .load_partition("train")
            .context("Pass --steps-per-epoch or point --output-dir at a prepared corpus")?;
        let steps = steps_per_epoch(train.sample_count(), cfg.batch_size);

        tracing::info!(
            "Derived {} steps per epoch from {} training samples (batch_size={})",
            steps,
            train.sample_count(),
            cfg.batch_size
        );
        Ok(steps)
    }

    pub fn execute(&self) -> Result<ScheduleReport> {
        let cfg   = &self.config;
        let steps = self.resolve_steps_per_epoch()?;

        let mut scheduler = init_schedule(&cfg.sched, steps, cfg.lr, cfg.epochs, cfg.emb_dim)?;
        let total         = total_steps(steps, cfg.epochs)?;

        let mut logger = ScheduleLogger::new(&cfg.output_dir)?;
        let first_lr   = scheduler.lr();
        let mut peak   = first_lr;
        logger.log(LrPoint { step: 0, lr: first_lr })?;

        for _ in 1..total {
            let lr = scheduler.step()?;
            peak = peak.max(lr);
            logger.log(LrPoint { step: scheduler.current_step(), lr })?;
        }

        let report = ScheduleReport {
            csv_path:    logger.finish()?,
            total_steps: total,
            first_lr,
            peak_lr:     peak,
            last_lr:     scheduler.lr(),
        };

        tracing::info!(
            "'{}' over {} steps: first={:.3e} peak={:.3e} last={:.3e}",
            scheduler.kind(),
            total,
            report.first_lr,
            report.peak_lr,
            report.last_lr
        );
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{SummaryDataset, SummarySample};
    use crate::domain::summary_pair::SummaryPair;
    use crate::error::PrepError;

    #[test]
    fn test_onecycle_trace() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ScheduleConfig {
            sched:           "onecycle".to_string(),
            lr:              1.0,
            epochs:          2,
            steps_per_epoch: Some(5),
            output_dir:      dir.path().display().to_string(),
            ..ScheduleConfig::default()
        };

        let report = ScheduleUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.total_steps, 10);
        assert!((report.first_lr - 0.04).abs() < 1e-12);
        assert!((report.peak_lr - 1.0).abs() < 1e-12);
        // step 9 ends the anneal at initial_lr / final_div_factor
        assert!((report.last_lr - 0.04 / 1e4).abs() < 1e-12);

        let csv = std::fs::read_to_string(&report.csv_path).unwrap();
        // header + steps 0..10
        assert_eq!(csv.lines().count(), 11);
        assert!(csv.lines().last().unwrap().starts_with("9,"));

        for row in csv.lines().skip(1) {
            let lr: f64 = row.split(',').nth(1).unwrap().parse().unwrap();
            assert!(lr >= 0.0, "negative rate in row {row}");
        }
    }

    #[test]
    fn test_overflowing_step_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ScheduleConfig {
            epochs:          2,
            steps_per_epoch: Some(usize::MAX),
            output_dir:      dir.path().display().to_string(),
            ..ScheduleConfig::default()
        };

        let err = ScheduleUseCase::new(cfg).execute().unwrap_err();
        assert!(err.downcast_ref::<PrepError>().unwrap().is_config());
    }

    #[test]
    fn test_steps_derived_from_prepared_partition() {
        let dir   = tempfile::tempdir().unwrap();
        let store = PartitionStore::new(dir.path()).unwrap();
        let train = SummaryDataset::new(
            (0..10)
                .map(|i| SummarySample::from(SummaryPair::new(format!("doc {i}"), "s")))
                .collect(),
        );
        store.save_partition("train", &train).unwrap();

        let cfg = ScheduleConfig {
            sched:      "invsqrt".to_string(),
            epochs:     3,
            batch_size: 4,
            output_dir: dir.path().display().to_string(),
            ..ScheduleConfig::default()
        };
        let report = ScheduleUseCase::new(cfg).execute().unwrap();
        assert_eq!(report.total_steps, 9);
    }

    #[test]
    fn test_unknown_scheduler_surfaces_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ScheduleConfig {
            sched:           "bogus".to_string(),
            steps_per_epoch: Some(3),
            output_dir:      dir.path().display().to_string(),
            ..ScheduleConfig::default()
        };

        let err = ScheduleUseCase::new(cfg).execute().unwrap_err();
        let prep = err.downcast_ref::<PrepError>().unwrap();
        assert!(prep.is_config());
    }
}
