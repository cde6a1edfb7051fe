// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Two subcommands: `prepare` and `schedule`.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::{
    prepare_use_case::PrepareConfig,
    schedule_use_case::ScheduleConfig,
};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter, split, sort and tokenize the Reddit TIFU corpus
    Prepare(PrepareArgs),

    /// Trace a learning-rate schedule to CSV
    Schedule(ScheduleArgs),
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Reddit TIFU JSON-lines dump
    #[arg(long, default_value = "data/tifu_all_tokenized_and_filtered.json")]
    pub data_file: String,

    /// Directory for partitions, tokenizer and config
    #[arg(long, default_value = "prepared")]
    pub output_dir: String,

    /// Fraction of pairs used for training
    #[arg(long, default_value_t = 0.8)]
    pub train_split: f64,

    /// Fraction of pairs used for validation; the rest is test
    #[arg(long, default_value_t = 0.1)]
    pub val_split: f64,

    /// Documents and summaries must be longer than this (characters)
    #[arg(long, default_value_t = 50)]
    pub min_len: usize,

    /// Seed for the shuffle; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 30000)]
    pub vocab_size: usize,

    /// Instances per batch, used to report batches per epoch
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,
}

impl From<PrepareArgs> for PrepareConfig {
    fn from(a: PrepareArgs) -> Self {
        PrepareConfig {
            data_file:   a.data_file,
            output_dir:  a.output_dir,
            train_split: a.train_split,
            val_split:   a.val_split,
            min_len:     a.min_len,
            seed:        a.seed,
            vocab_size:  a.vocab_size,
            batch_size:  a.batch_size,
        }
    }
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// constant | none | cosineannealing | invsqrt | linear | onecycle | noam
    #[arg(long, default_value = "constant")]
    pub sched: String,

    /// Base (and peak) learning rate
    #[arg(long, default_value_t = 1e-4)]
    pub lr: f64,

    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Model embedding size, used by noam
    #[arg(long, default_value_t = 512)]
    pub emb_dim: usize,

    /// Batches per epoch; derived from <output-dir>/train.jsonl when omitted
    #[arg(long)]
    pub steps_per_epoch: Option<usize>,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Where schedule.csv is written
    #[arg(long, default_value = "prepared")]
    pub output_dir: String,
}

impl From<ScheduleArgs> for ScheduleConfig {
    fn from(a: ScheduleArgs) -> Self {
        ScheduleConfig {
            sched:           a.sched,
            lr:              a.lr,
            epochs:          a.epochs,
            emb_dim:         a.emb_dim,
            steps_per_epoch: a.steps_per_epoch,
            batch_size:      a.batch_size,
            output_dir:      a.output_dir,
        }
    }
}
