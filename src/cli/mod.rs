// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2.
//
//   1. `prepare`  — corpus → sorted, tokenized partitions
//   2. `schedule` — scheduler name → per-step learning rates

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, ScheduleArgs};

use crate::application::{
    prepare_use_case::PrepareUseCase,
    schedule_use_case::ScheduleUseCase,
};

#[derive(Parser, Debug)]
#[command(
    name = "tifu-prep",
    version,
    about = "Prepare Reddit TIFU summarization data and preview learning-rate schedules."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args)  => run_prepare(args),
            Commands::Schedule(args) => run_schedule(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    tracing::info!("Preparing corpus from: {}", args.data_file);

    let report = PrepareUseCase::new(args.into()).execute()?;

    println!(
        "Prepared {} train / {} validation / {} test pairs ({} training batches per epoch).",
        report.train, report.val, report.test, report.train_steps
    );
    Ok(())
}

fn run_schedule(args: ScheduleArgs) -> Result<()> {
    let report = ScheduleUseCase::new(args.into()).execute()?;

    println!(
        "Wrote {} steps to {} (first={:.3e}, peak={:.3e}, last={:.3e}).",
        report.total_steps,
        report.csv_path.display(),
        report.first_lr,
        report.peak_lr,
        report.last_lr
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_schedule_args_parse() {
        let cli = Cli::try_parse_from([
            "tifu-prep", "schedule", "--sched", "noam", "--steps-per-epoch", "7", "--emb-dim", "256",
        ])
        .unwrap();

        match cli.command {
            Commands::Schedule(a) => {
                assert_eq!(a.sched, "noam");
                assert_eq!(a.steps_per_epoch, Some(7));
                assert_eq!(a.emb_dim, 256);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
