// ============================================================
// Layer 5 — Learning-Rate Schedules
// ============================================================
// Selects one of six schedules by name. Each maps the optimiser
// step `t` to the learning rate handed to `optim.step(lr, ..)`.
//
//   constant / none   lr
//   cosineannealing   warm restarts every 10 steps, eta_min = 0
//   invsqrt           lr / sqrt(t)                   (lr at t = 0)
//   linear            lr * (lr/5 → lr) over all steps
//   onecycle          lr/25 → lr over 30%, then → lr/25/1e4
//   noam              lr * d^-0.5 * min((t+1)^-0.5, (t+1) w^-1.5)
//
// "all steps" = steps_per_epoch * epochs, and for noam the
// warmup w is 30% of that.
//
// Reference: Loshchilov & Hutter (2017) SGDR
//            Smith & Topin (2018) Super-Convergence
//            Vaswani et al. (2017) Attention Is All You Need

use std::{f64::consts::PI, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Fraction of all steps spent warming up (onecycle and noam)
pub const WARMUP_FRACTION: f64 = 0.3;

// ─── ScheduleKind ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    Constant,
    CosineAnnealing,
    InvSqrt,
    Linear,
    OneCycle,
    Noam,
}

impl ScheduleKind {
    /// Every accepted spelling; "none" is an alias of "constant"
    pub const NAMES: [&'static str; 7] = [
        "constant",
        "none",
        "cosineannealing",
        "invsqrt",
        "linear",
        "onecycle",
        "noam",
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScheduleKind::Constant        => "constant",
            ScheduleKind::CosineAnnealing => "cosineannealing",
            ScheduleKind::InvSqrt         => "invsqrt",
            ScheduleKind::Linear          => "linear",
            ScheduleKind::OneCycle        => "onecycle",
            ScheduleKind::Noam            => "noam",
        }
    }
}

impl FromStr for ScheduleKind {
    type Err = PrepError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "constant" | "none" => Ok(ScheduleKind::Constant),
            "cosineannealing"   => Ok(ScheduleKind::CosineAnnealing),
            "invsqrt"           => Ok(ScheduleKind::InvSqrt),
            "linear"            => Ok(ScheduleKind::Linear),
            "onecycle"          => Ok(ScheduleKind::OneCycle),
            "noam"              => Ok(ScheduleKind::Noam),
            other               => Err(PrepError::UnknownScheduler(other.to_string())),
        }
    }
}

impl fmt::Display for ScheduleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Schedule ─────────────────────────────────────────────────────────────────
/// Closed-form learning rate as a function of the step.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    /// Multiplier of 1 at every step
    Constant,

    /// Cosine annealing restarted every `t_0` steps
    CosineWarmRestarts { t_0: usize, eta_min: f64 },

    /// Multiplier 1/sqrt(t), 1 at t = 0
    InvSqrt,

    /// Multiplier interpolated from `start_factor` to `end_factor`
    Linear { start_factor: f64, end_factor: f64, total_iters: usize },

    /// Two-phase linear one-cycle policy; ignores the base rate
    OneCycle {
        max_lr:           f64,
        total_steps:      usize,
        pct_start:        f64,
        div_factor:       f64,
        final_div_factor: f64,
    },

    /// Inverse-square-root decay after a linear warmup
    Noam { emb_dim: usize, warmup_steps: f64 },
}

impl Schedule {
    /// Learning rate at `step` for an optimiser whose base rate is `base_lr`.
    pub fn lr_at(&self, base_lr: f64, step: usize) -> Result<f64> {
        let t = step as f64;

        let lr = match *self {
            Schedule::Constant => base_lr,

            Schedule::CosineWarmRestarts { t_0, eta_min } => {
                let t_cur = (step % t_0) as f64;
                eta_min + (base_lr - eta_min) * (1.0 + (PI * t_cur / t_0 as f64).cos()) / 2.0
            }

            Schedule::InvSqrt => {
                if step > 0 { base_lr / t.sqrt() } else { base_lr }
            }

            Schedule::Linear { start_factor, end_factor, total_iters } => {
                let progress = step.min(total_iters) as f64 / total_iters as f64;
                base_lr * (start_factor + (end_factor - start_factor) * progress)
            }

            Schedule::OneCycle { max_lr, total_steps, pct_start, div_factor, final_div_factor } => {
                if step > total_steps {
                    return Err(PrepError::ScheduleExhausted { step, total: total_steps });
                }
                let initial_lr = max_lr / div_factor;
                let min_lr     = initial_lr / final_div_factor;

                let warmup_end = pct_start * total_steps as f64 - 1.0;
                let final_end  = total_steps as f64 - 1.0;

                if t <= warmup_end {
                    anneal_linear(initial_lr, max_lr, phase_pct(t, 0.0, warmup_end))
                } else {
                    anneal_linear(max_lr, min_lr, phase_pct(t, warmup_end, final_end))
                }
            }

            Schedule::Noam { emb_dim, warmup_steps } => {
                let s = t + 1.0;
                let factor = (emb_dim as f64).powf(-0.5)
                    * s.powf(-0.5).min(s * warmup_steps.powf(-1.5));
                base_lr * factor
            }
        };

        Ok(lr)
    }
}

/// Progress through a phase; a phase of zero width counts as complete.
fn phase_pct(t: f64, start: f64, end: f64) -> f64 {
    if end - start <= 0.0 {
        1.0
    } else {
        (t - start) / (end - start)
    }
}

fn anneal_linear(start: f64, end: f64, pct: f64) -> f64 {
    (end - start) * pct + start
}

// ─── Scheduler ────────────────────────────────────────────────────────────────
/// A schedule bound to a base learning rate and a step counter.
///
/// Construction is step 0; every `step()` advances by one and
/// returns the rate to use next.
#[derive(Debug, Clone)]
pub struct Scheduler {
    kind:     ScheduleKind,
    schedule: Schedule,
    base_lr:  f64,
    step:     usize,
    lr:       f64,
}

impl Scheduler {
    pub fn new(kind: ScheduleKind, schedule: Schedule, base_lr: f64) -> Result<Self> {
        let lr = schedule.lr_at(base_lr, 0)?;
        Ok(Self { kind, schedule, base_lr, step: 0, lr })
    }

    pub fn kind(&self) -> ScheduleKind { self.kind }

    pub fn schedule(&self) -> &Schedule { &self.schedule }

    pub fn base_lr(&self) -> f64 { self.base_lr }

    /// Steps taken so far
    pub fn current_step(&self) -> usize { self.step }

    /// Learning rate for the current step
    pub fn lr(&self) -> f64 { self.lr }

    /// Closed-form rate at an arbitrary step, without advancing
    pub fn lr_at(&self, step: usize) -> Result<f64> {
        self.schedule.lr_at(self.base_lr, step)
    }

    /// Advance one step and return the new learning rate.
    pub fn step(&mut self) -> Result<f64> {
        let next = self.step + 1;
        self.lr   = self.schedule.lr_at(self.base_lr, next)?;
        self.step = next;
        Ok(self.lr)
    }
}

/// Optimiser steps in a whole run: `steps_per_epoch * epochs`.
pub fn total_steps(steps_per_epoch: usize, epochs: usize) -> Result<usize> {
    steps_per_epoch.checked_mul(epochs).ok_or_else(|| {
        PrepError::Config(format!(
            "steps_per_epoch={steps_per_epoch} * epochs={epochs} overflows the step counter"
        ))
    })
}

// ─── init_schedule ────────────────────────────────────────────────────────────
/// Pick a learning-rate schedule by name.
///
/// `steps_per_epoch` is the number of batches in the training
/// loader; `lr` is both the optimiser base rate and the schedule
/// peak; `emb_dim` only matters for noam.
pub fn init_schedule(
    sched:           &str,
    steps_per_epoch: usize,
    lr:              f64,
    epochs:          usize,
    emb_dim:         usize,
) -> Result<Scheduler> {
    let kind  = sched.parse::<ScheduleKind>()?;
    let total = total_steps(steps_per_epoch, epochs)?;

    let require_steps = || {
        if total == 0 {
            Err(PrepError::Config(format!(
                "'{kind}' needs at least one training step (steps_per_epoch={steps_per_epoch}, epochs={epochs})"
            )))
        } else {
            Ok(())
        }
    };

    let schedule = match kind {
        ScheduleKind::Constant => Schedule::Constant,

        ScheduleKind::CosineAnnealing => Schedule::CosineWarmRestarts {
            t_0:     10,
            eta_min: 0.0,
        },

        ScheduleKind::InvSqrt => Schedule::InvSqrt,

        ScheduleKind::Linear => {
            require_steps()?;
            let start_factor = lr / 5.0;
            let end_factor   = lr;
            if !(start_factor > 0.0 && start_factor <= 1.0) {
                return Err(PrepError::Config(format!(
                    "linear start factor lr/5 must be in (0, 1], got {start_factor}"
                )));
            }
            if !(0.0..=1.0).contains(&end_factor) {
                return Err(PrepError::Config(format!(
                    "linear end factor lr must be in [0, 1], got {end_factor}"
                )));
            }
            Schedule::Linear { start_factor, end_factor, total_iters: total }
        }

        ScheduleKind::OneCycle => {
            require_steps()?;
            Schedule::OneCycle {
                max_lr:           lr,
                total_steps:      total,
                pct_start:        WARMUP_FRACTION,
                div_factor:       25.0,
                final_div_factor: 1e4,
            }
        }

        ScheduleKind::Noam => {
            require_steps()?;
            if emb_dim == 0 {
                return Err(PrepError::Config("noam needs a non-zero emb_dim".to_string()));
            }
            Schedule::Noam {
                emb_dim,
                warmup_steps: WARMUP_FRACTION * total as f64,
            }
        }
    };

    tracing::debug!("Initialised '{}' schedule over {} steps (lr={})", kind, total, lr);
    Scheduler::new(kind, schedule, lr)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_unknown_name_is_config_error() {
        let err = init_schedule("bogus", 10, 1e-3, 2, 64).unwrap_err();
        assert_eq!(err, PrepError::UnknownScheduler("bogus".to_string()));
        assert!(err.is_config());
    }

    #[test]
    fn test_every_recognised_name_builds() {
        for name in ScheduleKind::NAMES {
            let s = init_schedule(name, 10, 1e-3, 2, 64);
            assert!(s.is_ok(), "{name} failed: {:?}", s.err());
        }
        assert_eq!(init_schedule("none", 1, 0.1, 1, 1).unwrap().kind(), ScheduleKind::Constant);
    }

    #[test]
    fn test_constant_never_changes() {
        let mut s = init_schedule("constant", 5, 0.01, 3, 8).unwrap();
        for _ in 0..20 {
            assert!(close(s.step().unwrap(), 0.01));
        }
        assert_eq!(s.current_step(), 20);
    }

    #[test]
    fn test_cosine_restarts_every_ten_steps() {
        let s = init_schedule("cosineannealing", 1, 0.2, 1, 8).unwrap();
        assert!(close(s.lr(), 0.2));
        assert!(close(s.lr_at(5).unwrap(), 0.1));
        assert!(close(s.lr_at(10).unwrap(), 0.2));
        assert!(close(s.lr_at(15).unwrap(), 0.1));
        assert!(s.lr_at(9).unwrap() < s.lr_at(8).unwrap());
    }

    #[test]
    fn test_step_count_overflow_is_config_error() {
        assert_eq!(total_steps(7, 3).unwrap(), 21);
        assert!(total_steps(usize::MAX, 2).unwrap_err().is_config());
        assert!(init_schedule("constant", usize::MAX, 0.1, 2, 8).unwrap_err().is_config());
    }

    #[test]
    fn test_invsqrt() {
        let s = init_schedule("invsqrt", 1, 0.3, 1, 8).unwrap();
        assert!(close(s.lr(), 0.3));
        assert!(close(s.lr_at(1).unwrap(), 0.3));
        assert!(close(s.lr_at(4).unwrap(), 0.15));
    }

    #[test]
    fn test_linear_ramps_from_fifth_of_lr() {
        // lr = 0.5 → factors 0.1 → 0.5 over 10 steps
        let s = init_schedule("linear", 5, 0.5, 2, 8).unwrap();
        assert!(close(s.lr(), 0.05));
        assert!(close(s.lr_at(5).unwrap(), 0.15));
        assert!(close(s.lr_at(10).unwrap(), 0.25));
        assert!(close(s.lr_at(50).unwrap(), 0.25));
    }

    #[test]
    fn test_linear_rejects_out_of_range_factors() {
        assert!(init_schedule("linear", 5, 10.0, 2, 8).unwrap_err().is_config());
        assert!(init_schedule("linear", 5, 0.0, 2, 8).is_err());
        assert!(init_schedule("linear", 0, 0.5, 2, 8).is_err());
    }

    #[test]
    fn test_onecycle_phases() {
        let mut s = init_schedule("onecycle", 5, 1.0, 2, 8).unwrap();
        // initial = 1/25, peak at step 0.3 * 10 - 1 = 2
        assert!(close(s.lr(), 0.04));
        assert!(close(s.step().unwrap(), 0.52));
        assert!(close(s.step().unwrap(), 1.0));
        assert!(close(s.lr_at(9).unwrap(), 0.04 / 1e4));

        for _ in 3..=10 {
            s.step().unwrap();
        }
        assert_eq!(
            s.step().unwrap_err(),
            PrepError::ScheduleExhausted { step: 11, total: 10 }
        );
        // a failed step leaves the scheduler where it was
        assert_eq!(s.current_step(), 10);
    }

    #[test]
    fn test_noam_peaks_at_end_of_warmup() {
        // 10 steps → warmup of 3, peak where t + 1 == 3
        let s = init_schedule("noam", 5, 1.0, 2, 4).unwrap();
        let peak = s.lr_at(2).unwrap();
        assert!(close(peak, 0.5 * 3f64.powf(-0.5)));
        assert!(s.lr_at(1).unwrap() < peak);
        assert!(s.lr_at(5).unwrap() < peak);
        assert!(close(s.lr(), 0.5 * 3f64.powf(-1.5)));
    }

    #[test]
    fn test_noam_needs_steps_and_dim() {
        assert!(init_schedule("noam", 0, 1.0, 3, 4).is_err());
        assert!(init_schedule("noam", 3, 1.0, 3, 0).is_err());
    }

    #[test]
    fn test_kind_round_trips_through_name() {
        for name in ScheduleKind::NAMES {
            let kind: ScheduleKind = name.parse().unwrap();
            assert_eq!(kind.name().parse::<ScheduleKind>().unwrap(), kind);
        }
    }
}
