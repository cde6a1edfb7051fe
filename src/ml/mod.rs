// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Optimiser-facing helpers. Models and the training loop live
// with the caller; this layer only decides the learning rate
// passed to `optim.step(lr, model, grads)` at each step.
//
//   scheduler.rs — name → Scheduler (constant, cosineannealing,
//                  invsqrt, linear, onecycle, noam)

/// Learning-rate schedule selection and closed-form formulas
pub mod scheduler;
