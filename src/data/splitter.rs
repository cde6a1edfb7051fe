// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Shuffles samples once, then takes two sequential fractional
// splits:
//
//   [──────── train ────────|──────── rest ────────]
//                           [── val ──|── test ──]
//
//   n_rest  = ceil((1 - train_split) * n)
//   n_train = n - n_rest
//   n_test  = ceil((1 - val_split / (1 - train_split)) * n_rest)
//   n_val   = n_rest - n_test
//
// With train_split = 0.8 and val_split = 0.1 over 100 samples
// this gives 80 / 10 / 10.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::error::{PrepError, Result};

/// Products like `0.2 * 10` come out as 2.0000000000000004; those
/// must not round up to the next integer.
const CEIL_TOLERANCE: f64 = 1e-9;

fn ceil_count(x: f64) -> usize {
    (x - CEIL_TOLERANCE).ceil().max(0.0) as usize
}

/// Check that the two fractions leave a non-empty test share.
pub fn validate_fractions(train_split: f64, val_split: f64) -> Result<()> {
    if !(train_split > 0.0 && train_split < 1.0) {
        return Err(PrepError::Config(format!(
            "train_split must be in (0, 1), got {train_split}"
        )));
    }
    if !(val_split > 0.0) {
        return Err(PrepError::Config(format!(
            "val_split must be positive, got {val_split}"
        )));
    }
    if train_split + val_split >= 1.0 {
        return Err(PrepError::Config(format!(
            "train_split + val_split must be below 1, got {}",
            train_split + val_split
        )));
    }
    Ok(())
}

/// Partition sizes `(train, val, test)` for `total` samples.
pub fn split_sizes(total: usize, train_split: f64, val_split: f64) -> Result<(usize, usize, usize)> {
    validate_fractions(train_split, val_split)?;

    let n_rest  = ceil_count((1.0 - train_split) * total as f64).min(total);
    let n_train = total - n_rest;

    let test_fraction = 1.0 - val_split / (1.0 - train_split);
    let n_test = ceil_count(test_fraction * n_rest as f64).min(n_rest);
    let n_val  = n_rest - n_test;

    Ok((n_train, n_val, n_test))
}

/// Shuffle `samples` with `rng` and split into (train, val, test).
pub fn split_data_with_rng<T, R: Rng + ?Sized>(
    mut samples: Vec<T>,
    train_split: f64,
    val_split:   f64,
    rng:         &mut R,
) -> Result<(Vec<T>, Vec<T>, Vec<T>)> {
    let total = samples.len();
    let (n_train, n_val, n_test) = split_sizes(total, train_split, val_split)?;

    samples.shuffle(rng);

    // split_off(n) leaves [0..n) in place and returns [n..)
    let mut rest = samples.split_off(n_train);
    let test     = rest.split_off(n_val);
    let val      = rest;
    let train    = samples;

    debug_assert_eq!(test.len(), n_test);

    if total > 0 && (train.is_empty() || val.is_empty() || test.is_empty()) {
        tracing::warn!(
            "Split of {} samples left a partition empty ({} / {} / {})",
            total,
            train.len(),
            val.len(),
            test.len()
        );
    }

    tracing::debug!(
        "Dataset split: {} train, {} validation, {} test",
        train.len(),
        val.len(),
        test.len()
    );

    Ok((train, val, test))
}

/// Shuffle and split. A seed makes the permutation reproducible;
/// without one the thread RNG is used.
pub fn split_data<T>(
    samples:     Vec<T>,
    train_split: f64,
    val_split:   f64,
    seed:        Option<u64>,
) -> Result<(Vec<T>, Vec<T>, Vec<T>)> {
    match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            split_data_with_rng(samples, train_split, val_split, &mut rng)
        }
        None => split_data_with_rng(samples, train_split, val_split, &mut rand::thread_rng()),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_correct_split_sizes() {
        assert_eq!(split_sizes(100, 0.8, 0.1).unwrap(), (80, 10, 10));
        assert_eq!(split_sizes(10, 0.8, 0.1).unwrap(), (8, 1, 1));
        assert_eq!(split_sizes(10, 0.6, 0.2).unwrap(), (6, 2, 2));
    }

    #[test]
    fn test_sizes_always_sum_to_total() {
        for total in 0..60 {
            for &(t, v) in &[(0.8, 0.1), (0.7, 0.2), (0.5, 0.25), (0.9, 0.05), (0.33, 0.33)] {
                let (a, b, c) = split_sizes(total, t, v).unwrap();
                assert_eq!(a + b + c, total, "total={total} t={t} v={v}");
            }
        }
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let items: Vec<usize> = (0..97).collect();
        let (train, val, test) = split_data(items, 0.7, 0.2, Some(7)).unwrap();

        let mut seen = HashSet::new();
        for x in train.iter().chain(&val).chain(&test) {
            assert!(seen.insert(*x), "{x} appears twice");
        }
        assert_eq!(seen.len(), 97);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = split_data((0..40).collect::<Vec<u32>>(), 0.8, 0.1, Some(42)).unwrap();
        let b = split_data((0..40).collect::<Vec<u32>>(), 0.8, 0.1, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val, test) = split_data(Vec::<u8>::new(), 0.8, 0.1, None).unwrap();
        assert!(train.is_empty() && val.is_empty() && test.is_empty());
    }

    #[test]
    fn test_rejects_fractions_without_test_share() {
        assert!(split_sizes(10, 0.8, 0.2).unwrap_err().is_config());
        assert!(split_sizes(10, 1.0, 0.1).is_err());
        assert!(split_sizes(10, 0.5, 0.0).is_err());
        assert!(split_sizes(10, f64::NAN, 0.1).is_err());
    }
}
