//! Enumeration of the search space: every k-subset of the candidate pool.
//!
//! Subsets are emitted in lexicographic order of their index tuples
//! (`[0,1,2] < [0,1,3] < ... < [m-3,m-2,m-1]`) and each subset keeps the
//! relative order of the pool. Same input, same output sequence.

use std::collections::HashSet;

use crate::domain::VariableSet;
use crate::error::FitError;
use crate::math::binomial;

/// Number of k-subsets of an `m`-element pool, validating `1 <= k <= m`.
pub fn combination_count(m: usize, k: usize) -> Result<u64, FitError> {
    if k == 0 || k > m {
        return Err(FitError::invalid(format!(
            "Combination size must be in 1..={m} for {m} candidate variables, got {k}."
        )));
    }
    binomial(m, k).ok_or_else(|| FitError::invalid(format!("C({m}, {k}) overflows u64.")))
}

/// Generate every `k`-sized subset of `variables`.
pub fn generate(variables: &[String], k: usize) -> Result<Vec<VariableSet>, FitError> {
    let m = variables.len();
    let count = combination_count(m, k)?;

    let mut seen = HashSet::with_capacity(m);
    for name in variables {
        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(FitError::invalid(format!("Duplicate candidate variable `{name}`.")));
        }
    }

    let capacity = usize::try_from(count).map_err(|_| {
        FitError::invalid(format!("C({m}, {k}) = {count} combinations do not fit in memory."))
    })?;
    let mut out: Vec<VariableSet> = Vec::with_capacity(capacity);

    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        out.push(idx.iter().map(|&i| variables[i].clone()).collect());

        // Rightmost position that can still advance.
        let Some(i) = (0..k).rev().find(|&i| idx[i] < m - k + i) else {
            break;
        };
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[j - 1] + 1;
        }
    }

    debug_assert_eq!(out.len() as u64, count);
    Ok(out)
}
