//! Infers which season week is "upcoming" from contestants' remaining-team
//! counts, when the caller doesn't simply say so.

use crate::contestant::Contestant;
use crate::errors::{CoreError, CoreResult};

/// `upcoming_week = total_weeks - remaining_weeks`, computed per contestant
/// and reconciled across all of them.
///
/// Contestants with different numbers of remaining weeks can still agree
/// on the same upcoming week (one may have already doubled down on a past
/// week, spending an extra pick). Disagreement up to `tolerance` weeks is
/// tolerated and resolved to the most common guess; beyond that, the
/// input is inconsistent and the run should fail rather than guess.
pub fn infer_upcoming_week(
    contestants: &[Contestant],
    total_weeks: usize,
    tolerance: usize,
) -> CoreResult<usize> {
    if contestants.is_empty() {
        return Err(CoreError::InvalidInput("no contestants to infer the upcoming week from".to_string()));
    }

    let guesses: Vec<usize> = contestants
        .iter()
        .map(|c| total_weeks.saturating_sub(c.num_remaining_weeks()))
        .collect();

    let min = *guesses.iter().min().unwrap();
    let max = *guesses.iter().max().unwrap();
    if max - min > tolerance {
        return Err(CoreError::InconsistentInference(format!(
            "upcoming-week guesses range from {min} to {max}, exceeding tolerance {tolerance}"
        )));
    }

    let mut counts = std::collections::HashMap::new();
    for &g in &guesses {
        *counts.entry(g).or_insert(0usize) += 1;
    }
    Ok(counts.into_iter().max_by_key(|&(_, count)| count).unwrap().0)
}
