use crate::core::seeding::RankOrder;
use crate::domain::model::{Entrant, EntrantId};
use crate::utils::error::{EngineError, Result};
use std::ops::RangeInclusive;

/// Picks the group size for `entrants` within `bounds`.
///
/// An exact divisor wins outright (the smallest one). Otherwise the size
/// leaving the largest remainder is chosen, so the short last group is as
/// full as possible; equal remainders go to the smaller size. Fields smaller
/// than the lower bound still get a size and end up in a single short group.
pub fn group_size(entrants: usize, bounds: RangeInclusive<usize>) -> Result<usize> {
    if entrants == 0 {
        return Err(EngineError::invalid_input("no entrants"));
    }
    if bounds.is_empty() || *bounds.start() == 0 {
        return Err(EngineError::invalid_input(format!(
            "invalid group size bounds {}..={}",
            bounds.start(),
            bounds.end()
        )));
    }

    if let Some(exact) = bounds.clone().find(|size| entrants % size == 0) {
        return Ok(exact);
    }

    let mut best = *bounds.start();
    let mut best_remainder = entrants % best;
    for size in bounds {
        let remainder = entrants % size;
        if remainder > best_remainder {
            best = size;
            best_remainder = remainder;
        }
    }
    Ok(best)
}

/// Deals entrants into `ceil(n / size)` groups in rank order, one to each
/// group in turn, so every group gets a spread of strong and weak entrants
/// and sizes differ by at most one.
pub fn partition(entrants: &[Entrant], size: usize, order: RankOrder) -> Result<Vec<Vec<EntrantId>>> {
    if entrants.is_empty() {
        return Err(EngineError::invalid_input("no entrants"));
    }
    if size == 0 {
        return Err(EngineError::invalid_input("group size must be positive"));
    }

    let mut sorted: Vec<&Entrant> = entrants.iter().collect();
    sorted.sort_by(|a, b| order(a, b));

    let group_count = entrants.len().div_ceil(size);
    let mut groups: Vec<Vec<EntrantId>> = vec![Vec::with_capacity(size); group_count];
    for (i, entrant) in sorted.iter().enumerate() {
        groups[i % group_count].push(entrant.id);
    }

    tracing::debug!(
        "Partitioned {} entrants into {} groups (size {})",
        entrants.len(),
        group_count,
        size
    );
    Ok(groups)
}
