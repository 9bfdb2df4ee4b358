//! Candidate ranking and deduplication.

use std::collections::HashSet;

use crate::domain::PoiCandidate;

/// Drop candidates with the same name at the same location.
///
/// The first occurrence wins, so callers control precedence by input order.
pub fn dedupe(candidates: Vec<PoiCandidate>) -> Vec<PoiCandidate> {
    let mut seen = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| {
            seen.insert((
                c.name.clone(),
                c.location.lat().to_bits(),
                c.location.lng().to_bits(),
            ))
        })
        .collect()
}

/// Sort candidates by combined drive time, shortest first.
///
/// The sort is stable: candidates with equal totals keep their input order.
pub fn rank_candidates(mut candidates: Vec<PoiCandidate>) -> Vec<PoiCandidate> {
    candidates.sort_by_key(PoiCandidate::total_drive_time);
    candidates
}

/// Dedupe, rank and truncate to `limit`.
pub fn rank_and_limit(candidates: Vec<PoiCandidate>, limit: usize) -> Vec<PoiCandidate> {
    let mut ranked = rank_candidates(dedupe(candidates));
    ranked.truncate(limit);
    ranked
}

/// Merge the places found around the main and alternate midpoints.
///
/// Main-route places take precedence when the same place was found around both.
pub fn merge(
    main: Vec<PoiCandidate>,
    alternate: Vec<PoiCandidate>,
    limit: usize,
) -> Vec<PoiCandidate> {
    let mut all = main;
    all.extend(alternate);
    rank_and_limit(all, limit)
}
