use std::collections::HashSet;

use crate::dataset::{Storage, SACRED_ORB, SACRED_ORB_PREFIX};
use crate::{RandomizerError, Result};

const MAX_ITERATIONS: usize = 100;

/// Whether every placement can be collected starting from nothing.
///
/// Each round collects the items of all spots reachable with what is held so far.
/// A round that reaches nothing new means the rest is locked forever.
pub fn validate(storage: &Storage) -> Result<bool> {
    let placed: HashSet<&str> = storage.all_items().iter().map(|x| &*x.name).collect();
    let unplaced: Vec<&str> = storage
        .all_requirement_names()
        .iter()
        .map(String::as_str)
        .filter(|x| !placed.contains(x))
        .collect();
    if unplaced != [SACRED_ORB] {
        return Err(RandomizerError::Assertion(format!(
            "requirements name items that are never placed: {unplaced:?}"
        )));
    }

    let placements: Vec<_> = storage.placements().collect();
    let mut remaining = vec![true; placements.len()];
    let mut remaining_count = placements.len();
    let mut current_item_names: HashSet<&str> = HashSet::new();
    let mut sacred_orb_count = 0;
    for _ in 0..MAX_ITERATIONS {
        let reached: Vec<usize> = placements
            .iter()
            .enumerate()
            .filter(|(i, (spot, _))| {
                remaining[*i] && spot.is_reachable(&current_item_names, sacred_orb_count)
            })
            .map(|(i, _)| i)
            .collect();
        if reached.is_empty() {
            return Ok(false);
        }
        for &i in &reached {
            remaining[i] = false;
        }
        remaining_count -= reached.len();
        if remaining_count == 0 {
            return Ok(true);
        }
        for &i in &reached {
            let name = &*placements[i].1.name;
            if name.starts_with(SACRED_ORB_PREFIX) {
                sacred_orb_count += 1;
            }
            current_item_names.insert(name);
        }
    }
    Err(RandomizerError::ValidationDiverged {
        iterations: MAX_ITERATIONS,
    })
}
