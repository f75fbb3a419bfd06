use std::collections::HashSet;

use shared::domain::Official;

/// Keeps the first record for each id, preserving order.
pub fn dedupe_by_id(officials: Vec<Official>) -> Vec<Official> {
    let mut seen = HashSet::with_capacity(officials.len());
    officials
        .into_iter()
        .filter(|official| seen.insert(official.id))
        .collect()
}
