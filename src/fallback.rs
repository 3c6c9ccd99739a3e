use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::team::{ROSTER, Source, TeamRecord};

const FALLBACK_UPDATED: &str = "End of 2024 season";

// Last completed season per league. Only used when neither a live fetch nor the
// local cache has anything for a team.
static FALLBACK_TABLE: Lazy<BTreeMap<String, TeamRecord>> = Lazy::new(|| {
    ROSTER
        .iter()
        .map(|spec| {
            let (wins, losses, ties) = fallback_counts(spec.name);
            let rec = TeamRecord::new(
                spec.name,
                spec.sport,
                wins,
                losses,
                ties,
                FALLBACK_UPDATED,
                Source::Fallback,
            );
            (spec.name.to_string(), rec)
        })
        .collect()
});

fn fallback_counts(name: &str) -> (u32, u32, Option<u32>) {
    match name {
        "Bears" => (5, 12, None),
        "Bulls" => (39, 43, None),
        "Cubs" => (83, 79, None),
        "White Sox" => (41, 121, None),
        "Blackhawks" => (23, 53, Some(6)),
        _ => (0, 0, None),
    }
}

pub fn table() -> &'static BTreeMap<String, TeamRecord> {
    &FALLBACK_TABLE
}

pub fn get(name: &str) -> Option<&'static TeamRecord> {
    FALLBACK_TABLE.get(name)
}
