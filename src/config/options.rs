// src/config/options.rs
use std::collections::BTreeSet;

use chrono::{Local, NaiveDateTime};

/// Which buildings a scan covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildingSelector {
    All,
    Only(BTreeSet<String>),
}

impl BuildingSelector {
    /// An empty list means every building.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set: BTreeSet<String> = names
            .into_iter()
            .map(|s| s.as_ref().trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if set.is_empty() { BuildingSelector::All } else { BuildingSelector::Only(set) }
    }

    pub fn matches(&self, building: &str) -> bool {
        match self {
            BuildingSelector::All => true,
            BuildingSelector::Only(set) => set.contains(&building.trim().to_ascii_uppercase()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    pub buildings: BuildingSelector,
    /// Instant a room has to be free at. Local wall-clock time, like the site.
    pub at: NaiveDateTime,
    /// Ignore cached room lists.
    pub refresh: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            buildings: BuildingSelector::All,
            at: Local::now().naive_local(),
            refresh: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_is_all() {
        assert_eq!(BuildingSelector::from_names(Vec::<String>::new()), BuildingSelector::All);
        assert_eq!(BuildingSelector::from_names([" ", ""]), BuildingSelector::All);
    }

    #[test]
    fn selection_is_case_insensitive() {
        let sel = BuildingSelector::from_names(["cab", "HG"]);
        assert!(sel.matches("CAB"));
        assert!(sel.matches("hg"));
        assert!(!sel.matches("ETZ"));
        assert!(BuildingSelector::All.matches("ETZ"));
    }
}
