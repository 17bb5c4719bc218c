//! Staff roster

use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;

/// Names used when no roster is configured
pub const DEFAULT_STAFF: &[&str] = &[
    "Helene Niemann",
    "Edward Chisoro",
    "Rodrick Sinamano",
    "Thokozile Mokhele",
    "Marie Ayaba",
    "Olivia Dlamini",
    "Karabo Kotu",
];

/// Fixed set of staff eligible to submit a selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Build a roster, rejecting empty rosters, blank names and duplicates
    ///
    /// Names are trimmed; order is preserved for display.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut cleaned = Vec::new();

        for name in names {
            let name: String = name.into();
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Config("Roster contains a blank name".to_string()));
            }
            if !seen.insert(name.clone()) {
                return Err(Error::Config(format!("Duplicate roster name: {}", name)));
            }
            cleaned.push(name);
        }

        if cleaned.is_empty() {
            return Err(Error::Config("Roster must list at least one name".to_string()));
        }

        Ok(Self { names: cleaned })
    }

    /// Exact, case-sensitive membership check
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            names: DEFAULT_STAFF.iter().map(|s| s.to_string()).collect(),
        }
    }
}
