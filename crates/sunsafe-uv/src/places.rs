//! Offline "City, ST" -> coordinates lookup.
//!
//! Reads the JSON table produced from the simplemaps US cities CSV:
//! `{"Seattle, WA": {"latitude": 47.6062, "longitude": -122.3321}, ...}`.

use std::collections::HashMap;
use std::path::Path;

use crate::types::{Coordinates, UvError};

#[derive(Debug, Clone, Default)]
pub struct PlaceTable {
    // normalized name -> (display name, coordinates)
    entries: HashMap<String, (String, Coordinates)>,
}

fn normalize(name: &str) -> String {
    name.split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(",")
        .to_lowercase()
}

impl PlaceTable {
    pub fn from_json_str(json: &str) -> Result<Self, UvError> {
        let raw: HashMap<String, Coordinates> = serde_json::from_str(json)
            .map_err(|e| UvError::Parse(format!("invalid places table: {}", e)))?;

        let entries = raw
            .into_iter()
            .map(|(name, coords)| (normalize(&name), (name, coords)))
            .collect();

        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, UvError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            UvError::Storage(format!("failed to read {}: {}", path.display(), e))
        })?;
        let table = Self::from_json_str(&contents)?;
        tracing::debug!("Loaded {} places from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case- and spacing-insensitive exact match
    pub fn lookup(&self, name: &str) -> Option<Coordinates> {
        self.entries.get(&normalize(name)).map(|(_, coords)| *coords)
    }

    /// Up to `limit` display names starting with `prefix`, sorted
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<String> {
        let prefix = normalize(prefix);
        let mut names: Vec<String> = self
            .entries
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(_, (display, _))| display.clone())
            .collect();
        names.sort();
        names.truncate(limit);
        names
    }
}
