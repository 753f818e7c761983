//! UV index data for SunSafe
//!
//! Fetches UV history/forecast from the currentuvindex.com API, keeps a
//! time-boxed local cache, and turns UV readings into safe-exposure minutes
//! for a Fitzpatrick skin type.

pub mod types;
pub mod storage;
pub mod settings;
pub mod cache;
pub mod exposure;
pub mod risk;
pub mod series;
pub mod places;
pub mod provider;

pub use types::*;
pub use cache::{CacheEntry, UvCache};
pub use exposure::safe_minutes;
pub use places::PlaceTable;
pub use provider::UvProvider;
pub use risk::RiskLevel;
pub use series::{find_closest, DisplayWindow};
pub use settings::{Settings, SettingsIssue, SettingsStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
