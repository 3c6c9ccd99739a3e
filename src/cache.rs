use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::fallback;
use crate::store::{KeyValueStore, StorageError};
use crate::team::{Source, TeamRecord};

pub const CACHE_KEY: &str = "chicago_sports_cache";
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
/// A persisted cache older than this many cache durations is thrown away.
pub const EXPIRY_FACTOR: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCache {
    pub teams: BTreeMap<String, TeamRecord>,
    pub last_fetch: i64,
}

pub struct TeamStatsCache<S, C = SystemClock> {
    store: S,
    clock: C,
    cache_duration_ms: i64,
}

impl<S: KeyValueStore> TeamStatsCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> TeamStatsCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            cache_duration_ms: DEFAULT_CACHE_DURATION.as_millis() as i64,
        }
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration_ms = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self
    }

    pub fn cache_duration_ms(&self) -> i64 {
        self.cache_duration_ms
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn read(&self) -> Result<Option<PersistedCache>, StorageError> {
        let Some(cache) = self.load()? else {
            return Ok(None);
        };
        if self.is_expired(&cache) {
            tracing::info!(last_fetch = cache.last_fetch, "discarding expired team cache");
            self.store.remove(CACHE_KEY)?;
            return Ok(None);
        }
        Ok(Some(cache))
    }

    pub fn write(&self, records: &[TeamRecord]) -> Result<(), StorageError> {
        let now = self.clock.now_ms();
        let teams = records
            .iter()
            .map(|rec| {
                let mut rec = rec.clone();
                rec.cached_at = Some(now);
                (rec.name.clone(), rec)
            })
            .collect();
        let cache = PersistedCache {
            teams,
            last_fetch: now,
        };
        let json = serde_json::to_string(&cache)?;
        self.store.set(CACHE_KEY, &json)
    }

    // Storage failures are logged and the cache tier is treated as empty.
    pub fn merge(&self, live: &[TeamRecord]) -> Vec<TeamRecord> {
        let now = self.clock.now_ms();
        let mut teams = match self.read() {
            Ok(Some(cache)) => cache.teams,
            Ok(None) => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(error = %err, "team cache unreadable, using fallback tier");
                BTreeMap::new()
            }
        };

        for rec in teams.values_mut() {
            if rec.source == Source::Live {
                rec.source = Source::Cache;
            }
        }

        for rec in live {
            let mut rec = rec.clone();
            rec.source = Source::Live;
            rec.cached_at = Some(now);
            teams.insert(rec.name.clone(), rec);
        }

        for (name, rec) in fallback::table() {
            teams
                .entry(name.clone())
                .or_insert_with(|| rec.clone());
        }

        let merged: Vec<TeamRecord> = teams.into_values().collect();
        if !live.is_empty() {
            match self.write(&merged) {
                Ok(()) => tracing::debug!(teams = merged.len(), "team cache persisted"),
                Err(err) => tracing::warn!(error = %err, "failed to persist team cache"),
            }
        }
        merged
    }

    pub fn cached_or_fallback(&self) -> Vec<TeamRecord> {
        self.merge(&[])
    }

    pub fn expire_if_stale(&self) -> Result<bool, StorageError> {
        let Some(cache) = self.load()? else {
            return Ok(false);
        };
        if !self.is_expired(&cache) {
            return Ok(false);
        }
        self.store.remove(CACHE_KEY)?;
        Ok(true)
    }

    pub fn is_fresh(&self, cache: &PersistedCache) -> bool {
        self.clock.now_ms().saturating_sub(cache.last_fetch) <= self.cache_duration_ms
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(CACHE_KEY)
    }

    fn load(&self) -> Result<Option<PersistedCache>, StorageError> {
        let Some(raw) = self.store.get(CACHE_KEY)? else {
            return Ok(None);
        };
        let cache = serde_json::from_str::<PersistedCache>(&raw)?;
        Ok(Some(cache))
    }

    fn is_expired(&self, cache: &PersistedCache) -> bool {
        let age = self.clock.now_ms().saturating_sub(cache.last_fetch);
        age > self.cache_duration_ms.saturating_mul(EXPIRY_FACTOR)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::store::MemoryStore;
    use crate::team::Sport;

    struct TestClock(Cell<i64>);

    impl Clock for TestClock {
        fn now_ms(&self) -> i64 {
            self.0.get()
        }

        fn now_label(&self) -> String {
            "test".to_string()
        }
    }

    fn bears(wins: u32, losses: u32) -> TeamRecord {
        TeamRecord::new("Bears", Sport::Nfl, wins, losses, None, "now", Source::Live)
    }

    #[test]
    fn write_stamps_cached_at_and_last_fetch() {
        let cache = TeamStatsCache::with_clock(MemoryStore::new(), TestClock(Cell::new(1_000)));
        let mut rec = bears(3, 1);
        rec.source = Source::Fallback;
        cache.write(&[rec]).unwrap();

        let stored = cache.read().unwrap().unwrap();
        assert_eq!(stored.last_fetch, 1_000);
        let bears = &stored.teams["Bears"];
        assert_eq!(bears.cached_at, Some(1_000));
        assert_eq!(bears.source, Source::Fallback);
    }

    #[test]
    fn write_overwrites_previous_mapping() {
        let cache = TeamStatsCache::with_clock(MemoryStore::new(), TestClock(Cell::new(1)));
        let cubs = TeamRecord::new("Cubs", Sport::Mlb, 1, 0, None, "now", Source::Live);
        cache.write(&[cubs]).unwrap();
        cache.write(&[bears(1, 1)]).unwrap();
        let stored = cache.read().unwrap().unwrap();
        assert_eq!(stored.teams.len(), 1);
        assert!(stored.teams.contains_key("Bears"));
    }

    #[test]
    fn read_discards_entries_past_seven_durations() {
        let clock = TestClock(Cell::new(0));
        let cache = TeamStatsCache::with_clock(MemoryStore::new(), &clock)
            .with_cache_duration(Duration::from_millis(10));
        cache.write(&[bears(1, 0)]).unwrap();

        clock.0.set(70);
        assert!(cache.read().unwrap().is_some());
        clock.0.set(71);
        assert!(cache.read().unwrap().is_none());
        assert!(cache.store().get(CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn is_fresh_tracks_nominal_duration() {
        let clock = TestClock(Cell::new(0));
        let cache = TeamStatsCache::with_clock(MemoryStore::new(), &clock)
            .with_cache_duration(Duration::from_millis(10));
        let stored = PersistedCache {
            teams: BTreeMap::new(),
            last_fetch: 0,
        };
        clock.0.set(10);
        assert!(cache.is_fresh(&stored));
        clock.0.set(11);
        assert!(!cache.is_fresh(&stored));
    }

    #[test]
    fn corrupt_payload_is_an_error_for_read_but_not_merge() {
        let store = MemoryStore::new();
        store.set(CACHE_KEY, "{not json").unwrap();
        let cache = TeamStatsCache::with_clock(store, TestClock(Cell::new(5)));
        assert!(matches!(cache.read(), Err(StorageError::Codec(_))));

        let merged = cache.merge(&[]);
        assert_eq!(merged.len(), fallback::table().len());
        assert!(merged.iter().all(|r| r.source == Source::Fallback));
    }
}
