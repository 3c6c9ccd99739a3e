use anyhow::Result;

use crate::cache::TeamStatsCache;
use crate::clock::Clock;
use crate::store::KeyValueStore;
use crate::team::{Source, TeamRecord};

pub trait LiveSource {
    fn fetch_live(&self) -> Result<Vec<TeamRecord>>;
}

impl<L: LiveSource + ?Sized> LiveSource for Box<L> {
    fn fetch_live(&self) -> Result<Vec<TeamRecord>> {
        (**self).fetch_live()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl LiveSource for OfflineSource {
    fn fetch_live(&self) -> Result<Vec<TeamRecord>> {
        Err(anyhow::anyhow!("offline mode"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub teams: Vec<TeamRecord>,
    /// Set when the live tier failed and the pass fell back.
    pub live_error: Option<String>,
    /// No fresh persisted cache backs this pass.
    pub stale: bool,
    pub resolved_at_ms: i64,
}

impl Resolution {
    pub fn team(&self, name: &str) -> Option<&TeamRecord> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn count(&self, source: Source) -> usize {
        self.teams.iter().filter(|t| t.source == source).count()
    }

    pub fn is_degraded(&self) -> bool {
        self.live_error.is_some() || self.teams.iter().any(|t| t.source != Source::Live)
    }
}

pub fn resolve_team_stats<S, C, L>(cache: &TeamStatsCache<S, C>, source: &L) -> Resolution
where
    S: KeyValueStore,
    C: Clock,
    L: LiveSource + ?Sized,
{
    let (teams, live_error) = match source.fetch_live() {
        Ok(records) => {
            tracing::info!(fetched = records.len(), "live team records fetched");
            (cache.merge(&records), None)
        }
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "live fetch failed, serving cached data");
            (cache.cached_or_fallback(), Some(format!("{err:#}")))
        }
    };
    Resolution {
        teams,
        live_error,
        stale: cache_is_stale(cache),
        resolved_at_ms: cache.clock().now_ms(),
    }
}

pub fn snapshot<S: KeyValueStore, C: Clock>(cache: &TeamStatsCache<S, C>) -> Resolution {
    Resolution {
        teams: cache.cached_or_fallback(),
        live_error: None,
        stale: cache_is_stale(cache),
        resolved_at_ms: cache.clock().now_ms(),
    }
}

fn cache_is_stale<S: KeyValueStore, C: Clock>(cache: &TeamStatsCache<S, C>) -> bool {
    match cache.read() {
        Ok(Some(stored)) => !cache.is_fresh(&stored),
        Ok(None) => true,
        Err(err) => {
            tracing::debug!(error = %err, "team cache unreadable, marking stale");
            true
        }
    }
}
