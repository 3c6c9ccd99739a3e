use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::cache::TeamStatsCache;
use crate::clock::Clock;
use crate::state::{Delta, ProviderCommand};
use crate::stats::{LiveSource, resolve_team_stats, snapshot};
use crate::store::KeyValueStore;

/// Streams the cached snapshot, then one resolution pass per command or
/// refresh interval. Stops once either channel disconnects.
pub fn spawn_provider<S, C, L>(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    cache: TeamStatsCache<S, C>,
    source: L,
    refresh_interval: Duration,
) -> JoinHandle<()>
where
    S: KeyValueStore + Send + 'static,
    C: Clock + Send + 'static,
    L: LiveSource + Send + 'static,
{
    thread::spawn(move || {
        if tx.send(Delta::SetTeams(snapshot(&cache))).is_err() {
            return;
        }

        loop {
            if tx.send(Delta::Refreshing).is_err() {
                return;
            }
            let resolution = resolve_team_stats(&cache, &source);
            if tx.send(Delta::SetTeams(resolution)).is_err() {
                return;
            }

            match cmd_rx.recv_timeout(refresh_interval) {
                Ok(ProviderCommand::Refresh) => {
                    let _ = tx.send(Delta::Log("[INFO] Manual refresh".to_string()));
                }
                Ok(ProviderCommand::ClearCache) => {
                    let msg = match cache.clear() {
                        Ok(()) => "[INFO] Cache cleared".to_string(),
                        Err(err) => {
                            tracing::warn!(error = %err, "failed to clear team cache");
                            format!("[WARN] Cache clear failed: {err}")
                        }
                    };
                    let _ = tx.send(Delta::Log(msg));
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    })
}
