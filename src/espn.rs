use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;

use crate::clock::{Clock, SystemClock};
use crate::http_client::http_client;
use crate::stats::LiveSource;
use crate::team::{ROSTER, Sport, Source, TeamRecord, TeamSpec};

pub const ESPN_API_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";

#[derive(Debug, Clone)]
pub struct EspnSource {
    base_url: String,
    roster: &'static [TeamSpec],
}

impl EspnSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            roster: ROSTER,
        }
    }

    pub fn with_roster(mut self, roster: &'static [TeamSpec]) -> Self {
        self.roster = roster;
        self
    }

    pub fn team_url(&self, spec: &TeamSpec) -> String {
        format!(
            "{}/{}/teams/{}",
            self.base_url.trim_end_matches('/'),
            spec.sport.espn_path(),
            spec.espn_slug
        )
    }

    fn fetch_team(&self, spec: &TeamSpec, updated_label: &str) -> Result<TeamRecord> {
        let client = http_client()?;
        let url = self.team_url(spec);
        let resp = client
            .get(&url)
            .send()
            .with_context(|| format!("{} request failed", spec.name))?;
        let status = resp.status();
        let body = resp
            .text()
            .with_context(|| format!("{} body unreadable", spec.name))?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("{}: http {}", spec.name, status));
        }
        parse_espn_team_json(&body, spec, updated_label)
    }
}

impl Default for EspnSource {
    fn default() -> Self {
        Self::new(ESPN_API_BASE)
    }
}

impl LiveSource for EspnSource {
    fn fetch_live(&self) -> Result<Vec<TeamRecord>> {
        let updated_label = SystemClock.now_label();
        let results: Vec<(&TeamSpec, Result<TeamRecord>)> = self
            .roster
            .par_iter()
            .map(|spec| (spec, self.fetch_team(spec, &updated_label)))
            .collect();

        let mut out = Vec::with_capacity(results.len());
        let mut first_err = None;
        for (spec, res) in results {
            match res {
                Ok(rec) => out.push(rec),
                Err(err) => {
                    tracing::warn!(team = spec.name, error = %format!("{err:#}"), "team fetch failed");
                    first_err.get_or_insert(err);
                }
            }
        }

        match (out.is_empty(), first_err) {
            (true, Some(err)) => Err(err.context("all team fetches failed")),
            _ => Ok(out),
        }
    }
}

pub fn parse_espn_team_json(raw: &str, spec: &TeamSpec, updated_label: &str) -> Result<TeamRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty team response"));
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid team json")?;

    let items = v
        .get("team")
        .and_then(|t| t.get("record"))
        .and_then(|r| r.get("items"))
        .and_then(|i| i.as_array())
        .context("team record missing")?;
    let item = items
        .iter()
        .find(|item| item.get("type").and_then(|t| t.as_str()) == Some("total"))
        .or_else(|| items.first())
        .context("team record has no items")?;

    let wins = stat_u32(item, &["wins"]).context("wins missing")?;
    let losses = stat_u32(item, &["losses"]).context("losses missing")?;
    let tie_keys: &[&str] = match spec.sport {
        Sport::Nhl => &["OTLosses", "overtimeLosses", "ties"],
        _ => &["ties"],
    };
    let ties = stat_u32(item, tie_keys).filter(|t| *t > 0);

    let mut rec = TeamRecord::new(
        spec.name,
        spec.sport,
        wins,
        losses,
        ties,
        updated_label,
        Source::Live,
    );
    if let Some(summary) = item
        .get("summary")
        .and_then(|s| s.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        rec.record = summary.to_string();
    }
    Ok(rec)
}

fn stat_u32(item: &Value, names: &[&str]) -> Option<u32> {
    let stats = item.get("stats")?.as_array()?;
    names.iter().find_map(|name| {
        stats
            .iter()
            .find(|s| s.get("name").and_then(|n| n.as_str()) == Some(*name))
            .and_then(|s| s.get("value"))
            .and_then(|v| v.as_f64())
            .filter(|v| *v >= 0.0)
            .map(|v| v.round() as u32)
    })
}
