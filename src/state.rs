use std::collections::VecDeque;

use crate::stats::Resolution;
use crate::team::TeamRecord;
use crate::win_prob::{self, Matchup};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Board,
    Matchup,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    SetTeams(Resolution),
    Refreshing,
    Log(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Refresh,
    ClearCache,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub teams: Vec<TeamRecord>,
    pub selected: usize,
    /// Index into `teams`; never equal to `selected` once two teams exist.
    pub opponent: usize,
    pub selected_is_home: bool,
    pub help_overlay: bool,
    pub refreshing: bool,
    pub live_error: Option<String>,
    pub stale: bool,
    pub last_resolved_ms: Option<i64>,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            screen: Screen::Board,
            teams: Vec::new(),
            selected: 0,
            opponent: 0,
            selected_is_home: true,
            help_overlay: false,
            refreshing: false,
            live_error: None,
            stale: false,
            last_resolved_ms: None,
            logs: VecDeque::new(),
        }
    }

    pub fn selected_team(&self) -> Option<&TeamRecord> {
        self.teams.get(self.selected)
    }

    pub fn opponent_team(&self) -> Option<&TeamRecord> {
        if self.opponent == self.selected {
            return None;
        }
        self.teams.get(self.opponent)
    }

    pub fn current_matchup(&self) -> Option<Matchup> {
        let team = self.selected_team()?;
        let opponent = self.opponent_team()?;
        Some(win_prob::matchup(team, opponent, self.selected_is_home))
    }

    pub fn select_next(&mut self) {
        if self.teams.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.teams.len() - 1);
        self.fix_opponent();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.fix_opponent();
    }

    pub fn cycle_opponent(&mut self) {
        let len = self.teams.len();
        if len < 2 {
            return;
        }
        self.opponent = (self.opponent + 1) % len;
        if self.opponent == self.selected {
            self.opponent = (self.opponent + 1) % len;
        }
    }

    pub fn toggle_home(&mut self) {
        self.selected_is_home = !self.selected_is_home;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    fn clamp_selection(&mut self) {
        if self.teams.is_empty() {
            self.selected = 0;
            self.opponent = 0;
            return;
        }
        self.selected = self.selected.min(self.teams.len() - 1);
        self.opponent = self.opponent.min(self.teams.len() - 1);
        self.fix_opponent();
    }

    fn fix_opponent(&mut self) {
        let len = self.teams.len();
        if len >= 2 && self.opponent == self.selected {
            self.opponent = (self.selected + 1) % len;
        }
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.teams.iter().position(|t| t.name == name)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetTeams(resolution) => {
            let selected_name = state.selected_team().map(|t| t.name.clone());
            let opponent_name = state.opponent_team().map(|t| t.name.clone());

            state.teams = resolution.teams;
            state.refreshing = false;
            state.stale = resolution.stale;
            state.last_resolved_ms = Some(resolution.resolved_at_ms);

            if let Some(idx) = selected_name.and_then(|n| state.index_of(&n)) {
                state.selected = idx;
            }
            if let Some(idx) = opponent_name.and_then(|n| state.index_of(&n)) {
                state.opponent = idx;
            }
            state.clamp_selection();

            match resolution.live_error {
                Some(err) => {
                    state.push_log(format!("[WARN] Live fetch failed: {err}"));
                    state.live_error = Some(err);
                }
                None => {
                    state.push_log(format!("[INFO] Updated {} teams", state.teams.len()));
                    state.live_error = None;
                }
            }
        }
        Delta::Refreshing => state.refreshing = true,
        Delta::Log(msg) => state.push_log(msg),
    }
}
