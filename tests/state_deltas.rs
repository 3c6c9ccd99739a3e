use chicago_sports::state::{AppState, Delta, Screen, apply_delta};
use chicago_sports::stats::Resolution;
use chicago_sports::team::{Source, Sport, TeamRecord};

fn team(name: &str, wins: u32, losses: u32, source: Source) -> TeamRecord {
    TeamRecord::new(name, Sport::Mlb, wins, losses, None, "now", source)
}

fn resolution(teams: Vec<TeamRecord>, live_error: Option<&str>) -> Resolution {
    Resolution {
        teams,
        live_error: live_error.map(str::to_string),
        stale: live_error.is_some(),
        resolved_at_ms: 42,
    }
}

#[test]
fn set_teams_keeps_selection_by_name() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetTeams(resolution(
            vec![
                team("Bears", 1, 1, Source::Fallback),
                team("Cubs", 1, 1, Source::Fallback),
                team("White Sox", 1, 1, Source::Fallback),
            ],
            None,
        )),
    );
    state.select_next();
    state.select_next();
    assert_eq!(state.selected_team().map(|t| t.name.as_str()), Some("White Sox"));

    // A new pass adds a team ahead of the selection.
    apply_delta(
        &mut state,
        Delta::SetTeams(resolution(
            vec![
                team("Bears", 2, 1, Source::Live),
                team("Bulls", 2, 1, Source::Live),
                team("Cubs", 2, 1, Source::Live),
                team("White Sox", 2, 1, Source::Live),
            ],
            None,
        )),
    );
    assert_eq!(state.selected_team().map(|t| t.name.as_str()), Some("White Sox"));
    assert_ne!(state.opponent, state.selected);
    assert_eq!(state.last_resolved_ms, Some(42));
}

#[test]
fn live_error_is_logged_and_cleared() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Refreshing);
    assert!(state.refreshing);

    apply_delta(
        &mut state,
        Delta::SetTeams(resolution(vec![team("Cubs", 1, 1, Source::Cache)], Some("timeout"))),
    );
    assert!(!state.refreshing);
    assert_eq!(state.live_error.as_deref(), Some("timeout"));
    assert!(state.stale);
    assert!(state.logs.back().is_some_and(|l| l.contains("timeout")));

    apply_delta(
        &mut state,
        Delta::SetTeams(resolution(vec![team("Cubs", 2, 1, Source::Live)], None)),
    );
    assert!(state.live_error.is_none());
    assert!(!state.stale);
}

#[test]
fn matchup_follows_home_toggle() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetTeams(resolution(
            vec![team("Cubs", 9, 3, Source::Live), team("White Sox", 4, 8, Source::Live)],
            None,
        )),
    );
    state.screen = Screen::Matchup;

    let home = state.current_matchup().expect("two teams");
    assert_eq!(home.team_pct, 89);
    state.toggle_home();
    let away = state.current_matchup().expect("two teams");
    assert_eq!(away.team_pct, 83);
    assert_eq!(away.opponent_pct, 17);
}

#[test]
fn log_delta_is_appended() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Log("[INFO] hello".to_string()));
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] hello"));
}
