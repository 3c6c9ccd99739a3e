use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{Local, TimeZone};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing_subscriber::EnvFilter;

use chicago_sports::cache::TeamStatsCache;
use chicago_sports::config::{self, Config};
use chicago_sports::espn::EspnSource;
use chicago_sports::provider::spawn_provider;
use chicago_sports::state::{self, AppState, ProviderCommand, Screen, apply_delta};
use chicago_sports::stats::{LiveSource, OfflineSource};
use chicago_sports::store::{FileStore, KeyValueStore, MemoryStore};
use chicago_sports::team::{Source, TeamRecord};
use chicago_sports::win_prob::{ProbabilityColor, probability_color, probability_label};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('m') | KeyCode::Enter => self.state.screen = Screen::Matchup,
            KeyCode::Char('b') | KeyCode::Esc => self.state.screen = Screen::Board,
            KeyCode::Char('o') => self.state.cycle_opponent(),
            KeyCode::Char('h') => self.state.toggle_home(),
            KeyCode::Char('r') => self.send_command(ProviderCommand::Refresh, "Refresh"),
            KeyCode::Char('c') => self.send_command(ProviderCommand::ClearCache, "Cache clear"),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send_command(&mut self, cmd: ProviderCommand, what: &str) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
        } else {
            self.state.push_log(format!("[INFO] {what} requested"));
        }
    }
}

fn main() -> anyhow::Result<()> {
    config::load_env_files();
    let cfg = Config::from_env();
    init_logging(&cfg)?;

    let store: Box<dyn KeyValueStore + Send> = match cfg
        .cache_dir
        .clone()
        .map(FileStore::new)
        .or_else(FileStore::in_user_cache)
    {
        Some(store) => {
            tracing::info!(dir = %store.dir().display(), "using file cache");
            Box::new(store)
        }
        None => {
            tracing::warn!("no cache directory available, cache is in-memory only");
            Box::new(MemoryStore::new())
        }
    };
    let cache = TeamStatsCache::new(store).with_cache_duration(cfg.cache_duration);
    let source: Box<dyn LiveSource + Send> = if cfg.offline {
        Box::new(OfflineSource)
    } else {
        Box::new(EspnSource::new(cfg.espn_base_url.clone()))
    };

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(tx, cmd_rx, cache, source, cfg.refresh_interval);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(cmd_tx);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn init_logging(cfg: &Config) -> anyhow::Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cfg.log_path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chicago_sports=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.on_key(key);
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Board => render_board(frame, chunks[1], &app.state),
        Screen::Matchup => render_matchup(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let screen = match state.screen {
        Screen::Board => "Board",
        Screen::Matchup => "Matchup",
    };
    let updated = state
        .last_resolved_ms
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let status = if state.refreshing {
        "refreshing..."
    } else if state.live_error.is_some() {
        "offline data"
    } else {
        "ok"
    };
    let stale = if state.stale { " | stale" } else { "" };
    format!("CHICAGO SPORTS | {screen} | Updated {updated} | {status}{stale}")
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.screen {
        Screen::Board => "j/k Move | Enter/m Matchup | r Refresh | c Clear cache | ? Help | q Quit",
        Screen::Matchup => "o Opponent | h Home/Away | j/k Team | b/Esc Back | r Refresh | q Quit",
    };
    match state.logs.back() {
        Some(last) => format!("{keys}\n{last}"),
        None => keys.to_string(),
    }
}

fn board_columns() -> [Constraint; 6] {
    [
        Constraint::Length(12),
        Constraint::Length(5),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(9),
        Constraint::Min(10),
    ]
}

fn render_board(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = board_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    for (col, title) in header_cols
        .iter()
        .zip(["Team", "Lg", "Record", "Pct", "Source", "Updated"])
    {
        frame.render_widget(Paragraph::new(title).style(bold), *col);
    }

    let list_area = sections[1];
    if state.teams.is_empty() {
        let empty = Paragraph::new("Loading team records...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    for (i, team) in state.teams.iter().enumerate() {
        let y = list_area.y + i as u16;
        if y >= list_area.y + list_area.height {
            break;
        }
        let row_area = Rect {
            x: list_area.x,
            y,
            width: list_area.width,
            height: 1,
        };
        let row_style = if i == state.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        frame.render_widget(Block::default().style(row_style), row_area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        let pct = team
            .win_pct()
            .map(|p| format!("{p:.3}"))
            .unwrap_or_else(|| "-".to_string());

        frame.render_widget(Paragraph::new(team.name.as_str()).style(row_style), cols[0]);
        frame.render_widget(Paragraph::new(team.sport.label()).style(row_style), cols[1]);
        frame.render_widget(Paragraph::new(team.record.as_str()).style(row_style), cols[2]);
        frame.render_widget(Paragraph::new(pct).style(row_style), cols[3]);
        frame.render_widget(
            Paragraph::new(team.source.label()).style(row_style.fg(source_color(team.source))),
            cols[4],
        );
        frame.render_widget(
            Paragraph::new(team.last_updated.as_str()).style(row_style),
            cols[5],
        );
    }
}

fn render_matchup(frame: &mut Frame, area: Rect, state: &AppState) {
    let (Some(team), Some(opponent), Some(m)) = (
        state.selected_team(),
        state.opponent_team(),
        state.current_matchup(),
    ) else {
        let empty = Paragraph::new("Need at least two teams for a matchup")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let venue = if state.selected_is_home { "vs" } else { "@" };
    let bar_width = area.width.saturating_sub(30).max(10) as usize;
    let lines = vec![
        Line::from(Span::styled(
            format!("{} ({}) {venue} {} ({})", team.name, team.record, opponent.name, opponent.record),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        probability_line(team, m.team_pct, bar_width),
        probability_line(opponent, m.opponent_pct, bar_width),
        Line::from(""),
        Line::from(format!("{}: {}", team.name, m.label)),
        Line::from(format!(
            "{}: {}",
            opponent.name,
            probability_label(m.opponent_pct)
        )),
    ];
    let panel = Paragraph::new(lines).block(
        Block::default()
            .title("Win probability (Log5)")
            .borders(Borders::ALL),
    );
    frame.render_widget(panel, area);
}

fn probability_line(team: &TeamRecord, pct: u8, width: usize) -> Line<'static> {
    let filled = width * pct as usize / 100;
    let color = tone_color(probability_color(pct));
    Line::from(vec![
        Span::raw(format!("{:<12}", team.name)),
        Span::styled("█".repeat(filled), Style::default().fg(color)),
        Span::styled(
            "░".repeat(width - filled),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!(" {pct:>3}%"), Style::default().fg(color)),
    ])
}

fn tone_color(tone: ProbabilityColor) -> Color {
    match tone {
        ProbabilityColor::Green => Color::Green,
        ProbabilityColor::Blue => Color::Blue,
        ProbabilityColor::Yellow => Color::Yellow,
        ProbabilityColor::Orange => Color::LightRed,
        ProbabilityColor::Red => Color::Red,
    }
}

fn source_color(source: Source) -> Color {
    match source {
        Source::Live => Color::Green,
        Source::Cache => Color::Yellow,
        Source::Fallback => Color::Red,
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Chicago Sports - Help",
        "",
        "  j/k or ↑/↓   Select team",
        "  Enter / m    Matchup view",
        "  o            Next opponent",
        "  h            Toggle home/away",
        "  r            Refresh now",
        "  c            Clear cache and refresh",
        "  b / Esc      Back to board",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Source: live = fetched this pass, cache = last good fetch,",
        "fallback = built-in season records.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
