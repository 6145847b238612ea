use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Wrap,
};

use standings_terminal::config::DashboardConfig;
use standings_terminal::loader::spawn_loader;
use standings_terminal::model::ClubEntry;
use standings_terminal::render::{ChartView, TableView, ViewBody, ViewModel, ViewScope};
use standings_terminal::state::{self, AppState, ProviderCommand, apply_delta, season_label};
use standings_terminal::time_series::palette_rgb;
use standings_terminal::view_mode::ViewMode;

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
}

impl App {
    fn new(config: &DashboardConfig, cmd_tx: Option<mpsc::Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(config.default_clubs.clone(), &config.standings_type),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.filter_active {
            match key.code {
                KeyCode::Esc => {
                    self.state.clear_filter();
                    self.state.filter_active = false;
                }
                KeyCode::Enter => self.state.filter_active = false,
                KeyCode::Backspace => self.state.pop_filter_char(),
                KeyCode::Char(ch) => self.state.push_filter_char(ch),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => self.state.cycle_season(true),
            KeyCode::Char('S') => self.state.cycle_season(false),
            KeyCode::Char('t') | KeyCode::Char('T') => self.state.cycle_standings_type(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_selected_club(),
            KeyCode::Char('/') => self.state.filter_active = true,
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn request_reload(&mut self) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Reload unavailable");
            return;
        };
        if tx.send(ProviderCommand::Reload).is_err() {
            self.state.push_log("[WARN] Reload request failed");
        } else {
            self.state.loading = true;
            self.state.push_log("[INFO] Reload requested");
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = DashboardConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_loader(config.source.clone(), tx, cmd_rx);

    let mut app = App::new(&config, Some(cmd_tx));
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
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
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
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
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(chunks[1]);
    render_clubs(frame, body[0], &app.state);
    render_main(frame, body[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let mode = match state.view.as_ref().and_then(|v| v.mode) {
        Some(ViewMode::Single) => "TABLE",
        Some(ViewMode::Evolution) => "EVOLUTION",
        None => "-",
    };
    let scope = match state.view.as_ref().and_then(|v| v.scope.as_ref()) {
        Some(ViewScope::Season(key)) => key.clone(),
        Some(ViewScope::CrossSeason) => "All seasons (final matchdays)".to_string(),
        Some(ViewScope::LatestSeasonFallback(key)) => format!("{key} (latest)"),
        None => season_label(state.render.season.as_deref()),
    };
    let title = format!(
        "STANDINGS | {} | Type: {} | {}",
        scope, state.render.standings_type, mode
    );
    let line1 = format!("  .-.  {title}");
    let line2 = match &state.source {
        Some(source) => format!(" /___\\ {source}"),
        None => " /___\\".to_string(),
    };
    let line3 = "  |_|".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    if state.filter_active {
        return "Type to filter | Enter Keep | Esc Clear | Backspace Delete".to_string();
    }
    "s/S Season | t Type | j/k/↑/↓ Move | Space Toggle | / Filter | r Reload | ? Help | q Quit"
        .to_string()
}

fn render_clubs(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Clubs").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let cursor = if state.filter_active { "_" } else { "" };
    let filter_style = if state.filter_active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let filter = Paragraph::new(format!("/ {}{cursor}", state.render.filter)).style(filter_style);
    frame.render_widget(
        filter,
        Rect {
            height: 1,
            ..inner
        },
    );

    let list_area = Rect {
        y: inner.y + 1,
        height: inner.height - 1,
        ..inner
    };

    let Some(view) = &state.view else {
        return;
    };
    if view.clubs.is_empty() {
        let note = view
            .note
            .clone()
            .unwrap_or_else(|| "No clubs to chart".to_string());
        let empty = Paragraph::new(note)
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, list_area);
        return;
    }

    let clubs = state.visible_clubs();
    if clubs.is_empty() {
        let empty = Paragraph::new("No club matches the filter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let (start, end) = visible_range(state.club_cursor, clubs.len(), list_area.height as usize);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let club = clubs[idx];
            let mark = if club.checked { "[x]" } else { "[ ]" };
            let mut style = match club.color_index {
                Some(color) => {
                    let (r, g, b) = palette_rgb(color);
                    Style::default().fg(Color::Rgb(r, g, b))
                }
                None => Style::default(),
            };
            if idx == state.club_cursor && !state.filter_active {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            Line::styled(format!("{mark} {}", club.name), style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_main(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(err) = &state.load_error {
        let error = Paragraph::new(err.clone())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Error").borders(Borders::ALL));
        frame.render_widget(error, area);
        return;
    }

    let Some(view) = &state.view else {
        let text = if state.loading {
            "Loading standings..."
        } else {
            "No standings loaded"
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    match &view.body {
        ViewBody::NoData(reason) => render_no_data(frame, area, &reason.message(), view),
        ViewBody::Table(table) => render_table(frame, area, table),
        ViewBody::Chart(chart) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(60), Constraint::Min(5)])
                .split(area);
            render_chart(frame, rows[0], chart);
            render_table(frame, rows[1], &chart.latest);
        }
    }
}

fn render_no_data(frame: &mut Frame, area: Rect, message: &str, view: &ViewModel) {
    let mut text = message.to_string();
    if let Some(note) = &view.note {
        text.push('\n');
        text.push_str(note);
    }
    let empty = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title("Standings").borders(Borders::ALL));
    frame.render_widget(empty, area);
}

fn render_table(frame: &mut Frame, area: Rect, table: &TableView) {
    let header = Row::new(
        ["Pos", "Club", "Pts", "P", "GD", "W", "D", "L", "GF", "GA"]
            .into_iter()
            .map(Cell::from),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = table.rows.iter().map(table_row).collect();
    let widths = [
        Constraint::Length(4),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(table.caption.clone()).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn table_row(club: &ClubEntry) -> Row<'static> {
    let cell = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
    Row::new(vec![
        cell(club.position),
        club.name.clone(),
        cell(club.points),
        cell(club.played),
        cell(club.goal_difference),
        cell(club.wins),
        cell(club.draws),
        cell(club.losses),
        cell(club.goals_for),
        cell(club.goals_against),
    ])
}

fn render_chart(frame: &mut Frame, area: Rect, chart: &ChartView) {
    if chart.series.is_empty() {
        let empty = Paragraph::new("Tick clubs on the left to chart their rank")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Rank").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let max_rank = chart
        .series
        .iter()
        .flat_map(|s| s.positions.iter().flatten())
        .copied()
        .max()
        .unwrap_or(1)
        .max(20);
    // Rank 1 plots at the top.
    let plot_y = |pos: i64| (max_rank + 1 - pos) as f64;

    // Each run of consecutive points is its own line so absences stay gaps.
    let mut runs: Vec<(usize, bool, Vec<(f64, f64)>)> = Vec::new();
    for (idx, series) in chart.series.iter().enumerate() {
        let points: Vec<(f64, f64)> = series
            .positions
            .iter()
            .enumerate()
            .filter_map(|(x, pos)| pos.map(|p| (x as f64, plot_y(p))))
            .collect();
        runs.push((idx, true, points));
        for segment in series.segments() {
            let line = segment
                .into_iter()
                .map(|(x, p)| (x as f64, plot_y(p)))
                .collect();
            runs.push((idx, false, line));
        }
    }

    let datasets: Vec<Dataset> = runs
        .iter()
        .map(|(idx, is_points, data)| {
            let series = &chart.series[*idx];
            let (r, g, b) = series.color();
            let mut dataset = Dataset::default()
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Rgb(r, g, b)))
                .data(data);
            if *is_points {
                dataset = dataset.graph_type(GraphType::Scatter).name(series.club.clone());
            } else {
                dataset = dataset.graph_type(GraphType::Line);
            }
            dataset
        })
        .collect();

    let last_x = chart.labels.len().saturating_sub(1);
    let x_labels: Vec<Span> = axis_ticks(&chart.labels)
        .into_iter()
        .map(Span::raw)
        .collect();
    let mid = (max_rank + 1) / 2;
    let y_labels = vec![
        Span::raw(max_rank.to_string()),
        Span::raw(mid.to_string()),
        Span::raw("1"),
    ];

    let widget = Chart::new(datasets)
        .block(Block::default().title("Rank").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, last_x.max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.5, max_rank as f64 + 0.5])
                .labels(y_labels),
        );
    frame.render_widget(widget, area);
}

fn axis_ticks(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.to_vec(),
        n => vec![
            labels[0].clone(),
            labels[n / 2].clone(),
            labels[n - 1].clone(),
        ],
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(4);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Standings Terminal - Help",
        "",
        "View:",
        "  s / S        Next / previous season (first is all seasons)",
        "  t            Cycle standings type",
        "  r            Reload data",
        "",
        "Clubs:",
        "  j/k or ↑/↓   Move",
        "  Space/Enter  Tick / untick for the chart",
        "  /            Filter by name (Esc clears)",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
