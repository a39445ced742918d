use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gpa_ledger::{
    format_average, label_for_points, load_ledger, load_theme, save_ledger, save_theme,
    CourseRecord, CreditHours, GpaTier, Grade, KeyValueStore, Ledger, Theme,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long the "pick a grade" cue stays up
pub const ERROR_CUE: Duration = Duration::from_millis(500);

const TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum AddCourseError {
    #[error("Select a grade first")]
    NoGradeSelected,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub struct App {
    pub ledger: Ledger,
    pub theme: Theme,
    pub state: TableState,
    /// `None` until the user picks a grade; reset after every add
    pub grade_cursor: Option<usize>,
    pub credit_cursor: usize,
    pub status: Option<String>,
    error_cue_until: Option<Instant>,
    store: Box<dyn KeyValueStore>,
}

impl App {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        let ledger = load_ledger(store.as_ref());
        let theme = load_theme(store.as_ref());

        let mut state = TableState::default();
        if !ledger.is_empty() {
            state.select(Some(0));
        }

        let default_credits = CreditHours::default();
        let credit_cursor = CreditHours::ALL
            .iter()
            .position(|h| *h == default_credits)
            .unwrap_or(0);

        Self {
            ledger,
            theme,
            state,
            grade_cursor: None,
            credit_cursor,
            status: None,
            error_cue_until: None,
            store,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn selected_grade(&self) -> Option<Grade> {
        self.grade_cursor.and_then(|i| Grade::ALL.get(i).copied())
    }

    pub fn selected_credits(&self) -> CreditHours {
        CreditHours::ALL[self.credit_cursor % CreditHours::ALL.len()]
    }

    pub fn next_grade(&mut self) {
        let len = Grade::ALL.len();
        self.grade_cursor = Some(match self.grade_cursor {
            Some(i) if i + 1 < len => i + 1,
            Some(_) | None => 0,
        });
    }

    pub fn previous_grade(&mut self) {
        let len = Grade::ALL.len();
        self.grade_cursor = Some(match self.grade_cursor {
            Some(i) if i > 0 => i - 1,
            Some(_) | None => len - 1,
        });
    }

    pub fn next_credits(&mut self) {
        self.credit_cursor = (self.credit_cursor + 1) % CreditHours::ALL.len();
    }

    pub fn previous_credits(&mut self) {
        let len = CreditHours::ALL.len();
        self.credit_cursor = (self.credit_cursor + len - 1) % len;
    }

    /// Add the selected grade and credit hours as a course, then persist.
    /// Without a grade the ledger is untouched and the error cue starts.
    pub fn add_course(&mut self, now: Instant) -> Result<CourseRecord, AddCourseError> {
        let Some(grade) = self.selected_grade() else {
            self.error_cue_until = Some(now + ERROR_CUE);
            return Err(AddCourseError::NoGradeSelected);
        };

        let record = self.ledger.append(grade, self.selected_credits());
        self.grade_cursor = None;
        self.state.select(Some(self.ledger.len() - 1));
        save_ledger(self.store.as_ref(), &self.ledger)?;

        Ok(record)
    }

    /// Remove the highlighted row, then persist
    pub fn remove_selected(&mut self) -> Result<Option<CourseRecord>> {
        let Some(index) = self.state.selected() else {
            return Ok(None);
        };

        let removed = self.ledger.remove_at(index);
        if removed.is_none() {
            return Ok(None);
        }

        if self.ledger.is_empty() {
            self.state.select(None);
        } else if index >= self.ledger.len() {
            self.state.select(Some(self.ledger.len() - 1));
        }

        save_ledger(self.store.as_ref(), &self.ledger)?;
        Ok(removed)
    }

    pub fn toggle_theme(&mut self) -> Result<()> {
        self.theme = self.theme.toggle();
        save_theme(self.store.as_ref(), self.theme)
    }

    pub fn error_cue_active(&self, now: Instant) -> bool {
        self.error_cue_until.map(|until| now < until).unwrap_or(false)
    }

    /// Drop the error cue once it has expired
    pub fn tick(&mut self, now: Instant) {
        if !self.error_cue_active(now) {
            self.error_cue_until = None;
        }
    }

    pub fn next(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.ledger.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Apply one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Char('l') => self.next_grade(),
            KeyCode::Left | KeyCode::Char('h') => self.previous_grade(),
            KeyCode::Char(']') => self.next_credits(),
            KeyCode::Char('[') => self.previous_credits(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter | KeyCode::Char('a') => match self.add_course(now) {
                Ok(record) => {
                    self.status = Some(format!(
                        "Added {} × {} credits",
                        label_for_points(record.grade()),
                        record.credit_hours()
                    ));
                }
                Err(AddCourseError::NoGradeSelected) => {
                    self.status = Some(AddCourseError::NoGradeSelected.to_string());
                }
                Err(AddCourseError::Storage(e)) => {
                    tracing::error!(error = %e, "failed to save courses");
                    self.status = Some(format!("Save failed: {}", e));
                }
            },
            KeyCode::Char('d') | KeyCode::Delete => match self.remove_selected() {
                Ok(Some(record)) => {
                    self.status = Some(format!("Removed {}", label_for_points(record.grade())));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(error = %e, "failed to save courses");
                    self.status = Some(format!("Save failed: {}", e));
                }
            },
            KeyCode::Char('t') => {
                if let Err(e) = self.toggle_theme() {
                    tracing::error!(error = %e, "failed to save theme");
                    self.status = Some(format!("Save failed: {}", e));
                }
            }
            _ => {}
        }
        false
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        let now = Instant::now();
        app.tick(now);
        terminal.draw(|f| ui(f, app, now))?;

        // Poll so the error cue can expire without a key press
        if !event::poll(TICK)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key, Instant::now()) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App, now: Instant) {
    let palette = app.theme.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(rgb(palette.background))),
        f.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Grade / credit selectors
            Constraint::Min(0),    // Course table
            Constraint::Length(3), // GPA readout
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_selectors(f, chunks[1], app, now);
    render_table(f, chunks[2], app);
    render_gpa(f, chunks[3], app);
    render_status_bar(f, chunks[4], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "GPA Calculator",
            Style::default()
                .fg(rgb(palette.accent))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Courses: {}", app.ledger.len()),
            Style::default().fg(rgb(palette.foreground)),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Credits: {}", app.ledger.total_credit_hours()),
            Style::default().fg(rgb(palette.foreground)),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("{} {}", app.theme.icon(), app.theme),
            Style::default().fg(rgb(palette.muted)),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(palette.accent))),
    );

    f.render_widget(header, area);
}

fn render_selectors(f: &mut Frame, area: Rect, app: &App, now: Instant) {
    let palette = app.theme.palette();
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let cue = app.error_cue_active(now);
    let (grade_text, grade_style) = match app.selected_grade() {
        Some(grade) => (grade.label(), Style::default().fg(rgb(palette.foreground))),
        None => (
            "Select grade".to_string(),
            Style::default().fg(rgb(palette.muted)),
        ),
    };
    let grade_border = if cue {
        Style::default()
            .fg(rgb(palette.error))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(rgb(palette.muted))
    };

    let grade = Paragraph::new(Line::from(vec![
        Span::raw("◀ "),
        Span::styled(grade_text, grade_style),
        Span::raw(" ▶"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(grade_border)
            .title(" Grade (←/→) "),
    );

    let credits = Paragraph::new(Line::from(vec![
        Span::raw("◀ "),
        Span::styled(
            format!("{} credit hours", app.selected_credits()),
            Style::default().fg(rgb(palette.foreground)),
        ),
        Span::raw(" ▶"),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(palette.muted)))
            .title(" Credits ([/]) "),
    );

    f.render_widget(grade, halves[0]);
    f.render_widget(credits, halves[1]);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let palette = app.theme.palette();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(palette.foreground)))
        .title(" Courses ");

    if app.ledger.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No courses added yet. Pick a grade and press Enter.",
                Style::default()
                    .fg(rgb(palette.muted))
                    .add_modifier(Modifier::ITALIC),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header_cells = ["Grade", "Credit Hours", "Grade Points"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(rgb(palette.accent))
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells).height(1);

    let rows = app.ledger.iter().map(|course| {
        Row::new(vec![
            Cell::from(label_for_points(course.grade())),
            Cell::from(course.credit_hours().to_string()),
            Cell::from(format!("{:.2}", course.grade_points())),
        ])
        .style(Style::default().fg(rgb(palette.foreground)))
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(
        Style::default()
            .fg(rgb(palette.background))
            .bg(rgb(palette.accent))
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_gpa(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let average = app.ledger.compute_average();

    let value_style = match average {
        Some(gpa) => Style::default()
            .fg(rgb(GpaTier::from_average(gpa).rgb()))
            .add_modifier(Modifier::BOLD),
        None => Style::default().fg(rgb(palette.muted)),
    };

    let gpa = Paragraph::new(Line::from(vec![
        Span::styled("Current GPA: ", Style::default().fg(rgb(palette.foreground))),
        Span::styled(format_average(average), value_style),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(palette.accent))),
    );

    f.render_widget(gpa, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let palette = app.theme.palette();
    let key = Style::default().fg(rgb(palette.accent));

    let mut status_spans = Vec::new();
    if let Some(message) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", message),
            Style::default().fg(rgb(palette.foreground)),
        ));
        status_spans.push(Span::raw("| "));
    }

    status_spans.push(Span::styled("Enter", key));
    status_spans.push(Span::raw(" Add | "));
    status_spans.push(Span::styled("d", key));
    status_spans.push(Span::raw(" Remove | "));
    status_spans.push(Span::styled("↑/↓", key));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("t", key));
    status_spans.push(Span::raw(" Theme | "));
    status_spans.push(Span::styled("q", Style::default().fg(rgb(palette.error))));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rgb(palette.muted))),
    );

    f.render_widget(status_bar, area);
}
