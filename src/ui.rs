use anyhow::Result;
use chrono::{Datelike, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::Decimal;
use std::io;
use tracing::warn;

use spending_lens::{
    MonthWindow, SortDirection, SortKey, SortSpec, Transaction, TransactionStore, MONTH_NAMES,
};

const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Transactions,
    Categories,
    Chart,
    TimeRange,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Transactions => Page::Categories,
            Page::Categories => Page::Chart,
            Page::Chart => Page::TimeRange,
            Page::TimeRange => Page::Transactions,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Transactions => Page::TimeRange,
            Page::Categories => Page::Transactions,
            Page::Chart => Page::Categories,
            Page::TimeRange => Page::Chart,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Transactions => "Transactions",
            Page::Categories => "Categories",
            Page::Chart => "Chart",
            Page::TimeRange => "Time Range",
        }
    }
}

/// One row of the category page
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRow {
    pub category: String,
    pub amount: Decimal,
    pub share: f64,
    pub selected: bool,
}

pub struct App {
    pub store: TransactionStore,
    pub state: TableState,
    pub category_state: TableState,
    pub current_page: Page,
    pub sort: Option<SortSpec>,
    pub window: MonthWindow,
    pub window_applied: bool,
    pub year: i32,
    pub show_detail: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(store: TransactionStore) -> Self {
        // The slider works on the most recent year in the data
        let year = store
            .transactions()
            .iter()
            .map(|tx| tx.date.year())
            .max()
            .unwrap_or_else(|| Local::now().year());

        let mut app = Self {
            store,
            state: TableState::default(),
            category_state: TableState::default(),
            current_page: Page::Transactions,
            sort: None,
            window: MonthWindow::default(),
            window_applied: false,
            year,
            show_detail: false,
            status: None,
        };
        app.reset_selection();
        app
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Transactions in table order
    pub fn visible_transactions(&self) -> Vec<&Transaction> {
        self.store.sorted_view(self.sort)
    }

    pub fn selected_transaction(&self) -> Option<&Transaction> {
        let i = self.state.selected()?;
        self.visible_transactions().get(i).copied()
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = Some(SortSpec::toggled(self.sort, key));
    }

    pub fn category_rows(&self) -> Vec<CategoryRow> {
        let overall = self.store.overall();
        let selected = &self.store.criteria().categories;

        self.store
            .categories()
            .into_iter()
            .map(|category| CategoryRow {
                amount: overall
                    .category_totals
                    .get(&category)
                    .copied()
                    .unwrap_or_default(),
                share: overall.share_of(&category),
                selected: selected.contains(&category),
                category,
            })
            .collect()
    }

    /// Focus the highlighted category, or clear focus if it already has it
    pub fn toggle_selected_category(&mut self) {
        let rows = self.category_rows();
        if let Some(row) = self.category_state.selected().and_then(|i| rows.get(i)) {
            self.store.toggle_focus(&row.category);
            self.state.select(if self.store.filtered().is_empty() { None } else { Some(0) });
        }
    }

    // ------------------------------------------------------------------------
    // Month window
    // ------------------------------------------------------------------------

    pub fn shift_window_left(&mut self) {
        self.window.shift_left();
        self.refresh_window();
    }

    pub fn shift_window_right(&mut self) {
        self.window.shift_right();
        self.refresh_window();
    }

    pub fn grow_window(&mut self) {
        self.window.grow();
        self.refresh_window();
    }

    pub fn shrink_window(&mut self) {
        self.window.shrink();
        self.refresh_window();
    }

    pub fn apply_window(&mut self) {
        match self.window.to_range(self.year) {
            Ok(range) => {
                self.store.set_date_range(Some(range));
                self.window_applied = true;
                self.status = None;
            }
            Err(e) => {
                warn!(error = %e, "Could not apply month window");
                self.status = Some(e.to_string());
            }
        }
        self.reset_selection();
    }

    pub fn clear_window(&mut self) {
        self.store.set_date_range(None);
        self.window_applied = false;
        self.reset_selection();
    }

    /// An applied window follows the slider
    fn refresh_window(&mut self) {
        if self.window_applied {
            self.apply_window();
        }
    }

    pub fn clear_filters(&mut self) {
        self.store.clear_filters();
        self.window_applied = false;
        self.reset_selection();
    }

    fn reset_selection(&mut self) {
        self.state
            .select(if self.store.filtered().is_empty() { None } else { Some(0) });
        self.category_state
            .select(if self.store.categories().is_empty() { None } else { Some(0) });
    }

    // ------------------------------------------------------------------------
    // Navigation (acts on the table of the current page)
    // ------------------------------------------------------------------------

    fn active_table(&mut self) -> (&mut TableState, usize) {
        match self.current_page {
            Page::Categories => {
                let len = self.store.categories().len();
                (&mut self.category_state, len)
            }
            _ => {
                let len = self.store.filtered().len();
                (&mut self.state, len)
            }
        }
    }

    pub fn next(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = match state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| (i + PAGE_JUMP).min(len - 1)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let (state, len) = self.active_table();
        if len == 0 {
            return;
        }
        let i = state.selected().map(|i| i.saturating_sub(PAGE_JUMP)).unwrap_or(0);
        state.select(Some(i));
    }

    pub fn first(&mut self) {
        let (state, len) = self.active_table();
        if len > 0 {
            state.select(Some(0));
        }
    }

    pub fn last(&mut self) {
        let (state, len) = self.active_table();
        if len > 0 {
            state.select(Some(len - 1));
        }
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

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Char('x') => app.clear_filters(),

                KeyCode::Enter if app.current_page == Page::Transactions => app.toggle_detail(),
                KeyCode::Char('d') if app.current_page == Page::Transactions => {
                    app.sort_by(SortKey::Date)
                }
                KeyCode::Char('c') if app.current_page == Page::Transactions => {
                    app.sort_by(SortKey::Category)
                }
                KeyCode::Char('a') if app.current_page == Page::Transactions => {
                    app.sort_by(SortKey::Amount)
                }

                KeyCode::Enter | KeyCode::Char(' ') if app.current_page == Page::Categories => {
                    app.toggle_selected_category()
                }

                KeyCode::Left if app.current_page == Page::TimeRange => app.shift_window_left(),
                KeyCode::Right if app.current_page == Page::TimeRange => app.shift_window_right(),
                KeyCode::Char('+') if app.current_page == Page::TimeRange => app.grow_window(),
                KeyCode::Char('-') if app.current_page == Page::TimeRange => app.shrink_window(),
                KeyCode::Enter if app.current_page == Page::TimeRange => app.apply_window(),
                KeyCode::Backspace if app.current_page == Page::TimeRange => app.clear_window(),

                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                KeyCode::Home => app.first(),
                KeyCode::End => app.last(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Page tabs
            Constraint::Length(3), // Info tiles
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_tiles(f, chunks[1], app);

    if app.show_detail && app.current_page == Page::Transactions {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        match app.current_page {
            Page::Transactions => render_table(f, chunks[2], app),
            Page::Categories => render_categories(f, chunks[2], app),
            Page::Chart => render_chart(f, chunks[2], app),
            Page::TimeRange => render_time_range(f, chunks[2], app),
        }
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Transactions, Page::Categories, Page::Chart, Page::TimeRange];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Spending Lens "),
    );

    f.render_widget(header, area);
}

fn render_tiles(f: &mut Frame, area: Rect, app: &App) {
    let summary = app.store.summary();
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(25); 4])
        .split(area);

    let balance_color = if summary.balance < Decimal::ZERO {
        Color::Red
    } else {
        Color::Green
    };
    let trend_color = if summary.trend > 0.0 {
        Color::Red
    } else {
        Color::Green
    };

    let values = [
        ("Balance", format!("{:.2}", summary.balance), balance_color),
        (
            "Total spending",
            format!("{:.2}", summary.total_spending),
            Color::White,
        ),
        ("Trend", format!("{:+.2}%", summary.trend), trend_color),
        (
            "Transactions",
            format!("{}", summary.transaction_count),
            Color::White,
        ),
    ];

    for (tile, (title, value, color)) in tiles.iter().zip(values) {
        let widget = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", title)),
        );
        f.render_widget(widget, *tile);
    }
}

fn sort_marker(app: &App, key: SortKey) -> &'static str {
    match app.sort {
        Some(spec) if spec.key == key => match spec.direction {
            SortDirection::Ascending => " ▲",
            SortDirection::Descending => " ▼",
        },
        _ => "",
    }
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let titles = [
        format!("Date{}", sort_marker(app, SortKey::Date)),
        "Id".to_string(),
        format!("Category{}", sort_marker(app, SortKey::Category)),
        format!("Amount{}", sort_marker(app, SortKey::Amount)),
        "Description".to_string(),
    ];
    let header_cells = titles.into_iter().map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .visible_transactions()
        .into_iter()
        .map(|tx| {
            let color = if tx.is_expense() {
                Color::Red
            } else if tx.is_income() {
                Color::Green
            } else {
                Color::White
            };

            Row::new(vec![
                Cell::from(tx.date.to_string()),
                Cell::from(truncate(&tx.id, 12)),
                Cell::from(truncate(&tx.category, 20)),
                Cell::from(format!("{:.2}", tx.amount)).style(Style::default().fg(color)),
                Cell::from(truncate(tx.description.as_deref().unwrap_or(""), 40)),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Transactions "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_categories(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["", "Category", "Spending", "Share"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = app
        .category_rows()
        .into_iter()
        .map(|row| {
            let marker = if row.selected { "●" } else { " " };
            Row::new(vec![
                Cell::from(marker).style(Style::default().fg(Color::Green)),
                Cell::from(row.category),
                Cell::from(format!("{:.2}", row.amount)),
                Cell::from(format!("{:.1}%", row.share)),
            ])
        })
        .collect();

    let title = format!(" Categories - basis: {} ", app.store.basis());
    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Length(25),
            Constraint::Length(15),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.category_state);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let series = app.store.series();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Spending over time ");

    let first_date = match series.points.first() {
        Some(point) => point.date,
        None => {
            f.render_widget(Paragraph::new("  No transactions in view").block(block), area);
            return;
        }
    };

    let x_of = |date: chrono::NaiveDate| (date - first_date).num_days() as f64;

    let normal: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter(|p| !p.unusual)
        .map(|p| (x_of(p.date), p.amount))
        .collect();
    let unusual: Vec<(f64, f64)> = series
        .points
        .iter()
        .filter(|p| p.unusual)
        .map(|p| (x_of(p.date), p.amount))
        .collect();
    let trend: Vec<(f64, f64)> = series
        .points
        .iter()
        .zip(&series.trend_line)
        .map(|(p, y)| (x_of(p.date), *y))
        .collect();

    let max_x = series
        .points
        .last()
        .map(|p| x_of(p.date))
        .unwrap_or(0.0)
        .max(1.0);
    let (min_y, max_y) = series
        .points
        .iter()
        .map(|p| p.amount)
        .chain(series.trend_line.iter().copied())
        .fold((0.0_f64, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let datasets = vec![
        Dataset::default()
            .name("amount")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Cyan))
            .data(&normal),
        Dataset::default()
            .name("unusual")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Red))
            .data(&unusual),
        Dataset::default()
            .name("trend")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Yellow))
            .data(&trend),
    ];

    let last_date = series.points.last().map(|p| p.date).unwrap_or(first_date);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Date")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, max_x])
                .labels(vec![
                    Span::raw(first_date.to_string()),
                    Span::raw(last_date.to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Amount")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{:.0}", min_y)),
                    Span::raw(format!("{:.0}", max_y)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_time_range(f: &mut Frame, area: Rect, app: &App) {
    let months: Vec<Span> = MONTH_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if app.window.contains_month(i as u32) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Span::styled(format!(" {} ", &name[..3]), style)
        })
        .collect();

    let state = if app.window_applied {
        Span::styled("applied", Style::default().fg(Color::Green))
    } else {
        Span::styled("not applied", Style::default().fg(Color::DarkGray))
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("  {} {}", app.window.label(), app.year),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  ("),
            state,
            Span::raw(")"),
        ]),
        Line::from(""),
        Line::from(months),
        Line::from(""),
        Line::from(vec![
            Span::styled("  ←/→", Style::default().fg(Color::Yellow)),
            Span::raw(" slide  "),
            Span::styled("+/-", Style::default().fg(Color::Yellow)),
            Span::raw(" widen/narrow  "),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" apply  "),
            Span::styled("Backspace", Style::default().fg(Color::Yellow)),
            Span::raw(" remove"),
        ]),
    ];

    if let Some(status) = &app.status {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Time Range "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.store.filtered().len();

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    let criteria = app.store.criteria();
    if !criteria.is_empty() {
        let mut parts: Vec<String> = criteria.categories.iter().cloned().collect();
        if let Some(range) = &criteria.range {
            parts.push(format!("{}..{}", range.start(), range.end()));
        }
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", parts.join(", ")),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("x", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    let hints: &[(&str, &str)] = match app.current_page {
        Page::Transactions => &[("d/c/a", "Sort"), ("Enter", "Details")],
        Page::Categories => &[("Enter", "Focus")],
        Page::Chart => &[],
        Page::TimeRange => &[("←/→", "Slide"), ("Enter", "Apply")],
    };
    for (key, label) in hints.iter().chain(&[("Tab", "Page"), ("↑/↓", "Nav")]) {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(format!(" {}", label)));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let tx = match app.selected_transaction() {
        Some(t) => t,
        None => {
            let no_selection = Paragraph::new("No transaction selected").block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Transaction Details "),
            );
            f.render_widget(no_selection, area);
            return;
        }
    };

    let label = |text: &'static str| {
        Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    };
    let amount_color = if tx.is_expense() { Color::Red } else { Color::Green };

    let content = vec![
        Line::from(""),
        Line::from(vec![label("  Id: "), Span::raw(tx.id.clone())]),
        Line::from(""),
        Line::from(vec![label("  Date: "), Span::raw(tx.date.to_string())]),
        Line::from(""),
        Line::from(vec![
            label("  Amount: "),
            Span::styled(format!("{:.2}", tx.amount), Style::default().fg(amount_color)),
        ]),
        Line::from(""),
        Line::from(vec![label("  Category: "), Span::raw(tx.category.clone())]),
        Line::from(""),
        Line::from(vec![
            label("  Account: "),
            Span::raw(tx.account.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(""),
        Line::from(vec![
            label("  Description: "),
            Span::styled(
                tx.description.clone().unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Transaction Details "),
    );

    f.render_widget(detail_panel, area);
}
