use std::io::{self, Stdout};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::cursor;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use typeahead::{
    DropdownState, EngineConfig, NavEntry, NavKey, PointerTarget, SearchSession, Section,
    SelectedSuggestion, SuggestionSource,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Runs one search session in the terminal and returns the committed
/// selection, or `None` if the user quit.
pub async fn run_tui(
    config: EngineConfig,
    source: Arc<dyn SuggestionSource>,
) -> Result<Option<SelectedSuggestion>> {
    let (selected_tx, selected_rx) = mpsc::unbounded_channel();
    let session = SearchSession::new(config, source, move |selected| {
        let _ = selected_tx.send(selected);
    });
    let mut app = AppState::new(session, selected_rx);
    app.session.focus();

    let mut terminal = init_terminal()?;
    let result = run_loop(&mut terminal, &mut app).await;
    app.session.teardown();

    match result {
        Ok(selection) => {
            restore_terminal(&mut terminal)?;
            Ok(selection)
        }
        Err(err) => {
            let _ = restore_terminal(&mut terminal);
            Err(err)
        }
    }
}

fn init_terminal() -> Result<TuiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("failed to create terminal")
}

fn restore_terminal(terminal: &mut TuiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
        cursor::Show
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")
}

/// Blocking crossterm reads happen on their own thread and are forwarded to
/// the async loop. The thread exits once the receiver is gone.
fn spawn_input_reader(tx: mpsc::UnboundedSender<Event>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    })
}

enum LoopStep {
    Input(Option<Event>),
    Session,
    Tick,
}

async fn run_loop(
    terminal: &mut TuiTerminal,
    app: &mut AppState,
) -> Result<Option<SelectedSuggestion>> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel();
    let _reader = spawn_input_reader(input_tx);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal.draw(|frame| draw_ui(frame, app))?;

        let step = tokio::select! {
            event = input_rx.recv() => LoopStep::Input(event),
            _ = app.session.process_next() => LoopStep::Session,
            _ = ticker.tick() => LoopStep::Tick,
        };

        match step {
            LoopStep::Input(None) => return Ok(None),
            LoopStep::Input(Some(Event::Key(key))) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let UiAction::Quit = app.on_key(key) {
                    return Ok(None);
                }
            }
            LoopStep::Input(Some(Event::Mouse(mouse))) => {
                let size = terminal.size()?;
                app.on_mouse(mouse, Rect::new(0, 0, size.width, size.height));
            }
            LoopStep::Input(Some(_)) | LoopStep::Session => {}
            LoopStep::Tick => app.tick_loading(),
        }

        if let Ok(selected) = app.selected_rx.try_recv() {
            return Ok(Some(selected));
        }
    }
}

struct ScreenLayout {
    search: Rect,
    dropdown: Rect,
    footer: Rect,
}

fn screen_layout(area: Rect, show_help: bool) -> ScreenLayout {
    let footer_height = if show_help { 9 } else { 1 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(footer_height),
        ])
        .split(area);
    ScreenLayout {
        search: chunks[0],
        dropdown: chunks[1],
        footer: chunks[2],
    }
}

fn inner(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

fn draw_ui(frame: &mut Frame, app: &AppState) {
    let layout = screen_layout(frame.area(), app.show_help);

    draw_search_bar(frame, app, layout.search);
    draw_dropdown(frame, app, layout.dropdown);
    if app.show_help {
        draw_help_panel(frame, layout.footer);
    } else {
        draw_hint_bar(frame, app, layout.footer);
    }

    if app.session.is_focused() {
        let text_area = inner(layout.search);
        let column = cursor_column(
            app.session.query_text(),
            app.input_cursor,
            text_area.width.saturating_sub(1),
        );
        let x = text_area.x.saturating_add(column);
        frame.set_cursor_position((x, text_area.y));
    }
}

fn draw_search_bar(frame: &mut Frame, app: &AppState, area: Rect) {
    let border_color = if app.session.is_focused() {
        Color::Rgb(88, 150, 201)
    } else {
        Color::Rgb(70, 84, 96)
    };
    let text = if app.session.query_text().is_empty() {
        Span::styled(
            app.session.placeholder().to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(
            app.session.query_text().to_string(),
            Style::default().fg(Color::White),
        )
    };

    let paragraph = Paragraph::new(Line::from(text)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(paragraph, area);
}

fn draw_dropdown(frame: &mut Frame, app: &AppState, area: Rect) {
    let state = app.session.dropdown_state();
    let message = match state {
        DropdownState::Closed => return,
        DropdownState::OpenEmpty => Some("Type at least 2 characters".to_string()),
        DropdownState::OpenLoading if app.session.entries().is_empty() => {
            Some(format!("{} Searching...", app.spinner_frame()))
        }
        DropdownState::OpenNoResults => Some("No suggestions found".to_string()),
        DropdownState::OpenLoading | DropdownState::OpenResults => None,
    };

    let title = if state == DropdownState::OpenLoading {
        format!("Suggestions {}", app.spinner_frame())
    } else {
        format!("Suggestions ({})", app.session.entries().len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(88, 150, 201)));

    if let Some(message) = message {
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let rows = dropdown_rows(app.session.entries());
    let height = inner(area).height as usize;
    let offset = visible_offset(&rows, app.session.cursor(), height);
    let items: Vec<ListItem<'_>> = rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| match row {
            DropdownRow::Header(section) => ListItem::new(Line::from(Span::styled(
                section.label().to_string(),
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ))),
            DropdownRow::Entry(index) => {
                let entry = &app.session.entries()[*index];
                render_entry(entry, app.session.cursor() == Some(*index))
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_entry(entry: &NavEntry, selected: bool) -> ListItem<'static> {
    let suggestion = &entry.suggestion;
    let marker = if selected { "▸ " } else { "  " };
    let mut spans = vec![
        Span::raw(marker.to_string()),
        Span::styled(
            suggestion.name.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if suggestion.verified == Some(true) {
        spans.push(Span::styled(
            " ✓ verified".to_string(),
            Style::default().fg(Color::LightGreen),
        ));
    }
    if entry.section == Section::Providers && suggestion.claimed == Some(false) {
        spans.push(Span::styled(
            " unclaimed".to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(detail) = suggestion.detail() {
        spans.push(Span::styled(
            format!(" | {detail}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let style = if selected {
        Style::default().bg(Color::Rgb(42, 88, 116))
    } else {
        Style::default()
    };
    ListItem::new(Line::from(spans)).style(style)
}

fn draw_hint_bar(frame: &mut Frame, app: &AppState, area: Rect) {
    let text = if app.session.is_open() {
        "  Up/Down select | Enter choose | Esc close | F1 help"
    } else {
        "  Type to search | Esc quit | F1 help"
    };
    let hint = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Left);
    frame.render_widget(hint, area);
}

fn draw_help_panel(frame: &mut Frame, area: Rect) {
    let rows = vec![
        Line::from("  Up/Down        Move through suggestions"),
        Line::from("  Enter          Choose highlighted suggestion"),
        Line::from("  Esc            Close suggestions / quit when closed"),
        Line::from("  Left/Right     Move cursor in search input"),
        Line::from("  Home/End       Jump cursor in search input"),
        Line::from("  Backspace/Del  Edit search input"),
        Line::from("  Mouse          Hover to highlight, click to choose"),
        Line::from("  F1             Toggle this help"),
        Line::from("  Ctrl+C         Quit"),
    ];
    let content = Paragraph::new(rows)
        .alignment(Alignment::Left)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(content, area);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DropdownRow {
    Header(Section),
    /// Index into the session's flattened list.
    Entry(usize),
}

/// Rendered rows: a header before each non-empty section, then its entries.
fn dropdown_rows(entries: &[NavEntry]) -> Vec<DropdownRow> {
    let mut rows = Vec::with_capacity(entries.len() + Section::ALL.len());
    let mut current = None;
    for (index, entry) in entries.iter().enumerate() {
        if current != Some(entry.section) {
            current = Some(entry.section);
            rows.push(DropdownRow::Header(entry.section));
        }
        rows.push(DropdownRow::Entry(index));
    }
    rows
}

/// First visible row such that the cursor's row stays on screen.
fn visible_offset(rows: &[DropdownRow], cursor: Option<usize>, height: usize) -> usize {
    if height == 0 || rows.len() <= height {
        return 0;
    }
    let Some(cursor) = cursor else {
        return 0;
    };
    let Some(row) = rows
        .iter()
        .position(|row| *row == DropdownRow::Entry(cursor))
    else {
        return 0;
    };
    (row + 1).saturating_sub(height).min(rows.len() - height)
}

enum UiAction {
    None,
    Quit,
}

struct AppState {
    session: SearchSession,
    selected_rx: mpsc::UnboundedReceiver<SelectedSuggestion>,
    input_cursor: usize,
    spinner_index: usize,
    show_help: bool,
}

impl AppState {
    fn new(
        session: SearchSession,
        selected_rx: mpsc::UnboundedReceiver<SelectedSuggestion>,
    ) -> Self {
        let input_cursor = session.query_text().chars().count();
        Self {
            session,
            selected_rx,
            input_cursor,
            spinner_index: 0,
            show_help: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) -> UiAction {
        if matches!(key.code, KeyCode::F(1)) {
            self.show_help = !self.show_help;
            return UiAction::None;
        }
        self.show_help = false;

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => UiAction::Quit,
            KeyCode::Esc => {
                if self.session.is_open() {
                    self.session.key(NavKey::Escape);
                    UiAction::None
                } else {
                    UiAction::Quit
                }
            }
            KeyCode::Enter => {
                self.session.key(NavKey::Enter);
                UiAction::None
            }
            KeyCode::Down => {
                self.navigate(NavKey::ArrowDown);
                UiAction::None
            }
            KeyCode::Up => {
                self.navigate(NavKey::ArrowUp);
                UiAction::None
            }
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.navigate(NavKey::ArrowDown);
                UiAction::None
            }
            KeyCode::Char('k') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.navigate(NavKey::ArrowUp);
                UiAction::None
            }
            KeyCode::Left => {
                self.sync_cursor();
                if self.input_cursor > 0 {
                    self.input_cursor -= 1;
                }
                UiAction::None
            }
            KeyCode::Right => {
                self.sync_cursor();
                let len = self.session.query_text().chars().count();
                if self.input_cursor < len {
                    self.input_cursor += 1;
                }
                UiAction::None
            }
            KeyCode::Home => {
                self.input_cursor = 0;
                UiAction::None
            }
            KeyCode::End => {
                self.input_cursor = self.session.query_text().chars().count();
                UiAction::None
            }
            KeyCode::Backspace => {
                self.sync_cursor();
                let mut text = self.session.query_text().to_string();
                if self.input_cursor > 0 && remove_char_at(&mut text, self.input_cursor - 1) {
                    self.input_cursor -= 1;
                    self.session.input_changed(text);
                }
                UiAction::None
            }
            KeyCode::Delete => {
                self.sync_cursor();
                let mut text = self.session.query_text().to_string();
                if remove_char_at(&mut text, self.input_cursor) {
                    self.session.input_changed(text);
                }
                UiAction::None
            }
            KeyCode::Char(ch)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.sync_cursor();
                let mut text = self.session.query_text().to_string();
                insert_char_at(&mut text, self.input_cursor, ch);
                self.input_cursor += 1;
                self.session.input_changed(text);
                UiAction::None
            }
            _ => UiAction::None,
        }
    }

    /// Arrow keys reopen a closed dropdown before navigating.
    fn navigate(&mut self, key: NavKey) {
        if !self.session.is_open() {
            self.session.focus();
            return;
        }
        self.session.key(key);
    }

    fn on_mouse(&mut self, mouse: MouseEvent, area: Rect) {
        let layout = screen_layout(area, self.show_help);
        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(index) = self.entry_at(layout.dropdown, mouse.column, mouse.row) {
                    let entry = &self.session.entries()[index];
                    let (section, id) = (entry.section, entry.suggestion.id.clone());
                    self.session.hover(section, &id);
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if contains(layout.search, mouse.column, mouse.row) {
                    self.session.pointer_down(PointerTarget::Input);
                    self.session.focus();
                    let text_area = inner(layout.search);
                    let column = mouse.column.saturating_sub(text_area.x) as usize;
                    self.input_cursor = char_index_at_column(self.session.query_text(), column);
                } else if self.session.is_open()
                    && contains(layout.dropdown, mouse.column, mouse.row)
                {
                    self.session.pointer_down(PointerTarget::Dropdown);
                    if let Some(index) = self.entry_at(layout.dropdown, mouse.column, mouse.row) {
                        let entry = self.session.entries()[index].clone();
                        self.session.select(entry);
                    }
                } else {
                    self.session.pointer_down(PointerTarget::Outside);
                }
            }
            _ => {}
        }
    }

    /// Maps a screen position inside the dropdown to a flattened-list index.
    fn entry_at(&self, dropdown: Rect, column: u16, row: u16) -> Option<usize> {
        if self.session.dropdown_state() == DropdownState::Closed {
            return None;
        }
        let list_area = inner(dropdown);
        if !contains(list_area, column, row) {
            return None;
        }
        let rows = dropdown_rows(self.session.entries());
        let height = list_area.height as usize;
        let offset = visible_offset(&rows, self.session.cursor(), height);
        match rows.get(offset + (row - list_area.y) as usize) {
            Some(DropdownRow::Entry(index)) => Some(*index),
            _ => None,
        }
    }

    fn sync_cursor(&mut self) {
        let len = self.session.query_text().chars().count();
        self.input_cursor = self.input_cursor.min(len);
    }

    fn tick_loading(&mut self) {
        if self.session.is_loading() {
            self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAMES.len();
        }
    }

    fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_index % SPINNER_FRAMES.len()]
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// Display column of the char at `char_index`, clamped to `max`.
fn cursor_column(value: &str, char_index: usize, max: u16) -> u16 {
    let prefix: String = value.chars().take(char_index).collect();
    let width = Span::raw(prefix).width();
    u16::try_from(width).unwrap_or(u16::MAX).min(max)
}

fn char_index_at_column(value: &str, column: usize) -> usize {
    let mut width = 0;
    for (index, ch) in value.chars().enumerate() {
        let ch_width = Span::raw(ch.to_string()).width();
        if width + ch_width > column {
            return index;
        }
        width += ch_width;
    }
    value.chars().count()
}

fn insert_char_at(value: &mut String, char_index: usize, ch: char) {
    let byte_index = byte_index_for_char(value, char_index);
    value.insert(byte_index, ch);
}

fn remove_char_at(value: &mut String, char_index: usize) -> bool {
    let start = byte_index_for_char(value, char_index);
    if start >= value.len() {
        return false;
    }
    let end = byte_index_for_char(value, char_index + 1);
    value.replace_range(start..end, "");
    true
}

fn byte_index_for_char(value: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use typeahead::{CategorizedResults, Suggestion, SuggestionKind, SuggestResult};

    struct StaticSource(CategorizedResults);

    #[async_trait]
    impl SuggestionSource for StaticSource {
        async fn fetch(&self, _query: &str) -> SuggestResult<CategorizedResults> {
            Ok(self.0.clone())
        }
    }

    fn sample_results() -> CategorizedResults {
        let mut results = CategorizedResults::empty();
        results
            .providers
            .push(Suggestion::new(1_i64, SuggestionKind::Provider, "Plumber Joe"));
        results
            .providers
            .push(Suggestion::new(7_i64, SuggestionKind::Provider, "Jane's Plumbing"));
        results
            .services
            .push(Suggestion::new(1_i64, SuggestionKind::Service, "Pipe repair"));
        results
    }

    fn test_app() -> AppState {
        let (selected_tx, selected_rx) = mpsc::unbounded_channel();
        let session = SearchSession::new(
            EngineConfig::default(),
            Arc::new(StaticSource(sample_results())),
            move |selected| {
                let _ = selected_tx.send(selected);
            },
        );
        AppState::new(session, selected_rx)
    }

    fn press(app: &mut AppState, code: KeyCode) -> UiAction {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 80, 24)
    }

    #[tokio::test(start_paused = true)]
    async fn search_cursor_allows_mid_string_editing() {
        let mut app = test_app();
        type_text(&mut app, "ac");
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.session.query_text(), "abc");

        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.query_text(), "ab");
    }

    #[tokio::test(start_paused = true)]
    async fn enter_on_highlighted_row_sends_selection() {
        let mut app = test_app();
        type_text(&mut app, "plu");
        app.session.run_until_idle().await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);

        let selected = app.selected_rx.try_recv().unwrap();
        assert_eq!(selected.suggestion.name, "Jane's Plumbing");
        assert_eq!(selected.section, Section::Providers);
    }

    #[tokio::test(start_paused = true)]
    async fn esc_closes_then_quits() {
        let mut app = test_app();
        type_text(&mut app, "plu");
        app.session.run_until_idle().await;

        assert!(matches!(press(&mut app, KeyCode::Esc), UiAction::None));
        assert!(!app.session.is_open());
        assert!(matches!(press(&mut app, KeyCode::Esc), UiAction::Quit));
    }

    #[tokio::test(start_paused = true)]
    async fn arrow_reopens_closed_dropdown() {
        let mut app = test_app();
        type_text(&mut app, "plu");
        app.session.run_until_idle().await;
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Down);
        assert!(app.session.is_open());
        assert_eq!(app.session.cursor(), None);
    }

    #[test]
    fn cursor_column_uses_display_width_and_clamps() {
        assert_eq!(cursor_column("plumb", 3, 40), 3);
        assert_eq!(cursor_column("日本語", 2, 40), 4);
        assert_eq!(cursor_column("plumbing", 8, 5), 5);
        let long = "x".repeat(70_000);
        assert_eq!(cursor_column(&long, 70_000, u16::MAX), u16::MAX);
    }

    #[test]
    fn click_column_maps_back_to_char_index() {
        assert_eq!(char_index_at_column("plumb", 2), 2);
        assert_eq!(char_index_at_column("plumb", 40), 5);
        assert_eq!(char_index_at_column("日本語", 3), 1);
        assert_eq!(char_index_at_column("日本語", 4), 2);
    }

    #[test]
    fn dropdown_rows_insert_section_headers() {
        let entries = sample_results().flatten();
        let rows = dropdown_rows(&entries);
        assert_eq!(
            rows,
            vec![
                DropdownRow::Header(Section::Providers),
                DropdownRow::Entry(0),
                DropdownRow::Entry(1),
                DropdownRow::Header(Section::Services),
                DropdownRow::Entry(2),
            ]
        );
    }

    #[test]
    fn visible_offset_keeps_cursor_on_screen() {
        let rows: Vec<DropdownRow> = (0..10).map(DropdownRow::Entry).collect();
        assert_eq!(visible_offset(&rows, None, 4), 0);
        assert_eq!(visible_offset(&rows, Some(2), 4), 0);
        assert_eq!(visible_offset(&rows, Some(6), 4), 3);
        assert_eq!(visible_offset(&rows, Some(9), 4), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn mouse_hover_and_click_resolve_rows() {
        let mut app = test_app();
        type_text(&mut app, "plu");
        app.session.run_until_idle().await;

        // Dropdown starts at y=3; its border occupies y=3, header at y=4.
        let hover = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 5,
            row: 8,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse(hover, screen());
        assert_eq!(app.session.cursor(), Some(2));

        let header = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 5,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse(header, screen());
        assert_eq!(app.session.cursor(), Some(2));

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 5,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse(click, screen());
        let selected = app.selected_rx.try_recv().unwrap();
        assert_eq!(selected.suggestion.name, "Plumber Joe");
        assert!(!app.session.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn click_outside_dismisses() {
        let mut app = test_app();
        type_text(&mut app, "plu");
        app.session.run_until_idle().await;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 23,
            modifiers: KeyModifiers::NONE,
        };
        app.on_mouse(click, screen());
        assert_eq!(app.session.dropdown_state(), DropdownState::Closed);
    }
}
