//! Main application logic for the phone entry terminal interface.
//!
//! This module contains the `PhoneInputApp` struct which hosts one
//! [`PhoneNumberInput`] widget: it turns terminal key and mouse events into
//! widget events, applies the resulting effects to the virtual keyboard and
//! the terminal caret, and renders the formatted number, the country list and
//! the key hints.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use crate::config::WidgetConfig;
use crate::country::CountryCode;
use crate::fields::ActiveField;
use crate::host::{apply_effects, Callbacks, CaretScheduler, Keyboard, TextField};
use crate::tui::colors::{ACCENT, ACTIVE_DIGIT, LIST_BACKGROUND, MUTED};
use crate::tui::enums::{ClickTarget, LoopControl};
use crate::tui::input::VirtualKeyboard;
use crate::widget::{Effect, PhoneNumberInput, PLACEHOLDER};

/// The terminal cursor standing in for the rendered text field's caret.
#[derive(Debug, Default)]
pub struct TerminalCaret {
    column: Option<usize>,
    focused: bool,
    laid_out: bool,
}

impl TextField for TerminalCaret {
    fn set_selection(&mut self, start: usize, _end: usize) {
        self.column = Some(start);
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn is_ready(&self) -> bool {
        self.laid_out
    }
}

/// Screen regions from the last frame, used for mouse hit testing.
#[derive(Debug, Default)]
struct HitAreas {
    phone_inner: Rect,
    phone: Rect,
    flag: Rect,
    search: Rect,
    list_inner: Rect,
    list_rows: Vec<CountryCode>,
}

/// Terminal host for a single phone entry widget.
pub struct PhoneInputApp {
    widget: PhoneNumberInput,
    keyboard: VirtualKeyboard,
    scheduler: CaretScheduler,
    callbacks: Callbacks,
    caret: TerminalCaret,
    list_state: ListState,
    areas: HitAreas,
    last_number: Rc<RefCell<Option<String>>>,
    status_message: String,
}

impl PhoneInputApp {
    /// Create the app and push the initial buffer and caret to the keyboard.
    pub fn new(config: &WidgetConfig) -> Self {
        let widget = PhoneNumberInput::with_rules(config);
        let last_number = Rc::new(RefCell::new(None));

        let callbacks = Callbacks {
            on_country_code_change: Some(Box::new(|code: CountryCode| {
                info!(%code, "country code changed");
            })),
            on_phone_number_change: Some(Box::new({
                let last_number = Rc::clone(&last_number);
                move |number: &str| {
                    info!(number, "phone number changed");
                    *last_number.borrow_mut() = Some(number.to_string());
                }
            })),
        };

        let mut keyboard = VirtualKeyboard::new();
        keyboard.set_buffer(widget.digits(), ActiveField::PhoneDigits);
        keyboard.set_caret(widget.raw_caret());

        let mut scheduler = CaretScheduler::default();
        scheduler.schedule(widget.current_sync(), Instant::now());

        Self {
            widget,
            keyboard,
            scheduler,
            callbacks,
            caret: TerminalCaret::default(),
            list_state: ListState::default(),
            areas: HitAreas::default(),
            last_number,
            status_message: String::new(),
        }
    }

    /// Full number with calling code, as it stands now.
    pub fn full_number(&self) -> String {
        self.widget.full_number()
    }

    fn dispatch(&mut self, effects: Vec<Effect>) {
        apply_effects(effects, &mut self.keyboard, &mut self.scheduler, &mut self.callbacks, Instant::now());
        self.caret.laid_out = false;
        if self.widget.is_country_list_open() {
            let rows = self.widget.visible_countries().len();
            let selected = self.list_state.selected().unwrap_or(0);
            self.list_state.select(if rows == 0 { None } else { Some(selected.min(rows - 1)) });
        }
    }

    /// Report the keyboard's new buffer to the widget.
    fn keyboard_edited(&mut self) {
        let content = self.keyboard.value().to_string();
        let searching = self.widget.active_field() == ActiveField::CountrySearch;
        let effects = self.widget.keyboard_changed(&content);
        if searching {
            self.list_state.select(Some(0));
        }
        self.dispatch(effects);
    }

    fn keyboard_moved(&mut self) {
        let effects = self.widget.caret_moved(self.keyboard.cursor);
        self.dispatch(effects);
    }

    fn select_highlighted_country(&mut self) {
        let countries = self.widget.visible_countries();
        match self.list_state.selected().and_then(|idx| countries.get(idx)) {
            Some(option) => {
                let code = option.code;
                let effects = self.widget.select_country(code);
                self.dispatch(effects);
                self.status_message = format!("Selected {} (+{})", code, self.widget.calling_code());
            }
            None => self.status_message = "No country matches the search".to_string(),
        }
    }

    fn move_list_selection(&mut self, down: bool) {
        let rows = self.widget.visible_countries().len();
        if rows == 0 {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        let next = if down { (current + 1).min(rows - 1) } else { current.saturating_sub(1) };
        self.list_state.select(Some(next));
    }

    /// Handle a key press.
    fn handle_key(&mut self, key: KeyEvent) -> LoopControl {
        if key.kind != KeyEventKind::Press {
            return LoopControl::Continue;
        }
        self.status_message.clear();

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return LoopControl::Quit;
        }

        let list_open = self.widget.is_country_list_open();
        match key.code {
            KeyCode::Esc if list_open => {
                let effects = self.widget.toggle_country_list();
                self.dispatch(effects);
            }
            KeyCode::Esc => return LoopControl::Quit,
            KeyCode::Tab => {
                let effects = self.widget.toggle_country_list();
                self.list_state.select(Some(0));
                self.dispatch(effects);
            }
            KeyCode::Enter if list_open => self.select_highlighted_country(),
            KeyCode::Enter => return LoopControl::Confirm,
            KeyCode::Up if list_open => self.move_list_selection(false),
            KeyCode::Down if list_open => self.move_list_selection(true),
            KeyCode::Left => {
                self.keyboard.move_cursor_left();
                self.keyboard_moved();
            }
            KeyCode::Right => {
                self.keyboard.move_cursor_right();
                self.keyboard_moved();
            }
            KeyCode::Home => {
                self.keyboard.move_cursor_home();
                self.keyboard_moved();
            }
            KeyCode::End => {
                self.keyboard.move_cursor_end();
                self.keyboard_moved();
            }
            KeyCode::Backspace => {
                if self.keyboard.handle_backspace() {
                    self.keyboard_edited();
                }
            }
            KeyCode::Delete => {
                if self.keyboard.handle_delete() {
                    self.keyboard_edited();
                }
            }
            KeyCode::Char(c) => {
                if self.keyboard.handle_char(c) {
                    self.keyboard_edited();
                }
            }
            _ => {}
        }
        LoopControl::Continue
    }

    fn hit_test(&self, column: u16, row: u16) -> ClickTarget {
        let position = Position::new(column, row);
        let areas = &self.areas;

        if self.widget.is_country_list_open() {
            if areas.search.contains(position) {
                return ClickTarget::SearchBox;
            }
            if areas.list_inner.contains(position) {
                let idx = (row - areas.list_inner.y) as usize + self.list_state.offset();
                return match areas.list_rows.get(idx) {
                    Some(code) => ClickTarget::CountryRow(*code),
                    None => ClickTarget::Outside,
                };
            }
        }
        if areas.flag.contains(position) {
            return ClickTarget::FlagButton;
        }
        if areas.phone_inner.contains(position) {
            let offset = (column - areas.phone_inner.x) as usize;
            if offset < self.widget.formatted().chars().count() {
                return ClickTarget::Character(offset);
            }
        }
        if areas.phone.contains(position) {
            return ClickTarget::PhoneBox;
        }
        ClickTarget::Outside
    }

    /// Handle a mouse click.
    fn handle_mouse(&mut self, mouse: MouseEvent) -> LoopControl {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return LoopControl::Continue;
        }
        let effects = match self.hit_test(mouse.column, mouse.row) {
            ClickTarget::Character(offset) => self.widget.click_formatted(offset),
            ClickTarget::PhoneBox => self.widget.focus_phone(),
            ClickTarget::FlagButton => {
                self.list_state.select(Some(0));
                self.widget.toggle_country_list()
            }
            ClickTarget::SearchBox => self.widget.focus_search(),
            ClickTarget::CountryRow(code) => self.widget.select_country(code),
            ClickTarget::Outside => Vec::new(),
        };
        self.dispatch(effects);
        LoopControl::Continue
    }

    fn handle_input(&mut self) -> io::Result<LoopControl> {
        if event::poll(Duration::from_millis(50))? {
            return Ok(match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => LoopControl::Continue,
            });
        }
        Ok(LoopControl::Continue)
    }

    /// Render the flag button and the formatted number.
    fn render_entry(&mut self, f: &mut Frame, area: Rect) {
        let width = self.widget.size().display_width() + 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(10), Constraint::Length(width), Constraint::Min(0)])
            .split(area);

        let flag = Paragraph::new(format!("{} +{}", self.widget.country(), self.widget.calling_code()))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(ACCENT)));
        f.render_widget(flag, chunks[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT));
        let inner = block.inner(chunks[1]);
        self.areas.flag = chunks[0];
        self.areas.phone = chunks[1];
        self.areas.phone_inner = inner;

        let line = if self.widget.digits().is_empty() {
            Line::from(Span::styled(PLACEHOLDER, Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)))
        } else {
            // Highlight the digit just before the caret.
            let caret = self.widget.raw_caret();
            let mut digit_index = 0;
            let spans: Vec<Span> = self
                .widget
                .formatted()
                .chars()
                .map(|ch| {
                    if !ch.is_ascii_digit() {
                        return Span::raw(ch.to_string());
                    }
                    digit_index += 1;
                    if digit_index == caret {
                        Span::styled(ch.to_string(), Style::default().fg(ACTIVE_DIGIT).add_modifier(Modifier::BOLD))
                    } else {
                        Span::raw(ch.to_string())
                    }
                })
                .collect();
            Line::from(spans)
        };
        f.render_widget(Paragraph::new(line).block(block), chunks[1]);

        if self.widget.active_field() == ActiveField::PhoneDigits && self.caret.focused {
            if let Some(column) = self.caret.column {
                let x = inner.x + (column as u16).min(inner.width.saturating_sub(1));
                f.set_cursor_position(Position::new(x, inner.y));
            }
        }
    }

    /// Render the search box and the filtered country list.
    fn render_country_search(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let search_block = Block::default()
            .borders(Borders::ALL)
            .title("Search for country")
            .border_style(Style::default().fg(ACCENT));
        let search_inner = search_block.inner(chunks[0]);
        f.render_widget(Paragraph::new(self.widget.search_text()).block(search_block), chunks[0]);
        self.areas.search = chunks[0];

        let countries = self.widget.visible_countries();
        let items: Vec<ListItem> = countries
            .iter()
            .map(|option| ListItem::new(format!("+{} - {}", option.calling_code, option.display_name)))
            .collect();
        let list_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(ACCENT));
        self.areas.list_inner = list_block.inner(chunks[1]);
        self.areas.list_rows = countries.iter().map(|option| option.code).collect();

        let list = List::new(items)
            .block(list_block)
            .style(Style::default().bg(LIST_BACKGROUND).fg(Color::Black))
            .highlight_style(Style::default().bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD));
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);

        if self.widget.active_field() == ActiveField::CountrySearch {
            let column = self.widget.search_caret() as u16;
            let x = search_inner.x + column.min(search_inner.width.saturating_sub(1));
            f.set_cursor_position(Position::new(x, search_inner.y));
        }
    }

    /// Render the on-screen key layout hint.
    fn render_keypad(&mut self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .keyboard
            .key_rows()
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(MUTED))))
            .collect();
        let keypad = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Keyboard"));
        f.render_widget(keypad, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.widget.is_country_list_open() {
            "Type to search | ↑↓ choose | Enter select | Esc close".to_string()
        } else {
            let number = self
                .last_number
                .borrow()
                .clone()
                .unwrap_or_else(|| self.widget.full_number());
            format!("{number} | Tab countries | Enter done | Esc quit")
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(ACCENT).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        let header = Paragraph::new(format!("Country Code: {}", self.widget.country()));
        f.render_widget(header, chunks[0]);
        self.render_entry(f, chunks[1]);
        if self.widget.is_country_list_open() {
            self.render_country_search(f, chunks[2]);
        } else {
            self.areas.search = Rect::default();
            self.areas.list_inner = Rect::default();
            self.areas.list_rows.clear();
            self.render_keypad(f, chunks[2]);
        }
        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Draws, applies any due caret command to the laid-out frame, then
    /// handles input until the user confirms or quits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<LoopControl> {
        loop {
            terminal.draw(|f| self.render(f))?;
            self.caret.laid_out = true;
            self.scheduler.poll(Instant::now(), &mut self.caret);

            let control = self.handle_input()?;
            if control != LoopControl::Continue {
                return Ok(control);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(value: &str) -> PhoneInputApp {
        let config = WidgetConfig {
            initial_value: Some(value.to_string()),
            ..WidgetConfig::default()
        };
        PhoneInputApp::new(&config)
    }

    fn draw(app: &mut PhoneInputApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn typing_updates_widget_and_reported_number() {
        let mut app = app("+27714834857");
        assert_eq!(app.handle_key(key(KeyCode::Backspace)), LoopControl::Continue);
        assert_eq!(app.widget.digits(), "71483485");
        assert_eq!(app.last_number.borrow().as_deref(), Some("+2771483485"));

        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::Char('0')));
        assert_eq!(app.widget.digits(), "071483485");
        assert_eq!(app.widget.raw_caret(), 1);
    }

    #[test]
    fn letters_are_ignored_on_the_phone_pad() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.widget.digits(), "");
        assert!(app.last_number.borrow().is_none());
    }

    #[test]
    fn tab_search_enter_selects_country() {
        let mut app = app("2125551234");
        app.handle_key(key(KeyCode::Tab));
        for c in "united s".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.widget.search_text(), "united s");
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.widget.country().as_str(), "US");
        assert_eq!(app.widget.formatted(), "(212) 555-1234");
        assert!(!app.widget.is_country_list_open());
        assert_eq!(app.keyboard.target, ActiveField::PhoneDigits);
    }

    #[test]
    fn escape_closes_list_before_quitting() {
        let mut app = app("");
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.handle_key(key(KeyCode::Esc)), LoopControl::Continue);
        assert!(!app.widget.is_country_list_open());
        assert_eq!(app.handle_key(key(KeyCode::Esc)), LoopControl::Quit);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), LoopControl::Confirm);
    }

    #[test]
    fn renders_placeholder_and_digits() {
        let mut empty = app("");
        assert!(draw(&mut empty).contains(PLACEHOLDER));
        let inner = empty.areas.phone_inner;
        let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();
        terminal.draw(|f| empty.render(f)).unwrap();
        assert_eq!(terminal.backend().buffer()[(inner.x, inner.y)].fg, MUTED);

        let mut filled = app("+27714834857");
        let screen = draw(&mut filled);
        assert!(screen.contains("71 483 4857"));
        assert!(screen.contains("ZA +27"));
    }

    #[test]
    fn clicking_a_digit_moves_the_caret() {
        let mut app = app("+27714834857");
        draw(&mut app);
        let inner = app.areas.phone_inner;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: inner.x + 2,
            row: inner.y,
            modifiers: KeyModifiers::NONE,
        };
        app.handle_mouse(click);
        assert_eq!(app.widget.raw_caret(), 2);
        assert_eq!(app.keyboard.cursor, 2);
    }
}
