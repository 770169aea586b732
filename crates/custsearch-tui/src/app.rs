//! Top-level application state and the main event loop.
//!
//! [`App::run`] sets up the terminal, drives the crossterm event loop, and
//! tears everything down cleanly on exit or panic. The search controller runs
//! on a tokio runtime owned by the caller; each frame the loop picks up the
//! latest [`SearchState`] and any outward controller events without blocking.

use crate::{
    event::{self, AppEvent, Direction},
    theme::Theme,
    widgets::{
        dropdown::{self, Content, Dropdown, DropdownState},
        help::HelpPopup,
        search_box::{SearchBox, SearchBoxState},
    },
};
use crossterm::{
    event::{
        self as ct_event, DisableFocusChange, DisableMouseCapture, EnableFocusChange,
        EnableMouseCapture, Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use custsearch_client::{ControllerEvent, ControllerHandle, SearchState};
use custsearch_core::{config::Config, Customer};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDir, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame, Terminal,
};
use std::{
    cell::Cell,
    io,
    time::{Duration, Instant},
};
use tokio::sync::{mpsc, watch};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    /// Keyboard focus is away from the search box (the input is blurred).
    Elsewhere,
}

pub struct AppState {
    pub search_box: SearchBoxState,
    pub dropdown: DropdownState,
    /// Latest state published by the controller.
    pub search: SearchState,
    pub focus: Focus,
    /// Last customer committed from the dropdown.
    pub selected: Option<Customer>,
    /// Last text reported by the controller's text-changed event.
    pub reported_text: String,
    pub theme: Theme,
    pub config: Config,
    pub show_help: bool,
    pub quit: bool,
    /// Cached from the last render for mouse hit-testing.
    search_area: Cell<Rect>,
    dropdown_area: Cell<Rect>,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    state: AppState,
    controller: ControllerHandle,
    search_rx: watch::Receiver<SearchState>,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
}

impl App {
    pub fn new(
        config: Config,
        theme: Theme,
        controller: ControllerHandle,
        events: mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> Self {
        let mut dropdown = DropdownState::new(config.ui.blur_grace());
        dropdown.focus();

        let state = AppState {
            search_box: SearchBoxState::default(),
            dropdown,
            search: SearchState::Idle,
            focus: Focus::Search,
            selected: None,
            reported_text: String::new(),
            theme,
            config,
            show_help: false,
            quit: false,
            search_area: Cell::new(Rect::default()),
            dropdown_area: Cell::new(Rect::default()),
        };

        let search_rx = controller.watch();
        App { state, controller, search_rx, events }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Set up the terminal, run the event loop, and restore the terminal on exit.
    pub fn run(mut self) -> anyhow::Result<()> {
        install_panic_hook();

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Always restore terminal, even if the loop returned an error
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = terminal.show_cursor();

        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            self.sync_controller();
            self.state.dropdown.tick(Instant::now());

            {
                let s = &self.state;
                terminal.draw(|frame| draw(frame, s))?;
            }

            if self.state.quit {
                break;
            }

            if ct_event::poll(Duration::from_millis(16))? {
                let raw = ct_event::read()?;
                if let Event::Key(key) = raw {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                }
                // Use insert-mode mapping while the search box has focus
                let app_event = if self.state.focus == Focus::Search && !self.state.show_help {
                    event::to_app_event_insert(raw)
                } else {
                    event::to_app_event(raw)
                };
                if let Some(ev) = app_event {
                    tracing::trace!(focus = ?self.state.focus, event = ?ev, "app event");
                    self.handle(ev, Instant::now());
                }
            }
        }
        Ok(())
    }

    /// Pull the latest controller state and drain outward events.
    pub fn sync_controller(&mut self) {
        if self.search_rx.has_changed().unwrap_or(false) {
            self.state.search = self.search_rx.borrow_and_update().clone();
            self.state.dropdown.sync(&self.state.search);
        }
        while let Ok(ControllerEvent::SearchTextChanged(text)) = self.events.try_recv() {
            self.state.reported_text = text;
        }
    }

    pub fn handle(&mut self, event: AppEvent, now: Instant) {
        if self.state.show_help {
            if matches!(event, AppEvent::Help | AppEvent::Escape | AppEvent::Quit) {
                self.state.show_help = false;
            }
            return;
        }

        match event {
            AppEvent::Quit => {
                tracing::debug!("quit");
                self.state.quit = true;
            }
            AppEvent::Help => self.state.show_help = true,
            AppEvent::FocusNext => match self.state.focus {
                Focus::Search => self.blur(now),
                Focus::Elsewhere => self.focus_search(),
            },
            AppEvent::SearchFocus => self.focus_search(),
            AppEvent::FocusGained => {
                if self.state.focus == Focus::Search {
                    self.state.dropdown.focus();
                }
            }
            AppEvent::FocusLost => self.state.dropdown.blur(now),
            AppEvent::Click { column, row } => self.click(column, row, now),
            AppEvent::Hover { column, row } => {
                if let Some(index) = self.item_under(column, row) {
                    self.state.dropdown.hover(index, &self.state.search);
                }
            }
            AppEvent::Resize(_, _) => {}
            other if self.state.focus == Focus::Search => self.handle_search_key(other, now),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, event: AppEvent, now: Instant) {
        let s = &mut self.state;
        match event {
            AppEvent::Escape if !s.dropdown.visible => self.blur(now),
            AppEvent::Nav(Direction::Up | Direction::Down) | AppEvent::Enter | AppEvent::Escape => {
                if let Some(customer) = s.dropdown.handle(&event, &s.search) {
                    self.commit(customer);
                }
            }
            AppEvent::Clear => self.clear(),
            other => {
                if s.search_box.handle(&other) {
                    self.text_changed();
                }
            }
        }
    }

    fn click(&mut self, column: u16, row: u16, now: Instant) {
        if let Some(index) = self.item_under(column, row) {
            if let Some(customer) = self.state.dropdown.pick(index, &self.state.search) {
                self.commit(customer);
            }
            return;
        }
        if self.state.search_area.get().contains((column, row).into()) {
            self.focus_search();
        } else {
            self.blur(now);
        }
    }

    fn item_under(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.state.dropdown_area.get();
        if !self.state.dropdown.visible || !area.contains((column, row).into()) {
            return None;
        }
        match &self.state.search {
            SearchState::Results(page) => {
                let first = self.state.dropdown.first_visible(page.len());
                dropdown::item_at(area, row, page.len(), first)
            }
            _ => None,
        }
    }

    fn focus_search(&mut self) {
        self.state.focus = Focus::Search;
        self.state.dropdown.focus();
    }

    fn blur(&mut self, now: Instant) {
        self.state.focus = Focus::Elsewhere;
        self.state.dropdown.blur(now);
    }

    fn text_changed(&mut self) {
        let s = &mut self.state;
        s.dropdown.text_changed();
        // A terminal has no re-click to reopen, so typing does it.
        if !s.dropdown.visible {
            s.dropdown.focus();
        }
        self.controller.push(s.search_box.text.clone());
    }

    fn commit(&mut self, customer: Customer) {
        tracing::info!(id = customer.id, name = %customer.name, "customer selected");
        self.state.search_box.set_text(customer.name.clone());
        self.controller.push(customer.name.clone());
        self.state.selected = Some(customer);
    }

    fn clear(&mut self) {
        self.state.search_box.set_text("");
        self.state.dropdown.close();
        self.controller.push("");
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    // Vertical: 3-line search box | body | 1-line status
    let vert = Layout::default()
        .direction(LayoutDir::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .split(area);

    let focused = state.focus == Focus::Search;
    let search_box = SearchBox::new(&state.search_box, focused, &state.theme)
        .placeholder(&state.config.ui.placeholder)
        .loading(state.search.is_loading());
    frame.render_widget(search_box, vert[0]);
    state.search_area.set(vert[0]);

    frame.render_widget(selected_panel(state), vert[1]);
    frame.render_widget(status_line(state), vert[2]);

    // Dropdown overlays the top of the body
    let content = Content::resolve(
        &state.search_box.text,
        &state.search,
        state.config.search.min_characters,
    );
    let dropdown_area = Rect {
        height: content.height().min(vert[1].height),
        ..vert[1]
    };
    state.dropdown_area.set(if state.dropdown.visible { dropdown_area } else { Rect::default() });
    frame.render_widget(Dropdown::new(&state.dropdown, content, &state.theme), dropdown_area);

    if state.show_help {
        frame.render_widget(HelpPopup::new(&state.theme), area);
        return;
    }

    if focused {
        let sb = SearchBox::new(&state.search_box, true, &state.theme);
        frame.set_cursor_position(sb.cursor_position(vert[0]));
    }
}

fn selected_panel(state: &AppState) -> Paragraph<'_> {
    let block = Block::bordered()
        .title(" Selected ")
        .border_style(state.theme.border_unfocused);

    let lines = match &state.selected {
        Some(c) => vec![
            Line::from(Span::styled(c.name.as_str(), state.theme.item_name)),
            Line::from(Span::styled(
                format!("{}, {}", c.address, c.postcode),
                state.theme.item_detail,
            )),
            Line::from(
                c.tags
                    .iter()
                    .map(|t| Span::styled(format!("[{t}] "), state.theme.tag_style(t)))
                    .collect::<Vec<_>>(),
            ),
            Line::from(Span::styled(format!("id {}", c.id), state.theme.muted)),
        ],
        None => vec![Line::from(Span::styled(
            "No customer selected",
            state.theme.muted,
        ))],
    };
    Paragraph::new(lines).block(block)
}

fn status_line(state: &AppState) -> Paragraph<'_> {
    let left = if state.reported_text.is_empty() {
        Span::styled("search: (empty)", state.theme.muted)
    } else {
        Span::styled(format!("search: \"{}\"", state.reported_text), state.theme.selected)
    };
    Paragraph::new(Line::from(vec![
        left,
        Span::styled("   F1 help · Tab focus · Ctrl+c quit", state.theme.muted),
    ]))
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

fn install_panic_hook() {
    let original = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        original(info);
    }));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
