//! Result dropdown: the selection/navigation overlay under the search box.
//!
//! [`DropdownState`] is a synchronous state machine driven by the event loop.
//! It never changes the search state; it reads the current page and reports
//! the customer the user committed to.
//!
//! # Visibility
//!
//! Opens on focus. A blur only schedules a close `grace` later, so a click on
//! an item (which also takes focus away from the input) still lands first.
//! `Escape` closes at once.
//!
//! # Navigation
//!
//! `↓` moves to `min(i + 1, len - 1)`, `↑` to `max(i - 1, none)`. No wrap.
//! Ignored while hidden or when there is nothing to highlight.
//!
//! # Scrolling
//!
//! A page can hold more items than fit on screen. `scroll_offset` is the
//! index of the first item drawn; it follows the highlight so the
//! highlighted item is always inside the rendered window. The render pass
//! records how many whole items fit (`capacity`) for the next key event.

use crate::event::{AppEvent, Direction};
use crate::theme::Theme;
use custsearch_client::SearchState;
use custsearch_core::Customer;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget},
};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Terminal rows per rendered item: name, address line, tags.
pub const ITEM_HEIGHT: u16 = 3;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct DropdownState {
    pub visible: bool,
    /// Index into the current page; `None` means nothing highlighted.
    pub highlighted: Option<usize>,
    /// Index of the first item drawn.
    pub scroll_offset: usize,
    close_at: Option<Instant>,
    grace: Duration,
    /// Whole items that fit in the list area at the last render.
    capacity: Cell<usize>,
}

impl DropdownState {
    pub fn new(grace: Duration) -> Self {
        Self {
            visible: false,
            highlighted: None,
            scroll_offset: 0,
            close_at: None,
            grace,
            capacity: Cell::new(usize::MAX),
        }
    }

    pub fn focus(&mut self) {
        self.visible = true;
        self.close_at = None;
    }

    /// Schedule a close `grace` after `now`.
    pub fn blur(&mut self, now: Instant) {
        self.close_at = Some(now + self.grace);
    }

    /// Apply a scheduled close once its deadline has passed. Returns `true`
    /// if the dropdown closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.close_at {
            Some(deadline) if now >= deadline => {
                self.close();
                true
            }
            _ => false,
        }
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.highlighted = None;
        self.scroll_offset = 0;
        self.close_at = None;
    }

    /// The input text was edited.
    pub fn text_changed(&mut self) {
        self.highlighted = None;
        self.scroll_offset = 0;
    }

    /// Keep the highlight consistent with a newly observed search state.
    pub fn sync(&mut self, search: &SearchState) {
        match results(search) {
            [] => {
                self.highlighted = None;
                self.scroll_offset = 0;
            }
            page => {
                if let Some(i) = self.highlighted {
                    self.highlighted = Some(i.min(page.len() - 1));
                }
                self.scroll_offset = self.first_visible(page.len());
            }
        }
    }

    /// Index of the first item on screen for a page of `len` items: the
    /// stored offset, pulled back so the window is full and moved just
    /// enough to contain the highlight.
    pub fn first_visible(&self, len: usize) -> usize {
        let capacity = self.capacity.get().max(1);
        let mut first = self.scroll_offset.min(len.saturating_sub(capacity));
        if let Some(i) = self.highlighted {
            if i < first {
                first = i;
            } else if i >= first.saturating_add(capacity) {
                first = i + 1 - capacity;
            }
        }
        first
    }

    /// Handle a keyboard event against the current search state. Returns the
    /// committed customer on `Enter` over a highlighted item.
    pub fn handle(&mut self, event: &AppEvent, search: &SearchState) -> Option<Customer> {
        if !self.visible {
            return None;
        }
        if matches!(event, AppEvent::Escape) {
            tracing::debug!("dropdown: escape");
            self.close();
            return None;
        }

        let page = results(search);
        if page.is_empty() {
            return None;
        }

        match event {
            AppEvent::Nav(Direction::Down) => {
                let next = self.highlighted.map_or(0, |i| i + 1).min(page.len() - 1);
                self.highlighted = Some(next);
                self.scroll_offset = self.first_visible(page.len());
                tracing::debug!(highlighted = next, scroll_offset = self.scroll_offset, "dropdown: down");
                None
            }
            AppEvent::Nav(Direction::Up) => {
                self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
                self.scroll_offset = self.first_visible(page.len());
                tracing::debug!(highlighted = ?self.highlighted, scroll_offset = self.scroll_offset, "dropdown: up");
                None
            }
            AppEvent::Enter => {
                let index = self.highlighted?;
                self.pick(index, search)
            }
            _ => None,
        }
    }

    /// Pointer hovering over item `index`.
    pub fn hover(&mut self, index: usize, search: &SearchState) {
        let len = results(search).len();
        if self.visible && index < len {
            self.highlighted = Some(index);
            self.scroll_offset = self.first_visible(len);
        }
    }

    /// Commit item `index` (keyboard or pointer). Closes the dropdown.
    pub fn pick(&mut self, index: usize, search: &SearchState) -> Option<Customer> {
        if !self.visible {
            return None;
        }
        let customer = results(search).get(index).cloned()?;
        tracing::debug!(id = customer.id, "dropdown: committed");
        self.close();
        Some(customer)
    }
}

fn results(search: &SearchState) -> &[Customer] {
    match search {
        SearchState::Results(page) => &page.customers,
        _ => &[],
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// What the dropdown shows for a given input text and search state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<'a> {
    Hidden,
    TooShort(usize),
    Loading,
    Error(&'a str),
    NoResults(&'a str),
    Items(&'a [Customer], usize),
}

impl<'a> Content<'a> {
    pub fn resolve(text: &'a str, search: &'a SearchState, min_characters: usize) -> Self {
        let chars = text.trim().chars().count();
        if chars == 0 {
            return Content::Hidden;
        }
        if chars < min_characters {
            return Content::TooShort(min_characters);
        }
        match search {
            SearchState::Idle => Content::Hidden,
            SearchState::Loading => Content::Loading,
            SearchState::Error(msg) => Content::Error(msg),
            SearchState::Results(page) if page.is_empty() => Content::NoResults(text.trim()),
            SearchState::Results(page) => Content::Items(&page.customers, page.total_count),
        }
    }

    /// Rows needed including borders, before clipping to the screen.
    pub fn height(&self) -> u16 {
        match self {
            Content::Hidden => 0,
            // borders + items + footer
            Content::Items(items, _) => u16::try_from(items.len())
                .unwrap_or(u16::MAX)
                .saturating_mul(ITEM_HEIGHT)
                .saturating_add(3),
            _ => 3,
        }
    }
}

/// Item index under terminal `row`, given the area the dropdown was last
/// rendered into and the index of the first item drawn there.
pub fn item_at(area: Rect, row: u16, len: usize, first: usize) -> Option<usize> {
    let top = area.y + 1;
    let bottom = area.bottom().saturating_sub(2); // border + footer
    let shown = bottom.saturating_sub(top) / ITEM_HEIGHT;
    if row < top || row >= top + shown * ITEM_HEIGHT {
        return None;
    }
    let index = first + ((row - top) / ITEM_HEIGHT) as usize;
    (index < len).then_some(index)
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

pub struct Dropdown<'a> {
    state: &'a DropdownState,
    content: Content<'a>,
    theme: &'a Theme,
}

impl<'a> Dropdown<'a> {
    pub fn new(state: &'a DropdownState, content: Content<'a>, theme: &'a Theme) -> Self {
        Self { state, content, theme }
    }
}

impl Widget for Dropdown<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.visible || self.content == Content::Hidden || area.height == 0 {
            return;
        }
        Clear.render(area, buf);

        let block = Block::bordered().border_style(self.theme.border_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let (items, total) = match self.content {
            Content::Items(items, total) => (items, total),
            other => {
                let line = match other {
                    Content::TooShort(n) => Line::from(Span::styled(
                        format!("Type at least {n} characters to search"),
                        self.theme.muted,
                    )),
                    Content::Loading => Line::from(Span::styled("Searching...", self.theme.loading)),
                    Content::Error(msg) => Line::from(Span::styled(msg, self.theme.error)),
                    Content::NoResults(query) => Line::from(Span::styled(
                        format!("No customers found for \"{query}\""),
                        self.theme.muted,
                    )),
                    _ => Line::default(),
                };
                Paragraph::new(line).centered().render(inner, buf);
                return;
            }
        };

        // Reserve the last inner row for the footer.
        let list_area = Rect {
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let capacity = usize::from(list_area.height / ITEM_HEIGHT).max(1);
        self.state.capacity.set(capacity);
        let first = self.state.first_visible(items.len());

        let mut lines: Vec<Line> = Vec::with_capacity(capacity * ITEM_HEIGHT as usize);
        for (i, customer) in items.iter().enumerate().skip(first).take(capacity) {
            let highlight = self.state.highlighted == Some(i);
            let patch = |style: Style| if highlight { self.theme.highlight.patch(style) } else { style };

            lines.push(Line::from(Span::styled(customer.name.as_str(), patch(self.theme.item_name))));
            lines.push(Line::from(Span::styled(
                format!("  {}, {}", customer.address, customer.postcode),
                patch(self.theme.item_detail),
            )));
            let mut tags = vec![Span::styled("  ", patch(Style::default()))];
            for tag in &customer.tags {
                tags.push(Span::styled(format!("[{tag}]"), patch(self.theme.tag_style(tag))));
                tags.push(Span::styled(" ", patch(Style::default())));
            }
            lines.push(Line::from(tags));
        }

        Paragraph::new(lines).render(list_area, buf);

        if inner.height > 0 {
            let footer_area = Rect {
                y: inner.bottom() - 1,
                height: 1,
                ..inner
            };
            Paragraph::new(Line::from(Span::styled(
                format!("showing {} of {}", items.len(), total),
                self.theme.muted,
            )))
            .right_aligned()
            .render(footer_area, buf);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
