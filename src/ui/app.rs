//! Main UI Application
//!
//! Holds the browser state (filters, sort, selection, expanded cards) and
//! renders the catalog screen.

use std::collections::HashSet;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::catalog::{query, Catalog, CatalogEntry, Category, EntryId, Facets, ItemFilter, PriceRange, Selection, SortMode};
use crate::config::MarketConfig;
use super::widgets::{format_coins, name_color, render_help, render_item_details};

/// Truncate a string to fit within max_len characters, adding "…" if truncated
fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        name.to_string()
    } else if max_len <= 1 {
        "…".to_string()
    } else {
        let truncated: String = name.chars().take(max_len - 1).collect();
        format!("{}…", truncated)
    }
}

/// What keystrokes currently edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Browsing,
    /// Typing into the search box
    Searching,
}

/// Main UI application
pub struct App {
    catalog: Catalog,
    /// Filter options, computed once per catalog
    facets: Facets,
    filter: ItemFilter,
    sort_mode: SortMode,
    /// Ids of the entries currently shown, in display order
    visible: Vec<EntryId>,
    /// Index into `visible`
    cursor: usize,
    /// Entries whose quality pricing is expanded
    expanded: HashSet<EntryId>,
    input_mode: InputMode,
    /// Upper bound of the max-price control
    max_price: f64,
    price_step: f64,
    starting_balance: f64,
}

impl App {
    pub fn new(catalog: Catalog, config: &MarketConfig) -> Self {
        let facets = Facets::extract(catalog.entries());
        log::info!(
            "Catalog ready: {} items, {} rarities, {} tiers",
            catalog.len(),
            facets.rarities.len() - 1,
            facets.tiers.len() - 1
        );

        let mut app = Self {
            catalog,
            facets,
            filter: ItemFilter::default(),
            sort_mode: SortMode::default(),
            visible: Vec::new(),
            cursor: 0,
            expanded: HashSet::new(),
            input_mode: InputMode::Browsing,
            max_price: config.max_price,
            price_step: config.price_step,
            starting_balance: config.starting_balance,
        };
        app.filter = app.default_filter();
        app.refresh();
        app
    }

    fn default_filter(&self) -> ItemFilter {
        ItemFilter {
            price_range: PriceRange::new(0.0, self.max_price),
            ..ItemFilter::default()
        }
    }

    /// Recompute the visible list from the current filter and sort
    fn refresh(&mut self) {
        self.visible = query(self.catalog.entries(), &self.filter, self.sort_mode)
            .into_iter()
            .map(|e| e.id)
            .collect();
        if self.cursor >= self.visible.len() {
            self.cursor = self.visible.len().saturating_sub(1);
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    /// Number of entries matching the current filter
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// The entries currently shown, in display order
    pub fn visible_entries(&self) -> Vec<&CatalogEntry> {
        self.visible.iter().filter_map(|id| self.catalog.get(*id)).collect()
    }

    /// The highlighted entry, if any
    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.visible.get(self.cursor).and_then(|id| self.catalog.get(*id))
    }

    pub fn is_expanded(&self, id: EntryId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn toggle_expanded(&mut self, id: EntryId) {
        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Reset every filter to its default; the sort mode is kept
    pub fn clear_filters(&mut self) {
        self.filter = self.default_filter();
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.filter = filter;
        self.refresh();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.refresh();
    }

    fn cycle_category(&mut self) {
        let options: Vec<Selection<Category>> = std::iter::once(Selection::All)
            .chain(Category::ALL.into_iter().map(Selection::Only))
            .collect();
        let next = options
            .iter()
            .position(|o| *o == self.filter.category)
            .map(|i| (i + 1) % options.len())
            .unwrap_or(0);
        self.filter.category = options[next].clone();
        self.refresh();
    }

    fn adjust_max_price(&mut self, raise: bool) {
        let current = self.filter.price_range.max;
        let next = if raise {
            current + self.price_step
        } else {
            current - self.price_step
        };
        self.filter.price_range.max = next.clamp(0.0, self.max_price);
        self.refresh();
    }

    /// Handle a key press. Returns true when the app should quit.
    pub fn handle_input(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        match self.input_mode {
            InputMode::Searching => self.handle_search_input(key),
            InputMode::Browsing => self.handle_browse_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Browsing;
            }
            KeyCode::Backspace => {
                self.filter.search_text.pop();
                self.refresh();
            }
            KeyCode::Char(c) => {
                self.filter.search_text.push(c);
                self.refresh();
            }
            _ => {}
        }
        Ok(false)
    }

    fn handle_browse_input(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('/') => {
                self.input_mode = InputMode::Searching;
            }
            // Navigation
            KeyCode::Up | KeyCode::Char('k') => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.cursor + 1 < self.visible.len() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.visible.len().saturating_sub(1),
            // Filters
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Char('r') => {
                self.filter.rarity = self.facets.next_rarity(&self.filter.rarity);
                self.refresh();
            }
            KeyCode::Char('t') => {
                self.filter.tier = self.facets.next_tier(&self.filter.tier);
                self.refresh();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_max_price(true),
            KeyCode::Char('-') => self.adjust_max_price(false),
            KeyCode::Char('s') => self.set_sort_mode(self.sort_mode.next()),
            KeyCode::Char('x') => self.clear_filters(),
            // Expand quality pricing
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.visible.get(self.cursor).copied() {
                    self.toggle_expanded(id);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(4), // Filters
                Constraint::Length(1), // Count
                Constraint::Min(5),    // Items
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_filters(frame, chunks[1]);
        self.render_count(frame, chunks[2]);
        self.render_items(frame, chunks[3]);
        render_help(chunks[4], frame.buffer_mut());
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(200, 150, 30)));

        let lines = vec![
            Line::from(Span::styled(
                "Valheim Marketplace",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Starting Balance: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{} coins", format_coins(self.starting_balance)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let label = Style::default().fg(Color::Gray);
        let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);

        let search_style = if self.input_mode == InputMode::Searching {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
        } else {
            value
        };
        let search_text = if self.filter.search_text.is_empty() && self.input_mode == InputMode::Browsing {
            Span::styled("Search by name...", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(self.filter.search_text.clone(), search_style)
        };
        let cursor = if self.input_mode == InputMode::Searching { "_" } else { "" };

        let lines = vec![
            Line::from(vec![
                Span::styled("Search: ", label),
                search_text,
                Span::styled(cursor, Style::default().fg(Color::Yellow)),
            ]),
            Line::from(vec![
                Span::styled("Category: ", label),
                Span::styled(self.filter.category.to_string(), value),
                Span::styled("   Rarity: ", label),
                Span::styled(self.filter.rarity.to_string(), value),
                Span::styled("   Tier: ", label),
                Span::styled(self.filter.tier.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("Max Price: ", label),
                Span::styled(
                    format!("{} coins", format_coins(self.filter.price_range.max)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled("   Sort By: ", label),
                Span::styled(self.sort_mode.label(), value),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::Rgb(70, 70, 80)));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_count(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("Showing ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.visible_count().to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" items", Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_items(&self, frame: &mut Frame, area: Rect) {
        if self.visible.is_empty() {
            self.render_empty(frame, area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        self.render_item_list(frame, columns[0]);
        if let Some(entry) = self.selected() {
            render_item_details(entry, self.is_expanded(entry.id), columns[1], frame.buffer_mut());
        }
    }

    fn render_item_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Items ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));
        let inner = block.inner(area);

        // Keep the cursor on screen
        let height = inner.height as usize;
        let offset = if height == 0 || self.cursor < height {
            0
        } else {
            self.cursor + 1 - height
        };

        let name_width = (inner.width as usize).saturating_sub(16).max(4);
        let lines: Vec<Line> = self
            .visible_entries()
            .into_iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, entry)| {
                let is_selected = i == self.cursor;
                let prefix = if is_selected { "> " } else { "  " };
                let mut name_style = Style::default().fg(name_color(entry));
                if is_selected {
                    name_style = name_style.bg(Color::Rgb(40, 40, 50)).add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(prefix, Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{:<width$}", truncate_name(entry.name(), name_width), width = name_width),
                        name_style,
                    ),
                    Span::styled(
                        format!(" {:>12}", format_coins(entry.effective_price())),
                        Style::default().fg(Color::Yellow),
                    ),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_empty(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(70, 70, 80)));
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No items found",
                Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Try adjusting your filters",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(block).alignment(ratatui::layout::Alignment::Center),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::normalize::tests::{make_food, make_potion, sample_catalog};
    use ratatui::{backend::TestBackend, Terminal};

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_input(KeyEvent::new(code, KeyModifiers::NONE)).unwrap()
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn new_app() -> App {
        App::new(sample_catalog(), &MarketConfig::default())
    }

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_starts_with_everything_sorted_by_name() {
        let app = new_app();
        assert_eq!(app.visible_count(), app.catalog().len());
        assert_eq!(app.selected().map(|e| e.name()), Some("Abyssal razor"));
    }

    #[test]
    fn test_search_mode_edits_text() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode(), InputMode::Searching);

        type_text(&mut app, "hon");
        assert_eq!(app.filter().search_text, "hon");
        assert_eq!(app.visible_count(), 1);

        // 'q' is text while searching
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.visible_count(), 0);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.visible_count(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode(), InputMode::Browsing);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_category_cycle() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.filter().category, Selection::Only(Category::Armor));
        assert_eq!(app.visible_count(), 2);
        for _ in 0..4 {
            press(&mut app, KeyCode::Char('c'));
        }
        assert_eq!(app.filter().category, Selection::All);
    }

    #[test]
    fn test_rarity_and_tier_cycle_through_facets() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.filter().rarity, Selection::Only("Common".to_string()));
        assert_eq!(app.visible_count(), 1);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.filter().tier, Selection::Only(2));
        assert_eq!(app.visible_count(), 1);
    }

    #[test]
    fn test_max_price_is_clamped() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.filter().price_range.max, 1_000_000.0);

        for _ in 0..1000 {
            press(&mut app, KeyCode::Char('-'));
        }
        assert_eq!(app.filter().price_range.max, 0.0);
        assert_eq!(app.visible_count(), 0);
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn test_clear_filters_keeps_sort() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('c'));
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.filter(), &ItemFilter::default());
        assert_eq!(app.sort_mode(), SortMode::PriceLow);
        assert_eq!(app.selected().map(|e| e.name()), Some("Honey"));
    }

    #[test]
    fn test_expansion_is_keyed_by_id_not_name() {
        let catalog = Catalog::new(&[], &[make_food("Honey", 10.0)], &[], &[make_potion("Honey", 12.0)]);
        let mut app = App::new(catalog, &MarketConfig::default());

        press(&mut app, KeyCode::Enter);
        let first = app.selected().map(|e| e.id).unwrap();
        press(&mut app, KeyCode::Down);
        let second = app.selected().map(|e| e.id).unwrap();

        assert!(app.is_expanded(first));
        assert!(!app.is_expanded(second));

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.is_expanded(first));
    }

    #[test]
    fn test_cursor_stays_in_bounds_after_filtering() {
        let mut app = new_app();
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.selected().is_some());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected().map(|e| e.category), Some(Category::Armor));
    }

    #[test]
    fn test_render_shows_count_and_selection() {
        let app = new_app();
        let text = screen_text(&app);
        assert!(text.contains("Valheim Marketplace"));
        assert!(text.contains("100,000 coins"));
        assert!(text.contains("Showing 8 items"));
        assert!(text.contains("Abyssal razor"));
    }

    #[test]
    fn test_render_empty_state() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "zzz");
        let text = screen_text(&app);
        assert!(text.contains("Showing 0 items"));
        assert!(text.contains("No items found"));
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Bronze helmet", 20), "Bronze helmet");
        assert_eq!(truncate_name("Bronze helmet", 7), "Bronze…");
        assert_eq!(truncate_name("Bronze helmet", 1), "…");
    }
}
