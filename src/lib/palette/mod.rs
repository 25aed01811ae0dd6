//! Keyboard-driven search palette.
//!
//! [`Palette`] is a small unidirectional store: events go in through
//! [`Palette::dispatch`], the state is updated synchronously, and every
//! subscriber sees the new [`PaletteState`] once per event that changed it.
//! Filtered results are always derived from the query and the item list,
//! never edited directly.

use crate::{config::SEARCH_RESULT_LIMIT, search::SearchItem};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    Other,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }

    pub fn meta(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        }
    }

    /// Cmd+K or Ctrl+K.
    pub fn is_open_shortcut(&self) -> bool {
        (self.modifiers.ctrl || self.modifiers.meta)
            && matches!(self.key, Key::Char('k') | Key::Char('K'))
    }

    fn is_typing(&self) -> bool {
        !(self.modifiers.ctrl || self.modifiers.meta || self.modifiers.alt)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaletteEvent {
    Key(KeyEvent),
    /// The search field's full text after an edit.
    Input(String),
    /// The search button in the page header.
    OpenButton,
    BackdropClick,
    /// A click on the filtered result at this position.
    ItemClick(usize),
}

/// Where the palette asks the host to go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaletteState {
    pub is_open: bool,
    pub query: String,
    pub selected_index: usize,
    pub filtered_items: Vec<SearchItem>,
}

impl PaletteState {
    pub fn selected_item(&self) -> Option<&SearchItem> {
        self.filtered_items.get(self.selected_index)
    }

    /// Text shown in place of results when nothing matches.
    pub fn empty_message(&self) -> Option<String> {
        if !self.filtered_items.is_empty() {
            None
        } else if self.query.is_empty() {
            Some("type to search pages and posts...".to_string())
        } else {
            Some(format!("no results for \"{}\"", self.query))
        }
    }
}

/// Items matching `query`, at most [`SEARCH_RESULT_LIMIT`] of them.
///
/// Matching is a case-insensitive substring test on title and excerpt. With
/// an empty query every item matches and featured items come first, ordered
/// by their priority; everything else keeps its input order.
pub fn filter_items(items: &[SearchItem], query: &str) -> Vec<SearchItem> {
    let needle = query.to_lowercase();
    let mut matched: Vec<&SearchItem> = items.iter().filter(|i| i.matches(&needle)).collect();

    if query.is_empty() {
        matched.sort_by_key(|i| {
            if i.is_featured() {
                (0, i.featured_rank())
            } else {
                (1, 0)
            }
        });
    }

    matched
        .into_iter()
        .take(SEARCH_RESULT_LIMIT)
        .cloned()
        .collect()
}

type Subscriber = Box<dyn FnMut(&PaletteState)>;

pub struct Palette {
    items: Vec<SearchItem>,
    state: PaletteState,
    subscribers: Vec<Subscriber>,
}

impl Palette {
    pub fn new(items: Vec<SearchItem>) -> Self {
        let mut palette = Self {
            items,
            state: PaletteState::default(),
            subscribers: Vec::new(),
        };
        palette.recompute();
        palette
    }

    pub fn state(&self) -> &PaletteState {
        &self.state
    }

    /// Register a callback run after every state change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&PaletteState) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Replace the searchable items, keeping the query.
    pub fn set_items(&mut self, items: Vec<SearchItem>) {
        let before = self.state.clone();
        self.items = items;
        self.recompute();
        self.notify_if_changed(&before);
    }

    /// Apply one event. Returns the target when the event selects a result.
    pub fn dispatch(&mut self, event: PaletteEvent) -> Option<Navigation> {
        let before = self.state.clone();
        let navigation = self.reduce(event);
        self.notify_if_changed(&before);
        navigation
    }

    fn reduce(&mut self, event: PaletteEvent) -> Option<Navigation> {
        match event {
            PaletteEvent::Key(key) if key.is_open_shortcut() => {
                self.open();
                None
            }
            PaletteEvent::OpenButton => {
                self.open();
                None
            }
            _ if !self.state.is_open => None,
            PaletteEvent::Key(key) => self.handle_key(key),
            PaletteEvent::Input(text) => {
                self.set_query(text);
                None
            }
            PaletteEvent::BackdropClick => {
                self.close();
                None
            }
            PaletteEvent::ItemClick(index) => self.activate(index),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Navigation> {
        match key.key {
            Key::Escape => self.close(),
            Key::ArrowDown => self.move_selection_down(),
            Key::ArrowUp => self.move_selection_up(),
            Key::Enter => return self.activate(self.state.selected_index),
            Key::Backspace if key.is_typing() => {
                let mut query = self.state.query.clone();
                if query.pop().is_some() {
                    self.set_query(query);
                }
            }
            Key::Char(c) if key.is_typing() => {
                let mut query = self.state.query.clone();
                query.push(c);
                self.set_query(query);
            }
            _ => {}
        }
        None
    }

    fn open(&mut self) {
        if !self.state.is_open {
            self.state.is_open = true;
            self.state.query.clear();
            self.recompute();
        }
        self.state.selected_index = 0;
    }

    fn close(&mut self) {
        self.state.is_open = false;
        self.state.query.clear();
        self.state.selected_index = 0;
        self.recompute();
    }

    fn set_query(&mut self, query: String) {
        self.state.query = query;
        self.recompute();
        self.state.selected_index = 0;
    }

    fn move_selection_down(&mut self) {
        let last = self.state.filtered_items.len().saturating_sub(1);
        self.state.selected_index = (self.state.selected_index + 1).min(last);
    }

    fn move_selection_up(&mut self) {
        self.state.selected_index = self.state.selected_index.saturating_sub(1);
    }

    fn activate(&mut self, index: usize) -> Option<Navigation> {
        let url = self.state.filtered_items.get(index)?.url.clone();
        tracing::debug!(%url, "palette navigation");
        self.close();
        Some(Navigation { url })
    }

    fn recompute(&mut self) {
        self.state.filtered_items = filter_items(&self.items, &self.state.query);
        let last = self.state.filtered_items.len().saturating_sub(1);
        self.state.selected_index = self.state.selected_index.min(last);
    }

    fn notify_if_changed(&mut self, before: &PaletteState) {
        if self.state == *before {
            return;
        }
        for subscriber in &mut self.subscribers {
            subscriber(&self.state);
        }
    }
}
