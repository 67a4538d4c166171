//! In-memory view handle drawn by the terminal renderer.
//!
//! The core pipeline writes into the regions through the `View` trait; the
//! ratatui code only reads them.

use user_directory_core::{ConnectionStatus, EmptyState, UserCard, View};

/// Content of the list region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRegion {
    Empty(EmptyState),
    Users(Vec<UserCard>),
}

impl ListRegion {
    pub fn len(&self) -> usize {
        match self {
            ListRegion::Empty(_) => 0,
            ListRegion::Users(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub list: ListRegion,
    pub error: Option<String>,
    pub loading: bool,
    pub trigger_busy: bool,
    pub count: String,
    pub last_update: String,
    pub status: ConnectionStatus,
    pub banner: Option<String>,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            list: ListRegion::Empty(EmptyState::NotLoaded),
            error: None,
            loading: false,
            trigger_busy: false,
            count: String::new(),
            last_update: String::new(),
            status: ConnectionStatus::Checking,
            banner: None,
        }
    }
}

impl View for Screen {
    fn show_users(&mut self, cards: Vec<UserCard>) {
        self.list = ListRegion::Users(cards);
    }

    fn show_empty(&mut self, state: EmptyState) {
        self.list = ListRegion::Empty(state);
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn hide_error(&mut self) {
        self.error = None;
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_trigger_busy(&mut self, busy: bool) {
        self.trigger_busy = busy;
    }

    fn set_count(&mut self, text: String) {
        self.count = text;
    }

    fn set_last_update(&mut self, text: String) {
        self.last_update = text;
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    fn show_banner(&mut self, text: &str) {
        self.banner = Some(text.to_string());
    }

    fn hide_banner(&mut self) {
        self.banner = None;
    }
}
