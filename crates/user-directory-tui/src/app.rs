//! Application state management for the user directory TUI.
//!
//! This module contains the `App` struct that owns the directory pipeline,
//! the UI mode, the list selection and the background task channel.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use user_directory_core::{
    CacheManager, Config, ConnectionStatus, FetchError, UserClient, UserDirectory, UserRecord,
};

use crate::ui::screen::Screen;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// At most one fetch and one probe are in flight at a time.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 5;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    Quitting,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from spawned tasks back to the event loop.
#[derive(Debug)]
enum BackgroundResult {
    /// Outcome of the user list fetch
    Users(Result<Vec<UserRecord>, FetchError>),
    /// Outcome of the connectivity probe
    Status(ConnectionStatus),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    pub config: Config,
    pub client: UserClient,
    pub directory: UserDirectory<Screen>,

    pub state: AppState,
    pub selection: usize,

    bg_rx: mpsc::Receiver<BackgroundResult>,
    bg_tx: mpsc::Sender<BackgroundResult>,
}

impl App {
    /// Create a new application instance from the loaded config.
    pub fn new(config: Config, cache_dir: PathBuf) -> Result<Self> {
        debug!(?cache_dir, api_url = config.api_url(), "App::new() starting");
        let client = UserClient::with_url(config.api_url())?;
        let cache = CacheManager::new(cache_dir)?;
        Ok(Self::with_parts(config, client, cache))
    }

    pub fn with_parts(config: Config, client: UserClient, cache: CacheManager) -> Self {
        debug!(url = client.url(), sort = %config.default_sort, "Building directory");
        let directory = UserDirectory::new(cache, Screen::default(), config.default_sort);
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            client,
            directory,
            state: AppState::Normal,
            selection: 0,
            bg_rx: rx,
            bg_tx: tx,
        }
    }

    /// Startup sequence: restore a fresh snapshot and probe connectivity.
    /// Optionally kick off a fetch right away.
    pub fn start(&mut self, fetch: bool) {
        if self.directory.restore_on_startup() {
            info!("Showing cached users");
        }
        self.start_status_probe();
        if fetch {
            self.start_fetch();
        }
    }

    pub fn screen(&self) -> &Screen {
        self.directory.view()
    }

    // =========================================================================
    // Background tasks
    // =========================================================================

    /// Helper to send background results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<BackgroundResult>, result: BackgroundResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send background result - channel closed");
        }
    }

    /// Spawn a fetch unless one is already outstanding.
    pub fn start_fetch(&mut self) {
        if !self.directory.begin_fetch() {
            return;
        }

        let client = self.client.clone();
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_all().await;
            Self::send_result(&tx, BackgroundResult::Users(result)).await;
        });
    }

    /// Retry after a failure. Only meaningful while the error region is shown.
    pub fn retry(&mut self) {
        if self.screen().error.is_some() {
            self.start_fetch();
        }
    }

    /// Spawn the best-effort connectivity probe.
    pub fn start_status_probe(&self) {
        let client = self.client.clone();
        let tx = self.bg_tx.clone();
        tokio::spawn(async move {
            let status = client.check_status().await;
            Self::send_result(&tx, BackgroundResult::Status(status)).await;
        });
    }

    /// Drain completed background tasks and apply their results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.bg_rx.try_recv() {
            self.process_background_result(result);
        }
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Users(result) => {
                self.directory.complete_fetch(result);
                self.clamp_selection();
            }
            BackgroundResult::Status(status) => self.directory.set_status(status),
        }
    }

    /// Periodic housekeeping from the event loop.
    pub fn tick(&mut self) {
        self.directory.tick(Instant::now());
    }

    // =========================================================================
    // User actions
    // =========================================================================

    pub fn clear(&mut self) {
        self.directory.clear();
        self.selection = 0;
    }

    pub fn push_search_char(&mut self, c: char) {
        self.directory.push_query_char(c);
        self.selection = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.directory.pop_query_char();
        self.selection = 0;
    }

    pub fn clear_search(&mut self) {
        self.directory.set_query("");
        self.selection = 0;
    }

    pub fn cycle_sort(&mut self, forward: bool) {
        self.directory.cycle_sort_key(forward);
        self.selection = 0;
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn list_len(&self) -> usize {
        self.screen().list.len()
    }

    pub fn select_next(&mut self, step: usize) {
        let last = self.list_len().saturating_sub(1);
        self.selection = (self.selection + step).min(last);
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selection = self.selection.saturating_sub(step);
    }

    pub fn select_first(&mut self) {
        self.selection = 0;
    }

    pub fn select_last(&mut self) {
        self.selection = self.list_len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selection = self.selection.min(self.list_len().saturating_sub(1));
    }
}

// ============================================================================
// Tests
// ============================================================================
