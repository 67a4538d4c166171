//! Orchestration of the fetch → cache → filter → sort → render pipeline.
//!
//! `UserDirectory` owns the view state, the cache and the view handle, and is
//! the only mutator of the authoritative list. Front-ends either await
//! [`UserDirectory::load_users`] directly or split it into
//! [`UserDirectory::begin_fetch`] and [`UserDirectory::complete_fetch`] when
//! the request runs on a background task.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::api::{ConnectionStatus, FetchError, UserSource};
use crate::cache::{CacheManager, Snapshot};
use crate::models::UserRecord;
use crate::render::{render_summary, render_users, View, MSG_OFFLINE_BANNER};
use crate::view::{SortKey, ViewState};

/// How long the offline banner stays up.
pub const BANNER_DURATION: Duration = Duration::from_millis(3000);

pub struct UserDirectory<V: View> {
    state: ViewState,
    cache: CacheManager,
    view: V,
    busy: bool,
    banner_until: Option<Instant>,
}

impl<V: View> UserDirectory<V> {
    /// Create the directory and draw the initial empty state.
    pub fn new(cache: CacheManager, view: V, sort_key: SortKey) -> Self {
        let mut directory = Self {
            state: ViewState::new(sort_key),
            cache,
            view,
            busy: false,
            banner_until: None,
        };

        directory.view.hide_error();
        directory.view.set_loading(false);
        directory.view.set_trigger_busy(false);
        directory.view.set_status(ConnectionStatus::Checking);
        directory.render();
        directory
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // =========================================================================
    // Cache restore
    // =========================================================================

    /// Adopt a fresh persisted snapshot, if any. Returns true when one was adopted.
    pub fn restore_on_startup(&mut self) -> bool {
        self.restore_at(Utc::now().timestamp_millis())
    }

    pub fn restore_at(&mut self, now_ms: i64) -> bool {
        match self.cache.load() {
            Some(snapshot) if snapshot.is_fresh_at(now_ms) => {
                info!(count = snapshot.users.len(), "Restored fresh snapshot");
                self.adopt_snapshot(snapshot, now_ms);
                true
            }
            Some(snapshot) => {
                debug!(age = %snapshot.age_display_at(now_ms), "Snapshot is stale, not restoring");
                false
            }
            None => false,
        }
    }

    fn adopt_snapshot(&mut self, snapshot: Snapshot, now_ms: i64) {
        let banner = format!("{} · salvo {}", MSG_OFFLINE_BANNER, snapshot.age_display_at(now_ms));
        let loaded_at = snapshot.captured_time().unwrap_or_else(Utc::now);
        self.state.replace_all(snapshot.users, loaded_at);
        self.render();
        self.show_banner(&banner);
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Mark a fetch as outstanding.
    ///
    /// Returns false and changes nothing when one is already outstanding;
    /// the caller must not start a request in that case.
    pub fn begin_fetch(&mut self) -> bool {
        if self.busy {
            debug!("Fetch already in progress, ignoring trigger");
            return false;
        }

        self.busy = true;
        self.view.set_trigger_busy(true);
        self.view.set_loading(true);
        true
    }

    /// Apply the outcome of the outstanding fetch.
    pub fn complete_fetch(&mut self, result: Result<Vec<UserRecord>, FetchError>) {
        self.complete_fetch_at(result, Utc::now());
    }

    pub fn complete_fetch_at(&mut self, result: Result<Vec<UserRecord>, FetchError>, now: DateTime<Utc>) {
        match result {
            Ok(users) => {
                info!(count = users.len(), "Fetch succeeded");
                self.cache
                    .save(&Snapshot::captured_at(users.clone(), now.timestamp_millis()));
                self.state.replace_all(users, now);
                self.view.hide_error();
                self.render();
            }
            Err(e) => {
                warn!(error = %e, "Fetch failed");
                self.view.show_error(e.user_message());

                if self.state.authoritative().is_empty() {
                    // Fallback ignores freshness
                    match self.cache.load() {
                        Some(snapshot) => {
                            info!(count = snapshot.users.len(), "Falling back to cached snapshot");
                            self.adopt_snapshot(snapshot, now.timestamp_millis());
                        }
                        None => debug!("No cached snapshot to fall back to"),
                    }
                }
            }
        }

        self.busy = false;
        self.view.set_loading(false);
        self.view.set_trigger_busy(false);
    }

    /// Fetch the user list and apply the outcome. A no-op while a fetch is outstanding.
    pub async fn load_users<S: UserSource>(&mut self, source: &S) {
        if !self.begin_fetch() {
            return;
        }
        let result = source.fetch_all().await;
        self.complete_fetch(result);
    }

    /// Re-invoke the same fetch after a failure.
    pub async fn retry<S: UserSource>(&mut self, source: &S) {
        self.load_users(source).await;
    }

    pub async fn check_status<S: UserSource>(&mut self, source: &S) {
        let status = source.check_status().await;
        self.set_status(status);
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        debug!(?status, "Connectivity status updated");
        self.view.set_status(status);
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Drop all users and evict the persisted snapshot.
    pub fn clear(&mut self) {
        info!("Clearing users");
        self.state.clear();
        self.cache.evict();
        self.render();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
        render_users(&mut self.view, &self.state);
    }

    pub fn push_query_char(&mut self, c: char) {
        self.state.push_query_char(c);
        render_users(&mut self.view, &self.state);
    }

    pub fn pop_query_char(&mut self) {
        self.state.pop_query_char();
        render_users(&mut self.view, &self.state);
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.state.set_sort_key(sort_key);
        render_users(&mut self.view, &self.state);
    }

    pub fn cycle_sort_key(&mut self, forward: bool) {
        let current = self.state.sort_key();
        self.set_sort_key(if forward { current.next() } else { current.prev() });
    }

    // =========================================================================
    // Banner
    // =========================================================================

    fn show_banner(&mut self, text: &str) {
        self.view.show_banner(text);
        self.banner_until = Some(Instant::now() + BANNER_DURATION);
    }

    /// Dismiss the banner once its time is up.
    pub fn tick(&mut self, now: Instant) {
        if self.banner_until.is_some_and(|until| now >= until) {
            self.banner_until = None;
            self.view.hide_banner();
        }
    }

    fn render(&mut self) {
        render_users(&mut self.view, &self.state);
        render_summary(&mut self.view, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{MSG_NETWORK, MSG_NOT_FOUND};
    use crate::render::testing::RecordingView;
    use crate::render::{EmptyState, MSG_NEVER_UPDATED};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeSource {
        result: Result<Vec<UserRecord>, FetchError>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn returning(result: Result<Vec<UserRecord>, FetchError>) -> Self {
            Self {
                result,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl UserSource for FakeSource {
        fn fetch_all(&self) -> impl Future<Output = Result<Vec<UserRecord>, FetchError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = self.result.clone();
            async move { result }
        }

        fn check_status(&self) -> impl Future<Output = ConnectionStatus> + Send {
            let status = if self.result.is_ok() {
                ConnectionStatus::Connected
            } else {
                ConnectionStatus::Disconnected
            };
            async move { status }
        }
    }

    fn leanne() -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Leanne Graham",
            "email": "Sincere@april.biz",
            "company": { "name": "Romaguera-Crona" },
            "address": { "city": "Gwenborough", "street": "Kulas Light" },
            "phone": "1-770-736-8031",
            "website": "hildegard.org",
        }))
        .unwrap()
    }

    fn ervin() -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Ervin Howell",
            "email": "Shanna@melissa.tv",
            "company": { "name": "Deckow-Crist" },
        }))
        .unwrap()
    }

    fn not_found() -> FetchError {
        FetchError::Http {
            status: 404,
            status_text: "Not Found".to_string(),
        }
    }

    fn directory() -> (TempDir, UserDirectory<RecordingView>) {
        let dir = TempDir::new().unwrap();
        let cache = CacheManager::new(dir.path().to_path_buf()).unwrap();
        (dir, UserDirectory::new(cache, RecordingView::default(), SortKey::None))
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    #[test]
    fn test_initial_render() {
        let (_dir, directory) = directory();
        let view = directory.view();
        assert_eq!(view.empty, Some(EmptyState::NotLoaded));
        assert_eq!(view.last_update, MSG_NEVER_UPDATED);
        assert_eq!(view.status, Some(ConnectionStatus::Checking));
        assert!(!view.trigger_busy);
    }

    #[tokio::test]
    async fn test_successful_fetch_renders_and_saves() {
        let (_dir, mut directory) = directory();
        let source = FakeSource::returning(Ok(vec![leanne()]));

        directory.load_users(&source).await;

        let view = directory.view();
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].initials, "LG");
        assert_eq!(view.count, "1 usuário");
        assert_eq!(view.error, None);
        assert!(!view.loading);
        assert!(!view.trigger_busy);
        assert_eq!(directory.cache().load().unwrap().users, vec![leanne()]);
    }

    #[tokio::test]
    async fn test_successful_fetch_hides_previous_error() {
        let (_dir, mut directory) = directory();
        directory.load_users(&FakeSource::returning(Err(not_found()))).await;
        assert!(directory.view().error.is_some());

        directory.retry(&FakeSource::returning(Ok(vec![leanne()]))).await;
        assert_eq!(directory.view().error, None);
    }

    #[tokio::test]
    async fn test_fetch_reapplies_query_and_sort() {
        let (_dir, mut directory) = directory();
        directory.set_sort_key(SortKey::NameAsc);
        directory.set_query("o");

        directory
            .load_users(&FakeSource::returning(Ok(vec![leanne(), ervin()])))
            .await;

        let names: Vec<&str> = directory.view().cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ervin Howell", "Leanne Graham"]);
    }

    #[tokio::test]
    async fn test_empty_fetch_is_not_the_unloaded_state() {
        let (_dir, mut directory) = directory();
        directory.load_users(&FakeSource::returning(Ok(Vec::new()))).await;

        assert_eq!(directory.view().empty, Some(EmptyState::EmptyResult));
        assert_eq!(directory.view().count, "0 usuários");
    }

    #[tokio::test]
    async fn test_404_keeps_authoritative_list() {
        let (_dir, mut directory) = directory();
        directory.load_users(&FakeSource::returning(Ok(vec![leanne()]))).await;
        directory.load_users(&FakeSource::returning(Err(not_found()))).await;

        assert_eq!(directory.view().error.as_deref(), Some(MSG_NOT_FOUND));
        assert_eq!(directory.state().authoritative(), &[leanne()]);
        assert_eq!(directory.view().cards.len(), 1);
        assert!(!directory.view().trigger_busy);
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_stale_cache_when_empty() {
        let (_dir, mut directory) = directory();
        directory
            .cache()
            .save(&Snapshot::captured_at(vec![leanne()], now_ms() - 2 * 3_600_000));

        directory.load_users(&FakeSource::returning(Err(not_found()))).await;

        assert_eq!(directory.view().error.as_deref(), Some(MSG_NOT_FOUND));
        assert_eq!(directory.state().authoritative(), &[leanne()]);
        assert_eq!(
            directory.view().banner.as_deref(),
            Some("Carregando dados salvos localmente (offline) · salvo 2h atrás")
        );
    }

    #[tokio::test]
    async fn test_failure_without_cache_stays_empty() {
        let (_dir, mut directory) = directory();
        directory
            .load_users(&FakeSource::returning(Err(FetchError::Network("refused".to_string()))))
            .await;

        assert_eq!(directory.view().error.as_deref(), Some(MSG_NETWORK));
        assert_eq!(directory.view().empty, Some(EmptyState::NotLoaded));
        assert_eq!(directory.view().banner, None);
    }

    #[test]
    fn test_restore_fresh_snapshot() {
        let (_dir, mut directory) = directory();
        directory
            .cache()
            .save(&Snapshot::captured_at(vec![leanne()], now_ms() - 3_599_999 + 1_000));

        assert!(directory.restore_on_startup());
        assert_eq!(directory.view().cards.len(), 1);
        let banner = directory.view().banner.clone().unwrap();
        assert!(banner.starts_with(MSG_OFFLINE_BANNER));
    }

    #[test]
    fn test_restore_skips_stale_snapshot() {
        let (_dir, mut directory) = directory();
        let now = now_ms();
        directory
            .cache()
            .save(&Snapshot::captured_at(vec![leanne()], now - 3_600_001));

        assert!(!directory.restore_at(now));
        assert_eq!(directory.view().empty, Some(EmptyState::NotLoaded));
        assert_eq!(directory.view().banner, None);
    }

    #[test]
    fn test_restore_skips_snapshot_from_the_distant_past() {
        let (_dir, mut directory) = directory();
        directory
            .cache()
            .save(&Snapshot::captured_at(vec![leanne()], i64::MIN));

        assert!(!directory.restore_at(now_ms()));
        assert_eq!(directory.view().empty, Some(EmptyState::NotLoaded));
        assert_eq!(directory.view().banner, None);
    }

    #[test]
    fn test_banner_dismisses_after_duration() {
        let (_dir, mut directory) = directory();
        directory.cache().save(&Snapshot::new(vec![leanne()]));
        assert!(directory.restore_on_startup());

        directory.tick(Instant::now());
        assert!(directory.view().banner.is_some());

        directory.tick(Instant::now() + BANNER_DURATION);
        assert_eq!(directory.view().banner, None);
    }

    #[tokio::test]
    async fn test_clear_evicts_and_resets() {
        let (_dir, mut directory) = directory();
        directory
            .load_users(&FakeSource::returning(Ok(vec![leanne(), ervin()])))
            .await;

        directory.clear();

        assert!(directory.state().authoritative().is_empty());
        assert!(directory.state().displayed().is_empty());
        assert!(directory.cache().load().is_none());
        assert_eq!(directory.view().empty, Some(EmptyState::NotLoaded));
        assert_eq!(directory.view().last_update, MSG_NEVER_UPDATED);
        assert_eq!(directory.view().count, "0 usuários");
    }

    #[test]
    fn test_second_trigger_is_ignored_while_busy() {
        let (_dir, mut directory) = directory();
        assert!(directory.begin_fetch());
        assert!(directory.view().trigger_busy);
        assert!(directory.view().loading);

        assert!(!directory.begin_fetch());

        directory.complete_fetch(Ok(vec![leanne()]));
        assert!(!directory.is_busy());
        assert!(directory.begin_fetch());
    }

    #[tokio::test]
    async fn test_load_users_skips_source_while_busy() {
        let (_dir, mut directory) = directory();
        let source = FakeSource::returning(Ok(vec![leanne()]));
        directory.begin_fetch();

        directory.load_users(&source).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_query_on_company_name() {
        let (_dir, mut directory) = directory();
        directory.begin_fetch();
        directory.complete_fetch(Ok(vec![leanne(), ervin()]));

        directory.set_query("crona");
        assert_eq!(directory.view().cards.len(), 1);
        assert_eq!(directory.view().cards[0].name, "Leanne Graham");

        directory.push_query_char('x');
        assert_eq!(directory.view().empty, Some(EmptyState::NoMatch));

        directory.pop_query_char();
        assert_eq!(directory.view().cards.len(), 1);
    }

    #[test]
    fn test_cycle_sort_key() {
        let (_dir, mut directory) = directory();
        directory.complete_fetch(Ok(vec![leanne(), ervin()]));

        directory.cycle_sort_key(true);
        assert_eq!(directory.state().sort_key(), SortKey::NameAsc);
        assert_eq!(directory.view().cards[0].name, "Ervin Howell");

        directory.cycle_sort_key(false);
        assert_eq!(directory.state().sort_key(), SortKey::None);
        assert_eq!(directory.view().cards[0].name, "Leanne Graham");
    }

    #[tokio::test]
    async fn test_check_status() {
        let (_dir, mut directory) = directory();
        directory
            .check_status(&FakeSource::returning(Err(FetchError::Shape)))
            .await;
        assert_eq!(directory.view().status, Some(ConnectionStatus::Disconnected));
    }
}
