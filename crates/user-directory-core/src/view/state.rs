use chrono::{DateTime, Utc};

use crate::models::UserRecord;

use super::filter::{derive_indices, SortKey};

/// Process-local view state.
///
/// `displayed` is recomputed inside every mutator, so it always reflects the
/// current authoritative list, query and sort key.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    authoritative: Vec<UserRecord>,
    /// Indices into `authoritative`, in display order
    displayed: Vec<usize>,
    query: String,
    sort_key: SortKey,
    /// Capture time of the current authoritative list; `None` until something is loaded
    loaded_at: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Self::default()
        }
    }

    pub fn authoritative(&self) -> &[UserRecord] {
        &self.authoritative
    }

    pub fn displayed(&self) -> Vec<&UserRecord> {
        self.displayed.iter().map(|&i| &self.authoritative[i]).collect()
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed.len()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// True once a fetch or cache restore has populated the list, even with zero users.
    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    /// Replace the authoritative list wholesale.
    pub fn replace_all(&mut self, users: Vec<UserRecord>, loaded_at: DateTime<Utc>) {
        self.authoritative = users;
        self.loaded_at = Some(loaded_at);
        self.refresh();
    }

    /// Drop all users and forget when they were loaded. Query and sort survive.
    pub fn clear(&mut self) {
        self.authoritative.clear();
        self.loaded_at = None;
        self.refresh();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.refresh();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.refresh();
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.displayed = derive_indices(&self.authoritative, &self.query, self.sort_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::derive;

    fn user(id: i64, name: &str, company: &str) -> UserRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "email": format!("{}@example.com", id),
            "company": { "name": company },
        }))
        .unwrap()
    }

    fn sample() -> Vec<UserRecord> {
        vec![
            user(1, "Leanne Graham", "Romaguera-Crona"),
            user(2, "Ervin Howell", "Deckow-Crist"),
            user(3, "Clementine Bauch", "Romaguera-Jacobson"),
        ]
    }

    fn displayed_ids(state: &ViewState) -> Vec<i64> {
        state.displayed().iter().map(|u| u.id).collect()
    }

    fn assert_consistent(state: &ViewState) {
        let expected: Vec<i64> = derive(state.authoritative(), state.query(), state.sort_key())
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(displayed_ids(state), expected);
    }

    #[test]
    fn test_starts_empty_and_unloaded() {
        let state = ViewState::new(SortKey::None);
        assert!(state.authoritative().is_empty());
        assert!(state.displayed().is_empty());
        assert!(!state.is_loaded());
    }

    #[test]
    fn test_replace_all_recomputes() {
        let mut state = ViewState::new(SortKey::NameAsc);
        state.set_query("romaguera");
        state.replace_all(sample(), Utc::now());
        assert_eq!(displayed_ids(&state), vec![3, 1]);
        assert_consistent(&state);
    }

    #[test]
    fn test_empty_replace_counts_as_loaded() {
        let mut state = ViewState::default();
        state.replace_all(Vec::new(), Utc::now());
        assert!(state.is_loaded());
        assert_eq!(state.displayed_len(), 0);
    }

    #[test]
    fn test_every_mutation_keeps_displayed_consistent() {
        let mut state = ViewState::default();
        state.replace_all(sample(), Utc::now());
        assert_consistent(&state);

        state.push_query_char('c');
        assert_consistent(&state);
        state.push_query_char('r');
        assert_consistent(&state);
        state.set_sort_key(SortKey::NameDesc);
        assert_consistent(&state);
        state.pop_query_char();
        assert_consistent(&state);
        state.set_query("");
        assert_consistent(&state);
        assert_eq!(state.displayed_len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut state = ViewState::default();
        state.set_query("leanne");
        state.replace_all(sample(), Utc::now());
        state.clear();

        assert!(state.authoritative().is_empty());
        assert!(state.displayed().is_empty());
        assert!(!state.is_loaded());
        assert_eq!(state.query(), "leanne");
    }
}
