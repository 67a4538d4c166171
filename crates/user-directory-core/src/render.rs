//! Projection of the view state onto a view handle.
//!
//! The front-end implements [`View`]; this module decides what goes into
//! each region. Every call replaces the region content.

use crate::api::ConnectionStatus;
use crate::models::UserRecord;
use crate::utils::{format_clock, format_user_count};
use crate::view::ViewState;

pub const MSG_NOT_LOADED: &str = "Nenhum usuário carregado ainda. Pressione [r] para carregar.";
pub const MSG_EMPTY_RESULT: &str = "A API não retornou nenhum usuário.";
pub const MSG_NO_MATCH: &str = "Nenhum usuário corresponde à sua busca.";
pub const MSG_NEVER_UPDATED: &str = "Nunca atualizado";
pub const MSG_OFFLINE_BANNER: &str = "Carregando dados salvos localmente (offline)";

/// Which empty message the list region shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// Nothing fetched or restored yet, or cleared
    NotLoaded,
    /// A fetch succeeded with zero users
    EmptyResult,
    /// Users exist but none matches the query
    NoMatch,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NotLoaded => MSG_NOT_LOADED,
            EmptyState::EmptyResult => MSG_EMPTY_RESULT,
            EmptyState::NoMatch => MSG_NO_MATCH,
        }
    }
}

/// Display fields of one user entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub id: i64,
    pub name: String,
    pub initials: String,
    pub email: String,
    pub company: String,
    pub location: String,
    pub phone: String,
    pub website: String,
}

impl From<&UserRecord> for UserCard {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            initials: user.initials(),
            email: user.email.clone(),
            company: user.company_display(),
            location: user.location(),
            phone: user.phone.clone(),
            website: user.website.clone(),
        }
    }
}

/// View handle: the named regions the pipeline writes to.
pub trait View {
    /// Replace the list region with one entry per card.
    fn show_users(&mut self, cards: Vec<UserCard>);

    /// Replace the list region with an empty-state message.
    fn show_empty(&mut self, state: EmptyState);

    fn show_error(&mut self, message: &str);

    fn hide_error(&mut self);

    /// Loading indicator next to the list.
    fn set_loading(&mut self, loading: bool);

    /// Busy affordance on the trigger control.
    fn set_trigger_busy(&mut self, busy: bool);

    fn set_count(&mut self, text: String);

    fn set_last_update(&mut self, text: String);

    fn set_status(&mut self, status: ConnectionStatus);

    fn show_banner(&mut self, text: &str);

    fn hide_banner(&mut self);
}

/// Empty state for the current view, or `None` when there is something to list.
pub fn empty_state(state: &ViewState) -> Option<EmptyState> {
    if !state.is_loaded() {
        Some(EmptyState::NotLoaded)
    } else if state.authoritative().is_empty() {
        Some(EmptyState::EmptyResult)
    } else if state.displayed_len() == 0 {
        Some(EmptyState::NoMatch)
    } else {
        None
    }
}

pub fn render_users<V: View>(view: &mut V, state: &ViewState) {
    match empty_state(state) {
        Some(empty) => view.show_empty(empty),
        None => view.show_users(state.displayed().into_iter().map(UserCard::from).collect()),
    }
}

pub fn render_summary<V: View>(view: &mut V, state: &ViewState) {
    let count = state.authoritative().len();
    view.set_count(format_user_count(count));

    let last_update = match state.loaded_at() {
        Some(at) if count > 0 => format!("Última atualização: {}", format_clock(at)),
        _ => MSG_NEVER_UPDATED.to_string(),
    };
    view.set_last_update(last_update);
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingView;
    use super::*;
    use chrono::Utc;

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

    #[test]
    fn test_card_fields() {
        let card = UserCard::from(&leanne());
        assert_eq!(card.initials, "LG");
        assert_eq!(card.company, "Romaguera-Crona");
        assert_eq!(card.location, "Gwenborough, Kulas Light");
        assert_eq!(card.phone, "1-770-736-8031");
        assert_eq!(card.website, "hildegard.org");
    }

    #[test]
    fn test_render_not_loaded() {
        let mut view = RecordingView::default();
        let state = ViewState::default();
        render_users(&mut view, &state);
        render_summary(&mut view, &state);

        assert_eq!(view.empty, Some(EmptyState::NotLoaded));
        assert_eq!(view.count, "0 usuários");
        assert_eq!(view.last_update, MSG_NEVER_UPDATED);
    }

    #[test]
    fn test_render_empty_result_is_not_the_unloaded_message() {
        let mut view = RecordingView::default();
        let mut state = ViewState::default();
        state.replace_all(Vec::new(), Utc::now());
        render_users(&mut view, &state);

        assert_eq!(view.empty, Some(EmptyState::EmptyResult));
        assert_ne!(EmptyState::EmptyResult.message(), MSG_NOT_LOADED);
    }

    #[test]
    fn test_render_no_match() {
        let mut view = RecordingView::default();
        let mut state = ViewState::default();
        state.replace_all(vec![leanne()], Utc::now());
        state.set_query("nobody");
        render_users(&mut view, &state);

        assert_eq!(view.empty, Some(EmptyState::NoMatch));
        assert!(view.cards.is_empty());
    }

    #[test]
    fn test_render_populated() {
        let mut view = RecordingView::default();
        let mut state = ViewState::default();
        state.replace_all(vec![leanne()], Utc::now());
        render_users(&mut view, &state);
        render_summary(&mut view, &state);

        assert_eq!(view.empty, None);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.cards[0].initials, "LG");
        assert_eq!(view.count, "1 usuário");
        assert!(view.last_update.starts_with("Última atualização: "));
    }

    #[test]
    fn test_render_replaces_previous_content() {
        let mut view = RecordingView::default();
        let mut state = ViewState::default();
        state.replace_all(vec![leanne()], Utc::now());
        render_users(&mut view, &state);
        state.clear();
        render_users(&mut view, &state);

        assert!(view.cards.is_empty());
        assert_eq!(view.empty, Some(EmptyState::NotLoaded));
        assert_eq!(view.renders, 2);
    }
}
