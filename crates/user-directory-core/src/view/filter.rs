//! Filter and sort stage of the view pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::UserRecord;
use crate::utils::{contains_ignore_case, locale_cmp};

/// Ordering applied to the displayed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the order the source delivered
    #[default]
    None,
    NameAsc,
    NameDesc,
    EmailAsc,
    EmailDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::None,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::EmailAsc,
        SortKey::EmailDesc,
    ];

    /// Wire name, as used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::EmailAsc => "email-asc",
            SortKey::EmailDesc => "email-desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::None => "Sem ordenação",
            SortKey::NameAsc => "Nome (A-Z)",
            SortKey::NameDesc => "Nome (Z-A)",
            SortKey::EmailAsc => "E-mail (A-Z)",
            SortKey::EmailDesc => "E-mail (Z-A)",
        }
    }

    /// Get the next sort key (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            SortKey::None => SortKey::NameAsc,
            SortKey::NameAsc => SortKey::NameDesc,
            SortKey::NameDesc => SortKey::EmailAsc,
            SortKey::EmailAsc => SortKey::EmailDesc,
            SortKey::EmailDesc => SortKey::None,
        }
    }

    /// Get the previous sort key (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            SortKey::None => SortKey::EmailDesc,
            SortKey::NameAsc => SortKey::None,
            SortKey::NameDesc => SortKey::NameAsc,
            SortKey::EmailAsc => SortKey::NameDesc,
            SortKey::EmailDesc => SortKey::EmailAsc,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown sort key: {}", s))
    }
}

/// Check if a user matches the search query.
/// Query should already be lowercased.
fn user_matches_search(user: &UserRecord, query: &str) -> bool {
    contains_ignore_case(&user.name, query)
        || contains_ignore_case(&user.email, query)
        || contains_ignore_case(user.company_name(), query)
}

/// Positions in `users` of the records to display, in display order.
pub fn derive_indices(users: &[UserRecord], query: &str, sort_key: SortKey) -> Vec<usize> {
    let query = query.to_lowercase();
    let mut indices: Vec<usize> = (0..users.len())
        .filter(|&i| query.is_empty() || user_matches_search(&users[i], &query))
        .collect();

    // sort_by is stable, so equal keys keep their filtered order
    match sort_key {
        SortKey::None => {}
        SortKey::NameAsc => indices.sort_by(|&a, &b| locale_cmp(&users[a].name, &users[b].name)),
        SortKey::NameDesc => indices.sort_by(|&a, &b| locale_cmp(&users[b].name, &users[a].name)),
        SortKey::EmailAsc => indices.sort_by(|&a, &b| locale_cmp(&users[a].email, &users[b].email)),
        SortKey::EmailDesc => {
            indices.sort_by(|&a, &b| locale_cmp(&users[b].email, &users[a].email))
        }
    }

    indices
}

/// Users to display for `query` and `sort_key`, in display order.
pub fn derive<'a>(users: &'a [UserRecord], query: &str, sort_key: SortKey) -> Vec<&'a UserRecord> {
    derive_indices(users, query, sort_key)
        .into_iter()
        .map(|i| &users[i])
        .collect()
}
