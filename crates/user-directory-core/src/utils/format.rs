use std::cmp::Ordering;

use chrono::{DateTime, Local, Utc};

/// Check whether `haystack` contains `needle`, ignoring case.
/// `needle` should already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}

/// Fold a character to its base letter for collation: lowercase and with
/// common Latin diacritics removed.
fn fold_char(c: char) -> char {
    let lower = c.to_lowercase().next().unwrap_or(c);
    match lower {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Locale-aware string ordering.
///
/// Compares base letters first (ignoring case and accents), then accents,
/// then case with lowercase first, then raw codepoints.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(fold_char)
        .cmp(b.chars().map(fold_char))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            // Lowercase sorts before uppercase at equal letters
            a.chars()
                .map(|c| c.is_uppercase())
                .cmp(b.chars().map(|c| c.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}

/// "1 usuário", "N usuários".
pub fn format_user_count(count: usize) -> String {
    if count == 1 {
        "1 usuário".to_string()
    } else {
        format!("{} usuários", count)
    }
}

/// Wall-clock time in the local timezone, e.g. "14:05:09".
pub fn format_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
