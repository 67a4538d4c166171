use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder shown for fields the source did not deliver.
pub const PLACEHOLDER: &str = "-";

/// A user as delivered by the directory endpoint.
///
/// Scalar fields default to empty strings so a sparse record never fails the
/// fetch. Nested objects are optional; their absence only matters when the
/// record is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub street: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub suite: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub zipcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Company {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(
        rename = "catchPhrase",
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub catch_phrase: String,
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "String::is_empty")]
    pub bs: String,
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl UserRecord {
    /// Company name, or an empty string when the record has no company.
    pub fn company_name(&self) -> &str {
        self.company.as_ref().map(|c| c.name.as_str()).unwrap_or("")
    }

    /// Avatar initialism: first letter of each whitespace-separated token of
    /// the name, uppercased and concatenated.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|token| token.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// "city, street" for display, or the placeholder without an address.
    pub fn location(&self) -> String {
        match self.address {
            Some(ref address) => format!("{}, {}", address.city, address.street),
            None => PLACEHOLDER.to_string(),
        }
    }

    pub fn company_display(&self) -> String {
        match self.company {
            Some(ref company) => company.name.clone(),
            None => PLACEHOLDER.to_string(),
        }
    }
}
