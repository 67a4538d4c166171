use thiserror::Error;

/// Shown when the endpoint cannot be reached at all.
pub const MSG_NETWORK: &str =
    "Não foi possível conectar à API. Verifique sua conexão com a internet.";

/// Shown when the endpoint answers 404.
pub const MSG_NOT_FOUND: &str = "API não encontrada (404). O endpoint pode ter mudado.";

/// Shown when the endpoint answers 500.
pub const MSG_SERVER_ERROR: &str = "Erro interno do servidor (500). Tente novamente mais tarde.";

/// Fallback for every other failure.
pub const MSG_GENERIC: &str = "Erro ao carregar os usuários. Tente novamente mais tarde.";

/// Failure of a user list fetch.
///
/// Transport errors are flattened to their message so the enum stays
/// `Clone` and can travel through the background channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Invalid response: payload is not an array")]
    Shape,

    #[error("Invalid response: {0}")]
    InvalidBody(String),
}

impl FetchError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        FetchError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// The fixed sentence shown in the error region for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Network(_) => MSG_NETWORK,
            FetchError::Http { status: 404, .. } => MSG_NOT_FOUND,
            FetchError::Http { status: 500, .. } => MSG_SERVER_ERROR,
            FetchError::Http { .. } | FetchError::Shape | FetchError::InvalidBody(_) => MSG_GENERIC,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_keeps_reason() {
        let err = FetchError::from_status(StatusCode::NOT_FOUND);
        assert_eq!(
            err,
            FetchError::Http {
                status: 404,
                status_text: "Not Found".to_string()
            }
        );
        assert_eq!(err.to_string(), "HTTP error: 404 Not Found");
    }

    #[test]
    fn test_user_message_per_kind() {
        assert_eq!(FetchError::Network("dns".to_string()).user_message(), MSG_NETWORK);
        assert_eq!(FetchError::from_status(StatusCode::NOT_FOUND).user_message(), MSG_NOT_FOUND);
        assert_eq!(
            FetchError::from_status(StatusCode::INTERNAL_SERVER_ERROR).user_message(),
            MSG_SERVER_ERROR
        );
        assert_eq!(FetchError::from_status(StatusCode::BAD_GATEWAY).user_message(), MSG_GENERIC);
        assert_eq!(FetchError::Shape.user_message(), MSG_GENERIC);
        assert_eq!(FetchError::InvalidBody("eof".to_string()).user_message(), MSG_GENERIC);
    }

    #[test]
    fn test_user_message_has_no_technical_detail() {
        let err = FetchError::Network("error sending request for url (http://x)".to_string());
        assert!(!err.user_message().contains("http://x"));
    }
}
