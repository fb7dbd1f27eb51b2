//! Error taxonomy for the generation pipeline.
//!
//! Every upstream failure mode collapses into one variant of
//! [`GenerationError`]; the detailed cause goes to the logs while the user
//! sees a single localized message. Ignored input (empty topic, submit
//! while loading) and cancelled-then-discarded responses are not errors and
//! are represented as outcomes, not as variants here.

use thiserror::Error;

use crate::language::Language;

/// A failed generation attempt. No history or dedup state is mutated when
/// one of these is produced.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("service returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response did not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("service returned an empty response")]
    EmptyResponse,

    #[error("request timed out after {0} seconds")]
    Timeout(u64),
}

impl GenerationError {
    /// The single user-facing message for any failure, in the session's
    /// target language. The per-variant detail stays in logs.
    pub fn user_message(&self, language: Language) -> &'static str {
        language.failure_message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_is_localized() {
        let err = GenerationError::EmptyResponse;
        assert_eq!(
            err.user_message(Language::Russian),
            "Произошла ошибка при генерации. Попробуйте ещё раз."
        );
        assert_eq!(
            err.user_message(Language::Kazakh),
            "Генерация кезінде қате пайда болды. Қайталап көріңіз."
        );
    }

    #[test]
    fn test_all_variants_share_one_message() {
        let timeout = GenerationError::Timeout(60);
        let api = GenerationError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(
            timeout.user_message(Language::Russian),
            api.user_message(Language::Russian)
        );
    }
}
