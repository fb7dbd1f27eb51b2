//! Target-language support for script generation.
//!
//! The generator was built for Russian and Kazakh audiences, so the language
//! drives three things: the wording requested from the model, the character
//! set the dedup normalizer retains, and the user-facing failure message.

use serde::{Deserialize, Serialize};

/// Target language for generated scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[serde(rename = "ru")]
    Russian,
    #[serde(rename = "kz")]
    Kazakh,
}

impl Default for Language {
    fn default() -> Self {
        Language::Russian
    }
}

impl Language {
    /// Short tag as used in config files and the CLI (`ru` / `kz`).
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Russian => "ru",
            Language::Kazakh => "kz",
        }
    }

    /// Parse a tag back into a language.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "ru" => Some(Language::Russian),
            "kz" => Some(Language::Kazakh),
            _ => None,
        }
    }

    /// English name of the language, used when instructing the model.
    pub fn instruction_name(&self) -> &'static str {
        match self {
            Language::Russian => "Russian",
            Language::Kazakh => "Kazakh",
        }
    }

    /// Whether a character survives fingerprint normalization.
    ///
    /// The retained set is Unicode alphanumerics, which covers Latin text,
    /// the Cyrillic alphabet and the Kazakh-specific letters
    /// (ә, ғ, қ, ң, ө, ұ, ү, һ, і) alike; generated scripts mix these
    /// freely, so neither language narrows the set. Whitespace is handled
    /// separately by the normalizer. The method stays on `Language` so a
    /// stricter per-alphabet set can be introduced without touching the
    /// processor.
    pub fn retains(&self, c: char) -> bool {
        c.is_alphanumeric()
    }

    /// The single user-facing generation failure message.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Language::Russian => "Произошла ошибка при генерации. Попробуйте ещё раз.",
            Language::Kazakh => "Генерация кезінде қате пайда болды. Қайталап көріңіз.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        assert_eq!(Language::from_tag("ru"), Some(Language::Russian));
        assert_eq!(Language::from_tag(" KZ "), Some(Language::Kazakh));
        assert_eq!(Language::from_tag("en"), None);
        assert_eq!(Language::Russian.tag(), "ru");
        assert_eq!(Language::Kazakh.tag(), "kz");
    }

    #[test]
    fn test_retains_covers_both_alphabets() {
        for c in "привет".chars() {
            assert!(Language::Russian.retains(c));
        }
        // Kazakh-specific letters must survive normalization.
        for c in "әғқңөұүһі".chars() {
            assert!(Language::Kazakh.retains(c));
        }
        assert!(Language::Russian.retains('7'));
        assert!(!Language::Russian.retains('!'));
        assert!(!Language::Kazakh.retains('—'));
    }

    #[test]
    fn test_config_tags_deserialize() {
        let ru: Language = serde_json::from_str("\"ru\"").unwrap();
        let kz: Language = serde_json::from_str("\"kz\"").unwrap();
        assert_eq!(ru, Language::Russian);
        assert_eq!(kz, Language::Kazakh);
    }
}
