use serde::{Deserialize, Serialize};

/// Languages the preprocessing pipeline can prepare text for
///
/// Each variant is identified by its ISO 639-1 code, which is also its
/// serialized form in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    /// English (en)
    #[default]
    #[serde(rename = "en")]
    English,
    /// Italian (it)
    #[serde(rename = "it")]
    Italian,
    /// French (fr)
    #[serde(rename = "fr")]
    French,
    /// German (de)
    #[serde(rename = "de")]
    German,
    /// Spanish (es)
    #[serde(rename = "es")]
    Spanish,
    /// Portuguese (pt)
    #[serde(rename = "pt")]
    Portuguese,
    /// Hungarian (hu)
    #[serde(rename = "hu")]
    Hungarian,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Italian,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Portuguese,
        Language::Hungarian,
    ];

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Italian => "it",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Portuguese => "pt",
            Language::Hungarian => "hu",
        }
    }

    /// Get the language name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Italian => "Italian",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Portuguese => "Portuguese",
            Language::Hungarian => "Hungarian",
        }
    }

    /// Look up a language by code; accepts region-tagged codes like `en-US`
    ///
    /// # Example
    /// ```
    /// use textprep::Language;
    /// assert_eq!(Language::from_code("hu"), Some(Language::Hungarian));
    /// assert_eq!(Language::from_code("en-US"), Some(Language::English));
    /// assert_eq!(Language::from_code("xx"), None);
    /// ```
    pub fn from_code(code: &str) -> Option<Language> {
        let primary = code.split(['-', '_']).next().unwrap_or("");
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(primary))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_code(s).ok_or_else(|| format!("unsupported language: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("en"), Some(Language::English));
        assert_eq!(Language::from_code("IT"), Some(Language::Italian));
        assert_eq!(Language::from_code("pt_BR"), Some(Language::Portuguese));
        assert_eq!(Language::from_code("hu"), Some(Language::Hungarian));
        assert_eq!(Language::from_code(""), None);
        assert_eq!(Language::from_code("klingon"), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("de".parse::<Language>().unwrap(), Language::German);
        assert!("zz".parse::<Language>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::Hungarian.to_string(), "Hungarian");
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::French).unwrap(), "\"fr\"");
        let lang: Language = serde_json::from_str("\"hu\"").unwrap();
        assert_eq!(lang, Language::Hungarian);
    }
}
