//! Language type: validated language representation.

use crate::i18n::{LanguageConfig, LanguageRegistry, NormalizedPath};
use anyhow::{bail, Result};

/// A validated site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "en", "fr")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };
    pub const FRENCH: Language = Language { code: "fr" };

    /// Create a Language from a language code string.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered
    /// * `Err` if the code is not found
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the canonical language (English).
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Language of the page tree a normalized path belongs to.
    pub fn of_path(path: &NormalizedPath) -> Language {
        let config = LanguageRegistry::get().for_path(path.as_str());
        Language { code: config.code }
    }

    /// The other language of the bilingual pair.
    pub fn counterpart(&self) -> Language {
        if self.is_canonical() {
            Language::FRENCH
        } else {
            Language::canonical()
        }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This cannot
    /// happen for values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Normalized root prefix of this language's pages ("/" or "/fr/").
    pub fn root_prefix(&self) -> &'static str {
        self.config().root_prefix
    }

    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }
}
