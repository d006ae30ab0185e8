//! Language registry: Single source of truth for the site's languages.
//!
//! Each language owns a root prefix under which its pages live. English is
//! canonical and served from `/`, French lives under `/fr/`. The registry is
//! initialized once through `OnceLock` and is immutable afterwards.

use std::sync::OnceLock;

/// Configuration for a site language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "fr")
    pub code: &'static str,

    /// English name of the language (e.g., "English", "French")
    pub name: &'static str,

    /// Native name of the language (e.g., "English", "Français")
    pub native_name: &'static str,

    /// Normalized path prefix of the language's page tree (e.g., "/fr/")
    pub root_prefix: &'static str,

    /// Whether this is the canonical language (only one should be true)
    pub is_canonical: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if no canonical language is found or if multiple canonical
    /// languages are defined (this indicates a configuration error).
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }

    /// Find the language whose page tree contains `normalized_path`.
    ///
    /// Translated languages are matched by root prefix first; anything that
    /// does not live under one of them belongs to the canonical language.
    pub fn for_path(&self, normalized_path: &str) -> &LanguageConfig {
        self.languages
            .iter()
            .filter(|lang| !lang.is_canonical)
            .find(|lang| normalized_path.starts_with(lang.root_prefix))
            .unwrap_or_else(|| self.canonical())
    }
}

/// Default language configurations: English (canonical) and French.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            root_prefix: "/",
            is_canonical: true,
        },
        LanguageConfig {
            code: "fr",
            name: "French",
            native_name: "Français",
            root_prefix: "/fr/",
            is_canonical: false,
        },
    ]
}
