//! Bilingual UI-string catalog for generated decks.
//!
//! The catalog is an injected, read-only lookup rather than a module-wide
//! constant, so tests can exercise several languages in one process and
//! alternate catalogs can be supplied without touching global state.

use crate::{Error, Result};
use std::collections::HashMap;

/// Spanish UI strings (the original default language).
const ES: &[(&str, &str)] = &[
    ("cover", "Portada"),
    ("agenda", "Agenda"),
    ("introduction", "Introducción"),
    ("conclusions", "Conclusiones y próximos pasos"),
    ("section", "Sección"),
    ("takeaway", "Punto Clave"),
    ("image", "Imagen"),
    ("summary_learnings", "Resumen de aprendizajes"),
    ("immediate_actions", "Acciones inmediatas"),
    ("responsible_deadlines", "Responsables y plazos"),
    ("key_point", "Punto"),
];

/// English UI strings.
const EN: &[(&str, &str)] = &[
    ("cover", "Cover"),
    ("agenda", "Agenda"),
    ("introduction", "Introduction"),
    ("conclusions", "Conclusions and Next Steps"),
    ("section", "Section"),
    ("takeaway", "Key Takeaway"),
    ("image", "Image"),
    ("summary_learnings", "Summary of learnings"),
    ("immediate_actions", "Immediate actions"),
    ("responsible_deadlines", "Responsibilities and deadlines"),
    ("key_point", "Point"),
];

/// Read-only lookup of localized UI strings keyed by language code.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<String, HashMap<String, String>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// Create a catalog with the built-in `es` and `en` tables.
    pub fn new() -> Self {
        let mut catalog = Self {
            tables: HashMap::new(),
        };
        catalog.register("es", ES.iter().map(|&(k, v)| (k.to_string(), v.to_string())));
        catalog.register("en", EN.iter().map(|&(k, v)| (k.to_string(), v.to_string())));
        catalog
    }

    /// Register (or replace) a language table.
    pub fn register<I>(&mut self, language: &str, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.tables
            .insert(language.to_lowercase(), entries.into_iter().collect());
    }

    /// True if the language code has a registered table.
    pub fn has_language(&self, language: &str) -> bool {
        self.tables.contains_key(&language.to_lowercase())
    }

    /// Fail with `UnknownLanguage` unless the code is registered.
    pub fn ensure_language(&self, language: &str) -> Result<()> {
        if self.has_language(language) {
            Ok(())
        } else {
            Err(Error::UnknownLanguage(language.to_string()))
        }
    }

    /// Look up a localized string.
    ///
    /// An unregistered language is an error; an unknown key falls back to the
    /// key itself (logged), matching the behavior callers expect for
    /// forward-compatible key sets.
    pub fn text<'a>(&'a self, language: &str, key: &'a str) -> Result<&'a str> {
        let table = self
            .tables
            .get(&language.to_lowercase())
            .ok_or_else(|| Error::UnknownLanguage(language.to_string()))?;

        match table.get(key) {
            Some(value) => Ok(value.as_str()),
            None => {
                log::warn!("No '{}' translation for key '{}'", language, key);
                Ok(key)
            }
        }
    }

    /// Registered language codes, sorted for stable output.
    pub fn languages(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}
