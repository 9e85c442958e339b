//! Lexical registry: the recognized keywords, operators and punctuation
//!
//! Each table maps a surface form to its canonical kind. Keywords and
//! operators are case-insensitive and stored lower-cased; punctuation is
//! matched exactly. A surface form may belong to one table only, and every
//! mutation re-checks that before it is applied.

use super::pattern::TokenPattern;
use crate::config::compile_time::lexical::MAX_LABEL_DIGITS;
use crate::logging::codes::{self, Code};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Which registry table a surface form belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Keyword,
    Operator,
    Punctuation,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Section::Keyword => "keyword",
            Section::Operator => "operator",
            Section::Punctuation => "punctuation",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Surface form '{surface}' is already registered as {existing}, cannot add it as {requested}")]
    ConflictingSurfaceForm {
        surface: String,
        existing: Section,
        requested: Section,
    },

    #[error("Empty surface form cannot be registered as {section}")]
    EmptySurfaceForm { section: Section },

    #[error("Keyword '{surface}' must be a letter followed by letters, digits or underscores")]
    MalformedKeyword { surface: String },
}

impl RegistryError {
    pub fn error_code(&self) -> Code {
        match self {
            RegistryError::ConflictingSurfaceForm { .. } => {
                codes::registry::CONFLICTING_SURFACE_FORM
            }
            RegistryError::EmptySurfaceForm { .. } | RegistryError::MalformedKeyword { .. } => {
                codes::registry::EMPTY_SURFACE_FORM
            }
        }
    }
}

const DEFAULT_KEYWORDS: &[(&str, &str)] = &[
    ("integer", "INTEGER"),
    ("real", "REAL"),
    ("if", "IF"),
    ("then", "THEN"),
    ("else", "ELSE"),
    ("endif", "ENDIF"),
    ("program", "PROGRAM"),
    ("end", "END"),
    ("true", "TRUE"),
    ("false", "FALSE"),
];

const DEFAULT_OPERATORS: &[(&str, &str)] = &[
    ("+", "PLUS"),
    ("-", "MINUS"),
    ("*", "MULT"),
    ("/", "DIV"),
    ("**", "POWER"),
    (".eq.", "EQ"),
    (".ne.", "NE"),
    (".lt.", "LT"),
    (".le.", "LE"),
    (".gt.", "GT"),
    (".ge.", "GE"),
    ("=", "ASSIGN"),
];

const DEFAULT_PUNCTUATION: &[(&str, &str)] = &[("(", "LPAREN"), (")", "RPAREN")];

#[derive(Debug, Clone, PartialEq)]
pub struct LexicalRegistry {
    keywords: BTreeMap<String, String>,
    operators: BTreeMap<String, String>,
    punctuation: BTreeMap<String, String>,
}

impl LexicalRegistry {
    /// Registry with no entries
    pub fn empty() -> Self {
        Self {
            keywords: BTreeMap::new(),
            operators: BTreeMap::new(),
            punctuation: BTreeMap::new(),
        }
    }

    /// The Fortran 77 subset: ten keywords, twelve operators, parentheses
    pub fn fortran_subset() -> Self {
        let mut registry = Self::empty();
        for (surface, kind) in DEFAULT_KEYWORDS {
            registry.keywords.insert(surface.to_string(), kind.to_string());
        }
        for (surface, kind) in DEFAULT_OPERATORS {
            registry.operators.insert(surface.to_string(), kind.to_string());
        }
        for (surface, kind) in DEFAULT_PUNCTUATION {
            registry.punctuation.insert(surface.to_string(), kind.to_string());
        }
        registry
    }

    /// Build a registry from explicit tables, rejecting cross-table duplicates
    pub fn from_tables(
        keywords: &[(&str, &str)],
        operators: &[(&str, &str)],
        punctuation: &[(&str, &str)],
    ) -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        for (surface, kind) in keywords {
            registry.add_keyword(surface, kind)?;
        }
        for (surface, kind) in operators {
            registry.add_operator(surface, kind)?;
        }
        for (surface, kind) in punctuation {
            registry.add_punctuation(surface, kind)?;
        }
        Ok(registry)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Register a keyword. Re-registering an existing keyword updates its kind.
    pub fn add_keyword(&mut self, surface: &str, kind: &str) -> Result<(), RegistryError> {
        let key = surface.to_lowercase();
        self.check_surface(&key, Section::Keyword)?;

        let mut chars = key.chars();
        let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !well_formed {
            return Err(RegistryError::MalformedKeyword {
                surface: surface.to_string(),
            });
        }

        self.keywords.insert(key, kind.to_string());
        Ok(())
    }

    pub fn add_operator(&mut self, surface: &str, kind: &str) -> Result<(), RegistryError> {
        let key = surface.to_lowercase();
        self.check_surface(&key, Section::Operator)?;
        self.operators.insert(key, kind.to_string());
        Ok(())
    }

    pub fn add_punctuation(&mut self, surface: &str, kind: &str) -> Result<(), RegistryError> {
        self.check_surface(surface, Section::Punctuation)?;
        self.punctuation.insert(surface.to_string(), kind.to_string());
        Ok(())
    }

    /// Remove a keyword, returning its kind if it was registered
    pub fn remove_keyword(&mut self, surface: &str) -> Option<String> {
        self.keywords.remove(&surface.to_lowercase())
    }

    fn check_surface(&self, surface: &str, requested: Section) -> Result<(), RegistryError> {
        if surface.is_empty() {
            return Err(RegistryError::EmptySurfaceForm { section: requested });
        }

        match self.section_of(surface) {
            Some(existing) if existing != requested => Err(RegistryError::ConflictingSurfaceForm {
                surface: surface.to_string(),
                existing,
                requested,
            }),
            _ => Ok(()),
        }
    }

    /// Table that already claims `surface`, compared case-insensitively
    pub fn section_of(&self, surface: &str) -> Option<Section> {
        let lowered = surface.to_lowercase();
        if self.keywords.contains_key(&lowered) {
            Some(Section::Keyword)
        } else if self.operators.contains_key(&lowered) {
            Some(Section::Operator)
        } else if self
            .punctuation
            .keys()
            .any(|p| p.to_lowercase() == lowered)
        {
            Some(Section::Punctuation)
        } else {
            None
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn keyword_kind(&self, surface: &str) -> Option<&str> {
        self.keywords.get(&surface.to_lowercase()).map(String::as_str)
    }

    pub fn operator_kind(&self, surface: &str) -> Option<&str> {
        self.operators.get(&surface.to_lowercase()).map(String::as_str)
    }

    pub fn punctuation_kind(&self, surface: &str) -> Option<&str> {
        self.punctuation.get(surface).map(String::as_str)
    }

    pub fn keywords(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keywords.iter().map(|(s, k)| (s.as_str(), k.as_str()))
    }

    pub fn operators(&self) -> impl Iterator<Item = (&str, &str)> {
        self.operators.iter().map(|(s, k)| (s.as_str(), k.as_str()))
    }

    pub fn punctuation(&self) -> impl Iterator<Item = (&str, &str)> {
        self.punctuation.iter().map(|(s, k)| (s.as_str(), k.as_str()))
    }

    /// Derive the prioritized matcher for the current table contents
    pub fn build_pattern(&self) -> TokenPattern {
        TokenPattern::new(
            self.keywords.clone(),
            longest_first(&self.operators),
            longest_first(&self.punctuation),
            MAX_LABEL_DIGITS,
        )
    }
}

impl Default for LexicalRegistry {
    fn default() -> Self {
        Self::fortran_subset()
    }
}

/// Alternation order: longer surface forms first, then lexicographic
fn longest_first(table: &BTreeMap<String, String>) -> Vec<(String, String)> {
    let mut entries: Vec<(String, String)> = table
        .iter()
        .map(|(s, k)| (s.clone(), k.clone()))
        .collect();
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    entries
}
