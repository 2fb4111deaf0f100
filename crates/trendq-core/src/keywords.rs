//! Keywords and alias resolution.
//!
//! A keyword carries the phrase as it appeared in the input (the display
//! name, used for output naming and logging) and, optionally, a canonical
//! term that the portal understands better. Resolution is a plain lookup
//! table; a smarter resolver can be swapped in at the planning seam without
//! touching anything downstream.

use std::collections::HashMap;

use crate::error::ConfigError;

/// A single query term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    display: String,
    resolved: Option<String>,
}

impl Keyword {
    #[must_use]
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            resolved: None,
        }
    }

    #[must_use]
    pub fn with_resolved(display: impl Into<String>, resolved: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            resolved: Some(resolved.into()),
        }
    }

    /// The phrase as it appeared in the input. Used for output naming.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// The term actually sent to the portal: the canonical form when an
    /// alias applies, otherwise the display phrase itself.
    #[must_use]
    pub fn query_term(&self) -> &str {
        self.resolved.as_deref().unwrap_or(&self.display)
    }

    /// Whether an alias was applied.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Fixed lookup from display phrase to canonical query term.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Parses pipe-delimited `display|canonical` lines. Blank lines are
    /// skipped; anything else without exactly one `|` is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidAliasLine`] with the 1-based line number
    /// of the first malformed entry.
    pub fn from_lines<'a, I>(lines: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = HashMap::new();
        for (idx, raw) in lines.into_iter().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = || ConfigError::InvalidAliasLine {
                line_no: idx + 1,
                line: line.to_owned(),
            };
            let (display, canonical) = line.split_once('|').ok_or_else(malformed)?;
            let (display, canonical) = (display.trim(), canonical.trim());
            if display.is_empty() || canonical.is_empty() || canonical.contains('|') {
                return Err(malformed());
            }
            entries.insert(display.to_owned(), canonical.to_owned());
        }
        Ok(Self { entries })
    }

    /// Turns a display phrase into a [`Keyword`], applying the alias when one
    /// is known and passing the phrase through untouched otherwise.
    #[must_use]
    pub fn resolve(&self, display: &str) -> Keyword {
        match self.entries.get(display) {
            Some(canonical) => {
                let phrase = display;
                let alias = canonical.as_str();
                tracing::debug!(phrase, alias, "alias applied");
                Keyword::with_resolved(display, canonical.clone())
            }
            None => Keyword::new(display),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cleans raw keyword input lines: trims whitespace, drops blanks, and
/// strips embedded commas (a comma would change the meaning of the joint
/// query parameter sent to the portal).
#[must_use]
pub fn parse_keyword_lines<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(|line| line.trim().replace(',', ""))
        .filter(|line| !line.is_empty())
        .collect()
}
