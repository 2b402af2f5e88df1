//! Text-column mappers: punctuation stripping, case folding, tokenization.

use crate::mappers::Mapper;
use crate::row::Row;
use anyhow::Result;
use regex::Regex;

/* ===================== FilterPunctuation ===================== */

/// Strip ASCII punctuation from a string column.
///
/// Everything matched by the POSIX `[:punct:]` class is removed; all other
/// characters pass through unchanged.
pub struct FilterPunctuation {
    column: String,
    punct: Regex,
}

impl FilterPunctuation {
    /// Strip punctuation from `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            punct: Regex::new(r"[[:punct:]]").expect("valid punctuation pattern"),
        }
    }
}

impl Mapper for FilterPunctuation {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let text = row.get(&self.column)?.as_str()?;
        let stripped = self.punct.replace_all(text, "").into_owned();
        row.set(self.column.as_str(), stripped);
        Ok(vec![row])
    }
}

/* ===================== LowerCase ===================== */

/// Replace a string column with its lower-cased value.
pub struct LowerCase {
    column: String,
}

impl LowerCase {
    /// Lower-case `column`.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Mapper for LowerCase {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let lowered = row.get(&self.column)?.as_str()?.to_lowercase();
        row.set(self.column.as_str(), lowered);
        Ok(vec![row])
    }
}

/* ===================== Split ===================== */

/// Split a string column into tokens, emitting one row per token.
///
/// Each emitted row is a copy of the input with `column` replaced by one
/// token. Without an explicit separator, the value is split on runs of
/// Unicode whitespace and an empty or all-whitespace value yields **no**
/// rows. With an explicit separator, splitting follows exact-match
/// semantics, so an empty value yields one row carrying the empty token.
pub struct Split {
    column: String,
    separator: Option<String>,
}

impl Split {
    /// Split `column` on runs of whitespace.
    #[must_use]
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separator: None,
        }
    }

    /// Split `column` on an exact separator string.
    #[must_use]
    pub fn with_separator(column: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separator: Some(separator.into()),
        }
    }
}

impl Mapper for Split {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        let text = row.get(&self.column)?.as_str()?.to_owned();
        let tokens: Vec<&str> = match &self.separator {
            Some(sep) => text.split(sep.as_str()).collect(),
            None => text.split_whitespace().collect(),
        };
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            let mut copy = row.clone();
            copy.set(self.column.as_str(), token);
            out.push(copy);
        }
        Ok(out)
    }
}
