//! Descriptions of the benchmarked thing.
//!
//! The statistics engine never inspects code; whoever drives the sampling
//! hands it a [`Described`] value and it is carried along for reporting.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;

/// Keyword arguments captured from a benchmarked call, rendered with `Debug`.
pub type KeywordArgs = BTreeMap<String, String>;

/// What was benchmarked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Described {
    /// A named function, with its definition site when known.
    Function {
        name: String,
        file: Option<String>,
        line: Option<u32>,
    },
    /// An opaque source snippet.
    Snippet { text: String },
}

impl Described {
    /// A function described at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use benchit::Described;
    ///
    /// let described = Described::function("parse_header");
    /// assert_eq!(described.name(), Some("parse_header"));
    /// assert!(described.file().is_some());
    /// assert!(described.line().is_some());
    /// ```
    #[track_caller]
    pub fn function(name: impl Into<String>) -> Self {
        let location = Location::caller();
        Described::Function {
            name: name.into(),
            file: Some(location.file().to_string()),
            line: Some(location.line()),
        }
    }

    /// A function whose definition site is unknown.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Described::Function {
            name: name.into(),
            file: None,
            line: None,
        }
    }

    /// A raw source snippet. Name, file and line are all absent.
    pub fn snippet(text: impl Into<String>) -> Self {
        Described::Snippet { text: text.into() }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Described::Function { name, .. } => Some(name),
            Described::Snippet { .. } => None,
        }
    }

    pub fn file(&self) -> Option<&str> {
        match self {
            Described::Function { file, .. } => file.as_deref(),
            Described::Snippet { .. } => None,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            Described::Function { line, .. } => *line,
            Described::Snippet { .. } => None,
        }
    }
}

impl fmt::Display for Described {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Described::Function { name, .. } => write!(f, "<function {name}>"),
            Described::Snippet { text } => f.write_str(text),
        }
    }
}
