use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three source encodings a run reads, in the order they are consumed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Delimited,
    Document,
    Markup,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delimited => "delimited",
            Self::Document => "document",
            Self::Markup => "markup",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("unable to read {kind} source {}: {reason}", path.display())]
    SourceUnreadable {
        kind: SourceKind,
        path: PathBuf,
        reason: String,
    },

    #[error("malformed {kind} source {}: {reason}", path.display())]
    SourceMalformed {
        kind: SourceKind,
        path: PathBuf,
        reason: String,
    },

    #[error("unparseable request-time {value:?} in {kind} source {}: {reason}", path.display())]
    TimestampUnparseable {
        kind: SourceKind,
        path: PathBuf,
        value: String,
        reason: String,
    },

    #[error("unable to write report {}: {reason}", path.display())]
    DestinationUnwritable { path: PathBuf, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl MergeError {
    pub fn unreadable(kind: SourceKind, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::SourceUnreadable {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(kind: SourceKind, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::SourceMalformed {
            kind,
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn unparseable(
        kind: SourceKind,
        path: impl Into<PathBuf>,
        value: &str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::TimestampUnparseable {
            kind,
            path: path.into(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MergeError>;
