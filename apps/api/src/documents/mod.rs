// Document loading: uploaded bytes or pasted text to plain text.
// The only module that knows about file encodings.

pub mod loader;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the three user inputs a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Cv,
    JobDescription,
    ExampleLetter,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Cv => "CV",
            DocumentKind::JobDescription => "Job description",
            DocumentKind::ExampleLetter => "Example letter",
        })
    }
}

/// Plain text of one input document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    kind: DocumentKind,
    raw_text: String,
}

impl SourceDocument {
    pub(crate) fn new(kind: DocumentKind, raw_text: String) -> Self {
        Self { kind, raw_text }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}
