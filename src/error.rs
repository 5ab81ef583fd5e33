//! Error types returned while loading or using a grammar.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The grammar document is structurally invalid: a mandatory attribute is missing, tags are
    /// nested incorrectly, a repeat condition can't be parsed, or the result can't be compiled.
    Structural,
    /// A rule reference (or the root declaration) names a rule that doesn't exist, or the
    /// references form a cycle.
    Reference,
    /// The grammar was used before it was successfully initialized.
    NotInitialized,
    /// The document is not well-formed XML.
    Xml,
}

/// The error type returned by grammar functions and methods.
#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory attribute is missing from an element.
    #[error("the attribute `{attribute}` is mandatory in <{element}>")]
    MissingAttribute {
        /// Name of the element missing the attribute.
        element: &'static str,
        /// Name of the missing attribute.
        attribute: &'static str,
    },
    /// Start and end tags are not nested the way the grammar vocabulary requires.
    #[error("ill-formed grammar: {0}")]
    IllFormed(String),
    /// The `repeat` attribute of an `<item>` is not of the form `m-n`.
    #[error("invalid repeat condition `{0}`")]
    InvalidRepeat(String),
    /// Two rules share the same id.
    #[error("the rule `{0}` is defined more than once")]
    DuplicateRule(String),
    /// The root rule declared by the grammar is not defined.
    #[error("the root rule `{0}` is not defined in the grammar")]
    UndefinedRoot(String),
    /// A rule reference points to a rule that is not defined.
    #[error("there is an incorrect rule reference in the grammar: {0}")]
    UndefinedRule(String),
    /// A rule refers back to itself, directly or through other rules.
    #[error("the rule `{0}` refers to itself")]
    CyclicReference(String),
    /// The grammar was used before being initialized.
    #[error("attempt to use the grammar without initializing it")]
    NotInitialized,
    /// The underlying XML reader failed.
    #[error(transparent)]
    Xml(#[from] xml::reader::Error),
    /// The compiled expression was rejected by the regex engine.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAttribute { .. }
            | Self::IllFormed(_)
            | Self::InvalidRepeat(_)
            | Self::DuplicateRule(_)
            | Self::Regex(_) => ErrorKind::Structural,
            Self::UndefinedRoot(_) | Self::UndefinedRule(_) | Self::CyclicReference(_) => {
                ErrorKind::Reference
            }
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::Xml(_) => ErrorKind::Xml,
        }
    }

    /// Returns a short description of the error, suitable for showing to an end user.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingAttribute { .. } | Self::IllFormed(_) | Self::DuplicateRule(_) => {
                "Parsing error"
            }
            Self::InvalidRepeat(_) => "Could not parse grammar",
            Self::UndefinedRoot(_) | Self::UndefinedRule(_) | Self::CyclicReference(_) => {
                "Incorrect rule reference"
            }
            Self::NotInitialized => "Grammar not initialized",
            Self::Xml(_) => "Grammar could not be read, check the format",
            Self::Regex(_) => "Grammar could not be compiled",
        }
    }
}

pub(crate) fn ill_formed<S: Into<String>>(detail: S) -> Error {
    Error::IllFormed(detail.into())
}
