use log::warn;

use crate::grammar::Grammar;
use crate::semantics::Interpretation;
use crate::{Error, Result};

/// Interprets utterances with a grammar loaded at runtime.
///
/// An interpreter starts without a grammar. Until [`initialize`](Interpreter::initialize)
/// succeeds, interpreting an utterance fails with [`Error::NotInitialized`].
#[derive(Debug, Default)]
pub struct Interpreter {
    grammar: Option<Grammar>,
}

impl Interpreter {
    /// Constructs an interpreter without a grammar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and compiles the XML grammar document and uses it for all subsequent
    /// interpretations. If the document is invalid, the previously loaded grammar is discarded
    /// and the interpreter is left uninitialized.
    pub fn initialize(&mut self, document: &str) -> Result<&Grammar> {
        self.grammar = None;
        match Grammar::from_xml(document) {
            Ok(grammar) => Ok(&*self.grammar.insert(grammar)),
            Err(err) => {
                warn!("could not initialize the grammar: {}", err);
                Err(err)
            }
        }
    }

    /// Returns `true` if a grammar has been loaded.
    pub fn is_initialized(&self) -> bool {
        self.grammar.is_some()
    }

    /// Borrows the loaded grammar.
    pub fn grammar(&self) -> Result<&Grammar> {
        self.grammar.as_ref().ok_or(Error::NotInitialized)
    }

    /// Returns the semantic interpretation of the utterance as text, or `None` if the utterance
    /// is not a phrase of the grammar.
    pub fn interpret(&self, utterance: &str) -> Result<Option<String>> {
        Ok(self.grammar()?.interpret(utterance))
    }

    /// Returns the semantic interpretation of the utterance, or `None` if the utterance is not a
    /// phrase of the grammar.
    pub fn interpretation(&self, utterance: &str) -> Result<Option<Interpretation>> {
        Ok(self.grammar()?.interpretation(utterance))
    }
}

impl From<Grammar> for Interpreter {
    fn from(grammar: Grammar) -> Self {
        Self {
            grammar: Some(grammar),
        }
    }
}
