//! Grammar rules, and their compilation into a matcher.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use log::trace;
use regex::Regex;

use crate::semantics::{normalize, Interpretation, SemanticMatch, SemanticParsing};
use crate::{Error, Result};

mod builder;
mod compiler;
mod parser;
mod rule;

pub use builder::GrammarBuilder;
pub use rule::{Element, Item, RepeatRange, Rule};

/// A set of rules that define the phrases that can be recognized, compiled into a single regular
/// expression.
///
/// A grammar is immutable once built. Matching utterances against it doesn't modify it, so it can
/// be shared between threads.
#[derive(Debug)]
pub struct Grammar {
    root: String,
    rules: HashMap<String, Rule>,
    expression: String,
    regex: Regex,
    semantics: BTreeMap<usize, SemanticParsing>,
}

impl Grammar {
    /// Parses and compiles a grammar from its XML representation.
    pub fn from_xml(document: &str) -> Result<Self> {
        parser::parse(document)?.build()
    }

    pub(crate) fn compile(root: String, rules: HashMap<String, Rule>) -> Result<Self> {
        let compiler::Compilation {
            expression,
            semantics,
        } = compiler::compile(&root, &rules)?;
        let regex = Regex::new(&format!("^(?:{})$", normalize(&expression)))?;
        Ok(Self {
            root,
            rules,
            expression,
            regex,
            semantics,
        })
    }

    /// Id of the rule that defines the phrases this grammar recognizes.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Looks up a rule by its id.
    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.get(id)
    }

    /// The regular expression the root rule compiles to, with all references resolved. Utterances
    /// are matched against this expression with whitespace removed and letters lower-cased.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The semantic tags of the referenced rules, ordered by the capture group they apply to.
    pub fn semantics(&self) -> impl Iterator<Item = &SemanticParsing> {
        self.semantics.values()
    }

    /// Checks whether the whole utterance is a phrase of this grammar. Whitespace and letter case
    /// are ignored.
    pub fn is_match(&self, utterance: &str) -> bool {
        self.regex.is_match(&normalize(utterance))
    }

    /// Matches the utterance against the grammar and collects the semantic tags of the
    /// recognized phrases. Returns `None` if the utterance is not a phrase of this grammar.
    pub fn interpretation(&self, utterance: &str) -> Option<Interpretation> {
        let utterance = normalize(utterance);
        let captures = self.regex.captures(&utterance)?;

        let mut matches = Vec::new();
        for (group, capture) in captures.iter().enumerate() {
            let (capture, parsing) = match (capture, self.semantics.get(&group)) {
                (Some(capture), Some(parsing)) => (capture, parsing),
                _ => continue,
            };
            if let Some(tag) = parsing.lookup(capture.as_str()) {
                trace!(
                    "group {} `{}` matched {}: {}",
                    group,
                    capture.as_str(),
                    parsing.rule_id(),
                    tag.tag
                );
                matches.push(SemanticMatch {
                    rule_id: parsing.rule_id().to_string(),
                    text: capture.as_str().to_string(),
                    tag: tag.tag.clone(),
                });
            }
        }
        Some(Interpretation {
            matches,
        })
    }

    /// Matches the utterance against the grammar and returns its semantic interpretation, with one
    /// `rule: tag` line per recognized tag. Returns `None` if the utterance is not a phrase of
    /// this grammar.
    pub fn interpret(&self, utterance: &str) -> Option<String> {
        self.interpretation(utterance).map(|interpretation| interpretation.to_string())
    }
}

impl FromStr for Grammar {
    type Err = Error;

    fn from_str(document: &str) -> Result<Self> {
        Self::from_xml(document)
    }
}
