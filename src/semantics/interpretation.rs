use std::fmt;

/// A semantic tag produced by a recognized phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticMatch {
    /// Id of the rule that recognized the phrase.
    pub rule_id: String,
    /// The recognized text, as captured from the normalized utterance.
    pub text: String,
    /// The semantic label of the phrase.
    pub tag: String,
}

impl fmt::Display for SemanticMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.rule_id, self.tag)
    }
}

/// The semantic interpretation of an utterance accepted by a grammar.
///
/// Its string form has one `rule: tag` line per match. An utterance can be accepted without
/// producing any tags, in which case the interpretation is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interpretation {
    /// The matches, ordered by the position of their capture group.
    pub matches: Vec<SemanticMatch>,
}

impl Interpretation {
    /// Returns `true` if the utterance produced no semantic tags.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Finds the tag produced by the rule with the given id.
    pub fn tag_of(&self, rule_id: &str) -> Option<&str> {
        self.matches.iter().find(|m| m.rule_id == rule_id).map(|m| m.tag.as_str())
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, semantic_match) in self.matches.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", semantic_match)?;
        }
        Ok(())
    }
}
