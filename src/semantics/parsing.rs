use super::SemanticTag;

/// The semantic tags of a rule, anchored to the capture group of the compiled grammar expression
/// where the rule's expansion begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticParsing {
    rule_id: String,
    tags: Vec<SemanticTag>,
    position: usize,
}

impl SemanticParsing {
    pub(crate) fn new(rule_id: String, tags: Vec<SemanticTag>, position: usize) -> Self {
        Self {
            rule_id,
            tags,
            position,
        }
    }

    /// Id of the rule the tags belong to.
    pub fn rule_id(&self) -> &str {
        &self.rule_id
    }

    /// The tags of the rule's items.
    pub fn tags(&self) -> &[SemanticTag] {
        &self.tags
    }

    /// Index of the capture group that holds the rule's recognized text. Group 0 is the whole
    /// utterance, so this is always at least 1.
    pub fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn with_position(self, position: usize) -> Self {
        Self {
            position,
            ..self
        }
    }

    /// Finds the tag whose phrase is the given normalized keyword.
    pub(crate) fn lookup(&self, keyword: &str) -> Option<&SemanticTag> {
        self.tags.iter().find(|tag| tag.matches(keyword))
    }
}
