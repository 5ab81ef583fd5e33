use super::normalize;

/// A phrase of the grammar together with the semantic label it produces when recognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SemanticTag {
    /// The phrase as written in the grammar.
    pub text: String,
    /// The label attached to the phrase.
    pub tag: String,
}

impl SemanticTag {
    /// Pairs a phrase with its semantic label.
    pub fn new<T: Into<String>, G: Into<String>>(text: T, tag: G) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Checks whether the recognized, normalized keyword is this tag's phrase.
    pub(crate) fn matches(&self, keyword: &str) -> bool {
        normalize(&self.text) == keyword
    }
}
