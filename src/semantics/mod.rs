//! Semantic tags and the interpretations produced when an utterance is matched.

mod interpretation;
mod parsing;
mod tag;

pub use interpretation::{Interpretation, SemanticMatch};
pub use parsing::SemanticParsing;
pub use tag::SemanticTag;

/// Removes all whitespace and lower-cases the text, which is how both grammars and utterances are
/// compared.
pub(crate) fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_whitespace_and_case() {
        assert_eq!("newyork", normalize(" New\tYork\r\n"));
        assert_eq!("", normalize("   "));
    }
}
