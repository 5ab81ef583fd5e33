use std::ops::{RangeInclusive, RangeToInclusive};
use std::str::FromStr;

use crate::semantics::SemanticTag;
use crate::{Error, Result};

use super::compiler::Pattern;

/// A named sequence of elements. Rules are the unit of reuse in a grammar: the root rule defines
/// the phrases that can be recognized, and any rule can refer to other rules by their id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    id: String,
    elements: Vec<Element>,
}

impl Rule {
    /// Creates a rule with the given id and elements, which must be recognized in order.
    pub fn new<S: Into<String>>(id: S, elements: Vec<Element>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }

    /// The identifier other rules use to refer to this one.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The elements of this rule, in the order they must be recognized.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Collects the semantic tags of all the items in this rule. Tags of referenced rules are not
    /// included.
    pub fn semantic_tags(&self) -> Vec<SemanticTag> {
        let mut tags = Vec::new();
        for element in self.elements.iter() {
            element.collect_tags(&mut tags);
        }
        tags
    }

    pub(crate) fn pattern(&self) -> Pattern {
        let mut pattern = Pattern::new();
        append_sequence(&mut pattern, &self.elements);
        pattern
    }

    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Element> {
        self.elements.last_mut()
    }
}

/// A phrase that can be recognized, optionally annotated with a semantic tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The words to recognize.
    pub text: String,
    /// The label reported when the phrase is recognized, e.g. `CITY:Paris`.
    pub tag: Option<String>,
}

/// An element of a [`Rule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A literal phrase
    Item(Item),
    /// A set of elements to choose from
    Alternative(Vec<Element>),
    /// A sequence of elements repeated a certain number of times
    Repeat(RepeatRange, Vec<Element>),
    /// The id of a rule whose phrases are recognized in place of this element
    RuleRef(String),
}

impl Element {
    /// Creates an element that recognizes the given phrase.
    pub fn item<T: Into<String>>(text: T) -> Self {
        Self::Item(Item {
            text: text.into(),
            tag: None,
        })
    }

    /// Creates an element that recognizes the given phrase and reports `tag` when it does.
    pub fn tagged<T: Into<String>, G: Into<String>>(text: T, tag: G) -> Self {
        Self::Item(Item {
            text: text.into(),
            tag: Some(tag.into()),
        })
    }

    /// Creates an element that recognizes any one of the given options.
    pub fn alternative(options: Vec<Element>) -> Self {
        Self::Alternative(options)
    }

    /// Creates an element that recognizes the given sequence repeated a certain number of times.
    pub fn repeat<R: Into<RepeatRange>>(times: R, parts: Vec<Element>) -> Self {
        Self::Repeat(times.into(), parts)
    }

    /// Creates an element that recognizes the phrases of the rule with the given id.
    pub fn rule_ref<S: Into<String>>(id: S) -> Self {
        Self::RuleRef(id.into())
    }

    /// Collects the semantic tags of this element and its children, without following rule
    /// references.
    pub fn semantic_tags(&self) -> Vec<SemanticTag> {
        let mut tags = Vec::new();
        self.collect_tags(&mut tags);
        tags
    }

    fn collect_tags(&self, tags: &mut Vec<SemanticTag>) {
        match self {
            Self::Item(Item {
                text,
                tag: Some(tag),
            }) => tags.push(SemanticTag::new(text.as_str(), tag.as_str())),
            Self::Item(_) | Self::RuleRef(_) => (),
            Self::Alternative(children) | Self::Repeat(_, children) => {
                for child in children.iter() {
                    child.collect_tags(tags);
                }
            }
        }
    }

    pub(crate) fn append_to(&self, pattern: &mut Pattern) {
        match self {
            Self::Item(item) => pattern.push_literal(&item.text),
            Self::Alternative(options) => {
                pattern.push_text("(?:");
                for (idx, option) in options.iter().enumerate() {
                    if idx > 0 {
                        pattern.push_text("|");
                    }
                    pattern.push_text("(");
                    option.append_to(pattern);
                    pattern.push_text(")");
                }
                pattern.push_text(")");
            }
            Self::Repeat(times, parts) => {
                pattern.push_text("( ");
                append_sequence(pattern, parts);
                pattern.push_text(" )");
                pattern.push_text(&times.quantifier());
            }
            Self::RuleRef(id) => pattern.push_reference(id),
        }
    }
}

fn append_sequence(pattern: &mut Pattern, elements: &[Element]) {
    for (idx, element) in elements.iter().enumerate() {
        if idx > 0 {
            pattern.push_text(" ");
        }
        element.append_to(pattern);
    }
}

/// Specifies the bounds for how many times the contents of an [`Element::Repeat`] can be
/// repeated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatRange {
    /// The contents must be repeated at least this many times.
    pub min: usize,
    /// The contents can be repeated at most this many times.
    pub max: usize,
}

impl RepeatRange {
    fn quantifier(&self) -> String {
        format!("{{{},{}}}", self.min, self.max)
    }
}

impl From<usize> for RepeatRange {
    fn from(source: usize) -> Self {
        Self {
            min: source,
            max: source,
        }
    }
}

impl From<RangeInclusive<usize>> for RepeatRange {
    fn from(source: RangeInclusive<usize>) -> Self {
        Self {
            min: *source.start(),
            max: *source.end(),
        }
    }
}

impl From<RangeToInclusive<usize>> for RepeatRange {
    fn from(source: RangeToInclusive<usize>) -> Self {
        Self {
            min: 0,
            max: source.end,
        }
    }
}

/// Parses the `repeat` attribute of an `<item>`, which must be of the form `m-n`. Open-ended
/// conditions such as `m-` are not supported.
impl FromStr for RepeatRange {
    type Err = Error;

    fn from_str(conditions: &str) -> Result<Self> {
        let invalid = || Error::InvalidRepeat(conditions.to_string());
        let (min, max) = conditions.split_once('-').ok_or_else(invalid)?;
        let min: usize = min.trim().parse().map_err(|_| invalid())?;
        let max: usize = max.trim().parse().map_err(|_| invalid())?;
        if min > max {
            return Err(invalid());
        }
        Ok(Self {
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("2-3", 2, 3)]
    #[case("0-1", 0, 1)]
    #[case(" 1 - 4 ", 1, 4)]
    #[case("5-5", 5, 5)]
    fn parses_repeat_conditions(#[case] conditions: &str, #[case] min: usize, #[case] max: usize) {
        assert_eq!(
            RepeatRange {
                min,
                max
            },
            conditions.parse().unwrap()
        );
    }

    #[rstest]
    #[case("3")]
    #[case("1-")]
    #[case("-2")]
    #[case("1-2-3")]
    #[case("a-b")]
    #[case("3-1")]
    fn rejects_malformed_repeat_conditions(#[case] conditions: &str) {
        let err = conditions.parse::<RepeatRange>().unwrap_err();
        assert!(matches!(err, Error::InvalidRepeat(c) if c == conditions));
    }

    #[test]
    fn collects_tags_without_following_references() {
        let rule = Rule::new(
            "trip",
            vec![
                Element::item("to"),
                Element::alternative(vec![
                    Element::tagged("Paris", "CITY:Paris"),
                    Element::repeat(..=1, vec![Element::tagged("Rome", "CITY:Rome")]),
                ]),
                Element::rule_ref("date"),
            ],
        );
        assert_eq!(
            vec![SemanticTag::new("Paris", "CITY:Paris"), SemanticTag::new("Rome", "CITY:Rome")],
            rule.semantic_tags()
        );
    }

    #[test]
    fn renders_pattern_with_placeholders() {
        let rule = Rule::new(
            "main",
            vec![
                Element::repeat(0..=1, vec![Element::item("please")]),
                Element::alternative(vec![Element::item("a.b"), Element::rule_ref("other")]),
            ],
        );
        assert_eq!(
            "( please ){0,1} (?:(a\\.b)|(xxREFxxotherxx))",
            rule.pattern().to_string()
        );
    }
}
