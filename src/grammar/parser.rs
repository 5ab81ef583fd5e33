use std::str::FromStr;

use log::debug;
use strum_macros::{EnumString, IntoStaticStr};
use xml::attribute::OwnedAttribute;
use xml::reader::{ParserConfig, XmlEvent};

use crate::error::ill_formed;
use crate::{Error, Result};

use super::{Element, GrammarBuilder, Item, RepeatRange, Rule};

/// The elements of the grammar vocabulary. Names are matched regardless of case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
enum Vocabulary {
    Grammar,
    Rule,
    #[strum(serialize = "one-of")]
    OneOf,
    Item,
    Tag,
    #[strum(serialize = "ruleref")]
    RuleRef,
}

/// An element whose end tag hasn't been reached yet.
enum Frame {
    Rule(Rule),
    Alternative(Vec<Element>),
    Repeat(RepeatRange, Vec<Element>),
}

impl Frame {
    fn push(&mut self, element: Element) {
        match self {
            Self::Rule(rule) => rule.push(element),
            Self::Alternative(children) | Self::Repeat(_, children) => children.push(element),
        }
    }

    fn last_item(&mut self) -> Option<&mut Item> {
        let last = match self {
            Self::Rule(rule) => rule.last_mut(),
            Self::Alternative(children) | Self::Repeat(_, children) => children.last_mut(),
        };
        match last {
            Some(Element::Item(item)) => Some(item),
            _ => None,
        }
    }
}

/// Parses an XML grammar document into a builder holding its rules.
pub(super) fn parse(document: &str) -> Result<GrammarBuilder> {
    let reader = ParserConfig::new()
        .trim_whitespace(true)
        .coalesce_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true)
        .create_reader(document.as_bytes());

    let mut parser = GrammarParser::default();
    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name,
                attributes,
                ..
            } => parser.start_element(&name.local_name, &attributes)?,
            XmlEvent::EndElement {
                name,
            } => parser.end_element(&name.local_name)?,
            XmlEvent::Characters(text) => parser.characters(&text),
            _ => (),
        }
    }
    parser.finish()
}

#[derive(Default)]
struct GrammarParser {
    root: Option<String>,
    rules: Vec<Rule>,
    stack: Vec<Frame>,
    // Plain items, rule references and tags contain only text, so they are never stacked.
    item: Option<Item>,
    rule_ref: Option<String>,
    tag: Option<String>,
    // Depth inside an unknown element whose whole contents are skipped.
    skipped_depth: usize,
}

impl GrammarParser {
    fn start_element(&mut self, name: &str, attributes: &[OwnedAttribute]) -> Result<()> {
        if self.skipped_depth > 0 {
            self.skipped_depth += 1;
            return Ok(());
        }
        let element = match Vocabulary::from_str(name) {
            Ok(element) => element,
            // Unknown markup around the text of an item or a tag, such as <token>, is transparent.
            Err(_) if self.item.is_some() || self.tag.is_some() => {
                debug!("reading the text of <{}> into the enclosing element", name);
                return Ok(());
            }
            Err(_) => {
                debug!("ignoring unknown element <{}>", name);
                self.skipped_depth = 1;
                return Ok(());
            }
        };

        if self.tag.is_some() || self.rule_ref.is_some() {
            return Err(ill_formed(format!("<{}> nested in a text-only element", name)));
        }
        if self.item.is_some() && element != Vocabulary::Tag {
            return Err(ill_formed(format!("<{}> nested in an <item> without repeat", name)));
        }

        match element {
            Vocabulary::Grammar => {
                self.root = Some(required(attributes, element, "root")?);
            }
            Vocabulary::Rule => {
                let id = required(attributes, element, "id")?;
                self.stack.push(Frame::Rule(Rule::new(id, Vec::new())));
            }
            Vocabulary::OneOf => self.stack.push(Frame::Alternative(Vec::new())),
            Vocabulary::Item => match attribute(attributes, "repeat") {
                Some(conditions) => {
                    let times: RepeatRange = conditions.parse()?;
                    self.stack.push(Frame::Repeat(times, Vec::new()))
                }
                None => {
                    self.item = Some(Item {
                        text: String::new(),
                        tag: None,
                    })
                }
            },
            Vocabulary::Tag => self.tag = Some(String::new()),
            Vocabulary::RuleRef => {
                let uri = required(attributes, element, "uri")?;
                // Local references may be written as `#id`.
                let id = uri.strip_prefix('#').map(str::to_string).unwrap_or(uri);
                self.rule_ref = Some(id);
            }
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        if self.skipped_depth > 0 {
            self.skipped_depth -= 1;
            return Ok(());
        }
        let element = match Vocabulary::from_str(name) {
            Ok(element) => element,
            Err(_) => return Ok(()),
        };

        match element {
            Vocabulary::Grammar => (),
            Vocabulary::Rule => {
                if self.stack.len() != 1 {
                    return Err(ill_formed("</rule> reached with unclosed or nested elements"));
                }
                match self.stack.pop() {
                    Some(Frame::Rule(rule)) => self.rules.push(rule),
                    _ => return Err(ill_formed("</rule> does not close a <rule>")),
                }
            }
            Vocabulary::OneOf => match self.stack.pop() {
                Some(Frame::Alternative(options)) => {
                    self.attach(Element::Alternative(options), "<one-of>")?
                }
                _ => return Err(ill_formed("</one-of> does not close a <one-of>")),
            },
            Vocabulary::Item => match self.item.take() {
                Some(item) => self.attach(Element::Item(item), "<item>")?,
                None => match self.stack.pop() {
                    Some(Frame::Repeat(times, parts)) => {
                        self.attach(Element::Repeat(times, parts), "<item>")?
                    }
                    _ => return Err(ill_formed("</item> does not close an <item>")),
                },
            },
            Vocabulary::Tag => {
                let tag = self.tag.take().unwrap_or_default();
                self.set_tag(tag.trim().to_string())?;
            }
            Vocabulary::RuleRef => {
                if let Some(id) = self.rule_ref.take() {
                    self.attach(Element::RuleRef(id), "<ruleref>")?;
                }
            }
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) {
        if self.skipped_depth > 0 {
            debug!("ignoring text `{}` of an unknown element", text);
        } else if let Some(tag) = self.tag.as_mut() {
            // Tags are opaque labels, kept as written.
            tag.push_str(text);
        } else if let Some(item) = self.item.as_mut() {
            append_words(&mut item.text, text);
        } else if self.rule_ref.is_none() {
            match self.stack.last_mut() {
                Some(Frame::Alternative(_)) | None => {
                    debug!("ignoring text `{}` outside of an <item>", text)
                }
                Some(frame) => {
                    let mut words = String::new();
                    append_words(&mut words, text);
                    frame.push(Element::item(words))
                }
            }
        }
    }

    fn attach(&mut self, element: Element, what: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(frame) => {
                frame.push(element);
                Ok(())
            }
            None => Err(ill_formed(format!("{} outside of a <rule>", what))),
        }
    }

    /// Attaches the tag to the open item, or else to the item that was just closed.
    fn set_tag(&mut self, tag: String) -> Result<()> {
        let item = match self.item.as_mut() {
            Some(item) => Some(item),
            None => self.stack.last_mut().and_then(Frame::last_item),
        };
        match item {
            Some(item) => {
                item.tag = Some(tag);
                Ok(())
            }
            None => Err(ill_formed("<tag> is not attached to an <item>")),
        }
    }

    fn finish(self) -> Result<GrammarBuilder> {
        let root = self.root.ok_or(Error::MissingAttribute {
            element: Vocabulary::Grammar.into(),
            attribute: "root",
        })?;
        let mut builder = GrammarBuilder::new(root);
        for rule in self.rules {
            builder.add_rule(rule);
        }
        Ok(builder)
    }
}

/// Appends the words of `text` to `target`, separated by single spaces.
fn append_words(target: &mut String, text: &str) {
    for word in text.split_whitespace() {
        if !target.is_empty() {
            target.push(' ');
        }
        target.push_str(word);
    }
}

fn attribute(attributes: &[OwnedAttribute], name: &str) -> Option<String> {
    attributes.iter().find(|attr| attr.name.local_name == name).map(|attr| attr.value.clone())
}

fn required(
    attributes: &[OwnedAttribute],
    element: Vocabulary,
    name: &'static str,
) -> Result<String> {
    attribute(attributes, name).ok_or(Error::MissingAttribute {
        element: element.into(),
        attribute: name,
    })
}
