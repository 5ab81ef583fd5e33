use std::collections::HashMap;

use crate::error::ill_formed;
use crate::{Error, Result};

use super::{Element, Grammar, Rule};

/// Helper type that constructs a grammar from a set of rules.
///
/// Only the root rule defines phrases that can be recognized. The other rules are recognized only
/// where the root rule refers to them, directly or through other rules. For example, given the
/// following rules:
/// ```
/// # use nlu_lite::grammar::{Element, GrammarBuilder, Rule};
/// let grammar = GrammarBuilder::new("greeting")
///     .add_rule(Rule::new("greeting", vec![
///         Element::item("good"),
///         Element::rule_ref("time"),
///     ]))
///     .add_rule(Rule::new("time", vec![Element::alternative(vec![
///         Element::tagged("morning", "AM"),
///         Element::tagged("evening", "PM"),
///     ])]))
///     .build()
///     .unwrap();
/// assert_eq!(Some("time: PM".to_string()), grammar.interpret("Good evening"));
/// assert_eq!(None, grammar.interpret("evening"));
/// ```
/// the grammar recognizes "good morning" and "good evening", but not "good", "morning", or
/// "evening".
pub struct GrammarBuilder {
    root: String,
    rules: HashMap<String, Rule>,
    duplicates: Vec<String>,
}

impl GrammarBuilder {
    /// Constructs a new, empty builder for a grammar whose phrases are defined by the rule with
    /// the given id.
    pub fn new<S: Into<String>>(root: S) -> Self {
        Self {
            root: root.into(),
            rules: HashMap::new(),
            duplicates: Vec::new(),
        }
    }

    /// Clears all the added rules.
    pub fn clear(&mut self) -> &mut Self {
        self.rules.clear();
        self.duplicates.clear();
        self
    }

    /// Adds a rule to the grammar. Rule ids must be unique.
    pub fn add_rule(&mut self, rule: Rule) -> &mut Self {
        let id = rule.id().to_string();
        if self.rules.insert(id.clone(), rule).is_some() {
            self.duplicates.push(id);
        }
        self
    }

    /// Compiles the grammar from the rules received so far. Clears the contents of the builder.
    pub fn build(&mut self) -> Result<Grammar> {
        let rules = std::mem::take(&mut self.rules);
        let duplicates = std::mem::take(&mut self.duplicates);
        if let Some(id) = duplicates.into_iter().next() {
            return Err(Error::DuplicateRule(id));
        }

        let mut ids: Vec<&String> = rules.keys().collect();
        ids.sort_unstable();
        for id in ids {
            validate_rule(&rules[id])?;
        }

        Grammar::compile(self.root.clone(), rules)
    }
}

fn validate_rule(rule: &Rule) -> Result<()> {
    if rule.elements().is_empty() {
        return Err(ill_formed(format!("the rule `{}` has no elements", rule.id())));
    }
    for element in rule.elements() {
        validate_element(rule, element)?;
    }
    Ok(())
}

fn validate_element(rule: &Rule, element: &Element) -> Result<()> {
    match element {
        Element::Alternative(options) if options.is_empty() => {
            Err(ill_formed(format!("empty <one-of> in the rule `{}`", rule.id())))
        }
        Element::Repeat(_, parts) if parts.is_empty() => {
            Err(ill_formed(format!("empty repeated <item> in the rule `{}`", rule.id())))
        }
        Element::Alternative(children) | Element::Repeat(_, children) => {
            children.iter().try_for_each(|child| validate_element(rule, child))
        }
        Element::Item(_) | Element::RuleRef(_) => Ok(()),
    }
}
