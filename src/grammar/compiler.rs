use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use log::{debug, info};

use crate::semantics::SemanticParsing;
use crate::{Error, Result};

use super::Rule;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    Text(String),
    Reference(String),
}

/// A regular expression under construction. References to other rules are kept as separate
/// fragments until they are substituted with the referenced rule's expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Pattern {
    fragments: Vec<Fragment>,
}

impl Pattern {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(Fragment::Text(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(Fragment::Text(text.to_string()));
        }
    }

    pub(crate) fn push_literal(&mut self, text: &str) {
        self.push_text(&regex::escape(text));
    }

    pub(crate) fn push_reference(&mut self, id: &str) {
        self.fragments.push(Fragment::Reference(id.to_string()));
    }

    fn append(&mut self, other: &Pattern) {
        for fragment in other.fragments.iter() {
            match fragment {
                Fragment::Text(text) => self.push_text(text),
                Fragment::Reference(id) => self.push_reference(id),
            }
        }
    }

    fn references(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Reference(id) => Some(id.as_str()),
            Fragment::Text(_) => None,
        })
    }

    fn group_count(&self) -> usize {
        self.fragments
            .iter()
            .map(|fragment| match fragment {
                Fragment::Text(text) => count_groups(text),
                Fragment::Reference(_) => 0,
            })
            .sum()
    }

    /// Returns, for each reference to `id`, the number of capture groups opened before it.
    fn reference_offsets(&self, id: &str) -> Vec<usize> {
        let mut groups = 0;
        let mut offsets = Vec::new();
        for fragment in self.fragments.iter() {
            match fragment {
                Fragment::Text(text) => groups += count_groups(text),
                Fragment::Reference(ref_id) if ref_id == id => offsets.push(groups),
                Fragment::Reference(_) => (),
            }
        }
        offsets
    }

    /// Replaces every reference to `id` with `expansion` wrapped in a capture group.
    fn substitute(&self, id: &str, expansion: &Pattern) -> Pattern {
        let mut result = Pattern::new();
        for fragment in self.fragments.iter() {
            match fragment {
                Fragment::Reference(ref_id) if ref_id == id => {
                    result.push_text("(");
                    result.append(expansion);
                    result.push_text(")");
                }
                Fragment::Reference(ref_id) => result.push_reference(ref_id),
                Fragment::Text(text) => result.push_text(text),
            }
        }
        result
    }
}

/// Unresolved references are rendered as `xxREFxx<id>xx` placeholders.
impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in self.fragments.iter() {
            match fragment {
                Fragment::Text(text) => f.write_str(text)?,
                Fragment::Reference(id) => write!(f, "xxREFxx{}xx", id)?,
            }
        }
        Ok(())
    }
}

/// Counts the capture groups opened in a fragment of a regular expression, skipping escaped
/// parentheses and groups that start with `(?`.
fn count_groups(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '(' if chars.peek() != Some(&'?') => count += 1,
            _ => (),
        }
    }
    count
}

#[derive(Debug)]
pub(crate) struct Compilation {
    pub(crate) expression: String,
    pub(crate) semantics: BTreeMap<usize, SemanticParsing>,
}

/// Expands the root rule into a single regular expression and indexes the semantic tags of the
/// root and the referenced rules by the capture group where their expansion begins.
pub(crate) fn compile(root: &str, rules: &HashMap<String, Rule>) -> Result<Compilation> {
    let raw: HashMap<&str, Pattern> =
        rules.iter().map(|(id, rule)| (id.as_str(), rule.pattern())).collect();

    if !raw.contains_key(root) {
        return Err(Error::UndefinedRoot(root.to_string()));
    }
    check_references(&raw)?;

    // The root is expanded like a reference, so its own tags are anchored to group 1.
    let mut pattern = Pattern::new();
    pattern.push_reference(root);

    let mut semantics = BTreeMap::new();
    loop {
        let next = pattern.references().next().map(str::to_string);
        let id = match next {
            Some(id) => id,
            None => break,
        };
        let expansion = raw.get(id.as_str()).ok_or_else(|| Error::UndefinedRule(id.clone()))?;
        let offsets = pattern.reference_offsets(&id);
        let num_open_parenthesis = offsets.first().copied().unwrap_or_default();
        debug!(
            "expanding {} reference(s) to `{}` after {} group(s) in {}",
            offsets.len(),
            id,
            num_open_parenthesis,
            pattern
        );

        semantics = shift_positions(semantics, &offsets, expansion.group_count() + 1);

        // Tags are only recorded for a rule that is referenced once at this level.
        if offsets.len() == 1 {
            let tags = rules.get(&id).map(Rule::semantic_tags).unwrap_or_default();
            if !tags.is_empty() {
                let position = num_open_parenthesis + 1;
                semantics.insert(position, SemanticParsing::new(id.clone(), tags, position));
            }
        }

        pattern = pattern.substitute(&id, expansion);
    }

    let expression = pattern.to_string();
    info!("regular expression of grammar `{}`: {}", root, expression);
    Ok(Compilation {
        expression,
        semantics,
    })
}

/// Renumbers the semantic index after `added` groups were inserted at each of the given
/// offsets. Entries whose group opens after an insertion point move past the inserted groups.
fn shift_positions(
    semantics: BTreeMap<usize, SemanticParsing>,
    offsets: &[usize],
    added: usize,
) -> BTreeMap<usize, SemanticParsing> {
    semantics
        .into_values()
        .map(|parsing| {
            let preceding = offsets.iter().filter(|&&offset| offset < parsing.position()).count();
            let position = parsing.position() + preceding * added;
            (position, parsing.with_position(position))
        })
        .collect()
}

/// Fails if any rule refers to an undefined rule, or if the references form a cycle.
fn check_references(raw: &HashMap<&str, Pattern>) -> Result<()> {
    let mut ids: Vec<&str> = raw.keys().copied().collect();
    ids.sort_unstable();

    let mut done = HashSet::new();
    for id in ids {
        visit(id, raw, &mut Vec::new(), &mut done)?;
    }
    Ok(())
}

fn visit<'a>(
    id: &'a str,
    raw: &'a HashMap<&str, Pattern>,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
) -> Result<()> {
    if done.contains(id) {
        return Ok(());
    }
    if path.contains(&id) {
        return Err(Error::CyclicReference(id.to_string()));
    }
    let pattern = raw.get(id).ok_or_else(|| Error::UndefinedRule(id.to_string()))?;

    path.push(id);
    for reference in pattern.references() {
        visit(reference, raw, path, done)?;
    }
    path.pop();
    done.insert(id);
    Ok(())
}
