#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A small natural language understanding engine driven by hand-crafted speech grammars.
//!
//! # Grammars
//!
//! A grammar defines which phrases are valid, and which semantic tags they produce when they are
//! recognized. Grammars are written in a subset of the XML speech grammar format:
//!
//! ```xml
//! <grammar root="order">
//!   <rule id="order">
//!     <item repeat="0-1">please</item>
//!     <item>a ticket to</item>
//!     <ruleref uri="city"/>
//!   </rule>
//!   <rule id="city">
//!     <one-of>
//!       <item>Paris<tag>CITY:Paris</tag></item>
//!       <item>New York<tag>CITY:NYC</tag></item>
//!     </one-of>
//!   </rule>
//! </grammar>
//! ```
//!
//! The `<grammar>` element names the root rule, which defines the phrases that can be
//! recognized. Each `<rule>` is a sequence of elements: an `<item>` is a literal phrase, optionally
//! annotated with a `<tag>`; a `<one-of>` offers a choice between its elements; an `<item>` with a
//! `repeat="m-n"` attribute repeats its contents between `m` and `n` times; and a `<ruleref>`
//! stands for the phrases of another rule.
//!
//! The [grammar] module can also build grammars programmatically, through
//! [`GrammarBuilder`](grammar::GrammarBuilder).
//!
//! # Interpretation
//!
//! A grammar is compiled into a single regular expression. An utterance is accepted if the whole
//! utterance matches it, ignoring whitespace and letter case. Whenever the whole text recognized by
//! the root rule or by a rule reference is a tagged phrase of that rule, the interpretation
//! contains a `rule: tag` line. With the grammar above, "Please a ticket to new york" is
//! interpreted as `city: CITY:NYC`.
//!
//! A rule referenced more than once from the same expansion contributes no tags, since the
//! recognized text couldn't be attributed to a single reference.
//!
//! An accepted utterance that recognized no tagged phrase has an empty interpretation. An
//! utterance that is not a phrase of the grammar has no interpretation at all.
//!
//! # Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: the compiled expression of each
//! grammar at the `info` level, and the details of compilation and matching at lower levels.

pub mod error;
pub mod grammar;
mod interpreter;
pub mod semantics;

pub use error::{Error, ErrorKind};
pub use grammar::Grammar;
pub use interpreter::Interpreter;

/// The type returned by grammar functions and methods.
pub type Result<T> = std::result::Result<T, Error>;

/// Parses and compiles a grammar from its XML representation.
pub fn initialize(document: &str) -> Result<Grammar> {
    Grammar::from_xml(document)
}
