//! Rule-table building blocks
//!
//! A rule table is an ordered list of `(matcher, action)` pairs evaluated
//! top to bottom against a normalized label; the first match wins. Tables
//! are plain data so each entry can be tested on its own.

use regex::Regex;

/// How a rule recognizes a normalized label
#[derive(Debug, Clone)]
pub enum Matcher {
    /// The label equals one of the literals
    Exact(&'static [&'static str]),
    /// The label starts with one of the tokens
    Prefix(&'static [&'static str]),
    /// The label contains one of the tokens
    Contains(&'static [&'static str]),
    /// The label matches the pattern
    Pattern(Regex),
}

impl Matcher {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Matcher::Exact(literals) => literals.iter().any(|l| *l == label),
            Matcher::Prefix(tokens) => tokens.iter().any(|t| label.starts_with(t)),
            Matcher::Contains(tokens) => tokens.iter().any(|t| label.contains(t)),
            Matcher::Pattern(regex) => regex.is_match(label),
        }
    }
}

pub fn exact(literals: &'static [&'static str]) -> Matcher {
    Matcher::Exact(literals)
}

pub fn prefix(tokens: &'static [&'static str]) -> Matcher {
    Matcher::Prefix(tokens)
}

pub fn contains(tokens: &'static [&'static str]) -> Matcher {
    Matcher::Contains(tokens)
}

/// Only used while building the static tables; the patterns are constants
pub fn pattern(source: &'static str) -> Matcher {
    Matcher::Pattern(Regex::new(source).expect("invalid rule pattern"))
}

/// What a matching rule writes into the project details field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Details {
    /// Leave the details as they are
    #[default]
    Keep,
    /// The whole (trimmed, case-preserved) label
    Label,
    /// The label without its leading classifying token
    StripPrefix(&'static [&'static str]),
    /// The label without a trailing token
    StripSuffix(&'static [&'static str]),
}

impl Details {
    /// Details text for `label`, or None when the rule keeps the current value
    pub fn extract(&self, label: &str) -> Option<String> {
        use super::normalize::strip_prefix_suffix;

        match self {
            Details::Keep => None,
            Details::Label => Some(label.trim().to_string()),
            Details::StripPrefix(prefixes) => Some(strip_prefix_suffix(label, prefixes, &[])),
            Details::StripSuffix(suffixes) => Some(strip_prefix_suffix(label, &[], suffixes)),
        }
    }
}

/// A rule with a matcher, usable by `first_match`
pub trait Rule {
    fn matcher(&self) -> &Matcher;
}

/// The first rule whose matcher accepts `label`, with its position
pub fn first_match<'r, R: Rule>(rules: &'r [R], label: &str) -> Option<(usize, &'r R)> {
    rules
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.matcher().matches(label))
}
