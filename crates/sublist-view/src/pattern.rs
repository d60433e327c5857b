// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use regex::{Regex, RegexBuilder};
use std::fmt;

/// One filter term compiled into a case-insensitive unanchored matcher.
/// `*` stands for any run of characters; everything else is literal.
#[derive(Clone)]
pub struct Pattern {
    term: String,
    regex: Regex,
}

impl Pattern {
    /// Blank terms and terms that fail to compile yield `None`.
    pub fn compile(term: &str) -> Option<Self> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let source = regex::escape(term).replace(r"\*", ".*");
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(regex) => Some(Self {
                term: term.to_owned(),
                regex,
            }),
            Err(error) => {
                tracing::debug!(term, %error, "dropping filter term that does not compile");
                None
            }
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.term).finish()
    }
}

/// Splits a filter field on whitespace, commas and semicolons.
pub fn split_terms(text: &str) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|term| !term.is_empty())
        .collect()
}

/// Terms OR together; the returned list skips anything that did not compile.
pub fn compile_terms(text: &str) -> Vec<Pattern> {
    split_terms(text)
        .into_iter()
        .filter_map(Pattern::compile)
        .collect()
}
