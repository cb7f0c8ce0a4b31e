//! # Display Indexes
//!
//! Document ids are UUIDs, which nobody wants to type. Listings number
//! documents `1, 2, 3…` newest-first (by `updated_at`), and commands accept
//! a [`DocSelector`]: that number, an id prefix, or a piece of the title.
//!
//! Indexes are positional, so they shift whenever a document is saved. They
//! are meant for the "list, then act" loop, not for scripts; scripts should
//! use id prefixes.

use crate::model::Document;
use std::str::FromStr;

const MIN_ID_PREFIX: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDocument {
    pub index: usize,
    pub document: Document,
}

/// A user input selecting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSelector {
    Index(usize),
    IdPrefix(String),
    Title(String),
}

impl std::fmt::Display for DocSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocSelector::Index(i) => write!(f, "{}", i),
            DocSelector::IdPrefix(p) => write!(f, "id:{}", p),
            DocSelector::Title(t) => write!(f, "\"{}\"", t),
        }
    }
}

impl FromStr for DocSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty document selector".to_string());
        }
        if let Ok(n) = s.parse::<usize>() {
            if n == 0 {
                return Err("Indexes start at 1".to_string());
            }
            return Ok(DocSelector::Index(n));
        }
        if let Some(prefix) = s.strip_prefix("id:") {
            return Ok(DocSelector::IdPrefix(prefix.to_lowercase()));
        }
        if s.len() >= MIN_ID_PREFIX && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
            return Ok(DocSelector::IdPrefix(s.to_lowercase()));
        }
        Ok(DocSelector::Title(s.to_string()))
    }
}

/// Numbers documents in the order given. Stores already return newest first.
pub fn index_documents(docs: Vec<Document>) -> Vec<DisplayDocument> {
    docs.into_iter()
        .enumerate()
        .map(|(i, document)| DisplayDocument {
            index: i + 1,
            document,
        })
        .collect()
}
