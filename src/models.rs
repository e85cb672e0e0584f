//! Domain model shared by the record store and the menu loop. `Book` is a
//! plain data holder; ordering, lookup and persistence live in `store`.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single catalog entry.
pub struct Book {
    /// Identifier within the catalog. The store keeps the set of ids dense
    /// (`0..len`) but does not tie an id to a position in the sequence.
    pub id: i64,
    /// Title shown in listings and matched by search.
    pub title: String,
    /// Author used for sorting and matched by search.
    pub author: String,
    /// Publication year.
    pub year: i32,
}

impl Book {
    pub fn new(id: i64, title: impl Into<String>, author: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Case-sensitive substring match against title or author.
    pub fn matches(&self, keyword: &str) -> bool {
        self.title.contains(keyword) || self.author.contains(keyword)
    }
}

impl fmt::Display for Book {
    /// Single-line rendering used by every listing in the menu.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} Title: {} Author: {} Year: {}",
            self.id, self.title, self.author, self.year
        )
    }
}
