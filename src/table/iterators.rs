// License: MIT
// Copyright © 2024 esm-metrics contributors

//! Iterators over the rows and row levels of a `MetricTable`.

use polars::prelude::StringChunked;

use super::Row;

/// An iterator over the rows of a `MetricTable`.
pub struct Rows {
    pub(crate) iter: std::vec::IntoIter<Row>,
}

impl Iterator for Rows {
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

/// An iterator over the values of one row level, in row order.
pub struct LevelValues<'a> {
    pub(crate) column: &'a StringChunked,
    pub(crate) next: usize,
}

impl<'a> Iterator for LevelValues<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.column.len() {
            return None;
        }
        let value = self.column.get(self.next).unwrap_or_default();
        self.next += 1;
        Some(value)
    }
}
