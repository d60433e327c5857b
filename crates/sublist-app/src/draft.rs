// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fmt;

use crate::model::Column;

/// Inclusive integer bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RangeBounds {
    pub const fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub const fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, value: i64) -> bool {
        if let Some(min) = self.min
            && value < min
        {
            return false;
        }
        if let Some(max) = self.max
            && value > max
        {
            return false;
        }
        true
    }

    /// Accepts `""`, `"N"`, `"N-M"`, `"N-"` and `"-M"`; `~` works as the
    /// separator too.
    pub fn parse(raw: &str) -> Result<Self> {
        let text = raw.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        let Some(split) = text.find(['-', '~']) else {
            let value = parse_bound(text, raw)?;
            return Ok(Self::new(Some(value), Some(value)));
        };

        let (left, right) = (&text[..split], &text[split + 1..]);
        let min = match left.trim() {
            "" => None,
            value => Some(parse_bound(value, raw)?),
        };
        let max = match right.trim() {
            "" => None,
            value => Some(parse_bound(value, raw)?),
        };

        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            bail!("range {raw:?} has min {min} above max {max}");
        }
        Ok(Self::new(min, max))
    }
}

fn parse_bound(value: &str, raw: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid range {raw:?}; use N, N-M, N- or -M"))
}

impl fmt::Display for RangeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{min}"),
            (Some(min), Some(max)) => write!(f, "{min}-{max}"),
            (Some(min), None) => write!(f, "{min}-"),
            (None, Some(max)) => write!(f, "-{max}"),
            (None, None) => Ok(()),
        }
    }
}

/// Raw filter input as typed, keyed by column key. Compiling it into
/// matchers happens in the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterDraft {
    text: BTreeMap<String, String>,
    ranges: BTreeMap<String, RangeBounds>,
}

impl FilterDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_text(&mut self, key: &str, text: &str) {
        if text.trim().is_empty() {
            self.text.remove(key);
        } else {
            self.text.insert(key.to_owned(), text.to_owned());
        }
    }

    pub fn text(&self, key: &str) -> &str {
        self.text.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.text
            .iter()
            .map(|(key, text)| (key.as_str(), text.as_str()))
    }

    pub fn set_range(&mut self, key: &str, bounds: RangeBounds) {
        if bounds.is_active() {
            self.ranges.insert(key.to_owned(), bounds);
        } else {
            self.ranges.remove(key);
        }
    }

    pub fn range(&self, key: &str) -> RangeBounds {
        self.ranges.get(key).copied().unwrap_or_default()
    }

    pub fn ranges(&self) -> impl Iterator<Item = (&str, RangeBounds)> {
        self.ranges.iter().map(|(key, bounds)| (key.as_str(), *bounds))
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.ranges.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.ranges.clear();
    }

    /// One-line description shown while the filter panel is collapsed.
    /// Ranges come first, then text filters, both in column order.
    pub fn summary(&self, columns: &[Column]) -> String {
        let label_for = |key: &str| {
            columns
                .iter()
                .find(|column| column.key == key)
                .map(|column| column.label.clone())
                .unwrap_or_else(|| key.to_owned())
        };

        let mut parts = Vec::new();
        for column in columns {
            if let Some(bounds) = self.ranges.get(&column.key) {
                parts.push(format!("{}:{bounds}", column.label));
            }
        }
        for (key, bounds) in &self.ranges {
            if !columns.iter().any(|column| &column.key == key) {
                parts.push(format!("{}:{bounds}", label_for(key)));
            }
        }
        for column in columns {
            if let Some(text) = self.text.get(&column.key) {
                parts.push(format!("{}:{}", column.label, text.trim()));
            }
        }
        parts.join(" / ")
    }
}
