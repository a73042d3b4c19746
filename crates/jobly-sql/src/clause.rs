//! Clause output and the shared placeholder accumulator.

use crate::value::SqlValue;
use serde::Serialize;
use tokio_postgres::types::ToSql;

/// A SQL fragment plus the values bound to its `$n` placeholders.
///
/// Placeholder `$i` refers to `values[i - 1]`; placeholders are numbered from
/// 1 without gaps, in the order they appear in `sql`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[must_use]
pub struct Clause {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl Clause {
    pub fn new(sql: impl Into<String>, values: Vec<SqlValue>) -> Self {
        Self {
            sql: sql.into(),
            values,
        }
    }

    /// An empty fragment that binds nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the fragment is empty (e.g. a filter with no predicates).
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Get parameter references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Number of distinct `$n` placeholders in the fragment.
    ///
    /// Only digits directly after `$` count, so `$` inside string literals
    /// that are not followed by a digit are ignored.
    pub fn placeholder_count(&self) -> usize {
        let mut seen = std::collections::BTreeSet::new();
        let bytes = self.sql.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'$' {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    seen.insert(&self.sql[start..end]);
                }
                i = end.max(start);
            } else {
                i += 1;
            }
        }
        seen.len()
    }
}

/// Accumulates predicates or assignments while numbering placeholders.
///
/// `param_count` is advanced exactly once per bound value, never per key, so
/// entries that bind nothing do not shift later placeholders.
#[derive(Debug, Default)]
pub(crate) struct ParamList {
    parts: Vec<String>,
    values: Vec<SqlValue>,
    param_count: usize,
}

impl ParamList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Continue numbering after `offset` already-bound values.
    pub(crate) fn with_offset(offset: usize) -> Self {
        Self {
            param_count: offset,
            ..Self::default()
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Bind a value and push the part rendered around its placeholder.
    pub(crate) fn push_bound(&mut self, value: SqlValue, render: impl FnOnce(&str) -> String) {
        self.param_count += 1;
        let placeholder = format!("${}", self.param_count);
        self.parts.push(render(&placeholder));
        self.values.push(value);
    }

    /// Push a part that binds nothing.
    pub(crate) fn push_unbound(&mut self, part: impl Into<String>) {
        self.parts.push(part.into());
    }

    pub(crate) fn finish(self, separator: &str) -> Clause {
        Clause {
            sql: self.parts.join(separator),
            values: self.values,
        }
    }
}
