//! `WHERE` clauses for the list endpoints.
//!
//! Each resource has a closed vocabulary of filter keys ([`CompanyFilterKey`],
//! [`JobFilterKey`]). A key maps to a fixed predicate template, so column and
//! operator text never comes from the client; only values are bound.
//!
//! Filters are rendered in a single pass over the client's keys. Every key
//! resolves to a [`Predicate`]: one that binds a value, one that binds
//! nothing, or no predicate at all. The placeholder counter only moves when a
//! value is actually bound.
//!
//! # Example
//! ```
//! use jobly_sql::{FieldMap, job_filter};
//!
//! let filters = FieldMap::new().with("title", "TestName").with("hasEquity", true);
//! let clause = job_filter(&filters)?;
//! assert_eq!(clause.sql, "WHERE LOWER(title) LIKE '%'||$1||'%' AND equity > 0");
//! assert_eq!(clause.values.len(), 1);
//! # Ok::<(), jobly_sql::SqlError>(())
//! ```

mod company;
mod job;


pub use company::CompanyFilterKey;
pub use job::JobFilterKey;

use crate::clause::{Clause, ParamList};
use crate::config::{EmptyFilterPolicy, FilterConfig};
use crate::error::{SqlError, SqlResult};
use crate::field_map::FieldMap;
use crate::value::SqlValue;

/// What a single filter key contributes to the `WHERE` clause.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Predicate that binds `value`; `render` receives the placeholder (`$n`).
    Bound {
        value: SqlValue,
        render: fn(&str) -> String,
    },
    /// Predicate that binds nothing.
    Fixed(&'static str),
    /// The key is present but contributes nothing.
    Skip,
}

/// A closed vocabulary of filter keys for one resource.
pub trait FilterKey: Sized + Copy + 'static {
    /// Resource name used in errors and logs.
    const RESOURCE: &'static str;

    /// Every recognized key.
    const ALL: &'static [Self];

    /// The key as the client spells it.
    fn as_str(self) -> &'static str;

    /// Turn a client value into this key's predicate, coercing it to the
    /// shape the key needs.
    fn predicate(self, value: &SqlValue) -> SqlResult<Predicate>;

    /// Look up a key by its client spelling.
    fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

/// Build a company filter clause with the default configuration.
///
/// Recognizes `name`, `minEmployees` and `maxEmployees`.
pub fn company_filter(filters: &FieldMap) -> SqlResult<Clause> {
    company_filter_with(filters, &FilterConfig::default())
}

/// Build a company filter clause.
///
/// Fails with [`SqlError::InvalidRange`] when `minEmployees` exceeds
/// `maxEmployees`.
pub fn company_filter_with(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
    let clause = build_filter::<CompanyFilterKey>(filters, config)?;
    company::check_employee_range(filters)?;
    Ok(clause)
}

/// Build a job filter clause with the default configuration.
///
/// Recognizes `title`, `minSalary` and `hasEquity`.
pub fn job_filter(filters: &FieldMap) -> SqlResult<Clause> {
    job_filter_with(filters, &FilterConfig::default())
}

/// Build a job filter clause.
pub fn job_filter_with(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
    build_filter::<JobFilterKey>(filters, config)
}

/// Render `filters` against the vocabulary `K`.
///
/// Returns `WHERE p1 AND p2 ...`, or an empty clause when no predicate was
/// produced. An empty `filters` map is subject to `config.empty_filter`.
pub fn build_filter<K: FilterKey>(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
    if filters.is_empty() {
        return match config.empty_filter {
            EmptyFilterPolicy::Omit => Ok(Clause::empty()),
            EmptyFilterPolicy::Reject => Err(SqlError::EmptyFilterSet {
                resource: K::RESOURCE,
            }),
        };
    }

    let mut predicates = ParamList::new();
    for (key, value) in filters.iter() {
        let Some(filter_key) = K::parse(key) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "jobly_sql.clause",
                resource = K::RESOURCE,
                key,
                "rejected unrecognized filter key"
            );
            return Err(SqlError::unrecognized(K::RESOURCE, key));
        };

        let predicate = filter_key.predicate(value).inspect_err(|_err| {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target: "jobly_sql.clause",
                resource = K::RESOURCE,
                key,
                value_type = value.type_name(),
                error = %_err,
                "rejected filter value"
            );
        })?;
        match predicate {
            Predicate::Bound { value, render } => predicates.push_bound(value, render),
            Predicate::Fixed(sql) => predicates.push_unbound(sql),
            Predicate::Skip => {}
        }
    }

    if predicates.is_empty() {
        return Ok(Clause::empty());
    }

    let mut clause = predicates.finish(" AND ");
    clause.sql.insert_str(0, "WHERE ");

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "jobly_sql.clause",
        resource = K::RESOURCE,
        sql = %clause.sql,
        params = clause.values.len(),
        "built filter"
    );

    Ok(clause)
}

// ==================== Value coercion ====================

/// Substring search value; scalars are rendered to text.
fn text_value(key: &'static str, value: &SqlValue) -> SqlResult<SqlValue> {
    match value {
        SqlValue::Text(_) => Ok(value.clone()),
        SqlValue::Null => Err(SqlError::invalid_value(key, "text")),
        other => Ok(SqlValue::Text(other.to_string())),
    }
}

/// Non-negative integer.
fn count_value(key: &'static str, value: &SqlValue) -> SqlResult<SqlValue> {
    match value.as_i64() {
        Some(n) if n >= 0 => Ok(SqlValue::Int(n)),
        _ => Err(SqlError::invalid_value(key, "a non-negative integer")),
    }
}

/// Non-negative number; integers stay integers.
fn amount_value(key: &'static str, value: &SqlValue) -> SqlResult<SqlValue> {
    let coerced = match value {
        SqlValue::Float(_) => value.as_f64().map(SqlValue::Float),
        _ => value
            .as_i64()
            .map(SqlValue::Int)
            .or_else(|| value.as_f64().map(SqlValue::Float)),
    };
    match coerced {
        Some(SqlValue::Int(n)) if n >= 0 => Ok(SqlValue::Int(n)),
        Some(SqlValue::Float(x)) if x >= 0.0 => Ok(SqlValue::Float(x)),
        _ => Err(SqlError::invalid_value(key, "a non-negative number")),
    }
}
