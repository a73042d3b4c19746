//! Job filters: `title`, `minSalary`, `hasEquity`.

use super::{FilterKey, Predicate, amount_value, text_value};
use crate::error::{SqlError, SqlResult};
use crate::value::SqlValue;
use std::fmt;
use std::str::FromStr;

/// Filter keys accepted by the job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobFilterKey {
    /// Substring of the lowercased job title.
    ///
    /// The needle is bound as supplied, so callers pass it lowercase.
    Title,
    /// Lower bound (inclusive) on `salary`.
    MinSalary,
    /// Only jobs with non-zero equity when truthy; binds no parameter.
    HasEquity,
}

impl FilterKey for JobFilterKey {
    const RESOURCE: &'static str = "job";

    const ALL: &'static [Self] = &[Self::Title, Self::MinSalary, Self::HasEquity];

    fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::MinSalary => "minSalary",
            Self::HasEquity => "hasEquity",
        }
    }

    fn predicate(self, value: &SqlValue) -> SqlResult<Predicate> {
        let key = self.as_str();
        Ok(match self {
            Self::Title => Predicate::Bound {
                value: text_value(key, value)?,
                render: |p| format!("LOWER(title) LIKE '%'||{p}||'%'"),
            },
            Self::MinSalary => Predicate::Bound {
                value: amount_value(key, value)?,
                render: |p| format!("salary >={p}"),
            },
            Self::HasEquity if value.is_truthy() => Predicate::Fixed("equity > 0"),
            Self::HasEquity => Predicate::Skip,
        })
    }
}

impl fmt::Display for JobFilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobFilterKey {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        Self::parse(s).ok_or_else(|| SqlError::unrecognized(Self::RESOURCE, s))
    }
}
