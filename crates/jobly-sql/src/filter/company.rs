//! Company filters: `name`, `minEmployees`, `maxEmployees`.

use super::{FilterKey, Predicate, count_value, text_value};
use crate::error::{SqlError, SqlResult};
use crate::field_map::FieldMap;
use crate::value::SqlValue;
use std::fmt;
use std::str::FromStr;

/// Filter keys accepted by the company list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyFilterKey {
    /// Substring of the lowercased company name.
    ///
    /// The needle is bound as supplied, so callers pass it lowercase.
    Name,
    /// Lower bound (inclusive) on `num_employees`.
    MinEmployees,
    /// Upper bound (inclusive) on `num_employees`.
    MaxEmployees,
}

impl FilterKey for CompanyFilterKey {
    const RESOURCE: &'static str = "company";

    const ALL: &'static [Self] = &[Self::Name, Self::MinEmployees, Self::MaxEmployees];

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::MinEmployees => "minEmployees",
            Self::MaxEmployees => "maxEmployees",
        }
    }

    fn predicate(self, value: &SqlValue) -> SqlResult<Predicate> {
        let key = self.as_str();
        Ok(match self {
            Self::Name => Predicate::Bound {
                value: text_value(key, value)?,
                render: |p| format!("LOWER(name) LIKE '%'||{p}||'%'"),
            },
            Self::MinEmployees => Predicate::Bound {
                value: count_value(key, value)?,
                render: |p| format!("num_employees >={p}"),
            },
            Self::MaxEmployees => Predicate::Bound {
                value: count_value(key, value)?,
                render: |p| format!("num_employees <={p}"),
            },
        })
    }
}

impl fmt::Display for CompanyFilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyFilterKey {
    type Err = SqlError;

    fn from_str(s: &str) -> SqlResult<Self> {
        Self::parse(s).ok_or_else(|| SqlError::unrecognized(Self::RESOURCE, s))
    }
}

/// Reject `minEmployees > maxEmployees`.
pub(super) fn check_employee_range(filters: &FieldMap) -> SqlResult<()> {
    let bound = |key: CompanyFilterKey| filters.get(key.as_str()).and_then(SqlValue::as_i64);
    match (
        bound(CompanyFilterKey::MinEmployees),
        bound(CompanyFilterKey::MaxEmployees),
    ) {
        (Some(min), Some(max)) if min > max => {
            #[cfg(feature = "tracing")]
            tracing::warn!(target: "jobly_sql.clause", min, max, "rejected employee range");
            Err(SqlError::InvalidRange { min, max })
        }
        _ => Ok(()),
    }
}
