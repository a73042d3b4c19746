//! # jobly-sql
//!
//! Parameterized SQL clause builders for a companies/jobs PostgreSQL backend.
//!
//! ## Features
//!
//! - **Partial updates**: turn a sparse payload into a `"col"=$n, ...` list
//! - **List filters**: closed per-resource filter vocabularies rendered as
//!   `WHERE ... AND ...` with contiguous `$n` placeholders
//! - **Values, not SQL**: client input is only ever bound, never spliced;
//!   column and operator text is fixed per recognized key
//! - **tokio-postgres ready**: [`Clause::params_ref`] yields the
//!   `&[&(dyn ToSql + Sync)]` slice `query()` expects
//!
//! ```
//! use jobly_sql::{ColumnAliases, FieldMap, company_filter, partial_update};
//!
//! let set = partial_update(
//!     &FieldMap::new().with("name", "TestName").with("description", "test"),
//!     &ColumnAliases::new().alias("description", "company_description"),
//! )?;
//! assert_eq!(set.sql, r#""name"=$1, "company_description"=$2"#);
//!
//! let filter = company_filter(&FieldMap::new().with("name", "TestName").with("minEmployees", 500))?;
//! assert_eq!(filter.sql, "WHERE LOWER(name) LIKE '%'||$1||'%' AND num_employees >=$2");
//! # Ok::<(), jobly_sql::SqlError>(())
//! ```

pub mod clause;
pub mod config;
pub mod error;
pub mod field_map;
pub mod filter;
pub mod resource;
pub mod update;
pub mod value;

pub use clause::Clause;
pub use config::{EmptyFilterPolicy, FilterConfig};
pub use error::{SqlError, SqlResult};
pub use field_map::{ColumnAliases, FieldMap};
pub use filter::{
    CompanyFilterKey, FilterKey, JobFilterKey, Predicate, build_filter, company_filter,
    company_filter_with, job_filter, job_filter_with,
};
pub use resource::{Companies, Jobs, Resource};
pub use update::partial_update;
pub use value::SqlValue;
