//! Complete statements for the `companies` and `jobs` tables.
//!
//! The clause builders produce fragments; this module owns the fixed table
//! metadata and splices those fragments into the statements the models run.
//!
//! ```
//! use jobly_sql::{Companies, FieldMap, Resource};
//!
//! let fields = FieldMap::new().with("numEmployees", 10);
//! let update = Companies::update_statement("c1", &fields)?;
//! assert_eq!(
//!     update.sql,
//!     "UPDATE companies SET \"num_employees\"=$1 WHERE handle = $2 \
//!      RETURNING handle, name, description, num_employees AS \"numEmployees\", logo_url AS \"logoUrl\""
//! );
//! # Ok::<(), jobly_sql::SqlError>(())
//! ```

use crate::clause::{Clause, ParamList};
use crate::config::FilterConfig;
use crate::error::{SqlError, SqlResult};
use crate::field_map::{ColumnAliases, FieldMap};
use crate::filter::{company_filter_with, job_filter_with};
use crate::update::partial_update;
use crate::value::SqlValue;

/// Table metadata plus statement assembly for one resource.
pub trait Resource {
    /// Resource name used in errors.
    const RESOURCE: &'static str;
    /// Table name.
    const TABLE: &'static str;
    /// Primary key column.
    const KEY_COLUMN: &'static str;
    /// Select/returning list, with camelCase output aliases.
    const COLUMNS: &'static str;
    /// Ordering of list queries.
    const ORDER_BY: &'static str;
    /// Fields a create payload may carry, in column order.
    const CREATABLE: &'static [&'static str];
    /// Fields an update payload may carry.
    const UPDATABLE: &'static [&'static str];

    /// Logical field name to column name.
    fn aliases() -> ColumnAliases;

    /// Build the `WHERE` clause for list queries.
    fn filter(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause>;

    /// `INSERT INTO <table> (...) VALUES ($1, ...) RETURNING <columns>`
    fn insert_statement(fields: &FieldMap) -> SqlResult<Clause> {
        if fields.is_empty() {
            return Err(SqlError::NoData);
        }
        reject_unlisted::<Self>(fields, Self::CREATABLE)?;

        let aliases = Self::aliases();
        let columns: Vec<String> = fields
            .keys()
            .map(|f| format!("\"{}\"", aliases.column(f)))
            .collect();
        let mut placeholders = ParamList::new();
        for value in fields.values() {
            placeholders.push_bound(value.clone(), str::to_string);
        }
        let Clause { sql: values_sql, values } = placeholders.finish(", ");

        Ok(Clause::new(
            format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                Self::TABLE,
                columns.join(", "),
                values_sql,
                Self::COLUMNS
            ),
            values,
        ))
    }

    /// `SELECT <columns> FROM <table> WHERE <key> = $1`
    fn get_statement(key: impl Into<SqlValue>) -> Clause {
        Clause::new(
            format!(
                "SELECT {} FROM {} WHERE {} = $1",
                Self::COLUMNS,
                Self::TABLE,
                Self::KEY_COLUMN
            ),
            vec![key.into()],
        )
    }

    /// `SELECT <columns> FROM <table>[ WHERE ...] ORDER BY <order>`
    fn select_statement(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
        let Clause {
            sql: where_sql,
            values,
        } = Self::filter(filters, config)?;

        let mut sql = format!("SELECT {} FROM {}", Self::COLUMNS, Self::TABLE);
        if !where_sql.is_empty() {
            sql.push(' ');
            sql.push_str(&where_sql);
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(Self::ORDER_BY);
        Ok(Clause::new(sql, values))
    }

    /// `UPDATE <table> SET ... WHERE <key> = $<n+1> RETURNING <columns>`
    ///
    /// The key is bound after every SET value.
    fn update_statement(key: impl Into<SqlValue>, fields: &FieldMap) -> SqlResult<Clause> {
        reject_unlisted::<Self>(fields, Self::UPDATABLE)?;
        let Clause {
            sql: set_sql,
            mut values,
        } = partial_update(fields, &Self::aliases())?;

        let mut key_param = ParamList::with_offset(values.len());
        key_param.push_bound(key.into(), |p| format!("{} = {p}", Self::KEY_COLUMN));
        let Clause {
            sql: key_sql,
            values: key_values,
        } = key_param.finish("");
        values.extend(key_values);

        Ok(Clause::new(
            format!(
                "UPDATE {} SET {} WHERE {} RETURNING {}",
                Self::TABLE,
                set_sql,
                key_sql,
                Self::COLUMNS
            ),
            values,
        ))
    }

    /// `DELETE FROM <table> WHERE <key> = $1 RETURNING <key>`
    fn delete_statement(key: impl Into<SqlValue>) -> Clause {
        Clause::new(
            format!(
                "DELETE FROM {} WHERE {} = $1 RETURNING {}",
                Self::TABLE,
                Self::KEY_COLUMN,
                Self::KEY_COLUMN
            ),
            vec![key.into()],
        )
    }
}

fn reject_unlisted<R: Resource + ?Sized>(
    fields: &FieldMap,
    allowed: &[&str],
) -> SqlResult<()> {
    match fields.keys().find(|f| !allowed.iter().any(|a| a == f)) {
        Some(field) => Err(SqlError::not_updatable(R::RESOURCE, field)),
        None => Ok(()),
    }
}

/// The `companies` table, keyed by `handle`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Companies;

impl Resource for Companies {
    const RESOURCE: &'static str = "company";
    const TABLE: &'static str = "companies";
    const KEY_COLUMN: &'static str = "handle";
    const COLUMNS: &'static str = "handle, name, description, num_employees AS \"numEmployees\", logo_url AS \"logoUrl\"";
    const ORDER_BY: &'static str = "name";
    const CREATABLE: &'static [&'static str] =
        &["handle", "name", "description", "numEmployees", "logoUrl"];
    const UPDATABLE: &'static [&'static str] = &["name", "description", "numEmployees", "logoUrl"];

    fn aliases() -> ColumnAliases {
        ColumnAliases::new()
            .alias("numEmployees", "num_employees")
            .alias("logoUrl", "logo_url")
    }

    fn filter(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
        company_filter_with(filters, config)
    }
}

/// The `jobs` table, keyed by a serial `id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jobs;

impl Resource for Jobs {
    const RESOURCE: &'static str = "job";
    const TABLE: &'static str = "jobs";
    const KEY_COLUMN: &'static str = "id";
    const COLUMNS: &'static str = "id, title, salary, equity, company_handle AS \"companyHandle\"";
    const ORDER_BY: &'static str = "title";
    const CREATABLE: &'static [&'static str] = &["title", "salary", "equity", "companyHandle"];
    const UPDATABLE: &'static [&'static str] = &["title", "salary", "equity"];

    fn aliases() -> ColumnAliases {
        ColumnAliases::new().alias("companyHandle", "company_handle")
    }

    fn filter(filters: &FieldMap, config: &FilterConfig) -> SqlResult<Clause> {
        job_filter_with(filters, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_update_binds_key_after_set_values() {
        let fields = FieldMap::new()
            .with("title", "New")
            .with("salary", 1)
            .with("equity", "0");
        let stmt = Jobs::update_statement(7, &fields).unwrap();
        assert_eq!(
            stmt.sql,
            "UPDATE jobs SET \"title\"=$1, \"salary\"=$2, \"equity\"=$3 WHERE id = $4 \
             RETURNING id, title, salary, equity, company_handle AS \"companyHandle\""
        );
        assert_eq!(stmt.values.last(), Some(&SqlValue::Int(7)));
        assert_eq!(stmt.placeholder_count(), stmt.values.len());
    }

    #[test]
    fn update_rejects_key_and_unknown_fields() {
        let fields = FieldMap::new().with("title", "x").with("companyHandle", "c2");
        assert_eq!(
            Jobs::update_statement(1, &fields).unwrap_err(),
            SqlError::not_updatable("job", "companyHandle")
        );
        let fields = FieldMap::new().with("handle", "c9");
        assert!(matches!(
            Companies::update_statement("c1", &fields),
            Err(SqlError::NotUpdatable { .. })
        ));
    }

    #[test]
    fn update_without_fields_is_no_data() {
        assert_eq!(
            Jobs::update_statement(1, &FieldMap::new()).unwrap_err(),
            SqlError::NoData
        );
    }

    #[test]
    fn select_without_filters_has_no_where() {
        let stmt = Jobs::select_statement(&FieldMap::new(), &FilterConfig::default()).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT id, title, salary, equity, company_handle AS \"companyHandle\" FROM jobs ORDER BY title"
        );
        assert!(stmt.values.is_empty());
    }

    #[test]
    fn select_with_filters_splices_where() {
        let filters = FieldMap::new().with("minSalary", 2).with("hasEquity", true);
        let stmt = Jobs::select_statement(&filters, &FilterConfig::default()).unwrap();
        assert!(stmt.sql.ends_with("FROM jobs WHERE salary >=$1 AND equity > 0 ORDER BY title"));
        assert_eq!(stmt.values, vec![SqlValue::Int(2)]);

        let filters = FieldMap::new().with("name", "net");
        let stmt = Companies::select_statement(&filters, &FilterConfig::default()).unwrap();
        assert!(stmt.sql.ends_with(
            "FROM companies WHERE LOWER(name) LIKE '%'||$1||'%' ORDER BY name"
        ));
    }

    #[test]
    fn insert_uses_aliases_and_numbers_values() {
        let fields = FieldMap::new()
            .with("title", "new")
            .with("salary", 200)
            .with("equity", "0.05")
            .with("companyHandle", "c1");
        let stmt = Jobs::insert_statement(&fields).unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO jobs (\"title\", \"salary\", \"equity\", \"company_handle\") \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, salary, equity, company_handle AS \"companyHandle\""
        );
        assert_eq!(stmt.values.len(), 4);
        assert!(Jobs::insert_statement(&FieldMap::new().with("id", 3)).is_err());
    }

    #[test]
    fn get_and_delete_bind_the_key() {
        let get = Companies::get_statement("c1");
        assert!(get.sql.ends_with("FROM companies WHERE handle = $1"));
        let delete = Jobs::delete_statement(3);
        assert_eq!(delete.sql, "DELETE FROM jobs WHERE id = $1 RETURNING id");
        assert_eq!(delete.values, vec![SqlValue::Int(3)]);
    }
}
