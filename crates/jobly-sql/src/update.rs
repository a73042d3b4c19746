//! Partial-update `SET` lists.

use crate::clause::{Clause, ParamList};
use crate::error::{SqlError, SqlResult};
use crate::field_map::{ColumnAliases, FieldMap};

/// Build the assignment list of an `UPDATE ... SET` statement.
///
/// Each field becomes `"<column>"=$<n>` where the column is the alias of the
/// field (or the field name itself) and `n` is its position in `fields`. The
/// returned fragment carries no `SET` keyword.
///
/// Column names are quoted verbatim; aliases must come from the server, not
/// from the client.
///
/// # Example
/// ```
/// use jobly_sql::{ColumnAliases, FieldMap, partial_update};
///
/// let fields = FieldMap::new().with("name", "TestName").with("description", "test");
/// let aliases = ColumnAliases::new().alias("description", "company_description");
/// let set = partial_update(&fields, &aliases)?;
/// assert_eq!(set.sql, r#""name"=$1, "company_description"=$2"#);
/// # Ok::<(), jobly_sql::SqlError>(())
/// ```
pub fn partial_update(fields: &FieldMap, aliases: &ColumnAliases) -> SqlResult<Clause> {
    if fields.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::warn!(target: "jobly_sql.clause", "partial update with no fields");
        return Err(SqlError::NoData);
    }

    let mut set = ParamList::new();
    for (field, value) in fields.iter() {
        let column = aliases.column(field);
        set.push_bound(value.clone(), |p| format!("\"{column}\"={p}"));
    }
    let clause = set.finish(", ");

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target: "jobly_sql.clause",
        sql = %clause.sql,
        params = clause.values.len(),
        "built partial update"
    );

    Ok(clause)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::SqlValue;

    #[test]
    fn maps_aliases_and_numbers_in_order() {
        let fields = FieldMap::new()
            .with("name", "TestName")
            .with("description", "test");
        let aliases = ColumnAliases::new().alias("description", "company_description");

        let set = partial_update(&fields, &aliases).unwrap();
        assert_eq!(set.sql, r#""name"=$1, "company_description"=$2"#);
        assert_eq!(set.values, vec![SqlValue::from("TestName"), SqlValue::from("test")]);
    }

    #[test]
    fn empty_fields_is_no_data() {
        let err = partial_update(&FieldMap::new(), &ColumnAliases::new()).unwrap_err();
        assert!(err.is_no_data());
        assert!(err.is_bad_request());
    }

    #[test]
    fn null_values_are_bound_not_inlined() {
        let fields = FieldMap::new()
            .with("title", "New")
            .with("salary", SqlValue::Null)
            .with("equity", SqlValue::Null);
        let set = partial_update(&fields, &ColumnAliases::new()).unwrap();
        assert_eq!(set.sql, r#""title"=$1, "salary"=$2, "equity"=$3"#);
        assert_eq!(set.values[1], SqlValue::Null);
    }

    #[test]
    fn one_assignment_per_field_with_contiguous_placeholders() {
        let fields: FieldMap = (0..12).map(|i| (format!("f{i}"), i)).collect();
        let set = partial_update(&fields, &ColumnAliases::new()).unwrap();

        let terms: Vec<&str> = set.sql.split(", ").collect();
        assert_eq!(terms.len(), 12);
        for (i, term) in terms.iter().enumerate() {
            assert_eq!(*term, format!("\"f{i}\"=${}", i + 1));
        }
        assert_eq!(set.placeholder_count(), set.values.len());
    }

    #[test]
    fn same_input_same_output() {
        let fields = FieldMap::new().with("a", 1).with("b", true);
        let aliases = ColumnAliases::new().alias("b", "bee");
        assert_eq!(
            partial_update(&fields, &aliases).unwrap(),
            partial_update(&fields, &aliases).unwrap()
        );
    }
}
