//! PostgreSQL compilation of a [`DocumentQuery`]
//!
//! Documents live in a `jsonb` column named `doc`. Paths are bound as
//! `text[]` and navigated with `#>`; filter values are bound both as typed
//! JSON and as text so that the coercion rules of [`crate::eval`] hold in
//! the database too. Projection is not compiled: stores apply
//! [`crate::eval::project`] to the fetched rows.

use sqlx::{Postgres, QueryBuilder, types::Json};

use crate::collection::DocumentQuery;
use crate::eval::coerce;
use crate::spec::{ComparisonOp, FilterKey, FilterSpec, FilterValue, SortDirection};

/// `select doc from <source> where ...` for the scope, filter, order and
/// page of `query`. `source` must be a trusted table name.
pub fn select_documents(source: &str, query: &DocumentQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("select doc from ");
    builder.push(source);
    builder.push(" where true");

    push_filter(&mut builder, query.scope());
    push_filter(&mut builder, query.filter());

    if !query.order().is_empty() {
        builder.push(" order by ");
        let mut first = true;
        for key in query.order().keys() {
            if !first {
                builder.push(", ");
            }
            first = false;
            push_path(&mut builder, &split_path(&key.field));
            builder.push(match key.direction {
                SortDirection::Asc => " asc nulls first",
                SortDirection::Desc => " desc nulls last",
            });
        }
    }

    if let Some(pagination) = query.pagination() {
        builder.push(" limit ");
        builder.push_bind(i64::try_from(pagination.limit).unwrap_or(i64::MAX));
        builder.push(" offset ");
        builder.push_bind(i64::try_from(pagination.skip).unwrap_or(i64::MAX));
    }

    builder
}

/// Append ` and <condition>` for every condition of `filter`
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &FilterSpec) {
    for (field, condition) in filter.iter() {
        builder.push(" and ");
        push_condition(builder, &split_path(field), condition);
    }
}

fn split_path(field: &str) -> Vec<String> {
    field.split('.').map(str::to_string).collect()
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Path(&'a [String]),
    /// Element of an array field, inside the `exists` sub-select
    Element,
}

fn push_path(builder: &mut QueryBuilder<'_, Postgres>, path: &[String]) {
    builder.push("doc #> ");
    builder.push_bind(path.to_vec());
}

fn push_target(builder: &mut QueryBuilder<'_, Postgres>, target: Target<'_>) {
    match target {
        Target::Path(path) => push_path(builder, path),
        Target::Element => {
            builder.push("elem.value");
        }
    }
}

fn push_condition(
    builder: &mut QueryBuilder<'_, Postgres>,
    path: &[String],
    condition: &FilterValue,
) {
    match condition {
        FilterValue::Literal(literal) => push_equals(builder, path, literal),
        FilterValue::AnyOf(literals) => {
            if literals.is_empty() {
                builder.push("false");
                return;
            }
            builder.push("(");
            let mut first = true;
            for literal in literals {
                if !first {
                    builder.push(" or ");
                }
                first = false;
                push_equals(builder, path, literal);
            }
            builder.push(")");
        }
        FilterValue::Nested(entries) => {
            if entries.is_empty() {
                builder.push("true");
                return;
            }
            builder.push("(");
            let mut first = true;
            for (key, value) in entries {
                if !first {
                    builder.push(" and ");
                }
                first = false;
                match key {
                    FilterKey::Op(op) => push_operator(builder, path, *op, value),
                    FilterKey::Field(sub) => {
                        let mut nested = path.to_vec();
                        nested.extend(split_path(sub));
                        push_condition(builder, &nested, value);
                    }
                }
            }
            builder.push(")");
        }
    }
}

fn push_operator(
    builder: &mut QueryBuilder<'_, Postgres>,
    path: &[String],
    op: ComparisonOp,
    operand: &FilterValue,
) {
    match operand {
        FilterValue::Literal(literal) => push_compare(builder, path, op, literal),
        FilterValue::AnyOf(literals) => {
            if literals.is_empty() {
                builder.push("true");
                return;
            }
            builder.push("(");
            let mut first = true;
            for literal in literals {
                if !first {
                    builder.push(" and ");
                }
                first = false;
                push_compare(builder, path, op, literal);
            }
            builder.push(")");
        }
        FilterValue::Nested(_) => {
            builder.push("false");
        }
    }
}

fn push_equals(builder: &mut QueryBuilder<'_, Postgres>, path: &[String], literal: &str) {
    push_scalar_or_element(builder, path, |b, target| {
        push_scalar_equals(b, target, literal)
    });
}

fn push_compare(
    builder: &mut QueryBuilder<'_, Postgres>,
    path: &[String],
    op: ComparisonOp,
    literal: &str,
) {
    let sql_op = match op {
        ComparisonOp::Gt => ">",
        ComparisonOp::Gte => ">=",
        ComparisonOp::Lt => "<",
        ComparisonOp::Lte => "<=",
        ComparisonOp::Ne => {
            builder.push("not coalesce(");
            push_equals(builder, path, literal);
            builder.push(", false)");
            return;
        }
    };
    push_scalar_or_element(builder, path, |b, target| {
        push_scalar_compare(b, target, sql_op, literal)
    });
}

/// `(<pred on field> or <pred on any element of an array field>)`; the
/// `case` keeps `jsonb_array_elements` away from scalars
fn push_scalar_or_element<F>(
    builder: &mut QueryBuilder<'_, Postgres>,
    path: &[String],
    push_pred: F,
) where
    F: Fn(&mut QueryBuilder<'_, Postgres>, Target<'_>),
{
    builder.push("(");
    push_pred(builder, Target::Path(path));
    builder.push(" or case when jsonb_typeof(");
    push_path(builder, path);
    builder.push(") = 'array' then exists (select 1 from jsonb_array_elements(");
    push_path(builder, path);
    builder.push(") as elem(value) where ");
    push_pred(builder, Target::Element);
    builder.push(") else false end)");
}

fn push_scalar_equals(
    builder: &mut QueryBuilder<'_, Postgres>,
    target: Target<'_>,
    literal: &str,
) {
    builder.push("(");
    push_target(builder, target);
    builder.push(" = ");
    builder.push_bind(Json(coerce(literal)));
    builder.push(" or (jsonb_typeof(");
    push_target(builder, target);
    builder.push(") = 'string' and ");
    push_target(builder, target);
    builder.push(" #>> '{}' = ");
    builder.push_bind(literal.to_string());
    builder.push("))");
}

fn push_scalar_compare(
    builder: &mut QueryBuilder<'_, Postgres>,
    target: Target<'_>,
    sql_op: &str,
    literal: &str,
) {
    builder.push("(");
    let typed = coerce(literal);
    if typed.is_number() {
        builder.push("(jsonb_typeof(");
        push_target(builder, target);
        builder.push(") = 'number' and ");
        push_target(builder, target);
        builder.push(" ");
        builder.push(sql_op);
        builder.push(" ");
        builder.push_bind(Json(typed));
        builder.push(") or ");
    }
    builder.push("(jsonb_typeof(");
    push_target(builder, target);
    builder.push(") = 'string' and (");
    push_target(builder, target);
    builder.push(" #>> '{}') collate \"C\" ");
    builder.push(sql_op);
    builder.push(" ");
    builder.push_bind(literal.to_string());
    builder.push("))");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::QueryableCollection;
    use crate::spec::{OrderSpec, PaginationSpec};

    #[test]
    fn test_empty_query() {
        let builder = select_documents("tours", &DocumentQuery::new());
        assert_eq!(builder.sql(), "select doc from tours where true");
    }

    #[test]
    fn test_order_and_page() {
        let query = DocumentQuery::new()
            .with_sort(OrderSpec::parse("-price,name"))
            .with_pagination(PaginationSpec::from_page(2, 5));
        let builder = select_documents("tours", &query);

        assert_eq!(
            builder.sql(),
            "select doc from tours where true order by doc #> $1 desc nulls last, \
             doc #> $2 asc nulls first limit $3 offset $4"
        );
    }

    #[test]
    fn test_scope_precedes_filter() {
        let query = DocumentQuery::scoped(FilterSpec::new().compare(
            "secretTour",
            ComparisonOp::Ne,
            "true",
        ))
        .with_filter(FilterSpec::new().compare("price", ComparisonOp::Lt, "500"));
        let builder = select_documents("tours", &query);
        let sql = builder.sql();

        let ne = sql.find("not coalesce(").unwrap();
        let lt = sql.find(" < ").unwrap();
        assert!(ne < lt);
        assert!(sql.contains("jsonb_typeof(doc #> "));
        assert!(sql.contains("collate \"C\" < "));
    }

    #[test]
    fn test_empty_any_of_matches_nothing() {
        let query = DocumentQuery::new()
            .with_filter(FilterSpec::new().with("difficulty", FilterValue::AnyOf(vec![])));
        let builder = select_documents("tours", &query);
        assert_eq!(builder.sql(), "select doc from tours where true and false");
    }
}
