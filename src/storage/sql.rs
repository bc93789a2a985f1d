//! SQL rendering of lookup queries
//!
//! Turns a [`LookupQuery`] into parameterized PostgreSQL statements so that a
//! database-backed [`RecordSource`](crate::core::store::RecordSource) can
//! evaluate the count and the page server-side. Identifiers only ever come
//! from a record type's static field table and are always quoted; every
//! request value is passed as a `$n` bind parameter.

use crate::core::field::FieldValue;
use crate::core::filter::SortOrder;
use crate::core::query::{LookupQuery, Predicate};
use crate::core::record::LookupRecord;

/// A rendered statement and its positional bind parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

/// Renders a lookup query against one table
///
/// # Example
///
/// ```rust,ignore
/// let query = lookup.build_query(&filter)?;
/// let sql = SqlQuery::new("public.people", &query);
///
/// let count = sql.count();   // SELECT COUNT(*) FROM "public"."people" WHERE ...
/// let page = sql.page();     // SELECT * FROM ... ORDER BY ... LIMIT $n OFFSET $m
/// ```
#[derive(Debug)]
pub struct SqlQuery<'a, R> {
    table: &'a str,
    query: &'a LookupQuery<R>,
}

impl<'a, R: LookupRecord> SqlQuery<'a, R> {
    pub fn new(table: &'a str, query: &'a LookupQuery<R>) -> Self {
        Self { table, query }
    }

    /// `SELECT COUNT(*)` over the filtered set
    pub fn count(&self) -> SqlStatement {
        let mut params = Vec::new();
        let mut sql = format!("SELECT COUNT(*) FROM {}", quote_table(self.table));
        self.push_where(&mut sql, &mut params);
        SqlStatement { sql, params }
    }

    /// `SELECT *` over the filtered set, ordered and paged
    pub fn page(&self) -> SqlStatement {
        let mut params = Vec::new();
        let mut sql = format!("SELECT * FROM {}", quote_table(self.table));
        self.push_where(&mut sql, &mut params);

        if let Some(ordering) = self.query.ordering() {
            let direction = match ordering.order {
                SortOrder::Asc => "ASC NULLS FIRST",
                SortOrder::Desc => "DESC NULLS LAST",
            };
            sql.push_str(&format!(
                " ORDER BY {} {}",
                quote_ident(ordering.field.name()),
                direction
            ));
        }

        if let Some(take) = self.query.taken() {
            params.push(FieldValue::Integer(clamp(take)));
            sql.push_str(&format!(" LIMIT ${}", params.len()));
        }

        if self.query.skipped() > 0 {
            params.push(FieldValue::Integer(clamp(self.query.skipped())));
            sql.push_str(&format!(" OFFSET ${}", params.len()));
        }

        SqlStatement { sql, params }
    }

    fn push_where(&self, sql: &mut String, params: &mut Vec<FieldValue>) {
        let conditions: Vec<String> = self
            .query
            .predicates()
            .iter()
            .map(|predicate| render_predicate(predicate, params))
            .collect();

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
    }
}

fn render_predicate(predicate: &Predicate, params: &mut Vec<FieldValue>) -> String {
    match predicate {
        Predicate::Equals { field, value } => {
            params.push(value.clone());
            let column = quote_ident(field.name());
            format!("({column} IS NOT NULL AND {column} = ${})", params.len())
        }
        Predicate::ContainsText { fields, needle } => {
            params.push(FieldValue::String(format!("%{}%", escape_like_pattern(needle))));
            let p = params.len();
            let alternatives: Vec<String> = fields
                .iter()
                .map(|field| {
                    let column = quote_ident(field.name());
                    format!("({column} IS NOT NULL AND LOWER({column}) LIKE ${p} ESCAPE '\\')")
                })
                .collect();
            format!("({})", alternatives.join(" OR "))
        }
    }
}

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified table name
fn quote_table(table: &str) -> String {
    table.split('.').map(quote_ident).collect::<Vec<_>>().join(".")
}

fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn clamp(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
