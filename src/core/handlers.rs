//! Overridable steps of the lookup pipeline
//!
//! [`Lookup::get_data`](crate::core::lookup::Lookup::get_data) always runs the
//! same sequence: one filter mode, sort, count, paginate, then shape each row.
//! Every step is a method of [`LookupHandlers`] with a default body, so a
//! lookup customises a single step by overriding one method. The defaults are
//! also exposed as free functions so an override can extend them instead of
//! rewriting them.

use crate::config::LookupConfig;
use crate::core::column::{LookupColumn, LookupColumns};
use crate::core::error::{ConfigError, InputError, LookupError};
use crate::core::field::{FieldDef, FieldValue, parse_decimal};
use crate::core::filter::LookupFilter;
use crate::core::query::{FieldRef, LookupQuery};
use crate::core::record::LookupRecord;
use crate::core::result::{AC_KEY, ID_KEY, LookupRow};
use tracing::debug;

/// Everything a pipeline step may read for the current request
#[derive(Debug, Clone, Copy)]
pub struct LookupContext<'a> {
    pub columns: &'a LookupColumns,
    pub config: &'a LookupConfig,
    pub filter: &'a LookupFilter,
}

/// Strategy hooks of a lookup.
///
/// # Example
/// ```rust,ignore
/// struct ActiveOnly;
///
/// impl LookupHandlers<Person> for ActiveOnly {
///     fn filter_by_search(
///         &self,
///         ctx: &LookupContext<'_>,
///         query: LookupQuery<Person>,
///     ) -> Result<LookupQuery<Person>, LookupError> {
///         let active = FieldRef::resolve::<Person>("active").unwrap();
///         let query = query.filter_equals(active, FieldValue::Boolean(true));
///         handlers::filter_by_search(ctx, query)
///     }
/// }
/// ```
pub trait LookupHandlers<R: LookupRecord>: Send + Sync {
    /// Registry key of the column derived from `field`
    fn column_key(&self, field: &FieldDef) -> String {
        field.name.to_string()
    }

    /// Header of the column derived from `field`
    fn column_header(&self, field: &FieldDef) -> Option<String> {
        field
            .column
            .as_ref()
            .and_then(|attr| attr.label)
            .map(str::to_string)
    }

    fn column_css_class(&self, _field: &FieldDef) -> Option<String> {
        None
    }

    fn filter_by_id(
        &self,
        ctx: &LookupContext<'_>,
        query: LookupQuery<R>,
        id: &str,
    ) -> Result<LookupQuery<R>, LookupError> {
        filter_by_id(ctx, query, id)
    }

    fn filter_by_additional_filters(
        &self,
        ctx: &LookupContext<'_>,
        query: LookupQuery<R>,
    ) -> Result<LookupQuery<R>, LookupError> {
        filter_by_additional_filters(ctx, query)
    }

    fn filter_by_search(
        &self,
        ctx: &LookupContext<'_>,
        query: LookupQuery<R>,
    ) -> Result<LookupQuery<R>, LookupError> {
        filter_by_search(ctx, query)
    }

    fn sort(
        &self,
        ctx: &LookupContext<'_>,
        query: LookupQuery<R>,
    ) -> Result<LookupQuery<R>, LookupError> {
        sort(ctx, query)
    }

    fn paginate(&self, ctx: &LookupContext<'_>, query: LookupQuery<R>) -> LookupQuery<R> {
        paginate(ctx, query)
    }

    fn add_id(
        &self,
        ctx: &LookupContext<'_>,
        row: &mut LookupRow,
        record: &R,
    ) -> Result<(), LookupError> {
        add_id(ctx, row, record)
    }

    fn add_autocomplete(&self, ctx: &LookupContext<'_>, row: &mut LookupRow, record: &R) {
        add_autocomplete(ctx, row, record)
    }

    fn add_columns(&self, ctx: &LookupContext<'_>, row: &mut LookupRow, record: &R) {
        add_columns(ctx, row, record)
    }

    /// Extension point for extra row keys, adds nothing by default
    fn add_additional_data(&self, _ctx: &LookupContext<'_>, _row: &mut LookupRow, _record: &R) {}
}

/// Handlers running every default step
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultHandlers;

impl<R: LookupRecord> LookupHandlers<R> for DefaultHandlers {}

/// Restrict the query to the record whose identifier equals `id`.
///
/// Textual identifiers compare as strings. Numeric identifiers are parsed as
/// a decimal first and compared by value.
pub fn filter_by_id<R: LookupRecord>(
    _ctx: &LookupContext<'_>,
    query: LookupQuery<R>,
    id: &str,
) -> Result<LookupQuery<R>, LookupError> {
    let field = FieldRef::resolve::<R>(R::id_field()).ok_or_else(|| ConfigError::MissingIdField {
        record_type: R::type_name().to_string(),
        field: R::id_field().to_string(),
    })?;

    let value = if field.kind().is_textual() {
        FieldValue::String(id.to_string())
    } else if field.kind().is_numeric() {
        parse_decimal(id).ok_or_else(|| InputError::NonNumericId {
            record_type: R::type_name().to_string(),
            value: id.to_string(),
        })?
    } else {
        return Err(ConfigError::UnsupportedIdType {
            record_type: R::type_name().to_string(),
            field: field.name().to_string(),
            kind: field.kind(),
        }
        .into());
    };

    Ok(query.filter_equals(field, value))
}

/// AND one equality predicate per non-null additional filter
pub fn filter_by_additional_filters<R: LookupRecord>(
    ctx: &LookupContext<'_>,
    mut query: LookupQuery<R>,
) -> Result<LookupQuery<R>, LookupError> {
    for (name, value) in &ctx.filter.additional_filters {
        if value.as_ref().is_none_or(FieldValue::is_null) {
            debug!(record_type = R::type_name(), field = %name, "Skipping null additional filter");
        }
    }

    for (name, value) in ctx.filter.active_additional_filters() {
        if !ctx.config.additional_filters.contains(name) {
            return Err(InputError::UndeclaredFilter {
                field: name.to_string(),
            }
            .into());
        }

        let field = FieldRef::resolve::<R>(name).ok_or_else(|| ConfigError::UnknownField {
            record_type: R::type_name().to_string(),
            field: name.to_string(),
        })?;

        let value = value
            .coerce_to(field.kind())
            .ok_or_else(|| InputError::InvalidFilterValue {
                field: name.to_string(),
                value: value.to_string(),
                expected: field.kind(),
            })?;

        query = query.filter_equals(field, value);
    }

    Ok(query)
}

/// Case-insensitive containment over every textual column
pub fn filter_by_search<R: LookupRecord>(
    ctx: &LookupContext<'_>,
    query: LookupQuery<R>,
) -> Result<LookupQuery<R>, LookupError> {
    let Some(search) = ctx.filter.search.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(query);
    };

    let mut fields: Vec<FieldRef> = Vec::new();
    for field in ctx
        .columns
        .iter()
        .filter_map(|column| FieldRef::resolve::<R>(&column.field))
    {
        if field.kind().is_textual() && !fields.contains(&field) {
            fields.push(field);
        }
    }

    Ok(query.filter_text_contains_any(fields, search))
}

/// Order by the requested column, the configured default, or the first
/// visible column, whichever is found first.
pub fn sort<R: LookupRecord>(
    ctx: &LookupContext<'_>,
    query: LookupQuery<R>,
) -> Result<LookupQuery<R>, LookupError> {
    let column = non_blank(ctx.filter.sort_column.as_deref())
        .or_else(|| non_blank(ctx.config.default_sort_column.as_deref()))
        .or_else(|| ctx.columns.first_visible().map(|c| c.key.as_str()));

    let Some(column) = column else {
        return Ok(query);
    };

    // Column keys map to their field, anything else is taken as a field name
    let field_name = ctx
        .columns
        .get(column)
        .map(|c| c.field.as_str())
        .unwrap_or(column);

    let field = FieldRef::resolve::<R>(field_name).ok_or_else(|| ConfigError::UnknownSortColumn {
        record_type: R::type_name().to_string(),
        column: column.to_string(),
    })?;

    Ok(query.order_by(field, ctx.filter.sort_order))
}

/// Skip to the requested page and cap it at the page size
pub fn paginate<R: LookupRecord>(ctx: &LookupContext<'_>, query: LookupQuery<R>) -> LookupQuery<R> {
    query.skip(ctx.filter.offset()).take(ctx.filter.rows)
}

/// Write the raw identifier under [`ID_KEY`]
pub fn add_id<R: LookupRecord>(
    _ctx: &LookupContext<'_>,
    row: &mut LookupRow,
    record: &R,
) -> Result<(), LookupError> {
    let value = record
        .field_value(R::id_field())
        .ok_or_else(|| ConfigError::MissingIdField {
            record_type: R::type_name().to_string(),
            field: R::id_field().to_string(),
        })?;

    row.insert(ID_KEY.to_string(), value.render());
    Ok(())
}

/// Write the first visible column's rendered value under [`AC_KEY`]
pub fn add_autocomplete<R: LookupRecord>(ctx: &LookupContext<'_>, row: &mut LookupRow, record: &R) {
    let value = ctx
        .columns
        .first_visible()
        .and_then(|column| render_cell(column, record));
    row.insert(AC_KEY.to_string(), value);
}

/// Write one rendered cell per registered column
pub fn add_columns<R: LookupRecord>(ctx: &LookupContext<'_>, row: &mut LookupRow, record: &R) {
    for column in ctx.columns.iter() {
        row.insert(column.key.clone(), render_cell(column, record));
    }
}

/// Render the value a column reads from a record.
///
/// A field the record type lacks and a null value both render as `None`.
pub fn render_cell<R: LookupRecord>(column: &LookupColumn, record: &R) -> Option<String> {
    record
        .field_value(&column.field)
        .and_then(|value| column.render(&value))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
