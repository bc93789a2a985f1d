//! Lookup columns and the column registry derived from record metadata

use crate::core::error::ConfigError;
use crate::core::field::{FieldDef, FieldValue};
use crate::core::format::FormatTemplate;
use crate::core::handlers::LookupHandlers;
use crate::core::record::LookupRecord;
use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Presentation metadata for one lookup column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupColumn {
    /// Stable identity used in filters, sorting and row keys
    pub key: String,

    /// Record field the column reads its values from
    #[serde(skip)]
    pub field: String,

    /// Display label, absent unless explicitly declared
    pub header: Option<String>,

    pub css_class: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatTemplate>,

    #[serde(skip)]
    pub position: Option<i32>,

    pub hidden: bool,
}

impl LookupColumn {
    /// Column reading the record field of the same name
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            field: key.clone(),
            key,
            header: None,
            css_class: None,
            format: None,
            position: None,
            hidden: false,
        }
    }

    /// Render a raw value for this column.
    ///
    /// Null renders as `None` whatever the format; otherwise the format
    /// template is applied when declared, else the default string form.
    pub fn render(&self, value: &FieldValue) -> Option<String> {
        match &self.format {
            Some(template) => template.render(value),
            None => value.render(),
        }
    }
}

/// Ordered, immutable column registry of a lookup.
///
/// Built once when the lookup is constructed and shared read-only between
/// requests. Iteration order is registry order: explicit positions first
/// (ascending), then unpositioned columns, declaration order breaking ties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupColumns {
    columns: IndexMap<String, LookupColumn>,
}

impl LookupColumns {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the registry from a record type's field table.
    ///
    /// Every field carrying column metadata becomes a column. Keys, headers
    /// and CSS classes are resolved through the handlers so lookups can
    /// override them.
    pub fn derive<R, H>(handlers: &H) -> Result<Self, ConfigError>
    where
        R: LookupRecord,
        H: LookupHandlers<R> + ?Sized,
    {
        let mut attributed: Vec<&'static FieldDef> =
            R::fields().iter().filter(|def| def.column.is_some()).collect();

        // Vec::sort_by_key is stable, declaration order breaks ties
        attributed.sort_by_key(|def| match def.column.as_ref().and_then(|c| c.position) {
            Some(position) => (0, position),
            None => (1, 0),
        });

        let mut registry = Self::new();
        for def in attributed {
            let Some(attr) = def.column.as_ref() else {
                continue;
            };

            let key = handlers.column_key(def);
            let format = attr
                .format
                .map(|template| {
                    FormatTemplate::parse(template).map_err(|e| ConfigError::InvalidFormat {
                        column: key.clone(),
                        template: template.to_string(),
                        message: e.to_string(),
                    })
                })
                .transpose()?;

            registry.push(LookupColumn {
                key,
                field: def.name.to_string(),
                header: handlers.column_header(def),
                css_class: handlers.column_css_class(def),
                format,
                position: attr.position,
                hidden: attr.hidden,
            })?;
        }

        Ok(registry)
    }

    /// Append a column, rejecting duplicate keys
    pub fn push(&mut self, column: LookupColumn) -> Result<(), ConfigError> {
        if self.columns.contains_key(&column.key) {
            return Err(ConfigError::DuplicateColumn { key: column.key });
        }
        self.columns.insert(column.key.clone(), column);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&LookupColumn> {
        self.columns.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LookupColumn> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// First column that is not hidden, the default sort and autocomplete source
    pub fn first_visible(&self) -> Option<&LookupColumn> {
        self.columns.values().find(|c| !c.hidden)
    }
}

impl Serialize for LookupColumns {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.columns.len()))?;
        for column in self.columns.values() {
            seq.serialize_element(column)?;
        }
        seq.end()
    }
}
