//! Record trait defining the core abstraction for lookup data types

use crate::core::field::{FieldDef, FieldValue};

/// Base trait for every record type a lookup can browse.
///
/// A record describes itself through a static field table instead of runtime
/// reflection: each [`FieldDef`] names a field, its underlying kind, and the
/// lookup column metadata when the field is exposed as a column. The table
/// order is the declaration order and is relied upon as the tiebreak when
/// column positions are equal or absent.
///
/// Most record types are declared with [`impl_lookup_record!`](crate::impl_lookup_record),
/// which generates the table and accessors.
pub trait LookupRecord: Clone + Send + Sync + 'static {
    /// Record type name used in diagnostics (e.g., "person")
    fn type_name() -> &'static str;

    /// Static field table in declaration order
    fn fields() -> &'static [FieldDef];

    /// Get the value of a field by name.
    ///
    /// Returns `None` when the type has no such field, `Some(FieldValue::Null)`
    /// when the field exists but holds no value.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Name of the field holding the unique identifier
    fn id_field() -> &'static str {
        "id"
    }

    /// Look up a field definition by name
    fn field(name: &str) -> Option<&'static FieldDef> {
        Self::fields().iter().find(|def| def.name == name)
    }
}
