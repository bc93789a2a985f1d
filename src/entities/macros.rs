//! Macros for reducing boilerplate when defining lookup records
//!
//! A record type describes its fields through a static table instead of
//! runtime reflection. These macros generate the struct, the table and the
//! [`LookupRecord`](crate::core::record::LookupRecord) implementation from a
//! single declaration, so the table always matches the struct.

/// Declare a lookup record with automatic trait implementations
///
/// Fields followed by `=> { ... }` are exposed as lookup columns. The block
/// accepts any of `position`, `hidden`, `format` and `label`. The identifier
/// field defaults to `id`; pass `id = field` before the field list to use
/// another one.
///
/// # Example
///
/// ```rust,ignore
/// use lookup::prelude::*;
///
/// impl_lookup_record!(
///     Person,
///     "person",
///     {
///         id: i64,
///         name: String => { position: 1, label: "Name" },
///         email: Option<String> => { position: 2 },
///         age: i32 => { format: "{0:000}" },
///         internal_code: String => { hidden: true },
///         notes: String,
///     }
/// );
///
/// let ann = Person::new(5, "Ann".into(), Some("a@x.com".into()), 7, "X".into(), String::new());
/// assert_eq!(Person::fields().len(), 6);
/// ```
#[macro_export]
macro_rules! impl_lookup_record {
    (
        $type:ident,
        $type_name:expr,
        id = $id_field:ident,
        { $( $body:tt )* }
    ) => {
        $crate::impl_lookup_record!(@define $type, $type_name, stringify!($id_field), { $( $body )* });
    };

    (
        $type:ident,
        $type_name:expr,
        { $( $body:tt )* }
    ) => {
        $crate::impl_lookup_record!(@define $type, $type_name, "id", { $( $body )* });
    };

    (
        @define $type:ident,
        $type_name:expr,
        $id_field:expr,
        {
            $(
                $field:ident : $field_type:ty
                $( => { $( $attr:ident : $attr_value:expr ),* $(,)? } )?
            ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            $( pub $field : $field_type ),*
        }

        impl $crate::core::record::LookupRecord for $type {
            fn type_name() -> &'static str {
                $type_name
            }

            fn fields() -> &'static [$crate::core::field::FieldDef] {
                use std::sync::OnceLock;
                static FIELDS: OnceLock<Vec<$crate::core::field::FieldDef>> = OnceLock::new();
                FIELDS.get_or_init(|| {
                    vec![
                        $(
                            {
                                #[allow(unused_mut)]
                                let mut def = $crate::core::field::FieldDef::new(
                                    stringify!($field),
                                    <$field_type as $crate::core::field::IntoFieldValue>::KIND,
                                );
                                $(
                                    def = def.with_column(
                                        $crate::core::field::ColumnAttr::new()
                                            $( .$attr($attr_value) )*
                                    );
                                )?
                                def
                            }
                        ),*
                    ]
                })
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    $(
                        stringify!($field) => Some(
                            $crate::core::field::IntoFieldValue::to_field_value(&self.$field)
                        ),
                    )*
                    _ => None,
                }
            }

            fn id_field() -> &'static str {
                $id_field
            }
        }

        impl $type {
            /// Create a new record from its field values, in declaration order
            #[allow(clippy::too_many_arguments)]
            pub fn new($( $field: $field_type ),*) -> Self {
                Self { $( $field ),* }
            }
        }
    };
}
