//! Serving side of the crate
//!
//! This module provides a `LookupRegistry` that lets a transport layer
//! dispatch requests to any registered lookup by name.

pub mod lookup_registry;

pub use lookup_registry::{BoundLookup, LookupRegistry, LookupService};
