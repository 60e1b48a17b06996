//! Schema-driven parsing and validation of composite hierarchical
//! identifiers.
//!
//! A composite identifier is a string of separator-delimited parts, each
//! occupying a named, pattern-constrained position. This crate provides the
//! types to describe such identifiers once and reuse the description:
//!
//! - [`ContextBuilder`] — fluent, mutable accumulator of component and
//!   separator declarations; consumed by `build()`.
//! - [`Context`] — the immutable schema: ordered [`ComponentSpec`]s plus
//!   separator rules, with `validate`, `extract_components`,
//!   `format_components`, and introspection. Safe to share across threads.
//! - [`ComponentSpec`] — one position: name, [`Capability`],
//!   [`Cardinality`], validation pattern.
//! - [`ContextDef`] — serde-facing mirror of the builder input, for schemas
//!   declared in JSON or YAML files.
//!
//! Schema contradictions fail construction with [`SchemaError`]; runtime
//! mismatches fail the individual call with [`ContextError`] and leave the
//! context reusable.
//!
//! # Example
//!
//! ```
//! use id_context_core::{Capability, Context, Identifiable};
//!
//! struct Portal;
//! impl Identifiable for Portal {}
//!
//! let context = Context::builder()
//!     .named("portlet")
//!     .with_default_separator("=")
//!     .required_component("container", Capability::of::<Portal>(), "container")
//!     .required_component("portal", Capability::of::<Portal>(), "portal")
//!     .optional_component("invoker", Capability::of::<Portal>(), ".*")
//!     .ignore_remaining_after_first_missing_optional()
//!     .build()
//!     .unwrap();
//!
//! let tokens = context.extract_components("container=portal=local").unwrap();
//! assert_eq!(tokens, vec!["container", "portal", "local"]);
//! assert!(context.validate(&tokens).is_ok());
//! ```

mod builder;
mod context;
mod def;
mod error;
mod types;

pub use builder::ContextBuilder;
pub use context::Context;
pub use def::{ComponentDef, ContextDef, SeparatorDef};
pub use error::{ContextError, SchemaError};
pub use types::{Capability, Cardinality, ComponentSpec, Identifiable, Separator};
