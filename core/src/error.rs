//! Error types for schema construction and identifier processing.
//!
//! Errors come in two tiers. [`SchemaError`] is raised by
//! [`ContextBuilder::build`](crate::ContextBuilder::build) when a schema
//! declaration is self-contradictory; there is no partial context, the
//! declaration must be fixed and construction retried. [`ContextError`] is
//! raised by the operations of a built [`Context`](crate::Context); it is
//! recoverable per call and never invalidates the context, which can be
//! reused immediately with different input.

use thiserror::Error;

/// Schema-construction errors.
///
/// Each variant describes a contradiction in the declared schema, detected
/// by [`ContextBuilder::build`](crate::ContextBuilder::build).
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema declares no components at all.
    #[error("context '{0}' declares no components")]
    EmptyContext(String),
    /// Several components were declared but no separator to split them apart.
    #[error("context '{context}' declares {components} components but no separator")]
    MissingSeparator {
        /// Diagnostic name of the context being built.
        context: String,
        /// How many components were declared.
        components: usize,
    },
    /// A component was declared with an empty name.
    #[error("component at position {0} has an empty name")]
    EmptyComponentName(usize),
    /// Two components share the same name.
    #[error("duplicate component '{0}'")]
    DuplicateComponent(String),
    /// More than one unbounded hierarchical component was declared.
    #[error(
        "context '{context}' declares more than one unbounded hierarchical component \
         ('{first}' and '{second}')"
    )]
    MultipleHierarchical {
        /// Diagnostic name of the context being built.
        context: String,
        /// The first unbounded hierarchical component declared.
        first: String,
        /// The conflicting later declaration.
        second: String,
    },
    /// A component's validation pattern failed to compile.
    #[error("invalid pattern for component '{component}': {source}")]
    InvalidPattern {
        /// The component whose pattern is broken.
        component: String,
        /// The underlying compilation failure.
        source: regex::Error,
    },
    /// The separator pattern failed to compile.
    #[error("invalid separator pattern: {0}")]
    InvalidSeparatorPattern(#[from] regex::Error),
}

/// Runtime errors raised by validation, extraction, and introspection.
///
/// The `Display` impl identifies the offending component or token so a
/// caller can report exactly which position of an identifier is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A required component had no token left to consume.
    #[error("missing required component '{0}'")]
    MissingRequired(String),
    /// A token was present but did not satisfy its component's pattern.
    #[error("token '{token}' does not match pattern '{pattern}' of component '{component}'")]
    NonMatchingToken {
        /// The component whose position the token occupied.
        component: String,
        /// The pattern the token was checked against, as declared.
        pattern: String,
        /// The offending token.
        token: String,
    },
    /// An unbounded hierarchical component could not consume even one token.
    #[error("hierarchical component '{0}' requires at least one matching token")]
    UnsatisfiedHierarchical(String),
    /// Tokens remained after every component was processed.
    #[error("unrecognized trailing tokens: {}", .0.join(", "))]
    TrailingTokens(Vec<String>),
    /// An introspection query named a component the schema does not declare.
    #[error("unknown component '{0}'")]
    UnknownComponent(String),
    /// The raw identifier did not begin with the required separator.
    #[error("identifier '{identifier}' must start with separator '{separator}'")]
    MissingLeadingSeparator {
        /// The raw identifier that was being split.
        identifier: String,
        /// The separator, as declared.
        separator: String,
    },
    /// Formatting was requested but the separator has no literal form.
    #[error("separator pattern '{0}' has no literal text to join tokens with")]
    UnrenderableSeparator(String),
}
