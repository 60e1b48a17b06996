//! Fluent schema builder.
//!
//! A [`ContextBuilder`] accumulates component declarations and separator
//! settings, then [`build`](ContextBuilder::build) checks the schema's
//! invariants and freezes the result into an immutable
//! [`Context`](crate::Context). Contradictions are reported at build time,
//! never mid-chain, so declarations stay fluent.

use std::collections::HashSet;

use crate::Context;
use crate::error::SchemaError;
use crate::types::{Capability, Cardinality, ComponentSpec, Separator, SeparatorPolicy};

/// Mutable accumulator for [`Context`] schemas.
///
/// Every method takes and returns the builder by value; `build` consumes it.
/// A builder is single-owner state intended for one schema declaration —
/// share the built [`Context`] instead, which is immutable and reusable.
///
/// # Examples
///
/// ```
/// use id_context_core::{Capability, Context};
///
/// let context = Context::builder()
///     .named("site")
///     .with_default_separator("/")
///     .required_component("site", Capability::opaque(), r"\w+")
///     .optional_component("page", Capability::opaque(), r"\w+")
///     .build()
///     .unwrap();
///
/// assert_eq!(context.get_index_for("page").unwrap(), 1);
/// assert!(context.validate(&["classic", "home"]).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ContextBuilder {
    name: Option<String>,
    separator: Option<SeparatorSpec>,
    require_separator_first: bool,
    ignore_remaining_after_first_missing_optional: bool,
    components: Vec<PendingComponent>,
}

#[derive(Debug)]
enum SeparatorSpec {
    Literal(String),
    Pattern(String),
}

#[derive(Debug)]
struct PendingComponent {
    name: String,
    capability: Capability,
    cardinality: Cardinality,
    pattern: String,
}

impl ContextBuilder {
    /// Creates an empty builder.
    ///
    /// [`Context::builder`] is the usual entry point.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diagnostic name of the context. Not validated.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Declares the default separator as literal text.
    ///
    /// The text is escaped before compilation, so metacharacters such as `.`
    /// delimit literally. The last separator declaration wins, whether
    /// literal or pattern.
    pub fn with_default_separator(mut self, separator: &str) -> Self {
        self.separator = Some(SeparatorSpec::Literal(separator.to_string()));
        self
    }

    /// Declares the default separator as a regular-expression pattern.
    ///
    /// The pattern is compiled as written when the schema is built; an
    /// uncompilable pattern fails `build`. The last separator declaration
    /// wins, whether literal or pattern.
    pub fn with_default_separator_pattern(mut self, pattern: &str) -> Self {
        self.separator = Some(SeparatorSpec::Pattern(pattern.to_string()));
        self
    }

    /// Appends a required component at the next position.
    ///
    /// A name collision with an earlier component is reported by `build`,
    /// not here.
    pub fn required_component(self, name: &str, capability: Capability, pattern: &str) -> Self {
        self.component(name, capability, Cardinality::Required, pattern)
    }

    /// Appends an optional component at the next position.
    pub fn optional_component(self, name: &str, capability: Capability, pattern: &str) -> Self {
        self.component(name, capability, Cardinality::Optional, pattern)
    }

    /// Appends an unbounded hierarchical component at the next position.
    ///
    /// The component consumes one or more consecutive tokens matching its
    /// pattern. At most one may appear in a schema; placement is positional
    /// like any other component, and components declared after it match the
    /// tokens remaining once the repeatable block has consumed its share.
    pub fn required_unbounded_hierarchical_component(
        self,
        name: &str,
        capability: Capability,
        pattern: &str,
    ) -> Self {
        self.component(
            name,
            capability,
            Cardinality::RequiredUnboundedHierarchical,
            pattern,
        )
    }

    /// Treats every optional component after the first missing one as
    /// intentionally absent instead of failing validation.
    pub fn ignore_remaining_after_first_missing_optional(mut self) -> Self {
        self.ignore_remaining_after_first_missing_optional = true;
        self
    }

    /// Requires raw identifiers to begin with an occurrence of the
    /// separator, which is stripped before splitting.
    ///
    /// Only meaningful combined with a separator declaration.
    pub fn require_separator_in_first_position(mut self) -> Self {
        self.require_separator_first = true;
        self
    }

    fn component(
        mut self,
        name: &str,
        capability: Capability,
        cardinality: Cardinality,
        pattern: &str,
    ) -> Self {
        self.components.push(PendingComponent {
            name: name.to_string(),
            capability,
            cardinality,
            pattern: pattern.to_string(),
        });
        self
    }

    /// Checks the schema's invariants and produces an immutable [`Context`].
    ///
    /// Fails when the schema declares no components, declares several
    /// components without a separator, repeats a component name, declares an
    /// empty component name, declares more than one unbounded hierarchical
    /// component, or carries an uncompilable pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::{Capability, Context, SchemaError};
    ///
    /// // Two components without a separator cannot be split apart.
    /// let err = Context::builder()
    ///     .named("broken")
    ///     .required_component("a", Capability::opaque(), ".*")
    ///     .required_component("b", Capability::opaque(), ".*")
    ///     .build()
    ///     .unwrap_err();
    /// assert!(matches!(err, SchemaError::MissingSeparator { .. }));
    /// ```
    pub fn build(self) -> Result<Context, SchemaError> {
        let name = self.name.unwrap_or_else(|| "<unnamed>".to_string());

        if self.components.is_empty() {
            return Err(SchemaError::EmptyContext(name));
        }
        if self.components.len() > 1 && self.separator.is_none() {
            return Err(SchemaError::MissingSeparator {
                context: name,
                components: self.components.len(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut hierarchical: Option<&str> = None;
        for (position, pending) in self.components.iter().enumerate() {
            if pending.name.is_empty() {
                return Err(SchemaError::EmptyComponentName(position));
            }
            if !seen.insert(&pending.name) {
                return Err(SchemaError::DuplicateComponent(pending.name.clone()));
            }
            if pending.cardinality.is_unbounded_hierarchical() {
                if let Some(first) = hierarchical {
                    return Err(SchemaError::MultipleHierarchical {
                        context: name,
                        first: first.to_string(),
                        second: pending.name.clone(),
                    });
                }
                hierarchical = Some(&pending.name);
            }
        }

        let separator = match &self.separator {
            None => None,
            Some(SeparatorSpec::Literal(text)) => Some(Separator::literal(text)),
            Some(SeparatorSpec::Pattern(source)) => Some(Separator::pattern(source)?),
        };

        let mut components = Vec::with_capacity(self.components.len());
        for pending in self.components {
            match ComponentSpec::new(
                pending.name.clone(),
                pending.capability,
                pending.cardinality,
                &pending.pattern,
            ) {
                Ok(spec) => components.push(spec),
                Err(source) => {
                    return Err(SchemaError::InvalidPattern {
                        component: pending.name,
                        source,
                    });
                }
            }
        }

        Ok(Context::from_parts(
            name,
            components,
            SeparatorPolicy {
                separator,
                require_first: self.require_separator_first,
            },
            self.ignore_remaining_after_first_missing_optional,
        ))
    }
}
