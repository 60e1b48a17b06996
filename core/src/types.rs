//! Value types for identifier schemas.
//!
//! This module defines the building blocks a [`Context`](crate::Context) is
//! assembled from: the [`Identifiable`] capability marker, component
//! cardinalities, the immutable [`ComponentSpec`] describing one position of
//! a composite identifier, and the [`Separator`] used to split raw
//! identifiers into tokens.

use std::any::type_name;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// Marker trait for types that denote "a thing with an identity".
///
/// Components declare what kind of entity occupies their position through a
/// [`Capability`] obtained from an `Identifiable` marker type. The matching
/// engine never inspects the capability at runtime; the trait bound exists
/// so schema declarations are checked against caller types at the API
/// boundary.
///
/// # Examples
///
/// ```
/// use id_context_core::{Capability, Identifiable};
///
/// struct Site;
/// impl Identifiable for Site {}
///
/// let capability = Capability::of::<Site>();
/// assert!(capability.type_name().ends_with("Site"));
/// ```
pub trait Identifiable {}

/// What kind of identifiable entity a component position denotes.
///
/// Carried on every [`ComponentSpec`] for introspection and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capability {
    type_name: &'static str,
}

impl Capability {
    /// Creates a capability from an [`Identifiable`] marker type.
    pub fn of<T: Identifiable + 'static>() -> Self {
        Self {
            type_name: type_name::<T>(),
        }
    }

    /// Creates a capability with no backing Rust type.
    ///
    /// Used for schemas built from definition files, where component
    /// capabilities are not expressible as marker types.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::Capability;
    ///
    /// assert_eq!(Capability::opaque().type_name(), "<opaque>");
    /// ```
    pub fn opaque() -> Self {
        Self {
            type_name: "<opaque>",
        }
    }

    /// Returns the name of the marker type this capability was created from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// How many tokens a component position consumes.
///
/// # Examples
///
/// ```
/// use id_context_core::Cardinality;
///
/// assert!(Cardinality::Required.is_required());
/// assert!(!Cardinality::Optional.is_required());
/// assert!(Cardinality::RequiredUnboundedHierarchical.is_unbounded_hierarchical());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// Exactly one token, which must be present (the default).
    #[default]
    Required,
    /// Zero or one token.
    Optional,
    /// One or more consecutive tokens, all matching the same pattern.
    RequiredUnboundedHierarchical,
}

impl Cardinality {
    /// Returns `true` when at least one token must be consumed.
    pub fn is_required(self) -> bool {
        matches!(
            self,
            Cardinality::Required | Cardinality::RequiredUnboundedHierarchical
        )
    }

    /// Returns `true` for the unbounded hierarchical cardinality only.
    pub fn is_unbounded_hierarchical(self) -> bool {
        matches!(self, Cardinality::RequiredUnboundedHierarchical)
    }
}

/// Immutable description of one position within an identifier schema.
///
/// A component has a unique name, a [`Capability`] declaring what kind of
/// entity it denotes, a [`Cardinality`], and a validation pattern. A token
/// belongs to the position only when the pattern matches it over its whole
/// length.
#[derive(Debug, Clone)]
pub struct ComponentSpec {
    name: String,
    capability: Capability,
    cardinality: Cardinality,
    pattern: String,
    matcher: Regex,
}

impl ComponentSpec {
    /// Compiles a component from its declared pattern source.
    ///
    /// The matcher is anchored so the pattern must cover the whole token;
    /// `bar` matches the token `bar` but not `rebard`.
    pub(crate) fn new(
        name: String,
        capability: Capability,
        cardinality: Cardinality,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        let matcher = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            name,
            capability,
            cardinality,
            pattern: pattern.to_string(),
            matcher,
        })
    }

    /// Returns the component's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capability this component was declared with.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Returns the component's cardinality.
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns the validation pattern as declared, without anchoring.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Checks whether a token satisfies this component's pattern.
    pub fn matches(&self, token: &str) -> bool {
        self.matcher.is_match(token)
    }
}

/// Compiled delimiter used to split raw identifiers into tokens.
///
/// A separator is declared either as literal text (escaped before
/// compilation) or as a regular-expression pattern (compiled as written).
/// After construction both forms behave identically: splitting anchors on
/// occurrences of the compiled pattern, so a pattern separator that matches
/// the same delimiter occurrences as a literal one splits identically.
#[derive(Debug, Clone)]
pub struct Separator {
    source: String,
    literal: bool,
    matcher: Regex,
}

impl Separator {
    pub(crate) fn literal(text: &str) -> Self {
        // Escaped text is always a valid pattern.
        let matcher = Regex::new(&regex::escape(text)).expect("escaped literal must compile");
        Self {
            source: text.to_string(),
            literal: true,
            matcher,
        }
    }

    pub(crate) fn pattern(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            literal: false,
            matcher: Regex::new(source)?,
        })
    }

    /// Returns the separator as declared: literal text or pattern source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns `true` when the separator was declared as literal text.
    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

/// How raw identifier strings are split into tokens.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeparatorPolicy {
    pub(crate) separator: Option<Separator>,
    pub(crate) require_first: bool,
}

impl SeparatorPolicy {
    /// Splits a raw identifier into its ordered tokens.
    ///
    /// With no separator declared the whole input is the single token (or no
    /// token at all when the input is empty). Empty fragments produced by
    /// the split are not meaningful tokens and are discarded.
    pub(crate) fn split<'r>(&self, raw: &'r str) -> Result<Vec<&'r str>, ContextError> {
        let Some(separator) = &self.separator else {
            return Ok(if raw.is_empty() { Vec::new() } else { vec![raw] });
        };

        let rest = if self.require_first {
            match separator.matcher.find(raw) {
                Some(leading) if leading.start() == 0 => &raw[leading.end()..],
                _ => {
                    return Err(ContextError::MissingLeadingSeparator {
                        identifier: raw.to_string(),
                        separator: separator.source.clone(),
                    });
                }
            }
        } else {
            raw
        };

        Ok(separator
            .matcher
            .split(rest)
            .filter(|token| !token.is_empty())
            .collect())
    }

    /// Joins ordered tokens back into a raw identifier.
    ///
    /// Only literal separators have a canonical text to join with; a pattern
    /// separator fails with [`ContextError::UnrenderableSeparator`]. When a
    /// leading separator is required, one occurrence is prepended.
    pub(crate) fn join<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, ContextError> {
        let Some(separator) = &self.separator else {
            return Ok(tokens
                .first()
                .map(|token| token.as_ref().to_string())
                .unwrap_or_default());
        };

        if !separator.literal {
            return Err(ContextError::UnrenderableSeparator(separator.source.clone()));
        }

        let mut raw = String::new();
        if self.require_first {
            raw.push_str(&separator.source);
        }
        for (index, token) in tokens.iter().enumerate() {
            if index > 0 {
                raw.push_str(&separator.source);
            }
            raw.push_str(token.as_ref());
        }
        Ok(raw)
    }
}
