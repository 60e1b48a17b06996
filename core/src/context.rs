//! Immutable identifier schemas and the matching engine.

use tracing::debug;

use crate::builder::ContextBuilder;
use crate::error::ContextError;
use crate::types::{Cardinality, ComponentSpec, Separator, SeparatorPolicy};

/// An immutable identifier schema.
///
/// A context is the frozen result of a [`ContextBuilder`]: an ordered list
/// of [`ComponentSpec`]s plus the separator policy and matching-leniency
/// flag. It carries no mutable state, so one built context can be shared
/// across any number of concurrent callers and reused indefinitely; every
/// operation is a pure computation over its input.
///
/// [`validate`](Context::validate) checks an already-split token sequence
/// against the schema, and [`extract_components`](Context::extract_components)
/// splits a raw identifier string into tokens. The two compose: extraction
/// does not validate, so callers that need both shape and content confirmed
/// run `extract_components` and then `validate` on the result.
///
/// # Examples
///
/// ```
/// use id_context_core::{Capability, Context};
///
/// let context = Context::builder()
///     .named("navigation")
///     .with_default_separator("/")
///     .required_component("site", Capability::opaque(), r"\w+")
///     .required_unbounded_hierarchical_component("node", Capability::opaque(), r"\w+")
///     .build()
///     .unwrap();
///
/// let tokens = context.extract_components("classic/home/news").unwrap();
/// assert_eq!(tokens, vec!["classic", "home", "news"]);
/// assert!(context.validate(&tokens).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Context {
    name: String,
    components: Vec<ComponentSpec>,
    policy: SeparatorPolicy,
    ignore_remaining_after_first_missing_optional: bool,
}

impl Context {
    /// Returns a builder for declaring a new schema.
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn from_parts(
        name: String,
        components: Vec<ComponentSpec>,
        policy: SeparatorPolicy,
        ignore_remaining_after_first_missing_optional: bool,
    ) -> Self {
        Self {
            name,
            components,
            policy,
            ignore_remaining_after_first_missing_optional,
        }
    }

    /// Returns the diagnostic name (`"<unnamed>"` when never set).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordered component specifications.
    pub fn components(&self) -> &[ComponentSpec] {
        &self.components
    }

    /// Returns the separator, if one was declared.
    pub fn separator(&self) -> Option<&Separator> {
        self.policy.separator.as_ref()
    }

    /// Returns the zero-based position of the named component.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::{Capability, Context, ContextError};
    ///
    /// let context = Context::builder()
    ///     .required_component("component", Capability::opaque(), ".*")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(context.get_index_for("component").unwrap(), 0);
    /// assert_eq!(
    ///     context.get_index_for("missing").unwrap_err(),
    ///     ContextError::UnknownComponent("missing".to_string()),
    /// );
    /// ```
    pub fn get_index_for(&self, name: &str) -> Result<usize, ContextError> {
        self.components
            .iter()
            .position(|component| component.name() == name)
            .ok_or_else(|| ContextError::UnknownComponent(name.to_string()))
    }

    /// Returns `true` when the named component must consume at least one
    /// token. Unknown names are not required.
    pub fn is_component_required(&self, name: &str) -> bool {
        self.component(name)
            .is_some_and(|component| component.cardinality().is_required())
    }

    /// Returns `true` when the named component is the unbounded hierarchical
    /// one.
    pub fn is_component_unbounded_hierarchical(&self, name: &str) -> bool {
        self.component(name)
            .is_some_and(|component| component.cardinality().is_unbounded_hierarchical())
    }

    fn component(&self, name: &str) -> Option<&ComponentSpec> {
        self.components
            .iter()
            .find(|component| component.name() == name)
    }

    /// Checks an ordered token sequence against the schema.
    ///
    /// Walks the component list in order, consuming tokens:
    ///
    /// - a required component consumes the next token, which must exist and
    ///   match its pattern;
    /// - the unbounded hierarchical component consumes at least one matching
    ///   token, then as many further consecutive matches as it can while
    ///   leaving enough tokens for the required components that follow it;
    /// - an optional component consumes the next token only when it matches;
    ///   a present-but-non-matching token fails validation unless the
    ///   leniency flag treats this and every later optional as absent.
    ///
    /// Tokens left over once every component is processed fail validation
    /// regardless of the leniency flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::{Capability, Context};
    ///
    /// let context = Context::builder()
    ///     .with_default_separator("=")
    ///     .required_component("container", Capability::opaque(), "container")
    ///     .required_component("portal", Capability::opaque(), "portal")
    ///     .optional_component("invoker", Capability::opaque(), ".*")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(context.validate(&["container", "portal"]).is_ok());
    /// assert!(context.validate(&["container", "portal", "foo"]).is_ok());
    /// assert!(context.validate(&["container"]).is_err());
    /// ```
    pub fn validate<S: AsRef<str>>(&self, tokens: &[S]) -> Result<(), ContextError> {
        debug!(
            context = %self.name,
            tokens = tokens.len(),
            "Validating token sequence"
        );

        let mut position = 0;
        let mut optionals_absent = false;

        for (index, component) in self.components.iter().enumerate() {
            match component.cardinality() {
                Cardinality::Required => {
                    let Some(token) = tokens.get(position) else {
                        return Err(ContextError::MissingRequired(component.name().to_string()));
                    };
                    let token = token.as_ref();
                    if !component.matches(token) {
                        return Err(self.non_matching(component, token));
                    }
                    position += 1;
                }
                Cardinality::RequiredUnboundedHierarchical => {
                    // Cap greedy consumption so the components after this one
                    // keep the tokens they still need.
                    let reserved = self.reserved_after(index);
                    let available = tokens.len() - position;
                    if available <= reserved {
                        return Err(ContextError::UnsatisfiedHierarchical(
                            component.name().to_string(),
                        ));
                    }
                    let cap = available - reserved;
                    let mut consumed = 0;
                    while consumed < cap && component.matches(tokens[position + consumed].as_ref())
                    {
                        consumed += 1;
                    }
                    if consumed == 0 {
                        return Err(self.non_matching(component, tokens[position].as_ref()));
                    }
                    position += consumed;
                }
                Cardinality::Optional => {
                    if optionals_absent {
                        continue;
                    }
                    let Some(token) = tokens.get(position) else {
                        // Absent token: this and later optionals are unset.
                        continue;
                    };
                    let token = token.as_ref();
                    if component.matches(token) {
                        position += 1;
                    } else if self.ignore_remaining_after_first_missing_optional {
                        optionals_absent = true;
                    } else {
                        return Err(self.non_matching(component, token));
                    }
                }
            }
        }

        if position < tokens.len() {
            return Err(ContextError::TrailingTokens(
                tokens[position..]
                    .iter()
                    .map(|token| token.as_ref().to_string())
                    .collect(),
            ));
        }

        Ok(())
    }

    /// Splits a raw identifier string into its ordered tokens.
    ///
    /// The separator policy governs the split: with
    /// `require_separator_in_first_position` set the input must begin with
    /// an occurrence of the separator, which is stripped first. Empty
    /// fragments produced by the split are discarded. Extraction does not
    /// validate the resulting tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::{Capability, Context};
    ///
    /// let context = Context::builder()
    ///     .with_default_separator(".")
    ///     .required_component("foo", Capability::opaque(), ".*")
    ///     .required_component("baz", Capability::opaque(), ".*")
    ///     .required_component("bar", Capability::opaque(), ".*")
    ///     .build()
    ///     .unwrap();
    ///
    /// let tokens = context.extract_components("foo.baz.bar").unwrap();
    /// assert_eq!(tokens, vec!["foo", "baz", "bar"]);
    /// ```
    pub fn extract_components<'r>(&self, raw: &'r str) -> Result<Vec<&'r str>, ContextError> {
        debug!(context = %self.name, identifier = raw, "Extracting components");
        self.policy.split(raw)
    }

    /// Joins an ordered token sequence back into a raw identifier string.
    ///
    /// The inverse of [`extract_components`](Context::extract_components):
    /// tokens are joined with the literal separator text, prefixed with one
    /// occurrence when a leading separator is required. A pattern separator
    /// has no canonical text and fails with
    /// [`ContextError::UnrenderableSeparator`]. Formatting does not
    /// validate; compose with [`validate`](Context::validate) as with
    /// extraction.
    ///
    /// # Examples
    ///
    /// ```
    /// use id_context_core::{Capability, Context};
    ///
    /// let context = Context::builder()
    ///     .with_default_separator("/")
    ///     .require_separator_in_first_position()
    ///     .required_component("site", Capability::opaque(), r"\w+")
    ///     .required_component("page", Capability::opaque(), r"\w+")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(context.format_components(&["classic", "home"]).unwrap(), "/classic/home");
    /// ```
    pub fn format_components<S: AsRef<str>>(&self, tokens: &[S]) -> Result<String, ContextError> {
        self.policy.join(tokens)
    }

    /// Minimum number of tokens the components after `index` still need.
    fn reserved_after(&self, index: usize) -> usize {
        self.components[index + 1..]
            .iter()
            .filter(|component| component.cardinality().is_required())
            .count()
    }

    fn non_matching(&self, component: &ComponentSpec, token: &str) -> ContextError {
        ContextError::NonMatchingToken {
            component: component.name().to_string(),
            pattern: component.pattern().to_string(),
            token: token.to_string(),
        }
    }
}
