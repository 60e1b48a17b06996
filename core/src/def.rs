//! Serializable schema definitions.
//!
//! [`ContextDef`] is the plain-data mirror of the builder's input: a schema
//! declared in a JSON or YAML file deserializes into it and is turned into
//! a live [`Context`] with [`ContextDef::build`], which performs the same
//! invariant checks as the builder. Definition-built components carry
//! [`Capability::opaque`], since no Rust marker type exists for them.
//!
//! # Example
//!
//! ```
//! use id_context_core::ContextDef;
//!
//! let def: ContextDef = serde_json::from_str(
//!     r#"{
//!         "name": "page",
//!         "separator": { "literal": "/" },
//!         "components": [
//!             { "name": "site", "pattern": "\\w+" },
//!             { "name": "page", "cardinality": "optional", "pattern": "\\w+" }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let context = def.build().unwrap();
//! assert!(context.validate(&["classic", "home"]).is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::Context;
use crate::error::SchemaError;
use crate::types::{Capability, Cardinality};

/// Serializable description of a whole identifier schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDef {
    /// Diagnostic name of the schema.
    pub name: String,
    /// The default separator, when the schema declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<SeparatorDef>,
    /// Require a leading separator occurrence on raw identifiers.
    #[serde(default)]
    pub require_separator_first: bool,
    /// Treat optionals after the first missing one as intentionally absent.
    #[serde(default)]
    pub ignore_remaining_after_first_missing_optional: bool,
    /// Ordered component declarations.
    pub components: Vec<ComponentDef>,
}

/// Separator declaration: literal text or a regular-expression pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorDef {
    /// Literal delimiter text, escaped before compilation.
    Literal(String),
    /// Delimiter pattern, compiled as written.
    Pattern(String),
}

/// Serializable description of one component position.
///
/// # Examples
///
/// ```
/// use id_context_core::{Cardinality, ComponentDef};
///
/// let node = ComponentDef::new("node", Cardinality::RequiredUnboundedHierarchical, r"\w+");
/// assert_eq!(node.cardinality, Cardinality::RequiredUnboundedHierarchical);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDef {
    /// Component name, unique within the schema.
    pub name: String,
    /// How many tokens the position consumes (required when omitted).
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Validation pattern source.
    pub pattern: String,
    /// Free-form description for documentation output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComponentDef {
    /// Creates a component definition with the given cardinality.
    pub fn new(name: &str, cardinality: Cardinality, pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            cardinality,
            pattern: pattern.to_string(),
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl ContextDef {
    /// Builds an immutable [`Context`] from this definition.
    ///
    /// Drives a [`ContextBuilder`](crate::ContextBuilder) and surfaces the
    /// same [`SchemaError`]s a hand-written declaration would.
    pub fn build(&self) -> Result<Context, SchemaError> {
        let mut builder = Context::builder().named(&self.name);

        builder = match &self.separator {
            Some(SeparatorDef::Literal(text)) => builder.with_default_separator(text),
            Some(SeparatorDef::Pattern(source)) => builder.with_default_separator_pattern(source),
            None => builder,
        };
        if self.require_separator_first {
            builder = builder.require_separator_in_first_position();
        }
        if self.ignore_remaining_after_first_missing_optional {
            builder = builder.ignore_remaining_after_first_missing_optional();
        }

        for component in &self.components {
            builder = match component.cardinality {
                Cardinality::Required => builder.required_component(
                    &component.name,
                    Capability::opaque(),
                    &component.pattern,
                ),
                Cardinality::Optional => builder.optional_component(
                    &component.name,
                    Capability::opaque(),
                    &component.pattern,
                ),
                Cardinality::RequiredUnboundedHierarchical => builder
                    .required_unbounded_hierarchical_component(
                        &component.name,
                        Capability::opaque(),
                        &component.pattern,
                    ),
            };
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContextError;

    fn navigation_def() -> ContextDef {
        ContextDef {
            name: "navigation".to_string(),
            separator: Some(SeparatorDef::Literal("/".to_string())),
            require_separator_first: true,
            ignore_remaining_after_first_missing_optional: false,
            components: vec![
                ComponentDef::new("site", Cardinality::Required, r"\w+")
                    .with_description("Owning site"),
                ComponentDef::new("node", Cardinality::RequiredUnboundedHierarchical, r"\w+"),
            ],
        }
    }

    #[test]
    fn test_json_round_trip_preserves_definition() {
        let def = navigation_def();
        let json = serde_json::to_string_pretty(&def).unwrap();
        let back: ContextDef = serde_json::from_str(&json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_yaml_round_trip_preserves_definition() {
        let def = navigation_def();
        let yaml = serde_yaml::to_string(&def).unwrap();
        let back: ContextDef = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_built_definition_behaves_like_builder_schema() {
        let context = navigation_def().build().unwrap();
        assert!(context.is_component_unbounded_hierarchical("node"));
        assert_eq!(
            context.extract_components("/classic/home/news").unwrap(),
            vec!["classic", "home", "news"]
        );
        assert!(matches!(
            context.extract_components("classic/home").unwrap_err(),
            ContextError::MissingLeadingSeparator { .. }
        ));
    }

    #[test]
    fn test_build_surfaces_schema_errors() {
        let mut def = navigation_def();
        def.components.push(ComponentDef::new("site", Cardinality::Optional, ".*"));
        let err = def.build().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateComponent(name) if name == "site"));
    }

    #[test]
    fn test_missing_cardinality_defaults_to_required() {
        let def: ContextDef = serde_json::from_str(
            r#"{ "name": "single", "components": [{ "name": "only", "pattern": ".*" }] }"#,
        )
        .unwrap();
        let context = def.build().unwrap();
        assert!(context.is_component_required("only"));
    }
}
