//! Resolved schema nodes.
//!
//! A node is classified into a closed [`SchemaShape`] once, when the resolver
//! first sees it. Downstream rules match on the shape instead of probing keywords.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::json_pointer;

/// Index of a node in the run's schema store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(pub(crate) usize);

/// Document URI plus JSON pointer; the identity key of a schema node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalUri {
    pub document: String,
    pub pointer: String,
}

impl CanonicalUri {
    #[must_use]
    pub fn document_root(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            pointer: String::new(),
        }
    }

    /// The URI of a location below this one.
    #[must_use]
    pub fn join(&self, segments: &[&str]) -> Self {
        let mut pointer: String = self.pointer.clone();
        for segment in segments {
            json_pointer::push_segment(&mut pointer, segment);
        }
        Self {
            document: self.document.clone(),
            pointer,
        }
    }

    /// Last pointer segment and the segment before it, unescaped.
    #[must_use]
    pub fn tail(&self) -> (Option<String>, Option<String>) {
        let mut segments: Vec<String> = json_pointer::segments(&self.pointer).unwrap_or_default();
        let last: Option<String> = segments.pop();
        (segments.pop(), last)
    }

    /// File stem of the document, without `.json` and `.schema` suffixes.
    #[must_use]
    pub fn document_stem(&self) -> String {
        let file: &str = self
            .document
            .rsplit('/')
            .next()
            .unwrap_or(self.document.as_str());
        let file: &str = file.strip_suffix(".json").unwrap_or(file);
        file.strip_suffix(".schema").unwrap_or(file).to_string()
    }
}

impl fmt::Display for CanonicalUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pointer.is_empty() {
            write!(f, "{}", self.document)
        } else {
            write!(f, "{}#{}", self.document, self.pointer)
        }
    }
}

/// Either a single type name or a list of them (`"type": ["string", "null"]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeKeyword {
    Single(String),
    Union(Vec<String>),
}

impl TypeKeyword {
    /// The effective type: `null` members are ignored; several remaining types mean none.
    #[must_use]
    pub fn effective(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name.as_str()),
            Self::Union(names) => {
                let mut non_null = names.iter().filter(|n| n.as_str() != "null");
                match (non_null.next(), non_null.next()) {
                    (Some(only), None) => Some(only.as_str()),
                    _ => None,
                }
            }
        }
    }
}

/// Object-level list of required keys (draft 4+) or property-level flag (draft 3).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequiredKeyword {
    Keys(Vec<String>),
    Flag(bool),
}

/// Draft 4 boolean or draft 6 numeric `exclusiveMinimum`/`exclusiveMaximum`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(serde_json::Number),
}

/// The keywords the generator understands. Unknown keys are ignored.
///
/// Subschemas stay raw; the resolver turns them into nodes on demand.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keywords {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<TypeKeyword>,
    pub format: Option<String>,
    /// `Some(Value::Null)` for an explicit `"default": null`.
    #[serde(default, deserialize_with = "present")]
    pub default: Option<Value>,
    pub properties: Option<IndexMap<String, Value>>,
    pub required: Option<RequiredKeyword>,
    pub additional_properties: Option<Value>,
    pub items: Option<Value>,
    pub unique_items: Option<bool>,
    #[serde(rename = "enum")]
    pub enum_: Option<Vec<Value>>,
    pub all_of: Option<Vec<Value>>,
    pub one_of: Option<Vec<Value>>,
    pub any_of: Option<Vec<Value>>,
    pub minimum: Option<serde_json::Number>,
    pub maximum: Option<serde_json::Number>,
    pub exclusive_minimum: Option<ExclusiveBound>,
    pub exclusive_maximum: Option<ExclusiveBound>,
    #[serde(default, deserialize_with = "size")]
    pub min_items: Option<u64>,
    #[serde(default, deserialize_with = "size")]
    pub max_items: Option<u64>,
    #[serde(default, deserialize_with = "size")]
    pub min_length: Option<u64>,
    #[serde(default, deserialize_with = "size")]
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    pub extends: Option<Value>,
    pub java_type: Option<String>,
    pub existing_java_type: Option<String>,
    pub java_name: Option<String>,
    pub java_enum_names: Option<Vec<String>>,
    pub discriminator: Option<Value>,
    pub deserialization_class_property: Option<Value>,
}

/// Keeps an explicit `null`, which plain `Option` would fold into absence.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A non-negative count; integral floats such as `3.0` are accepted.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(count) = number.as_u64() {
        return Ok(Some(count));
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && (0.0..=9_007_199_254_740_992.0).contains(&value) => {
            Ok(Some(value as u64))
        }
        _ => Err(D::Error::custom(format!("expected a non-negative integer, found {number}"))),
    }
}

impl Keywords {
    /// Keys listed in the object-level `required` array.
    #[must_use]
    pub fn required_keys(&self) -> &[String] {
        match &self.required {
            Some(RequiredKeyword::Keys(keys)) => keys,
            _ => &[],
        }
    }

    /// Draft 3 property-level `"required": true`.
    #[must_use]
    pub const fn required_flag(&self) -> bool {
        matches!(self.required, Some(RequiredKeyword::Flag(true)))
    }

    /// Discriminator metadata, under either keyword.
    #[must_use]
    pub fn discriminator_metadata(&self) -> Option<&Value> {
        self.discriminator
            .as_ref()
            .or(self.deserialization_class_property.as_ref())
    }

    /// Whether the node declares object members of its own.
    #[must_use]
    pub fn has_object_keywords(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// Scalar JSON Schema types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

/// The generation-relevant shape of a node, fixed at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaShape {
    /// `allOf` present: members are merged into one type.
    AllOf,
    /// `oneOf` or `anyOf` present (and no `allOf`).
    Union,
    Enum,
    Object,
    Array,
    Primitive(Primitive),
    /// No constraining keyword: any JSON value.
    Any,
}

impl SchemaShape {
    /// Classifies keywords: combinators, then `enum`, then `type`, then inference.
    ///
    /// # Errors
    ///
    /// Returns a reason when `type` names something that is not a JSON Schema type.
    pub fn classify(keywords: &Keywords) -> std::result::Result<Self, String> {
        if keywords.all_of.is_some() {
            return Ok(Self::AllOf);
        }
        if keywords.one_of.is_some() || keywords.any_of.is_some() {
            return Ok(Self::Union);
        }
        if keywords.enum_.is_some() {
            return Ok(Self::Enum);
        }
        if let Some(type_) = &keywords.type_ {
            return match type_.effective() {
                Some("object") => Ok(Self::Object),
                Some("array") => Ok(Self::Array),
                Some("string") => Ok(Self::Primitive(Primitive::String)),
                Some("integer") => Ok(Self::Primitive(Primitive::Integer)),
                Some("number") => Ok(Self::Primitive(Primitive::Number)),
                Some("boolean") => Ok(Self::Primitive(Primitive::Boolean)),
                Some("null") => Ok(Self::Primitive(Primitive::Null)),
                Some("any") | None => Ok(Self::Any),
                Some(other) => Err(format!("unknown type `{other}`")),
            };
        }
        if keywords.properties.is_some()
            || keywords.additional_properties.is_some()
            || keywords.extends.is_some()
        {
            return Ok(Self::Object);
        }
        if keywords.items.is_some() {
            return Ok(Self::Array);
        }
        Ok(Self::Any)
    }
}

/// A resolved schema fragment. Exactly one exists per canonical URI in a run.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub id: SchemaId,
    pub uri: CanonicalUri,
    /// Lexical parent, for naming context only.
    pub parent: Option<SchemaId>,
    pub content: Value,
    pub keywords: Keywords,
    pub shape: SchemaShape,
}
