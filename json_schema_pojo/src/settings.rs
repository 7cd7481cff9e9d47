//! Settings for JSON Schema to Java generation.

use serde::Deserialize;
use std::path::Path;

use crate::error::{GenerationError, Result};

/// Data-binding library whose annotation vocabulary is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStyle {
    /// `com.fasterxml.jackson.annotation`
    #[default]
    Jackson2,
    /// `com.google.gson.annotations`
    Gson,
    /// `com.squareup.moshi`
    Moshi,
    /// Plain types, no binding annotations.
    None,
}

impl AnnotationStyle {
    /// Whether the library can bind unknown JSON members into an extension map.
    #[must_use]
    pub const fn supports_additional_properties(self) -> bool {
        matches!(self, Self::Jackson2)
    }

    /// Whether the library reads polymorphic type metadata from annotations.
    #[must_use]
    pub const fn supports_type_info(self) -> bool {
        matches!(self, Self::Jackson2)
    }
}

/// How a discriminator tag identifies the concrete class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscriminatorId {
    /// Tag is a declared logical name (the simple class name if undeclared).
    #[default]
    LogicalName,
    /// Tag is the fully-qualified class name.
    ClassName,
}

/// Settings that control generation behavior.
///
/// Source and target locations are not part of the settings: the caller hands
/// the run concrete documents and decides where units are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
#[expect(clippy::struct_excessive_bools)]
pub struct GenerationSettings {
    /// Package of generated types without a `javaType` override.
    pub target_package: String,

    /// Characters that split raw names into words. Empty means the raw name is one word.
    pub property_word_delimiters: Vec<char>,

    /// Emit fluent `withX` setters.
    pub generate_builders: bool,

    /// Use `int`/`long`/`double`/`boolean` instead of the boxed types.
    pub use_primitives: bool,

    /// Map schema `integer` to `Long`.
    pub use_long_integers: bool,

    /// Map schema `number` to `Double` (otherwise `Float`).
    pub use_double_numbers: bool,

    /// Map schema `number` to `BigDecimal`.
    pub use_big_decimals: bool,

    pub include_hashcode_and_equals: bool,

    pub include_to_string: bool,

    /// Bounds, size, pattern and not-null validation annotations.
    pub include_jsr303_annotations: bool,

    /// Use `jakarta.validation` instead of `javax.validation`.
    pub use_jakarta_validation: bool,

    /// Javadoc from `title`, `description` and `required`.
    pub include_documentation: bool,

    /// Polymorphic type metadata for types with a discriminator.
    pub include_type_info: bool,

    pub annotation_style: AnnotationStyle,

    /// Generate an extension map for open objects.
    pub include_additional_properties: bool,

    /// Initialize collection fields to empty collections.
    pub initialize_collections: bool,

    /// Name classes after `title` rather than the property or file name.
    pub use_title_as_class_name: bool,

    pub class_name_prefix: String,

    pub class_name_suffix: String,

    /// Identification mode used when a discriminator does not declare one.
    pub default_discriminator_id: DiscriminatorId,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            target_package: String::new(),
            property_word_delimiters: Vec::new(),
            generate_builders: false,
            use_primitives: false,
            use_long_integers: false,
            use_double_numbers: true,
            use_big_decimals: false,
            include_hashcode_and_equals: true,
            include_to_string: true,
            include_jsr303_annotations: false,
            use_jakarta_validation: false,
            include_documentation: true,
            include_type_info: true,
            annotation_style: AnnotationStyle::default(),
            include_additional_properties: true,
            initialize_collections: true,
            use_title_as_class_name: false,
            class_name_prefix: String::new(),
            class_name_suffix: String::new(),
            default_discriminator_id: DiscriminatorId::default(),
        }
    }
}

impl GenerationSettings {
    /// Reads settings from a JSON file; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Settings` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path: &Path = path.as_ref();
        let text: String = std::fs::read_to_string(path)
            .map_err(|e| GenerationError::Settings(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parses settings from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Settings` on malformed JSON or unknown keys.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GenerationError::Settings(e.to_string()))
    }

    /// Extension maps are generated only when enabled and bindable by the active style.
    #[must_use]
    pub const fn additional_properties_enabled(&self) -> bool {
        self.include_additional_properties && self.annotation_style.supports_additional_properties()
    }
}
